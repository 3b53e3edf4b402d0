//! The `run`, `eval` and `repl` commands.

use std::io::{self, BufRead, Write};
use std::process::ExitCode;

use kelp_eval::{RunError, Runtime};
use kelp_lexer::LexError;
use kelp_parse::ParseError;

fn new_runtime() -> Option<Runtime> {
    match Runtime::new() {
        Ok(rt) => Some(rt),
        Err(err) => {
            eprintln!("error: failed to start the runtime: {err}");
            None
        }
    }
}

/// Evaluate `source` as a whole program and print its result.
fn run_program(rt: &mut Runtime, source: &str) -> ExitCode {
    let shown = rt
        .run_source(source)
        .and_then(|slot| rt.display(slot).map_err(RunError::from));
    match shown {
        Ok(text) => {
            println!("{text}");
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("error: {}", err.render(source));
            ExitCode::FAILURE
        }
    }
}

pub fn run_file(path: &str) -> ExitCode {
    let source = match std::fs::read_to_string(path) {
        Ok(source) => source,
        Err(err) => {
            eprintln!("error: cannot read '{path}': {err}");
            return ExitCode::FAILURE;
        }
    };
    let Some(mut rt) = new_runtime() else {
        return ExitCode::FAILURE;
    };
    tracing::debug!(path, bytes = source.len(), "running file");
    run_program(&mut rt, &source)
}

pub fn eval_source(source: &str) -> ExitCode {
    let Some(mut rt) = new_runtime() else {
        return ExitCode::FAILURE;
    };
    run_program(&mut rt, source)
}

/// Input that a further line could still complete.
fn is_incomplete(err: &ParseError) -> bool {
    matches!(
        err,
        ParseError::UnexpectedEof { .. }
            | ParseError::Lex(LexError::UnterminatedString { .. } | LexError::UnterminatedChar { .. })
    )
}

/// Read-eval-print loop. Each entry is evaluated statement by statement, so
/// a failing entry leaves earlier bindings in place.
pub fn repl() -> ExitCode {
    let Some(mut rt) = new_runtime() else {
        return ExitCode::FAILURE;
    };
    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    let mut buffer = String::new();

    loop {
        print!("{}", if buffer.is_empty() { "kelp> " } else { "  ... " });
        if io::stdout().flush().is_err() {
            return ExitCode::FAILURE;
        }
        let line = match lines.next() {
            Some(Ok(line)) => line,
            Some(Err(err)) => {
                eprintln!("error: {err}");
                return ExitCode::FAILURE;
            }
            None => break,
        };
        if buffer.is_empty() && matches!(line.trim(), ":q" | ":quit") {
            break;
        }
        buffer.push_str(&line);
        buffer.push('\n');

        let exprs = match rt.parse(&buffer) {
            Ok(exprs) => exprs,
            Err(err) if is_incomplete(&err) => continue,
            Err(err) => {
                eprintln!("error: {}", RunError::from(err).render(&buffer));
                buffer.clear();
                continue;
            }
        };
        for expr in &exprs {
            match rt.evaluate_one(expr).and_then(|slot| rt.display(slot)) {
                Ok(text) => println!("{text}"),
                Err(err) => {
                    eprintln!("error: {}", err.render(&buffer));
                    break;
                }
            }
        }
        buffer.clear();
    }
    println!();
    ExitCode::SUCCESS
}
