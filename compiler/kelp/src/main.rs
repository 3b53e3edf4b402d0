//! Kelp CLI
//!
//! Runs a source file, evaluates a snippet, or starts an interactive REPL.

mod commands;

use std::process::ExitCode;
use std::sync::Once;

static TRACING_INIT: Once = Once::new();

/// Install a tracing subscriber when `RUST_LOG` is set.
///
/// Enable with `RUST_LOG=kelp_eval=debug` or `RUST_LOG=kelp_eval=trace`.
fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        if std::env::var("RUST_LOG").is_ok() {
            let filter = EnvFilter::from_default_env();
            tracing_subscriber::registry()
                .with(
                    fmt::layer()
                        .with_writer(std::io::stderr)
                        .with_target(true)
                        .with_level(true),
                )
                .with(filter)
                .init();
        }
    });
}

fn main() -> ExitCode {
    init_tracing();
    let args: Vec<String> = std::env::args().collect();

    let Some(command) = args.get(1) else {
        print_usage();
        return ExitCode::FAILURE;
    };

    match command.as_str() {
        "run" => {
            let Some(path) = args.get(2) else {
                eprintln!("Usage: kelp run <file.kelp>");
                return ExitCode::FAILURE;
            };
            commands::run_file(path)
        }
        "eval" => {
            if args.len() < 3 {
                eprintln!("Usage: kelp eval <source>");
                return ExitCode::FAILURE;
            }
            commands::eval_source(&args[2..].join(" "))
        }
        "repl" => commands::repl(),
        "help" | "--help" | "-h" => {
            print_usage();
            ExitCode::SUCCESS
        }
        "version" | "--version" | "-V" => {
            println!("Kelp {}", env!("CARGO_PKG_VERSION"));
            ExitCode::SUCCESS
        }
        _ => {
            if std::path::Path::new(command)
                .extension()
                .is_some_and(|ext| ext.eq_ignore_ascii_case("kelp"))
            {
                commands::run_file(command)
            } else {
                eprintln!("Unknown command: {command}");
                eprintln!();
                print_usage();
                ExitCode::FAILURE
            }
        }
    }
}

fn print_usage() {
    println!("Kelp interpreter");
    println!();
    println!("Usage: kelp <command> [args]");
    println!();
    println!("Commands:");
    println!("  run <file.kelp>    Evaluate a program and print its result");
    println!("  eval <source>      Evaluate source text given on the command line");
    println!("  repl               Start an interactive session");
    println!("  help               Show this help message");
    println!("  version            Show version information");
    println!();
    println!("Set RUST_LOG (e.g. RUST_LOG=kelp_eval=debug) to trace evaluation.");
}
