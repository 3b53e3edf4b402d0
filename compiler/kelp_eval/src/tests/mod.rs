//! Whole-program tests run through [`Runtime`].
//!
//! Unit tests for individual modules live next to them; these exercise the
//! evaluator end to end from source text.

mod closure_tests;
mod collapse_tests;
mod refs_tests;

use crate::{buffer_handler, EvalError, EvalErrorKind, Runtime, RuntimeConfig};

/// A runtime whose output is captured.
pub(crate) fn runtime() -> Runtime {
    Runtime::with_config(RuntimeConfig::default().with_print_handler(buffer_handler())).unwrap()
}

/// Run `source` in `rt`, returning the rendered result.
pub(crate) fn run_in(rt: &mut Runtime, source: &str) -> Result<String, EvalError> {
    let exprs = rt.parse(source).unwrap();
    let slot = rt.evaluate_program(&exprs)?;
    Ok(rt.display(slot).unwrap())
}

/// Run `source` in a fresh runtime, expecting success.
pub(crate) fn run(source: &str) -> String {
    match run_in(&mut runtime(), source) {
        Ok(text) => text,
        Err(err) => panic!("`{source}` failed: {err}"),
    }
}

/// Run `source` in a fresh runtime, expecting failure.
pub(crate) fn run_err(source: &str) -> EvalErrorKind {
    match run_in(&mut runtime(), source) {
        Ok(text) => panic!("`{source}` unexpectedly produced {text}"),
        Err(err) => err.kind,
    }
}
