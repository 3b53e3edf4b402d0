use pretty_assertions::assert_eq;

use super::{run, run_err, runtime, run_in};
use crate::{buffer_handler, EvalErrorKind, Runtime, RuntimeConfig};

#[test]
fn closure_captures_the_innermost_binding() {
    let source = "
        (do
          (bind k 1)
          (bind f (do (bind k 10) (func () k)))
          (f))";
    assert_eq!(run(source), "10");
}

#[test]
fn captures_are_snapshots() {
    let source = "
        (do
          (bind a 1)
          (bind a^ (ref a))
          (bind g (func () a))
          (poke a^ 5)
          {(g) a})";
    assert_eq!(run(source), "{1 5}");
}

#[test]
fn closure_outlives_the_call_that_made_it() {
    let source = "
        (bind adder (func (n) (func (m) (+ n m))))
        (bind add3 (adder 3))
        (add3 4)";
    assert_eq!(run(source), "7");
}

#[test]
fn globals_are_resolved_at_call_time() {
    let source = "
        (bind fact (func (n) (if (<= n 1) 1 (* n (fact (- n 1))))))
        (fact 10)";
    assert_eq!(run(source), "3628800");
}

#[test]
fn callee_does_not_see_caller_locals() {
    let source = "
        (bind peek_y (func () y))
        (do (bind y 1) (peek_y))";
    assert_eq!(
        run_err(source),
        EvalErrorKind::UndefinedSymbol {
            name: "y".to_owned()
        }
    );
}

#[test]
fn every_currying_split_agrees() {
    let mut rt = runtime();
    run_in(&mut rt, "(bind add3 (func (a b c) (+ a (* b c))))").unwrap();
    for call in [
        "(add3 1 2 3)",
        "((add3 1) 2 3)",
        "((add3 1 2) 3)",
        "(((add3 1) 2) 3)",
        "((((add3) 1) 2) 3)",
    ] {
        assert_eq!(run_in(&mut rt, call).unwrap(), "7", "{call}");
    }
}

#[test]
fn curried_values_are_independent() {
    let source = "
        (bind sub (func (a b) (- a b)))
        (bind from10 (sub 10))
        (bind from1 (sub 1))
        {(from10 3) (from1 3) (from10 4)}";
    assert_eq!(run(source), "{7 -2 6}");
}

#[test]
fn too_many_arguments_is_an_arity_error() {
    assert_eq!(
        run_err("((func (a b) a) 1 2 3)"),
        EvalErrorKind::ArityMismatch {
            expected: 2,
            got: 3
        }
    );
    assert_eq!(
        run_err("(((func (a b) a) 1) 2 3)"),
        EvalErrorKind::ArityMismatch {
            expected: 2,
            got: 3
        }
    );
}

#[test]
fn arity_messages_agree_in_number() {
    assert_eq!(
        run_err("((func (x) x) 1 2)").to_string(),
        "function expects 1 argument, got 2"
    );
    assert_eq!(
        run_err("((func (a b) a) 1 2 3)").to_string(),
        "function expects 2 arguments, got 3"
    );
}

#[test]
fn calling_a_non_function_fails() {
    assert_eq!(
        run_err("(1 2)"),
        EvalErrorKind::NotCallable {
            found: "Int".to_owned()
        }
    );
}

#[test]
fn parameters_are_patterns() {
    assert_eq!(run("((func ({a b} [c]) (+ a (+ b c))) {1 2} [3])"), "6");
    assert_eq!(
        run_err("((func ({a b}) a) [1 2])"),
        EvalErrorKind::PatternMismatch
    );
}

#[test]
fn builtins_are_first_class() {
    assert_eq!(run("(bind both and) (both true false)"), "false");
    assert_eq!(run("(bind plus +) ((plus 1) 2)"), "3");
}

#[test]
fn runaway_recursion_is_reported() {
    let config = RuntimeConfig::default()
        .with_max_call_depth(50)
        .with_print_handler(buffer_handler());
    let mut rt = Runtime::with_config(config).unwrap();
    let err = run_in(&mut rt, "(bind spin (func (n) (spin n))) (spin 1)").unwrap_err();
    assert_eq!(err.kind, EvalErrorKind::RecursionLimit { depth: 50 });
    assert_eq!(err.backtrace.len(), 50);
    assert_eq!(err.backtrace[0].name, "spin");
}

#[test]
fn errors_inside_calls_carry_a_backtrace() {
    let mut rt = runtime();
    let source = "(bind inner (func (x) (at x 9)))\n(bind outer (func (x) (inner x)))\n(outer [1])";
    let err = run_in(&mut rt, source).unwrap_err();
    let names: Vec<_> = err.backtrace.iter().map(|f| f.name.as_str()).collect();
    assert_eq!(names, ["inner", "outer"]);
    let rendered = err.render(source);
    assert!(rendered.contains("in outer called at 3:1"), "{rendered}");
}
