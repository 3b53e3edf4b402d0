//! Stack discipline: temporaries never outlive the expression that made
//! them, and failures leave nothing behind.

use pretty_assertions::assert_eq;

use super::{run_in, runtime};
use crate::EvalErrorKind;

const INT_SIZE: usize = 13;
const UNIT_SIZE: usize = 5;

#[test]
fn a_block_leaves_only_its_result() {
    let mut rt = runtime();
    let before = rt.stack_top();
    let text = run_in(
        &mut rt,
        "(do (bind a [1 2 3]) 99 (bind b {a a}) \"scratch\" (length b))",
    )
    .unwrap();
    assert_eq!(text, "2");
    assert_eq!(rt.stack_top() - before, INT_SIZE);
}

#[test]
fn nested_blocks_collapse_at_every_level() {
    let mut rt = runtime();
    let before = rt.stack_top();
    run_in(
        &mut rt,
        "(do (bind x (do (bind y 4) (bind z 5) (+ y z))) (do 1 2 (* x 2)))",
    )
    .unwrap();
    assert_eq!(rt.stack_top() - before, INT_SIZE);
}

#[test]
fn global_bindings_stay_and_temporaries_go() {
    let mut rt = runtime();
    let before = rt.stack_top();
    run_in(&mut rt, "(bind n 7)").unwrap();
    let bound = rt.stack_top();
    assert_eq!(bound - before, INT_SIZE);

    run_in(&mut rt, "(+ n 1)").unwrap();
    assert_eq!(rt.stack_top(), bound + INT_SIZE);
    run_in(&mut rt, "(+ n 2)").unwrap();
    assert_eq!(rt.stack_top(), bound + INT_SIZE, "previous temporary dropped");
    run_in(&mut rt, "(bind m n)").unwrap();
    assert_eq!(rt.stack_top(), bound + INT_SIZE, "temporary replaced by binding");
}

#[test]
fn loops_do_not_grow_the_stack() {
    let mut rt = runtime();
    run_in(&mut rt, "(bind i 0) (bind i^ (ref i))").unwrap();
    let before = rt.stack_top();
    run_in(
        &mut rt,
        "(while (< (peek i^) 100) (do (bind scratch [1 2 3]) (poke i^ (+ (peek i^) 1))))",
    )
    .unwrap();
    assert_eq!(rt.stack_top() - before, UNIT_SIZE);
    assert_eq!(run_in(&mut rt, "i").unwrap(), "100");
}

#[test]
fn heterogeneous_literal_leaves_stack_unchanged() {
    let mut rt = runtime();
    run_in(&mut rt, "(bind keep [1 2])").unwrap();
    let before = rt.stack_top();
    let err = run_in(&mut rt, "[[1 2] [3] [true]]").unwrap_err();
    assert!(matches!(err.kind, EvalErrorKind::Heterogeneous { .. }));
    assert_eq!(rt.stack_top(), before);
}

#[test]
fn heterogeneous_builtins_leave_stack_unchanged() {
    let mut rt = runtime();
    run_in(&mut rt, "(bind xs [1 2])").unwrap();
    let before = rt.stack_top();
    for source in ["(push_back xs 'c')", "(push_front xs 1.5)", "(cat xs [[1]])"] {
        let err = run_in(&mut rt, source).unwrap_err();
        assert!(
            matches!(err.kind, EvalErrorKind::Heterogeneous { .. }),
            "{source}: {err}"
        );
        assert_eq!(rt.stack_top(), before, "{source}");
    }
}

#[test]
fn failed_statement_rolls_back_its_bindings() {
    let mut rt = runtime();
    let before = rt.stack_top();
    let err = run_in(&mut rt, "{(bind z 1) (missing z)}").unwrap_err();
    assert_eq!(
        err.kind,
        EvalErrorKind::UndefinedSymbol {
            name: "missing".to_owned()
        }
    );
    assert_eq!(rt.stack_top(), before);
    assert_eq!(
        run_in(&mut rt, "z").unwrap_err().kind,
        EvalErrorKind::UndefinedSymbol {
            name: "z".to_owned()
        }
    );
    assert_eq!(run_in(&mut rt, "(bind z 2) z").unwrap(), "2");
}

#[test]
fn errors_inside_calls_unwind_cleanly() {
    let mut rt = runtime();
    run_in(&mut rt, "(bind f (func (x) (do (bind big [1 2 3 4 5]) (/ x 0))))").unwrap();
    let before = rt.stack_top();
    assert_eq!(
        run_in(&mut rt, "(f 1)").unwrap_err().kind,
        EvalErrorKind::DivisionByZero
    );
    assert_eq!(rt.stack_top(), before);
    assert_eq!(run_in(&mut rt, "(f 1.0)").unwrap(), "inf");
}

#[test]
fn bindings_inside_temporaries_are_forgotten() {
    let mut rt = runtime();
    let before = rt.stack_top();
    let undefined_y = EvalErrorKind::UndefinedSymbol {
        name: "y".to_owned(),
    };

    assert_eq!(run_in(&mut rt, "(do (+ (bind y 1) 0) y)").unwrap_err().kind, undefined_y);
    assert_eq!(run_in(&mut rt, "(+ (bind y 1) 0)").unwrap(), "1");
    assert_eq!(run_in(&mut rt, "y").unwrap_err().kind, undefined_y);
    assert_eq!(rt.stack_top(), before);

    assert_eq!(run_in(&mut rt, "(bind x (+ (bind y 1) 1)) {x}").unwrap(), "{2}");
    assert_eq!(run_in(&mut rt, "y").unwrap_err().kind, undefined_y);
}

#[test]
fn bindings_inside_constructors_survive() {
    assert_eq!(super::run("(do [(bind a 1) a] a)"), "1");
    assert_eq!(super::run("(do (if true (bind b 2) 0) b)"), "2");
}
