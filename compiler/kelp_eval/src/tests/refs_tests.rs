use pretty_assertions::assert_eq;

use super::{run, run_err, run_in, runtime};
use crate::{EvalErrorKind, StackError};

#[test]
fn iterate_with_begin_end_and_inc() {
    let source = "
        (bind xs [1 2 3 4])
        (bind sum 0)
        (bind sum^ (ref sum))
        (bind it (begin xs))
        (bind it^ (ref it))
        (while (!= (peek it^) (end xs))
          (do (poke sum^ (+ (peek sum^) (peek (peek it^))))
              (inc it^)))
        sum";
    assert_eq!(run(source), "10");
}

#[test]
fn succ_steps_without_mutating() {
    let source = "
        (bind xs ['a' 'b' 'c'])
        (bind first (begin xs))
        {(peek (succ first)) (peek (succ (succ first))) (peek first)}";
    assert_eq!(run(source), "{'b' 'c' 'a'}");
}

#[test]
fn poke_into_an_array_element() {
    let source = "
        (bind xs [1 2 3])
        (bind second (succ (begin xs)))
        (poke second 20)
        xs";
    assert_eq!(run(source), "[1 20 3]");
}

#[test]
fn poke_rejects_incompatible_values() {
    assert!(matches!(
        run_err("(bind x 1) (bind x^ (ref x)) (poke x^ true)"),
        EvalErrorKind::ShapeMismatch { .. }
    ));
    assert_eq!(
        run_err("(bind s \"ab\") (bind s^ (ref s)) (poke s^ \"abc\")"),
        EvalErrorKind::SizeMismatch {
            expected: 27,
            found: 36
        }
    );
    assert_eq!(run("(bind s \"ab\") (bind s^ (ref s)) (poke s^ \"xy\") s"), "\"xy\"");
}

#[test]
fn stale_references_are_detected() {
    let mut rt = runtime();
    let err = run_in(&mut rt, "(peek (do (bind tmp 5) (ref tmp)))").unwrap_err();
    assert!(
        matches!(err.kind, EvalErrorKind::Stack(StackError::StaleSlot { .. })),
        "{err}"
    );
}

#[test]
fn ref_needs_a_bound_name() {
    assert_eq!(
        run_err("(ref nowhere)"),
        EvalErrorKind::UndefinedSymbol {
            name: "nowhere".to_owned()
        }
    );
}

#[test]
fn begin_of_a_scalar_is_a_type_error() {
    assert!(matches!(
        run_err("(bind n 3) (begin n)"),
        EvalErrorKind::TypeMismatch { .. }
    ));
}

#[test]
fn reference_guard_patterns() {
    let source = "
        (bind n 3)
        (match (ref n)
          ((: (Ref Real)) \"real\")
          ((: (Ref Int) r) (peek r)))";
    assert_eq!(run(source), "3");
}

fn is_past_end(kind: &EvalErrorKind) -> bool {
    matches!(kind, EvalErrorKind::Stack(StackError::PastEnd { .. }))
}

#[test]
fn peek_past_the_end_is_reported() {
    let kind = run_err("(bind v [1 2 3]) (bind e (end v)) (peek e)");
    assert!(is_past_end(&kind), "{kind}");
    let kind = run_err("(bind v []) (peek (begin v))");
    assert!(is_past_end(&kind), "{kind}");
}

#[test]
fn poke_past_the_end_leaves_neighbours_alone() {
    let mut rt = runtime();
    let err = run_in(&mut rt, "(bind v [1]) (bind x 5) (bind e (end v)) (poke e 9)").unwrap_err();
    assert!(is_past_end(&err.kind), "{err}");
    assert_eq!(run_in(&mut rt, "x").unwrap(), "5");
    assert_eq!(run_in(&mut rt, "v").unwrap(), "[1]");
}

#[test]
fn inc_on_a_scalar_reference_stops_past_its_target() {
    let mut rt = runtime();
    run_in(&mut rt, "(bind x 5) (bind y 6) (bind r (ref x)) (bind rr (ref r)) (inc rr)").unwrap();

    let err = run_in(&mut rt, "(poke r 0)").unwrap_err();
    assert!(is_past_end(&err.kind), "{err}");
    let err = run_in(&mut rt, "(peek r)").unwrap_err();
    assert!(is_past_end(&err.kind), "{err}");
    let err = run_in(&mut rt, "(inc rr)").unwrap_err();
    assert!(is_past_end(&err.kind), "{err}");
    assert_eq!(run_in(&mut rt, "{x y}").unwrap(), "{5 6}");
}

#[test]
fn succ_walks_to_the_end_and_no_further() {
    let source = "
        (bind xs [1 2])
        (bind last (succ (begin xs)))
        {(peek last) (= (succ last) (end xs))}";
    assert_eq!(run(source), "{2 true}");
    let kind = run_err("(bind xs [1 2]) (succ (succ (succ (begin xs))))");
    assert!(is_past_end(&kind), "{kind}");
}
