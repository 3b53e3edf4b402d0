use pretty_assertions::assert_eq;

use crate::tests::{run, run_err};
use crate::EvalErrorKind;

#[test]
fn integer_arithmetic() {
    assert_eq!(run("(+ 2 3)"), "5");
    assert_eq!(run("(- 2 3)"), "-1");
    assert_eq!(run("(* -4 3)"), "-12");
    assert_eq!(run("(/ -7 2)"), "-3");
    assert_eq!(run("(% -7 2)"), "-1");
    assert_eq!(run("{(min 3 9) (max 3 9)}"), "{3 9}");
    assert_eq!(run("{(neg 4) (abs -4)}"), "{-4 4}");
}

#[test]
fn mixed_operands_promote_to_real() {
    assert_eq!(run("(+ 1 0.5)"), "1.5");
    assert_eq!(run("(* 2.0 3)"), "6.0");
    assert_eq!(run("(/ 1 4.0)"), "0.25");
    assert_eq!(run("(to_real 3)"), "3.0");
    assert_eq!(run("(sqrt 16)"), "4.0");
}

#[test]
fn integer_errors_are_reported() {
    assert_eq!(run_err("(/ 1 0)"), EvalErrorKind::DivisionByZero);
    assert_eq!(run_err("(% 1 0)"), EvalErrorKind::ModuloByZero);
    assert_eq!(
        run_err("(+ 9223372036854775807 1)"),
        EvalErrorKind::IntegerOverflow {
            operation: "addition"
        }
    );
    assert_eq!(
        run_err("(neg -9223372036854775808)"),
        EvalErrorKind::IntegerOverflow {
            operation: "negation"
        }
    );
}

#[test]
fn arithmetic_rejects_non_numbers() {
    assert_eq!(
        run_err("(+ 1 true)"),
        EvalErrorKind::TypeMismatch {
            expected: "Int or Real".to_owned(),
            found: "Bool".to_owned()
        }
    );
}

#[test]
fn rounding_returns_int() {
    assert_eq!(run("{(floor 2.7) (ceil 2.1) (round 2.5) (round -2.5)}"), "{2 3 3 -3}");
    assert!(matches!(
        run_err("(floor 3)"),
        EvalErrorKind::TypeMismatch { .. }
    ));
    assert!(matches!(
        run_err("(floor 1e300)"),
        EvalErrorKind::IntegerOverflow { .. }
    ));
}

#[test]
fn equality_is_structural() {
    assert_eq!(run("(= [1 2 {3 'c'}] [1 2 {3 'c'}])"), "true");
    assert_eq!(run("(= [1 2] [1 2 3])"), "false");
    assert_eq!(run("(= 1 1.0)"), "false");
    assert_eq!(run("(!= \"ab\" \"ab\")"), "false");
    assert_eq!(run("(= () ())"), "true");
}

#[test]
fn ordering_needs_matching_numbers() {
    assert_eq!(run("{(< 1 2) (<= 2 2) (> 1 2) (>= 2.5 2.5)}"), "{true true false true}");
    assert!(matches!(
        run_err("(< 1 2.0)"),
        EvalErrorKind::TypeMismatch { .. }
    ));
    assert!(matches!(
        run_err("(< 'a' 'b')"),
        EvalErrorKind::TypeMismatch { .. }
    ));
}

#[test]
fn logic_functions_evaluate_both_operands() {
    let source = "(bind a and) (bind o or) {(a true false) (o true false) (xor true true) (not false)}";
    assert_eq!(run(source), "{false true false true}");
    assert!(matches!(
        run_err("(bind a and) (a true 1)"),
        EvalErrorKind::TypeMismatch { .. }
    ));
}

#[test]
fn compound_operations() {
    assert_eq!(run("{(length [1 2 3]) (length {}) (length \"\")}"), "{3 0 0}");
    assert_eq!(run("(push_front [2 3] 1)"), "[1 2 3]");
    assert_eq!(run("(push_back [] 'a')"), "\"a\"");
    assert_eq!(run("(push_back {1} true)"), "{1 true}");
    assert_eq!(run("(cat {1} {'x'})"), "{1 'x'}");
    assert_eq!(run("(cat \"ab\" \"cd\")"), "\"abcd\"");
    assert_eq!(run("(cat [] [[1]])"), "[[1]]");
    assert_eq!(run("(at {1 'x' 2.5} 1)"), "'x'");
}

#[test]
fn compound_kinds_must_match() {
    assert_eq!(
        run_err("(cat [1] {2})"),
        EvalErrorKind::TypeMismatch {
            expected: "Array".to_owned(),
            found: "Tuple".to_owned()
        }
    );
    assert!(matches!(
        run_err("(length 5)"),
        EvalErrorKind::TypeMismatch { .. }
    ));
}

#[test]
fn at_checks_bounds() {
    assert_eq!(
        run_err("(at [1] -1)"),
        EvalErrorKind::IndexOutOfBounds {
            index: -1,
            length: 1
        }
    );
}

#[test]
fn slice_ranges() {
    assert_eq!(run("(slice [1 2 3 4] 1 3)"), "[2 3]");
    assert_eq!(run("(slice [1 2 3 4] 4 4)"), "[]");
    assert_eq!(run("(slice {1 'a' 2.0} 0 2)"), "{1 'a'}");
    assert_eq!(run("(slice \"hello\" 1 4)"), "\"ell\"");
    for source in ["(slice [1 2] 2 1)", "(slice [1 2] -1 1)", "(slice [1 2] 0 3)"] {
        assert!(
            matches!(run_err(source), EvalErrorKind::BadSlice { .. }),
            "{source}"
        );
    }
}
