use pretty_assertions::assert_eq;

use kelp_ir::{ExprKind, StringInterner};

use super::free_names;

/// Free names of the `func` form in `source`, as strings.
fn free(source: &str) -> Vec<&'static str> {
    let interner = StringInterner::new();
    let expr = kelp_parse::parse_expr(source, &interner).unwrap();
    let ExprKind::Func(def) = expr.kind else {
        panic!("not a function: {source}");
    };
    free_names(&def)
        .into_iter()
        .map(|name| interner.lookup(name))
        .collect()
}

#[test]
fn parameters_are_not_free() {
    assert_eq!(free("(func (x) (+ x y))"), ["+", "y"]);
    assert_eq!(free("(func ([a b] {c _}) (f a b c))"), ["f"]);
}

#[test]
fn each_name_is_reported_once_in_first_use_order() {
    assert_eq!(free("(func () (g b a b g))"), ["g", "b", "a"]);
}

#[test]
fn block_bindings_cover_later_steps_only() {
    assert_eq!(free("(func () (do (bind q q) q))"), ["q"]);
    assert_eq!(free("(func () (do (bind y 1) (+ y z)))"), ["+", "z"]);
    assert_eq!(free("(func () (do (do (bind y 1) y) y))"), ["y"]);
}

#[test]
fn match_arms_and_loop_bodies_are_scopes() {
    assert_eq!(free("(func () (match s (b b) (_ c)))"), ["s", "c"]);
    assert_eq!(free("(func () (do (while c (bind k 1)) k))"), ["c", "k"]);
    assert_eq!(free("(func () (match s ((: Int n) n) ({n} n)))"), ["s"]);
}

#[test]
fn nested_functions_see_outer_parameters() {
    assert_eq!(free("(func (x) (func (y) (f x y w)))"), ["f", "w"]);
    assert_eq!(free("(func () (func (y) y))"), Vec::<&str>::new());
}

#[test]
fn reference_forms_use_names() {
    assert_eq!(
        free("(func (i) (do (poke (ref a) (peek (succ (begin b)))) (end c) (inc i)))"),
        ["a", "b", "c"]
    );
}
