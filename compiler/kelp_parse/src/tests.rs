use kelp_ir::{ExprKind, Literal, PatternKind, StringInterner, TypeGuard};
use pretty_assertions::assert_eq;

use crate::{parse_expr, parse_program, ParseError};

fn parse(src: &str) -> (ExprKind, StringInterner) {
    let interner = StringInterner::new();
    let expr = parse_expr(src, &interner).unwrap_or_else(|e| panic!("{src}: {e}"));
    (expr.kind, interner)
}

#[test]
fn atoms() {
    assert_eq!(parse("42").0, ExprKind::Int(42));
    assert_eq!(parse("-3").0, ExprKind::Int(-3));
    assert_eq!(parse("2.5").0, ExprKind::Real(2.5));
    assert_eq!(parse("'x'").0, ExprKind::Char('x'));
    assert_eq!(parse("true").0, ExprKind::Bool(true));
    assert_eq!(parse("()").0, ExprKind::Unit);
    assert_eq!(parse("\"hi\"").0, ExprKind::Str("hi".into()));
}

#[test]
fn symbols_are_interned() {
    let (kind, interner) = parse("push_back");
    let ExprKind::Symbol(name) = kind else {
        panic!("expected symbol, got {kind:?}");
    };
    assert_eq!(interner.lookup(name), "push_back");
}

#[test]
fn compound_literals() {
    let (kind, _) = parse("[1 {2 'a'} []]");
    let ExprKind::Array(items) = kind else {
        panic!("expected array");
    };
    assert_eq!(items.len(), 3);
    assert!(matches!(&items[1].kind, ExprKind::Tuple(t) if t.len() == 2));
    assert!(matches!(&items[2].kind, ExprKind::Array(t) if t.is_empty()));
}

#[test]
fn keywords_are_special_only_in_head_position() {
    let (kind, interner) = parse("(f and or)");
    let ExprKind::Call { callee, args } = kind else {
        panic!("expected call");
    };
    assert!(matches!(callee.kind, ExprKind::Symbol(_)));
    let names: Vec<_> = args
        .iter()
        .map(|a| match a.kind {
            ExprKind::Symbol(n) => interner.lookup(n),
            _ => panic!("expected symbol"),
        })
        .collect();
    assert_eq!(names, vec!["and", "or"]);

    assert!(matches!(parse("(and true false)").0, ExprKind::And(v) if v.len() == 2));
    assert!(matches!(parse("(or)").0, ExprKind::Or(v) if v.is_empty()));
}

#[test]
fn call_head_may_be_any_expression() {
    let (kind, _) = parse("((func (x) x) 1)");
    let ExprKind::Call { callee, args } = kind else {
        panic!("expected call");
    };
    assert!(matches!(callee.kind, ExprKind::Func(_)));
    assert_eq!(args.len(), 1);
}

#[test]
fn if_with_and_without_else() {
    assert!(matches!(
        parse("(if c 1 2)").0,
        ExprKind::If { else_branch: Some(_), .. }
    ));
    assert!(matches!(
        parse("(if c 1)").0,
        ExprKind::If { else_branch: None, .. }
    ));
}

#[test]
fn func_with_several_body_expressions_gets_implicit_do() {
    let (kind, _) = parse("(func (a [b c]) (print a) b)");
    let ExprKind::Func(def) = kind else {
        panic!("expected func");
    };
    assert_eq!(def.arity(), 2);
    assert!(matches!(&def.params[1].kind, PatternKind::Array(p) if p.len() == 2));
    assert!(matches!(&def.body.kind, ExprKind::Do(v) if v.len() == 2));
}

#[test]
fn zero_arity_function() {
    let (kind, _) = parse("(func () 1)");
    let ExprKind::Func(def) = kind else {
        panic!("expected func");
    };
    assert_eq!(def.arity(), 0);
    assert_eq!(def.body.kind, ExprKind::Int(1));
}

#[test]
fn match_arms_and_patterns() {
    let (kind, interner) = parse(
        "(match v (_ 0) (() 1) (3 2) (\"s\" 3) ({a _} 4) ((: Int) 5) ((: (Array Char) s) 6))",
    );
    let ExprKind::Match { arms, .. } = kind else {
        panic!("expected match");
    };
    let pats: Vec<_> = arms.iter().map(|a| a.pattern.kind.clone()).collect();
    assert_eq!(pats[0], PatternKind::Wildcard);
    assert_eq!(pats[1], PatternKind::Literal(Literal::Unit));
    assert_eq!(pats[2], PatternKind::Literal(Literal::Int(3)));
    assert_eq!(pats[3], PatternKind::Literal(Literal::Str("s".into())));
    assert!(matches!(&pats[4], PatternKind::Tuple(p) if p.len() == 2));
    assert_eq!(
        pats[5],
        PatternKind::Guard {
            ty: TypeGuard::Int,
            bind: None
        }
    );
    let PatternKind::Guard { ty, bind: Some(name) } = &pats[6] else {
        panic!("expected binding guard");
    };
    assert_eq!(*ty, TypeGuard::string());
    assert_eq!(interner.lookup(*name), "s");
}

#[test]
fn reference_forms_take_bare_symbols() {
    assert!(matches!(parse("(ref x)").0, ExprKind::Ref(_)));
    assert!(matches!(parse("(begin xs)").0, ExprKind::Begin(_)));
    assert!(matches!(parse("(end xs)").0, ExprKind::End(_)));
    let interner = StringInterner::new();
    let err = parse_expr("(ref 3)", &interner).unwrap_err();
    assert!(matches!(err, ParseError::BadForm { form: "ref", .. }));
}

#[test]
fn poke_takes_two_operands() {
    assert!(matches!(parse("(poke r 1)").0, ExprKind::Poke { .. }));
    let interner = StringInterner::new();
    let err = parse_expr("(poke r 1 2)", &interner).unwrap_err();
    assert!(matches!(err, ParseError::BadForm { form: "poke", .. }));
}

#[test]
fn program_of_several_expressions() {
    let interner = StringInterner::new();
    let exprs = parse_program("(bind x 1) ; comment\n x", &interner).unwrap();
    assert_eq!(exprs.len(), 2);
    assert!(parse_program("", &interner).unwrap().is_empty());
}

#[test]
fn errors() {
    let interner = StringInterner::new();
    assert!(matches!(
        parse_expr("(f 1", &interner),
        Err(ParseError::UnexpectedEof { .. })
    ));
    assert!(matches!(
        parse_expr(")", &interner),
        Err(ParseError::Unexpected { .. })
    ));
    assert!(matches!(
        parse_expr("1 2", &interner),
        Err(ParseError::Unexpected { .. })
    ));
    assert!(matches!(
        parse_expr("(match x ((: Foo) 1))", &interner),
        Err(ParseError::UnknownType { .. })
    ));
    assert!(matches!(
        parse_expr("(match x)", &interner),
        Err(ParseError::BadForm { form: "match", .. })
    ));
    assert!(matches!(
        parse_expr("(if)", &interner),
        Err(ParseError::BadForm { form: "if", .. })
    ));
    assert!(matches!(
        parse_expr("\"abc", &interner),
        Err(ParseError::Lex(_))
    ));
}

#[test]
fn deeply_nested_input_does_not_overflow() {
    let interner = StringInterner::new();
    let depth = 5_000;
    let src = format!("{}1{}", "[".repeat(depth), "]".repeat(depth));
    assert!(parse_expr(&src, &interner).is_ok());
}
