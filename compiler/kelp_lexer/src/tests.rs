use super::*;
use pretty_assertions::assert_eq;

fn kinds(source: &str) -> Vec<TokenKind> {
    lex(source)
        .unwrap_or_else(|e| panic!("lex failed: {e}"))
        .into_iter()
        .map(|t| t.kind)
        .collect()
}

fn sym(s: &str) -> TokenKind {
    TokenKind::Symbol(s.to_string())
}

#[test]
fn delimiters_and_symbols() {
    assert_eq!(
        kinds("(bind x^ [1 2]) {a}"),
        vec![
            TokenKind::LParen,
            sym("bind"),
            sym("x^"),
            TokenKind::LBracket,
            TokenKind::Int(1),
            TokenKind::Int(2),
            TokenKind::RBracket,
            TokenKind::RParen,
            TokenKind::LBrace,
            sym("a"),
            TokenKind::RBrace,
        ]
    );
}

#[test]
fn minus_is_a_symbol_unless_followed_by_digit() {
    assert_eq!(
        kinds("(- -3 x)"),
        vec![
            TokenKind::LParen,
            sym("-"),
            TokenKind::Int(-3),
            sym("x"),
            TokenKind::RParen,
        ]
    );
}

#[test]
fn reals_with_fraction_and_exponent() {
    assert_eq!(
        kinds("2.5 -0.125 1e100 3E-2"),
        vec![
            TokenKind::Real(2.5),
            TokenKind::Real(-0.125),
            TokenKind::Real(1e100),
            TokenKind::Real(0.03),
        ]
    );
}

#[test]
fn comments_are_skipped() {
    assert_eq!(kinds("; nothing\n7 ; seven"), vec![TokenKind::Int(7)]);
}

#[test]
fn char_and_string_escapes() {
    assert_eq!(
        kinds(r#"'a' '\n' '\'' "a\"b\u{e9}""#),
        vec![
            TokenKind::Char('a'),
            TokenKind::Char('\n'),
            TokenKind::Char('\''),
            TokenKind::Str("a\"b\u{e9}".to_string()),
        ]
    );
}

#[test]
fn escape_helpers_round_trip() {
    for s in ["plain", "tab\there", "quote\"d", "back\\slash", "nul\0", "\u{7}bell"] {
        let rendered = escape_str(s);
        assert_eq!(kinds(&rendered), vec![TokenKind::Str(s.to_string())]);
    }
    for c in ['x', '\'', '\\', '\n', 'λ'] {
        assert_eq!(kinds(&escape_char(c)), vec![TokenKind::Char(c)]);
    }
}

#[test]
fn integer_overflow_is_reported() {
    let err = lex("99999999999999999999").unwrap_err();
    assert!(matches!(err, LexError::IntegerOverflow { .. }));
}

#[test]
fn digits_glued_to_letters_are_malformed() {
    let err = lex("12abc").unwrap_err();
    assert!(matches!(err, LexError::MalformedNumber { .. }));
}

#[test]
fn unterminated_string() {
    let err = lex("\"abc").unwrap_err();
    assert_eq!(err.span(), Span::new(0, 4));
}

#[test]
fn bad_char_literals() {
    assert!(matches!(lex("''"), Err(LexError::BadCharLiteral { .. })));
    assert!(matches!(lex("'ab'"), Err(LexError::BadCharLiteral { .. })));
    assert!(matches!(lex("'\\q'"), Err(LexError::UnknownEscape { escape: 'q', .. })));
}
