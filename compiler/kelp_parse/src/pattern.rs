//! Pattern and type-guard grammar.

use kelp_ir::{Literal, Pattern, PatternKind, Span, TypeGuard};
use kelp_lexer::TokenKind;
use kelp_stack::ensure_sufficient_stack;

use crate::{ParseError, Parser};

impl Parser<'_> {
    pub(crate) fn parse_pattern(&mut self) -> Result<Pattern, ParseError> {
        ensure_sufficient_stack(|| self.parse_pattern_inner())
    }

    fn parse_pattern_inner(&mut self) -> Result<Pattern, ParseError> {
        let token = self.cursor.next("a pattern")?;
        let span = token.span;
        let kind = match &token.kind {
            TokenKind::Int(n) => PatternKind::Literal(Literal::Int(*n)),
            TokenKind::Real(r) => PatternKind::Literal(Literal::Real(*r)),
            TokenKind::Char(c) => PatternKind::Literal(Literal::Char(*c)),
            TokenKind::Str(s) => PatternKind::Literal(Literal::Str(s.clone())),
            TokenKind::Symbol(s) => match s.as_str() {
                "_" => PatternKind::Wildcard,
                "true" => PatternKind::Literal(Literal::Bool(true)),
                "false" => PatternKind::Literal(Literal::Bool(false)),
                _ => PatternKind::Bind(self.interner.intern(s)),
            },
            TokenKind::LBracket => {
                let (items, end) = self.parse_patterns(&TokenKind::RBracket, "`]`")?;
                return Ok(Pattern::new(PatternKind::Array(items), span.merge(end)));
            }
            TokenKind::LBrace => {
                let (items, end) = self.parse_patterns(&TokenKind::RBrace, "`}`")?;
                return Ok(Pattern::new(PatternKind::Tuple(items), span.merge(end)));
            }
            TokenKind::LParen => return self.parse_paren_pattern(span),
            TokenKind::RParen | TokenKind::RBracket | TokenKind::RBrace => {
                return Err(ParseError::Unexpected {
                    found: token.kind.describe(),
                    expected: "a pattern",
                    span,
                })
            }
        };
        Ok(Pattern::new(kind, span))
    }

    fn parse_patterns(
        &mut self,
        close: &TokenKind,
        expected: &'static str,
    ) -> Result<(Vec<Pattern>, Span), ParseError> {
        let mut items = Vec::new();
        loop {
            if let Some(end) = self.cursor.eat(close) {
                return Ok((items, end));
            }
            if self.cursor.is_at_end() {
                return Err(ParseError::UnexpectedEof { expected });
            }
            items.push(self.parse_pattern()?);
        }
    }

    /// `()` or a guard `(: T)` / `(: T name)`.
    fn parse_paren_pattern(&mut self, open: Span) -> Result<Pattern, ParseError> {
        if let Some(close) = self.cursor.eat(&TokenKind::RParen) {
            return Ok(Pattern::new(
                PatternKind::Literal(Literal::Unit),
                open.merge(close),
            ));
        }
        self.cursor
            .expect(&TokenKind::Symbol(":".to_owned()), "`:` starting a guard pattern")?;
        let ty = self.parse_type()?;
        let bind = match self.cursor.peek_kind() {
            Some(TokenKind::Symbol(name)) if name != "_" => {
                self.cursor.next("a name")?;
                Some(self.interner.intern(name))
            }
            Some(TokenKind::Symbol(_)) => {
                self.cursor.next("a name")?;
                None
            }
            _ => None,
        };
        let close = self.cursor.expect(&TokenKind::RParen, "`)` closing a guard pattern")?;
        Ok(Pattern::new(
            PatternKind::Guard { ty, bind },
            open.merge(close),
        ))
    }

    fn parse_type(&mut self) -> Result<TypeGuard, ParseError> {
        let token = self.cursor.next("a type name")?;
        match &token.kind {
            TokenKind::Symbol(name) => simple_type(name).ok_or_else(|| ParseError::UnknownType {
                name: name.clone(),
                span: token.span,
            }),
            TokenKind::LParen => {
                let head = self.cursor.next("`Array` or `Ref`")?;
                let wrap: fn(Option<Box<TypeGuard>>) -> TypeGuard = match &head.kind {
                    TokenKind::Symbol(s) if s == "Array" => TypeGuard::Array,
                    TokenKind::Symbol(s) if s == "Ref" => TypeGuard::Ref,
                    TokenKind::Symbol(s) => {
                        return Err(ParseError::UnknownType {
                            name: s.clone(),
                            span: head.span,
                        })
                    }
                    other => {
                        return Err(ParseError::Unexpected {
                            found: other.describe(),
                            expected: "`Array` or `Ref`",
                            span: head.span,
                        })
                    }
                };
                let inner = ensure_sufficient_stack(|| self.parse_type())?;
                self.cursor.expect(&TokenKind::RParen, "`)` closing a type")?;
                Ok(wrap(Some(Box::new(inner))))
            }
            other => Err(ParseError::Unexpected {
                found: other.describe(),
                expected: "a type name",
                span: token.span,
            }),
        }
    }
}

fn simple_type(name: &str) -> Option<TypeGuard> {
    Some(match name {
        "Unit" => TypeGuard::Unit,
        "Bool" => TypeGuard::Bool,
        "Char" => TypeGuard::Char,
        "Int" => TypeGuard::Int,
        "Real" => TypeGuard::Real,
        "Tuple" => TypeGuard::Tuple,
        "Func" => TypeGuard::Func,
        "Array" => TypeGuard::Array(None),
        "Ref" => TypeGuard::Ref(None),
        "String" => TypeGuard::string(),
        _ => return None,
    })
}
