//! Token cursor.

use kelp_ir::Span;
use kelp_lexer::{Token, TokenKind};

use crate::ParseError;

pub(crate) struct Cursor<'a> {
    tokens: &'a [Token],
    pos: usize,
}

impl<'a> Cursor<'a> {
    pub(crate) fn new(tokens: &'a [Token]) -> Self {
        Cursor { tokens, pos: 0 }
    }

    pub(crate) fn is_at_end(&self) -> bool {
        self.pos >= self.tokens.len()
    }

    pub(crate) fn peek(&self) -> Option<&'a Token> {
        self.tokens.get(self.pos)
    }

    pub(crate) fn peek_kind(&self) -> Option<&'a TokenKind> {
        self.peek().map(|t| &t.kind)
    }

    /// Consume the next token, failing at end of input.
    pub(crate) fn next(&mut self, expected: &'static str) -> Result<&'a Token, ParseError> {
        let token = self
            .tokens
            .get(self.pos)
            .ok_or(ParseError::UnexpectedEof { expected })?;
        self.pos += 1;
        Ok(token)
    }

    /// Consume `kind` or report what was found instead.
    pub(crate) fn expect(
        &mut self,
        kind: &TokenKind,
        expected: &'static str,
    ) -> Result<Span, ParseError> {
        let token = self.next(expected)?;
        if &token.kind == kind {
            Ok(token.span)
        } else {
            Err(ParseError::Unexpected {
                found: token.kind.describe(),
                expected,
                span: token.span,
            })
        }
    }

    /// Consume `kind` if it is next.
    pub(crate) fn eat(&mut self, kind: &TokenKind) -> Option<Span> {
        match self.peek() {
            Some(token) if &token.kind == kind => {
                self.pos += 1;
                Some(token.span)
            }
            _ => None,
        }
    }
}
