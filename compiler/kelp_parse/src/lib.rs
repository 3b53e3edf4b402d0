//! Kelp reader.
//!
//! Recursive descent over the token list from `kelp_lexer`. Lists whose
//! head is one of the special-form keywords become dedicated AST nodes;
//! every other list is a call. Keywords are only special in head position.

mod cursor;
mod error;
mod expr;
mod pattern;

use kelp_ir::{Expr, StringInterner};

use cursor::Cursor;
pub use error::ParseError;

/// Parser state: a token cursor plus the interner symbols are added to.
pub struct Parser<'a> {
    cursor: Cursor<'a>,
    interner: &'a StringInterner,
}

impl<'a> Parser<'a> {
    pub fn new(tokens: &'a [kelp_lexer::Token], interner: &'a StringInterner) -> Self {
        Parser {
            cursor: Cursor::new(tokens),
            interner,
        }
    }

    /// Parse expressions until the tokens run out.
    pub fn parse_all(&mut self) -> Result<Vec<Expr>, ParseError> {
        let mut exprs = Vec::new();
        while !self.cursor.is_at_end() {
            exprs.push(self.parse_expr()?);
        }
        Ok(exprs)
    }
}

/// Parse a whole program: zero or more top-level expressions.
#[tracing::instrument(level = "debug", skip_all, fields(len = source.len()))]
pub fn parse_program(source: &str, interner: &StringInterner) -> Result<Vec<Expr>, ParseError> {
    let tokens = kelp_lexer::lex(source)?;
    Parser::new(&tokens, interner).parse_all()
}

/// Parse exactly one expression.
pub fn parse_expr(source: &str, interner: &StringInterner) -> Result<Expr, ParseError> {
    let tokens = kelp_lexer::lex(source)?;
    let mut parser = Parser::new(&tokens, interner);
    let expr = parser.parse_expr()?;
    if let Some(extra) = parser.cursor.peek() {
        return Err(ParseError::Unexpected {
            found: extra.kind.describe(),
            expected: "end of input",
            span: extra.span,
        });
    }
    Ok(expr)
}

#[cfg(test)]
#[expect(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]
mod tests;
