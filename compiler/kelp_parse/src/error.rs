//! Parse error types.

use kelp_ir::Span;
use kelp_lexer::LexError;

/// Errors produced while reading source text.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum ParseError {
    #[error(transparent)]
    Lex(#[from] LexError),

    #[error("unexpected end of input, expected {expected}")]
    UnexpectedEof { expected: &'static str },

    #[error("unexpected {found}, expected {expected}")]
    Unexpected {
        found: String,
        expected: &'static str,
        span: Span,
    },

    #[error("malformed `{form}`: {message}")]
    BadForm {
        form: &'static str,
        message: String,
        span: Span,
    },

    #[error("unknown type `{name}` in guard pattern")]
    UnknownType { name: String, span: Span },
}

impl ParseError {
    /// Source location of the error, if it has one.
    pub fn span(&self) -> Option<Span> {
        match self {
            ParseError::Lex(e) => Some(e.span()),
            ParseError::UnexpectedEof { .. } => None,
            ParseError::Unexpected { span, .. }
            | ParseError::BadForm { span, .. }
            | ParseError::UnknownType { span, .. } => Some(*span),
        }
    }
}
