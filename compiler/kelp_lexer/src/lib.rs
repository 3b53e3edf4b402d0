//! Kelp lexer.
//!
//! Turns source text into a flat token list. The grammar is small enough
//! that the lexer is a single forward pass over a [`Cursor`]; no lookahead
//! beyond two characters is needed (`-` followed by a digit starts a number,
//! anything else starting with `-` is a symbol).

mod cursor;
mod escape;

use kelp_ir::Span;

use cursor::Cursor;
pub use escape::{escape_char, escape_str};

/// Token kinds.
#[derive(Clone, Debug, PartialEq)]
pub enum TokenKind {
    LParen,
    RParen,
    LBracket,
    RBracket,
    LBrace,
    RBrace,
    Int(i64),
    Real(f64),
    Char(char),
    Str(String),
    /// Any other atom, including `true`, `false`, `_` and keywords.
    Symbol(String),
}

impl TokenKind {
    /// Short description for error messages.
    pub fn describe(&self) -> String {
        match self {
            TokenKind::LParen => "`(`".to_string(),
            TokenKind::RParen => "`)`".to_string(),
            TokenKind::LBracket => "`[`".to_string(),
            TokenKind::RBracket => "`]`".to_string(),
            TokenKind::LBrace => "`{`".to_string(),
            TokenKind::RBrace => "`}`".to_string(),
            TokenKind::Int(n) => format!("integer `{n}`"),
            TokenKind::Real(r) => format!("real `{r:?}`"),
            TokenKind::Char(c) => format!("character {}", escape_char(*c)),
            TokenKind::Str(s) => format!("string {}", escape_str(s)),
            TokenKind::Symbol(s) => format!("symbol `{s}`"),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
}

/// Lexical errors.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum LexError {
    #[error("unterminated string literal")]
    UnterminatedString { span: Span },
    #[error("unterminated character literal")]
    UnterminatedChar { span: Span },
    #[error("character literal must contain exactly one character")]
    BadCharLiteral { span: Span },
    #[error("unknown escape sequence `\\{escape}`")]
    UnknownEscape { escape: char, span: Span },
    #[error("invalid unicode escape")]
    BadUnicodeEscape { span: Span },
    #[error("integer literal `{text}` does not fit in 64 bits")]
    IntegerOverflow { text: String, span: Span },
    #[error("malformed number `{text}`")]
    MalformedNumber { text: String, span: Span },
}

impl LexError {
    pub fn span(&self) -> Span {
        match self {
            LexError::UnterminatedString { span }
            | LexError::UnterminatedChar { span }
            | LexError::BadCharLiteral { span }
            | LexError::UnknownEscape { span, .. }
            | LexError::BadUnicodeEscape { span }
            | LexError::IntegerOverflow { span, .. }
            | LexError::MalformedNumber { span, .. } => *span,
        }
    }
}

/// Characters that end an atom.
fn is_delimiter(c: char) -> bool {
    c.is_whitespace() || matches!(c, '(' | ')' | '[' | ']' | '{' | '}' | '"' | ';')
}

/// Tokenize `source`.
pub fn lex(source: &str) -> Result<Vec<Token>, LexError> {
    let mut cursor = Cursor::new(source);
    let mut tokens = Vec::new();

    loop {
        cursor.skip_trivia();
        let start = cursor.pos();
        let Some(c) = cursor.bump() else {
            break;
        };
        let kind = match c {
            '(' => TokenKind::LParen,
            ')' => TokenKind::RParen,
            '[' => TokenKind::LBracket,
            ']' => TokenKind::RBracket,
            '{' => TokenKind::LBrace,
            '}' => TokenKind::RBrace,
            '"' => lex_string(&mut cursor, start)?,
            '\'' => lex_char(&mut cursor, start)?,
            c if c.is_ascii_digit() => lex_number(&mut cursor, start)?,
            '-' if cursor.peek().is_some_and(|n| n.is_ascii_digit()) => {
                lex_number(&mut cursor, start)?
            }
            _ => {
                cursor.eat_while(|c| !is_delimiter(c));
                TokenKind::Symbol(cursor.slice_from(start).to_string())
            }
        };
        tokens.push(Token {
            kind,
            span: Span::from_range(start..cursor.pos()),
        });
    }

    Ok(tokens)
}

fn lex_string(cursor: &mut Cursor<'_>, start: usize) -> Result<TokenKind, LexError> {
    let mut text = String::new();
    loop {
        match cursor.bump() {
            None => {
                return Err(LexError::UnterminatedString {
                    span: Span::from_range(start..cursor.pos()),
                })
            }
            Some('"') => return Ok(TokenKind::Str(text)),
            Some('\\') => text.push(escape::unescape(cursor)?),
            Some(c) => text.push(c),
        }
    }
}

fn lex_char(cursor: &mut Cursor<'_>, start: usize) -> Result<TokenKind, LexError> {
    let c = match cursor.bump() {
        None => {
            return Err(LexError::UnterminatedChar {
                span: Span::from_range(start..cursor.pos()),
            })
        }
        Some('\\') => escape::unescape(cursor)?,
        Some('\'') => {
            return Err(LexError::BadCharLiteral {
                span: Span::from_range(start..cursor.pos()),
            })
        }
        Some(c) => c,
    };
    match cursor.bump() {
        Some('\'') => Ok(TokenKind::Char(c)),
        Some(_) => {
            cursor.eat_while(|c| c != '\'' && c != '\n');
            cursor.eat('\'');
            Err(LexError::BadCharLiteral {
                span: Span::from_range(start..cursor.pos()),
            })
        }
        None => Err(LexError::UnterminatedChar {
            span: Span::from_range(start..cursor.pos()),
        }),
    }
}

fn lex_number(cursor: &mut Cursor<'_>, start: usize) -> Result<TokenKind, LexError> {
    cursor.eat_while(|c| c.is_ascii_digit());
    let mut is_real = false;

    if cursor.peek() == Some('.') && cursor.peek_second().is_some_and(|c| c.is_ascii_digit()) {
        is_real = true;
        cursor.bump();
        cursor.eat_while(|c| c.is_ascii_digit());
    }
    if matches!(cursor.peek(), Some('e' | 'E')) {
        let exponent_digits = match cursor.peek_second() {
            Some('+' | '-') => cursor.peek_third().is_some_and(|c| c.is_ascii_digit()),
            Some(c) => c.is_ascii_digit(),
            None => false,
        };
        if exponent_digits {
            is_real = true;
            cursor.bump();
            if matches!(cursor.peek(), Some('+' | '-')) {
                cursor.bump();
            }
            cursor.eat_while(|c| c.is_ascii_digit());
        }
    }

    // A number glued to symbol characters (`12abc`) is not a number
    cursor.eat_while(|c| !is_delimiter(c));
    let text = cursor.slice_from(start);
    let span = Span::from_range(start..cursor.pos());

    if is_real {
        text.parse::<f64>()
            .map(TokenKind::Real)
            .map_err(|_| LexError::MalformedNumber {
                text: text.to_string(),
                span,
            })
    } else if text.bytes().skip(1).all(|b| b.is_ascii_digit()) {
        text.parse::<i64>()
            .map(TokenKind::Int)
            .map_err(|_| LexError::IntegerOverflow {
                text: text.to_string(),
                span,
            })
    } else {
        Err(LexError::MalformedNumber {
            text: text.to_string(),
            span,
        })
    }
}

#[cfg(test)]
#[expect(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]
mod tests;
