//! Escape sequences shared by character and string literals.
//!
//! [`escape_char`] and [`escape_str`] produce source text that the lexer
//! reads back to the same value, which `to_string` relies on.

use kelp_ir::Span;

use crate::cursor::Cursor;
use crate::LexError;

/// Decode the escape after a consumed backslash.
pub(crate) fn unescape(cursor: &mut Cursor<'_>) -> Result<char, LexError> {
    let start = cursor.pos().saturating_sub(1);
    let Some(c) = cursor.bump() else {
        return Err(LexError::UnterminatedString {
            span: Span::from_range(start..cursor.pos()),
        });
    };
    match c {
        'n' => Ok('\n'),
        't' => Ok('\t'),
        'r' => Ok('\r'),
        '0' => Ok('\0'),
        '\\' => Ok('\\'),
        '\'' => Ok('\''),
        '"' => Ok('"'),
        'u' => unescape_unicode(cursor, start),
        other => Err(LexError::UnknownEscape {
            escape: other,
            span: Span::from_range(start..cursor.pos()),
        }),
    }
}

fn unescape_unicode(cursor: &mut Cursor<'_>, start: usize) -> Result<char, LexError> {
    if !cursor.eat('{') {
        return Err(LexError::BadUnicodeEscape {
            span: Span::from_range(start..cursor.pos()),
        });
    }
    let digits_start = cursor.pos();
    cursor.eat_while(|c| c.is_ascii_hexdigit());
    let digits = cursor.slice_from(digits_start);
    let closed = cursor.eat('}');
    let span = Span::from_range(start..cursor.pos());
    if !closed || digits.is_empty() || digits.len() > 6 {
        return Err(LexError::BadUnicodeEscape { span });
    }
    u32::from_str_radix(digits, 16)
        .ok()
        .and_then(char::from_u32)
        .ok_or(LexError::BadUnicodeEscape { span })
}

fn push_escaped(out: &mut String, c: char, quote: char) {
    match c {
        '\n' => out.push_str("\\n"),
        '\t' => out.push_str("\\t"),
        '\r' => out.push_str("\\r"),
        '\0' => out.push_str("\\0"),
        '\\' => out.push_str("\\\\"),
        c if c == quote => {
            out.push('\\');
            out.push(c);
        }
        c if c.is_control() => out.push_str(&format!("\\u{{{:x}}}", u32::from(c))),
        c => out.push(c),
    }
}

/// Render a character as a literal, quotes included.
pub fn escape_char(c: char) -> String {
    let mut out = String::from('\'');
    push_escaped(&mut out, c, '\'');
    out.push('\'');
    out
}

/// Render a string as a literal, quotes included.
pub fn escape_str(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for c in s.chars() {
        push_escaped(&mut out, c, '"');
    }
    out.push('"');
    out
}
