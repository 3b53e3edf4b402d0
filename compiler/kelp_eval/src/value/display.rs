//! Source-syntax rendering of stack values.
//!
//! Output re-reads as the same value wherever the value has a literal
//! form: a non-empty array of chars renders as a string literal, reals
//! always carry a fraction or exponent, and chars and strings are escaped.
//! Functions and references render as opaque `<func/N>` / `<ref @N>`.

use kelp_lexer::{escape_char, escape_str};

use super::{Slot, StackError, Tag, ValueStack, HEADER_SIZE};

/// Append the source form of the value at `slot` to `out`.
pub fn write_value(stack: &ValueStack, slot: Slot, out: &mut String) -> Result<(), StackError> {
    kelp_stack::ensure_sufficient_stack(|| {
        match stack.tag(slot)? {
            Tag::Unit => out.push_str("()"),
            Tag::Bool => out.push_str(if stack.read_bool(slot)? { "true" } else { "false" }),
            Tag::Char => out.push_str(&escape_char(stack.read_char(slot)?)),
            Tag::Int => out.push_str(&stack.read_int(slot)?.to_string()),
            Tag::Real => out.push_str(&format!("{:?}", stack.read_real(slot)?)),
            Tag::Array => {
                if let Some(text) = read_string(stack, slot)? {
                    if !text.is_empty() {
                        out.push_str(&escape_str(&text));
                        return Ok(());
                    }
                }
                write_items(stack, slot, '[', ']', out)?;
            }
            Tag::Tuple => write_items(stack, slot, '{', '}', out)?,
            Tag::Function => {
                let arity = stack.raw_u32(slot.offset() + HEADER_SIZE)?;
                out.push_str(&format!("<func/{arity}>"));
            }
            Tag::Ref => out.push_str(&format!("<ref @{}>", stack.read_ref(slot)?.offset())),
        }
        Ok(())
    })
}

fn write_items(
    stack: &ValueStack,
    slot: Slot,
    open: char,
    close: char,
    out: &mut String,
) -> Result<(), StackError> {
    out.push(open);
    for (i, item) in stack.elements(slot)?.into_iter().enumerate() {
        if i > 0 {
            out.push(' ');
        }
        write_value(stack, item, out)?;
    }
    out.push(close);
    Ok(())
}

/// Decode an array of chars. `None` if `slot` is not one; an empty array
/// decodes as the empty string.
pub(crate) fn read_string(stack: &ValueStack, slot: Slot) -> Result<Option<String>, StackError> {
    if stack.tag(slot)? != Tag::Array {
        return Ok(None);
    }
    let mut text = String::new();
    for item in stack.elements(slot)? {
        if stack.tag(item)? != Tag::Char {
            return Ok(None);
        }
        text.push(stack.read_char(item)?);
    }
    Ok(Some(text))
}
