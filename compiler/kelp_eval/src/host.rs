//! Marshalling between stack values and owned host values.
//!
//! Host callbacks never see the stack. Their arguments are decoded into
//! [`HostValue`] trees and their result is encoded back, with the same
//! homogeneity check an array literal gets. Functions and references have
//! no host representation beyond an opaque marker, so they can be passed
//! out to a callback but not returned from one.

use std::fmt;

use kelp_lexer::{escape_char, escape_str};

use crate::errors::{heterogeneous, type_mismatch, EvalResult};
use crate::value::{shape_of, Shape, StackError, Tag, ValueStack, HEADER_SIZE};
use crate::Slot;

#[derive(Clone, Debug, PartialEq)]
pub enum HostValue {
    Unit,
    Bool(bool),
    Char(char),
    Int(i64),
    Real(f64),
    /// A non-empty array of `Char`.
    Str(String),
    Array(Vec<HostValue>),
    Tuple(Vec<HostValue>),
    /// Opaque function handle.
    Function { arity: usize },
    /// Opaque reference; the offset is informational.
    Ref { offset: usize },
}

impl HostValue {
    /// Name of the value's type as written in guard patterns.
    pub fn type_name(&self) -> &'static str {
        match self {
            HostValue::Unit => "Unit",
            HostValue::Bool(_) => "Bool",
            HostValue::Char(_) => "Char",
            HostValue::Int(_) => "Int",
            HostValue::Real(_) => "Real",
            HostValue::Str(_) | HostValue::Array(_) => "Array",
            HostValue::Tuple(_) => "Tuple",
            HostValue::Function { .. } => "Func",
            HostValue::Ref { .. } => "Ref",
        }
    }
}

impl fmt::Display for HostValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HostValue::Unit => f.write_str("()"),
            HostValue::Bool(b) => write!(f, "{b}"),
            HostValue::Char(c) => f.write_str(&escape_char(*c)),
            HostValue::Int(n) => write!(f, "{n}"),
            HostValue::Real(r) => write!(f, "{r:?}"),
            HostValue::Str(s) => f.write_str(&escape_str(s)),
            HostValue::Array(items) => write_items(f, '[', items, ']'),
            HostValue::Tuple(items) => write_items(f, '{', items, '}'),
            HostValue::Function { arity } => write!(f, "<func/{arity}>"),
            HostValue::Ref { offset } => write!(f, "<ref @{offset}>"),
        }
    }
}

fn write_items(f: &mut fmt::Formatter<'_>, open: char, items: &[HostValue], close: char) -> fmt::Result {
    write!(f, "{open}")?;
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            f.write_str(" ")?;
        }
        write!(f, "{item}")?;
    }
    write!(f, "{close}")
}

/// Decode the value at `slot`.
pub fn read_host(stack: &ValueStack, slot: Slot) -> Result<HostValue, StackError> {
    kelp_stack::ensure_sufficient_stack(|| {
        Ok(match stack.tag(slot)? {
            Tag::Unit => HostValue::Unit,
            Tag::Bool => HostValue::Bool(stack.read_bool(slot)?),
            Tag::Char => HostValue::Char(stack.read_char(slot)?),
            Tag::Int => HostValue::Int(stack.read_int(slot)?),
            Tag::Real => HostValue::Real(stack.read_real(slot)?),
            Tag::Array => {
                let elements = stack.elements(slot)?;
                match elements.first() {
                    Some(&first) if stack.tag(first)? == Tag::Char => HostValue::Str(
                        elements
                            .iter()
                            .map(|&c| stack.read_char(c))
                            .collect::<Result<_, _>>()?,
                    ),
                    _ => HostValue::Array(read_all(stack, &elements)?),
                }
            }
            Tag::Tuple => HostValue::Tuple(read_all(stack, &stack.elements(slot)?)?),
            Tag::Function => HostValue::Function {
                arity: stack.raw_u32(slot.offset() + HEADER_SIZE)? as usize,
            },
            Tag::Ref => HostValue::Ref {
                offset: stack.read_ref(slot)?.offset(),
            },
        })
    })
}

fn read_all(stack: &ValueStack, slots: &[Slot]) -> Result<Vec<HostValue>, StackError> {
    slots.iter().map(|&slot| read_host(stack, slot)).collect()
}

/// Encode `value` at the top of the stack. On error nothing is left
/// behind.
pub fn push_host(stack: &mut ValueStack, value: &HostValue) -> EvalResult {
    let mark = stack.top();
    let result = push_inner(stack, value);
    if result.is_err() {
        stack.truncate(mark);
    }
    result
}

fn push_inner(stack: &mut ValueStack, value: &HostValue) -> EvalResult {
    kelp_stack::ensure_sufficient_stack(|| {
        Ok(match value {
            HostValue::Unit => stack.push_unit()?,
            HostValue::Bool(b) => stack.push_bool(*b)?,
            HostValue::Char(c) => stack.push_char(*c)?,
            HostValue::Int(n) => stack.push_int(*n)?,
            HostValue::Real(r) => stack.push_real(*r)?,
            HostValue::Str(s) => stack.push_str(s)?,
            HostValue::Array(items) => {
                let pending = stack.open(Tag::Array)?;
                let mut shape: Option<Shape> = None;
                for item in items {
                    let slot = push_inner(stack, item)?;
                    let found = shape_of(stack, slot)?;
                    shape = Some(match shape {
                        None => found,
                        Some(expected) => expected
                            .unify(&found)
                            .ok_or_else(|| heterogeneous(expected, found))?,
                    });
                }
                stack.close_compound(pending, items.len())?
            }
            HostValue::Tuple(items) => {
                let pending = stack.open(Tag::Tuple)?;
                for item in items {
                    push_inner(stack, item)?;
                }
                stack.close_compound(pending, items.len())?
            }
            HostValue::Function { .. } | HostValue::Ref { .. } => {
                return Err(type_mismatch("a returnable host value", value.type_name()));
            }
        })
    })
}

#[cfg(test)]
#[expect(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::EvalErrorKind;

    fn stack() -> ValueStack {
        ValueStack::new(256, 1 << 16)
    }

    #[test]
    fn round_trips_nested_values() {
        let mut stack = stack();
        let value = HostValue::Tuple(vec![
            HostValue::Int(3),
            HostValue::Str("hi".into()),
            HostValue::Array(vec![HostValue::Real(1.5), HostValue::Real(-2.0)]),
            HostValue::Unit,
        ]);
        let slot = push_host(&mut stack, &value).unwrap();
        assert_eq!(read_host(&stack, slot).unwrap(), value);
    }

    #[test]
    fn heterogeneous_arrays_are_rejected_without_residue() {
        let mut stack = stack();
        stack.push_int(1).unwrap();
        let top = stack.top();
        let value = HostValue::Array(vec![HostValue::Int(1), HostValue::Bool(true)]);
        let err = push_host(&mut stack, &value).unwrap_err();
        assert!(matches!(err.kind, EvalErrorKind::Heterogeneous { .. }));
        assert_eq!(stack.top(), top);
    }

    #[test]
    fn opaque_values_cannot_be_pushed() {
        let mut stack = stack();
        let err = push_host(&mut stack, &HostValue::Function { arity: 1 }).unwrap_err();
        assert!(matches!(err.kind, EvalErrorKind::TypeMismatch { .. }));
        assert_eq!(stack.top(), 0);
    }

    #[test]
    fn display_uses_source_syntax() {
        let value = HostValue::Tuple(vec![
            HostValue::Char('\n'),
            HostValue::Str("a\"b".into()),
            HostValue::Array(vec![]),
            HostValue::Real(2.0),
        ]);
        assert_eq!(value.to_string(), r#"{'\n' "a\"b" [] 2.0}"#);
    }
}
