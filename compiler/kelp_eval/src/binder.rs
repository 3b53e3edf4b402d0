//! Pattern binder.
//!
//! Matches a [`Pattern`] against a value already on the stack and binds
//! names into the current scope. Bound names refer to the matched value in
//! place (or to an element inside it); nothing is copied or pushed.
//! Compound patterns bind left to right and stop at the first mismatch,
//! leaving earlier bindings in the scope; callers run the binder in a scope
//! they throw away on failure.

use kelp_ir::{Literal, Name, Pattern, PatternKind, Span, TypeGuard};

use crate::errors::{already_bound, pattern_mismatch, EvalError};
use crate::symbols::Binding;
use crate::value::{read_string, StackError, Tag};
use crate::{Interpreter, Slot};

#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum BindError {
    #[error("value does not match the pattern")]
    Mismatch,
    #[error("name already bound in this scope")]
    AlreadyBound(Name),
    #[error(transparent)]
    Stack(#[from] StackError),
}

impl Interpreter {
    /// Match `pattern` against the value at `slot`, binding into the
    /// current scope.
    pub fn bind_pattern(&mut self, pattern: &Pattern, slot: Slot) -> Result<(), BindError> {
        kelp_stack::ensure_sufficient_stack(|| self.bind_inner(pattern, slot))
    }

    fn bind_inner(&mut self, pattern: &Pattern, slot: Slot) -> Result<(), BindError> {
        match &pattern.kind {
            PatternKind::Wildcard => Ok(()),
            PatternKind::Bind(name) => self.define(*name, slot, pattern.span),
            PatternKind::Literal(literal) => {
                if self.literal_matches(literal, slot)? {
                    Ok(())
                } else {
                    Err(BindError::Mismatch)
                }
            }
            PatternKind::Array(items) => self.bind_compound(Tag::Array, items, slot),
            PatternKind::Tuple(items) => self.bind_compound(Tag::Tuple, items, slot),
            PatternKind::Guard { ty, bind } => {
                if !self.guard_matches(ty, slot)? {
                    return Err(BindError::Mismatch);
                }
                match bind {
                    Some(name) => self.define(*name, slot, pattern.span),
                    None => Ok(()),
                }
            }
        }
    }

    fn bind_compound(&mut self, tag: Tag, items: &[Pattern], slot: Slot) -> Result<(), BindError> {
        if self.stack.tag(slot)? != tag {
            return Err(BindError::Mismatch);
        }
        let elements = self.stack.elements(slot)?;
        if elements.len() != items.len() {
            return Err(BindError::Mismatch);
        }
        for (item, element) in items.iter().zip(elements) {
            self.bind_pattern(item, element)?;
        }
        Ok(())
    }

    /// Bind `name` to `slot` in the current scope.
    pub(crate) fn define(&mut self, name: Name, slot: Slot, span: Span) -> Result<(), BindError> {
        self.symbols
            .insert(self.scope, name, Binding { slot, span })
            .map_err(|_| BindError::AlreadyBound(name))
    }

    #[expect(clippy::float_cmp, reason = "literal patterns compare exactly")]
    fn literal_matches(&self, literal: &Literal, slot: Slot) -> Result<bool, StackError> {
        let tag = self.stack.tag(slot)?;
        Ok(match (literal, tag) {
            (Literal::Unit, Tag::Unit) => true,
            (Literal::Bool(b), Tag::Bool) => self.stack.read_bool(slot)? == *b,
            (Literal::Char(c), Tag::Char) => self.stack.read_char(slot)? == *c,
            (Literal::Int(n), Tag::Int) => self.stack.read_int(slot)? == *n,
            (Literal::Real(r), Tag::Real) => self.stack.read_real(slot)? == *r,
            (Literal::Str(s), Tag::Array) => {
                read_string(&self.stack, slot)?.is_some_and(|text| text == *s)
            }
            _ => false,
        })
    }

    fn guard_matches(&self, ty: &TypeGuard, slot: Slot) -> Result<bool, StackError> {
        let tag = self.stack.tag(slot)?;
        Ok(match ty {
            TypeGuard::Unit => tag == Tag::Unit,
            TypeGuard::Bool => tag == Tag::Bool,
            TypeGuard::Char => tag == Tag::Char,
            TypeGuard::Int => tag == Tag::Int,
            TypeGuard::Real => tag == Tag::Real,
            TypeGuard::Tuple => tag == Tag::Tuple,
            TypeGuard::Func => tag == Tag::Function,
            TypeGuard::Array(elem) => {
                if tag != Tag::Array {
                    return Ok(false);
                }
                // Homogeneous, so the first element speaks for all of them;
                // an empty array matches any element guard.
                match (elem, self.stack.elements(slot)?.first()) {
                    (Some(elem), Some(&first)) => self.guard_matches(elem, first)?,
                    _ => true,
                }
            }
            TypeGuard::Ref(target) => {
                if tag != Tag::Ref {
                    return Ok(false);
                }
                match target {
                    // A stale or past-the-end reference has no pointee to test.
                    Some(target) => match self.stack.deref(slot) {
                        Ok(pointee) => self.guard_matches(target, pointee)?,
                        Err(_) => false,
                    },
                    None => true,
                }
            }
        })
    }

    /// Turn a binder failure into an evaluation error.
    pub(crate) fn bind_error(&self, err: BindError) -> EvalError {
        match err {
            BindError::Mismatch => pattern_mismatch(),
            BindError::AlreadyBound(name) => already_bound(self.interner.lookup(name)),
            BindError::Stack(err) => err.into(),
        }
    }
}
