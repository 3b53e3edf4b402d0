//! Reference primitives.
//!
//! A reference holds the offset and generation of its target, so a
//! reference that outlives its target fails on use with a stale-slot error
//! instead of reading whatever moved into its place. It also holds the end
//! of the region it may walk: the single value from `ref`, or the element
//! range from `begin` / `end`. Stepping stops at one past that end, and
//! dereferencing there is a `PastEnd` error, so a reference never reaches
//! a neighbouring value.

use kelp_ir::{Expr, Name};

use crate::errors::{shape_mismatch, size_mismatch, EvalResult};
use crate::value::shape_of;
use crate::Interpreter;

impl Interpreter {
    /// `(ref x)`: a reference to the value bound to `x`.
    pub(crate) fn eval_ref(&mut self, name: Name) -> EvalResult {
        let binding = self.lookup(name)?;
        self.stack.resolve(binding.slot)?;
        Ok(self.stack.push_ref(binding.slot)?)
    }

    /// `(peek r)`: a copy of the referenced value.
    pub(crate) fn eval_peek(&mut self, target: &Expr) -> EvalResult {
        let mut frame = self.frame();
        let reference = frame.eval(target)?;
        let pointee = frame.stack.deref(reference)?;
        let copy = frame.stack.push_copy(pointee)?;
        frame.keep(copy)
    }

    /// `(poke r v)`: overwrite the referenced value in place. The new value
    /// must be shape-compatible with the old one and encode to the same
    /// size, so arrays stay homogeneous and nothing around the target moves.
    pub(crate) fn eval_poke(&mut self, target: &Expr, value: &Expr) -> EvalResult {
        {
            let mut frame = self.frame();
            let reference = frame.eval(target)?;
            let pointee = frame.stack.deref(reference)?;
            let value = frame.eval(value)?;

            let expected = shape_of(&frame.stack, pointee)?;
            let found = shape_of(&frame.stack, value)?;
            if !expected.is_compatible(&found) {
                return Err(shape_mismatch(expected, found));
            }
            let old_size = frame.stack.header(pointee)?.size();
            let new_size = frame.stack.header(value)?.size();
            if old_size != new_size {
                return Err(size_mismatch(old_size, new_size));
            }
            frame.stack.overwrite(pointee, value)?;
        }
        Ok(self.stack.push_unit()?)
    }

    /// `(begin xs)`: a reference to the first element position of `xs`.
    pub(crate) fn eval_begin(&mut self, name: Name) -> EvalResult {
        let binding = self.lookup(name)?;
        let first = self.stack.first_element(binding.slot)?;
        let end = self.stack.next(binding.slot)?.offset();
        Ok(self.stack.push_ref_within(first, end)?)
    }

    /// `(end xs)`: a reference one past the last element of `xs`.
    pub(crate) fn eval_end(&mut self, name: Name) -> EvalResult {
        let binding = self.lookup(name)?;
        self.stack.count(binding.slot)?;
        let past = self.stack.next(binding.slot)?;
        Ok(self.stack.push_ref_within(past, past.offset())?)
    }

    /// `(inc rr)`: advance the reference that `rr` points at by one value,
    /// at most to one past the end of its region.
    pub(crate) fn eval_inc(&mut self, target: &Expr) -> EvalResult {
        {
            let mut frame = self.frame();
            let outer = frame.eval(target)?;
            let inner = frame.stack.deref(outer)?;
            let advanced = frame.stack.ref_successor(inner)?;
            frame.stack.set_ref(inner, advanced)?;
        }
        Ok(self.stack.push_unit()?)
    }

    /// `(succ r)`: a new reference to the value after the one `r` points at.
    pub(crate) fn eval_succ(&mut self, target: &Expr) -> EvalResult {
        let mut frame = self.frame();
        let reference = frame.eval(target)?;
        let advanced = frame.stack.ref_successor(reference)?;
        let end = frame.stack.ref_end(reference)?;
        let slot = frame.stack.push_ref_within(advanced, end)?;
        frame.keep(slot)
    }
}
