//! Array and tuple operations. Results are always fresh values; operands
//! are never modified. Anything that builds an array checks the result
//! stays homogeneous before pushing a byte.

use super::{take, Builtin};
use crate::errors::{bad_slice, heterogeneous, index_out_of_bounds, type_mismatch, EvalResult};
use crate::value::{shape_of, Shape, Tag};
use crate::{Interpreter, Slot};

pub(super) const BUILTINS: &[Builtin] = &[
    Builtin { name: "length", arity: 1, run: length },
    Builtin { name: "push_front", arity: 2, run: push_front },
    Builtin { name: "push_back", arity: 2, run: push_back },
    Builtin { name: "cat", arity: 2, run: cat },
    Builtin { name: "at", arity: 2, run: at },
    Builtin { name: "slice", arity: 3, run: slice },
];

/// Tag of a compound operand.
fn compound_tag(interp: &Interpreter, slot: Slot) -> EvalResult<Tag> {
    let tag = interp.stack.tag(slot)?;
    if tag.is_compound() {
        Ok(tag)
    } else {
        Err(type_mismatch("Array or Tuple", tag.name()))
    }
}

fn int_len(len: usize) -> i64 {
    i64::try_from(len).unwrap_or(i64::MAX)
}

fn length(interp: &mut Interpreter, args: &[Slot]) -> EvalResult {
    let [c] = take(args)?;
    compound_tag(interp, c)?;
    let len = interp.stack.count(c)?;
    Ok(interp.stack.push_int(int_len(len))?)
}

/// Check that `value` may join the array at `array`.
fn check_element(interp: &Interpreter, array: Slot, value: Slot) -> EvalResult<()> {
    let Shape::Array(Some(expected)) = shape_of(&interp.stack, array)? else {
        return Ok(());
    };
    let found = shape_of(&interp.stack, value)?;
    if expected.is_compatible(&found) {
        Ok(())
    } else {
        Err(heterogeneous(*expected, found))
    }
}

fn push_one(interp: &mut Interpreter, args: &[Slot], front: bool) -> EvalResult {
    let [c, value] = take(args)?;
    let tag = compound_tag(interp, c)?;
    if tag == Tag::Array {
        check_element(interp, c, value)?;
    }
    let len = interp.stack.count(c)?;
    let stack = &mut interp.stack;
    let pending = stack.open(tag)?;
    if front {
        stack.push_copy(value)?;
    }
    stack.push_elements(c, 0, len)?;
    if !front {
        stack.push_copy(value)?;
    }
    Ok(stack.close_compound(pending, len + 1)?)
}

fn push_front(interp: &mut Interpreter, args: &[Slot]) -> EvalResult {
    push_one(interp, args, true)
}

fn push_back(interp: &mut Interpreter, args: &[Slot]) -> EvalResult {
    push_one(interp, args, false)
}

/// Both operands must be the same kind of compound. Two arrays may only be
/// joined if their element shapes unify.
fn cat(interp: &mut Interpreter, args: &[Slot]) -> EvalResult {
    let [a, b] = take(args)?;
    let tag = compound_tag(interp, a)?;
    let other = compound_tag(interp, b)?;
    if tag != other {
        return Err(type_mismatch(tag.name(), other.name()));
    }
    if tag == Tag::Array {
        let left = shape_of(&interp.stack, a)?;
        let right = shape_of(&interp.stack, b)?;
        if !left.is_compatible(&right) {
            return Err(heterogeneous(left, right));
        }
    }
    let (len_a, len_b) = (interp.stack.count(a)?, interp.stack.count(b)?);
    let stack = &mut interp.stack;
    let pending = stack.open(tag)?;
    stack.push_elements(a, 0, len_a)?;
    stack.push_elements(b, 0, len_b)?;
    Ok(stack.close_compound(pending, len_a + len_b)?)
}

fn at(interp: &mut Interpreter, args: &[Slot]) -> EvalResult {
    let [c, index] = take(args)?;
    compound_tag(interp, c)?;
    let i = interp.stack.read_int(index)?;
    let elements = interp.stack.elements(c)?;
    let element = usize::try_from(i)
        .ok()
        .and_then(|i| elements.get(i).copied())
        .ok_or_else(|| index_out_of_bounds(i, elements.len()))?;
    Ok(interp.stack.push_copy(element)?)
}

/// `(slice c lo hi)`: elements `lo..hi`, requiring `0 <= lo <= hi <= length`.
fn slice(interp: &mut Interpreter, args: &[Slot]) -> EvalResult {
    let [c, lo, hi] = take(args)?;
    let tag = compound_tag(interp, c)?;
    let (lo, hi) = (interp.stack.read_int(lo)?, interp.stack.read_int(hi)?);
    let len = interp.stack.count(c)?;
    let range = usize::try_from(lo)
        .ok()
        .zip(usize::try_from(hi).ok())
        .filter(|&(lo, hi)| lo <= hi && hi <= len);
    let Some((lo, hi)) = range else {
        return Err(bad_slice(lo, hi, len));
    };
    let stack = &mut interp.stack;
    let pending = stack.open(tag)?;
    let copied = stack.push_elements(c, lo, hi)?;
    Ok(stack.close_compound(pending, copied)?)
}
