//! Boolean operators as ordinary functions. Unlike the `and` / `or` forms
//! they evaluate every operand, which is what makes them curryable.

use super::{take, Builtin};
use crate::errors::EvalResult;
use crate::{Interpreter, Slot};

pub(super) const BUILTINS: &[Builtin] = &[
    Builtin { name: "and", arity: 2, run: and },
    Builtin { name: "or", arity: 2, run: or },
    Builtin { name: "xor", arity: 2, run: xor },
    Builtin { name: "not", arity: 1, run: not },
];

fn binary(interp: &mut Interpreter, args: &[Slot], op: fn(bool, bool) -> bool) -> EvalResult {
    let [a, b] = take(args)?;
    let value = op(interp.stack.read_bool(a)?, interp.stack.read_bool(b)?);
    Ok(interp.stack.push_bool(value)?)
}

fn and(interp: &mut Interpreter, args: &[Slot]) -> EvalResult {
    binary(interp, args, |a, b| a && b)
}

fn or(interp: &mut Interpreter, args: &[Slot]) -> EvalResult {
    binary(interp, args, |a, b| a || b)
}

fn xor(interp: &mut Interpreter, args: &[Slot]) -> EvalResult {
    binary(interp, args, |a, b| a ^ b)
}

fn not(interp: &mut Interpreter, args: &[Slot]) -> EvalResult {
    let [a] = take(args)?;
    let value = !interp.stack.read_bool(a)?;
    Ok(interp.stack.push_bool(value)?)
}
