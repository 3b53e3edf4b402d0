//! Comparison. Equality is structural over any two values; ordering is
//! only defined between two `Int`s or two `Real`s.

use std::cmp::Ordering;

use super::arith::Number;
use super::{take, Builtin};
use crate::errors::{type_mismatch, EvalResult};
use crate::value::values_equal;
use crate::{Interpreter, Slot};

pub(super) const BUILTINS: &[Builtin] = &[
    Builtin { name: "=", arity: 2, run: eq },
    Builtin { name: "!=", arity: 2, run: ne },
    Builtin { name: "<", arity: 2, run: lt },
    Builtin { name: "<=", arity: 2, run: le },
    Builtin { name: ">", arity: 2, run: gt },
    Builtin { name: ">=", arity: 2, run: ge },
];

fn eq(interp: &mut Interpreter, args: &[Slot]) -> EvalResult {
    let [a, b] = take(args)?;
    let equal = values_equal(&interp.stack, a, b)?;
    Ok(interp.stack.push_bool(equal)?)
}

fn ne(interp: &mut Interpreter, args: &[Slot]) -> EvalResult {
    let [a, b] = take(args)?;
    let equal = values_equal(&interp.stack, a, b)?;
    Ok(interp.stack.push_bool(!equal)?)
}

/// `None` when the operands are unordered (a NaN is involved).
fn ordering(interp: &Interpreter, args: &[Slot]) -> EvalResult<Option<Ordering>> {
    let [a, b] = take(args)?;
    match (Number::read(interp, a)?, Number::read(interp, b)?) {
        (Number::Int(a), Number::Int(b)) => Ok(Some(a.cmp(&b))),
        (Number::Real(a), Number::Real(b)) => Ok(a.partial_cmp(&b)),
        (a, b) => Err(type_mismatch(
            "operands of the same numeric type",
            format!("{} and {}", kind(a), kind(b)),
        )),
    }
}

fn kind(n: Number) -> &'static str {
    match n {
        Number::Int(_) => "Int",
        Number::Real(_) => "Real",
    }
}

fn compare(interp: &mut Interpreter, args: &[Slot], accept: fn(Ordering) -> bool) -> EvalResult {
    let result = ordering(interp, args)?.is_some_and(accept);
    Ok(interp.stack.push_bool(result)?)
}

fn lt(interp: &mut Interpreter, args: &[Slot]) -> EvalResult {
    compare(interp, args, Ordering::is_lt)
}

fn le(interp: &mut Interpreter, args: &[Slot]) -> EvalResult {
    compare(interp, args, Ordering::is_le)
}

fn gt(interp: &mut Interpreter, args: &[Slot]) -> EvalResult {
    compare(interp, args, Ordering::is_gt)
}

fn ge(interp: &mut Interpreter, args: &[Slot]) -> EvalResult {
    compare(interp, args, Ordering::is_ge)
}
