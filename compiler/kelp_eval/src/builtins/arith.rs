//! Arithmetic. `Int` with `Int` stays `Int` with checked overflow; any
//! `Real` operand promotes the other to `Real`.

use super::{take, Builtin};
use crate::errors::{division_by_zero, integer_overflow, modulo_by_zero, type_mismatch, EvalResult};
use crate::value::Tag;
use crate::{Interpreter, Slot};

pub(super) const BUILTINS: &[Builtin] = &[
    Builtin { name: "+", arity: 2, run: add },
    Builtin { name: "-", arity: 2, run: sub },
    Builtin { name: "*", arity: 2, run: mul },
    Builtin { name: "/", arity: 2, run: div },
    Builtin { name: "%", arity: 2, run: rem },
    Builtin { name: "min", arity: 2, run: min },
    Builtin { name: "max", arity: 2, run: max },
    Builtin { name: "neg", arity: 1, run: neg },
    Builtin { name: "abs", arity: 1, run: abs },
    Builtin { name: "sqrt", arity: 1, run: sqrt },
    Builtin { name: "to_real", arity: 1, run: to_real },
    Builtin { name: "floor", arity: 1, run: floor },
    Builtin { name: "ceil", arity: 1, run: ceil },
    Builtin { name: "round", arity: 1, run: round },
];

/// 2^63, the first `f64` past the `i64` range.
const I64_BOUND: f64 = 9_223_372_036_854_775_808.0;

#[derive(Copy, Clone, Debug)]
pub(super) enum Number {
    Int(i64),
    Real(f64),
}

impl Number {
    pub(super) fn read(interp: &Interpreter, slot: Slot) -> EvalResult<Number> {
        match interp.stack.tag(slot)? {
            Tag::Int => Ok(Number::Int(interp.stack.read_int(slot)?)),
            Tag::Real => Ok(Number::Real(interp.stack.read_real(slot)?)),
            other => Err(type_mismatch("Int or Real", other.name())),
        }
    }

    #[expect(clippy::cast_precision_loss, reason = "Int to Real promotion rounds")]
    fn to_f64(self) -> f64 {
        match self {
            Number::Int(n) => n as f64,
            Number::Real(r) => r,
        }
    }

    fn push(self, interp: &mut Interpreter) -> EvalResult {
        Ok(match self {
            Number::Int(n) => interp.stack.push_int(n)?,
            Number::Real(r) => interp.stack.push_real(r)?,
        })
    }
}

type IntOp = fn(i64, i64) -> EvalResult<i64>;

fn binary(interp: &mut Interpreter, args: &[Slot], int: IntOp, real: fn(f64, f64) -> f64) -> EvalResult {
    let [a, b] = take(args)?;
    let result = match (Number::read(interp, a)?, Number::read(interp, b)?) {
        (Number::Int(a), Number::Int(b)) => Number::Int(int(a, b)?),
        (a, b) => Number::Real(real(a.to_f64(), b.to_f64())),
    };
    result.push(interp)
}

#[inline]
fn checked(result: Option<i64>, operation: &'static str) -> EvalResult<i64> {
    result.ok_or_else(|| integer_overflow(operation))
}

fn add(interp: &mut Interpreter, args: &[Slot]) -> EvalResult {
    binary(interp, args, |a, b| checked(a.checked_add(b), "addition"), |a, b| a + b)
}

fn sub(interp: &mut Interpreter, args: &[Slot]) -> EvalResult {
    binary(interp, args, |a, b| checked(a.checked_sub(b), "subtraction"), |a, b| a - b)
}

fn mul(interp: &mut Interpreter, args: &[Slot]) -> EvalResult {
    binary(interp, args, |a, b| checked(a.checked_mul(b), "multiplication"), |a, b| a * b)
}

/// Integer division truncates toward zero. Real division follows IEEE 754.
fn div(interp: &mut Interpreter, args: &[Slot]) -> EvalResult {
    binary(
        interp,
        args,
        |a, b| {
            if b == 0 {
                Err(division_by_zero())
            } else {
                checked(a.checked_div(b), "division")
            }
        },
        |a, b| a / b,
    )
}

fn rem(interp: &mut Interpreter, args: &[Slot]) -> EvalResult {
    binary(
        interp,
        args,
        |a, b| {
            if b == 0 {
                Err(modulo_by_zero())
            } else {
                checked(a.checked_rem(b), "remainder")
            }
        },
        |a, b| a % b,
    )
}

fn min(interp: &mut Interpreter, args: &[Slot]) -> EvalResult {
    binary(interp, args, |a, b| Ok(a.min(b)), f64::min)
}

fn max(interp: &mut Interpreter, args: &[Slot]) -> EvalResult {
    binary(interp, args, |a, b| Ok(a.max(b)), f64::max)
}

fn neg(interp: &mut Interpreter, args: &[Slot]) -> EvalResult {
    let [a] = take(args)?;
    match Number::read(interp, a)? {
        Number::Int(n) => Number::Int(checked(n.checked_neg(), "negation")?),
        Number::Real(r) => Number::Real(-r),
    }
    .push(interp)
}

fn abs(interp: &mut Interpreter, args: &[Slot]) -> EvalResult {
    let [a] = take(args)?;
    match Number::read(interp, a)? {
        Number::Int(n) => Number::Int(checked(n.checked_abs(), "absolute value")?),
        Number::Real(r) => Number::Real(r.abs()),
    }
    .push(interp)
}

fn sqrt(interp: &mut Interpreter, args: &[Slot]) -> EvalResult {
    let [a] = take(args)?;
    let value = Number::read(interp, a)?.to_f64();
    Ok(interp.stack.push_real(value.sqrt())?)
}

fn to_real(interp: &mut Interpreter, args: &[Slot]) -> EvalResult {
    let [a] = take(args)?;
    let value = Number::read(interp, a)?.to_f64();
    Ok(interp.stack.push_real(value)?)
}

/// `Real -> Int` conversions. Results outside the `Int` range, and
/// non-finite inputs, are overflow errors.
fn rounding(interp: &mut Interpreter, args: &[Slot], op: fn(f64) -> f64) -> EvalResult {
    let [a] = take(args)?;
    let value = op(interp.stack.read_real(a)?);
    if !(-I64_BOUND..I64_BOUND).contains(&value) {
        return Err(integer_overflow("conversion to Int"));
    }
    Ok(interp.stack.push_int(value as i64)?)
}

fn floor(interp: &mut Interpreter, args: &[Slot]) -> EvalResult {
    rounding(interp, args, f64::floor)
}

fn ceil(interp: &mut Interpreter, args: &[Slot]) -> EvalResult {
    rounding(interp, args, f64::ceil)
}

fn round(interp: &mut Interpreter, args: &[Slot]) -> EvalResult {
    rounding(interp, args, f64::round)
}
