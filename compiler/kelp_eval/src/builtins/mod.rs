//! Built-in function library.
//!
//! Every built-in is an ordinary native function value bound in the global
//! scope, so built-ins curry and pass around like interpreted functions.
//! Each receives exactly `arity` argument slots and pushes one result; the
//! caller's frame collapses the arguments afterwards.
//!
//! - `arith` - `+ - * / % min max neg abs sqrt to_real floor ceil round`
//! - `compare` - `= != < <= > >=`
//! - `logic` - `and or xor not`
//! - `compound` - `length push_front push_back cat at slice`
//! - `text` - `format to_string parse parse_bool parse_char parse_int parse_real`
//! - `output` - `print println`

mod arith;
mod compare;
mod compound;
mod logic;
mod output;
mod text;

use crate::closure::BuiltinFn;
use crate::errors::{arity_mismatch, type_mismatch, EvalResult};
use crate::value::Tag;
use crate::{Interpreter, Slot};

pub(crate) struct Builtin {
    pub name: &'static str,
    pub arity: usize,
    pub run: BuiltinFn,
}

/// Every built-in, in registration order.
pub(crate) fn all() -> impl Iterator<Item = &'static Builtin> {
    [
        arith::BUILTINS,
        compare::BUILTINS,
        logic::BUILTINS,
        compound::BUILTINS,
        text::BUILTINS,
        output::BUILTINS,
    ]
    .into_iter()
    .flatten()
}

/// Destructure the argument list of a fixed-arity built-in.
fn take<const N: usize>(args: &[Slot]) -> EvalResult<[Slot; N]> {
    args.try_into()
        .map_err(|_| arity_mismatch(N, args.len()))
}

/// Fail with a type mismatch unless the value at `slot` has tag `expected`.
fn expect_tag(interp: &Interpreter, slot: Slot, expected: Tag) -> EvalResult<()> {
    let found = interp.stack.tag(slot)?;
    if found == expected {
        Ok(())
    } else {
        Err(type_mismatch(expected.name(), found.name()))
    }
}

#[cfg(test)]
#[expect(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]
mod tests;
