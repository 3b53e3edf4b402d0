//! Console output through the runtime's print handler.

use super::{take, Builtin};
use crate::errors::EvalResult;
use crate::value::read_string;
use crate::{Interpreter, Slot};

pub(super) const BUILTINS: &[Builtin] = &[
    Builtin { name: "print", arity: 1, run: print },
    Builtin { name: "println", arity: 1, run: println },
];

/// Strings print raw; anything else prints in source form.
fn text_of(interp: &Interpreter, slot: Slot) -> EvalResult<String> {
    match read_string(&interp.stack, slot)? {
        Some(text) => Ok(text),
        None => interp.render(slot),
    }
}

fn print(interp: &mut Interpreter, args: &[Slot]) -> EvalResult {
    let [value] = take(args)?;
    let text = text_of(interp, value)?;
    interp.print_handler.print(&text);
    Ok(interp.stack.push_unit()?)
}

fn println(interp: &mut Interpreter, args: &[Slot]) -> EvalResult {
    let [value] = take(args)?;
    let text = text_of(interp, value)?;
    interp.print_handler.println(&text);
    Ok(interp.stack.push_unit()?)
}
