//! Text formatting and parsing.
//!
//! Strings are arrays of `Char`. The `parse` family reads a string with the
//! same reader the front end uses and accepts only literal trees, so a
//! string can never run code.

use kelp_ir::Expr;

use super::{expect_tag, take, Builtin};
use crate::errors::{format_error, parse_failure, type_mismatch, EvalResult};
use crate::value::{read_string, Tag};
use crate::{Interpreter, Slot};

pub(super) const BUILTINS: &[Builtin] = &[
    Builtin { name: "format", arity: 2, run: format },
    Builtin { name: "to_string", arity: 1, run: to_string },
    Builtin { name: "parse", arity: 1, run: parse },
    Builtin { name: "parse_bool", arity: 1, run: parse_bool },
    Builtin { name: "parse_char", arity: 1, run: parse_char },
    Builtin { name: "parse_int", arity: 1, run: parse_int },
    Builtin { name: "parse_real", arity: 1, run: parse_real },
];

/// Decode a string argument.
fn string_arg(interp: &Interpreter, slot: Slot) -> EvalResult<String> {
    match read_string(&interp.stack, slot)? {
        Some(text) => Ok(text),
        None => Err(type_mismatch("String", interp.render(slot)?)),
    }
}

/// `(format "x=%d" {x})`. Wildcards: `%b` Bool, `%c` Char, `%d` Int,
/// `%f` Real, `%s` String; `%%` is a literal `%`. The tuple must supply
/// exactly one argument per wildcard.
fn format(interp: &mut Interpreter, args: &[Slot]) -> EvalResult {
    let [template, values] = take(args)?;
    let template = string_arg(interp, template)?;
    expect_tag(interp, values, Tag::Tuple)?;
    let values = interp.stack.elements(values)?;
    let mut values = values.iter().copied();

    let mut out = String::with_capacity(template.len());
    let mut chars = template.chars();
    while let Some(c) = chars.next() {
        if c != '%' {
            out.push(c);
            continue;
        }
        let Some(spec) = chars.next() else {
            return Err(format_error("format string ends with `%`"));
        };
        if spec == '%' {
            out.push('%');
            continue;
        }
        let expected = match spec {
            'b' => Tag::Bool,
            'c' => Tag::Char,
            'd' => Tag::Int,
            'f' => Tag::Real,
            's' => Tag::Array,
            other => return Err(format_error(format!("unknown wildcard `%{other}`"))),
        };
        let Some(value) = values.next() else {
            return Err(format_error(format!("no argument for `%{spec}`")));
        };
        let found = interp.stack.tag(value)?;
        if found != expected {
            return Err(format_error(format!(
                "`%{spec}` expects {}, found {}",
                if spec == 's' { "String" } else { expected.name() },
                found.name()
            )));
        }
        let stack = &interp.stack;
        match spec {
            'b' => out.push_str(&stack.read_bool(value)?.to_string()),
            'c' => out.push(stack.read_char(value)?),
            'd' => out.push_str(&stack.read_int(value)?.to_string()),
            'f' => out.push_str(&stack.read_real(value)?.to_string()),
            _ => out.push_str(&string_arg(interp, value)?),
        }
    }
    let extra = values.count();
    if extra > 0 {
        return Err(format_error(format!("{extra} argument(s) left over")));
    }
    Ok(interp.stack.push_str(&out)?)
}

fn to_string(interp: &mut Interpreter, args: &[Slot]) -> EvalResult {
    let [value] = take(args)?;
    let text = interp.render(value)?;
    Ok(interp.stack.push_str(&text)?)
}

/// Read one literal tree from `text`.
fn read_literal(interp: &Interpreter, text: &str) -> Result<Expr, String> {
    let expr = kelp_parse::parse_expr(text, &interp.interner).map_err(|e| e.to_string())?;
    if expr.is_literal_tree() {
        Ok(expr)
    } else {
        Err(format!("`{}` is not a literal", text.trim()))
    }
}

/// `(parse s)` never fails on bad input: it yields `{true value}` or
/// `{false message}`.
fn parse(interp: &mut Interpreter, args: &[Slot]) -> EvalResult {
    let [source] = take(args)?;
    let text = string_arg(interp, source)?;
    let mark = interp.stack.top();
    let parsed = match read_literal(interp, &text) {
        Ok(expr) => {
            let pending = interp.stack.open(Tag::Tuple)?;
            interp.stack.push_bool(true)?;
            match interp.eval(&expr) {
                Ok(_) => return Ok(interp.stack.close_compound(pending, 2)?),
                Err(err) => {
                    interp.stack.truncate(mark);
                    err.kind.to_string()
                }
            }
        }
        Err(message) => message,
    };
    let pending = interp.stack.open(Tag::Tuple)?;
    interp.stack.push_bool(false)?;
    interp.stack.push_str(&parsed)?;
    Ok(interp.stack.close_compound(pending, 2)?)
}

/// Parse a literal of exactly type `expected`, failing loudly.
fn parse_as(interp: &mut Interpreter, args: &[Slot], expected: Tag) -> EvalResult {
    let [source] = take(args)?;
    let text = string_arg(interp, source)?;
    let expr = read_literal(interp, &text).map_err(parse_failure)?;
    let mut frame = interp.frame();
    let slot = frame.eval(&expr)?;
    let found = frame.stack.tag(slot)?;
    if found != expected {
        return Err(parse_failure(format!(
            "expected {}, found {} in {text:?}",
            expected.name(),
            found.name()
        )));
    }
    frame.keep(slot)
}

fn parse_bool(interp: &mut Interpreter, args: &[Slot]) -> EvalResult {
    parse_as(interp, args, Tag::Bool)
}

fn parse_char(interp: &mut Interpreter, args: &[Slot]) -> EvalResult {
    parse_as(interp, args, Tag::Char)
}

fn parse_int(interp: &mut Interpreter, args: &[Slot]) -> EvalResult {
    parse_as(interp, args, Tag::Int)
}

fn parse_real(interp: &mut Interpreter, args: &[Slot]) -> EvalResult {
    parse_as(interp, args, Tag::Real)
}
