//! Sequencing, binding, matching, conditionals and loops.

use kelp_ir::{Expr, MatchArm, Pattern};

use crate::binder::BindError;
use crate::errors::{empty_do, no_matching_arm, EvalError, EvalResult};
use crate::Interpreter;

impl Interpreter {
    /// `(do e ...)`: evaluate in a child scope. A step's value is dropped
    /// right away unless the step bound a name (then the binding still
    /// refers to it); the last value becomes the result.
    pub(crate) fn eval_do(&mut self, items: &[Expr]) -> EvalResult {
        let Some((last, init)) = items.split_last() else {
            return Err(empty_do());
        };
        let mut frame = self.frame();
        let result = {
            let mut scoped = frame.scoped();
            for item in init {
                let bound = scoped.symbols.binding_count(scoped.scope);
                let slot = scoped.eval(item)?;
                if scoped.symbols.binding_count(scoped.scope) == bound {
                    scoped.stack.truncate(slot.offset());
                }
            }
            scoped.eval(last)?
        };
        frame.keep(result)
    }

    /// `(bind pattern e)`: the value of `e` stays where it is and becomes
    /// both the binding's storage and the expression's result.
    pub(crate) fn eval_bind(&mut self, pattern: &Pattern, value: &Expr) -> EvalResult {
        let mut frame = self.frame();
        let slot = frame.eval(value)?;
        if let Err(err) = frame.bind_pattern(pattern, slot) {
            return Err(frame.bind_error(err).or_span(pattern.span));
        }
        frame.commit();
        Ok(slot)
    }

    /// `(match e (pattern body) ...)`: first arm whose pattern matches wins.
    pub(crate) fn eval_match(&mut self, subject: &Expr, arms: &[MatchArm]) -> EvalResult {
        let mut frame = self.frame();
        let value = frame.eval(subject)?;
        for arm in arms {
            let result = {
                let mut scoped = frame.scoped();
                match scoped.bind_pattern(&arm.pattern, value) {
                    Ok(()) => scoped.eval(&arm.body)?,
                    Err(BindError::Mismatch) => continue,
                    Err(err) => return Err(scoped.bind_error(err).or_span(arm.pattern.span)),
                }
            };
            return frame.keep(result);
        }
        let rendered = frame.render(value)?;
        Err(no_matching_arm(rendered))
    }

    /// `(if c then else?)`. Branches run in the current scope.
    pub(crate) fn eval_if(
        &mut self,
        cond: &Expr,
        then_branch: &Expr,
        else_branch: Option<&Expr>,
    ) -> EvalResult {
        if self.eval_condition(cond)? {
            self.eval(then_branch)
        } else if let Some(else_branch) = else_branch {
            self.eval(else_branch)
        } else {
            Ok(self.stack.push_unit()?)
        }
    }

    /// `(while c body)`: the body gets a fresh scope each iteration and its
    /// value is discarded. The loop itself yields `()`.
    pub(crate) fn eval_while(&mut self, cond: &Expr, body: &Expr) -> EvalResult {
        while self.eval_condition(cond)? {
            let mut frame = self.frame();
            let mut scoped = frame.scoped();
            scoped.eval(body)?;
        }
        Ok(self.stack.push_unit()?)
    }

    /// `(and e ...)` / `(or e ...)`: stop at the first operand equal to
    /// `breaks_on`.
    pub(crate) fn eval_short_circuit(&mut self, items: &[Expr], breaks_on: bool) -> EvalResult {
        for item in items {
            if self.eval_condition(item)? == breaks_on {
                return Ok(self.stack.push_bool(breaks_on)?);
            }
        }
        Ok(self.stack.push_bool(!breaks_on)?)
    }

    /// Evaluate a `Bool` operand and pop it.
    pub(crate) fn eval_condition(&mut self, expr: &Expr) -> EvalResult<bool> {
        let mut frame = self.frame();
        let slot = frame.eval(expr)?;
        frame
            .stack
            .read_bool(slot)
            .map_err(|e| EvalError::from(e).or_span(expr.span))
    }
}
