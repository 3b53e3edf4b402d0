//! Function calls: argument evaluation, currying and dispatch.

use smallvec::SmallVec;

use kelp_ir::{Expr, ExprKind, Name, Pattern, Span};

use super::Interpreter;
use crate::closure::{push_function, FunctionKind, FunctionView, NativeImpl};
use crate::diagnostics::CallFrame;
use crate::errors::{arity_mismatch, host_error, not_callable, EvalResult};
use crate::host::{push_host, read_host};
use crate::symbols::ScopeId;
use crate::value::Tag;
use crate::Slot;

/// Where a call was made, for backtraces.
#[derive(Copy, Clone, Debug)]
pub(crate) struct CallSite {
    /// Callee symbol, when the head of the call was a plain name.
    pub label: Option<Name>,
    pub span: Span,
}

impl Interpreter {
    /// `(f a ...)`: evaluate the head, then the arguments left to right,
    /// then apply. Callee and arguments are temporaries of the call.
    pub(crate) fn eval_call(&mut self, callee: &Expr, args: &[Expr], span: Span) -> EvalResult {
        let mut frame = self.frame();
        let function = frame.eval(callee)?;
        let mut slots: SmallVec<[Slot; 4]> = SmallVec::with_capacity(args.len());
        for arg in args {
            slots.push(frame.eval(arg)?);
        }
        let label = match callee.kind {
            ExprKind::Symbol(name) => Some(name),
            _ => None,
        };
        let result = frame.apply(function, &slots, CallSite { label, span })?;
        frame.keep(result)
    }

    /// Apply the function at `function` to `args`, pushing the result.
    ///
    /// With fewer arguments than the function still needs, the result is a
    /// new function value holding the old applied arguments followed by
    /// `args`. The function value and the arguments are left in place.
    #[tracing::instrument(level = "debug", skip_all, fields(args = args.len()))]
    pub(crate) fn apply(&mut self, function: Slot, args: &[Slot], site: CallSite) -> EvalResult {
        let tag = self.stack.tag(function)?;
        if tag != Tag::Function {
            return Err(not_callable(tag.name()));
        }
        let view = FunctionView::decode(&self.stack, function)?;
        let arity = view.header.arity;
        let remaining = view.remaining();
        if args.len() > remaining {
            return Err(arity_mismatch(arity, view.applied.len() + args.len()));
        }

        let mut all: SmallVec<[Slot; 4]> = view.applied.clone();
        all.extend_from_slice(args);

        if args.len() < remaining {
            tracing::debug!(arity, supplied = all.len(), "curried application");
            return Ok(push_function(
                &mut self.stack,
                &view.header,
                &view.captures,
                &all,
            )?);
        }

        match view.header.kind {
            FunctionKind::Interpreted => self.call_interpreted(&view, &all, site),
            FunctionKind::Native => self.call_native(view.header.target, &all),
        }
    }

    /// Run an interpreted body in a fresh scope chained to the globals,
    /// with captures and then parameters bound.
    fn call_interpreted(&mut self, view: &FunctionView, args: &[Slot], site: CallSite) -> EvalResult {
        let Some(def) = self.functions.get(view.header.target).cloned() else {
            return Err(not_callable("unknown function"));
        };
        self.call_stack.push(CallFrame {
            label: site.label,
            call_span: Some(site.span),
        })?;
        let result = {
            let mut scoped = self.scoped_from(ScopeId::GLOBAL);
            scoped
                .bind_call(view, &def.params, args, def.span)
                .and_then(|()| scoped.eval(&def.body))
        };
        let result = result.map_err(|err| self.call_stack.attach_backtrace(err, &self.interner));
        self.call_stack.pop();
        result
    }

    fn bind_call(
        &mut self,
        view: &FunctionView,
        params: &[Pattern],
        args: &[Slot],
        span: Span,
    ) -> EvalResult<()> {
        for &(name, slot) in &view.captures {
            self.define(name, slot, span)
                .map_err(|err| self.bind_error(err).or_span(span))?;
        }
        for (param, &arg) in params.iter().zip(args) {
            self.bind_pattern(param, arg)
                .map_err(|err| self.bind_error(err).or_span(param.span))?;
        }
        Ok(())
    }

    /// Invoke a built-in or host function with exactly `arity` arguments.
    fn call_native(&mut self, target: u32, args: &[Slot]) -> EvalResult {
        let Some(entry) = self.natives.get(target) else {
            return Err(not_callable("unknown native"));
        };
        let (name, imp) = (entry.name, entry.imp.clone());
        if args.len() != entry.arity {
            return Err(arity_mismatch(entry.arity, args.len()));
        }
        match imp {
            NativeImpl::Builtin(run) => run(self, args),
            NativeImpl::Host(callback) => {
                let values = args
                    .iter()
                    .map(|&slot| read_host(&self.stack, slot))
                    .collect::<Result<Vec<_>, _>>()?;
                let name = self.interner.lookup(name);
                tracing::debug!(name, args = values.len(), "host call");
                let value = callback(&values).map_err(|message| host_error(name, message))?;
                push_host(&mut self.stack, &value)
            }
        }
    }
}
