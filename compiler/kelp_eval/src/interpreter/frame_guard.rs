//! RAII guard for stack temporaries.
//!
//! A [`FrameGuard`] remembers the stack top when it is created. Dropping it
//! truncates the stack back to that mark, so every `?` between creation and
//! success discards whatever the failed step had pushed. On success the
//! caller either [`keep`](FrameGuard::keep)s one result, which slides down
//! to the mark and takes the place of everything pushed since, or
//! [`commit`](FrameGuard::commit)s when the pushed bytes already form the
//! result.
//!
//! Truncating or keeping also forgets any binding made in the frame's scope
//! since it opened, because its storage is gone. `(+ (bind y 1) 0)` leaves
//! `y` unbound rather than bound to a collapsed slot.
//!
//! The guard derefs to the [`Interpreter`], so evaluation goes through it:
//!
//! ```text
//! let mut frame = self.frame();
//! let callee = frame.eval(callee)?;
//! let arg = frame.eval(arg)?;
//! let result = frame.apply(callee, &[arg], site)?;
//! frame.keep(result)
//! ```

use std::ops::{Deref, DerefMut};

use super::Interpreter;
use crate::errors::EvalResult;
use crate::symbols::ScopeId;
use crate::Slot;

pub(crate) struct FrameGuard<'a> {
    interpreter: &'a mut Interpreter,
    mark: usize,
    scope: ScopeId,
    bindings: usize,
    armed: bool,
}

impl Drop for FrameGuard<'_> {
    fn drop(&mut self) {
        if self.armed {
            self.interpreter.stack.truncate(self.mark);
            self.forget_bindings();
        }
    }
}

impl Deref for FrameGuard<'_> {
    type Target = Interpreter;

    fn deref(&self) -> &Self::Target {
        self.interpreter
    }
}

impl DerefMut for FrameGuard<'_> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.interpreter
    }
}

impl FrameGuard<'_> {
    /// Collapse everything pushed since the mark except `result`, which
    /// moves down to the mark.
    pub(crate) fn keep(mut self, result: Slot) -> EvalResult {
        let kept = self.interpreter.stack.keep(self.mark, result)?;
        self.forget_bindings();
        self.armed = false;
        Ok(kept)
    }

    /// Leave everything pushed since the mark in place.
    pub(crate) fn commit(mut self) {
        self.armed = false;
    }

    fn forget_bindings(&mut self) {
        self.interpreter.symbols.truncate(self.scope, self.bindings);
    }
}

impl Interpreter {
    /// Open a temporary frame at the current stack top.
    pub(crate) fn frame(&mut self) -> FrameGuard<'_> {
        let mark = self.stack.top();
        let scope = self.scope;
        let bindings = self.symbols.binding_count(scope);
        FrameGuard {
            interpreter: self,
            mark,
            scope,
            bindings,
            armed: true,
        }
    }
}
