//! RAII guard for symbol-table scopes.
//!
//! [`ScopedInterpreter`] opens a scope on creation and closes it on drop,
//! restoring the scope that was current before. Like the frame guard it
//! derefs to the [`Interpreter`], so the two nest:
//!
//! ```text
//! let mut frame = self.frame();
//! let result = {
//!     let mut scoped = frame.scoped();
//!     scoped.bind_pattern(pattern, value)?;
//!     scoped.eval(body)?
//! }; // scope closed here
//! frame.keep(result)
//! ```

use std::ops::{Deref, DerefMut};

use super::Interpreter;
use crate::symbols::ScopeId;

pub struct ScopedInterpreter<'a> {
    interpreter: &'a mut Interpreter,
    saved: ScopeId,
    scope: ScopeId,
}

impl Drop for ScopedInterpreter<'_> {
    fn drop(&mut self) {
        self.interpreter.symbols.pop(self.scope);
        self.interpreter.scope = self.saved;
    }
}

impl Deref for ScopedInterpreter<'_> {
    type Target = Interpreter;

    fn deref(&self) -> &Self::Target {
        self.interpreter
    }
}

impl DerefMut for ScopedInterpreter<'_> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.interpreter
    }
}

impl Interpreter {
    /// Open a child of the current scope.
    pub fn scoped(&mut self) -> ScopedInterpreter<'_> {
        let parent = self.scope;
        self.scoped_from(parent)
    }

    /// Open a scope chained to `parent` instead of the current scope.
    /// Calls use this with the global scope, so callees never see their
    /// caller's locals.
    pub fn scoped_from(&mut self, parent: ScopeId) -> ScopedInterpreter<'_> {
        let saved = self.scope;
        let scope = self.symbols.push(parent);
        self.scope = scope;
        ScopedInterpreter {
            interpreter: self,
            saved,
            scope,
        }
    }
}
