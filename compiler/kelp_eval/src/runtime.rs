//! The embedding surface: configuration, top-level evaluation and host
//! functions.
//!
//! A [`Runtime`] owns one interpreter and its value stack. Top-level
//! statements run in the global scope. A statement that binds globals
//! leaves its value on the stack for good; any other result is a temporary
//! that stays readable until the next statement starts. A failed statement
//! leaves nothing behind: its bytes are truncated and any global bindings
//! it made are forgotten.

use std::fmt;
use std::rc::Rc;

use kelp_ir::{Expr, SharedInterner};
use kelp_parse::ParseError;

use crate::closure::NativeImpl;
use crate::errors::{empty_program, EvalError, EvalResult};
use crate::host::{read_host, HostValue};
use crate::print_handler::{stdout_handler, SharedPrintHandler};
use crate::symbols::ScopeId;
use crate::value::ValueStack;
use crate::{Interpreter, Slot};

#[derive(Clone)]
pub struct RuntimeConfig {
    /// Bytes preallocated for the value stack.
    pub initial_stack_capacity: usize,
    /// Hard cap on value stack size. Exceeding it is an evaluation error.
    pub max_stack_bytes: usize,
    /// Nesting limit for interpreted calls.
    pub max_call_depth: usize,
    pub print_handler: SharedPrintHandler,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        RuntimeConfig {
            initial_stack_capacity: 64 * 1024,
            max_stack_bytes: 64 * 1024 * 1024,
            max_call_depth: 10_000,
            print_handler: stdout_handler(),
        }
    }
}

impl RuntimeConfig {
    #[must_use]
    pub fn with_initial_stack_capacity(mut self, bytes: usize) -> Self {
        self.initial_stack_capacity = bytes;
        self
    }

    #[must_use]
    pub fn with_max_stack_bytes(mut self, bytes: usize) -> Self {
        self.max_stack_bytes = bytes;
        self
    }

    #[must_use]
    pub fn with_max_call_depth(mut self, depth: usize) -> Self {
        self.max_call_depth = depth;
        self
    }

    #[must_use]
    pub fn with_print_handler(mut self, handler: SharedPrintHandler) -> Self {
        self.print_handler = handler;
        self
    }
}

impl fmt::Debug for RuntimeConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RuntimeConfig")
            .field("initial_stack_capacity", &self.initial_stack_capacity)
            .field("max_stack_bytes", &self.max_stack_bytes)
            .field("max_call_depth", &self.max_call_depth)
            .finish_non_exhaustive()
    }
}

/// Failure of [`Runtime::run_source`].
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum RunError {
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error(transparent)]
    Eval(#[from] EvalError),
}

impl RunError {
    /// Render with `line:col` positions resolved against `source`.
    pub fn render(&self, source: &str) -> String {
        match self {
            RunError::Parse(err) => match err.span() {
                Some(span) => {
                    let (line, col) = span.line_col(source);
                    format!("{err} at {line}:{col}")
                }
                None => err.to_string(),
            },
            RunError::Eval(err) => err.render(source),
        }
    }
}

pub struct Runtime {
    interp: Interpreter,
    last_error: Option<EvalError>,
    /// Start of the previous statement's temporary result.
    pending: Option<usize>,
}

impl Runtime {
    /// A runtime with the default configuration.
    pub fn new() -> EvalResult<Self> {
        Self::with_config(RuntimeConfig::default())
    }

    pub fn with_config(config: RuntimeConfig) -> EvalResult<Self> {
        let interp = Interpreter::new(&config, SharedInterner::new())?;
        Ok(Runtime {
            interp,
            last_error: None,
            pending: None,
        })
    }

    pub fn interner(&self) -> &SharedInterner {
        self.interp.interner()
    }

    pub fn interpreter(&self) -> &Interpreter {
        &self.interp
    }

    /// Read `source` into top-level expressions.
    pub fn parse(&self, source: &str) -> Result<Vec<Expr>, ParseError> {
        kelp_parse::parse_program(source, self.interner())
    }

    fn discard_pending(&mut self) {
        if let Some(mark) = self.pending.take() {
            self.interp.stack.truncate(mark);
        }
    }

    /// Evaluate one top-level statement.
    #[tracing::instrument(level = "debug", skip_all, fields(span = ?expr.span))]
    pub fn evaluate_one(&mut self, expr: &Expr) -> EvalResult {
        self.last_error = None;
        self.discard_pending();
        let mark = self.interp.stack.top();
        let globals = self.interp.symbols.binding_count(ScopeId::GLOBAL);
        match self.interp.eval(expr) {
            Ok(slot) => {
                if self.interp.symbols.binding_count(ScopeId::GLOBAL) == globals {
                    self.pending = Some(mark);
                }
                Ok(slot)
            }
            Err(err) => {
                self.interp.stack.truncate(mark);
                self.interp.symbols.truncate(ScopeId::GLOBAL, globals);
                tracing::warn!(error = %err, "evaluation failed");
                self.last_error = Some(err.clone());
                Err(err)
            }
        }
    }

    /// Evaluate statements in order, stopping at the first failure. The
    /// result is the last statement's value.
    pub fn evaluate_program(&mut self, exprs: &[Expr]) -> EvalResult {
        let Some((last, init)) = exprs.split_last() else {
            let err = empty_program();
            self.last_error = Some(err.clone());
            return Err(err);
        };
        for expr in init {
            self.evaluate_one(expr)?;
        }
        self.evaluate_one(last)
    }

    /// Parse and evaluate a whole program.
    pub fn run_source(&mut self, source: &str) -> Result<Slot, RunError> {
        let exprs = self.parse(source)?;
        Ok(self.evaluate_program(&exprs)?)
    }

    /// Error from the most recent top-level evaluation, if it failed.
    pub fn last_error(&self) -> Option<&EvalError> {
        self.last_error.as_ref()
    }

    pub fn error_message(&self) -> Option<String> {
        self.last_error.as_ref().map(ToString::to_string)
    }

    /// Bind a host callback as a global function of `arity` arguments.
    pub fn register_host_fn<F>(&mut self, name: &str, arity: usize, callback: F) -> EvalResult<()>
    where
        F: Fn(&[HostValue]) -> Result<HostValue, String> + 'static,
    {
        self.discard_pending();
        let name = self.interp.interner.intern(name);
        self.interp
            .define_native(name, arity, NativeImpl::Host(Rc::new(callback)))
    }

    /// Slot bound to a global name.
    pub fn global(&self, name: &str) -> Option<Slot> {
        let name = self.interner().intern(name);
        self.interp
            .symbols
            .find(ScopeId::GLOBAL, name)
            .map(|binding| binding.slot)
    }

    /// Decode a value for the host.
    pub fn value(&self, slot: Slot) -> EvalResult<HostValue> {
        Ok(read_host(&self.interp.stack, slot)?)
    }

    /// Source form of a value.
    pub fn display(&self, slot: Slot) -> EvalResult<String> {
        self.interp.render(slot)
    }

    /// Bytes in use on the value stack.
    pub fn stack_top(&self) -> usize {
        self.interp.stack.top()
    }

    pub fn stack(&self) -> &ValueStack {
        &self.interp.stack
    }

    pub fn print_handler(&self) -> &SharedPrintHandler {
        self.interp.print_handler()
    }
}

impl fmt::Debug for Runtime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Runtime")
            .field("stack_top", &self.stack_top())
            .field("last_error", &self.last_error)
            .finish_non_exhaustive()
    }
}
