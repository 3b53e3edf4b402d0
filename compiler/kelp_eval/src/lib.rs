//! Kelp evaluator.
//!
//! Every value lives in one byte-encoded stack ([`ValueStack`]) and is
//! addressed through generation-checked [`Slot`]s. The evaluator walks the
//! AST from `kelp_ir`, pushing exactly one value per expression and
//! collapsing its temporaries as it goes.
//!
//! # Architecture
//!
//! - `value`: the stack, the byte encoding, shapes, equality and rendering
//! - `symbols`: the scope chain mapping names to slots
//! - `binder`: pattern matching and binding
//! - `closure`: function values, capture analysis, the native table
//! - `interpreter`: the evaluator proper
//! - `builtins`: the built-in function library
//! - `host`: marshalling for host callbacks
//! - `runtime`: the embedding entry point, [`Runtime`]

mod binder;
mod builtins;
mod closure;
mod diagnostics;
pub mod errors;
mod host;
pub mod interpreter;
mod print_handler;
mod runtime;
pub mod symbols;
pub mod value;

pub use binder::BindError;
pub use closure::{FunctionKind, HostFn, NativeImpl};
pub use errors::{BacktraceFrame, EvalError, EvalErrorKind, EvalResult};
pub use host::{push_host, read_host, HostValue};
pub use interpreter::{Interpreter, ScopedInterpreter};
pub use print_handler::{
    buffer_handler, silent_handler, stdout_handler, PrintHandlerImpl, SharedPrintHandler,
};
pub use runtime::{RunError, Runtime, RuntimeConfig};
pub use symbols::{Binding, ScopeId, SymbolTable};
pub use value::{Shape, Slot, StackError, Tag, ValueStack};

#[cfg(test)]
#[expect(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]
mod tests;
