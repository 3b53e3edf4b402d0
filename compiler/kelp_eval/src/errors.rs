//! Evaluation errors.
//!
//! Every recoverable failure is an [`EvalError`]: a structured
//! [`EvalErrorKind`] plus the span of the innermost expression that failed
//! and, for failures inside interpreted calls, a backtrace. The factory
//! functions below are the only place error messages are spelled out.

use std::fmt;

use kelp_ir::Span;

use crate::value::{Shape, StackError};

/// Result of evaluating an expression: the slot of the pushed value.
pub type EvalResult<T = crate::Slot> = Result<T, EvalError>;

#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum EvalErrorKind {
    // Names and binding
    #[error("undefined symbol `{name}`")]
    UndefinedSymbol { name: String },
    #[error("`{name}` is already bound in this scope")]
    AlreadyBound { name: String },
    #[error("value does not match the pattern")]
    PatternMismatch,
    #[error("no case of `match` matched {value}")]
    NoMatchingArm { value: String },

    // Forms
    #[error("`do` needs at least one expression")]
    EmptyDo,
    #[error("program contains no expressions")]
    EmptyProgram,

    // Types and shapes
    #[error("type mismatch: expected {expected}, found {found}")]
    TypeMismatch { expected: String, found: String },
    #[error("heterogeneous array: {found} is not compatible with {expected}")]
    Heterogeneous { expected: Shape, found: Shape },
    #[error("cannot poke {found} into a slot holding {expected}")]
    ShapeMismatch { expected: Shape, found: Shape },
    #[error("cannot poke a {found}-byte value over a {expected}-byte value")]
    SizeMismatch { expected: usize, found: usize },

    // Calls
    #[error("{found} is not callable")]
    NotCallable { found: String },
    #[error("function expects {expected} argument{}, got {got}", plural(.expected))]
    ArityMismatch { expected: usize, got: usize },
    #[error("maximum call depth exceeded (limit: {depth})")]
    RecursionLimit { depth: usize },
    #[error("host function `{name}` failed: {message}")]
    Host { name: String, message: String },

    // Arithmetic
    #[error("division by zero")]
    DivisionByZero,
    #[error("modulo by zero")]
    ModuloByZero,
    #[error("integer overflow in {operation}")]
    IntegerOverflow { operation: &'static str },

    // Compounds
    #[error("index {index} out of bounds for length {length}")]
    IndexOutOfBounds { index: i64, length: usize },
    #[error("invalid slice {lo}..{hi} of length {length}")]
    BadSlice { lo: i64, hi: i64, length: usize },

    // Text
    #[error("format error: {message}")]
    Format { message: String },
    #[error("parse error: {message}")]
    Parse { message: String },

    #[error(transparent)]
    Stack(#[from] StackError),
}

/// One interpreted call active when an error was raised.
#[derive(Clone, Debug, PartialEq)]
pub struct BacktraceFrame {
    pub name: String,
    pub call_span: Option<Span>,
}

/// An evaluation failure.
#[derive(Clone, Debug, PartialEq)]
pub struct EvalError {
    pub kind: EvalErrorKind,
    /// Innermost expression that failed.
    pub span: Option<Span>,
    /// Calls in progress, innermost first. Empty at top level.
    pub backtrace: Vec<BacktraceFrame>,
}

impl fmt::Display for EvalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.kind)?;
        if let Some(span) = self.span {
            write!(f, " at {span}")?;
        }
        Ok(())
    }
}

impl std::error::Error for EvalError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match &self.kind {
            EvalErrorKind::Stack(err) => Some(err),
            _ => None,
        }
    }
}

impl EvalError {
    pub fn new(kind: EvalErrorKind) -> Self {
        EvalError {
            kind,
            span: None,
            backtrace: Vec::new(),
        }
    }

    /// Attach `span` unless a more precise one is already set.
    #[must_use]
    pub fn or_span(mut self, span: Span) -> Self {
        self.span.get_or_insert(span);
        self
    }

    /// Render the error with `line:col` resolved against `source`, plus the
    /// backtrace if there is one.
    pub fn render(&self, source: &str) -> String {
        let mut out = self.kind.to_string();
        if let Some(span) = self.span {
            let (line, col) = span.line_col(source);
            out.push_str(&format!(" at {line}:{col}"));
        }
        for frame in &self.backtrace {
            out.push_str("\n  in ");
            out.push_str(&frame.name);
            if let Some(span) = frame.call_span {
                let (line, col) = span.line_col(source);
                out.push_str(&format!(" called at {line}:{col}"));
            }
        }
        out
    }
}

impl From<EvalErrorKind> for EvalError {
    fn from(kind: EvalErrorKind) -> Self {
        EvalError::new(kind)
    }
}

/// Tag mismatches surface as type errors; everything else stays a stack error.
impl From<StackError> for EvalError {
    fn from(err: StackError) -> Self {
        match err {
            StackError::TagMismatch { expected, found } => type_mismatch(expected, found),
            other => EvalError::new(EvalErrorKind::Stack(other)),
        }
    }
}

// Factories

pub fn undefined_symbol(name: &str) -> EvalError {
    EvalErrorKind::UndefinedSymbol { name: name.into() }.into()
}

pub fn already_bound(name: &str) -> EvalError {
    EvalErrorKind::AlreadyBound { name: name.into() }.into()
}

pub fn pattern_mismatch() -> EvalError {
    EvalErrorKind::PatternMismatch.into()
}

pub fn no_matching_arm(value: String) -> EvalError {
    EvalErrorKind::NoMatchingArm { value }.into()
}

pub fn empty_do() -> EvalError {
    EvalErrorKind::EmptyDo.into()
}

pub fn empty_program() -> EvalError {
    EvalErrorKind::EmptyProgram.into()
}

pub fn type_mismatch(expected: impl Into<String>, found: impl Into<String>) -> EvalError {
    EvalErrorKind::TypeMismatch {
        expected: expected.into(),
        found: found.into(),
    }
    .into()
}

pub fn heterogeneous(expected: Shape, found: Shape) -> EvalError {
    EvalErrorKind::Heterogeneous { expected, found }.into()
}

pub fn shape_mismatch(expected: Shape, found: Shape) -> EvalError {
    EvalErrorKind::ShapeMismatch { expected, found }.into()
}

pub fn size_mismatch(expected: usize, found: usize) -> EvalError {
    EvalErrorKind::SizeMismatch { expected, found }.into()
}

pub fn not_callable(found: impl Into<String>) -> EvalError {
    EvalErrorKind::NotCallable {
        found: found.into(),
    }
    .into()
}

pub fn arity_mismatch(expected: usize, got: usize) -> EvalError {
    EvalErrorKind::ArityMismatch { expected, got }.into()
}

#[allow(clippy::trivially_copy_pass_by_ref, reason = "thiserror hands fields over by reference")]
fn plural(n: &usize) -> &'static str {
    if *n == 1 {
        ""
    } else {
        "s"
    }
}

pub fn recursion_limit(depth: usize) -> EvalError {
    EvalErrorKind::RecursionLimit { depth }.into()
}

pub fn host_error(name: &str, message: String) -> EvalError {
    EvalErrorKind::Host {
        name: name.into(),
        message,
    }
    .into()
}

pub fn division_by_zero() -> EvalError {
    EvalErrorKind::DivisionByZero.into()
}

pub fn modulo_by_zero() -> EvalError {
    EvalErrorKind::ModuloByZero.into()
}

pub fn integer_overflow(operation: &'static str) -> EvalError {
    EvalErrorKind::IntegerOverflow { operation }.into()
}

pub fn index_out_of_bounds(index: i64, length: usize) -> EvalError {
    EvalErrorKind::IndexOutOfBounds { index, length }.into()
}

pub fn bad_slice(lo: i64, hi: i64, length: usize) -> EvalError {
    EvalErrorKind::BadSlice { lo, hi, length }.into()
}

pub fn format_error(message: impl Into<String>) -> EvalError {
    EvalErrorKind::Format {
        message: message.into(),
    }
    .into()
}

pub fn parse_failure(message: impl Into<String>) -> EvalError {
    EvalErrorKind::Parse {
        message: message.into(),
    }
    .into()
}
