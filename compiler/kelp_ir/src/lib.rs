//! Kelp IR - the immutable syntax tree shared by the reader and the evaluator.
//!
//! The front end produces [`Expr`] trees; the evaluator walks them without
//! ever mutating them. Function definitions are reference counted
//! ([`FuncDef`] behind `Rc`) so a function value can keep pointing at its
//! definition after the tree that produced it has been dropped by the host.

pub mod ast;
mod interner;
mod name;
mod span;
pub mod visitor;

pub use ast::{
    Expr, ExprKind, FuncDef, Literal, MatchArm, Pattern, PatternKind, TypeGuard,
};
pub use interner::{SharedInterner, StringInterner};
pub use name::Name;
pub use span::Span;
pub use visitor::Visitor;
