//! Syntax tree for Kelp source.
//!
//! The tree is closed: every construct the evaluator understands is a
//! variant of [`ExprKind`], and [`crate::visitor::walk_expr`] matches on it
//! exhaustively, so a new node kind cannot be added without deciding how
//! traversals (capture analysis in particular) see its children.

use std::rc::Rc;

use crate::{Name, Span};

/// An expression with its source location.
#[derive(Clone, Debug, PartialEq)]
pub struct Expr {
    pub kind: ExprKind,
    pub span: Span,
}

impl Expr {
    pub fn new(kind: ExprKind, span: Span) -> Self {
        Expr { kind, span }
    }

    /// Whether this expression is a literal tree (atoms, strings, and
    /// compound literals whose elements are themselves literal trees).
    pub fn is_literal_tree(&self) -> bool {
        match &self.kind {
            ExprKind::Unit
            | ExprKind::Bool(_)
            | ExprKind::Char(_)
            | ExprKind::Int(_)
            | ExprKind::Real(_)
            | ExprKind::Str(_) => true,
            ExprKind::Array(items) | ExprKind::Tuple(items) => {
                items.iter().all(Expr::is_literal_tree)
            }
            _ => false,
        }
    }
}

/// Expression kinds.
#[derive(Clone, Debug, PartialEq)]
pub enum ExprKind {
    // Literals
    /// `()`
    Unit,
    Bool(bool),
    Char(char),
    Int(i64),
    Real(f64),
    /// String literal; evaluates to an array of `Char`.
    Str(String),
    /// `[e ...]`
    Array(Vec<Expr>),
    /// `{e ...}`
    Tuple(Vec<Expr>),

    /// Variable reference.
    Symbol(Name),

    // Control
    /// `(do e ...)`
    Do(Vec<Expr>),
    /// `(bind pattern value)`
    Bind {
        pattern: Pattern,
        value: Box<Expr>,
    },
    /// `(match subject (pattern body) ...)`
    Match {
        subject: Box<Expr>,
        arms: Vec<MatchArm>,
    },
    /// `(if cond then else?)`
    If {
        cond: Box<Expr>,
        then_branch: Box<Expr>,
        else_branch: Option<Box<Expr>>,
    },
    /// `(while cond body)`
    While {
        cond: Box<Expr>,
        body: Box<Expr>,
    },
    /// Short-circuit `(and e ...)`.
    And(Vec<Expr>),
    /// Short-circuit `(or e ...)`.
    Or(Vec<Expr>),

    // References
    /// `(ref name)`
    Ref(Name),
    /// `(peek r)`
    Peek(Box<Expr>),
    /// `(poke r value)`
    Poke {
        target: Box<Expr>,
        value: Box<Expr>,
    },
    /// `(begin name)`
    Begin(Name),
    /// `(end name)`
    End(Name),
    /// `(inc rr)`
    Inc(Box<Expr>),
    /// `(succ r)`
    Succ(Box<Expr>),

    // Functions
    /// `(func (params ...) body ...)`
    Func(Rc<FuncDef>),
    /// `(callee args ...)`
    Call {
        callee: Box<Expr>,
        args: Vec<Expr>,
    },
}

/// A function definition. Shared so function values can outlive the tree.
#[derive(Clone, Debug, PartialEq)]
pub struct FuncDef {
    pub params: Vec<Pattern>,
    pub body: Expr,
    pub span: Span,
}

impl FuncDef {
    pub fn arity(&self) -> usize {
        self.params.len()
    }
}

/// One `(pattern body)` case of a `match`.
#[derive(Clone, Debug, PartialEq)]
pub struct MatchArm {
    pub pattern: Pattern,
    pub body: Expr,
    pub span: Span,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Pattern {
    pub kind: PatternKind,
    pub span: Span,
}

impl Pattern {
    pub fn new(kind: PatternKind, span: Span) -> Self {
        Pattern { kind, span }
    }

    /// Names this pattern binds, left to right.
    pub fn bound_names(&self) -> Vec<Name> {
        let mut names = Vec::new();
        self.collect_names(&mut names);
        names
    }

    fn collect_names(&self, out: &mut Vec<Name>) {
        match &self.kind {
            PatternKind::Bind(name) => out.push(*name),
            PatternKind::Guard {
                bind: Some(name), ..
            } => out.push(*name),
            PatternKind::Array(items) | PatternKind::Tuple(items) => {
                for item in items {
                    item.collect_names(out);
                }
            }
            PatternKind::Wildcard | PatternKind::Literal(_) | PatternKind::Guard { .. } => {}
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum PatternKind {
    /// `_`
    Wildcard,
    /// A bare symbol.
    Bind(Name),
    /// An atom or string compared for equality.
    Literal(Literal),
    /// `[p ...]`
    Array(Vec<Pattern>),
    /// `{p ...}`
    Tuple(Vec<Pattern>),
    /// `(: T)` or `(: T name)`
    Guard {
        ty: TypeGuard,
        bind: Option<Name>,
    },
}

/// Literal atoms usable in patterns.
#[derive(Clone, Debug, PartialEq)]
pub enum Literal {
    Unit,
    Bool(bool),
    Char(char),
    Int(i64),
    Real(f64),
    Str(String),
}

/// Datatype named by a guard pattern.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TypeGuard {
    Unit,
    Bool,
    Char,
    Int,
    Real,
    Tuple,
    Func,
    /// `Array` (any element) or `(Array T)`.
    Array(Option<Box<TypeGuard>>),
    /// `Ref` (any target) or `(Ref T)`.
    Ref(Option<Box<TypeGuard>>),
}

impl TypeGuard {
    /// `String` is sugar for `(Array Char)`.
    pub fn string() -> Self {
        TypeGuard::Array(Some(Box::new(TypeGuard::Char)))
    }
}
