//! AST visitor.
//!
//! Default `visit_*` methods call the matching `walk_*` function, which
//! visits every child in evaluation order. Override a `visit_*` method to
//! observe a node, and call the `walk_*` function from it to keep
//! descending.
//!
//! ```text
//! struct CountCalls(usize);
//!
//! impl<'ast> Visitor<'ast> for CountCalls {
//!     fn visit_expr(&mut self, expr: &'ast Expr) {
//!         if matches!(expr.kind, ExprKind::Call { .. }) {
//!             self.0 += 1;
//!         }
//!         walk_expr(self, expr);
//!     }
//! }
//! ```

use crate::ast::{Expr, ExprKind, FuncDef, MatchArm, Pattern, PatternKind};
use crate::Name;

pub trait Visitor<'ast> {
    fn visit_expr(&mut self, expr: &'ast Expr) {
        walk_expr(self, expr);
    }

    /// A name read by the expression (`x`, `(ref x)`, `(begin x)`, `(end x)`).
    fn visit_name_use(&mut self, name: Name, expr: &'ast Expr) {
        let _ = (name, expr);
    }

    fn visit_pattern(&mut self, pattern: &'ast Pattern) {
        walk_pattern(self, pattern);
    }

    fn visit_match_arm(&mut self, arm: &'ast MatchArm) {
        walk_match_arm(self, arm);
    }

    fn visit_func(&mut self, func: &'ast FuncDef) {
        walk_func(self, func);
    }
}

pub fn walk_expr<'ast, V: Visitor<'ast> + ?Sized>(visitor: &mut V, expr: &'ast Expr) {
    match &expr.kind {
        ExprKind::Unit
        | ExprKind::Bool(_)
        | ExprKind::Char(_)
        | ExprKind::Int(_)
        | ExprKind::Real(_)
        | ExprKind::Str(_) => {}
        ExprKind::Symbol(name)
        | ExprKind::Ref(name)
        | ExprKind::Begin(name)
        | ExprKind::End(name) => visitor.visit_name_use(*name, expr),
        ExprKind::Array(items)
        | ExprKind::Tuple(items)
        | ExprKind::Do(items)
        | ExprKind::And(items)
        | ExprKind::Or(items) => {
            for item in items {
                visitor.visit_expr(item);
            }
        }
        ExprKind::Bind { pattern, value } => {
            visitor.visit_expr(value);
            visitor.visit_pattern(pattern);
        }
        ExprKind::Match { subject, arms } => {
            visitor.visit_expr(subject);
            for arm in arms {
                visitor.visit_match_arm(arm);
            }
        }
        ExprKind::If {
            cond,
            then_branch,
            else_branch,
        } => {
            visitor.visit_expr(cond);
            visitor.visit_expr(then_branch);
            if let Some(else_branch) = else_branch {
                visitor.visit_expr(else_branch);
            }
        }
        ExprKind::While { cond, body } => {
            visitor.visit_expr(cond);
            visitor.visit_expr(body);
        }
        ExprKind::Peek(inner) | ExprKind::Inc(inner) | ExprKind::Succ(inner) => {
            visitor.visit_expr(inner);
        }
        ExprKind::Poke { target, value } => {
            visitor.visit_expr(target);
            visitor.visit_expr(value);
        }
        ExprKind::Func(func) => visitor.visit_func(func),
        ExprKind::Call { callee, args } => {
            visitor.visit_expr(callee);
            for arg in args {
                visitor.visit_expr(arg);
            }
        }
    }
}

pub fn walk_pattern<'ast, V: Visitor<'ast> + ?Sized>(visitor: &mut V, pattern: &'ast Pattern) {
    match &pattern.kind {
        PatternKind::Array(items) | PatternKind::Tuple(items) => {
            for item in items {
                visitor.visit_pattern(item);
            }
        }
        PatternKind::Wildcard
        | PatternKind::Bind(_)
        | PatternKind::Literal(_)
        | PatternKind::Guard { .. } => {}
    }
}

pub fn walk_match_arm<'ast, V: Visitor<'ast> + ?Sized>(visitor: &mut V, arm: &'ast MatchArm) {
    visitor.visit_pattern(&arm.pattern);
    visitor.visit_expr(&arm.body);
}

pub fn walk_func<'ast, V: Visitor<'ast> + ?Sized>(visitor: &mut V, func: &'ast FuncDef) {
    for param in &func.params {
        visitor.visit_pattern(param);
    }
    visitor.visit_expr(&func.body);
}
