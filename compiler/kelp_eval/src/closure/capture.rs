//! Free-name analysis for function bodies.
//!
//! Walks a body with the generic [`Visitor`] while tracking the names bound
//! at each point, mirroring the scopes the evaluator will open: parameters,
//! `do` blocks, `match` arms, `while` bodies and nested functions each open
//! a level, and `bind` adds its names after its value is visited. Any name
//! used while not bound at some level is free.

use rustc_hash::FxHashSet;

use kelp_ir::visitor::{walk_expr, Visitor};
use kelp_ir::{Expr, ExprKind, FuncDef, MatchArm, Name, Pattern};

/// Free names of `def`'s body, each once, in order of first use.
pub(crate) fn free_names(def: &FuncDef) -> Vec<Name> {
    let mut finder = FreeNames::default();
    finder.visit_func(def);
    finder.free
}

#[derive(Default)]
struct FreeNames {
    levels: Vec<FxHashSet<Name>>,
    seen: FxHashSet<Name>,
    free: Vec<Name>,
}

impl FreeNames {
    fn is_bound(&self, name: Name) -> bool {
        self.levels.iter().any(|level| level.contains(&name))
    }

    fn bind(&mut self, pattern: &Pattern) {
        if let Some(level) = self.levels.last_mut() {
            level.extend(pattern.bound_names());
        }
    }

    fn with_level<'ast>(&mut self, names: impl IntoIterator<Item = Name>, body: &'ast Expr) {
        self.levels.push(names.into_iter().collect());
        self.visit_expr(body);
        self.levels.pop();
    }
}

impl<'ast> Visitor<'ast> for FreeNames {
    fn visit_expr(&mut self, expr: &'ast Expr) {
        kelp_stack::ensure_sufficient_stack(|| match &expr.kind {
            ExprKind::Do(items) => {
                self.levels.push(FxHashSet::default());
                for item in items {
                    self.visit_expr(item);
                }
                self.levels.pop();
            }
            ExprKind::Bind { pattern, value } => {
                self.visit_expr(value);
                self.bind(pattern);
            }
            ExprKind::While { cond, body } => {
                self.visit_expr(cond);
                self.with_level(Vec::new(), body);
            }
            _ => walk_expr(self, expr),
        });
    }

    fn visit_name_use(&mut self, name: Name, _expr: &'ast Expr) {
        if !self.is_bound(name) && self.seen.insert(name) {
            self.free.push(name);
        }
    }

    fn visit_match_arm(&mut self, arm: &'ast MatchArm) {
        self.with_level(arm.pattern.bound_names(), &arm.body);
    }

    fn visit_func(&mut self, func: &'ast FuncDef) {
        let params = func.params.iter().flat_map(Pattern::bound_names);
        self.with_level(params.collect::<Vec<_>>(), &func.body);
    }
}

#[cfg(test)]
#[expect(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]
mod tests;
