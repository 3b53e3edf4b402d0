//! Scope chain mapping names to stack slots.
//!
//! Scopes live in an arena indexed by [`ScopeId`] and are strictly LIFO:
//! the evaluator pushes one when it enters a block, arm, loop body or call
//! and pops it on the way out. Each scope names its parent; the chain
//! always ends at [`ScopeId::GLOBAL`]. Bindings only point at stack
//! values, so popping a scope never touches the stack.

use rustc_hash::FxHashMap;

use kelp_ir::{Name, Span};

use crate::Slot;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct ScopeId(u32);

impl ScopeId {
    pub const GLOBAL: ScopeId = ScopeId(0);

    #[inline]
    fn index(self) -> usize {
        self.0 as usize
    }
}

/// Where a name is bound.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Binding {
    pub slot: Slot,
    /// Source location of the binding pattern.
    pub span: Span,
}

#[derive(Debug, Default)]
struct Scope {
    parent: Option<ScopeId>,
    bindings: FxHashMap<Name, Binding>,
    /// Insertion order, so recent bindings can be rolled back.
    order: Vec<Name>,
}

#[derive(Debug)]
pub struct SymbolTable {
    scopes: Vec<Scope>,
}

impl SymbolTable {
    /// A table holding only the global scope.
    pub fn new() -> Self {
        SymbolTable {
            scopes: vec![Scope::default()],
        }
    }

    /// Open a scope whose lookups fall back to `parent`.
    pub fn push(&mut self, parent: ScopeId) -> ScopeId {
        let id = ScopeId(self.scopes.len() as u32);
        self.scopes.push(Scope {
            parent: Some(parent),
            ..Scope::default()
        });
        id
    }

    /// Close `id` and every scope opened after it. The global scope is
    /// never closed.
    pub fn pop(&mut self, id: ScopeId) {
        debug_assert_eq!(id.index() + 1, self.scopes.len(), "scopes must close in LIFO order");
        self.scopes.truncate(id.index().max(1));
    }

    #[inline]
    pub fn is_global(&self, id: ScopeId) -> bool {
        id == ScopeId::GLOBAL
    }

    /// Number of open scopes, the global one included.
    pub fn depth(&self) -> usize {
        self.scopes.len()
    }

    /// Bind `name` in `scope`. Fails with the existing binding if the name
    /// is already bound in that same scope; shadowing a parent is fine.
    pub fn insert(&mut self, scope: ScopeId, name: Name, binding: Binding) -> Result<(), Binding> {
        let Some(data) = self.scopes.get_mut(scope.index()) else {
            return Ok(());
        };
        if let Some(existing) = data.bindings.get(&name) {
            return Err(*existing);
        }
        data.bindings.insert(name, binding);
        data.order.push(name);
        Ok(())
    }

    /// Nearest binding of `name` visible from `scope`.
    pub fn find(&self, scope: ScopeId, name: Name) -> Option<Binding> {
        self.find_with_depth(scope, name, true).map(|(b, _)| b)
    }

    /// Like [`find`](Self::find), but stops before the global scope. Also
    /// returns how many parent links were followed.
    pub fn find_local_only(&self, scope: ScopeId, name: Name) -> Option<(Binding, usize)> {
        self.find_with_depth(scope, name, false)
    }

    fn find_with_depth(
        &self,
        scope: ScopeId,
        name: Name,
        include_global: bool,
    ) -> Option<(Binding, usize)> {
        let mut current = Some(scope);
        let mut depth = 0;
        while let Some(id) = current {
            if id == ScopeId::GLOBAL && !include_global {
                return None;
            }
            let data = self.scopes.get(id.index())?;
            if let Some(binding) = data.bindings.get(&name) {
                return Some((*binding, depth));
            }
            current = data.parent;
            depth += 1;
        }
        None
    }

    /// Number of names bound directly in `scope`.
    pub fn binding_count(&self, scope: ScopeId) -> usize {
        self.scopes.get(scope.index()).map_or(0, |s| s.order.len())
    }

    /// Forget the bindings made in `scope` after it held `count` of them.
    pub fn truncate(&mut self, scope: ScopeId, count: usize) {
        if let Some(data) = self.scopes.get_mut(scope.index()) {
            for name in data.order.drain(count.min(data.order.len())..) {
                data.bindings.remove(&name);
            }
        }
    }

    /// Names bound directly in `scope`, oldest first.
    pub fn names(&self, scope: ScopeId) -> &[Name] {
        self.scopes.get(scope.index()).map_or(&[], |s| &s.order)
    }
}

impl Default for SymbolTable {
    fn default() -> Self {
        Self::new()
    }
}
