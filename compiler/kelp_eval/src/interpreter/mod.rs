//! Tree-walking evaluator over the value stack.
//!
//! [`Interpreter::eval`] pushes exactly one value for every expression and
//! returns its [`Slot`]. Anything else an expression pushes along the way
//! (sub-results, call arguments, the callee itself) is removed before it
//! returns, on success and on error alike. That discipline is enforced by
//! [`FrameGuard`](frame_guard::FrameGuard), which truncates the stack when
//! dropped unless the result was kept. Scopes are closed the same way by
//! [`ScopedInterpreter`].
//!
//! - `control` - `do`, `bind`, `match`, `if`, `while`, `and` / `or`
//! - `refs` - `ref`, `peek`, `poke`, `begin`, `end`, `inc`, `succ`
//! - `call` - calls, currying, native dispatch

mod call;
mod control;
mod frame_guard;
mod refs;
mod scope_guard;

pub use scope_guard::ScopedInterpreter;

use kelp_ir::{Expr, ExprKind, Name, SharedInterner, Span};
use kelp_stack::ensure_sufficient_stack;

use crate::builtins;
use crate::closure::{push_native, FunctionRegistry, NativeImpl, NativeTable};
use crate::diagnostics::CallStack;
use crate::errors::{already_bound, heterogeneous, undefined_symbol, EvalResult};
use crate::print_handler::SharedPrintHandler;
use crate::symbols::{Binding, ScopeId, SymbolTable};
use crate::value::{shape_of, write_value, Shape, Tag, ValueStack};
use crate::{RuntimeConfig, Slot};

pub struct Interpreter {
    pub(crate) stack: ValueStack,
    pub(crate) symbols: SymbolTable,
    /// Scope new bindings go into.
    pub(crate) scope: ScopeId,
    pub(crate) functions: FunctionRegistry,
    pub(crate) natives: NativeTable,
    pub(crate) call_stack: CallStack,
    pub(crate) interner: SharedInterner,
    pub(crate) print_handler: SharedPrintHandler,
}

impl Interpreter {
    /// Create an interpreter with every built-in bound in the global scope.
    pub fn new(config: &RuntimeConfig, interner: SharedInterner) -> EvalResult<Self> {
        let mut interp = Interpreter {
            stack: ValueStack::new(config.initial_stack_capacity, config.max_stack_bytes),
            symbols: SymbolTable::new(),
            scope: ScopeId::GLOBAL,
            functions: FunctionRegistry::default(),
            natives: NativeTable::default(),
            call_stack: CallStack::new(config.max_call_depth),
            interner,
            print_handler: config.print_handler.clone(),
        };
        for builtin in builtins::all() {
            let name = interp.interner.intern(builtin.name);
            interp.define_native(name, builtin.arity, NativeImpl::Builtin(builtin.run))?;
        }
        tracing::debug!(
            natives = interp.natives.len(),
            bytes = interp.stack.top(),
            "interpreter ready"
        );
        Ok(interp)
    }

    #[inline]
    pub fn stack(&self) -> &ValueStack {
        &self.stack
    }

    #[inline]
    pub fn interner(&self) -> &SharedInterner {
        &self.interner
    }

    #[inline]
    pub fn symbols(&self) -> &SymbolTable {
        &self.symbols
    }

    #[inline]
    pub fn print_handler(&self) -> &SharedPrintHandler {
        &self.print_handler
    }

    /// Evaluate `expr` in the current scope, pushing its value.
    pub fn eval(&mut self, expr: &Expr) -> EvalResult {
        ensure_sufficient_stack(|| self.eval_inner(expr)).map_err(|e| e.or_span(expr.span))
    }

    fn eval_inner(&mut self, expr: &Expr) -> EvalResult {
        match &expr.kind {
            ExprKind::Unit => Ok(self.stack.push_unit()?),
            ExprKind::Bool(b) => Ok(self.stack.push_bool(*b)?),
            ExprKind::Char(c) => Ok(self.stack.push_char(*c)?),
            ExprKind::Int(n) => Ok(self.stack.push_int(*n)?),
            ExprKind::Real(r) => Ok(self.stack.push_real(*r)?),
            ExprKind::Str(s) => Ok(self.stack.push_str(s)?),
            ExprKind::Array(items) => self.eval_array(items),
            ExprKind::Tuple(items) => self.eval_tuple(items),
            ExprKind::Symbol(name) => self.eval_symbol(*name),

            ExprKind::Do(items) => self.eval_do(items),
            ExprKind::Bind { pattern, value } => self.eval_bind(pattern, value),
            ExprKind::Match { subject, arms } => self.eval_match(subject, arms),
            ExprKind::If {
                cond,
                then_branch,
                else_branch,
            } => self.eval_if(cond, then_branch, else_branch.as_deref()),
            ExprKind::While { cond, body } => self.eval_while(cond, body),
            ExprKind::And(items) => self.eval_short_circuit(items, false),
            ExprKind::Or(items) => self.eval_short_circuit(items, true),

            ExprKind::Ref(name) => self.eval_ref(*name),
            ExprKind::Peek(target) => self.eval_peek(target),
            ExprKind::Poke { target, value } => self.eval_poke(target, value),
            ExprKind::Begin(name) => self.eval_begin(*name),
            ExprKind::End(name) => self.eval_end(*name),
            ExprKind::Inc(target) => self.eval_inc(target),
            ExprKind::Succ(target) => self.eval_succ(target),

            ExprKind::Func(def) => self.make_function(def),
            ExprKind::Call { callee, args } => self.eval_call(callee, args, expr.span),
        }
    }

    /// `[e ...]`: elements are evaluated straight into the open array, and
    /// each one must unify with the shape of those before it.
    fn eval_array(&mut self, items: &[Expr]) -> EvalResult {
        let mut frame = self.frame();
        let pending = frame.stack.open(Tag::Array)?;
        let mut shape: Option<Shape> = None;
        for item in items {
            let slot = frame.eval(item)?;
            let found = shape_of(&frame.stack, slot)?;
            shape = Some(match shape {
                None => found,
                Some(expected) => match expected.unify(&found) {
                    Some(unified) => unified,
                    None => return Err(heterogeneous(expected, found)),
                },
            });
        }
        let slot = frame.stack.close_compound(pending, items.len())?;
        frame.commit();
        Ok(slot)
    }

    fn eval_tuple(&mut self, items: &[Expr]) -> EvalResult {
        let mut frame = self.frame();
        let pending = frame.stack.open(Tag::Tuple)?;
        for item in items {
            frame.eval(item)?;
        }
        let slot = frame.stack.close_compound(pending, items.len())?;
        frame.commit();
        Ok(slot)
    }

    /// A symbol evaluates to a copy of the value it is bound to.
    fn eval_symbol(&mut self, name: Name) -> EvalResult {
        let binding = self.lookup(name)?;
        Ok(self.stack.push_copy(binding.slot)?)
    }

    pub(crate) fn lookup(&self, name: Name) -> EvalResult<Binding> {
        self.symbols
            .find(self.scope, name)
            .ok_or_else(|| undefined_symbol(self.interner.lookup(name)))
    }

    /// Source form of a value, for messages and `to_string`.
    pub fn render(&self, slot: Slot) -> EvalResult<String> {
        let mut out = String::new();
        write_value(&self.stack, slot, &mut out)?;
        Ok(out)
    }

    /// Bind a native function value to `name` in the global scope.
    pub(crate) fn define_native(&mut self, name: Name, arity: usize, imp: NativeImpl) -> EvalResult<()> {
        if self.symbols.find(ScopeId::GLOBAL, name).is_some() {
            return Err(already_bound(self.interner.lookup(name)));
        }
        let target = self.natives.push(name, arity, imp);
        let slot = push_native(&mut self.stack, arity, target)?;
        let binding = Binding {
            slot,
            span: Span::DUMMY,
        };
        self.symbols
            .insert(ScopeId::GLOBAL, name, binding)
            .map_err(|_| already_bound(self.interner.lookup(name)))
    }
}
