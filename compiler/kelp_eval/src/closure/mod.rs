//! Function values: construction, capture analysis and encoding.
//!
//! A function value is self-contained. Its payload is
//!
//! ```text
//! arity: u32 | kind: u8 | target: u32
//! capture count: u32 | (name: u32, value)*
//! applied count: u32 | value*
//! ```
//!
//! where `kind` selects an interpreted definition (`target` indexes the
//! [`FunctionRegistry`]) or a native (`target` indexes the
//! [`NativeTable`]), and captured and applied values are embedded by
//! value. Currying never mutates a function value: applying too few
//! arguments pushes a new one whose applied list is the old one plus the
//! new arguments.

mod capture;
mod function;
mod native;

pub use function::FunctionKind;
pub(crate) use function::{
    push_function, push_native, FunctionHeader, FunctionRegistry, FunctionView,
};
pub use native::{HostFn, NativeImpl};
pub(crate) use native::{BuiltinFn, NativeTable};

use std::rc::Rc;

use smallvec::SmallVec;

use kelp_ir::{FuncDef, Name};

use crate::errors::EvalResult;
use crate::{Interpreter, Slot};

impl Interpreter {
    /// Evaluate a `func` form: capture the free names of its body that are
    /// bound in an enclosing local scope, and push the function value.
    ///
    /// Names that only resolve globally are not captured; they are looked
    /// up when the function runs.
    pub(crate) fn make_function(&mut self, def: &Rc<FuncDef>) -> EvalResult {
        let (target, free) = self.functions.register(def);
        let mut captures: SmallVec<[(Name, Slot); 4]> = SmallVec::new();
        for &name in free.iter() {
            if let Some((binding, depth)) = self.symbols.find_local_only(self.scope, name) {
                self.stack.resolve(binding.slot)?;
                tracing::trace!(name = self.interner.lookup(name), depth, "capture");
                captures.push((name, binding.slot));
            }
        }
        tracing::debug!(
            arity = def.arity(),
            free = free.len(),
            captured = captures.len(),
            "closure"
        );
        let header = FunctionHeader::interpreted(def.arity(), target);
        Ok(push_function(&mut self.stack, &header, &captures, &[])?)
    }
}
