use std::fmt;
use std::rc::Rc;

use kelp_ir::Name;

use crate::errors::EvalResult;
use crate::host::HostValue;
use crate::{Interpreter, Slot};

/// Built-in implementation. Receives exactly `arity` argument slots and
/// pushes one result.
pub(crate) type BuiltinFn = fn(&mut Interpreter, &[Slot]) -> EvalResult;

/// Host callback registered through [`crate::Runtime::register_host_fn`].
/// Arguments arrive decoded; an `Err` becomes a runtime error naming the
/// function.
pub type HostFn = Rc<dyn Fn(&[HostValue]) -> Result<HostValue, String>>;

#[derive(Clone)]
pub enum NativeImpl {
    Builtin(BuiltinFn),
    Host(HostFn),
}

impl fmt::Debug for NativeImpl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NativeImpl::Builtin(_) => f.write_str("Builtin"),
            NativeImpl::Host(_) => f.write_str("Host"),
        }
    }
}

#[derive(Debug)]
pub(crate) struct NativeEntry {
    pub name: Name,
    pub arity: usize,
    pub imp: NativeImpl,
}

/// Natives indexed by the `target` of native function values.
#[derive(Default, Debug)]
pub(crate) struct NativeTable {
    entries: Vec<NativeEntry>,
}

impl NativeTable {
    pub fn push(&mut self, name: Name, arity: usize, imp: NativeImpl) -> u32 {
        let target = u32::try_from(self.entries.len()).unwrap_or(u32::MAX);
        self.entries.push(NativeEntry { name, arity, imp });
        target
    }

    pub fn get(&self, target: u32) -> Option<&NativeEntry> {
        self.entries.get(target as usize)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}
