use std::rc::Rc;

use rustc_hash::FxHashMap;
use smallvec::SmallVec;

use kelp_ir::{FuncDef, Name};

use super::capture::free_names;
use crate::value::{StackError, Tag, ValueStack, HEADER_SIZE};
use crate::Slot;

/// What a function value's `target` indexes.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum FunctionKind {
    Interpreted = 0,
    Native = 1,
}

impl FunctionKind {
    fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            0 => Some(FunctionKind::Interpreted),
            1 => Some(FunctionKind::Native),
            _ => None,
        }
    }
}

/// The fixed leading fields of a function payload.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) struct FunctionHeader {
    pub arity: usize,
    pub kind: FunctionKind,
    pub target: u32,
}

impl FunctionHeader {
    pub fn interpreted(arity: usize, target: u32) -> Self {
        FunctionHeader {
            arity,
            kind: FunctionKind::Interpreted,
            target,
        }
    }

    pub fn native(arity: usize, target: u32) -> Self {
        FunctionHeader {
            arity,
            kind: FunctionKind::Native,
            target,
        }
    }
}

/// A decoded function value. Capture and argument slots point into the
/// function's own payload.
#[derive(Clone, Debug)]
pub(crate) struct FunctionView {
    pub header: FunctionHeader,
    pub captures: SmallVec<[(Name, Slot); 4]>,
    pub applied: SmallVec<[Slot; 4]>,
}

impl FunctionView {
    pub fn decode(stack: &ValueStack, slot: Slot) -> Result<Self, StackError> {
        let mut at = stack.payload(slot, Tag::Function)?;
        let arity = stack.raw_u32(at)? as usize;
        let kind = stack.raw_u8(at + 4)?;
        let kind = FunctionKind::from_byte(kind).ok_or(StackError::Corrupt { offset: at + 4 })?;
        let target = stack.raw_u32(at + 5)?;
        at += 9;

        let capture_count = stack.raw_u32(at)?;
        at += 4;
        let mut captures = SmallVec::new();
        for _ in 0..capture_count {
            let name = Name::from_raw(stack.raw_u32(at)?);
            at += 4;
            captures.push((name, stack.slot_at(at)));
            at += stack.header_at(at)?.size();
        }

        let applied_count = stack.raw_u32(at)?;
        at += 4;
        let mut applied = SmallVec::new();
        for _ in 0..applied_count {
            applied.push(stack.slot_at(at));
            at += stack.header_at(at)?.size();
        }

        if at != stack.next(slot)?.offset() {
            return Err(StackError::Corrupt {
                offset: slot.offset() + HEADER_SIZE,
            });
        }
        Ok(FunctionView {
            header: FunctionHeader {
                arity,
                kind,
                target,
            },
            captures,
            applied,
        })
    }

    /// Arguments still needed before the function runs.
    pub fn remaining(&self) -> usize {
        self.header.arity.saturating_sub(self.applied.len())
    }
}

/// Push a function value, copying every captured and applied value into it.
pub(crate) fn push_function(
    stack: &mut ValueStack,
    header: &FunctionHeader,
    captures: &[(Name, Slot)],
    applied: &[Slot],
) -> Result<Slot, StackError> {
    let pending = stack.open(Tag::Function)?;
    stack.write_u32(encode_count(header.arity))?;
    stack.write_u8(header.kind as u8)?;
    stack.write_u32(header.target)?;
    stack.write_u32(encode_count(captures.len()))?;
    for &(name, value) in captures {
        stack.write_u32(name.raw())?;
        stack.push_copy(value)?;
    }
    stack.write_u32(encode_count(applied.len()))?;
    for &value in applied {
        stack.push_copy(value)?;
    }
    stack.close(pending)
}

pub(crate) fn push_native(stack: &mut ValueStack, arity: usize, target: u32) -> Result<Slot, StackError> {
    push_function(stack, &FunctionHeader::native(arity, target), &[], &[])
}

fn encode_count(n: usize) -> u32 {
    u32::try_from(n).unwrap_or(u32::MAX)
}

/// Interpreted function definitions, indexed by the `target` of function
/// values. A definition is registered once however many times its `func`
/// form is evaluated, together with its free names.
#[derive(Default)]
pub(crate) struct FunctionRegistry {
    defs: Vec<Rc<FuncDef>>,
    free: Vec<Rc<[Name]>>,
    index: FxHashMap<usize, u32>,
}

impl FunctionRegistry {
    pub fn register(&mut self, def: &Rc<FuncDef>) -> (u32, Rc<[Name]>) {
        let key = Rc::as_ptr(def) as usize;
        if let Some(&target) = self.index.get(&key) {
            return (target, Rc::clone(&self.free[target as usize]));
        }
        let target = encode_count(self.defs.len());
        let free: Rc<[Name]> = free_names(def).into();
        self.defs.push(Rc::clone(def));
        self.free.push(Rc::clone(&free));
        self.index.insert(key, target);
        (target, free)
    }

    pub fn get(&self, target: u32) -> Option<&Rc<FuncDef>> {
        self.defs.get(target as usize)
    }
}

#[cfg(test)]
#[expect(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]
mod tests {
    use super::*;

    #[test]
    fn decode_reads_back_captures_and_arguments() {
        let mut stack = ValueStack::new(256, 4096);
        let x = stack.push_int(7).unwrap();
        let s = stack.push_str("ab").unwrap();
        let header = FunctionHeader::interpreted(3, 2);
        let f = push_function(&mut stack, &header, &[(Name::from_raw(5), x)], &[s]).unwrap();

        let view = FunctionView::decode(&stack, f).unwrap();
        assert_eq!(view.header, header);
        assert_eq!(view.remaining(), 2);
        assert_eq!(view.captures.len(), 1);
        assert_eq!(view.captures[0].0, Name::from_raw(5));
        assert_eq!(stack.read_int(view.captures[0].1).unwrap(), 7);
        assert_eq!(stack.count(view.applied[0]).unwrap(), 2);
    }

    #[test]
    fn native_values_carry_no_environment() {
        let mut stack = ValueStack::new(64, 4096);
        let f = push_native(&mut stack, 2, 9).unwrap();
        let view = FunctionView::decode(&stack, f).unwrap();
        assert_eq!(view.header.kind, FunctionKind::Native);
        assert_eq!(view.header.target, 9);
        assert!(view.captures.is_empty());
        assert!(view.applied.is_empty());
    }

    #[test]
    fn decode_rejects_other_tags() {
        let mut stack = ValueStack::new(64, 4096);
        let n = stack.push_int(1).unwrap();
        assert!(matches!(
            FunctionView::decode(&stack, n),
            Err(StackError::TagMismatch { .. })
        ));
    }
}
