//! Interned identifier handle.

use std::fmt;

/// An interned symbol name.
///
/// Cheap to copy and compare. The raw index is stable for the lifetime of
/// the interner that produced it, which lets function values store captured
/// names inside the byte-encoded value stack.
#[derive(Copy, Clone, Eq, PartialEq, Hash, PartialOrd, Ord)]
#[repr(transparent)]
pub struct Name(u32);

impl Name {
    /// Pre-interned empty string.
    pub const EMPTY: Name = Name(0);

    #[inline]
    pub(crate) const fn new(index: u32) -> Self {
        Name(index)
    }

    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// Raw value for byte encoding.
    #[inline]
    pub const fn raw(self) -> u32 {
        self.0
    }

    /// Rebuild from a value previously obtained with [`Name::raw`].
    #[inline]
    pub const fn from_raw(raw: u32) -> Self {
        Name(raw)
    }
}

impl fmt::Debug for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Name({})", self.0)
    }
}
