//! Byte encoding of Kelp values.
//!
//! Every value is a [`HEADER_SIZE`]-byte header (one tag byte, then the
//! payload length as a little-endian `u32`) followed by its payload:
//!
//! | Tag        | Payload |
//! |------------|---------|
//! | `Unit`     | empty |
//! | `Bool`     | one byte, 0 or 1 |
//! | `Char`     | `u32` code point |
//! | `Int`      | `i64` |
//! | `Real`     | `f64` bits |
//! | `Array`    | `u32` element count, then the elements |
//! | `Tuple`    | `u32` element count, then the elements |
//! | `Function` | see [`crate::closure`] |
//! | `Ref`      | `u32` target offset, `u64` target generation, `u32` region end |
//!
//! All integers are little-endian. Compound payloads nest complete values,
//! so a value can be copied or compared as one contiguous byte range.

mod display;
mod equality;
mod shape;
mod stack;

pub(crate) use display::read_string;
pub use display::write_value;
pub use equality::values_equal;
pub use shape::{shape_of, Shape};
pub use stack::{Pending, Slot, StackError, ValueStack};

/// Bytes in a value header.
pub const HEADER_SIZE: usize = 5;

/// Bytes in a compound's element-count prefix.
pub const COUNT_SIZE: usize = 4;

/// Payload size of a `Ref` value.
pub const REF_PAYLOAD_SIZE: usize = 16;

/// Value type tag.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Tag {
    Unit = 0,
    Bool = 1,
    Char = 2,
    Int = 3,
    Real = 4,
    Array = 5,
    Tuple = 6,
    Function = 7,
    Ref = 8,
}

impl Tag {
    pub fn from_byte(byte: u8) -> Option<Tag> {
        Some(match byte {
            0 => Tag::Unit,
            1 => Tag::Bool,
            2 => Tag::Char,
            3 => Tag::Int,
            4 => Tag::Real,
            5 => Tag::Array,
            6 => Tag::Tuple,
            7 => Tag::Function,
            8 => Tag::Ref,
            _ => return None,
        })
    }

    /// Type name as written in guard patterns.
    pub fn name(self) -> &'static str {
        match self {
            Tag::Unit => "Unit",
            Tag::Bool => "Bool",
            Tag::Char => "Char",
            Tag::Int => "Int",
            Tag::Real => "Real",
            Tag::Array => "Array",
            Tag::Tuple => "Tuple",
            Tag::Function => "Func",
            Tag::Ref => "Ref",
        }
    }

    #[inline]
    pub fn is_compound(self) -> bool {
        matches!(self, Tag::Array | Tag::Tuple)
    }
}

/// Decoded value header.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Header {
    pub tag: Tag,
    /// Payload length in bytes, excluding the header itself.
    pub len: u32,
}

impl Header {
    /// Total encoded size including the header.
    #[inline]
    pub fn size(self) -> usize {
        HEADER_SIZE + self.len as usize
    }
}
