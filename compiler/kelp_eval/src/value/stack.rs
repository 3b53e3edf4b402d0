//! The value stack: one growable byte buffer holding every live value.
//!
//! Values are appended at the top and removed by [`ValueStack::collapse`],
//! which deletes a byte range and slides everything above it down. A
//! collapse is the only operation that moves bytes, so it is also the only
//! one that can invalidate a [`Slot`].
//!
//! # Slot liveness
//!
//! Each slot records the stack generation it was issued under. Every
//! non-empty collapse bumps the generation and appends `(generation, begin)`
//! to a log. Entries whose `begin` is at or above a newer collapse's `begin`
//! are dropped, so the log's `begin`s strictly increase along with its
//! generations. A slot issued at generation `g` is live iff its offset is
//! below the top and below the `begin` of the first logged collapse newer
//! than `g`, found with a binary search.

use std::fmt;

use smallvec::SmallVec;

use super::{Header, Tag, COUNT_SIZE, HEADER_SIZE, REF_PAYLOAD_SIZE};

/// Checked handle to a value on the stack.
#[derive(Copy, Clone, PartialEq, Eq, Hash)]
pub struct Slot {
    offset: u32,
    generation: u64,
}

impl Slot {
    pub(crate) fn new(offset: u32, generation: u64) -> Self {
        Slot { offset, generation }
    }

    #[inline]
    pub fn offset(self) -> usize {
        self.offset as usize
    }

    #[inline]
    pub fn generation(self) -> u64 {
        self.generation
    }
}

impl fmt::Debug for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Slot(@{}#{})", self.offset, self.generation)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum StackError {
    #[error("stale reference to offset {offset}: the value was removed from the stack")]
    StaleSlot { offset: usize },

    #[error("offset {offset} is past the top of the stack ({top})")]
    OutOfBounds { offset: usize, top: usize },

    #[error("reference to offset {offset} is past the end of its target (ends at {end})")]
    PastEnd { offset: usize, end: usize },

    #[error("value stack exhausted (limit {limit} bytes)")]
    Exhausted { limit: usize },

    #[error("expected {expected}, found {found}")]
    TagMismatch {
        expected: &'static str,
        found: &'static str,
    },

    #[error("corrupt value encoding at offset {offset}")]
    Corrupt { offset: usize },
}

/// A value whose header has been written but whose length is not yet known.
#[must_use = "an opened value must be closed"]
#[derive(Debug)]
pub struct Pending {
    start: usize,
}

#[derive(Copy, Clone, Debug)]
struct Collapse {
    generation: u64,
    begin: u32,
}

pub struct ValueStack {
    bytes: Vec<u8>,
    generation: u64,
    collapses: Vec<Collapse>,
    limit: usize,
}

impl ValueStack {
    /// Create a stack that preallocates `initial_capacity` bytes and refuses
    /// to grow past `limit` bytes.
    pub fn new(initial_capacity: usize, limit: usize) -> Self {
        let limit = limit.min(u32::MAX as usize);
        ValueStack {
            bytes: Vec::with_capacity(initial_capacity.min(limit)),
            generation: 0,
            collapses: Vec::new(),
            limit,
        }
    }

    /// Offset one past the last byte in use.
    #[inline]
    pub fn top(&self) -> usize {
        self.bytes.len()
    }

    #[inline]
    pub fn limit(&self) -> usize {
        self.limit
    }

    #[inline]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// A slot for `offset` stamped with the current generation.
    #[inline]
    pub(crate) fn slot_at(&self, offset: usize) -> Slot {
        Slot::new(offset as u32, self.generation)
    }

    fn reserve(&mut self, additional: usize) -> Result<(), StackError> {
        if self.bytes.len().saturating_add(additional) > self.limit {
            return Err(StackError::Exhausted { limit: self.limit });
        }
        self.bytes.reserve(additional);
        Ok(())
    }

    fn push_header(&mut self, tag: Tag, len: u32) {
        self.bytes.push(tag as u8);
        self.bytes.extend_from_slice(&len.to_le_bytes());
    }

    fn push_scalar(&mut self, tag: Tag, payload: &[u8]) -> Result<Slot, StackError> {
        self.reserve(HEADER_SIZE + payload.len())?;
        let slot = self.slot_at(self.top());
        self.push_header(tag, payload.len() as u32);
        self.bytes.extend_from_slice(payload);
        Ok(slot)
    }

    // Scalars

    pub fn push_unit(&mut self) -> Result<Slot, StackError> {
        self.push_scalar(Tag::Unit, &[])
    }

    pub fn push_bool(&mut self, value: bool) -> Result<Slot, StackError> {
        self.push_scalar(Tag::Bool, &[u8::from(value)])
    }

    pub fn push_char(&mut self, value: char) -> Result<Slot, StackError> {
        self.push_scalar(Tag::Char, &u32::from(value).to_le_bytes())
    }

    pub fn push_int(&mut self, value: i64) -> Result<Slot, StackError> {
        self.push_scalar(Tag::Int, &value.to_le_bytes())
    }

    pub fn push_real(&mut self, value: f64) -> Result<Slot, StackError> {
        self.push_scalar(Tag::Real, &value.to_bits().to_le_bytes())
    }

    /// Push a reference to the single value at `target`.
    pub fn push_ref(&mut self, target: Slot) -> Result<Slot, StackError> {
        let end = self.next(target)?.offset();
        self.push_ref_within(target, end)
    }

    /// Push a reference to `target` that may walk forward up to `end`.
    /// `target == end` is a legal one-past-the-end reference; it only fails
    /// when dereferenced.
    pub fn push_ref_within(&mut self, target: Slot, end: usize) -> Result<Slot, StackError> {
        if target.offset() > end {
            return Err(StackError::PastEnd {
                offset: target.offset(),
                end,
            });
        }
        let end = u32::try_from(end).map_err(|_| StackError::Exhausted { limit: self.limit })?;
        let mut payload = [0; REF_PAYLOAD_SIZE];
        payload[..12].copy_from_slice(&encode_target(target));
        payload[12..].copy_from_slice(&end.to_le_bytes());
        self.push_scalar(Tag::Ref, &payload)
    }

    /// Push a string as an array of `Char`.
    pub fn push_str(&mut self, text: &str) -> Result<Slot, StackError> {
        let pending = self.open(Tag::Array)?;
        let mut count = 0;
        for c in text.chars() {
            self.push_char(c)?;
            count += 1;
        }
        self.close_compound(pending, count)
    }

    // Incremental construction

    /// Write a header with a placeholder length (and, for compounds, a
    /// placeholder element count). Payload is appended afterwards.
    pub fn open(&mut self, tag: Tag) -> Result<Pending, StackError> {
        let count = if tag.is_compound() { COUNT_SIZE } else { 0 };
        self.reserve(HEADER_SIZE + count)?;
        let start = self.top();
        self.push_header(tag, 0);
        self.bytes.extend_from_slice(&[0; COUNT_SIZE][..count]);
        Ok(Pending { start })
    }

    pub fn write_u8(&mut self, value: u8) -> Result<(), StackError> {
        self.reserve(1)?;
        self.bytes.push(value);
        Ok(())
    }

    pub fn write_u32(&mut self, value: u32) -> Result<(), StackError> {
        self.reserve(4)?;
        self.bytes.extend_from_slice(&value.to_le_bytes());
        Ok(())
    }

    /// Patch the payload length of an opened value.
    pub fn close(&mut self, pending: Pending) -> Result<Slot, StackError> {
        let start = pending.start;
        let len = self
            .top()
            .checked_sub(start + HEADER_SIZE)
            .ok_or(StackError::Corrupt { offset: start })?;
        let len = u32::try_from(len).map_err(|_| StackError::Exhausted { limit: self.limit })?;
        self.bytes[start + 1..start + HEADER_SIZE].copy_from_slice(&len.to_le_bytes());
        Ok(self.slot_at(start))
    }

    /// Patch the element count and length of an opened compound.
    pub fn close_compound(&mut self, pending: Pending, count: usize) -> Result<Slot, StackError> {
        let start = pending.start;
        let at = start + HEADER_SIZE;
        let count =
            u32::try_from(count).map_err(|_| StackError::Exhausted { limit: self.limit })?;
        self.bytes
            .get_mut(at..at + COUNT_SIZE)
            .ok_or(StackError::Corrupt { offset: start })?
            .copy_from_slice(&count.to_le_bytes());
        self.close(pending)
    }

    // Copies

    /// Duplicate a whole value, header included, at the top.
    pub fn push_copy(&mut self, source: Slot) -> Result<Slot, StackError> {
        let start = self.resolve(source)?;
        let size = self.header_at(start)?.size();
        self.reserve(size)?;
        let slot = self.slot_at(self.top());
        self.bytes.extend_from_within(start..start + size);
        Ok(slot)
    }

    /// Append elements `lo..hi` of a compound, without its header, to an
    /// open compound. Returns the number of elements copied.
    pub fn push_elements(&mut self, source: Slot, lo: usize, hi: usize) -> Result<usize, StackError> {
        let elements = self.elements(source)?;
        let end = self.next(source)?.offset();
        let (Some(first), true) = (elements.get(lo), lo <= hi && hi <= elements.len()) else {
            return Ok(0);
        };
        let from = first.offset();
        let to = elements.get(hi).map_or(end, |s| s.offset());
        self.reserve(to - from)?;
        self.bytes.extend_from_within(from..to);
        Ok(hi - lo)
    }

    // Liveness

    /// Whether `slot` still names the value it was issued for.
    pub fn is_live(&self, slot: Slot) -> bool {
        if slot.offset() >= self.top() {
            return false;
        }
        let newer = self
            .collapses
            .partition_point(|c| c.generation <= slot.generation);
        self.collapses
            .get(newer)
            .map_or(true, |c| slot.offset < c.begin)
    }

    /// Validate `slot` and return its byte offset.
    pub fn resolve(&self, slot: Slot) -> Result<usize, StackError> {
        if self.is_live(slot) {
            return Ok(slot.offset());
        }
        if slot.generation == self.generation {
            Err(StackError::OutOfBounds {
                offset: slot.offset(),
                top: self.top(),
            })
        } else {
            Err(StackError::StaleSlot {
                offset: slot.offset(),
            })
        }
    }

    // Reads

    fn read_array<const N: usize>(&self, at: usize) -> Result<[u8; N], StackError> {
        self.bytes
            .get(at..at + N)
            .and_then(|b| b.try_into().ok())
            .ok_or(StackError::Corrupt { offset: at })
    }

    pub(crate) fn raw_u8(&self, at: usize) -> Result<u8, StackError> {
        self.read_array::<1>(at).map(|[b]| b)
    }

    pub(crate) fn raw_u32(&self, at: usize) -> Result<u32, StackError> {
        self.read_array(at).map(u32::from_le_bytes)
    }

    fn raw_u64(&self, at: usize) -> Result<u64, StackError> {
        self.read_array(at).map(u64::from_le_bytes)
    }

    pub(crate) fn header_at(&self, at: usize) -> Result<Header, StackError> {
        let [byte] = self.read_array::<1>(at)?;
        let tag = Tag::from_byte(byte).ok_or(StackError::Corrupt { offset: at })?;
        let len = self.raw_u32(at + 1)?;
        let header = Header { tag, len };
        if at + header.size() > self.top() {
            return Err(StackError::Corrupt { offset: at });
        }
        Ok(header)
    }

    pub fn header(&self, slot: Slot) -> Result<Header, StackError> {
        self.header_at(self.resolve(slot)?)
    }

    pub fn tag(&self, slot: Slot) -> Result<Tag, StackError> {
        self.header(slot).map(|h| h.tag)
    }

    /// Check the tag and return the payload offset.
    pub(crate) fn payload(&self, slot: Slot, tag: Tag) -> Result<usize, StackError> {
        let at = self.resolve(slot)?;
        let header = self.header_at(at)?;
        if header.tag != tag {
            return Err(StackError::TagMismatch {
                expected: tag.name(),
                found: header.tag.name(),
            });
        }
        Ok(at + HEADER_SIZE)
    }

    pub fn read_bool(&self, slot: Slot) -> Result<bool, StackError> {
        let at = self.payload(slot, Tag::Bool)?;
        Ok(self.raw_u8(at)? != 0)
    }

    pub fn read_char(&self, slot: Slot) -> Result<char, StackError> {
        let at = self.payload(slot, Tag::Char)?;
        char::from_u32(self.raw_u32(at)?).ok_or(StackError::Corrupt { offset: at })
    }

    pub fn read_int(&self, slot: Slot) -> Result<i64, StackError> {
        let at = self.payload(slot, Tag::Int)?;
        self.read_array(at).map(i64::from_le_bytes)
    }

    pub fn read_real(&self, slot: Slot) -> Result<f64, StackError> {
        let at = self.payload(slot, Tag::Real)?;
        self.raw_u64(at).map(f64::from_bits)
    }

    /// The slot a reference points at. Neither liveness nor bounds are
    /// checked; see [`deref`](Self::deref).
    pub fn read_ref(&self, slot: Slot) -> Result<Slot, StackError> {
        let at = self.payload(slot, Tag::Ref)?;
        Ok(Slot::new(self.raw_u32(at)?, self.raw_u64(at + 4)?))
    }

    /// End of the region a reference may walk, exclusive.
    pub fn ref_end(&self, slot: Slot) -> Result<usize, StackError> {
        let at = self.payload(slot, Tag::Ref)?;
        Ok(self.raw_u32(at + 12)? as usize)
    }

    /// The live, in-bounds slot a reference points at.
    pub fn deref(&self, slot: Slot) -> Result<Slot, StackError> {
        let target = self.read_ref(slot)?;
        let end = self.ref_end(slot)?;
        if target.offset() >= end {
            return Err(StackError::PastEnd {
                offset: target.offset(),
                end,
            });
        }
        self.resolve(target)?;
        // The whole region must have survived, not just its first value.
        self.resolve(Slot::new((end - 1) as u32, target.generation))?;
        if self.next(target)?.offset() > end {
            return Err(StackError::Corrupt {
                offset: target.offset(),
            });
        }
        Ok(target)
    }

    /// The value after the one a reference points at, which may be the
    /// one-past-the-end position of the reference's region.
    pub fn ref_successor(&self, slot: Slot) -> Result<Slot, StackError> {
        let target = self.deref(slot)?;
        self.next(target)
    }

    /// Element count of an array or tuple.
    pub fn count(&self, slot: Slot) -> Result<usize, StackError> {
        let at = self.resolve(slot)?;
        let header = self.header_at(at)?;
        if !header.tag.is_compound() {
            return Err(not_compound(header.tag));
        }
        Ok(self.raw_u32(at + HEADER_SIZE)? as usize)
    }

    /// Slots of every element of an array or tuple, in order.
    pub fn elements(&self, slot: Slot) -> Result<SmallVec<[Slot; 8]>, StackError> {
        let at = self.resolve(slot)?;
        let header = self.header_at(at)?;
        if !header.tag.is_compound() {
            return Err(not_compound(header.tag));
        }
        let count = self.raw_u32(at + HEADER_SIZE)? as usize;
        let end = at + header.size();
        let mut cursor = at + HEADER_SIZE + COUNT_SIZE;
        let mut out = SmallVec::with_capacity(count.min(64));
        for _ in 0..count {
            out.push(self.slot_at(cursor));
            cursor += self.header_at(cursor)?.size();
        }
        if cursor != end {
            return Err(StackError::Corrupt { offset: at });
        }
        Ok(out)
    }

    /// Slot of the first element position of a compound.
    pub fn first_element(&self, slot: Slot) -> Result<Slot, StackError> {
        self.count(slot)?;
        Ok(self.slot_at(slot.offset() + HEADER_SIZE + COUNT_SIZE))
    }

    /// Slot directly after the value at `slot`.
    pub fn next(&self, slot: Slot) -> Result<Slot, StackError> {
        let at = self.resolve(slot)?;
        Ok(self.slot_at(at + self.header_at(at)?.size()))
    }

    /// The full encoding of a value, header included.
    pub fn bytes_of(&self, slot: Slot) -> Result<&[u8], StackError> {
        let at = self.resolve(slot)?;
        let size = self.header_at(at)?.size();
        Ok(&self.bytes[at..at + size])
    }

    // In-place mutation

    /// Copy the value at `source` over the value at `target`. Both must
    /// have the same encoded size.
    pub fn overwrite(&mut self, target: Slot, source: Slot) -> Result<(), StackError> {
        let dst = self.resolve(target)?;
        let src = self.resolve(source)?;
        let size = self.header_at(src)?.size();
        if self.header_at(dst)?.size() != size {
            return Err(StackError::Corrupt { offset: dst });
        }
        self.bytes.copy_within(src..src + size, dst);
        Ok(())
    }

    /// Repoint the reference stored at `slot`, keeping its region.
    pub fn set_ref(&mut self, slot: Slot, target: Slot) -> Result<(), StackError> {
        let end = self.ref_end(slot)?;
        if target.offset() > end {
            return Err(StackError::PastEnd {
                offset: target.offset(),
                end,
            });
        }
        let at = self.payload(slot, Tag::Ref)?;
        self.bytes[at..at + 12].copy_from_slice(&encode_target(target));
        Ok(())
    }

    // Removal

    /// Delete `[begin, end)` and slide the rest down.
    pub fn collapse(&mut self, begin: usize, end: usize) {
        let end = end.min(self.top());
        if begin >= end {
            return;
        }
        if end == self.top() {
            self.bytes.truncate(begin);
        } else {
            self.bytes.drain(begin..end);
        }
        self.generation += 1;
        let begin = begin as u32;
        while self.collapses.last().is_some_and(|c| c.begin >= begin) {
            self.collapses.pop();
        }
        self.collapses.push(Collapse {
            generation: self.generation,
            begin,
        });
        tracing::trace!(begin, end, generation = self.generation, "collapse");
    }

    /// Drop everything at or above `to`.
    pub fn truncate(&mut self, to: usize) {
        self.collapse(to, self.top());
    }

    /// Discard everything between `mark` and `result`, and anything above
    /// `result`, so `result` ends up at `mark`.
    pub fn keep(&mut self, mark: usize, result: Slot) -> Result<Slot, StackError> {
        let at = self.resolve(result)?;
        if at < mark {
            return Err(StackError::Corrupt { offset: at });
        }
        let size = self.header_at(at)?.size();
        self.truncate(at + size);
        self.collapse(mark, at);
        Ok(self.slot_at(mark))
    }
}

fn encode_target(target: Slot) -> [u8; 12] {
    let mut bytes = [0; 12];
    bytes[..4].copy_from_slice(&target.offset.to_le_bytes());
    bytes[4..].copy_from_slice(&target.generation.to_le_bytes());
    bytes
}

fn not_compound(found: Tag) -> StackError {
    StackError::TagMismatch {
        expected: "Array or Tuple",
        found: found.name(),
    }
}
