//! Deep structural equality over stack values.

use super::{Slot, StackError, Tag, ValueStack};

/// Compare two values structurally.
///
/// Values of different variants are unequal. References compare by target
/// offset; functions compare by their full encoding. Reals use IEEE
/// equality, so `NaN` is unequal to itself.
#[expect(clippy::float_cmp, reason = "language equality is IEEE equality")]
pub fn values_equal(stack: &ValueStack, a: Slot, b: Slot) -> Result<bool, StackError> {
    kelp_stack::ensure_sufficient_stack(|| {
        let tag = stack.tag(a)?;
        if tag != stack.tag(b)? {
            return Ok(false);
        }
        Ok(match tag {
            Tag::Unit => true,
            Tag::Bool => stack.read_bool(a)? == stack.read_bool(b)?,
            Tag::Char => stack.read_char(a)? == stack.read_char(b)?,
            Tag::Int => stack.read_int(a)? == stack.read_int(b)?,
            Tag::Real => stack.read_real(a)? == stack.read_real(b)?,
            Tag::Ref => stack.read_ref(a)?.offset() == stack.read_ref(b)?.offset(),
            Tag::Function => stack.bytes_of(a)? == stack.bytes_of(b)?,
            Tag::Array | Tag::Tuple => {
                let xs = stack.elements(a)?;
                let ys = stack.elements(b)?;
                if xs.len() != ys.len() {
                    return Ok(false);
                }
                for (&x, &y) in xs.iter().zip(&ys) {
                    if !values_equal(stack, x, y)? {
                        return Ok(false);
                    }
                }
                true
            }
        })
    })
}
