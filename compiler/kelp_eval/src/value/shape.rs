//! Structural shapes for the array homogeneity rule.

use std::fmt;

use super::{Slot, StackError, Tag, ValueStack};

/// The structure of a value, ignoring scalar contents.
///
/// Two values may share an array iff their shapes unify. An empty array has
/// an unknown element shape that unifies with any other array shape, and
/// every reference and every function is compatible with any other.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Shape {
    Unit,
    Bool,
    Char,
    Int,
    Real,
    Ref,
    Function,
    Array(Option<Box<Shape>>),
    Tuple(Vec<Shape>),
}

impl Shape {
    /// The most specific shape compatible with both, if they are compatible.
    pub fn unify(&self, other: &Shape) -> Option<Shape> {
        match (self, other) {
            (Shape::Array(None), Shape::Array(elem)) | (Shape::Array(elem), Shape::Array(None)) => {
                Some(Shape::Array(elem.clone()))
            }
            (Shape::Array(Some(a)), Shape::Array(Some(b))) => {
                a.unify(b).map(|e| Shape::Array(Some(Box::new(e))))
            }
            (Shape::Tuple(a), Shape::Tuple(b)) if a.len() == b.len() => a
                .iter()
                .zip(b)
                .map(|(x, y)| x.unify(y))
                .collect::<Option<Vec<_>>>()
                .map(Shape::Tuple),
            (a, b) if a == b && !matches!(a, Shape::Array(_) | Shape::Tuple(_)) => Some(a.clone()),
            _ => None,
        }
    }

    pub fn is_compatible(&self, other: &Shape) -> bool {
        self.unify(other).is_some()
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Shape::Unit => f.write_str("Unit"),
            Shape::Bool => f.write_str("Bool"),
            Shape::Char => f.write_str("Char"),
            Shape::Int => f.write_str("Int"),
            Shape::Real => f.write_str("Real"),
            Shape::Ref => f.write_str("Ref"),
            Shape::Function => f.write_str("Func"),
            Shape::Array(None) => f.write_str("(Array _)"),
            Shape::Array(Some(elem)) => write!(f, "(Array {elem})"),
            Shape::Tuple(fields) => {
                f.write_str("{")?;
                for (i, field) in fields.iter().enumerate() {
                    if i > 0 {
                        f.write_str(" ")?;
                    }
                    write!(f, "{field}")?;
                }
                f.write_str("}")
            }
        }
    }
}

/// Compute the shape of the value at `slot`.
pub fn shape_of(stack: &ValueStack, slot: Slot) -> Result<Shape, StackError> {
    kelp_stack::ensure_sufficient_stack(|| {
        Ok(match stack.tag(slot)? {
            Tag::Unit => Shape::Unit,
            Tag::Bool => Shape::Bool,
            Tag::Char => Shape::Char,
            Tag::Int => Shape::Int,
            Tag::Real => Shape::Real,
            Tag::Ref => Shape::Ref,
            Tag::Function => Shape::Function,
            Tag::Array => {
                let mut elem: Option<Shape> = None;
                for item in stack.elements(slot)? {
                    let shape = shape_of(stack, item)?;
                    elem = Some(match elem {
                        // Arrays on the stack are already homogeneous
                        Some(prev) => prev.unify(&shape).unwrap_or(prev),
                        None => shape,
                    });
                }
                Shape::Array(elem.map(Box::new))
            }
            Tag::Tuple => Shape::Tuple(
                stack
                    .elements(slot)?
                    .into_iter()
                    .map(|item| shape_of(stack, item))
                    .collect::<Result<_, _>>()?,
            ),
        })
    })
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::Shape;

    fn array(elem: Shape) -> Shape {
        Shape::Array(Some(Box::new(elem)))
    }

    #[test]
    fn scalars_unify_only_with_themselves() {
        assert_eq!(Shape::Int.unify(&Shape::Int), Some(Shape::Int));
        assert_eq!(Shape::Int.unify(&Shape::Real), None);
        assert_eq!(Shape::Ref.unify(&Shape::Ref), Some(Shape::Ref));
    }

    #[test]
    fn empty_arrays_take_the_other_side() {
        assert_eq!(
            Shape::Array(None).unify(&array(Shape::Char)),
            Some(array(Shape::Char))
        );
        assert_eq!(
            array(Shape::Array(None)).unify(&array(array(Shape::Int))),
            Some(array(array(Shape::Int)))
        );
        assert_eq!(array(Shape::Int).unify(&array(Shape::Real)), None);
    }

    #[test]
    fn tuples_unify_fieldwise() {
        let a = Shape::Tuple(vec![Shape::Int, Shape::Array(None)]);
        let b = Shape::Tuple(vec![Shape::Int, array(Shape::Bool)]);
        assert_eq!(
            a.unify(&b),
            Some(Shape::Tuple(vec![Shape::Int, array(Shape::Bool)]))
        );
        assert!(!a.is_compatible(&Shape::Tuple(vec![Shape::Int])));
    }

    #[test]
    fn display_uses_guard_syntax() {
        assert_eq!(array(Shape::Char).to_string(), "(Array Char)");
        assert_eq!(
            Shape::Tuple(vec![Shape::Int, Shape::Function]).to_string(),
            "{Int Func}"
        );
    }
}
