//! Right-hand operands of writes and binary operators.

use typed_buffer::{ElementKind, Number, TypedBuffer};

use crate::nested::Nested;
use crate::view::Ndarray;
use crate::Result;

/// A scalar or something array-like.
///
/// Binary operators treat [`Operand::Scalar`] specially (applied to every
/// element) and convert everything else once with [`Operand::to_ndarray`].
#[derive(Debug)]
pub enum Operand<'a> {
    Scalar(Number),
    Array(&'a Ndarray),
    Buffer(&'a TypedBuffer),
    Nested(Nested),
}

impl Operand<'_> {
    /// Convert to an array of `kind`.
    ///
    /// Arrays and buffers already of `kind` are aliased; others are
    /// re-encoded into fresh storage. Nested lists must be rectangular.
    pub fn to_ndarray(&self, kind: ElementKind) -> Result<Ndarray> {
        match self {
            Operand::Scalar(v) => Ok(Ndarray::from_values([*v], kind)),
            Operand::Array(a) if a.kind() == kind => Ok(a.view()),
            Operand::Array(a) => Ok(a.astype(kind)),
            Operand::Buffer(b) if b.kind() == kind => Ok(Ndarray::from_buffer((*b).clone())),
            Operand::Buffer(b) => Ok(Ndarray::from_buffer(TypedBuffer::from_buffer(kind, b))),
            Operand::Nested(n) => Ndarray::from_nested(n.clone(), kind),
        }
    }

    /// Values in logical order, without coercion.
    pub(crate) fn flatten(&self) -> Vec<Number> {
        match self {
            Operand::Scalar(v) => vec![*v],
            Operand::Array(a) => a.to_vec(),
            Operand::Buffer(b) => b.to_vec(),
            Operand::Nested(n) => n.flatten(),
        }
    }
}

impl From<Number> for Operand<'_> {
    fn from(v: Number) -> Self {
        Operand::Scalar(v)
    }
}

macro_rules! impl_operand_from_scalar {
    ($($t:ty),*) => {
        $(
            impl From<$t> for Operand<'_> {
                #[inline]
                fn from(v: $t) -> Self {
                    Operand::Scalar(Number::from(v))
                }
            }
        )*
    };
}

impl_operand_from_scalar!(i8, i16, i32, i64, isize, u8, u16, u32, usize, f32, f64, bool);

impl<'a> From<&'a Ndarray> for Operand<'a> {
    fn from(a: &'a Ndarray) -> Self {
        Operand::Array(a)
    }
}

impl<'a> From<&'a TypedBuffer> for Operand<'a> {
    fn from(b: &'a TypedBuffer) -> Self {
        Operand::Buffer(b)
    }
}

impl From<Nested> for Operand<'_> {
    fn from(n: Nested) -> Self {
        Operand::Nested(n)
    }
}

impl<T: Into<Nested>> From<Vec<T>> for Operand<'_> {
    fn from(items: Vec<T>) -> Self {
        Operand::Nested(Nested::from(items))
    }
}

impl<T: Into<Nested>, const N: usize> From<[T; N]> for Operand<'_> {
    fn from(items: [T; N]) -> Self {
        Operand::Nested(Nested::from(items))
    }
}

impl<T: Into<Nested> + Copy> From<&[T]> for Operand<'_> {
    fn from(items: &[T]) -> Self {
        Operand::Nested(Nested::List(items.iter().map(|&v| v.into()).collect()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_kind_array_is_aliased() {
        let a = Ndarray::zeros(&[2, 2], ElementKind::Int16);
        let converted = Operand::from(&a).to_ndarray(ElementKind::Int16).unwrap();
        assert!(converted.shares_buffer(&a));

        let widened = Operand::from(&a).to_ndarray(ElementKind::Float64).unwrap();
        assert!(!widened.shares_buffer(&a));
        assert_eq!(widened.shape(), &[2, 2]);
    }

    #[test]
    fn test_nested_conversion_validates() {
        let ok = Operand::from(vec![vec![1.5, 2.5]])
            .to_ndarray(ElementKind::Int8)
            .unwrap();
        assert_eq!(ok.shape(), &[1, 2]);
        assert_eq!(ok.item(&[0, 1]).unwrap(), Number::Int(2));

        let ragged = Operand::from(vec![vec![1], vec![2, 3]]);
        assert!(ragged
            .to_ndarray(ElementKind::Int8)
            .unwrap_err()
            .is_shape_error());
    }

    #[test]
    fn test_buffer_operand() {
        let buf = TypedBuffer::from_values(ElementKind::Uint8, [1, 2, 3]);
        let op = Operand::from(&buf);
        assert_eq!(op.flatten().len(), 3);
        assert!(op.to_ndarray(ElementKind::Uint8).unwrap().data().same_backing(&buf));
    }
}
