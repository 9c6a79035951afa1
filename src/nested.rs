//! Nested numeric lists.

use typed_buffer::Number;

use crate::{NdarrayError, Result};

/// A scalar or an arbitrarily nested list of values.
///
/// Used to build arrays with [`crate::Ndarray::from_nested`] and returned by
/// [`crate::Ndarray::tolist`].
///
/// ```rust
/// use strided_ndarray::Nested;
///
/// let n = Nested::from([[1, 2, 3], [4, 5, 6]]);
/// assert_eq!(n.shape().unwrap(), vec![2, 3]);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum Nested {
    Scalar(Number),
    List(Vec<Nested>),
}

impl Nested {
    /// Values in depth-first order. No shape validation.
    pub fn flatten(&self) -> Vec<Number> {
        let mut out = Vec::new();
        self.flatten_into(&mut out);
        out
    }

    fn flatten_into(&self, out: &mut Vec<Number>) {
        match self {
            Nested::Scalar(v) => out.push(*v),
            Nested::List(items) => {
                for item in items {
                    item.flatten_into(out);
                }
            }
        }
    }

    /// Widths at each nesting level. A scalar has an empty shape.
    ///
    /// Fails with [`NdarrayError::RaggedNesting`] when siblings differ in
    /// length or mix scalars and lists.
    pub fn shape(&self) -> Result<Vec<usize>> {
        self.shape_at(0)
    }

    fn shape_at(&self, depth: usize) -> Result<Vec<usize>> {
        let items = match self {
            Nested::Scalar(_) => return Ok(vec![]),
            Nested::List(items) => items,
        };
        let mut inner: Option<Vec<usize>> = None;
        for item in items {
            let sub = item.shape_at(depth + 1)?;
            match &inner {
                None => inner = Some(sub),
                Some(prev) if *prev != sub => {
                    return Err(NdarrayError::RaggedNesting { depth: depth + 1 })
                }
                Some(_) => {}
            }
        }
        let mut shape = vec![items.len()];
        shape.extend(inner.unwrap_or_default());
        Ok(shape)
    }

    pub fn as_scalar(&self) -> Option<Number> {
        match self {
            Nested::Scalar(v) => Some(*v),
            Nested::List(_) => None,
        }
    }
}

impl From<Number> for Nested {
    fn from(v: Number) -> Self {
        Nested::Scalar(v)
    }
}

macro_rules! impl_nested_from_scalar {
    ($($t:ty),*) => {
        $(
            impl From<$t> for Nested {
                #[inline]
                fn from(v: $t) -> Self {
                    Nested::Scalar(Number::from(v))
                }
            }
        )*
    };
}

impl_nested_from_scalar!(i8, i16, i32, i64, isize, u8, u16, u32, usize, f32, f64, bool);

impl<T: Into<Nested>> From<Vec<T>> for Nested {
    fn from(items: Vec<T>) -> Self {
        Nested::List(items.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Nested>, const N: usize> From<[T; N]> for Nested {
    fn from(items: [T; N]) -> Self {
        Nested::List(items.into_iter().map(Into::into).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flatten_depth_first() {
        let n = Nested::from(vec![vec![vec![1, 2], vec![3, 4]], vec![vec![5, 6], vec![7, 8]]]);
        let flat: Vec<i64> = n.flatten().into_iter().map(|v| v.as_i64()).collect();
        assert_eq!(flat, vec![1, 2, 3, 4, 5, 6, 7, 8]);
        assert_eq!(n.shape().unwrap(), vec![2, 2, 2]);
    }

    #[test]
    fn test_scalar_and_empty_shapes() {
        assert_eq!(Nested::from(3.5).shape().unwrap(), Vec::<usize>::new());
        assert_eq!(Nested::from(Vec::<f64>::new()).shape().unwrap(), vec![0]);
    }

    #[test]
    fn test_ragged_rejected() {
        let n = Nested::from(vec![vec![1, 2], vec![3]]);
        assert_eq!(n.shape(), Err(NdarrayError::RaggedNesting { depth: 1 }));

        let mixed = Nested::List(vec![Nested::from(1), Nested::from([2, 3])]);
        assert!(mixed.shape().unwrap_err().is_shape_error());
    }
}
