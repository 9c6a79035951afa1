//! Element and sub-array access.
//!
//! A full-rank index addresses one element at `Σ index[i] * strides[i]`. A
//! shorter index addresses the sub-array of the remaining axes, returned as a
//! view over the buffer range it spans.

use typed_buffer::Number;

use crate::operand::Operand;
use crate::util::extent;
use crate::view::Ndarray;
use crate::{NdarrayError, Result};

/// A scalar or an array: the result of indexing, iteration and
/// [`Ndarray::matmul`].
#[derive(Debug)]
pub enum Element {
    Scalar(Number),
    Array(Ndarray),
}

impl Element {
    pub fn as_scalar(&self) -> Option<Number> {
        match self {
            Element::Scalar(v) => Some(*v),
            Element::Array(_) => None,
        }
    }

    pub fn as_array(&self) -> Option<&Ndarray> {
        match self {
            Element::Scalar(_) => None,
            Element::Array(a) => Some(a),
        }
    }

    pub fn into_array(self) -> Option<Ndarray> {
        match self {
            Element::Scalar(_) => None,
            Element::Array(a) => Some(a),
        }
    }
}

impl Ndarray {
    /// Buffer offset of `index`, checking every coordinate against its axis.
    fn locate(&self, index: &[usize]) -> Result<usize> {
        let ndim = self.ndim();
        if index.len() > ndim {
            return Err(NdarrayError::IndexRank {
                given: index.len(),
                ndim,
            });
        }
        let mut offset = 0usize;
        for (axis, ((&i, &dim), &stride)) in index
            .iter()
            .zip(self.shape())
            .zip(self.strides())
            .enumerate()
        {
            if i >= dim {
                return Err(NdarrayError::Index {
                    axis,
                    index: i,
                    dim,
                });
            }
            offset += i * stride;
        }
        Ok(offset)
    }

    /// Scalar for a full-rank index, aliasing view for a shorter one.
    pub fn get(&self, index: &[usize]) -> Result<Element> {
        if index.len() == self.ndim() {
            self.item(index).map(Element::Scalar)
        } else {
            self.subview(index).map(Element::Array)
        }
    }

    /// The element at a full-rank index.
    pub fn item(&self, index: &[usize]) -> Result<Number> {
        if index.len() != self.ndim() {
            return Err(NdarrayError::IndexRank {
                given: index.len(),
                ndim: self.ndim(),
            });
        }
        let offset = self.locate(index)?;
        Ok(self.data().get(offset)?)
    }

    /// View of the sub-array at a partial index.
    ///
    /// The view covers buffer elements `[begin, begin + extent)` where `begin`
    /// is the offset of `index`; for row-major arrays the extent is the stride
    /// of the last indexed axis.
    pub fn subview(&self, index: &[usize]) -> Result<Ndarray> {
        if index.len() >= self.ndim() {
            return Err(NdarrayError::IndexRank {
                given: index.len(),
                ndim: self.ndim(),
            });
        }
        let begin = self.locate(index)?;
        let dims = &self.shape()[index.len()..];
        let strides = &self.strides()[index.len()..];
        let data = self.data().subarray(begin, begin + extent(dims, strides))?;
        Ok(Ndarray::from_parts(data, dims, strides))
    }

    /// Write at `index`.
    ///
    /// A full-rank index takes a scalar. A partial index takes a nested list,
    /// another array, a buffer or a flat sequence (copied in logical order),
    /// or a scalar (stored in every element of the sub-array).
    pub fn set<'a>(&mut self, index: &[usize], value: impl Into<Operand<'a>>) -> Result<()> {
        let value = value.into();
        if index.len() == self.ndim() {
            let offset = self.locate(index)?;
            let Operand::Scalar(v) = value else {
                return Err(NdarrayError::NotScalar);
            };
            self.data_mut().set(offset, v)?;
            return Ok(());
        }
        let mut target = self.subview(index)?;
        target.assign(value)
    }

    /// Write every element: a scalar fills, anything else is flattened and
    /// copied in logical order.
    pub fn set_all<'a>(&mut self, values: impl Into<Operand<'a>>) -> Result<()> {
        self.assign(values.into())
    }

    fn assign(&mut self, value: Operand<'_>) -> Result<()> {
        if let Operand::Scalar(v) = value {
            return self.fill(v);
        }
        let values = value.flatten();
        if self.is_contiguous() && self.data().len() == self.size() {
            self.data_mut().set_bulk(values, 0)?;
            return Ok(());
        }
        let size = self.size();
        if values.len() > size {
            return Err(typed_buffer::BufferError::Range {
                begin: 0,
                end: values.len(),
                len: size,
            }
            .into());
        }
        let offsets: Vec<usize> = self.offsets().collect();
        for (off, v) in offsets.into_iter().zip(values) {
            self.data_mut().set(off, v)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use typed_buffer::ElementKind;

    fn arange(dims: &[usize]) -> Ndarray {
        let total: usize = dims.iter().product();
        let mut a = Ndarray::from_values(0..total as i64, ElementKind::Int32);
        a.setshape(dims).unwrap();
        a
    }

    #[test]
    fn test_full_rank_item() {
        let a = arange(&[2, 3]);
        assert_eq!(a.item(&[1, 2]).unwrap(), Number::Int(5));
        assert_eq!(
            a.item(&[2, 0]).unwrap_err(),
            NdarrayError::Index {
                axis: 0,
                index: 2,
                dim: 2
            }
        );
        assert!(a.item(&[1]).unwrap_err().is_index_error());
    }

    #[test]
    fn test_partial_index_range() {
        let a = arange(&[2, 3, 4]);
        let v = a.subview(&[1, 2]).unwrap();
        assert_eq!(v.shape(), &[4]);
        assert_eq!(v.data().byte_offset(), 20 * 4);
        assert_eq!(v.data().len(), 4);
        assert_eq!(v.item(&[0]).unwrap(), Number::Int(20));
    }

    #[test]
    fn test_scalar_index_on_matrix_is_row_view() {
        let a = arange(&[3, 2]);
        let row = a.get(&[1]).unwrap().into_array().unwrap();
        assert_eq!(row.shape(), &[2]);
        assert!(row.shares_buffer(&a));
        assert_eq!(row.item(&[1]).unwrap(), Number::Int(3));
    }

    #[test]
    fn test_partial_index_on_transposed_view() {
        let a = arange(&[2, 3]);
        let t = a.swapaxes(0, 1).unwrap();
        let col = t.subview(&[1]).unwrap();
        assert_eq!(col.shape(), &[2]);
        assert_eq!(col.strides(), &[3]);
        let vals: Vec<i64> = col.to_vec().into_iter().map(|v| v.as_i64()).collect();
        assert_eq!(vals, vec![1, 4]);
    }

    #[test]
    fn test_set_rejects_sequence_for_element() {
        let mut a = arange(&[2, 2]);
        assert_eq!(
            a.set(&[0, 0], vec![1, 2]).unwrap_err(),
            NdarrayError::NotScalar
        );
    }

    #[test]
    fn test_set_too_long_is_range_error() {
        let mut a = arange(&[2, 2]);
        let err = a.set(&[0], vec![1, 2, 3]).unwrap_err();
        assert!(err.is_range_error());

        let mut t = a.swapaxes(0, 1).unwrap();
        assert!(t.set(&[0], vec![1, 2, 3]).unwrap_err().is_range_error());
    }
}
