//! The [`Ndarray`] type: construction, metadata and shape operations.
//!
//! An `Ndarray` owns a handle to one [`TypedBuffer`] and a shape/stride table.
//! Element `(i0, i1, ...)` lives at buffer index `Σ ik * strides[k]`.
//! Freshly allocated arrays are row-major; [`Ndarray::swapaxes`] produces
//! views whose strides are not.

use std::sync::Arc;

use typed_buffer::{ElementKind, Number, TypedBuffer};

use crate::nested::Nested;
use crate::util::{extent, is_contiguous, row_major_strides, total_len, Offsets};
use crate::{NdarrayError, Result};

/// Strided N-dimensional array over a [`TypedBuffer`].
///
/// Views ([`view`](Ndarray::view), [`reshape`](Ndarray::reshape),
/// [`swapaxes`](Ndarray::swapaxes), partial indexing) share the buffer with
/// their origin: writes through either are visible through both. Shape
/// changes on a view never affect its origin.
pub struct Ndarray {
    data: TypedBuffer,
    dims: Arc<[usize]>,
    strides: Arc<[usize]>,
}

impl std::fmt::Debug for Ndarray {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Ndarray")
            .field("kind", &self.data.kind())
            .field("dims", &self.dims)
            .field("strides", &self.strides)
            .finish()
    }
}

impl Ndarray {
    /// Assemble from parts that already satisfy the layout invariant.
    pub(crate) fn from_parts(data: TypedBuffer, dims: &[usize], strides: &[usize]) -> Self {
        debug_assert!(extent(dims, strides) <= data.len());
        Self {
            data,
            dims: Arc::from(dims),
            strides: Arc::from(strides),
        }
    }

    /// Fresh row-major array holding `values` in logical order.
    pub(crate) fn from_logical(values: Vec<Number>, dims: &[usize], kind: ElementKind) -> Self {
        let data = TypedBuffer::from_values(kind, values);
        Self::from_parts(data, dims, &row_major_strides(dims))
    }

    /// Zero-filled row-major array.
    pub fn zeros(dims: &[usize], kind: ElementKind) -> Self {
        let total = total_len(dims);
        log::trace!("Ndarray::zeros: dims={dims:?} kind={kind} total={total}");
        Self::from_parts(TypedBuffer::new(kind, total), dims, &row_major_strides(dims))
    }

    /// Freshly allocated array. Storage is always zero-initialised, so this
    /// is the same as [`Ndarray::zeros`].
    pub fn empty(dims: &[usize], kind: ElementKind) -> Self {
        Self::zeros(dims, kind)
    }

    /// Like [`Ndarray::zeros`], with the kind given as an integer dtype code.
    pub fn from_code_shape(dims: &[usize], code: u8) -> Result<Self> {
        Ok(Self::zeros(dims, ElementKind::from_code(code)?))
    }

    /// Rank-1 array aliasing `buffer`.
    pub fn from_buffer(buffer: TypedBuffer) -> Self {
        let len = buffer.len();
        Self::from_parts(buffer, &[len], &[1])
    }

    /// Fresh rank-1 array of `values`.
    pub fn from_values<I, T>(values: I, kind: ElementKind) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<Number>,
    {
        Self::from_buffer(TypedBuffer::from_values(kind, values))
    }

    /// Build from a nested list. The shape is the list's nesting widths and the
    /// values are stored depth-first. A bare scalar becomes a one-element
    /// rank-1 array.
    pub fn from_nested(nested: impl Into<Nested>, kind: ElementKind) -> Result<Self> {
        let nested = nested.into();
        let mut dims = nested.shape()?;
        if dims.is_empty() {
            dims.push(1);
        }
        log::trace!("Ndarray::from_nested: dims={dims:?} kind={kind}");
        Ok(Self::from_logical(nested.flatten(), &dims, kind))
    }

    // ------------------------------------------------------------------
    // Metadata
    // ------------------------------------------------------------------

    #[inline]
    pub fn shape(&self) -> &[usize] {
        &self.dims
    }

    #[inline]
    pub fn strides(&self) -> &[usize] {
        &self.strides
    }

    #[inline]
    pub fn ndim(&self) -> usize {
        self.dims.len()
    }

    /// Total number of elements.
    #[inline]
    pub fn size(&self) -> usize {
        total_len(&self.dims)
    }

    /// Length of axis 0 (0 for a rank-0 array).
    #[inline]
    pub fn len(&self) -> usize {
        self.dims.first().copied().unwrap_or(0)
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.size() == 0
    }

    #[inline]
    pub fn kind(&self) -> ElementKind {
        self.data.kind()
    }

    /// Shared access to the underlying buffer.
    #[inline]
    pub fn data(&self) -> &TypedBuffer {
        &self.data
    }

    pub(crate) fn data_mut(&mut self) -> &mut TypedBuffer {
        &mut self.data
    }

    /// Whether the strides are row-major for the current shape.
    pub fn is_contiguous(&self) -> bool {
        is_contiguous(&self.dims, &self.strides)
    }

    /// Whether `self` and `other` share backing storage.
    pub fn shares_buffer(&self, other: &Ndarray) -> bool {
        self.data.same_backing(&other.data)
    }

    /// Buffer offsets of every element in logical order.
    pub(crate) fn offsets(&self) -> Offsets {
        Offsets::new(&self.dims, &self.strides)
    }

    /// All values in logical (row-major index) order.
    pub fn to_vec(&self) -> Vec<Number> {
        let raw = self.data.to_vec();
        if self.is_contiguous() && raw.len() == self.size() {
            return raw;
        }
        self.offsets().map(|off| raw[off]).collect()
    }

    // ------------------------------------------------------------------
    // Shape operations
    // ------------------------------------------------------------------

    fn checked_shape(&self, dims: &[usize]) -> Result<Vec<usize>> {
        let from = self.size();
        let to = total_len(dims);
        if from != to {
            return Err(NdarrayError::SizeChanged { from, to });
        }
        if !self.is_contiguous() {
            return Err(NdarrayError::NotContiguous {
                dims: self.dims.to_vec(),
                strides: self.strides.to_vec(),
            });
        }
        Ok(row_major_strides(dims))
    }

    /// Change the shape in place. The element count must not change.
    pub fn setshape(&mut self, dims: &[usize]) -> Result<()> {
        let strides = self.checked_shape(dims)?;
        self.dims = Arc::from(dims);
        self.strides = Arc::from(strides);
        Ok(())
    }

    /// A view with a new shape. The element count must not change.
    pub fn reshape(&self, dims: &[usize]) -> Result<Ndarray> {
        let strides = self.checked_shape(dims)?;
        Ok(Self::from_parts(self.data.clone(), dims, &strides))
    }

    /// A view with identical shape and strides.
    pub fn view(&self) -> Ndarray {
        Self {
            data: self.data.clone(),
            dims: self.dims.clone(),
            strides: self.strides.clone(),
        }
    }

    /// A view with axes `a` and `b` exchanged. No data moves; the result is
    /// generally not contiguous.
    pub fn swapaxes(&self, a: usize, b: usize) -> Result<Ndarray> {
        let rank = self.ndim();
        for axis in [a, b] {
            if axis >= rank {
                return Err(NdarrayError::InvalidAxis { axis, rank });
            }
        }
        let mut dims = self.dims.to_vec();
        let mut strides = self.strides.to_vec();
        dims.swap(a, b);
        strides.swap(a, b);
        Ok(Self::from_parts(self.data.clone(), &dims, &strides))
    }

    // ------------------------------------------------------------------
    // Copies and fills
    // ------------------------------------------------------------------

    /// Contiguous copy with its own buffer.
    pub fn copy(&self) -> Ndarray {
        self.astype(self.kind())
    }

    /// Contiguous copy re-encoded into `kind`.
    pub fn astype(&self, kind: ElementKind) -> Ndarray {
        if self.is_contiguous() && self.data.len() == self.size() {
            let data = TypedBuffer::from_buffer(kind, &self.data);
            return Self::from_parts(data, &self.dims, &self.strides);
        }
        log::trace!(
            "Ndarray::astype: gathering strided view dims={:?} strides={:?}",
            self.dims,
            self.strides
        );
        Self::from_logical(self.to_vec(), &self.dims, kind)
    }

    /// Store `value` in every element.
    pub fn fill(&mut self, value: impl Into<Number>) -> Result<()> {
        let value = value.into();
        if self.is_contiguous() && self.data.len() == self.size() {
            self.data.fill(value);
            return Ok(());
        }
        let offsets: Vec<usize> = self.offsets().collect();
        for off in offsets {
            self.data.set(off, value)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zeros_layout() {
        let a = Ndarray::zeros(&[2, 3, 4], ElementKind::Int32);
        assert_eq!(a.shape(), &[2, 3, 4]);
        assert_eq!(a.strides(), &[12, 4, 1]);
        assert_eq!(a.data().len(), 24);
        assert_eq!(a.len(), 2);
        assert!(a.is_contiguous());
    }

    #[test]
    fn test_from_code_shape() {
        let a = Ndarray::from_code_shape(&[2], 0).unwrap();
        assert_eq!(a.kind(), ElementKind::Uint8Clamped);
        let err = Ndarray::from_code_shape(&[2], 12).unwrap_err();
        assert_eq!(err, NdarrayError::Buffer(typed_buffer::BufferError::UnsupportedKind(12)));
    }

    #[test]
    fn test_setshape_in_place() {
        let mut a = Ndarray::from_values(0..6, ElementKind::Int16);
        a.setshape(&[3, 2]).unwrap();
        assert_eq!(a.strides(), &[2, 1]);
        let err = a.setshape(&[4, 2]).unwrap_err();
        assert_eq!(err, NdarrayError::SizeChanged { from: 6, to: 8 });
        assert_eq!(a.shape(), &[3, 2]);
    }

    #[test]
    fn test_swapaxes_rejects_reshape() {
        let a = Ndarray::zeros(&[2, 3], ElementKind::Float32);
        let t = a.swapaxes(0, 1).unwrap();
        assert_eq!(t.strides(), &[1, 3]);
        assert!(!t.is_contiguous());
        assert!(matches!(
            t.reshape(&[6]),
            Err(NdarrayError::NotContiguous { .. })
        ));
        assert_eq!(
            a.swapaxes(0, 2).unwrap_err(),
            NdarrayError::InvalidAxis { axis: 2, rank: 2 }
        );
    }

    #[test]
    fn test_astype_gathers_transposed() {
        let a = Ndarray::from_nested([[1, 2, 3], [4, 5, 6]], ElementKind::Int32).unwrap();
        let t = a.swapaxes(0, 1).unwrap().astype(ElementKind::Float64);
        assert!(t.is_contiguous());
        assert!(!t.shares_buffer(&a));
        let flat: Vec<f64> = t.to_vec().into_iter().map(|v| v.as_f64()).collect();
        assert_eq!(flat, vec![1.0, 4.0, 2.0, 5.0, 3.0, 6.0]);
    }

    #[test]
    fn test_fill_through_transposed_view() {
        let a = Ndarray::zeros(&[2, 2], ElementKind::Uint8);
        let mut t = a.swapaxes(0, 1).unwrap();
        t.fill(300).unwrap();
        assert!(a.to_vec().iter().all(|&v| v == Number::Int(44)));
    }
}
