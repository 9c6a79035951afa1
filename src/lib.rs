//! N-dimensional strided arrays over fixed-width typed buffers.
//!
//! An [`Ndarray`] is a shape + stride table over exactly one
//! [`TypedBuffer`]. Views produced by [`Ndarray::view`], [`Ndarray::reshape`],
//! [`Ndarray::swapaxes`] and partial indexing alias the same storage; arrays
//! produced by [`Ndarray::copy`], [`Ndarray::astype`] and the elementwise
//! operators own a fresh buffer.
//!
//! # Core Types
//!
//! - [`Ndarray`]: Strided array with row-major construction and zero-copy views
//! - [`Element`]: Result of indexing, iteration and [`Ndarray::matmul`]
//!   (a scalar or an array)
//! - [`Nested`]: Nested numeric lists used for construction and `tolist`
//! - [`Operand`]: Right-hand operand of writes and binary operators
//! - [`BinaryOp`] / [`CompareOp`]: Elementwise arithmetic, bitwise and comparison rules
//!
//! # Example
//!
//! ```rust
//! use strided_ndarray::{ElementKind, Ndarray, Nested};
//!
//! let mut a = Ndarray::zeros(&[2, 2], ElementKind::Float64);
//! a.set_all([1.0, 2.0, 3.0, 4.0]).unwrap();
//!
//! let b = &a + 1.0;
//! assert_eq!(b.tolist(), Nested::from([[2.0, 3.0], [4.0, 5.0]]));
//!
//! // Transpose is a view: no data moves.
//! let t = a.swapaxes(0, 1).unwrap();
//! assert_eq!(t.item(&[1, 0]).unwrap(), a.item(&[0, 1]).unwrap());
//! ```
//!
//! # Shapes
//!
//! Binary operators accept a scalar or an operand of exactly the same shape.
//! There is no broadcasting between arrays of different shapes.

mod display;
mod index;
mod iter;
mod linalg;
mod nested;
mod ops;
mod operand;
mod util;
mod view;

pub use index::Element;
pub use iter::Iter;
pub use nested::Nested;
pub use ops::{BinaryOp, CompareOp};
pub use operand::Operand;
pub use typed_buffer::{ArrayBuffer, BufferError, ElementKind, Number, TypedBuffer};
pub use util::row_major_strides;
pub use view::Ndarray;

/// Highest rank accepted by [`Ndarray::matmul`].
pub const MAX_MATMUL_RANK: usize = 5;

// ============================================================================
// Error types
// ============================================================================

/// Errors that can occur during strided array operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NdarrayError {
    /// Element access, span or kind failure in the underlying buffer.
    #[error(transparent)]
    Buffer(#[from] BufferError),

    /// Coordinate outside its axis.
    #[error("index {index} out of range for axis {axis} with size {dim}")]
    Index { axis: usize, index: usize, dim: usize },

    /// Wrong number of coordinates for the requested access.
    #[error("{given} indices given for array of rank {ndim}")]
    IndexRank { given: usize, ndim: usize },

    /// Reshape to a different element count.
    #[error("array size cannot change: {from} -> {to}")]
    SizeChanged { from: usize, to: usize },

    /// Array-array operation on unequal shapes.
    #[error("array shapes are not compatible: {0:?} vs {1:?}")]
    IncompatibleShapes(Vec<usize>, Vec<usize>),

    /// Nested list with unequal sibling lengths.
    #[error("nested list is not rectangular at depth {depth}")]
    RaggedNesting { depth: usize },

    /// Shape change requested on a view whose strides are not row-major.
    #[error("array is not contiguous: dims={dims:?} strides={strides:?}")]
    NotContiguous { dims: Vec<usize>, strides: Vec<usize> },

    /// Invalid axis index for the given array rank.
    #[error("invalid axis {axis} for rank {rank}")]
    InvalidAxis { axis: usize, rank: usize },

    /// Operand ranks or dimensions unsupported by matmul.
    #[error("matmul shapes not aligned: {0:?} vs {1:?}")]
    MatmulShape(Vec<usize>, Vec<usize>),

    /// Non-scalar value written to a single element.
    #[error("cannot store a sequence into a single element")]
    NotScalar,
}

impl NdarrayError {
    /// Shape product, shape equality, nesting, contiguity and axis failures.
    pub fn is_shape_error(&self) -> bool {
        matches!(
            self,
            NdarrayError::SizeChanged { .. }
                | NdarrayError::IncompatibleShapes(..)
                | NdarrayError::RaggedNesting { .. }
                | NdarrayError::NotContiguous { .. }
                | NdarrayError::InvalidAxis { .. }
                | NdarrayError::MatmulShape(..)
        )
    }

    /// Out-of-range element or coordinate access.
    pub fn is_index_error(&self) -> bool {
        matches!(
            self,
            NdarrayError::Index { .. }
                | NdarrayError::IndexRank { .. }
                | NdarrayError::Buffer(BufferError::Index { .. })
        )
    }

    /// Span outside its backing storage.
    pub fn is_range_error(&self) -> bool {
        matches!(self, NdarrayError::Buffer(e) if e.is_range_error())
    }
}

/// Result type for strided array operations.
pub type Result<T> = std::result::Result<T, NdarrayError>;
