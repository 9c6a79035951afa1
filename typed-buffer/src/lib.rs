//! Fixed-width typed element buffers over shared byte storage.
//!
//! This crate is the storage layer underneath `strided-ndarray`. It models a
//! flat run of homogeneous numeric elements whose bytes live in a shared,
//! fixed-size [`ArrayBuffer`].
//!
//! # Core Types
//!
//! - [`ElementKind`]: The nine supported element encodings and their coercion rules
//! - [`Number`]: A decoded element value (integer or floating point)
//! - [`ArrayBuffer`]: Reference-counted byte storage that is never resized
//! - [`TypedBuffer`]: A kind + length window over an [`ArrayBuffer`]
//!
//! # Aliasing
//!
//! Buffers created with [`TypedBuffer::subarray`] or [`TypedBuffer::view`] share
//! bytes with their origin. A write through any alias is visible through all
//! others. Buffers created from a size, a list of values or another buffer own
//! a fresh allocation.
//!
//! # Example
//!
//! ```rust
//! use typed_buffer::{ElementKind, Number, TypedBuffer};
//!
//! let buf = TypedBuffer::from_values(ElementKind::Int8, [1, 2, 3, 4]);
//! let mut tail = buf.subarray(2, 4).unwrap();
//!
//! tail.set(0, 200).unwrap();
//! assert_eq!(buf.get(2).unwrap(), Number::Int(-56));
//! ```

mod buffer;
mod kind;
mod number;

pub use buffer::{ArrayBuffer, BulkSource, TypedBuffer};
pub use kind::ElementKind;
pub use number::Number;

// ============================================================================
// Error types
// ============================================================================

/// Errors that can occur during typed buffer operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BufferError {
    /// Element index outside `[0, len)`.
    #[error("index {index} out of range for length {len}")]
    Index { index: usize, len: usize },

    /// A requested span does not fit inside the addressed storage.
    #[error("range {begin}..{end} out of bounds for length {len}")]
    Range { begin: usize, end: usize, len: usize },

    /// Byte offset or byte length is not a whole number of elements.
    #[error("byte offset {offset} is not a multiple of element size {size}")]
    Misaligned { offset: usize, size: usize },

    /// Integer kind code without a matching [`ElementKind`].
    #[error("unsupported element kind code {0}")]
    UnsupportedKind(u8),
}

impl BufferError {
    /// True for errors describing a span outside its storage.
    pub fn is_range_error(&self) -> bool {
        matches!(self, BufferError::Range { .. } | BufferError::Misaligned { .. })
    }
}

/// Result type for typed buffer operations.
pub type Result<T> = std::result::Result<T, BufferError>;
