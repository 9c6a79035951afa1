//! Shared byte storage and typed windows over it.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use crate::kind::ElementKind;
use crate::number::Number;
use crate::{BufferError, Result};

// ============================================================================
// ArrayBuffer
// ============================================================================

/// Reference-counted, fixed-size byte storage.
///
/// An `ArrayBuffer` is allocated once and never resized. Cloning it clones the
/// handle: both handles address the same bytes. Storage is not thread-safe;
/// aliases must stay on one thread.
#[derive(Clone)]
pub struct ArrayBuffer {
    bytes: Rc<RefCell<Box<[u8]>>>,
}

impl ArrayBuffer {
    /// Allocate `byte_length` zeroed bytes.
    pub fn new(byte_length: usize) -> Self {
        log::trace!("ArrayBuffer::new: byte_length={byte_length}");
        Self::from_bytes(vec![0u8; byte_length])
    }

    /// Take ownership of existing bytes, e.g. an RGBA pixel buffer.
    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        Self {
            bytes: Rc::new(RefCell::new(bytes.into_boxed_slice())),
        }
    }

    #[inline]
    pub fn byte_length(&self) -> usize {
        self.bytes.borrow().len()
    }

    /// Whether both handles address the same storage.
    #[inline]
    pub fn ptr_eq(&self, other: &ArrayBuffer) -> bool {
        Rc::ptr_eq(&self.bytes, &other.bytes)
    }

    /// Copy of the current bytes.
    pub fn to_vec(&self) -> Vec<u8> {
        self.bytes.borrow().to_vec()
    }
}

impl fmt::Debug for ArrayBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ArrayBuffer")
            .field("byte_length", &self.byte_length())
            .finish()
    }
}

// ============================================================================
// TypedBuffer
// ============================================================================

/// A run of `len` elements of one [`ElementKind`] inside an [`ArrayBuffer`].
///
/// Cloning a `TypedBuffer` clones the handle, not the elements. Use
/// [`TypedBuffer::from_buffer`] for an independent copy.
///
/// Invariant: `byte_offset + byte_length <= buffer().byte_length()`.
#[derive(Clone)]
pub struct TypedBuffer {
    kind: ElementKind,
    backing: ArrayBuffer,
    byte_offset: usize,
    len: usize,
}

/// Source of a [`TypedBuffer::set_bulk`] copy.
pub enum BulkSource<'a> {
    Buffer(&'a TypedBuffer),
    Values(Vec<Number>),
}

impl<'a> From<&'a TypedBuffer> for BulkSource<'a> {
    fn from(buffer: &'a TypedBuffer) -> Self {
        BulkSource::Buffer(buffer)
    }
}

impl<T: Into<Number>> From<Vec<T>> for BulkSource<'_> {
    fn from(values: Vec<T>) -> Self {
        BulkSource::Values(values.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Number> + Copy> From<&[T]> for BulkSource<'_> {
    fn from(values: &[T]) -> Self {
        BulkSource::Values(values.iter().map(|&v| v.into()).collect())
    }
}

impl TypedBuffer {
    /// Allocate `len` zero-initialised elements.
    pub fn new(kind: ElementKind, len: usize) -> Self {
        Self {
            kind,
            backing: ArrayBuffer::new(len * kind.bytes_per_element()),
            byte_offset: 0,
            len,
        }
    }

    /// Allocate one element per value, each stored through the kind's
    /// write coercion.
    pub fn from_values<I, T>(kind: ElementKind, values: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<Number>,
    {
        let width = kind.bytes_per_element();
        let mut bytes = Vec::new();
        let mut scratch = [0u8; 8];
        for value in values {
            kind.encode(value.into(), &mut scratch[..width]);
            bytes.extend_from_slice(&scratch[..width]);
        }
        let len = bytes.len() / width;
        Self {
            kind,
            backing: ArrayBuffer::from_bytes(bytes),
            byte_offset: 0,
            len,
        }
    }

    /// Allocate a copy of `other`, re-encoding every element into `kind`.
    pub fn from_buffer(kind: ElementKind, other: &TypedBuffer) -> Self {
        if kind == other.kind {
            let bytes = other.with_bytes(|bytes| bytes.to_vec());
            return Self {
                kind,
                backing: ArrayBuffer::from_bytes(bytes),
                byte_offset: 0,
                len: other.len,
            };
        }
        log::trace!(
            "TypedBuffer::from_buffer: converting {} elements {} -> {}",
            other.len,
            other.kind,
            kind
        );
        Self::from_values(kind, other.to_vec())
    }

    /// Zero-copy view of `backing` starting at `byte_offset`.
    ///
    /// Without `len`, the view extends to the end of `backing`, which must then
    /// hold a whole number of elements.
    pub fn view(
        kind: ElementKind,
        backing: &ArrayBuffer,
        byte_offset: usize,
        len: Option<usize>,
    ) -> Result<Self> {
        let size = kind.bytes_per_element();
        let total = backing.byte_length();
        if byte_offset % size != 0 {
            return Err(BufferError::Misaligned {
                offset: byte_offset,
                size,
            });
        }
        if byte_offset > total {
            return Err(BufferError::Range {
                begin: byte_offset,
                end: byte_offset,
                len: total,
            });
        }
        let len = match len {
            Some(len) => {
                let end = len
                    .checked_mul(size)
                    .and_then(|n| n.checked_add(byte_offset))
                    .unwrap_or(usize::MAX);
                if end > total {
                    return Err(BufferError::Range {
                        begin: byte_offset,
                        end,
                        len: total,
                    });
                }
                len
            }
            None => {
                let remaining = total - byte_offset;
                if remaining % size != 0 {
                    return Err(BufferError::Misaligned {
                        offset: total,
                        size,
                    });
                }
                remaining / size
            }
        };
        Ok(Self {
            kind,
            backing: backing.clone(),
            byte_offset,
            len,
        })
    }

    #[inline]
    pub fn kind(&self) -> ElementKind {
        self.kind
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[inline]
    pub fn bytes_per_element(&self) -> usize {
        self.kind.bytes_per_element()
    }

    #[inline]
    pub fn byte_length(&self) -> usize {
        self.len * self.kind.bytes_per_element()
    }

    #[inline]
    pub fn byte_offset(&self) -> usize {
        self.byte_offset
    }

    /// The backing storage.
    #[inline]
    pub fn buffer(&self) -> &ArrayBuffer {
        &self.backing
    }

    /// Whether `self` and `other` share backing storage.
    #[inline]
    pub fn same_backing(&self, other: &TypedBuffer) -> bool {
        self.backing.ptr_eq(&other.backing)
    }

    fn check_index(&self, index: usize) -> Result<()> {
        if index >= self.len {
            return Err(BufferError::Index {
                index,
                len: self.len,
            });
        }
        Ok(())
    }

    fn with_bytes<R>(&self, f: impl FnOnce(&[u8]) -> R) -> R {
        let bytes = self.backing.bytes.borrow();
        f(&bytes[self.byte_offset..self.byte_offset + self.byte_length()])
    }

    fn with_bytes_mut<R>(&mut self, f: impl FnOnce(&mut [u8]) -> R) -> R {
        let range = self.byte_offset..self.byte_offset + self.byte_length();
        let mut bytes = self.backing.bytes.borrow_mut();
        f(&mut bytes[range])
    }

    /// Decoded element at `index`.
    pub fn get(&self, index: usize) -> Result<Number> {
        self.check_index(index)?;
        let size = self.bytes_per_element();
        let kind = self.kind;
        Ok(self.with_bytes(|bytes| kind.decode(&bytes[index * size..(index + 1) * size])))
    }

    /// Store `value` at `index` after write coercion.
    pub fn set(&mut self, index: usize, value: impl Into<Number>) -> Result<()> {
        self.check_index(index)?;
        let size = self.bytes_per_element();
        let kind = self.kind;
        let value = value.into();
        self.with_bytes_mut(|bytes| {
            kind.encode(value, &mut bytes[index * size..(index + 1) * size]);
        });
        Ok(())
    }

    /// Copy `values` into `self` starting at element `offset`.
    ///
    /// Nothing is written when the copy would overrun `len`. Overlapping
    /// aliases are handled as if the source were copied out first.
    pub fn set_bulk<'a>(
        &mut self,
        values: impl Into<BulkSource<'a>>,
        offset: usize,
    ) -> Result<()> {
        let values = values.into();
        let count = match &values {
            BulkSource::Buffer(buffer) => buffer.len(),
            BulkSource::Values(values) => values.len(),
        };
        let end = offset.saturating_add(count);
        if end > self.len {
            return Err(BufferError::Range {
                begin: offset,
                end,
                len: self.len,
            });
        }
        let size = self.bytes_per_element();
        let kind = self.kind;
        match values {
            BulkSource::Buffer(src) if src.kind == kind => {
                let raw = src.with_bytes(|bytes| bytes.to_vec());
                self.with_bytes_mut(|bytes| {
                    bytes[offset * size..end * size].copy_from_slice(&raw);
                });
            }
            BulkSource::Buffer(src) => {
                let decoded = src.to_vec();
                self.write_run(offset, &decoded);
            }
            BulkSource::Values(decoded) => self.write_run(offset, &decoded),
        }
        Ok(())
    }

    fn write_run(&mut self, offset: usize, values: &[Number]) {
        let size = self.bytes_per_element();
        let kind = self.kind;
        self.with_bytes_mut(|bytes| {
            let run = &mut bytes[offset * size..(offset + values.len()) * size];
            for (chunk, &value) in run.chunks_exact_mut(size).zip(values) {
                kind.encode(value, chunk);
            }
        });
    }

    /// Store `value` in every element.
    pub fn fill(&mut self, value: impl Into<Number>) {
        let value = value.into();
        let kind = self.kind;
        let size = self.bytes_per_element();
        self.with_bytes_mut(|bytes| {
            for chunk in bytes.chunks_exact_mut(size) {
                kind.encode(value, chunk);
            }
        });
    }

    /// Rewrite elements in place: `f(index, value)` returns the new value, or
    /// `None` to leave the element's bytes untouched.
    pub fn map_in_place(&mut self, mut f: impl FnMut(usize, Number) -> Option<Number>) {
        let kind = self.kind;
        let size = self.bytes_per_element();
        self.with_bytes_mut(|bytes| {
            for (i, chunk) in bytes.chunks_exact_mut(size).enumerate() {
                if let Some(value) = f(i, kind.decode(chunk)) {
                    kind.encode(value, chunk);
                }
            }
        });
    }

    /// Alias over elements `[begin, end)`.
    pub fn subarray(&self, begin: usize, end: usize) -> Result<TypedBuffer> {
        if begin > end || end > self.len {
            return Err(BufferError::Range {
                begin,
                end,
                len: self.len,
            });
        }
        Ok(TypedBuffer {
            kind: self.kind,
            backing: self.backing.clone(),
            byte_offset: self.byte_offset + begin * self.bytes_per_element(),
            len: end - begin,
        })
    }

    /// Alias over elements `[begin, len)`.
    pub fn subarray_from(&self, begin: usize) -> Result<TypedBuffer> {
        self.subarray(begin, self.len)
    }

    /// All elements, decoded.
    pub fn to_vec(&self) -> Vec<Number> {
        let kind = self.kind;
        let size = self.bytes_per_element();
        self.with_bytes(|bytes| {
            bytes
                .chunks_exact(size)
                .map(|chunk| kind.decode(chunk))
                .collect()
        })
    }

    /// Iterate decoded elements in index order.
    pub fn iter(&self) -> impl Iterator<Item = Number> + '_ {
        (0..self.len).filter_map(move |i| self.get(i).ok())
    }
}

impl fmt::Debug for TypedBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypedBuffer")
            .field("kind", &self.kind)
            .field("len", &self.len)
            .field("byte_offset", &self.byte_offset)
            .finish()
    }
}

/// Comma-separated values, like a JavaScript typed array's `toString`.
impl fmt::Display for TypedBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, value) in self.to_vec().into_iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            write!(f, "{value}")?;
        }
        Ok(())
    }
}
