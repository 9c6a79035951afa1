//! Element kinds and their encode/decode rules.
//!
//! Each [`ElementKind`] fixes a byte width, a write-coercion rule applied to
//! every stored value, and a read rule (integral kinds decode to
//! [`Number::Int`], floating kinds to [`Number::Float`]). The coercion policy is
//! fixed; there is no runtime switch.

use std::fmt;

use bytemuck::Pod;

use crate::number::Number;
use crate::{BufferError, Result};

/// One of the nine fixed-width numeric encodings.
///
/// The discriminants are the integer dtype codes accepted by
/// [`ElementKind::from_code`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum ElementKind {
    /// Unsigned 8-bit, clamped to `[0, 255]` on write.
    Uint8Clamped = 0,
    Uint8 = 1,
    Uint16 = 2,
    Uint32 = 3,
    Int8 = 4,
    Int16 = 5,
    Int32 = 6,
    Float32 = 7,
    #[default]
    Float64 = 8,
}

impl ElementKind {
    /// All kinds in code order.
    pub const ALL: [ElementKind; 9] = [
        ElementKind::Uint8Clamped,
        ElementKind::Uint8,
        ElementKind::Uint16,
        ElementKind::Uint32,
        ElementKind::Int8,
        ElementKind::Int16,
        ElementKind::Int32,
        ElementKind::Float32,
        ElementKind::Float64,
    ];

    /// Resolve an integer dtype code (`0..=8`).
    pub fn from_code(code: u8) -> Result<Self> {
        Self::ALL
            .get(code as usize)
            .copied()
            .ok_or(BufferError::UnsupportedKind(code))
    }

    #[inline]
    pub fn code(self) -> u8 {
        self as u8
    }

    #[inline]
    pub fn bytes_per_element(self) -> usize {
        match self {
            ElementKind::Uint8Clamped | ElementKind::Uint8 | ElementKind::Int8 => 1,
            ElementKind::Uint16 | ElementKind::Int16 => 2,
            ElementKind::Uint32 | ElementKind::Int32 | ElementKind::Float32 => 4,
            ElementKind::Float64 => 8,
        }
    }

    #[inline]
    pub fn is_float(self) -> bool {
        matches!(self, ElementKind::Float32 | ElementKind::Float64)
    }

    #[inline]
    pub fn is_integral(self) -> bool {
        !self.is_float()
    }

    /// Name of the matching JavaScript typed array.
    pub fn name(self) -> &'static str {
        match self {
            ElementKind::Uint8Clamped => "Uint8ClampedArray",
            ElementKind::Uint8 => "Uint8Array",
            ElementKind::Uint16 => "Uint16Array",
            ElementKind::Uint32 => "Uint32Array",
            ElementKind::Int8 => "Int8Array",
            ElementKind::Int16 => "Int16Array",
            ElementKind::Int32 => "Int32Array",
            ElementKind::Float32 => "Float32Array",
            ElementKind::Float64 => "Float64Array",
        }
    }

    /// The value that reads back after storing `value` in this kind.
    pub fn coerce(self, value: Number) -> Number {
        let mut scratch = [0u8; 8];
        let width = self.bytes_per_element();
        self.encode(value, &mut scratch[..width]);
        self.decode(&scratch[..width])
    }

    /// The zero value in this kind's decoded representation.
    pub fn zero(self) -> Number {
        if self.is_float() {
            Number::Float(0.0)
        } else {
            Number::Int(0)
        }
    }

    /// Write `value` into `out` (exactly `bytes_per_element` bytes).
    pub(crate) fn encode(self, value: Number, out: &mut [u8]) {
        match self {
            ElementKind::Uint8Clamped => store(out, clamp_u8(value)),
            ElementKind::Uint8 => store(out, wrap_bits(value, 8) as u8),
            ElementKind::Uint16 => store(out, wrap_bits(value, 16) as u16),
            ElementKind::Uint32 => store(out, wrap_bits(value, 32) as u32),
            ElementKind::Int8 => store(out, wrap_bits(value, 8) as u8 as i8),
            ElementKind::Int16 => store(out, wrap_bits(value, 16) as u16 as i16),
            ElementKind::Int32 => store(out, wrap_bits(value, 32) as u32 as i32),
            ElementKind::Float32 => store(out, value.as_f64() as f32),
            ElementKind::Float64 => store(out, value.as_f64()),
        }
    }

    /// Read one element from `bytes` (exactly `bytes_per_element` bytes).
    pub(crate) fn decode(self, bytes: &[u8]) -> Number {
        match self {
            ElementKind::Uint8Clamped | ElementKind::Uint8 => Number::Int(load::<u8>(bytes) as i64),
            ElementKind::Uint16 => Number::Int(load::<u16>(bytes) as i64),
            ElementKind::Uint32 => Number::Int(load::<u32>(bytes) as i64),
            ElementKind::Int8 => Number::Int(load::<i8>(bytes) as i64),
            ElementKind::Int16 => Number::Int(load::<i16>(bytes) as i64),
            ElementKind::Int32 => Number::Int(load::<i32>(bytes) as i64),
            ElementKind::Float32 => Number::Float(load::<f32>(bytes) as f64),
            ElementKind::Float64 => Number::Float(load::<f64>(bytes)),
        }
    }
}

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl TryFrom<u8> for ElementKind {
    type Error = BufferError;

    fn try_from(code: u8) -> Result<Self> {
        ElementKind::from_code(code)
    }
}

#[inline]
fn store<T: Pod>(out: &mut [u8], value: T) {
    out.copy_from_slice(bytemuck::bytes_of(&value));
}

#[inline]
fn load<T: Pod>(bytes: &[u8]) -> T {
    bytemuck::pod_read_unaligned(bytes)
}

/// Clamp into `[0, 255]`, then truncate. NaN stores as 0.
fn clamp_u8(value: Number) -> u8 {
    match value {
        Number::Int(v) => v.clamp(0, 255) as u8,
        Number::Float(v) if v.is_nan() => 0,
        Number::Float(v) => v.clamp(0.0, 255.0) as u8,
    }
}

/// Reduce `value` modulo `2^bits` (`bits <= 32`).
///
/// Floats truncate toward zero first; non-finite floats become 0. The modulo
/// is taken on the exact truncated value, not on a saturated cast.
fn wrap_bits(value: Number, bits: u32) -> u64 {
    let mask = (1u64 << bits) - 1;
    match value {
        Number::Int(v) => (v as u64) & mask,
        Number::Float(v) if !v.is_finite() => 0,
        Number::Float(v) => v.trunc().rem_euclid((1u64 << bits) as f64) as u64,
    }
}
