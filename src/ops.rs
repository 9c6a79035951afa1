//! Elementwise arithmetic, comparison and bitwise operators.
//!
//! Every binary operator follows one policy:
//! - a scalar right operand is applied to every element;
//! - anything else is converted once to an array of the left operand's kind
//!   and must have exactly the same shape, otherwise
//!   [`NdarrayError::IncompatibleShapes`] is returned.
//!
//! Allocating forms return a fresh row-major array of the left operand's kind
//! (comparisons return [`ElementKind::Uint8`] holding 0/1). The `*_inplace`
//! forms write through the left operand's strides and return it.

use typed_buffer::{ElementKind, Number};

use crate::operand::Operand;
use crate::view::Ndarray;
use crate::{NdarrayError, Result};

// ============================================================================
// Scalar rules
// ============================================================================

/// Elementwise arithmetic and bitwise operations on decoded values.
///
/// Integer `+ - *` wrap in `i64`; a float operand promotes to `f64`. `/` is
/// always true division. `//` and `%` use floor semantics (the remainder takes
/// the divisor's sign); integer division by zero falls back to `f64` and so
/// yields ±inf or NaN. Integer powers with a non-negative exponent wrap;
/// negative exponents go through `f64`.
///
/// Bitwise operators truncate to `i64`. Shift counts `>= 64` saturate (`<<`
/// gives 0, `>>` gives the sign fill) and negative counts shift by 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    FloorDiv,
    Rem,
    Pow,
    BitAnd,
    BitOr,
    BitXor,
    Shl,
    Shr,
}

impl BinaryOp {
    pub fn apply(self, a: Number, b: Number) -> Number {
        use Number::{Float, Int};
        match (self, a, b) {
            (BinaryOp::Add, Int(x), Int(y)) => Int(x.wrapping_add(y)),
            (BinaryOp::Sub, Int(x), Int(y)) => Int(x.wrapping_sub(y)),
            (BinaryOp::Mul, Int(x), Int(y)) => Int(x.wrapping_mul(y)),
            (BinaryOp::FloorDiv, Int(x), Int(y)) if y != 0 => Int(floor_div_i64(x, y)),
            (BinaryOp::Rem, Int(x), Int(y)) if y != 0 => Int(floor_rem_i64(x, y)),
            (BinaryOp::Pow, Int(x), Int(y)) if y >= 0 => {
                Int(wrapping_pow_i64(x, y.unsigned_abs()))
            }
            (BinaryOp::BitAnd, _, _) => Int(a.as_i64() & b.as_i64()),
            (BinaryOp::BitOr, _, _) => Int(a.as_i64() | b.as_i64()),
            (BinaryOp::BitXor, _, _) => Int(a.as_i64() ^ b.as_i64()),
            (BinaryOp::Shl, _, _) => Int(shift_left(a.as_i64(), b.as_i64())),
            (BinaryOp::Shr, _, _) => Int(shift_right(a.as_i64(), b.as_i64())),
            (op, _, _) => Float(op.apply_f64(a.as_f64(), b.as_f64())),
        }
    }

    fn apply_f64(self, x: f64, y: f64) -> f64 {
        match self {
            BinaryOp::Add => x + y,
            BinaryOp::Sub => x - y,
            BinaryOp::Mul => x * y,
            BinaryOp::Div => x / y,
            BinaryOp::FloorDiv => floor_div_f64(x, y),
            BinaryOp::Rem => floor_rem_f64(x, y),
            BinaryOp::Pow => x.powf(y),
            // Bitwise ops never reach the float path.
            BinaryOp::BitAnd
            | BinaryOp::BitOr
            | BinaryOp::BitXor
            | BinaryOp::Shl
            | BinaryOp::Shr => f64::NAN,
        }
    }
}

/// `x ** exp` by repeated squaring, wrapping in `i64`.
fn wrapping_pow_i64(mut base: i64, mut exp: u64) -> i64 {
    let mut acc: i64 = 1;
    while exp > 0 {
        if exp & 1 == 1 {
            acc = acc.wrapping_mul(base);
        }
        base = base.wrapping_mul(base);
        exp >>= 1;
    }
    acc
}

fn shift_left(x: i64, count: i64) -> i64 {
    match count {
        c if c <= 0 => x,
        c if c >= 64 => 0,
        c => x << c,
    }
}

fn shift_right(x: i64, count: i64) -> i64 {
    match count {
        c if c <= 0 => x,
        c if c >= 64 => x >> 63,
        c => x >> c,
    }
}

fn floor_div_i64(x: i64, y: i64) -> i64 {
    let q = x.wrapping_div(y);
    if x.wrapping_rem(y) != 0 && ((x < 0) != (y < 0)) {
        q - 1
    } else {
        q
    }
}

fn floor_rem_i64(x: i64, y: i64) -> i64 {
    let r = x.wrapping_rem(y);
    if r != 0 && ((r < 0) != (y < 0)) {
        r + y
    } else {
        r
    }
}

/// Floor quotient consistent with [`floor_rem_f64`], so that
/// `x == q * y + r` up to rounding.
fn floor_div_f64(x: f64, y: f64) -> f64 {
    if y == 0.0 {
        return (x / y).floor();
    }
    let r = x % y;
    let mut div = (x - r) / y;
    if r != 0.0 && ((r < 0.0) != (y < 0.0)) {
        div -= 1.0;
    }
    if div == 0.0 {
        return 0.0f64.copysign(x / y);
    }
    let q = div.floor();
    if div - q > 0.5 {
        q + 1.0
    } else {
        q
    }
}

fn floor_rem_f64(x: f64, y: f64) -> f64 {
    let r = x % y;
    if r != 0.0 && ((r < 0.0) != (y < 0.0)) {
        r + y
    } else {
        r
    }
}

/// Elementwise comparisons. NaN compares unequal to everything.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    Less,
    LessEqual,
    Equal,
    NotEqual,
    Greater,
    GreaterEqual,
}

impl CompareOp {
    pub fn apply(self, a: Number, b: Number) -> bool {
        match self {
            CompareOp::Less => a < b,
            CompareOp::LessEqual => a <= b,
            CompareOp::Equal => a == b,
            CompareOp::NotEqual => a != b,
            CompareOp::Greater => a > b,
            CompareOp::GreaterEqual => a >= b,
        }
    }
}

// ============================================================================
// Array drivers
// ============================================================================

/// Right operand after conversion: one scalar for every element, or one value
/// per element in logical order.
enum RhsValues {
    Scalar(Number),
    Values(Vec<Number>),
}

impl RhsValues {
    #[inline]
    fn at(&self, i: usize) -> Number {
        match self {
            RhsValues::Scalar(s) => *s,
            RhsValues::Values(values) => values[i],
        }
    }
}

impl Ndarray {
    fn ensure_same_shape(&self, other: &Ndarray) -> Result<()> {
        if self.shape() != other.shape() {
            return Err(NdarrayError::IncompatibleShapes(
                self.shape().to_vec(),
                other.shape().to_vec(),
            ));
        }
        Ok(())
    }

    fn operand_values(&self, rhs: Operand<'_>) -> Result<RhsValues> {
        if let Operand::Scalar(s) = rhs {
            return Ok(RhsValues::Scalar(s));
        }
        let rhs = rhs.to_ndarray(self.kind())?;
        self.ensure_same_shape(&rhs)?;
        Ok(RhsValues::Values(rhs.to_vec()))
    }

    /// Fresh array of `kind` with `f(self[i], rhs[i])`.
    fn zip_map(
        &self,
        rhs: Operand<'_>,
        kind: ElementKind,
        f: impl Fn(Number, Number) -> Number,
    ) -> Result<Ndarray> {
        let rhs = self.operand_values(rhs)?;
        let values = self
            .to_vec()
            .into_iter()
            .enumerate()
            .map(|(i, x)| f(x, rhs.at(i)))
            .collect();
        Ok(Ndarray::from_logical(values, self.shape(), kind))
    }

    /// Fresh array with `op` applied against a scalar. Cannot fail.
    pub(crate) fn map_scalar(&self, rhs: Number, op: BinaryOp) -> Ndarray {
        let values = self.to_vec().into_iter().map(|x| op.apply(x, rhs)).collect();
        Ndarray::from_logical(values, self.shape(), self.kind())
    }

    /// Apply `op` against a scalar, storing into `self` through its strides.
    fn map_scalar_inplace(&mut self, rhs: Number, op: BinaryOp) {
        let mut in_view = vec![false; self.data().len()];
        for off in self.offsets() {
            in_view[off] = true;
        }
        self.data_mut()
            .map_in_place(|i, v| in_view[i].then(|| op.apply(v, rhs)));
    }

    fn map_unary(&self, f: impl Fn(Number) -> Number) -> Ndarray {
        let values = self.to_vec().into_iter().map(f).collect();
        Ndarray::from_logical(values, self.shape(), self.kind())
    }

    /// Apply `op` elementwise into a fresh array.
    pub fn binary<'a>(&self, rhs: impl Into<Operand<'a>>, op: BinaryOp) -> Result<Ndarray> {
        self.zip_map(rhs.into(), self.kind(), |x, y| op.apply(x, y))
    }

    /// Compare elementwise into a fresh `Uint8` array of 0/1.
    pub fn compare<'a>(&self, rhs: impl Into<Operand<'a>>, op: CompareOp) -> Result<Ndarray> {
        self.zip_map(rhs.into(), ElementKind::Uint8, |x, y| {
            Number::Int(op.apply(x, y) as i64)
        })
    }

    /// Apply `op` elementwise, storing into `self`.
    ///
    /// The right operand is read in full before the first write, so it may
    /// alias `self`.
    pub fn binary_inplace<'a>(
        &mut self,
        rhs: impl Into<Operand<'a>>,
        op: BinaryOp,
    ) -> Result<&mut Self> {
        let rhs = self.operand_values(rhs.into())?;
        let raw = self.data().to_vec();
        let offsets: Vec<usize> = self.offsets().collect();
        for (i, off) in offsets.into_iter().enumerate() {
            self.data_mut().set(off, op.apply(raw[off], rhs.at(i)))?;
        }
        Ok(self)
    }
}

macro_rules! binary_methods {
    ($($(#[$meta:meta])* $name:ident, $inplace:ident => $op:expr;)*) => {
        impl Ndarray {
            $(
                $(#[$meta])*
                pub fn $name<'a>(&self, rhs: impl Into<Operand<'a>>) -> Result<Ndarray> {
                    self.binary(rhs, $op)
                }

                $(#[$meta])*
                /// Stores into `self`.
                pub fn $inplace<'a>(&mut self, rhs: impl Into<Operand<'a>>) -> Result<&mut Self> {
                    self.binary_inplace(rhs, $op)
                }
            )*
        }
    };
}

binary_methods! {
    /// Elementwise `self + rhs`.
    add, add_inplace => BinaryOp::Add;
    /// Elementwise `self - rhs`.
    sub, sub_inplace => BinaryOp::Sub;
    /// Elementwise `self * rhs`.
    mul, mul_inplace => BinaryOp::Mul;
    /// Elementwise true division.
    div, div_inplace => BinaryOp::Div;
    /// Elementwise floor division.
    floor_div, floor_div_inplace => BinaryOp::FloorDiv;
    /// Elementwise floor remainder.
    rem, rem_inplace => BinaryOp::Rem;
    /// Elementwise power.
    pow, pow_inplace => BinaryOp::Pow;
    bitwise_and, bitwise_and_inplace => BinaryOp::BitAnd;
    bitwise_or, bitwise_or_inplace => BinaryOp::BitOr;
    bitwise_xor, bitwise_xor_inplace => BinaryOp::BitXor;
    left_shift, left_shift_inplace => BinaryOp::Shl;
    right_shift, right_shift_inplace => BinaryOp::Shr;
}

macro_rules! compare_methods {
    ($($name:ident => $op:expr;)*) => {
        impl Ndarray {
            $(
                pub fn $name<'a>(&self, rhs: impl Into<Operand<'a>>) -> Result<Ndarray> {
                    self.compare(rhs, $op)
                }
            )*
        }
    };
}

compare_methods! {
    less => CompareOp::Less;
    less_equal => CompareOp::LessEqual;
    equal => CompareOp::Equal;
    not_equal => CompareOp::NotEqual;
    greater => CompareOp::Greater;
    greater_equal => CompareOp::GreaterEqual;
}

// ============================================================================
// Unary operators
// ============================================================================

impl Ndarray {
    /// Elementwise negation into a fresh array.
    pub fn negative(&self) -> Ndarray {
        self.map_unary(|v| match v {
            Number::Int(x) => Number::Int(x.wrapping_neg()),
            Number::Float(x) => Number::Float(-x),
        })
    }

    /// Elementwise absolute value into a fresh array.
    ///
    /// Only elements `< 0` are rewritten; everything else (including `-0.0`
    /// and NaN) is copied unchanged.
    pub fn abs(&self) -> Ndarray {
        self.map_unary(|v| match v {
            Number::Int(x) if x < 0 => Number::Int(x.wrapping_neg()),
            Number::Float(x) if x < 0.0 => Number::Float(-x),
            other => other,
        })
    }

    /// Elementwise bitwise complement into a fresh array.
    pub fn bitwise_not(&self) -> Ndarray {
        self.map_unary(|v| Number::Int(!v.as_i64()))
    }

    /// Unary plus: a full copy.
    pub fn positive(&self) -> Ndarray {
        self.copy()
    }
}

// ============================================================================
// std::ops for scalar operands
// ============================================================================

macro_rules! impl_scalar_operator {
    ($trait:ident, $method:ident, $op:expr; $($t:ty),*) => {
        $(
            impl std::ops::$trait<$t> for &Ndarray {
                type Output = Ndarray;

                fn $method(self, rhs: $t) -> Ndarray {
                    self.map_scalar(Number::from(rhs), $op)
                }
            }
        )*
    };
}

impl_scalar_operator!(Add, add, BinaryOp::Add; Number, f64, i32, i64);
impl_scalar_operator!(Sub, sub, BinaryOp::Sub; Number, f64, i32, i64);
impl_scalar_operator!(Mul, mul, BinaryOp::Mul; Number, f64, i32, i64);
impl_scalar_operator!(Div, div, BinaryOp::Div; Number, f64, i32, i64);
impl_scalar_operator!(Rem, rem, BinaryOp::Rem; Number, f64, i32, i64);
impl_scalar_operator!(BitAnd, bitand, BinaryOp::BitAnd; Number, i32, i64);
impl_scalar_operator!(BitOr, bitor, BinaryOp::BitOr; Number, i32, i64);
impl_scalar_operator!(BitXor, bitxor, BinaryOp::BitXor; Number, i32, i64);
impl_scalar_operator!(Shl, shl, BinaryOp::Shl; Number, i32, i64);
impl_scalar_operator!(Shr, shr, BinaryOp::Shr; Number, i32, i64);

macro_rules! impl_scalar_assign_operator {
    ($trait:ident, $method:ident, $op:expr; $($t:ty),*) => {
        $(
            impl std::ops::$trait<$t> for Ndarray {
                fn $method(&mut self, rhs: $t) {
                    self.map_scalar_inplace(Number::from(rhs), $op);
                }
            }
        )*
    };
}

impl_scalar_assign_operator!(AddAssign, add_assign, BinaryOp::Add; Number, f64, i32, i64);
impl_scalar_assign_operator!(SubAssign, sub_assign, BinaryOp::Sub; Number, f64, i32, i64);
impl_scalar_assign_operator!(MulAssign, mul_assign, BinaryOp::Mul; Number, f64, i32, i64);
impl_scalar_assign_operator!(DivAssign, div_assign, BinaryOp::Div; Number, f64, i32, i64);
impl_scalar_assign_operator!(RemAssign, rem_assign, BinaryOp::Rem; Number, f64, i32, i64);

impl std::ops::Neg for &Ndarray {
    type Output = Ndarray;

    fn neg(self) -> Ndarray {
        self.negative()
    }
}

impl std::ops::Not for &Ndarray {
    type Output = Ndarray;

    fn not(self) -> Ndarray {
        self.bitwise_not()
    }
}
