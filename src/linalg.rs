//! Dot products and batched matrix multiplication.
//!
//! Operands are addressed through their stride tables, so transposed views
//! (from [`Ndarray::swapaxes`]) need no copy. Each output element is summed in
//! an unconstrained [`Number`] (wrapping `i64` or `f64`) and coerced into the
//! destination kind once.

use num_traits::Zero;
use typed_buffer::{ElementKind, Number, TypedBuffer};

use crate::index::Element;
use crate::operand::Operand;
use crate::util::{row_major_strides, total_len, Offsets};
use crate::view::Ndarray;
use crate::{NdarrayError, Result, MAX_MATMUL_RANK};

impl Ndarray {
    /// Matrix product `self @ other`.
    ///
    /// - rank 1 × rank 1: equal lengths, returns the scalar dot product;
    /// - rank 2: `(m, k) @ (k, n) -> (m, n)`;
    /// - ranks 3 to 5: equal ranks with identical leading (batch) axes; the
    ///   rank-2 product is applied per batch index.
    ///
    /// `other` is converted to `self`'s kind first. The result has `self`'s
    /// kind.
    pub fn matmul(&self, other: &Ndarray) -> Result<Element> {
        let other = Operand::Array(other).to_ndarray(self.kind())?;
        let mismatch =
            || NdarrayError::MatmulShape(self.shape().to_vec(), other.shape().to_vec());
        match (self.ndim(), other.ndim()) {
            (1, 1) => {
                if self.shape() != other.shape() {
                    return Err(mismatch());
                }
                Ok(Element::Scalar(dot(self, &other)))
            }
            (ra, rb) if ra == rb && (2..=MAX_MATMUL_RANK).contains(&ra) => {
                let batch = &self.shape()[..ra - 2];
                let inner_mismatch = self.shape()[ra - 1] != other.shape()[rb - 2];
                if batch != &other.shape()[..rb - 2] || inner_mismatch {
                    return Err(mismatch());
                }
                log::debug!(
                    "matmul: batch={:?} {:?} @ {:?} kind={}",
                    batch,
                    &self.shape()[ra - 2..],
                    &other.shape()[rb - 2..],
                    self.kind()
                );
                Ok(Element::Array(batched_matmul(self, &other)))
            }
            _ => Err(mismatch()),
        }
    }
}

fn accumulator(kind: ElementKind) -> Number {
    if kind.is_float() {
        Number::Float(0.0)
    } else {
        Number::zero()
    }
}

#[inline]
fn mul_add(acc: Number, x: Number, y: Number) -> Number {
    let prod = match (x, y) {
        (Number::Int(a), Number::Int(b)) => Number::Int(a.wrapping_mul(b)),
        (a, b) => Number::Float(a.as_f64() * b.as_f64()),
    };
    acc + prod
}

/// `Σ a[i] * b[i]` over two rank-1 arrays of equal length.
fn dot(a: &Ndarray, b: &Ndarray) -> Number {
    a.to_vec()
        .into_iter()
        .zip(b.to_vec())
        .fold(accumulator(a.kind()), |acc, (x, y)| mul_add(acc, x, y))
}

/// Rank-2 product per batch index. Shapes must already be validated.
fn batched_matmul(a: &Ndarray, b: &Ndarray) -> Ndarray {
    let rank = a.ndim();
    let batch = &a.shape()[..rank - 2];
    let (m, k) = (a.shape()[rank - 2], a.shape()[rank - 1]);
    let n = b.shape()[rank - 1];

    let (a_batch_strides, a_mat) = a.strides().split_at(rank - 2);
    let (b_batch_strides, b_mat) = b.strides().split_at(rank - 2);
    let (as0, as1) = (a_mat[0], a_mat[1]);
    let (bs0, bs1) = (b_mat[0], b_mat[1]);

    let mut out_dims = batch.to_vec();
    out_dims.extend([m, n]);
    let out_strides = row_major_strides(&out_dims);
    let (c_batch_strides, c_mat) = out_strides.split_at(rank - 2);
    let cs0 = c_mat[0];

    let a_raw = a.data().to_vec();
    let b_raw = b.data().to_vec();
    let mut out = vec![accumulator(a.kind()); total_len(&out_dims)];

    let batches = Offsets::new(batch, a_batch_strides)
        .zip(Offsets::new(batch, b_batch_strides))
        .zip(Offsets::new(batch, c_batch_strides));
    for ((a_off, b_off), c_off) in batches {
        for i in 0..m {
            for j in 0..n {
                let mut acc = accumulator(a.kind());
                for p in 0..k {
                    let x = a_raw[a_off + i * as0 + p * as1];
                    let y = b_raw[b_off + p * bs0 + j * bs1];
                    acc = mul_add(acc, x, y);
                }
                out[c_off + i * cs0 + j] = acc;
            }
        }
    }

    let data = TypedBuffer::from_values(a.kind(), out);
    Ndarray::from_parts(data, &out_dims, &out_strides)
}
