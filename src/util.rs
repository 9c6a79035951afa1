//! Stride and offset helpers.

use smallvec::SmallVec;

type SVec<T> = SmallVec<[T; 6]>;

/// Row-major strides: `strides[i] = product(dims[i+1..])`.
///
/// For positive dims this is the same table as dividing a running size by each
/// dim from left to right, starting from the total element count.
pub fn row_major_strides(dims: &[usize]) -> Vec<usize> {
    let rank = dims.len();
    if rank == 0 {
        return vec![];
    }
    let mut strides = vec![1usize; rank];
    for i in (0..rank - 1).rev() {
        strides[i] = strides[i + 1] * dims[i + 1];
    }
    strides
}

pub(crate) fn total_len(dims: &[usize]) -> usize {
    dims.iter().product()
}

/// Whether `strides` address `dims` densely in row-major order.
///
/// Size-1 dims are skipped because their stride is never used.
pub(crate) fn is_contiguous(dims: &[usize], strides: &[usize]) -> bool {
    if dims.len() != strides.len() {
        return false;
    }
    let mut expected = 1usize;
    for (&dim, &stride) in dims.iter().rev().zip(strides.iter().rev()) {
        if dim <= 1 {
            continue;
        }
        if stride != expected {
            return false;
        }
        expected = expected.saturating_mul(dim);
    }
    true
}

/// Number of buffer elements spanned by a strided layout: the largest
/// reachable offset plus one. Equals `total_len(dims)` when contiguous.
pub(crate) fn extent(dims: &[usize], strides: &[usize]) -> usize {
    if dims.iter().any(|&d| d == 0) {
        return 0;
    }
    1 + dims
        .iter()
        .zip(strides)
        .map(|(&d, &s)| (d - 1) * s)
        .sum::<usize>()
}

/// Flat buffer offsets of a strided layout, in row-major logical order
/// (last index varies fastest).
pub(crate) struct Offsets {
    dims: SVec<usize>,
    strides: SVec<usize>,
    current: SVec<usize>,
    offset: usize,
    remaining: usize,
}

impl Offsets {
    pub(crate) fn new(dims: &[usize], strides: &[usize]) -> Self {
        debug_assert_eq!(dims.len(), strides.len());
        Self {
            dims: SmallVec::from_slice(dims),
            strides: SmallVec::from_slice(strides),
            current: SmallVec::from_elem(0, dims.len()),
            offset: 0,
            remaining: total_len(dims),
        }
    }
}

impl Iterator for Offsets {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        if self.remaining == 0 {
            return None;
        }
        let out = self.offset;
        self.remaining -= 1;
        if self.remaining > 0 {
            for i in (0..self.dims.len()).rev() {
                self.current[i] += 1;
                self.offset += self.strides[i];
                if self.current[i] < self.dims[i] {
                    break;
                }
                self.offset -= self.strides[i] * self.dims[i];
                self.current[i] = 0;
            }
        }
        Some(out)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl ExactSizeIterator for Offsets {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_major_strides() {
        assert_eq!(row_major_strides(&[2, 3, 4]), vec![12, 4, 1]);
        assert_eq!(row_major_strides(&[5]), vec![1]);
        assert!(row_major_strides(&[]).is_empty());
    }

    #[test]
    fn test_is_contiguous_skips_unit_dims() {
        assert!(is_contiguous(&[2, 3], &[3, 1]));
        assert!(!is_contiguous(&[3, 2], &[1, 3]));
        assert!(is_contiguous(&[1, 4], &[1, 1]));
        assert!(is_contiguous(&[4, 1], &[1, 4]));
    }

    #[test]
    fn test_extent() {
        assert_eq!(extent(&[2, 3], &[3, 1]), 6);
        assert_eq!(extent(&[3, 2], &[1, 3]), 6);
        assert_eq!(extent(&[2], &[3]), 4);
        assert_eq!(extent(&[], &[]), 1);
        assert_eq!(extent(&[0, 2], &[2, 1]), 0);
    }

    #[test]
    fn test_offsets_row_major() {
        let offsets: Vec<usize> = Offsets::new(&[2, 3], &[3, 1]).collect();
        assert_eq!(offsets, vec![0, 1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_offsets_transposed() {
        let offsets: Vec<usize> = Offsets::new(&[3, 2], &[1, 3]).collect();
        assert_eq!(offsets, vec![0, 3, 1, 4, 2, 5]);
    }

    #[test]
    fn test_offsets_scalar_and_empty() {
        assert_eq!(Offsets::new(&[], &[]).collect::<Vec<_>>(), vec![0]);
        assert_eq!(Offsets::new(&[2, 0], &[0, 1]).count(), 0);
        assert_eq!(Offsets::new(&[4, 2], &[2, 1]).len(), 8);
    }
}
