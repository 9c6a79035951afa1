//! Iteration along axis 0.

use crate::index::Element;
use crate::nested::Nested;
use crate::view::Ndarray;

/// Iterator over axis 0 of an [`Ndarray`].
///
/// Yields scalars for a rank-1 array and aliasing sub-array views otherwise.
/// Each call to [`Ndarray::iter`] starts a fresh cursor.
pub struct Iter<'a> {
    array: &'a Ndarray,
    index: usize,
    len: usize,
}

impl Iterator for Iter<'_> {
    type Item = Element;

    fn next(&mut self) -> Option<Element> {
        if self.index >= self.len {
            return None;
        }
        let item = self.array.get(&[self.index]).ok()?;
        self.index += 1;
        Some(item)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.len - self.index;
        (n, Some(n))
    }
}

impl ExactSizeIterator for Iter<'_> {}

impl<'a> IntoIterator for &'a Ndarray {
    type Item = Element;
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Iter<'a> {
        self.iter()
    }
}

impl Ndarray {
    pub fn iter(&self) -> Iter<'_> {
        Iter {
            array: self,
            index: 0,
            len: self.len(),
        }
    }

    /// Values as nested lists, one level per axis.
    pub fn tolist(&self) -> Nested {
        if self.ndim() == 0 {
            return match self.to_vec().first() {
                Some(&v) => Nested::Scalar(v),
                None => Nested::List(vec![]),
            };
        }
        Nested::List(
            self.iter()
                .map(|item| match item {
                    Element::Scalar(v) => Nested::Scalar(v),
                    Element::Array(sub) => sub.tolist(),
                })
                .collect(),
        )
    }
}
