//! Text rendering.

use std::fmt;

use typed_buffer::Number;

use crate::view::Ndarray;

/// Decimal places for floating kinds.
const FLOAT_PRECISION: usize = 6;

/// Nested brackets with right-aligned elements.
///
/// Integral kinds print as integers, floating kinds with six decimals. Rows
/// are separated by newlines and indented by bracket depth; blocks of rank 3
/// and above are separated by a single blank line.
///
/// ```rust
/// use strided_ndarray::{ElementKind, Ndarray};
///
/// let a = Ndarray::from_nested([[1, 2, 3], [4, 50, 6]], ElementKind::Int32).unwrap();
/// assert_eq!(a.to_string(), "[[ 1  2  3]\n [ 4 50  6]]");
/// ```
impl fmt::Display for Ndarray {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let float = self.kind().is_float();
        let rendered: Vec<String> = self
            .to_vec()
            .into_iter()
            .map(|v| render(v, float))
            .collect();
        if self.ndim() == 0 {
            return f.write_str(rendered.first().map(String::as_str).unwrap_or(""));
        }
        let width = rendered.iter().map(String::len).max().unwrap_or(0);
        let mut cells = rendered.iter();
        write_block(f, self.shape(), 0, width, &mut cells)
    }
}

fn render(v: Number, float: bool) -> String {
    if float {
        format!("{:.*}", FLOAT_PRECISION, v.as_f64())
    } else {
        v.as_i64().to_string()
    }
}

fn write_block<'a>(
    f: &mut fmt::Formatter<'_>,
    dims: &[usize],
    depth: usize,
    width: usize,
    cells: &mut impl Iterator<Item = &'a String>,
) -> fmt::Result {
    f.write_str("[")?;
    match dims {
        [] => {}
        [n] => {
            for i in 0..*n {
                if i > 0 {
                    f.write_str(" ")?;
                }
                let cell = cells.next().map(String::as_str).unwrap_or("");
                write!(f, "{cell:>width$}")?;
            }
        }
        [n, rest @ ..] => {
            for i in 0..*n {
                if i > 0 {
                    f.write_str(&"\n".repeat(rest.len().min(2)))?;
                    f.write_str(&" ".repeat(depth + 1))?;
                }
                write_block(f, rest, depth + 1, width, cells)?;
            }
        }
    }
    f.write_str("]")
}
