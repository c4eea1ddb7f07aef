//! Selectors: pairwise comparison matrices.
//!
//! `select(keys, queries, op)` compares every position of `keys` against every
//! position of `queries`, the way an attention head scores each query
//! position's key against every other position. The result is a [`Selector`],
//! a boolean matrix whose entry `(i, j)` means "position `i` may aggregate over
//! position `j`".
//!
//! # Broadcast
//!
//! The second operand may be a scalar ([`Operand::Scalar`]). It is broadcast
//! to a constant sequence with the first operand's length before comparison,
//! so `select(x, 0, ==)` is `select(x, [0; n], ==)`.

use crate::error::{RaspError, Result};
use crate::primitives::LogicalOp;
use crate::sequence::{Element, Sequence};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Relational operators for [`select`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Comparison {
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
}

impl Comparison {
    pub fn compare(self, a: f64, b: f64) -> bool {
        match self {
            Comparison::Eq => a == b,
            Comparison::Ne => a != b,
            Comparison::Lt => a < b,
            Comparison::Le => a <= b,
            Comparison::Gt => a > b,
            Comparison::Ge => a >= b,
        }
    }
}

impl FromStr for Comparison {
    type Err = RaspError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "==" => Ok(Comparison::Eq),
            "!=" => Ok(Comparison::Ne),
            "<" => Ok(Comparison::Lt),
            "<=" => Ok(Comparison::Le),
            ">" => Ok(Comparison::Gt),
            ">=" => Ok(Comparison::Ge),
            other => Err(RaspError::UnsupportedOperator(other.to_string())),
        }
    }
}

impl fmt::Display for Comparison {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Comparison::Eq => "==",
            Comparison::Ne => "!=",
            Comparison::Lt => "<",
            Comparison::Le => "<=",
            Comparison::Gt => ">",
            Comparison::Ge => ">=",
        };
        f.write_str(name)
    }
}

/// Second operand of [`select`]: a sequence or a broadcast scalar.
#[derive(Clone, Debug, PartialEq)]
pub enum Operand {
    Sequence(Vec<f64>),
    Scalar(f64),
}

impl Operand {
    /// Materialize the operand for a first operand of length `n`.
    fn broadcast(self, n: usize) -> Result<Vec<f64>> {
        match self {
            Operand::Scalar(value) => Ok(vec![value; n]),
            Operand::Sequence(values) if values.len() == n => Ok(values),
            Operand::Sequence(values) => Err(RaspError::shape(n, values.len())),
        }
    }
}

impl<T: Element> From<&Sequence<T>> for Operand {
    fn from(seq: &Sequence<T>) -> Self {
        Operand::Sequence(seq.iter().map(|&v| v.to_f64()).collect())
    }
}

impl<T: Element> From<Sequence<T>> for Operand {
    fn from(seq: Sequence<T>) -> Self {
        Operand::from(&seq)
    }
}

macro_rules! scalar_operand {
    ($($t:ty),*) => {
        $(
            impl From<$t> for Operand {
                fn from(value: $t) -> Self {
                    Operand::Scalar(value.to_f64())
                }
            }
        )*
    };
}

scalar_operand!(f64, f32, bool, i32, i64, u32, usize);

/// An n×m boolean matrix built by [`select`].
///
/// Row `i` lists the positions that position `i` aggregates over.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawSelector")]
pub struct Selector {
    rows: usize,
    cols: usize,
    /// Row-major entries
    data: Vec<bool>,
}

/// Unchecked wire form of [`Selector`]; validated by `from_data`.
#[derive(Deserialize)]
struct RawSelector {
    rows: usize,
    cols: usize,
    data: Vec<bool>,
}

impl TryFrom<RawSelector> for Selector {
    type Error = RaspError;

    fn try_from(raw: RawSelector) -> Result<Self> {
        Selector::from_data(raw.rows, raw.cols, raw.data)
    }
}

impl Selector {
    /// Build a selector from a row-major boolean buffer.
    pub fn from_data(rows: usize, cols: usize, data: Vec<bool>) -> Result<Self> {
        let expected = rows
            .checked_mul(cols)
            .ok_or(RaspError::shape(usize::MAX, data.len()))?;
        if data.len() != expected {
            return Err(RaspError::shape(expected, data.len()));
        }
        Ok(Self { rows, cols, data })
    }

    /// Build a selector from nested rows. All rows must share one length.
    pub fn from_rows(rows: &[Vec<bool>]) -> Result<Self> {
        let cols = rows.first().map_or(0, Vec::len);
        let mut data = Vec::with_capacity(rows.len() * cols);
        for row in rows {
            if row.len() != cols {
                return Err(RaspError::shape(cols, row.len()));
            }
            data.extend_from_slice(row);
        }
        Ok(Self {
            rows: rows.len(),
            cols,
            data,
        })
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Entry `(i, j)`, or `None` when either index is out of bounds.
    pub fn get(&self, i: usize, j: usize) -> Option<bool> {
        if i < self.rows && j < self.cols {
            Some(self.data[i * self.cols + j])
        } else {
            None
        }
    }

    /// Row `i` as a slice.
    pub fn row(&self, i: usize) -> &[bool] {
        &self.data[i * self.cols..(i + 1) * self.cols]
    }

    pub fn iter_rows(&self) -> impl Iterator<Item = &[bool]> + '_ {
        (0..self.rows).map(move |i| self.row(i))
    }

    /// Entrywise combination with another selector of the same shape.
    ///
    /// `LogicalOp::Not` ignores `other` and negates `self`.
    pub fn combine(&self, op: LogicalOp, other: &Selector) -> Result<Selector> {
        if !op.is_binary() {
            return Ok(self.not());
        }
        if self.rows != other.rows {
            return Err(RaspError::shape(self.rows, other.rows));
        }
        if self.cols != other.cols {
            return Err(RaspError::shape(self.cols, other.cols));
        }

        let data = self
            .data
            .iter()
            .zip(other.data.iter())
            .map(|(&a, &b)| op.apply(a, b))
            .collect();

        Ok(Selector {
            rows: self.rows,
            cols: self.cols,
            data,
        })
    }

    /// Entrywise negation.
    pub fn not(&self) -> Selector {
        Selector {
            rows: self.rows,
            cols: self.cols,
            data: self.data.iter().map(|&v| !v).collect(),
        }
    }
}

/// Compare every position of `a` against every position of `b`.
///
/// Entry `(i, j)` of the result is `op(a[i], b[j])`. A scalar `b` is
/// broadcast to `a`'s length. Two sequences of different lengths are a
/// [`RaspError::ShapeMismatch`].
///
/// # Example
/// ```rust
/// use rasp::{select, Comparison, Sequence};
///
/// let a = Sequence::from(vec![0.0, 1.0, 2.0]);
/// let b = Sequence::from(vec![2.0, 1.0, 0.0]);
/// let sel = select(&a, &b, Comparison::Eq)?;
/// assert_eq!(sel.get(0, 2), Some(true));
/// assert_eq!(sel.get(0, 0), Some(false));
/// # Ok::<(), rasp::RaspError>(())
/// ```
pub fn select<T, O>(a: &Sequence<T>, b: O, op: Comparison) -> Result<Selector>
where
    T: Element,
    O: Into<Operand>,
{
    let n = a.len();
    let keys = b.into().broadcast(n)?;
    let m = keys.len();

    let mut data = Vec::with_capacity(n * m);
    for &query in a.iter() {
        let query = query.to_f64();
        data.extend(keys.iter().map(|&key| op.compare(query, key)));
    }

    tracing::debug!(rows = n, cols = m, op = %op, "built selector");

    Ok(Selector {
        rows: n,
        cols: m,
        data,
    })
}
