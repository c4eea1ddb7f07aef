//! Composite operators built only from primitives.
//!
//! Every operator here is select → aggregate over s-ops derived with
//! [`Primitives`]. New composites follow the same pattern; there is no
//! separate execution step.

use crate::aggregate::{aggregate, aggregate_as, Aggregation};
use crate::error::Result;
use crate::primitives::{ArithOp, Primitives};
use crate::select::{select, Comparison, Selector};
use crate::sequence::{Element, Mask, Sequence, Sop};

/// Selector pairing position `i` with position `n - 1 - i`.
///
/// `select(indices, length - indices - 1, ==)`. Exactly one entry per row and
/// per column is set.
pub fn flip_selector<T: Element>(seq: &Sequence<T>) -> Result<Selector> {
    let indices = Primitives::indices(seq);
    let length = Primitives::length(seq);
    let opposite = Primitives::elementwise(&length, ArithOp::Sub, &indices)?;
    let opposite = Primitives::elementwise_scalar(&opposite, ArithOp::Sub, 1.0);
    select(&indices, &opposite, Comparison::Eq)
}

/// Reverse a sequence through a selector.
///
/// Each row of [`flip_selector`] picks a single column, so every element is
/// copied as is and the reversal is exact for any element kind.
///
/// # Example
/// ```rust
/// use rasp::{library, Sequence};
///
/// let x = Sequence::from(vec![10, 20, 30]);
/// assert_eq!(library::flip(&x)?.data(), &[30, 20, 10]);
/// # Ok::<(), rasp::RaspError>(())
/// ```
pub fn flip<T: Element>(seq: &Sequence<T>) -> Result<Sequence<T>> {
    let sel = flip_selector(seq)?;
    aggregate_as(&sel, seq, Aggregation::Mean)
}

/// Shift values `k` positions to the right, filling with 0.
///
/// Position `i` takes the value at `i - k`; positions before `k` select
/// nothing and fall back to 0.
pub fn shift<T: Element>(seq: &Sequence<T>, k: usize) -> Result<Sequence<T>> {
    let indices = Primitives::indices(seq);
    let source = Primitives::elementwise_scalar(&indices, ArithOp::Sub, k as f64);
    let sel = select(&source, &indices, Comparison::Eq)?;
    aggregate_as(&sel, seq, Aggregation::Mean)
}

/// Fraction of positions `j <= i` whose flag is set, for every `i`.
///
/// `aggregate(select(indices, indices, >=), mask)`.
pub fn frac_prevs(mask: &Mask) -> Result<Sop> {
    let indices = Primitives::indices(mask);
    let sel = select(&indices, &indices, Comparison::Ge)?;
    aggregate(&sel, mask, Aggregation::Mean)
}
