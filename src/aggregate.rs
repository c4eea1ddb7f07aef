//! Aggregation: collapse a selector and a value sequence into a new s-op.
//!
//! For every row `i` of the selector, the result is the mean of `values[j]`
//! over the columns `j` the row selects. A row that selects nothing yields
//! `0` rather than NaN. Only the empty row is special: a mean that is
//! infinite because the selected values are infinite stays infinite.

use crate::error::{RaspError, Result};
use crate::select::Selector;
use crate::sequence::{Element, Sequence, Sop};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Supported aggregations.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Aggregation {
    /// Masked mean, 0 for an empty row
    #[default]
    Mean,
}

impl FromStr for Aggregation {
    type Err = RaspError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "mean" => Ok(Aggregation::Mean),
            other => Err(RaspError::UnsupportedAggregation(other.to_string())),
        }
    }
}

impl fmt::Display for Aggregation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Aggregation::Mean => f.write_str("mean"),
        }
    }
}

/// Aggregate `values` through `selector`.
///
/// The output has one value per selector row. `selector.cols()` must equal
/// `values.len()`. Boolean values average as 0/1, which turns a flag
/// sequence into per-row fractions.
///
/// # Example
/// ```rust
/// use rasp::{aggregate, select, Aggregation, Comparison, Sequence};
///
/// let sel = select(
///     &Sequence::from(vec![0.0, 1.0, 2.0]),
///     &Sequence::from(vec![2.0, 1.0, 0.0]),
///     Comparison::Eq,
/// )?;
/// let out = aggregate(&sel, &Sequence::from(vec![10.0, 20.0, 30.0]), Aggregation::Mean)?;
/// assert_eq!(out.data(), &[30.0, 20.0, 10.0]);
/// # Ok::<(), rasp::RaspError>(())
/// ```
pub fn aggregate<T: Element>(
    selector: &Selector,
    values: &Sequence<T>,
    agg: Aggregation,
) -> Result<Sop> {
    if selector.cols() != values.len() {
        return Err(RaspError::shape(selector.cols(), values.len()));
    }

    let out: Sop = match agg {
        Aggregation::Mean => selector
            .iter_rows()
            .map(|row| masked_mean(row, values))
            .collect(),
    };

    tracing::debug!(rows = out.len(), cols = values.len(), agg = %agg, "aggregated");
    Ok(out)
}

/// Aggregate `values` through `selector`, keeping the element kind.
///
/// A row that selects exactly one column copies that element unchanged, so
/// permutation selectors move values without a round trip through `f64`.
/// Other rows take the mean and convert it back with [`Element::from_f64`].
pub fn aggregate_as<T: Element>(
    selector: &Selector,
    values: &Sequence<T>,
    agg: Aggregation,
) -> Result<Sequence<T>> {
    if selector.cols() != values.len() {
        return Err(RaspError::shape(selector.cols(), values.len()));
    }

    let out: Sequence<T> = match agg {
        Aggregation::Mean => selector
            .iter_rows()
            .map(|row| {
                let mut selected = row.iter().zip(values.iter()).filter(|(s, _)| **s);
                match (selected.next(), selected.next()) {
                    (Some((_, &only)), None) => only,
                    _ => T::from_f64(masked_mean(row, values)),
                }
            })
            .collect(),
    };

    tracing::debug!(rows = out.len(), cols = values.len(), agg = %agg, "aggregated");
    Ok(out)
}

/// Mean of the selected values; 0 when nothing is selected.
///
/// Infinite inputs decide the mean directly; finite inputs whose sum
/// overflows fall back to a running mean.
fn masked_mean<T: Element>(row: &[bool], values: &Sequence<T>) -> f64 {
    let selected = || {
        row.iter()
            .zip(values.iter())
            .filter(|(s, _)| **s)
            .map(|(_, &v)| v.to_f64())
    };

    let (sum, count) = selected().fold((0.0, 0usize), |(sum, count), v| (sum + v, count + 1));
    if count == 0 {
        return 0.0;
    }

    let mean = sum / count as f64;
    if mean.is_finite() {
        return mean;
    }

    let positive = selected().any(|v| v == f64::INFINITY);
    let negative = selected().any(|v| v == f64::NEG_INFINITY);
    match (positive, negative) {
        (true, true) => f64::NAN,
        (true, false) => f64::INFINITY,
        (false, true) => f64::NEG_INFINITY,
        (false, false) => {
            let mut running = 0.0;
            for (k, v) in selected().enumerate() {
                running += (v - running) / (k + 1) as f64;
            }
            running
        }
    }
}
