//! Sequence type for RASP.
//!
//! A sequence is one value per position. The engine does not tag what the
//! values mean (token codes, positions, lengths, flags); callers track that
//! by convention, helped by the [`Sop`], [`Mask`] and [`Tokens`] aliases.

use serde::{Deserialize, Serialize};
use std::ops::Index;

/// Element kinds a [`Sequence`] can hold.
///
/// All arithmetic and comparison inside the engine happens in `f64`;
/// `from_f64` maps a result back to the element kind.
pub trait Element: Copy + PartialEq + std::fmt::Debug {
    fn to_f64(self) -> f64;
    fn from_f64(value: f64) -> Self;
}

impl Element for f64 {
    fn to_f64(self) -> f64 {
        self
    }

    fn from_f64(value: f64) -> Self {
        value
    }
}

impl Element for f32 {
    fn to_f64(self) -> f64 {
        self as f64
    }

    fn from_f64(value: f64) -> Self {
        value as f32
    }
}

impl Element for bool {
    fn to_f64(self) -> f64 {
        if self {
            1.0
        } else {
            0.0
        }
    }

    fn from_f64(value: f64) -> Self {
        value != 0.0
    }
}

macro_rules! integer_element {
    ($($t:ty),*) => {
        $(
            impl Element for $t {
                fn to_f64(self) -> f64 {
                    self as f64
                }

                // Saturating `as` cast; NaN maps to 0.
                fn from_f64(value: f64) -> Self {
                    value.round() as $t
                }
            }
        )*
    };
}

integer_element!(i32, i64, u32, usize);

/// An ordered, fixed-length sequence of values.
///
/// This is the core data structure every s-op consumes and produces.
/// Sequences are never mutated by an operation; each call returns a new one.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Sequence<T> {
    data: Vec<T>,
}

/// Numeric sequence (the usual s-op).
pub type Sop = Sequence<f64>;

/// Per-position boolean flags.
pub type Mask = Sequence<bool>;

/// Vocabulary codes.
pub type Tokens = Sequence<u32>;

impl<T: Element> Sequence<T> {
    /// Create a sequence from raw data.
    pub fn from_data(data: Vec<T>) -> Self {
        Self { data }
    }

    /// Create a sequence of `len` copies of `value`.
    pub fn filled(len: usize, value: T) -> Self {
        Self {
            data: vec![value; len],
        }
    }

    /// Number of positions.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Get the raw data as a slice.
    pub fn data(&self) -> &[T] {
        &self.data
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.data.iter()
    }

    /// Consume the sequence, returning its values.
    pub fn into_data(self) -> Vec<T> {
        self.data
    }

    /// Convert to a numeric s-op.
    pub fn to_f64(&self) -> Sop {
        self.cast()
    }

    /// Convert to another element kind through `f64`.
    pub fn cast<U: Element>(&self) -> Sequence<U> {
        self.data.iter().map(|&v| U::from_f64(v.to_f64())).collect()
    }

    /// Non-zero positions become `true`.
    pub fn truthy(&self) -> Mask {
        self.data.iter().map(|&v| v.to_f64() != 0.0).collect()
    }

    /// Apply `f` to every position.
    pub fn map<U, F>(&self, f: F) -> Sequence<U>
    where
        U: Element,
        F: FnMut(T) -> U,
    {
        self.data.iter().copied().map(f).collect()
    }

    /// Values at positions `n-1..=0`.
    ///
    /// Plain reversal, used as the reference for the selector-based `flip`.
    pub fn reversed(&self) -> Self {
        self.data.iter().rev().copied().collect()
    }
}

impl<T> Index<usize> for Sequence<T> {
    type Output = T;

    fn index(&self, index: usize) -> &Self::Output {
        &self.data[index]
    }
}

impl<T> From<Vec<T>> for Sequence<T> {
    fn from(data: Vec<T>) -> Self {
        Self { data }
    }
}

impl<T: Clone> From<&[T]> for Sequence<T> {
    fn from(data: &[T]) -> Self {
        Self {
            data: data.to_vec(),
        }
    }
}

impl<T> FromIterator<T> for Sequence<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self {
            data: iter.into_iter().collect(),
        }
    }
}

impl<'a, T> IntoIterator for &'a Sequence<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.data.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filled() {
        let s = Sequence::filled(4, 2.5);
        assert_eq!(s.len(), 4);
        assert!(s.iter().all(|&x| x == 2.5));
    }

    #[test]
    fn test_cast_rounds_to_integers() {
        let s = Sop::from(vec![0.0, 1.4, 2.6, -0.2]);
        let codes: Sequence<i64> = s.cast();
        assert_eq!(codes.data(), &[0, 1, 3, 0]);
    }

    #[test]
    fn test_truthy() {
        let s = Sop::from(vec![0.0, -1.0, 3.0]);
        assert_eq!(s.truthy().data(), &[false, true, true]);
    }

    #[test]
    fn test_bool_as_f64() {
        let m = Mask::from(vec![true, false]);
        assert_eq!(m.to_f64().data(), &[1.0, 0.0]);
    }

    #[test]
    fn test_reversed() {
        let t = Tokens::from(vec![7, 4, 11]);
        assert_eq!(t.reversed().data(), &[11, 4, 7]);
    }

    #[test]
    fn test_serde_roundtrip_json() {
        let s = Sop::from(vec![1.0, 2.0]);
        let json = serde_json::to_string(&s).unwrap();
        assert_eq!(json, r#"{"data":[1.0,2.0]}"#);
        let back: Sop = serde_json::from_str(&json).unwrap();
        assert_eq!(back, s);
    }
}
