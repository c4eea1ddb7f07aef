//! RASP primitives: sequence-derived and elementwise s-ops.
//!
//! These are the per-position building blocks that feed selectors:
//! - **indices**: position of every element
//! - **length**: sequence length broadcast to every position
//! - **logical**: `and`, `or`, `xor`, `not` over flags
//! - **elementwise**: `+`, `-`, `*`, `/` over numbers
//!
//! # Zero fallback
//!
//! Division never produces infinity or NaN. Any quotient that is not finite
//! (`x / 0`, `0 / 0`) is replaced by `0`. The same policy covers empty
//! selector rows in [`aggregate`](crate::aggregate::aggregate), which keeps
//! the whole algebra total.

use crate::error::{RaspError, Result};
use crate::sequence::{Element, Mask, Sequence, Sop};
use std::fmt;
use std::str::FromStr;

/// Boolean operators for [`Primitives::logical`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LogicalOp {
    And,
    Or,
    Xor,
    /// Unary; any second operand is ignored.
    Not,
}

impl LogicalOp {
    /// Whether the operator needs a second operand.
    pub fn is_binary(self) -> bool {
        !matches!(self, LogicalOp::Not)
    }

    pub fn apply(self, x: bool, y: bool) -> bool {
        match self {
            LogicalOp::And => x && y,
            LogicalOp::Or => x || y,
            LogicalOp::Xor => x ^ y,
            LogicalOp::Not => !x,
        }
    }
}

impl FromStr for LogicalOp {
    type Err = RaspError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "and" => Ok(LogicalOp::And),
            "or" => Ok(LogicalOp::Or),
            "xor" => Ok(LogicalOp::Xor),
            "not" => Ok(LogicalOp::Not),
            other => Err(RaspError::UnsupportedOperator(other.to_string())),
        }
    }
}

impl fmt::Display for LogicalOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            LogicalOp::And => "and",
            LogicalOp::Or => "or",
            LogicalOp::Xor => "xor",
            LogicalOp::Not => "not",
        };
        f.write_str(name)
    }
}

/// Arithmetic operators for [`Primitives::elementwise`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ArithOp {
    Add,
    Sub,
    Mul,
    /// Division with zero fallback.
    Div,
}

impl ArithOp {
    pub fn apply(self, x: f64, y: f64) -> f64 {
        match self {
            ArithOp::Add => x + y,
            ArithOp::Sub => x - y,
            ArithOp::Mul => x * y,
            ArithOp::Div => zero_fallback(x / y),
        }
    }
}

impl FromStr for ArithOp {
    type Err = RaspError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "+" => Ok(ArithOp::Add),
            "-" => Ok(ArithOp::Sub),
            "*" => Ok(ArithOp::Mul),
            "/" => Ok(ArithOp::Div),
            other => Err(RaspError::UnsupportedOperator(other.to_string())),
        }
    }
}

impl fmt::Display for ArithOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ArithOp::Add => "+",
            ArithOp::Sub => "-",
            ArithOp::Mul => "*",
            ArithOp::Div => "/",
        };
        f.write_str(name)
    }
}

/// Replace a non-finite value (infinity or NaN) with `0`.
pub fn zero_fallback(value: f64) -> f64 {
    if value.is_finite() {
        value
    } else {
        tracing::trace!(value, "zero fallback");
        0.0
    }
}

/// Collection of RASP primitive s-ops.
pub struct Primitives;

impl Primitives {
    /// Position of every element: `[0, 1, ..., n-1]`.
    ///
    /// # Example
    /// ```rust
    /// use rasp::{Primitives, vocab};
    ///
    /// let tokens = vocab::encode("hello", false)?;
    /// assert_eq!(Primitives::indices(&tokens).data(), &[0.0, 1.0, 2.0, 3.0, 4.0]);
    /// # Ok::<(), rasp::RaspError>(())
    /// ```
    pub fn indices<T: Element>(seq: &Sequence<T>) -> Sop {
        (0..seq.len()).map(|i| i as f64).collect()
    }

    /// The sequence length at every position: `[n, n, ..., n]`.
    pub fn length<T: Element>(seq: &Sequence<T>) -> Sop {
        Sequence::filled(seq.len(), seq.len() as f64)
    }

    /// Combine two flag sequences position by position.
    ///
    /// `y` is required for binary operators and must match `x` in length.
    /// `LogicalOp::Not` ignores `y` entirely.
    pub fn logical(x: &Mask, op: LogicalOp, y: Option<&Mask>) -> Result<Mask> {
        if !op.is_binary() {
            return Ok(x.map(|v| !v));
        }

        let y = y.ok_or_else(|| RaspError::MissingOperand(op.to_string()))?;
        if x.len() != y.len() {
            return Err(RaspError::shape(x.len(), y.len()));
        }

        Ok(x.iter()
            .zip(y.iter())
            .map(|(&a, &b)| op.apply(a, b))
            .collect())
    }

    /// Combine two numeric sequences position by position.
    ///
    /// Division follows the zero fallback: `[1, 2, 0] / [0, 1, 0] == [0, 2, 0]`.
    pub fn elementwise(x: &Sop, op: ArithOp, y: &Sop) -> Result<Sop> {
        if x.len() != y.len() {
            return Err(RaspError::shape(x.len(), y.len()));
        }

        Ok(x.iter()
            .zip(y.iter())
            .map(|(&a, &b)| op.apply(a, b))
            .collect())
    }

    /// Combine a numeric sequence with a constant.
    ///
    /// The constant is broadcast to `x`'s length, so this equals
    /// `elementwise(x, op, [c; n])`, zero fallback included.
    pub fn elementwise_scalar(x: &Sop, op: ArithOp, c: f64) -> Sop {
        x.map(|a| op.apply(a, c))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sop(values: &[f64]) -> Sop {
        Sop::from(values)
    }

    fn mask(values: &[bool]) -> Mask {
        Mask::from(values)
    }

    #[test]
    fn test_indices() {
        let s = Sequence::from(vec![7u32, 4, 11, 11, 14]);
        assert_eq!(Primitives::indices(&s).data(), &[0.0, 1.0, 2.0, 3.0, 4.0]);
    }

    #[test]
    fn test_length() {
        let s = Sequence::from(vec![7u32, 4, 11]);
        assert_eq!(Primitives::length(&s).data(), &[3.0, 3.0, 3.0]);
    }

    #[test]
    fn test_empty_sequence_ops() {
        let s = Sop::from(Vec::new());
        assert!(Primitives::indices(&s).is_empty());
        assert!(Primitives::length(&s).is_empty());
    }

    #[test]
    fn test_logical_binary() {
        let x = mask(&[true, true, false, false]);
        let y = mask(&[true, false, true, false]);

        let and = Primitives::logical(&x, LogicalOp::And, Some(&y)).unwrap();
        let or = Primitives::logical(&x, LogicalOp::Or, Some(&y)).unwrap();
        let xor = Primitives::logical(&x, LogicalOp::Xor, Some(&y)).unwrap();

        assert_eq!(and.data(), &[true, false, false, false]);
        assert_eq!(or.data(), &[true, true, true, false]);
        assert_eq!(xor.data(), &[false, true, true, false]);
    }

    #[test]
    fn test_logical_not_ignores_second_operand() {
        let x = mask(&[true, false, true]);
        let other = mask(&[true]);

        let alone = Primitives::logical(&x, LogicalOp::Not, None).unwrap();
        let with = Primitives::logical(&x, LogicalOp::Not, Some(&other)).unwrap();

        assert_eq!(alone.data(), &[false, true, false]);
        assert_eq!(alone, with);
    }

    #[test]
    fn test_logical_shape_mismatch() {
        let x = mask(&[true, false]);
        let y = mask(&[true]);
        assert!(matches!(
            Primitives::logical(&x, LogicalOp::And, Some(&y)),
            Err(RaspError::ShapeMismatch {
                expected: 2,
                got: 1
            })
        ));
    }

    #[test]
    fn test_logical_missing_operand() {
        let x = mask(&[true]);
        assert!(matches!(
            Primitives::logical(&x, LogicalOp::Or, None),
            Err(RaspError::MissingOperand(_))
        ));
    }

    #[test]
    fn test_elementwise_arith() {
        let x = sop(&[1.0, 2.0, 3.0]);
        let y = sop(&[4.0, 5.0, 6.0]);

        assert_eq!(
            Primitives::elementwise(&x, ArithOp::Add, &y).unwrap().data(),
            &[5.0, 7.0, 9.0]
        );
        assert_eq!(
            Primitives::elementwise(&x, ArithOp::Sub, &y).unwrap().data(),
            &[-3.0, -3.0, -3.0]
        );
        assert_eq!(
            Primitives::elementwise(&x, ArithOp::Mul, &y).unwrap().data(),
            &[4.0, 10.0, 18.0]
        );
    }

    #[test]
    fn test_division_zero_fallback() {
        let x = sop(&[1.0, 2.0, 0.0]);
        let y = sop(&[0.0, 1.0, 0.0]);
        let out = Primitives::elementwise(&x, ArithOp::Div, &y).unwrap();
        assert_eq!(out.data(), &[0.0, 2.0, 0.0]);
    }

    #[test]
    fn test_division_negative_by_zero() {
        let x = sop(&[-3.0]);
        let y = sop(&[0.0]);
        let out = Primitives::elementwise(&x, ArithOp::Div, &y).unwrap();
        assert_eq!(out.data(), &[0.0]);
    }

    #[test]
    fn test_elementwise_shape_mismatch() {
        let x = sop(&[1.0, 2.0]);
        let y = sop(&[1.0, 2.0, 3.0]);
        assert!(matches!(
            Primitives::elementwise(&x, ArithOp::Add, &y),
            Err(RaspError::ShapeMismatch {
                expected: 2,
                got: 3
            })
        ));
    }

    #[test]
    fn test_elementwise_scalar() {
        let x = sop(&[3.0, 4.0]);
        assert_eq!(
            Primitives::elementwise_scalar(&x, ArithOp::Sub, 1.0).data(),
            &[2.0, 3.0]
        );
        assert_eq!(
            Primitives::elementwise_scalar(&x, ArithOp::Div, 0.0).data(),
            &[0.0, 0.0]
        );
    }

    #[test]
    fn test_parse_operators() {
        assert_eq!("+".parse::<ArithOp>().unwrap(), ArithOp::Add);
        assert_eq!("/".parse::<ArithOp>().unwrap(), ArithOp::Div);
        assert_eq!("xor".parse::<LogicalOp>().unwrap(), LogicalOp::Xor);
        assert!(matches!(
            "%".parse::<ArithOp>(),
            Err(RaspError::UnsupportedOperator(op)) if op == "%"
        ));
        assert!("nand".parse::<LogicalOp>().is_err());
    }

    #[test]
    fn test_operator_display_roundtrip() {
        for op in [ArithOp::Add, ArithOp::Sub, ArithOp::Mul, ArithOp::Div] {
            assert_eq!(op.to_string().parse::<ArithOp>().unwrap(), op);
        }
        for op in [LogicalOp::And, LogicalOp::Or, LogicalOp::Xor, LogicalOp::Not] {
            assert_eq!(op.to_string().parse::<LogicalOp>().unwrap(), op);
        }
    }
}
