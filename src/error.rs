//! Error types for RASP operations.

use thiserror::Error;

/// RASP error types.
///
/// Every variant is a contract violation surfaced to the caller. Degenerate
/// numeric cases (division by zero, an empty selector row) are not errors:
/// they resolve to 0.
#[derive(Error, Debug)]
pub enum RaspError {
    /// Character outside the vocabulary during encoding
    #[error("Invalid symbol {symbol:?} at position {position}")]
    InvalidSymbol { symbol: char, position: usize },

    /// Value that is not a vocabulary code during decoding
    #[error("Invalid code {value} at position {position}")]
    InvalidCode { value: f64, position: usize },

    /// Operands with incompatible lengths
    #[error("Shape mismatch: expected {expected}, got {got}")]
    ShapeMismatch { expected: usize, got: usize },

    /// Operator name outside the supported set
    #[error("Unsupported operator: `{0}`")]
    UnsupportedOperator(String),

    /// Aggregation name other than `mean`
    #[error("Unsupported aggregation: `{0}`")]
    UnsupportedAggregation(String),

    /// Binary logical operator called without its second operand
    #[error("Missing second operand for `{0}`")]
    MissingOperand(String),

    /// Configuration JSON parsing error
    #[error("Config parse error: {0}")]
    ConfigParse(#[from] serde_json::Error),
}

impl RaspError {
    pub(crate) fn shape(expected: usize, got: usize) -> Self {
        Self::ShapeMismatch { expected, got }
    }
}

/// Result type alias for RASP operations.
pub type Result<T> = std::result::Result<T, RaspError>;
