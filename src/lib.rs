//! # RASP: programs as attention computations
//!
//! A small engine for the RASP formalism ("Thinking Like Transformers"):
//! the operations a stack of attention layers can express over a sequence,
//! written as ordinary function calls.
//!
//! ## Quick Start
//!
//! ```rust
//! use rasp::Rasp;
//!
//! let rasp = Rasp::new();
//!
//! // Encode symbols
//! let tokens = rasp.tokens("hello")?;
//!
//! // Derive s-ops, select, aggregate
//! let indices = rasp.indices(&tokens);
//! let length = rasp.length(&tokens);
//! let opposite = rasp.elementwise(&rasp.elementwise(&length, "-", &indices)?, "-", &rasp.ones(&tokens))?;
//! let sel = rasp.select(&indices, &opposite, "==")?;
//! let reversed = rasp.aggregate(&sel, &tokens)?;
//!
//! assert_eq!(rasp.detokenize(&reversed)?, "olleh");
//! # Ok::<(), rasp::RaspError>(())
//! ```
//!
//! ## Core Concepts
//!
//! - **Sequence**: one value per position ([`Sop`], [`Mask`], [`Tokens`])
//! - **Selector**: boolean matrix, row `i` marks the positions `i` reads from
//! - **Select**: pairwise comparison of two sequences into a selector
//! - **Aggregate**: per-row mean of the selected values
//! - **Zero fallback**: division by zero and empty rows resolve to `0`

pub mod aggregate;
pub mod config;
pub mod error;
pub mod library;
pub mod primitives;
pub mod select;
pub mod sequence;
pub mod vocab;

// Re-exports for convenience
pub use aggregate::{aggregate, aggregate_as, Aggregation};
pub use config::Config;
pub use error::{RaspError, Result};
pub use primitives::{zero_fallback, ArithOp, LogicalOp, Primitives};
pub use select::{select, Comparison, Operand, Selector};
pub use sequence::{Element, Mask, Sequence, Sop, Tokens};
pub use vocab::{Decode, TokenBatch};

/// The main RASP client - one entry point for every operation.
///
/// Operators are passed by name (`"+"`, `"and"`, `"<="`, `"mean"`), the way
/// RASP programs are written. The typed functions in [`primitives`],
/// [`select`], [`aggregate`] and [`library`] take enums instead.
///
/// # Example
///
/// ```rust
/// use rasp::Rasp;
///
/// let rasp = Rasp::new();
/// let tokens = rasp.tokens_batch(&["hi", "hello"])?;
/// assert_eq!(tokens.width(), 5);
/// assert_eq!(rasp.detokenize(&tokens)?, vec!["hi", "hello"]);
/// # Ok::<(), rasp::RaspError>(())
/// ```
#[derive(Clone, Debug, Default)]
pub struct Rasp {
    config: Config,
}

impl Rasp {
    /// Create a client with the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a client with a specific configuration.
    pub fn with_config(config: Config) -> Self {
        Self { config }
    }

    /// Create a client from a JSON configuration.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(Self::with_config(Config::from_json(json)?))
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    // =========================================================================
    // Vocabulary
    // =========================================================================

    /// Encode a string, using the configured boundary flag.
    pub fn tokens(&self, symbols: &str) -> Result<Tokens> {
        vocab::encode(symbols, self.config.with_boundary)
    }

    /// Encode a string with an explicit boundary flag.
    pub fn tokens_with(&self, symbols: &str, with_boundary: bool) -> Result<Tokens> {
        vocab::encode(symbols, with_boundary)
    }

    /// Encode strings into a padded, rectangular batch.
    pub fn tokens_batch<S: AsRef<str>>(&self, batch: &[S]) -> Result<TokenBatch> {
        vocab::encode_batch(batch, self.config.with_boundary)
    }

    /// Decode a sequence (to a `String`) or a batch (to `Vec<String>`).
    pub fn detokenize<D: Decode + ?Sized>(&self, encoded: &D) -> Result<D::Output> {
        encoded.decode(self.config.with_boundary)
    }

    // =========================================================================
    // Sequence operators
    // =========================================================================

    /// `[0, 1, ..., n-1]`
    pub fn indices<T: Element>(&self, seq: &Sequence<T>) -> Sop {
        Primitives::indices(seq)
    }

    /// `[n, n, ..., n]`
    pub fn length<T: Element>(&self, seq: &Sequence<T>) -> Sop {
        Primitives::length(seq)
    }

    /// `[1, 1, ..., 1]` with the length of `seq`.
    pub fn ones<T: Element>(&self, seq: &Sequence<T>) -> Sop {
        Sequence::filled(seq.len(), 1.0)
    }

    // =========================================================================
    // Elementwise
    // =========================================================================

    /// Logical combination by name: `and`, `or`, `xor`, `not`.
    pub fn logical(&self, x: &Mask, op: &str, y: Option<&Mask>) -> Result<Mask> {
        Primitives::logical(x, op.parse()?, y)
    }

    /// Arithmetic combination by name: `+`, `-`, `*`, `/`.
    ///
    /// Logical names are also accepted; operands are then read as flags
    /// (non-zero is true) and the result is 0/1.
    pub fn elementwise(&self, x: &Sop, op: &str, y: &Sop) -> Result<Sop> {
        if let Ok(logical) = op.parse::<LogicalOp>() {
            let out = Primitives::logical(&x.truthy(), logical, Some(&y.truthy()))?;
            return Ok(out.to_f64());
        }
        Primitives::elementwise(x, op.parse()?, y)
    }

    // =========================================================================
    // Select / Aggregate
    // =========================================================================

    /// Build a selector by name: `==`, `!=`, `<`, `<=`, `>`, `>=`.
    ///
    /// `b` may be a sequence or a scalar broadcast to `a`'s length.
    pub fn select<T, O>(&self, a: &Sequence<T>, b: O, op: &str) -> Result<Selector>
    where
        T: Element,
        O: Into<Operand>,
    {
        select(a, b, op.parse()?)
    }

    /// Aggregate with the configured aggregation.
    pub fn aggregate<T: Element>(&self, selector: &Selector, values: &Sequence<T>) -> Result<Sop> {
        aggregate(selector, values, self.config.aggregation)
    }

    /// Aggregate by name. Only `mean` is supported.
    pub fn aggregate_with<T: Element>(
        &self,
        selector: &Selector,
        values: &Sequence<T>,
        agg: &str,
    ) -> Result<Sop> {
        aggregate(selector, values, agg.parse()?)
    }

    // =========================================================================
    // Composites
    // =========================================================================

    /// Reverse a sequence through select/aggregate.
    pub fn flip<T: Element>(&self, seq: &Sequence<T>) -> Result<Sequence<T>> {
        library::flip(seq)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rasp_default_config() {
        let rasp = Rasp::new();
        assert!(!rasp.config().with_boundary);
        assert_eq!(rasp.tokens("hi").unwrap().data(), &[7, 8]);
    }

    #[test]
    fn test_rasp_boundary_config() {
        let rasp = Rasp::from_json(r#"{"with_boundary": true}"#).unwrap();
        let tokens = rasp.tokens("hi").unwrap();
        assert_eq!(tokens.data(), &[26, 7, 8]);
        assert_eq!(rasp.detokenize(&tokens).unwrap(), "hi");
    }

    #[test]
    fn test_rasp_batch_roundtrip() {
        let rasp = Rasp::new();
        let batch = rasp.tokens_batch(&["hi", "hello"]).unwrap();
        assert_eq!(batch.rows()[0].data(), &[7, 8, 26, 26, 26]);
        let rows: Vec<String> = batch
            .rows()
            .iter()
            .map(|row| rasp.detokenize(row).unwrap())
            .collect();
        assert_eq!(rows, vec!["hi", "hello"]);
    }

    #[test]
    fn test_rasp_division_safety() {
        let rasp = Rasp::new();
        let out = rasp
            .elementwise(
                &Sop::from(vec![1.0, 2.0, 0.0]),
                "/",
                &Sop::from(vec![0.0, 1.0, 0.0]),
            )
            .unwrap();
        assert_eq!(out.data(), &[0.0, 2.0, 0.0]);
    }

    #[test]
    fn test_rasp_elementwise_logical_dispatch() {
        let rasp = Rasp::new();
        let out = rasp
            .elementwise(&Sop::from(vec![1.0, 0.0, 2.0]), "and", &Sop::from(vec![1.0, 1.0, 0.0]))
            .unwrap();
        assert_eq!(out.data(), &[1.0, 0.0, 0.0]);
    }

    #[test]
    fn test_rasp_logical_not() {
        let rasp = Rasp::new();
        let x = Mask::from(vec![true, false, true]);
        let y = Mask::from(vec![false]);
        assert_eq!(rasp.logical(&x, "not", None).unwrap().data(), &[false, true, false]);
        assert_eq!(rasp.logical(&x, "not", Some(&y)).unwrap().data(), &[false, true, false]);
    }

    #[test]
    fn test_rasp_unsupported_names() {
        let rasp = Rasp::new();
        let x = Sop::from(vec![1.0]);
        let sel = rasp.select(&x, &x, "==").unwrap();

        assert!(matches!(
            rasp.elementwise(&x, "%", &x),
            Err(RaspError::UnsupportedOperator(_))
        ));
        assert!(matches!(
            rasp.select(&x, &x, "="),
            Err(RaspError::UnsupportedOperator(_))
        ));
        assert!(matches!(
            rasp.aggregate_with(&sel, &x, "sum"),
            Err(RaspError::UnsupportedAggregation(_))
        ));
        assert!(matches!(
            rasp.tokens("h1"),
            Err(RaspError::InvalidSymbol { .. })
        ));
    }

    #[test]
    fn test_rasp_select_aggregate_scenario() {
        let rasp = Rasp::new();
        let sel = rasp
            .select(&Sop::from(vec![0.0, 1.0, 2.0]), &Sop::from(vec![2.0, 1.0, 0.0]), "==")
            .unwrap();
        let out = rasp
            .aggregate_with(&sel, &Sop::from(vec![10.0, 20.0, 30.0]), "mean")
            .unwrap();
        assert_eq!(out.data(), &[30.0, 20.0, 10.0]);
    }

    #[test]
    fn test_rasp_flip_tokens() {
        let rasp = Rasp::new();
        let tokens = rasp.tokens("abc").unwrap();
        let flipped = rasp.flip(&tokens).unwrap();
        assert_eq!(rasp.detokenize(&flipped).unwrap(), "cba");
    }
}
