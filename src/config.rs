//! Configuration for the [`Rasp`](crate::Rasp) client.

use crate::aggregate::Aggregation;
use crate::error::Result;
use serde::{Deserialize, Serialize};

/// Defaults the client applies when a call does not say otherwise.
///
/// Every field has a default, so a partial (or empty) JSON object is valid:
///
/// ```rust
/// use rasp::Config;
///
/// let config = Config::from_json(r#"{"with_boundary": true}"#)?;
/// assert!(config.with_boundary);
/// # Ok::<(), rasp::RaspError>(())
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Prepend / expect the boundary symbol in `tokens` and `detokenize`
    pub with_boundary: bool,
    /// Aggregation used by `aggregate` calls that pass no name
    pub aggregation: Aggregation,
}

impl Config {
    /// Parse a configuration from JSON.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Serialize the configuration to JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RaspError;

    #[test]
    fn test_defaults() {
        let config = Config::from_json("{}").unwrap();
        assert_eq!(config, Config::default());
        assert!(!config.with_boundary);
        assert_eq!(config.aggregation, Aggregation::Mean);
    }

    #[test]
    fn test_full_config() {
        let config = Config::from_json(r#"{"with_boundary": true, "aggregation": "mean"}"#).unwrap();
        assert!(config.with_boundary);
        assert_eq!(Config::from_json(&config.to_json().unwrap()).unwrap(), config);
    }

    #[test]
    fn test_unknown_aggregation_rejected() {
        let err = Config::from_json(r#"{"aggregation": "max"}"#).unwrap_err();
        assert!(matches!(err, RaspError::ConfigParse(_)));
    }

    #[test]
    fn test_unknown_field_rejected() {
        assert!(Config::from_json(r#"{"bos": true}"#).is_err());
    }
}
