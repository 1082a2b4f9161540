//! Compiler configuration.
//!
//! Curated card data is often drafted with placeholder cost text, so the
//! compiler is permissive by default. Data-entry tooling that wants to
//! reject typos can switch to strict mode.

use crate::error::CostError;
use serde::{Deserialize, Serialize};

/// How the compiler treats tokens it cannot parse.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParseMode {
    /// Unparseable tokens weigh nothing and are left out of the mappings.
    #[default]
    Permissive,
    /// Unparseable tokens fail compilation.
    Strict,
}

/// Configuration for a `CostCompiler`.
///
/// # Examples
///
/// ```rust
/// use dicecost::{CompilerConfig, ParseMode};
///
/// let config = CompilerConfig::from_json_str(r#"{ "mode": "strict" }"#).unwrap();
/// assert_eq!(config.mode, ParseMode::Strict);
///
/// let config = CompilerConfig::from_json_str("{}").unwrap();
/// assert_eq!(config.mode, ParseMode::Permissive);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CompilerConfig {
    pub mode: ParseMode,
}

impl CompilerConfig {
    pub fn strict() -> Self {
        Self {
            mode: ParseMode::Strict,
        }
    }

    /// Read a configuration from JSON. Missing fields take their defaults.
    pub fn from_json_str(json: &str) -> Result<Self, CostError> {
        serde_json::from_str(json).map_err(|err| CostError::InvalidConfig(err.to_string()))
    }

    pub fn is_strict(&self) -> bool {
        self.mode == ParseMode::Strict
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_permissive() {
        assert!(!CompilerConfig::default().is_strict());
        assert!(CompilerConfig::strict().is_strict());
    }

    #[test]
    fn test_rejects_unknown_mode() {
        let err = CompilerConfig::from_json_str(r#"{ "mode": "lenient" }"#).unwrap_err();
        assert!(matches!(err, CostError::InvalidConfig(_)));
    }

    #[test]
    fn test_rejects_unknown_field() {
        assert!(CompilerConfig::from_json_str(r#"{ "strictness": 1 }"#).is_err());
    }
}
