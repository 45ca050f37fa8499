//! Unified error system for Trellis infrastructure
//!
//! Domain crates define their own error taxonomies; this type covers the
//! infrastructure concerns (configuration files, log setup) that every crate
//! shares.

use serde::{Deserialize, Serialize};

/// Unified error type for infrastructure operations
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
pub enum TrellisError {
    /// Invalid input or configuration
    #[error("Invalid: {message}")]
    Invalid {
        /// Error message describing the invalid input
        message: String,
    },

    /// Resource not found
    #[error("Not found: {message}")]
    NotFound {
        /// Error message describing what was not found
        message: String,
    },

    /// Internal system error
    #[error("Internal error: {message}")]
    Internal {
        /// Error message describing the internal error
        message: String,
    },
}

impl TrellisError {
    /// Create an invalid input error
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::Invalid {
            message: message.into(),
        }
    }

    /// Create a not found error
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
        }
    }

    /// Create an internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }
}

impl From<toml::de::Error> for TrellisError {
    fn from(err: toml::de::Error) -> Self {
        Self::invalid(format!("Invalid TOML: {err}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let err = TrellisError::invalid("test message");
        assert!(matches!(err, TrellisError::Invalid { .. }));
        assert_eq!(err.to_string(), "Invalid: test message");
    }

    #[test]
    fn test_toml_error_is_invalid() {
        let toml_err = toml::from_str::<toml::Value>("key = ").unwrap_err();
        let err = TrellisError::from(toml_err);
        assert!(matches!(err, TrellisError::Invalid { .. }));
        assert!(err.to_string().starts_with("Invalid: Invalid TOML"));
    }
}
