//! Configuration validation utilities and rules

use crate::errors::TrellisError;
use std::fmt;

/// Configuration validation result
pub type ValidationResult = Result<(), ConfigValidationError>;

/// Configuration validation errors
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigValidationError {
    /// Value is required but empty
    Required { field: String },
    /// Value is out of acceptable range
    OutOfRange {
        field: String,
        min: Option<f64>,
        max: Option<f64>,
        actual: f64,
    },
    /// Value is not one of the accepted choices
    NotOneOf {
        field: String,
        expected: Vec<String>,
        actual: String,
    },
}

impl fmt::Display for ConfigValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigValidationError::Required { field } => {
                write!(f, "Field '{field}' is required but empty")
            }
            ConfigValidationError::OutOfRange {
                field,
                min,
                max,
                actual,
            } => {
                let range_desc = match (min, max) {
                    (Some(min), Some(max)) => format!("between {min} and {max}"),
                    (Some(min), None) => format!("at least {min}"),
                    (None, Some(max)) => format!("at most {max}"),
                    (None, None) => "in valid range".to_string(),
                };
                write!(f, "Field '{field}' must be {range_desc} (got {actual})")
            }
            ConfigValidationError::NotOneOf {
                field,
                expected,
                actual,
            } => {
                write!(
                    f,
                    "Field '{field}' must be one of [{}], got '{actual}'",
                    expected.join(", ")
                )
            }
        }
    }
}

impl std::error::Error for ConfigValidationError {}

impl From<ConfigValidationError> for TrellisError {
    fn from(err: ConfigValidationError) -> Self {
        TrellisError::invalid(err.to_string())
    }
}

/// Configuration validator that accumulates validation rules
#[derive(Debug, Default)]
pub struct ConfigValidator {
    errors: Vec<ConfigValidationError>,
}

impl ConfigValidator {
    /// Create a new validator
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate that a string is not blank
    pub fn non_empty(&mut self, field_name: &str, value: &str) -> &mut Self {
        if value.trim().is_empty() {
            self.errors.push(ConfigValidationError::Required {
                field: field_name.to_string(),
            });
        }
        self
    }

    /// Validate that a number is within range
    pub fn range<T>(&mut self, field_name: &str, value: T, min: Option<T>, max: Option<T>) -> &mut Self
    where
        T: PartialOrd + Copy + Into<f64>,
    {
        let below = min.is_some_and(|min_val| value < min_val);
        let above = max.is_some_and(|max_val| value > max_val);

        if below || above {
            self.errors.push(ConfigValidationError::OutOfRange {
                field: field_name.to_string(),
                min: min.map(Into::into),
                max: max.map(Into::into),
                actual: value.into(),
            });
        }
        self
    }

    /// Validate that a value is one of the accepted choices (case-insensitive)
    pub fn one_of(&mut self, field_name: &str, value: &str, choices: &[&str]) -> &mut Self {
        if !choices.iter().any(|c| c.eq_ignore_ascii_case(value)) {
            self.errors.push(ConfigValidationError::NotOneOf {
                field: field_name.to_string(),
                expected: choices.iter().map(|c| (*c).to_string()).collect(),
                actual: value.to_string(),
            });
        }
        self
    }

    /// Get validation result; reports the first error
    pub fn result(self) -> ValidationResult {
        match self.errors.into_iter().next() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    /// Get all validation errors
    pub fn all_errors(self) -> Vec<ConfigValidationError> {
        self.errors
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validator_accumulates_errors() {
        let mut validator = ConfigValidator::new();
        validator
            .non_empty("name", "  ")
            .range("limit", 0u32, Some(1), Some(100))
            .one_of("level", "loud", &["info", "debug"]);

        let errors = validator.all_errors();
        assert_eq!(errors.len(), 3);
        assert!(errors[1].to_string().contains("between 1 and 100"));
    }

    #[test]
    fn test_one_of_ignores_case() {
        let mut validator = ConfigValidator::new();
        validator.one_of("level", "INFO", &["info", "debug"]);
        assert!(validator.result().is_ok());
    }
}
