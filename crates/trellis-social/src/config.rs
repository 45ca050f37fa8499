//! Engine configuration
//!
//! Loaded from defaults, an optional TOML file, then `TRELLIS_*`
//! environment variables.

use serde::{Deserialize, Serialize};
use trellis_core::config::{parse_value, ConfigValidator, TrellisConfig};
use trellis_core::TrellisError;

/// Upper bound accepted for `max_comment_length`
pub const COMMENT_LENGTH_CEILING: usize = 100_000;

/// Upper bound accepted for `suggestion_limit` and `search_limit`
pub const SUGGESTION_LIMIT_CEILING: usize = 1_000;

const LOG_LEVELS: &[&str] = &["error", "warn", "info", "debug", "trace"];

/// Social engine configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SocialConfig {
    /// Emit notifications for unfollow, unlike and unsave transitions
    pub emit_retraction_notices: bool,
    /// Maximum comment length in characters, after trimming
    pub max_comment_length: usize,
    /// Maximum number of users returned by `suggested_users`
    pub suggestion_limit: usize,
    /// Maximum number of users returned by `search_users`
    pub search_limit: usize,
    /// Tracing level used when `RUST_LOG` is unset; one of `error`, `warn`,
    /// `info`, `debug` or `trace`. Per-target directives go in `RUST_LOG`.
    pub log_level: String,
}

impl Default for SocialConfig {
    fn default() -> Self {
        Self {
            emit_retraction_notices: true,
            max_comment_length: 2_200,
            suggestion_limit: 20,
            search_limit: 20,
            log_level: "info".to_string(),
        }
    }
}

impl SocialConfig {
    /// Disable or enable retraction notices.
    pub fn with_retraction_notices(mut self, enabled: bool) -> Self {
        self.emit_retraction_notices = enabled;
        self
    }

    /// Override the comment length limit.
    pub fn with_max_comment_length(mut self, max: usize) -> Self {
        self.max_comment_length = max;
        self
    }

    /// Override the suggestion limit.
    pub fn with_suggestion_limit(mut self, limit: usize) -> Self {
        self.suggestion_limit = limit;
        self
    }

    /// Override the user search limit.
    pub fn with_search_limit(mut self, limit: usize) -> Self {
        self.search_limit = limit;
        self
    }
}

impl TrellisConfig for SocialConfig {
    const ENV_PREFIX: &'static str = "TRELLIS_";

    fn set_from_string(&mut self, key: &str, value: &str) -> Result<bool, TrellisError> {
        match key {
            "emit_retraction_notices" => self.emit_retraction_notices = parse_value(key, value)?,
            "max_comment_length" => self.max_comment_length = parse_value(key, value)?,
            "suggestion_limit" => self.suggestion_limit = parse_value(key, value)?,
            "search_limit" => self.search_limit = parse_value(key, value)?,
            "log_level" => self.log_level = value.trim().to_string(),
            _ => return Ok(false),
        }
        Ok(true)
    }

    fn validate(&self) -> Result<(), TrellisError> {
        let mut validator = ConfigValidator::new();
        validator
            .range(
                "max_comment_length",
                self.max_comment_length as f64,
                Some(1.0),
                Some(COMMENT_LENGTH_CEILING as f64),
            )
            .range(
                "suggestion_limit",
                self.suggestion_limit as f64,
                Some(1.0),
                Some(SUGGESTION_LIMIT_CEILING as f64),
            )
            .range(
                "search_limit",
                self.search_limit as f64,
                Some(1.0),
                Some(SUGGESTION_LIMIT_CEILING as f64),
            )
            .non_empty("log_level", &self.log_level)
            .one_of("log_level", &self.log_level, LOG_LEVELS);
        validator.result()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults_are_valid() {
        let config = SocialConfig::defaults();
        assert!(config.emit_retraction_notices);
        assert_eq!(config.max_comment_length, 2_200);
        assert_eq!(config.suggestion_limit, 20);
        assert_eq!(config.search_limit, 20);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_load_from_toml_file_keeps_unset_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "emit_retraction_notices = false").unwrap();
        writeln!(file, "suggestion_limit = 5").unwrap();

        let config = SocialConfig::load_from_file(file.path()).unwrap();
        assert!(!config.emit_retraction_notices);
        assert_eq!(config.suggestion_limit, 5);
        assert_eq!(config.max_comment_length, 2_200);
    }

    #[test]
    fn test_env_pairs_override_and_ignore_foreign_keys() {
        let mut config = SocialConfig::default();
        config
            .merge_with_pairs(vec![
                ("TRELLIS_MAX_COMMENT_LENGTH".to_string(), "140".to_string()),
                ("TRELLIS_EMIT_RETRACTION_NOTICES".to_string(), "false".to_string()),
                ("TRELLIS_UNKNOWN".to_string(), "x".to_string()),
                ("HOME".to_string(), "/root".to_string()),
            ])
            .unwrap();

        assert_eq!(config.max_comment_length, 140);
        assert!(!config.emit_retraction_notices);
    }

    #[test]
    fn test_bad_env_value_is_rejected() {
        let mut config = SocialConfig::default();
        let result = config.merge_with_pairs(vec![(
            "TRELLIS_SUGGESTION_LIMIT".to_string(),
            "many".to_string(),
        )]);
        assert!(matches!(result, Err(TrellisError::Invalid { .. })));
    }

    #[test]
    fn test_validation_rejects_out_of_range() {
        let config = SocialConfig::default().with_suggestion_limit(0);
        assert!(config.validate().is_err());

        let config = SocialConfig::default().with_search_limit(SUGGESTION_LIMIT_CEILING + 1);
        assert!(config.validate().is_err());

        let config = SocialConfig {
            log_level: "loud".to_string(),
            ..SocialConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_log_level_accepts_bare_levels_only() {
        let debug = SocialConfig {
            log_level: "debug".to_string(),
            ..SocialConfig::default()
        };
        assert!(debug.validate().is_ok());

        let directive = SocialConfig {
            log_level: "trellis_social=debug".to_string(),
            ..SocialConfig::default()
        };
        assert!(matches!(
            directive.validate(),
            Err(TrellisError::Invalid { .. })
        ));
    }
}
