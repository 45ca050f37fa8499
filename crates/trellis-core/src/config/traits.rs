//! Core configuration traits for the Trellis configuration system
//!
//! Configuration is layered: defaults, then an optional TOML file, then
//! environment variables carrying the type's prefix.

use crate::errors::TrellisError;
use serde::de::DeserializeOwned;
use std::path::Path;

/// Core trait for Trellis configuration types
pub trait TrellisConfig: Clone + Default + DeserializeOwned + Send + Sync + 'static {
    /// Environment variable prefix, e.g. `TRELLIS_`
    const ENV_PREFIX: &'static str;

    /// Get default configuration values
    fn defaults() -> Self {
        Self::default()
    }

    /// Load configuration from a TOML file
    fn load_from_file(path: &Path) -> Result<Self, TrellisError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            TrellisError::not_found(format!(
                "Failed to read config file {}: {e}",
                path.display()
            ))
        })?;
        Ok(toml::from_str(&content)?)
    }

    /// Set a configuration value from a string.
    ///
    /// Returns `Ok(false)` for keys this type does not know.
    fn set_from_string(&mut self, key: &str, value: &str) -> Result<bool, TrellisError>;

    /// Validate the configuration
    fn validate(&self) -> Result<(), TrellisError>;

    /// Merge `PREFIX_KEY=value` pairs; unknown keys are ignored.
    fn merge_with_pairs<I>(&mut self, pairs: I) -> Result<(), TrellisError>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        for (key, value) in pairs {
            if let Some(config_key) = key.strip_prefix(Self::ENV_PREFIX) {
                self.set_from_string(&config_key.to_lowercase(), &value)?;
            }
        }
        Ok(())
    }

    /// Merge with environment variables
    fn merge_with_env(&mut self) -> Result<(), TrellisError> {
        self.merge_with_pairs(std::env::vars())
    }

    /// Defaults, then `path` if given, then the environment; validated.
    fn load(path: Option<&Path>) -> Result<Self, TrellisError> {
        let mut config = match path {
            Some(path) => Self::load_from_file(path)?,
            None => Self::defaults(),
        };
        config.merge_with_env()?;
        config.validate()?;
        Ok(config)
    }
}

/// Parse a config value, mapping failures to `TrellisError::Invalid`.
pub fn parse_value<T>(key: &str, value: &str) -> Result<T, TrellisError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    value
        .trim()
        .parse()
        .map_err(|e| TrellisError::invalid(format!("Invalid value for {key}: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use std::io::Write;

    #[derive(Debug, Clone, PartialEq, Deserialize)]
    #[serde(default)]
    struct ProbeConfig {
        limit: u32,
        name: String,
    }

    impl Default for ProbeConfig {
        fn default() -> Self {
            Self {
                limit: 10,
                name: "probe".to_string(),
            }
        }
    }

    impl TrellisConfig for ProbeConfig {
        const ENV_PREFIX: &'static str = "PROBE_";

        fn set_from_string(&mut self, key: &str, value: &str) -> Result<bool, TrellisError> {
            match key {
                "limit" => self.limit = parse_value(key, value)?,
                "name" => self.name = value.to_string(),
                _ => return Ok(false),
            }
            Ok(true)
        }

        fn validate(&self) -> Result<(), TrellisError> {
            if self.limit == 0 {
                return Err(TrellisError::invalid("limit must be positive"));
            }
            Ok(())
        }
    }

    #[test]
    fn test_file_then_pairs_layering() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "limit = 3").unwrap();

        let mut config = ProbeConfig::load_from_file(file.path()).unwrap();
        assert_eq!(config.limit, 3);
        assert_eq!(config.name, "probe");

        config
            .merge_with_pairs(vec![
                ("PROBE_NAME".to_string(), "layered".to_string()),
                ("OTHER_LIMIT".to_string(), "99".to_string()),
            ])
            .unwrap();
        assert_eq!(config.name, "layered");
        assert_eq!(config.limit, 3);
    }

    #[test]
    fn test_missing_file_and_bad_toml() {
        let missing = ProbeConfig::load_from_file(Path::new("/nonexistent/probe.toml"));
        assert!(matches!(missing, Err(TrellisError::NotFound { .. })));

        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "limit = \"three\"").unwrap();
        let bad = ProbeConfig::load_from_file(file.path());
        assert!(matches!(bad, Err(TrellisError::Invalid { .. })));
    }

    #[test]
    fn test_parse_value_reports_key() {
        let err = parse_value::<u32>("limit", "lots").unwrap_err();
        assert!(err.to_string().contains("limit"));
    }
}
