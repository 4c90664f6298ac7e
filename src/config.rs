//! Paginator configuration
//!
//! Tunables shared by every paginator, loadable from YAML or JSON:
//!
//! ```yaml
//! initial_limit_multiple: 2
//! extended_search_limit_multiple: 2
//! growth:
//!   type: median_reselect
//! max_rounds: 50
//! timeout_ms: 5000
//! ```

use crate::error::{Error, Result};
use crate::pagination::{GrowthPolicy, RunLimits};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;

/// Configuration for a paginator instance
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PaginatorConfig {
    /// First window = item limit × this multiple
    pub initial_limit_multiple: usize,

    /// Window growth factor of the top-window paginator
    pub extended_search_limit_multiple: usize,

    /// Window growth between rounds of the core paginator
    pub growth: GrowthPolicy,

    /// Maximum retrieval rounds per call
    pub max_rounds: Option<usize>,

    /// Wall-clock budget per call, in milliseconds
    pub timeout_ms: Option<u64>,
}

impl Default for PaginatorConfig {
    fn default() -> Self {
        Self {
            initial_limit_multiple: 1,
            extended_search_limit_multiple: 2,
            growth: GrowthPolicy::Fixed,
            max_rounds: None,
            timeout_ms: None,
        }
    }
}

impl PaginatorConfig {
    /// Create the default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the initial limit multiple
    #[must_use]
    pub fn with_initial_limit_multiple(mut self, multiple: usize) -> Self {
        self.initial_limit_multiple = multiple;
        self
    }

    /// Set the extended search limit multiple
    #[must_use]
    pub fn with_extended_search_limit_multiple(mut self, multiple: usize) -> Self {
        self.extended_search_limit_multiple = multiple;
        self
    }

    /// Set the growth policy
    #[must_use]
    pub fn with_growth(mut self, growth: GrowthPolicy) -> Self {
        self.growth = growth;
        self
    }

    /// Set the round cap
    #[must_use]
    pub fn with_max_rounds(mut self, max_rounds: usize) -> Self {
        self.max_rounds = Some(max_rounds);
        self
    }

    /// Set the per-call timeout
    #[must_use]
    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = Some(timeout_ms);
        self
    }

    /// Check every value is in range
    pub fn validate(&self) -> Result<()> {
        if self.initial_limit_multiple < 1 {
            return Err(Error::invalid_config(
                "initial_limit_multiple",
                "must be at least 1",
            ));
        }

        if self.extended_search_limit_multiple < 2 {
            return Err(Error::invalid_config(
                "extended_search_limit_multiple",
                "must be at least 2",
            ));
        }

        if let GrowthPolicy::Geometric { multiple } = self.growth {
            if multiple < 2 {
                return Err(Error::invalid_config(
                    "growth.multiple",
                    "geometric growth needs a multiple of at least 2",
                ));
            }
        }

        if self.max_rounds == Some(0) {
            return Err(Error::invalid_config("max_rounds", "must be at least 1"));
        }

        if self.timeout_ms == Some(0) {
            return Err(Error::invalid_config("timeout_ms", "must be at least 1"));
        }

        Ok(())
    }

    /// Run limits described by this configuration
    pub fn run_limits(&self) -> RunLimits {
        RunLimits {
            max_rounds: self.max_rounds,
            timeout: self.timeout_ms.map(Duration::from_millis),
            cancel: None,
        }
    }

    /// Parse and validate a YAML configuration
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(yaml)
            .map_err(|e| Error::config(format!("Failed to parse paginator YAML: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Parse and validate a JSON configuration
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)
            .map_err(|e| Error::config(format!("Failed to parse paginator JSON: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Load a configuration file; `.json` files are parsed as JSON, anything
    /// else as YAML
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                Error::FileNotFound {
                    path: path.display().to_string(),
                }
            } else {
                Error::config(format!(
                    "Failed to read paginator config '{}': {}",
                    path.display(),
                    e
                ))
            }
        })?;

        let is_json = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
        if is_json {
            Self::from_json_str(&content)
        } else {
            Self::from_yaml_str(&content)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = PaginatorConfig::default();
        assert_eq!(config.initial_limit_multiple, 1);
        assert_eq!(config.extended_search_limit_multiple, 2);
        assert_eq!(config.growth, GrowthPolicy::Fixed);
        assert!(config.max_rounds.is_none());
        assert!(config.timeout_ms.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_full_yaml() {
        let yaml = r"
initial_limit_multiple: 3
extended_search_limit_multiple: 4
growth:
  type: geometric
  multiple: 2
max_rounds: 10
timeout_ms: 2500
";
        let config = PaginatorConfig::from_yaml_str(yaml).unwrap();
        assert_eq!(config.initial_limit_multiple, 3);
        assert_eq!(config.extended_search_limit_multiple, 4);
        assert_eq!(config.growth, GrowthPolicy::geometric(2));
        assert_eq!(config.max_rounds, Some(10));

        let limits = config.run_limits();
        assert_eq!(limits.max_rounds, Some(10));
        assert_eq!(limits.timeout, Some(Duration::from_millis(2500)));
    }

    #[test]
    fn test_partial_yaml_uses_defaults() {
        let config = PaginatorConfig::from_yaml_str("growth:\n  type: median_reselect\n").unwrap();
        assert_eq!(config.initial_limit_multiple, 1);
        assert_eq!(config.growth, GrowthPolicy::MedianReselect);
    }

    #[test]
    fn test_parse_json() {
        let config =
            PaginatorConfig::from_json_str(r#"{"initial_limit_multiple": 2, "max_rounds": 4}"#)
                .unwrap();
        assert_eq!(config.initial_limit_multiple, 2);
        assert_eq!(config.max_rounds, Some(4));
    }

    #[test]
    fn test_unknown_field_rejected() {
        let err = PaginatorConfig::from_yaml_str("page_sise: 10\n").unwrap_err();
        assert!(err.to_string().contains("Failed to parse paginator YAML"));
    }

    #[test]
    fn test_validation_rejects_out_of_range_values() {
        let cases = [
            (
                PaginatorConfig::new().with_initial_limit_multiple(0),
                "initial_limit_multiple",
            ),
            (
                PaginatorConfig::new().with_extended_search_limit_multiple(1),
                "extended_search_limit_multiple",
            ),
            (
                PaginatorConfig::new().with_growth(GrowthPolicy::geometric(1)),
                "growth.multiple",
            ),
            (PaginatorConfig::new().with_max_rounds(0), "max_rounds"),
            (PaginatorConfig::new().with_timeout_ms(0), "timeout_ms"),
        ];

        for (config, expected_field) in cases {
            match config.validate() {
                Err(Error::InvalidConfigValue { field, .. }) => assert_eq!(field, expected_field),
                other => panic!("Expected invalid {expected_field}, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_load_from_files() {
        let dir = tempfile::tempdir().unwrap();

        let yaml_path = dir.path().join("paginator.yaml");
        let mut file = std::fs::File::create(&yaml_path).unwrap();
        writeln!(file, "initial_limit_multiple: 2").unwrap();
        assert_eq!(
            PaginatorConfig::load(&yaml_path)
                .unwrap()
                .initial_limit_multiple,
            2
        );

        let json_path = dir.path().join("paginator.json");
        std::fs::write(&json_path, r#"{"timeout_ms": 100}"#).unwrap();
        assert_eq!(PaginatorConfig::load(&json_path).unwrap().timeout_ms, Some(100));

        let missing = dir.path().join("missing.yaml");
        assert!(matches!(
            PaginatorConfig::load(&missing),
            Err(Error::FileNotFound { .. })
        ));
    }
}
