//! Configuration for the extraction workflow

use crate::prompt::DEFAULT_CONTRACT_FIELDS;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Configuration for [`ExtractionClient`](crate::ExtractionClient)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractorConfig {
    /// Fixed interval between run-status polls (milliseconds)
    pub poll_interval_ms: u64,

    /// Maximum total time to poll one run before giving up (seconds).
    /// The upstream service offers no bound of its own; without this a run
    /// that never completes would block its file indefinitely.
    pub max_poll_secs: u64,

    /// Field names requested from the assistant, in display order. This is
    /// data, not logic: the extraction instruction block is generated from it.
    #[serde(default = "default_fields")]
    pub fields: Vec<String>,
}

fn default_fields() -> Vec<String> {
    DEFAULT_CONTRACT_FIELDS
        .iter()
        .map(|s| s.to_string())
        .collect()
}

impl ExtractorConfig {
    /// Poll interval as a Duration
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    /// Poll deadline as a Duration
    pub fn max_poll(&self) -> Duration {
        Duration::from_secs(self.max_poll_secs)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.poll_interval_ms == 0 {
            return Err("poll_interval_ms must be greater than 0".to_string());
        }
        if self.max_poll_secs == 0 {
            return Err("max_poll_secs must be greater than 0".to_string());
        }
        if self.fields.is_empty() {
            return Err("fields must not be empty".to_string());
        }
        Ok(())
    }

    /// Load configuration from a TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, String> {
        toml::from_str(toml_str).map_err(|e| format!("Failed to parse TOML: {}", e))
    }

    /// Serialize configuration to a TOML string
    pub fn to_toml(&self) -> Result<String, String> {
        toml::to_string_pretty(self).map_err(|e| format!("Failed to serialize to TOML: {}", e))
    }
}

impl Default for ExtractorConfig {
    /// One-second polls bounded at five minutes, requesting the standard
    /// contract field set
    fn default() -> Self {
        Self {
            poll_interval_ms: 1_000,
            max_poll_secs: 300,
            fields: default_fields(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = ExtractorConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.poll_interval(), Duration::from_secs(1));
    }

    #[test]
    fn test_zero_interval_rejected() {
        let mut config = ExtractorConfig::default();
        config.poll_interval_ms = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_zero_deadline_rejected() {
        let mut config = ExtractorConfig::default();
        config.max_poll_secs = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_empty_fields_rejected() {
        let mut config = ExtractorConfig::default();
        config.fields.clear();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_toml_round_trip() {
        let config = ExtractorConfig::default();
        let toml_str = config.to_toml().unwrap();
        let parsed = ExtractorConfig::from_toml(&toml_str).unwrap();

        assert_eq!(config.poll_interval_ms, parsed.poll_interval_ms);
        assert_eq!(config.max_poll_secs, parsed.max_poll_secs);
        assert_eq!(config.fields, parsed.fields);
    }

    #[test]
    fn test_toml_without_fields_uses_default_list() {
        let parsed =
            ExtractorConfig::from_toml("poll_interval_ms = 500\nmax_poll_secs = 60\n").unwrap();
        assert!(!parsed.fields.is_empty());
        assert_eq!(parsed.poll_interval_ms, 500);
    }
}
