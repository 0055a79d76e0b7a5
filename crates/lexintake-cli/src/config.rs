//! Configuration management for the CLI.

use crate::error::{CliError, Result};
use lexintake_assistant::AssistantConfig;
use lexintake_extractor::{ExtractorConfig, DEFAULT_CONTRACT_FIELDS};
use lexintake_store::StoreConfig;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

/// CLI configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Assistant service connection
    #[serde(default)]
    pub assistant: AssistantSettings,

    /// Document and blob store connection
    #[serde(default)]
    pub store: StoreSettings,

    /// Global settings
    #[serde(default)]
    pub settings: Settings,
}

/// Assistant connection and extraction settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssistantSettings {
    /// Base URL of the assistant service
    #[serde(default = "default_assistant_url")]
    pub base_url: String,

    /// Bearer token
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Identifier of the pre-configured assistant
    #[serde(default)]
    pub assistant_id: String,

    /// Identifier of the pre-configured knowledge store
    #[serde(default)]
    pub vector_store_id: String,

    /// Interval between run-status polls (milliseconds)
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,

    /// Maximum total time to poll one run (seconds)
    #[serde(default = "default_max_poll_secs")]
    pub max_poll_secs: u64,

    /// Field names requested from the assistant
    #[serde(default = "default_fields")]
    pub fields: Vec<String>,
}

/// Document and blob store settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreSettings {
    /// Base URL of the storage service
    #[serde(default)]
    pub base_url: String,

    /// Bearer token
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Collection name
    #[serde(default = "default_collection")]
    pub collection: String,

    /// Document key within the collection
    #[serde(default = "default_key")]
    pub key: String,
}

/// Global CLI settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Enable colored output
    #[serde(default = "default_true")]
    pub color: bool,

    /// Chat history size
    #[serde(default = "default_history_size")]
    pub history_size: usize,
}

impl Config {
    /// Get the configuration file path.
    pub fn path() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| CliError::Config("Could not find home directory".into()))?;
        Ok(home.join(".lexintake").join("config.toml"))
    }

    /// Load configuration from file or create default.
    pub fn load() -> Result<Self> {
        let path = Self::path()?;

        if path.exists() {
            let contents = fs::read_to_string(&path)?;
            let config: Config = toml::from_str(&contents)?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    /// Save configuration to file.
    pub fn save(&self) -> Result<()> {
        let path = Self::path()?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)
            .map_err(|e| CliError::Config(format!("Failed to serialize config: {}", e)))?;
        fs::write(&path, contents)?;
        Ok(())
    }
}

impl AssistantSettings {
    /// Connection configuration for the assistant client.
    pub fn assistant_config(&self) -> AssistantConfig {
        AssistantConfig {
            base_url: self.base_url.clone(),
            api_key: self.api_key.clone(),
            assistant_id: self.assistant_id.clone(),
            vector_store_id: self.vector_store_id.clone(),
            ..AssistantConfig::default()
        }
    }

    /// Polling and field configuration for the extraction client.
    pub fn extractor_config(&self) -> ExtractorConfig {
        ExtractorConfig {
            poll_interval_ms: self.poll_interval_ms,
            max_poll_secs: self.max_poll_secs,
            fields: self.fields.clone(),
        }
    }
}

impl StoreSettings {
    /// Connection configuration for the store clients.
    pub fn store_config(&self) -> StoreConfig {
        StoreConfig {
            base_url: self.base_url.clone(),
            api_key: self.api_key.clone(),
            collection: self.collection.clone(),
            key: self.key.clone(),
            ..StoreConfig::default()
        }
    }
}

impl Default for AssistantSettings {
    fn default() -> Self {
        Self {
            base_url: default_assistant_url(),
            api_key: None,
            assistant_id: String::new(),
            vector_store_id: String::new(),
            poll_interval_ms: default_poll_interval_ms(),
            max_poll_secs: default_max_poll_secs(),
            fields: default_fields(),
        }
    }
}

impl Default for StoreSettings {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            api_key: None,
            collection: default_collection(),
            key: default_key(),
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            color: true,
            history_size: 1000,
        }
    }
}

fn default_assistant_url() -> String {
    lexintake_assistant::remote::DEFAULT_BASE_URL.to_string()
}

fn default_poll_interval_ms() -> u64 {
    1_000
}

fn default_max_poll_secs() -> u64 {
    300
}

fn default_fields() -> Vec<String> {
    DEFAULT_CONTRACT_FIELDS.iter().map(|s| s.to_string()).collect()
}

fn default_collection() -> String {
    lexintake_store::remote::DEFAULT_COLLECTION.to_string()
}

fn default_key() -> String {
    lexintake_store::remote::DEFAULT_KEY.to_string()
}

fn default_true() -> bool {
    true
}

fn default_history_size() -> usize {
    1000
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(config.settings.color);
        assert_eq!(config.assistant.poll_interval_ms, 1_000);
        assert_eq!(config.store.collection, "legalAnalyzer");
        assert!(!config.assistant.fields.is_empty());
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let toml_str = r#"
            [assistant]
            assistant_id = "asst_123"
            vector_store_id = "vs_456"

            [store]
            base_url = "http://localhost:8080"
        "#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.assistant.assistant_id, "asst_123");
        assert_eq!(config.assistant.max_poll_secs, 300);
        assert_eq!(config.store.key, "documents");
    }

    #[test]
    fn test_config_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        let mut config = Config::default();
        config.assistant.assistant_id = "asst_abc".to_string();
        let contents = toml::to_string_pretty(&config).unwrap();
        fs::write(&path, contents).unwrap();

        let loaded: Config = toml::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(loaded.assistant.assistant_id, "asst_abc");
    }

    #[test]
    fn test_extractor_config_conversion() {
        let mut settings = AssistantSettings::default();
        settings.poll_interval_ms = 500;
        let extractor = settings.extractor_config();
        assert_eq!(extractor.poll_interval_ms, 500);
        assert!(extractor.validate().is_ok());
    }
}
