//! Error types for the CLI application.

use thiserror::Error;

/// Result type alias for CLI operations.
pub type Result<T> = std::result::Result<T, CliError>;

/// CLI-specific errors.
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Assistant service error
    #[error("Assistant error: {0}")]
    Assistant(#[from] lexintake_assistant::AssistantError),

    /// Document store error
    #[error("Store error: {0}")]
    Store(#[from] lexintake_store::StoreError),

    /// Batch intake error
    #[error("Intake error: {0}")]
    Intake(#[from] lexintake_intake::IntakeError),

    /// Extraction error
    #[error("Extraction error: {0}")]
    Extract(#[from] lexintake_extractor::ExtractError),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// TOML parsing error
    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}
