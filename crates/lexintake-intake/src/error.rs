//! Error types for batch intake

use lexintake_extractor::ExtractError;
use thiserror::Error;

/// Errors surfaced by the intake supervisor
#[derive(Error, Debug)]
pub enum IntakeError {
    /// A batch is already running; one batch at a time
    #[error("a batch is already running")]
    BatchActive,

    /// Per-file extraction failed; later files in the batch were not
    /// attempted (fail-fast)
    #[error("extraction failed for {filename}: {source}")]
    Extraction {
        /// File whose extraction failed
        filename: String,
        /// The underlying extraction error
        #[source]
        source: ExtractError,
    },

    /// Upload of the original bytes to blob storage failed
    #[error("blob upload failed for {filename}: {message}")]
    Blob {
        /// File whose blob upload failed
        filename: String,
        /// The underlying storage error
        message: String,
    },

    /// The computed batch could not be persisted; in-memory results were
    /// intact but not durable
    #[error("document store save failed: {0}")]
    StoreSave(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = IntakeError::Extraction {
            filename: "a.pdf".to_string(),
            source: ExtractError::NoAssistantReply,
        };
        assert!(err.to_string().contains("a.pdf"));

        assert_eq!(
            IntakeError::BatchActive.to_string(),
            "a batch is already running"
        );
    }
}
