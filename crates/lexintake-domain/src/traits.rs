//! Trait definitions for external interactions
//!
//! These traits define the boundaries between the intake pipeline and the
//! services it delegates to. Implementations live in the infrastructure
//! crates (lexintake-assistant, lexintake-store).

use crate::record::RecordSet;
use async_trait::async_trait;

/// Status of an assistant run, reduced from the service's status string.
///
/// The pipeline depends only on three facts: the run finished successfully,
/// it is still making progress, or it reached a terminal state it will never
/// leave. The raw status string is carried for diagnostics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunStatus {
    /// Terminal success: a result message is available
    Completed,
    /// Still queued or executing; keep polling
    InProgress(String),
    /// Terminal non-success: polling further can never succeed
    Failed(String),
}

impl RunStatus {
    /// Classify a raw status string from the service.
    ///
    /// Unknown statuses are treated as in-progress; only the documented
    /// terminal statuses stop the poll loop.
    pub fn from_api_str(status: &str) -> Self {
        match status {
            "completed" => RunStatus::Completed,
            "failed" | "cancelled" | "expired" | "incomplete" => {
                RunStatus::Failed(status.to_string())
            }
            other => RunStatus::InProgress(other.to_string()),
        }
    }
}

/// Role attached to a thread message
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessageRole {
    /// Posted by the caller
    User,
    /// Posted by the assistant; extraction results come from these
    Assistant,
    /// Any other role the service may introduce
    Other(String),
}

impl MessageRole {
    /// Classify a raw role string from the service
    pub fn from_api_str(role: &str) -> Self {
        match role {
            "user" => MessageRole::User,
            "assistant" => MessageRole::Assistant,
            other => MessageRole::Other(other.to_string()),
        }
    }
}

/// One message in a conversation thread: a role and a list of text blocks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThreadMessage {
    /// Who produced the message
    pub role: MessageRole,
    /// Text content blocks, in order
    pub text_blocks: Vec<String>,
}

impl ThreadMessage {
    /// The first text block, if any. Extraction reads exactly this.
    pub fn first_text(&self) -> Option<&str> {
        self.text_blocks.first().map(String::as_str)
    }
}

/// The opaque asynchronous job API of the assistant service.
///
/// One extraction consumes one file-store slot, one knowledge-store
/// registration, and one thread; none are cleaned up by this pipeline.
#[async_trait]
pub trait AssistantJobs {
    /// Error type for job API operations
    type Error;

    /// Upload file bytes to the service's file store, returning an opaque
    /// file identifier
    async fn upload_file(&self, filename: &str, bytes: Vec<u8>) -> Result<String, Self::Error>;

    /// Register an uploaded file with the pre-configured knowledge store so
    /// the assistant can retrieve its content
    async fn register_file(&self, file_id: &str) -> Result<(), Self::Error>;

    /// Create a new conversation thread, returning its identifier
    async fn create_thread(&self) -> Result<String, Self::Error>;

    /// Post a user message to a thread
    async fn post_message(&self, thread_id: &str, content: &str) -> Result<(), Self::Error>;

    /// Start a run of the pre-configured assistant against a thread,
    /// returning the run identifier
    async fn create_run(&self, thread_id: &str) -> Result<String, Self::Error>;

    /// Retrieve the current status of a run
    async fn run_status(&self, thread_id: &str, run_id: &str) -> Result<RunStatus, Self::Error>;

    /// List a thread's messages, newest first
    async fn list_messages(&self, thread_id: &str) -> Result<Vec<ThreadMessage>, Self::Error>;
}

/// The persistent document store holding the single record-set collection.
///
/// Writes overwrite the whole collection (set, not patch); there is no
/// per-record update and no optimistic concurrency token.
#[async_trait]
pub trait DocumentStore {
    /// Error type for store operations
    type Error;

    /// Load the collection; `None` when it does not exist yet
    async fn load(&self) -> Result<Option<RecordSet>, Self::Error>;

    /// Replace the collection with the given set
    async fn save(&self, set: &RecordSet) -> Result<(), Self::Error>;
}

/// Blob storage for original file bytes (optional auxiliary path).
#[async_trait]
pub trait BlobStore {
    /// Error type for blob operations
    type Error;

    /// Upload raw bytes under a path derived from the filename, returning a
    /// download URL
    async fn upload(&self, filename: &str, bytes: &[u8]) -> Result<String, Self::Error>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_status_classification() {
        assert_eq!(RunStatus::from_api_str("completed"), RunStatus::Completed);
        assert_eq!(
            RunStatus::from_api_str("failed"),
            RunStatus::Failed("failed".to_string())
        );
        assert_eq!(
            RunStatus::from_api_str("expired"),
            RunStatus::Failed("expired".to_string())
        );
        assert_eq!(
            RunStatus::from_api_str("in_progress"),
            RunStatus::InProgress("in_progress".to_string())
        );
        // Unknown statuses keep the poll loop alive
        assert_eq!(
            RunStatus::from_api_str("requires_action"),
            RunStatus::InProgress("requires_action".to_string())
        );
    }

    #[test]
    fn test_message_role_classification() {
        assert_eq!(MessageRole::from_api_str("assistant"), MessageRole::Assistant);
        assert_eq!(MessageRole::from_api_str("user"), MessageRole::User);
        assert_eq!(
            MessageRole::from_api_str("system"),
            MessageRole::Other("system".to_string())
        );
    }

    #[test]
    fn test_first_text() {
        let msg = ThreadMessage {
            role: MessageRole::Assistant,
            text_blocks: vec!["first".to_string(), "second".to_string()],
        };
        assert_eq!(msg.first_text(), Some("first"));

        let empty = ThreadMessage {
            role: MessageRole::Assistant,
            text_blocks: vec![],
        };
        assert_eq!(empty.first_text(), None);
    }
}
