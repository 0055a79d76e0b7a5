//! Lexintake Assistant Layer
//!
//! Implementations of the `AssistantJobs` trait from `lexintake-domain`.
//!
//! # Implementations
//!
//! - `MockAssistant`: deterministic, scriptable mock for testing
//! - `RemoteAssistant`: HTTP client for an OpenAI-compatible assistants
//!   endpoint, configured by an explicit [`AssistantConfig`]
//!
//! # Examples
//!
//! ```
//! use lexintake_assistant::MockAssistant;
//! use lexintake_domain::traits::AssistantJobs;
//!
//! # async fn example() {
//! let assistant = MockAssistant::new("<contractTitle>MSA</contractTitle>");
//! let file_id = assistant.upload_file("a.pdf", vec![1, 2, 3]).await.unwrap();
//! assert!(file_id.starts_with("file-"));
//! # }
//! ```

#![warn(missing_docs)]

pub mod remote;

use async_trait::async_trait;
use lexintake_domain::traits::{AssistantJobs, MessageRole, RunStatus, ThreadMessage};
use std::collections::{HashSet, VecDeque};
use std::sync::{Arc, Mutex};
use thiserror::Error;

pub use remote::{AssistantConfig, RemoteAssistant};

/// Errors that can occur against the assistant job API
#[derive(Error, Debug)]
pub enum AssistantError {
    /// Network or transport failure (service unreachable)
    #[error("communication error: {0}")]
    Http(String),

    /// The service answered with a non-success status
    #[error("service error (HTTP {status}): {message}")]
    Api {
        /// HTTP status code
        status: u16,
        /// Error message decoded from the response body, when present
        message: String,
    },

    /// The response body did not have the expected shape
    #[error("invalid response: {0}")]
    InvalidResponse(String),

    /// Client-side configuration problem
    #[error("configuration error: {0}")]
    Config(String),

    /// Generic error (used by the mock for injected failures)
    #[error("assistant error: {0}")]
    Other(String),
}

impl From<reqwest::Error> for AssistantError {
    fn from(e: reqwest::Error) -> Self {
        AssistantError::Http(e.to_string())
    }
}

/// Call counters exposed by [`MockAssistant`] for assertions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MockCounts {
    /// Files uploaded
    pub uploads: usize,
    /// Knowledge-store registrations
    pub registrations: usize,
    /// Threads created
    pub threads: usize,
    /// Messages posted
    pub messages: usize,
    /// Runs created
    pub runs: usize,
    /// Run-status polls
    pub polls: usize,
}

#[derive(Debug, Default)]
struct MockInner {
    counts: MockCounts,
    next_id: usize,
    /// Raw run statuses handed out in order; exhausted → "completed"
    run_statuses: VecDeque<String>,
    /// Replies handed out in order; exhausted → default reply
    replies: VecDeque<String>,
    /// Filenames whose upload is scripted to fail
    failing_uploads: HashSet<String>,
    /// When set, list_messages returns no assistant message
    omit_reply: bool,
    /// Content of the most recently posted message
    last_message: Option<String>,
}

/// Mock assistant for deterministic testing
///
/// Returns pre-configured run statuses and replies without any network
/// calls, and counts every operation.
///
/// # Examples
///
/// ```
/// use lexintake_assistant::MockAssistant;
/// use lexintake_domain::traits::{AssistantJobs, RunStatus};
///
/// # async fn example() {
/// let assistant = MockAssistant::new("<contractType>MSA</contractType>");
/// assistant.push_run_status("in_progress");
///
/// let thread = assistant.create_thread().await.unwrap();
/// let run = assistant.create_run(&thread).await.unwrap();
/// // First poll sees the scripted status, the next one completes
/// assert!(matches!(
///     assistant.run_status(&thread, &run).await.unwrap(),
///     RunStatus::InProgress(_)
/// ));
/// assert_eq!(assistant.run_status(&thread, &run).await.unwrap(), RunStatus::Completed);
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct MockAssistant {
    default_reply: String,
    inner: Arc<Mutex<MockInner>>,
}

impl MockAssistant {
    /// Create a mock that answers every extraction with a fixed reply
    pub fn new(reply: impl Into<String>) -> Self {
        Self {
            default_reply: reply.into(),
            inner: Arc::new(Mutex::new(MockInner::default())),
        }
    }

    /// Queue a reply; queued replies are consumed in order before the
    /// default reply is used
    pub fn push_reply(&self, reply: impl Into<String>) {
        self.inner.lock().unwrap().replies.push_back(reply.into());
    }

    /// Queue a raw run status returned by the next poll. Once the queue is
    /// exhausted, polls report "completed".
    pub fn push_run_status(&self, status: impl Into<String>) {
        self.inner
            .lock()
            .unwrap()
            .run_statuses
            .push_back(status.into());
    }

    /// Script the upload of a given filename to fail
    pub fn fail_upload(&self, filename: impl Into<String>) {
        self.inner
            .lock()
            .unwrap()
            .failing_uploads
            .insert(filename.into());
    }

    /// Make list_messages return no assistant message
    pub fn omit_assistant_reply(&self) {
        self.inner.lock().unwrap().omit_reply = true;
    }

    /// Snapshot of the operation counters
    pub fn counts(&self) -> MockCounts {
        self.inner.lock().unwrap().counts
    }

    /// Content of the most recently posted message, if any
    pub fn last_message(&self) -> Option<String> {
        self.inner.lock().unwrap().last_message.clone()
    }

    fn next_id(&self, prefix: &str) -> String {
        let mut inner = self.inner.lock().unwrap();
        inner.next_id += 1;
        format!("{}-{}", prefix, inner.next_id)
    }
}

impl Default for MockAssistant {
    fn default() -> Self {
        Self::new("")
    }
}

#[async_trait]
impl AssistantJobs for MockAssistant {
    type Error = AssistantError;

    async fn upload_file(&self, filename: &str, _bytes: Vec<u8>) -> Result<String, Self::Error> {
        {
            let mut inner = self.inner.lock().unwrap();
            inner.counts.uploads += 1;
            if inner.failing_uploads.contains(filename) {
                return Err(AssistantError::Other(format!(
                    "scripted upload failure for {filename}"
                )));
            }
        }
        Ok(self.next_id("file"))
    }

    async fn register_file(&self, _file_id: &str) -> Result<(), Self::Error> {
        self.inner.lock().unwrap().counts.registrations += 1;
        Ok(())
    }

    async fn create_thread(&self) -> Result<String, Self::Error> {
        self.inner.lock().unwrap().counts.threads += 1;
        Ok(self.next_id("thread"))
    }

    async fn post_message(&self, _thread_id: &str, content: &str) -> Result<(), Self::Error> {
        let mut inner = self.inner.lock().unwrap();
        inner.counts.messages += 1;
        inner.last_message = Some(content.to_string());
        Ok(())
    }

    async fn create_run(&self, _thread_id: &str) -> Result<String, Self::Error> {
        self.inner.lock().unwrap().counts.runs += 1;
        Ok(self.next_id("run"))
    }

    async fn run_status(&self, _thread_id: &str, _run_id: &str) -> Result<RunStatus, Self::Error> {
        let mut inner = self.inner.lock().unwrap();
        inner.counts.polls += 1;
        let status = inner
            .run_statuses
            .pop_front()
            .unwrap_or_else(|| "completed".to_string());
        Ok(RunStatus::from_api_str(&status))
    }

    async fn list_messages(&self, _thread_id: &str) -> Result<Vec<ThreadMessage>, Self::Error> {
        let mut inner = self.inner.lock().unwrap();
        if inner.omit_reply {
            return Ok(vec![ThreadMessage {
                role: MessageRole::User,
                text_blocks: vec!["prompt".to_string()],
            }]);
        }
        let reply = inner
            .replies
            .pop_front()
            .unwrap_or_else(|| self.default_reply.clone());
        // Newest first, like the service
        Ok(vec![
            ThreadMessage {
                role: MessageRole::Assistant,
                text_blocks: vec![reply],
            },
            ThreadMessage {
                role: MessageRole::User,
                text_blocks: vec!["prompt".to_string()],
            },
        ])
    }
}
