//! Error types for the extraction workflow

use thiserror::Error;

/// Errors that can occur while driving one file through the assistant
#[derive(Error, Debug)]
pub enum ExtractError {
    /// A job API call failed (upload, registration, thread, message, run,
    /// poll, or message listing)
    #[error("assistant error: {0}")]
    Assistant(String),

    /// The run reached a terminal status other than completed
    #[error("assistant run ended in terminal status '{0}'")]
    JobFailed(String),

    /// The run completed but the thread holds no assistant message with text
    #[error("no assistant reply found in thread")]
    NoAssistantReply,

    /// The supervisor requested cancellation at a poll tick
    #[error("extraction cancelled")]
    Cancelled,

    /// The poll deadline elapsed before the run completed
    #[error("extraction timed out after {0} seconds")]
    Timeout(u64),

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),
}

impl ExtractError {
    /// True when the failure was a user-requested cancellation, which the
    /// supervisor treats differently from real errors
    pub fn is_cancelled(&self) -> bool {
        matches!(self, ExtractError::Cancelled)
    }
}
