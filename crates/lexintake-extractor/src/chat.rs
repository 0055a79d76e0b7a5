//! Follow-up conversation against the same job API
//!
//! Backs the per-document detail view: one thread is opened lazily, then
//! each question is posted, run, polled with the same cancellation and
//! deadline discipline as extraction, and answered with the newest
//! assistant reply.

use crate::client::{latest_assistant_text, poll_run};
use crate::config::ExtractorConfig;
use crate::error::ExtractError;
use lexintake_domain::batch::CancelFlag;
use lexintake_domain::traits::AssistantJobs;
use std::fmt::Display;
use tracing::debug;

/// A lazily-opened conversation thread with the configured assistant
pub struct ChatSession<A> {
    assistant: A,
    config: ExtractorConfig,
    thread_id: Option<String>,
}

impl<A> ChatSession<A>
where
    A: AssistantJobs + Send + Sync,
    A::Error: Display,
{
    /// Create a session; the thread is created on the first question
    pub fn new(assistant: A, config: ExtractorConfig) -> Self {
        Self {
            assistant,
            config,
            thread_id: None,
        }
    }

    /// The thread id, once the first question has been asked
    pub fn thread_id(&self) -> Option<&str> {
        self.thread_id.as_deref()
    }

    /// Ask a question and wait for the assistant's reply
    pub async fn ask(&mut self, question: &str, cancel: &CancelFlag) -> Result<String, ExtractError> {
        let thread_id = match &self.thread_id {
            Some(id) => id.clone(),
            None => {
                let id = self
                    .assistant
                    .create_thread()
                    .await
                    .map_err(|e| ExtractError::Assistant(e.to_string()))?;
                debug!(thread_id = %id, "chat thread created");
                self.thread_id = Some(id.clone());
                id
            }
        };

        self.assistant
            .post_message(&thread_id, question)
            .await
            .map_err(|e| ExtractError::Assistant(e.to_string()))?;

        let run_id = self
            .assistant
            .create_run(&thread_id)
            .await
            .map_err(|e| ExtractError::Assistant(e.to_string()))?;

        poll_run(&self.assistant, &thread_id, &run_id, &self.config, cancel).await?;
        latest_assistant_text(&self.assistant, &thread_id).await
    }
}
