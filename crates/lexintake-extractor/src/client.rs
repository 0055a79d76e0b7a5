//! The per-file extraction workflow

use crate::config::ExtractorConfig;
use crate::error::ExtractError;
use crate::prompt::PromptBuilder;
use lexintake_domain::batch::CancelFlag;
use lexintake_domain::traits::{AssistantJobs, MessageRole, RunStatus};
use std::fmt::Display;
use tokio::time::Instant;
use tracing::{debug, info};

/// Result of driving one file through the assistant: the opaque file id the
/// service issued (kept as an external reference) and the raw reply text.
#[derive(Debug, Clone)]
pub struct Extraction {
    /// File identifier in the assistant service's file store
    pub file_id: String,

    /// First text block of the assistant's reply, unparsed
    pub raw_text: String,
}

/// Drives the submit → poll → collect workflow for one file at a time.
///
/// Generic over the job API so tests can substitute a mock. Each call
/// consumes one file-store slot, one knowledge-store registration, and one
/// thread on the service; none are cleaned up here.
pub struct ExtractionClient<A> {
    assistant: A,
    config: ExtractorConfig,
}

impl<A> ExtractionClient<A>
where
    A: AssistantJobs + Send + Sync,
    A::Error: Display,
{
    /// Create a client over the given job API
    pub fn new(assistant: A, config: ExtractorConfig) -> Self {
        Self { assistant, config }
    }

    /// The active configuration
    pub fn config(&self) -> &ExtractorConfig {
        &self.config
    }

    /// Borrow the underlying job API
    pub fn assistant(&self) -> &A {
        &self.assistant
    }

    /// Run the full extraction workflow for one file.
    ///
    /// Cancellation is observed at every poll tick; an in-flight network
    /// call is never interrupted. Fails with [`ExtractError::Timeout`] if
    /// the run does not complete within the configured deadline.
    pub async fn extract(
        &self,
        filename: &str,
        bytes: Vec<u8>,
        cancel: &CancelFlag,
    ) -> Result<Extraction, ExtractError> {
        info!(filename, size = bytes.len(), "starting extraction");

        let file_id = self
            .assistant
            .upload_file(filename, bytes)
            .await
            .map_err(api_err)?;
        debug!(filename, %file_id, "file uploaded");

        self.assistant
            .register_file(&file_id)
            .await
            .map_err(api_err)?;

        let thread_id = self.assistant.create_thread().await.map_err(api_err)?;
        debug!(%thread_id, "thread created");

        let prompt = PromptBuilder::new(filename)
            .with_fields(self.config.fields.clone())
            .build();
        self.assistant
            .post_message(&thread_id, &prompt)
            .await
            .map_err(api_err)?;

        let run_id = self.assistant.create_run(&thread_id).await.map_err(api_err)?;
        debug!(%thread_id, %run_id, "run started");

        poll_run(&self.assistant, &thread_id, &run_id, &self.config, cancel).await?;

        let raw_text = latest_assistant_text(&self.assistant, &thread_id).await?;
        info!(filename, reply_len = raw_text.len(), "extraction complete");

        Ok(Extraction { file_id, raw_text })
    }
}

/// Poll a run to completion at the configured fixed interval.
///
/// Each tick checks the cancellation flag before asking the service, so a
/// cancelled batch stops polling at the next tick. A terminal non-completed
/// status fails immediately; exceeding the deadline fails with Timeout.
pub(crate) async fn poll_run<A>(
    assistant: &A,
    thread_id: &str,
    run_id: &str,
    config: &ExtractorConfig,
    cancel: &CancelFlag,
) -> Result<(), ExtractError>
where
    A: AssistantJobs + Send + Sync,
    A::Error: Display,
{
    let deadline = Instant::now() + config.max_poll();

    loop {
        if cancel.is_cancelled() {
            debug!(%run_id, "cancellation observed at poll tick");
            return Err(ExtractError::Cancelled);
        }

        match assistant
            .run_status(thread_id, run_id)
            .await
            .map_err(api_err)?
        {
            RunStatus::Completed => return Ok(()),
            RunStatus::Failed(status) => return Err(ExtractError::JobFailed(status)),
            RunStatus::InProgress(status) => {
                debug!(%run_id, status, "run still in progress");
            }
        }

        if Instant::now() >= deadline {
            return Err(ExtractError::Timeout(config.max_poll_secs));
        }
        tokio::time::sleep(config.poll_interval()).await;
    }
}

/// Fetch the newest assistant reply's first text block from a thread
pub(crate) async fn latest_assistant_text<A>(
    assistant: &A,
    thread_id: &str,
) -> Result<String, ExtractError>
where
    A: AssistantJobs + Send + Sync,
    A::Error: Display,
{
    let messages = assistant.list_messages(thread_id).await.map_err(api_err)?;

    // Messages come newest first; the first assistant entry is the reply
    messages
        .iter()
        .find(|m| m.role == MessageRole::Assistant)
        .and_then(|m| m.first_text())
        .map(str::to_string)
        .ok_or(ExtractError::NoAssistantReply)
}

fn api_err<E: Display>(e: E) -> ExtractError {
    ExtractError::Assistant(e.to_string())
}
