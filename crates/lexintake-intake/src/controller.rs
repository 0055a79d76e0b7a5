//! The intake supervisor
//!
//! Owns the batch state machine (`Idle → Running → terminal → Idle`), the
//! shared cancellation flag, and the load-merge-save-reload cycle against
//! the document store. One batch runs at a time.

use crate::batch::{BatchOutcome, BatchProcessor};
use crate::error::IntakeError;
use crate::events::{EventSink, IntakeEvent};
use async_trait::async_trait;
use lexintake_domain::batch::{BatchId, BatchProgress, BatchState, CancelFlag};
use lexintake_domain::record::RecordSet;
use lexintake_domain::traits::{AssistantJobs, BlobStore, DocumentStore};
use lexintake_extractor::{ChatSession, ExtractionClient};
use std::fmt::Display;
use std::sync::Mutex;
use tracing::{info, warn};

/// Stand-in blob store for controllers without a blob path configured.
/// Never invoked; `upload` exists only to satisfy the trait.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoBlobStore;

#[async_trait]
impl BlobStore for NoBlobStore {
    type Error = std::convert::Infallible;

    async fn upload(&self, filename: &str, _bytes: &[u8]) -> Result<String, Self::Error> {
        Ok(format!("unused://{filename}"))
    }
}

/// Outcome of one batch, returned once results are persisted and reloaded.
///
/// `error` is set when the batch failed part-way or the save did not stick;
/// `set` is what the store actually holds afterwards (falling back to the
/// in-memory merge when the reload itself fails).
#[derive(Debug)]
pub struct BatchReport {
    /// Identifier of the batch
    pub batch_id: BatchId,

    /// Terminal state the batch reached
    pub state: BatchState,

    /// Final progress
    pub progress: BatchProgress,

    /// Filenames skipped as duplicates
    pub skipped: Vec<String>,

    /// The failure that halted the batch or prevented persistence, if any
    pub error: Option<IntakeError>,

    /// The record set after the batch was persisted
    pub set: RecordSet,
}

/// Supervises batch uploads against an extraction client, a document store,
/// and an optional blob store.
///
/// All methods take `&self`; the state machine rejects a second concurrent
/// batch rather than queueing it.
pub struct IntakeController<A, S, B = NoBlobStore> {
    client: ExtractionClient<A>,
    store: S,
    blobs: Option<B>,
    events: EventSink,
    cancel: CancelFlag,
    state: Mutex<BatchState>,
    progress: Mutex<BatchProgress>,
}

impl<A, S> IntakeController<A, S> {
    /// Create a controller with no blob path
    pub fn new(client: ExtractionClient<A>, store: S) -> Self {
        Self {
            client,
            store,
            blobs: None,
            events: EventSink::disabled(),
            cancel: CancelFlag::new(),
            state: Mutex::new(BatchState::Idle),
            progress: Mutex::new(BatchProgress::default()),
        }
    }
}

impl<A, S, B> IntakeController<A, S, B> {
    /// Create a controller that also uploads original bytes to blob storage
    pub fn with_blob_store(client: ExtractionClient<A>, store: S, blobs: B) -> Self {
        Self {
            client,
            store,
            blobs: Some(blobs),
            events: EventSink::disabled(),
            cancel: CancelFlag::new(),
            state: Mutex::new(BatchState::Idle),
            progress: Mutex::new(BatchProgress::default()),
        }
    }

    /// Attach an event sink for progress reporting
    pub fn with_events(mut self, events: EventSink) -> Self {
        self.events = events;
        self
    }

    /// A handle to the cancellation flag shared with running extractions
    pub fn cancel_flag(&self) -> CancelFlag {
        self.cancel.clone()
    }

    /// Request cancellation of the running batch. Observed at the next
    /// per-file boundary or poll tick; files already completed are kept.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    /// Current state of the batch state machine
    pub fn state(&self) -> BatchState {
        *self.state.lock().unwrap()
    }

    /// Progress of the running (or last) batch
    pub fn progress(&self) -> BatchProgress {
        *self.progress.lock().unwrap()
    }

    /// Return to `Idle` after a terminal outcome has been consumed
    pub fn acknowledge(&self) {
        let mut state = self.state.lock().unwrap();
        if state.is_terminal() {
            *state = BatchState::Idle;
        }
    }
}

impl<A, S, B> IntakeController<A, S, B>
where
    A: AssistantJobs + Send + Sync,
    A::Error: Display,
    S: DocumentStore + Send + Sync,
    S::Error: Display,
    B: BlobStore + Send + Sync,
    B::Error: Display,
{
    /// Run one batch of files through extraction and persist the results.
    ///
    /// The store is loaded first and its filenames snapshotted for duplicate
    /// skipping. Whatever the batch produced is merged, saved, and reloaded
    /// even when it ended `Failed` or `Cancelled`, so completed files are
    /// never lost. Returns `Err` only when a batch is already running; batch
    /// failures are reported inside the [`BatchReport`].
    pub async fn upload_batch(
        &self,
        files: Vec<(String, Vec<u8>)>,
    ) -> Result<BatchReport, IntakeError> {
        {
            let mut state = self.state.lock().unwrap();
            if *state == BatchState::Running {
                return Err(IntakeError::BatchActive);
            }
            *state = BatchState::Running;
        }
        self.cancel.reset();

        let batch_id = BatchId::new();
        info!(%batch_id, total = files.len(), "batch started");

        let mut set = self.load_or_empty().await;
        let existing = set.filenames();

        let processor = BatchProcessor::new(
            &self.client,
            self.blobs.as_ref(),
            &self.events,
            &self.cancel,
            &self.progress,
        );
        let BatchOutcome {
            mut state,
            progress,
            records,
            refs,
            skipped,
            mut error,
        } = processor.run(batch_id, files, &existing).await;

        // Persist what completed, even after a failure or cancellation
        set.merge_batch(records, refs);
        if let Err(e) = self.store.save(&set).await {
            warn!(%batch_id, error = %e, "failed to persist batch results");
            if error.is_none() {
                error = Some(IntakeError::StoreSave(e.to_string()));
            }
            if state == BatchState::Completed {
                state = BatchState::Failed;
            }
        }

        // Reload so the report reflects what is actually durable
        let set = match self.store.load().await {
            Ok(Some(reloaded)) => reloaded,
            Ok(None) => set,
            Err(e) => {
                warn!(%batch_id, error = %e, "reload after save failed, using in-memory set");
                set
            }
        };

        *self.state.lock().unwrap() = state;
        self.events.emit(IntakeEvent::BatchFinished {
            batch_id,
            state,
            progress,
        });
        info!(%batch_id, %state, %progress, "batch finished");

        Ok(BatchReport {
            batch_id,
            state,
            progress,
            skipped,
            error,
            set,
        })
    }

    /// Load the current record set for display. An unreachable store yields
    /// an empty set rather than an error.
    pub async fn records(&self) -> RecordSet {
        self.load_or_empty().await
    }

    /// Move a display column and persist the new order. Out-of-range indices
    /// leave the order unchanged without saving.
    pub async fn move_column(&self, from: usize, to: usize) -> Result<RecordSet, IntakeError> {
        let mut set = self.load_or_empty().await;
        if set.move_column(from, to) {
            self.store
                .save(&set)
                .await
                .map_err(|e| IntakeError::StoreSave(e.to_string()))?;
        }
        Ok(set)
    }

    /// Open a follow-up conversation with the configured assistant
    pub fn chat(&self) -> ChatSession<A>
    where
        A: Clone,
    {
        ChatSession::new(self.client.assistant().clone(), self.client.config().clone())
    }

    async fn load_or_empty(&self) -> RecordSet {
        match self.store.load().await {
            Ok(Some(set)) => set,
            Ok(None) => RecordSet::new(),
            Err(e) => {
                warn!(error = %e, "document store unavailable, starting from an empty set");
                RecordSet::new()
            }
        }
    }
}
