//! The sequential per-file batch loop
//!
//! Files are processed strictly one at a time: the upstream service offers
//! no batch endpoint, so concurrency would only multiply polling load.
//! Duplicate filenames are skipped against a snapshot taken at batch start,
//! the first per-file failure halts the batch, and cancellation is observed
//! at the top of the loop (plus every poll tick inside an extraction).

use crate::error::IntakeError;
use crate::events::{EventSink, IntakeEvent};
use lexintake_domain::batch::{BatchId, BatchProgress, BatchState, CancelFlag};
use lexintake_domain::record::{DocumentRecord, ExternalRef};
use lexintake_domain::traits::{AssistantJobs, BlobStore};
use lexintake_extractor::{parse_tagged_fields, ExtractionClient};
use std::collections::HashSet;
use std::fmt::Display;
use std::sync::Mutex;
use tracing::{info, warn};

/// What one batch run produced.
///
/// On `Failed` and `Cancelled`, `records` holds everything completed before
/// the halt; those results are persisted by the caller regardless.
#[derive(Debug)]
pub struct BatchOutcome {
    /// Terminal state the batch reached
    pub state: BatchState,

    /// Final progress (skipped duplicates never advance the counter)
    pub progress: BatchProgress,

    /// Records extracted from the files that completed, in submission order
    pub records: Vec<DocumentRecord>,

    /// External references parallel to `records`
    pub refs: Vec<ExternalRef>,

    /// Filenames skipped as duplicates
    pub skipped: Vec<String>,

    /// The failure that halted the batch, when `state` is `Failed`
    pub error: Option<IntakeError>,
}

/// Runs the per-file loop for one batch
pub struct BatchProcessor<'a, A, B> {
    client: &'a ExtractionClient<A>,
    blobs: Option<&'a B>,
    events: &'a EventSink,
    cancel: &'a CancelFlag,
    progress: &'a Mutex<BatchProgress>,
}

impl<'a, A, B> BatchProcessor<'a, A, B>
where
    A: AssistantJobs + Send + Sync,
    A::Error: Display,
    B: BlobStore + Send + Sync,
    B::Error: Display,
{
    /// Create a processor borrowing the supervisor's shared state
    pub fn new(
        client: &'a ExtractionClient<A>,
        blobs: Option<&'a B>,
        events: &'a EventSink,
        cancel: &'a CancelFlag,
        progress: &'a Mutex<BatchProgress>,
    ) -> Self {
        Self {
            client,
            blobs,
            events,
            cancel,
            progress,
        }
    }

    /// Process the files sequentially against a snapshot of the filenames
    /// already in the store. The snapshot is never updated mid-batch, so two
    /// same-named files within one batch both get processed.
    pub async fn run(
        &self,
        batch_id: BatchId,
        files: Vec<(String, Vec<u8>)>,
        existing: &HashSet<String>,
    ) -> BatchOutcome {
        let mut progress = BatchProgress::start(files.len());
        *self.progress.lock().unwrap() = progress;
        self.events.emit(IntakeEvent::BatchStarted {
            batch_id,
            total: files.len(),
        });

        let mut records = Vec::new();
        let mut refs = Vec::new();
        let mut skipped = Vec::new();
        let mut error = None;
        let mut state = BatchState::Completed;

        for (filename, bytes) in files {
            if self.cancel.is_cancelled() {
                info!(%batch_id, "cancellation observed, halting batch");
                state = BatchState::Cancelled;
                break;
            }

            if existing.contains(&filename) {
                info!(filename, "skipping duplicate filename");
                skipped.push(filename.clone());
                self.events.emit(IntakeEvent::FileSkipped { filename });
                continue;
            }

            self.events.emit(IntakeEvent::FileStarted {
                filename: filename.clone(),
            });

            let download_url = match self.blobs {
                Some(blobs) => match blobs.upload(&filename, &bytes).await {
                    Ok(url) => Some(url),
                    Err(e) => {
                        warn!(filename, error = %e, "blob upload failed, halting batch");
                        self.events.emit(IntakeEvent::FileFailed {
                            filename: filename.clone(),
                            message: e.to_string(),
                        });
                        error = Some(IntakeError::Blob {
                            filename,
                            message: e.to_string(),
                        });
                        state = BatchState::Failed;
                        break;
                    }
                },
                None => None,
            };

            match self.client.extract(&filename, bytes, self.cancel).await {
                Ok(extraction) => {
                    let fields = parse_tagged_fields(&extraction.raw_text);
                    records.push(DocumentRecord::new(filename.clone(), fields));
                    refs.push(ExternalRef {
                        file_id: extraction.file_id,
                        download_url,
                    });
                    progress.completed += 1;
                    *self.progress.lock().unwrap() = progress;
                    self.events.emit(IntakeEvent::FileCompleted { filename, progress });
                }
                Err(e) if e.is_cancelled() => {
                    info!(%batch_id, filename, "extraction cancelled, halting batch");
                    state = BatchState::Cancelled;
                    break;
                }
                Err(e) => {
                    warn!(filename, error = %e, "extraction failed, halting batch");
                    self.events.emit(IntakeEvent::FileFailed {
                        filename: filename.clone(),
                        message: e.to_string(),
                    });
                    error = Some(IntakeError::Extraction {
                        filename,
                        source: e,
                    });
                    state = BatchState::Failed;
                    break;
                }
            }
        }

        BatchOutcome {
            state,
            progress,
            records,
            refs,
            skipped,
            error,
        }
    }
}
