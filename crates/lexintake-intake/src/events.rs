//! Progress events emitted while a batch runs
//!
//! Events are best-effort: a dropped or slow receiver never stalls the
//! batch. Callers that want live progress subscribe with
//! [`EventSink::channel`]; everyone else uses [`EventSink::disabled`].

use lexintake_domain::batch::{BatchId, BatchProgress, BatchState};
use tokio::sync::mpsc;

/// Progress notifications emitted during a batch run
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IntakeEvent {
    /// A batch began processing
    BatchStarted {
        /// Identifier of the batch
        batch_id: BatchId,
        /// Number of files submitted
        total: usize,
    },

    /// A file began its extraction workflow
    FileStarted {
        /// The file being processed
        filename: String,
    },

    /// A file was skipped because its name already exists in the store
    FileSkipped {
        /// The duplicate filename
        filename: String,
    },

    /// A file finished successfully
    FileCompleted {
        /// The completed file
        filename: String,
        /// Progress after this file
        progress: BatchProgress,
    },

    /// A file failed; the batch halts after this event
    FileFailed {
        /// The failed file
        filename: String,
        /// Human-readable failure description
        message: String,
    },

    /// The batch reached a terminal state and results were persisted
    BatchFinished {
        /// Identifier of the batch
        batch_id: BatchId,
        /// Terminal state of the batch
        state: BatchState,
        /// Final progress
        progress: BatchProgress,
    },
}

/// Best-effort sender for [`IntakeEvent`]s
#[derive(Debug, Clone, Default)]
pub struct EventSink(Option<mpsc::UnboundedSender<IntakeEvent>>);

impl EventSink {
    /// A sink that drops every event
    pub fn disabled() -> Self {
        Self(None)
    }

    /// Create a connected sink and its receiver
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<IntakeEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self(Some(tx)), rx)
    }

    /// Emit an event; a closed receiver is ignored
    pub fn emit(&self, event: IntakeEvent) {
        if let Some(tx) = &self.0 {
            let _ = tx.send(event);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disabled_sink_swallows_events() {
        let sink = EventSink::disabled();
        sink.emit(IntakeEvent::FileStarted {
            filename: "a.pdf".to_string(),
        });
    }

    #[tokio::test]
    async fn test_channel_delivers_in_order() {
        let (sink, mut rx) = EventSink::channel();
        sink.emit(IntakeEvent::FileStarted {
            filename: "a.pdf".to_string(),
        });
        sink.emit(IntakeEvent::FileCompleted {
            filename: "a.pdf".to_string(),
            progress: BatchProgress {
                completed: 1,
                total: 1,
            },
        });

        assert!(matches!(
            rx.recv().await,
            Some(IntakeEvent::FileStarted { .. })
        ));
        assert!(matches!(
            rx.recv().await,
            Some(IntakeEvent::FileCompleted { .. })
        ));
    }

    #[test]
    fn test_dropped_receiver_does_not_error() {
        let (sink, rx) = EventSink::channel();
        drop(rx);
        sink.emit(IntakeEvent::FileSkipped {
            filename: "a.pdf".to_string(),
        });
    }
}
