//! Batch run state: the supervisor's state machine, progress counters,
//! and the cooperative cancellation flag.

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Unique identifier for one batch run, used in logs and events.
///
/// UUIDv7-backed for chronological sortability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BatchId(u128);

impl BatchId {
    /// Generate a new UUIDv7-based BatchId
    pub fn new() -> Self {
        Self(uuid::Uuid::now_v7().as_u128())
    }
}

impl Default for BatchId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for BatchId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", uuid::Uuid::from_u128(self.0))
    }
}

/// Lifecycle of one batch: `Idle → Running → {Completed, Cancelled, Failed}`,
/// re-entering `Idle` once the caller consumes the terminal outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchState {
    /// No batch in flight
    Idle,
    /// Files are being processed sequentially
    Running,
    /// The file list was exhausted without failure or cancellation
    Completed,
    /// Cancellation halted processing; earlier files were kept
    Cancelled,
    /// A per-file failure halted processing (fail-fast)
    Failed,
}

impl BatchState {
    /// True for the three terminal states
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            BatchState::Completed | BatchState::Cancelled | BatchState::Failed
        )
    }
}

impl fmt::Display for BatchState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            BatchState::Idle => "idle",
            BatchState::Running => "running",
            BatchState::Completed => "completed",
            BatchState::Cancelled => "cancelled",
            BatchState::Failed => "failed",
        };
        f.write_str(s)
    }
}

/// Progress through one batch: files fully processed out of the total.
/// Skipped duplicates do not advance the completed counter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchProgress {
    /// Files fully processed so far
    pub completed: usize,
    /// Total files submitted in this batch
    pub total: usize,
}

impl BatchProgress {
    /// Start-of-batch progress for a given file count
    pub fn start(total: usize) -> Self {
        Self {
            completed: 0,
            total,
        }
    }
}

impl fmt::Display for BatchProgress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.completed, self.total)
    }
}

/// Cooperative cancellation flag shared between the supervisor and an active
/// extraction. Setting it never interrupts an in-flight network call; it is
/// observed at the top of the per-file loop and at each poll tick.
#[derive(Debug, Clone, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    /// Create a fresh, unset flag
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation
    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    /// True once cancellation has been requested
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }

    /// Clear the flag for a new batch
    pub fn reset(&self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cancel_flag_is_shared() {
        let flag = CancelFlag::new();
        let clone = flag.clone();
        assert!(!clone.is_cancelled());
        flag.cancel();
        assert!(clone.is_cancelled());
        clone.reset();
        assert!(!flag.is_cancelled());
    }

    #[test]
    fn test_batch_state_terminality() {
        assert!(!BatchState::Idle.is_terminal());
        assert!(!BatchState::Running.is_terminal());
        assert!(BatchState::Completed.is_terminal());
        assert!(BatchState::Cancelled.is_terminal());
        assert!(BatchState::Failed.is_terminal());
    }

    #[test]
    fn test_progress_display() {
        let progress = BatchProgress::start(4);
        assert_eq!(progress.to_string(), "0/4");
    }

    #[test]
    fn test_batch_ids_are_unique() {
        let a = BatchId::new();
        let b = BatchId::new();
        assert_ne!(a, b);
    }
}
