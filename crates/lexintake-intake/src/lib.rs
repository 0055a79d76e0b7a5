//! Lexintake Batch Supervisor
//!
//! Orchestrates one batch of files through the extraction workflow and into
//! the document store. The supervisor owns the batch state machine
//! (`Idle → Running → {Completed, Cancelled, Failed}`), the cooperative
//! cancellation flag, progress reporting, and the load-merge-save-reload
//! cycle that keeps the persisted record set consistent.
//!
//! # Architecture
//!
//! ```text
//! files → IntakeController → BatchProcessor → ExtractionClient (per file)
//!              │                   │
//!              │                   └→ IntakeEvent stream (best-effort)
//!              └→ DocumentStore (load, snapshot, merge, save, reload)
//! ```
//!
//! Batch semantics:
//!
//! - Files run strictly sequentially; one batch at a time.
//! - Filenames already in the store (snapshotted at batch start) are
//!   skipped, not re-extracted.
//! - The first per-file failure halts the batch (fail-fast); earlier
//!   results are kept.
//! - Cancellation halts at the next per-file boundary or poll tick.
//! - Save and reload happen for every terminal state, so completed files
//!   survive failures and cancellations.

#![warn(missing_docs)]

pub mod batch;
pub mod controller;
pub mod error;
pub mod events;

#[cfg(test)]
mod tests;

pub use batch::{BatchOutcome, BatchProcessor};
pub use controller::{BatchReport, IntakeController, NoBlobStore};
pub use error::IntakeError;
pub use events::{EventSink, IntakeEvent};
