//! Lexintake Domain Layer
//!
//! Core data model and trait seams for the document intake pipeline.
//! External services (assistant job API, document store, blob store) are
//! reached only through the traits defined here; implementations live in
//! the infrastructure crates.
//!
//! ## Key Concepts
//!
//! - **DocumentRecord**: one intaken document, keyed by filename, holding an
//!   open-ended ordered mapping of extracted field name → value
//! - **RecordSet**: the full persisted collection (records, parallel external
//!   references, column order) with the merge and seeding rules
//! - **BatchState / CancelFlag**: the transient state machine supervising one
//!   user-triggered batch, with cooperative cancellation
//! - **AssistantJobs**: the opaque asynchronous job API the extraction
//!   workflow is driven against

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod batch;
pub mod record;
pub mod traits;

// Re-exports for convenience
pub use batch::{BatchId, BatchProgress, BatchState, CancelFlag};
pub use record::{DocumentRecord, ExternalRef, FieldSet, RecordSet};
pub use traits::{MessageRole, RunStatus, ThreadMessage};
