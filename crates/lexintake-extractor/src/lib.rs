//! Lexintake Extractor
//!
//! The per-file extraction workflow: drives one uploaded file through the
//! assistant job API (upload → knowledge-store registration → thread →
//! message → run → poll → collect) and parses the fixed-tag reply into
//! structured fields.
//!
//! # Architecture
//!
//! ```text
//! File bytes → ExtractionClient → AssistantJobs → raw reply
//!                                                → parse_tagged_fields → FieldSet
//! ```
//!
//! The client is generic over any [`AssistantJobs`] implementation, so tests
//! run against `lexintake_assistant::MockAssistant` while production uses the
//! HTTP client. Cancellation is cooperative: the supervisor's `CancelFlag` is
//! observed at every poll tick. Polling is bounded by a configurable deadline
//! rather than running forever.
//!
//! [`AssistantJobs`]: lexintake_domain::traits::AssistantJobs
//!
//! # Example
//!
//! ```no_run
//! use lexintake_extractor::{ExtractionClient, ExtractorConfig, parse_tagged_fields};
//! use lexintake_assistant::MockAssistant;
//! use lexintake_domain::CancelFlag;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let assistant = MockAssistant::new("<contractTitle>MSA</contractTitle>");
//! let client = ExtractionClient::new(assistant, ExtractorConfig::default());
//!
//! let cancel = CancelFlag::new();
//! let extraction = client.extract("msa.pdf", vec![0u8; 16], &cancel).await?;
//! let fields = parse_tagged_fields(&extraction.raw_text);
//! assert_eq!(fields.get("contractTitle"), Some("MSA"));
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

mod chat;
mod client;
mod config;
mod error;
mod parser;
mod prompt;


pub use chat::ChatSession;
pub use client::{Extraction, ExtractionClient};
pub use config::ExtractorConfig;
pub use error::ExtractError;
pub use parser::parse_tagged_fields;
pub use prompt::{PromptBuilder, DEFAULT_CONTRACT_FIELDS};
