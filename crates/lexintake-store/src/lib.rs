//! Lexintake Store Layer
//!
//! Implementations of the `DocumentStore` and `BlobStore` traits from
//! `lexintake-domain`.
//!
//! The document store holds exactly one collection document at a fixed
//! path; loads read it whole and saves overwrite it whole (set, not patch).
//! There is no per-record update and no concurrency token: the store is
//! treated as single-writer, last write wins.
//!
//! # Implementations
//!
//! - `MemoryStore` / `MemoryBlobStore`: in-memory, failure-injectable, for
//!   tests and offline use
//! - `RemoteStore` / `RemoteBlobStore`: HTTP clients for the external
//!   document database and blob storage

#![warn(missing_docs)]

pub mod remote;

use async_trait::async_trait;
use lexintake_domain::record::RecordSet;
use lexintake_domain::traits::{BlobStore, DocumentStore};
use std::sync::{Arc, Mutex};
use thiserror::Error;

pub use remote::{RemoteBlobStore, RemoteStore, StoreConfig};

/// Errors that can occur against the persistent stores
#[derive(Error, Debug)]
pub enum StoreError {
    /// The store could not be reached; the caller proceeds with an empty
    /// local set and surfaces a non-fatal message
    #[error("store unreachable: {0}")]
    Unavailable(String),

    /// A save failed after the batch was computed; in-memory records are
    /// intact but not durable
    #[error("store write failed: {0}")]
    WriteFailed(String),

    /// The stored collection document did not decode
    #[error("invalid stored document: {0}")]
    InvalidDocument(String),

    /// Client-side configuration problem
    #[error("configuration error: {0}")]
    Config(String),
}

#[derive(Debug, Default)]
struct MemoryInner {
    collection: Option<RecordSet>,
    unavailable: bool,
    fail_writes: bool,
    loads: usize,
    saves: usize,
}

/// In-memory document store for tests and offline runs.
///
/// Clones share state, mirroring how every handle to the remote store sees
/// the same collection. Load and write failures can be injected.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    inner: Arc<Mutex<MemoryInner>>,
}

impl MemoryStore {
    /// Create an empty store (no collection document yet)
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store already holding a collection
    pub fn with_collection(set: RecordSet) -> Self {
        let store = Self::new();
        store.inner.lock().unwrap().collection = Some(set);
        store
    }

    /// Make loads fail with `StoreError::Unavailable`
    pub fn set_unavailable(&self, unavailable: bool) {
        self.inner.lock().unwrap().unavailable = unavailable;
    }

    /// Make saves fail with `StoreError::WriteFailed`
    pub fn fail_writes(&self, fail: bool) {
        self.inner.lock().unwrap().fail_writes = fail;
    }

    /// Number of load calls
    pub fn load_count(&self) -> usize {
        self.inner.lock().unwrap().loads
    }

    /// Number of save calls
    pub fn save_count(&self) -> usize {
        self.inner.lock().unwrap().saves
    }

    /// Peek at the stored collection without counting a load
    pub fn snapshot(&self) -> Option<RecordSet> {
        self.inner.lock().unwrap().collection.clone()
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    type Error = StoreError;

    async fn load(&self) -> Result<Option<RecordSet>, Self::Error> {
        let mut inner = self.inner.lock().unwrap();
        inner.loads += 1;
        if inner.unavailable {
            return Err(StoreError::Unavailable("injected outage".to_string()));
        }
        Ok(inner.collection.clone())
    }

    async fn save(&self, set: &RecordSet) -> Result<(), Self::Error> {
        let mut inner = self.inner.lock().unwrap();
        inner.saves += 1;
        if inner.fail_writes {
            return Err(StoreError::WriteFailed("injected write failure".to_string()));
        }
        inner.collection = Some(set.clone());
        Ok(())
    }
}

/// In-memory blob store for tests: remembers uploaded names and hands back
/// `memory://files/...` URLs.
#[derive(Debug, Clone, Default)]
pub struct MemoryBlobStore {
    uploads: Arc<Mutex<Vec<String>>>,
    fail_uploads: Arc<Mutex<bool>>,
}

impl MemoryBlobStore {
    /// Create an empty blob store
    pub fn new() -> Self {
        Self::default()
    }

    /// Make uploads fail with `StoreError::WriteFailed`
    pub fn fail_uploads(&self, fail: bool) {
        *self.fail_uploads.lock().unwrap() = fail;
    }

    /// Filenames uploaded so far, in order
    pub fn uploaded(&self) -> Vec<String> {
        self.uploads.lock().unwrap().clone()
    }
}

#[async_trait]
impl BlobStore for MemoryBlobStore {
    type Error = StoreError;

    async fn upload(&self, filename: &str, _bytes: &[u8]) -> Result<String, Self::Error> {
        if *self.fail_uploads.lock().unwrap() {
            return Err(StoreError::WriteFailed(
                "injected blob upload failure".to_string(),
            ));
        }
        self.uploads.lock().unwrap().push(filename.to_string());
        Ok(format!("memory://files/{filename}"))
    }
}
