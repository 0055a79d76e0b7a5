//! HTTP clients for the external document database and blob storage

use crate::StoreError;
use async_trait::async_trait;
use lexintake_domain::record::RecordSet;
use lexintake_domain::traits::{BlobStore, DocumentStore};
use serde::Deserialize;
use std::time::Duration;

/// Default request timeout in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Default collection name
pub const DEFAULT_COLLECTION: &str = "legalAnalyzer";

/// Default document key within the collection
pub const DEFAULT_KEY: &str = "documents";

/// Configuration for [`RemoteStore`] and [`RemoteBlobStore`].
///
/// The whole record set lives in one addressable document at
/// `collections/{collection}/{key}`; blobs live under `files/{filename}`.
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Base URL of the storage service
    pub base_url: String,
    /// Bearer token (optional for local services)
    pub api_key: Option<String>,
    /// Collection name
    pub collection: String,
    /// Document key within the collection
    pub key: String,
    /// Per-request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            api_key: None,
            collection: DEFAULT_COLLECTION.to_string(),
            key: DEFAULT_KEY.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl StoreConfig {
    /// Build a configuration from environment variables
    /// (`LEXINTAKE_STORE_BASE_URL`, `LEXINTAKE_STORE_API_KEY`,
    /// `LEXINTAKE_STORE_COLLECTION`, `LEXINTAKE_STORE_KEY`).
    pub fn from_env() -> Self {
        Self {
            base_url: std::env::var("LEXINTAKE_STORE_BASE_URL").unwrap_or_default(),
            api_key: std::env::var("LEXINTAKE_STORE_API_KEY").ok(),
            collection: std::env::var("LEXINTAKE_STORE_COLLECTION")
                .unwrap_or_else(|_| DEFAULT_COLLECTION.to_string()),
            key: std::env::var("LEXINTAKE_STORE_KEY").unwrap_or_else(|_| DEFAULT_KEY.to_string()),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }

    /// Check the configuration names a service
    pub fn validate(&self) -> Result<(), StoreError> {
        if self.base_url.is_empty() {
            return Err(StoreError::Config("base_url is empty".to_string()));
        }
        if self.collection.is_empty() || self.key.is_empty() {
            return Err(StoreError::Config(
                "collection and key must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

fn build_client(timeout_secs: u64) -> Result<reqwest::Client, StoreError> {
    reqwest::Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .build()
        .map_err(|e| StoreError::Config(format!("failed to build HTTP client: {e}")))
}

fn authed(req: reqwest::RequestBuilder, api_key: &Option<String>) -> reqwest::RequestBuilder {
    match api_key {
        Some(key) => req.header("Authorization", format!("Bearer {key}")),
        None => req,
    }
}

/// Remote document store: one collection document, read whole, written whole
pub struct RemoteStore {
    client: reqwest::Client,
    config: StoreConfig,
}

impl RemoteStore {
    /// Create a store client for the given configuration
    pub fn new(config: StoreConfig) -> Result<Self, StoreError> {
        config.validate()?;
        Ok(Self {
            client: build_client(config.timeout_secs)?,
            config,
        })
    }

    fn document_url(&self) -> String {
        format!(
            "{}/collections/{}/{}",
            self.config.base_url.trim_end_matches('/'),
            self.config.collection,
            self.config.key
        )
    }
}

#[async_trait]
impl DocumentStore for RemoteStore {
    type Error = StoreError;

    async fn load(&self) -> Result<Option<RecordSet>, Self::Error> {
        let response = authed(self.client.get(self.document_url()), &self.config.api_key)
            .send()
            .await
            .map_err(|e| StoreError::Unavailable(e.to_string()))?;

        match response.status() {
            status if status.is_success() => response
                .json::<RecordSet>()
                .await
                .map(Some)
                .map_err(|e| StoreError::InvalidDocument(e.to_string())),
            reqwest::StatusCode::NOT_FOUND => Ok(None),
            status => Err(StoreError::Unavailable(format!(
                "unexpected HTTP {status} on load"
            ))),
        }
    }

    async fn save(&self, set: &RecordSet) -> Result<(), Self::Error> {
        let response = authed(self.client.put(self.document_url()), &self.config.api_key)
            .json(set)
            .send()
            .await
            .map_err(|e| StoreError::WriteFailed(e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            let body = response.text().await.unwrap_or_default();
            Err(StoreError::WriteFailed(format!("HTTP {status}: {body}")))
        }
    }
}

#[derive(Deserialize)]
struct BlobUploadResponse {
    url: String,
}

/// Remote blob store: raw bytes under `files/{filename}`, answering with a
/// download URL
pub struct RemoteBlobStore {
    client: reqwest::Client,
    config: StoreConfig,
}

impl RemoteBlobStore {
    /// Create a blob client for the given configuration
    pub fn new(config: StoreConfig) -> Result<Self, StoreError> {
        config.validate()?;
        Ok(Self {
            client: build_client(config.timeout_secs)?,
            config,
        })
    }

    fn blob_url(&self, filename: &str) -> String {
        format!(
            "{}/files/{}",
            self.config.base_url.trim_end_matches('/'),
            filename
        )
    }
}

#[async_trait]
impl BlobStore for RemoteBlobStore {
    type Error = StoreError;

    async fn upload(&self, filename: &str, bytes: &[u8]) -> Result<String, Self::Error> {
        let response = authed(self.client.put(self.blob_url(filename)), &self.config.api_key)
            .body(bytes.to_vec())
            .send()
            .await
            .map_err(|e| StoreError::WriteFailed(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(StoreError::WriteFailed(format!("HTTP {status}: {body}")));
        }

        response
            .json::<BlobUploadResponse>()
            .await
            .map(|r| r.url)
            .map_err(|e| StoreError::InvalidDocument(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> StoreConfig {
        StoreConfig {
            base_url: "http://localhost:9999".to_string(),
            api_key: None,
            collection: "legalAnalyzer".to_string(),
            key: "documents".to_string(),
            timeout_secs: 5,
        }
    }

    #[test]
    fn test_config_validation() {
        assert!(test_config().validate().is_ok());

        let mut missing_url = test_config();
        missing_url.base_url.clear();
        assert!(matches!(missing_url.validate(), Err(StoreError::Config(_))));

        let mut missing_key = test_config();
        missing_key.key.clear();
        assert!(missing_key.validate().is_err());
    }

    #[test]
    fn test_document_url_is_fixed_collection_path() {
        let store = RemoteStore::new(test_config()).unwrap();
        assert_eq!(
            store.document_url(),
            "http://localhost:9999/collections/legalAnalyzer/documents"
        );
    }

    #[test]
    fn test_blob_url_derives_from_filename() {
        let blobs = RemoteBlobStore::new(test_config()).unwrap();
        assert_eq!(blobs.blob_url("a.pdf"), "http://localhost:9999/files/a.pdf");
    }

    #[tokio::test]
    async fn test_unreachable_store_is_unavailable() {
        let store = RemoteStore::new(test_config()).unwrap();
        assert!(matches!(
            store.load().await,
            Err(StoreError::Unavailable(_))
        ));
    }

    #[tokio::test]
    async fn test_unreachable_store_save_is_write_failed() {
        let store = RemoteStore::new(test_config()).unwrap();
        assert!(matches!(
            store.save(&RecordSet::new()).await,
            Err(StoreError::WriteFailed(_))
        ));
    }
}
