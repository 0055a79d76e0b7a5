//! HTTP client for an OpenAI-compatible assistants endpoint
//!
//! Implements the `AssistantJobs` seam over reqwest. Every instance carries
//! its own configuration; there is no shared global client, so tests and
//! multiple controllers can point at distinct endpoints.

use crate::AssistantError;
use async_trait::async_trait;
use lexintake_domain::traits::{AssistantJobs, MessageRole, RunStatus, ThreadMessage};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default API endpoint
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// Default request timeout in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Protocol version header required by the assistants endpoints
const BETA_HEADER: (&str, &str) = ("OpenAI-Beta", "assistants=v2");

/// Configuration for [`RemoteAssistant`].
///
/// `assistant_id` and `vector_store_id` name the pre-configured assistant
/// and knowledge store every extraction runs against.
#[derive(Debug, Clone)]
pub struct AssistantConfig {
    /// Base URL of the service
    pub base_url: String,
    /// Bearer token (optional for local gateways)
    pub api_key: Option<String>,
    /// Identifier of the pre-configured assistant
    pub assistant_id: String,
    /// Identifier of the pre-configured knowledge (vector) store
    pub vector_store_id: String,
    /// Per-request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for AssistantConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: None,
            assistant_id: String::new(),
            vector_store_id: String::new(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl AssistantConfig {
    /// Build a configuration from environment variables
    /// (`LEXINTAKE_ASSISTANT_BASE_URL`, `LEXINTAKE_ASSISTANT_API_KEY`,
    /// `LEXINTAKE_ASSISTANT_ID`, `LEXINTAKE_VECTOR_STORE_ID`,
    /// `LEXINTAKE_ASSISTANT_TIMEOUT`).
    pub fn from_env() -> Self {
        Self {
            base_url: std::env::var("LEXINTAKE_ASSISTANT_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_BASE_URL.to_string()),
            api_key: std::env::var("LEXINTAKE_ASSISTANT_API_KEY").ok(),
            assistant_id: std::env::var("LEXINTAKE_ASSISTANT_ID").unwrap_or_default(),
            vector_store_id: std::env::var("LEXINTAKE_VECTOR_STORE_ID").unwrap_or_default(),
            timeout_secs: std::env::var("LEXINTAKE_ASSISTANT_TIMEOUT")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(DEFAULT_TIMEOUT_SECS),
        }
    }

    /// Check the configuration names an assistant and a knowledge store
    pub fn validate(&self) -> Result<(), AssistantError> {
        if self.assistant_id.is_empty() {
            return Err(AssistantError::Config("assistant_id is empty".to_string()));
        }
        if self.vector_store_id.is_empty() {
            return Err(AssistantError::Config(
                "vector_store_id is empty".to_string(),
            ));
        }
        Ok(())
    }
}

/// Assistant job API client over HTTP
#[derive(Clone)]
pub struct RemoteAssistant {
    client: reqwest::Client,
    config: AssistantConfig,
}

// Wire types. Only the fields the pipeline depends on are modeled; the
// service's richer payloads deserialize onto these with the rest ignored.

#[derive(Deserialize)]
struct ObjectWithId {
    id: String,
}

#[derive(Deserialize)]
struct RunObject {
    id: String,
    #[serde(default)]
    status: String,
}

#[derive(Serialize)]
struct RegisterFileRequest<'a> {
    file_id: &'a str,
}

#[derive(Serialize)]
struct PostMessageRequest<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Serialize)]
struct CreateRunRequest<'a> {
    assistant_id: &'a str,
}

#[derive(Deserialize)]
struct MessageList {
    #[serde(default)]
    data: Vec<MessageObject>,
}

#[derive(Deserialize)]
struct MessageObject {
    #[serde(default)]
    role: String,
    #[serde(default)]
    content: Vec<ContentBlock>,
}

#[derive(Deserialize)]
struct ContentBlock {
    #[serde(rename = "type", default)]
    kind: String,
    text: Option<TextValue>,
}

#[derive(Deserialize)]
struct TextValue {
    value: String,
}

#[derive(Deserialize)]
struct ApiErrorBody {
    error: ApiErrorDetail,
}

#[derive(Deserialize)]
struct ApiErrorDetail {
    message: String,
}

impl RemoteAssistant {
    /// Create a client for the given configuration
    pub fn new(config: AssistantConfig) -> Result<Self, AssistantError> {
        config.validate()?;
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| AssistantError::Config(format!("failed to build HTTP client: {e}")))?;
        Ok(Self { client, config })
    }

    /// The active configuration
    pub fn config(&self) -> &AssistantConfig {
        &self.config
    }

    fn url(&self, endpoint: &str) -> String {
        format!("{}{}", self.config.base_url.trim_end_matches('/'), endpoint)
    }

    fn authed(&self, req: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        let req = req.header(BETA_HEADER.0, BETA_HEADER.1);
        match &self.config.api_key {
            Some(key) => req.header("Authorization", format!("Bearer {key}")),
            None => req,
        }
    }

    fn post(&self, endpoint: &str) -> reqwest::RequestBuilder {
        self.authed(self.client.post(self.url(endpoint)))
    }

    fn get(&self, endpoint: &str) -> reqwest::RequestBuilder {
        self.authed(self.client.get(self.url(endpoint)))
    }

    /// Decode a response, turning non-success statuses into typed errors
    async fn decode<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, AssistantError> {
        let status = response.status();
        if status.is_success() {
            response
                .json::<T>()
                .await
                .map_err(|e| AssistantError::InvalidResponse(e.to_string()))
        } else {
            let message = response
                .json::<ApiErrorBody>()
                .await
                .map(|b| b.error.message)
                .unwrap_or_else(|_| "unknown error".to_string());
            Err(AssistantError::Api {
                status: status.as_u16(),
                message,
            })
        }
    }

    /// Readiness probe: verify the configured assistant exists before the
    /// first batch, surfacing misconfiguration early.
    pub async fn retrieve_assistant(&self) -> Result<String, AssistantError> {
        let endpoint = format!("/assistants/{}", self.config.assistant_id);
        let response = self.get(&endpoint).send().await?;
        let obj: ObjectWithId = Self::decode(response).await?;
        Ok(obj.id)
    }
}

#[async_trait]
impl AssistantJobs for RemoteAssistant {
    type Error = AssistantError;

    async fn upload_file(&self, filename: &str, bytes: Vec<u8>) -> Result<String, Self::Error> {
        let part = reqwest::multipart::Part::bytes(bytes).file_name(filename.to_string());
        let form = reqwest::multipart::Form::new()
            .text("purpose", "assistants")
            .part("file", part);

        let response = self.post("/files").multipart(form).send().await?;
        let obj: ObjectWithId = Self::decode(response).await?;
        Ok(obj.id)
    }

    async fn register_file(&self, file_id: &str) -> Result<(), Self::Error> {
        let endpoint = format!("/vector_stores/{}/files", self.config.vector_store_id);
        let response = self
            .post(&endpoint)
            .json(&RegisterFileRequest { file_id })
            .send()
            .await?;
        let _: ObjectWithId = Self::decode(response).await?;
        Ok(())
    }

    async fn create_thread(&self) -> Result<String, Self::Error> {
        let response = self
            .post("/threads")
            .json(&serde_json::json!({}))
            .send()
            .await?;
        let obj: ObjectWithId = Self::decode(response).await?;
        Ok(obj.id)
    }

    async fn post_message(&self, thread_id: &str, content: &str) -> Result<(), Self::Error> {
        let endpoint = format!("/threads/{thread_id}/messages");
        let response = self
            .post(&endpoint)
            .json(&PostMessageRequest {
                role: "user",
                content,
            })
            .send()
            .await?;
        let _: ObjectWithId = Self::decode(response).await?;
        Ok(())
    }

    async fn create_run(&self, thread_id: &str) -> Result<String, Self::Error> {
        let endpoint = format!("/threads/{thread_id}/runs");
        let response = self
            .post(&endpoint)
            .json(&CreateRunRequest {
                assistant_id: &self.config.assistant_id,
            })
            .send()
            .await?;
        let run: RunObject = Self::decode(response).await?;
        Ok(run.id)
    }

    async fn run_status(&self, thread_id: &str, run_id: &str) -> Result<RunStatus, Self::Error> {
        let endpoint = format!("/threads/{thread_id}/runs/{run_id}");
        let response = self.get(&endpoint).send().await?;
        let run: RunObject = Self::decode(response).await?;
        Ok(RunStatus::from_api_str(&run.status))
    }

    async fn list_messages(&self, thread_id: &str) -> Result<Vec<ThreadMessage>, Self::Error> {
        let endpoint = format!("/threads/{thread_id}/messages");
        let response = self.get(&endpoint).send().await?;
        let list: MessageList = Self::decode(response).await?;

        Ok(list
            .data
            .into_iter()
            .map(|m| ThreadMessage {
                role: MessageRole::from_api_str(&m.role),
                text_blocks: m
                    .content
                    .into_iter()
                    .filter(|b| b.kind == "text")
                    .filter_map(|b| b.text.map(|t| t.value))
                    .collect(),
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> AssistantConfig {
        AssistantConfig {
            base_url: "http://localhost:9999/v1".to_string(),
            api_key: Some("sk-test".to_string()),
            assistant_id: "asst_test".to_string(),
            vector_store_id: "vs_test".to_string(),
            timeout_secs: 5,
        }
    }

    #[test]
    fn test_config_validation() {
        assert!(test_config().validate().is_ok());

        let mut missing_assistant = test_config();
        missing_assistant.assistant_id.clear();
        assert!(matches!(
            missing_assistant.validate(),
            Err(AssistantError::Config(_))
        ));

        let mut missing_store = test_config();
        missing_store.vector_store_id.clear();
        assert!(missing_store.validate().is_err());
    }

    #[test]
    fn test_url_joins_without_double_slash() {
        let mut config = test_config();
        config.base_url = "http://localhost:9999/v1/".to_string();
        let assistant = RemoteAssistant::new(config).unwrap();
        assert_eq!(assistant.url("/files"), "http://localhost:9999/v1/files");
    }

    #[test]
    fn test_message_list_decoding() {
        let body = r#"{
            "data": [
                {
                    "role": "assistant",
                    "content": [
                        {"type": "text", "text": {"value": "<contractTitle>MSA</contractTitle>"}},
                        {"type": "image_file"}
                    ]
                },
                {"role": "user", "content": [{"type": "text", "text": {"value": "prompt"}}]}
            ]
        }"#;
        let list: MessageList = serde_json::from_str(body).unwrap();
        assert_eq!(list.data.len(), 2);
        assert_eq!(list.data[0].content.len(), 2);
        // Non-text blocks carry no text value
        assert!(list.data[0].content[1].text.is_none());
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_is_http_error() {
        let assistant = RemoteAssistant::new(test_config()).unwrap();
        let result = assistant.create_thread().await;
        assert!(matches!(result, Err(AssistantError::Http(_))));
    }
}
