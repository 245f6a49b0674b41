//! HTTP client for the chat backend.
//!
//! Two endpoints are used:
//! - `POST {base}/api/upload` - multipart form with a `file` field
//! - `POST {base}/chat` - JSON `{ "query": ... }`, answered with raw text
//!
//! The base URL comes from [`Config`], which reads `DASH_CHAT_URL`
//! (default: `http://localhost:3000`).

use std::path::Path;
use std::time::Duration;

use reqwest::{multipart, Client, StatusCode};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::Config;

/// HTTP client errors.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Server returned {status}: {body}")]
    Status { status: StatusCode, body: String },

    #[error("Failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Unexpected response body: {0}")]
    InvalidResponse(String),
}

/// Body of `POST /chat`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatRequest {
    pub query: String,
}

/// Successful response of `POST /api/upload`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadResponse {
    #[serde(default)]
    pub message: String,
}

/// The two remote calls a chat session depends on.
///
/// [`ChatClient`] talks HTTP; tests substitute their own backend.
#[allow(async_fn_in_trait)]
pub trait ChatBackend {
    /// Upload a context file. Returns the server's message.
    async fn upload(&self, path: &Path) -> Result<String, ClientError>;

    /// Ask a question. Returns the raw response body.
    async fn ask(&self, query: &str) -> Result<String, ClientError>;
}

/// HTTP client for the chat backend.
#[derive(Debug, Clone)]
pub struct ChatClient {
    base_url: String,
    upload_path: String,
    chat_path: String,
    client: Client,
}

impl ChatClient {
    /// Create a client with default endpoint paths and no timeout.
    pub fn new(base_url: impl Into<String>) -> Self {
        let defaults = Config::default();
        Self {
            base_url: trim_base(base_url.into()),
            upload_path: defaults.upload_path,
            chat_path: defaults.chat_path,
            client: Client::new(),
        }
    }

    /// Create a client from loaded configuration.
    pub fn from_config(config: &Config) -> Result<Self, ClientError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self {
            base_url: trim_base(config.base_url.clone()),
            upload_path: config.upload_path.clone(),
            chat_path: config.chat_path.clone(),
            client,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Convert a non-success status into [`ClientError::Status`].
    async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, ClientError> {
        let status = response.status();
        if status.is_success() {
            Ok(response)
        } else {
            let body = response.text().await.unwrap_or_default();
            Err(ClientError::Status { status, body })
        }
    }
}

impl ChatBackend for ChatClient {
    async fn upload(&self, path: &Path) -> Result<String, ClientError> {
        let bytes = tokio::fs::read(path).await.map_err(|source| ClientError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "upload".to_string());

        let form =
            multipart::Form::new().part("file", multipart::Part::bytes(bytes).file_name(file_name));

        tracing::debug!("Uploading {} to {}", path.display(), self.url(&self.upload_path));
        let response = self
            .client
            .post(self.url(&self.upload_path))
            .multipart(form)
            .send()
            .await?;
        let response = Self::check_status(response).await?;
        let body = response.text().await?;
        let result: UploadResponse = serde_json::from_str(&body)
            .map_err(|e| ClientError::InvalidResponse(format!("{}: {}", e, body)))?;
        Ok(result.message)
    }

    async fn ask(&self, query: &str) -> Result<String, ClientError> {
        let response = self
            .client
            .post(self.url(&self.chat_path))
            .json(&ChatRequest {
                query: query.to_string(),
            })
            .send()
            .await?;
        let response = Self::check_status(response).await?;
        let raw = response.text().await?;
        tracing::debug!("Raw result: {}", raw);
        Ok(raw)
    }
}

fn trim_base(mut base_url: String) -> String {
    while base_url.ends_with('/') {
        base_url.pop();
    }
    base_url
}
