//! Narrow clients for the remote services: text extraction, translation and
//! summarization. Workflows depend on the traits so they can run against fakes.

pub mod documentai;
pub mod openai;
pub mod translate;

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub use documentai::{DocumentAiClient, DocumentAiProcessor};
pub use openai::{OpenAiSummarizer, SummarizeOptions};
pub use translate::{GoogleTranslateClient, TranslateAuth};

pub const PDF_MIME_TYPE: &str = "application/pdf";

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{service} returned error status {status}: {body}")]
    Status {
        service: &'static str,
        status: u16,
        body: String,
    },

    #[error("unexpected response from {service}: {message}")]
    Decode {
        service: &'static str,
        message: String,
    },

    #[error("{0}")]
    EmptyResponse(&'static str),

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("unsupported mime type `{0}`")]
    UnsupportedMimeType(String),

    #[error("failed to extract text from {path}: {message}")]
    Extract { path: PathBuf, message: String },

    #[error("background task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

#[async_trait]
pub trait TextExtractor: Send + Sync {
    async fn extract_text(&self, path: &Path, mime_type: &str) -> Result<String, ServiceError>;
}

#[async_trait]
pub trait Translator: Send + Sync {
    async fn translate(&self, text: &str, target_language: &str) -> Result<String, ServiceError>;
}

#[async_trait]
pub trait Summarizer: Send + Sync {
    async fn summarize(&self, text: &str) -> Result<String, ServiceError>;
}

/// Turn a non-2xx response into [`ServiceError::Status`], keeping the body for diagnostics.
pub(crate) async fn ensure_success(
    service: &'static str,
    response: reqwest::Response,
) -> Result<reqwest::Response, ServiceError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response
        .text()
        .await
        .unwrap_or_else(|_| "Unknown error".to_string());
    Err(ServiceError::Status {
        service,
        status: status.as_u16(),
        body,
    })
}

/// Parse a response body, naming the service on failure.
pub(crate) fn decode<T: serde::de::DeserializeOwned>(
    service: &'static str,
    body: &str,
) -> Result<T, ServiceError> {
    serde_json::from_str(body).map_err(|e| ServiceError::Decode {
        service,
        message: e.to_string(),
    })
}

pub(crate) fn http_client(timeout: std::time::Duration) -> Result<reqwest::Client, ServiceError> {
    Ok(reqwest::Client::builder().timeout(timeout).build()?)
}
