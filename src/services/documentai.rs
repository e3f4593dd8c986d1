//! Google Document AI `:process` client.

use crate::services::{decode, ensure_success, http_client, ServiceError, TextExtractor};
use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD as BASE64_STANDARD;
use base64::Engine;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use tracing::{debug, info};

const SERVICE: &str = "document ai";

/// Identifies a processor created in the Cloud console.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentAiProcessor {
    pub project_id: String,
    pub location: String,
    pub processor_id: String,
}

impl DocumentAiProcessor {
    pub fn resource_name(&self) -> String {
        format!(
            "projects/{}/locations/{}/processors/{}",
            self.project_id, self.location, self.processor_id
        )
    }

    fn validate(&self) -> Result<(), ServiceError> {
        for (field, value) in [
            ("project_id", &self.project_id),
            ("location", &self.location),
            ("processor_id", &self.processor_id),
        ] {
            if value.trim().is_empty() || value.contains('/') {
                return Err(ServiceError::InvalidArgument(format!(
                    "document ai {field} `{value}` is empty or contains '/'"
                )));
            }
        }
        Ok(())
    }
}

pub struct DocumentAiClient {
    http: Client,
    endpoint: String,
    processor: DocumentAiProcessor,
    access_token: String,
}

impl std::fmt::Debug for DocumentAiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DocumentAiClient")
            .field("endpoint", &self.endpoint)
            .field("processor", &self.processor)
            .finish_non_exhaustive()
    }
}

impl DocumentAiClient {
    pub fn new(
        processor: DocumentAiProcessor,
        access_token: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, ServiceError> {
        processor.validate()?;
        Ok(Self {
            http: http_client(timeout)?,
            endpoint: regional_endpoint(&processor.location),
            processor,
            access_token: access_token.into(),
        })
    }

    /// Send requests somewhere other than the regional Google endpoint.
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into().trim_end_matches('/').to_string();
        self
    }

    pub fn process_url(&self) -> String {
        format!(
            "{}/v1beta3/{}:process",
            self.endpoint,
            self.processor.resource_name()
        )
    }

    pub async fn process_document(
        &self,
        path: &Path,
        mime_type: &str,
    ) -> Result<ProcessedDocument, ServiceError> {
        if mime_type.trim().is_empty() {
            return Err(ServiceError::InvalidArgument(
                "mime type must not be empty".to_string(),
            ));
        }

        let content = tokio::fs::read(path)
            .await
            .map_err(|source| ServiceError::Io {
                path: path.to_path_buf(),
                source,
            })?;
        debug!(path = %path.display(), bytes = content.len(), "sending document to document ai");

        let request = ProcessRequest::new(&content, mime_type);
        let response = self
            .http
            .post(self.process_url())
            .bearer_auth(&self.access_token)
            .json(&request)
            .send()
            .await?;
        let body = ensure_success(SERVICE, response).await?.text().await?;
        let document = parse_process_response(&body)?;

        info!(
            path = %path.display(),
            pages = document.pages.len(),
            chars = document.text.len(),
            "document ai processed document"
        );
        Ok(document)
    }
}

#[async_trait]
impl TextExtractor for DocumentAiClient {
    async fn extract_text(&self, path: &Path, mime_type: &str) -> Result<String, ServiceError> {
        Ok(self.process_document(path, mime_type).await?.text)
    }
}

pub fn regional_endpoint(location: &str) -> String {
    format!("https://{}-documentai.googleapis.com", location)
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ProcessRequest<'a> {
    raw_document: RawDocument<'a>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct RawDocument<'a> {
    content: String,
    mime_type: &'a str,
}

impl<'a> ProcessRequest<'a> {
    fn new(content: &[u8], mime_type: &'a str) -> Self {
        ProcessRequest {
            raw_document: RawDocument {
                content: BASE64_STANDARD.encode(content),
                mime_type,
            },
        }
    }
}

#[derive(Debug, Deserialize)]
struct ProcessResponse {
    document: Option<ProcessedDocument>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessedDocument {
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub mime_type: Option<String>,
    #[serde(default)]
    pub pages: Vec<ProcessedPage>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessedPage {
    #[serde(default)]
    pub page_number: Option<u32>,
}

fn parse_process_response(body: &str) -> Result<ProcessedDocument, ServiceError> {
    let response: ProcessResponse = decode(SERVICE, body)?;
    response.document.ok_or_else(|| ServiceError::Decode {
        service: SERVICE,
        message: "response has no document".to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn processor() -> DocumentAiProcessor {
        DocumentAiProcessor {
            project_id: "acme-dev".to_string(),
            location: "us".to_string(),
            processor_id: "2370ba2d4e3b3c3e".to_string(),
        }
    }

    #[test]
    fn builds_regional_process_url() {
        let client = DocumentAiClient::new(processor(), "token", Duration::from_secs(5)).unwrap();
        assert_eq!(
            client.process_url(),
            "https://us-documentai.googleapis.com/v1beta3/projects/acme-dev/locations/us/processors/2370ba2d4e3b3c3e:process"
        );

        let client = client.with_endpoint("http://127.0.0.1:9000/");
        assert!(client
            .process_url()
            .starts_with("http://127.0.0.1:9000/v1beta3/projects/"));
    }

    #[test]
    fn rejects_malformed_processor() {
        let mut p = processor();
        p.processor_id = "a/b".to_string();
        assert!(matches!(
            DocumentAiClient::new(p, "token", Duration::from_secs(5)),
            Err(ServiceError::InvalidArgument(_))
        ));
    }

    #[test]
    fn request_carries_base64_content() {
        let request = ProcessRequest::new(b"%PDF-1.5", "application/pdf");
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "rawDocument": {
                    "content": "JVBERi0xLjU=",
                    "mimeType": "application/pdf",
                }
            })
        );
    }

    #[test]
    fn parses_document_text() {
        let body = r#"{"document": {"text": "Hello\nworld\n", "mimeType": "application/pdf",
            "pages": [{"pageNumber": 1}, {"pageNumber": 2}]}}"#;
        let doc = parse_process_response(body).unwrap();
        assert_eq!(doc.text, "Hello\nworld\n");
        assert_eq!(doc.pages.len(), 2);
        assert_eq!(doc.pages[1].page_number, Some(2));
    }

    #[test]
    fn document_without_text_is_empty() {
        let doc = parse_process_response(r#"{"document": {"pages": []}}"#).unwrap();
        assert_eq!(doc.text, "");
    }

    #[test]
    fn missing_document_is_decode_error() {
        let err = parse_process_response(r#"{"humanReviewStatus": {}}"#).unwrap_err();
        assert!(matches!(err, ServiceError::Decode { .. }));
    }

    #[tokio::test]
    async fn unreadable_file_fails_before_request() {
        let dir = tempfile::tempdir().unwrap();
        let client = DocumentAiClient::new(processor(), "token", Duration::from_secs(5))
            .unwrap()
            .with_endpoint("http://127.0.0.1:9");
        let err = client
            .process_document(&dir.path().join("missing.pdf"), "application/pdf")
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Io { .. }));
    }
}
