//! Summarization through an OpenAI-compatible chat completions endpoint.

use crate::services::{decode, ensure_success, http_client, ServiceError, Summarizer};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::info;

const SERVICE: &str = "openai";

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_MODEL: &str = "gpt-4";

pub const DEFAULT_SYSTEM_PROMPT: &str = "\
You are an analyst who answers questions about reports.
Infer as much context as you can and answer as precisely as possible.
If a request is ambiguous, ask a short clarifying question first.
Reply in whatever language the user asks for, and translate when asked.
Do not mention being an AI, do not apologise, and skip disclaimers about expertise.
Break complex problems into small steps and explain the reasoning for each.
Treat the reader as an expert; accuracy and thoroughness matter more than brevity.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummarizeOptions {
    pub model: String,
    pub system_prompt: String,
}

impl Default for SummarizeOptions {
    fn default() -> Self {
        SummarizeOptions {
            model: DEFAULT_MODEL.to_string(),
            system_prompt: DEFAULT_SYSTEM_PROMPT.to_string(),
        }
    }
}

pub struct OpenAiSummarizer {
    http: Client,
    base_url: String,
    api_key: String,
    options: SummarizeOptions,
}

impl OpenAiSummarizer {
    pub fn new(
        api_key: impl Into<String>,
        options: SummarizeOptions,
        timeout: Duration,
    ) -> Result<Self, ServiceError> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(ServiceError::InvalidArgument(
                "openai api key must not be empty".to_string(),
            ));
        }
        Ok(Self {
            http: http_client(timeout)?,
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key,
            options,
        })
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn options(&self) -> &SummarizeOptions {
        &self.options
    }
}

#[async_trait]
impl Summarizer for OpenAiSummarizer {
    async fn summarize(&self, text: &str) -> Result<String, ServiceError> {
        let request = ChatCompletionRequest::summarize(&self.options, text);
        let response = self
            .http
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await?;
        let body = ensure_success(SERVICE, response).await?.text().await?;
        let response: ChatCompletionResponse = decode(SERVICE, &body)?;
        let summary = response.into_content()?;
        info!(model = %self.options.model, chars = summary.len(), "generated summary");
        Ok(summary)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ChatCompletionRequest {
    pub model: String,
    pub messages: Vec<Message>,
}

impl ChatCompletionRequest {
    pub fn summarize(options: &SummarizeOptions, text: &str) -> Self {
        ChatCompletionRequest {
            model: options.model.clone(),
            messages: vec![
                Message {
                    role: Role::System,
                    content: options.system_prompt.clone(),
                },
                Message {
                    role: Role::User,
                    content: format!("Please summarize the following text.\nReport: {}", text),
                },
            ],
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChatCompletionResponse {
    #[serde(default)]
    pub choices: Vec<ChatCompletionChoice>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChatCompletionChoice {
    pub message: ResponseMessage,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ResponseMessage {
    #[serde(default)]
    pub content: Option<String>,
}

impl ChatCompletionResponse {
    /// Content of the first choice; blank or missing content is an error.
    pub fn into_content(self) -> Result<String, ServiceError> {
        self.choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .filter(|content| !content.trim().is_empty())
            .ok_or(ServiceError::EmptyResponse("no summary was generated"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summarize_request_puts_prompt_first() {
        let options = SummarizeOptions {
            model: "gpt-4o-mini".to_string(),
            system_prompt: "Be brief.".to_string(),
        };
        let request = ChatCompletionRequest::summarize(&options, "Revenue grew 4%.");
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "model": "gpt-4o-mini",
                "messages": [
                    {"role": "system", "content": "Be brief."},
                    {"role": "user", "content": "Please summarize the following text.\nReport: Revenue grew 4%."},
                ]
            })
        );
    }

    #[test]
    fn default_options() {
        let options = SummarizeOptions::default();
        assert_eq!(options.model, "gpt-4");
        assert_eq!(options.system_prompt, DEFAULT_SYSTEM_PROMPT);
    }

    #[test]
    fn reads_first_choice() {
        let body = r#"{"id": "c1", "choices": [
            {"index": 0, "message": {"role": "assistant", "content": "Short summary."}, "finish_reason": "stop"}
        ]}"#;
        let response: ChatCompletionResponse = serde_json::from_str(body).unwrap();
        assert_eq!(response.into_content().unwrap(), "Short summary.");
    }

    #[test]
    fn empty_content_is_an_error() {
        for body in [
            r#"{"choices": []}"#,
            r#"{"choices": [{"message": {"role": "assistant", "content": null}}]}"#,
            r#"{"choices": [{"message": {"role": "assistant", "content": "  "}}]}"#,
        ] {
            let response: ChatCompletionResponse = serde_json::from_str(body).unwrap();
            let err = response.into_content().unwrap_err();
            assert!(matches!(err, ServiceError::EmptyResponse(_)), "{body}");
            assert_eq!(err.to_string(), "no summary was generated");
        }
    }

    #[test]
    fn blank_api_key_is_rejected() {
        assert!(matches!(
            OpenAiSummarizer::new(" ", SummarizeOptions::default(), Duration::from_secs(1)),
            Err(ServiceError::InvalidArgument(_))
        ));
    }
}
