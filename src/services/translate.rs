//! Google Cloud Translation (v2 / "basic") client.

use crate::services::{decode, ensure_success, http_client, ServiceError, Translator};
use async_trait::async_trait;
use regex::Regex;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;
use std::time::Duration;
use tracing::debug;

const SERVICE: &str = "translate";

pub const DEFAULT_ENDPOINT: &str = "https://translation.googleapis.com";

/// Characters sent per request; the v2 API rejects much larger payloads.
pub const MAX_REQUEST_CHARS: usize = 30_000;

#[derive(Debug, Clone)]
pub enum TranslateAuth {
    ApiKey(String),
    AccessToken(String),
}

pub struct GoogleTranslateClient {
    http: Client,
    endpoint: String,
    auth: TranslateAuth,
}

impl GoogleTranslateClient {
    pub fn new(auth: TranslateAuth, timeout: Duration) -> Result<Self, ServiceError> {
        Ok(Self {
            http: http_client(timeout)?,
            endpoint: DEFAULT_ENDPOINT.to_string(),
            auth,
        })
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into().trim_end_matches('/').to_string();
        self
    }

    pub fn translate_url(&self) -> String {
        format!("{}/language/translate/v2", self.endpoint)
    }

    pub async fn translate_text(
        &self,
        text: &str,
        target_language: &str,
    ) -> Result<Translation, ServiceError> {
        validate_language_code(target_language)?;
        if text.is_empty() {
            return Ok(Translation {
                translated_text: String::new(),
                detected_source_language: None,
            });
        }

        let request = TranslateRequest {
            q: vec![text],
            target: target_language,
            format: "text",
        };
        let builder = self.http.post(self.translate_url()).json(&request);
        let builder = match &self.auth {
            TranslateAuth::ApiKey(key) => builder.query(&[("key", key)]),
            TranslateAuth::AccessToken(token) => builder.bearer_auth(token),
        };

        let response = builder.send().await?;
        let body = ensure_success(SERVICE, response).await?.text().await?;
        let translation = first_translation(&body)?;
        debug!(
            target_language,
            source = translation.detected_source_language.as_deref().unwrap_or("?"),
            "translated text"
        );
        Ok(translation)
    }
}

#[async_trait]
impl Translator for GoogleTranslateClient {
    async fn translate(&self, text: &str, target_language: &str) -> Result<String, ServiceError> {
        validate_language_code(target_language)?;
        let batches = request_batches(text, MAX_REQUEST_CHARS);
        if batches.len() > 1 {
            debug!(batches = batches.len(), "translating in batches");
        }
        let mut parts = Vec::with_capacity(batches.len());
        for batch in batches {
            parts.push(self.translate_text(batch, target_language).await?.translated_text);
        }
        Ok(parts.join("\n"))
    }
}

/// Split `text` into pieces of at most `max_chars` characters, breaking at a
/// newline where one fits. The newline a piece was split at is dropped, so
/// joining the pieces with `\n` gives back the input unless a single line
/// was longer than `max_chars`.
pub fn request_batches(text: &str, max_chars: usize) -> Vec<&str> {
    let max_chars = max_chars.max(1);
    let mut batches = Vec::new();
    let mut rest = text;
    while let Some((limit, ch)) = rest.char_indices().nth(max_chars) {
        match rest[..limit + ch.len_utf8()].rfind('\n') {
            Some(nl) if nl > 0 => {
                batches.push(&rest[..nl]);
                rest = &rest[nl + 1..];
            }
            _ => {
                batches.push(&rest[..limit]);
                rest = &rest[limit..];
            }
        }
    }
    if !rest.is_empty() || batches.is_empty() {
        batches.push(rest);
    }
    batches
}

fn language_code_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^[A-Za-z]{2,3}(-[A-Za-z0-9]{2,8})*$").expect("valid language code regex")
    })
}

/// Accept BCP-47 style codes such as `de`, `fil`, `zh-CN` or `zh-Hant-TW`.
pub fn validate_language_code(code: &str) -> Result<(), ServiceError> {
    if language_code_regex().is_match(code) {
        Ok(())
    } else {
        Err(ServiceError::InvalidArgument(format!(
            "invalid target language code `{}`",
            code
        )))
    }
}

#[derive(Debug, Serialize)]
struct TranslateRequest<'a> {
    q: Vec<&'a str>,
    target: &'a str,
    format: &'static str,
}

#[derive(Debug, Deserialize)]
struct TranslateResponse {
    data: TranslationsData,
}

#[derive(Debug, Deserialize)]
struct TranslationsData {
    #[serde(default)]
    translations: Vec<Translation>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Translation {
    pub translated_text: String,
    #[serde(default)]
    pub detected_source_language: Option<String>,
}

fn first_translation(body: &str) -> Result<Translation, ServiceError> {
    let response: TranslateResponse = decode(SERVICE, body)?;
    response
        .data
        .translations
        .into_iter()
        .next()
        .ok_or(ServiceError::EmptyResponse("no translation was returned"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_common_language_codes() {
        for code in ["en", "de", "fil", "zh-CN", "zh-Hant-TW", "pt-BR"] {
            assert!(validate_language_code(code).is_ok(), "{code}");
        }
    }

    #[test]
    fn rejects_malformed_language_codes() {
        for code in ["", "e", "english", "zh_CN", "en-", "../x"] {
            assert!(
                matches!(
                    validate_language_code(code),
                    Err(ServiceError::InvalidArgument(_))
                ),
                "{code}"
            );
        }
    }

    #[test]
    fn request_shape() {
        let request = TranslateRequest {
            q: vec!["Hello world"],
            target: "zh-CN",
            format: "text",
        };
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            serde_json::json!({"q": ["Hello world"], "target": "zh-CN", "format": "text"})
        );
    }

    #[test]
    fn parses_first_translation() {
        let body = r#"{"data": {"translations": [
            {"translatedText": "你好世界", "detectedSourceLanguage": "en"}
        ]}}"#;
        let t = first_translation(body).unwrap();
        assert_eq!(t.translated_text, "你好世界");
        assert_eq!(t.detected_source_language.as_deref(), Some("en"));
    }

    #[test]
    fn empty_translation_list_is_an_error() {
        let err = first_translation(r#"{"data": {"translations": []}}"#).unwrap_err();
        assert!(matches!(err, ServiceError::EmptyResponse(_)));
    }

    #[test]
    fn short_text_is_one_batch() {
        assert_eq!(request_batches("Hello\nworld", 100), vec!["Hello\nworld"]);
        assert_eq!(request_batches("", 100), vec![""]);
    }

    #[test]
    fn batches_break_at_line_ends() {
        let text = "aaaa\nbbbb\ncccc";
        let batches = request_batches(text, 9);
        assert_eq!(batches, vec!["aaaa\nbbbb", "cccc"]);
        assert_eq!(batches.join("\n"), text);
    }

    #[test]
    fn overlong_lines_are_cut_on_char_boundaries() {
        assert_eq!(request_batches("abcdefghij", 4), vec!["abcd", "efgh", "ij"]);
        assert_eq!(request_batches("ééééé", 2), vec!["éé", "éé", "é"]);
    }

    #[tokio::test]
    async fn empty_text_skips_the_request() {
        // nothing listens on this port; a request would fail
        let client = GoogleTranslateClient::new(
            TranslateAuth::ApiKey("k".to_string()),
            Duration::from_secs(1),
        )
        .unwrap()
        .with_endpoint("http://127.0.0.1:9");
        assert_eq!(client.translate("", "fr").await.unwrap(), "");
    }

    #[tokio::test]
    async fn invalid_target_fails_before_request() {
        let client = GoogleTranslateClient::new(
            TranslateAuth::AccessToken("t".to_string()),
            Duration::from_secs(1),
        )
        .unwrap();
        let err = client.translate("Hello", "not a code").await.unwrap_err();
        assert!(matches!(err, ServiceError::InvalidArgument(_)));
    }
}
