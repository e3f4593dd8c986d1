use crate::pdf::{AdvancePolicy, SplitOptions, DEFAULT_MAX_PAGES_PER_CHUNK};
use crate::services::documentai::DocumentAiProcessor;
use crate::services::openai::{DEFAULT_BASE_URL, DEFAULT_MODEL, DEFAULT_SYSTEM_PROMPT};
use crate::services::translate::DEFAULT_ENDPOINT;
use crate::services::{
    DocumentAiClient, GoogleTranslateClient, OpenAiSummarizer, SummarizeOptions, TranslateAuth,
};
use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DEFAULT_CONFIG_FILE: &str = "bilby.toml";

pub const OPENAI_API_KEY_ENV: &str = "OPENAI_API_KEY";
pub const GOOGLE_API_KEY_ENV: &str = "GOOGLE_API_KEY";
pub const GOOGLE_ACCESS_TOKEN_ENV: &str = "GOOGLE_ACCESS_TOKEN";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub split: Split,
    #[serde(default)]
    pub document_ai: DocumentAi,
    #[serde(default)]
    pub translate: Translate,
    #[serde(default)]
    pub openai: OpenAi,
    #[serde(default)]
    pub http: Http,
    #[serde(default)]
    pub logging: Logging,
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("reading config: {}", path.display()))?;
        Self::from_toml_str(&raw).with_context(|| format!("parsing config: {}", path.display()))
    }

    pub fn from_toml_str(raw: &str) -> Result<Self> {
        let cfg: Self = toml::from_str(raw)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<()> {
        if self.split.max_pages_per_chunk == 0 {
            return Err(anyhow!("split.max_pages_per_chunk must be at least 1"));
        }
        Ok(())
    }

    /// Load `user` if given, else `./bilby.toml` if present, else defaults.
    pub fn resolve(user: Option<&Path>) -> Result<Self> {
        if let Some(path) = user {
            return Self::load(path);
        }
        let default = PathBuf::from(DEFAULT_CONFIG_FILE);
        if default.exists() {
            Self::load(&default)
        } else {
            Ok(Self::default())
        }
    }

    pub fn split_options(&self) -> SplitOptions {
        SplitOptions {
            max_pages_per_chunk: self.split.max_pages_per_chunk,
            policy: self.split.advance,
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.http.timeout_secs)
    }

    pub fn summarize_options(&self) -> SummarizeOptions {
        SummarizeOptions {
            model: self.openai.model.clone(),
            system_prompt: self.openai.system_prompt.clone(),
        }
    }

    pub fn document_ai_client(&self) -> Result<DocumentAiClient> {
        let cfg = &self.document_ai;
        if cfg.project_id.is_empty() || cfg.processor_id.is_empty() {
            return Err(anyhow!(
                "document_ai.project_id and document_ai.processor_id must be configured"
            ));
        }
        let token = cfg
            .access_token
            .clone()
            .or_else(|| env_var(GOOGLE_ACCESS_TOKEN_ENV))
            .ok_or_else(|| {
                anyhow!(
                    "no Document AI access token: set document_ai.access_token or {}",
                    GOOGLE_ACCESS_TOKEN_ENV
                )
            })?;
        let processor = DocumentAiProcessor {
            project_id: cfg.project_id.clone(),
            location: cfg.location.clone(),
            processor_id: cfg.processor_id.clone(),
        };
        let client = DocumentAiClient::new(processor, token, self.timeout())?;
        Ok(match &cfg.endpoint {
            Some(endpoint) => client.with_endpoint(endpoint.clone()),
            None => client,
        })
    }

    pub fn translate_client(&self) -> Result<GoogleTranslateClient> {
        let cfg = &self.translate;
        let auth = if let Some(key) = cfg.api_key.clone().or_else(|| env_var(GOOGLE_API_KEY_ENV)) {
            TranslateAuth::ApiKey(key)
        } else if let Some(token) = cfg
            .access_token
            .clone()
            .or_else(|| env_var(GOOGLE_ACCESS_TOKEN_ENV))
        {
            TranslateAuth::AccessToken(token)
        } else {
            return Err(anyhow!(
                "no Translate credentials: set translate.api_key, {} or {}",
                GOOGLE_API_KEY_ENV,
                GOOGLE_ACCESS_TOKEN_ENV
            ));
        };
        Ok(GoogleTranslateClient::new(auth, self.timeout())?.with_endpoint(cfg.endpoint.clone()))
    }

    pub fn summarizer(&self, model: Option<&str>) -> Result<OpenAiSummarizer> {
        let key = self
            .openai
            .api_key
            .clone()
            .or_else(|| env_var(OPENAI_API_KEY_ENV))
            .ok_or_else(|| {
                anyhow!(
                    "no OpenAI API key: set openai.api_key or {}",
                    OPENAI_API_KEY_ENV
                )
            })?;
        let mut options = self.summarize_options();
        if let Some(model) = model {
            options.model = model.to_string();
        }
        Ok(OpenAiSummarizer::new(key, options, self.timeout())?
            .with_base_url(self.openai.base_url.clone()))
    }
}

fn env_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.is_empty())
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Split {
    pub max_pages_per_chunk: u32,
    pub advance: AdvancePolicy,
    /// Scratch directory for chunks sent to text extraction.
    pub work_dir: String,
    pub keep_chunks: bool,
}
impl Default for Split {
    fn default() -> Self {
        Self {
            max_pages_per_chunk: DEFAULT_MAX_PAGES_PER_CHUNK,
            advance: AdvancePolicy::Contiguous,
            work_dir: ".bilby-work".into(),
            keep_chunks: false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DocumentAi {
    pub project_id: String,
    pub location: String,
    pub processor_id: String,
    pub endpoint: Option<String>,
    pub access_token: Option<String>,
}
impl Default for DocumentAi {
    fn default() -> Self {
        Self {
            project_id: String::new(),
            location: "us".into(),
            processor_id: String::new(),
            endpoint: None,
            access_token: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Translate {
    pub endpoint: String,
    pub target_language: String,
    pub api_key: Option<String>,
    pub access_token: Option<String>,
}
impl Default for Translate {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.into(),
            target_language: "en".into(),
            api_key: None,
            access_token: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OpenAi {
    pub base_url: String,
    pub model: String,
    pub system_prompt: String,
    pub api_key: Option<String>,
}
impl Default for OpenAi {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.into(),
            model: DEFAULT_MODEL.into(),
            system_prompt: DEFAULT_SYSTEM_PROMPT.into(),
            api_key: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Http {
    pub timeout_secs: u64,
}
impl Default for Http {
    fn default() -> Self {
        Self { timeout_secs: 120 }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Logging {
    pub level: String,
    pub json: bool,
}
impl Default for Logging {
    fn default() -> Self {
        Self {
            level: "info".into(),
            json: false,
        }
    }
}
