use anyhow::Result;
use rmcp::{
    ServerHandler, ServiceExt,
    handler::server::{router::tool::ToolRouter, wrapper::Parameters},
    model::{ServerCapabilities, ServerInfo},
    schemars, tool, tool_handler, tool_router,
};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;
use tracing::info;

use crate::commands::{cleanup_scratch, scratch_dir, text_extractor};
use bilby::config::Config;
use bilby::pdf::{split_pdf, AdvancePolicy, PdfDocument, SplitOptions, SplitPlan};
use bilby::services::{Summarizer, Translator};
use bilby::workflow::extract_pdf_text;

// Request structs for tools

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct PdfSplitRequest {
    #[schemars(description = "Path to the PDF file")]
    pub path: String,
    #[schemars(description = "Directory to write the chunks into (must exist)")]
    pub output_dir: String,
    #[schemars(description = "Maximum pages per chunk (default from config, 15)")]
    #[serde(default)]
    pub max_pages_per_chunk: Option<u32>,
    #[schemars(description = "Drop the page at each chunk boundary, matching older file names (default: false)")]
    #[serde(default)]
    pub legacy_advance: bool,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct PdfPlanRequest {
    #[schemars(description = "Path to the PDF file")]
    pub path: String,
    #[schemars(description = "Maximum pages per chunk (default from config, 15)")]
    #[serde(default)]
    pub max_pages_per_chunk: Option<u32>,
    #[schemars(description = "Drop the page at each chunk boundary (default: false)")]
    #[serde(default)]
    pub legacy_advance: bool,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct PdfExtractTextRequest {
    #[schemars(description = "Path to the PDF file")]
    pub path: String,
    #[schemars(description = "Read the embedded text layer instead of calling Document AI (default: false)")]
    #[serde(default)]
    pub local: bool,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct TranslateTextRequest {
    #[schemars(description = "Text to translate")]
    pub text: String,
    #[schemars(description = "Target language code, e.g. 'zh-CN'")]
    pub target_language: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct SummarizeTextRequest {
    #[schemars(description = "Text to summarize")]
    pub text: String,
    #[schemars(description = "Model name (default from config)")]
    #[serde(default)]
    pub model: Option<String>,
}

#[derive(Debug, Clone)]
pub struct BilbyServer {
    config: Arc<Config>,
    tool_router: ToolRouter<Self>,
}

impl BilbyServer {
    pub fn new(config: Config) -> Self {
        Self {
            config: Arc::new(config),
            tool_router: Self::tool_router(),
        }
    }

    fn split_options(&self, max_pages_per_chunk: Option<u32>, legacy_advance: bool) -> SplitOptions {
        let mut options = self.config.split_options();
        if let Some(max) = max_pages_per_chunk {
            options.max_pages_per_chunk = max;
        }
        if legacy_advance {
            options.policy = AdvancePolicy::Legacy;
        }
        options
    }
}

#[tool_router]
impl BilbyServer {
    #[tool(description = "Split a PDF into chunks of at most max_pages_per_chunk pages. Chunks are named '{stem}({start}-{end}).pdf' with 0-based, end-exclusive page ranges. A PDF that already fits is copied unchanged.")]
    fn pdf_split(&self, Parameters(req): Parameters<PdfSplitRequest>) -> String {
        let options = self.split_options(req.max_pages_per_chunk, req.legacy_advance);
        match split_pdf(&req.path, &req.output_dir, &options) {
            Ok(outcome) => {
                serde_json::to_string_pretty(&outcome).unwrap_or_else(|e| format!("Error: {}", e))
            }
            Err(e) => format!("Error: {}", e),
        }
    }

    #[tool(description = "Show the page ranges a PDF would be split into, without writing files")]
    fn pdf_plan(&self, Parameters(req): Parameters<PdfPlanRequest>) -> String {
        let options = self.split_options(req.max_pages_per_chunk, req.legacy_advance);
        let doc = match PdfDocument::open(&req.path) {
            Ok(d) => d,
            Err(e) => return format!("Error: {}", e),
        };
        match SplitPlan::new(doc.page_count(), &options) {
            Ok(plan) => {
                serde_json::to_string_pretty(&plan).unwrap_or_else(|e| format!("Error: {}", e))
            }
            Err(e) => format!("Error: {}", e),
        }
    }

    #[tool(description = "Extract the text of a PDF. Large PDFs are split and extracted chunk by chunk in page order.")]
    async fn pdf_extract_text(&self, Parameters(req): Parameters<PdfExtractTextRequest>) -> String {
        let extractor = match text_extractor(&self.config, req.local) {
            Ok(e) => e,
            Err(e) => return format!("Error: {:#}", e),
        };
        let path = Path::new(&req.path);
        let work_dir = match scratch_dir(&self.config, path) {
            Ok(d) => d,
            Err(e) => return format!("Error: {:#}", e),
        };

        let result = extract_pdf_text(
            extractor.as_ref(),
            path,
            work_dir.path(),
            self.config.split.max_pages_per_chunk,
        )
        .await;
        cleanup_scratch(&self.config, work_dir);

        match result {
            Ok(text) => {
                let result = TextResult { text };
                serde_json::to_string_pretty(&result).unwrap_or_else(|e| format!("Error: {}", e))
            }
            Err(e) => format!("Error: {:#}", e),
        }
    }

    #[tool(description = "Translate text into the target language with Google Translate")]
    async fn translate_text(&self, Parameters(req): Parameters<TranslateTextRequest>) -> String {
        let translator = match self.config.translate_client() {
            Ok(t) => t,
            Err(e) => return format!("Error: {:#}", e),
        };
        match translator.translate(&req.text, &req.target_language).await {
            Ok(text) => {
                let result = TextResult { text };
                serde_json::to_string_pretty(&result).unwrap_or_else(|e| format!("Error: {}", e))
            }
            Err(e) => format!("Error: {}", e),
        }
    }

    #[tool(description = "Summarize text with the configured LLM")]
    async fn summarize_text(&self, Parameters(req): Parameters<SummarizeTextRequest>) -> String {
        let summarizer = match self.config.summarizer(req.model.as_deref()) {
            Ok(s) => s,
            Err(e) => return format!("Error: {:#}", e),
        };
        match summarizer.summarize(&req.text).await {
            Ok(text) => {
                let result = TextResult { text };
                serde_json::to_string_pretty(&result).unwrap_or_else(|e| format!("Error: {}", e))
            }
            Err(e) => format!("Error: {}", e),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, schemars::JsonSchema)]
pub struct TextResult {
    pub text: String,
}

#[tool_handler]
impl ServerHandler for BilbyServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(
                "PDF chunking and document services. Use pdf_plan to preview how a PDF would be \
                 split, pdf_split to write the chunks, pdf_extract_text to get a PDF's text, and \
                 translate_text or summarize_text on the result."
                    .to_string(),
            ),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            ..Default::default()
        }
    }
}

pub async fn run_server(config: Config) -> Result<()> {
    let server = BilbyServer::new(config);
    info!("serving MCP over stdio");

    // Serve using stdin/stdout as a tuple
    let service = server.serve((tokio::io::stdin(), tokio::io::stdout())).await?;

    service.waiting().await?;

    Ok(())
}
