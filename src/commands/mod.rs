pub mod extract_text;
pub mod plan;
pub mod split;
pub mod summarize;
pub mod translate;

use anyhow::{Context, Result};
use bilby::config::Config;
use bilby::pdf::text::LocalTextExtractor;
use bilby::services::TextExtractor;
use bilby::workflow;
use std::path::Path;
use tempfile::TempDir;
use tracing::{info, warn};

/// Pick the extraction backend: `pdf-extract` when `local`, Document AI otherwise.
pub fn text_extractor(cfg: &Config, local: bool) -> Result<Box<dyn TextExtractor>> {
    if local {
        Ok(Box::new(LocalTextExtractor))
    } else {
        Ok(Box::new(cfg.document_ai_client()?))
    }
}

/// Unique scratch directory under `split.work_dir` for one extraction of `source`.
pub fn scratch_dir(cfg: &Config, source: &Path) -> Result<TempDir> {
    workflow::scratch_dir(Path::new(&cfg.split.work_dir), source)
}

pub fn cleanup_scratch(cfg: &Config, dir: TempDir) {
    if cfg.split.keep_chunks {
        let kept = dir.keep();
        info!(dir = %kept.display(), "kept chunk files");
        return;
    }
    let path = dir.path().to_path_buf();
    if let Err(e) = dir.close() {
        warn!(dir = %path.display(), error = %e, "failed to remove scratch directory");
    }
}

/// Write `text` to `output` if given, else print it.
pub fn emit(text: &str, output: Option<&Path>) -> Result<()> {
    match output {
        Some(path) => std::fs::write(path, text)
            .with_context(|| format!("Failed to write {}", path.display())),
        None => {
            println!("{}", text);
            Ok(())
        }
    }
}
