use crate::commands::{cleanup_scratch, emit, scratch_dir, text_extractor};
use anyhow::Result;
use bilby::config::Config;
use bilby::workflow::extract_pdf_text;
use std::path::Path;

pub async fn run(cfg: &Config, path: &Path, local: bool, output: Option<&Path>) -> Result<()> {
    let extractor = text_extractor(cfg, local)?;
    let work_dir = scratch_dir(cfg, path)?;

    let result = extract_pdf_text(
        extractor.as_ref(),
        path,
        work_dir.path(),
        cfg.split.max_pages_per_chunk,
    )
    .await;
    cleanup_scratch(cfg, work_dir);

    emit(&result?, output)
}
