use crate::commands::{cleanup_scratch, emit, scratch_dir, text_extractor};
use anyhow::Result;
use bilby::config::Config;
use bilby::workflow::summarize_pdf;
use std::path::Path;

pub async fn run(
    cfg: &Config,
    path: &Path,
    model: Option<&str>,
    local: bool,
    output: Option<&Path>,
) -> Result<()> {
    let extractor = text_extractor(cfg, local)?;
    let summarizer = cfg.summarizer(model)?;
    let work_dir = scratch_dir(cfg, path)?;

    let result = summarize_pdf(
        extractor.as_ref(),
        &summarizer,
        path,
        work_dir.path(),
        cfg.split.max_pages_per_chunk,
    )
    .await;
    cleanup_scratch(cfg, work_dir);

    emit(&result?, output)
}
