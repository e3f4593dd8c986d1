use crate::commands::{cleanup_scratch, emit, scratch_dir, text_extractor};
use anyhow::Result;
use bilby::config::Config;
use bilby::workflow::translate_pdf;
use std::path::Path;

pub async fn run(
    cfg: &Config,
    path: &Path,
    target: Option<&str>,
    local: bool,
    output: Option<&Path>,
) -> Result<()> {
    let target = target.unwrap_or(cfg.translate.target_language.as_str());
    let extractor = text_extractor(cfg, local)?;
    let translator = cfg.translate_client()?;
    let work_dir = scratch_dir(cfg, path)?;

    let result = translate_pdf(
        extractor.as_ref(),
        &translator,
        path,
        work_dir.path(),
        cfg.split.max_pages_per_chunk,
        target,
    )
    .await;
    cleanup_scratch(cfg, work_dir);

    emit(&result?, output)
}
