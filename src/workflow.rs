//! Split, extract, then translate or summarize.
//!
//! Online extraction services cap the pages per request, so larger PDFs are
//! split into a scratch directory first and the chunks are extracted one at a
//! time, in page order.

use crate::pdf::{split_document, AdvancePolicy, PdfDocument, SplitOptions, SplitPlan};
use crate::services::{Summarizer, TextExtractor, Translator, PDF_MIME_TYPE};
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use tracing::{debug, info};

/// A fresh scratch directory under `work_root` for one extraction of `source`.
///
/// The directory name is the source stem plus a random suffix, so concurrent
/// runs on different files with the same stem never share chunk files. It is
/// removed when the returned [`TempDir`] is dropped.
pub fn scratch_dir(work_root: &Path, source: &Path) -> Result<TempDir> {
    std::fs::create_dir_all(work_root)
        .with_context(|| format!("Failed to create directory: {}", work_root.display()))?;
    let stem = source
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("document");
    tempfile::Builder::new()
        .prefix(&format!("{stem}-"))
        .tempdir_in(work_root)
        .with_context(|| format!("Failed to create scratch directory in {}", work_root.display()))
}

pub async fn extract_pdf_text(
    extractor: &dyn TextExtractor,
    source: &Path,
    work_dir: &Path,
    max_pages_per_chunk: u32,
) -> Result<String> {
    let (total_pages, chunks) = stage_chunks(source, work_dir, max_pages_per_chunk)?;

    let Some(chunks) = chunks else {
        debug!(pages = total_pages, "sending document whole");
        return extractor
            .extract_text(source, PDF_MIME_TYPE)
            .await
            .with_context(|| format!("Failed to extract text from {}", source.display()));
    };

    let mut parts = Vec::with_capacity(chunks.len());
    for chunk in &chunks {
        let text = extractor
            .extract_text(chunk, PDF_MIME_TYPE)
            .await
            .with_context(|| format!("Failed to extract text from {}", chunk.display()))?;
        parts.push(text);
    }

    info!(
        source = %source.display(),
        pages = total_pages,
        chunks = parts.len(),
        "extracted text"
    );
    Ok(parts.join("\n"))
}

/// Page count, plus the chunk files in page order when the source had to be split.
fn stage_chunks(
    source: &Path,
    work_dir: &Path,
    max_pages_per_chunk: u32,
) -> Result<(u32, Option<Vec<PathBuf>>)> {
    // Skipping pages would silently drop text, so extraction always splits contiguously.
    let options = SplitOptions {
        max_pages_per_chunk,
        policy: AdvancePolicy::Contiguous,
    };
    let doc = PdfDocument::open(source)?;
    let total_pages = doc.page_count();
    if SplitPlan::new(total_pages, &options)?.is_passthrough() {
        return Ok((total_pages, None));
    }

    std::fs::create_dir_all(work_dir)
        .with_context(|| format!("Failed to create directory: {}", work_dir.display()))?;

    let outcome = split_document(&doc, work_dir, &options)?;
    let chunks = outcome.paths().into_iter().map(Path::to_path_buf).collect();
    Ok((total_pages, Some(chunks)))
}

/// Extract then translate. Long text is sent to the translator as is; the
/// Google client batches it under the request size limit.
pub async fn translate_pdf(
    extractor: &dyn TextExtractor,
    translator: &dyn Translator,
    source: &Path,
    work_dir: &Path,
    max_pages_per_chunk: u32,
    target_language: &str,
) -> Result<String> {
    let text = extract_pdf_text(extractor, source, work_dir, max_pages_per_chunk).await?;
    translator
        .translate(&text, target_language)
        .await
        .with_context(|| format!("Failed to translate text to {}", target_language))
}

pub async fn summarize_pdf(
    extractor: &dyn TextExtractor,
    summarizer: &dyn Summarizer,
    source: &Path,
    work_dir: &Path,
    max_pages_per_chunk: u32,
) -> Result<String> {
    let text = extract_pdf_text(extractor, source, work_dir, max_pages_per_chunk).await?;
    summarizer
        .summarize(&text)
        .await
        .context("Failed to summarize text")
}
