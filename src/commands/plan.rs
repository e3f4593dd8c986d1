use anyhow::Result;
use bilby::pdf::{chunk_file_name, PdfDocument, SplitOptions, SplitPlan};
use serde::Serialize;
use std::path::Path;

#[derive(Serialize)]
struct PlannedChunk {
    start: u32,
    end: u32,
    pages: u32,
    file_name: String,
}

/// Print the split plan for `path` as JSON without writing anything.
pub fn run<P: AsRef<Path>>(path: P, options: &SplitOptions) -> Result<()> {
    let path = path.as_ref();
    let doc = PdfDocument::open(path)?;
    let plan = SplitPlan::new(doc.page_count(), options)?;

    let stem = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("document");
    let extension = path.extension().and_then(|s| s.to_str());

    let chunks: Vec<PlannedChunk> = if plan.is_passthrough() {
        Vec::new()
    } else {
        plan.chunks
            .iter()
            .map(|&range| PlannedChunk {
                start: range.start,
                end: range.end,
                pages: range.len(),
                file_name: chunk_file_name(stem, extension, range),
            })
            .collect()
    };

    println!(
        "{}",
        serde_json::to_string_pretty(&serde_json::json!({
            "input": path,
            "total_pages": plan.total_pages,
            "max_pages_per_chunk": plan.max_pages_per_chunk,
            "policy": plan.policy,
            "copied_unchanged": plan.is_passthrough(),
            "pages_covered": plan.pages_covered(),
            "chunks": chunks,
        }))?
    );

    Ok(())
}
