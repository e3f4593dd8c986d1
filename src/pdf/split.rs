//! Partition a PDF into chunks of at most `max_pages_per_chunk` pages.
//!
//! Chunks are written next to each other in an output directory and named
//! after the page range they hold, e.g. `report(0-15).pdf`, `report(15-30).pdf`.
//! Ranges are 0-based with an exclusive end.
//!
//! A split is not transactional: if writing a chunk fails, the chunks written
//! before it stay on disk.

use crate::pdf::document::PdfDocument;
use crate::pdf::error::PdfError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Online Document AI requests accept at most 15 pages.
pub const DEFAULT_MAX_PAGES_PER_CHUNK: u32 = 15;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRange {
    pub start: u32,
    pub end: u32,
}

impl PageRange {
    pub fn new(start: u32, end: u32) -> Self {
        PageRange { start, end }
    }

    pub fn len(&self) -> u32 {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn contains(&self, index: u32) -> bool {
        self.start <= index && index < self.end
    }
}

impl fmt::Display for PageRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {})", self.start, self.end)
    }
}

/// How the next chunk's start is derived from the previous chunk's end.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdvancePolicy {
    /// Next chunk starts where the previous one ended; every page is kept.
    #[default]
    Contiguous,
    /// Next chunk starts one past the previous end, dropping the page at each
    /// boundary. Only useful to reproduce file names from older runs.
    Legacy,
}

impl AdvancePolicy {
    fn next_start(self, end: u32) -> u32 {
        match self {
            AdvancePolicy::Contiguous => end,
            AdvancePolicy::Legacy => end.saturating_add(1),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SplitOptions {
    pub max_pages_per_chunk: u32,
    pub policy: AdvancePolicy,
}

impl Default for SplitOptions {
    fn default() -> Self {
        SplitOptions {
            max_pages_per_chunk: DEFAULT_MAX_PAGES_PER_CHUNK,
            policy: AdvancePolicy::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SplitPlan {
    pub total_pages: u32,
    pub max_pages_per_chunk: u32,
    pub policy: AdvancePolicy,
    pub chunks: Vec<PageRange>,
}

impl SplitPlan {
    pub fn new(total_pages: u32, options: &SplitOptions) -> Result<Self, PdfError> {
        let max = options.max_pages_per_chunk;
        if max == 0 {
            return Err(PdfError::InvalidArgument(
                "max_pages_per_chunk must be at least 1".to_string(),
            ));
        }
        if total_pages == 0 {
            return Err(PdfError::InvalidArgument(
                "document has no pages".to_string(),
            ));
        }

        let mut chunks = Vec::new();
        let mut start = 0u32;
        while start < total_pages {
            let end = start.saturating_add(max).min(total_pages);
            chunks.push(PageRange::new(start, end));
            start = options.policy.next_start(end);
        }

        Ok(SplitPlan {
            total_pages,
            max_pages_per_chunk: max,
            policy: options.policy,
            chunks,
        })
    }

    /// The document fits in one chunk and is copied rather than rewritten.
    pub fn is_passthrough(&self) -> bool {
        self.total_pages <= self.max_pages_per_chunk
    }

    pub fn pages_covered(&self) -> u32 {
        self.chunks.iter().map(PageRange::len).sum()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChunkFile {
    pub range: PageRange,
    pub path: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SplitOutcome {
    /// The source already fit and was copied unchanged.
    Copied { path: PathBuf },
    Split { chunks: Vec<ChunkFile> },
}

impl SplitOutcome {
    /// Written files in page order.
    pub fn paths(&self) -> Vec<&Path> {
        match self {
            SplitOutcome::Copied { path } => vec![path.as_path()],
            SplitOutcome::Split { chunks } => chunks.iter().map(|c| c.path.as_path()).collect(),
        }
    }
}

/// `{stem}({start}-{end}).{ext}`, or without the extension if the source had none.
pub fn chunk_file_name(stem: &str, extension: Option<&str>, range: PageRange) -> String {
    match extension {
        Some(ext) => format!("{}({}-{}).{}", stem, range.start, range.end, ext),
        None => format!("{}({}-{})", stem, range.start, range.end),
    }
}

pub fn split_pdf<P: AsRef<Path>, Q: AsRef<Path>>(
    source: P,
    output_dir: Q,
    options: &SplitOptions,
) -> Result<SplitOutcome, PdfError> {
    // Reject a zero chunk size before reading anything.
    if options.max_pages_per_chunk == 0 {
        return Err(PdfError::InvalidArgument(
            "max_pages_per_chunk must be at least 1".to_string(),
        ));
    }

    let doc = PdfDocument::open(source)?;
    split_document(&doc, output_dir, options)
}

/// Split an already loaded document; see [`split_pdf`].
pub fn split_document<Q: AsRef<Path>>(
    doc: &PdfDocument,
    output_dir: Q,
    options: &SplitOptions,
) -> Result<SplitOutcome, PdfError> {
    let output_dir = output_dir.as_ref();
    if !output_dir.is_dir() {
        return Err(PdfError::InvalidArgument(format!(
            "output directory does not exist: {}",
            output_dir.display()
        )));
    }

    let source = doc.path.as_path();
    let file_name = source.file_name().ok_or_else(|| {
        PdfError::InvalidArgument(format!("source has no file name: {}", source.display()))
    })?;

    let plan = SplitPlan::new(doc.page_count(), options)?;

    if plan.is_passthrough() {
        let dest = output_dir.join(file_name);
        if is_same_file(source, &dest) {
            debug!(path = %dest.display(), "source already in output directory");
        } else {
            std::fs::copy(source, &dest).map_err(|e| PdfError::io(&dest, e))?;
        }
        info!(
            pages = plan.total_pages,
            dest = %dest.display(),
            "document fits in one chunk, copied unchanged"
        );
        return Ok(SplitOutcome::Copied { path: dest });
    }

    let stem = source
        .file_stem()
        .and_then(|s| s.to_str())
        .ok_or_else(|| {
            PdfError::InvalidArgument(format!("source has no usable stem: {}", source.display()))
        })?;
    let extension = source.extension().and_then(|s| s.to_str());

    let mut chunks = Vec::with_capacity(plan.chunks.len());
    for &range in &plan.chunks {
        let path = output_dir.join(chunk_file_name(stem, extension, range));
        let mut chunk = doc.extract_range(range)?;
        PdfDocument::save(&mut chunk, &path)?;
        debug!(%range, path = %path.display(), "wrote chunk");
        chunks.push(ChunkFile { range, path });
    }

    info!(
        source = %source.display(),
        pages = plan.total_pages,
        chunks = chunks.len(),
        "split document"
    );

    Ok(SplitOutcome::Split { chunks })
}

fn is_same_file(a: &Path, b: &Path) -> bool {
    match (a.canonicalize(), b.canonicalize()) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}
