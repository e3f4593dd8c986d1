pub mod document;
pub mod error;
pub mod split;
pub mod text;

#[cfg(test)]
pub(crate) mod testing;

pub use document::PdfDocument;
pub use error::PdfError;
pub use split::{
    chunk_file_name, split_document, split_pdf, AdvancePolicy, ChunkFile, PageRange, SplitOptions,
    SplitOutcome, SplitPlan, DEFAULT_MAX_PAGES_PER_CHUNK,
};
