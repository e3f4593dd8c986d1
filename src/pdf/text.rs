use crate::services::{ServiceError, TextExtractor, PDF_MIME_TYPE};
use async_trait::async_trait;
use std::path::Path;

/// Extract text from all pages of a PDF with `pdf-extract`.
pub fn extract_text<P: AsRef<Path>>(path: P) -> Result<String, ServiceError> {
    let path = path.as_ref();
    let bytes = std::fs::read(path).map_err(|source| ServiceError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    pdf_extract::extract_text_from_mem(&bytes).map_err(|e| ServiceError::Extract {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}

/// Offline [`TextExtractor`] for PDFs with an embedded text layer. Scanned
/// pages come back empty; use Document AI for those.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalTextExtractor;

#[async_trait]
impl TextExtractor for LocalTextExtractor {
    async fn extract_text(&self, path: &Path, mime_type: &str) -> Result<String, ServiceError> {
        if mime_type != PDF_MIME_TYPE {
            return Err(ServiceError::UnsupportedMimeType(mime_type.to_string()));
        }
        let path = path.to_path_buf();
        tokio::task::spawn_blocking(move || extract_text(&path)).await?
    }
}
