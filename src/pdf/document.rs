use crate::pdf::error::PdfError;
use crate::pdf::split::PageRange;
use lopdf::Document;
use std::path::{Path, PathBuf};

pub struct PdfDocument {
    pub doc: Document,
    pub path: PathBuf,
}

impl PdfDocument {
    /// Read the whole file into memory and parse it.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, PdfError> {
        let path = path.as_ref();
        let bytes = std::fs::read(path).map_err(|e| PdfError::io(path, e))?;
        let doc = Document::load_mem(&bytes).map_err(|source| PdfError::Format {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(PdfDocument {
            doc,
            path: path.to_path_buf(),
        })
    }

    pub fn page_count(&self) -> u32 {
        self.doc.get_pages().len() as u32
    }

    /// Copy the pages in `range` (0-based, end exclusive) into a standalone document.
    pub fn extract_range(&self, range: PageRange) -> Result<Document, PdfError> {
        let total = self.page_count();
        if range.is_empty() || range.end > total {
            return Err(PdfError::InvalidArgument(format!(
                "page range {} is out of bounds for a {}-page document",
                range, total
            )));
        }

        let mut new_doc = self.doc.clone();

        // lopdf numbers pages from 1
        let pages_to_delete: Vec<u32> = self
            .doc
            .get_pages()
            .keys()
            .copied()
            .filter(|num| !range.contains(num - 1))
            .collect();

        if !pages_to_delete.is_empty() {
            new_doc.delete_pages(&pages_to_delete);
            new_doc.prune_objects();
        }

        Ok(new_doc)
    }

    /// Serialize `doc` in memory, then write it to `path`.
    pub fn save<P: AsRef<Path>>(doc: &mut Document, path: P) -> Result<(), PdfError> {
        let path = path.as_ref();
        let mut bytes = Vec::new();
        doc.save_to(&mut bytes)
            .map_err(|e| PdfError::Serialize {
                path: path.to_path_buf(),
                message: e.to_string(),
            })?;
        std::fs::write(path, bytes).map_err(|e| PdfError::io(path, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pdf::testing::{page_tags, write_tagged_pdf};

    #[test]
    fn open_counts_pages() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_tagged_pdf(dir.path(), "report.pdf", 4);
        let doc = PdfDocument::open(&path).unwrap();
        assert_eq!(doc.page_count(), 4);
    }

    #[test]
    fn open_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = PdfDocument::open(dir.path().join("nope.pdf")).err().unwrap();
        assert!(matches!(err, PdfError::Io { .. }), "got {err:?}");
    }

    #[test]
    fn open_garbage_is_format_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.pdf");
        std::fs::write(&path, b"this is not a pdf").unwrap();
        let err = PdfDocument::open(&path).err().unwrap();
        assert!(matches!(err, PdfError::Format { .. }), "got {err:?}");
    }

    #[test]
    fn extract_range_keeps_pages_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_tagged_pdf(dir.path(), "report.pdf", 6);
        let doc = PdfDocument::open(&path).unwrap();

        let mut chunk = doc.extract_range(PageRange::new(2, 5)).unwrap();
        let out = dir.path().join("chunk.pdf");
        PdfDocument::save(&mut chunk, &out).unwrap();

        assert_eq!(page_tags(&out), vec![2, 3, 4]);
    }

    #[test]
    fn extract_range_rejects_out_of_bounds() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_tagged_pdf(dir.path(), "report.pdf", 3);
        let doc = PdfDocument::open(&path).unwrap();
        assert!(doc.extract_range(PageRange::new(1, 4)).is_err());
        assert!(doc.extract_range(PageRange::new(2, 2)).is_err());
    }
}
