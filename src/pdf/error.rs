use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while loading, planning, or writing PDF chunks.
#[derive(Debug, Error)]
pub enum PdfError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse PDF {path}: {source}")]
    Format {
        path: PathBuf,
        #[source]
        source: lopdf::Error,
    },

    #[error("failed to serialize PDF {path}: {message}")]
    Serialize { path: PathBuf, message: String },
}

impl PdfError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        PdfError::Io {
            path: path.into(),
            source,
        }
    }
}
