//! Error types for Magasin exports

use std::path::PathBuf;

/// Export errors
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    /// Output file or directory unwritable
    #[error("io error on {path}: {source}")]
    Io {
        /// File involved
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// CSV writer failure
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    /// Workbook could not be built or written
    #[error("xlsx error: {0}")]
    Xlsx(String),

    /// JSON encoding failure
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ExportError {
    /// Create IO error for path
    pub fn io_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Result alias for export operations
pub type Result<T, E = ExportError> = std::result::Result<T, E>;
