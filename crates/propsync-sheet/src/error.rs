//! Tabular store errors.

use std::path::PathBuf;

use thiserror::Error;

/// Result alias for store operations.
pub type SheetResult<T> = Result<T, SheetError>;

/// Errors raised while loading or saving the workbook.
#[derive(Debug, Error)]
pub enum SheetError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV error in {path}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("collection '{0}' is missing from the workbook")]
    MissingCollection(String),
}

impl SheetError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn csv(path: impl Into<PathBuf>, source: csv::Error) -> Self {
        Self::Csv {
            path: path.into(),
            source,
        }
    }
}
