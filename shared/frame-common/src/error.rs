//! Error types for dataframe operations

use std::path::PathBuf;

use polars::prelude::PolarsError;
use thiserror::Error;

/// Dataframe operation errors
#[derive(Error, Debug)]
pub enum FrameError {
    /// A referenced column does not exist in the table
    #[error("Column not found: {0}")]
    ColumnNotFound(String),

    /// Caller supplied an argument the operation cannot honour
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// A flat-file source is missing or unreadable
    #[error("Source unavailable: {path}: {reason}")]
    SourceUnavailable { path: PathBuf, reason: String },

    /// Filesystem error while exporting
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Error raised by the dataframe engine
    #[error("Polars error: {0}")]
    Polars(#[from] PolarsError),
}

impl FrameError {
    pub fn source_unavailable(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        FrameError::SourceUnavailable {
            path: path.into(),
            reason: reason.to_string(),
        }
    }
}
