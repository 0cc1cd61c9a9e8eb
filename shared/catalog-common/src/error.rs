//! Error types for catalog cleaning

use frame_common::FrameError;
use polars::prelude::PolarsError;
use thiserror::Error;

/// Catalog errors
#[derive(Error, Debug)]
pub enum CatalogError {
    /// Shared dataframe helper error (missing column, unavailable source)
    #[error(transparent)]
    Frame(#[from] FrameError),

    /// Error raised by the dataframe engine
    #[error("Polars error: {0}")]
    Polars(#[from] PolarsError),
}
