//! Error types for schema harmonization

use frame_common::FrameError;
use polars::prelude::PolarsError;
use thiserror::Error;

/// Harmonization errors
///
/// Every variant is fatal for the whole run: no partially harmonized table is
/// ever returned alongside one of these.
#[derive(Error, Debug)]
pub enum HarmonizeError {
    /// A mapping references a column the year's table does not have
    #[error("Schema mapping error: year {year} has no column '{field}'")]
    SchemaMapping { year: i32, field: String },

    /// Backfill is needed but the authoritative region year cannot provide it
    #[error("Region lookup unavailable: {0}")]
    RegionLookupUnavailable(String),

    /// A yearly source file is missing or unreadable
    #[error("Source unavailable for year {year}: {reason}")]
    SourceUnavailable { year: i32, reason: String },

    /// A column mapping does not describe the canonical schema
    #[error("Invalid mapping for year {year}: {reason}")]
    InvalidMapping { year: i32, reason: String },

    /// A mapped column cannot be converted to its canonical type
    #[error("Column type error: year {year} column '{field}' cannot be read as {expected}")]
    ColumnType {
        year: i32,
        field: String,
        expected: String,
    },

    /// Harmonization plan could not be parsed
    #[error("Plan error: {0}")]
    PlanError(String),

    /// Shared dataframe helper error
    #[error(transparent)]
    Frame(#[from] FrameError),

    /// Error raised by the dataframe engine
    #[error("Polars error: {0}")]
    Polars(#[from] PolarsError),
}

impl From<serde_json::Error> for HarmonizeError {
    fn from(err: serde_json::Error) -> Self {
        HarmonizeError::PlanError(err.to_string())
    }
}
