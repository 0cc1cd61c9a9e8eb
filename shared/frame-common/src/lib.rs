//! Frame Common Library
//!
//! Dataset-agnostic helpers shared by the happiness and catalog crates:
//! the grouped extremes extractor, flat-file (CSV) load/export and the
//! descriptive statistics used by the explorer dashboards.
//!
//! Everything here is a pure function of its inputs. Nothing logs, nothing
//! caches; memoization belongs to the calling layer.

pub mod csv_io;
pub mod error;
pub mod extremes;
pub mod stats;

pub use csv_io::{read_csv, write_csv, NULL_MARKERS};
pub use error::FrameError;
pub use extremes::{grouped_extremes, Direction, ExtremesRequest, DEFAULT_EXTREMES_N};
pub use stats::{
    correlation_matrix, filter_eq, mean, mode, n_unique, require_column, value_counts,
    CorrelationMatrix, ValueCount,
};

/// Result type alias for frame operations
pub type Result<T> = std::result::Result<T, FrameError>;
