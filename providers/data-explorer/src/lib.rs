//! Data Explorer
//!
//! Calling layer over the dataset crates. Owns what they deliberately leave
//! out: configuration, logging, memoization of repeated extremes queries and
//! the two batch pipelines (harmonize + export, clean + export).

pub mod cache;
pub mod config;
pub mod explorer;
pub mod pipeline;

pub use cache::{CacheStats, ExtremesCache};
pub use config::ExplorerConfig;
pub use explorer::{Dataset, Explorer};
pub use pipeline::{
    run_catalog_cleaning, run_harmonization, summarize, CatalogRun, HappinessRun, RunSummary,
};
