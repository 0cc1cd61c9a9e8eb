//! Happiness Common Library
//!
//! Reconciles the yearly World Happiness Report tables, whose column names
//! and column sets drift from year to year, into one canonical table:
//!
//! - [`schema`]: canonical columns and types
//! - [`mapping`]: per-year `source -> canonical` column mappings
//! - [`region`]: the country to region lookup used for backfill
//! - [`harmonizer`]: the two-phase harmonization pipeline
//! - [`plan`]: file-based plans, the built-in 2015–2019 plan, CSV reload
//! - [`insights`]: dashboard KPIs over the harmonized table

pub mod error;
pub mod harmonizer;
pub mod insights;
pub mod mapping;
pub mod plan;
pub mod region;
pub mod schema;

pub use error::HarmonizeError;
pub use harmonizer::{
    build_region_lookup, harmonize, harmonize_with_authority, map_year, HarmonizeReport,
    Harmonized, RegionSource, YearSource, YearSummary,
};
pub use insights::{available_years, indicator_correlations, year_kpis, YearKpis};
pub use mapping::{ColumnMapping, FieldMapping};
pub use plan::{
    load_year_sources, read_normalized_csv, HarmonizePlan, YearPlan, COMBINED_FILE_NAME,
};
pub use region::RegionLookup;
pub use schema::{canonical_column_names, numeric_measure_columns, CanonicalField, YEAR_COLUMN};

/// Result type alias for harmonization operations
pub type Result<T> = std::result::Result<T, HarmonizeError>;
