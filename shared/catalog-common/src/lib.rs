//! Catalog Common Library
//!
//! Cleaning pipeline and dashboard KPIs for the streaming media catalog.
//!
//! - [`cleaning`]: raw export to analysis-ready table
//! - [`insights`]: KPIs and country rankings over the cleaned table

pub mod cleaning;
pub mod error;
pub mod insights;

pub use cleaning::{
    clean_catalog, CleanedCatalog, CleaningReport, CLEANED_CATALOG_FILE, CLEANED_COLUMNS,
    MOVIE, RAW_CATALOG_FILE, TV_SHOW,
};
pub use error::CatalogError;
pub use insights::{catalog_correlations, catalog_kpis, top_countries, CatalogKpis, TitleFilter};

/// Result type alias for catalog operations
pub type Result<T> = std::result::Result<T, CatalogError>;
