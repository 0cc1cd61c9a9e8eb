//! Loaded datasets plus memoized dashboard queries

use std::fmt;
use std::sync::Arc;

use anyhow::{anyhow, Context, Result};
use catalog_common::{CatalogKpis, TitleFilter};
use frame_common::{grouped_extremes, CorrelationMatrix, ExtremesRequest, ValueCount};
use happiness_common::YearKpis;
use polars::prelude::DataFrame;
use serde::{Deserialize, Serialize};

use crate::cache::{CacheStats, ExtremesCache};

/// Datasets the explorer can hold
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Dataset {
    /// Harmonized well-being table
    Happiness,
    /// Cleaned media catalog
    Catalog,
}

impl fmt::Display for Dataset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Dataset::Happiness => write!(f, "happiness"),
            Dataset::Catalog => write!(f, "catalog"),
        }
    }
}

/// Read-only view over the loaded tables
///
/// Tables are shared behind `Arc`, so cloning the explorer or handing tables
/// to other threads never copies data.
#[derive(Debug, Default)]
pub struct Explorer {
    happiness: Option<Arc<DataFrame>>,
    catalog: Option<Arc<DataFrame>>,
    cache: ExtremesCache,
}

impl Explorer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_happiness(mut self, table: DataFrame) -> Self {
        self.set(Dataset::Happiness, table);
        self
    }

    pub fn with_catalog(mut self, table: DataFrame) -> Self {
        self.set(Dataset::Catalog, table);
        self
    }

    /// Replace a dataset, dropping memoized views derived from the old one.
    pub fn set(&mut self, dataset: Dataset, table: DataFrame) {
        let table = Some(Arc::new(table));
        match dataset {
            Dataset::Happiness => self.happiness = table,
            Dataset::Catalog => self.catalog = table,
        }
        self.cache.invalidate(dataset);
    }

    pub fn table(&self, dataset: Dataset) -> Result<Arc<DataFrame>> {
        let table = match dataset {
            Dataset::Happiness => &self.happiness,
            Dataset::Catalog => &self.catalog,
        };
        table
            .clone()
            .ok_or_else(|| anyhow!("{dataset} dataset is not loaded"))
    }

    /// Top/bottom-N rows per group, memoized per `(dataset, request)`.
    pub fn extremes(&self, dataset: Dataset, request: &ExtremesRequest) -> Result<Arc<DataFrame>> {
        let table = self.table(dataset)?;
        self.cache
            .get_or_compute(dataset, request, || grouped_extremes(&table, request))
            .with_context(|| {
                format!(
                    "extremes of {} by {} on {dataset}",
                    request.rank_by, request.group_by
                )
            })
    }

    pub fn happiness_years(&self) -> Result<Vec<i32>> {
        Ok(happiness_common::available_years(
            &*self.table(Dataset::Happiness)?,
        )?)
    }

    pub fn happiness_kpis(&self, year: i32) -> Result<YearKpis> {
        Ok(happiness_common::year_kpis(
            &*self.table(Dataset::Happiness)?,
            year,
        )?)
    }

    pub fn indicator_correlations(&self) -> Result<CorrelationMatrix> {
        Ok(happiness_common::indicator_correlations(
            &*self.table(Dataset::Happiness)?,
        )?)
    }

    pub fn catalog_kpis(&self, filter: TitleFilter) -> Result<CatalogKpis> {
        Ok(catalog_common::catalog_kpis(
            &*self.table(Dataset::Catalog)?,
            filter,
        )?)
    }

    pub fn top_countries(&self, filter: TitleFilter, limit: usize) -> Result<Vec<ValueCount>> {
        Ok(catalog_common::top_countries(
            &*self.table(Dataset::Catalog)?,
            filter,
            limit,
        )?)
    }

    pub fn catalog_correlations(&self) -> Result<CorrelationMatrix> {
        Ok(catalog_common::catalog_correlations(
            &*self.table(Dataset::Catalog)?,
        )?)
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }
}
