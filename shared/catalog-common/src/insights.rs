//! Dashboard KPIs over the cleaned catalog

use frame_common::{
    correlation_matrix, filter_eq, mean, mode, value_counts, CorrelationMatrix, ValueCount,
};
use polars::prelude::*;
use serde::{Deserialize, Serialize};

use crate::cleaning::{MOVIE, TV_SHOW};
use crate::Result;

const NUMERIC_COLUMNS: [&str; 7] = [
    "release_year",
    "year_added",
    "month_added",
    "added_day_of_week",
    "lag_time",
    "duration_min",
    "duration_seasons",
];

/// Which titles a KPI covers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TitleFilter {
    #[default]
    All,
    Movies,
    TvShows,
}

impl TitleFilter {
    fn apply(self, df: &DataFrame) -> Result<DataFrame> {
        let rows = match self {
            TitleFilter::All => df.clone(),
            TitleFilter::Movies => filter_eq(df, "type", MOVIE)?,
            TitleFilter::TvShows => filter_eq(df, "type", TV_SHOW)?,
        };
        Ok(rows)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogKpis {
    pub filter: TitleFilter,
    pub total_titles: usize,
    /// Mean years between release and addition to the catalog
    pub avg_lag_time: Option<f64>,
    /// Most frequent `main_country`
    pub top_country: Option<String>,
}

pub fn catalog_kpis(df: &DataFrame, filter: TitleFilter) -> Result<CatalogKpis> {
    let rows = filter.apply(df)?;
    Ok(CatalogKpis {
        filter,
        total_titles: rows.height(),
        avg_lag_time: mean(&rows, "lag_time")?,
        top_country: mode(&rows, "main_country")?,
    })
}

/// Countries with the most titles, most frequent first.
pub fn top_countries(df: &DataFrame, filter: TitleFilter, limit: usize) -> Result<Vec<ValueCount>> {
    let rows = filter.apply(df)?;
    Ok(value_counts(&rows, "main_country", Some(limit))?)
}

/// Correlation between the numeric columns of the cleaned table.
pub fn catalog_correlations(df: &DataFrame) -> Result<CorrelationMatrix> {
    Ok(correlation_matrix(df, &NUMERIC_COLUMNS)?)
}
