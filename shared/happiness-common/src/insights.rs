//! Dashboard KPIs over the harmonized table

use std::collections::BTreeSet;

use frame_common::{correlation_matrix, filter_eq, mean, n_unique, require_column, CorrelationMatrix};
use polars::prelude::*;
use serde::{Deserialize, Serialize};

use crate::schema::{numeric_measure_columns, CanonicalField, YEAR_COLUMN};
use crate::Result;

/// Headline indicators for one year
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YearKpis {
    pub year: i32,
    pub avg_score: Option<f64>,
    pub avg_gdp_per_capita: Option<f64>,
    pub avg_health_life_expectancy: Option<f64>,
    pub country_count: usize,
}

/// Distinct years present, ascending.
pub fn available_years(df: &DataFrame) -> Result<Vec<i32>> {
    let years = require_column(df, YEAR_COLUMN)?.cast(&DataType::Int32)?;
    let distinct: BTreeSet<i32> = years.i32()?.into_iter().flatten().collect();
    Ok(distinct.into_iter().collect())
}

pub fn year_kpis(df: &DataFrame, year: i32) -> Result<YearKpis> {
    let rows = filter_eq(df, YEAR_COLUMN, year)?;
    Ok(YearKpis {
        year,
        avg_score: mean(&rows, CanonicalField::Score.column_name())?,
        avg_gdp_per_capita: mean(&rows, CanonicalField::GdpPerCapita.column_name())?,
        avg_health_life_expectancy: mean(
            &rows,
            CanonicalField::HealthLifeExpectancy.column_name(),
        )?,
        country_count: n_unique(&rows, CanonicalField::Country.column_name())?,
    })
}

/// Correlation between the score and the six indicators, all years pooled.
pub fn indicator_correlations(df: &DataFrame) -> Result<CorrelationMatrix> {
    Ok(correlation_matrix(df, &numeric_measure_columns())?)
}
