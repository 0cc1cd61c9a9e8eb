//! Multi-year schema harmonization
//!
//! Two explicit phases:
//!
//! 1. [`build_region_lookup`] maps the authoritative region year and derives a
//!    [`RegionLookup`] from it.
//! 2. [`harmonize`] maps every year onto the canonical schema, stamps `Year`,
//!    backfills `Region` from the lookup it is handed for years without a
//!    native region column, and concatenates the years in source order.
//!
//! Any failure aborts the whole run. A partially harmonized multi-year table
//! is never returned.

use std::collections::BTreeSet;

use polars::prelude::*;
use serde::{Deserialize, Serialize};

use crate::error::HarmonizeError;
use crate::mapping::ColumnMapping;
use crate::region::RegionLookup;
use crate::schema::{canonical_column_names, year_dtype, CanonicalField, YEAR_COLUMN};
use crate::Result;

/// One yearly source table with its mapping
#[derive(Debug, Clone)]
pub struct YearSource {
    pub year: i32,
    pub table: DataFrame,
    pub mapping: ColumnMapping,
}

impl YearSource {
    pub fn new(year: i32, table: DataFrame, mapping: ColumnMapping) -> Self {
        Self {
            year,
            table,
            mapping,
        }
    }
}

/// Where a year's `Region` values came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RegionSource {
    /// The year's own region column
    Native,
    /// Filled from the lookup built on another year
    Backfilled { from_year: i32 },
}

/// Per-year outcome
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct YearSummary {
    pub year: i32,
    pub rows: usize,
    pub region: RegionSource,
    /// Rows of this year left without a region after backfill
    pub unmatched_region_rows: usize,
}

/// What a harmonization run produced
///
/// The core does not log. Callers decide whether unmatched regions deserve a
/// warning.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct HarmonizeReport {
    pub years: Vec<YearSummary>,
    pub total_rows: usize,
    pub unmatched_region_rows: usize,
    /// Distinct backfilled countries absent from the lookup, sorted
    pub unmatched_countries: Vec<String>,
}

/// Harmonized table plus its report
#[derive(Debug, Clone)]
pub struct Harmonized {
    pub table: DataFrame,
    pub report: HarmonizeReport,
}

/// Phase 1: build the region lookup from the authoritative year.
///
/// Returns `Ok(None)` when every source has its own region column. Fails with
/// [`HarmonizeError::RegionLookupUnavailable`] when a backfill is needed but
/// the authoritative year is missing or has no region column itself.
pub fn build_region_lookup(
    sources: &[YearSource],
    authoritative_year: i32,
) -> Result<Option<RegionLookup>> {
    let needing: Vec<i32> = sources
        .iter()
        .filter(|s| !s.mapping.has_region())
        .map(|s| s.year)
        .collect();
    if needing.is_empty() {
        return Ok(None);
    }

    let Some(authority) = sources.iter().find(|s| s.year == authoritative_year) else {
        return Err(HarmonizeError::RegionLookupUnavailable(format!(
            "authoritative region year {authoritative_year} is not among the sources, \
             but years {needing:?} need a region backfill"
        )));
    };
    if !authority.mapping.has_region() {
        return Err(HarmonizeError::RegionLookupUnavailable(format!(
            "authoritative region year {authoritative_year} has no region column"
        )));
    }

    let canonical = map_year(authority)?;
    Ok(Some(RegionLookup::from_canonical(
        authoritative_year,
        &canonical,
    )?))
}

/// Phase 2: map, backfill and concatenate every year.
///
/// `lookup` is required as soon as one source lacks a region column.
pub fn harmonize(sources: &[YearSource], lookup: Option<&RegionLookup>) -> Result<Harmonized> {
    let mut table: Option<DataFrame> = None;
    let mut report = HarmonizeReport::default();
    let mut unmatched_countries = BTreeSet::new();

    for source in sources {
        let mut canonical = map_year(source)?;

        let (region, unmatched_rows) = if source.mapping.has_region() {
            (RegionSource::Native, 0)
        } else {
            let lookup = lookup.ok_or_else(|| {
                HarmonizeError::RegionLookupUnavailable(format!(
                    "year {} needs a region backfill but no lookup was supplied",
                    source.year
                ))
            })?;
            let countries = canonical.column(CanonicalField::Country.column_name())?;
            let regions = lookup.backfill(countries)?;

            let mut unmatched_rows = 0;
            for (country, region) in countries.str()?.into_iter().zip(regions.str()?.into_iter()) {
                if region.is_none() {
                    unmatched_rows += 1;
                    if let Some(country) = country {
                        unmatched_countries.insert(country.to_string());
                    }
                }
            }

            canonical.with_column(regions)?;
            (
                RegionSource::Backfilled {
                    from_year: lookup.source_year(),
                },
                unmatched_rows,
            )
        };

        report.years.push(YearSummary {
            year: source.year,
            rows: canonical.height(),
            region,
            unmatched_region_rows: unmatched_rows,
        });
        report.total_rows += canonical.height();
        report.unmatched_region_rows += unmatched_rows;

        match table.as_mut() {
            Some(acc) => {
                acc.vstack_mut(&canonical)?;
            }
            None => table = Some(canonical),
        }
    }

    let mut table = match table {
        Some(table) => table,
        None => empty_canonical_table()?,
    };
    table.align_chunks();
    report.unmatched_countries = unmatched_countries.into_iter().collect();

    Ok(Harmonized { table, report })
}

/// Run both phases with the given authoritative region year.
pub fn harmonize_with_authority(
    sources: &[YearSource],
    authoritative_year: i32,
) -> Result<Harmonized> {
    let lookup = build_region_lookup(sources, authoritative_year)?;
    harmonize(sources, lookup.as_ref())
}

/// Select, rename and cast one year onto the canonical schema and stamp its
/// year. Without a native region the `Region` column is all null.
pub fn map_year(source: &YearSource) -> Result<DataFrame> {
    let year = source.year;
    source.mapping.validate(year)?;

    let available = source.table.get_column_names();
    if let Some(missing) = source
        .mapping
        .entries()
        .iter()
        .find(|e| !available.contains(&e.source.as_str()))
    {
        return Err(HarmonizeError::SchemaMapping {
            year,
            field: missing.source.clone(),
        });
    }

    let height = source.table.height();
    let mut columns = Vec::with_capacity(CanonicalField::ALL.len() + 1);
    for field in CanonicalField::ALL {
        let mut series = match source.mapping.source_for(field) {
            Some(name) => {
                let dtype = field.dtype();
                source
                    .table
                    .column(name)?
                    .strict_cast(&dtype)
                    .map_err(|_| HarmonizeError::ColumnType {
                        year,
                        field: name.to_string(),
                        expected: dtype.to_string(),
                    })?
            }
            None => Series::full_null(field.column_name(), height, &field.dtype()),
        };
        series.rename(field.column_name());
        columns.push(series);
    }
    columns.push(Series::new(YEAR_COLUMN, vec![year; height]));

    Ok(DataFrame::new(columns)?)
}

fn empty_canonical_table() -> Result<DataFrame> {
    let mut columns: Vec<Series> = CanonicalField::ALL
        .iter()
        .map(|f| Series::new_empty(f.column_name(), &f.dtype()))
        .collect();
    columns.push(Series::new_empty(YEAR_COLUMN, &year_dtype()));
    let df = DataFrame::new(columns)?;
    debug_assert_eq!(df.get_column_names(), canonical_column_names());
    Ok(df)
}
