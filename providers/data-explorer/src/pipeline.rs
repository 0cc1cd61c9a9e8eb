//! Batch pipelines and the run summary
//!
//! `run_harmonization` and `run_catalog_cleaning` share nothing and are safe
//! to run on separate threads.

use std::path::PathBuf;

use anyhow::{Context, Result};
use catalog_common::{
    clean_catalog, CatalogKpis, CleaningReport, TitleFilter, CLEANED_CATALOG_FILE,
};
use frame_common::{read_csv, write_csv, CorrelationMatrix, ExtremesRequest, ValueCount};
use happiness_common::{
    build_region_lookup, harmonize, load_year_sources, CanonicalField, HarmonizePlan,
    HarmonizeReport, RegionSource, YearKpis, COMBINED_FILE_NAME, YEAR_COLUMN,
};
use polars::prelude::{DataFrame, DataType};
use serde::Serialize;
use tracing::{info, warn};

use crate::cache::CacheStats;
use crate::config::ExplorerConfig;
use crate::explorer::{Dataset, Explorer};

/// Output of the happiness pipeline
#[derive(Debug, Clone)]
pub struct HappinessRun {
    pub table: DataFrame,
    pub report: HarmonizeReport,
    pub exported_to: Option<PathBuf>,
}

/// Output of the catalog pipeline
#[derive(Debug, Clone)]
pub struct CatalogRun {
    pub table: DataFrame,
    pub report: CleaningReport,
    pub exported_to: Option<PathBuf>,
}

fn load_plan(config: &ExplorerConfig) -> Result<HarmonizePlan> {
    let plan = match &config.plan_path {
        Some(path) => HarmonizePlan::from_json_file(path)
            .with_context(|| format!("Failed to load plan {}", path.display()))?,
        None => HarmonizePlan::world_happiness(),
    };
    Ok(match config.authoritative_region_year {
        Some(year) => plan.with_authoritative_region_year(year),
        None => plan,
    })
}

fn log_report(report: &HarmonizeReport) {
    for year in &report.years {
        match year.region {
            RegionSource::Native => info!("{}: {} rows, native regions", year.year, year.rows),
            RegionSource::Backfilled { from_year } => info!(
                "{}: {} rows, regions backfilled from {} ({} unmatched)",
                year.year, year.rows, from_year, year.unmatched_region_rows
            ),
        }
    }
    info!("Harmonized {} rows", report.total_rows);
    if report.unmatched_region_rows > 0 {
        warn!(
            "{} rows left without a region; countries missing from the lookup: {}",
            report.unmatched_region_rows,
            report.unmatched_countries.join(", ")
        );
    }
}

/// Load the yearly files, harmonize them and export the combined table.
pub fn run_harmonization(config: &ExplorerConfig) -> Result<HappinessRun> {
    let plan = load_plan(config)?;
    info!(
        "Harmonizing {} yearly files from {} (region authority: {})",
        plan.years.len(),
        config.data_dir.display(),
        plan.authoritative_region_year
    );

    let sources = load_year_sources(&config.data_dir, &plan)
        .context("Failed to load yearly sources")?;
    let lookup = build_region_lookup(&sources, plan.authoritative_region_year)
        .context("Failed to build region lookup")?;
    if let Some(lookup) = &lookup {
        info!(
            "Region lookup: {} countries from {}",
            lookup.len(),
            lookup.source_year()
        );
    }
    let mut harmonized = harmonize(&sources, lookup.as_ref()).context("Harmonization failed")?;
    log_report(&harmonized.report);

    let exported_to = if config.export {
        let path = config.output_dir.join(COMBINED_FILE_NAME);
        write_csv(&mut harmonized.table, &path)
            .with_context(|| format!("Failed to export {}", path.display()))?;
        info!("Exported harmonized table to {}", path.display());
        Some(path)
    } else {
        None
    };

    Ok(HappinessRun {
        table: harmonized.table,
        report: harmonized.report,
        exported_to,
    })
}

/// Load the raw catalog, clean it and export the cleaned table.
pub fn run_catalog_cleaning(config: &ExplorerConfig) -> Result<CatalogRun> {
    let path = config.catalog_path();
    info!("Cleaning catalog {}", path.display());

    let raw = read_csv(&path).context("Failed to load catalog")?;
    let mut cleaned = clean_catalog(&raw).context("Catalog cleaning failed")?;
    let report = cleaned.report;
    info!("Cleaned {} catalog titles", report.rows);
    if report.unparsed_dates > 0 || report.unparsed_durations > 0 {
        warn!(
            "{} dates and {} durations could not be parsed",
            report.unparsed_dates, report.unparsed_durations
        );
    }

    let exported_to = if config.export {
        let out = config.output_dir.join(CLEANED_CATALOG_FILE);
        write_csv(&mut cleaned.table, &out)
            .with_context(|| format!("Failed to export {}", out.display()))?;
        info!("Exported cleaned catalog to {}", out.display());
        Some(out)
    } else {
        None
    };

    Ok(CatalogRun {
        table: cleaned.table,
        report,
        exported_to,
    })
}

/// One row of a top/bottom view
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedCountry {
    pub year: i32,
    pub country: String,
    pub score: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct HappinessSummary {
    pub report: HarmonizeReport,
    pub exported_to: Option<PathBuf>,
    pub kpis: Vec<YearKpis>,
    pub top: Vec<RankedCountry>,
    pub bottom: Vec<RankedCountry>,
    /// Score and indicators, all years pooled
    pub correlations: CorrelationMatrix,
}

#[derive(Debug, Clone, Serialize)]
pub struct CatalogSummary {
    pub report: CleaningReport,
    pub exported_to: Option<PathBuf>,
    pub kpis: Vec<CatalogKpis>,
    pub top_countries: Vec<ValueCount>,
    pub correlations: CorrelationMatrix,
}

/// JSON document printed at the end of a run
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub happiness: HappinessSummary,
    pub catalog: CatalogSummary,
    pub cache: CacheStats,
}

fn ranked_rows(df: &DataFrame) -> Result<Vec<RankedCountry>> {
    let years = df.column(YEAR_COLUMN)?.cast(&DataType::Int32)?;
    let countries = df.column(CanonicalField::Country.column_name())?;
    let scores = df.column(CanonicalField::Score.column_name())?;

    let rows = years
        .i32()?
        .into_iter()
        .zip(countries.str()?)
        .zip(scores.f64()?)
        .filter_map(|((year, country), score)| {
            Some(RankedCountry {
                year: year?,
                country: country?.to_string(),
                score: score?,
            })
        })
        .collect();
    Ok(rows)
}

/// Build the run summary from the explorer's loaded datasets.
pub fn summarize(
    explorer: &Explorer,
    happiness: &HappinessRun,
    catalog: &CatalogRun,
    top_n: usize,
) -> Result<RunSummary> {
    let kpis = explorer
        .happiness_years()?
        .into_iter()
        .map(|year| explorer.happiness_kpis(year))
        .collect::<Result<Vec<_>>>()?;

    let score = CanonicalField::Score.column_name();
    let top = explorer.extremes(
        Dataset::Happiness,
        &ExtremesRequest::top(YEAR_COLUMN, score).with_n(top_n),
    )?;
    let bottom = explorer.extremes(
        Dataset::Happiness,
        &ExtremesRequest::bottom(YEAR_COLUMN, score).with_n(top_n),
    )?;

    let catalog_kpis = [TitleFilter::All, TitleFilter::Movies, TitleFilter::TvShows]
        .into_iter()
        .map(|filter| explorer.catalog_kpis(filter))
        .collect::<Result<Vec<_>>>()?;

    Ok(RunSummary {
        happiness: HappinessSummary {
            report: happiness.report.clone(),
            exported_to: happiness.exported_to.clone(),
            kpis,
            top: ranked_rows(&top)?,
            bottom: ranked_rows(&bottom)?,
            correlations: explorer.indicator_correlations()?,
        },
        catalog: CatalogSummary {
            report: catalog.report,
            exported_to: catalog.exported_to.clone(),
            kpis: catalog_kpis,
            top_countries: explorer.top_countries(TitleFilter::All, top_n)?,
            correlations: explorer.catalog_correlations()?,
        },
        cache: explorer.cache_stats(),
    })
}
