//! Harmonization plans and flat-file collaborators
//!
//! A [`HarmonizePlan`] says which file holds each year, how its columns map
//! onto the canonical schema, and which year is authoritative for regions.
//! The built-in [`HarmonizePlan::world_happiness`] plan covers the
//! 2015–2019 World Happiness Report files.

use std::path::Path;

use frame_common::{read_csv, require_column, FrameError};
use polars::prelude::*;
use serde::{Deserialize, Serialize};

use crate::error::HarmonizeError;
use crate::harmonizer::YearSource;
use crate::mapping::ColumnMapping;
use crate::schema::{canonical_column_names, year_dtype, CanonicalField, YEAR_COLUMN};
use crate::Result;

/// File name used when exporting the harmonized table.
pub const COMBINED_FILE_NAME: &str = "world_happiness_2015-2019_combined.csv";

/// One year of a plan
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct YearPlan {
    pub year: i32,
    /// File name relative to the data directory
    pub file: String,
    pub mapping: ColumnMapping,
}

/// Ordered list of yearly sources plus the authoritative region year
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HarmonizePlan {
    pub authoritative_region_year: i32,
    pub years: Vec<YearPlan>,
}

impl HarmonizePlan {
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|e| {
            HarmonizeError::PlanError(format!("cannot read plan {}: {e}", path.display()))
        })?;
        Self::from_json_str(&json)
    }

    pub fn with_authoritative_region_year(mut self, year: i32) -> Self {
        self.authoritative_region_year = year;
        self
    }

    /// The 2015–2019 World Happiness Report files.
    ///
    /// 2015 and 2016 carry a region column; 2016 is the authoritative year
    /// used to backfill 2017–2019.
    pub fn world_happiness() -> Self {
        use CanonicalField::*;

        let early = |region: bool| {
            let mut entries = vec![("Country", Country)];
            if region {
                entries.push(("Region", Region));
            }
            entries.extend([
                ("Happiness Rank", Rank),
                ("Happiness Score", Score),
                ("Economy (GDP per Capita)", GdpPerCapita),
                ("Family", SocialSupport),
                ("Health (Life Expectancy)", HealthLifeExpectancy),
                ("Freedom", Freedom),
                ("Trust (Government Corruption)", TrustGovernmentCorruption),
                ("Generosity", Generosity),
            ]);
            ColumnMapping::new(entries)
        };

        let dotted = ColumnMapping::new([
            ("Country", Country),
            ("Happiness.Rank", Rank),
            ("Happiness.Score", Score),
            ("Economy..GDP.per.Capita.", GdpPerCapita),
            ("Family", SocialSupport),
            ("Health..Life.Expectancy.", HealthLifeExpectancy),
            ("Freedom", Freedom),
            ("Trust..Government.Corruption.", TrustGovernmentCorruption),
            ("Generosity", Generosity),
        ]);

        let late = ColumnMapping::new([
            ("Country or region", Country),
            ("Overall rank", Rank),
            ("Score", Score),
            ("GDP per capita", GdpPerCapita),
            ("Social support", SocialSupport),
            ("Healthy life expectancy", HealthLifeExpectancy),
            ("Freedom to make life choices", Freedom),
            ("Perceptions of corruption", TrustGovernmentCorruption),
            ("Generosity", Generosity),
        ]);

        let year = |year: i32, mapping: ColumnMapping| YearPlan {
            year,
            file: format!("{year}.csv"),
            mapping,
        };

        Self {
            authoritative_region_year: 2016,
            years: vec![
                year(2015, early(true)),
                year(2016, early(true)),
                year(2017, dotted),
                year(2018, late.clone()),
                year(2019, late),
            ],
        }
    }
}

/// Read every file named by `plan` from `data_dir`.
///
/// The first missing or unreadable file aborts the load; no subset of years
/// is ever returned.
pub fn load_year_sources(data_dir: impl AsRef<Path>, plan: &HarmonizePlan) -> Result<Vec<YearSource>> {
    let data_dir = data_dir.as_ref();
    plan.years
        .iter()
        .map(|entry| -> Result<YearSource> {
            let table = read_csv(data_dir.join(&entry.file)).map_err(|e| match e {
                FrameError::SourceUnavailable { path, reason } => HarmonizeError::SourceUnavailable {
                    year: entry.year,
                    reason: format!("{}: {reason}", path.display()),
                },
                other => HarmonizeError::Frame(other),
            })?;
            Ok(YearSource::new(entry.year, table, entry.mapping.clone()))
        })
        .collect()
}

/// Reload an exported harmonized table and restore canonical types.
///
/// A column that is entirely empty in the file would otherwise come back as
/// text, so every canonical column is cast explicitly. The casts are strict:
/// a value that does not fit its canonical type fails the reload instead of
/// turning into a null.
pub fn read_normalized_csv(path: impl AsRef<Path>) -> Result<DataFrame> {
    let df = read_csv(path)?;
    let mut columns = Vec::with_capacity(CanonicalField::ALL.len() + 1);
    for field in CanonicalField::ALL {
        let series = require_column(&df, field.column_name())?;
        columns.push(series.strict_cast(&field.dtype())?);
    }
    columns.push(require_column(&df, YEAR_COLUMN)?.strict_cast(&year_dtype())?);

    let out = DataFrame::new(columns)?;
    debug_assert_eq!(out.get_column_names(), canonical_column_names());
    Ok(out)
}
