//! Country to region lookup
//!
//! Built once from the authoritative region year and passed explicitly to
//! every year that needs its `Region` column backfilled. Never mutated after
//! construction.

use std::collections::HashMap;

use frame_common::require_column;
use polars::prelude::*;

use crate::schema::CanonicalField;
use crate::Result;

/// Immutable `country -> region` map
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegionLookup {
    source_year: i32,
    regions: HashMap<String, String>,
}

impl RegionLookup {
    /// Build from a table already in canonical form.
    ///
    /// The first region seen for a country wins; later rows for the same
    /// country are ignored. Rows with a null country or null region carry no
    /// information and are skipped.
    pub fn from_canonical(source_year: i32, df: &DataFrame) -> Result<Self> {
        let countries = require_column(df, CanonicalField::Country.column_name())?.str()?;
        let regions = require_column(df, CanonicalField::Region.column_name())?.str()?;

        let mut map = HashMap::with_capacity(df.height());
        for (country, region) in countries.into_iter().zip(regions.into_iter()) {
            if let (Some(country), Some(region)) = (country, region) {
                map.entry(country.to_string())
                    .or_insert_with(|| region.to_string());
            }
        }

        Ok(Self {
            source_year,
            regions: map,
        })
    }

    pub fn source_year(&self) -> i32 {
        self.source_year
    }

    pub fn get(&self, country: &str) -> Option<&str> {
        self.regions.get(country).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.regions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }

    /// Region column for the given countries; unknown countries get null.
    pub fn backfill(&self, countries: &Series) -> Result<Series> {
        let regions: Vec<Option<&str>> = countries
            .str()?
            .into_iter()
            .map(|country| country.and_then(|c| self.get(c)))
            .collect();
        Ok(Series::new(CanonicalField::Region.column_name(), regions))
    }
}
