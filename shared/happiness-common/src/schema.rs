//! Canonical schema for the harmonized World Happiness table
//!
//! Column order is stable so downstream consumers can rely on positions:
//! `Country, Region, Rank, Score, <six indicators>, Year`.

use polars::prelude::DataType;
use serde::{Deserialize, Serialize};

/// Name of the column stamped with each row's source year.
pub const YEAR_COLUMN: &str = "Year";

/// A field of the canonical schema (everything except `Year`, which is
/// stamped rather than mapped)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum CanonicalField {
    Country,
    Region,
    Rank,
    Score,
    GdpPerCapita,
    SocialSupport,
    HealthLifeExpectancy,
    Freedom,
    TrustGovernmentCorruption,
    Generosity,
}

impl CanonicalField {
    /// All mapped fields in output column order.
    pub const ALL: [CanonicalField; 10] = [
        CanonicalField::Country,
        CanonicalField::Region,
        CanonicalField::Rank,
        CanonicalField::Score,
        CanonicalField::GdpPerCapita,
        CanonicalField::SocialSupport,
        CanonicalField::HealthLifeExpectancy,
        CanonicalField::Freedom,
        CanonicalField::TrustGovernmentCorruption,
        CanonicalField::Generosity,
    ];

    /// The six explanatory sub-indicators.
    pub const INDICATORS: [CanonicalField; 6] = [
        CanonicalField::GdpPerCapita,
        CanonicalField::SocialSupport,
        CanonicalField::HealthLifeExpectancy,
        CanonicalField::Freedom,
        CanonicalField::TrustGovernmentCorruption,
        CanonicalField::Generosity,
    ];

    pub fn column_name(self) -> &'static str {
        match self {
            CanonicalField::Country => "Country",
            CanonicalField::Region => "Region",
            CanonicalField::Rank => "Rank",
            CanonicalField::Score => "Score",
            CanonicalField::GdpPerCapita => "GDP_per_Capita",
            CanonicalField::SocialSupport => "Social_Support",
            CanonicalField::HealthLifeExpectancy => "Health_Life_Expectancy",
            CanonicalField::Freedom => "Freedom",
            CanonicalField::TrustGovernmentCorruption => "Trust_Government_Corruption",
            CanonicalField::Generosity => "Generosity",
        }
    }

    pub fn from_column_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.column_name() == name)
    }

    pub fn dtype(self) -> DataType {
        match self {
            CanonicalField::Country | CanonicalField::Region => DataType::String,
            CanonicalField::Rank => DataType::Int64,
            _ => DataType::Float64,
        }
    }

    /// Region is the only field a yearly mapping may omit.
    pub fn is_required(self) -> bool {
        self != CanonicalField::Region
    }
}

pub fn year_dtype() -> DataType {
    DataType::Int32
}

/// Output column names in order, `Year` last.
pub fn canonical_column_names() -> Vec<&'static str> {
    CanonicalField::ALL
        .iter()
        .map(|f| f.column_name())
        .chain(std::iter::once(YEAR_COLUMN))
        .collect()
}

/// Score plus the six indicators, as used for correlation views.
pub fn numeric_measure_columns() -> Vec<&'static str> {
    std::iter::once(CanonicalField::Score)
        .chain(CanonicalField::INDICATORS)
        .map(|f| f.column_name())
        .collect()
}
