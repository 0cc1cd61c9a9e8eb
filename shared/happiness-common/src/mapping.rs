//! Per-year column mappings
//!
//! A [`ColumnMapping`] names, for one source year, which source column feeds
//! each canonical field. Columns not named are dropped.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::error::HarmonizeError;
use crate::schema::CanonicalField;
use crate::Result;

/// One `source column -> canonical field` entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldMapping {
    pub source: String,
    pub target: CanonicalField,
}

/// Source-to-canonical column mapping for one year
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ColumnMapping {
    entries: Vec<FieldMapping>,
}

impl ColumnMapping {
    pub fn new<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = (S, CanonicalField)>,
        S: Into<String>,
    {
        Self {
            entries: entries
                .into_iter()
                .map(|(source, target)| FieldMapping {
                    source: source.into(),
                    target,
                })
                .collect(),
        }
    }

    pub fn entries(&self) -> &[FieldMapping] {
        &self.entries
    }

    pub fn source_for(&self, field: CanonicalField) -> Option<&str> {
        self.entries
            .iter()
            .find(|e| e.target == field)
            .map(|e| e.source.as_str())
    }

    /// Whether this year carries its own region column.
    pub fn has_region(&self) -> bool {
        self.source_for(CanonicalField::Region).is_some()
    }

    /// Check the mapping covers every required canonical field exactly once.
    pub fn validate(&self, year: i32) -> Result<()> {
        let mut seen = BTreeSet::new();
        for entry in &self.entries {
            if !seen.insert(entry.target) {
                return Err(HarmonizeError::InvalidMapping {
                    year,
                    reason: format!("{} is mapped more than once", entry.target.column_name()),
                });
            }
        }

        let missing: Vec<&str> = CanonicalField::ALL
            .iter()
            .filter(|f| f.is_required() && !seen.contains(f))
            .map(|f| f.column_name())
            .collect();
        if !missing.is_empty() {
            return Err(HarmonizeError::InvalidMapping {
                year,
                reason: format!("no source column for {}", missing.join(", ")),
            });
        }
        Ok(())
    }
}
