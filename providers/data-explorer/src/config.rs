//! Explorer configuration
//!
//! Read from the process environment or from a property map. Property keys
//! are accepted in lower-case or in the upper-case environment form.

use std::collections::HashMap;
use std::path::PathBuf;

use anyhow::{bail, Result};
use catalog_common::RAW_CATALOG_FILE;
use frame_common::DEFAULT_EXTREMES_N;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExplorerConfig {
    /// Directory holding the yearly files and the raw catalog
    pub data_dir: PathBuf,
    /// Directory receiving the exported tables
    pub output_dir: PathBuf,
    /// JSON harmonization plan; the built-in 2015–2019 plan when unset
    pub plan_path: Option<PathBuf>,
    /// Overrides the plan's authoritative region year
    pub authoritative_region_year: Option<i32>,
    /// Rows per year in the top/bottom views
    pub top_n: usize,
    /// Write the harmonized and cleaned tables to `output_dir`
    pub export: bool,
    pub catalog_file: String,
}

impl Default for ExplorerConfig {
    fn default() -> Self {
        Self::from_lookup(|_| None)
    }
}

impl ExplorerConfig {
    const DEFAULT_DATA_DIR: &'static str = "./data";
    const DEFAULT_OUTPUT_DIR: &'static str = "./data";
    const DEFAULT_TOP_N: usize = DEFAULT_EXTREMES_N;
    const DEFAULT_EXPORT: bool = true;

    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_properties(props: &HashMap<String, String>) -> Self {
        Self::from_lookup(|key| {
            props
                .get(&key.to_lowercase())
                .or_else(|| props.get(key))
                .cloned()
        })
    }

    fn from_lookup(get: impl Fn(&str) -> Option<String>) -> Self {
        let data_dir = get("EXPLORER_DATA_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(Self::DEFAULT_DATA_DIR));
        let output_dir = get("EXPLORER_OUTPUT_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(Self::DEFAULT_OUTPUT_DIR));
        let plan_path = get("EXPLORER_PLAN_PATH")
            .filter(|v| !v.trim().is_empty())
            .map(PathBuf::from);
        let authoritative_region_year =
            get("EXPLORER_AUTHORITATIVE_REGION_YEAR").and_then(|v| v.trim().parse().ok());
        let top_n = get("EXPLORER_TOP_N")
            .and_then(|v| v.trim().parse().ok())
            .unwrap_or(Self::DEFAULT_TOP_N);
        let export = get("EXPLORER_EXPORT")
            .and_then(|v| parse_bool(&v))
            .unwrap_or(Self::DEFAULT_EXPORT);
        let catalog_file =
            get("EXPLORER_CATALOG_FILE").unwrap_or_else(|| RAW_CATALOG_FILE.to_string());

        Self {
            data_dir,
            output_dir,
            plan_path,
            authoritative_region_year,
            top_n,
            export,
            catalog_file,
        }
    }

    /// Reject settings no pipeline can run with.
    pub fn validate(&self) -> Result<()> {
        if self.top_n == 0 {
            bail!("EXPLORER_TOP_N must be at least 1");
        }
        if self.catalog_file.trim().is_empty() {
            bail!("EXPLORER_CATALOG_FILE must not be empty");
        }
        Ok(())
    }

    pub fn catalog_path(&self) -> PathBuf {
        self.data_dir.join(&self.catalog_file)
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
