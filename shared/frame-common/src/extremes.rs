//! Grouped extremes extraction
//!
//! Builds the "top 10 / bottom 10 per year" style views: rows are partitioned
//! by a grouping column, each partition is ranked by a numeric column and the
//! first `n` rows of every partition are concatenated into one flat table.

use std::cmp::Ordering;
use std::collections::HashMap;

use polars::prelude::*;
use serde::{Deserialize, Serialize};

use crate::error::FrameError;
use crate::stats::require_column;
use crate::Result;

/// Rows kept per group when the caller does not say otherwise.
pub const DEFAULT_EXTREMES_N: usize = 10;

/// Ranking direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    /// Highest values first
    Highest,
    /// Lowest values first
    Lowest,
}

/// A top/bottom-N-per-group request
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ExtremesRequest {
    /// Column whose distinct values define the groups
    pub group_by: String,
    /// Numeric column used for ranking inside a group
    pub rank_by: String,
    pub direction: Direction,
    /// Rows kept per group
    #[serde(default = "default_n")]
    pub n: usize,
}

fn default_n() -> usize {
    DEFAULT_EXTREMES_N
}

impl ExtremesRequest {
    pub fn new(
        group_by: impl Into<String>,
        rank_by: impl Into<String>,
        direction: Direction,
        n: usize,
    ) -> Self {
        Self {
            group_by: group_by.into(),
            rank_by: rank_by.into(),
            direction,
            n,
        }
    }

    /// Highest `DEFAULT_EXTREMES_N` rows per group.
    pub fn top(group_by: impl Into<String>, rank_by: impl Into<String>) -> Self {
        Self::new(group_by, rank_by, Direction::Highest, DEFAULT_EXTREMES_N)
    }

    /// Lowest `DEFAULT_EXTREMES_N` rows per group.
    pub fn bottom(group_by: impl Into<String>, rank_by: impl Into<String>) -> Self {
        Self::new(group_by, rank_by, Direction::Lowest, DEFAULT_EXTREMES_N)
    }

    pub fn with_n(mut self, n: usize) -> Self {
        self.n = n;
        self
    }
}

/// Return the first `n` rows of every group, ranked by `rank_by`.
///
/// Groups appear in order of first appearance of their key. Rows with a null
/// group key belong to no group. Rows whose rank value is null (or NaN) are
/// neither ranked nor returned. Ties keep their original row order. A group
/// with fewer than `n` eligible rows contributes all of them.
pub fn grouped_extremes(df: &DataFrame, req: &ExtremesRequest) -> Result<DataFrame> {
    if req.n == 0 {
        return Err(FrameError::InvalidArgument(
            "extremes row count must be positive".to_string(),
        ));
    }

    let rank_col = require_column(df, &req.rank_by)?;
    if !rank_col.dtype().is_numeric() {
        return Err(FrameError::InvalidArgument(format!(
            "ranking column '{}' must be numeric (got {})",
            req.rank_by,
            rank_col.dtype()
        )));
    }
    let group_col = require_column(df, &req.group_by)?;

    if df.height() == 0 {
        return Ok(df.clear());
    }

    let ranks = rank_values(rank_col)?;
    let keys = group_keys(group_col)?;

    // Eligible (row, value) pairs per group, groups in first-appearance order.
    let mut group_index: HashMap<GroupKey, usize> = HashMap::new();
    let mut groups: Vec<Vec<(usize, RankValue)>> = Vec::new();
    for (row, (key, value)) in keys.into_iter().zip(ranks).enumerate() {
        let Some(key) = key else {
            continue;
        };
        let slot = *group_index.entry(key).or_insert_with(|| {
            groups.push(Vec::new());
            groups.len() - 1
        });
        if let Some(value) = value {
            groups[slot].push((row, value));
        }
    }

    let mut selected: Vec<IdxSize> = Vec::with_capacity(groups.len() * req.n);
    for mut rows in groups {
        // sort_by is stable: equal values keep their original order.
        match req.direction {
            Direction::Highest => rows.sort_by(|a, b| b.1.total_cmp(&a.1)),
            Direction::Lowest => rows.sort_by(|a, b| a.1.total_cmp(&b.1)),
        }
        selected.extend(rows.into_iter().take(req.n).map(|(row, _)| row as IdxSize));
    }

    let idx = IdxCa::from_vec("idx", selected);
    Ok(df.take(&idx)?)
}

/// Group key in the column's own type. Float keys compare by value, so
/// `-0.0` and `0.0` share a group.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum GroupKey {
    Int(i128),
    Float(u64),
    Text(String),
}

fn group_keys(col: &Series) -> Result<Vec<Option<GroupKey>>> {
    let keys = match col.dtype() {
        DataType::UInt64 => col
            .u64()?
            .into_iter()
            .map(|v| v.map(|v| GroupKey::Int(v as i128)))
            .collect(),
        dt if dt.is_integer() => col
            .cast(&DataType::Int64)?
            .i64()?
            .into_iter()
            .map(|v| v.map(|v| GroupKey::Int(v as i128)))
            .collect(),
        dt if dt.is_float() => col
            .cast(&DataType::Float64)?
            .f64()?
            .into_iter()
            .map(|v| {
                v.map(|v| {
                    // one bit pattern per value: -0.0 folds into 0.0, NaNs into one NaN
                    let v = if v == 0.0 {
                        0.0
                    } else if v.is_nan() {
                        f64::NAN
                    } else {
                        v
                    };
                    GroupKey::Float(v.to_bits())
                })
            })
            .collect(),
        _ => col
            .cast(&DataType::String)?
            .str()?
            .into_iter()
            .map(|v| v.map(|v| GroupKey::Text(v.to_string())))
            .collect(),
    };
    Ok(keys)
}

/// Rank value in the column's own type. Integers stay exact beyond 2^53.
#[derive(Debug, Clone, Copy, PartialEq)]
enum RankValue {
    Int(i128),
    Float(f64),
}

impl RankValue {
    fn total_cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (RankValue::Int(a), RankValue::Int(b)) => a.cmp(b),
            (RankValue::Float(a), RankValue::Float(b)) => a.total_cmp(b),
            (RankValue::Int(a), RankValue::Float(b)) => (*a as f64).total_cmp(b),
            (RankValue::Float(a), RankValue::Int(b)) => a.total_cmp(&(*b as f64)),
        }
    }
}

/// Rank values with nulls and NaNs mapped to `None`.
fn rank_values(col: &Series) -> Result<Vec<Option<RankValue>>> {
    let values = match col.dtype() {
        DataType::UInt64 => col
            .u64()?
            .into_iter()
            .map(|v| v.map(|v| RankValue::Int(v as i128)))
            .collect(),
        dt if dt.is_integer() => col
            .cast(&DataType::Int64)?
            .i64()?
            .into_iter()
            .map(|v| v.map(|v| RankValue::Int(v as i128)))
            .collect(),
        _ => col
            .cast(&DataType::Float64)?
            .f64()?
            .into_iter()
            .map(|v| v.filter(|v| !v.is_nan()).map(RankValue::Float))
            .collect(),
    };
    Ok(values)
}
