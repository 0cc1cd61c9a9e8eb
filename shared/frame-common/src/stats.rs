//! Descriptive statistics
//!
//! Small column-level summaries used for dashboard KPIs: means, distinct
//! counts, modes, value counts and pairwise Pearson correlation. Nulls are
//! skipped everywhere, matching the usual dataframe defaults.

use std::collections::HashMap;

use polars::prelude::*;
use serde::{Deserialize, Serialize};

use crate::error::FrameError;
use crate::Result;

/// Look up a column, mapping a miss to [`FrameError::ColumnNotFound`].
pub fn require_column<'a>(df: &'a DataFrame, name: &str) -> Result<&'a Series> {
    df.column(name)
        .map_err(|_| FrameError::ColumnNotFound(name.to_string()))
}

fn numeric_values(df: &DataFrame, name: &str) -> Result<Float64Chunked> {
    let series = require_column(df, name)?;
    if !series.dtype().is_numeric() {
        return Err(FrameError::InvalidArgument(format!(
            "column '{}' must be numeric (got {})",
            name,
            series.dtype()
        )));
    }
    Ok(series.cast(&DataType::Float64)?.f64()?.clone())
}

/// Mean of a numeric column; `None` when it has no non-null values.
pub fn mean(df: &DataFrame, column: &str) -> Result<Option<f64>> {
    Ok(numeric_values(df, column)?.mean())
}

/// Number of distinct non-null values.
pub fn n_unique(df: &DataFrame, column: &str) -> Result<usize> {
    Ok(require_column(df, column)?.drop_nulls().n_unique()?)
}

/// Rows where `column == value`.
pub fn filter_eq<L: Literal>(df: &DataFrame, column: &str, value: L) -> Result<DataFrame> {
    require_column(df, column)?;
    Ok(df
        .clone()
        .lazy()
        .filter(col(column).eq(lit(value)))
        .collect()?)
}

/// One entry of a value count
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValueCount {
    pub value: String,
    pub count: usize,
}

fn counts_in_order(df: &DataFrame, column: &str) -> Result<Vec<ValueCount>> {
    let values = require_column(df, column)?.cast(&DataType::String)?;
    let mut position: HashMap<&str, usize> = HashMap::new();
    let mut counts: Vec<ValueCount> = Vec::new();
    for value in values.str()?.into_iter().flatten() {
        match position.get(value) {
            Some(&i) => counts[i].count += 1,
            None => {
                position.insert(value, counts.len());
                counts.push(ValueCount {
                    value: value.to_string(),
                    count: 1,
                });
            }
        }
    }
    Ok(counts)
}

/// Most frequent values, highest count first.
///
/// Values with equal counts keep their order of first appearance. `limit`
/// truncates the list.
pub fn value_counts(df: &DataFrame, column: &str, limit: Option<usize>) -> Result<Vec<ValueCount>> {
    let mut counts = counts_in_order(df, column)?;
    counts.sort_by(|a, b| b.count.cmp(&a.count));
    if let Some(limit) = limit {
        counts.truncate(limit);
    }
    Ok(counts)
}

/// Most frequent value as text. Ties resolve to the smallest value.
pub fn mode(df: &DataFrame, column: &str) -> Result<Option<String>> {
    let counts = counts_in_order(df, column)?;
    Ok(counts
        .into_iter()
        .max_by(|a, b| a.count.cmp(&b.count).then_with(|| b.value.cmp(&a.value)))
        .map(|c| c.value))
}

/// Pairwise Pearson correlation between numeric columns
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorrelationMatrix {
    pub columns: Vec<String>,
    /// `values[i][j]` correlates `columns[i]` with `columns[j]`; `None` when
    /// fewer than two complete pairs exist or a side has zero variance.
    pub values: Vec<Vec<Option<f64>>>,
}

impl CorrelationMatrix {
    pub fn get(&self, a: &str, b: &str) -> Option<f64> {
        let i = self.columns.iter().position(|c| c == a)?;
        let j = self.columns.iter().position(|c| c == b)?;
        self.values[i][j]
    }
}

/// Correlation matrix over `columns` using pairwise-complete observations.
pub fn correlation_matrix(df: &DataFrame, columns: &[&str]) -> Result<CorrelationMatrix> {
    let mut data: Vec<Vec<Option<f64>>> = Vec::with_capacity(columns.len());
    for name in columns {
        let values = numeric_values(df, name)?;
        data.push(values.into_iter().collect());
    }

    let mut values = vec![vec![None; columns.len()]; columns.len()];
    for i in 0..columns.len() {
        for j in i..columns.len() {
            let r = pearson(&data[i], &data[j]).map(|r| if i == j { 1.0 } else { r });
            values[i][j] = r;
            values[j][i] = r;
        }
    }

    Ok(CorrelationMatrix {
        columns: columns.iter().map(|c| c.to_string()).collect(),
        values,
    })
}

fn pearson(xs: &[Option<f64>], ys: &[Option<f64>]) -> Option<f64> {
    let pairs: Vec<(f64, f64)> = xs
        .iter()
        .zip(ys)
        .filter_map(|(x, y)| match (x, y) {
            (Some(x), Some(y)) if !x.is_nan() && !y.is_nan() => Some((*x, *y)),
            _ => None,
        })
        .collect();
    if pairs.len() < 2 {
        return None;
    }

    let n = pairs.len() as f64;
    let mean_x = pairs.iter().map(|(x, _)| x).sum::<f64>() / n;
    let mean_y = pairs.iter().map(|(_, y)| y).sum::<f64>() / n;
    let (mut cov, mut var_x, mut var_y) = (0.0, 0.0, 0.0);
    for (x, y) in &pairs {
        let dx = x - mean_x;
        let dy = y - mean_y;
        cov += dx * dy;
        var_x += dx * dx;
        var_y += dy * dy;
    }
    if var_x == 0.0 || var_y == 0.0 {
        return None;
    }
    Some((cov / (var_x.sqrt() * var_y.sqrt())).clamp(-1.0, 1.0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn sample() -> DataFrame {
        DataFrame::new(vec![
            Series::new(
                "main_country",
                [Some("India"), Some("United States"), None, Some("India"), Some("United States"), Some("Japan")],
            ),
            Series::new("lag_time", [Some(1_i32), Some(3), Some(5), None, Some(2), Some(1)]),
            Series::new("x", [1.0, 2.0, 3.0, 4.0, 5.0, 6.0]),
            Series::new("y", [2.0, 4.0, 6.0, 8.0, 10.0, 12.0]),
            Series::new("z", [6.0, 5.0, 4.0, 3.0, 2.0, 1.0]),
            Series::new("flat", [1.0, 1.0, 1.0, 1.0, 1.0, 1.0]),
        ])
        .unwrap()
    }

    #[test]
    fn mean_skips_nulls() {
        assert_eq!(mean(&sample(), "lag_time").unwrap(), Some(12.0 / 5.0));
    }

    #[test]
    fn mean_of_text_column_is_rejected() {
        assert!(matches!(
            mean(&sample(), "main_country"),
            Err(FrameError::InvalidArgument(_))
        ));
    }

    #[test]
    fn n_unique_ignores_nulls() {
        assert_eq!(n_unique(&sample(), "main_country").unwrap(), 3);
    }

    #[test]
    fn value_counts_orders_by_count_then_first_appearance() {
        let counts = value_counts(&sample(), "main_country", None).unwrap();
        let flat: Vec<(&str, usize)> = counts.iter().map(|c| (c.value.as_str(), c.count)).collect();
        assert_eq!(flat, vec![("India", 2), ("United States", 2), ("Japan", 1)]);

        let top = value_counts(&sample(), "main_country", Some(1)).unwrap();
        assert_eq!(top.len(), 1);
    }

    #[test]
    fn mode_breaks_ties_with_smallest_value() {
        assert_eq!(mode(&sample(), "main_country").unwrap().as_deref(), Some("India"));
    }

    #[test]
    fn filter_eq_keeps_matching_rows() {
        let out = filter_eq(&sample(), "lag_time", 1_i32).unwrap();
        assert_eq!(out.height(), 2);
    }

    #[test]
    fn filter_on_missing_column_is_an_error() {
        assert!(matches!(
            filter_eq(&sample(), "Year", 2019_i32),
            Err(FrameError::ColumnNotFound(_))
        ));
    }

    #[test]
    fn correlation_matrix_matches_linear_relations() {
        let m = correlation_matrix(&sample(), &["x", "y", "z", "flat"]).unwrap();

        assert_eq!(m.get("x", "x"), Some(1.0));
        assert!((m.get("x", "y").unwrap() - 1.0).abs() < 1e-12);
        assert!((m.get("x", "z").unwrap() + 1.0).abs() < 1e-12);
        assert_eq!(m.get("x", "flat"), None);
        assert_eq!(m.get("flat", "flat"), None);
        assert_eq!(m.get("y", "z"), m.get("z", "y"));
    }

    #[test]
    fn correlation_uses_pairwise_complete_rows() {
        let df = DataFrame::new(vec![
            Series::new("a", [Some(1.0), Some(2.0), None, Some(4.0)]),
            Series::new("b", [Some(1.0), Some(2.0), Some(100.0), Some(4.0)]),
        ])
        .unwrap();
        let m = correlation_matrix(&df, &["a", "b"]).unwrap();
        assert!((m.get("a", "b").unwrap() - 1.0).abs() < 1e-12);
    }
}
