//! Media catalog cleaning
//!
//! Turns the raw catalog export into an analysis-ready table:
//!
//! 1. `date_added` is trimmed and parsed ("September 25, 2021"); the date and
//!    its year, month and day components are kept, plus `lag_time`, the years
//!    between release and addition to the catalog.
//! 2. `duration` is split by title type into `duration_min` (movies) and
//!    `duration_seasons` (TV shows).
//! 3. The first listed country and genre become `main_country` and
//!    `main_genre`.
//! 4. Only the columns in [`CLEANED_COLUMNS`] are kept.
//!
//! Values that cannot be parsed become nulls and are counted in the
//! [`CleaningReport`].

use chrono::{Datelike, NaiveDate};
use frame_common::require_column;
use polars::prelude::*;
use serde::{Deserialize, Serialize};

use crate::Result;

pub const RAW_CATALOG_FILE: &str = "netflix_titles.csv";
pub const CLEANED_CATALOG_FILE: &str = "netflix_cleaned.csv";

pub const MOVIE: &str = "Movie";
pub const TV_SHOW: &str = "TV Show";

const DATE_ADDED_FORMAT: &str = "%B %d, %Y";

/// Columns of the cleaned table, in order.
pub const CLEANED_COLUMNS: [&str; 13] = [
    "show_id",
    "type",
    "title",
    "main_country",
    "main_genre",
    "release_year",
    "date_added_feature",
    "year_added",
    "month_added",
    "added_day_of_week",
    "lag_time",
    "duration_min",
    "duration_seasons",
];

/// Counts of values that could not be interpreted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CleaningReport {
    pub rows: usize,
    /// Non-empty `date_added` values that did not parse
    pub unparsed_dates: usize,
    /// Movie or TV show durations that did not parse
    pub unparsed_durations: usize,
}

#[derive(Debug, Clone)]
pub struct CleanedCatalog {
    pub table: DataFrame,
    pub report: CleaningReport,
}

fn text_column(df: &DataFrame, name: &str) -> Result<Vec<Option<String>>> {
    let series = require_column(df, name)?.cast(&DataType::String)?;
    Ok(series
        .str()?
        .into_iter()
        .map(|v| v.map(str::to_string))
        .collect())
}

/// First comma-separated item, as listed.
fn first_item(list: Option<&str>) -> Option<String> {
    list.and_then(|l| l.split(',').next()).map(str::to_string)
}

fn parse_date_added(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), DATE_ADDED_FORMAT).ok()
}

fn parse_duration(raw: &str, suffixes: &[&str]) -> Option<f64> {
    let stripped = suffixes
        .iter()
        .fold(raw.to_string(), |acc, suffix| acc.replace(suffix, ""));
    stripped.trim().parse().ok()
}

/// Clean a raw catalog table.
pub fn clean_catalog(raw: &DataFrame) -> Result<CleanedCatalog> {
    let show_id = text_column(raw, "show_id")?;
    let kind = text_column(raw, "type")?;
    let title = text_column(raw, "title")?;
    let country = text_column(raw, "country")?;
    let date_added = text_column(raw, "date_added")?;
    let duration = text_column(raw, "duration")?;
    let listed_in = text_column(raw, "listed_in")?;
    let release_year = require_column(raw, "release_year")?.cast(&DataType::Int32)?;
    let release_year: Vec<Option<i32>> = release_year.i32()?.into_iter().collect();

    let rows = raw.height();
    let mut report = CleaningReport {
        rows,
        ..Default::default()
    };

    let mut date_feature = Vec::with_capacity(rows);
    let mut year_added = Vec::with_capacity(rows);
    let mut month_added = Vec::with_capacity(rows);
    let mut day_added = Vec::with_capacity(rows);
    let mut lag_time = Vec::with_capacity(rows);
    let mut duration_min = Vec::with_capacity(rows);
    let mut duration_seasons = Vec::with_capacity(rows);

    for i in 0..rows {
        let date = date_added[i].as_deref().and_then(|raw| {
            let parsed = parse_date_added(raw);
            if parsed.is_none() && !raw.trim().is_empty() {
                report.unparsed_dates += 1;
            }
            parsed
        });
        let year = date.map(|d| d.year());
        date_feature.push(date.map(|d| d.format("%Y-%m-%d").to_string()));
        year_added.push(year);
        month_added.push(date.map(|d| d.month() as i32));
        day_added.push(date.map(|d| d.day() as i32));
        lag_time.push(match (year, release_year[i]) {
            (Some(added), Some(released)) => Some(added - released),
            _ => None,
        });

        let (minutes, seasons) = match (kind[i].as_deref(), duration[i].as_deref()) {
            (Some(MOVIE), Some(raw)) => (parse_duration(raw, &[" min"]), None),
            (Some(TV_SHOW), Some(raw)) => (None, parse_duration(raw, &[" Seasons", " Season"])),
            _ => (None, None),
        };
        let is_timed = matches!(kind[i].as_deref(), Some(MOVIE) | Some(TV_SHOW));
        if is_timed && duration[i].is_some() && minutes.is_none() && seasons.is_none() {
            report.unparsed_durations += 1;
        }
        duration_min.push(minutes);
        duration_seasons.push(seasons);
    }

    let main_country: Vec<Option<String>> = country.iter().map(|c| first_item(c.as_deref())).collect();
    let main_genre: Vec<Option<String>> = listed_in.iter().map(|g| first_item(g.as_deref())).collect();

    let table = DataFrame::new(vec![
        Series::new("show_id", show_id),
        Series::new("type", kind),
        Series::new("title", title),
        Series::new("main_country", main_country),
        Series::new("main_genre", main_genre),
        Series::new("release_year", release_year),
        Series::new("date_added_feature", date_feature),
        Series::new("year_added", year_added),
        Series::new("month_added", month_added),
        Series::new("added_day_of_week", day_added),
        Series::new("lag_time", lag_time),
        Series::new("duration_min", duration_min),
        Series::new("duration_seasons", duration_seasons),
    ])?;

    Ok(CleanedCatalog { table, report })
}

#[cfg(test)]
mod tests {
    use super::*;
    use frame_common::FrameError;
    use pretty_assertions::assert_eq;

    use crate::error::CatalogError;

    fn raw() -> DataFrame {
        DataFrame::new(vec![
            Series::new("show_id", ["s1", "s2", "s3", "s4"]),
            Series::new("type", ["Movie", "TV Show", "TV Show", "Movie"]),
            Series::new("title", ["Dick Johnson Is Dead", "Blood & Water", "Kota Factory", "Sankofa"]),
            Series::new("director", [Some("Kirsten Johnson"), None, None, Some("Haile Gerima")]),
            Series::new(
                "country",
                [Some("United States"), Some("South Africa"), Some("India, United States"), None],
            ),
            Series::new(
                "date_added",
                [Some("September 25, 2021"), Some(" September 24, 2021"), Some("someday"), None],
            ),
            Series::new("release_year", [2020_i64, 2021, 2021, 1993]),
            Series::new("rating", ["PG-13", "TV-MA", "TV-MA", "TV-MA"]),
            Series::new("duration", [Some("90 min"), Some("2 Seasons"), Some("1 Season"), Some("long")]),
            Series::new(
                "listed_in",
                [
                    "Documentaries",
                    "International TV Shows, TV Dramas, TV Mysteries",
                    "Romantic TV Shows, TV Comedies",
                    "Dramas, Independent Movies",
                ],
            ),
        ])
        .unwrap()
    }

    fn strs(df: &DataFrame, name: &str) -> Vec<Option<String>> {
        df.column(name)
            .unwrap()
            .str()
            .unwrap()
            .into_iter()
            .map(|v| v.map(str::to_string))
            .collect()
    }

    fn ints(df: &DataFrame, name: &str) -> Vec<Option<i32>> {
        df.column(name).unwrap().i32().unwrap().into_iter().collect()
    }

    fn floats(df: &DataFrame, name: &str) -> Vec<Option<f64>> {
        df.column(name).unwrap().f64().unwrap().into_iter().collect()
    }

    #[test]
    fn keeps_only_final_columns() {
        let out = clean_catalog(&raw()).unwrap();
        assert_eq!(out.table.get_column_names(), CLEANED_COLUMNS.to_vec());
        assert_eq!(out.table.height(), 4);
    }

    #[test]
    fn date_added_is_parsed_and_split() {
        let out = clean_catalog(&raw()).unwrap().table;
        assert_eq!(
            strs(&out, "date_added_feature"),
            vec![Some("2021-09-25".to_string()), Some("2021-09-24".to_string()), None, None]
        );
        assert_eq!(ints(&out, "year_added"), vec![Some(2021), Some(2021), None, None]);
        assert_eq!(ints(&out, "month_added"), vec![Some(9), Some(9), None, None]);
        assert_eq!(ints(&out, "added_day_of_week"), vec![Some(25), Some(24), None, None]);
        assert_eq!(ints(&out, "lag_time"), vec![Some(1), Some(0), None, None]);
    }

    #[test]
    fn duration_is_split_by_type() {
        let out = clean_catalog(&raw()).unwrap().table;
        assert_eq!(floats(&out, "duration_min"), vec![Some(90.0), None, None, None]);
        assert_eq!(floats(&out, "duration_seasons"), vec![None, Some(2.0), Some(1.0), None]);
    }

    #[test]
    fn main_country_and_genre_take_first_item() {
        let out = clean_catalog(&raw()).unwrap().table;
        assert_eq!(
            strs(&out, "main_country"),
            vec![
                Some("United States".to_string()),
                Some("South Africa".to_string()),
                Some("India".to_string()),
                None
            ]
        );
        assert_eq!(
            strs(&out, "main_genre")[1].as_deref(),
            Some("International TV Shows")
        );
    }

    #[test]
    fn unparseable_values_are_counted_not_fatal() {
        let report = clean_catalog(&raw()).unwrap().report;
        assert_eq!(
            report,
            CleaningReport {
                rows: 4,
                unparsed_dates: 1,
                unparsed_durations: 1,
            }
        );
    }

    #[test]
    fn missing_raw_column_is_reported() {
        let raw = raw().drop("listed_in").unwrap();
        match clean_catalog(&raw).unwrap_err() {
            CatalogError::Frame(FrameError::ColumnNotFound(name)) => assert_eq!(name, "listed_in"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn empty_catalog_cleans_to_empty_table() {
        let out = clean_catalog(&raw().clear()).unwrap();
        assert_eq!(out.table.height(), 0);
        assert_eq!(out.report.rows, 0);
    }
}
