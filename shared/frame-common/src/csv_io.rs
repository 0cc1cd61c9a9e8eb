//! Flat-file load and export
//!
//! Sources are delimited text with a header row. Empty fields and the
//! markers in [`NULL_MARKERS`] load as nulls, and nulls export as empty
//! fields, so an exported table reloads with the same values.

use std::fs::{self, File};
use std::path::Path;

use polars::prelude::*;

use crate::error::FrameError;
use crate::Result;

/// Field values read as missing in every column.
pub const NULL_MARKERS: [&str; 4] = ["", "N/A", "NA", "null"];

/// Read a CSV file with a header row.
///
/// A missing file, or one the reader cannot parse, is reported as
/// [`FrameError::SourceUnavailable`].
pub fn read_csv(path: impl AsRef<Path>) -> Result<DataFrame> {
    let path = path.as_ref();
    if !path.is_file() {
        return Err(FrameError::source_unavailable(path, "file not found"));
    }

    CsvReader::from_path(path)
        .and_then(|reader| {
            reader
                .has_header(true)
                .infer_schema(None)
                .with_null_values(Some(NullValues::AllColumns(
                    NULL_MARKERS.iter().map(|m| m.to_string()).collect(),
                )))
                .finish()
        })
        .map_err(|e| FrameError::source_unavailable(path, e))
}

/// Write `df` as CSV with a header row, creating parent directories.
pub fn write_csv(df: &mut DataFrame, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    let mut file = File::create(path)?;
    CsvWriter::new(&mut file).include_header(true).finish(df)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn missing_file_is_source_unavailable() {
        let dir = tempfile::tempdir().unwrap();
        let err = read_csv(dir.path().join("2015.csv")).unwrap_err();
        match err {
            FrameError::SourceUnavailable { path, .. } => {
                assert_eq!(path, dir.path().join("2015.csv"))
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn directory_is_not_a_source() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            read_csv(dir.path()),
            Err(FrameError::SourceUnavailable { .. })
        ));
    }

    #[test]
    fn reads_header_and_nulls() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("t.csv");
        fs::write(&path, "Country,Score\nNorway,7.5\n\"Korea, South\",\n").unwrap();

        let df = read_csv(&path).unwrap();

        assert_eq!(df.get_column_names(), vec!["Country", "Score"]);
        assert_eq!(df.height(), 2);
        let country: Vec<Option<&str>> = df.column("Country").unwrap().str().unwrap().into_iter().collect();
        assert_eq!(country, vec![Some("Norway"), Some("Korea, South")]);
        assert_eq!(df.column("Score").unwrap().null_count(), 1);
    }

    #[test]
    fn not_available_markers_load_as_nulls() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("2018.csv");
        fs::write(
            &path,
            "Country or region,Perceptions of corruption
Finland,0.393
United Arab Emirates,N/A
Togo,NA
",
        )
        .unwrap();

        let df = read_csv(&path).unwrap();

        let corruption = df.column("Perceptions of corruption").unwrap();
        assert_eq!(corruption.dtype(), &DataType::Float64);
        let values: Vec<Option<f64>> = corruption.f64().unwrap().into_iter().collect();
        assert_eq!(values, vec![Some(0.393), None, None]);
    }

    #[test]
    fn export_then_import_preserves_values() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("out.csv");
        let mut df = DataFrame::new(vec![
            Series::new("Country", [Some("Côte d'Ivoire"), Some("Trinidad, Tobago"), None]),
            Series::new("Score", [Some(7.587_f64), None, Some(0.123_456_789_012_345)]),
            Series::new("Rank", [Some(1_i64), Some(2), None]),
        ])
        .unwrap();

        write_csv(&mut df, &path).unwrap();
        let back = read_csv(&path).unwrap();

        assert!(back.equals_missing(&df), "round trip changed values:\n{back}");
    }
}
