//! Evolution-run series: a single unnamed numeric column, no header.

use std::path::Path;

use super::error::{open_file, parse_field, DataError};

/// Read the first field of every record as a number.
pub fn read_series(path: &Path) -> Result<Vec<f64>, DataError> {
    let file = open_file(path)?;

    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(file);

    let mut values = Vec::new();
    for (i, record) in rdr.records().enumerate() {
        let record = record.map_err(|e| DataError::csv(path, e))?;
        values.push(parse_field(path, i + 1, "0", record.get(0))?);
    }
    Ok(values)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_one_value_per_line() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("s.csv");
        std::fs::write(&path, "12\n7.5\n1e3\n").unwrap();
        assert_eq!(read_series(&path).unwrap(), vec![12.0, 7.5, 1000.0]);
    }

    #[test]
    fn empty_file_is_empty_series() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("s.csv");
        std::fs::write(&path, "").unwrap();
        assert!(read_series(&path).unwrap().is_empty());
    }

    #[test]
    fn garbage_is_malformed() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("s.csv");
        std::fs::write(&path, "1\nfoo\n").unwrap();
        let err = read_series(&path).unwrap_err();
        assert!(err.to_string().contains("row 2"));
    }

    #[test]
    fn missing_file() {
        let err = read_series(Path::new("/nonexistent/series.csv")).unwrap_err();
        assert!(matches!(err, DataError::MissingFile { .. }));
    }

    #[cfg(unix)]
    #[test]
    fn path_through_a_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("plain.csv");
        std::fs::write(&file, "1\n").unwrap();
        let err = read_series(&file.join("inner.csv")).unwrap_err();
        assert!(matches!(err, DataError::Io { .. }), "got {err}");
    }

    #[test]
    fn directory_is_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = read_series(dir.path()).unwrap_err();
        assert!(matches!(err, DataError::MissingFile { .. }));
    }
}
