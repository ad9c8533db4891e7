use std::path::PathBuf;
use thiserror::Error;

/// Errors from reading simulation output.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("missing input file: {}", path.display())]
    MissingFile { path: PathBuf },

    #[error("{}: row {row}, column '{column}': {reason}", path.display())]
    MalformedRow {
        path: PathBuf,
        /// 1-based data row; 0 refers to the header.
        row: usize,
        column: String,
        reason: String,
    },

    #[error("{}: {source}", path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("{}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl DataError {
    pub(crate) fn malformed(
        path: &std::path::Path,
        row: usize,
        column: &str,
        reason: impl Into<String>,
    ) -> Self {
        DataError::MalformedRow {
            path: path.to_path_buf(),
            row,
            column: column.to_string(),
            reason: reason.into(),
        }
    }

    pub(crate) fn csv(path: &std::path::Path, source: csv::Error) -> Self {
        DataError::Csv {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// Open `path` for reading. A missing path or a directory is `MissingFile`;
/// any other failure is `Io`.
pub(crate) fn open_file(path: &std::path::Path) -> Result<std::fs::File, DataError> {
    let file = std::fs::File::open(path).map_err(|source| match source.kind() {
        std::io::ErrorKind::NotFound => DataError::MissingFile {
            path: path.to_path_buf(),
        },
        _ => DataError::Io {
            path: path.to_path_buf(),
            source,
        },
    })?;
    require_file(path)?;
    Ok(file)
}

/// Fail with `MissingFile` unless `path` is a regular file.
pub(crate) fn require_file(path: &std::path::Path) -> Result<(), DataError> {
    if path.is_file() {
        Ok(())
    } else {
        Err(DataError::MissingFile {
            path: path.to_path_buf(),
        })
    }
}

/// Parse one numeric field. Empty, non-numeric and non-finite values are malformed.
pub(crate) fn parse_field(
    path: &std::path::Path,
    row: usize,
    column: &str,
    raw: Option<&str>,
) -> Result<f64, DataError> {
    let raw = match raw {
        Some(s) if !s.trim().is_empty() => s.trim(),
        _ => return Err(DataError::malformed(path, row, column, "field is empty")),
    };
    let value: f64 = raw
        .parse()
        .map_err(|_| DataError::malformed(path, row, column, format!("not a number: '{raw}'")))?;
    if !value.is_finite() {
        return Err(DataError::malformed(
            path,
            row,
            column,
            format!("not finite: '{raw}'"),
        ));
    }
    Ok(value)
}
