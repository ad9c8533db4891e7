//! Domain types for fitlab

pub mod ids;
pub mod means;
pub mod sample;
pub mod summary;

pub use ids::DatasetId;
pub use means::{MeansRow, MeansTable};
pub use sample::{Column, Dataset, SampleRow};
pub use summary::{Stat, SummaryRow, SummaryTable};


use thiserror::Error;

/// Shape errors when rebuilding tables from flat numeric matrices.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TableError {
    #[error("row {row}: expected {expected} columns, found {found}")]
    WrongWidth {
        row: usize,
        expected: usize,
        found: usize,
    },
    #[error("row {row}, column {column}: invalid value {value}")]
    BadValue { row: usize, column: usize, value: f64 },
    #[error("row {row}: expected distance {expected}, found {found}")]
    DistanceGap { row: usize, expected: u32, found: u32 },
    #[error("expected {expected} rows, found {found}")]
    RowCount { expected: usize, found: usize },
}
