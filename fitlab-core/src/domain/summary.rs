//! Summary rows: per-Hamming-distance aggregates of a dataset.

use serde::{Deserialize, Serialize};

use super::ids::DatasetId;
use super::TableError;

/// Mean, bootstrap standard error and population standard deviation of a column.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Stat {
    pub mean: f64,
    pub std_error: f64,
    pub std_dev: f64,
}

impl Stat {
    /// A value known exactly: no error, no spread.
    pub fn exact(mean: f64) -> Self {
        Self {
            mean,
            std_error: 0.0,
            std_dev: 0.0,
        }
    }
}

/// One aggregated record per distinct Hamming distance.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SummaryRow {
    pub distance: u32,
    pub proportion_fit: Stat,
    pub fit_per_state: Stat,
    pub fit_per_fit_state: Stat,
    /// Fraction of observations at this distance that were exhaustive searches.
    pub exhaustive_fraction: f64,
}

impl SummaryRow {
    /// Number of numeric columns in the serialized form.
    pub const WIDTH: usize = 11;

    /// The fit genome itself: everything fit, no variance.
    pub fn boundary() -> Self {
        Self {
            distance: 0,
            proportion_fit: Stat::exact(1.0),
            fit_per_state: Stat::exact(1.0),
            fit_per_fit_state: Stat::exact(1.0),
            exhaustive_fraction: 1.0,
        }
    }

    /// All statistics zero.
    pub fn zeroed(distance: u32) -> Self {
        Self {
            distance,
            proportion_fit: Stat::default(),
            fit_per_state: Stat::default(),
            fit_per_fit_state: Stat::default(),
            exhaustive_fraction: 0.0,
        }
    }

    /// Column order: distance, then mean/se/sd for proportion fit,
    /// fitness-per-state and fitness-per-fit-state, then exhaustive fraction.
    pub fn to_values(&self) -> [f64; Self::WIDTH] {
        [
            self.distance as f64,
            self.proportion_fit.mean,
            self.proportion_fit.std_error,
            self.proportion_fit.std_dev,
            self.fit_per_state.mean,
            self.fit_per_state.std_error,
            self.fit_per_state.std_dev,
            self.fit_per_fit_state.mean,
            self.fit_per_fit_state.std_error,
            self.fit_per_fit_state.std_dev,
            self.exhaustive_fraction,
        ]
    }

    pub fn from_values(row: usize, values: &[f64]) -> Result<Self, TableError> {
        if values.len() != Self::WIDTH {
            return Err(TableError::WrongWidth {
                row,
                expected: Self::WIDTH,
                found: values.len(),
            });
        }
        let d = values[0];
        if !(d >= 0.0 && d.fract() == 0.0 && d <= u32::MAX as f64) {
            return Err(TableError::BadValue {
                row,
                column: 0,
                value: d,
            });
        }
        let stat = |i: usize| Stat {
            mean: values[i],
            std_error: values[i + 1],
            std_dev: values[i + 2],
        };
        Ok(Self {
            distance: d as u32,
            proportion_fit: stat(1),
            fit_per_state: stat(4),
            fit_per_fit_state: stat(7),
            exhaustive_fraction: values[10],
        })
    }
}

/// Summary rows for one dataset, ordered by increasing distance from 0.
#[derive(Debug, Clone, PartialEq)]
pub struct SummaryTable {
    pub id: DatasetId,
    pub rows: Vec<SummaryRow>,
}

impl SummaryTable {
    pub fn new(id: DatasetId, rows: Vec<SummaryRow>) -> Self {
        Self { id, rows }
    }

    pub fn to_matrix(&self) -> Vec<Vec<f64>> {
        self.rows.iter().map(|r| r.to_values().to_vec()).collect()
    }

    pub fn from_matrix(id: DatasetId, matrix: &[Vec<f64>]) -> Result<Self, TableError> {
        let rows = matrix
            .iter()
            .enumerate()
            .map(|(i, values)| SummaryRow::from_values(i, values))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { id, rows })
    }

    /// Check that the rows cover distances `0..=max_distance` in order.
    pub fn check_distances(&self, max_distance: u32) -> Result<(), TableError> {
        let expected = max_distance as usize + 1;
        if self.rows.len() != expected {
            return Err(TableError::RowCount {
                expected,
                found: self.rows.len(),
            });
        }
        for (i, row) in self.rows.iter().enumerate() {
            if row.distance as usize != i {
                return Err(TableError::DistanceGap {
                    row: i,
                    expected: i as u32,
                    found: row.distance,
                });
            }
        }
        Ok(())
    }

    /// Every `stride`-th row starting from distance 0.
    pub fn strided(&self, stride: usize) -> impl Iterator<Item = &SummaryRow> {
        self.rows.iter().step_by(stride.max(1))
    }
}
