//! Means rows: per-probability summaries across evolution-run files.

use serde::{Deserialize, Serialize};

use super::TableError;

/// Mean and bootstrap interval of one evolution-run file.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MeansRow {
    /// Mutation probability the file was produced with.
    pub p: f64,
    pub mean: f64,
    pub std_error: f64,
    pub ci_lower: f64,
    pub ci_upper: f64,
}

impl MeansRow {
    pub const WIDTH: usize = 5;

    pub fn to_values(&self) -> [f64; Self::WIDTH] {
        [self.p, self.mean, self.std_error, self.ci_lower, self.ci_upper]
    }

    pub fn from_values(row: usize, values: &[f64]) -> Result<Self, TableError> {
        match values {
            &[p, mean, std_error, ci_lower, ci_upper] => Ok(Self {
                p,
                mean,
                std_error,
                ci_lower,
                ci_upper,
            }),
            _ => Err(TableError::WrongWidth {
                row,
                expected: Self::WIDTH,
                found: values.len(),
            }),
        }
    }
}

/// Means rows for one context count, in input order.
#[derive(Debug, Clone, PartialEq)]
pub struct MeansTable {
    pub rows: Vec<MeansRow>,
}

impl MeansTable {
    pub fn new(rows: Vec<MeansRow>) -> Self {
        Self { rows }
    }

    pub fn probabilities(&self) -> Vec<f64> {
        self.rows.iter().map(|r| r.p).collect()
    }

    pub fn means(&self) -> Vec<f64> {
        self.rows.iter().map(|r| r.mean).collect()
    }

    pub fn to_matrix(&self) -> Vec<Vec<f64>> {
        self.rows.iter().map(|r| r.to_values().to_vec()).collect()
    }

    pub fn from_matrix(matrix: &[Vec<f64>]) -> Result<Self, TableError> {
        let rows = matrix
            .iter()
            .enumerate()
            .map(|(i, v)| MeansRow::from_values(i, v))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { rows })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matrix_columns_are_p_mean_se_lower_upper() {
        let table = MeansTable::new(vec![MeansRow {
            p: 0.05,
            mean: 1200.0,
            std_error: 40.0,
            ci_lower: 1130.0,
            ci_upper: 1290.0,
        }]);
        let m = table.to_matrix();
        assert_eq!(m, vec![vec![0.05, 1200.0, 40.0, 1130.0, 1290.0]]);
        assert_eq!(MeansTable::from_matrix(&m).unwrap(), table);
    }

    #[test]
    fn wrong_width_is_rejected() {
        assert!(MeansTable::from_matrix(&[vec![0.1, 2.0]]).is_err());
    }
}
