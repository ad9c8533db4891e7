//! Sample rows: one measurement of mutants at a single Hamming distance.

use serde::{Deserialize, Serialize};

use super::ids::DatasetId;

/// One measurement at a given Hamming distance from the fit genome.
///
/// All states measured for the row share the same distance. `sampled` is
/// either every state at that distance (`exhaustive`) or a sample of them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SampleRow {
    pub hamming_distance: u32,
    /// States with fitness > 0.
    pub num_fit: f64,
    pub sampled_states: f64,
    /// `num_fit / sampled_states`, 0 when nothing was sampled.
    pub proportion_fit: f64,
    pub exhaustive: bool,
    /// Summed fitness over all fit states.
    pub total_fit: f64,
    /// `total_fit / sampled_states`.
    pub fit_per_state: f64,
    /// `total_fit / num_fit`, 0 when no state was fit.
    pub fit_per_fit_state: f64,
}

impl SampleRow {
    /// Build a row, deriving `fit_per_fit_state`.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        hamming_distance: u32,
        num_fit: f64,
        sampled_states: f64,
        proportion_fit: f64,
        exhaustive: bool,
        total_fit: f64,
        fit_per_state: f64,
    ) -> Self {
        let fit_per_fit_state = if num_fit > 0.0 {
            total_fit / num_fit
        } else {
            0.0
        };
        Self {
            hamming_distance,
            num_fit,
            sampled_states,
            proportion_fit,
            exhaustive,
            total_fit,
            fit_per_state,
            fit_per_fit_state,
        }
    }

    /// Numeric value of a column. The exhaustive flag reads as 0 or 1.
    pub fn value(&self, column: Column) -> f64 {
        match column {
            Column::HammingDistance => self.hamming_distance as f64,
            Column::NumFit => self.num_fit,
            Column::SampledStates => self.sampled_states,
            Column::ProportionFit => self.proportion_fit,
            Column::Exhaustive => {
                if self.exhaustive {
                    1.0
                } else {
                    0.0
                }
            }
            Column::TotalFit => self.total_fit,
            Column::FitPerState => self.fit_per_state,
            Column::FitPerFitState => self.fit_per_fit_state,
        }
    }
}

/// Columns of a sample row, in file order plus the derived column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Column {
    HammingDistance,
    NumFit,
    SampledStates,
    ProportionFit,
    Exhaustive,
    TotalFit,
    FitPerState,
    FitPerFitState,
}

impl Column {
    /// CSV header name. The derived column has none.
    pub fn header(self) -> Option<&'static str> {
        match self {
            Column::HammingDistance => Some("HammingDist"),
            Column::NumFit => Some("NumFit"),
            Column::SampledStates => Some("SampledStates"),
            Column::ProportionFit => Some("ProportionFit"),
            Column::Exhaustive => Some("ExhaustiveSearch"),
            Column::TotalFit => Some("TotalFit"),
            Column::FitPerState => Some("FitPerState"),
            Column::FitPerFitState => None,
        }
    }
}

/// All rows read for one dataset, in file order.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    pub id: DatasetId,
    rows: Vec<SampleRow>,
}

impl Dataset {
    pub fn new(id: DatasetId, rows: Vec<SampleRow>) -> Self {
        Self { id, rows }
    }

    pub fn rows(&self) -> &[SampleRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Rows at exactly `distance`.
    pub fn at_distance(&self, distance: u32) -> Vec<&SampleRow> {
        self.rows
            .iter()
            .filter(|r| r.hamming_distance == distance)
            .collect()
    }
}
