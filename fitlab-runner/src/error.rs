use thiserror::Error;

/// Errors from the statistics layer.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum StatsError {
    #[error("empty group: {0}")]
    EmptyGroup(String),

    #[error("bootstrap needs at least one resample")]
    NoResamples,

    #[error("non-positive value {value} at index {index}")]
    NonPositiveValue { index: usize, value: f64 },

    #[error("length mismatch: {left} x values, {right} y values")]
    LengthMismatch { left: usize, right: usize },

    #[error("need at least 2 points in the fit range, got {0}")]
    TooFewPoints(usize),

    #[error("gene count {0} exceeds the supported maximum of {max}", max = fitlab_core::domain::ids::MAX_GENE_COUNT)]
    GeneCountTooLarge(u32),

    #[error("degenerate range: {0}")]
    DegenerateRange(String),
}
