//! Histograms of log-transformed series.

use crate::error::StatsError;

/// Counts of `ln(value)` over evenly spaced edges from 0 to the largest log
/// value. Bins are half-open except the last, which includes its right edge.
#[derive(Debug, Clone, PartialEq)]
pub struct LogHistogram {
    pub edges: Vec<f64>,
    pub counts: Vec<u64>,
}

impl LogHistogram {
    /// Build from raw values with `n_edges` edges (`n_edges - 1` bins).
    pub fn from_values(values: &[f64], n_edges: usize) -> Result<Self, StatsError> {
        if values.is_empty() {
            return Err(StatsError::EmptyGroup("no values to histogram".into()));
        }
        if n_edges < 2 {
            return Err(StatsError::DegenerateRange(format!(
                "{n_edges} edges give no bins"
            )));
        }

        let mut logs = Vec::with_capacity(values.len());
        for (index, &value) in values.iter().enumerate() {
            if !(value > 0.0) {
                return Err(StatsError::NonPositiveValue { index, value });
            }
            logs.push(value.ln());
        }

        let max = logs.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
        if !(max > 0.0) || !max.is_finite() {
            return Err(StatsError::DegenerateRange(format!(
                "largest log value {max} leaves no range above 0"
            )));
        }

        let edges = linspace(0.0, max, n_edges);
        let n_bins = n_edges - 1;
        let mut counts = vec![0u64; n_bins];
        for v in logs {
            if v < 0.0 || v > max {
                continue;
            }
            // Index of the last edge <= v; the right edge falls into the last bin.
            let bin = edges.partition_point(|e| *e <= v).saturating_sub(1).min(n_bins - 1);
            counts[bin] += 1;
        }

        Ok(Self { edges, counts })
    }

    pub fn total(&self) -> u64 {
        self.counts.iter().sum()
    }

    /// `(left edge, ln(count))` for every non-empty bin.
    pub fn log_points(&self) -> Vec<(f64, f64)> {
        self.counts
            .iter()
            .zip(&self.edges)
            .filter(|(c, _)| **c > 0)
            .map(|(c, e)| (*e, (*c as f64).ln()))
            .collect()
    }
}

/// `n` evenly spaced values from `start` to `end` inclusive.
fn linspace(start: f64, end: f64, n: usize) -> Vec<f64> {
    let step = (end - start) / (n - 1) as f64;
    let mut v: Vec<f64> = (0..n).map(|i| start + i as f64 * step).collect();
    v[n - 1] = end;
    v
}
