//! Cross-file means: one [`MeansRow`] per evolution-run file.

use std::path::PathBuf;

use anyhow::{Context, Result};
use fitlab_core::{MeansRow, MeansTable, RngSource};
use rand::Rng;
use tracing::{debug, info};

use crate::bootstrap::{bootstrap_values, BootstrapConfig};
use crate::data_loader::load_series;
use crate::error::StatsError;
use crate::stats::mean;

/// Confidence level of the percentile interval.
pub const CI_LEVEL: f64 = 0.95;

/// Mean, bootstrap std error and 95% percentile interval of one series.
pub fn summarize_series<R: Rng + ?Sized>(
    p: f64,
    values: &[f64],
    config: &BootstrapConfig,
    rng: &mut R,
) -> Result<MeansRow, StatsError> {
    let estimate = bootstrap_values(values, config, rng)
        .map_err(|e| match e {
            StatsError::EmptyGroup(_) => StatsError::EmptyGroup(format!("no values for p = {p}")),
            other => other,
        })?;
    let (ci_lower, ci_upper) = estimate.percentile_interval(CI_LEVEL);
    Ok(MeansRow {
        p,
        mean: mean(values),
        std_error: estimate.std_error,
        ci_lower,
        ci_upper,
    })
}

/// Summarise the series in `values` against their probabilities.
///
/// Series `i` resamples from `rngs.rng_for(scope, i)`.
pub fn means_table(
    values: &[Vec<f64>],
    probabilities: &[f64],
    config: &BootstrapConfig,
    rngs: &RngSource,
    scope: &str,
) -> Result<MeansTable, StatsError> {
    if values.len() != probabilities.len() {
        return Err(StatsError::LengthMismatch {
            left: probabilities.len(),
            right: values.len(),
        });
    }
    let mut rows = Vec::with_capacity(values.len());
    for (i, (series, &p)) in values.iter().zip(probabilities).enumerate() {
        let mut rng = rngs.rng_for(scope, i as u64);
        let row = summarize_series(p, series, config, &mut rng)?;
        debug!(scope, p, n = series.len(), mean = row.mean, "series summarised");
        rows.push(row);
    }
    Ok(MeansTable::new(rows))
}

/// Read each file and summarise it against the matching probability.
pub fn compute_means(
    paths: &[PathBuf],
    probabilities: &[f64],
    config: &BootstrapConfig,
    rngs: &RngSource,
    scope: &str,
) -> Result<MeansTable> {
    if paths.len() != probabilities.len() {
        return Err(StatsError::LengthMismatch {
            left: probabilities.len(),
            right: paths.len(),
        }
        .into());
    }
    let loaded = load_series(paths)?;
    let table = means_table(&loaded.series, probabilities, config, rngs, scope)
        .with_context(|| format!("summarise {scope}"))?;
    info!(scope, files = paths.len(), "means table computed");
    Ok(table)
}
