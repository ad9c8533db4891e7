//! Nonparametric bootstrap of the mean.
//!
//! Each resample draws `n` indices uniformly from `[0, n)` with replacement
//! and records the mean of the selected values. The standard error is the
//! square root of the population variance of those resample means. Several
//! columns of the same rows can be resampled together so that one draw of
//! indices serves every column.

use fitlab_core::{Column, SampleRow};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::StatsError;
use crate::stats::{mean, percentile_sorted, population_std, sort_ascending};

// ─── Configuration ───────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BootstrapConfig {
    /// Number of bootstrap resamples (default 1000).
    pub n_resamples: usize,
}

impl Default for BootstrapConfig {
    fn default() -> Self {
        Self { n_resamples: 1000 }
    }
}

// ─── Result ──────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub struct BootstrapEstimate {
    /// Mean of the resample means.
    pub mean: f64,
    /// Population standard deviation of the resample means.
    pub std_error: f64,
    /// Resample means in ascending order.
    pub resample_means: Vec<f64>,
}

impl BootstrapEstimate {
    fn from_means(mut resample_means: Vec<f64>) -> Self {
        sort_ascending(&mut resample_means);
        Self {
            mean: mean(&resample_means),
            std_error: population_std(&resample_means),
            resample_means,
        }
    }

    /// Percentile `p` (0..=100) of the resample means.
    pub fn percentile(&self, p: f64) -> f64 {
        percentile_sorted(&self.resample_means, p)
    }

    /// Two-sided percentile interval at `level` (0.95 gives 2.5th..97.5th).
    pub fn percentile_interval(&self, level: f64) -> (f64, f64) {
        let tail = (1.0 - level.clamp(0.0, 1.0)) * 50.0;
        (self.percentile(tail), self.percentile(100.0 - tail))
    }
}

// ─── Estimators ──────────────────────────────────────────────────────

/// Bootstrap the mean of a plain series.
pub fn bootstrap_values<R: Rng + ?Sized>(
    values: &[f64],
    config: &BootstrapConfig,
    rng: &mut R,
) -> Result<BootstrapEstimate, StatsError> {
    let mut estimates = resample(values.len(), 1, config, rng, |i, _| values[i])?;
    Ok(estimates.remove(0))
}

/// Bootstrap the mean of one column of a group of rows.
pub fn bootstrap_column<R: Rng + ?Sized>(
    rows: &[&SampleRow],
    column: Column,
    config: &BootstrapConfig,
    rng: &mut R,
) -> Result<BootstrapEstimate, StatsError> {
    let mut estimates = bootstrap_columns(rows, &[column], config, rng)?;
    Ok(estimates.remove(0))
}

/// Bootstrap several columns with shared resample indices.
///
/// Estimates are returned in the order of `columns`.
pub fn bootstrap_columns<R: Rng + ?Sized>(
    rows: &[&SampleRow],
    columns: &[Column],
    config: &BootstrapConfig,
    rng: &mut R,
) -> Result<Vec<BootstrapEstimate>, StatsError> {
    resample(rows.len(), columns.len(), config, rng, |i, c| {
        rows[i].value(columns[c])
    })
}

fn resample<R, F>(
    n: usize,
    width: usize,
    config: &BootstrapConfig,
    rng: &mut R,
    value: F,
) -> Result<Vec<BootstrapEstimate>, StatsError>
where
    R: Rng + ?Sized,
    F: Fn(usize, usize) -> f64,
{
    if n == 0 {
        return Err(StatsError::EmptyGroup("no values to resample".into()));
    }
    if config.n_resamples == 0 {
        return Err(StatsError::NoResamples);
    }

    let mut means = vec![Vec::with_capacity(config.n_resamples); width];
    let mut sums = vec![0.0; width];
    for _ in 0..config.n_resamples {
        sums.iter_mut().for_each(|s| *s = 0.0);
        for _ in 0..n {
            let i = rng.gen_range(0..n);
            for (c, sum) in sums.iter_mut().enumerate() {
                *sum += value(i, c);
            }
        }
        for (col_means, sum) in means.iter_mut().zip(&sums) {
            col_means.push(sum / n as f64);
        }
    }

    Ok(means.into_iter().map(BootstrapEstimate::from_means).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use fitlab_core::SampleRow;
    use proptest::prelude::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn row(proportion: f64, total_fit: f64, num_fit: f64) -> SampleRow {
        SampleRow::new(1, num_fit, 10.0, proportion, false, total_fit, total_fit / 10.0)
    }

    #[test]
    fn uniform_input_has_zero_error() {
        let mut rng = StdRng::seed_from_u64(1);
        let est = bootstrap_values(&[0.5; 20], &BootstrapConfig::default(), &mut rng).unwrap();
        assert!((est.mean - 0.5).abs() < 1e-12);
        assert_eq!(est.std_error, 0.0);
        assert_eq!(est.resample_means.len(), 1000);
    }

    #[test]
    fn single_value_group() {
        let mut rng = StdRng::seed_from_u64(2);
        let est = bootstrap_values(&[3.25], &BootstrapConfig::default(), &mut rng).unwrap();
        assert_eq!(est.mean, 3.25);
        assert_eq!(est.std_error, 0.0);
    }

    #[test]
    fn std_error_tracks_analytic_value() {
        // 9 zeros and a one: sigma = 0.3, analytic SE = 0.3 / sqrt(10) ~ 0.0949
        let mut values = vec![0.0; 9];
        values.push(1.0);
        let mut rng = StdRng::seed_from_u64(7);
        let est = bootstrap_values(&values, &BootstrapConfig::default(), &mut rng).unwrap();
        let analytic = 0.3 / 10f64.sqrt();
        assert!(est.std_error > analytic / 3.0 && est.std_error < analytic * 3.0);
        assert!((est.mean - 0.1).abs() < 0.03);
    }

    #[test]
    fn empty_input_is_rejected() {
        let mut rng = StdRng::seed_from_u64(0);
        let err = bootstrap_values(&[], &BootstrapConfig::default(), &mut rng).unwrap_err();
        assert!(matches!(err, StatsError::EmptyGroup(_)));
    }

    #[test]
    fn zero_resamples_is_rejected() {
        let mut rng = StdRng::seed_from_u64(0);
        let cfg = BootstrapConfig { n_resamples: 0 };
        assert_eq!(
            bootstrap_values(&[1.0], &cfg, &mut rng).unwrap_err(),
            StatsError::NoResamples
        );
    }

    #[test]
    fn same_seed_same_estimate() {
        let values: Vec<f64> = (0..50).map(|i| (i % 7) as f64).collect();
        let cfg = BootstrapConfig { n_resamples: 200 };
        let a = bootstrap_values(&values, &cfg, &mut StdRng::seed_from_u64(11)).unwrap();
        let b = bootstrap_values(&values, &cfg, &mut StdRng::seed_from_u64(11)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn shared_indices_keep_columns_consistent() {
        // Proportion fit and total fit are equal per row, so every resample
        // mean must match across the two columns.
        let rows: Vec<SampleRow> = (0..12).map(|i| row(i as f64, i as f64, 1.0)).collect();
        let refs: Vec<&SampleRow> = rows.iter().collect();
        let mut rng = StdRng::seed_from_u64(5);
        let est = bootstrap_columns(
            &refs,
            &[Column::ProportionFit, Column::TotalFit],
            &BootstrapConfig { n_resamples: 100 },
            &mut rng,
        )
        .unwrap();
        assert_eq!(est[0].resample_means, est[1].resample_means);
    }

    #[test]
    fn column_estimate_reads_requested_column() {
        let rows = [row(0.2, 4.0, 2.0), row(0.2, 4.0, 2.0)];
        let refs: Vec<&SampleRow> = rows.iter().collect();
        let mut rng = StdRng::seed_from_u64(3);
        let est = bootstrap_column(
            &refs,
            Column::FitPerFitState,
            &BootstrapConfig::default(),
            &mut rng,
        )
        .unwrap();
        assert!((est.mean - 2.0).abs() < 1e-12);
    }

    #[test]
    fn interval_of_constant_series_has_zero_width() {
        let mut rng = StdRng::seed_from_u64(9);
        let est = bootstrap_values(&[4.0; 8], &BootstrapConfig::default(), &mut rng).unwrap();
        assert_eq!(est.percentile_interval(0.95), (4.0, 4.0));
    }

    proptest! {
        #[test]
        fn resample_means_lie_within_data_range(
            values in prop::collection::vec(-1000.0f64..1000.0, 1..40),
            seed in any::<u64>(),
        ) {
            let mut rng = StdRng::seed_from_u64(seed);
            let est = bootstrap_values(&values, &BootstrapConfig { n_resamples: 50 }, &mut rng).unwrap();
            let lo = values.iter().cloned().fold(f64::INFINITY, f64::min);
            let hi = values.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
            prop_assert!(est.std_error >= 0.0);
            prop_assert!(est.resample_means.windows(2).all(|w| w[0] <= w[1]));
            for m in &est.resample_means {
                prop_assert!(*m >= lo - 1e-9 && *m <= hi + 1e-9);
            }
            let (l, u) = est.percentile_interval(0.95);
            prop_assert!(l <= u);
        }
    }
}
