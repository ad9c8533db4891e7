//! Hamming-distance aggregation.
//!
//! Partitions a dataset by distance from the fit genome and reduces each group
//! to a [`SummaryRow`]: bootstrapped standard errors for proportion fit,
//! fitness-per-state and fitness-per-fit-state, their direct means and
//! population standard deviations, and the fraction of exhaustive searches.

use fitlab_core::domain::ids::{genome_bits, MAX_GENE_COUNT};
use fitlab_core::{
    Column, Dataset, EmptyGroupPolicy, RngSource, SampleRow, Stat, SummaryRow, SummaryTable,
};
use tracing::{debug, info};

use crate::bootstrap::{bootstrap_columns, BootstrapConfig, BootstrapEstimate};
use crate::error::StatsError;
use crate::stats::{mean, population_std};

const TARGETS: [Column; 3] = [
    Column::ProportionFit,
    Column::FitPerState,
    Column::FitPerFitState,
];

/// Largest distance summarised for `gene_count` genes: half the genome length.
pub fn max_hamming_distance(gene_count: u32) -> u32 {
    genome_bits(gene_count) / 2
}

#[derive(Debug, Clone, Copy, Default)]
pub struct AggregateOptions {
    pub bootstrap: BootstrapConfig,
    pub empty_groups: EmptyGroupPolicy,
}

/// Summarise a dataset into one row per distance `0..=max_hamming_distance`.
///
/// Row 0 is the fixed boundary row. Distance `h` draws its resamples from
/// `rngs.rng_for(dataset id, h)`.
pub fn summarize_by_hamming(
    dataset: &Dataset,
    options: &AggregateOptions,
    rngs: &RngSource,
) -> Result<SummaryTable, StatsError> {
    if dataset.id.gene_count > MAX_GENE_COUNT {
        return Err(StatsError::GeneCountTooLarge(dataset.id.gene_count));
    }
    let max = max_hamming_distance(dataset.id.gene_count);
    let mut groups: Vec<Vec<&SampleRow>> = vec![Vec::new(); max as usize + 1];
    let mut ignored = 0usize;
    for row in dataset.rows() {
        match groups.get_mut(row.hamming_distance as usize) {
            Some(group) if row.hamming_distance > 0 => group.push(row),
            _ => ignored += 1,
        }
    }
    if ignored > 0 {
        debug!(dataset = %dataset.id, ignored, max, "rows outside 1..=max distance ignored");
    }

    let scope = dataset.id.to_string();
    let mut rows = Vec::with_capacity(groups.len());
    rows.push(SummaryRow::boundary());
    for (h, group) in groups.iter().enumerate().skip(1) {
        let distance = h as u32;
        if group.is_empty() {
            match options.empty_groups {
                EmptyGroupPolicy::Fail => {
                    return Err(StatsError::EmptyGroup(format!(
                        "{} has no samples at Hamming distance {distance}",
                        dataset.id
                    )))
                }
                EmptyGroupPolicy::Zero => {
                    debug!(dataset = %dataset.id, distance, "empty group, zero row");
                    rows.push(SummaryRow::zeroed(distance));
                    continue;
                }
            }
        }

        let mut rng = rngs.rng_for(&scope, h as u64);
        let estimates = bootstrap_columns(group, &TARGETS, &options.bootstrap, &mut rng)?;
        let row = summarize_group(distance, group, &estimates);
        debug!(
            dataset = %dataset.id,
            distance,
            samples = group.len(),
            proportion_fit = row.proportion_fit.mean,
            "summarised distance"
        );
        rows.push(row);
    }

    info!(dataset = %dataset.id, rows = rows.len(), "summary table computed");
    Ok(SummaryTable::new(dataset.id.clone(), rows))
}

fn summarize_group(
    distance: u32,
    group: &[&SampleRow],
    estimates: &[BootstrapEstimate],
) -> SummaryRow {
    let stat = |c: usize| {
        let values: Vec<f64> = group.iter().map(|r| r.value(TARGETS[c])).collect();
        Stat {
            mean: mean(&values),
            std_error: estimates[c].std_error,
            std_dev: population_std(&values),
        }
    };
    let exhaustive: Vec<f64> = group.iter().map(|r| r.value(Column::Exhaustive)).collect();
    SummaryRow {
        distance,
        proportion_fit: stat(0),
        fit_per_state: stat(1),
        fit_per_fit_state: stat(2),
        exhaustive_fraction: mean(&exhaustive),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fitlab_core::DatasetId;

    fn sample(h: u32, proportion: f64, exhaustive: bool) -> SampleRow {
        SampleRow::new(h, 2.0, 4.0, proportion, exhaustive, 3.0, 0.75)
    }

    /// Two samples at every distance `1..=max` for `gene_count`.
    fn full_dataset(gene_count: u32) -> Dataset {
        let max = max_hamming_distance(gene_count);
        let rows = (1..=max)
            .flat_map(|h| [sample(h, 0.5, true), sample(h, 0.25, false)])
            .collect();
        Dataset::new(DatasetId::new(gene_count, "ff4"), rows)
    }

    fn seeded() -> RngSource {
        RngSource::from_seed(Some(42))
    }

    #[test]
    fn max_distance_is_half_genome() {
        assert_eq!(max_hamming_distance(4), 16);
        assert_eq!(max_hamming_distance(5), 40);
        assert_eq!(max_hamming_distance(6), 96);
    }

    #[test]
    fn oversized_gene_count_is_rejected() {
        let ds = Dataset::new(DatasetId::new(40, "ff4"), vec![sample(1, 0.5, true)]);
        let err = summarize_by_hamming(&ds, &AggregateOptions::default(), &seeded()).unwrap_err();
        assert_eq!(err, StatsError::GeneCountTooLarge(40));
    }

    #[test]
    fn rows_are_contiguous_with_boundary_first() {
        let table =
            summarize_by_hamming(&full_dataset(4), &AggregateOptions::default(), &seeded())
                .unwrap();
        assert_eq!(table.rows.len(), 17);
        assert_eq!(table.rows[0], SummaryRow::boundary());
        for (i, row) in table.rows.iter().enumerate() {
            assert_eq!(row.distance as usize, i);
        }
    }

    #[test]
    fn group_statistics() {
        let table =
            summarize_by_hamming(&full_dataset(4), &AggregateOptions::default(), &seeded())
                .unwrap();
        let row = &table.rows[3];
        assert!((row.proportion_fit.mean - 0.375).abs() < 1e-12);
        assert!((row.proportion_fit.std_dev - 0.125).abs() < 1e-12);
        assert!(row.proportion_fit.std_error > 0.0);
        assert!((row.exhaustive_fraction - 0.5).abs() < 1e-12);
        // Identical per-row values bootstrap to zero error.
        assert!((row.fit_per_fit_state.mean - 1.5).abs() < 1e-12);
        assert_eq!(row.fit_per_fit_state.std_error, 0.0);
        assert_eq!(row.fit_per_state.std_dev, 0.0);
    }

    #[test]
    fn gap_fails_by_default() {
        let mut ds = full_dataset(4);
        let rows: Vec<SampleRow> = ds
            .rows()
            .iter()
            .filter(|r| r.hamming_distance != 7)
            .cloned()
            .collect();
        ds = Dataset::new(ds.id.clone(), rows);
        let err = summarize_by_hamming(&ds, &AggregateOptions::default(), &seeded()).unwrap_err();
        match err {
            StatsError::EmptyGroup(msg) => assert!(msg.contains("distance 7")),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn gap_with_zero_policy_yields_zero_row() {
        let ds = full_dataset(4);
        let rows: Vec<SampleRow> = ds
            .rows()
            .iter()
            .filter(|r| r.hamming_distance != 7)
            .cloned()
            .collect();
        let ds = Dataset::new(ds.id.clone(), rows);
        let opts = AggregateOptions {
            empty_groups: EmptyGroupPolicy::Zero,
            ..AggregateOptions::default()
        };
        let table = summarize_by_hamming(&ds, &opts, &seeded()).unwrap();
        assert_eq!(table.rows[7], SummaryRow::zeroed(7));
        assert_eq!(table.rows.len(), 17);
    }

    #[test]
    fn out_of_range_rows_are_ignored() {
        let ds = full_dataset(4);
        let mut rows = ds.rows().to_vec();
        rows.push(sample(0, 0.0, false));
        rows.push(sample(40, 0.0, false));
        let with_extra = Dataset::new(ds.id.clone(), rows);
        let a = summarize_by_hamming(&ds, &AggregateOptions::default(), &seeded()).unwrap();
        let b =
            summarize_by_hamming(&with_extra, &AggregateOptions::default(), &seeded()).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn seeded_runs_are_reproducible() {
        let ds = full_dataset(5);
        let opts = AggregateOptions::default();
        let a = summarize_by_hamming(&ds, &opts, &seeded()).unwrap();
        let b = summarize_by_hamming(&ds, &opts, &seeded()).unwrap();
        assert_eq!(a, b);
    }
}
