//! fitlab runner: statistics, caching and figure pipelines.
//!
//! This crate builds on `fitlab-core` to provide:
//! - Bootstrap estimation of means and percentile intervals
//! - Per-Hamming-distance summary tables
//! - Cross-file means for evolution runs
//! - Exponential trend fitting and log histograms
//! - Input loading with BLAKE3 fingerprints and a flat-file table cache
//! - Figure pipelines that assemble renderer-agnostic figures

pub mod aggregate;
pub mod bootstrap;
pub mod cache;
pub mod data_loader;
pub mod error;
pub mod figures;
pub mod histogram;
pub mod means;
pub mod stats;
pub mod trend;

pub use aggregate::{max_hamming_distance, summarize_by_hamming, AggregateOptions};
pub use bootstrap::{
    bootstrap_column, bootstrap_columns, bootstrap_values, BootstrapConfig, BootstrapEstimate,
};
pub use cache::{CacheMeta, TableCache};
pub use data_loader::{hash_inputs, load_dataset, load_series, LoadError, LoadedDataset, LoadedSeries};
pub use error::StatsError;
pub use figures::{FigureKind, Pipeline};
pub use histogram::LogHistogram;
pub use means::{compute_means, means_table, summarize_series};
pub use trend::{fit_exponential, ExponentialFit};

#[cfg(test)]
mod send_sync_checks {
    use super::*;

    fn assert_send<T: Send>() {}
    fn assert_sync<T: Sync>() {}

    #[test]
    fn estimates_are_send_sync() {
        assert_send::<BootstrapEstimate>();
        assert_sync::<BootstrapEstimate>();
        assert_send::<ExponentialFit>();
        assert_sync::<ExponentialFit>();
        assert_send::<LogHistogram>();
        assert_sync::<LogHistogram>();
    }

    #[test]
    fn errors_are_send_sync() {
        assert_send::<StatsError>();
        assert_sync::<StatsError>();
        assert_send::<LoadError>();
        assert_sync::<LoadError>();
    }

    #[test]
    fn pipeline_is_send_sync() {
        assert_send::<Pipeline>();
        assert_sync::<Pipeline>();
        assert_send::<TableCache>();
        assert_sync::<TableCache>();
    }
}
