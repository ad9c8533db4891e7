//! fitlab core: domain types, readers, RNG hierarchy, palette, figure model, config.
//!
//! This crate holds everything the statistics and rendering crates share:
//! - Domain types (sample rows, datasets, summary and means tables)
//! - CSV readers for mutation datasets, evolution series and h(m) tables
//! - Deterministic RNG hierarchy for bootstrap streams
//! - Named colour palette and the renderer-agnostic figure model
//! - TOML figure configuration

pub mod config;
pub mod data;
pub mod domain;
pub mod figure;
pub mod palette;
pub mod rng;

pub use config::{
    CacheMode, ConfigError, ContextConfig, EmptyGroupPolicy, Fig6Config, FigS1Config,
    FigureConfig, GeneSeriesConfig, PlotStyle, SmoothFitConfig,
};
pub use data::DataError;
pub use domain::{
    Column, Dataset, DatasetId, MeansRow, MeansTable, SampleRow, Stat, SummaryRow, SummaryTable,
    TableError,
};
pub use figure::{ErrorBounds, Figure, LineKind, Marker, Point, Series};
pub use palette::Rgb;
pub use rng::{RngHierarchy, RngSource};

#[cfg(test)]
mod tests {
    use super::*;

    #[allow(dead_code)]
    fn assert_send_sync() {
        fn require_send<T: Send>() {}
        fn require_sync<T: Sync>() {}

        require_send::<Dataset>();
        require_sync::<Dataset>();
        require_send::<SummaryTable>();
        require_sync::<SummaryTable>();
        require_send::<MeansTable>();
        require_sync::<MeansTable>();
        require_send::<Figure>();
        require_sync::<Figure>();
        require_send::<FigureConfig>();
        require_sync::<FigureConfig>();
        require_send::<RngSource>();
        require_sync::<RngSource>();
    }
}
