//! Figure pipelines.
//!
//! A [`Pipeline`] owns the configuration, the table cache and the run's
//! randomness. Each figure module adds the methods that load inputs, resolve
//! tables through the cache and assemble renderer-agnostic [`Figure`]s.

pub mod fig6;
pub mod fig_s1;
pub mod smooth_fit;

use std::fmt;
use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};
use fitlab_core::{CacheMode, Figure, FigureConfig, RngSource};
use tracing::info;

use crate::aggregate::AggregateOptions;
use crate::bootstrap::BootstrapConfig;
use crate::cache::TableCache;
use crate::data_loader::hash_inputs;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FigureKind {
    SmoothFit,
    Fig6,
    FigS1,
}

impl FigureKind {
    pub const ALL: [FigureKind; 3] = [FigureKind::SmoothFit, FigureKind::Fig6, FigureKind::FigS1];
}

impl fmt::Display for FigureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            FigureKind::SmoothFit => "smooth-fit",
            FigureKind::Fig6 => "fig6",
            FigureKind::FigS1 => "fig-s1",
        })
    }
}

pub struct Pipeline {
    config: FigureConfig,
    cache: TableCache,
    rngs: RngSource,
}

impl Pipeline {
    pub fn new(config: FigureConfig) -> Result<Self> {
        config.validate().context("invalid figure configuration")?;
        let cache = TableCache::new(&config.cache_dir)?;
        let rngs = RngSource::from_seed(config.seed);
        Ok(Self {
            config,
            cache,
            rngs,
        })
    }

    pub fn config(&self) -> &FigureConfig {
        &self.config
    }

    pub fn cache(&self) -> &TableCache {
        &self.cache
    }

    pub fn build(&self, kind: FigureKind) -> Result<Vec<Figure>> {
        info!(figure = %kind, "building");
        match kind {
            FigureKind::SmoothFit => self.smooth_fit(),
            FigureKind::Fig6 => self.fig6(),
            FigureKind::FigS1 => self.fig_s1(),
        }
    }

    pub(crate) fn rngs(&self) -> &RngSource {
        &self.rngs
    }

    pub(crate) fn bootstrap_config(&self) -> BootstrapConfig {
        BootstrapConfig {
            n_resamples: self.config.n_resamples,
        }
    }

    pub(crate) fn aggregate_options(&self) -> AggregateOptions {
        AggregateOptions {
            bootstrap: self.bootstrap_config(),
            empty_groups: self.config.empty_groups,
        }
    }

    /// BLAKE3 over the input files and the settings that change a computed
    /// table: resample count, empty-group policy and seed.
    pub(crate) fn fingerprint(&self, inputs: &[PathBuf]) -> Result<String> {
        let mut hasher = blake3::Hasher::new();
        hasher.update(hash_inputs(inputs)?.as_bytes());
        let settings = format!(
            "n_resamples={};empty_groups={:?};seed={:?}",
            self.config.n_resamples, self.config.empty_groups, self.config.seed
        );
        hasher.update(settings.as_bytes());
        Ok(hasher.finalize().to_hex().to_string())
    }

    /// Resolve a table through the cache according to the configured mode.
    ///
    /// `inputs` are the files the table is computed from. Their fingerprint,
    /// together with the result-affecting settings, is stored with every write
    /// and checked in `auto` mode.
    pub(crate) fn cached_table<F>(&self, key: &str, inputs: &[PathBuf], compute: F) -> Result<Vec<Vec<f64>>>
    where
        F: FnOnce() -> Result<Vec<Vec<f64>>>,
    {
        match self.config.cache_mode {
            CacheMode::Load => {
                let matrix = self.cache.get_matrix(key)?.ok_or_else(|| {
                    anyhow!(
                        "table '{key}' is not cached in {} (run with --cache recompute)",
                        self.cache.dir().display()
                    )
                })?;
                info!(key, "loaded cached table");
                Ok(matrix)
            }
            CacheMode::Auto => {
                let hash = self.fingerprint(inputs)?;
                if self.cache.is_fresh(key, &hash)? {
                    if let Some(matrix) = self.cache.get_matrix(key)? {
                        info!(key, "cached table is current");
                        return Ok(matrix);
                    }
                }
                info!(key, "cached table missing or stale, recomputing");
                let matrix = compute()?;
                self.cache.put_matrix(key, &matrix, Some(&hash))?;
                Ok(matrix)
            }
            CacheMode::Recompute => {
                let matrix = compute()?;
                let hash = self.fingerprint(inputs)?;
                self.cache.put_matrix(key, &matrix, Some(&hash))?;
                Ok(matrix)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fitlab_core::EmptyGroupPolicy;
    use std::cell::Cell;

    fn pipeline(dir: &std::path::Path, mode: CacheMode) -> Pipeline {
        let config = FigureConfig {
            cache_dir: dir.join("tmp"),
            cache_mode: mode,
            seed: Some(1),
            ..FigureConfig::default()
        };
        Pipeline::new(config).unwrap()
    }

    #[test]
    fn load_mode_requires_cached_table() {
        let dir = tempfile::tempdir().unwrap();
        let p = pipeline(dir.path(), CacheMode::Load);
        let err = p.cached_table("M2", &[], || Ok(vec![vec![1.0]])).unwrap_err();
        assert!(err.to_string().contains("not cached"));

        p.cache().put_matrix("M2", &[vec![4.0]], None).unwrap();
        assert_eq!(p.cached_table("M2", &[], || unreachable!()).unwrap(), vec![vec![4.0]]);
    }

    #[test]
    fn auto_mode_reuses_only_matching_hash() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("in.csv");
        std::fs::write(&input, "1\n").unwrap();
        let inputs = vec![input.clone()];
        let p = pipeline(dir.path(), CacheMode::Auto);
        let calls = Cell::new(0);
        let compute = || {
            calls.set(calls.get() + 1);
            Ok(vec![vec![calls.get() as f64]])
        };

        assert_eq!(p.cached_table("M2", &inputs, compute).unwrap(), vec![vec![1.0]]);
        assert_eq!(p.cached_table("M2", &inputs, compute).unwrap(), vec![vec![1.0]]);
        assert_eq!(calls.get(), 1);

        std::fs::write(&input, "2\n").unwrap();
        assert_eq!(p.cached_table("M2", &inputs, compute).unwrap(), vec![vec![2.0]]);
        assert_eq!(calls.get(), 2);
    }

    #[test]
    fn auto_mode_recomputes_when_settings_change() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("in.csv");
        std::fs::write(&input, "1\n").unwrap();
        let inputs = vec![input];
        let calls = Cell::new(0);
        let compute = || {
            calls.set(calls.get() + 1);
            Ok(vec![vec![calls.get() as f64]])
        };

        let base = pipeline(dir.path(), CacheMode::Auto);
        base.cached_table("M2", &inputs, compute).unwrap();
        assert_eq!(calls.get(), 1);

        let variants = [
            FigureConfig {
                seed: Some(999),
                ..base.config().clone()
            },
            FigureConfig {
                n_resamples: 2000,
                ..base.config().clone()
            },
            FigureConfig {
                empty_groups: EmptyGroupPolicy::Zero,
                ..base.config().clone()
            },
        ];
        for (i, config) in variants.into_iter().enumerate() {
            let p = Pipeline::new(config).unwrap();
            let matrix = p.cached_table("M2", &inputs, compute).unwrap();
            assert_eq!(matrix, vec![vec![(i + 2) as f64]]);
        }
        assert_eq!(calls.get(), 4);

        // Same settings as the last write: reused.
        let p = Pipeline::new(FigureConfig {
            empty_groups: EmptyGroupPolicy::Zero,
            ..base.config().clone()
        })
        .unwrap();
        p.cached_table("M2", &inputs, compute).unwrap();
        assert_eq!(calls.get(), 4);
    }

    #[test]
    fn recompute_mode_always_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let p = pipeline(dir.path(), CacheMode::Recompute);
        p.cache().put_matrix("M3", &[vec![9.0]], None).unwrap();
        assert_eq!(p.cached_table("M3", &[], || Ok(vec![vec![1.0]])).unwrap(), vec![vec![1.0]]);
        assert_eq!(p.cache().get_matrix("M3").unwrap().unwrap(), vec![vec![1.0]]);
    }
}
