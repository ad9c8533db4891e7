//! Figure configuration.
//!
//! Stored as TOML. Every field has a default matching the published figures,
//! so an empty file (or no file at all) reproduces them. The empirical
//! constants (k values of the h(m) fits, random-fit proportions, probability
//! grids, context tags, bin counts) live here instead of in the pipelines.

use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::data::DEFAULT_FILES_PER_DATASET;
use crate::domain::ids::MAX_GENE_COUNT;
use crate::figure::Marker;
use crate::palette::{self, Rgb};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("read config {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),
    #[error("unknown colour '{0}'")]
    UnknownColour(String),
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// What to do when a Hamming distance has no samples.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmptyGroupPolicy {
    /// Abort with an empty-group error.
    #[default]
    Fail,
    /// Emit an all-zero summary row for the distance.
    Zero,
}

/// Whether summary tables are recomputed or read back from the cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CacheMode {
    /// Always recompute and overwrite the cache.
    #[default]
    Recompute,
    /// Read the cache; a missing entry is an error.
    Load,
    /// Read the cache when its input hash matches, otherwise recompute.
    Auto,
}

impl FromStr for CacheMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "recompute" => Ok(CacheMode::Recompute),
            "load" => Ok(CacheMode::Load),
            "auto" => Ok(CacheMode::Auto),
            other => Err(format!("unknown cache mode '{other}' (recompute, load, auto)")),
        }
    }
}

impl FromStr for EmptyGroupPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "fail" => Ok(EmptyGroupPolicy::Fail),
            "zero" => Ok(EmptyGroupPolicy::Zero),
            other => Err(format!("unknown empty-group policy '{other}' (fail, zero)")),
        }
    }
}

/// Styling handed to the renderer once per run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlotStyle {
    pub font_family: String,
    pub font_size: u32,
    pub width: u32,
    pub height: u32,
    pub margin: u32,
    pub label_area: u32,
}

impl Default for PlotStyle {
    fn default() -> Self {
        Self {
            font_family: "DejaVu Sans".into(),
            font_size: 22,
            width: 800,
            height: 800,
            margin: 20,
            label_area: 70,
        }
    }
}

/// One gene count in the smooth-fit figures.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneSeriesConfig {
    pub gene_count: u32,
    /// Plot every n-th distance so the three gene counts have similar density.
    pub row_stride: usize,
    pub color: String,
    pub marker: Marker,
    /// k of the h(m) curve overlaid on the proportion-fit figure.
    pub proportion_k: u32,
    /// Proportion of fit genomes among randomly selected genomes.
    pub random_fit_proportion: f64,
    /// k of the h(m) curve overlaid on the mean-fitness figure.
    pub fitness_k: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SmoothFitConfig {
    pub fitness_fn: String,
    pub files_per_dataset: usize,
    pub show_hm_fit: bool,
    pub x_max: f64,
    pub datasets: Vec<GeneSeriesConfig>,
}

impl Default for SmoothFitConfig {
    fn default() -> Self {
        let gene = |gene_count, row_stride, color: &str, marker, pk, nf, fk| GeneSeriesConfig {
            gene_count,
            row_stride,
            color: color.into(),
            marker,
            proportion_k: pk,
            random_fit_proportion: nf,
            fitness_k: fk,
        };
        Self {
            fitness_fn: "ff4".into(),
            files_per_dataset: DEFAULT_FILES_PER_DATASET,
            show_hm_fit: false,
            x_max: 0.5,
            datasets: vec![
                gene(4, 1, "mediumpurple1", Marker::Square, 21, 0.304, 10),
                gene(5, 2, "darkorchid2", Marker::Circle, 33, 0.371, 17),
                gene(6, 4, "indigo", Marker::Triangle, 45, 0.4746, 25),
            ],
        }
    }
}

/// One context count in figure 6.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContextConfig {
    pub contexts: u32,
    /// File tag describing the contexts, e.g. `nc2_I16-0_T21-10`.
    pub tag: String,
    pub probabilities: Vec<f64>,
    /// Error bars and the null line.
    pub color: String,
    /// Point markers and the exponential fit line.
    pub fit_color: String,
    pub marker: Marker,
    /// Mean generations when sampling genomes at random. Defaults to the
    /// mean of the last probability.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub null_mean: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Fig6Config {
    pub fitness_fn: String,
    pub run_tag: String,
    /// First point of the exponential fit; earlier points are unstable.
    pub fit_start_index: usize,
    pub fit_end_x: f64,
    pub fit_step: f64,
    pub y_max: f64,
    pub plot_nulls: bool,
    pub contexts: Vec<ContextConfig>,
}

const P_GRID: [f64; 16] = [
    0.02, 0.03, 0.04, 0.05, 0.07, 0.1, 0.12, 0.15, 0.17, 0.2, 0.25, 0.3, 0.35, 0.4, 0.45, 0.5,
];

impl Default for Fig6Config {
    fn default() -> Self {
        let ctx = |contexts, tag: &str, n: usize, color: &str, fit_color: &str, marker, null_mean| {
            ContextConfig {
                contexts,
                tag: tag.into(),
                probabilities: P_GRID[..n].to_vec(),
                color: color.into(),
                fit_color: fit_color.into(),
                marker,
                null_mean,
            }
        };
        Self {
            fitness_fn: "ff4".into(),
            run_tag: "1000".into(),
            fit_start_index: 3,
            fit_end_x: 0.5,
            fit_step: 0.001,
            y_max: 1e5,
            plot_nulls: false,
            contexts: vec![
                ctx(2, "nc2_I16-0_T21-10", 16, "mediumblue", "mediumblue", Marker::Circle, None),
                ctx(3, "nc3_I16-4-1_T20-5-10", 15, "darkorchid3", "darkorchid3", Marker::Square, None),
                ctx(
                    4,
                    "nc4_I16-4-1-8_T20-10-5-9",
                    12,
                    "firebrick1",
                    "red",
                    Marker::Triangle,
                    Some(1e9),
                ),
            ],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FigS1Config {
    pub fitness_fn: String,
    pub context_tag: String,
    pub max_gens: String,
    /// Directory under `data_dir` holding the fitness-increment runs.
    pub subdir: String,
    pub probabilities: Vec<f64>,
    pub bins: usize,
}

impl Default for FigS1Config {
    fn default() -> Self {
        Self {
            fitness_fn: "ff4".into(),
            context_tag: "nc2_I16-0_T21-10".into(),
            max_gens: "10000000".into(),
            subdir: "fitinc".into(),
            probabilities: vec![0.1, 0.2, 0.3, 0.4, 0.5],
            bins: 50,
        }
    }
}

/// Top-level configuration for all figures.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FigureConfig {
    pub data_dir: PathBuf,
    pub cache_dir: PathBuf,
    pub output_dir: PathBuf,
    /// Master seed for bootstrap resampling; unset draws from OS entropy.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
    pub n_resamples: usize,
    pub empty_groups: EmptyGroupPolicy,
    pub cache_mode: CacheMode,
    pub log_scale: bool,
    pub style: PlotStyle,
    pub smooth_fit: SmoothFitConfig,
    pub fig6: Fig6Config,
    pub fig_s1: FigS1Config,
}

impl Default for FigureConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            cache_dir: PathBuf::from("tmp"),
            output_dir: PathBuf::from("figures"),
            seed: None,
            n_resamples: 1000,
            empty_groups: EmptyGroupPolicy::default(),
            cache_mode: CacheMode::default(),
            log_scale: false,
            style: PlotStyle::default(),
            smooth_fit: SmoothFitConfig::default(),
            fig6: Fig6Config::default(),
            fig_s1: FigS1Config::default(),
        }
    }
}

impl FigureConfig {
    /// Load and validate a config from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&content)
    }

    /// Parse and validate a config from a TOML string.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.n_resamples == 0 {
            return Err(ConfigError::Invalid("n_resamples must be > 0".into()));
        }
        if self.style.width == 0 || self.style.height == 0 {
            return Err(ConfigError::Invalid("style width and height must be > 0".into()));
        }
        for ds in &self.smooth_fit.datasets {
            if !(1..=MAX_GENE_COUNT).contains(&ds.gene_count) {
                return Err(ConfigError::Invalid(format!(
                    "gene_count {} outside 1..={MAX_GENE_COUNT}",
                    ds.gene_count
                )));
            }
            if ds.row_stride == 0 {
                return Err(ConfigError::Invalid("row_stride must be > 0".into()));
            }
            color(&ds.color)?;
        }
        if self.fig6.fit_step <= 0.0 {
            return Err(ConfigError::Invalid("fig6.fit_step must be > 0".into()));
        }
        for ctx in &self.fig6.contexts {
            if ctx.probabilities.is_empty() {
                return Err(ConfigError::Invalid(format!(
                    "fig6 context {} has no probabilities",
                    ctx.contexts
                )));
            }
            color(&ctx.color)?;
            color(&ctx.fit_color)?;
        }
        if self.fig_s1.bins < 2 {
            return Err(ConfigError::Invalid("fig_s1.bins must be >= 2".into()));
        }
        Ok(())
    }
}

/// Resolve a palette name.
pub fn color(name: &str) -> Result<Rgb, ConfigError> {
    palette::named(name).ok_or_else(|| ConfigError::UnknownColour(name.to_string()))
}
