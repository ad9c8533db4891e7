//! Proportion fit and mean fitness against proportional Hamming distance.
//!
//! Two figures per run, one series per gene count. The x axis is the distance
//! divided by the genome length `g * 2^(g-1)`, so gene counts with different
//! genome lengths share an axis. Log-scale mode plots `ln(mean)`.

use anyhow::{Context, Result};
use fitlab_core::config::color;
use fitlab_core::data::{dataset_paths, hm_path, read_hm, HmTable};
use fitlab_core::{
    ConfigError, DatasetId, ErrorBounds, Figure, GeneSeriesConfig, Point, Series,
    SmoothFitConfig, Stat, SummaryRow, SummaryTable,
};
use tracing::info;

use super::Pipeline;
use crate::aggregate::{max_hamming_distance, summarize_by_hamming};
use crate::data_loader::load_dataset;

const MARKER_SIZE: u32 = 8;
const LINE_WIDTH: u32 = 2;
const X_LABEL: &str = "Prop. Hamming distance (m/N) from f=1 genome";

/// Which summary statistic a figure plots.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Metric {
    ProportionFit,
    FitPerFitState,
}

impl Metric {
    fn stat(self, row: &SummaryRow) -> Stat {
        match self {
            Metric::ProportionFit => row.proportion_fit,
            Metric::FitPerFitState => row.fit_per_fit_state,
        }
    }

    fn stem(self) -> &'static str {
        match self {
            Metric::ProportionFit => "smooth_fit",
            Metric::FitPerFitState => "fitness_increases_gradually",
        }
    }

    fn y_label(self, log_scale: bool) -> String {
        let base = match self {
            Metric::ProportionFit => "proportion of f>0 genomes",
            Metric::FitPerFitState => "mean fitness (f) for f>0 genomes",
        };
        if log_scale {
            format!("log ({base})")
        } else {
            base.to_string()
        }
    }

    fn x_min(self) -> f64 {
        match self {
            Metric::ProportionFit => -0.01,
            Metric::FitPerFitState => 0.0,
        }
    }
}

/// One gene count's summary table and optional h(m) table.
pub struct GenePanel<'a> {
    pub spec: &'a GeneSeriesConfig,
    pub table: &'a SummaryTable,
    pub hm: Option<&'a HmTable>,
}

/// File stem, e.g. `smooth_fit_log_ff4`.
pub fn figure_name(metric: Metric, fitness_fn: &str, log_scale: bool) -> String {
    if log_scale {
        format!("{}_log_{fitness_fn}", metric.stem())
    } else {
        format!("{}_{fitness_fn}", metric.stem())
    }
}

pub fn gene_figure(
    metric: Metric,
    panels: &[GenePanel<'_>],
    config: &SmoothFitConfig,
    log_scale: bool,
) -> Result<Figure, ConfigError> {
    let mut figure = Figure::new(
        figure_name(metric, &config.fitness_fn, log_scale),
        X_LABEL,
        metric.y_label(log_scale),
    );
    figure.x_range = Some((metric.x_min(), config.x_max));

    for panel in panels {
        let spec = panel.spec;
        let bits = f64::from(panel.table.id.genome_bits());
        let rgb = color(&spec.color)?;
        let points = panel
            .table
            .strided(spec.row_stride)
            .map(|row| {
                let stat = metric.stat(row);
                let y = if log_scale { stat.mean.ln() } else { stat.mean };
                Point::with_err(
                    f64::from(row.distance) / bits,
                    y,
                    ErrorBounds::symmetric(y, stat.std_error),
                )
            })
            .collect();
        figure.series.push(
            Series::line_with_markers(points, rgb, spec.marker)
                .sized(MARKER_SIZE, LINE_WIDTH)
                .labelled(format!("n={}", spec.gene_count)),
        );
    }

    if config.show_hm_fit {
        for panel in panels {
            if let Some(hm) = panel.hm {
                figure.series.push(hm_overlay(metric, panel.spec, hm, log_scale)?);
            }
        }
    }
    Ok(figure)
}

/// The h(m) curve for the configured k. The proportion figure lifts it by
/// the random-fit proportion: `nf + h (1 - nf)`.
fn hm_overlay(
    metric: Metric,
    spec: &GeneSeriesConfig,
    hm: &HmTable,
    log_scale: bool,
) -> Result<Series, ConfigError> {
    let bits = f64::from(fitlab_core::domain::ids::genome_bits(spec.gene_count));
    let k = match metric {
        Metric::ProportionFit => spec.proportion_k,
        Metric::FitPerFitState => spec.fitness_k,
    };
    let nf = spec.random_fit_proportion;
    let points = hm
        .for_k(k)
        .into_iter()
        .map(|r| {
            let y = match (log_scale, metric) {
                (true, _) => r.h.ln(),
                (false, Metric::ProportionFit) => nf + r.h * (1.0 - nf),
                (false, Metric::FitPerFitState) => r.h,
            };
            Point::new(r.m / bits, y)
        })
        .collect();
    let width = if log_scale { 1 } else { 2 };
    Ok(Series::line(points, color(&spec.color)?).sized(0, width))
}

impl Pipeline {
    /// Summary table for one gene count, from the cache or the raw dataset.
    pub fn summary_table(&self, gene_count: u32) -> Result<SummaryTable> {
        let cfg = &self.config().smooth_fit;
        let id = DatasetId::new(gene_count, cfg.fitness_fn.clone());
        let data_dir = &self.config().data_dir;
        let inputs = dataset_paths(data_dir, &id, cfg.files_per_dataset);

        let matrix = self.cached_table(&id.summary_key(), &inputs, || {
            let loaded = load_dataset(data_dir, &id, cfg.files_per_dataset)?;
            let table =
                summarize_by_hamming(&loaded.dataset, &self.aggregate_options(), self.rngs())
                    .with_context(|| format!("summarise {id}"))?;
            Ok(table.to_matrix())
        })?;
        let table = SummaryTable::from_matrix(id.clone(), &matrix)
            .with_context(|| format!("rebuild summary table {}", id.summary_key()))?;
        table
            .check_distances(max_hamming_distance(gene_count))
            .with_context(|| format!("summary table {} does not match {id}", id.summary_key()))?;
        Ok(table)
    }

    pub fn smooth_fit(&self) -> Result<Vec<Figure>> {
        let config = self.config();
        let cfg = &config.smooth_fit;

        let mut tables = Vec::with_capacity(cfg.datasets.len());
        let mut hms = Vec::with_capacity(cfg.datasets.len());
        for spec in &cfg.datasets {
            tables.push(self.summary_table(spec.gene_count)?);
            hms.push(if cfg.show_hm_fit {
                let path = hm_path(&config.data_dir, spec.gene_count);
                Some(read_hm(&path)?)
            } else {
                None
            });
        }

        let panels: Vec<GenePanel<'_>> = cfg
            .datasets
            .iter()
            .zip(&tables)
            .zip(&hms)
            .map(|((spec, table), hm)| GenePanel {
                spec,
                table,
                hm: hm.as_ref(),
            })
            .collect();

        let figures = vec![
            gene_figure(Metric::ProportionFit, &panels, cfg, config.log_scale)?,
            gene_figure(Metric::FitPerFitState, &panels, cfg, config.log_scale)?,
        ];
        info!(figures = figures.len(), "smooth-fit figures assembled");
        Ok(figures)
    }
}
