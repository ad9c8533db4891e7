//! Distribution of generations between fitness increments, one curve per
//! mutation probability, on log-log axes.

use std::path::{Path, PathBuf};

use anyhow::Result;
use fitlab_core::data::read_series;
use fitlab_core::palette::brg;
use fitlab_core::{FigS1Config, Figure, Marker, Point, Series};
use tracing::{info, warn};

use super::Pipeline;
use crate::error::StatsError;
use crate::histogram::LogHistogram;

const MARKERS: [Marker; 5] = [
    Marker::Circle,
    Marker::Square,
    Marker::Triangle,
    Marker::Cross,
    Marker::Dot,
];
const MARKER_SIZE: u32 = 9;

pub fn fitinc_paths(data_dir: &Path, config: &FigS1Config) -> Vec<PathBuf> {
    let dir = data_dir.join(&config.subdir);
    config
        .probabilities
        .iter()
        .map(|p| {
            dir.join(format!(
                "evolve_{}_{}_{}_gensplus_{p}.csv",
                config.context_tag, config.fitness_fn, config.max_gens
            ))
        })
        .collect()
}

/// Legend label in tenths, e.g. `p=.3`.
pub fn probability_label(p: f64) -> String {
    format!("p=.{}", (10.0 * p).round() as i64)
}

/// A histogram for the `index`-th of `count` probabilities.
pub struct IncrementCurve {
    pub index: usize,
    pub p: f64,
    pub histogram: LogHistogram,
}

pub fn fig_s1_figure(curves: &[IncrementCurve], count: usize) -> Figure {
    let mut figure = Figure::new("figS1", "log (generations)", "log (fitness increments)");
    for curve in curves {
        let points = curve
            .histogram
            .log_points()
            .into_iter()
            .map(|(x, y)| Point::new(x, y))
            .collect();
        let t = (curve.index + 1) as f64 * 0.5 / count.max(1) as f64;
        figure.series.push(
            Series::line_with_markers(points, brg(t), MARKERS[curve.index % MARKERS.len()])
                .sized(MARKER_SIZE, 2)
                .labelled(probability_label(curve.p)),
        );
    }
    figure
}

impl Pipeline {
    pub fn fig_s1(&self) -> Result<Vec<Figure>> {
        let config = self.config();
        let cfg = &config.fig_s1;
        let paths = fitinc_paths(&config.data_dir, cfg);

        let mut curves = Vec::with_capacity(paths.len());
        for (index, (path, &p)) in paths.iter().zip(&cfg.probabilities).enumerate() {
            let values = read_series(path)?;
            match LogHistogram::from_values(&values, cfg.bins) {
                Ok(histogram) => {
                    info!(p, values = values.len(), counted = histogram.total(), "histogram built");
                    curves.push(IncrementCurve {
                        index,
                        p,
                        histogram,
                    });
                }
                Err(e @ (StatsError::EmptyGroup(_) | StatsError::DegenerateRange(_))) => {
                    warn!(path = %path.display(), error = %e, "skipping file");
                }
                Err(e) => return Err(e.into()),
            }
        }
        Ok(vec![fig_s1_figure(&curves, paths.len())])
    }
}
