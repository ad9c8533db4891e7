//! Mean generations to fitness 1 against mutation probability.
//!
//! One group per context count: points at the mean with asymmetric bars
//! spanning the bootstrap percentile interval, plus an exponential fitted to
//! the means from `fit_start_index` on.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use fitlab_core::config::color;
use fitlab_core::{
    ConfigError, ContextConfig, ErrorBounds, Fig6Config, Figure, Marker, MeansTable, Point, Series,
};
use tracing::info;

use super::Pipeline;
use crate::means::compute_means;
use crate::trend::{fit_exponential, ExponentialFit};

const MARKER_SIZE: u32 = 10;

/// Evolution-run files for one context count, in probability order.
pub fn evolve_paths(data_dir: &Path, config: &Fig6Config, ctx: &ContextConfig) -> Vec<PathBuf> {
    ctx.probabilities
        .iter()
        .map(|p| {
            data_dir.join(format!(
                "evolve_{}_{}_{}_fits_{p}.csv",
                ctx.tag, config.fitness_fn, config.run_tag
            ))
        })
        .collect()
}

/// Cache key of a context's means table, e.g. `M2`.
pub fn means_key(ctx: &ContextConfig) -> String {
    format!("M{}", ctx.contexts)
}

pub struct ContextPanel<'a> {
    pub spec: &'a ContextConfig,
    pub table: &'a MeansTable,
    pub fit: ExponentialFit,
}

pub fn fit_means(table: &MeansTable, start: usize) -> Result<ExponentialFit> {
    Ok(fit_exponential(&table.probabilities(), &table.means(), start)?)
}

pub fn fig6_figure(panels: &[ContextPanel<'_>], config: &Fig6Config) -> Result<Figure, ConfigError> {
    let mut figure = Figure::new("fig6", "p", "μ(p) (x10³)");
    figure.y_range = Some((0.0, config.y_max));
    figure.y_tick_divisor = Some(1e3);

    for panel in panels {
        let ctx = panel.spec;
        let bar_color = color(&ctx.color)?;
        let point_color = color(&ctx.fit_color)?;

        let bars = panel
            .table
            .rows
            .iter()
            .map(|r| {
                Point::with_err(
                    r.p,
                    r.mean,
                    ErrorBounds {
                        lower: r.ci_lower,
                        upper: r.ci_upper,
                    },
                )
            })
            .collect();
        figure
            .series
            .push(Series::scatter(bars, bar_color, Marker::None).sized(1, 1));

        let points = panel.table.rows.iter().map(|r| Point::new(r.p, r.mean)).collect();
        figure.series.push(
            Series::scatter(points, point_color, ctx.marker)
                .sized(MARKER_SIZE, 1)
                .labelled(format!("X={}", ctx.contexts)),
        );
    }

    for panel in panels {
        let ctx = panel.spec;
        let probabilities = panel.table.probabilities();
        let Some(&start) = probabilities.get(config.fit_start_index) else {
            continue;
        };
        let curve = panel
            .fit
            .curve(start, config.fit_end_x, config.fit_step)
            .into_iter()
            .map(|(x, y)| Point::new(x, y))
            .collect();
        figure
            .series
            .push(Series::line(curve, color(&ctx.fit_color)?));
    }

    if config.plot_nulls {
        for panel in panels {
            let ctx = panel.spec;
            let Some(null) = ctx.null_mean.or_else(|| panel.table.rows.last().map(|r| r.mean))
            else {
                continue;
            };
            let line = vec![Point::new(0.0, null), Point::new(config.fit_end_x, null)];
            figure.series.push(Series::line(line, color(&ctx.color)?).sized(0, 1));
        }
    }
    Ok(figure)
}

impl Pipeline {
    pub fn means_for(&self, ctx: &ContextConfig) -> Result<MeansTable> {
        let config = self.config();
        let paths = evolve_paths(&config.data_dir, &config.fig6, ctx);
        let key = means_key(ctx);
        let matrix = self.cached_table(&key, &paths, || {
            let table = compute_means(
                &paths,
                &ctx.probabilities,
                &self.bootstrap_config(),
                self.rngs(),
                &key,
            )?;
            Ok(table.to_matrix())
        })?;
        MeansTable::from_matrix(&matrix).with_context(|| format!("rebuild means table {key}"))
    }

    pub fn fig6(&self) -> Result<Vec<Figure>> {
        let cfg = &self.config().fig6;

        let mut tables = Vec::with_capacity(cfg.contexts.len());
        let mut fits = Vec::with_capacity(cfg.contexts.len());
        for ctx in &cfg.contexts {
            let table = self.means_for(ctx)?;
            let fit = fit_means(&table, cfg.fit_start_index)
                .with_context(|| format!("exponential fit for {} contexts", ctx.contexts))?;
            info!(contexts = ctx.contexts, %fit, "exponential fit to curve");
            tables.push(table);
            fits.push(fit);
        }

        let panels: Vec<ContextPanel<'_>> = cfg
            .contexts
            .iter()
            .zip(&tables)
            .zip(fits)
            .map(|((spec, table), fit)| ContextPanel { spec, table, fit })
            .collect();
        Ok(vec![fig6_figure(&panels, cfg)?])
    }
}
