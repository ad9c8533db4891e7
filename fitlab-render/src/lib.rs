//! fitlab render: draws [`Figure`]s to SVG with plotters.
//!
//! Styling comes from a [`PlotStyle`] passed per call. Non-finite points are
//! dropped before drawing. Axis ranges default to the data extent, error bars
//! included, padded by 5% on each side.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use fitlab_core::{Figure, LineKind, Marker, PlotStyle, Rgb, Series};
use plotters::coord::cartesian::Cartesian2d;
use plotters::coord::types::RangedCoordf64;
use plotters::prelude::*;
use tracing::{debug, info};

type Chart<'a, 'b> = ChartContext<'a, SVGBackend<'b>, Cartesian2d<RangedCoordf64, RangedCoordf64>>;

const PADDING: f64 = 0.05;
const LEGEND_LINE: i32 = 20;

/// Draw `figure` to `{out_dir}/{figure.name}.svg` and return the path.
pub fn render_figure(figure: &Figure, style: &PlotStyle, out_dir: &Path) -> Result<PathBuf> {
    std::fs::create_dir_all(out_dir)
        .with_context(|| format!("create output directory {}", out_dir.display()))?;
    let path = out_dir.join(format!("{}.svg", figure.name));

    {
        let root = SVGBackend::new(&path, (style.width, style.height)).into_drawing_area();
        root.fill(&WHITE)?;
        draw_figure(&root, figure, style)
            .with_context(|| format!("draw figure {}", figure.name))?;
        root.present()
            .with_context(|| format!("write {}", path.display()))?;
    }

    info!(figure = %figure.name, path = %path.display(), "rendered figure");
    Ok(path)
}

fn draw_figure(
    root: &DrawingArea<SVGBackend<'_>, plotters::coord::Shift>,
    figure: &Figure,
    style: &PlotStyle,
) -> Result<()> {
    let (x_range, y_range) = axis_ranges(figure);
    debug!(figure = %figure.name, ?x_range, ?y_range, "axis ranges");

    let font = (style.font_family.as_str(), f64::from(style.font_size)).into_font();
    let mut chart = ChartBuilder::on(root)
        .margin(style.margin)
        .x_label_area_size(style.label_area)
        .y_label_area_size(style.label_area)
        .build_cartesian_2d(x_range.0..x_range.1, y_range.0..y_range.1)?;

    let divisor = figure.y_tick_divisor.unwrap_or(1.0);
    let x_fmt = |v: &f64| format_tick(*v);
    let y_fmt = move |v: &f64| format_tick(*v / divisor);
    chart
        .configure_mesh()
        .disable_mesh()
        .x_desc(figure.x_label.as_str())
        .y_desc(figure.y_label.as_str())
        .label_style(font.clone())
        .axis_desc_style(font.clone())
        .x_label_formatter(&x_fmt)
        .y_label_formatter(&y_fmt)
        .draw()?;

    for series in &figure.series {
        draw_series(&mut chart, series)?;
    }

    if figure.has_legend() {
        chart
            .configure_series_labels()
            .position(SeriesLabelPosition::UpperRight)
            .label_font(font)
            .background_style(WHITE.mix(0.8))
            .border_style(WHITE)
            .draw()?;
    }
    Ok(())
}

fn draw_series(chart: &mut Chart<'_, '_>, series: &Series) -> Result<()> {
    let color = rgb(series.color);
    let points: Vec<_> = series.points.iter().filter(|p| p.is_finite()).collect();
    let xy: Vec<(f64, f64)> = points.iter().map(|p| (p.x, p.y)).collect();

    if series.line == LineKind::Solid && series.line_width > 0 && xy.len() > 1 {
        chart.draw_series(LineSeries::new(
            xy.iter().copied(),
            color.stroke_width(series.line_width),
        ))?;
    }

    let cap = series.marker_size.max(4);
    chart.draw_series(points.iter().filter_map(|p| {
        let e = p.err?;
        (e.lower.is_finite() && e.upper.is_finite())
            .then(|| ErrorBar::new_vertical(p.x, e.lower, p.y, e.upper, color.filled(), cap))
    }))?;

    let r = marker_radius(series.marker_size);
    match series.marker {
        Marker::None => {}
        Marker::Dot => {
            chart.draw_series(xy.iter().map(|&c| Circle::new(c, (r / 2).max(1), color.filled())))?;
        }
        Marker::Circle => {
            chart.draw_series(xy.iter().map(|&c| Circle::new(c, r, color.filled())))?;
        }
        Marker::Square => {
            chart.draw_series(xy.iter().map(|&c| {
                EmptyElement::at(c) + Rectangle::new([(-r, -r), (r, r)], color.filled())
            }))?;
        }
        Marker::Triangle => {
            chart.draw_series(xy.iter().map(|&c| TriangleMarker::new(c, r + 1, color.filled())))?;
        }
        Marker::Cross => {
            chart.draw_series(xy.iter().map(|&c| Cross::new(c, r, color.stroke_width(2))))?;
        }
    }

    if let Some(label) = &series.label {
        let anno = chart
            .draw_series(std::iter::empty::<PathElement<(f64, f64)>>())?
            .label(label.as_str());
        let w = series.line_width.max(1);
        match series.marker {
            Marker::None => {
                anno.legend(move |(x, y)| {
                    PathElement::new(vec![(x, y), (x + LEGEND_LINE, y)], color.stroke_width(w))
                });
            }
            Marker::Square => {
                anno.legend(move |(x, y)| {
                    let c = x + LEGEND_LINE / 2;
                    Rectangle::new([(c - r, y - r), (c + r, y + r)], color.filled())
                });
            }
            Marker::Triangle => {
                anno.legend(move |(x, y)| {
                    TriangleMarker::new((x + LEGEND_LINE / 2, y), r + 1, color.filled())
                });
            }
            Marker::Cross => {
                anno.legend(move |(x, y)| {
                    Cross::new((x + LEGEND_LINE / 2, y), r, color.stroke_width(2))
                });
            }
            Marker::Circle | Marker::Dot => {
                anno.legend(move |(x, y)| {
                    Circle::new((x + LEGEND_LINE / 2, y), r, color.filled())
                });
            }
        }
    }
    Ok(())
}

fn rgb(c: Rgb) -> RGBColor {
    RGBColor(c.0, c.1, c.2)
}

/// Marker sizes are diameters in points; plotters wants a pixel radius.
fn marker_radius(size: u32) -> i32 {
    (size as i32 / 2 + 1).max(1)
}

/// Explicit ranges win; otherwise the padded data extent.
pub fn axis_ranges(figure: &Figure) -> ((f64, f64), (f64, f64)) {
    let (data_x, data_y) = figure.data_bounds().unwrap_or(((0.0, 1.0), (0.0, 1.0)));
    (
        figure.x_range.unwrap_or_else(|| pad(data_x)),
        figure.y_range.unwrap_or_else(|| pad(data_y)),
    )
}

fn pad((lo, hi): (f64, f64)) -> (f64, f64) {
    let span = hi - lo;
    if span > 0.0 {
        (lo - PADDING * span, hi + PADDING * span)
    } else {
        let d = if lo == 0.0 { 1.0 } else { lo.abs() * PADDING };
        (lo - d, hi + d)
    }
}

/// Up to three decimals, trailing zeros trimmed.
fn format_tick(v: f64) -> String {
    let s = format!("{v:.3}");
    let s = s.trim_end_matches('0').trim_end_matches('.');
    if s == "-0" {
        "0".to_string()
    } else {
        s.to_string()
    }
}
