//! Renderer-agnostic figure description.
//!
//! Pipelines build `Figure`s from summary tables; the renderer turns them
//! into files. Nothing here knows about a drawing backend.

use serde::{Deserialize, Serialize};

use crate::palette::Rgb;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Marker {
    None,
    Dot,
    Circle,
    Square,
    Triangle,
    Cross,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LineKind {
    None,
    Solid,
}

/// Absolute lower/upper ends of an error bar.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ErrorBounds {
    pub lower: f64,
    pub upper: f64,
}

impl ErrorBounds {
    /// Symmetric bar of half-width `err` around `y`.
    pub fn symmetric(y: f64, err: f64) -> Self {
        Self {
            lower: y - err,
            upper: y + err,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
    pub err: Option<ErrorBounds>,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y, err: None }
    }

    pub fn with_err(x: f64, y: f64, err: ErrorBounds) -> Self {
        Self { x, y, err: Some(err) }
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Series {
    pub label: Option<String>,
    pub points: Vec<Point>,
    pub color: Rgb,
    pub marker: Marker,
    pub marker_size: u32,
    pub line: LineKind,
    pub line_width: u32,
}

impl Series {
    /// Markers joined by a solid line.
    pub fn line_with_markers(points: Vec<Point>, color: Rgb, marker: Marker) -> Self {
        Self {
            label: None,
            points,
            color,
            marker,
            marker_size: 8,
            line: LineKind::Solid,
            line_width: 2,
        }
    }

    /// Markers only.
    pub fn scatter(points: Vec<Point>, color: Rgb, marker: Marker) -> Self {
        Self {
            line: LineKind::None,
            ..Self::line_with_markers(points, color, marker)
        }
    }

    /// A plain line without markers.
    pub fn line(points: Vec<Point>, color: Rgb) -> Self {
        Self::line_with_markers(points, color, Marker::None)
    }

    pub fn labelled(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn sized(mut self, marker_size: u32, line_width: u32) -> Self {
        self.marker_size = marker_size;
        self.line_width = line_width;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Figure {
    /// Output file stem, e.g. `smooth_fit_ff4`.
    pub name: String,
    pub x_label: String,
    pub y_label: String,
    pub x_range: Option<(f64, f64)>,
    pub y_range: Option<(f64, f64)>,
    /// Divide y tick values by this before labelling (1e3 shows thousands).
    pub y_tick_divisor: Option<f64>,
    pub series: Vec<Series>,
}

impl Figure {
    pub fn new(name: impl Into<String>, x_label: impl Into<String>, y_label: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            x_label: x_label.into(),
            y_label: y_label.into(),
            x_range: None,
            y_range: None,
            y_tick_divisor: None,
            series: Vec::new(),
        }
    }

    /// Data extent over finite points, error bars included.
    ///
    /// Returns `None` when there is no finite point.
    pub fn data_bounds(&self) -> Option<((f64, f64), (f64, f64))> {
        let mut x = (f64::INFINITY, f64::NEG_INFINITY);
        let mut y = (f64::INFINITY, f64::NEG_INFINITY);
        for p in self.series.iter().flat_map(|s| &s.points).filter(|p| p.is_finite()) {
            x = (x.0.min(p.x), x.1.max(p.x));
            y = (y.0.min(p.y), y.1.max(p.y));
            if let Some(e) = p.err {
                for v in [e.lower, e.upper].into_iter().filter(|v| v.is_finite()) {
                    y = (y.0.min(v), y.1.max(v));
                }
            }
        }
        if x.0.is_finite() && y.0.is_finite() {
            Some((x, y))
        } else {
            None
        }
    }

    pub fn has_legend(&self) -> bool {
        self.series.iter().any(|s| s.label.is_some())
    }
}
