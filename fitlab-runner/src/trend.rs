//! Exponential trend fitting: `y = A * exp(B * x)` by least squares on `ln y`.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::StatsError;
use crate::stats::linear_fit;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ExponentialFit {
    pub a: f64,
    pub b: f64,
}

impl ExponentialFit {
    pub fn eval(&self, x: f64) -> f64 {
        self.a * (self.b * x).exp()
    }

    /// Sample the curve on `[start, end)` with a fixed step, like a half-open
    /// range. Empty when `step <= 0` or `end <= start`.
    pub fn curve(&self, start: f64, end: f64, step: f64) -> Vec<(f64, f64)> {
        if !(step > 0.0) || !(end > start) {
            return Vec::new();
        }
        let n = ((end - start) / step).ceil() as usize;
        (0..n)
            .map(|i| start + i as f64 * step)
            .filter(|x| *x < end)
            .map(|x| (x, self.eval(x)))
            .collect()
    }
}

impl fmt::Display for ExponentialFit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2} exp ({:.2}*p)", self.a, self.b)
    }
}

/// Fit `y = A exp(B x)` to the points from index `start` onwards.
pub fn fit_exponential(x: &[f64], y: &[f64], start: usize) -> Result<ExponentialFit, StatsError> {
    if x.len() != y.len() {
        return Err(StatsError::LengthMismatch {
            left: x.len(),
            right: y.len(),
        });
    }
    let xs = x.get(start..).unwrap_or(&[]);
    let ys = y.get(start..).unwrap_or(&[]);
    if xs.len() < 2 {
        return Err(StatsError::TooFewPoints(xs.len()));
    }

    let mut log_y = Vec::with_capacity(ys.len());
    for (i, &v) in ys.iter().enumerate() {
        if !(v > 0.0) {
            return Err(StatsError::NonPositiveValue {
                index: start + i,
                value: v,
            });
        }
        log_y.push(v.ln());
    }

    let (slope, intercept) = linear_fit(xs, &log_y).ok_or_else(|| {
        StatsError::DegenerateRange(format!("all {} x values are equal", xs.len()))
    })?;
    Ok(ExponentialFit {
        a: intercept.exp(),
        b: slope,
    })
}
