//! Epanechnikov kernel density estimation on a uniform grid.

use crate::error::AnalyticsError;
use serde::{Deserialize, Serialize};

/// Absorbs floating-point error in `span / step` so an endpoint that lands
/// exactly on `max` is not dropped.
const GRID_EPSILON: f64 = 1e-9;

/// One point of the density curve.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DensityPoint {
    pub x: f64,
    pub density: f64,
}

/// The Epanechnikov kernel on the unit support: `0.75 * (1 - u^2)` for `|u| <= 1`.
pub fn epanechnikov(u: f64) -> f64 {
    if u.abs() <= 1.0 { 0.75 * (1.0 - u * u) } else { 0.0 }
}

/// Uniform grid from `min` to `max`, always containing `min`.
///
/// When `step` would need more than `max_points` points the step is widened so the
/// grid spans the same range in exactly `max_points` points. Points that floating-point
/// rounding would place on or before their predecessor are skipped, so `x` is
/// strictly ascending even for values far larger than `step`.
pub fn grid(min: f64, max: f64, step: f64, max_points: usize) -> Result<Vec<f64>, AnalyticsError> {
    if !(step.is_finite() && step > 0.0) {
        return Err(AnalyticsError::InvalidParameter(format!(
            "grid step must be positive, got {step}"
        )));
    }
    if !(min.is_finite() && max.is_finite() && (max - min).is_finite()) || max < min {
        return Err(AnalyticsError::InvalidParameter(format!(
            "grid bounds [{min}, {max}] are not a finite range"
        )));
    }
    if max_points == 0 {
        return Err(AnalyticsError::InvalidParameter(
            "density grid needs at least one point".to_string(),
        ));
    }

    let span = max - min;
    let mut step = step;
    let mut intervals = (span / step + GRID_EPSILON).floor();
    if intervals >= max_points as f64 {
        let capped = (max_points - 1) as f64;
        let widened = if capped > 0.0 { span / capped } else { span };
        tracing::warn!(
            requested_step = step,
            widened_step = widened,
            max_points,
            "Density grid over [{}, {}] exceeds the point limit; widening the step.",
            min,
            max
        );
        step = widened;
        intervals = capped;
    }

    let mut points: Vec<f64> = Vec::with_capacity(intervals as usize + 1);
    for k in 0..=intervals as usize {
        let x = (min + k as f64 * step).min(max);
        if points.last().is_some_and(|last| x <= *last) {
            continue;
        }
        points.push(x);
    }
    Ok(points)
}

/// Estimates the density of `values` at every grid point between their minimum
/// and maximum.
///
/// `f(x)` is the mean over all values `v` of `K((x - v) / h) / h`. The output is
/// in ascending `x` and is not renormalized. Identical values collapse to a single
/// point of height `0.75 / h`.
pub fn estimate(
    values: &[f64],
    bandwidth: f64,
    step: f64,
    max_points: usize,
) -> Result<Vec<DensityPoint>, AnalyticsError> {
    if values.is_empty() {
        return Err(AnalyticsError::EmptyInput);
    }
    if !(bandwidth.is_finite() && bandwidth > 0.0) {
        return Err(AnalyticsError::InvalidParameter(format!(
            "kernel bandwidth must be positive, got {bandwidth}"
        )));
    }

    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    let (min, max) = (sorted[0], sorted[sorted.len() - 1]);

    let points = grid(min, max, step, max_points)?;
    let norm = sorted.len() as f64 * bandwidth;

    let curve = points
        .into_iter()
        .map(|x| {
            // Only values within one bandwidth of x contribute.
            let lo = sorted.partition_point(|v| *v < x - bandwidth);
            let hi = sorted.partition_point(|v| *v <= x + bandwidth);
            let weight: f64 = sorted[lo..hi]
                .iter()
                .map(|v| epanechnikov((x - v) / bandwidth))
                .sum();
            DensityPoint {
                x,
                density: weight / norm,
            }
        })
        .collect::<Vec<_>>();

    tracing::debug!(
        points = curve.len(),
        bandwidth,
        step,
        "Density estimated over [{}, {}].",
        min,
        max
    );
    Ok(curve)
}
