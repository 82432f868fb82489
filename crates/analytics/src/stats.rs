//! Descriptive statistics over a slice of terminal values.

use crate::error::AnalyticsError;

/// Arithmetic mean.
///
/// Accumulates deviations from the first value, which keeps the result exact
/// when every value is identical.
pub fn mean(values: &[f64]) -> Result<f64, AnalyticsError> {
    let first = *values.first().ok_or(AnalyticsError::EmptyInput)?;
    let shifted: f64 = values.iter().map(|v| v - first).sum();
    Ok(first + shifted / values.len() as f64)
}

/// Population standard deviation (divides by N) around the full-precision `mean`.
pub fn population_std_dev(values: &[f64], mean: f64) -> Result<f64, AnalyticsError> {
    let first = *values.first().ok_or(AnalyticsError::EmptyInput)?;
    if values.iter().all(|v| *v == first) {
        return Ok(0.0);
    }

    let sum_sq: f64 = values.iter().map(|v| (v - mean) * (v - mean)).sum();
    Ok((sum_sq / values.len() as f64).sqrt())
}

/// Linear-interpolation quantile of an ascending slice: rank `p * (N - 1)`,
/// interpolated between the two bracketing values.
pub fn quantile(sorted: &[f64], p: f64) -> Result<f64, AnalyticsError> {
    if sorted.is_empty() {
        return Err(AnalyticsError::EmptyInput);
    }
    if !(0.0..=1.0).contains(&p) {
        return Err(AnalyticsError::InvalidParameter(format!(
            "quantile level {p} is outside [0, 1]"
        )));
    }

    let rank = p * (sorted.len() - 1) as f64;
    let lo = rank.floor() as usize;
    let hi = rank.ceil() as usize;
    if lo == hi {
        return Ok(sorted[lo]);
    }
    let w = rank - lo as f64;
    Ok(sorted[lo] * (1.0 - w) + sorted[hi] * w)
}
