use crate::error::AnalyticsError;
use crate::kde::DensityPoint;
use crate::stats;
use rust_decimal::Decimal;
use rust_decimal::prelude::FromPrimitive;
use serde::{Deserialize, Serialize};

/// Endpoint statistics of a Monte Carlo run, as handed to the presentation layer.
///
/// Built once per simulation matrix by the `SimulationStatsEngine` and never
/// updated afterwards. Field names serialize in camelCase (`stdDev`, `quantile5`).
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulationStatistics {
    /// Number of terminal values the statistics were computed over.
    pub count: usize,
    pub mean: f64,
    /// Population standard deviation.
    pub std_dev: f64,
    pub min: f64,
    pub max: f64,
    pub median: f64,
    /// The configured lower quantile, 5th percentile by default.
    pub quantile5: f64,
    /// The configured upper quantile, 95th percentile by default.
    pub quantile95: f64,
    pub density: Vec<DensityPoint>,

    #[serde(skip)]
    pub(crate) sorted_terminal_values: Vec<f64>,
}

impl SimulationStatistics {
    /// Linear-interpolation quantile of the terminal values at any level `p` in `[0, 1]`.
    pub fn quantile(&self, p: f64) -> Result<f64, AnalyticsError> {
        stats::quantile(&self.sorted_terminal_values, p)
    }

    /// The terminal values in ascending order.
    pub fn terminal_values(&self) -> &[f64] {
        &self.sorted_terminal_values
    }

    /// Headline figures rounded to two decimal places for display.
    ///
    /// Rounding happens here only; the stored statistics keep full precision.
    pub fn summary(&self) -> Result<StatisticsSummary, AnalyticsError> {
        Ok(StatisticsSummary {
            count: self.count,
            mean: to_cents(self.mean, "mean")?,
            std_dev: to_cents(self.std_dev, "std_dev")?,
            min: to_cents(self.min, "min")?,
            max: to_cents(self.max, "max")?,
            median: to_cents(self.median, "median")?,
            quantile5: to_cents(self.quantile5, "quantile5")?,
            quantile95: to_cents(self.quantile95, "quantile95")?,
        })
    }
}

/// Display copy of the headline statistics with two decimal places.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatisticsSummary {
    pub count: usize,
    pub mean: Decimal,
    pub std_dev: Decimal,
    pub min: Decimal,
    pub max: Decimal,
    pub median: Decimal,
    pub quantile5: Decimal,
    pub quantile95: Decimal,
}

fn to_cents(value: f64, metric: &str) -> Result<Decimal, AnalyticsError> {
    Decimal::from_f64(value)
        .map(|d| d.round_dp(2))
        .ok_or_else(|| AnalyticsError::Calculation(format!("{metric} ({value}) does not fit a Decimal")))
}
