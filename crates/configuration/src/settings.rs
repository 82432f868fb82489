use serde::{Deserialize, Serialize};

/// The root configuration structure for the entire application.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    pub statistics: StatisticsSettings,
    pub rebalancing: RebalanceSettings,
}

/// What to do with terminal values that are NaN, infinite, or negative.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
pub enum InvalidValuePolicy {
    /// Fail the whole batch with an error naming the first bad value.
    #[default]
    Reject,
    /// Drop the bad values and compute over whatever remains.
    Filter,
}

/// Parameters for turning a simulation matrix into summary statistics.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct StatisticsSettings {
    /// Half-width of the Epanechnikov kernel, in portfolio value units.
    pub bandwidth: f64,
    /// Spacing between density evaluation points.
    pub grid_step: f64,
    /// Upper bound on density evaluation points for a single call.
    pub max_grid_points: usize,
    /// Reported as `quantile5` in the statistics.
    pub lower_quantile: f64,
    /// Reported as `quantile95` in the statistics.
    pub upper_quantile: f64,
    pub invalid_values: InvalidValuePolicy,
}

/// Parameters for the weight rebalancer.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct RebalanceSettings {
    /// Allowed distance of the weight sum from 1.0 when checking normalization.
    pub tolerance: f64,
}

// --- Default Implementations ---
// A missing config.toml, or a missing section inside it, falls back to these.

impl Default for StatisticsSettings {
    fn default() -> Self {
        Self {
            bandwidth: 5.0,
            grid_step: 1.0,
            max_grid_points: 100_000,
            lower_quantile: 0.05,
            upper_quantile: 0.95,
            invalid_values: InvalidValuePolicy::Reject,
        }
    }
}

impl Default for RebalanceSettings {
    fn default() -> Self {
        Self { tolerance: 1e-9 }
    }
}
