use crate::error::AnalyticsError;
use crate::kde::{self, DensityPoint};
use crate::report::SimulationStatistics;
use crate::stats;
use configuration::{InvalidValuePolicy, StatisticsSettings};
use core_types::SimulationMatrix;

/// A stateless calculator that turns simulated portfolio paths into endpoint statistics.
#[derive(Debug, Clone, Default)]
pub struct SimulationStatsEngine {
    settings: StatisticsSettings,
}

impl SimulationStatsEngine {
    pub fn new(settings: StatisticsSettings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &StatisticsSettings {
        &self.settings
    }

    /// The main entry point for summarizing a simulation.
    ///
    /// Only the final time step is used: one terminal value per simulated path.
    ///
    /// # Arguments
    ///
    /// * `matrix` - Simulated portfolio values, `T` steps by `N` runs.
    ///
    /// # Returns
    ///
    /// A `Result` containing the `SimulationStatistics` or an `AnalyticsError`. Nothing
    /// partial is returned when the terminal values are empty or rejected.
    pub fn analyze(&self, matrix: &SimulationMatrix) -> Result<SimulationStatistics, AnalyticsError> {
        let terminal = self.screen(matrix.terminal_values())?;

        let mean = stats::mean(&terminal)?;
        let std_dev = stats::population_std_dev(&terminal, mean)?;

        let mut sorted = terminal;
        sorted.sort_by(f64::total_cmp);

        let quantile5 = stats::quantile(&sorted, self.settings.lower_quantile)?;
        let quantile95 = stats::quantile(&sorted, self.settings.upper_quantile)?;
        let median = stats::quantile(&sorted, 0.5)?;
        let density = self.estimate(&sorted)?;

        tracing::debug!(
            steps = matrix.num_steps(),
            runs = matrix.num_runs(),
            used = sorted.len(),
            mean,
            std_dev,
            "Simulation statistics computed."
        );

        Ok(SimulationStatistics {
            count: sorted.len(),
            mean,
            std_dev,
            min: sorted[0],
            max: sorted[sorted.len() - 1],
            median,
            quantile5,
            quantile95,
            density,
            sorted_terminal_values: sorted,
        })
    }

    /// Parses a simulation service response and analyzes it in one step.
    ///
    /// Malformed JSON, an empty matrix, or rows of different lengths surface as
    /// `AnalyticsError::Core`.
    pub fn analyze_json(&self, payload: &str) -> Result<SimulationStatistics, AnalyticsError> {
        let matrix = SimulationMatrix::from_json(payload)?;
        self.analyze(&matrix)
    }

    /// Kernel density estimate of `values` over the configured grid.
    pub fn density(&self, values: &[f64]) -> Result<Vec<DensityPoint>, AnalyticsError> {
        let screened = self.screen(values)?;
        self.estimate(&screened)
    }

    fn estimate(&self, values: &[f64]) -> Result<Vec<DensityPoint>, AnalyticsError> {
        kde::estimate(
            values,
            self.settings.bandwidth,
            self.settings.grid_step,
            self.settings.max_grid_points,
        )
    }

    /// Applies the invalid value policy. NaN, infinite, and negative values are never
    /// passed on to the calculations.
    fn screen(&self, values: &[f64]) -> Result<Vec<f64>, AnalyticsError> {
        if values.is_empty() {
            return Err(AnalyticsError::EmptyInput);
        }

        match self.settings.invalid_values {
            InvalidValuePolicy::Reject => {
                if let Some((index, &value)) = values.iter().enumerate().find(|(_, v)| !is_valid(**v)) {
                    return Err(AnalyticsError::InvalidValue { index, value });
                }
                Ok(values.to_vec())
            }
            InvalidValuePolicy::Filter => {
                let kept: Vec<f64> = values.iter().copied().filter(|v| is_valid(*v)).collect();
                let dropped = values.len() - kept.len();
                if dropped > 0 {
                    tracing::warn!(dropped, total = values.len(), "Discarded invalid terminal values.");
                }
                if kept.is_empty() {
                    return Err(AnalyticsError::EmptyInput);
                }
                Ok(kept)
            }
        }
    }
}

fn is_valid(value: f64) -> bool {
    value.is_finite() && value >= 0.0
}
