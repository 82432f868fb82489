use crate::error::ConfigError;
use std::path::Path;

// Declare the modules that make up this crate.
pub mod error;
pub mod settings;

// Re-export the core types to provide a clean public API.
pub use settings::{Config, InvalidValuePolicy, RebalanceSettings, StatisticsSettings};

const DEFAULT_CONFIG_FILE: &str = "config";
const ENV_PREFIX: &str = "ALLOCATION";

/// Loads the application configuration.
///
/// Sources, later ones winning: built-in defaults, an optional `config.toml` in the
/// working directory, then `ALLOCATION_*` environment variables using `__` between
/// nesting levels (e.g. `ALLOCATION_STATISTICS__BANDWIDTH=2.5`).
pub fn load_config() -> Result<Config, ConfigError> {
    build(config::File::with_name(DEFAULT_CONFIG_FILE).required(false))
}

/// Same as [`load_config`], but the file must exist at `path`.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    build(config::File::from(path).required(true))
}

fn build<T>(file: T) -> Result<Config, ConfigError>
where
    T: config::Source + Send + Sync + 'static,
{
    let builder = config::Config::builder()
        .add_source(file)
        .add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    let config = builder.try_deserialize::<Config>()?;
    validate(&config)?;

    tracing::debug!(?config, "Configuration loaded.");
    Ok(config)
}

/// Checks the cross-field rules serde cannot express.
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    let stats = &config.statistics;

    if !(stats.bandwidth.is_finite() && stats.bandwidth > 0.0) {
        return Err(invalid("statistics.bandwidth", "must be a positive number"));
    }
    if !(stats.grid_step.is_finite() && stats.grid_step > 0.0) {
        return Err(invalid("statistics.grid_step", "must be a positive number"));
    }
    if stats.max_grid_points == 0 {
        return Err(invalid("statistics.max_grid_points", "must be at least 1"));
    }
    if !(0.0..=1.0).contains(&stats.lower_quantile) || !(0.0..=1.0).contains(&stats.upper_quantile) {
        return Err(invalid("statistics.*_quantile", "quantile levels must lie in [0, 1]"));
    }
    if stats.lower_quantile >= stats.upper_quantile {
        return Err(invalid(
            "statistics.lower_quantile",
            "must be below statistics.upper_quantile",
        ));
    }

    let tolerance = config.rebalancing.tolerance;
    if !(tolerance.is_finite() && tolerance > 0.0) {
        return Err(invalid("rebalancing.tolerance", "must be a positive number"));
    }

    Ok(())
}

fn invalid(field: &'static str, reason: &str) -> ConfigError {
    ConfigError::ValidationError {
        field,
        reason: reason.to_string(),
    }
}
