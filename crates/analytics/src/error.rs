use core_types::CoreError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AnalyticsError {
    #[error("No terminal values to compute statistics over")]
    EmptyInput,

    #[error("Terminal value at index {index} is invalid: {value}")]
    InvalidValue { index: usize, value: f64 },

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Error in calculation: {0}")]
    Calculation(String),

    #[error(transparent)]
    Core(#[from] CoreError),
}
