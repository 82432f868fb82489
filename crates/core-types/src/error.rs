use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Invalid input for {0}: {1}")]
    InvalidInput(String, String),

    #[error("Simulation matrix has no time steps or no simulated runs")]
    EmptyMatrix,

    #[error("Time step {step} has {found} simulated values, expected {expected}")]
    RaggedMatrix {
        step: usize,
        expected: usize,
        found: usize,
    },

    #[error("Failed to parse JSON payload: {0}")]
    Parse(#[from] serde_json::Error),
}
