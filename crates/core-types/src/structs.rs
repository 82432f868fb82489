use crate::error::CoreError;
use serde::{Deserialize, Serialize};

/// A single holding in a portfolio, as returned by the portfolio API.
///
/// Only `symbol` and `weight` take part in rebalancing. The descriptive fields
/// are carried through untouched so the UI can redraw the same rows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Asset {
    pub symbol: String,
    /// Fraction of the portfolio held in this asset, in `[0, 1]`.
    pub weight: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sector: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub industry: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
}

impl Asset {
    /// Creates a bare asset with no descriptive metadata.
    pub fn new(symbol: impl Into<String>, weight: f64) -> Self {
        Self {
            symbol: symbol.into(),
            weight,
            name: None,
            sector: None,
            industry: None,
            currency: None,
        }
    }

    /// The weight as a slider percentage (0..=100).
    pub fn weight_pct(&self) -> f64 {
        self.weight * 100.0
    }
}

/// An ordered set of assets whose weights sum to 1.0.
///
/// Every rebalancing operation builds a fresh one; callers' slices are never mutated.
pub type WeightVector = Vec<Asset>;

/// Simulated portfolio values laid out as `steps[t][run]`.
///
/// Construction guarantees at least one step, at least one run, and the same
/// number of runs at every step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Vec<f64>>", into = "Vec<Vec<f64>>")]
pub struct SimulationMatrix {
    steps: Vec<Vec<f64>>,
}

impl SimulationMatrix {
    pub fn new(steps: Vec<Vec<f64>>) -> Result<Self, CoreError> {
        let expected = match steps.first() {
            Some(first) if !first.is_empty() => first.len(),
            _ => return Err(CoreError::EmptyMatrix),
        };

        if let Some((step, row)) = steps
            .iter()
            .enumerate()
            .find(|(_, row)| row.len() != expected)
        {
            return Err(CoreError::RaggedMatrix {
                step,
                expected,
                found: row.len(),
            });
        }

        tracing::debug!(
            steps = steps.len(),
            runs = expected,
            "Simulation matrix accepted."
        );
        Ok(Self { steps })
    }

    /// Parses the simulation service response: a JSON array of T arrays of N values.
    pub fn from_json(payload: &str) -> Result<Self, CoreError> {
        let steps: Vec<Vec<f64>> = serde_json::from_str(payload)?;
        Self::new(steps)
    }

    pub fn num_steps(&self) -> usize {
        self.steps.len()
    }

    pub fn num_runs(&self) -> usize {
        self.steps[0].len()
    }

    pub fn steps(&self) -> &[Vec<f64>] {
        &self.steps
    }

    /// The value of every simulated run at the final time step.
    pub fn terminal_values(&self) -> &[f64] {
        // `new` rejects matrices without steps.
        self.steps.last().map(Vec::as_slice).unwrap_or_default()
    }

    /// One simulated path across all time steps, or `None` if `run` is out of range.
    pub fn path(&self, run: usize) -> Option<Vec<f64>> {
        if run >= self.num_runs() {
            return None;
        }
        Some(self.steps.iter().map(|step| step[run]).collect())
    }

    /// Every simulated path in run order, the series a chart draws one line per.
    pub fn paths(&self) -> impl Iterator<Item = Vec<f64>> + '_ {
        (0..self.num_runs()).map(move |run| self.steps.iter().map(|step| step[run]).collect())
    }
}

impl TryFrom<Vec<Vec<f64>>> for SimulationMatrix {
    type Error = CoreError;

    fn try_from(steps: Vec<Vec<f64>>) -> Result<Self, Self::Error> {
        Self::new(steps)
    }
}

impl From<SimulationMatrix> for Vec<Vec<f64>> {
    fn from(matrix: SimulationMatrix) -> Self {
        matrix.steps
    }
}
