//! # Allocation Lab Core Types
//!
//! Layer 0 data shared by every other crate: the portfolio `Asset` rows the
//! rebalancer works on and the `SimulationMatrix` the analytics engine reads.

pub mod error;
pub mod structs;

// Re-export the core types to provide a clean public API.
pub use error::CoreError;
pub use structs::{Asset, SimulationMatrix, WeightVector};
