//! # Allocation Lab Analytics
//!
//! Turns the Monte Carlo output of the simulation service into the numbers and the
//! density curve the prediction view displays.
//!
//! ## Architectural Principles
//!
//! - **Layer 1 Logic:** A pure logic crate with no knowledge of the network layer that
//!   fetched the simulation. It depends only on `core-types` and `configuration`.
//! - **Stateless Calculation:** The `SimulationStatsEngine` takes a `SimulationMatrix`
//!   and produces a fresh `SimulationStatistics`. Invalid input is returned as an
//!   error, never logged and swallowed.
//!
//! ## Public API
//!
//! - `SimulationStatsEngine`: endpoint statistics and kernel density estimation.
//! - `SimulationStatistics` / `StatisticsSummary`: full-precision result and its rounded display copy.
//! - `stats` and `kde`: the underlying mean, standard deviation, quantile, and kernel functions.
//! - `AnalyticsError`: the specific error types that can be returned from this crate.

// Declare the modules that constitute this crate.
pub mod engine;
pub mod error;
pub mod kde;
pub mod report;
pub mod stats;

// Re-export the key components to create a clean, public-facing API.
pub use engine::SimulationStatsEngine;
pub use error::AnalyticsError;
pub use kde::DensityPoint;
pub use report::{SimulationStatistics, StatisticsSummary};
