//! # Allocation Lab Rebalancer
//!
//! Keeps a portfolio's allocation at 100% while the user edits it one asset at a time.
//!
//! ## Architectural Principles
//!
//! - **Layer 1 Logic:** A pure logic crate. It depends only on `core-types` and
//!   `configuration`, and never performs I/O.
//! - **State Passed In:** The rebalancer owns no portfolio. Each call receives the
//!   current assets and returns a new `WeightVector`; persisting it is the caller's job.
//!
//! ## Public API
//!
//! - `WeightRebalancer`: slider rebalancing plus the add/remove/equalize transitions.
//! - `PortfolioAction`: the edits accepted by `WeightRebalancer::apply`.
//! - `RebalanceError`: returned only by transitions that can name a missing or duplicate asset.

// Declare the modules that constitute this crate.
pub mod action;
pub mod error;
pub mod weights;

// Re-export the key components to create a clean, public-facing API.
pub use action::PortfolioAction;
pub use error::RebalanceError;
pub use weights::WeightRebalancer;
