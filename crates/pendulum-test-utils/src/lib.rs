//! Shared test fixtures and utilities for pendulum crates.
//!
//! Provides the reference plant, mock controllers and deterministic RNG
//! setup.

pub mod fixtures;
pub mod mocks;
pub mod rng;

// ---------------------------------------------------------------------------
// Re-exports for convenience
// ---------------------------------------------------------------------------

pub use fixtures::{reference_params, reference_plant};
pub use mocks::{ConstantTorque, Declining, RandomTorque};
pub use rng::seeded_rng;
