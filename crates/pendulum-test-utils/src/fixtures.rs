//! Reference hardware fixtures.

use pendulum_core::config::PlantConfig;
use pendulum_plant::plant::{PendulumPlant, PlantParameters};
use pendulum_plant::presets;

/// Parameters of the reference pendulum (`m = 0.57288`, `l = 0.5`,
/// `b = 0.05`, `τ_max = 1.0`).
pub fn reference_params() -> PlantParameters {
    params(&presets::reference())
}

/// Plant built from [`reference_params`].
pub fn reference_plant() -> PendulumPlant {
    PendulumPlant::new(reference_params())
}

/// Reference pendulum without damping or friction.
pub fn lossless_plant() -> PendulumPlant {
    PendulumPlant::new(params(&presets::lossless()))
}

/// Validate `config`, panicking on failure. Test fixtures only.
pub fn params(config: &PlantConfig) -> PlantParameters {
    PlantParameters::from_config(config).expect("fixture plant config must be valid")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
