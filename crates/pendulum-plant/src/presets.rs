//! Parameter sets for the reference torque-limited pendulum hardware.

use pendulum_core::config::PlantConfig;

/// Reference rig: 0.57288 kg point mass on a 0.5 m rod, 1 Nm motor.
///
/// Swing-up from rest needs several pumps: `m·g·l ≈ 2.81 Nm` exceeds the
/// torque limit.
pub fn reference() -> PlantConfig {
    PlantConfig::default()
}

/// Reference rig with a 2 Nm torque limit, as used for trajectory tracking.
pub fn high_torque() -> PlantConfig {
    PlantConfig {
        torque_limit: 2.0,
        ..reference()
    }
}

/// Reference rig with the heavier bearing damping used for trajectory
/// optimization (`b = 0.15`).
pub fn heavy_damping() -> PlantConfig {
    PlantConfig {
        damping: 0.15,
        torque_limit: 2.0,
        ..reference()
    }
}

/// Reference rig with no losses: useful for energy-conservation checks.
pub fn lossless() -> PlantConfig {
    PlantConfig {
        damping: 0.0,
        coulomb_fric: 0.0,
        ..reference()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
