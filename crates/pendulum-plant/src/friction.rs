//! Joint friction: viscous damping plus Coulomb friction.
//!
//! # Physics
//!
//! `F = -coulomb·sign(v) - viscous·v`, with `sign(0) = 0` so the joint
//! feels no Coulomb torque at exact rest.

use pendulum_core::types::sign;

// ---------------------------------------------------------------------------
// FrictionModel
// ---------------------------------------------------------------------------

/// Joint friction model with Coulomb and viscous components.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FrictionModel {
    /// Coulomb (kinetic) friction (Nm).
    pub coulomb: f64,
    /// Viscous damping coefficient (Nm/(rad/s)).
    pub viscous: f64,
}

impl Default for FrictionModel {
    fn default() -> Self {
        Self::none()
    }
}

impl FrictionModel {
    /// No friction at all.
    pub const fn none() -> Self {
        Self {
            coulomb: 0.0,
            viscous: 0.0,
        }
    }

    /// New friction model with Coulomb and viscous terms.
    pub const fn new(coulomb: f64, viscous: f64) -> Self {
        Self { coulomb, viscous }
    }

    /// Friction torque opposing `velocity`.
    ///
    /// Returns `-coulomb × sign(v) - viscous × v`.
    pub fn compute(&self, velocity: f64) -> f64 {
        (-self.coulomb).mul_add(sign(velocity), -(self.viscous * velocity))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
