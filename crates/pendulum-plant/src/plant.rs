//! Physical parameters and continuous-time dynamics of the pendulum.
//!
//! # Physics
//!
//! ```text
//! I·θ̈ = u - m·g·l·sin θ - b·θ̇ - c·sign(θ̇)
//! ```
//!
//! `θ = 0` hangs straight down, `θ = π` is inverted. The input `u` is
//! clipped to `±torque_limit` before it reaches the joint, whatever the
//! controller asked for.

use pendulum_core::config::PlantConfig;
use pendulum_core::error::ConfigError;
use pendulum_core::types::{sign, State, StateDerivative};

use crate::friction::FrictionModel;

// ---------------------------------------------------------------------------
// PlantParameters
// ---------------------------------------------------------------------------

/// Validated, immutable physical parameters.
///
/// Only constructible through [`PlantParameters::from_config`], so every
/// instance satisfies the positivity invariants.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlantParameters {
    mass: f64,
    length: f64,
    damping: f64,
    gravity: f64,
    coulomb_fric: f64,
    inertia: f64,
    torque_limit: f64,
}

impl PlantParameters {
    /// Validate `config` and freeze it. Inertia defaults to `mass·length²`.
    pub fn from_config(config: &PlantConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            mass: config.mass,
            length: config.length,
            damping: config.damping,
            gravity: config.gravity,
            coulomb_fric: config.coulomb_fric,
            inertia: config.effective_inertia(),
            torque_limit: config.torque_limit,
        })
    }

    /// Bob mass (kg).
    pub const fn mass(&self) -> f64 {
        self.mass
    }

    /// Rod length (m).
    pub const fn length(&self) -> f64 {
        self.length
    }

    /// Viscous damping (Nm·s/rad).
    pub const fn damping(&self) -> f64 {
        self.damping
    }

    /// Gravitational acceleration (m/s²).
    pub const fn gravity(&self) -> f64 {
        self.gravity
    }

    /// Coulomb friction magnitude (Nm).
    pub const fn coulomb_fric(&self) -> f64 {
        self.coulomb_fric
    }

    /// Moment of inertia about the pivot (kg·m²).
    pub const fn inertia(&self) -> f64 {
        self.inertia
    }

    /// Actuator torque limit (Nm).
    pub const fn torque_limit(&self) -> f64 {
        self.torque_limit
    }

    /// Peak gravity torque `m·g·l` (Nm).
    pub fn gravity_torque(&self) -> f64 {
        self.mass * self.gravity * self.length
    }

    /// Config equivalent, with the inertia made explicit.
    pub fn to_config(&self) -> PlantConfig {
        PlantConfig {
            mass: self.mass,
            length: self.length,
            damping: self.damping,
            gravity: self.gravity,
            coulomb_fric: self.coulomb_fric,
            inertia: Some(self.inertia),
            torque_limit: self.torque_limit,
        }
    }
}

impl TryFrom<&PlantConfig> for PlantParameters {
    type Error = ConfigError;

    fn try_from(config: &PlantConfig) -> Result<Self, Self::Error> {
        Self::from_config(config)
    }
}

// ---------------------------------------------------------------------------
// Dynamics
// ---------------------------------------------------------------------------

/// A first-order system driven by a scalar torque.
pub trait Dynamics {
    /// State derivative under `torque`.
    fn derivative(&self, state: &State, torque: f64) -> StateDerivative;
}

// ---------------------------------------------------------------------------
// PendulumPlant
// ---------------------------------------------------------------------------

/// Damped, torque-limited simple pendulum.
#[derive(Clone, Debug)]
pub struct PendulumPlant {
    params: PlantParameters,
    friction: FrictionModel,
}

impl PendulumPlant {
    pub const fn new(params: PlantParameters) -> Self {
        Self {
            friction: FrictionModel::new(params.coulomb_fric, params.damping),
            params,
        }
    }

    /// Validate `config` and build the plant.
    pub fn from_config(config: &PlantConfig) -> Result<Self, ConfigError> {
        PlantParameters::from_config(config).map(Self::new)
    }

    pub const fn params(&self) -> &PlantParameters {
        &self.params
    }

    pub const fn friction(&self) -> &FrictionModel {
        &self.friction
    }

    /// Saturate a torque command to `±torque_limit`.
    ///
    /// NaN passes through unchanged so a broken controller shows up as a
    /// diverged run rather than a silent zero.
    pub fn clip_torque(&self, torque: f64) -> f64 {
        torque.clamp(-self.params.torque_limit, self.params.torque_limit)
    }

    /// Angular acceleration (rad/s²) under `torque`, after clipping.
    pub fn forward_dynamics(&self, state: &State, torque: f64) -> f64 {
        let applied = self.clip_torque(torque);
        let gravity = self.params.gravity_torque() * state.position.sin();
        let friction = self.friction.compute(state.velocity);
        (applied - gravity + friction) / self.params.inertia
    }

    /// Torque (Nm) needed to produce `acceleration` at `state`. Not clipped.
    pub fn inverse_dynamics(&self, state: &State, acceleration: f64) -> f64 {
        self.params.inertia.mul_add(
            acceleration,
            self.params.gravity_torque() * state.position.sin(),
        ) + self.params.damping * state.velocity
            + self.params.coulomb_fric * sign(state.velocity)
    }

    /// Kinetic energy `½·I·θ̇²` (J).
    pub fn kinetic_energy(&self, state: &State) -> f64 {
        0.5 * self.params.inertia * state.velocity * state.velocity
    }

    /// Potential energy `m·g·l·(1 - cos θ)` (J), zero hanging down.
    pub fn potential_energy(&self, state: &State) -> f64 {
        self.params.gravity_torque() * (1.0 - state.position.cos())
    }

    /// Total mechanical energy (J).
    pub fn total_energy(&self, state: &State) -> f64 {
        self.kinetic_energy(state) + self.potential_energy(state)
    }

    /// Bob position `(x, y)` (m) with the pivot at the origin, `y` up.
    pub fn forward_kinematics(&self, position: f64) -> (f64, f64) {
        let l = self.params.length;
        (l * position.sin(), -l * position.cos())
    }

    /// Joint angle (rad, in `(-π, π]`) placing the bob at `(x, y)`.
    pub fn inverse_kinematics(&self, x: f64, y: f64) -> f64 {
        x.atan2(-y)
    }
}

impl Dynamics for PendulumPlant {
    fn derivative(&self, state: &State, torque: f64) -> StateDerivative {
        StateDerivative::new(state.velocity, self.forward_dynamics(state, torque))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
