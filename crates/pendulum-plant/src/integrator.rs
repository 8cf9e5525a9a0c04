//! Explicit fixed-step integrators.
//!
//! The angle is never wrapped here: multi-turn motion accumulates and
//! consumers wrap where they need an error.

use pendulum_core::config::{require_dt, IntegratorKind};
use pendulum_core::error::ConfigError;
use pendulum_core::types::State;

use crate::plant::Dynamics;

// ---------------------------------------------------------------------------
// Integrator
// ---------------------------------------------------------------------------

/// A scheme bound to a validated timestep.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Integrator {
    kind: IntegratorKind,
    dt: f64,
}

impl Integrator {
    /// Returns Err if `dt` is not strictly positive and finite.
    pub fn new(kind: IntegratorKind, dt: f64) -> Result<Self, ConfigError> {
        require_dt(dt)?;
        Ok(Self { kind, dt })
    }

    /// Fourth-order Runge–Kutta with step `dt`.
    pub fn runge_kutta(dt: f64) -> Result<Self, ConfigError> {
        Self::new(IntegratorKind::RungeKutta4, dt)
    }

    /// Forward Euler with step `dt`.
    pub fn euler(dt: f64) -> Result<Self, ConfigError> {
        Self::new(IntegratorKind::Euler, dt)
    }

    pub const fn kind(&self) -> IntegratorKind {
        self.kind
    }

    pub const fn dt(&self) -> f64 {
        self.dt
    }

    /// Advance `state` by one step, holding `torque` constant over it.
    pub fn step<D: Dynamics + ?Sized>(&self, plant: &D, state: &State, torque: f64) -> State {
        match self.kind {
            IntegratorKind::Euler => euler_step(plant, state, torque, self.dt),
            IntegratorKind::RungeKutta4 => rk4_step(plant, state, torque, self.dt),
        }
    }
}

/// One step of `kind`, validating `dt` at call time.
pub fn step<D: Dynamics + ?Sized>(
    kind: IntegratorKind,
    plant: &D,
    state: &State,
    torque: f64,
    dt: f64,
) -> Result<State, ConfigError> {
    Integrator::new(kind, dt).map(|integrator| integrator.step(plant, state, torque))
}

fn euler_step<D: Dynamics + ?Sized>(plant: &D, state: &State, torque: f64, dt: f64) -> State {
    state.advance(&plant.derivative(state, torque), dt)
}

fn rk4_step<D: Dynamics + ?Sized>(plant: &D, state: &State, torque: f64, dt: f64) -> State {
    const ONE_BY_SIX: f64 = 1.0 / 6.0;
    let half = 0.5 * dt;

    let k1 = plant.derivative(state, torque);
    let k2 = plant.derivative(&state.advance(&k1, half), torque);
    let k3 = plant.derivative(&state.advance(&k2, half), torque);
    let k4 = plant.derivative(&state.advance(&k3, dt), torque);

    let velocity =
        ONE_BY_SIX * 2.0f64.mul_add(k2.velocity + k3.velocity, k1.velocity + k4.velocity);
    let acceleration = ONE_BY_SIX
        * 2.0f64.mul_add(
            k2.acceleration + k3.acceleration,
            k1.acceleration + k4.acceleration,
        );

    State::new(
        dt.mul_add(velocity, state.position),
        dt.mul_add(acceleration, state.velocity),
    )
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
