//! Torque-limited simple pendulum: parameters, dynamics and integrators.
//!
//! Pure Rust library with no engine dependencies.
//!
//! # Pipeline
//!
//! ```text
//! Command → Clip (±τ_max) → Gravity + Friction → θ̈ → Integrator → next State
//! ```
//!
//! # Quick Start
//!
//! ```
//! use pendulum_core::types::State;
//! use pendulum_plant::prelude::*;
//!
//! let plant = PendulumPlant::from_config(&presets::reference()).unwrap();
//! let integrator = Integrator::runge_kutta(0.01).unwrap();
//!
//! let mut state = State::new(0.5, 0.0);
//! for _ in 0..100 {
//!     state = integrator.step(&plant, &state, 0.0);
//! }
//! assert!(plant.total_energy(&state) <= plant.total_energy(&State::new(0.5, 0.0)));
//! ```

pub mod friction;
pub mod integrator;
pub mod plant;
pub mod presets;

/// Convenience re-exports for common usage.
pub mod prelude {
    pub use crate::friction::FrictionModel;
    pub use crate::integrator::Integrator;
    pub use crate::plant::{Dynamics, PendulumPlant, PlantParameters};
    pub use crate::presets;
    pub use pendulum_core::config::IntegratorKind;
}
