//! Closed-loop simulation of the torque-limited pendulum.
//!
//! [`Simulator`](simulator::Simulator) runs any
//! [`Controller`](pendulum_core::traits::Controller) against a
//! [`PendulumPlant`](pendulum_plant::plant::PendulumPlant) and returns the
//! recorded trajectory. [`record`] reads and writes trajectories as CSV;
//! [`scenario`] builds a full run from a TOML scenario.
//!
//! # Example
//!
//! ```
//! use pendulum_control::prelude::*;
//! use pendulum_core::prelude::*;
//! use pendulum_plant::prelude::*;
//! use pendulum_sim::prelude::*;
//!
//! let plant = PendulumPlant::from_config(&presets::reference()).unwrap();
//! let params = *plant.params();
//! let config = EnergyShapingConfig::default();
//! let controller = EnergyShapingController::new(&params, &config).unwrap();
//!
//! let x0 = State::new(0.01, 0.0);
//! let run = Simulator::new(plant)
//!     .simulate(0.0, x0, 5.0, 0.01, &controller, IntegratorKind::RungeKutta4)
//!     .unwrap();
//! assert!(run.outcome().is_completed());
//! assert_eq!(run.trajectory().len(), 501);
//! ```

pub mod record;
pub mod scenario;
pub mod simulator;

/// Convenience re-exports for common usage.
pub mod prelude {
    pub use crate::record::{load_csv, read_csv, save_csv, write_csv};
    pub use crate::scenario::{build_controller, Scenario};
    pub use crate::simulator::{RunOutcome, SimulationRun, Simulator};
}
