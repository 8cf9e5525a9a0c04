// pendulum-core: Types, controller trait, config and errors for pendulum simulation.

pub mod config;
pub mod error;
pub mod traits;
pub mod trajectory;
pub mod types;

pub mod prelude {
    pub use crate::config::{
        ControllerConfig, EnergyShapingConfig, IntegratorKind, LqrConfig, PlantConfig,
        ScenarioConfig, SimulationConfig, SwingUpStabilizerConfig, TrajectoryFollowerConfig,
    };
    pub use crate::error::{ConfigError, PendulumError, RecordError, SimError, TrajectoryError};
    pub use crate::traits::{validate_goal, Controller};
    pub use crate::trajectory::Trajectory;
    pub use crate::types::{wrap_angle, ControlOutput, Measurement, State, StateDerivative};
}
