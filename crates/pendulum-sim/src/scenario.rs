//! Assemble a runnable closed loop from a [`ScenarioConfig`].

use tracing::debug;

use pendulum_core::config::{ControllerConfig, ScenarioConfig, SimulationConfig};
use pendulum_core::error::PendulumError;
use pendulum_core::traits::Controller;
use pendulum_core::types::State;
use pendulum_control::energy_shaping::EnergyShapingController;
use pendulum_control::lqr::LqrController;
use pendulum_control::stabilizer::SwingUpStabilizer;
use pendulum_control::tracking::TrajectoryFollower;
use pendulum_plant::plant::{PendulumPlant, PlantParameters};

use crate::record::load_csv;
use crate::simulator::{SimulationRun, Simulator};

/// Build the controller described by `config` and aim it at `goal`.
///
/// Trajectory followers load their reference CSV here.
pub fn build_controller(
    config: &ControllerConfig,
    params: &PlantParameters,
    goal: State,
) -> Result<Box<dyn Controller>, PendulumError> {
    let mut controller: Box<dyn Controller> = match config {
        ControllerConfig::EnergyShaping(c) => Box::new(EnergyShapingController::new(params, c)?),
        ControllerConfig::Lqr(c) => Box::new(LqrController::new(params, c)?),
        ControllerConfig::SwingUpStabilizer(c) => Box::new(SwingUpStabilizer::new(params, c)?),
        ControllerConfig::TrajectoryFollower(c) => {
            c.validate()?;
            let reference = load_csv(&c.reference)?;
            debug!(
                path = %c.reference.display(),
                samples = reference.len(),
                "loaded reference trajectory"
            );
            Box::new(TrajectoryFollower::from_config(reference, params, c)?)
        }
    };
    controller.set_goal(goal)?;
    Ok(controller)
}

// ---------------------------------------------------------------------------
// Scenario
// ---------------------------------------------------------------------------

/// A validated plant, controller, time grid and initial state.
pub struct Scenario {
    simulator: Simulator,
    controller: Box<dyn Controller>,
    simulation: SimulationConfig,
    x0: State,
}

impl Scenario {
    pub fn from_config(config: &ScenarioConfig) -> Result<Self, PendulumError> {
        config.validate()?;
        let params = PlantParameters::from_config(&config.plant)?;
        let controller = build_controller(&config.controller, &params, config.goal_state())?;
        Ok(Self {
            simulator: Simulator::new(PendulumPlant::new(params)),
            controller,
            simulation: config.simulation.clone(),
            x0: config.initial_state(),
        })
    }

    pub const fn simulator(&self) -> &Simulator {
        &self.simulator
    }

    pub fn controller(&self) -> &dyn Controller {
        self.controller.as_ref()
    }

    pub const fn simulation(&self) -> &SimulationConfig {
        &self.simulation
    }

    pub const fn initial_state(&self) -> State {
        self.x0
    }

    pub fn run(&self) -> Result<SimulationRun, PendulumError> {
        self.simulator.run(&self.simulation, self.x0, self.controller.as_ref())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
