//! Swing-up followed by LQR catch at the top.

use tracing::trace;

use pendulum_core::config::SwingUpStabilizerConfig;
use pendulum_core::error::ConfigError;
use pendulum_core::traits::Controller;
use pendulum_core::types::{wrap_angle, ControlOutput, Measurement, State};
use pendulum_plant::plant::PlantParameters;

use crate::energy_shaping::EnergyShapingController;
use crate::lqr::LqrController;

// ---------------------------------------------------------------------------
// SwingUpStabilizer
// ---------------------------------------------------------------------------

/// Energy shaping everywhere except inside `capture_radius` of the upright
/// position, where the LQR command is used whenever it fits the torque
/// limit.
#[derive(Clone, Debug)]
pub struct SwingUpStabilizer {
    swing_up: EnergyShapingController,
    stabilizer: LqrController,
    capture_radius: f64,
}

impl SwingUpStabilizer {
    pub fn new(
        params: &PlantParameters,
        config: &SwingUpStabilizerConfig,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            swing_up: EnergyShapingController::new(params, &config.energy)?,
            stabilizer: LqrController::new(params, &config.lqr)?,
            capture_radius: config.capture_radius,
        })
    }

    pub const fn swing_up(&self) -> &EnergyShapingController {
        &self.swing_up
    }

    pub const fn stabilizer(&self) -> &LqrController {
        &self.stabilizer
    }

    /// `true` when LQR handles `state`.
    pub fn is_captured(&self, state: &State) -> bool {
        self.captured_command(state).is_some()
    }

    fn captured_command(&self, state: &State) -> Option<f64> {
        let error = wrap_angle(state.position - State::upright().position);
        if error.abs() > self.capture_radius {
            return None;
        }
        self.stabilizer.command(state)
    }
}

impl Controller for SwingUpStabilizer {
    fn get_control_output(&self, measurement: &Measurement) -> ControlOutput {
        let state = measurement.state();
        if let Some(u) = self.captured_command(&state) {
            trace!(torque = u, "stabilizer: LQR");
            return ControlOutput::torque(u);
        }
        self.swing_up.get_control_output(measurement)
    }

    /// Moves the swing-up target; the LQR catch stays at the upright
    /// equilibrium.
    fn set_goal(&mut self, goal: State) -> Result<(), ConfigError> {
        self.swing_up.set_goal(goal)
    }

    #[allow(clippy::unnecessary_literal_bound)]
    fn name(&self) -> &str {
        "SwingUpStabilizer"
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
