//! Energy-shaping swing-up with a feedback-linearized PD catch near the goal.
//!
//! Far from the goal the controller pumps mechanical energy toward the goal
//! energy:
//!
//! ```text
//! E     = ½·I·θ̇² + m·g·l·(1 − cos θ)
//! u     = k_e · θ̇ · (E_goal − E)
//! ```
//!
//! Once the wrapped angle error drops below `switch_threshold` it cancels
//! gravity and viscous damping and imposes a PD target acceleration:
//!
//! ```text
//! u = I·(−kp·e − kd·(θ̇ − θ̇_goal)) + m·g·l·sin θ + b·θ̇
//! ```
//!
//! Both laws are clipped to the torque limit.

use tracing::trace;

use pendulum_core::config::EnergyShapingConfig;
use pendulum_core::error::ConfigError;
use pendulum_core::traits::{validate_goal, Controller};
use pendulum_core::types::{ControlOutput, Measurement, State};
use pendulum_plant::plant::PlantParameters;

/// Active branch of the energy-shaping law.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EnergyMode {
    /// Pumping energy toward the goal energy.
    SwingUp,
    /// Feedback-linearized PD around the goal.
    Catch,
}

// ---------------------------------------------------------------------------
// EnergyShapingController
// ---------------------------------------------------------------------------

#[derive(Clone, Debug)]
pub struct EnergyShapingController {
    params: PlantParameters,
    config: EnergyShapingConfig,
    goal: State,
    goal_energy: f64,
}

impl EnergyShapingController {
    /// Controller targeting the upright equilibrium.
    pub fn new(
        params: &PlantParameters,
        config: &EnergyShapingConfig,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        let goal = State::upright();
        Ok(Self {
            params: *params,
            config: config.clone(),
            goal,
            goal_energy: mechanical_energy(params, &goal),
        })
    }

    pub const fn goal(&self) -> State {
        self.goal
    }

    /// Energy of the goal state (J).
    pub const fn goal_energy(&self) -> f64 {
        self.goal_energy
    }

    pub const fn config(&self) -> &EnergyShapingConfig {
        &self.config
    }

    /// Mechanical energy of `state` (J), zero hanging at rest.
    pub fn energy(&self, state: &State) -> f64 {
        mechanical_energy(&self.params, state)
    }

    /// Which law applies at `state`.
    pub fn mode(&self, state: &State) -> EnergyMode {
        let (error, _) = state.error_to(&self.goal);
        if error.abs() < self.config.switch_threshold {
            EnergyMode::Catch
        } else {
            EnergyMode::SwingUp
        }
    }

    /// Clipped torque command at `state`.
    pub fn torque(&self, state: &State) -> f64 {
        let mode = self.mode(state);
        let u = match mode {
            EnergyMode::SwingUp => {
                self.config.k_e * state.velocity * (self.goal_energy - self.energy(state))
            }
            EnergyMode::Catch => {
                let (error, velocity_error) = state.error_to(&self.goal);
                let acceleration = -self.config.kp * error - self.config.kd * velocity_error;
                self.params.inertia().mul_add(
                    acceleration,
                    self.params.gravity_torque() * state.position.sin(),
                ) + self.params.damping() * state.velocity
            }
        };
        trace!(?mode, torque = u, "energy shaping");
        u.clamp(-self.params.torque_limit(), self.params.torque_limit())
    }
}

fn mechanical_energy(params: &PlantParameters, state: &State) -> f64 {
    (0.5 * params.inertia() * state.velocity).mul_add(
        state.velocity,
        params.gravity_torque() * (1.0 - state.position.cos()),
    )
}

impl Controller for EnergyShapingController {
    fn get_control_output(&self, measurement: &Measurement) -> ControlOutput {
        ControlOutput::torque(self.torque(&measurement.state()))
    }

    fn set_goal(&mut self, goal: State) -> Result<(), ConfigError> {
        validate_goal(&goal)?;
        self.goal = goal;
        self.goal_energy = mechanical_energy(&self.params, &goal);
        Ok(())
    }

    #[allow(clippy::unnecessary_literal_bound)]
    fn name(&self) -> &str {
        "EnergyShaping"
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
