//! LQR stabilization about the upright equilibrium.

use nalgebra::{Matrix2, Vector2};
use tracing::debug;

use pendulum_core::config::LqrConfig;
use pendulum_core::error::ConfigError;
use pendulum_core::traits::Controller;
use pendulum_core::types::{wrap_angle, ControlOutput, Measurement, State};
use pendulum_plant::plant::PlantParameters;

use crate::riccati::{lqr, GainMatrices};

// ---------------------------------------------------------------------------
// LqrController
// ---------------------------------------------------------------------------

/// Linear-quadratic regulator linearized at `θ = π`.
///
/// With `e = wrap(θ − π)` and `x = (e, θ̇)`:
///
/// ```text
/// ẋ = A·x + B·u,  A = [[0, 1], [m·g·l/I, −b/I]],  B = [0, 1/I]ᵀ
/// u = −K·x
/// ```
///
/// Commands beyond the torque limit are declined rather than clipped: the
/// linear model is only trusted where it can be tracked. The target is fixed
/// at the upright equilibrium; [`Controller::set_goal`] checks and ignores
/// other goals.
#[derive(Clone, Debug)]
pub struct LqrController {
    gains: GainMatrices,
    torque_limit: f64,
}

impl LqrController {
    /// Linearize the plant, solve the Riccati equation and store the gains.
    pub fn new(params: &PlantParameters, config: &LqrConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let (a, b) = upright_linearization(params);
        let [[q11, q12], [q21, q22]] = config.q;
        let q = Matrix2::new(q11, q12, q21, q22);
        let gains = lqr(&a, &b, &q, config.r)?;
        debug!(
            k0 = gains.k[0],
            k1 = gains.k[1],
            r = config.r,
            "LQR gains computed"
        );
        Ok(Self {
            gains,
            torque_limit: params.torque_limit(),
        })
    }

    pub const fn gains(&self) -> &GainMatrices {
        &self.gains
    }

    pub const fn torque_limit(&self) -> f64 {
        self.torque_limit
    }

    /// Unclipped feedback `−K·(wrap(θ − π), θ̇)`.
    pub fn feedback(&self, state: &State) -> f64 {
        -(self.gains.k * upright_error(state))[0]
    }

    /// Feedback torque, or `None` when it exceeds the torque limit.
    pub fn command(&self, state: &State) -> Option<f64> {
        let u = self.feedback(state);
        (u.abs() <= self.torque_limit).then_some(u)
    }

    /// Cost-to-go `xᵀ·S·x` of `state`, a measure of how far it is from the
    /// region LQR handles.
    pub fn cost_to_go(&self, state: &State) -> f64 {
        let x = upright_error(state);
        (x.transpose() * self.gains.s * x)[0]
    }
}

fn upright_error(state: &State) -> Vector2<f64> {
    Vector2::new(
        wrap_angle(state.position - State::upright().position),
        state.velocity,
    )
}

/// `(A, B)` of the dynamics linearized at the upright equilibrium.
pub fn upright_linearization(params: &PlantParameters) -> (Matrix2<f64>, Vector2<f64>) {
    let inertia = params.inertia();
    let a = Matrix2::new(
        0.0,
        1.0,
        params.gravity_torque() / inertia,
        -params.damping() / inertia,
    );
    let b = Vector2::new(0.0, 1.0 / inertia);
    (a, b)
}

impl Controller for LqrController {
    fn get_control_output(&self, measurement: &Measurement) -> ControlOutput {
        match self.command(&measurement.state()) {
            Some(u) => ControlOutput::torque(u),
            None => ControlOutput::none(),
        }
    }

    #[allow(clippy::unnecessary_literal_bound)]
    fn name(&self) -> &str {
        "LQR"
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
