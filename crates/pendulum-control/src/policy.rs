//! Adapter for externally trained policies.

use std::fmt;

use pendulum_core::traits::Controller;
use pendulum_core::types::{ControlOutput, Measurement};
use pendulum_plant::plant::PlantParameters;

/// Normalized policy: `(position, velocity) -> torque / torque_limit`.
pub type PolicyFn = dyn Fn(f64, f64) -> f64 + Send + Sync;

// ---------------------------------------------------------------------------
// PolicyController
// ---------------------------------------------------------------------------

/// Wraps an opaque policy whose output lives in `[-1, 1]`.
///
/// The output is clamped to `[-1, 1]` and scaled by the torque limit.
/// Non-finite outputs are declined.
pub struct PolicyController {
    policy: Box<PolicyFn>,
    torque_limit: f64,
    name: String,
}

impl PolicyController {
    pub fn new<F>(params: &PlantParameters, policy: F) -> Self
    where
        F: Fn(f64, f64) -> f64 + Send + Sync + 'static,
    {
        Self {
            policy: Box::new(policy),
            torque_limit: params.torque_limit(),
            name: "Policy".into(),
        }
    }

    /// Set the name reported by [`Controller::name`].
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }
}

impl fmt::Debug for PolicyController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PolicyController")
            .field("torque_limit", &self.torque_limit)
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

impl Controller for PolicyController {
    fn get_control_output(&self, measurement: &Measurement) -> ControlOutput {
        let action = (self.policy)(measurement.position, measurement.velocity);
        if action.is_finite() {
            ControlOutput::torque(action.clamp(-1.0, 1.0) * self.torque_limit)
        } else {
            ControlOutput::none()
        }
    }

    fn name(&self) -> &str {
        &self.name
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use pendulum_core::config::PlantConfig;
    use pendulum_core::types::State;
    use pendulum_test_utils::fixtures::reference_params;

    use super::*;

    fn measure(position: f64, velocity: f64) -> Measurement {
        Measurement::from_state(State::new(position, velocity), 0.0)
    }

    #[test]
    fn scales_by_torque_limit() {
        let config = PlantConfig {
            torque_limit: 2.0,
            ..PlantConfig::default()
        };
        let params = PlantParameters::from_config(&config).unwrap();
        let c = PolicyController::new(&params, |_, v| -0.25 * v);
        let out = c.get_control_output(&measure(0.0, 2.0));
        assert!((out.applied_torque() + 1.0).abs() < 1e-12);
    }

    #[test]
    fn clamps_out_of_range_actions() {
        let c = PolicyController::new(&reference_params(), |p, _| p);
        assert!((c.get_control_output(&measure(5.0, 0.0)).applied_torque() - 1.0).abs() < 1e-12);
        assert!((c.get_control_output(&measure(-5.0, 0.0)).applied_torque() + 1.0).abs() < 1e-12);
    }

    #[test]
    fn declines_non_finite_actions() {
        let c = PolicyController::new(&reference_params(), |_, _| f64::NAN);
        assert!(c.get_control_output(&measure(0.0, 0.0)).is_declined());
    }

    #[test]
    fn name_is_configurable() {
        let c = PolicyController::new(&reference_params(), |_, _| 0.0);
        assert_eq!(c.name(), "Policy");
        let c = c.with_name("sac");
        assert_eq!(c.name(), "sac");
        assert!(format!("{c:?}").contains("sac"));
    }
}
