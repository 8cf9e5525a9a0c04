use crate::error::ConfigError;
use crate::types::{ControlOutput, Measurement, State};

// ---------------------------------------------------------------------------
// Controller
// ---------------------------------------------------------------------------

/// A feedback law mapping one measurement to one control output.
///
/// Evaluation takes `&self`: controllers carry configuration (gains, goal)
/// but no per-call state, so the same evaluation can be repeated. Each
/// simulation run must own its own instance; `set_goal` is the only
/// mutation and happens before the run starts.
pub trait Controller: Send + Sync {
    /// Compute the desired position, velocity and torque for a measurement.
    fn get_control_output(&self, measurement: &Measurement) -> ControlOutput;

    /// Set the target equilibrium.
    ///
    /// Idempotent. Controllers that are designed around a fixed goal check
    /// it and otherwise ignore it.
    fn set_goal(&mut self, goal: State) -> Result<(), ConfigError> {
        validate_goal(&goal)
    }

    /// Human-readable name for this controller.
    fn name(&self) -> &str;
}

impl<C: Controller + ?Sized> Controller for Box<C> {
    fn get_control_output(&self, measurement: &Measurement) -> ControlOutput {
        (**self).get_control_output(measurement)
    }

    fn set_goal(&mut self, goal: State) -> Result<(), ConfigError> {
        (**self).set_goal(goal)
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}

/// Reject goals that are not finite.
pub fn validate_goal(goal: &State) -> Result<(), ConfigError> {
    if goal.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::MalformedGoal {
            position: goal.position,
            velocity: goal.velocity,
        })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    struct Fixed(f64);

    impl Controller for Fixed {
        fn get_control_output(&self, _measurement: &Measurement) -> ControlOutput {
            ControlOutput::torque(self.0)
        }

        #[allow(clippy::unnecessary_literal_bound)]
        fn name(&self) -> &str {
            "Fixed"
        }
    }

    #[test]
    fn default_set_goal_accepts() {
        let mut c = Fixed(1.0);
        assert!(c.set_goal(State::upright()).is_ok());
        assert!(c.set_goal(State::new(0.0, f64::INFINITY)).is_err());
    }

    #[test]
    fn boxed_controller_delegates() {
        let boxed: Box<dyn Controller> = Box::new(Fixed(0.25));
        let out = boxed.get_control_output(&Measurement::default());
        assert_eq!(out.torque, Some(0.25));
        assert_eq!(boxed.name(), "Fixed");
    }

    #[test]
    fn goal_validation() {
        assert!(validate_goal(&State::upright()).is_ok());
        let err = validate_goal(&State::new(f64::NAN, 0.0)).unwrap_err();
        assert!(matches!(err, ConfigError::MalformedGoal { .. }));
    }
}
