//! Reference trajectory tracking.
//!
//! Replays a precomputed trajectory (e.g. from an offline optimizer) as
//! feed-forward torque and closes a PD loop around its states:
//!
//! ```text
//! u = τ_ref(t) + kp·(θ_ref(t) − θ) + kd·(θ̇_ref(t) − θ̇)
//! ```
//!
//! The reference state is linearly interpolated between samples; the
//! feed-forward torque is held over each interval. Past the end the final
//! sample is held.

use pendulum_core::config::{require_non_negative, TrajectoryFollowerConfig};
use pendulum_core::error::ConfigError;
use pendulum_core::traits::Controller;
use pendulum_core::trajectory::Trajectory;
use pendulum_core::types::{ControlOutput, Measurement};
use pendulum_plant::plant::PlantParameters;

// ---------------------------------------------------------------------------
// TrajectoryFollower
// ---------------------------------------------------------------------------

#[derive(Clone, Debug)]
pub struct TrajectoryFollower {
    reference: Trajectory,
    kp: f64,
    kd: f64,
    torque_limit: f64,
}

impl TrajectoryFollower {
    /// Track `reference` with PD gains `kp` (Nm/rad) and `kd` (Nm·s/rad).
    pub fn new(
        reference: Trajectory,
        params: &PlantParameters,
        kp: f64,
        kd: f64,
    ) -> Result<Self, ConfigError> {
        require_non_negative("kp", kp)?;
        require_non_negative("kd", kd)?;
        Ok(Self {
            reference,
            kp,
            kd,
            torque_limit: params.torque_limit(),
        })
    }

    /// Gains from `config`; the reference itself is loaded by the caller.
    pub fn from_config(
        reference: Trajectory,
        params: &PlantParameters,
        config: &TrajectoryFollowerConfig,
    ) -> Result<Self, ConfigError> {
        Self::new(reference, params, config.kp, config.kd)
    }

    pub const fn reference(&self) -> &Trajectory {
        &self.reference
    }
}

impl Controller for TrajectoryFollower {
    fn get_control_output(&self, measurement: &Measurement) -> ControlOutput {
        let (target, feed_forward) = self.reference.sample(measurement.time);
        let u = self.kd.mul_add(
            target.velocity - measurement.velocity,
            self.kp.mul_add(target.position - measurement.position, feed_forward),
        );
        ControlOutput {
            position: Some(target.position),
            velocity: Some(target.velocity),
            torque: Some(u.clamp(-self.torque_limit, self.torque_limit)),
        }
    }

    #[allow(clippy::unnecessary_literal_bound)]
    fn name(&self) -> &str {
        "TrajectoryFollower"
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use pendulum_core::types::State;
    use pendulum_test_utils::fixtures::reference_params;

    use super::*;

    fn reference() -> Trajectory {
        Trajectory::from_parts(
            vec![0.0, 0.5, 1.0],
            vec![State::new(0.0, 0.0), State::new(0.5, 1.0), State::new(1.0, 0.0)],
            vec![0.2, -0.1],
        )
        .unwrap()
    }

    fn follower(kp: f64, kd: f64) -> TrajectoryFollower {
        TrajectoryFollower::new(reference(), &reference_params(), kp, kd).unwrap()
    }

    fn at(state: State, time: f64) -> Measurement {
        Measurement::from_state(state, time)
    }

    #[test]
    fn on_reference_outputs_feed_forward() {
        let f = follower(5.0, 0.5);
        let out = f.get_control_output(&at(State::new(0.25, 0.5), 0.25));
        assert!((out.applied_torque() - 0.2).abs() < 1e-12);
        assert!((out.position.unwrap() - 0.25).abs() < 1e-12);
        assert!((out.velocity.unwrap() - 0.5).abs() < 1e-12);
    }

    #[test]
    fn pd_corrects_deviation() {
        let f = follower(2.0, 0.0);
        let behind = f.get_control_output(&at(State::new(0.4, 1.0), 0.5));
        // -0.1 feed-forward + 2.0 * 0.1 position error.
        assert!((behind.applied_torque() - 0.1).abs() < 1e-12);

        let f = follower(0.0, 0.5);
        let slow = f.get_control_output(&at(State::new(0.5, 0.0), 0.5));
        assert!((slow.applied_torque() - 0.4).abs() < 1e-12);
    }

    #[test]
    fn holds_final_sample_after_end() {
        let f = follower(1.0, 1.0);
        let out = f.get_control_output(&at(State::new(1.0, 0.0), 7.0));
        assert!((out.position.unwrap() - 1.0).abs() < f64::EPSILON);
        assert!((out.applied_torque() + 0.1).abs() < 1e-12);
    }

    #[test]
    fn output_is_clipped() {
        let f = follower(100.0, 0.0);
        let out = f.get_control_output(&at(State::new(-1.0, 0.0), 0.0));
        assert!((out.applied_torque() - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn rejects_negative_gains() {
        assert!(TrajectoryFollower::new(reference(), &reference_params(), -1.0, 0.0).is_err());
        let config = TrajectoryFollowerConfig {
            kd: f64::NAN,
            ..TrajectoryFollowerConfig::new("ref.csv")
        };
        let result = TrajectoryFollower::from_config(reference(), &reference_params(), &config);
        assert!(result.is_err());
    }
}
