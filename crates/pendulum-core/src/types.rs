//! Plain value types shared by the plant, the controllers and the simulator.

use std::f64::consts::{PI, TAU};

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// State
// ---------------------------------------------------------------------------

/// Pendulum state: angle (rad) and angular velocity (rad/s).
///
/// `position` is measured from the hanging-down equilibrium and is never
/// wrapped: multi-turn motion accumulates. Wrap at the point of use with
/// [`wrap_angle`].
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct State {
    /// Angle from the hanging-down position (rad).
    pub position: f64,
    /// Angular velocity (rad/s).
    pub velocity: f64,
}

impl State {
    pub const fn new(position: f64, velocity: f64) -> Self {
        Self { position, velocity }
    }

    /// Hanging straight down, at rest.
    pub const fn rest() -> Self {
        Self::new(0.0, 0.0)
    }

    /// Inverted, at rest.
    pub const fn upright() -> Self {
        Self::new(PI, 0.0)
    }

    /// `true` if both components are finite.
    pub fn is_finite(&self) -> bool {
        self.position.is_finite() && self.velocity.is_finite()
    }

    /// Explicit step along a derivative: `self + h * d`.
    #[must_use]
    pub fn advance(&self, derivative: &StateDerivative, h: f64) -> Self {
        Self {
            position: h.mul_add(derivative.velocity, self.position),
            velocity: h.mul_add(derivative.acceleration, self.velocity),
        }
    }

    /// Angle error to `goal`, wrapped into `(-π, π]`, and velocity error.
    pub fn error_to(&self, goal: &Self) -> (f64, f64) {
        (
            wrap_angle(self.position - goal.position),
            self.velocity - goal.velocity,
        )
    }
}

impl From<[f64; 2]> for State {
    fn from(value: [f64; 2]) -> Self {
        Self::new(value[0], value[1])
    }
}

impl From<State> for [f64; 2] {
    fn from(state: State) -> Self {
        [state.position, state.velocity]
    }
}

// ---------------------------------------------------------------------------
// StateDerivative
// ---------------------------------------------------------------------------

/// Time derivative of a [`State`].
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct StateDerivative {
    /// dθ/dt (rad/s).
    pub velocity: f64,
    /// d²θ/dt² (rad/s²).
    pub acceleration: f64,
}

impl StateDerivative {
    pub const fn new(velocity: f64, acceleration: f64) -> Self {
        Self {
            velocity,
            acceleration,
        }
    }
}

// ---------------------------------------------------------------------------
// Measurement
// ---------------------------------------------------------------------------

/// One sensor read: what a controller gets to see each cycle.
///
/// Matches a hardware read (position, velocity, torque, clock), so the same
/// controller runs unchanged against the simulator or a motor driver.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Measurement {
    /// Measured angle (rad).
    pub position: f64,
    /// Measured angular velocity (rad/s).
    pub velocity: f64,
    /// Measured (last applied) torque (Nm).
    pub torque: f64,
    /// Elapsed time (s).
    pub time: f64,
}

impl Measurement {
    /// Measurement of `state` at `time` with no torque reading.
    pub const fn from_state(state: State, time: f64) -> Self {
        Self {
            position: state.position,
            velocity: state.velocity,
            torque: 0.0,
            time,
        }
    }

    /// Set the measured torque.
    #[must_use]
    pub const fn with_torque(mut self, torque: f64) -> Self {
        self.torque = torque;
        self
    }

    pub const fn state(&self) -> State {
        State::new(self.position, self.velocity)
    }
}

// ---------------------------------------------------------------------------
// ControlOutput
// ---------------------------------------------------------------------------

/// Desired position, velocity and torque.
///
/// `None` on a channel means the controller declines to command it this
/// cycle. Pure torque controllers leave `position` and `velocity` empty.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ControlOutput {
    /// Desired angle (rad).
    pub position: Option<f64>,
    /// Desired angular velocity (rad/s).
    pub velocity: Option<f64>,
    /// Desired torque (Nm).
    pub torque: Option<f64>,
}

impl ControlOutput {
    /// Torque-only command.
    pub const fn torque(torque: f64) -> Self {
        Self {
            position: None,
            velocity: None,
            torque: Some(torque),
        }
    }

    /// No command on any channel.
    pub const fn none() -> Self {
        Self {
            position: None,
            velocity: None,
            torque: None,
        }
    }

    /// Torque to apply: the commanded value, or zero when declined.
    pub fn applied_torque(&self) -> f64 {
        self.torque.unwrap_or(0.0)
    }

    pub const fn is_declined(&self) -> bool {
        self.torque.is_none()
    }
}

// ---------------------------------------------------------------------------
// Angle helpers
// ---------------------------------------------------------------------------

/// Wrap an angle into `(-π, π]`.
pub fn wrap_angle(angle: f64) -> f64 {
    let wrapped = (angle + PI).rem_euclid(TAU) - PI;
    if wrapped <= -PI {
        wrapped + TAU
    } else {
        wrapped
    }
}

/// Sign with `sign(0) = 0`.
///
/// Unlike [`f64::signum`], zero (of either sign) maps to zero, so Coulomb
/// friction vanishes at exact rest.
pub fn sign(value: f64) -> f64 {
    if value > 0.0 {
        1.0
    } else if value < 0.0 {
        -1.0
    } else {
        0.0
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wrap_angle_range() {
        for &a in &[-10.0, -PI, -1.0, 0.0, 1.0, PI, 4.0, 100.0] {
            let w = wrap_angle(a);
            assert!(w > -PI && w <= PI, "{a} wrapped to {w}");
            assert!(((a - w) / TAU - ((a - w) / TAU).round()).abs() < 1e-9);
        }
    }

    #[test]
    fn wrap_angle_boundaries() {
        assert!((wrap_angle(PI) - PI).abs() < 1e-12);
        assert!((wrap_angle(-PI) - PI).abs() < 1e-12);
        assert!(wrap_angle(TAU).abs() < 1e-12);
    }

    #[test]
    fn sign_of_zero_is_zero() {
        assert!(sign(0.0).abs() < f64::EPSILON);
        assert!(sign(-0.0).abs() < f64::EPSILON);
        assert!((sign(2.5) - 1.0).abs() < f64::EPSILON);
        assert!((sign(-1e-12) + 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn state_advance() {
        let s = State::new(1.0, 2.0);
        let next = s.advance(&StateDerivative::new(2.0, -4.0), 0.5);
        assert!((next.position - 2.0).abs() < 1e-12);
        assert!(next.velocity.abs() < 1e-12);
    }

    #[test]
    fn state_error_wraps_multi_turn() {
        let s = State::new(3.0 * PI + 0.1, 0.5);
        let (e, de) = s.error_to(&State::upright());
        assert!((e - 0.1).abs() < 1e-9);
        assert!((de - 0.5).abs() < 1e-12);
    }

    #[test]
    fn state_finiteness() {
        assert!(State::rest().is_finite());
        assert!(!State::new(f64::NAN, 0.0).is_finite());
        assert!(!State::new(0.0, f64::INFINITY).is_finite());
    }

    #[test]
    fn state_array_conversions() {
        let s: State = [1.0, -1.0].into();
        let arr: [f64; 2] = s.into();
        assert_eq!(arr, [1.0, -1.0]);
    }

    #[test]
    fn control_output_sentinel_applies_zero() {
        let out = ControlOutput::none();
        assert!(out.is_declined());
        assert!(out.applied_torque().abs() < f64::EPSILON);

        let out = ControlOutput::torque(0.7);
        assert!(!out.is_declined());
        assert!(out.position.is_none() && out.velocity.is_none());
        assert!((out.applied_torque() - 0.7).abs() < f64::EPSILON);
    }

    #[test]
    fn measurement_from_state() {
        let m = Measurement::from_state(State::new(0.1, 0.2), 1.5).with_torque(0.3);
        assert_eq!(m.state(), State::new(0.1, 0.2));
        assert!((m.torque - 0.3).abs() < f64::EPSILON);
        assert!((m.time - 1.5).abs() < f64::EPSILON);
    }
}
