//! Time-aligned state and torque sequences.

use std::cmp::Ordering;

use crate::error::TrajectoryError;
use crate::types::State;

// ---------------------------------------------------------------------------
// Trajectory
// ---------------------------------------------------------------------------

/// Times, states and the torques applied between them.
///
/// Invariants, checked by [`Trajectory::from_parts`]:
/// - at least one sample;
/// - `times.len() == states.len()`;
/// - `torques.len() == states.len() - 1` (torque `k` acts over
///   `[times[k], times[k + 1])`, so the final state has none);
/// - times strictly increasing.
///
/// No mutators: once built, a trajectory is read-only.
#[derive(Debug, Clone, PartialEq)]
pub struct Trajectory {
    times: Vec<f64>,
    states: Vec<State>,
    torques: Vec<f64>,
}

impl Trajectory {
    /// Assemble a trajectory, checking the shape invariants.
    pub fn from_parts(
        times: Vec<f64>,
        states: Vec<State>,
        torques: Vec<f64>,
    ) -> Result<Self, TrajectoryError> {
        if states.is_empty() {
            return Err(TrajectoryError::Empty);
        }
        if times.len() != states.len() || torques.len() + 1 != states.len() {
            return Err(TrajectoryError::LengthMismatch {
                times: times.len(),
                states: states.len(),
                torques: torques.len(),
            });
        }
        if let Some(index) = times
            .windows(2)
            .position(|pair| pair[1].partial_cmp(&pair[0]) != Some(Ordering::Greater))
        {
            return Err(TrajectoryError::NonIncreasingTime { index: index + 1 });
        }
        Ok(Self {
            times,
            states,
            torques,
        })
    }

    /// Number of samples (states).
    pub fn len(&self) -> usize {
        self.states.len()
    }

    /// Always `false`: a trajectory holds at least its initial state.
    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    pub fn times(&self) -> &[f64] {
        &self.times
    }

    pub fn states(&self) -> &[State] {
        &self.states
    }

    /// Applied torques, one per interval.
    pub fn torques(&self) -> &[f64] {
        &self.torques
    }

    pub fn initial_state(&self) -> State {
        self.states[0]
    }

    pub fn final_state(&self) -> State {
        self.states[self.states.len() - 1]
    }

    pub fn start_time(&self) -> f64 {
        self.times[0]
    }

    pub fn end_time(&self) -> f64 {
        self.times[self.times.len() - 1]
    }

    /// Split into `(times, states, torques)`.
    pub fn into_parts(self) -> (Vec<f64>, Vec<State>, Vec<f64>) {
        (self.times, self.states, self.torques)
    }

    /// State (linearly interpolated) and torque (zero-order hold) at `time`.
    ///
    /// Clamps to the first sample before the start and holds the final state
    /// after the end. The final state's torque is the last applied torque, or
    /// zero for a single-sample trajectory.
    pub fn sample(&self, time: f64) -> (State, f64) {
        let last = self.states.len() - 1;
        let last_torque = self.torques.last().copied().unwrap_or(0.0);
        // NaN falls through to the first sample.
        if last == 0 || time.partial_cmp(&self.times[0]) != Some(Ordering::Greater) {
            return (self.states[0], self.torques.first().copied().unwrap_or(0.0));
        }
        if time >= self.times[last] {
            return (self.states[last], last_torque);
        }
        // First index with t_k > time, minus one: time ∈ [t_k, t_{k+1}).
        let k = self.times.partition_point(|&t| t <= time) - 1;
        let (t0, t1) = (self.times[k], self.times[k + 1]);
        let alpha = (time - t0) / (t1 - t0);
        let (a, b) = (self.states[k], self.states[k + 1]);
        let state = State::new(
            alpha.mul_add(b.position - a.position, a.position),
            alpha.mul_add(b.velocity - a.velocity, a.velocity),
        );
        (state, self.torques[k])
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn ramp() -> Trajectory {
        Trajectory::from_parts(
            vec![0.0, 1.0, 2.0],
            vec![State::new(0.0, 0.0), State::new(1.0, 2.0), State::new(3.0, 2.0)],
            vec![0.5, -0.5],
        )
        .unwrap()
    }

    #[test]
    fn accepts_valid_shape() {
        let t = ramp();
        assert_eq!(t.len(), 3);
        assert!(!t.is_empty());
        assert_eq!(t.torques().len(), 2);
        assert_eq!(t.final_state(), State::new(3.0, 2.0));
        assert!((t.end_time() - 2.0).abs() < f64::EPSILON);
        assert!(t.start_time().abs() < f64::EPSILON);
    }

    #[test]
    fn single_sample_is_valid() {
        let t = Trajectory::from_parts(vec![0.0], vec![State::rest()], vec![]).unwrap();
        assert_eq!(t.len(), 1);
        assert_eq!(t.sample(5.0), (State::rest(), 0.0));
    }

    #[test]
    fn rejects_empty() {
        let err = Trajectory::from_parts(vec![], vec![], vec![]).unwrap_err();
        assert_eq!(err, TrajectoryError::Empty);
    }

    #[test]
    fn rejects_torque_per_state() {
        let err = Trajectory::from_parts(
            vec![0.0, 1.0],
            vec![State::rest(), State::rest()],
            vec![0.0, 0.0],
        )
        .unwrap_err();
        assert!(matches!(err, TrajectoryError::LengthMismatch { .. }));
    }

    #[test]
    fn rejects_non_increasing_time() {
        let err = Trajectory::from_parts(
            vec![0.0, 1.0, 1.0],
            vec![State::rest(); 3],
            vec![0.0; 2],
        )
        .unwrap_err();
        assert_eq!(err, TrajectoryError::NonIncreasingTime { index: 2 });

        let err = Trajectory::from_parts(
            vec![0.0, f64::NAN],
            vec![State::rest(); 2],
            vec![0.0],
        )
        .unwrap_err();
        assert_eq!(err, TrajectoryError::NonIncreasingTime { index: 1 });
    }

    #[test]
    fn sample_interpolates_state_and_holds_torque() {
        let t = ramp();
        let (s, u) = t.sample(0.5);
        assert!((s.position - 0.5).abs() < 1e-12);
        assert!((s.velocity - 1.0).abs() < 1e-12);
        assert!((u - 0.5).abs() < f64::EPSILON);

        let (s, u) = t.sample(1.0);
        assert!((s.position - 1.0).abs() < 1e-12);
        assert!((u + 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn sample_clamps_outside_range() {
        let t = ramp();
        assert_eq!(t.sample(-1.0), (State::rest(), 0.5));
        assert_eq!(t.sample(10.0), (State::new(3.0, 2.0), -0.5));
        assert_eq!(t.sample(f64::NAN), (State::rest(), 0.5));
    }

    #[test]
    fn into_parts_returns_sequences() {
        let (times, states, torques) = ramp().into_parts();
        assert_eq!(times.len(), states.len());
        assert_eq!(torques.len() + 1, states.len());
    }
}
