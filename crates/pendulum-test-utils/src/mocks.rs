//! Mock controllers for exercising the simulator.

use pendulum_core::traits::Controller;
use pendulum_core::types::{ControlOutput, Measurement};

use crate::rng::uniform_samples;

// ---------------------------------------------------------------------------
// ConstantTorque
// ---------------------------------------------------------------------------

/// Commands the same torque every cycle.
#[derive(Clone, Copy, Debug)]
pub struct ConstantTorque(pub f64);

impl Controller for ConstantTorque {
    fn get_control_output(&self, _measurement: &Measurement) -> ControlOutput {
        ControlOutput::torque(self.0)
    }

    #[allow(clippy::unnecessary_literal_bound)]
    fn name(&self) -> &str {
        "ConstantTorque"
    }
}

// ---------------------------------------------------------------------------
// Declining
// ---------------------------------------------------------------------------

/// Never commands a torque.
#[derive(Clone, Copy, Debug)]
pub struct Declining;

impl Controller for Declining {
    fn get_control_output(&self, _measurement: &Measurement) -> ControlOutput {
        ControlOutput::none()
    }

    #[allow(clippy::unnecessary_literal_bound)]
    fn name(&self) -> &str {
        "Declining"
    }
}

// ---------------------------------------------------------------------------
// RandomTorque
// ---------------------------------------------------------------------------

/// Piecewise-constant pseudo-random torque, fixed by a seed.
///
/// Samples are drawn up front and indexed by measurement time, so repeated
/// evaluations at the same time agree.
#[derive(Clone, Debug)]
pub struct RandomTorque {
    samples: Vec<f64>,
    period: f64,
}

impl RandomTorque {
    /// `count` samples uniform in `[-amplitude, amplitude)`, each held for
    /// `period` seconds and cycled.
    pub fn new(amplitude: f64, period: f64, count: usize, seed: u64) -> Self {
        Self {
            samples: uniform_samples(count.max(1), -amplitude, amplitude, seed),
            period,
        }
    }

    pub fn samples(&self) -> &[f64] {
        &self.samples
    }
}

impl Controller for RandomTorque {
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    fn get_control_output(&self, measurement: &Measurement) -> ControlOutput {
        let slot = (measurement.time / self.period).floor().max(0.0) as usize;
        ControlOutput::torque(self.samples[slot % self.samples.len()])
    }

    #[allow(clippy::unnecessary_literal_bound)]
    fn name(&self) -> &str {
        "RandomTorque"
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
