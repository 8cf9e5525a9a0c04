//! Closed-loop simulation: controller, zero-order hold, plant, integrator.
//!
//! Each step `k`:
//!
//! 1. On controller ticks (every `round(control_period / dt)` steps) build a
//!    [`Measurement`] from `x_k` and query the controller. A declined command
//!    becomes zero torque.
//! 2. Clip the held command to the plant's torque limit.
//! 3. Integrate one step and record `(t_{k+1}, x_{k+1})` and the applied
//!    torque.
//!
//! A non-finite `x_{k+1}` stops the run; everything recorded up to `x_k` is
//! returned with [`RunOutcome::Diverged`].

use tracing::{debug, warn};

use pendulum_core::config::{IntegratorKind, PlantConfig, SimulationConfig};
use pendulum_core::error::{ConfigError, PendulumError, SimError};
use pendulum_core::traits::Controller;
use pendulum_core::trajectory::Trajectory;
use pendulum_core::types::{Measurement, State};
use pendulum_plant::integrator::Integrator;
use pendulum_plant::plant::PendulumPlant;

/// Upper bound on up-front buffer reservation; longer runs grow on demand.
const PREALLOCATED_STEPS: usize = 1 << 20;

// ---------------------------------------------------------------------------
// RunOutcome / SimulationRun
// ---------------------------------------------------------------------------

/// How a run ended.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum RunOutcome {
    /// Every step integrated to a finite state.
    Completed,
    /// The state at `step` (time `time`) was non-finite and was dropped.
    Diverged { step: usize, time: f64 },
}

impl RunOutcome {
    pub const fn is_completed(&self) -> bool {
        matches!(self, Self::Completed)
    }
}

/// Recorded trajectory plus run diagnostics.
#[derive(Clone, Debug)]
pub struct SimulationRun {
    trajectory: Trajectory,
    outcome: RunOutcome,
    declined: usize,
}

impl SimulationRun {
    pub const fn trajectory(&self) -> &Trajectory {
        &self.trajectory
    }

    pub const fn outcome(&self) -> RunOutcome {
        self.outcome
    }

    /// Controller evaluations that returned no torque.
    pub const fn declined(&self) -> usize {
        self.declined
    }

    /// The trajectory, whatever the outcome.
    pub fn into_trajectory(self) -> Trajectory {
        self.trajectory
    }

    /// The trajectory if the run completed, otherwise the divergence error.
    pub fn into_result(self) -> Result<Trajectory, SimError> {
        match self.outcome {
            RunOutcome::Completed => Ok(self.trajectory),
            RunOutcome::Diverged { step, time } => Err(SimError::Diverged { step, time }),
        }
    }
}

// ---------------------------------------------------------------------------
// Simulator
// ---------------------------------------------------------------------------

/// Drives a [`PendulumPlant`] under a [`Controller`].
///
/// Holds no per-run state: one simulator can serve many runs, concurrently
/// if each run brings its own controller.
#[derive(Clone, Debug)]
pub struct Simulator {
    plant: PendulumPlant,
}

impl Simulator {
    pub const fn new(plant: PendulumPlant) -> Self {
        Self { plant }
    }

    /// Validate `config` and build a simulator around the plant it describes.
    pub fn from_config(config: &PlantConfig) -> Result<Self, ConfigError> {
        PendulumPlant::from_config(config).map(Self::new)
    }

    pub const fn plant(&self) -> &PendulumPlant {
        &self.plant
    }

    /// Simulate `[t0, tf]` from `x0` with the controller queried every step.
    pub fn simulate<C: Controller + ?Sized>(
        &self,
        t0: f64,
        x0: State,
        tf: f64,
        dt: f64,
        controller: &C,
        integrator: IntegratorKind,
    ) -> Result<SimulationRun, PendulumError> {
        let config = SimulationConfig {
            t0,
            tf,
            dt,
            control_period: None,
            integrator,
        };
        self.run(&config, x0, controller)
    }

    /// Simulate with the full time-grid configuration, including a slower
    /// controller update period.
    ///
    /// Configuration errors are reported before the first step. Divergence
    /// is not an error here: check [`SimulationRun::outcome`].
    pub fn run<C: Controller + ?Sized>(
        &self,
        config: &SimulationConfig,
        x0: State,
        controller: &C,
    ) -> Result<SimulationRun, PendulumError> {
        config.validate()?;
        if !x0.is_finite() {
            return Err(ConfigError::NonFinite { field: "x0" }.into());
        }
        let integrator = Integrator::new(config.integrator, config.dt)?;
        let steps = config.step_count();
        let substeps = config.substeps();

        debug!(
            controller = controller.name(),
            steps,
            substeps,
            dt = config.dt,
            integrator = ?config.integrator,
            "starting simulation"
        );

        let capacity = steps.min(PREALLOCATED_STEPS);
        let mut times = Vec::with_capacity(capacity + 1);
        let mut states = Vec::with_capacity(capacity + 1);
        let mut torques = Vec::with_capacity(capacity);
        times.push(config.t0);
        states.push(x0);

        let mut state = x0;
        let mut command = 0.0;
        let mut last_applied = 0.0;
        let mut declined = 0;
        let mut outcome = RunOutcome::Completed;

        for k in 0..steps {
            if k % substeps == 0 {
                let measurement =
                    Measurement::from_state(state, config.time_at(k)).with_torque(last_applied);
                let output = controller.get_control_output(&measurement);
                if output.is_declined() {
                    declined += 1;
                }
                command = output.applied_torque();
            }

            let applied = self.plant.clip_torque(command);
            let next = integrator.step(&self.plant, &state, applied);
            if !next.is_finite() {
                let time = config.time_at(k + 1);
                warn!(step = k + 1, time, "simulation diverged: non-finite state");
                outcome = RunOutcome::Diverged { step: k + 1, time };
                break;
            }

            times.push(config.time_at(k + 1));
            states.push(next);
            torques.push(applied);
            state = next;
            last_applied = applied;
        }

        debug!(
            recorded = states.len(),
            declined,
            completed = outcome.is_completed(),
            "simulation finished"
        );

        Ok(SimulationRun {
            trajectory: Trajectory::from_parts(times, states, torques)?,
            outcome,
            declined,
        })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
