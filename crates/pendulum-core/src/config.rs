use std::f64::consts::PI;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::types::State;

// ---------------------------------------------------------------------------
// Serde default functions
// ---------------------------------------------------------------------------

const fn default_mass() -> f64 {
    0.57288
}
const fn default_length() -> f64 {
    0.5
}
const fn default_damping() -> f64 {
    0.05
}
const fn default_gravity() -> f64 {
    9.81
}
const fn default_torque_limit() -> f64 {
    1.0
}
const fn default_dt() -> f64 {
    0.01
}
const fn default_tf() -> f64 {
    5.0
}
const fn default_energy_gain() -> f64 {
    1.0
}
const fn default_switch_threshold() -> f64 {
    0.5
}
const fn default_kp() -> f64 {
    40.0
}
const fn default_kd() -> f64 {
    10.0
}
const fn default_q() -> [[f64; 2]; 2] {
    [[10.0, 0.0], [0.0, 1.0]]
}
const fn default_r() -> f64 {
    1.0
}
const fn default_capture_radius() -> f64 {
    0.3
}
const fn default_goal() -> [f64; 2] {
    [PI, 0.0]
}
const fn default_tracking_kp() -> f64 {
    5.0
}
const fn default_tracking_kd() -> f64 {
    0.5
}

/// Largest step count whose indices are exact in `f64` (2^53).
const MAX_STEPS: f64 = 9_007_199_254_740_992.0;

/// Rounding slack, in ulps of the horizon, when matching the grid to `tf`.
const GRID_ULPS: f64 = 8.0;

// ---------------------------------------------------------------------------
// Validation helpers
// ---------------------------------------------------------------------------

/// Require a finite value strictly greater than zero.
pub fn require_positive(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if !value.is_finite() {
        return Err(ConfigError::NonFinite { field });
    }
    if value <= 0.0 {
        return Err(ConfigError::NonPositive { field, value });
    }
    Ok(())
}

/// Require a finite value greater than or equal to zero.
pub fn require_non_negative(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if !value.is_finite() {
        return Err(ConfigError::NonFinite { field });
    }
    if value < 0.0 {
        return Err(ConfigError::Negative { field, value });
    }
    Ok(())
}

/// Require a strictly positive, finite integration step.
pub fn require_dt(dt: f64) -> Result<(), ConfigError> {
    if dt.is_finite() && dt > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::InvalidDt(dt))
    }
}

// ---------------------------------------------------------------------------
// PlantConfig
// ---------------------------------------------------------------------------

/// Physical parameters of the pendulum.
///
/// Defaults describe the reference hardware: a 0.57 kg bob on a 0.5 m rod
/// driven by a 1 Nm-limited motor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlantConfig {
    /// Bob mass (kg).
    #[serde(default = "default_mass")]
    pub mass: f64,
    /// Rod length (m).
    #[serde(default = "default_length")]
    pub length: f64,
    /// Viscous damping (Nm·s/rad).
    #[serde(default = "default_damping")]
    pub damping: f64,
    /// Gravitational acceleration (m/s²).
    #[serde(default = "default_gravity")]
    pub gravity: f64,
    /// Coulomb friction magnitude (Nm).
    #[serde(default)]
    pub coulomb_fric: f64,
    /// Moment of inertia about the pivot (kg·m²). Derived as `mass·length²`
    /// when omitted.
    #[serde(default)]
    pub inertia: Option<f64>,
    /// Symmetric actuator torque limit (Nm).
    #[serde(default = "default_torque_limit")]
    pub torque_limit: f64,
}

impl Default for PlantConfig {
    fn default() -> Self {
        Self {
            mass: default_mass(),
            length: default_length(),
            damping: default_damping(),
            gravity: default_gravity(),
            coulomb_fric: 0.0,
            inertia: None,
            torque_limit: default_torque_limit(),
        }
    }
}

impl PlantConfig {
    /// Inertia as supplied, or the point-mass value `mass·length²`.
    pub fn effective_inertia(&self) -> f64 {
        self.inertia
            .unwrap_or_else(|| self.mass * self.length * self.length)
    }

    /// Validate configuration. Returns Err on invalid values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        require_positive("mass", self.mass)?;
        require_positive("length", self.length)?;
        require_non_negative("damping", self.damping)?;
        require_positive("gravity", self.gravity)?;
        require_non_negative("coulomb_fric", self.coulomb_fric)?;
        require_positive("inertia", self.effective_inertia())?;
        require_positive("torque_limit", self.torque_limit)?;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Controller configs
// ---------------------------------------------------------------------------

/// Energy-shaping swing-up parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnergyShapingConfig {
    /// Energy pump gain `k_e`.
    #[serde(default = "default_energy_gain")]
    pub k_e: f64,
    /// Wrapped angle error (rad) below which the near-goal law takes over.
    #[serde(default = "default_switch_threshold")]
    pub switch_threshold: f64,
    /// Near-goal proportional gain (1/s²).
    #[serde(default = "default_kp")]
    pub kp: f64,
    /// Near-goal derivative gain (1/s).
    #[serde(default = "default_kd")]
    pub kd: f64,
}

impl Default for EnergyShapingConfig {
    fn default() -> Self {
        Self {
            k_e: default_energy_gain(),
            switch_threshold: default_switch_threshold(),
            kp: default_kp(),
            kd: default_kd(),
        }
    }
}

impl EnergyShapingConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        require_non_negative("k_e", self.k_e)?;
        require_non_negative("switch_threshold", self.switch_threshold)?;
        require_non_negative("kp", self.kp)?;
        require_non_negative("kd", self.kd)?;
        Ok(())
    }
}

/// LQR weights.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LqrConfig {
    /// State cost, row-major, over `(angle error, velocity)`.
    #[serde(default = "default_q")]
    pub q: [[f64; 2]; 2],
    /// Input cost.
    #[serde(default = "default_r")]
    pub r: f64,
}

impl Default for LqrConfig {
    fn default() -> Self {
        Self {
            q: default_q(),
            r: default_r(),
        }
    }
}

impl LqrConfig {
    /// Validate configuration. `q` must be symmetric positive semidefinite.
    pub fn validate(&self) -> Result<(), ConfigError> {
        require_positive("r", self.r)?;
        let [[q11, q12], [q21, q22]] = self.q;
        if ![q11, q12, q21, q22].iter().all(|v| v.is_finite()) {
            return Err(ConfigError::NonFinite { field: "q" });
        }
        if (q12 - q21).abs() > 1e-12 * (1.0 + q12.abs()) {
            return Err(ConfigError::InvalidValue {
                field: "q",
                message: "must be symmetric".into(),
            });
        }
        if q11 < 0.0 || q22 < 0.0 || q11.mul_add(q22, -(q12 * q12)) < 0.0 {
            return Err(ConfigError::InvalidValue {
                field: "q",
                message: "must be positive semidefinite".into(),
            });
        }
        Ok(())
    }
}

/// Energy-shaping swing-up with LQR catch near the top.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SwingUpStabilizerConfig {
    #[serde(default)]
    pub energy: EnergyShapingConfig,
    #[serde(default)]
    pub lqr: LqrConfig,
    /// Wrapped angle error (rad) inside which LQR is tried first.
    #[serde(default = "default_capture_radius")]
    pub capture_radius: f64,
}

impl Default for SwingUpStabilizerConfig {
    fn default() -> Self {
        Self {
            energy: EnergyShapingConfig::default(),
            lqr: LqrConfig::default(),
            capture_radius: default_capture_radius(),
        }
    }
}

impl SwingUpStabilizerConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.energy.validate()?;
        self.lqr.validate()?;
        require_non_negative("capture_radius", self.capture_radius)?;
        Ok(())
    }
}

/// Reference tracking: feed-forward torque plus PD correction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrajectoryFollowerConfig {
    /// CSV file (`time,pos,vel,torque`) holding the reference.
    pub reference: PathBuf,
    /// Position gain (Nm/rad).
    #[serde(default = "default_tracking_kp")]
    pub kp: f64,
    /// Velocity gain (Nm·s/rad).
    #[serde(default = "default_tracking_kd")]
    pub kd: f64,
}

impl TrajectoryFollowerConfig {
    pub fn new(reference: impl Into<PathBuf>) -> Self {
        Self {
            reference: reference.into(),
            kp: default_tracking_kp(),
            kd: default_tracking_kd(),
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        require_non_negative("kp", self.kp)?;
        require_non_negative("kd", self.kd)?;
        if self.reference.as_os_str().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "reference",
                message: "path is empty".into(),
            });
        }
        Ok(())
    }
}

/// Which feedback law to run, tagged by `kind`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ControllerConfig {
    EnergyShaping(EnergyShapingConfig),
    Lqr(LqrConfig),
    SwingUpStabilizer(SwingUpStabilizerConfig),
    TrajectoryFollower(TrajectoryFollowerConfig),
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self::EnergyShaping(EnergyShapingConfig::default())
    }
}

impl ControllerConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        match self {
            Self::EnergyShaping(c) => c.validate(),
            Self::Lqr(c) => c.validate(),
            Self::SwingUpStabilizer(c) => c.validate(),
            Self::TrajectoryFollower(c) => c.validate(),
        }
    }
}

// ---------------------------------------------------------------------------
// SimulationConfig
// ---------------------------------------------------------------------------

/// Explicit integration scheme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum IntegratorKind {
    /// First-order forward Euler.
    #[serde(rename = "euler")]
    Euler,
    /// Classic fourth-order Runge–Kutta.
    #[default]
    #[serde(rename = "runge_kutta")]
    RungeKutta4,
}

/// Time grid and integration settings for one run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// Start time (s).
    #[serde(default)]
    pub t0: f64,
    /// End time (s).
    #[serde(default = "default_tf")]
    pub tf: f64,
    /// Integration step (s).
    #[serde(default = "default_dt")]
    pub dt: f64,
    /// Controller update period (s). Must be >= `dt`; the command is held
    /// between updates. `None` updates every step.
    #[serde(default)]
    pub control_period: Option<f64>,
    #[serde(default)]
    pub integrator: IntegratorKind,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            t0: 0.0,
            tf: default_tf(),
            dt: default_dt(),
            control_period: None,
            integrator: IntegratorKind::default(),
        }
    }
}

impl SimulationConfig {
    /// Validate configuration. Returns Err on invalid values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        require_dt(self.dt)?;
        if !self.t0.is_finite() || !self.tf.is_finite() || self.tf <= self.t0 {
            return Err(ConfigError::InvalidHorizon {
                t0: self.t0,
                tf: self.tf,
                reason: "tf must be greater than t0",
            });
        }
        let ratio = (self.tf - self.t0) / self.dt;
        if !ratio.is_finite() || ratio > MAX_STEPS {
            return Err(ConfigError::InvalidHorizon {
                t0: self.t0,
                tf: self.tf,
                reason: "too many steps at this dt",
            });
        }
        if let Some(period) = self.control_period {
            if !period.is_finite() || period < self.dt {
                return Err(ConfigError::ControlPeriodLessThanDt {
                    period,
                    dt: self.dt,
                });
            }
        }
        Ok(())
    }

    /// Number of integration steps per controller update.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn substeps(&self) -> usize {
        self.control_period
            .map_or(1, |period| ((period / self.dt).round() as usize).max(1))
    }

    /// Number of integration steps covering `[t0, tf]`: the smallest `n`
    /// with `time_at(n) >= tf`.
    ///
    /// A grid point within a few ulps of `tf` counts as reaching it, so exact
    /// multiples are not pushed up a step by rounding in `(tf - t0) / dt`.
    /// Call on a validated config.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn step_count(&self) -> usize {
        let n = ((self.tf - self.t0) / self.dt).ceil().max(0.0) as usize;
        let tolerance = GRID_ULPS * f64::EPSILON * self.t0.abs().max(self.tf.abs());
        if n > 0 && self.time_at(n - 1) >= self.tf - tolerance {
            n - 1
        } else {
            n
        }
    }

    /// Time of grid point `k`, `t0 + k·dt`.
    #[allow(clippy::cast_precision_loss)]
    pub fn time_at(&self, k: usize) -> f64 {
        (k as f64).mul_add(self.dt, self.t0)
    }
}

// ---------------------------------------------------------------------------
// ScenarioConfig
// ---------------------------------------------------------------------------

/// A complete closed-loop run: plant, controller, time grid, start and goal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioConfig {
    #[serde(default)]
    pub plant: PlantConfig,
    #[serde(default)]
    pub controller: ControllerConfig,
    #[serde(default)]
    pub simulation: SimulationConfig,
    /// Initial `[position, velocity]`.
    #[serde(default)]
    pub x0: [f64; 2],
    /// Goal `[position, velocity]`.
    #[serde(default = "default_goal")]
    pub goal: [f64; 2],
}

impl Default for ScenarioConfig {
    fn default() -> Self {
        Self {
            plant: PlantConfig::default(),
            controller: ControllerConfig::default(),
            simulation: SimulationConfig::default(),
            x0: [0.0, 0.0],
            goal: default_goal(),
        }
    }
}

impl ScenarioConfig {
    /// Validate every section.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.plant.validate()?;
        self.controller.validate()?;
        self.simulation.validate()?;
        if !State::from(self.x0).is_finite() {
            return Err(ConfigError::NonFinite { field: "x0" });
        }
        let goal = State::from(self.goal);
        if !goal.is_finite() {
            return Err(ConfigError::MalformedGoal {
                position: goal.position,
                velocity: goal.velocity,
            });
        }
        Ok(())
    }

    pub fn initial_state(&self) -> State {
        State::from(self.x0)
    }

    pub fn goal_state(&self) -> State {
        State::from(self.goal)
    }

    /// Parse and validate a TOML document.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from TOML file.
    pub fn from_file(path: impl AsRef<std::path::Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
