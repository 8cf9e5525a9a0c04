use thiserror::Error;

/// Top-level error type for the pendulum workspace.
#[derive(Debug, Error)]
pub enum PendulumError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Simulation error: {0}")]
    Simulation(#[from] SimError),

    #[error("Record error: {0}")]
    Record(#[from] RecordError),

    #[error("Trajectory error: {0}")]
    Trajectory(#[from] TrajectoryError),
}

/// Configuration errors.
///
/// Always fatal: raised before or at construction, never retried.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Invalid {field}: {value} (must be > 0)")]
    NonPositive { field: &'static str, value: f64 },

    #[error("Invalid {field}: {value} (must be >= 0)")]
    Negative { field: &'static str, value: f64 },

    #[error("Invalid {field}: value is not finite")]
    NonFinite { field: &'static str },

    #[error("Invalid dt: {0} (must be > 0)")]
    InvalidDt(f64),

    #[error("Invalid horizon [{t0}, {tf}]: {reason}")]
    InvalidHorizon {
        t0: f64,
        tf: f64,
        reason: &'static str,
    },

    #[error("control_period ({period}) must be >= dt ({dt})")]
    ControlPeriodLessThanDt { period: f64, dt: f64 },

    #[error("Malformed goal state: ({position}, {velocity})")]
    MalformedGoal { position: f64, velocity: f64 },

    #[error("Riccati solve failed: {0}")]
    Riccati(String),

    #[error("Invalid value for {field}: {message}")]
    InvalidValue { field: &'static str, message: String },
}

/// Simulation runtime errors.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum SimError {
    #[error("Simulation diverged: non-finite state at step {step} (t = {time})")]
    Diverged { step: usize, time: f64 },
}

/// Trajectory persistence errors.
#[derive(Debug, Error)]
pub enum RecordError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Missing or unexpected header: expected `{expected}`, got `{got}`")]
    Header { expected: &'static str, got: String },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Malformed row at line {line}: {message}")]
    MalformedRow { line: u64, message: String },

    #[error("Invalid trajectory: {0}")]
    Trajectory(#[from] TrajectoryError),
}

/// Violations of the [`Trajectory`](crate::trajectory::Trajectory) shape
/// invariants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TrajectoryError {
    #[error("Trajectory is empty")]
    Empty,

    #[error("Length mismatch: {times} times, {states} states, {torques} torques")]
    LengthMismatch {
        times: usize,
        states: usize,
        torques: usize,
    },

    #[error("Time is not strictly increasing at index {index}")]
    NonIncreasingTime { index: usize },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pendulum_error_from_config_error() {
        let err = ConfigError::InvalidDt(-1.0);
        let top: PendulumError = err.into();
        assert!(matches!(top, PendulumError::Config(_)));
        assert!(top.to_string().contains("-1"));
    }

    #[test]
    fn pendulum_error_from_sim_error() {
        let err = SimError::Diverged { step: 3, time: 0.03 };
        let top: PendulumError = err.into();
        assert!(matches!(top, PendulumError::Simulation(_)));
        assert!(top.to_string().contains("non-finite"));
    }

    #[test]
    fn pendulum_error_from_record_error() {
        let top: PendulumError = RecordError::from(TrajectoryError::Empty).into();
        assert!(matches!(top, PendulumError::Record(_)));
        assert!(top.to_string().contains("empty"));
    }

    #[test]
    fn trajectory_error_display_messages() {
        assert_eq!(
            TrajectoryError::LengthMismatch {
                times: 3,
                states: 3,
                torques: 1
            }
            .to_string(),
            "Length mismatch: 3 times, 3 states, 1 torques"
        );
        assert_eq!(
            TrajectoryError::NonIncreasingTime { index: 2 }.to_string(),
            "Time is not strictly increasing at index 2"
        );
    }

    #[test]
    fn config_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let config_err: ConfigError = io_err.into();
        assert!(matches!(config_err, ConfigError::Io(_)));
    }

    #[test]
    fn config_error_display_messages() {
        assert_eq!(
            ConfigError::NonPositive {
                field: "mass",
                value: 0.0
            }
            .to_string(),
            "Invalid mass: 0 (must be > 0)"
        );
        assert_eq!(
            ConfigError::Negative {
                field: "damping",
                value: -0.5
            }
            .to_string(),
            "Invalid damping: -0.5 (must be >= 0)"
        );
        assert_eq!(
            ConfigError::InvalidDt(0.0).to_string(),
            "Invalid dt: 0 (must be > 0)"
        );
        assert_eq!(
            ConfigError::InvalidHorizon {
                t0: 1.0,
                tf: 0.5,
                reason: "tf must be greater than t0"
            }
            .to_string(),
            "Invalid horizon [1, 0.5]: tf must be greater than t0"
        );
        assert_eq!(
            ConfigError::ControlPeriodLessThanDt {
                period: 0.001,
                dt: 0.01
            }
            .to_string(),
            "control_period (0.001) must be >= dt (0.01)"
        );
        assert_eq!(
            ConfigError::NonFinite { field: "x0" }.to_string(),
            "Invalid x0: value is not finite"
        );
    }

    #[test]
    fn sim_error_is_copy() {
        let err = SimError::Diverged { step: 1, time: 0.5 };
        let err2 = err;
        assert_eq!(err, err2);
    }

    #[test]
    fn record_error_display_messages() {
        assert_eq!(
            RecordError::Header {
                expected: "time,pos,vel,torque",
                got: "a,b".into()
            }
            .to_string(),
            "Missing or unexpected header: expected `time,pos,vel,torque`, got `a,b`"
        );
        assert_eq!(
            RecordError::MalformedRow {
                line: 4,
                message: "expected 4 columns".into()
            }
            .to_string(),
            "Malformed row at line 4: expected 4 columns"
        );
    }
}
