//! Pendulum simulation CLI.
//!
//! - `simulate`: run a TOML scenario (or the built-in swing-up) and print a
//!   summary, optionally saving the trajectory as CSV
//! - `info`: print crate versions and the reference plant's LQR gain
//!
//! Log verbosity follows `RUST_LOG` (default `info`).

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use pendulum_control::prelude::*;
use pendulum_core::prelude::*;
use pendulum_plant::prelude::*;
use pendulum_sim::prelude::*;

// ---------------------------------------------------------------------------
// CLI
// ---------------------------------------------------------------------------

/// Torque-limited pendulum simulator.
#[derive(Parser)]
#[command(version, about)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a closed-loop scenario and print a summary.
    Simulate {
        /// Scenario TOML file. Uses the built-in swing-up when omitted.
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Write the recorded trajectory to this CSV file.
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Override the initial position (rad).
        #[arg(long, allow_negative_numbers = true)]
        position: Option<f64>,

        /// Override the initial velocity (rad/s).
        #[arg(long, allow_negative_numbers = true)]
        velocity: Option<f64>,
    },

    /// Print crate information.
    Info,
}

// ---------------------------------------------------------------------------
// Mode implementations
// ---------------------------------------------------------------------------

/// Built-in scenario: energy shaping from a small offset below the pivot.
fn default_scenario() -> ScenarioConfig {
    ScenarioConfig {
        x0: [0.01, 0.0],
        ..ScenarioConfig::default()
    }
}

fn run_simulate(
    config: Option<&Path>,
    output: Option<&Path>,
    position: Option<f64>,
    velocity: Option<f64>,
) -> Result<(), PendulumError> {
    let mut scenario = match config {
        Some(path) => {
            info!(path = %path.display(), "loading scenario");
            ScenarioConfig::from_file(path)?
        }
        None => default_scenario(),
    };
    if let Some(p) = position {
        scenario.x0[0] = p;
    }
    if let Some(v) = velocity {
        scenario.x0[1] = v;
    }

    let scenario = Scenario::from_config(&scenario)?;
    let run = scenario.run()?;
    let traj = run.trajectory();
    let plant = scenario.simulator().plant();
    let last = traj.final_state();
    let goal_energy = 2.0 * plant.params().gravity_torque();
    let peak = traj.torques().iter().fold(0.0_f64, |m, u| m.max(u.abs()));

    info!(
        controller = scenario.controller().name(),
        samples = traj.len(),
        declined = run.declined(),
        "run finished"
    );
    println!("controller: {}", scenario.controller().name());
    println!("samples:    {}", traj.len());
    println!(
        "final:      t={:.3} pos={:.6} vel={:.6}",
        traj.end_time(),
        last.position,
        last.velocity
    );
    println!(
        "upright:    error={:.3e} rad",
        wrap_angle(last.position - std::f64::consts::PI).abs()
    );
    println!(
        "energy:     {:.6} (goal {goal_energy:.6})",
        plant.total_energy(&last)
    );
    println!("peak |u|:   {peak:.4} Nm");
    println!("declined:   {}", run.declined());

    if let Some(path) = output {
        save_csv(traj, path)?;
        info!(path = %path.display(), "trajectory written");
    }

    run.into_result()?;
    Ok(())
}

fn run_info() -> Result<(), PendulumError> {
    let params = PlantParameters::from_config(&presets::reference())?;
    let lqr = LqrController::new(&params, &LqrConfig::default())?;
    let k = lqr.gains().k;

    println!("pendulum v{}", env!("CARGO_PKG_VERSION"));
    println!();
    println!("crates:");
    println!("  pendulum-core    {}", env!("CARGO_PKG_VERSION"));
    println!("  pendulum-plant   {}", env!("CARGO_PKG_VERSION"));
    println!("  pendulum-control {}", env!("CARGO_PKG_VERSION"));
    println!("  pendulum-sim     {}", env!("CARGO_PKG_VERSION"));
    println!();
    println!(
        "reference plant: m={} l={} b={} tau_max={}",
        params.mass(),
        params.length(),
        params.damping(),
        params.torque_limit()
    );
    println!("upright LQR gain: K = [{:.4}, {:.4}]", k[0], k[1]);
    Ok(())
}

// ---------------------------------------------------------------------------
// main
// ---------------------------------------------------------------------------

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Some(Commands::Simulate {
            config,
            output,
            position,
            velocity,
        }) => run_simulate(config.as_deref(), output.as_deref(), position, velocity),
        Some(Commands::Info) => run_info(),
        None => run_simulate(None, None, None, None),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}
