//! Feedback controllers for the torque-limited pendulum.
//!
//! Every controller implements [`pendulum_core::traits::Controller`] and is
//! built from validated [`PlantParameters`](pendulum_plant::plant::PlantParameters).
//!
//! | controller | law |
//! |---|---|
//! | [`EnergyShapingController`](energy_shaping::EnergyShapingController) | energy pump, PD catch near the goal |
//! | [`LqrController`](lqr::LqrController) | `u = −K·x` about upright, declines beyond the limit |
//! | [`SwingUpStabilizer`](stabilizer::SwingUpStabilizer) | energy pump, LQR inside a capture radius |
//! | [`TrajectoryFollower`](tracking::TrajectoryFollower) | reference feed-forward plus PD |
//! | [`PolicyController`](policy::PolicyController) | scaled external policy |

pub mod energy_shaping;
pub mod lqr;
pub mod policy;
pub mod riccati;
pub mod stabilizer;
pub mod tracking;

/// Convenience re-exports for common usage.
pub mod prelude {
    pub use crate::energy_shaping::{EnergyMode, EnergyShapingController};
    pub use crate::lqr::LqrController;
    pub use crate::policy::PolicyController;
    pub use crate::riccati::{lqr, solve_care, GainMatrices};
    pub use crate::stabilizer::SwingUpStabilizer;
    pub use crate::tracking::TrajectoryFollower;
}
