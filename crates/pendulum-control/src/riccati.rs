//! Continuous-time algebraic Riccati equation for 2-state, 1-input systems.
//!
//! Solves
//!
//! ```text
//! Aᵀ·S + S·A − S·B·R⁻¹·Bᵀ·S + Q = 0
//! ```
//!
//! for the stabilizing `S` via the matrix sign function of the Hamiltonian
//!
//! ```text
//! H = [  A   −B·R⁻¹·Bᵀ ]
//!     [ −Q   −Aᵀ       ]
//! ```
//!
//! using the determinant-scaled Newton iteration
//! `Z ← (c·Z + (c·Z)⁻¹) / 2`, `c = |det Z|^(−1/4)`. With `W = sign(H)`
//! split into 2×2 blocks, `S` is the least-squares solution of
//! `[W12; W22 + I]·S = −[W11 + I; W21]`.

use nalgebra::{Matrix2, Matrix4, Matrix4x2, RowVector2, Vector2};

use pendulum_core::error::ConfigError;

const MAX_ITERATIONS: usize = 100;
const TOLERANCE: f64 = 1e-12;

// ---------------------------------------------------------------------------
// GainMatrices
// ---------------------------------------------------------------------------

/// State-feedback gain and Riccati solution, `u = −K·x`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GainMatrices {
    /// Feedback gain (1×2).
    pub k: RowVector2<f64>,
    /// Cost-to-go matrix (2×2, symmetric positive semidefinite).
    pub s: Matrix2<f64>,
}

/// Infinite-horizon LQR gains for `ẋ = A·x + B·u` with cost `xᵀQx + r·u²`.
pub fn lqr(
    a: &Matrix2<f64>,
    b: &Vector2<f64>,
    q: &Matrix2<f64>,
    r: f64,
) -> Result<GainMatrices, ConfigError> {
    let s = solve_care(a, b, q, r)?;
    let k = b.transpose() * s / r;

    // Closed loop A − B·K must be Hurwitz: trace < 0 and det > 0 for 2×2.
    let closed_loop = a - b * k;
    if closed_loop.trace() >= 0.0 || closed_loop.determinant() <= 0.0 {
        return Err(ConfigError::Riccati(
            "solution does not stabilize the closed loop".into(),
        ));
    }
    Ok(GainMatrices { k, s })
}

/// Stabilizing solution of the continuous algebraic Riccati equation.
pub fn solve_care(
    a: &Matrix2<f64>,
    b: &Vector2<f64>,
    q: &Matrix2<f64>,
    r: f64,
) -> Result<Matrix2<f64>, ConfigError> {
    if !(r.is_finite() && r > 0.0) {
        return Err(ConfigError::Riccati(format!("input weight must be > 0, got {r}")));
    }
    if !(a.iter().chain(b.iter()).chain(q.iter()).all(|v| v.is_finite())) {
        return Err(ConfigError::Riccati("non-finite system matrices".into()));
    }

    let sign = matrix_sign(&hamiltonian(a, b, q, r))?;

    let w11: Matrix2<f64> = sign.fixed_view::<2, 2>(0, 0).into_owned();
    let w12: Matrix2<f64> = sign.fixed_view::<2, 2>(0, 2).into_owned();
    let w21: Matrix2<f64> = sign.fixed_view::<2, 2>(2, 0).into_owned();
    let w22: Matrix2<f64> = sign.fixed_view::<2, 2>(2, 2).into_owned();
    let identity = Matrix2::identity();

    let mut lhs = Matrix4x2::zeros();
    lhs.fixed_view_mut::<2, 2>(0, 0).copy_from(&w12);
    lhs.fixed_view_mut::<2, 2>(2, 0).copy_from(&(w22 + identity));
    let mut rhs = Matrix4x2::zeros();
    rhs.fixed_view_mut::<2, 2>(0, 0).copy_from(&(-(w11 + identity)));
    rhs.fixed_view_mut::<2, 2>(2, 0).copy_from(&(-w21));

    // Normal equations of the overdetermined 4×2 system.
    let normal = lhs.transpose() * lhs;
    let normal_inv = normal
        .try_inverse()
        .ok_or_else(|| ConfigError::Riccati("system is not stabilizable".into()))?;
    let s = normal_inv * lhs.transpose() * rhs;
    let s = 0.5 * (s + s.transpose());

    if s.iter().all(|v| v.is_finite()) {
        Ok(s)
    } else {
        Err(ConfigError::Riccati("non-finite solution".into()))
    }
}

fn hamiltonian(a: &Matrix2<f64>, b: &Vector2<f64>, q: &Matrix2<f64>, r: f64) -> Matrix4<f64> {
    let mut h = Matrix4::zeros();
    h.fixed_view_mut::<2, 2>(0, 0).copy_from(a);
    h.fixed_view_mut::<2, 2>(0, 2).copy_from(&(-(b * b.transpose()) / r));
    h.fixed_view_mut::<2, 2>(2, 0).copy_from(&(-q));
    h.fixed_view_mut::<2, 2>(2, 2).copy_from(&(-a.transpose()));
    h
}

fn matrix_sign(h: &Matrix4<f64>) -> Result<Matrix4<f64>, ConfigError> {
    let mut z = *h;
    for _ in 0..MAX_ITERATIONS {
        let det = z.determinant();
        if !det.is_finite() || det.abs() < f64::MIN_POSITIVE {
            return Err(ConfigError::Riccati(
                "Hamiltonian has eigenvalues on the imaginary axis".into(),
            ));
        }
        let c = det.abs().powf(-0.25);
        let scaled = z * c;
        let inverse = scaled
            .try_inverse()
            .ok_or_else(|| ConfigError::Riccati("singular sign iterate".into()))?;
        let next = 0.5 * (scaled + inverse);
        let converged = (next - z).norm() <= TOLERANCE * next.norm();
        z = next;
        if converged {
            return Ok(z);
        }
    }
    Err(ConfigError::Riccati(format!(
        "sign iteration did not converge in {MAX_ITERATIONS} iterations"
    )))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    /// Upright linearization of the reference pendulum.
    fn pendulum() -> (Matrix2<f64>, Vector2<f64>) {
        let (m, l, b, g) = (0.57288, 0.5, 0.05, 9.81);
        let inertia = m * l * l;
        let a = Matrix2::new(0.0, 1.0, m * g * l / inertia, -b / inertia);
        let bv = Vector2::new(0.0, 1.0 / inertia);
        (a, bv)
    }

    fn residual(
        a: &Matrix2<f64>,
        b: &Vector2<f64>,
        q: &Matrix2<f64>,
        r: f64,
        s: &Matrix2<f64>,
    ) -> f64 {
        let res = a.transpose() * s + s * a - s * b * b.transpose() * s / r + q;
        res.norm()
    }

    /// Closed form for `A = [[0, 1], [α, −δ]]`, `B = [0, β]ᵀ`, diagonal `Q`.
    fn closed_form(alpha: f64, delta: f64, beta: f64, q1: f64, q2: f64, r: f64) -> Matrix2<f64> {
        let g = beta * beta / r;
        let s2 = (alpha + (alpha * alpha + q1 * g).sqrt()) / g;
        let s3 = (-delta + (delta * delta + g * (2.0 * s2 + q2)).sqrt()) / g;
        let s1 = delta * s2 + g * s2 * s3 - alpha * s3;
        Matrix2::new(s1, s2, s2, s3)
    }

    #[test]
    fn pendulum_gains_match_closed_form() {
        let (a, b) = pendulum();
        let q = Matrix2::new(10.0, 0.0, 0.0, 1.0);
        let gains = lqr(&a, &b, &q, 1.0).unwrap();
        let expected = closed_form(a[(1, 0)], -a[(1, 1)], b[1], 10.0, 1.0, 1.0);
        assert_relative_eq!(gains.s, expected, epsilon = 1e-8);
        assert_relative_eq!(gains.k[0], 7.0403, epsilon = 1e-3);
        assert_relative_eq!(gains.k[1], 1.6876, epsilon = 1e-3);
    }

    #[test]
    fn solution_satisfies_riccati_equation() {
        let (a, b) = pendulum();
        for (q, r) in [
            (Matrix2::new(10.0, 0.0, 0.0, 1.0), 1.0),
            (Matrix2::new(1.0, 0.0, 0.0, 1.0), 0.1),
            (Matrix2::new(50.0, 2.0, 2.0, 5.0), 3.0),
        ] {
            let s = solve_care(&a, &b, &q, r).unwrap();
            assert!(residual(&a, &b, &q, r, &s) < 1e-8 * (1.0 + s.norm()));
            assert_relative_eq!(s, s.transpose(), epsilon = 1e-12);
            assert!(s[(0, 0)] > 0.0 && s.determinant() > 0.0);
        }
    }

    #[test]
    fn stable_system_with_zero_state_cost() {
        // Stable plant, Q = 0: optimal policy is to do nothing.
        let a = Matrix2::new(0.0, 1.0, -2.0, -3.0);
        let b = Vector2::new(0.0, 1.0);
        let gains = lqr(&a, &b, &Matrix2::zeros(), 1.0).unwrap();
        assert_relative_eq!(gains.k.norm(), 0.0, epsilon = 1e-8);
        assert_relative_eq!(gains.s, Matrix2::zeros(), epsilon = 1e-8);
    }

    #[test]
    fn double_integrator_known_gain() {
        // ẍ = u, Q = I, R = 1: K = [1, √3].
        let a = Matrix2::new(0.0, 1.0, 0.0, 0.0);
        let b = Vector2::new(0.0, 1.0);
        let gains = lqr(&a, &b, &Matrix2::identity(), 1.0).unwrap();
        assert_relative_eq!(gains.k[0], 1.0, epsilon = 1e-9);
        assert_relative_eq!(gains.k[1], 3.0_f64.sqrt(), epsilon = 1e-9);
    }

    #[test]
    fn unactuated_unstable_system_fails() {
        let (a, _) = pendulum();
        let err = lqr(&a, &Vector2::zeros(), &Matrix2::identity(), 1.0).unwrap_err();
        assert!(matches!(err, ConfigError::Riccati(_)));
    }

    #[test]
    fn rejects_bad_input_weight() {
        let (a, b) = pendulum();
        assert!(solve_care(&a, &b, &Matrix2::identity(), 0.0).is_err());
        assert!(solve_care(&a, &b, &Matrix2::identity(), f64::NAN).is_err());
    }

    #[test]
    fn rejects_non_finite_matrices() {
        let (mut a, b) = pendulum();
        a[(1, 0)] = f64::INFINITY;
        assert!(solve_care(&a, &b, &Matrix2::identity(), 1.0).is_err());
    }
}
