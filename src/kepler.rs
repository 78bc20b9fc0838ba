//! # Universal-variable two-body propagation
//!
//! Closed-form Kepler propagation expressed with the universal anomaly `χ`, valid for elliptic,
//! parabolic and hyperbolic orbits without branching on the conic type.
//!
//! With `α = 2/r₀ − v₀²/μ` (the reciprocal semi-major axis) and `z = α·χ²`, the universal Kepler
//! equation reads
//!
//! ```text
//! F(χ) = r₀·v_r0/√μ · χ²·C(z) + (1 − α·r₀)·χ³·S(z) + r₀·χ − √μ·Δt = 0
//! ```
//!
//! and is solved by Newton–Raphson seeded at `χ₀ = √μ·|α|·Δt`. The converged anomaly gives the
//! Lagrange coefficients `f, g, ḟ, ġ`, which combine the initial state linearly into the
//! propagated one.
//!
//! The Newton loop is capped; hitting the cap is reported as
//! [`OrbitsError::KeplerNotConverged`] instead of returning the last iterate.
use log::{debug, trace};

use crate::constants::{CelestialBody, Second};
use crate::orbit_type::StateVector;
use crate::orbits_errors::OrbitsError;

/// Stumpff function `C(z)`.
///
/// ```text
/// z > 0 : (1 − cos √z) / z
/// z < 0 : (cosh √−z − 1) / (−z)
/// z = 0 : 1/2
/// ```
pub fn stumpff_c(z: f64) -> f64 {
    if z > 0.0 {
        (1.0 - z.sqrt().cos()) / z
    } else if z < 0.0 {
        ((-z).sqrt().cosh() - 1.0) / (-z)
    } else {
        0.5
    }
}

/// Stumpff function `S(z)`.
///
/// ```text
/// z > 0 : (√z − sin √z) / z^{3/2}
/// z < 0 : (sinh √−z − √−z) / (−z)^{3/2}
/// z = 0 : 1/6
/// ```
pub fn stumpff_s(z: f64) -> f64 {
    if z > 0.0 {
        let sz = z.sqrt();
        (sz - sz.sin()) / sz.powi(3)
    } else if z < 0.0 {
        let sz = (-z).sqrt();
        (sz.sinh() - sz) / sz.powi(3)
    } else {
        1.0 / 6.0
    }
}

/// Newton–Raphson controls of the universal Kepler solver.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UniversalParams {
    /// Stop when the Newton step `|F/F'|` falls below this value
    pub tolerance: f64,
    /// Hard cap on the number of Newton steps
    pub max_iterations: usize,
}

impl Default for UniversalParams {
    fn default() -> Self {
        UniversalParams {
            tolerance: 1e-8,
            max_iterations: 1000,
        }
    }
}

/// Converged state of the universal Kepler equation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UniversalSolution {
    /// Universal anomaly `χ` [√km]
    pub chi: f64,
    /// `z = α·χ²`
    pub z: f64,
    /// `C(z)`
    pub c: f64,
    /// `S(z)`
    pub s: f64,
    /// Reciprocal semi-major axis `α` [1/km]
    pub alpha: f64,
    /// Newton steps taken
    pub iterations: usize,
}

/// Solve the universal Kepler equation for a time of flight `dt`.
///
/// Arguments
/// -----------------
/// * `state`: initial state (km, km/s).
/// * `dt`: time of flight in seconds, negative for backward propagation.
/// * `body`: central body.
/// * `params`: Newton tolerance and iteration cap.
///
/// Return
/// ----------
/// * The converged [`UniversalSolution`]. A zero `dt` returns `χ = 0` without iterating.
/// * `Err(OrbitsError::KeplerNotConverged)` when the cap is reached, the derivative vanishes or
///   an iterate stops being finite.
/// * `Err(OrbitsError::DegenerateGeometry(ZeroRadius))` for a state at the origin.
pub fn solve_universal_anomaly(
    state: &StateVector,
    dt: Second,
    body: &CelestialBody,
    params: &UniversalParams,
) -> Result<UniversalSolution, OrbitsError> {
    let r0 = state.radius();
    if r0 == 0.0 {
        return Err(OrbitsError::DegenerateGeometry(
            crate::orbits_errors::DegenerateKind::ZeroRadius,
        ));
    }
    let v0 = state.speed();
    let vr0 = state.radial_velocity();
    let sqrt_mu = body.sqrt_mu();
    let alpha = 2.0 / r0 - v0 * v0 / body.mu;

    if dt == 0.0 {
        return Ok(UniversalSolution {
            chi: 0.0,
            z: 0.0,
            c: 0.5,
            s: 1.0 / 6.0,
            alpha,
            iterations: 0,
        });
    }

    let a1 = r0 * vr0 / sqrt_mu;
    let a2 = 1.0 - alpha * r0;

    let mut chi = sqrt_mu * alpha.abs() * dt;
    let mut ratio = f64::INFINITY;
    let mut iterations = 0;

    for iteration in 1..=params.max_iterations {
        iterations = iteration;
        let z = alpha * chi * chi;
        let c = stumpff_c(z);
        let s = stumpff_s(z);

        let f = a1 * chi * chi * c + a2 * chi.powi(3) * s + r0 * chi - sqrt_mu * dt;
        let df = a1 * chi * (1.0 - alpha * chi * chi * s) + a2 * chi * chi * c + r0;

        ratio = f / df;
        if !ratio.is_finite() {
            break;
        }
        chi -= ratio;
        trace!("universal Kepler step {iteration}: chi = {chi}, step = {ratio}");

        if ratio.abs() < params.tolerance {
            let z = alpha * chi * chi;
            debug!("universal Kepler converged in {iteration} steps (chi = {chi})");
            return Ok(UniversalSolution {
                chi,
                z,
                c: stumpff_c(z),
                s: stumpff_s(z),
                alpha,
                iterations: iteration,
            });
        }
    }

    Err(OrbitsError::KeplerNotConverged {
        iterations,
        last_step: ratio.abs(),
    })
}

/// `f` and `g` Lagrange coefficients of a solved universal anomaly.
#[inline]
fn f_and_g(sol: &UniversalSolution, r0: f64, dt: Second, sqrt_mu: f64) -> (f64, f64) {
    let chi2 = sol.chi * sol.chi;
    let f = 1.0 - chi2 * sol.c / r0;
    let g = dt - chi2 * sol.chi * sol.s / sqrt_mu;
    (f, g)
}

/// Propagate a state by `dt` seconds along its Keplerian conic.
///
/// Return
/// ----------
/// * The new [`StateVector`]; the input is left untouched.
///
/// See also
/// ------------
/// * [`lagrange_coefficients`] – Only `(f, g)`, for callers holding their own position vectors.
/// * [`crate::two_body::TwoBodyPropagator`] – Numerical integration of the same dynamics.
pub fn propagate_universal(
    body: &CelestialBody,
    state: &StateVector,
    dt: Second,
    params: &UniversalParams,
) -> Result<StateVector, OrbitsError> {
    if dt == 0.0 {
        return Ok(*state);
    }
    let sol = solve_universal_anomaly(state, dt, body, params)?;
    let sqrt_mu = body.sqrt_mu();
    let r0 = state.radius();

    let (f, g) = f_and_g(&sol, r0, dt, sqrt_mu);
    let position = f * state.position + g * state.velocity;
    let r = position.norm();

    let f_dot = sqrt_mu / (r * r0) * sol.chi * (sol.z * sol.s - 1.0);
    let g_dot = 1.0 - sol.chi * sol.chi * sol.c / r;
    let velocity = f_dot * state.position + g_dot * state.velocity;

    Ok(StateVector::new(position, velocity))
}

/// Lagrange `(f, g)` coefficients mapping `state` to the time `dt` later.
///
/// `dt == 0` returns `(1, 0)`.
pub fn lagrange_coefficients(
    body: &CelestialBody,
    state: &StateVector,
    dt: Second,
    params: &UniversalParams,
) -> Result<(f64, f64), OrbitsError> {
    if dt == 0.0 {
        return Ok((1.0, 0.0));
    }
    let sol = solve_universal_anomaly(state, dt, body, params)?;
    Ok(f_and_g(&sol, state.radius(), dt, body.sqrt_mu()))
}

#[cfg(test)]
mod kepler_test {
    use super::*;
    use crate::constants::EARTH;
    use approx::{assert_abs_diff_eq, assert_relative_eq};
    use nalgebra::Vector3;

    #[test]
    fn test_stumpff_at_zero() {
        assert_eq!(stumpff_c(0.0), 0.5);
        assert_eq!(stumpff_s(0.0), 1.0 / 6.0);
    }

    #[test]
    fn test_stumpff_continuity() {
        for z in [1e-4, 1e-5, 1e-6, 1e-8] {
            assert_abs_diff_eq!(stumpff_c(z), 0.5, epsilon = 1e-6);
            assert_abs_diff_eq!(stumpff_c(-z), 0.5, epsilon = 1e-6);
            assert_abs_diff_eq!(stumpff_s(z), 1.0 / 6.0, epsilon = 1e-6);
            assert_abs_diff_eq!(stumpff_s(-z), 1.0 / 6.0, epsilon = 1e-6);
        }
        assert_abs_diff_eq!(stumpff_c(1e-5), 0.4999995833365744, epsilon = 1e-9);
        assert_abs_diff_eq!(stumpff_s(-1e-5), 0.1666667500011471, epsilon = 1e-9);
    }

    #[test]
    fn test_stumpff_closed_forms() {
        let pi2 = std::f64::consts::PI.powi(2);
        // √z = π
        assert_relative_eq!(stumpff_c(pi2), 2.0 / pi2, max_relative = 1e-14);
        assert_relative_eq!(stumpff_s(pi2), 1.0 / pi2, max_relative = 1e-14);
        // √−z = 1
        assert_relative_eq!(stumpff_c(-1.0), 1f64.cosh() - 1.0, max_relative = 1e-14);
        assert_relative_eq!(stumpff_s(-1.0), 1f64.sinh() - 1.0, max_relative = 1e-14);
    }

    #[test]
    fn test_universal_worked_example() {
        let state = StateVector::new(
            Vector3::new(20000.0, -105000.0, -19000.0),
            Vector3::new(0.9, -3.4, -1.5),
        );
        let params = UniversalParams::default();

        let sol = solve_universal_anomaly(&state, 7200.0, &EARTH, &params).unwrap();
        assert_abs_diff_eq!(sol.chi, 37.48516100968006, epsilon = 1e-8);
        assert_abs_diff_eq!(sol.alpha, -1.8255950151969443e-05, epsilon = 1e-15);
        assert!(sol.iterations <= 10);

        let next = propagate_universal(&EARTH, &state, 7200.0, &params).unwrap();
        let expected_r = Vector3::new(26337.762714010438, -128751.70147734674, -29655.894606558366);
        let expected_v = Vector3::new(0.8627960326584673, -3.2116037398911677, -1.4612854033726619);
        assert_abs_diff_eq!(next.position, expected_r, epsilon = 1e-6);
        assert_abs_diff_eq!(next.velocity, expected_v, epsilon = 1e-9);
    }

    #[test]
    fn test_universal_planar_example() {
        let state = StateVector::new(
            Vector3::new(7000.0, -12124.0, 0.0),
            Vector3::new(2.6679, 4.6210, 0.0),
        );
        let next = propagate_universal(&EARTH, &state, 3600.0, &UniversalParams::default()).unwrap();

        assert_abs_diff_eq!(next.position.x, -3297.7686251992964, epsilon = 1e-6);
        assert_abs_diff_eq!(next.position.y, 7413.396645787401, epsilon = 1e-6);
        assert_abs_diff_eq!(next.velocity.x, -8.29760302426652, epsilon = 1e-9);
        assert_abs_diff_eq!(next.velocity.y, -0.9640449446737822, epsilon = 1e-9);
        assert_eq!(next.position.z, 0.0);
    }

    #[test]
    fn test_zero_dt_is_identity() {
        let state = StateVector::new(
            Vector3::new(7000.0, 0.0, 0.0),
            Vector3::new(0.0, 7.5, 0.0),
        );
        let params = UniversalParams::default();
        assert_eq!(propagate_universal(&EARTH, &state, 0.0, &params).unwrap(), state);
        assert_eq!(lagrange_coefficients(&EARTH, &state, 0.0, &params).unwrap(), (1.0, 0.0));
    }

    #[test]
    fn test_forward_then_backward() {
        let state = StateVector::new(
            Vector3::new(-6045.0, -3490.0, 2500.0),
            Vector3::new(-3.457, 6.618, 2.533),
        );
        let params = UniversalParams::default();
        let there = propagate_universal(&EARTH, &state, 5400.0, &params).unwrap();
        let back = propagate_universal(&EARTH, &there, -5400.0, &params).unwrap();

        assert_abs_diff_eq!(back.position, state.position, epsilon = 1e-6);
        assert_abs_diff_eq!(back.velocity, state.velocity, epsilon = 1e-9);
    }

    #[test]
    fn test_lagrange_coefficients_match_propagation() {
        let state = StateVector::new(
            Vector3::new(20000.0, -105000.0, -19000.0),
            Vector3::new(0.9, -3.4, -1.5),
        );
        let params = UniversalParams::default();
        let (f, g) = lagrange_coefficients(&EARTH, &state, 7200.0, &params).unwrap();
        let next = propagate_universal(&EARTH, &state, 7200.0, &params).unwrap();

        assert_abs_diff_eq!(
            f * state.position + g * state.velocity,
            next.position,
            epsilon = 1e-9
        );
    }

    #[test]
    fn test_iteration_cap_is_reported() {
        let state = StateVector::new(
            Vector3::new(20000.0, -105000.0, -19000.0),
            Vector3::new(0.9, -3.4, -1.5),
        );
        let params = UniversalParams {
            tolerance: 1e-8,
            max_iterations: 1,
        };
        let err = solve_universal_anomaly(&state, 7200.0, &EARTH, &params).unwrap_err();
        assert!(matches!(
            err,
            OrbitsError::KeplerNotConverged { iterations: 1, .. }
        ));
    }

    #[test]
    fn test_non_finite_step_reports_steps_taken() {
        let state = StateVector::new(
            Vector3::new(7000.0, 0.0, 0.0),
            Vector3::new(f64::NAN, 7.5, 0.0),
        );
        let params = UniversalParams::default();
        match solve_universal_anomaly(&state, 600.0, &EARTH, &params) {
            Err(OrbitsError::KeplerNotConverged {
                iterations,
                last_step,
            }) => {
                assert_eq!(iterations, 1);
                assert!(last_step.is_nan());
            }
            other => panic!("expected KeplerNotConverged, got {other:?}"),
        }
    }
}
