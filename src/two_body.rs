//! # Numerical two-body propagation
//!
//! Integrates the unperturbed equations of motion
//!
//! ```text
//! dr/dt = v
//! dv/dt = −μ·r / |r|³
//! ```
//!
//! with an adaptive Dormand–Prince 5(4) embedded Runge–Kutta scheme. The propagator is the
//! reference against which the closed-form [`propagate_universal`](crate::kepler::propagate_universal)
//! is checked; it is deterministic, so calling it twice with the same inputs yields the same
//! samples.
//!
//! ## Step control
//!
//! The local error is the largest of the position and velocity RSS-state errors
//! (`‖err‖ / ½‖x_next + x_cur‖`, or `‖err‖` when that magnitude is below 0.1). A step whose
//! error is within tolerance is accepted and the next step grows as
//! `0.9·h·(tol/err)^(1/5)`; otherwise it is retried with `0.9·h·(tol/err)^(1/4)`. Step sizes
//! are clamped to `[min_step, max_step]` and the last step of each output interval is
//! shortened so that every sample falls exactly on its requested time.
use log::{debug, warn};
use nalgebra::{Vector3, Vector6};

use crate::constants::{CelestialBody, Second};
use crate::orbit_type::StateVector;
use crate::orbits_errors::OrbitsError;

// Below this magnitude the error estimate is absolute rather than relative.
const REL_ERR_THRESH: f64 = 0.1;

const ORDER: u8 = 5;
const STAGES: usize = 7;

/// Lower-triangular Butcher coefficients, row by row.
const A_COEFFS: [f64; 21] = [
    1.0 / 5.0,
    3.0 / 40.0,
    9.0 / 40.0,
    44.0 / 45.0,
    -56.0 / 15.0,
    32.0 / 9.0,
    19372.0 / 6561.0,
    -25360.0 / 2187.0,
    64448.0 / 6561.0,
    -212.0 / 729.0,
    9017.0 / 3168.0,
    -355.0 / 33.0,
    46732.0 / 5247.0,
    49.0 / 176.0,
    -5103.0 / 18656.0,
    35.0 / 384.0,
    0.0,
    500.0 / 1113.0,
    125.0 / 192.0,
    -2187.0 / 6784.0,
    11.0 / 84.0,
];

/// Fifth-order weights followed by the embedded fourth-order weights.
const B_COEFFS: [f64; 14] = [
    35.0 / 384.0,
    0.0,
    500.0 / 1113.0,
    125.0 / 192.0,
    -2187.0 / 6784.0,
    11.0 / 84.0,
    0.0,
    5179.0 / 57600.0,
    0.0,
    7571.0 / 16695.0,
    393.0 / 640.0,
    -92097.0 / 339200.0,
    187.0 / 2100.0,
    1.0 / 40.0,
];

/// Two-body equations of motion around `body`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TwoBodyDynamics {
    pub body: CelestialBody,
}

impl TwoBodyDynamics {
    pub fn new(body: CelestialBody) -> Self {
        TwoBodyDynamics { body }
    }

    /// Time derivative of `[r, v]`.
    pub fn eom(&self, state: &Vector6<f64>) -> Vector6<f64> {
        let r = state.fixed_rows::<3>(0);
        let v = state.fixed_rows::<3>(3);
        let r_norm = r.norm();
        let acc = -self.body.mu / r_norm.powi(3) * r;

        let mut deriv = Vector6::zeros();
        deriv.fixed_rows_mut::<3>(0).copy_from(&v);
        deriv.fixed_rows_mut::<3>(3).copy_from(&acc);
        deriv
    }
}

/// Step-size controls of the adaptive integrator.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PropOpts {
    /// First trial step [s]
    pub init_step: Second,
    pub min_step: Second,
    pub max_step: Second,
    pub tolerance: f64,
    /// Rejections allowed before a step is forced through
    pub attempts: u8,
}

impl PropOpts {
    pub fn with_tolerance(tolerance: f64) -> Self {
        PropOpts {
            tolerance,
            ..Default::default()
        }
    }

    fn validate(&self) -> Result<(), OrbitsError> {
        if !(self.min_step > 0.0 && self.min_step <= self.init_step && self.init_step <= self.max_step)
        {
            return Err(OrbitsError::InvalidParameter(format!(
                "step sizes must satisfy 0 < min ({}) <= init ({}) <= max ({})",
                self.min_step, self.init_step, self.max_step
            )));
        }
        if !(self.tolerance > 0.0) || self.attempts == 0 {
            return Err(OrbitsError::InvalidParameter(format!(
                "tolerance ({}) and attempts ({}) must be positive",
                self.tolerance, self.attempts
            )));
        }
        Ok(())
    }
}

impl Default for PropOpts {
    fn default() -> Self {
        PropOpts {
            init_step: 60.0,
            min_step: 1e-3,
            max_step: 2700.0,
            tolerance: 1e-12,
            attempts: 50,
        }
    }
}

/// Outcome of a single accepted integration step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IntegrationDetails {
    /// Signed step actually taken [s]
    pub step: Second,
    pub error: f64,
    pub attempts: u8,
}

/// RSS error of a 3-vector slice, relative to the mean of the candidate and current values.
fn rss_state(prop_err: &Vector3<f64>, candidate: &Vector3<f64>, cur_state: &Vector3<f64>) -> f64 {
    let mag = 0.5 * (candidate + cur_state).norm();
    let err = prop_err.norm();
    if mag > REL_ERR_THRESH {
        err / mag
    } else {
        err
    }
}

fn rss_state_pv(prop_err: &Vector6<f64>, candidate: &Vector6<f64>, cur_state: &Vector6<f64>) -> f64 {
    let err_r = rss_state(
        &prop_err.fixed_rows::<3>(0).into_owned(),
        &candidate.fixed_rows::<3>(0).into_owned(),
        &cur_state.fixed_rows::<3>(0).into_owned(),
    );
    let err_v = rss_state(
        &prop_err.fixed_rows::<3>(3).into_owned(),
        &candidate.fixed_rows::<3>(3).into_owned(),
        &cur_state.fixed_rows::<3>(3).into_owned(),
    );
    err_r.max(err_v)
}

/// Adaptive Dormand–Prince propagator of the two-body problem.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TwoBodyPropagator {
    pub dynamics: TwoBodyDynamics,
    pub opts: PropOpts,
}

impl TwoBodyPropagator {
    pub fn new(body: CelestialBody, opts: PropOpts) -> Self {
        TwoBodyPropagator {
            dynamics: TwoBodyDynamics::new(body),
            opts,
        }
    }

    /// Take one adaptive step of at most `step` seconds (signed) from `state`.
    ///
    /// Return
    /// ----------
    /// * The details of the accepted step, the new state and the proposed next step.
    fn derive(
        &self,
        state: &Vector6<f64>,
        step: Second,
    ) -> Result<(IntegrationDetails, Vector6<f64>, Second), OrbitsError> {
        let direction = step.signum();
        let mut step_size = step.abs();
        let mut attempts: u8 = 1;
        let mut k = [Vector6::<f64>::zeros(); STAGES];

        loop {
            let h = direction * step_size;
            k[0] = self.dynamics.eom(state);
            let mut a_idx: usize = 0;
            for i in 0..(STAGES - 1) {
                let mut wi = Vector6::<f64>::zeros();
                for kj in &k[0..=i] {
                    wi += A_COEFFS[a_idx] * kj;
                    a_idx += 1;
                }
                k[i + 1] = self.dynamics.eom(&(state + h * wi));
            }

            let mut next_state = *state;
            let mut error_est = Vector6::<f64>::zeros();
            for (i, ki) in k.iter().enumerate() {
                let b_i = B_COEFFS[i];
                let b_i_star = B_COEFFS[i + STAGES];
                error_est += h * (b_i - b_i_star) * ki;
                next_state += h * b_i * ki;
            }

            if !next_state.iter().all(|x| x.is_finite()) {
                return Err(OrbitsError::IntegrationFailed(format!(
                    "non-finite state after a {h} s step (trajectory through the body centre?)"
                )));
            }

            let error = rss_state_pv(&error_est, &next_state, state);
            if error <= self.opts.tolerance
                || step_size <= self.opts.min_step
                || attempts >= self.opts.attempts
            {
                if attempts >= self.opts.attempts && error > self.opts.tolerance {
                    warn!(
                        "Could not further decrease step size: maximum number of attempts reached ({attempts})"
                    );
                }

                let details = IntegrationDetails {
                    step: h,
                    error,
                    attempts,
                };
                let next_step = if error < self.opts.tolerance {
                    let proposed = if error > 0.0 {
                        0.9 * step_size
                            * (self.opts.tolerance / error).powf(1.0 / f64::from(ORDER))
                    } else {
                        self.opts.max_step
                    };
                    proposed.min(self.opts.max_step)
                } else {
                    step_size
                };
                return Ok((details, next_state, direction * next_step));
            }

            attempts += 1;
            let proposed = 0.9
                * step_size
                * (self.opts.tolerance / error).powf(1.0 / f64::from(ORDER - 1));
            step_size = proposed.max(self.opts.min_step);
        }
    }

    /// Integrate `state` over `[0, duration]` and sample it at `step_count` evenly spaced times.
    ///
    /// Arguments
    /// -----------------
    /// * `state`: initial state, returned unchanged as the first sample.
    /// * `duration`: signed time span in seconds; negative values integrate backwards.
    /// * `step_count`: number of output samples, at least 2.
    ///
    /// Return
    /// ----------
    /// * The `step_count` states at `linspace(0, duration, step_count)`.
    /// * `Err(OrbitsError::InvalidParameter)` for fewer than 2 samples, a non-finite duration or
    ///   inconsistent [`PropOpts`].
    /// * `Err(OrbitsError::IntegrationFailed)` if the state stops being finite.
    pub fn propagate(
        &self,
        state: &StateVector,
        duration: Second,
        step_count: usize,
    ) -> Result<Vec<StateVector>, OrbitsError> {
        if step_count < 2 {
            return Err(OrbitsError::InvalidParameter(format!(
                "at least 2 output samples are required, got {step_count}"
            )));
        }
        if !duration.is_finite() {
            return Err(OrbitsError::InvalidParameter(format!(
                "duration must be finite, got {duration}"
            )));
        }
        self.opts.validate()?;

        let mut samples = Vec::with_capacity(step_count);
        samples.push(*state);
        let mut x = state.to_vector6();

        if duration == 0.0 {
            samples.resize(step_count, *state);
            return Ok(samples);
        }

        let intervals = (step_count - 1) as f64;
        let mut step = duration.signum() * self.opts.init_step;
        let mut t = 0.0;
        let mut total_steps = 0usize;

        for sample in 1..step_count {
            let target = duration * sample as f64 / intervals;
            loop {
                let remaining = target - t;
                if remaining.abs() <= f64::EPSILON * target.abs().max(1.0) {
                    t = target;
                    break;
                }
                let trial = if step.abs() > remaining.abs() {
                    remaining
                } else {
                    step
                };
                let (details, next, next_step) = self.derive(&x, trial)?;
                x = next;
                total_steps += 1;
                t = if details.step == remaining {
                    target
                } else {
                    t + details.step
                };
                step = next_step;
            }
            samples.push(StateVector::from_vector6(&x));
        }

        debug!(
            "two-body propagation over {duration} s: {total_steps} steps, {step_count} samples"
        );
        Ok(samples)
    }

    /// State at `duration` seconds, without the intermediate samples.
    pub fn final_state(&self, state: &StateVector, duration: Second) -> Result<StateVector, OrbitsError> {
        let samples = self.propagate(state, duration, 2)?;
        samples
            .last()
            .copied()
            .ok_or_else(|| OrbitsError::IntegrationFailed("no output sample".into()))
    }
}
