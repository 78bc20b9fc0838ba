//! # Gauss Method for Initial Orbit Determination
//!
//! This module implements the **Gauss method** for angles-only initial orbit determination
//! from three observations of an Earth-orbiting object, in its classical form and in the
//! extended (iterative) form.
//!
//! ## Core structure: [`GaussObs`]
//!
//! [`GaussObs`] holds the geometry of an [`ObservationTriplet`]:
//!
//! * time offsets `τ₁ = t₁ − t₂`, `τ₃ = t₃ − t₂` [s],
//! * the matrix `L` of line-of-sight unit vectors (one column per observation) and its inverse,
//! * the matrix `R` of inertial site positions (one column per observation) [km],
//! * `M = L⁻¹·R`,
//! * the [`CelestialBody`] providing μ and the radius used to condition the polynomial.
//!
//! ## Algorithm outline
//!
//! 1. Truncated Lagrange series give `c₁ = a₁ + a₁ᵤ·u`, `c₃ = a₃ + a₃ᵤ·u` with `u = μ/r₂³`,
//!    `a₁ = τ₃/τ`, `a₃ = −τ₁/τ`, `a₁ᵤ = τ₃(τ² − τ₃²)/(6τ)`, `a₃ᵤ = −τ₁(τ² − τ₁²)/(6τ)`.
//! 2. The pivot slant range is `ρ₂ = d₁ + d₂·u` and `|r₂|² = ρ₂² + 2ρ₂(ρ̂₂·R₂) + |R₂|²`, which
//!    yields the sparse degree-8 polynomial
//!    `r₂⁸ − (d₁² + 2C·d₁ + |R₂|²)·r₂⁶ − 2μd₂(C + d₁)·r₂³ − μ²d₂² = 0`.
//! 3. The polynomial is rescaled by the body radius and solved with Aberth–Ehrlich
//!    ([`aberth`]). Admissible roots are real, positive, inside the `r₂` bounds of
//!    [`IODParams`] and give three positive slant ranges.
//! 4. Slant ranges `ρᵢ = (−M·c)ᵢ / cᵢ` give the positions `rᵢ = ρᵢ·ρ̂ᵢ + Rᵢ`, and the pivot
//!    velocity is `v₂ = (f₁·r₃ − f₃·r₁) / (f₁·g₃ − f₃·g₁)`.
//! 5. **Extended method**: the Lagrange coefficients at `τ₁`, `τ₃` are recomputed with the
//!    universal-variable solver from the current `(r₂, v₂)`, averaged with their previous
//!    values, and step 4 is repeated until `|Δρ₂|` falls below the tolerance.
//!
//! ## Output
//!
//! A [`GaussResult`]: `PrelimOrbit` for the classical solution, `CorrectedOrbit` after
//! refinement.
//!
//! ## Example
//!
//! ```rust
//! use nalgebra::Vector3;
//! use orbits::constants::EARTH;
//! use orbits::initial_orbit_determination::{gauss::GaussObs, IODParams};
//! use orbits::kepler::UniversalParams;
//! use orbits::observations::ObservationTriplet;
//! use orbits::observers::Observer;
//! use orbits::orbit_type::StateVector;
//! use orbits::time::{Hemisphere, UtcDateTime};
//!
//! let site = Observer::new(40.0, 110.0, Hemisphere::West, 2.0)?;
//! let epoch = UtcDateTime::new(2010, 8, 20, 11, 30, 0.0)?;
//! let truth = StateVector::new(
//!     Vector3::new(5256.79107488524, 3182.9308660142246, 5122.020958291836),
//!     Vector3::new(-5.226508889099222, 3.6625053511445094, 3.5566359646447734),
//! );
//! let triplet = ObservationTriplet::synthetic(
//!     &truth, &site, epoch, (-300.0, 300.0), &EARTH, &UniversalParams::default(),
//! )?;
//!
//! let gauss = GaussObs::new(&triplet, EARTH)?;
//! let extended = gauss.extended_orbit(&IODParams::default())?;
//! assert!((extended.state().position - truth.position).norm() < 1e-3);
//! # Ok::<(), orbits::orbits_errors::OrbitsError>(())
//! ```
//!
//! ## References
//!
//! * Curtis (2014) – *Orbital Mechanics for Engineering Students*, §5.10
//! * Vallado (2013) – *Fundamentals of Astrodynamics and Applications*, §7.3
use std::ops::ControlFlow;

use aberth::aberth;
use aberth::StopReason;
use log::{debug, trace};
use nalgebra::{Matrix3, Vector3};
use smallvec::SmallVec;

use crate::constants::{CelestialBody, Kilometer, Second};
use crate::initial_orbit_determination::gauss_result::{GaussResult, GaussSolution};
use crate::initial_orbit_determination::IODParams;
use crate::kepler::lagrange_coefficients;
use crate::observations::ObservationTriplet;
use crate::orbit_type::StateVector;
use crate::orbits_errors::OrbitsError;

/// Geometry of an observation triplet, ready for the Gauss solver.
///
/// See also
/// -------------
/// * [`GaussObs::new`] – Constructor from an [`ObservationTriplet`].
#[derive(Debug, PartialEq, Clone)]
pub struct GaussObs {
    pub(crate) tau1: Second,
    pub(crate) tau3: Second,
    pub(crate) unit_matrix: Matrix3<f64>,
    pub(crate) inv_unit_matrix: Matrix3<f64>,
    pub(crate) site_matrix: Matrix3<f64>,
    pub(crate) m_matrix: Matrix3<f64>,
    pub(crate) body: CelestialBody,
}

/// Truncated Lagrange coefficients `(f₁, g₁, f₃, g₃)`.
type LagrangePair = (f64, f64, f64, f64);

/// Descartes’ sign-variation upper bound on the positive roots of
/// `p(x) = c0 + c3·x³ + c6·x⁶ + x⁸`.
///
/// Coefficients with `|c| ≤ zero_eps` are ignored. A result of `0` guarantees that `p` has
/// no positive real root, so the root finder can be skipped.
#[inline]
fn descartes_upper_bound_deg8_sparse(c0: f64, c3: f64, c6: f64, zero_eps: f64) -> u32 {
    #[inline]
    fn s(v: f64, eps: f64) -> i8 {
        if v.abs() <= eps {
            0
        } else if v.is_sign_positive() {
            1
        } else {
            -1
        }
    }
    // Leading coefficient is +1 for x^8.
    let seq = [1_i8, s(c6, zero_eps), s(c3, zero_eps), s(c0, zero_eps)];

    let mut last = 0_i8;
    let mut count = 0_u32;
    for &cur in &seq {
        if cur == 0 {
            continue;
        }
        if last != 0 && cur != last {
            count += 1;
        }
        last = cur;
    }
    count
}

/// Newton polish of a root of `x⁸ + c6·x⁶ + c3·x³ + c0`.
fn polish_root(x0: f64, c0: f64, c3: f64, c6: f64) -> f64 {
    let mut x = x0;
    for _ in 0..5 {
        let x2 = x * x;
        let x3 = x2 * x;
        let x5 = x3 * x2;
        let p = x5 * x3 + c6 * x3 * x3 + c3 * x3 + c0;
        let dp = 8.0 * x5 * x2 + 6.0 * c6 * x5 + 3.0 * c3 * x2;
        if dp == 0.0 {
            break;
        }
        let step = p / dp;
        if !step.is_finite() {
            break;
        }
        x -= step;
        if step.abs() <= f64::EPSILON * x.abs() {
            break;
        }
    }
    if x.is_finite() && x > 0.0 {
        x
    } else {
        x0
    }
}

impl GaussObs {
    /// Prepare the Gauss geometry of a triplet.
    ///
    /// Arguments
    /// -----------------
    /// * `triplet`: three time-ordered observations.
    /// * `body`: central body.
    ///
    /// Return
    /// ----------
    /// * `Err(OrbitsError::SingularDirectionMatrix)` if the three lines of sight are coplanar.
    pub fn new(triplet: &ObservationTriplet, body: CelestialBody) -> Result<Self, OrbitsError> {
        let (tau1, tau3) = triplet.taus();
        let unit_matrix = Matrix3::from_columns(&[
            triplet.first.line_of_sight(),
            triplet.pivot.line_of_sight(),
            triplet.third.line_of_sight(),
        ]);
        let inv_unit_matrix = unit_matrix
            .try_inverse()
            .ok_or(OrbitsError::SingularDirectionMatrix)?;
        if !inv_unit_matrix.iter().all(|x| x.is_finite()) {
            return Err(OrbitsError::SingularDirectionMatrix);
        }
        let site_matrix =
            Matrix3::from_columns(&[triplet.first.site, triplet.pivot.site, triplet.third.site]);

        Ok(GaussObs {
            tau1,
            tau3,
            unit_matrix,
            inv_unit_matrix,
            site_matrix,
            m_matrix: inv_unit_matrix * site_matrix,
            body,
        })
    }

    /// `(τ₁, τ₃)` in seconds.
    pub fn taus(&self) -> (Second, Second) {
        (self.tau1, self.tau3)
    }

    /// Coefficients of `c(u) = a + u·b`, the Lagrange combination weights as a function of
    /// `u = μ/r₂³`.
    fn series_vectors(&self) -> (Vector3<f64>, Vector3<f64>) {
        let (tau1, tau3) = (self.tau1, self.tau3);
        let tau13 = tau3 - tau1;
        let vector_a = Vector3::new(tau3 / tau13, -1.0, -(tau1 / tau13));
        let vector_b = Vector3::new(
            vector_a[0] * (tau13.powi(2) - tau3.powi(2)) / 6.0,
            0.0,
            vector_a[2] * (tau13.powi(2) - tau1.powi(2)) / 6.0,
        );
        (vector_a, vector_b)
    }

    /// Coefficients `(c6, c3, c0)` of the range polynomial `r⁸ + c6·r⁶ + c3·r³ + c0` [km].
    pub fn coeff_eight_poly(&self) -> (f64, f64, f64) {
        let mu = self.body.mu;
        let (vector_a, vector_b) = self.series_vectors();
        let ra = self.site_matrix * vector_a;
        let rb = self.site_matrix * vector_b;

        let second_row_t = self.inv_unit_matrix.row(1).transpose();
        let d1 = second_row_t.dot(&ra);
        let d2 = second_row_t.dot(&rb);

        let site2 = self.site_matrix.column(1);
        let r22 = site2.norm_squared();
        let s2r2 = self.unit_matrix.column(1).dot(&site2);

        (
            -(d1.powi(2)) - r22 - (2.0 * d1 * s2r2),
            -(2.0 * mu * d2 * (d1 + s2r2)),
            -(mu * d2).powi(2),
        )
    }

    /// Enumerate the real positive roots of the rescaled range polynomial.
    ///
    /// The substitution `r = s·x` with `s` the body radius keeps the coefficients of order one.
    /// Roots are returned in km.
    fn visit_real_positive_roots(
        &self,
        iod_params: &IODParams,
        mut on_root: impl FnMut(Kilometer) -> ControlFlow<(), ()>,
    ) -> Result<(), OrbitsError> {
        let (c6, c3, c0) = self.coeff_eight_poly();
        let s = self.body.equatorial_radius;
        let (k6, k3, k0) = (c6 / s.powi(2), c3 / s.powi(5), c0 / s.powi(8));
        let poly = [k0, 0.0, 0.0, k3, 0.0, 0.0, k6, 0.0, 1.0];

        // Cheap prefilter: no sign change, no positive root.
        if descartes_upper_bound_deg8_sparse(k0, k3, k6, 0.0) == 0 {
            debug!("range polynomial has no positive root (Descartes)");
            return Err(OrbitsError::GaussNoRootsFound);
        }

        let roots = aberth(&poly, iod_params.aberth_max_iter, iod_params.aberth_eps);
        match roots.stop_reason {
            StopReason::Converged(_) | StopReason::MaxIteration(_) => {
                for z in roots.iter() {
                    if z.re > 0.0 && z.im.abs() < iod_params.root_imag_eps {
                        let x = polish_root(z.re, k0, k3, k6);
                        if let ControlFlow::Break(()) = on_root(x * s) {
                            break;
                        }
                    }
                }
                Ok(())
            }
            StopReason::Failed(_) => Err(OrbitsError::PolynomialRootFindingFailed),
        }
    }

    /// Slant ranges `ρᵢ = (−M·c)ᵢ / cᵢ` for the combination weights `c`.
    fn slant_ranges(&self, vector_c: &Vector3<f64>) -> Vector3<f64> {
        let gcap = self.site_matrix * vector_c;
        let crhom = self.inv_unit_matrix * gcap;
        -crhom.component_div(vector_c)
    }

    /// Inertial positions `rᵢ = ρᵢ·ρ̂ᵢ + Rᵢ`, one per column.
    fn positions(&self, rho: &Vector3<f64>) -> Matrix3<f64> {
        let rho_unit = Matrix3::from_columns(&[
            rho[0] * self.unit_matrix.column(0),
            rho[1] * self.unit_matrix.column(1),
            rho[2] * self.unit_matrix.column(2),
        ]);
        self.site_matrix + rho_unit
    }

    /// Second-order Lagrange coefficients at `τ₁` and `τ₃` for the pivot radius `r2`.
    fn series_lagrange(&self, r2: Kilometer) -> LagrangePair {
        let u = self.body.mu / r2.powi(3);
        let (tau1, tau3) = (self.tau1, self.tau3);
        (
            1.0 - 0.5 * u * tau1.powi(2),
            tau1 - u * tau1.powi(3) / 6.0,
            1.0 - 0.5 * u * tau3.powi(2),
            tau3 - u * tau3.powi(3) / 6.0,
        )
    }

    /// Pivot velocity from the outer positions and the Lagrange coefficients.
    #[inline]
    fn pivot_velocity(positions: &Matrix3<f64>, (f1, g1, f3, g3): LagrangePair) -> Vector3<f64> {
        let det = f1 * g3 - f3 * g1;
        (f1 * positions.column(2) - f3 * positions.column(0)) / det
    }

    /// Build the classical solution associated with a root of the range polynomial.
    ///
    /// Return
    /// ----------
    /// * `None` if one of the slant ranges is not above `min_rho_km` or the geometry degenerates.
    pub fn solution_from_root(&self, r2: Kilometer, iod_params: &IODParams) -> Option<GaussSolution> {
        let (vector_a, vector_b) = self.series_vectors();
        let u = self.body.mu / r2.powi(3);
        let vector_c = vector_a + u * vector_b;

        let rho = self.slant_ranges(&vector_c);
        if !rho.iter().all(|r| r.is_finite() && *r > iod_params.min_rho_km) {
            trace!("root r2 = {r2} km rejected: slant ranges {rho:?}");
            return None;
        }

        let positions = self.positions(&rho);
        let velocity = Self::pivot_velocity(&positions, self.series_lagrange(r2));
        if !velocity.iter().all(|v| v.is_finite()) {
            return None;
        }

        Some(GaussSolution {
            state: StateVector::new(positions.column(1).into_owned(), velocity),
            slant_ranges: rho,
            positions,
            r2_root: r2,
            iterations: 0,
        })
    }

    /// Classical Gauss solutions for every admissible root of the range polynomial.
    ///
    /// Return
    /// ----------
    /// * One [`GaussResult::PrelimOrbit`] per admissible root, in root-finder order.
    /// * `Err(OrbitsError::GaussNoRootsFound)` when no root passes the filters.
    /// * `Err(OrbitsError::PolynomialRootFindingFailed)` when Aberth–Ehrlich fails.
    pub fn prelim_orbit_all(&self, iod_params: &IODParams) -> Result<Vec<GaussResult>, OrbitsError> {
        let r2_min = iod_params.r2_min_or(self.body.equatorial_radius);
        let r2_max = iod_params.r2_max_km;

        let mut solutions: SmallVec<[GaussResult; 3]> = SmallVec::new();
        self.visit_real_positive_roots(iod_params, |r2| {
            if !(r2_min..=r2_max).contains(&r2) {
                trace!("root r2 = {r2} km outside [{r2_min}, {r2_max}] km");
                return ControlFlow::Continue(());
            }
            if let Some(sol) = self.solution_from_root(r2, iod_params) {
                debug!("admissible root r2 = {r2} km, rho2 = {} km", sol.slant_ranges[1]);
                solutions.push(GaussResult::PrelimOrbit(sol));
            }
            ControlFlow::Continue(())
        })?;

        if solutions.is_empty() {
            Err(OrbitsError::GaussNoRootsFound)
        } else {
            Ok(solutions.into_vec())
        }
    }

    /// Classical Gauss solution, requiring a single admissible root.
    ///
    /// Return
    /// ----------
    /// * `Err(OrbitsError::AmbiguousRoots)` listing the roots when several survive the filters.
    ///
    /// See also
    /// ------------
    /// * [`GaussObs::prelim_orbit_all`] – Every admissible candidate.
    pub fn prelim_orbit(&self, iod_params: &IODParams) -> Result<GaussResult, OrbitsError> {
        single_solution(self.prelim_orbit_all(iod_params)?)
    }

    /// Iteratively refine a classical solution.
    ///
    /// Each iteration recomputes the Lagrange coefficients at `τ₁`, `τ₃` with the universal
    /// solver from the current pivot state, averages them with the previous coefficients and
    /// rebuilds slant ranges, positions and the pivot velocity.
    ///
    /// Return
    /// ----------
    /// * A [`GaussResult::CorrectedOrbit`] once `|Δρ₂| < refine_tolerance`.
    /// * `Err(OrbitsError::RefinementNotConverged)` after `max_refine_iter` iterations or if the
    ///   iterate stops being finite.
    /// * Errors of the universal Kepler solver are propagated.
    pub fn refine(
        &self,
        prelim: &GaussSolution,
        iod_params: &IODParams,
    ) -> Result<GaussResult, OrbitsError> {
        let (tau1, tau3) = (self.tau1, self.tau3);
        let (mut f1, mut g1, mut f3, mut g3) = self.series_lagrange(prelim.r2_root);

        let mut state = prelim.state;
        let mut rho = prelim.slant_ranges;
        let mut last_delta = f64::INFINITY;

        for iteration in 1..=iod_params.max_refine_iter {
            let (f1_new, g1_new) =
                lagrange_coefficients(&self.body, &state, tau1, &iod_params.universal)?;
            let (f3_new, g3_new) =
                lagrange_coefficients(&self.body, &state, tau3, &iod_params.universal)?;

            f1 = 0.5 * (f1 + f1_new);
            g1 = 0.5 * (g1 + g1_new);
            f3 = 0.5 * (f3 + f3_new);
            g3 = 0.5 * (g3 + g3_new);

            let det = f1 * g3 - f3 * g1;
            let vector_c = Vector3::new(g3 / det, -1.0, -g1 / det);
            let rho_new = self.slant_ranges(&vector_c);
            let positions = self.positions(&rho_new);
            let velocity = Self::pivot_velocity(&positions, (f1, g1, f3, g3));

            last_delta = (rho_new[1] - rho[1]).abs();
            rho = rho_new;
            state = StateVector::new(positions.column(1).into_owned(), velocity);
            trace!("refinement {iteration}: rho2 = {} km, |Δρ₂| = {last_delta:e}", rho[1]);

            if !last_delta.is_finite() || !velocity.iter().all(|v| v.is_finite()) {
                return Err(OrbitsError::RefinementNotConverged {
                    iterations: iteration,
                    last_delta,
                });
            }
            if last_delta < iod_params.refine_tolerance {
                debug!("extended Gauss converged in {iteration} iterations (rho2 = {} km)", rho[1]);
                return Ok(GaussResult::CorrectedOrbit(GaussSolution {
                    state,
                    slant_ranges: rho,
                    positions,
                    r2_root: prelim.r2_root,
                    iterations: iteration,
                }));
            }
        }

        Err(OrbitsError::RefinementNotConverged {
            iterations: iod_params.max_refine_iter,
            last_delta,
        })
    }

    /// Extended Gauss method: classical solution followed by [`GaussObs::refine`].
    pub fn extended_orbit(&self, iod_params: &IODParams) -> Result<GaussResult, OrbitsError> {
        let prelim = self.prelim_orbit(iod_params)?.into_inner();
        self.refine(&prelim, iod_params)
    }
}

/// Unwrap a candidate list holding exactly one solution.
fn single_solution(mut candidates: Vec<GaussResult>) -> Result<GaussResult, OrbitsError> {
    match candidates.len() {
        0 => Err(OrbitsError::GaussNoRootsFound),
        1 => candidates.pop().ok_or(OrbitsError::GaussNoRootsFound),
        _ => Err(OrbitsError::AmbiguousRoots(
            candidates
                .iter()
                .map(|c| c.get_solution().r2_root)
                .collect(),
        )),
    }
}
