//! # Initial Orbit Determination (IOD) parameters
//!
//! This module defines the [`IODParams`] configuration struct and its builder, which control how
//! the **Gauss method** solves the range polynomial, filters its roots and refines the
//! preliminary solution.
//!
//! ## Purpose
//!
//! [`IODParams`] centralizes every tunable of
//! [`GaussObs::prelim_orbit`](crate::initial_orbit_determination::gauss::GaussObs::prelim_orbit)
//! and [`GaussObs::extended_orbit`](crate::initial_orbit_determination::gauss::GaussObs::extended_orbit):
//!
//! - **Polynomial solving**: Aberth iterations/epsilon and the real-root filter tolerance,
//! - **Physical plausibility**: bounds on the pivot radius `r₂` and a minimum slant range,
//! - **Refinement**: tolerance on the pivot slant range and an iteration cap for the extended
//!   method,
//! - **Universal Kepler solver** controls used inside the refinement loop.
//!
//! ## Pipeline overview
//!
//! 1. **Polynomial**: the degree-8 equation in `r₂` is built and rescaled by the body radius.
//! 2. **Root filtering**: real positive roots in `[r2_min_km, r2_max_km]` whose three slant
//!    ranges exceed `min_rho_km` are kept. Exactly one must survive.
//! 3. **Refinement** (extended method): Lagrange coefficients are recomputed with the universal
//!    solver and averaged with their previous values until `|Δρ₂| < refine_tolerance`, at most
//!    `max_refine_iter` times.
//!
//! ## Example
//!
//! ```rust
//! use orbits::initial_orbit_determination::IODParams;
//!
//! let params = IODParams::builder()
//!     .r2_max_km(50_000.0)
//!     .min_rho_km(100.0)
//!     .max_refine_iter(200)
//!     .build()
//!     .unwrap();
//! assert_eq!(params.max_refine_iter, 200);
//! ```
//!
//! ## See also
//!
//! * [`crate::initial_orbit_determination::gauss::GaussObs`] – Gauss solver
//! * [`crate::initial_orbit_determination::gauss_result::GaussResult`] – result type for preliminary/corrected orbits
use std::cmp::Ordering::{Equal, Greater, Less};
use std::fmt;

use crate::constants::Kilometer;
use crate::kepler::UniversalParams;
use crate::orbits_errors::OrbitsError;

pub mod gauss;
pub mod gauss_result;

/// Configuration of the Gauss initial orbit determination.
///
/// Fields
/// -----------------
/// * `aberth_max_iter`, `aberth_eps`: Aberth–Ehrlich iteration cap and convergence threshold.
/// * `root_imag_eps`: maximum |imaginary part| for a root to be considered real.
/// * `r2_min_km`: lower bound on the pivot radius; `None` uses the body equatorial radius.
/// * `r2_max_km`: upper bound on the pivot radius.
/// * `min_rho_km`: all three slant ranges must be strictly above this value.
/// * `refine_tolerance`: convergence threshold on `|Δρ₂|` [km] of the extended method.
/// * `max_refine_iter`: iteration cap of the extended method.
/// * `universal`: Newton controls of the universal Kepler solver used during refinement.
#[derive(Debug, Clone, PartialEq)]
pub struct IODParams {
    // --- Gauss polynomial / solver controls ---
    pub aberth_max_iter: u32,
    pub aberth_eps: f64,
    pub root_imag_eps: f64,

    // --- Physical plausibility / filtering ---
    pub r2_min_km: Option<Kilometer>,
    pub r2_max_km: Kilometer,
    pub min_rho_km: Kilometer,

    // --- Refinement ---
    pub refine_tolerance: f64,
    pub max_refine_iter: usize,
    pub universal: UniversalParams,
}

impl IODParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn builder() -> IODParamsBuilder {
        IODParamsBuilder::new()
    }

    /// Lower bound on `r₂`, falling back to `default_min` when unset.
    #[inline]
    pub fn r2_min_or(&self, default_min: Kilometer) -> Kilometer {
        self.r2_min_km.unwrap_or(default_min)
    }
}

impl Default for IODParams {
    fn default() -> Self {
        IODParams {
            aberth_max_iter: 50,
            aberth_eps: 1.0e-6,
            root_imag_eps: 1.0e-6,

            r2_min_km: None,
            r2_max_km: 1.0e6,
            min_rho_km: 0.0,

            refine_tolerance: 1.0e-8,
            max_refine_iter: 500,
            universal: UniversalParams::default(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct IODParamsBuilder {
    params: IODParams,
}

impl Default for IODParamsBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl IODParamsBuilder {
    pub fn new() -> Self {
        Self {
            params: IODParams::default(),
        }
    }

    // --- Gauss polynomial / solver ---
    pub fn aberth_max_iter(mut self, v: u32) -> Self {
        self.params.aberth_max_iter = v;
        self
    }
    pub fn aberth_eps(mut self, v: f64) -> Self {
        self.params.aberth_eps = v;
        self
    }
    pub fn root_imag_eps(mut self, v: f64) -> Self {
        self.params.root_imag_eps = v;
        self
    }

    // --- Physical filters ---
    pub fn r2_min_km(mut self, v: f64) -> Self {
        self.params.r2_min_km = Some(v);
        self
    }
    pub fn r2_max_km(mut self, v: f64) -> Self {
        self.params.r2_max_km = v;
        self
    }
    pub fn min_rho_km(mut self, v: f64) -> Self {
        self.params.min_rho_km = v;
        self
    }

    // --- Refinement ---
    pub fn refine_tolerance(mut self, v: f64) -> Self {
        self.params.refine_tolerance = v;
        self
    }
    pub fn max_refine_iter(mut self, v: usize) -> Self {
        self.params.max_refine_iter = v;
        self
    }
    pub fn universal(mut self, v: UniversalParams) -> Self {
        self.params.universal = v;
        self
    }

    // ---- Numeric helpers for PartialOrd (handle NaN as invalid) ----

    #[inline]
    fn gt0(x: f64) -> bool {
        x.partial_cmp(&0.0) == Some(Greater)
    }

    #[inline]
    fn ge0(x: f64) -> bool {
        matches!(x.partial_cmp(&0.0), Some(Greater) | Some(Equal))
    }

    #[inline]
    fn le(a: f64, b: f64) -> bool {
        matches!(a.partial_cmp(&b), Some(Less) | Some(Equal))
    }

    /// Validate and return the parameters.
    ///
    /// Return
    /// ----------
    /// * `Err(OrbitsError::InvalidParameter)` naming the first offending field.
    pub fn build(self) -> Result<IODParams, OrbitsError> {
        let p = &self.params;

        if !Self::ge0(p.root_imag_eps) {
            return Err(OrbitsError::InvalidParameter(
                "root_imag_eps must be >= 0".into(),
            ));
        }
        if !Self::ge0(p.min_rho_km) {
            return Err(OrbitsError::InvalidParameter(
                "min_rho_km must be >= 0".into(),
            ));
        }

        if !Self::gt0(p.aberth_eps) {
            return Err(OrbitsError::InvalidParameter(
                "aberth_eps must be > 0".into(),
            ));
        }
        if !Self::gt0(p.refine_tolerance) {
            return Err(OrbitsError::InvalidParameter(
                "refine_tolerance must be > 0".into(),
            ));
        }
        if !Self::gt0(p.universal.tolerance) {
            return Err(OrbitsError::InvalidParameter(
                "universal.tolerance must be > 0".into(),
            ));
        }

        if p.aberth_max_iter == 0 {
            return Err(OrbitsError::InvalidParameter(
                "aberth_max_iter must be >= 1".into(),
            ));
        }
        if p.max_refine_iter == 0 {
            return Err(OrbitsError::InvalidParameter(
                "max_refine_iter must be >= 1".into(),
            ));
        }
        if p.universal.max_iterations == 0 {
            return Err(OrbitsError::InvalidParameter(
                "universal.max_iterations must be >= 1".into(),
            ));
        }

        // --- r2 bounds: 0 <= r2_min_km <= r2_max_km, r2_max_km > 0 ---
        let ok_r2max = Self::gt0(p.r2_max_km);
        let ok_r2min = p
            .r2_min_km
            .map_or(true, |min| Self::ge0(min) && Self::le(min, p.r2_max_km));
        if !(ok_r2min && ok_r2max) {
            return Err(OrbitsError::InvalidParameter(
                "require 0 <= r2_min_km <= r2_max_km and r2_max_km > 0".into(),
            ));
        }

        Ok(self.params)
    }
}

impl fmt::Display for IODParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if f.alternate() {
            const PARAM_COL: usize = 40;
            writeln!(f, "Initial Orbit Determination Parameters")?;
            writeln!(f, "-------------------------------------")?;

            macro_rules! line {
                ($fmt:expr, $val:expr, $comment:expr) => {{
                    let s = format!($fmt, $val);
                    let pad = if s.len() < PARAM_COL {
                        " ".repeat(PARAM_COL - s.len())
                    } else {
                        " ".to_string()
                    };
                    writeln!(f, "  {}{}# {}", s, pad, $comment)
                }};
            }

            writeln!(f, "[Gauss polynomial / solver]")?;
            line!(
                "aberth_max_iter   = {}",
                self.aberth_max_iter,
                "Aberth–Ehrlich iteration cap"
            )?;
            line!(
                "aberth_eps        = {:.1e}",
                self.aberth_eps,
                "Aberth convergence threshold"
            )?;
            line!(
                "root_imag_eps     = {:.1e}",
                self.root_imag_eps,
                "Max |Im| for a real root"
            )?;

            writeln!(f, "\n[Physical plausibility / filtering]")?;
            match self.r2_min_km {
                Some(v) => line!("r2_min_km         = {:.3} km", v, "Minimum pivot radius")?,
                None => line!("r2_min_km         = {}", "body radius", "Minimum pivot radius")?,
            }
            line!(
                "r2_max_km         = {:.3} km",
                self.r2_max_km,
                "Maximum pivot radius"
            )?;
            line!(
                "min_rho_km        = {:.3} km",
                self.min_rho_km,
                "Minimum slant range"
            )?;

            writeln!(f, "\n[Refinement]")?;
            line!(
                "refine_tolerance  = {:.1e} km",
                self.refine_tolerance,
                "Convergence on |Δρ₂|"
            )?;
            line!(
                "max_refine_iter   = {}",
                self.max_refine_iter,
                "Extended method iteration cap"
            )?;
            line!(
                "kepler tolerance  = {:.1e}",
                self.universal.tolerance,
                "Universal Newton step tolerance"
            )?;
            line!(
                "kepler max iter   = {}",
                self.universal.max_iterations,
                "Universal Newton iteration cap"
            )?;
            Ok(())
        } else {
            write!(
                f,
                "IODParams {{ aberth: ({}, {:.1e}), r2: [{}, {:.1}] km, min_rho: {:.1} km, refine: ({:.1e}, {}) }}",
                self.aberth_max_iter,
                self.aberth_eps,
                self.r2_min_km
                    .map_or_else(|| "body radius".to_string(), |v| format!("{v:.1}")),
                self.r2_max_km,
                self.min_rho_km,
                self.refine_tolerance,
                self.max_refine_iter
            )
        }
    }
}
