//! # Gauss orbit determination result
//!
//! This module defines [`GaussResult`], the outcome of the Gauss initial orbit determination
//! applied to an [`ObservationTriplet`](crate::observations::ObservationTriplet), and
//! [`GaussSolution`], the state estimate it carries.
//!
//! ## Variants
//!
//! - **`PrelimOrbit`**
//!   The classical solution: root of the 8th-degree range polynomial and truncated
//!   (second-order) Lagrange coefficients, without refinement.
//!
//! - **`CorrectedOrbit`**
//!   The solution after the iterative refinement in which the Lagrange coefficients are
//!   recomputed from the universal-variable solver until the pivot slant range settles.
//!
//! ## Features
//!
//! - Query methods: [`GaussResult::is_prelim`], [`GaussResult::is_corrected`].
//! - Accessors: [`GaussResult::get_solution`], [`GaussResult::as_inner`],
//!   [`GaussResult::into_inner`].
//! - [`GaussSolution::elements`] converts the estimated state to classical elements for
//!   reporting.
use std::fmt;

use nalgebra::{Matrix3, Vector3};

use crate::constants::{CelestialBody, Kilometer};
use crate::orbit_type::{ClassicalElements, StateVector};
use crate::orbits_errors::OrbitsError;

/// State estimate produced by the Gauss method at the pivot epoch.
///
/// Fields
/// -----------------
/// * `state`: position and velocity of the object at the pivot observation.
/// * `slant_ranges`: topocentric distances `(ρ₁, ρ₂, ρ₃)` [km].
/// * `positions`: inertial positions at the three epochs, one per column [km].
/// * `r2_root`: admissible root of the range polynomial this solution comes from [km].
/// * `iterations`: refinement iterations (0 for a preliminary orbit).
#[derive(Debug, Clone, PartialEq)]
pub struct GaussSolution {
    pub state: StateVector,
    pub slant_ranges: Vector3<f64>,
    pub positions: Matrix3<f64>,
    pub r2_root: Kilometer,
    pub iterations: usize,
}

impl GaussSolution {
    /// Classical elements of the estimated state.
    pub fn elements(&self, body: &CelestialBody) -> Result<ClassicalElements, OrbitsError> {
        ClassicalElements::from_state(&self.state, body)
    }
}

impl fmt::Display for GaussSolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.state)?;
        writeln!(
            f,
            "  ρ = [{:.6}, {:.6}, {:.6}] km",
            self.slant_ranges[0], self.slant_ranges[1], self.slant_ranges[2]
        )?;
        write!(
            f,
            "  polynomial root r₂ = {:.6} km, refinement iterations = {}",
            self.r2_root, self.iterations
        )
    }
}

#[derive(PartialEq, Clone, Debug)]
pub enum GaussResult {
    PrelimOrbit(GaussSolution),
    CorrectedOrbit(GaussSolution),
}

impl GaussResult {
    pub fn is_prelim(&self) -> bool {
        matches!(self, GaussResult::PrelimOrbit(_))
    }

    pub fn is_corrected(&self) -> bool {
        matches!(self, GaussResult::CorrectedOrbit(_))
    }

    pub fn get_solution(&self) -> &GaussSolution {
        match self {
            GaussResult::PrelimOrbit(sol) => sol,
            GaussResult::CorrectedOrbit(sol) => sol,
        }
    }

    pub fn as_inner(&self) -> &GaussSolution {
        self.get_solution()
    }

    /// Estimated state at the pivot epoch.
    pub fn state(&self) -> &StateVector {
        &self.get_solution().state
    }

    pub fn into_inner(self) -> GaussSolution {
        match self {
            GaussResult::PrelimOrbit(sol) => sol,
            GaussResult::CorrectedOrbit(sol) => sol,
        }
    }
}

impl fmt::Display for GaussResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GaussResult::PrelimOrbit(sol) => {
                writeln!(f, "Gauss IOD Result: Preliminary Orbit")?;
                write!(f, "{sol}")
            }
            GaussResult::CorrectedOrbit(sol) => {
                writeln!(f, "Gauss IOD Result: Corrected Orbit")?;
                write!(f, "{sol}")
            }
        }
    }
}
