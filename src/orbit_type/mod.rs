//! # Orbit representations
//!
//! Two representations of a Keplerian orbit around a [`CelestialBody`](crate::constants::CelestialBody):
//!
//! - [`StateVector`]: Cartesian position and velocity in the Earth-centred inertial frame
//!   (km, km/s).
//! - [`ClassicalElements`](crate::orbit_type::classical_element::ClassicalElements): the
//!   classical set `(h, e, a, i, Ω, ω, ν)` with angles in degrees.
//!
//! Conversions go both ways through
//! [`ClassicalElements::from_state`](crate::orbit_type::classical_element::ClassicalElements::from_state)
//! and [`ClassicalElements::to_state`](crate::orbit_type::classical_element::ClassicalElements::to_state).
//!
//! ## Typical workflow
//!
//! ```rust
//! use nalgebra::Vector3;
//! use orbits::constants::EARTH;
//! use orbits::orbit_type::{classical_element::ClassicalElements, StateVector};
//!
//! let state = StateVector::new(
//!     Vector3::new(6500.0, -7500.0, -2500.0),
//!     Vector3::new(4.0, 3.0, -3.0),
//! );
//! let coe = ClassicalElements::from_state(&state, &EARTH)?;
//! let back = coe.to_state(&EARTH)?;
//! assert!((back.position - state.position).norm() < 1e-6);
//! # Ok::<(), orbits::orbits_errors::OrbitsError>(())
//! ```
use std::fmt;

use nalgebra::{Vector3, Vector6};

use crate::constants::CelestialBody;

/// Classical orbital elements and their conversions.
pub mod classical_element;

pub use classical_element::ClassicalElements;

/// Conic family of an orbit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrbitKind {
    Circular,
    Elliptic,
    Parabolic,
    Hyperbolic,
}

/// Cartesian state in the Earth-centred inertial frame.
///
/// Propagators never modify a state in place: each step returns a new value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StateVector {
    /// Position [km]
    pub position: Vector3<f64>,
    /// Velocity [km/s]
    pub velocity: Vector3<f64>,
}

impl StateVector {
    pub fn new(position: Vector3<f64>, velocity: Vector3<f64>) -> Self {
        StateVector { position, velocity }
    }

    /// Distance from the body centre.
    #[inline]
    pub fn radius(&self) -> f64 {
        self.position.norm()
    }

    #[inline]
    pub fn speed(&self) -> f64 {
        self.velocity.norm()
    }

    /// Radial velocity `r·v / |r|`, positive when moving away from the body.
    #[inline]
    pub fn radial_velocity(&self) -> f64 {
        self.position.dot(&self.velocity) / self.radius()
    }

    /// Specific angular momentum vector `r × v`.
    #[inline]
    pub fn angular_momentum(&self) -> Vector3<f64> {
        self.position.cross(&self.velocity)
    }

    /// Specific orbital energy `v²/2 − μ/r` [km²/s²].
    pub fn specific_energy(&self, body: &CelestialBody) -> f64 {
        0.5 * self.velocity.norm_squared() - body.mu / self.radius()
    }

    /// `[x, y, z, vx, vy, vz]`
    pub fn as_array(&self) -> [f64; 6] {
        let (r, v) = (&self.position, &self.velocity);
        [r.x, r.y, r.z, v.x, v.y, v.z]
    }

    pub fn from_array(values: [f64; 6]) -> Self {
        StateVector {
            position: Vector3::new(values[0], values[1], values[2]),
            velocity: Vector3::new(values[3], values[4], values[5]),
        }
    }

    /// Stack position and velocity into a single 6-vector.
    pub fn to_vector6(&self) -> Vector6<f64> {
        Vector6::from_row_slice(&self.as_array())
    }

    pub fn from_vector6(values: &Vector6<f64>) -> Self {
        StateVector {
            position: values.fixed_rows::<3>(0).into_owned(),
            velocity: values.fixed_rows::<3>(3).into_owned(),
        }
    }
}

impl fmt::Display for StateVector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (r, v) = (&self.position, &self.velocity);
        writeln!(f, "  r = [{:.6}, {:.6}, {:.6}] km", r.x, r.y, r.z)?;
        write!(f, "  v = [{:.9}, {:.9}, {:.9}] km/s", v.x, v.y, v.z)
    }
}
