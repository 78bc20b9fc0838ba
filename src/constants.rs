//! # Constants and type definitions
//!
//! This module centralizes the **physical constants**, **conversion factors** and **common type
//! aliases** used throughout the crate.
//!
//! ## Overview
//!
//! - Time-system constants (J2000 epoch, Julian century, seconds per day)
//! - Unit conversions (degrees ↔ radians)
//! - Core type aliases used across the crate
//! - [`CelestialBody`]: the governing-body configuration (gravitational parameter, equatorial
//!   radius, flattening) threaded through every computation instead of module-level globals.
//!
//! All lengths are in **kilometers**, times in **seconds** and angles in **degrees** or
//! **radians** as indicated by the type alias of each field.

// -------------------------------------------------------------------------------------------------
// Physical constants and unit conversions
// -------------------------------------------------------------------------------------------------

/// 2π, useful for trigonometric conversions
pub const DPI: f64 = 2. * std::f64::consts::PI;

/// Number of seconds in a Julian day
pub const SECONDS_PER_DAY: f64 = 86_400.0;

/// Julian Date of the J2000.0 epoch
pub const J2000_JD: f64 = 2_451_545.0;

/// Number of days in a Julian century
pub const DAYS_PER_JULIAN_CENTURY: f64 = 36_525.0;

/// Degrees → radians
pub const RADEG: f64 = std::f64::consts::PI / 180.0;

/// Threshold below which the eccentricity or the node line is treated as degenerate
/// when resolving classical orbital elements.
pub const DEGENERACY_EPS: f64 = 1e-10;

/// Earth gravitational parameter in km³/s²
pub const MU_EARTH: f64 = 398_600.0;

/// Earth equatorial radius in km
pub const EARTH_EQUATORIAL_RADIUS: f64 = 6378.0;

/// Earth flattening factor
pub const EARTH_FLATTENING: f64 = 0.003353;

// -------------------------------------------------------------------------------------------------
// Type aliases
// -------------------------------------------------------------------------------------------------

/// Angle in degrees
pub type Degree = f64;
/// Angle in radians
pub type Radian = f64;
/// Distance in kilometers
pub type Kilometer = f64;
/// Duration in seconds
pub type Second = f64;
/// Julian Date (days)
pub type JulianDate = f64;

// -------------------------------------------------------------------------------------------------
// Governing body
// -------------------------------------------------------------------------------------------------

/// Physical description of the central body of a two-body problem.
///
/// Every routine of the crate receives the body explicitly, so the same code can be reused for
/// another primary. Mixing two bodies inside a single computation is a caller error and is not
/// detected.
///
/// Fields
/// -----------------
/// * `mu`: gravitational parameter `[km³/s²]`.
/// * `equatorial_radius`: equatorial radius `[km]`.
/// * `flattening`: geometric flattening `f = (a − b)/a` of the reference ellipsoid.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CelestialBody {
    pub mu: f64,
    pub equatorial_radius: Kilometer,
    pub flattening: f64,
}

impl CelestialBody {
    pub const fn new(mu: f64, equatorial_radius: Kilometer, flattening: f64) -> Self {
        CelestialBody {
            mu,
            equatorial_radius,
            flattening,
        }
    }

    /// `√μ`, the scaling factor of the universal anomaly.
    #[inline]
    pub fn sqrt_mu(&self) -> f64 {
        self.mu.sqrt()
    }
}

impl Default for CelestialBody {
    fn default() -> Self {
        EARTH
    }
}

/// The Earth with the historical constants (μ = 398600 km³/s², R = 6378 km, f = 0.003353).
pub const EARTH: CelestialBody =
    CelestialBody::new(MU_EARTH, EARTH_EQUATORIAL_RADIUS, EARTH_FLATTENING);
