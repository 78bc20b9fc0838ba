//! # Ground observers
//!
//! A ground site is described by its geodetic latitude, a longitude magnitude with its
//! [`Hemisphere`], and an altitude above the reference ellipsoid. Its inertial position at a
//! given instant is obtained by rotating the body-fixed site through the local sidereal time:
//!
//! ```text
//! D = sqrt(1 − (2f − f²)·sin²φ)
//! R = [ (Re/D + H)·cosφ·cosθ,
//!       (Re/D + H)·cosφ·sinθ,
//!       (Re(1 − f)²/D + H)·sinφ ]
//! ```
//!
//! where `θ` is the local sidereal time, `Re` the equatorial radius and `f` the flattening of the
//! [`CelestialBody`].
//!
//! ## Units
//!
//! - Latitude / longitude: **degrees**.
//! - Altitude and output positions: **km**.
use nalgebra::Vector3;

use crate::constants::{CelestialBody, Degree, Kilometer, RADEG};
use crate::orbits_errors::OrbitsError;
use crate::time::{local_sidereal_time, Hemisphere, UtcDateTime};

/// A ground observing site.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Observer {
    /// Geodetic latitude, north positive
    pub latitude: Degree,
    /// Longitude magnitude, measured towards `hemisphere`
    pub longitude: Degree,
    pub hemisphere: Hemisphere,
    /// Height above the reference ellipsoid
    pub altitude: Kilometer,
}

impl Observer {
    /// Build a validated observer.
    ///
    /// Arguments
    /// -----------------
    /// * `latitude`: geodetic latitude in degrees, `[-90, 90]`.
    /// * `longitude`: longitude magnitude in degrees, `[0, 180]`.
    /// * `hemisphere`: side of the prime meridian.
    /// * `altitude`: height above the ellipsoid in km.
    ///
    /// Return
    /// ----------
    /// * `Err(OrbitsError::InvalidParameter)` for NaN or out-of-range coordinates.
    pub fn new(
        latitude: Degree,
        longitude: Degree,
        hemisphere: Hemisphere,
        altitude: Kilometer,
    ) -> Result<Self, OrbitsError> {
        if !(-90.0..=90.0).contains(&latitude) {
            return Err(OrbitsError::InvalidParameter(format!(
                "latitude {latitude} outside [-90, 90]"
            )));
        }
        if !(0.0..=180.0).contains(&longitude) {
            return Err(OrbitsError::InvalidParameter(format!(
                "longitude {longitude} outside [0, 180]"
            )));
        }
        if !altitude.is_finite() {
            return Err(OrbitsError::InvalidParameter(format!(
                "altitude {altitude} is not finite"
            )));
        }
        Ok(Observer {
            latitude,
            longitude,
            hemisphere,
            altitude,
        })
    }

    /// Local sidereal time of the site, in degrees.
    pub fn local_sidereal_time(&self, date: &UtcDateTime) -> Degree {
        local_sidereal_time(date, self.longitude, self.hemisphere)
    }

    /// Inertial position of the site at `date`, in km.
    ///
    /// See also
    /// ------------
    /// * [`site_vector`] – Same computation from raw coordinates.
    pub fn site_position(&self, date: &UtcDateTime, body: &CelestialBody) -> Vector3<f64> {
        geodetic_to_inertial(
            self.latitude,
            self.local_sidereal_time(date),
            self.altitude,
            body,
        )
    }
}

/// Inertial site vector from geodetic coordinates and a UTC timestamp.
///
/// Coordinates are not range-checked here; use [`Observer::new`] for validated input.
pub fn site_vector(
    latitude: Degree,
    longitude: Degree,
    hemisphere: Hemisphere,
    altitude: Kilometer,
    date: &UtcDateTime,
    body: &CelestialBody,
) -> Vector3<f64> {
    let lst = local_sidereal_time(date, longitude, hemisphere);
    geodetic_to_inertial(latitude, lst, altitude, body)
}

fn geodetic_to_inertial(
    latitude: Degree,
    sidereal_angle: Degree,
    altitude: Kilometer,
    body: &CelestialBody,
) -> Vector3<f64> {
    let phi = latitude * RADEG;
    let theta = sidereal_angle * RADEG;
    let f = body.flattening;
    let re = body.equatorial_radius;

    let (sin_phi, cos_phi) = phi.sin_cos();
    let d = (1.0 - (2.0 * f - f * f) * sin_phi * sin_phi).sqrt();
    let horizontal = (re / d + altitude) * cos_phi;
    let vertical = (re * (1.0 - f).powi(2) / d + altitude) * sin_phi;

    Vector3::new(horizontal * theta.cos(), horizontal * theta.sin(), vertical)
}

#[cfg(test)]
mod observers_test {
    use super::*;
    use crate::constants::EARTH;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_site_on_equator() {
        // 0h UT on the J2000 calendar day, Greenwich meridian
        let date = UtcDateTime::new(2000, 1, 1, 0, 0, 0.0).unwrap();
        let site = Observer::new(0.0, 0.0, Hemisphere::East, 0.0).unwrap();
        let r = site.site_position(&date, &EARTH);

        assert_abs_diff_eq!(r.norm(), EARTH.equatorial_radius, epsilon = 1e-9);
        assert_abs_diff_eq!(r.z, 0.0, epsilon = 1e-12);

        let theta = site.local_sidereal_time(&date) * RADEG;
        assert_abs_diff_eq!(r.y.atan2(r.x).rem_euclid(crate::constants::DPI), theta, epsilon = 1e-12);
    }

    #[test]
    fn test_site_at_pole() {
        let date = UtcDateTime::new(2010, 8, 20, 11, 30, 0.0).unwrap();
        let r = site_vector(90.0, 0.0, Hemisphere::East, 0.0, &date, &EARTH);
        let polar = EARTH.equatorial_radius * (1.0 - EARTH.flattening);

        assert_abs_diff_eq!(r.x, 0.0, epsilon = 1e-9);
        assert_abs_diff_eq!(r.y, 0.0, epsilon = 1e-9);
        assert_abs_diff_eq!(r.z, polar, epsilon = 1e-9);
    }

    #[test]
    fn test_site_vector_reference() {
        // 40°N 110°W, 2 km altitude, LST = 31.194457614085422°
        let date = UtcDateTime::new(2010, 8, 20, 11, 30, 0.0).unwrap();
        let site = Observer::new(40.0, 110.0, Hemisphere::West, 2.0).unwrap();
        let r = site.site_position(&date, &EARTH);

        let phi = 40.0 * RADEG;
        let theta = 31.194457614085422 * RADEG;
        let f = EARTH.flattening;
        let d = (1.0 - (2.0 * f - f * f) * phi.sin().powi(2)).sqrt();
        let rc = (EARTH.equatorial_radius / d + 2.0) * phi.cos();
        let rz = (EARTH.equatorial_radius * (1.0 - f).powi(2) / d + 2.0) * phi.sin();

        assert_abs_diff_eq!(r.x, rc * theta.cos(), epsilon = 1e-6);
        assert_abs_diff_eq!(r.y, rc * theta.sin(), epsilon = 1e-6);
        assert_abs_diff_eq!(r.z, rz, epsilon = 1e-9);
        assert_eq!(
            r,
            site_vector(40.0, 110.0, Hemisphere::West, 2.0, &date, &EARTH)
        );
    }

    #[test]
    fn test_invalid_observer() {
        assert!(Observer::new(91.0, 0.0, Hemisphere::East, 0.0).is_err());
        assert!(Observer::new(0.0, 181.0, Hemisphere::West, 0.0).is_err());
        assert!(Observer::new(f64::NAN, 0.0, Hemisphere::West, 0.0).is_err());
        assert!(Observer::new(0.0, 0.0, Hemisphere::West, f64::INFINITY).is_err());
    }
}
