//! # Angles-only observations
//!
//! An [`Observation`] is a line of sight (right ascension, declination) taken from a known
//! inertial site position at a UTC timestamp. Gauss's method consumes an
//! [`ObservationTriplet`], whose three members have explicit roles: `first`, `pivot` (the middle
//! observation at which the orbit is estimated) and `third`. The constructor enforces strict
//! time ordering so that the roles cannot be silently swapped.
//!
//! [`Observation::synthetic`] and [`ObservationTriplet::synthetic`] back-compute observations of
//! a known orbit, which is how the orbit-determination tests and demos build their inputs.
use std::fmt;

use nalgebra::Vector3;

use crate::constants::{CelestialBody, Radian, Second};
use crate::kepler::{propagate_universal, UniversalParams};
use crate::observers::Observer;
use crate::orbit_type::StateVector;
use crate::orbits_errors::OrbitsError;
use crate::ref_system::{cartesian_to_radec, radec_to_unit_vector};
use crate::time::{seconds_between, UtcDateTime};

/// A single angles-only observation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Observation {
    pub right_ascension: Radian,
    pub declination: Radian,
    pub epoch: UtcDateTime,
    /// Inertial position of the observing site at `epoch` [km]
    pub site: Vector3<f64>,
}

impl Observation {
    pub fn new(
        right_ascension: Radian,
        declination: Radian,
        epoch: UtcDateTime,
        site: Vector3<f64>,
    ) -> Self {
        Observation {
            right_ascension,
            declination,
            epoch,
            site,
        }
    }

    /// Observation whose site vector is computed from a ground [`Observer`].
    pub fn from_observer(
        right_ascension: Radian,
        declination: Radian,
        epoch: UtcDateTime,
        observer: &Observer,
        body: &CelestialBody,
    ) -> Self {
        Observation::new(
            right_ascension,
            declination,
            epoch,
            observer.site_position(&epoch, body),
        )
    }

    /// Unit line-of-sight vector `[cos δ cos α, cos δ sin α, sin δ]`.
    #[inline]
    pub fn line_of_sight(&self) -> Vector3<f64> {
        radec_to_unit_vector(self.right_ascension, self.declination)
    }

    /// Observation of `target` (its inertial state at `epoch`) from `observer`.
    ///
    /// Return
    /// ----------
    /// * `Err(OrbitsError::InvalidParameter)` if the target coincides with the site.
    pub fn synthetic(
        target: &StateVector,
        observer: &Observer,
        epoch: UtcDateTime,
        body: &CelestialBody,
    ) -> Result<Self, OrbitsError> {
        let site = observer.site_position(&epoch, body);
        let (ra, dec, rho) = cartesian_to_radec(&(target.position - site));
        if rho == 0.0 {
            return Err(OrbitsError::InvalidParameter(
                "target coincides with the observing site".into(),
            ));
        }
        Ok(Observation::new(ra, dec, epoch, site))
    }
}

impl fmt::Display for Observation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}  RA = {:.6}°  DEC = {:.6}°  site = [{:.3}, {:.3}, {:.3}] km",
            self.epoch,
            self.right_ascension.to_degrees(),
            self.declination.to_degrees(),
            self.site.x,
            self.site.y,
            self.site.z
        )
    }
}

/// Three time-ordered observations with named roles.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ObservationTriplet {
    pub first: Observation,
    pub pivot: Observation,
    pub third: Observation,
    tau1: Second,
    tau3: Second,
}

impl ObservationTriplet {
    /// Build a triplet, requiring `first < pivot < third` in time.
    pub fn new(
        first: Observation,
        pivot: Observation,
        third: Observation,
    ) -> Result<Self, OrbitsError> {
        let tau1 = seconds_between(&pivot.epoch, &first.epoch)?;
        let tau3 = seconds_between(&pivot.epoch, &third.epoch)?;
        if !(tau1 < 0.0 && tau3 > 0.0) {
            return Err(OrbitsError::ObservationsOutOfOrder);
        }
        Ok(ObservationTriplet {
            first,
            pivot,
            third,
            tau1,
            tau3,
        })
    }

    /// Time offsets `(τ₁, τ₃)` of the outer observations relative to the pivot [s].
    #[inline]
    pub fn taus(&self) -> (Second, Second) {
        (self.tau1, self.tau3)
    }

    /// Observe a known orbit three times.
    ///
    /// Arguments
    /// -----------------
    /// * `pivot_state`: true inertial state at `pivot_epoch`.
    /// * `observer`: ground site.
    /// * `pivot_epoch`: time of the middle observation.
    /// * `offsets`: `(τ₁, τ₃)` in seconds, with `τ₁ < 0 < τ₃`.
    /// * `body`, `params`: used to propagate the state with the universal-variable solver.
    pub fn synthetic(
        pivot_state: &StateVector,
        observer: &Observer,
        pivot_epoch: UtcDateTime,
        offsets: (Second, Second),
        body: &CelestialBody,
        params: &UniversalParams,
    ) -> Result<Self, OrbitsError> {
        let (tau1, tau3) = offsets;
        let observe = |dt: Second| -> Result<Observation, OrbitsError> {
            let state = propagate_universal(body, pivot_state, dt, params)?;
            let epoch = pivot_epoch.add_seconds(dt)?;
            Observation::synthetic(&state, observer, epoch, body)
        };
        ObservationTriplet::new(observe(tau1)?, observe(0.0)?, observe(tau3)?)
    }
}

#[cfg(test)]
mod observations_test {
    use super::*;
    use crate::constants::EARTH;
    use crate::time::Hemisphere;
    use approx::assert_abs_diff_eq;

    fn site() -> Observer {
        Observer::new(40.0, 110.0, Hemisphere::West, 2.0).unwrap()
    }

    fn epoch(minute: u8) -> UtcDateTime {
        UtcDateTime::new(2010, 8, 20, 11, minute, 0.0).unwrap()
    }

    #[test]
    fn test_line_of_sight() {
        let obs = Observation::new(0.0, std::f64::consts::FRAC_PI_2, epoch(0), Vector3::zeros());
        assert_abs_diff_eq!(obs.line_of_sight(), Vector3::z(), epsilon = 1e-15);
    }

    #[test]
    fn test_synthetic_points_at_target() {
        let observer = site();
        let target = StateVector::new(
            Vector3::new(5000.0, 3000.0, 6000.0),
            Vector3::new(0.0, 5.0, 5.0),
        );
        let obs = Observation::synthetic(&target, &observer, epoch(30), &EARTH).unwrap();
        let rho = (target.position - obs.site).norm();

        assert_abs_diff_eq!(
            obs.site + rho * obs.line_of_sight(),
            target.position,
            epsilon = 1e-9
        );
        assert_eq!(obs.site, observer.site_position(&epoch(30), &EARTH));
    }

    #[test]
    fn test_triplet_ordering() {
        let s = Vector3::zeros();
        let a = Observation::new(0.1, 0.2, epoch(10), s);
        let b = Observation::new(0.1, 0.2, epoch(20), s);
        let c = Observation::new(0.1, 0.2, epoch(25), s);

        let triplet = ObservationTriplet::new(a, b, c).unwrap();
        let (tau1, tau3) = triplet.taus();
        assert_abs_diff_eq!(tau1, -600.0, epsilon = 1e-9);
        assert_abs_diff_eq!(tau3, 300.0, epsilon = 1e-9);

        assert_eq!(
            ObservationTriplet::new(b, a, c),
            Err(OrbitsError::ObservationsOutOfOrder)
        );
        assert_eq!(
            ObservationTriplet::new(a, b, b),
            Err(OrbitsError::ObservationsOutOfOrder)
        );
    }

    #[test]
    fn test_synthetic_triplet() {
        let state = StateVector::new(
            Vector3::new(5000.0, 3000.0, 6000.0),
            Vector3::new(-4.0, 4.0, 2.0),
        );
        let triplet = ObservationTriplet::synthetic(
            &state,
            &site(),
            epoch(30),
            (-120.0, 180.0),
            &EARTH,
            &UniversalParams::default(),
        )
        .unwrap();

        let (tau1, tau3) = triplet.taus();
        assert_abs_diff_eq!(tau1, -120.0, epsilon = 1e-6);
        assert_abs_diff_eq!(tau3, 180.0, epsilon = 1e-6);
        assert_eq!(triplet.pivot.epoch, epoch(30));
        assert_eq!(triplet.first.epoch.minute, 28);
    }
}
