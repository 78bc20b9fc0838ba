#![allow(dead_code)]

use approx::assert_abs_diff_eq;
use nalgebra::Vector3;
use orbits::constants::EARTH;
use orbits::kepler::UniversalParams;
use orbits::observations::{Observation, ObservationTriplet};
use orbits::observers::Observer;
use orbits::orbit_type::{ClassicalElements, StateVector};
use orbits::time::{Hemisphere, UtcDateTime};

/// Ground site at 40°N, 110°W, 2 km above the ellipsoid.
pub fn reference_site() -> Observer {
    Observer::new(40.0, 110.0, Hemisphere::West, 2.0).unwrap()
}

/// Epoch of the middle observation.
pub fn pivot_epoch() -> UtcDateTime {
    UtcDateTime::new(2010, 8, 20, 11, 30, 0.0).unwrap()
}

/// Moderately eccentric orbit passing close to the zenith of [`reference_site`] at
/// [`pivot_epoch`].
pub fn pivot_state() -> StateVector {
    StateVector::new(
        Vector3::new(5256.79107488524, 3182.9308660142246, 5122.020958291836),
        Vector3::new(-5.226508889099222, 3.6625053511445094, 3.5566359646447734),
    )
}

pub fn synthetic_triplet(offsets: (f64, f64)) -> ObservationTriplet {
    ObservationTriplet::synthetic(
        &pivot_state(),
        &reference_site(),
        pivot_epoch(),
        offsets,
        &EARTH,
        &UniversalParams::default(),
    )
    .unwrap()
}

/// Three optical sightings of an Earth satellite from [`reference_site`] on 2010-08-20, at
/// 11:30, 11:50 and 12:00 UTC (RA/Dec in degrees).
pub fn historical_triplet() -> ObservationTriplet {
    let site = reference_site();
    let sighting = |ra: f64, dec: f64, minute_of_day: u32| {
        let epoch =
            UtcDateTime::new(2010, 8, 20, (minute_of_day / 60) as u8, (minute_of_day % 60) as u8, 0.0)
                .unwrap();
        Observation::from_observer(ra.to_radians(), dec.to_radians(), epoch, &site, &EARTH)
    };
    ObservationTriplet::new(
        sighting(-33.0588410, -7.2056382, 11 * 60 + 30),
        sighting(55.0931551, 36.5731946, 11 * 60 + 50),
        sighting(98.7739537, 31.1314513, 12 * 60),
    )
    .unwrap()
}

pub fn assert_states_close(actual: &StateVector, expected: &StateVector, pos_eps: f64, vel_eps: f64) {
    assert_abs_diff_eq!(actual.position, expected.position, epsilon = pos_eps);
    assert_abs_diff_eq!(actual.velocity, expected.velocity, epsilon = vel_eps);
}

/// Compare the shape and orientation of two orbits, ignoring the true anomaly.
pub fn assert_same_orbit(actual: &ClassicalElements, expected: &ClassicalElements, eps: f64) {
    assert_abs_diff_eq!(
        actual.angular_momentum,
        expected.angular_momentum,
        epsilon = eps * expected.angular_momentum
    );
    assert_abs_diff_eq!(actual.eccentricity, expected.eccentricity, epsilon = eps);
    assert_abs_diff_eq!(actual.inclination, expected.inclination, epsilon = eps);
    assert_abs_diff_eq!(actual.right_ascension, expected.right_ascension, epsilon = eps);
    assert_abs_diff_eq!(
        actual.argument_of_perigee,
        expected.argument_of_perigee,
        epsilon = eps
    );
}
