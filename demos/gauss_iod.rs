//! Gauss initial orbit determination from three sightings taken at 40°N 110°W, 2 km above the
//! ellipsoid, on 2010-08-20.
//!
//! By default the recorded sightings at 11:30, 11:50 and 12:00 UTC are solved. With
//! `--synthetic`, the observations are generated from a known orbit around an 11:30 UTC pivot,
//! and the solutions are compared with it.
//!
//! Usage:
//!   gauss_iod [--synthetic [tau1 tau3]] [--verbose]
//! Example:
//!   cargo run --example gauss_iod -- --verbose
//!   cargo run --example gauss_iod -- --synthetic -240 360
use std::env;

use nalgebra::Vector3;
use orbits::constants::EARTH;
use orbits::initial_orbit_determination::gauss::GaussObs;
use orbits::initial_orbit_determination::IODParams;
use orbits::observations::{Observation, ObservationTriplet};
use orbits::observers::Observer;
use orbits::orbit_type::{ClassicalElements, StateVector};
use orbits::orbits_errors::OrbitsError;
use orbits::time::{Hemisphere, UtcDateTime};

/// Recorded sightings: (RA [deg], Dec [deg], hour, minute) in UTC.
const SIGHTINGS: [(f64, f64, u8, u8); 3] = [
    (-33.0588410, -7.2056382, 11, 30),
    (55.0931551, 36.5731946, 11, 50),
    (98.7739537, 31.1314513, 12, 0),
];

fn parse_offset(arg: Option<&String>, default: f64) -> Result<f64, OrbitsError> {
    match arg {
        Some(s) => s
            .parse::<f64>()
            .map_err(|e| OrbitsError::InvalidParameter(format!("{s}: {e}"))),
        None => Ok(default),
    }
}

fn recorded_triplet(site: &Observer) -> Result<ObservationTriplet, OrbitsError> {
    let mut obs = Vec::with_capacity(3);
    for (ra, dec, hour, minute) in SIGHTINGS {
        let epoch = UtcDateTime::new(2010, 8, 20, hour, minute, 0.0)?;
        obs.push(Observation::from_observer(
            ra.to_radians(),
            dec.to_radians(),
            epoch,
            site,
            &EARTH,
        ));
    }
    ObservationTriplet::new(obs[0], obs[1], obs[2])
}

fn main() -> Result<(), OrbitsError> {
    pretty_env_logger::init();

    let args: Vec<String> = env::args().skip(1).collect();
    let verbose = args.iter().any(|a| a == "--verbose");
    let synthetic = args.iter().any(|a| a == "--synthetic");
    let numbers: Vec<String> = args.into_iter().filter(|a| !a.starts_with("--")).collect();

    let site = Observer::new(40.0, 110.0, Hemisphere::West, 2.0)?;
    let params = IODParams::default();

    let (triplet, truth) = if synthetic {
        let tau1 = parse_offset(numbers.first(), -300.0)?;
        let tau3 = parse_offset(numbers.get(1), 300.0)?;
        let pivot_epoch = UtcDateTime::new(2010, 8, 20, 11, 30, 0.0)?;
        let truth = StateVector::new(
            Vector3::new(5256.79107488524, 3182.9308660142246, 5122.020958291836),
            Vector3::new(-5.226508889099222, 3.6625053511445094, 3.5566359646447734),
        );
        let triplet = ObservationTriplet::synthetic(
            &truth,
            &site,
            pivot_epoch,
            (tau1, tau3),
            &EARTH,
            &params.universal,
        )?;
        (triplet, Some(truth))
    } else {
        (recorded_triplet(&site)?, None)
    };

    if verbose {
        println!("{params:#}");
        for obs in [&triplet.first, &triplet.pivot, &triplet.third] {
            println!("{obs}");
        }
    }

    let gauss = GaussObs::new(&triplet, EARTH)?;
    let classical = gauss.prelim_orbit(&params)?;
    let extended = gauss.refine(classical.get_solution(), &params)?;

    if let Some(truth) = &truth {
        println!("True orbit:\n{:#}", ClassicalElements::from_state(truth, &EARTH)?);
    }
    for result in [&classical, &extended] {
        println!("{result}");
        println!("{:#}", result.get_solution().elements(&EARTH)?);
        if let Some(truth) = &truth {
            println!(
                "Position error: {:.3e} km, velocity error: {:.3e} km/s",
                (result.state().position - truth.position).norm(),
                (result.state().velocity - truth.velocity).norm()
            );
        }
    }
    Ok(())
}
