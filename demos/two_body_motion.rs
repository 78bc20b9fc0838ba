//! Propagate a state for 24 hours and print the trajectory samples.
//!
//! Usage:
//!   cargo run --example two_body_motion [samples]
use std::env;

use nalgebra::Vector3;
use orbits::constants::EARTH;
use orbits::orbit_type::StateVector;
use orbits::orbits_errors::OrbitsError;
use orbits::two_body::{PropOpts, TwoBodyPropagator};

fn main() -> Result<(), OrbitsError> {
    pretty_env_logger::init();

    let samples = match env::args().nth(1) {
        Some(arg) => arg
            .parse::<usize>()
            .map_err(|e| OrbitsError::InvalidParameter(format!("samples: {e}")))?,
        None => 25,
    };

    let initial = StateVector::new(
        Vector3::new(3207.0, 5459.0, 2714.0),
        Vector3::new(-6.532, 0.7835, 6.142),
    );
    let duration = 24.0 * 3600.0;

    let propagator = TwoBodyPropagator::new(EARTH, PropOpts::default());
    let trajectory = propagator.propagate(&initial, duration, samples)?;

    println!("{:>10} {:>14} {:>14} {:>14} {:>12}", "t [h]", "x [km]", "y [km]", "z [km]", "|v| [km/s]");
    for (k, state) in trajectory.iter().enumerate() {
        let t = duration * k as f64 / (samples - 1) as f64;
        let r = state.position;
        println!(
            "{:>10.3} {:>14.3} {:>14.3} {:>14.3} {:>12.6}",
            t / 3600.0,
            r.x,
            r.y,
            r.z,
            state.speed()
        );
    }

    if let Some(last) = trajectory.last() {
        println!("Position after 24 hours: {:.3} km", last.radius());
        println!("Speed after 24 hours: {:.6} km/s", last.speed());
    }
    Ok(())
}
