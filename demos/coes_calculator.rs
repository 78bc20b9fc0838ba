//! Classical orbital elements of a given state vector.
//!
//! Usage:
//!   cargo run --example coes_calculator
use nalgebra::Vector3;
use orbits::constants::EARTH;
use orbits::orbit_type::{ClassicalElements, StateVector};
use orbits::orbits_errors::OrbitsError;

fn main() -> Result<(), OrbitsError> {
    pretty_env_logger::init();

    let state = StateVector::new(
        Vector3::new(6500.0, -7500.0, -2500.0),
        Vector3::new(4.0, 3.0, -3.0),
    );
    let elements = ClassicalElements::from_state(&state, &EARTH)?;

    println!("{state}");
    println!("{elements:#}");
    println!("Orbit kind: {:?}", elements.orbit_kind());
    if let Some(period) = elements.period(&EARTH) {
        println!("Period: {:.3} min", period / 60.0);
    }
    println!(
        "Perigee altitude: {:.3} km",
        elements.perigee_radius(&EARTH) - EARTH.equatorial_radius
    );
    Ok(())
}
