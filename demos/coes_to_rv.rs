//! State vector of a hyperbolic departure at perigee, and the element check on the way back.
//!
//! Usage:
//!   cargo run --example coes_to_rv
use orbits::constants::EARTH;
use orbits::orbit_type::ClassicalElements;
use orbits::orbits_errors::OrbitsError;

fn main() -> Result<(), OrbitsError> {
    pretty_env_logger::init();

    let eccentricity = 1.5;
    let perigee_altitude = 300.0;
    let rp = EARTH.equatorial_radius + perigee_altitude;

    let elements = ClassicalElements {
        angular_momentum: (EARTH.mu * (1.0 + eccentricity) * rp).sqrt(),
        eccentricity,
        semi_major_axis: 0.0,
        inclination: 35.0,
        right_ascension: 130.0,
        argument_of_perigee: 115.0,
        true_anomaly: 0.0,
    };

    let state = elements.to_state(&EARTH)?;
    println!("{state}");

    let check = ClassicalElements::from_state(&state, &EARTH)?;
    println!("{check:#}");
    Ok(())
}
