//! Universal-variable propagation over two hours, cross-checked against the numerical
//! two-body integrator.
//!
//! Usage:
//!   RUST_LOG=debug cargo run --example universal_variable_prop
use nalgebra::Vector3;
use orbits::constants::EARTH;
use orbits::kepler::{propagate_universal, solve_universal_anomaly, UniversalParams};
use orbits::orbit_type::StateVector;
use orbits::orbits_errors::OrbitsError;
use orbits::two_body::{PropOpts, TwoBodyPropagator};

fn main() -> Result<(), OrbitsError> {
    pretty_env_logger::init();

    let initial = StateVector::new(
        Vector3::new(20_000.0, -105_000.0, -19_000.0),
        Vector3::new(0.9, -3.4, -1.5),
    );
    let dt = 2.0 * 3600.0;
    let params = UniversalParams::default();

    let anomaly = solve_universal_anomaly(&initial, dt, &EARTH, &params)?;
    println!(
        "Universal anomaly: chi = {:.6} km^0.5 after {} iterations",
        anomaly.chi, anomaly.iterations
    );

    let universal = propagate_universal(&EARTH, &initial, dt, &params)?;
    println!("Universal variables:\n{universal}");

    let numerical = TwoBodyPropagator::new(EARTH, PropOpts::default()).final_state(&initial, dt)?;
    println!("Two-body integration:\n{numerical}");

    println!(
        "Difference: {:.3e} km, {:.3e} km/s",
        (universal.position - numerical.position).norm(),
        (universal.velocity - numerical.velocity).norm()
    );
    Ok(())
}
