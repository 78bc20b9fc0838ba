//! Two-body orbital mechanics around a configurable central body: classical orbital elements,
//! numerical and universal-variable propagation, observer geometry and Gauss angles-only
//! initial orbit determination.
pub mod constants;
pub mod initial_orbit_determination;
pub mod kepler;
pub mod observations;
pub mod observers;
pub mod orbit_type;
pub mod orbits_errors;
pub mod ref_system;
pub mod time;
pub mod two_body;
