mod common;

use approx::assert_abs_diff_eq;
use nalgebra::Vector3;
use orbits::constants::EARTH;
use orbits::initial_orbit_determination::gauss::GaussObs;
use orbits::initial_orbit_determination::gauss_result::GaussResult;
use orbits::initial_orbit_determination::IODParams;
use orbits::orbit_type::ClassicalElements;
use orbits::orbits_errors::OrbitsError;

use crate::common::{
    assert_same_orbit, assert_states_close, historical_triplet, pivot_state, synthetic_triplet,
};

fn position_error(result: &GaussResult) -> f64 {
    (result.state().position - pivot_state().position).norm()
}

#[test]
fn extended_method_improves_on_classical() {
    let params = IODParams::default();
    for offsets in [(-60.0, 60.0), (-300.0, 300.0), (-600.0, 600.0), (-240.0, 360.0)] {
        let gauss = GaussObs::new(&synthetic_triplet(offsets), EARTH).unwrap();

        let classical = gauss.prelim_orbit(&params).unwrap();
        let extended = gauss.extended_orbit(&params).unwrap();
        assert!(classical.is_prelim());
        assert!(extended.is_corrected());

        assert!(
            position_error(&extended) <= position_error(&classical),
            "offsets {offsets:?}: extended error {} km, classical error {} km",
            position_error(&extended),
            position_error(&classical)
        );
        assert_states_close(extended.state(), &pivot_state(), 1e-5, 1e-8);
    }
}

#[test]
fn classical_error_grows_with_the_arc() {
    let params = IODParams::default();
    let errors: Vec<f64> = [(-60.0, 60.0), (-300.0, 300.0), (-600.0, 600.0)]
        .into_iter()
        .map(|offsets| {
            let gauss = GaussObs::new(&synthetic_triplet(offsets), EARTH).unwrap();
            position_error(&gauss.prelim_orbit(&params).unwrap())
        })
        .collect();

    assert!(errors[0] < 5.0);
    assert!(errors[0] < errors[1] && errors[1] < errors[2]);
}

#[test]
fn recovered_elements_match_the_truth() {
    let gauss = GaussObs::new(&synthetic_triplet((-300.0, 300.0)), EARTH).unwrap();
    let extended = gauss.extended_orbit(&IODParams::default()).unwrap();

    let recovered = extended.get_solution().elements(&EARTH).unwrap();
    let truth = ClassicalElements::from_state(&pivot_state(), &EARTH).unwrap();
    assert_same_orbit(&recovered, &truth, 1e-6);
    assert!((recovered.semi_major_axis - 8614.65).abs() < 0.01);
}

#[test]
fn refinement_cap_is_reported() {
    let gauss = GaussObs::new(&synthetic_triplet((-300.0, 300.0)), EARTH).unwrap();
    let params = IODParams::builder().max_refine_iter(2).build().unwrap();

    assert!(matches!(
        gauss.extended_orbit(&params),
        Err(OrbitsError::RefinementNotConverged { iterations: 2, .. })
    ));
}

#[test]
fn historical_sightings() {
    let triplet = historical_triplet();
    let (tau1, tau3) = triplet.taus();
    assert_abs_diff_eq!(tau1, -1200.0, epsilon = 1e-9);
    assert_abs_diff_eq!(tau3, 600.0, epsilon = 1e-9);

    let gauss = GaussObs::new(&triplet, EARTH).unwrap();
    let params = IODParams::default();

    // single admissible root
    let candidates = gauss.prelim_orbit_all(&params).unwrap();
    assert_eq!(candidates.len(), 1);

    let classical = gauss.prelim_orbit(&params).unwrap();
    let sol = classical.get_solution();
    assert_abs_diff_eq!(sol.r2_root, 10268.599007698998, epsilon = 1e-6);
    assert!(sol.slant_ranges.iter().all(|rho| *rho > 0.0));
    assert_abs_diff_eq!(
        sol.state.position,
        Vector3::new(5779.4377956926155, 5514.323534260283, 6452.477067463295),
        epsilon = 1e-5
    );
    assert_abs_diff_eq!(
        sol.state.velocity,
        Vector3::new(-4.144086527186057, 4.245793774973151, 1.3399827783762364),
        epsilon = 1e-8
    );

    let extended = gauss.extended_orbit(&params).unwrap();
    assert!(extended.is_corrected());
    let sol = extended.get_solution();
    assert!(sol.iterations > 0 && sol.iterations < params.max_refine_iter);
    assert_abs_diff_eq!(
        sol.state.position,
        Vector3::new(5937.017432472039, 5740.151147741345, 6656.786160260195),
        epsilon = 1e-5
    );
    assert_abs_diff_eq!(
        sol.state.velocity,
        Vector3::new(-4.352773358882404, 4.578092203508172, 1.5024532443694119),
        epsilon = 1e-8
    );
    assert_abs_diff_eq!(
        sol.slant_ranges,
        Vector3::new(6007.715847658804, 4325.933073069675, 5972.553706281973),
        epsilon = 1e-5
    );
}
