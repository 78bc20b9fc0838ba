//! Benchmarks for the Gauss initial orbit determination.
//!
//!   cargo bench --bench gauss_prelim_orbit
//!   cargo bench gauss_prelim_orbit -- gauss/classical
//!   cargo bench gauss_prelim_orbit -- gauss/noisy_batch_100

use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};
use nalgebra::Vector3;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use orbits::constants::EARTH;
use orbits::initial_orbit_determination::gauss::GaussObs;
use orbits::initial_orbit_determination::gauss_result::GaussResult;
use orbits::initial_orbit_determination::IODParams;
use orbits::kepler::UniversalParams;
use orbits::observations::{Observation, ObservationTriplet};
use orbits::observers::Observer;
use orbits::orbit_type::StateVector;
use orbits::time::{Hemisphere, UtcDateTime};

/// Deterministic triplet: 40°N 110°W site, observations 5 minutes apart.
fn make_fixture_triplet() -> ObservationTriplet {
    let site = Observer::new(40.0, 110.0, Hemisphere::West, 2.0).expect("observer fixture");
    let epoch = UtcDateTime::new(2010, 8, 20, 11, 30, 0.0).expect("epoch fixture");
    let truth = StateVector::new(
        Vector3::new(5256.79107488524, 3182.9308660142246, 5122.020958291836),
        Vector3::new(-5.226508889099222, 3.6625053511445094, 3.5566359646447734),
    );
    ObservationTriplet::synthetic(
        &truth,
        &site,
        epoch,
        (-300.0, 300.0),
        &EARTH,
        &UniversalParams::default(),
    )
    .expect("triplet fixture")
}

/// Perturb both angles of an observation by a centered uniform noise of half-width `sigma`.
fn perturb(obs: &Observation, sigma: f64, rng: &mut StdRng) -> Observation {
    Observation::new(
        obs.right_ascension + rng.random_range(-sigma..=sigma),
        obs.declination + rng.random_range(-sigma..=sigma),
        obs.epoch,
        obs.site,
    )
}

fn bench_gauss(c: &mut Criterion) {
    let mut group = c.benchmark_group("gauss");

    let triplet = make_fixture_triplet();
    let gauss = GaussObs::new(&triplet, EARTH).expect("GaussObs fixture");
    let params = IODParams::default();

    group.bench_function("classical", |b| {
        b.iter(|| match gauss.prelim_orbit(black_box(&params)) {
            Ok(GaussResult::PrelimOrbit(_)) | Ok(GaussResult::CorrectedOrbit(_)) => {}
            Err(e) => panic!("prelim_orbit failed: {e:?}"),
        })
    });

    group.bench_function("extended", |b| {
        b.iter(|| {
            let res = gauss.extended_orbit(black_box(&params));
            black_box(res.ok());
        })
    });

    group.bench_function("noisy_batch_100", |b| {
        b.iter_batched(
            || {
                // 1 arcsecond ≈ 4.85e-6 rad
                let sigma = 4.85e-6_f64;
                let mut rng = StdRng::seed_from_u64(42);
                (0..100)
                    .filter_map(|_| {
                        ObservationTriplet::new(
                            perturb(&triplet.first, sigma, &mut rng),
                            perturb(&triplet.pivot, sigma, &mut rng),
                            perturb(&triplet.third, sigma, &mut rng),
                        )
                        .ok()
                    })
                    .collect::<Vec<_>>()
            },
            |noisy| {
                for t in noisy {
                    let res = GaussObs::new(&t, EARTH).and_then(|g| g.prelim_orbit(&params));
                    black_box(res.ok());
                }
            },
            BatchSize::SmallInput,
        )
    });

    group.finish();
}

criterion_group!(gauss_benches, bench_gauss);
criterion_main!(gauss_benches);
