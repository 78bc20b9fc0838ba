use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};
use nalgebra::Vector3;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use orbits::constants::EARTH;
use orbits::kepler::{solve_universal_anomaly, UniversalParams};
use orbits::orbit_type::{ClassicalElements, StateVector};

/// Random state on an orbit with perigee altitude ≥ 300 km and eccentricity in `e_range`.
fn random_state(rng: &mut StdRng, e_range: std::ops::Range<f64>) -> StateVector {
    let e = rng.random_range(e_range);
    let rp = EARTH.equatorial_radius + rng.random_range(300.0..20_000.0);
    let h = (EARTH.mu * rp * (1.0 + e)).sqrt();
    let elements = ClassicalElements {
        angular_momentum: h,
        eccentricity: e,
        semi_major_axis: 0.0,
        inclination: rng.random_range(0.0..180.0),
        right_ascension: rng.random_range(0.0..360.0),
        argument_of_perigee: rng.random_range(0.0..360.0),
        true_anomaly: rng.random_range(-90.0..90.0),
    };
    elements
        .to_state(&EARTH)
        .unwrap_or_else(|_| StateVector::new(Vector3::new(rp, 0.0, 0.0), Vector3::new(0.0, h / rp, 0.0)))
}

fn bench_regime(c: &mut Criterion, name: &str, seed: u64, e_range: std::ops::Range<f64>) {
    let mut rng = StdRng::seed_from_u64(seed);
    let samples = 10_000usize;
    let params = UniversalParams::default();

    c.bench_function(name, |b| {
        b.iter_batched(
            || {
                // Pre-generate inputs to keep the RNG out of the timed section
                (0..samples)
                    .map(|_| {
                        let state = random_state(&mut rng, e_range.clone());
                        let dt = rng.random_range(-20_000.0..20_000.0);
                        (state, dt)
                    })
                    .collect::<Vec<_>>()
            },
            |cases| {
                for (state, dt) in cases {
                    let sol = solve_universal_anomaly(black_box(&state), black_box(dt), &EARTH, &params);
                    black_box(sol.ok());
                }
            },
            BatchSize::LargeInput,
        )
    });
}

fn bench_elliptic(c: &mut Criterion) {
    bench_regime(c, "universal_anomaly/elliptic_e<=0.7", 0xDEADBEEF, 0.0..0.7);
}

fn bench_high_e(c: &mut Criterion) {
    bench_regime(c, "universal_anomaly/high_e_0.7..0.99", 0xBADF00D, 0.7..0.99);
}

fn bench_hyperbolic(c: &mut Criterion) {
    bench_regime(c, "universal_anomaly/hyperbolic_1.1..3", 0xFEEDFACE, 1.1..3.0);
}

criterion_group!(
    name = benches;
    config = Criterion::default();
    targets = bench_elliptic, bench_high_e, bench_hyperbolic
);
criterion_main!(benches);
