use thiserror::Error;

/// Classification of the geometric degeneracies that make classical orbital elements undefined.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DegenerateKind {
    /// Position vector of zero length.
    ZeroRadius,
    /// Position and velocity are colinear: no orbital plane.
    ZeroAngularMomentum,
    /// The node line vanishes (inclination 0° or 180°): RAAN is undefined.
    EquatorialOrbit,
    /// The eccentricity vector vanishes: argument of perigee and true anomaly are undefined.
    CircularOrbit,
    /// Eccentricity equal to one: the semi-major axis is undefined.
    ParabolicOrbit,
    /// `1 + e·cos ν ≤ 0`: the requested true anomaly lies outside the hyperbola asymptotes.
    UnreachableAnomaly,
}

impl std::fmt::Display for DegenerateKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let msg = match self {
            DegenerateKind::ZeroRadius => "zero position vector",
            DegenerateKind::ZeroAngularMomentum => "zero angular momentum (rectilinear motion)",
            DegenerateKind::EquatorialOrbit => "equatorial orbit (undefined node line)",
            DegenerateKind::CircularOrbit => "circular orbit (undefined perigee)",
            DegenerateKind::ParabolicOrbit => "parabolic orbit (undefined semi-major axis)",
            DegenerateKind::UnreachableAnomaly => "true anomaly beyond the hyperbolic asymptotes",
        };
        write!(f, "{msg}")
    }
}

#[derive(Error, Debug)]
pub enum OrbitsError {
    #[error("Universal Kepler equation did not converge after {iterations} iterations (last |F/F'| = {last_step:e})")]
    KeplerNotConverged { iterations: usize, last_step: f64 },

    #[error("Degenerate orbit geometry: {0}")]
    DegenerateGeometry(DegenerateKind),

    #[error(
        "Unit direction matrix is singular (cannot be inverted); lines of sight may be coplanar"
    )]
    SingularDirectionMatrix,

    #[error("Aberth–Ehrlich method failed to find the roots of the range polynomial")]
    PolynomialRootFindingFailed,

    #[error("Gauss method found no admissible root for the pivot range")]
    GaussNoRootsFound,

    #[error("Gauss method found several admissible roots for the pivot range: {0:?}")]
    AmbiguousRoots(Vec<f64>),

    #[error("Extended Gauss refinement did not converge after {iterations} iterations (last |Δρ₂| = {last_delta:e} km)")]
    RefinementNotConverged { iterations: usize, last_delta: f64 },

    #[error("Observations must be strictly time ordered (first < pivot < third)")]
    ObservationsOutOfOrder,

    #[error("Invalid date/time: {0}")]
    InvalidDateTime(String),

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Numerical integration failed: {0}")]
    IntegrationFailed(String),

    #[error("Time conversion error: {0}")]
    HifitimeError(#[from] hifitime::HifitimeError),
}

impl PartialEq for OrbitsError {
    fn eq(&self, other: &Self) -> bool {
        use OrbitsError::*;
        match (self, other) {
            (
                KeplerNotConverged {
                    iterations: a,
                    last_step: b,
                },
                KeplerNotConverged {
                    iterations: c,
                    last_step: d,
                },
            ) => a == c && b == d,
            (DegenerateGeometry(a), DegenerateGeometry(b)) => a == b,
            (AmbiguousRoots(a), AmbiguousRoots(b)) => a == b,
            (
                RefinementNotConverged {
                    iterations: a,
                    last_delta: b,
                },
                RefinementNotConverged {
                    iterations: c,
                    last_delta: d,
                },
            ) => a == c && b == d,
            (InvalidDateTime(a), InvalidDateTime(b)) => a == b,
            (InvalidParameter(a), InvalidParameter(b)) => a == b,
            (IntegrationFailed(a), IntegrationFailed(b)) => a == b,

            // Not comparable: equal when the variant matches
            (HifitimeError(_), HifitimeError(_)) => true,

            (SingularDirectionMatrix, SingularDirectionMatrix) => true,
            (PolynomialRootFindingFailed, PolynomialRootFindingFailed) => true,
            (GaussNoRootsFound, GaussNoRootsFound) => true,
            (ObservationsOutOfOrder, ObservationsOutOfOrder) => true,

            _ => false,
        }
    }
}
