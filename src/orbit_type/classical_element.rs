use std::fmt;

use nalgebra::Vector3;

use crate::constants::{CelestialBody, Degree, Kilometer, Second, DEGENERACY_EPS, DPI, RADEG};
use crate::orbit_type::{OrbitKind, StateVector};
use crate::orbits_errors::{DegenerateKind, OrbitsError};
use crate::ref_system::perifocal_to_eci;

/// Classical orbital elements.
///
/// Units
/// -----
/// * `angular_momentum`: km²/s
/// * `semi_major_axis`: km, negative for hyperbolic orbits
/// * angles: degrees, `inclination` in `[0, 180]`, the others in `[0, 360)`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClassicalElements {
    pub angular_momentum: f64,
    pub eccentricity: f64,
    pub semi_major_axis: Kilometer,
    pub inclination: Degree,
    pub right_ascension: Degree,
    pub argument_of_perigee: Degree,
    pub true_anomaly: Degree,
}

/// `acos` with its argument clamped to `[-1, 1]`.
#[inline]
fn clamped_acos(x: f64) -> f64 {
    x.clamp(-1.0, 1.0).acos()
}

/// Resolve the quadrant of an `acos` result: `θ` if `positive`, `2π − θ` otherwise.
#[inline]
fn resolve_quadrant(angle: f64, positive: bool) -> f64 {
    if positive {
        angle
    } else {
        DPI - angle
    }
}

impl ClassicalElements {
    /// Compute the classical elements of a Cartesian state.
    ///
    /// Arguments
    /// -----------------
    /// * `state`: position (km) and velocity (km/s) in the inertial frame.
    /// * `body`: central body providing μ.
    ///
    /// Return
    /// ----------
    /// * The element set, or `Err(OrbitsError::DegenerateGeometry)` when the state is
    ///   rectilinear, equatorial, circular or parabolic and some element is undefined.
    ///
    /// Every `acos` argument is clamped to `[-1, 1]`. The node, perigee and anomaly angles are
    /// reflected into `(180°, 360°)` when respectively `n_y < 0`, `e_z < 0` and `v_r < 0`.
    pub fn from_state(state: &StateVector, body: &CelestialBody) -> Result<Self, OrbitsError> {
        let mu = body.mu;
        let r = &state.position;
        let v = &state.velocity;

        let r_norm = state.radius();
        if r_norm == 0.0 {
            return Err(OrbitsError::DegenerateGeometry(DegenerateKind::ZeroRadius));
        }
        let v_norm = state.speed();
        let vr = state.radial_velocity();

        let h = state.angular_momentum();
        let h_norm = h.norm();
        if h_norm <= DEGENERACY_EPS * r_norm * v_norm {
            return Err(OrbitsError::DegenerateGeometry(
                DegenerateKind::ZeroAngularMomentum,
            ));
        }

        let inclination = clamped_acos(h.z / h_norm);

        // node line n = ẑ × h
        let n = Vector3::new(-h.y, h.x, 0.0);
        let n_norm = n.norm();
        if n_norm <= DEGENERACY_EPS * h_norm {
            return Err(OrbitsError::DegenerateGeometry(
                DegenerateKind::EquatorialOrbit,
            ));
        }
        let right_ascension = resolve_quadrant(clamped_acos(n.x / n_norm), n.y >= 0.0);

        let e = ((v_norm * v_norm - mu / r_norm) * r - r_norm * vr * v) / mu;
        let e_norm = e.norm();
        if e_norm <= DEGENERACY_EPS {
            return Err(OrbitsError::DegenerateGeometry(DegenerateKind::CircularOrbit));
        }
        if (1.0 - e_norm).abs() <= DEGENERACY_EPS {
            return Err(OrbitsError::DegenerateGeometry(
                DegenerateKind::ParabolicOrbit,
            ));
        }

        let argument_of_perigee =
            resolve_quadrant(clamped_acos(n.dot(&e) / (n_norm * e_norm)), e.z >= 0.0);
        let true_anomaly =
            resolve_quadrant(clamped_acos(e.dot(r) / (e_norm * r_norm)), vr >= 0.0);

        let semi_major_axis = h_norm * h_norm / mu / (1.0 - e_norm * e_norm);

        Ok(ClassicalElements {
            angular_momentum: h_norm,
            eccentricity: e_norm,
            semi_major_axis,
            inclination: inclination / RADEG,
            right_ascension: normalize_full_turn(right_ascension) / RADEG,
            argument_of_perigee: normalize_full_turn(argument_of_perigee) / RADEG,
            true_anomaly: normalize_full_turn(true_anomaly) / RADEG,
        })
    }

    /// Build the Cartesian state described by the elements.
    ///
    /// The perifocal position and velocity
    ///
    /// ```text
    /// r_p = h²/μ / (1 + e cos ν) · [cos ν, sin ν, 0]
    /// v_p = μ/h · [−sin ν, e + cos ν, 0]
    /// ```
    ///
    /// are rotated to the inertial frame with
    /// [`perifocal_to_eci`](crate::ref_system::perifocal_to_eci). Only `h`, `e` and the angles
    /// are used; `semi_major_axis` is ignored.
    ///
    /// Return
    /// ----------
    /// * `Err(OrbitsError::InvalidParameter)` if `h ≤ 0` or `e < 0`.
    /// * `Err(OrbitsError::DegenerateGeometry(UnreachableAnomaly))` if `1 + e cos ν ≤ 0`.
    pub fn to_state(&self, body: &CelestialBody) -> Result<StateVector, OrbitsError> {
        let h = self.angular_momentum;
        let e = self.eccentricity;
        if h.is_nan() || h <= 0.0 {
            return Err(OrbitsError::InvalidParameter(format!(
                "angular momentum must be positive, got {h}"
            )));
        }
        if e.is_nan() || e < 0.0 {
            return Err(OrbitsError::InvalidParameter(format!(
                "eccentricity must be non-negative, got {e}"
            )));
        }

        let (sin_nu, cos_nu) = (self.true_anomaly * RADEG).sin_cos();
        let denom = 1.0 + e * cos_nu;
        if denom <= 0.0 {
            return Err(OrbitsError::DegenerateGeometry(
                DegenerateKind::UnreachableAnomaly,
            ));
        }

        let p = h * h / body.mu;
        let r_perifocal = (p / denom) * Vector3::new(cos_nu, sin_nu, 0.0);
        let v_perifocal = (body.mu / h) * Vector3::new(-sin_nu, e + cos_nu, 0.0);

        let q = perifocal_to_eci(
            self.right_ascension * RADEG,
            self.inclination * RADEG,
            self.argument_of_perigee * RADEG,
        );

        Ok(StateVector::new(q * r_perifocal, q * v_perifocal))
    }

    /// Conic family, using [`DEGENERACY_EPS`] to detect the circular and parabolic limits.
    pub fn orbit_kind(&self) -> OrbitKind {
        let e = self.eccentricity;
        if e <= DEGENERACY_EPS {
            OrbitKind::Circular
        } else if (1.0 - e).abs() <= DEGENERACY_EPS {
            OrbitKind::Parabolic
        } else if e < 1.0 {
            OrbitKind::Elliptic
        } else {
            OrbitKind::Hyperbolic
        }
    }

    /// Semi-latus rectum `p = h²/μ`.
    pub fn semi_latus_rectum(&self, body: &CelestialBody) -> Kilometer {
        self.angular_momentum.powi(2) / body.mu
    }

    /// Orbital period, `None` for open orbits.
    pub fn period(&self, body: &CelestialBody) -> Option<Second> {
        match self.orbit_kind() {
            OrbitKind::Circular | OrbitKind::Elliptic => {
                let a = self.semi_latus_rectum(body) / (1.0 - self.eccentricity.powi(2));
                Some(DPI * (a.powi(3) / body.mu).sqrt())
            }
            OrbitKind::Parabolic | OrbitKind::Hyperbolic => None,
        }
    }

    pub fn perigee_radius(&self, body: &CelestialBody) -> Kilometer {
        self.semi_latus_rectum(body) / (1.0 + self.eccentricity)
    }

    /// Apogee radius, `None` for open orbits.
    pub fn apogee_radius(&self, body: &CelestialBody) -> Option<Kilometer> {
        match self.orbit_kind() {
            OrbitKind::Circular | OrbitKind::Elliptic => {
                Some(self.semi_latus_rectum(body) / (1.0 - self.eccentricity))
            }
            OrbitKind::Parabolic | OrbitKind::Hyperbolic => None,
        }
    }
}

#[inline]
fn normalize_full_turn(angle: f64) -> f64 {
    if angle >= DPI {
        angle - DPI
    } else {
        angle
    }
}

impl fmt::Display for ClassicalElements {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !f.alternate() {
            return write!(
                f,
                "COE {{ h: {:.3} km²/s, e: {:.6}, a: {:.3} km, i: {:.4}°, Ω: {:.4}°, ω: {:.4}°, ν: {:.4}° }}",
                self.angular_momentum,
                self.eccentricity,
                self.semi_major_axis,
                self.inclination,
                self.right_ascension,
                self.argument_of_perigee,
                self.true_anomaly
            );
        }
        writeln!(f, "Classical Orbital Elements")?;
        writeln!(f, "-------------------------------------------")?;
        writeln!(
            f,
            "  h   (angular momentum)       = {:.6} km²/s",
            self.angular_momentum
        )?;
        writeln!(
            f,
            "  e   (eccentricity)           = {:.6}",
            self.eccentricity
        )?;
        writeln!(
            f,
            "  a   (semi-major axis)        = {:.6} km",
            self.semi_major_axis
        )?;
        writeln!(
            f,
            "  i   (inclination)            = {:.6}°",
            self.inclination
        )?;
        writeln!(
            f,
            "  Ω   (right ascension)        = {:.6}°",
            self.right_ascension
        )?;
        writeln!(
            f,
            "  ω   (argument of perigee)    = {:.6}°",
            self.argument_of_perigee
        )?;
        write!(
            f,
            "  ν   (true anomaly)           = {:.6}°",
            self.true_anomaly
        )
    }
}
