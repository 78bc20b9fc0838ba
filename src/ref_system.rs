//! # Reference-frame rotations
//!
//! Elementary rotation matrices about the principal axes, and the 3-1-3 Euler composition that
//! carries a vector from the **perifocal frame** (x toward perigee, z along the angular
//! momentum) to the **Earth-centered inertial frame**.
//!
//! Two conventions coexist in astrodynamics texts:
//!
//! * **active** rotations turn a vector inside a fixed frame ([`rotmt`]),
//! * **passive** (frame) rotations re-express a fixed vector in a rotated frame
//!   ([`frame_rotation`]). A passive rotation by `α` is the active rotation by `−α`.
//!
//! The perifocal → ECI matrix is defined as the transpose of the forward passive product
//! `R3(ω)·R1(i)·R3(Ω)`, see [`perifocal_to_eci`].
use nalgebra::{Matrix3, Rotation3, Vector3};

use crate::constants::{Radian, DPI};

/// Construct a right-handed 3×3 rotation matrix around one of the principal axes (X, Y, or Z).
///
/// This function builds a [`nalgebra::Matrix3`] representing an **active rotation**
/// of a 3D vector by an angle `alpha` around the chosen axis.
/// The rotation follows the **direct (positive/trigonometric)** sense.
///
/// Arguments
/// -----------------
/// * `alpha` - Rotation angle in **radians**.
/// * `k` - Index of the axis of rotation: `0` → X, `1` → Y, `2` → Z.
///
/// Return
/// ----------
/// * A 3×3 orthonormal matrix `R` such that the rotated vector is `x' = R · x`.
///
/// Panics
/// ----------
/// Panics if `k > 2`, as only axes 0–2 are valid.
pub fn rotmt(alpha: Radian, k: usize) -> Matrix3<f64> {
    let axis = match k {
        0 => Vector3::x_axis(),
        1 => Vector3::y_axis(),
        2 => Vector3::z_axis(),
        _ => panic!("**** ROTMT: invalid axis index {k} (must be 0,1,2) ****"),
    };

    Rotation3::from_axis_angle(&axis, alpha).into()
}

/// Passive rotation of the coordinate frame by `alpha` about axis `k`.
///
/// For the z-axis this is the classical
/// ```text
/// ⎡ cosα  sinα  0 ⎤
/// ⎢−sinα  cosα  0 ⎥
/// ⎣  0     0    1 ⎦
/// ```
#[inline]
pub fn frame_rotation(alpha: Radian, k: usize) -> Matrix3<f64> {
    rotmt(-alpha, k)
}

/// Rotation matrix from the perifocal frame to the inertial frame.
///
/// Arguments
/// -----------------
/// * `raan`: right ascension of the ascending node Ω `[rad]`.
/// * `inclination`: inclination i `[rad]`.
/// * `argp`: argument of perigee ω `[rad]`.
///
/// Return
/// ----------
/// * `Q = (R3(ω)·R1(i)·R3(Ω))ᵀ`, with `R1`, `R3` the passive frame rotations.
pub fn perifocal_to_eci(raan: Radian, inclination: Radian, argp: Radian) -> Matrix3<f64> {
    (frame_rotation(argp, 2) * frame_rotation(inclination, 0) * frame_rotation(raan, 2))
        .transpose()
}

/// Convert a Cartesian vector to right ascension, declination and norm.
///
/// Return
/// ----------
/// * `(α, δ, ρ)` with `α ∈ [0, 2π)`, `δ ∈ [−π/2, π/2]` in radians. A null vector yields
///   `(0, 0, 0)` and a vector along the pole yields `α = 0`.
pub fn cartesian_to_radec(cartesian_position: &Vector3<f64>) -> (Radian, Radian, f64) {
    let pos_norm = cartesian_position.norm();
    if pos_norm == 0. {
        return (0.0, 0.0, pos_norm);
    }

    let delta = (cartesian_position.z / pos_norm).clamp(-1.0, 1.0).asin();
    if cartesian_position.x == 0.0 && cartesian_position.y == 0.0 {
        return (0.0, delta, pos_norm);
    }

    let alpha = cartesian_position.y.atan2(cartesian_position.x);
    let alpha = if alpha < 0.0 { alpha + DPI } else { alpha };
    (alpha, delta, pos_norm)
}

/// Unit vector pointing at right ascension `ra` and declination `dec` (radians).
#[inline]
pub fn radec_to_unit_vector(ra: Radian, dec: Radian) -> Vector3<f64> {
    let (sin_dec, cos_dec) = dec.sin_cos();
    let (sin_ra, cos_ra) = ra.sin_cos();
    Vector3::new(cos_dec * cos_ra, cos_dec * sin_ra, sin_dec)
}
