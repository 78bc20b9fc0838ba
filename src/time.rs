//! # Time system
//!
//! Calendar UTC timestamps, Julian Date, and Greenwich / local sidereal time.
//!
//! The Julian Date is computed with the classical formula valid between 1901 and 2099
//! (all divisions are floor divisions):
//!
//! ```text
//! J0 = 367·y − ⌊7(y + ⌊(m + 9)/12⌋)/4⌋ + ⌊275·m/9⌋ + d + 1 721 013.5
//! JD = J0 + UT/24
//! ```
//!
//! Sidereal time follows the IAU polynomial in Julian centuries since J2000 evaluated at 0h UT,
//! advanced by the sidereal rate for the elapsed UT hours.
//!
//! [`UtcDateTime`] bridges to [`hifitime::Epoch`] so that time offsets between observations are
//! computed with proper duration arithmetic.
use std::fmt;

use hifitime::{Epoch, TimeScale};

use crate::constants::{
    Degree, JulianDate, Second, DAYS_PER_JULIAN_CENTURY, J2000_JD, SECONDS_PER_DAY,
};
use crate::orbits_errors::OrbitsError;

/// Polynomial coefficients of the Greenwich sidereal time at 0h UT (degrees)
const GST_C0: f64 = 100.460_618_4;
const GST_C1: f64 = 36_000.770_04;
const GST_C2: f64 = 0.000_387_933;
const GST_C3: f64 = -2.583e-8;

/// Earth rotation in degrees per solar day, relative to the vernal equinox
const SIDEREAL_DEG_PER_DAY: f64 = 360.985_647_24;

/// Side of the prime meridian a longitude is measured on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Hemisphere {
    East,
    West,
}

/// A calendar date and UTC clock reading.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UtcDateTime {
    pub year: i32,
    pub month: u8,
    pub day: u8,
    pub hour: u8,
    pub minute: u8,
    pub second: f64,
}

impl UtcDateTime {
    /// Build a validated timestamp.
    ///
    /// Return
    /// ----------
    /// * `Err(OrbitsError::InvalidDateTime)` if a field is out of its calendar range or the day
    ///   does not exist in that month (leap seconds up to `second < 61` are accepted).
    pub fn new(
        year: i32,
        month: u8,
        day: u8,
        hour: u8,
        minute: u8,
        second: f64,
    ) -> Result<Self, OrbitsError> {
        if !(1..=12).contains(&month) {
            return Err(OrbitsError::InvalidDateTime(format!("month {month}")));
        }
        if !(1..=31).contains(&day) {
            return Err(OrbitsError::InvalidDateTime(format!("day {day}")));
        }
        if hour > 23 || minute > 59 {
            return Err(OrbitsError::InvalidDateTime(format!(
                "clock {hour:02}:{minute:02}"
            )));
        }
        if !(0.0..61.0).contains(&second) {
            return Err(OrbitsError::InvalidDateTime(format!("second {second}")));
        }
        // Day-of-month against the Gregorian calendar, leap years included
        Epoch::maybe_from_gregorian(year, month, day, 0, 0, 0, 0, TimeScale::UTC).map_err(|_| {
            OrbitsError::InvalidDateTime(format!("{year:04}-{month:02}-{day:02} does not exist"))
        })?;
        Ok(UtcDateTime {
            year,
            month,
            day,
            hour,
            minute,
            second,
        })
    }

    /// UT in hours since midnight.
    #[inline]
    pub fn ut_hours(&self) -> f64 {
        f64::from(self.hour) + f64::from(self.minute) / 60.0 + self.second / 3600.0
    }

    /// Seconds elapsed since midnight.
    #[inline]
    pub fn seconds_of_day(&self) -> Second {
        f64::from(self.hour) * 3600.0 + f64::from(self.minute) * 60.0 + self.second
    }

    /// Convert to a UTC [`Epoch`], at nanosecond resolution.
    pub fn to_epoch(&self) -> Result<Epoch, OrbitsError> {
        let whole = self.second.trunc();
        // Rounding must not spill into the next whole second
        let nanos = ((self.second - whole) * 1e9).round().min(999_999_999.0) as u32;
        Ok(Epoch::maybe_from_gregorian(
            self.year,
            self.month,
            self.day,
            self.hour,
            self.minute,
            whole as u8,
            nanos,
            TimeScale::UTC,
        )?)
    }

    /// Build a timestamp from a UTC [`Epoch`].
    pub fn from_epoch(epoch: Epoch) -> Self {
        let (year, month, day, hour, minute, second, nanos) = epoch.to_gregorian_utc();
        UtcDateTime {
            year,
            month,
            day,
            hour,
            minute,
            second: f64::from(second) + f64::from(nanos) * 1e-9,
        }
    }

    /// Shift the timestamp by a signed number of seconds.
    pub fn add_seconds(&self, seconds: Second) -> Result<Self, OrbitsError> {
        if seconds == 0.0 {
            return Ok(*self);
        }
        let epoch = self.to_epoch()? + hifitime::Duration::from_seconds(seconds);
        Ok(UtcDateTime::from_epoch(epoch))
    }
}

impl fmt::Display for UtcDateTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:04}-{:02}-{:02}T{:02}:{:02}:{:06.3} UTC",
            self.year, self.month, self.day, self.hour, self.minute, self.second
        )
    }
}

/// Signed elapsed time `to − from`, in seconds.
pub fn seconds_between(from: &UtcDateTime, to: &UtcDateTime) -> Result<Second, OrbitsError> {
    Ok((to.to_epoch()? - from.to_epoch()?).to_seconds())
}

/// Julian Date at 0h UT of the calendar day of `date`.
fn julian_day_number(date: &UtcDateTime) -> JulianDate {
    let y = f64::from(date.year);
    let m = f64::from(date.month);
    let d = f64::from(date.day);

    367.0 * y - (7.0 * (y + ((m + 9.0) / 12.0).floor()) / 4.0).floor() + (275.0 * m / 9.0).floor()
        + d
        + 1_721_013.5
}

/// Compute the Julian Date of a UTC timestamp.
///
/// Return
/// ----------
/// * `(jd, ut)` where `jd` is the full Julian Date and `ut` the UT expressed as a fraction of
///   the day.
pub fn julian_date(date: &UtcDateTime) -> (JulianDate, f64) {
    let ut = date.seconds_of_day() / SECONDS_PER_DAY;
    (julian_day_number(date) + ut, ut)
}

/// Normalize an angle in degrees to `[0, 360)`.
#[inline]
pub fn normalize_degrees(angle: Degree) -> Degree {
    let a = angle.rem_euclid(360.0);
    // rem_euclid may round up to exactly 360 for tiny negative inputs
    if a >= 360.0 {
        0.0
    } else {
        a
    }
}

/// Greenwich sidereal time in degrees, `[0, 360)`.
pub fn greenwich_sidereal_time(date: &UtcDateTime) -> Degree {
    let t0 = (julian_day_number(date) - J2000_JD) / DAYS_PER_JULIAN_CENTURY;
    let theta_g0 = normalize_degrees(((GST_C3 * t0 + GST_C2) * t0 + GST_C1) * t0 + GST_C0);
    normalize_degrees(theta_g0 + SIDEREAL_DEG_PER_DAY * date.ut_hours() / 24.0)
}

/// Local sidereal time in degrees, `[0, 360)`.
///
/// Arguments
/// -----------------
/// * `date`: UTC timestamp.
/// * `longitude`: site longitude magnitude in degrees.
/// * `hemisphere`: whether `longitude` is measured east or west of Greenwich.
pub fn local_sidereal_time(date: &UtcDateTime, longitude: Degree, hemisphere: Hemisphere) -> Degree {
    let theta_g = greenwich_sidereal_time(date);
    let lst = match hemisphere {
        Hemisphere::East => theta_g + longitude,
        Hemisphere::West => theta_g - longitude,
    };
    normalize_degrees(lst)
}
