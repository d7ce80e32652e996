//! # Time scale conversions
//!
//! Julian-date arithmetic and mean sidereal time, the time axis of every
//! formula in this crate.
//!
//! The day-count formula is the classic 1900-anchored one and is only valid
//! from 1901-03-01 to 2100-02-28. The crate does not re-check the window
//! here; [`Instant`](crate::almanac::Instant) validates it once at the
//! boundary.
//!
//! All sidereal times are expressed in fractional hours. [`gmst`] and
//! [`local_sidereal_time`] normalize into [0, 24); [`gmst_to_ut`] deliberately
//! does not, because the rise/set solver needs the unwrapped value to keep
//! its interpolation monotonic across the 24h boundary.

use crate::constants::{
    Hour, JulianDay, Radian, JD_ANCHOR_1900, JULIAN_CENTURY, J2000_JD, SIDEREAL_RATE,
    UT_PER_SIDEREAL,
};

/// Coefficients of the GMST polynomial at 0h UT, hours per Julian century.
const GMST_C0: f64 = 6.697_374_558;
const GMST_C1: f64 = 2_400.051_336;
const GMST_C2: f64 = 0.000_025_862;

/// Fractional part of `x`, in [0, 1).
#[inline]
fn frac(x: f64) -> f64 {
    x - x.floor()
}

/// JD of the preceding 0h UT.
#[inline]
pub(crate) fn jd_at_midnight(jd: JulianDay) -> JulianDay {
    (jd - 0.5).floor() + 0.5
}

/// Julian Date of a calendar date (proleptic Gregorian, UT).
///
/// Arguments
/// ---------
/// * `day`: day of month, may carry a fraction for the time of day
/// * `month`: calendar month, 1–12
/// * `year`: calendar year
///
/// Return
/// ------
/// * the Julian Date; `day = 1.0` yields the JD of 0h UT on that date.
///
/// January and February are counted as months 13 and 14 of the previous
/// year so that the leap day falls at the end of the counting year. Valid
/// only from 1901-03-01 to 2100-02-28.
pub fn julian_date(day: f64, month: u32, year: i32) -> JulianDay {
    let (year, month) = if month <= 2 {
        (year - 1, month + 12)
    } else {
        (year, month)
    };
    let mut jd = JD_ANCHOR_1900;
    jd += (f64::from(year - 1900) * 365.25).trunc();
    jd += (30.6001 * f64::from(1 + month)).trunc();
    jd + day
}

/// Greenwich Mean Sidereal Time at a given Julian Date (UT).
///
/// Splits the JD into the 0h-UT date and the UT of day, evaluates the
/// sidereal polynomial in Julian centuries since J2000.0 for the date, and
/// adds the elapsed UT scaled by the sidereal rate.
///
/// Return
/// ------
/// * GMST in fractional hours, normalized to [0, 24).
pub fn gmst(jd: JulianDay) -> Hour {
    let ut = frac(jd - 0.5) * 24.0;
    let t = (jd_at_midnight(jd) - J2000_JD) / JULIAN_CENTURY;
    let t0 = GMST_C0 + t * (GMST_C1 + t * GMST_C2);
    (t0 + ut * SIDEREAL_RATE).rem_euclid(24.0)
}

/// Recover UT from a Greenwich mean sidereal time at a given date.
///
/// Near-inverse of [`gmst`]: solves the same linear relation for UT at the
/// date given by `jd`.
///
/// Return
/// ------
/// * UT in hours, **not** reduced into [0, 24). The rise/set solver feeds
///   unwrapped sidereal times (possibly ≥ 24h or < 0h) through this and
///   normalizes only after the local-day correction.
pub fn gmst_to_ut(jd: JulianDay, gmst: Hour) -> Hour {
    let t = (jd_at_midnight(jd) - J2000_JD) / JULIAN_CENTURY;
    let t0 = (GMST_C0 + t * (GMST_C1 + t * GMST_C2)).rem_euclid(24.0);
    UT_PER_SIDEREAL * (gmst - t0)
}

/// Local Mean Sidereal Time from GMST and the observer's east longitude.
///
/// Return
/// ------
/// * LMST in fractional hours, normalized to [0, 24).
pub fn local_sidereal_time(gmst: Hour, longitude: Radian) -> Hour {
    (gmst + longitude.to_degrees() / 15.0).rem_euclid(24.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::{assert_abs_diff_eq, assert_relative_eq};

    #[test]
    fn jd_of_2000_01_01() {
        // 2000-01-01 0h UT
        assert_eq!(julian_date(1.0, 1, 2000), 2_451_544.5);
    }

    #[test]
    fn jd_of_1990_epoch() {
        // Epoch 1990.0 of the position series: 1989 December 31.0
        assert_eq!(julian_date(31.0, 12, 1989), 2_447_891.5);
    }

    #[test]
    fn jd_carries_day_fraction() {
        let jd0 = julian_date(21.0, 12, 2020);
        let jd_noon = julian_date(21.5, 12, 2020);
        assert_abs_diff_eq!(jd_noon - jd0, 0.5);
    }

    #[test]
    fn jd_feb_rolls_into_previous_year() {
        // 2000-02-29 exists, 1900-anchored counting must place it right
        // between Feb 28 and Mar 1.
        let feb28 = julian_date(28.0, 2, 2000);
        let feb29 = julian_date(29.0, 2, 2000);
        let mar1 = julian_date(1.0, 3, 2000);
        assert_eq!(feb29 - feb28, 1.0);
        assert_eq!(mar1 - feb29, 1.0);
    }

    #[test]
    fn gmst_at_j2000_midnight() {
        // Known value: 2000-01-01 0h UT ⇒ GMST ≈ 6h 39m 52s
        assert_abs_diff_eq!(gmst(2_451_544.5), 6.664_52, epsilon = 1e-4);
    }

    #[test]
    fn gmst_normalized() {
        let mut jd = 2_451_544.5;
        for _ in 0..400 {
            let g = gmst(jd);
            assert!((0.0..24.0).contains(&g), "gmst({jd}) = {g}");
            jd += 1.0 + 0.371;
        }
    }

    #[test]
    fn gmst_ut_round_trip_over_a_year() {
        // gmst_to_ut(jd, gmst(jd)) must recover the UT-of-day of jd to
        // better than 1e-6 hours across a full year.
        for i in 0..366 {
            let jd = 2_451_544.5 + f64::from(i) + 0.337;
            let ut = frac(jd - 0.5) * 24.0;
            let recovered = gmst_to_ut(jd, gmst(jd));
            assert_relative_eq!(recovered.rem_euclid(24.0), ut, epsilon = 1e-6);
        }
    }

    #[test]
    fn lmst_adds_longitude_in_hours() {
        // 15° east is exactly one sidereal hour ahead.
        let g = 10.0;
        assert_abs_diff_eq!(local_sidereal_time(g, 15.0_f64.to_radians()), 11.0);
        assert_abs_diff_eq!(local_sidereal_time(23.5, 15.0_f64.to_radians()), 0.5, epsilon = 1e-12);
    }
}
