//! # Atmospheric refraction
//!
//! Altitude correction for a standard atmosphere (1015 mbar, 10 °C). Above
//! 15° a closed-form cotangent approximation is enough; near the horizon
//! that formula diverges, so a fixed-point iteration with a correction term
//! from the previous iterate takes over. The iteration runs exactly three
//! passes — not adaptively — which is what the stated ±1–2 minute rise/set
//! accuracy class is calibrated against.

use crate::constants::{Radian, RADEG};

/// Standard atmospheric pressure, mbar
const PRESSURE: f64 = 1015.0;
/// Standard temperature, °C
const TEMPERATURE: f64 = 10.0;

/// Refraction correction for a true altitude.
///
/// Arguments
/// ---------
/// * `altitude`: true (airless) altitude of the body, radians
///
/// Return
/// ------
/// * increase in apparent altitude, radians; 0 outside [−2°, 90°).
pub fn refraction(altitude: Radian) -> Radian {
    let altdeg = altitude.to_degrees();
    if !(-2.0..90.0).contains(&altdeg) {
        return 0.0;
    }
    if altdeg > 15.0 {
        return 0.00452 * PRESSURE / ((273.0 + TEMPERATURE) * altitude.tan()) * RADEG;
    }

    // Low-altitude regime: three fixed passes of the iterated formula,
    // feeding the previous correction back into the altitude argument.
    let p = (PRESSURE - 80.0) / 930.0;
    let q = 0.0048 * (TEMPERATURE - 10.0);
    let mut y = altitude;
    let mut d = 0.0;
    let mut y0 = y;
    let mut d0 = d;
    for _ in 0..3 {
        let mut n = y + 7.31 / (y + 4.4);
        n = 1.0 / (n * RADEG).tan();
        d = n * p / (60.0 + q * (n + 39.0));
        n = y - y0;
        y0 = d - d0 - n;
        n = if n != 0.0 && y0 != 0.0 {
            y - n * (altitude + d - y) / y0
        } else {
            altitude + d
        };
        y0 = y;
        d0 = d;
        y = n;
    }
    d * RADEG
}
