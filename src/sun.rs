//! # Solar position model
//!
//! Low-precision position of the Sun from a linear mean anomaly since the
//! 1990.0 epoch with an equation-of-center correction — good to roughly 10
//! seconds of time in right ascension and a few arcminutes in declination,
//! which is all the rise/set solver needs.
//!
//! The Sun's ecliptic latitude is 0 by definition of the ecliptic; only the
//! longitude carries information.

use serde::Serialize;

use crate::constants::{JulianDay, Kilometer, Radian, AU_KM, DPI, EARTH_RADIUS_KM, RADEG};
use crate::coordinates::{
    ecliptic_to_equatorial, equatorial_to_horizontal, mod2pi, Ecliptic, Equatorial, Horizontal,
};

/// Epoch 1990.0 of the orbital elements (1989 December 31.0 TDT)
pub(crate) const EPOCH_1990_JD: f64 = 2_447_891.5;

/// Ecliptic longitude of the Sun at the 1990.0 epoch
const LON_AT_EPOCH: f64 = 279.403_303 * RADEG;
/// Ecliptic longitude of perigee
const LON_PERIGEE: f64 = 282.768_422 * RADEG;
/// Eccentricity of the Sun's (apparent) orbit
const ECCENTRICITY: f64 = 0.016_713;
/// Angular diameter at a distance of 1 AU
const DIAMETER_AT_UNIT: f64 = 0.533_128 * RADEG;
/// Tropical year in days
const TROPICAL_YEAR: f64 = 365.242_191;

/// One of the twelve 30° ecliptic-longitude bins.
///
/// Display names are English; localization stays outside the core.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ZodiacSign {
    Aries,
    Taurus,
    Gemini,
    Cancer,
    Leo,
    Virgo,
    Libra,
    Scorpio,
    Sagittarius,
    Capricorn,
    Aquarius,
    Pisces,
}

impl ZodiacSign {
    const ALL: [ZodiacSign; 12] = [
        ZodiacSign::Aries,
        ZodiacSign::Taurus,
        ZodiacSign::Gemini,
        ZodiacSign::Cancer,
        ZodiacSign::Leo,
        ZodiacSign::Virgo,
        ZodiacSign::Libra,
        ZodiacSign::Scorpio,
        ZodiacSign::Sagittarius,
        ZodiacSign::Capricorn,
        ZodiacSign::Aquarius,
        ZodiacSign::Pisces,
    ];

    /// Sign containing an ecliptic longitude (30° bins from the equinox).
    pub fn from_longitude(lon: Radian) -> ZodiacSign {
        let idx = (lon.rem_euclid(DPI).to_degrees() / 30.0) as usize % 12;
        Self::ALL[idx]
    }

    pub fn name(&self) -> &'static str {
        match self {
            ZodiacSign::Aries => "Aries",
            ZodiacSign::Taurus => "Taurus",
            ZodiacSign::Gemini => "Gemini",
            ZodiacSign::Cancer => "Cancer",
            ZodiacSign::Leo => "Leo",
            ZodiacSign::Virgo => "Virgo",
            ZodiacSign::Libra => "Libra",
            ZodiacSign::Scorpio => "Scorpio",
            ZodiacSign::Sagittarius => "Sagittarius",
            ZodiacSign::Capricorn => "Capricorn",
            ZodiacSign::Aquarius => "Aquarius",
            ZodiacSign::Pisces => "Pisces",
        }
    }
}

impl std::fmt::Display for ZodiacSign {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Geocentric position of the Sun at one instant.
///
/// All angles radians, distance km. `horizontal` is only present when the
/// observer's latitude and sidereal time were supplied.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SunPosition {
    /// Ecliptic longitude/latitude (latitude fixed at 0)
    pub ecliptic: Ecliptic,
    /// Mean anomaly, kept for the Moon's perturbation series
    pub mean_anomaly: Radian,
    /// Geocentric equatorial coordinates
    pub equatorial: Equatorial,
    /// Geocentric distance, km
    pub distance: Kilometer,
    /// Apparent angular diameter, radians
    pub diameter: Radian,
    /// Equatorial horizontal parallax, radians
    pub parallax: Radian,
    /// Zodiac sign containing the ecliptic longitude
    pub sign: ZodiacSign,
    /// Azimuth/altitude, if observer data was supplied
    pub horizontal: Option<Horizontal>,
}

/// Compute the Sun's position.
///
/// Arguments
/// ---------
/// * `tdt`: Terrestrial Dynamical Time as a Julian Date
/// * `observer`: optional `(geodetic latitude, LMST in radians)` pair; when
///   present, horizontal coordinates are computed as well
pub fn sun_position(tdt: JulianDay, observer: Option<(Radian, Radian)>) -> SunPosition {
    let d = tdt - EPOCH_1990_JD;

    // Mean anomaly from the linear rate, then the equation of center.
    let mean_anomaly = 360.0 * RADEG / TROPICAL_YEAR * d + LON_AT_EPOCH - LON_PERIGEE;
    let nu = mean_anomaly + 360.0 * RADEG / std::f64::consts::PI * ECCENTRICITY * mean_anomaly.sin();

    let ecliptic = Ecliptic {
        lon: mod2pi(nu + LON_PERIGEE),
        lat: 0.0,
    };

    // Kepler orbit equation gives the distance in units of the semi-major axis.
    let relative_distance = (1.0 - ECCENTRICITY * ECCENTRICITY) / (1.0 + ECCENTRICITY * nu.cos());
    let diameter = DIAMETER_AT_UNIT / relative_distance;
    let distance = relative_distance * AU_KM;
    let parallax = EARTH_RADIUS_KM / distance;

    let equatorial = ecliptic_to_equatorial(ecliptic, tdt);
    let horizontal = observer.map(|(lat, lmst)| equatorial_to_horizontal(equatorial, lat, lmst));

    SunPosition {
        ecliptic,
        mean_anomaly,
        equatorial,
        distance,
        diameter,
        parallax,
        sign: ZodiacSign::from_longitude(ecliptic.lon),
        horizontal,
    }
}
