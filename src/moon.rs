//! # Lunar position model
//!
//! Position, distance, age and phase of the Moon from mean orbital elements
//! propagated linearly since the 1990.0 epoch, with the classic perturbation
//! chain applied in fixed order: evection, annual equation, a third solar
//! term, the equation of center, and a final small correction, then the
//! variation. Accuracy is about 1/5° in ecliptic coordinates.
//!
//! The model needs the Sun's position at the same instant for the
//! perturbation arguments; callers compute that first and pass it in.
//!
//! Phase and age are defined on the **geocentric** orbital longitude. When
//! observer data is supplied, topocentric equatorial coordinates are stored
//! alongside the geocentric pair (never replacing it) and the horizontal
//! coordinates are derived from the topocentric pair — the Moon's ≈1°
//! parallax is too large to ignore at the horizon.

use serde::Serialize;

use crate::constants::{JulianDay, Kilometer, Radian, DPI, RADEG};
use crate::coordinates::{
    ecliptic_to_equatorial, equatorial_to_horizontal, geocentric_to_topocentric, mod2pi, Ecliptic,
    Equatorial, Horizontal, ObserverSite, Topocentric,
};
use crate::sun::{SunPosition, ZodiacSign, EPOCH_1990_JD};

/// Mean longitude at the 1990.0 epoch
const MEAN_LON_AT_EPOCH: f64 = 318.351_648 * RADEG;
/// Mean longitude of the perigee at the epoch
const PERIGEE_LON_AT_EPOCH: f64 = 36.340_410 * RADEG;
/// Mean longitude of the ascending node at the epoch
const NODE_LON_AT_EPOCH: f64 = 318.510_107 * RADEG;
/// Inclination of the lunar orbit
const INCLINATION: f64 = 5.145_396 * RADEG;
/// Eccentricity of the lunar orbit
const ECCENTRICITY: f64 = 0.054_900;
/// Semi-major axis of the lunar orbit, km
const SEMI_MAJOR_AXIS_KM: f64 = 384_401.0;
/// Angular diameter at a distance of one semi-major axis
const DIAMETER_AT_UNIT: f64 = 0.5181 * RADEG;
/// Horizontal parallax at a distance of one semi-major axis
const PARALLAX_AT_UNIT: f64 = 0.9507 * RADEG;

/// Mean daily motion of the mean longitude, degrees/day
const MEAN_MOTION: f64 = 13.176_396_6;
/// Daily regression of the anomaly offset, degrees/day
const ANOMALY_DRIFT: f64 = 0.111_404_1;
/// Daily regression of the ascending node, degrees/day
const NODE_DRIFT: f64 = 0.052_953_9;

/// Synodic month in days; sizes the "exact phase" snap window.
const SYNODIC_MONTH: f64 = 29.53;

/// The eight phase categories of the lunar cycle.
///
/// Within one day's worth of lunar motion around an exact quadrant (new,
/// first quarter, full, last quarter) the exact phase is reported, mimicking
/// "Full Moon" being shown for the whole day surrounding fullness rather
/// than only at the instant itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum MoonPhase {
    New,
    WaxingCrescent,
    FirstQuarter,
    WaxingGibbous,
    Full,
    WaningGibbous,
    LastQuarter,
    WaningCrescent,
}

impl MoonPhase {
    const ALL: [MoonPhase; 8] = [
        MoonPhase::New,
        MoonPhase::WaxingCrescent,
        MoonPhase::FirstQuarter,
        MoonPhase::WaxingGibbous,
        MoonPhase::Full,
        MoonPhase::WaningGibbous,
        MoonPhase::LastQuarter,
        MoonPhase::WaningCrescent,
    ];

    /// Phase category for a moon age (radians since new moon).
    ///
    /// Ages within ±(360°/29.53) of a quadrant boundary snap to the exact
    /// phase by rounding to the nearest quadrant; everything else floors
    /// into one of the four "between" phases.
    pub fn from_age(age: Radian) -> MoonPhase {
        let quadrant = 90.0 * RADEG;
        let snap_window = 360.0 / SYNODIC_MONTH * RADEG;
        let age = age.rem_euclid(DPI);
        let p = age.rem_euclid(quadrant);
        let idx = if p < snap_window || p > quadrant - snap_window {
            (2.0 * (age / quadrant).round()) as usize % 8
        } else {
            ((2.0 * (age / quadrant).floor()) as usize + 1) % 8
        };
        Self::ALL[idx]
    }

    pub fn name(&self) -> &'static str {
        match self {
            MoonPhase::New => "New Moon",
            MoonPhase::WaxingCrescent => "Waxing Crescent",
            MoonPhase::FirstQuarter => "First Quarter",
            MoonPhase::WaxingGibbous => "Waxing Gibbous",
            MoonPhase::Full => "Full Moon",
            MoonPhase::WaningGibbous => "Waning Gibbous",
            MoonPhase::LastQuarter => "Last Quarter",
            MoonPhase::WaningCrescent => "Waning Crescent",
        }
    }
}

impl std::fmt::Display for MoonPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Position, distance and phase of the Moon at one instant.
///
/// `equatorial` is always the geocentric pair; the topocentric shift, when
/// computed, lives in its own field so that age/phase derivations can never
/// pick up the parallax-shifted values by accident.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MoonPosition {
    /// Geocentric ecliptic coordinates
    pub ecliptic: Ecliptic,
    /// True orbital longitude (perturbation-corrected, before the node
    /// rotation); the moon age is measured from this
    pub orbital_longitude: Radian,
    /// Geocentric equatorial coordinates
    pub equatorial: Equatorial,
    /// Topocentric equatorial coordinates and distance, if observer data
    /// was supplied
    pub topocentric: Option<Topocentric>,
    /// Geocentric distance, km
    pub distance: Kilometer,
    /// Apparent angular diameter, radians
    pub diameter: Radian,
    /// Equatorial horizontal parallax, radians
    pub parallax: Radian,
    /// Age in radians since new moon, in [0, 2π)
    pub age: Radian,
    /// Illuminated fraction of the disk, 0 (new) to 1 (full)
    pub phase_fraction: f64,
    /// Phase category derived from the age
    pub phase: MoonPhase,
    /// Zodiac sign containing the ecliptic longitude
    pub sign: ZodiacSign,
    /// Azimuth/altitude from the **topocentric** pair, if observer data was
    /// supplied
    pub horizontal: Option<Horizontal>,
}

impl MoonPosition {
    /// Age in days since new moon, on the mean synodic month.
    pub fn age_days(&self) -> f64 {
        self.age / DPI * SYNODIC_MONTH
    }
}

/// Compute the Moon's position.
///
/// Arguments
/// ---------
/// * `sun`: the Sun's position at the same `tdt` (perturbation arguments)
/// * `tdt`: Terrestrial Dynamical Time as a Julian Date
/// * `observer`: optional `(site, LMST in radians)` pair; when present, the
///   topocentric equatorial pair and horizontal coordinates are filled in
pub fn moon_position(
    sun: &SunPosition,
    tdt: JulianDay,
    observer: Option<(&ObserverSite, Radian)>,
) -> MoonPosition {
    let d = tdt - EPOCH_1990_JD;

    // Mean elements, linear in time since the epoch.
    let mean_lon = MEAN_MOTION * RADEG * d + MEAN_LON_AT_EPOCH;
    let mean_anomaly = mean_lon - ANOMALY_DRIFT * RADEG * d - PERIGEE_LON_AT_EPOCH;
    let node = NODE_LON_AT_EPOCH - NODE_DRIFT * RADEG * d;

    // Perturbation chain, fixed order.
    let elongation = mean_lon - sun.ecliptic.lon;
    let evection = 1.2739 * RADEG * (2.0 * elongation - mean_anomaly).sin();
    let annual_equation = 0.1858 * RADEG * sun.mean_anomaly.sin();
    let third_correction = 0.37 * RADEG * sun.mean_anomaly.sin();
    let corrected_anomaly = mean_anomaly + evection - annual_equation - third_correction;
    let equation_of_center = 6.2886 * RADEG * corrected_anomaly.sin();
    let fourth_correction = 0.214 * RADEG * (2.0 * corrected_anomaly).sin();
    let corrected_lon = mean_lon + evection + equation_of_center - annual_equation + fourth_correction;
    let variation = 0.6583 * RADEG * (2.0 * (corrected_lon - sun.ecliptic.lon)).sin();
    let orbital_longitude = corrected_lon + variation;
    let corrected_node = node - 0.16 * RADEG * sun.mean_anomaly.sin();

    // Rotate from the orbital plane to the ecliptic.
    let arc = orbital_longitude - corrected_node;
    let ecliptic = Ecliptic {
        lon: mod2pi(corrected_node + (arc.sin() * INCLINATION.cos()).atan2(arc.cos())),
        lat: (arc.sin() * INCLINATION.sin()).asin(),
    };
    let equatorial = ecliptic_to_equatorial(ecliptic, tdt);

    // Same Kepler-equation form as the Sun, scaled by the lunar orbit.
    let relative_distance = (1.0 - ECCENTRICITY * ECCENTRICITY)
        / (1.0 + ECCENTRICITY * (corrected_anomaly + equation_of_center).cos());
    let diameter = DIAMETER_AT_UNIT / relative_distance;
    let parallax = PARALLAX_AT_UNIT / relative_distance;
    let distance = relative_distance * SEMI_MAJOR_AXIS_KM;

    let (topocentric, horizontal) = match observer {
        Some((site, lmst)) => {
            let topo = geocentric_to_topocentric(equatorial, distance, site, lmst);
            let hor = equatorial_to_horizontal(
                Equatorial {
                    ra: topo.ra,
                    dec: topo.dec,
                },
                site.latitude,
                lmst,
            );
            (Some(topo), Some(hor))
        }
        None => (None, None),
    };

    // Age from the geocentric orbital longitude only.
    let age = mod2pi(orbital_longitude - sun.ecliptic.lon);
    let phase_fraction = 0.5 * (1.0 - age.cos());

    MoonPosition {
        ecliptic,
        orbital_longitude,
        equatorial,
        topocentric,
        distance,
        diameter,
        parallax,
        age,
        phase_fraction,
        phase: MoonPhase::from_age(age),
        sign: ZodiacSign::from_longitude(ecliptic.lon),
        horizontal,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use crate::constants::J2000_JD;
    use crate::coordinates::observer_site;
    use crate::sun::sun_position;
    use crate::time::{gmst, julian_date, local_sidereal_time};

    fn moon_at(jd: f64) -> MoonPosition {
        let sun = sun_position(jd, None);
        moon_position(&sun, jd, None)
    }

    #[test]
    fn new_moon_of_january_2000() {
        // New moon was 2000-01-06 18:14 UTC.
        let jd = julian_date(6.0, 1, 2000) + 18.25 / 24.0;
        let moon = moon_at(jd);
        assert_eq!(moon.phase, MoonPhase::New);
        assert!(moon.phase_fraction < 0.02, "fraction {}", moon.phase_fraction);
        assert!(moon.age_days() < 0.7 || moon.age_days() > 28.8, "age {} d", moon.age_days());
    }

    #[test]
    fn full_moon_of_january_2000() {
        // Full moon was 2000-01-21 04:40 UTC.
        let jd = julian_date(21.0, 1, 2000) + 4.7 / 24.0;
        let moon = moon_at(jd);
        assert_eq!(moon.phase, MoonPhase::Full);
        assert!(moon.phase_fraction > 0.98, "fraction {}", moon.phase_fraction);
    }

    #[test]
    fn first_quarter_of_january_2000() {
        // First quarter was 2000-01-14 13:34 UTC.
        let jd = julian_date(14.0, 1, 2000) + 13.6 / 24.0;
        let moon = moon_at(jd);
        assert_eq!(moon.phase, MoonPhase::FirstQuarter);
        assert_abs_diff_eq!(moon.phase_fraction, 0.5, epsilon = 0.06);
    }

    #[test]
    fn waxing_crescent_between_quadrants() {
        // Midway between new (Jan 6) and first quarter (Jan 14).
        let jd = julian_date(10.0, 1, 2000) + 12.0 / 24.0;
        let moon = moon_at(jd);
        assert_eq!(moon.phase, MoonPhase::WaxingCrescent);
    }

    #[test]
    fn phase_snap_windows() {
        let quadrant = 90.0 * RADEG;
        let window = 360.0 / SYNODIC_MONTH * RADEG;
        assert_eq!(MoonPhase::from_age(0.0), MoonPhase::New);
        assert_eq!(MoonPhase::from_age(window * 0.9), MoonPhase::New);
        assert_eq!(MoonPhase::from_age(window * 1.1), MoonPhase::WaxingCrescent);
        assert_eq!(MoonPhase::from_age(quadrant - window * 0.9), MoonPhase::FirstQuarter);
        assert_eq!(MoonPhase::from_age(2.0 * quadrant), MoonPhase::Full);
        assert_eq!(MoonPhase::from_age(3.0 * quadrant + window * 1.5), MoonPhase::WaningCrescent);
        assert_eq!(MoonPhase::from_age(DPI - window * 0.5), MoonPhase::New);
    }

    #[test]
    fn distance_within_orbit_bounds_over_a_month() {
        for i in 0..60 {
            let moon = moon_at(J2000_JD + 0.5 * f64::from(i));
            assert!(
                (360_000.0..410_000.0).contains(&moon.distance),
                "sample {i}: distance {}",
                moon.distance
            );
        }
    }

    #[test]
    fn latitude_bounded_by_inclination() {
        for i in 0..60 {
            let moon = moon_at(J2000_JD + 0.5 * f64::from(i));
            assert!(moon.ecliptic.lat.abs() <= INCLINATION + 1e-9);
            assert!((0.0..DPI).contains(&moon.ecliptic.lon));
            assert!((0.0..DPI).contains(&moon.equatorial.ra));
        }
    }

    #[test]
    fn topocentric_pair_kept_separate() {
        let jd = J2000_JD + 3.0;
        let g = gmst(jd);
        let lmst = local_sidereal_time(g, 0.17) * crate::constants::RADH;
        let site = observer_site(0.17, 0.93, 0.0, g);
        let sun = sun_position(jd, None);
        let geo_only = moon_position(&sun, jd, None);
        let with_obs = moon_position(&sun, jd, Some((&site, lmst)));

        // Geocentric fields are untouched by the observer.
        assert_eq!(with_obs.equatorial, geo_only.equatorial);
        assert_eq!(with_obs.age, geo_only.age);

        let topo = with_obs.topocentric.expect("topocentric pair requested");
        // Parallax moves the apparent place, and the topocentric distance
        // differs from the geocentric one by less than one Earth radius.
        assert!((topo.distance - with_obs.distance).abs() < 6_378.2);
        assert!(
            (topo.dec - with_obs.equatorial.dec).abs() > 1e-5
                || (topo.ra - with_obs.equatorial.ra).abs() > 1e-5
        );
        assert!(with_obs.horizontal.is_some());
    }
}
