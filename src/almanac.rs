//! # Almanac facade
//!
//! Orchestrates the position models and the rise/set solver for one
//! `(Location, Instant)` pair. Two entry points:
//!
//! - [`compute_sun_times`] — the three headline timestamps (sunrise,
//!   transit, sunset) as UTC epoch seconds, the form a scheduling caller
//!   consumes once per day. Callers bridging a local midnight call it again
//!   with [`Instant::add_days`].
//! - [`compute_full_report`] — the full diagnostic report for both bodies:
//!   positions, distances, phase, events and twilight bands, with all
//!   angles in degrees at the boundary (the engine is radians-internal).
//!
//! All precondition checking lives here: [`Location::new`] validates the
//! coordinate ranges and [`Instant::from_utc`] the calendar validity window
//! of the day-count formula. Past these constructors the engine never
//! fails; a body that produces no event on a day is reported as
//! [`EventTime::DoesNotOccur`], not as an error.
//!
//! Calendar and epoch-second conversions go through [`hifitime::Epoch`];
//! the 1900-anchored Julian-date formula in [`time`](crate::time) stays the
//! time axis of the ephemeris itself.

use hifitime::{Epoch, Unit};
use serde::Serialize;

use crate::constants::{
    Degree, Hour, JulianDay, Kilometer, Radian, RADEG, RADH, SECONDS_PER_DAY, VALID_FROM,
    VALID_UNTIL,
};
use crate::coordinates::{equatorial_to_horizontal, observer_site, polar_to_cartesian};
use crate::errors::SunMoonError;
use crate::moon::{moon_position, MoonPhase};
use crate::refraction::refraction;
use crate::riseset::{moon_events, sun_events, EventTime, RiseSet, SunEvents};
use crate::sun::{sun_position, ZodiacSign};
use crate::time::{gmst, julian_date, local_sidereal_time};

/// Default TT − UT in seconds, adequate for the early 21st century.
pub const DEFAULT_DELTA_T: f64 = 65.0;

/// Observer location, degrees, east/north positive. Immutable.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Location {
    longitude: Degree,
    latitude: Degree,
}

impl Location {
    /// Validate and build a location.
    ///
    /// Arguments
    /// ---------
    /// * `longitude`: geodetic east longitude, degrees in [−180, 180]
    /// * `latitude`: geodetic latitude, degrees in [−90, 90]
    pub fn new(longitude: Degree, latitude: Degree) -> Result<Location, SunMoonError> {
        if !(-180.0..=180.0).contains(&longitude) {
            return Err(SunMoonError::InvalidLongitude(longitude));
        }
        if !(-90.0..=90.0).contains(&latitude) {
            return Err(SunMoonError::InvalidLatitude(latitude));
        }
        Ok(Location {
            longitude,
            latitude,
        })
    }

    pub fn longitude(&self) -> Degree {
        self.longitude
    }

    pub fn latitude(&self) -> Degree {
        self.latitude
    }

    fn lon_rad(&self) -> Radian {
        self.longitude * RADEG
    }

    fn lat_rad(&self) -> Radian {
        self.latitude * RADEG
    }
}

/// A UTC instant plus the local-time context of the computation.
///
/// The UTC offset is used only to roll events onto the local calendar day;
/// the instant's calendar date is read as that local day. `delta_t`
/// (TT − UT, seconds) defaults to [`DEFAULT_DELTA_T`] and can be overridden
/// with [`Instant::with_delta_t`] when the caller tracks it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Instant {
    epoch: Epoch,
    utc_offset: Hour,
    delta_t: f64,
}

impl Instant {
    /// Build an instant from a UTC calendar date-time.
    ///
    /// Return
    /// ------
    /// * `Err(SunMoonError::DateOutOfRange)` outside 1901-03-01..2100-02-28,
    ///   the validity window of the day-count formula;
    ///   `Err(SunMoonError::InvalidDateTime)` for an impossible calendar
    ///   date-time.
    pub fn from_utc(
        year: i32,
        month: u8,
        day: u8,
        hour: u8,
        minute: u8,
        second: u8,
        utc_offset: Hour,
    ) -> Result<Instant, SunMoonError> {
        let epoch = Epoch::maybe_from_gregorian_utc(year, month, day, hour, minute, second, 0)
            .map_err(|e| SunMoonError::InvalidDateTime(e.to_string()))?;
        Instant::from_epoch(epoch, utc_offset)
    }

    /// Build an instant from an existing [`hifitime::Epoch`].
    pub fn from_epoch(epoch: Epoch, utc_offset: Hour) -> Result<Instant, SunMoonError> {
        let (year, month, day, ..) = epoch.to_gregorian_utc();
        check_validity_window(year, month, day)?;
        Ok(Instant {
            epoch,
            utc_offset,
            delta_t: DEFAULT_DELTA_T,
        })
    }

    /// Same instant with an explicit TT − UT value in seconds.
    pub fn with_delta_t(mut self, delta_t: f64) -> Instant {
        self.delta_t = delta_t;
        self
    }

    /// The same local context shifted by a number of days (may be
    /// fractional or negative). Re-validates the calendar window, since the
    /// shift can walk out of it.
    pub fn add_days(&self, days: f64) -> Result<Instant, SunMoonError> {
        Instant::from_epoch(self.epoch + days * Unit::Day, self.utc_offset)
            .map(|i| i.with_delta_t(self.delta_t))
    }

    pub fn epoch(&self) -> Epoch {
        self.epoch
    }

    pub fn utc_offset(&self) -> Hour {
        self.utc_offset
    }

    pub fn delta_t(&self) -> f64 {
        self.delta_t
    }

    /// Julian Date of the instant, on the engine's own day-count formula.
    pub fn julian_date(&self) -> JulianDay {
        let (year, month, day, hour, minute, second, nanos) = self.epoch.to_gregorian_utc();
        let day_fraction = (f64::from(hour) * 3_600.0
            + f64::from(minute) * 60.0
            + f64::from(second)
            + f64::from(nanos) * 1e-9)
            / SECONDS_PER_DAY;
        julian_date(f64::from(day) + day_fraction, u32::from(month), year)
    }

    /// Unix seconds of 0h UTC on the instant's calendar date.
    fn midnight_unix_seconds(&self) -> f64 {
        let (_, _, _, hour, minute, second, nanos) = self.epoch.to_gregorian_utc();
        let seconds_of_day = f64::from(hour) * 3_600.0
            + f64::from(minute) * 60.0
            + f64::from(second)
            + f64::from(nanos) * 1e-9;
        self.epoch.to_unix_seconds() - seconds_of_day
    }
}

fn check_validity_window(year: i32, month: u8, day: u8) -> Result<(), SunMoonError> {
    let date = (year, month, day);
    if date < VALID_FROM || date > VALID_UNTIL {
        return Err(SunMoonError::DateOutOfRange { year, month, day });
    }
    Ok(())
}

/// Headline solar timestamps of one local calendar day, as UTC epoch
/// seconds. `None` when the event does not occur on that day.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SunTimes {
    pub sunrise: Option<f64>,
    pub transit: Option<f64>,
    pub sunset: Option<f64>,
}

/// Solar block of the full report. Angles degrees, RA in hours, distances
/// km. `altitude` is the apparent (refracted) altitude.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SunReport {
    pub ecliptic_longitude: Degree,
    pub right_ascension_hours: Hour,
    pub declination: Degree,
    pub distance: Kilometer,
    pub observer_distance: Kilometer,
    pub diameter: Degree,
    pub azimuth: Degree,
    pub altitude: Degree,
    pub sign: ZodiacSign,
    pub events: SunEvents,
}

/// Lunar block of the full report, same unit conventions as [`SunReport`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MoonReport {
    pub ecliptic_longitude: Degree,
    pub ecliptic_latitude: Degree,
    pub right_ascension_hours: Hour,
    pub declination: Degree,
    pub distance: Kilometer,
    pub observer_distance: Kilometer,
    pub diameter: Degree,
    pub parallax: Degree,
    pub age_days: f64,
    pub phase_fraction: f64,
    pub phase: MoonPhase,
    pub sign: ZodiacSign,
    pub azimuth: Degree,
    pub altitude: Degree,
    pub events: RiseSet,
}

/// Full diagnostic report for one `(Location, Instant)` pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Report {
    pub julian_date: JulianDay,
    pub gmst: Hour,
    pub lmst: Hour,
    pub sun: SunReport,
    pub moon: MoonReport,
}

/// Sunrise, transit and sunset of the instant's local calendar day as UTC
/// epoch seconds.
pub fn compute_sun_times(location: &Location, instant: &Instant) -> SunTimes {
    let events = sun_events(
        instant.julian_date(),
        instant.delta_t,
        location.lon_rad(),
        location.lat_rad(),
        instant.utc_offset,
    );
    let to_epoch = epoch_seconds_mapper(instant);
    SunTimes {
        sunrise: to_epoch(events.rise_set.rise),
        transit: to_epoch(events.rise_set.transit),
        sunset: to_epoch(events.rise_set.set),
    }
}

/// Map a local event hour to UTC epoch seconds, anchored at 0h UTC of the
/// instant's calendar date.
fn epoch_seconds_mapper(instant: &Instant) -> impl Fn(EventTime) -> Option<f64> {
    let midnight = instant.midnight_unix_seconds();
    let offset = instant.utc_offset;
    move |event| event.hour().map(|h| midnight + (h - offset) * 3_600.0)
}

/// Full position/event report for both bodies.
pub fn compute_full_report(location: &Location, instant: &Instant) -> Report {
    let jd = instant.julian_date();
    let tdt = jd + instant.delta_t / SECONDS_PER_DAY;
    let lon = location.lon_rad();
    let lat = location.lat_rad();

    let gmst_h = gmst(jd);
    let lmst_h = local_sidereal_time(gmst_h, lon);
    let lmst_rad = lmst_h * RADH;
    let site = observer_site(lon, lat, 0.0, gmst_h);

    let sun = sun_position(tdt, Some((lat, lmst_rad)));
    let moon = moon_position(&sun, tdt, Some((&site, lmst_rad)));

    let sun_hor = sun
        .horizontal
        .unwrap_or_else(|| equatorial_to_horizontal(sun.equatorial, lat, lmst_rad));
    let moon_hor = moon
        .horizontal
        .unwrap_or_else(|| equatorial_to_horizontal(moon.equatorial, lat, lmst_rad));

    // Straight-line observer-to-body distance, both vectors in the
    // equinox frame of date.
    let observer_distance = |ra: Radian, dec: Radian, distance: Kilometer| {
        (polar_to_cartesian(ra, dec, distance) - site.position).norm()
    };
    let apparent_altitude = |alt: Radian| (alt + refraction(alt)).to_degrees();

    let sun_ev = sun_events(jd, instant.delta_t, lon, lat, instant.utc_offset);
    let moon_ev = moon_events(jd, instant.delta_t, lon, lat, instant.utc_offset);

    Report {
        julian_date: jd,
        gmst: gmst_h,
        lmst: lmst_h,
        sun: SunReport {
            ecliptic_longitude: sun.ecliptic.lon.to_degrees(),
            right_ascension_hours: sun.equatorial.ra / RADH,
            declination: sun.equatorial.dec.to_degrees(),
            distance: sun.distance,
            observer_distance: observer_distance(sun.equatorial.ra, sun.equatorial.dec, sun.distance),
            diameter: sun.diameter.to_degrees(),
            azimuth: sun_hor.azimuth.to_degrees(),
            altitude: apparent_altitude(sun_hor.altitude),
            sign: sun.sign,
            events: sun_ev,
        },
        moon: MoonReport {
            ecliptic_longitude: moon.ecliptic.lon.to_degrees(),
            ecliptic_latitude: moon.ecliptic.lat.to_degrees(),
            right_ascension_hours: moon.equatorial.ra / RADH,
            declination: moon.equatorial.dec.to_degrees(),
            distance: moon.distance,
            observer_distance: observer_distance(
                moon.equatorial.ra,
                moon.equatorial.dec,
                moon.distance,
            ),
            diameter: moon.diameter.to_degrees(),
            parallax: moon.parallax.to_degrees(),
            age_days: moon.age_days(),
            phase_fraction: moon.phase_fraction,
            phase: moon.phase,
            sign: moon.sign,
            azimuth: moon_hor.azimuth.to_degrees(),
            altitude: apparent_altitude(moon_hor.altitude),
            events: moon_ev,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn location_rejects_out_of_range_coordinates() {
        assert_eq!(
            Location::new(181.0, 0.0),
            Err(SunMoonError::InvalidLongitude(181.0))
        );
        assert_eq!(
            Location::new(0.0, -90.5),
            Err(SunMoonError::InvalidLatitude(-90.5))
        );
        assert!(Location::new(f64::NAN, 0.0).is_err());
        let loc = Location::new(-180.0, 90.0).expect("bounds are inclusive");
        assert_eq!(loc.longitude(), -180.0);
        assert_eq!(loc.latitude(), 90.0);
    }

    #[test]
    fn instant_enforces_the_calendar_window() {
        assert_eq!(
            Instant::from_utc(1900, 12, 31, 0, 0, 0, 0.0),
            Err(SunMoonError::DateOutOfRange {
                year: 1900,
                month: 12,
                day: 31
            })
        );
        assert_eq!(
            Instant::from_utc(2100, 3, 1, 0, 0, 0, 0.0),
            Err(SunMoonError::DateOutOfRange {
                year: 2100,
                month: 3,
                day: 1
            })
        );
        assert!(Instant::from_utc(1901, 3, 1, 0, 0, 0, 0.0).is_ok());
        assert!(Instant::from_utc(2100, 2, 28, 23, 59, 59, 0.0).is_ok());
    }

    #[test]
    fn instant_rejects_impossible_dates() {
        assert!(matches!(
            Instant::from_utc(2021, 2, 29, 0, 0, 0, 0.0),
            Err(SunMoonError::InvalidDateTime(_))
        ));
        assert!(matches!(
            Instant::from_utc(2021, 13, 1, 0, 0, 0, 0.0),
            Err(SunMoonError::InvalidDateTime(_))
        ));
    }

    #[test]
    fn delta_t_defaults_and_overrides() {
        let instant = Instant::from_utc(2020, 6, 21, 12, 0, 0, 2.0).unwrap();
        assert_eq!(instant.delta_t(), DEFAULT_DELTA_T);
        assert_eq!(instant.utc_offset(), 2.0);
        let tuned = instant.with_delta_t(69.2);
        assert_eq!(tuned.delta_t(), 69.2);
    }

    #[test]
    fn add_days_walks_the_calendar() {
        let instant = Instant::from_utc(2020, 1, 31, 6, 0, 0, 1.0).unwrap();
        let next = instant.add_days(1.0).unwrap();
        let (year, month, day, hour, ..) = next.epoch().to_gregorian_utc();
        assert_eq!((year, month, day, hour), (2020, 2, 1, 6));
        assert_eq!(next.utc_offset(), 1.0);
        // Shifting out of the window is an error, not a wrap.
        let late = Instant::from_utc(2100, 2, 28, 0, 0, 0, 0.0).unwrap();
        assert!(late.add_days(1.0).is_err());
    }

    #[test]
    fn instant_julian_date_matches_the_day_count_formula() {
        let midnight = Instant::from_utc(2000, 1, 1, 0, 0, 0, 0.0).unwrap();
        assert_eq!(midnight.julian_date(), 2_451_544.5);
        let noon = Instant::from_utc(2000, 1, 1, 12, 0, 0, 0.0).unwrap();
        assert_abs_diff_eq!(noon.julian_date(), 2_451_545.0, epsilon = 1e-9);
    }

    #[test]
    fn sun_times_reproduce_the_event_hours() {
        let location = Location::new(9.94598, 53.57698).unwrap();
        let instant = Instant::from_utc(2020, 12, 21, 12, 0, 0, 1.0).unwrap();
        let times = compute_sun_times(&location, &instant);

        let events = sun_events(
            instant.julian_date(),
            instant.delta_t(),
            location.lon_rad(),
            location.lat_rad(),
            instant.utc_offset(),
        );
        let midnight = Epoch::from_gregorian_utc(2020, 12, 21, 0, 0, 0, 0).to_unix_seconds();
        for (seconds, hour) in [
            (times.sunrise, events.rise_set.rise.hour()),
            (times.transit, events.rise_set.transit.hour()),
            (times.sunset, events.rise_set.set.hour()),
        ] {
            let seconds = seconds.expect("the sun rises in Hamburg");
            let hour = hour.expect("event hour");
            assert_abs_diff_eq!(seconds, midnight + (hour - 1.0) * 3_600.0, epsilon = 1e-3);
        }
    }

    #[test]
    fn polar_night_yields_no_timestamps() {
        let location = Location::new(15.0, 78.0).unwrap();
        let instant = Instant::from_utc(2020, 12, 21, 12, 0, 0, 1.0).unwrap();
        let times = compute_sun_times(&location, &instant);
        assert_eq!(times.sunrise, None);
        assert_eq!(times.sunset, None);
        // The sun still transits, below the horizon.
        assert!(times.transit.is_some());
    }

    #[test]
    fn full_report_is_internally_consistent() {
        let location = Location::new(9.94598, 53.57698).unwrap();
        let instant = Instant::from_utc(2020, 12, 21, 12, 0, 0, 1.0).unwrap();
        let report = compute_full_report(&location, &instant);

        assert!((0.0..24.0).contains(&report.gmst));
        assert!((0.0..24.0).contains(&report.lmst));
        // Winter solstice geometry.
        assert_abs_diff_eq!(report.sun.declination, -23.43, epsilon = 0.3);
        assert!((1.470e8..=1.521e8).contains(&report.sun.distance));
        assert!((360_000.0..410_000.0).contains(&report.moon.distance));
        // Near local noon the sun stands low in the south.
        assert!(
            report.sun.altitude > 9.0 && report.sun.altitude < 16.0,
            "altitude {}",
            report.sun.altitude
        );
        assert!(
            report.sun.azimuth > 150.0 && report.sun.azimuth < 210.0,
            "azimuth {}",
            report.sun.azimuth
        );
        // Observer distance differs from the geocentric one by less than
        // one Earth radius.
        assert!((report.sun.observer_distance - report.sun.distance).abs() < 6_378.2);
        assert!((report.moon.observer_distance - report.moon.distance).abs() < 6_378.2);
        assert!((0.0..29.54).contains(&report.moon.age_days));
        assert!((0.0..=1.0).contains(&report.moon.phase_fraction));

        // The report's sun events agree with compute_sun_times.
        let times = compute_sun_times(&location, &instant);
        let mapped = epoch_seconds_mapper(&instant);
        assert_eq!(times.sunrise, mapped(report.sun.events.rise_set.rise));
        assert_eq!(times.sunset, mapped(report.sun.events.rise_set.set));
    }
}
