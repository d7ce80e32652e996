//! # Rise, transit, set and twilight solver
//!
//! Event times for one body on one local calendar day, accurate to about
//! 1–2 minutes for the Sun and about 5 minutes for the Moon.
//!
//! The method brackets the UTC day with two coordinate samples (24h apart
//! for the Sun, 12h for the Moon — the Moon moves too fast for a full-day
//! bracket), converts each to naive sidereal event times via the hour-angle
//! formula, unwraps and re-anchors them so a linear interpolation between
//! the samples stays monotonic, interpolates, and converts the result back
//! to UT. Rise and set then receive a time offset for refraction, parallax
//! and semi-diameter; the transit does not.
//!
//! Intermediate hour values are deliberately left unwrapped (they may
//! exceed 24h or go slightly negative) until the local-day correction has
//! run; only the final values are reduced into [0, 24).
//!
//! "The body never reaches that altitude today" is a domain condition, not
//! a fault: it surfaces as [`EventTime::DoesNotOccur`], never as an error.
//! Internally the solver lets NaN flow through the arithmetic and tags the
//! result at the public boundary.
//!
//! The local-day correction is not recursive: each public solver evaluates
//! the plain per-UTC-day core for the requested day and, when an event
//! lands outside the local calendar day, for the single adjacent UTC day
//! that could supply the missing event.

use serde::Serialize;

use crate::constants::{Hour, JulianDay, Radian, RADEG, SECONDS_PER_DAY};
use crate::moon::{moon_position, MoonPosition};
use crate::sun::{sun_position, SunPosition};
use crate::time::{gmst, gmst_to_ut, jd_at_midnight};

/// Sun-center depression defining civil twilight
pub const CIVIL_TWILIGHT_ALT: Radian = -6.0 * RADEG;
/// Sun-center depression defining nautical twilight
pub const NAUTICAL_TWILIGHT_ALT: Radian = -12.0 * RADEG;
/// Sun-center depression defining astronomical twilight
pub const ASTRONOMICAL_TWILIGHT_ALT: Radian = -18.0 * RADEG;

/// Standard refraction at the horizon, 34 arcminutes
const HORIZON_REFRACTION: Radian = 34.0 / 60.0 * RADEG;
/// Sidereal hours elapsed per solar day, as used by the interpolation
const SIDEREAL_DAY_HOURS: f64 = 24.07;
/// Sidereal scaling of the longitude term when re-anchoring to 0h local UT
const LONGITUDE_SIDEREAL_FACTOR: f64 = 1.002_738;

/// A daily event time: either a local fractional hour in [0, 24) or an
/// explicit "does not occur on this calendar day".
///
/// The marker is a real variant, not a sentinel value, so that a legitimate
/// midnight event (`Occurs(0.0)`) can never be confused with "no event".
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum EventTime {
    Occurs(Hour),
    DoesNotOccur,
}

impl EventTime {
    /// Tag a raw hour value; NaN (the internal domain-error sentinel)
    /// becomes [`EventTime::DoesNotOccur`].
    fn from_hour(hour: f64) -> EventTime {
        if hour.is_nan() {
            EventTime::DoesNotOccur
        } else {
            EventTime::Occurs(hour)
        }
    }

    /// The fractional hour, if the event occurs.
    pub fn hour(&self) -> Option<Hour> {
        match self {
            EventTime::Occurs(h) => Some(*h),
            EventTime::DoesNotOccur => None,
        }
    }

    pub fn occurs(&self) -> bool {
        matches!(self, EventTime::Occurs(_))
    }

    /// `"HH:MM"` rendering for diagnostics, `"--"` when the event does not
    /// occur.
    pub fn hhmm(&self) -> String {
        match self {
            EventTime::DoesNotOccur => "--".to_string(),
            EventTime::Occurs(h) => {
                let mut hours = h.floor() as i64;
                let mut minutes = ((h - h.floor()) * 60.0).round() as i64;
                if minutes >= 60 {
                    hours += 1;
                    minutes -= 60;
                }
                format!("{hours:02}:{minutes:02}")
            }
        }
    }
}

impl std::fmt::Display for EventTime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.hhmm())
    }
}

/// Transit, rise and set of a body on one local calendar day.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RiseSet {
    pub transit: EventTime,
    pub rise: EventTime,
    pub set: EventTime,
}

/// Morning/evening pair of one twilight band.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Twilight {
    pub morning: EventTime,
    pub evening: EventTime,
}

/// Solar events of one local calendar day.
///
/// Each twilight band resolves independently: at high latitudes the Sun can
/// rise and set normally while never reaching −18°, so the astronomical
/// pair is [`EventTime::DoesNotOccur`] while `rise_set` holds valid times.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SunEvents {
    pub rise_set: RiseSet,
    pub civil: Twilight,
    pub nautical: Twilight,
    pub astronomical: Twilight,
}

/// The coordinate sample the solver needs from a position model.
#[derive(Debug, Clone, Copy)]
struct BodySample {
    ra: Radian,
    dec: Radian,
    diameter: Radian,
    parallax: Radian,
}

impl From<&SunPosition> for BodySample {
    fn from(sun: &SunPosition) -> Self {
        BodySample {
            ra: sun.equatorial.ra,
            dec: sun.equatorial.dec,
            diameter: sun.diameter,
            parallax: sun.parallax,
        }
    }
}

impl From<&MoonPosition> for BodySample {
    fn from(moon: &MoonPosition) -> Self {
        // Geocentric pair; the parallax handling happens through the
        // semi-diameter/parallax time correction, not the coordinates.
        BodySample {
            ra: moon.equatorial.ra,
            dec: moon.equatorial.dec,
            diameter: moon.diameter,
            parallax: moon.parallax,
        }
    }
}

/// Unnormalized event hours for one sample or one UTC day. NaN marks "the
/// body never reaches the target altitude".
#[derive(Debug, Clone, Copy)]
struct RawEvents {
    transit: f64,
    rise: f64,
    set: f64,
}

/// Naive sidereal transit/rise/set of a fixed coordinate pair.
///
/// `cos H = (sin h − sin φ sin δ) / (cos φ cos δ)`; an argument outside
/// [−1, 1] means the body never crosses altitude `h` (circumpolar or never
/// visible) and yields NaN for rise and set.
fn sidereal_events(sample: &BodySample, lon: Radian, lat: Radian, target_alt: Radian) -> RawEvents {
    let cos_arc = (target_alt.sin() - lat.sin() * sample.dec.sin())
        / (lat.cos() * sample.dec.cos());
    let half_arc = if (-1.0..=1.0).contains(&cos_arc) {
        cos_arc.acos()
    } else {
        f64::NAN
    };
    let to_hours = |angle: Radian| angle.to_degrees() / 15.0;
    RawEvents {
        transit: to_hours(sample.ra - lon).rem_euclid(24.0),
        rise: (24.0 + to_hours(-half_arc + sample.ra - lon)).rem_euclid(24.0),
        set: to_hours(half_arc + sample.ra - lon).rem_euclid(24.0),
    }
}

/// Sidereal time of the event from the two bracketing samples and the
/// sidereal time at 0h UT.
fn interpolate(gmst0: f64, gmst1: f64, gmst2: f64, timefactor: f64) -> f64 {
    (timefactor * SIDEREAL_DAY_HOURS * gmst1 - gmst0 * (gmst2 - gmst1))
        / (timefactor * SIDEREAL_DAY_HOURS + gmst1 - gmst2)
}

/// If the two samples straddle the 24h → 0h sidereal boundary, lift the
/// later one by a day.
fn unwrap_day(first: f64, second: &mut f64) {
    if first > *second && (first - *second).abs() > 18.0 {
        *second += 24.0;
    }
}

/// UT event times for one UTC day, from two bracketing coordinate samples.
///
/// Arguments
/// ---------
/// * `jd0_ut`: JD at 0h UT of the day
/// * `c1`, `c2`: coordinate samples at the start and end of the bracket
/// * `timefactor`: day fraction between the samples (1 for the Sun, 0.5 for
///   the Moon)
/// * `target_altitude`: `Some(h)` solves for the center crossing altitude
///   `h` (twilight); `None` solves for the upper limb at the horizon, i.e.
///   applies the semi-diameter/parallax/refraction time correction.
///
/// Return
/// ------
/// * UT hours, unnormalized; rise/set may be NaN when the crossing does not
///   happen, and any value may lie slightly outside [0, 24).
fn events_utc(
    jd0_ut: JulianDay,
    c1: &BodySample,
    c2: &BodySample,
    lon: Radian,
    lat: Radian,
    timefactor: f64,
    target_altitude: Option<Radian>,
) -> RawEvents {
    // True altitude of the body center for rise/set; stays 0 for twilight,
    // where the requested depression already encodes the geometry.
    let correction_alt = match target_altitude {
        None => 0.5 * c1.diameter - c1.parallax + HORIZON_REFRACTION,
        Some(_) => 0.0,
    };
    let h = target_altitude.unwrap_or(0.0);

    let r1 = sidereal_events(c1, lon, lat, h);
    let mut r2 = sidereal_events(c2, lon, lat, h);
    unwrap_day(r1.transit, &mut r2.transit);
    unwrap_day(r1.rise, &mut r2.rise);
    unwrap_day(r1.set, &mut r2.set);
    let mut r1 = r1;

    let t0 = gmst(jd0_ut);
    // Sidereal time at 0h local UT for the observer's longitude.
    let mut t02 = t0 - lon.to_degrees() / 15.0 * LONGITUDE_SIDEREAL_FACTOR;
    if t02 < 0.0 {
        t02 += 24.0;
    }
    // Re-anchor both samples above T0 so the interpolation is monotonic.
    let anchor = |a: &mut f64, b: &mut f64| {
        if *a < t02 {
            *a += 24.0;
            *b += 24.0;
        }
    };
    anchor(&mut r1.transit, &mut r2.transit);
    anchor(&mut r1.rise, &mut r2.rise);
    anchor(&mut r1.set, &mut r2.set);

    // Time offset equivalent to the altitude correction at the mean
    // declination; widens the day (earlier rise, later set).
    let dec_mean = 0.5 * (c1.dec + c2.dec);
    let psi = (lat.sin() / dec_mean.cos()).acos();
    let y = (correction_alt.sin() / psi.sin()).asin();
    let dt = 240.0 * y.to_degrees() / dec_mean.cos() / 3600.0;

    RawEvents {
        transit: gmst_to_ut(jd0_ut, interpolate(t0, r1.transit, r2.transit, timefactor)),
        rise: gmst_to_ut(jd0_ut, interpolate(t0, r1.rise, r2.rise, timefactor) - dt),
        set: gmst_to_ut(jd0_ut, interpolate(t0, r1.set, r2.set, timefactor) + dt),
    }
}

/// Sun samples bracketing one UTC day (0h and 24h, in TDT).
fn sun_samples(jd0_ut: JulianDay, delta_t: f64) -> (BodySample, BodySample) {
    let tdt = jd0_ut + delta_t / SECONDS_PER_DAY;
    let c1 = sun_position(tdt, None);
    let c2 = sun_position(tdt + 1.0, None);
    ((&c1).into(), (&c2).into())
}

/// Moon samples bracketing half a UTC day (0h and 12h, in TDT).
fn moon_samples(jd0_ut: JulianDay, delta_t: f64) -> (BodySample, BodySample) {
    let tdt = jd0_ut + delta_t / SECONDS_PER_DAY;
    let s1 = sun_position(tdt, None);
    let m1 = moon_position(&s1, tdt, None);
    let s2 = sun_position(tdt + 0.5, None);
    let m2 = moon_position(&s2, tdt + 0.5, None);
    ((&m1).into(), (&m2).into())
}

/// Moon events of one UTC day, in unnormalized UT hours.
fn moon_day_events(jd0_ut: JulianDay, delta_t: f64, lon: Radian, lat: Radian) -> RawEvents {
    let (c1, c2) = moon_samples(jd0_ut, delta_t);
    events_utc(jd0_ut, &c1, &c2, lon, lat, 0.5, None)
}

/// Solar rise, transit, set and the three twilight bands for the local
/// calendar day containing `jd`.
///
/// Arguments
/// ---------
/// * `jd`: any JD within the UTC day of interest
/// * `delta_t`: TT − UT in seconds
/// * `lon`, `lat`: observer, radians, east/north positive
/// * `utc_offset`: local zone offset in hours, used only to roll events
///   onto the local calendar day; the returned hours are local
pub fn sun_events(
    jd: JulianDay,
    delta_t: f64,
    lon: Radian,
    lat: Radian,
    utc_offset: Hour,
) -> SunEvents {
    let jd0 = jd_at_midnight(jd);
    let (c1, c2) = sun_samples(jd0, delta_t);
    let mut ev = events_utc(jd0, &c1, &c2, lon, lat, 1.0, None);

    // Local-day correction: splice in the one adjacent UTC day that owns
    // any event falling outside today's local calendar day. NaN compares
    // false everywhere, so missing events are left untouched.
    if utc_offset > 0.0 {
        let limit = 24.0 - utc_offset;
        if ev.rise >= limit || ev.transit >= limit || ev.set >= limit {
            let (a1, a2) = sun_samples(jd0 + 1.0, delta_t);
            let adj = events_utc(jd0 + 1.0, &a1, &a2, lon, lat, 1.0, None);
            if ev.rise >= limit {
                ev.rise = adj.rise;
            }
            if ev.transit >= limit {
                ev.transit = adj.transit;
            }
            if ev.set >= limit {
                ev.set = adj.set;
            }
        }
    } else if utc_offset < 0.0 {
        let limit = -utc_offset;
        if ev.rise < limit || ev.transit < limit || ev.set < limit {
            let (a1, a2) = sun_samples(jd0 - 1.0, delta_t);
            let adj = events_utc(jd0 - 1.0, &a1, &a2, lon, lat, 1.0, None);
            if ev.rise < limit {
                ev.rise = adj.rise;
            }
            if ev.transit < limit {
                ev.transit = adj.transit;
            }
            if ev.set < limit {
                ev.set = adj.set;
            }
        }
    }

    let to_local = |ut: f64| EventTime::from_hour((ut + utc_offset).rem_euclid(24.0));
    let twilight = |target: Radian| {
        let t = events_utc(jd0, &c1, &c2, lon, lat, 1.0, Some(target));
        Twilight {
            morning: to_local(t.rise),
            evening: to_local(t.set),
        }
    };

    SunEvents {
        rise_set: RiseSet {
            transit: to_local(ev.transit),
            rise: to_local(ev.rise),
            set: to_local(ev.set),
        },
        civil: twilight(CIVIL_TWILIGHT_ALT),
        nautical: twilight(NAUTICAL_TWILIGHT_ALT),
        astronomical: twilight(ASTRONOMICAL_TWILIGHT_ALT),
    }
}

/// Lunar rise, transit and set for the local calendar day containing `jd`.
///
/// Unlike the Sun, the Moon can legitimately skip an event on a local
/// calendar day (it rose yesterday and will next rise tomorrow); such days
/// report [`EventTime::DoesNotOccur`] rather than an aliased time. This is
/// resolved by checking whether the adjacent UTC day's event actually lands
/// inside today's local day before splicing it in.
pub fn moon_events(
    jd: JulianDay,
    delta_t: f64,
    lon: Radian,
    lat: Radian,
    utc_offset: Hour,
) -> RiseSet {
    let jd0 = jd_at_midnight(jd);
    let mut ev = moon_day_events(jd0, delta_t, lon, lat);

    if utc_offset > 0.0 {
        let limit = 24.0 - utc_offset;
        let outside = |x: f64| x >= limit || x < -utc_offset;
        if outside(ev.transit) || outside(ev.rise) || outside(ev.set) {
            // An event on today's local day can only come from yesterday's
            // UTC day, where it shows up as an hour value ≥ 24 − offset.
            let prev = moon_day_events(jd0 - 1.0, delta_t, lon, lat);
            let splice = |today: &mut f64, yesterday: f64| {
                if outside(*today) {
                    if yesterday < limit || yesterday >= 48.0 - utc_offset {
                        *today = f64::NAN;
                    } else if yesterday >= 24.0 {
                        *today = yesterday - 24.0;
                    } else {
                        *today = yesterday;
                    }
                }
            };
            splice(&mut ev.transit, prev.transit);
            splice(&mut ev.rise, prev.rise);
            splice(&mut ev.set, prev.set);
        }
    } else if utc_offset < 0.0 {
        let limit = -utc_offset;
        if ev.transit < limit || ev.rise < limit || ev.set < limit {
            // Mirror of the positive branch: the replacement comes from
            // tomorrow's UTC day and must itself land before 0h local.
            let next = moon_day_events(jd0 + 1.0, delta_t, lon, lat);
            let splice = |today: &mut f64, tomorrow: f64| {
                if *today < limit {
                    if tomorrow > limit {
                        *today = f64::NAN;
                    } else {
                        *today = tomorrow;
                    }
                }
            };
            splice(&mut ev.transit, next.transit);
            splice(&mut ev.rise, next.rise);
            splice(&mut ev.set, next.set);
        }
    }

    let to_local = |ut: f64| EventTime::from_hour((ut + utc_offset).rem_euclid(24.0));
    RiseSet {
        transit: to_local(ev.transit),
        rise: to_local(ev.rise),
        set: to_local(ev.set),
    }
}
