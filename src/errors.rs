use thiserror::Error;

/// Errors raised at the crate boundary.
///
/// The ephemeris core itself is a pure function of its inputs and never
/// fails: inverse-trigonometric domain violations mean "the event does not
/// occur" and are resolved into [`EventTime::DoesNotOccur`](crate::riseset::EventTime)
/// rather than an error. What remains are the documented preconditions,
/// validated when constructing [`Location`](crate::almanac::Location) and
/// [`Instant`](crate::almanac::Instant).
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SunMoonError {
    /// The day-count formula is only valid from 1901-03-01 to 2100-02-28.
    #[error("date {year}-{month:02}-{day:02} outside the validity window 1901-03-01..2100-02-28")]
    DateOutOfRange { year: i32, month: u8, day: u8 },

    #[error("latitude {0}° outside [-90, 90]")]
    InvalidLatitude(f64),

    #[error("longitude {0}° outside [-180, 180]")]
    InvalidLongitude(f64),

    #[error("invalid calendar date-time: {0}")]
    InvalidDateTime(String),
}
