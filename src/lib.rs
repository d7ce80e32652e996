pub mod almanac;
pub mod constants;
pub mod coordinates;
pub mod errors;
pub mod moon;
pub mod refraction;
pub mod riseset;
pub mod sun;
pub mod time;

pub use almanac::{
    compute_full_report, compute_sun_times, Instant, Location, MoonReport, Report, SunReport,
    SunTimes, DEFAULT_DELTA_T,
};
pub use errors::SunMoonError;
pub use moon::{moon_position, MoonPhase, MoonPosition};
pub use riseset::{moon_events, sun_events, EventTime, RiseSet, SunEvents, Twilight};
pub use sun::{sun_position, SunPosition, ZodiacSign};
