//! # Constants and type definitions for sunmoon
//!
//! This module centralizes the **physical constants**, **conversion factors**, and **common type
//! definitions** used throughout the `sunmoon` library.
//!
//! ## Overview
//!
//! - Unit conversions (degrees ↔ radians, hours ↔ radians, days ↔ seconds)
//! - Reference epochs for the day-count and sidereal-time formulas
//! - Earth ellipsoid parameters (WGS84)
//! - Core type aliases used across the crate
//!
//! The orbital elements of the Sun and the Moon are local to the
//! [`sun`](crate::sun) and [`moon`](crate::moon) modules; only quantities shared by
//! more than one module live here.

// -------------------------------------------------------------------------------------------------
// Physical constants and unit conversions
// -------------------------------------------------------------------------------------------------

/// 2π, useful for trigonometric conversions
pub const DPI: f64 = 2. * std::f64::consts::PI;

/// Number of seconds in a day
pub const SECONDS_PER_DAY: f64 = 86_400.0;

/// Degrees → radians
pub const RADEG: f64 = std::f64::consts::PI / 180.0;

/// Hours → radians (15° per hour)
pub const RADH: f64 = DPI / 24.0;

/// JD of the J2000.0 epoch (2000-01-01 12:00 TT)
pub const J2000_JD: f64 = 2_451_545.0;

/// Days per Julian century
pub const JULIAN_CENTURY: f64 = 36_525.0;

/// Anchor of the 1900-based day-count formula. The −64 day offset
/// compensates the `trunc(30.6001 · (month + 1))` month term so that the
/// formula lands on the correct JD inside its 1901–2100 validity window.
pub const JD_ANCHOR_1900: f64 = 2_415_020.5 - 64.0;

/// Ratio of a mean solar day to a mean sidereal day
pub const SIDEREAL_RATE: f64 = 1.002_737_909;

/// Inverse of [`SIDEREAL_RATE`], used when recovering UT from sidereal time
pub const UT_PER_SIDEREAL: f64 = 0.997_269_566_3;

/// Earth equatorial radius in kilometers (GRS80/WGS84 semi-major axis)
pub const EARTH_RADIUS_KM: f64 = 6_378.137;

/// WGS84 inverse flattening of the Earth ellipsoid
pub const WGS84_INV_FLATTENING: f64 = 298.257_223_563;

/// Astronomical unit in kilometers, as used by the solar distance series.
/// Deliberately the series' own scaling constant, not the IAU 2012 value.
pub const AU_KM: f64 = 149_598_500.0;

// -------------------------------------------------------------------------------------------------
// Calendar validity window of the day-count formula
// -------------------------------------------------------------------------------------------------

/// First calendar date (year, month, day) the day-count formula is valid for
pub const VALID_FROM: (i32, u8, u8) = (1901, 3, 1);

/// Last calendar date (year, month, day) the day-count formula is valid for
pub const VALID_UNTIL: (i32, u8, u8) = (2100, 2, 28);

// -------------------------------------------------------------------------------------------------
// Type aliases
// -------------------------------------------------------------------------------------------------

/// Angle in degrees
pub type Degree = f64;
/// Angle in radians
pub type Radian = f64;
/// Time of day or sidereal time in fractional hours
pub type Hour = f64;
/// Distance in kilometers
pub type Kilometer = f64;
/// Julian Date (days)
pub type JulianDay = f64;
