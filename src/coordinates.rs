//! # Coordinate frames and transforms
//!
//! Small immutable value types for the three frames the engine works in
//! (ecliptic, equatorial, horizontal) and the transforms between them,
//! plus the observer's geocentric cartesian position on the WGS84
//! ellipsoid.
//!
//! Every transform returns a fresh value computed from its inputs; nothing
//! here is mutated in place. Cartesian scratch vectors are
//! [`nalgebra::Vector3`] in kilometers, in the equatorial frame aligned
//! with the vernal equinox of date.
//!
//! Conventions: all angles in radians; longitudes and right ascensions
//! normalized to [0, 2π); refraction is **not** applied by
//! [`equatorial_to_horizontal`] — that is the caller's concern (see
//! [`refraction`](crate::refraction)).

use nalgebra::{Matrix3, Vector3};

use crate::constants::{
    Hour, JulianDay, Kilometer, Radian, DPI, EARTH_RADIUS_KM, JULIAN_CENTURY, J2000_JD, RADEG,
    WGS84_INV_FLATTENING,
};

/// Ecliptic longitude/latitude pair, radians.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ecliptic {
    /// Ecliptic longitude in [0, 2π)
    pub lon: Radian,
    /// Ecliptic latitude
    pub lat: Radian,
}

/// Equatorial right ascension/declination pair, radians.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Equatorial {
    /// Right ascension in [0, 2π)
    pub ra: Radian,
    /// Declination in [−π/2, π/2]
    pub dec: Radian,
}

/// Topocentric right ascension/declination and distance, as seen from the
/// observer's location on the ellipsoid rather than the geocenter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Topocentric {
    pub ra: Radian,
    pub dec: Radian,
    pub distance: Kilometer,
}

/// Horizontal azimuth/altitude pair, radians. Azimuth is reckoned from
/// north through east, normalized to [0, 2π).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Horizontal {
    pub azimuth: Radian,
    pub altitude: Radian,
}

/// Observer's geocentric state for one instant.
///
/// Built once per computation by [`observer_site`]; carries both the
/// cartesian position (equinox frame, km) used for observer-to-body
/// distances and the scalar geometry reused by
/// [`geocentric_to_topocentric`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ObserverSite {
    /// Geocentric cartesian position in the vernal-equinox frame, km
    pub position: Vector3<f64>,
    /// Geocentric distance from the Earth's center, km
    pub radius: Kilometer,
    /// Geodetic east longitude, radians
    pub longitude: Radian,
    /// Geodetic latitude, radians
    pub latitude: Radian,
}

/// Normalize an angle into [0, 2π).
#[inline]
pub fn mod2pi(x: Radian) -> Radian {
    x.rem_euclid(DPI)
}

/// Mean obliquity of the ecliptic.
///
/// Secular polynomial in Julian centuries since J2000.0,
/// ε₀ = 23° 26′ 21.45″ with the IAU 1976 rates.
///
/// Arguments
/// ---------
/// * `tdt`: Terrestrial Dynamical Time as a Julian Date
///
/// Return
/// ------
/// * obliquity in radians
pub fn obliquity(tdt: JulianDay) -> Radian {
    let t = (tdt - J2000_JD) / JULIAN_CENTURY;
    (23.0 + (26.0 + 21.45 / 60.0) / 60.0 + t * (-46.815 + t * (-0.0006 + t * 0.00181)) / 3600.0)
        * RADEG
}

/// Transform ecliptic coordinates to equatorial coordinates.
///
/// Standard spherical rotation by the obliquity of the ecliptic at `tdt`.
/// Right ascension comes out of `atan2` and is normalized to [0, 2π);
/// declination out of `asin`.
pub fn ecliptic_to_equatorial(ecl: Ecliptic, tdt: JulianDay) -> Equatorial {
    let eps = obliquity(tdt);
    let (sineps, coseps) = eps.sin_cos();
    let sinlon = ecl.lon.sin();
    Equatorial {
        ra: mod2pi((sinlon * coseps - ecl.lat.tan() * sineps).atan2(ecl.lon.cos())),
        dec: (ecl.lat.sin() * coseps + ecl.lat.cos() * sineps * sinlon).asin(),
    }
}

/// Transform equatorial coordinates to horizontal coordinates.
///
/// Arguments
/// ---------
/// * `equ`: right ascension/declination (geocentric or topocentric — the
///   caller picks which pair is appropriate for the body)
/// * `latitude`: observer's geodetic latitude, radians
/// * `lmst`: local mean sidereal time **in radians** (hours × 15°)
///
/// Refraction is not applied here.
pub fn equatorial_to_horizontal(equ: Equatorial, latitude: Radian, lmst: Radian) -> Horizontal {
    let (sindec, cosdec) = equ.dec.sin_cos();
    let lha = lmst - equ.ra;
    let (sinlha, coslha) = lha.sin_cos();
    let (sinlat, coslat) = latitude.sin_cos();
    let n = -cosdec * sinlha;
    let d = sindec * coslat - cosdec * coslha * sinlat;
    Horizontal {
        azimuth: mod2pi(n.atan2(d)),
        altitude: (sindec * sinlat + cosdec * coslha * coslat).asin(),
    }
}

/// Transform geocentric equatorial coordinates to topocentric ones.
///
/// Subtracts the observer's position (rotated to the instant's sidereal
/// time) from the body's geocentric cartesian position. Only worth doing
/// for the Moon, whose horizontal parallax of ≈1° shifts rise/set times
/// noticeably; the Sun's ≈9″ parallax is ignored by the callers.
///
/// Arguments
/// ---------
/// * `equ`: geocentric right ascension/declination
/// * `distance`: geocentric distance of the body, km
/// * `site`: observer geometry from [`observer_site`]
/// * `lmst`: local mean sidereal time **in radians**
pub fn geocentric_to_topocentric(
    equ: Equatorial,
    distance: Kilometer,
    site: &ObserverSite,
    lmst: Radian,
) -> Topocentric {
    let (sindec, cosdec) = equ.dec.sin_cos();
    let (sinlst, coslst) = lmst.sin_cos();
    let (sinlat, coslat) = site.latitude.sin_cos();
    let rho = site.radius;
    let x = distance * cosdec * equ.ra.cos() - rho * coslat * coslst;
    let y = distance * cosdec * equ.ra.sin() - rho * coslat * sinlst;
    let z = distance * sindec - rho * sinlat;
    let topo_distance = (x * x + y * y + z * z).sqrt();
    Topocentric {
        ra: mod2pi(y.atan2(x)),
        dec: (z / topo_distance).asin(),
        distance: topo_distance,
    }
}

/// Spherical → cartesian, km.
pub fn polar_to_cartesian(lon: Radian, lat: Radian, distance: Kilometer) -> Vector3<f64> {
    let rcd = lat.cos() * distance;
    Vector3::new(rcd * lon.cos(), rcd * lon.sin(), distance * lat.sin())
}

/// Rotation about the polar (z) axis by `angle`.
fn rotz(angle: Radian) -> Matrix3<f64> {
    let (s, c) = angle.sin_cos();
    Matrix3::new(c, -s, 0.0, s, c, 0.0, 0.0, 0.0, 1.0)
}

/// Observer's geocentric cartesian position from geodetic coordinates.
///
/// Converts geodetic to geocentric latitude on the WGS84 ellipsoid,
/// computes the geocentric radius, then rotates the Greenwich-meridian
/// frame onto the vernal-equinox frame by the Earth's rotation angle
/// `gmst/24 · 2π`.
///
/// Arguments
/// ---------
/// * `longitude`, `latitude`: geodetic coordinates, radians, east/north positive
/// * `height`: height above the ellipsoid, km
/// * `gmst`: Greenwich mean sidereal time, fractional hours
pub fn observer_site(
    longitude: Radian,
    latitude: Radian,
    height: Kilometer,
    gmst: Hour,
) -> ObserverSite {
    let co = latitude.cos();
    let si = latitude.sin();
    let fl = {
        let f = 1.0 - 1.0 / WGS84_INV_FLATTENING;
        f * f
    };
    let si2 = si * si;
    let u = 1.0 / (co * co + fl * si2).sqrt();
    let a = EARTH_RADIUS_KM * u + height;
    let b = EARTH_RADIUS_KM * fl * u + height;
    let radius = (a * a * co * co + b * b * si2).sqrt();
    // geocentric latitude, same sign as the geodetic one
    let geocentric_lat = (a * co / radius).acos().copysign(latitude);

    let greenwich = polar_to_cartesian(longitude, geocentric_lat, radius);
    let rotangle = gmst / 24.0 * DPI;
    ObserverSite {
        position: rotz(rotangle) * greenwich,
        radius,
        longitude,
        latitude,
    }
}
