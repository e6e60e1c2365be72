//! Reconstruction of target positions on the WGS84 ellipsoid.
//!
//! A slant range and an azimuth measured by the radar, together with
//! the Mode C altitude, are enough to place the target: the elevation
//! angle comes from the spherical-Earth relation, then the local polar
//! coordinates are rotated and translated into geocentric ECEF and
//! refined back to geodetic coordinates.

use serde::Serialize;
use std::str::FromStr;

/// WGS84 semi-major axis, in meters
pub const WGS84_A: f64 = 6_378_137.0;
/// WGS84 first eccentricity squared
pub const WGS84_E2: f64 = 0.00669437999014;
/// WGS84 semi-minor axis, in meters
pub const WGS84_B: f64 = 6_356_752.3142;

/// Earth radius used for the elevation angle, in meters
pub const EARTH_RADIUS: f64 = 6_371_000.0;

/// One nautical mile, in meters
pub const NM: f64 = 1852.;

/// A position on the WGS84 ellipsoid
#[derive(Debug, PartialEq, Serialize, Copy, Clone, Default)]
pub struct GeodeticPosition {
    /// Latitude, in degrees
    pub latitude: f64,
    /// Longitude, in degrees
    pub longitude: f64,
    /// Height above the ellipsoid, in meters
    pub altitude: f64,
}

/// Location of the radar head
#[derive(Debug, PartialEq, Serialize, Copy, Clone)]
pub struct RadarSite {
    /// Latitude, in degrees
    pub latitude: f64,
    /// Longitude, in degrees
    pub longitude: f64,
    /// Height above the ellipsoid, in meters
    pub height: f64,
}

/// The radar of the Barcelona airport dataset
pub const DEFAULT_SITE: RadarSite = RadarSite {
    latitude: 41.3007023,
    longitude: 2.1020588,
    height: 2.007 + 25.25,
};

impl Default for RadarSite {
    fn default() -> Self {
        DEFAULT_SITE
    }
}

impl FromStr for RadarSite {
    type Err = String;

    /// Parses a "latitude,longitude,height" triplet (degrees, meters)
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.split(',');
        let mut next = |name: &str| {
            parts
                .next()
                .ok_or(format!("missing {name}"))?
                .trim()
                .parse::<f64>()
                .map_err(|e| format!("invalid {name}: {e}"))
        };
        let site = RadarSite {
            latitude: next("latitude")?,
            longitude: next("longitude")?,
            height: next("height")?,
        };
        if parts.next().is_some() {
            return Err("expected latitude,longitude,height".to_string());
        }
        Ok(site)
    }
}

fn rotation_matrix(latitude: f64, longitude: f64) -> [[f64; 3]; 3] {
    let (sin_lat, cos_lat) = (libm::sin(latitude), libm::cos(latitude));
    let (sin_lon, cos_lon) = (libm::sin(longitude), libm::cos(longitude));
    [
        [-sin_lon, cos_lon, 0.],
        [-sin_lat * cos_lon, -sin_lat * sin_lon, cos_lat],
        [cos_lat * cos_lon, cos_lat * sin_lon, sin_lat],
    ]
}

fn translation_vector(latitude: f64, longitude: f64, height: f64) -> [f64; 3] {
    let nu = WGS84_A
        / libm::sqrt(1. - WGS84_E2 * libm::sin(latitude) * libm::sin(latitude));
    [
        (nu + height) * libm::cos(latitude) * libm::cos(longitude),
        (nu + height) * libm::cos(latitude) * libm::sin(longitude),
        (nu * (1. - WGS84_E2) + height) * libm::sin(latitude),
    ]
}

/// Local polar coordinates (range in meters, azimuth and elevation in
/// radians) to local Cartesian, x east, y north, z up.
pub fn polar_to_cartesian(rho: f64, theta: f64, elevation: f64) -> [f64; 3] {
    [
        rho * libm::cos(elevation) * libm::sin(theta),
        rho * libm::cos(elevation) * libm::cos(theta),
        rho * libm::sin(elevation),
    ]
}

/// Local Cartesian coordinates at a site (latitude and longitude in
/// radians, height in meters) to geocentric ECEF.
pub fn cartesian_to_geocentric(
    cartesian: [f64; 3],
    latitude: f64,
    longitude: f64,
    height: f64,
) -> [f64; 3] {
    let rotation = rotation_matrix(latitude, longitude);
    let translation = translation_vector(latitude, longitude, height);
    let mut geocentric = [0.; 3];
    for (i, value) in geocentric.iter_mut().enumerate() {
        // transposed rotation, the matrix is orthonormal
        *value = rotation[0][i] * cartesian[0]
            + rotation[1][i] * cartesian[1]
            + rotation[2][i] * cartesian[2]
            + translation[i];
    }
    geocentric
}

/// Geocentric ECEF coordinates back to geodetic, by iterative
/// refinement of the latitude (at most 50 rounds, 1e-12 rad).
pub fn geocentric_to_geodetic([x, y, z]: [f64; 3]) -> GeodeticPosition {
    let dxy = libm::sqrt(x * x + y * y);

    // close to the polar axis the longitude is meaningless
    if libm::fabs(x) < 1e-10 && libm::fabs(y) < 1e-10 {
        return GeodeticPosition {
            latitude: if z >= 0. { 90. } else { -90. },
            longitude: 0.,
            altitude: libm::fabs(z) - WGS84_B,
        };
    }

    let mut latitude = libm::atan(
        (z / dxy) / (1. - (WGS84_A * WGS84_E2) / libm::sqrt(dxy * dxy + z * z)),
    );
    let mut nu = WGS84_A
        / libm::sqrt(1. - WGS84_E2 * libm::sin(latitude) * libm::sin(latitude));
    let mut altitude = dxy / libm::cos(latitude) - nu;
    let mut previous = if latitude >= 0. { -0.1 } else { 0.1 };

    let mut rounds = 0;
    while libm::fabs(latitude - previous) > 1e-12 && rounds < 50 {
        previous = latitude;
        latitude = libm::atan(
            (z * (1. + altitude / nu))
                / (dxy * ((1. - WGS84_E2) + altitude / nu)),
        );
        nu = WGS84_A
            / libm::sqrt(
                1. - WGS84_E2 * libm::sin(latitude) * libm::sin(latitude),
            );
        altitude = dxy / libm::cos(latitude) - nu;
        rounds += 1;
    }

    GeodeticPosition {
        latitude: latitude.to_degrees(),
        longitude: libm::atan2(y, x).to_degrees(),
        altitude,
    }
}

/// Geodetic coordinates (degrees, meters) to geocentric ECEF.
pub fn geodetic_to_geocentric(position: &GeodeticPosition) -> [f64; 3] {
    translation_vector(
        position.latitude.to_radians(),
        position.longitude.to_radians(),
        position.altitude,
    )
}

/// Elevation angle of a target seen from the site, in radians.
///
/// The slant range and the target altitude are in meters. None when
/// the measurement is geometrically inconsistent (null range, or a
/// sine ratio outside [-1, 1]).
pub fn elevation_angle(
    rho: f64,
    altitude: f64,
    site: &RadarSite,
) -> Option<f64> {
    if rho <= 0. {
        return None;
    }
    let num = 2. * EARTH_RADIUS * (altitude - site.height)
        + altitude * altitude
        - site.height * site.height
        - rho * rho;
    let den = 2. * rho * (EARTH_RADIUS + site.height);
    let ratio = num / den;
    if libm::fabs(ratio) > 1. {
        return None;
    }
    Some(libm::asin(ratio))
}

/// Geodetic position of a target from its measured polar coordinates.
///
/// The slant range is in NM, the azimuth in degrees, the target
/// altitude in meters. A degenerate geometry (including a strictly
/// null elevation) yields None.
pub fn track_position(
    rho: f64,
    theta: f64,
    altitude: f64,
    site: &RadarSite,
) -> Option<GeodeticPosition> {
    let range = rho * NM;
    let elevation = elevation_angle(range, altitude, site)?;
    if elevation == 0. {
        return None;
    }
    let local = polar_to_cartesian(range, theta.to_radians(), elevation);
    let geocentric = cartesian_to_geocentric(
        local,
        site.latitude.to_radians(),
        site.longitude.to_radians(),
        site.height,
    );
    Some(geocentric_to_geodetic(geocentric))
}

/// Center of the stereographic plane shared by all radars of the
/// Barcelona dataset
pub const PROJECTION_CENTER: GeodeticPosition = GeodeticPosition {
    latitude: 41.10904,
    longitude: 1.226947,
    altitude: 3438.954,
};

/// A position projected on the stereographic plane
#[derive(Debug, PartialEq, Serialize, Copy, Clone)]
pub struct StereographicPosition {
    /// Easting, in meters
    pub u: f64,
    /// Northing, in meters
    pub v: f64,
    /// Height above the projection plane, in meters
    pub height: f64,
}

/// Azimuthal stereographic projection around a center point, the plane
/// on which trajectories are compared pairwise.
#[derive(Debug, PartialEq, Copy, Clone)]
pub struct Stereographic {
    pub center: GeodeticPosition,
}

impl Default for Stereographic {
    fn default() -> Self {
        Self {
            center: PROJECTION_CENTER,
        }
    }
}

impl Stereographic {
    pub fn project(&self, position: &GeodeticPosition) -> StereographicPosition {
        let latitude = self.center.latitude.to_radians();
        let longitude = self.center.longitude.to_radians();

        let geocentric = geodetic_to_geocentric(position);
        let rotation = rotation_matrix(latitude, longitude);
        let translation =
            translation_vector(latitude, longitude, self.center.altitude);

        let mut local = [0.; 3];
        for (i, value) in local.iter_mut().enumerate() {
            *value = rotation[i][0] * (geocentric[0] - translation[0])
                + rotation[i][1] * (geocentric[1] - translation[1])
                + rotation[i][2] * (geocentric[2] - translation[2]);
        }

        // radius of curvature in the meridian at the center
        let r_s = (WGS84_A * (1. - WGS84_E2))
            / libm::pow(
                1. - WGS84_E2 * libm::sin(latitude) * libm::sin(latitude),
                1.5,
            );

        let dxy2 = local[0] * local[0] + local[1] * local[1];
        let height = libm::sqrt(
            dxy2
                + (local[2] + self.center.altitude + r_s)
                    * (local[2] + self.center.altitude + r_s),
        ) - r_s;
        let k = (2. * r_s)
            / (2. * r_s + self.center.altitude + local[2] + height);

        StereographicPosition {
            u: k * local[0],
            v: k * local[1],
            height,
        }
    }
}

/// Distance between two projected positions, in NM
pub fn stereographic_distance(
    first: &StereographicPosition,
    second: &StereographicPosition,
) -> f64 {
    let du = first.u - second.u;
    let dv = first.v - second.v;
    libm::sqrt(du * du + dv * dv) / NM
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_geocentric_at_equator() {
        let position = GeodeticPosition {
            latitude: 0.,
            longitude: 0.,
            altitude: 0.,
        };
        let [x, y, z] = geodetic_to_geocentric(&position);
        assert_relative_eq!(x, WGS84_A);
        assert_relative_eq!(y, 0.);
        assert_relative_eq!(z, 0., epsilon = 1e-9);
    }

    #[test]
    fn test_geodetic_roundtrip() {
        let position = GeodeticPosition {
            latitude: 41.3,
            longitude: 2.1,
            altitude: 1000.,
        };
        let back = geocentric_to_geodetic(geodetic_to_geocentric(&position));
        assert_relative_eq!(back.latitude, 41.3, max_relative = 1e-9);
        assert_relative_eq!(back.longitude, 2.1, max_relative = 1e-9);
        assert_relative_eq!(back.altitude, 1000., max_relative = 1e-6);
    }

    #[test]
    fn test_polar_axis() {
        let position = geocentric_to_geodetic([0., 0., WGS84_B]);
        assert_relative_eq!(position.latitude, 90.);
        assert_relative_eq!(position.longitude, 0.);
        assert_relative_eq!(position.altitude, 0., epsilon = 1e-6);

        let south = geocentric_to_geodetic([0., 0., -WGS84_B - 1000.]);
        assert_relative_eq!(south.latitude, -90.);
        assert_relative_eq!(south.altitude, 1000., epsilon = 1e-6);
    }

    #[test]
    fn test_elevation_angle() {
        // a target at 10 NM, 1000 m high, seen from the default site
        let elevation =
            elevation_angle(10. * NM, 1000., &DEFAULT_SITE).unwrap();
        assert_relative_eq!(elevation, 0.0511, max_relative = 1e-3);
    }

    #[test]
    fn test_elevation_angle_degenerate() {
        assert!(elevation_angle(0., 1000., &DEFAULT_SITE).is_none());
        // so close and so high that the sine ratio leaves [-1, 1]
        assert!(elevation_angle(18.52, 10000., &DEFAULT_SITE).is_none());
    }

    #[test]
    fn test_track_position_east() {
        let position =
            track_position(10., 90., 1000., &DEFAULT_SITE).unwrap();
        assert_relative_eq!(
            position.latitude,
            DEFAULT_SITE.latitude,
            max_relative = 1e-3
        );
        assert!(position.longitude > 2.30 && position.longitude < 2.35);
        assert!(position.altitude > 900. && position.altitude < 1100.);
    }

    #[test]
    fn test_track_position_degenerate() {
        assert!(track_position(0., 90., 1000., &DEFAULT_SITE).is_none());
        assert!(track_position(0.01, 90., 10000., &DEFAULT_SITE).is_none());
    }

    #[test]
    fn test_stereographic_distance() {
        let projection = Stereographic::default();
        let first = projection.project(&GeodeticPosition {
            latitude: 41.,
            longitude: 1.226947,
            altitude: 0.,
        });
        let second = projection.project(&GeodeticPosition {
            latitude: 41. + 1. / 60.,
            longitude: 1.226947,
            altitude: 0.,
        });
        // one arcminute of latitude is one nautical mile
        assert_relative_eq!(
            stereographic_distance(&first, &second),
            1.,
            max_relative = 1e-2
        );
    }

    #[test]
    fn test_site_from_str() {
        let site: RadarSite = "41.3007023,2.1020588,27.257".parse().unwrap();
        assert_relative_eq!(site.latitude, 41.3007023);
        assert_relative_eq!(site.height, 27.257);
        assert!("41.3,2.1".parse::<RadarSite>().is_err());
        assert!("41.3,2.1,27.257,0".parse::<RadarSite>().is_err());
    }
}
