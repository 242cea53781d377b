//! Geodesic primitives on a spherical Earth.
//!
//! All functions treat the Earth as a sphere of radius [`EARTH_RADIUS_M`] and
//! work in degrees at the API boundary. Nothing here holds state; the land
//! mask, navigation graph, and router all share these helpers so distances
//! agree everywhere in the crate.

use std::f64::consts::PI;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Mean Earth radius used by every distance calculation, in meters.
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Angular distances closer than this to `0` or `π` are treated as degenerate
/// when interpolating along a great circle.
const DEGENERATE_ARC_RAD: f64 = 1e-12;

/// A geographic position with an optional label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "lat", alias = "latitude")]
    pub latitude: f64,
    #[serde(rename = "lon", alias = "longitude")]
    pub longitude: f64,
}

impl GeoPoint {
    /// Construct an unlabelled point without range validation.
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            name: None,
            latitude,
            longitude,
        }
    }

    /// Construct a point, rejecting out-of-range or non-finite coordinates.
    pub fn try_new(latitude: f64, longitude: f64) -> Result<Self> {
        let point = Self::new(latitude, longitude);
        point.validate()?;
        Ok(point)
    }

    /// Attach a label to the point.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Check that latitude lies in [-90, 90] and longitude in [-180, 180].
    pub fn validate(&self) -> Result<()> {
        let lat_ok = self.latitude.is_finite() && (-90.0..=90.0).contains(&self.latitude);
        let lon_ok = self.longitude.is_finite() && (-180.0..=180.0).contains(&self.longitude);
        if lat_ok && lon_ok {
            Ok(())
        } else {
            Err(Error::InvalidCoordinate {
                latitude: self.latitude,
                longitude: self.longitude,
            })
        }
    }

    /// Great-circle distance to another point in meters.
    pub fn distance_to(&self, other: &GeoPoint) -> f64 {
        distance(self, other)
    }

    fn radians(&self) -> (f64, f64) {
        (self.latitude.to_radians(), self.longitude.to_radians())
    }
}

impl fmt::Display for GeoPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.name {
            Some(name) => write!(f, "{} ({:.4}, {:.4})", name, self.latitude, self.longitude),
            None => write!(f, "({:.4}, {:.4})", self.latitude, self.longitude),
        }
    }
}

/// Parses `"LAT,LON"` (whitespace around either number is ignored).
impl FromStr for GeoPoint {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let parse_error = || Error::CoordinateParse {
            input: s.to_string(),
        };
        let (lat, lon) = s.split_once(',').ok_or_else(parse_error)?;
        let latitude: f64 = lat.trim().parse().map_err(|_| parse_error())?;
        let longitude: f64 = lon.trim().parse().map_err(|_| parse_error())?;
        GeoPoint::try_new(latitude, longitude)
    }
}

/// Haversine great-circle distance between two points, in meters.
pub fn distance(a: &GeoPoint, b: &GeoPoint) -> f64 {
    EARTH_RADIUS_M * central_angle(a, b)
}

/// Initial bearing from `a` towards `b` in degrees, normalised to `[0, 360)`.
///
/// Returns `0.0` for coincident points.
pub fn bearing(a: &GeoPoint, b: &GeoPoint) -> f64 {
    let (lat1, lon1) = a.radians();
    let (lat2, lon2) = b.radians();
    let d_lon = lon2 - lon1;

    let y = d_lon.sin() * lat2.cos();
    let x = lat1.cos() * lat2.sin() - lat1.sin() * lat2.cos() * d_lon.cos();
    if y == 0.0 && x == 0.0 {
        return 0.0;
    }

    let degrees = y.atan2(x).to_degrees();
    let normalised = (degrees + 360.0) % 360.0;
    // -0.0 and tiny negative rounding must not produce 360.0.
    if normalised >= 360.0 {
        0.0
    } else {
        normalised
    }
}

/// Point at `fraction` of the great-circle arc from `a` to `b`.
///
/// `fraction` is clamped to `[0, 1]`. Returns `None` when the arc is
/// degenerate (coincident or antipodal endpoints) because the slerp weights
/// divide by `sin(δ)`.
pub fn intermediate_point(a: &GeoPoint, b: &GeoPoint, fraction: f64) -> Option<GeoPoint> {
    let delta = central_angle(a, b);
    if delta < DEGENERATE_ARC_RAD || (PI - delta) < DEGENERATE_ARC_RAD {
        return None;
    }

    let fraction = fraction.clamp(0.0, 1.0);
    if fraction == 0.0 {
        return Some(GeoPoint::new(a.latitude, a.longitude));
    }
    if fraction == 1.0 {
        return Some(GeoPoint::new(b.latitude, b.longitude));
    }

    let (lat1, lon1) = a.radians();
    let (lat2, lon2) = b.radians();
    let sin_delta = delta.sin();
    let wa = ((1.0 - fraction) * delta).sin() / sin_delta;
    let wb = (fraction * delta).sin() / sin_delta;

    let x = wa * lat1.cos() * lon1.cos() + wb * lat2.cos() * lon2.cos();
    let y = wa * lat1.cos() * lon1.sin() + wb * lat2.cos() * lon2.sin();
    let z = wa * lat1.sin() + wb * lat2.sin();

    let lat = z.atan2((x * x + y * y).sqrt());
    let lon = y.atan2(x);
    Some(GeoPoint::new(lat.to_degrees(), lon.to_degrees()))
}

/// Point reached by travelling `distance_m` meters from `origin` along the
/// initial bearing `bearing_deg`.
///
/// The resulting longitude is wrapped into `[-180, 180]`.
pub fn destination(origin: &GeoPoint, bearing_deg: f64, distance_m: f64) -> GeoPoint {
    let (lat1, lon1) = origin.radians();
    let theta = bearing_deg.to_radians();
    let angular = distance_m / EARTH_RADIUS_M;

    let sin_lat2 = lat1.sin() * angular.cos() + lat1.cos() * angular.sin() * theta.cos();
    let lat2 = sin_lat2.clamp(-1.0, 1.0).asin();
    let lon2 = lon1
        + (theta.sin() * angular.sin() * lat1.cos()).atan2(angular.cos() - lat1.sin() * lat2.sin());

    GeoPoint::new(lat2.to_degrees(), wrap_longitude(lon2.to_degrees()))
}

fn wrap_longitude(longitude: f64) -> f64 {
    if (-180.0..=180.0).contains(&longitude) {
        longitude
    } else {
        (longitude + 540.0).rem_euclid(360.0) - 180.0
    }
}

/// Angular distance between two points in radians (haversine form).
fn central_angle(a: &GeoPoint, b: &GeoPoint) -> f64 {
    let (lat1, lon1) = a.radians();
    let (lat2, lon2) = b.radians();
    let d_lat = lat2 - lat1;
    let d_lon = lon2 - lon1;

    let h = (d_lat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (d_lon / 2.0).sin().powi(2);
    let h = h.clamp(0.0, 1.0);
    2.0 * h.sqrt().atan2((1.0 - h).sqrt())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn arkhangelsk() -> GeoPoint {
        GeoPoint::new(64.54, 40.52).with_name("Arkhangelsk")
    }

    fn murmansk() -> GeoPoint {
        GeoPoint::new(68.97, 33.07).with_name("Murmansk")
    }

    #[test]
    fn distance_is_zero_for_identical_points() {
        let p = arkhangelsk();
        assert_eq!(distance(&p, &p), 0.0);
    }

    #[test]
    fn distance_is_symmetric() {
        let a = arkhangelsk();
        let b = murmansk();
        assert!((distance(&a, &b) - distance(&b, &a)).abs() < 1e-6);
    }

    #[test]
    fn one_degree_of_latitude_is_about_111_km() {
        let a = GeoPoint::new(0.0, 0.0);
        let b = GeoPoint::new(1.0, 0.0);
        let expected = EARTH_RADIUS_M * 1f64.to_radians();
        assert!((distance(&a, &b) - expected).abs() < 1e-6);
    }

    #[test]
    fn bearing_cardinal_directions() {
        let origin = GeoPoint::new(0.0, 0.0);
        assert!((bearing(&origin, &GeoPoint::new(1.0, 0.0)) - 0.0).abs() < 1e-9);
        assert!((bearing(&origin, &GeoPoint::new(0.0, 1.0)) - 90.0).abs() < 1e-9);
        assert!((bearing(&origin, &GeoPoint::new(-1.0, 0.0)) - 180.0).abs() < 1e-9);
        assert!((bearing(&origin, &GeoPoint::new(0.0, -1.0)) - 270.0).abs() < 1e-9);
    }

    #[test]
    fn bearing_of_coincident_points_is_zero() {
        let p = murmansk();
        assert_eq!(bearing(&p, &p), 0.0);
    }

    #[test]
    fn intermediate_point_endpoints_and_midpoint() {
        let a = GeoPoint::new(0.0, 0.0);
        let b = GeoPoint::new(0.0, 10.0);

        let start = intermediate_point(&a, &b, 0.0).expect("non-degenerate arc");
        let end = intermediate_point(&a, &b, 1.0).expect("non-degenerate arc");
        let mid = intermediate_point(&a, &b, 0.5).expect("non-degenerate arc");

        assert!(distance(&start, &a) < 1e-6);
        assert!(distance(&end, &b) < 1e-6);
        assert!(mid.latitude.abs() < 1e-9);
        assert!((mid.longitude - 5.0).abs() < 1e-9);
    }

    #[test]
    fn intermediate_point_rejects_degenerate_arcs() {
        let p = arkhangelsk();
        assert!(intermediate_point(&p, &p, 0.5).is_none());

        let north = GeoPoint::new(90.0, 0.0);
        let south = GeoPoint::new(-90.0, 0.0);
        assert!(intermediate_point(&north, &south, 0.5).is_none());
    }

    #[test]
    fn destination_travels_requested_distance() {
        let origin = arkhangelsk();
        for bearing_deg in [0.0, 45.0, 90.0, 135.0, 180.0, 225.0, 270.0, 315.0] {
            let target = destination(&origin, bearing_deg, 25_000.0);
            assert!((distance(&origin, &target) - 25_000.0).abs() < 1e-3);
        }
    }

    #[test]
    fn destination_wraps_across_antimeridian() {
        let origin = GeoPoint::new(0.0, 179.9);
        let target = destination(&origin, 90.0, 50_000.0);
        assert!(target.longitude < 0.0);
        assert!(target.longitude >= -180.0);
    }

    #[test]
    fn try_new_rejects_out_of_range() {
        assert!(GeoPoint::try_new(91.0, 0.0).is_err());
        assert!(GeoPoint::try_new(0.0, -180.5).is_err());
        assert!(GeoPoint::try_new(f64::NAN, 0.0).is_err());
        assert!(GeoPoint::try_new(-90.0, 180.0).is_ok());
    }

    #[test]
    fn parses_lat_lon_pairs() {
        let p: GeoPoint = "64.54, 40.52".parse().expect("valid pair");
        assert_eq!(p.latitude, 64.54);
        assert_eq!(p.longitude, 40.52);

        assert!("64.54".parse::<GeoPoint>().is_err());
        assert!("north,east".parse::<GeoPoint>().is_err());
        assert!("95.0,10.0".parse::<GeoPoint>().is_err());
    }

    #[test]
    fn serializes_with_short_field_names() {
        let json = serde_json::to_value(murmansk()).expect("serializes");
        assert_eq!(json["name"], "Murmansk");
        assert_eq!(json["lat"], 68.97);
        assert_eq!(json["lon"], 33.07);

        let unnamed = serde_json::to_value(GeoPoint::new(1.0, 2.0)).expect("serializes");
        assert!(unnamed.get("name").is_none());
    }
}
