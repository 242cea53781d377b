//! Land/water classification against coastline polygons.
//!
//! A [`LandMask`] owns a bounding region and a list of [`LandPolygon`] rings.
//! Points outside the region are always water; inside it a point is land when
//! any polygon contains it. Polygons are treated as planar rings in
//! longitude/latitude space, which is adequate for the regional coastlines the
//! router is seeded with.

use geo::{Contains, Coord, LineString, Point, Polygon};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::geodesy::{destination, distance, intermediate_point, GeoPoint, EARTH_RADIUS_M};

/// Radial step used by [`LandMask::find_nearest_water`], in kilometres.
pub const WATER_SEARCH_STEP_KM: f64 = 0.1;

/// Largest useful water search radius: half the Earth's circumference, in
/// kilometres. Larger radii are clamped to it.
pub const MAX_WATER_SEARCH_RADIUS_KM: f64 = std::f64::consts::PI * EARTH_RADIUS_M / 1_000.0;

/// Number of evenly spaced compass bearings probed at each radial step.
pub const WATER_SEARCH_BEARINGS: usize = 8;

/// Inclusive latitude/longitude rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lon: f64,
    pub max_lon: f64,
}

impl BoundingBox {
    /// Create a validated bounding box.
    pub fn new(min_lat: f64, max_lat: f64, min_lon: f64, max_lon: f64) -> Result<Self> {
        let bounds = Self {
            min_lat,
            max_lat,
            min_lon,
            max_lon,
        };
        bounds.validate()?;
        Ok(bounds)
    }

    /// A region spanning the whole globe.
    pub fn world() -> Self {
        Self {
            min_lat: -90.0,
            max_lat: 90.0,
            min_lon: -180.0,
            max_lon: 180.0,
        }
    }

    /// Check that both corners are valid coordinates and correctly ordered.
    pub fn validate(&self) -> Result<()> {
        GeoPoint::new(self.min_lat, self.min_lon).validate()?;
        GeoPoint::new(self.max_lat, self.max_lon).validate()?;
        if self.min_lat > self.max_lat {
            return Err(Error::InvalidRegion {
                message: format!("min_lat {} exceeds max_lat {}", self.min_lat, self.max_lat),
            });
        }
        if self.min_lon > self.max_lon {
            return Err(Error::InvalidRegion {
                message: format!("min_lon {} exceeds max_lon {}", self.min_lon, self.max_lon),
            });
        }
        Ok(())
    }

    /// Whether the point lies inside the box, edges included.
    pub fn contains(&self, point: &GeoPoint) -> bool {
        point.latitude >= self.min_lat
            && point.latitude <= self.max_lat
            && point.longitude >= self.min_lon
            && point.longitude <= self.max_lon
    }

    fn enclosing(points: &[GeoPoint]) -> Self {
        let mut bounds = Self {
            min_lat: f64::INFINITY,
            max_lat: f64::NEG_INFINITY,
            min_lon: f64::INFINITY,
            max_lon: f64::NEG_INFINITY,
        };
        for point in points {
            bounds.min_lat = bounds.min_lat.min(point.latitude);
            bounds.max_lat = bounds.max_lat.max(point.latitude);
            bounds.min_lon = bounds.min_lon.min(point.longitude);
            bounds.max_lon = bounds.max_lon.max(point.longitude);
        }
        bounds
    }
}

/// A closed landmass boundary.
///
/// The ring is closed on construction: the first vertex is repeated at the end
/// unless the caller already did so. Simplicity is not checked; a
/// self-intersecting ring gives unspecified containment results.
#[derive(Debug, Clone)]
pub struct LandPolygon {
    name: Option<String>,
    ring: Vec<GeoPoint>,
    bounds: BoundingBox,
    shape: Polygon<f64>,
}

impl LandPolygon {
    /// Build a polygon from its vertices.
    ///
    /// Returns `None` when fewer than three distinct vertices are supplied.
    pub fn new(points: Vec<GeoPoint>) -> Option<Self> {
        let mut ring = points;
        if ring.first() != ring.last() || ring.len() == 1 {
            if let Some(first) = ring.first().cloned() {
                ring.push(first);
            }
        }

        let mut distinct: Vec<(f64, f64)> = Vec::new();
        for point in &ring {
            let key = (point.latitude, point.longitude);
            if !distinct.contains(&key) {
                distinct.push(key);
            }
        }
        if distinct.len() < 3 {
            return None;
        }

        let coords: Vec<Coord<f64>> = ring
            .iter()
            .map(|p| Coord {
                x: p.longitude,
                y: p.latitude,
            })
            .collect();
        let shape = Polygon::new(LineString::from(coords), Vec::new());
        let bounds = BoundingBox::enclosing(&ring);

        Some(Self {
            name: None,
            ring,
            bounds,
            shape,
        })
    }

    /// Attach a label used in diagnostics.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// The closed ring, first vertex repeated as the last.
    pub fn ring(&self) -> &[GeoPoint] {
        &self.ring
    }

    pub fn bounds(&self) -> BoundingBox {
        self.bounds
    }

    /// Point-in-polygon test in longitude/latitude space.
    pub fn contains(&self, point: &GeoPoint) -> bool {
        if !self.bounds.contains(point) {
            return false;
        }
        self.shape
            .contains(&Point::new(point.longitude, point.latitude))
    }
}

/// Land/water classifier for a bounded region.
#[derive(Debug, Clone)]
pub struct LandMask {
    region: BoundingBox,
    polygons: Vec<LandPolygon>,
}

impl LandMask {
    /// Create an empty mask covering `region`.
    pub fn new(region: BoundingBox) -> Self {
        Self {
            region,
            polygons: Vec::new(),
        }
    }

    pub fn region(&self) -> BoundingBox {
        self.region
    }

    pub fn polygons(&self) -> &[LandPolygon] {
        &self.polygons
    }

    /// Append a landmass from raw vertices.
    ///
    /// Returns `false` (and leaves the mask unchanged) when the ring has
    /// fewer than three distinct vertices.
    pub fn add_land_polygon(&mut self, points: Vec<GeoPoint>) -> bool {
        let vertex_count = points.len();
        match LandPolygon::new(points) {
            Some(polygon) => {
                self.add_polygon(polygon);
                true
            }
            None => {
                warn!(vertex_count, "ignoring land polygon with fewer than three distinct vertices");
                false
            }
        }
    }

    /// Append an already constructed polygon.
    pub fn add_polygon(&mut self, polygon: LandPolygon) {
        debug!(
            name = polygon.name().unwrap_or("<unnamed>"),
            vertices = polygon.ring().len(),
            "added land polygon"
        );
        self.polygons.push(polygon);
    }

    /// Whether `point` is on land.
    ///
    /// Points outside the mask's region are always water. Inside it,
    /// classification is the union of all polygons.
    pub fn is_land(&self, point: &GeoPoint) -> bool {
        if !self.region.contains(point) {
            return false;
        }
        self.polygons.iter().any(|polygon| polygon.contains(point))
    }

    /// Nearest water position to `point`, searching up to `max_radius_km`.
    ///
    /// Water points are returned unchanged. Land points are probed outwards
    /// in [`WATER_SEARCH_STEP_KM`] rings at [`WATER_SEARCH_BEARINGS`] compass
    /// bearings (starting due north, clockwise); the first water probe wins.
    /// When nothing within the radius is water the original point is
    /// returned as-is.
    pub fn find_nearest_water(&self, point: &GeoPoint, max_radius_km: f64) -> GeoPoint {
        if !self.is_land(point) {
            return point.clone();
        }

        let steps = if max_radius_km.is_finite() && max_radius_km > 0.0 {
            let radius_km = max_radius_km.min(MAX_WATER_SEARCH_RADIUS_KM);
            (radius_km / WATER_SEARCH_STEP_KM + 1e-9).floor() as usize
        } else {
            0
        };

        for step in 1..=steps {
            let radius_m = step as f64 * WATER_SEARCH_STEP_KM * 1_000.0;
            for direction in 0..WATER_SEARCH_BEARINGS {
                let bearing_deg = direction as f64 * 360.0 / WATER_SEARCH_BEARINGS as f64;
                let mut probe = destination(point, bearing_deg, radius_m);
                if !self.is_land(&probe) {
                    probe.name = point.name.clone();
                    debug!(
                        from = %point,
                        to = %probe,
                        radius_m,
                        bearing_deg,
                        "snapped land point to water"
                    );
                    return probe;
                }
            }
        }

        debug!(
            point = %point,
            max_radius_km,
            "no water found within search radius; keeping original point"
        );
        point.clone()
    }

    /// First sample along the great-circle leg `a → b` that lies on land.
    ///
    /// The leg is sampled every `step_m` meters, endpoints included.
    pub fn first_land_crossing(&self, a: &GeoPoint, b: &GeoPoint, step_m: f64) -> Option<GeoPoint> {
        if self.polygons.is_empty() {
            return None;
        }

        let length = distance(a, b);
        let samples = if step_m > 0.0 && step_m.is_finite() {
            (length / step_m).ceil().max(1.0) as usize
        } else {
            1
        };

        (0..=samples)
            .map(|i| {
                let fraction = i as f64 / samples as f64;
                intermediate_point(a, b, fraction).unwrap_or_else(|| {
                    let nearer = if fraction < 0.5 { a } else { b };
                    GeoPoint::new(nearer.latitude, nearer.longitude)
                })
            })
            .find(|sample| self.is_land(sample))
    }
}
