use std::fmt::Write;

use serde::Serialize;

use crate::geodesy::{bearing, distance, GeoPoint};
use crate::router::{Route, RouteStatus};

/// One leg between consecutive route points.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct RouteLeg {
    pub index: usize,
    pub from: GeoPoint,
    pub to: GeoPoint,
    pub distance_m: f64,
    /// Initial bearing of the leg in degrees.
    pub bearing_deg: f64,
}

/// Structured representation of a route that higher-level consumers can serialise.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct RouteSummary {
    pub status: RouteStatus,
    pub is_safe: bool,
    pub message: String,
    pub total_distance_m: f64,
    pub points: Vec<GeoPoint>,
    pub legs: Vec<RouteLeg>,
}

impl RouteSummary {
    /// Break a [`Route`] into legs with per-leg distance and bearing.
    ///
    /// Unsafe routes carry no legs; their two points are the raw endpoints,
    /// not a navigable path.
    pub fn from_route(route: &Route) -> Self {
        let legs = if route.is_safe {
            route
                .points
                .windows(2)
                .enumerate()
                .map(|(index, pair)| RouteLeg {
                    index,
                    from: pair[0].clone(),
                    to: pair[1].clone(),
                    distance_m: distance(&pair[0], &pair[1]),
                    bearing_deg: bearing(&pair[0], &pair[1]),
                })
                .collect()
        } else {
            Vec::new()
        };

        Self {
            status: route.status,
            is_safe: route.is_safe,
            message: route.message.clone(),
            total_distance_m: route.length_m,
            points: route.points.clone(),
            legs,
        }
    }

    /// Number of legs in the route.
    pub fn leg_count(&self) -> usize {
        self.legs.len()
    }

    /// Render the summary as plain text, one line per leg.
    pub fn render_plain(&self) -> String {
        let mut buffer = String::new();

        if !self.is_safe {
            let _ = writeln!(buffer, "No safe route: {} ({})", self.message, self.status);
            for point in &self.points {
                let _ = writeln!(buffer, "  {}", point);
            }
            return buffer;
        }

        let start = self.points.first().map(ToString::to_string).unwrap_or_default();
        let goal = self.points.last().map(ToString::to_string).unwrap_or_default();
        let _ = writeln!(
            buffer,
            "Route from {} to {} ({} legs):",
            start,
            goal,
            self.leg_count()
        );
        for leg in &self.legs {
            let _ = writeln!(
                buffer,
                "  {:>2}. {} -> {}  {:.1} km @ {:.0}°",
                leg.index + 1,
                leg.from,
                leg.to,
                leg.distance_m / 1_000.0,
                leg.bearing_deg
            );
        }
        let _ = writeln!(
            buffer,
            "Total distance: {:.1} km",
            self.total_distance_m / 1_000.0
        );
        buffer
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn safe_route() -> Route {
        let points = vec![
            GeoPoint::new(0.0, 0.0).with_name("a"),
            GeoPoint::new(0.0, 1.0).with_name("b"),
            GeoPoint::new(1.0, 1.0).with_name("c"),
        ];
        Route {
            length_m: crate::router::path_length(&points),
            points,
            is_safe: true,
            message: "route found".to_string(),
            status: RouteStatus::Found,
        }
    }

    #[test]
    fn legs_follow_points() {
        let summary = RouteSummary::from_route(&safe_route());
        assert_eq!(summary.leg_count(), 2);
        assert!((summary.legs[0].bearing_deg - 90.0).abs() < 1e-6);
        assert!(summary.legs[1].bearing_deg.abs() < 1e-6);

        let sum: f64 = summary.legs.iter().map(|leg| leg.distance_m).sum();
        assert!((sum - summary.total_distance_m).abs() < 1e-6);
    }

    #[test]
    fn plain_rendering_lists_legs() {
        let text = RouteSummary::from_route(&safe_route()).render_plain();
        assert!(text.starts_with("Route from a"));
        assert!(text.contains("2 legs"));
        assert!(text.contains("Total distance: 222.4 km"));
    }

    #[test]
    fn unsafe_route_has_no_legs() {
        let route = Route {
            points: vec![GeoPoint::new(0.0, 0.0), GeoPoint::new(5.0, 5.0)],
            length_m: 0.0,
            is_safe: false,
            message: "route not found".to_string(),
            status: RouteStatus::NotFound,
        };
        let summary = RouteSummary::from_route(&route);
        assert!(summary.legs.is_empty());
        assert!(summary.render_plain().contains("No safe route: route not found"));
    }
}
