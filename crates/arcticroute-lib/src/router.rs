//! Land-avoiding route calculation.
//!
//! [`MarineRouter::calculate_route`] snaps both endpoints to water, resolves
//! them onto the navigation graph, and runs A* between the resolved nodes.
//! Every outcome is reported as a [`Route`]; unreachable or off-graph inputs
//! produce an unsafe route carrying the raw endpoints so callers can still
//! render something.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::Error;
use crate::geodesy::{distance, GeoPoint};
use crate::graph::NavigationGraph;
use crate::land::LandMask;
use crate::path::{find_path_with_limits, SearchLimits};

/// Default search radius used when snapping endpoints to water, in kilometres.
pub const DEFAULT_WATER_SEARCH_RADIUS_KM: f64 = 50.0;

/// Default radius used when resolving a point onto the graph, in meters.
pub const DEFAULT_NODE_SEARCH_RADIUS_M: f64 = 50_000.0;

/// Default sampling interval for the land-crossing check on found routes.
pub const DEFAULT_LEG_CHECK_STEP_M: f64 = 5_000.0;

pub const MESSAGE_FOUND: &str = "route found";
pub const MESSAGE_NOT_FOUND: &str = "route not found";
pub const MESSAGE_NO_NAVIGATION_POINTS: &str = "no suitable navigation points found";
pub const MESSAGE_SEARCH_ABORTED: &str = "route search aborted";

/// Tunables for [`MarineRouter`].
///
/// The two radii deliberately use different units: the water search works
/// in kilometres, node resolution in meters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RouterOptions {
    /// Radius for [`LandMask::find_nearest_water`], in kilometres.
    pub water_search_radius_km: f64,
    /// Radius for [`NavigationGraph::find_nearest_node`], in meters.
    pub node_search_radius_m: f64,
    /// Optional A* expansion budget.
    pub max_expansions: Option<usize>,
    /// Sampling interval for warning about legs that cross land, in meters.
    /// `None` disables the check.
    pub leg_check_step_m: Option<f64>,
}

impl Default for RouterOptions {
    fn default() -> Self {
        Self {
            water_search_radius_km: DEFAULT_WATER_SEARCH_RADIUS_KM,
            node_search_radius_m: DEFAULT_NODE_SEARCH_RADIUS_M,
            max_expansions: None,
            leg_check_step_m: Some(DEFAULT_LEG_CHECK_STEP_M),
        }
    }
}

/// Machine-readable outcome of a route calculation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RouteStatus {
    Found,
    NotFound,
    NoNavigationPoints,
    SearchAborted,
}

impl RouteStatus {
    /// Human-readable message attached to routes with this status.
    pub fn message(self) -> &'static str {
        match self {
            RouteStatus::Found => MESSAGE_FOUND,
            RouteStatus::NotFound => MESSAGE_NOT_FOUND,
            RouteStatus::NoNavigationPoints => MESSAGE_NO_NAVIGATION_POINTS,
            RouteStatus::SearchAborted => MESSAGE_SEARCH_ABORTED,
        }
    }
}

impl fmt::Display for RouteStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let value = match self {
            RouteStatus::Found => "found",
            RouteStatus::NotFound => "not_found",
            RouteStatus::NoNavigationPoints => "no_navigation_points",
            RouteStatus::SearchAborted => "search_aborted",
        };
        f.write_str(value)
    }
}

/// Result of a single route query.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Route {
    /// Ordered points from start to end, inclusive.
    pub points: Vec<GeoPoint>,
    /// Sum of consecutive great-circle distances, in meters.
    #[serde(rename = "length")]
    pub length_m: f64,
    pub is_safe: bool,
    /// Human-readable description; use `status` for decisions.
    pub message: String,
    pub status: RouteStatus,
}

impl Route {
    fn found(points: Vec<GeoPoint>) -> Self {
        let length_m = path_length(&points);
        Self {
            points,
            length_m,
            is_safe: true,
            message: RouteStatus::Found.message().to_string(),
            status: RouteStatus::Found,
        }
    }

    fn fallback(start: &GeoPoint, end: &GeoPoint, status: RouteStatus) -> Self {
        Self {
            points: vec![start.clone(), end.clone()],
            length_m: 0.0,
            is_safe: false,
            message: status.message().to_string(),
            status,
        }
    }
}

/// Sum of consecutive great-circle distances along `points`.
pub fn path_length(points: &[GeoPoint]) -> f64 {
    points
        .windows(2)
        .map(|pair| distance(&pair[0], &pair[1]))
        .sum()
}

/// Route planner over a frozen land mask and navigation graph.
///
/// The router is cheap to clone and safe to share across threads; all
/// queries take `&self`.
#[derive(Debug, Clone)]
pub struct MarineRouter {
    land: Arc<LandMask>,
    graph: NavigationGraph,
    options: RouterOptions,
}

impl MarineRouter {
    pub fn new(land: LandMask, graph: NavigationGraph, options: RouterOptions) -> Self {
        info!(
            polygons = land.polygons().len(),
            nodes = graph.len(),
            edges = graph.edge_count(),
            "marine router ready"
        );
        Self {
            land: Arc::new(land),
            graph,
            options,
        }
    }

    pub fn land(&self) -> &LandMask {
        &self.land
    }

    pub fn graph(&self) -> &NavigationGraph {
        &self.graph
    }

    pub fn options(&self) -> &RouterOptions {
        &self.options
    }

    /// Compute a water route from `start` to `end`.
    pub fn calculate_route(&self, start: &GeoPoint, end: &GeoPoint) -> Route {
        let water_start = self
            .land
            .find_nearest_water(start, self.options.water_search_radius_km);
        let water_end = self
            .land
            .find_nearest_water(end, self.options.water_search_radius_km);

        let radius = self.options.node_search_radius_m;
        let (Some(start_node), Some(end_node)) = (
            self.graph.find_nearest_node(&water_start, radius),
            self.graph.find_nearest_node(&water_end, radius),
        ) else {
            debug!(%start, %end, radius, "endpoint could not be resolved onto the graph");
            return Route::fallback(start, end, RouteStatus::NoNavigationPoints);
        };

        debug!(
            start_node = %start_node.id,
            end_node = %end_node.id,
            "resolved endpoints onto graph"
        );

        let limits = SearchLimits {
            max_expansions: self.options.max_expansions,
        };
        let path = match find_path_with_limits(&self.graph, &start_node.id, &end_node.id, &limits) {
            Ok(Some(path)) => path,
            Ok(None) => return Route::fallback(start, end, RouteStatus::NotFound),
            Err(Error::SearchBudgetExhausted { expanded, .. }) => {
                warn!(%start, %end, expanded, "route search exceeded its expansion budget");
                return Route::fallback(start, end, RouteStatus::SearchAborted);
            }
            Err(error) => {
                warn!(%start, %end, %error, "route search failed");
                return Route::fallback(start, end, RouteStatus::NotFound);
            }
        };

        let points: Vec<GeoPoint> = path
            .nodes
            .into_iter()
            .map(|node| {
                let mut point = node.location;
                if point.name.is_none() {
                    point.name = Some(node.id);
                }
                point
            })
            .collect();

        if let Some(step_m) = self.options.leg_check_step_m {
            self.warn_on_land_crossings(&points, step_m);
        }

        Route::found(points)
    }

    fn warn_on_land_crossings(&self, points: &[GeoPoint], step_m: f64) {
        for pair in points.windows(2) {
            if let Some(crossing) = self.land.first_land_crossing(&pair[0], &pair[1], step_m) {
                warn!(
                    from = %pair[0],
                    to = %pair[1],
                    at = %crossing,
                    "route leg crosses land; check the graph seed"
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{GraphBuilder, NavNode, NodeKind};
    use crate::land::BoundingBox;

    fn open_sea_router(options: RouterOptions) -> MarineRouter {
        let mut builder = GraphBuilder::new();
        builder.add_node(NavNode::new("a", GeoPoint::new(0.0, 0.0), NodeKind::Port));
        builder.add_node(NavNode::new("b", GeoPoint::new(0.0, 1.0), NodeKind::Waypoint));
        builder.add_node(NavNode::new("c", GeoPoint::new(0.0, 2.0), NodeKind::Port));
        builder.add_edge("a", "b", 1.0);
        builder.add_edge("b", "c", 1.0);
        MarineRouter::new(
            LandMask::new(BoundingBox::world()),
            builder.build(),
            options,
        )
    }

    #[test]
    fn status_messages_are_stable() {
        assert_eq!(RouteStatus::Found.message(), "route found");
        assert_eq!(RouteStatus::NotFound.message(), "route not found");
        assert_eq!(
            RouteStatus::NoNavigationPoints.message(),
            "no suitable navigation points found"
        );
    }

    #[test]
    fn route_through_open_sea() {
        let router = open_sea_router(RouterOptions::default());
        let route = router.calculate_route(&GeoPoint::new(0.01, 0.0), &GeoPoint::new(0.0, 2.01));

        assert!(route.is_safe);
        assert_eq!(route.status, RouteStatus::Found);
        assert_eq!(route.points.len(), 3);
        assert!((route.length_m - path_length(&route.points)).abs() < 1e-6);
        assert_eq!(route.points[0].name.as_deref(), Some("a"));
    }

    #[test]
    fn off_graph_endpoints_fall_back_to_raw_points() {
        let router = open_sea_router(RouterOptions::default());
        let start = GeoPoint::new(10.0, 10.0);
        let end = GeoPoint::new(0.0, 2.0);
        let route = router.calculate_route(&start, &end);

        assert!(!route.is_safe);
        assert_eq!(route.status, RouteStatus::NoNavigationPoints);
        assert_eq!(route.points, vec![start, end]);
        assert_eq!(route.length_m, 0.0);
    }

    #[test]
    fn reverse_direction_is_not_found() {
        let router = open_sea_router(RouterOptions::default());
        let route = router.calculate_route(&GeoPoint::new(0.0, 2.0), &GeoPoint::new(0.0, 0.0));
        assert!(!route.is_safe);
        assert_eq!(route.status, RouteStatus::NotFound);
        assert_eq!(route.message, "route not found");
        assert_eq!(route.points.len(), 2);
    }

    #[test]
    fn expansion_budget_is_reported() {
        let router = open_sea_router(RouterOptions {
            max_expansions: Some(1),
            ..RouterOptions::default()
        });
        let route = router.calculate_route(&GeoPoint::new(0.0, 0.0), &GeoPoint::new(0.0, 2.0));
        assert_eq!(route.status, RouteStatus::SearchAborted);
        assert!(!route.is_safe);
    }

    #[test]
    fn serializes_with_wire_field_names() {
        let router = open_sea_router(RouterOptions::default());
        let route = router.calculate_route(&GeoPoint::new(0.0, 0.0), &GeoPoint::new(0.0, 2.0));
        let json = serde_json::to_value(&route).expect("serializes");

        assert!(json["points"].is_array());
        assert!(json["length"].as_f64().unwrap() > 0.0);
        assert_eq!(json["is_safe"], true);
        assert_eq!(json["message"], "route found");
        assert_eq!(json["status"], "found");
    }

    #[test]
    fn router_is_shareable_across_threads() {
        let router = open_sea_router(RouterOptions::default());
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let router = router.clone();
                std::thread::spawn(move || {
                    router
                        .calculate_route(&GeoPoint::new(0.0, 0.0), &GeoPoint::new(0.0, 2.0))
                        .is_safe
                })
            })
            .collect();
        for handle in handles {
            assert!(handle.join().expect("thread completes"));
        }
    }
}
