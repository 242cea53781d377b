//! arcticroute library entry points.
//!
//! This crate plans land-avoiding marine routes. It exposes geodesic helpers,
//! a land/water mask, a navigation graph with A* search, and the
//! [`MarineRouter`] that ties them together. Higher-level consumers (the CLI)
//! should only depend on the items exported here instead of reimplementing
//! behavior.
//!
//! # Example
//!
//! ```
//! use arcticroute_lib::{
//!     BoundingBox, GeoPoint, GraphBuilder, LandMask, MarineRouter, NavNode, NodeKind,
//!     RouterOptions,
//! };
//!
//! let mut graph = GraphBuilder::new();
//! graph.add_node(NavNode::new("a", GeoPoint::new(69.25, 33.5), NodeKind::Port));
//! graph.add_node(NavNode::new("b", GeoPoint::new(69.6, 41.0), NodeKind::Waypoint));
//! graph.add_bidirectional_edge("a", "b", 1.0);
//!
//! let land = LandMask::new(BoundingBox::world());
//! let router = MarineRouter::new(land, graph.build(), RouterOptions::default());
//! let route = router.calculate_route(&GeoPoint::new(69.25, 33.5), &GeoPoint::new(69.6, 41.0));
//! assert!(route.is_safe);
//! ```

pub mod config;
pub mod error;
pub mod geodesy;
pub mod graph;
pub mod land;
pub mod output;
pub mod path;
pub mod router;
pub mod spatial;

pub use config::{EdgeConfig, NodeConfig, PolygonConfig, RouterConfig};
pub use error::{Error, Result};
pub use geodesy::{bearing, destination, distance, intermediate_point, GeoPoint, EARTH_RADIUS_M};
pub use graph::{GraphBuilder, NavEdge, NavNode, NavigationGraph, NodeKind};
pub use land::{BoundingBox, LandMask, LandPolygon, MAX_WATER_SEARCH_RADIUS_KM};
pub use output::{RouteLeg, RouteSummary};
pub use path::{find_path, find_path_with_limits, GraphPath, SearchLimits};
pub use router::{path_length, MarineRouter, Route, RouteStatus, RouterOptions};
pub use spatial::NodeLocator;
