//! Declarative seed data for building a [`MarineRouter`].
//!
//! Real-world ports, lanes, and coastlines are supplied from outside the
//! crate. A [`RouterConfig`] lists them explicitly so nothing is baked into
//! module-level state. The JSON layout is:
//!
//! ```json
//! {
//!   "region": { "min_lat": 60.0, "max_lat": 72.0, "min_lon": 25.0, "max_lon": 50.0 },
//!   "land_polygons": [ { "name": "Kola", "points": [ { "lat": 69.0, "lon": 33.0 } ] } ],
//!   "nodes": [ { "id": "murmansk", "kind": "port", "lat": 69.25, "lon": 33.5 } ],
//!   "edges": [ { "from": "murmansk", "to": "barents", "bidirectional": true } ],
//!   "search": { "water_search_radius_km": 50.0, "node_search_radius_m": 50000.0 }
//! }
//! ```

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::{Error, Result};
use crate::geodesy::GeoPoint;
use crate::graph::{GraphBuilder, NavNode, NavigationGraph, NodeKind};
use crate::land::{BoundingBox, LandMask, LandPolygon, MAX_WATER_SEARCH_RADIUS_KM};
use crate::router::{MarineRouter, RouterOptions};

/// Landmass ring in a seed file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PolygonConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub points: Vec<GeoPoint>,
}

/// Navigation node in a seed file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeConfig {
    pub id: String,
    #[serde(default)]
    pub kind: NodeKind,
    pub lat: f64,
    pub lon: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl NodeConfig {
    fn to_node(&self) -> Result<NavNode> {
        let mut location = GeoPoint::try_new(self.lat, self.lon)?;
        location.name = self.name.clone();
        Ok(NavNode::new(self.id.clone(), location, self.kind))
    }
}

/// Edge (or pair of edges) in a seed file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EdgeConfig {
    pub from: String,
    pub to: String,
    #[serde(default = "default_cost_multiplier")]
    pub cost_multiplier: f64,
    /// Also add the reverse edge `to → from`.
    #[serde(default)]
    pub bidirectional: bool,
}

fn default_cost_multiplier() -> f64 {
    1.0
}

/// Everything needed to build a router.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouterConfig {
    pub region: BoundingBox,
    #[serde(default)]
    pub land_polygons: Vec<PolygonConfig>,
    #[serde(default)]
    pub nodes: Vec<NodeConfig>,
    #[serde(default)]
    pub edges: Vec<EdgeConfig>,
    #[serde(default)]
    pub search: RouterOptions,
}

impl RouterConfig {
    /// Load a seed file from disk.
    pub fn from_path(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path).map_err(|source| Error::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&contents)
    }

    /// Parse a seed document.
    pub fn from_json_str(contents: &str) -> Result<Self> {
        let config: RouterConfig = serde_json::from_str(contents)?;
        Ok(config)
    }

    /// Build the land mask described by `region` and `land_polygons`.
    ///
    /// Every vertex must be a valid coordinate; degenerate rings are
    /// rejected.
    pub fn build_land_mask(&self) -> Result<LandMask> {
        self.region.validate()?;
        let mut mask = LandMask::new(self.region);

        for (position, polygon) in self.land_polygons.iter().enumerate() {
            for point in &polygon.points {
                point.validate()?;
            }
            let label = polygon
                .name
                .clone()
                .unwrap_or_else(|| format!("polygon #{position}"));
            let Some(mut ring) = LandPolygon::new(polygon.points.clone()) else {
                return Err(Error::InvalidConfig {
                    message: format!("land polygon '{label}' needs at least three distinct vertices"),
                });
            };
            if let Some(name) = &polygon.name {
                ring = ring.with_name(name.clone());
            }
            mask.add_polygon(ring);
        }

        Ok(mask)
    }

    /// Build the navigation graph described by `nodes` and `edges`.
    ///
    /// Node ids must be unique. Edges naming unknown nodes are skipped and
    /// logged, matching [`GraphBuilder::add_edge`].
    pub fn build_graph(&self) -> Result<NavigationGraph> {
        let mut builder = GraphBuilder::new();
        let mut seen = HashSet::new();

        for node in &self.nodes {
            if !seen.insert(node.id.as_str()) {
                return Err(Error::DuplicateNode {
                    id: node.id.clone(),
                });
            }
            builder.add_node(node.to_node()?);
        }

        for edge in &self.edges {
            if edge.bidirectional {
                builder.add_bidirectional_edge(&edge.from, &edge.to, edge.cost_multiplier);
            } else {
                builder.add_edge(&edge.from, &edge.to, edge.cost_multiplier);
            }
        }

        if builder.dropped_edges() > 0 {
            warn!(
                dropped = builder.dropped_edges(),
                "seed edges were skipped during graph construction"
            );
        }

        Ok(builder.build())
    }

    /// Build a ready-to-query router.
    pub fn build_router(&self) -> Result<MarineRouter> {
        let radii_valid = self.search.water_search_radius_km >= 0.0
            && self.search.node_search_radius_m >= 0.0;
        if !radii_valid {
            return Err(Error::InvalidConfig {
                message: "search radii must be non-negative numbers".to_string(),
            });
        }
        if self.search.water_search_radius_km > MAX_WATER_SEARCH_RADIUS_KM {
            return Err(Error::InvalidConfig {
                message: format!(
                    "water search radius {} km exceeds half the Earth's circumference ({:.0} km)",
                    self.search.water_search_radius_km, MAX_WATER_SEARCH_RADIUS_KM
                ),
            });
        }

        let land = self.build_land_mask()?;
        let graph = self.build_graph()?;
        info!(
            polygons = self.land_polygons.len(),
            nodes = self.nodes.len(),
            edges = self.edges.len(),
            "loaded router configuration"
        );
        Ok(MarineRouter::new(land, graph, self.search))
    }
}
