use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::geodesy::{distance, GeoPoint};
use crate::spatial::NodeLocator;

/// Position of a node in the graph's insertion order.
pub(crate) type NodeIndex = usize;

/// Role a node plays in the navigation network.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    /// Terminal docking location.
    Port,
    /// Intermediate routing point.
    #[default]
    Waypoint,
    /// Branch point where shipping lanes meet.
    Junction,
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let value = match self {
            NodeKind::Port => "port",
            NodeKind::Waypoint => "waypoint",
            NodeKind::Junction => "junction",
        };
        f.write_str(value)
    }
}

/// Navigable node; identity is the `id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NavNode {
    pub id: String,
    pub location: GeoPoint,
    pub kind: NodeKind,
}

impl NavNode {
    pub fn new(id: impl Into<String>, location: GeoPoint, kind: NodeKind) -> Self {
        Self {
            id: id.into(),
            location,
            kind,
        }
    }
}

/// Directed edge between two nodes.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NavEdge {
    pub from: String,
    pub to: String,
    /// Great-circle length of the edge in meters.
    pub distance_m: f64,
    /// Multiplier applied to `distance_m` to obtain `cost`.
    pub cost_multiplier: f64,
    /// Search weight: `distance_m` scaled by `cost_multiplier`.
    pub cost: f64,
    #[serde(skip)]
    pub(crate) target: NodeIndex,
}

/// Mutable graph used during the build phase.
///
/// Call [`GraphBuilder::build`] to freeze it into a [`NavigationGraph`] before
/// serving queries.
#[derive(Debug, Default)]
pub struct GraphBuilder {
    nodes: Vec<NavNode>,
    index: HashMap<String, NodeIndex>,
    adjacency: Vec<Vec<NavEdge>>,
    dropped_edges: usize,
}

impl GraphBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a node, or replace the node already registered under its id.
    ///
    /// Replacement keeps the node's outgoing edges and its position in the
    /// insertion order. Edge lengths follow the final locations: they are
    /// recomputed by [`GraphBuilder::build`].
    pub fn add_node(&mut self, node: NavNode) {
        let existing = self.index.get(&node.id).copied();
        match existing {
            Some(existing) => self.nodes[existing] = node,
            None => {
                self.index.insert(node.id.clone(), self.nodes.len());
                self.nodes.push(node);
                self.adjacency.push(Vec::new());
            }
        }
    }

    /// Append a directed edge `from_id → to_id`.
    ///
    /// The cost is the great-circle distance times `cost_multiplier`. When
    /// either endpoint is unknown, or the multiplier is negative or not
    /// finite, the graph is left unchanged and `false` is returned.
    pub fn add_edge(&mut self, from_id: &str, to_id: &str, cost_multiplier: f64) -> bool {
        let (Some(&from), Some(&to)) = (self.index.get(from_id), self.index.get(to_id)) else {
            warn!(from = from_id, to = to_id, "dropping edge with unknown endpoint");
            self.dropped_edges += 1;
            return false;
        };

        if !cost_multiplier.is_finite() || cost_multiplier < 0.0 {
            warn!(
                from = from_id,
                to = to_id,
                cost_multiplier,
                "dropping edge with invalid cost multiplier"
            );
            self.dropped_edges += 1;
            return false;
        }

        let distance_m = distance(&self.nodes[from].location, &self.nodes[to].location);
        self.adjacency[from].push(NavEdge {
            from: from_id.to_string(),
            to: to_id.to_string(),
            distance_m,
            cost_multiplier,
            cost: distance_m * cost_multiplier,
            target: to,
        });
        true
    }

    /// Append edges in both directions with the same multiplier.
    ///
    /// Returns `true` only if both edges were added.
    pub fn add_bidirectional_edge(&mut self, a: &str, b: &str, cost_multiplier: f64) -> bool {
        let forward = self.add_edge(a, b, cost_multiplier);
        let backward = self.add_edge(b, a, cost_multiplier);
        forward && backward
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn edge_count(&self) -> usize {
        self.adjacency.iter().map(Vec::len).sum()
    }

    /// Number of `add_edge` calls that were declined.
    pub fn dropped_edges(&self) -> usize {
        self.dropped_edges
    }

    /// Freeze the builder into an immutable, shareable graph.
    pub fn build(mut self) -> NavigationGraph {
        for (from, edges) in self.adjacency.iter_mut().enumerate() {
            for edge in edges.iter_mut() {
                edge.distance_m =
                    distance(&self.nodes[from].location, &self.nodes[edge.target].location);
                edge.cost = edge.distance_m * edge.cost_multiplier;
            }
        }

        let locator = NodeLocator::build(
            self.nodes
                .iter()
                .map(|node| node.location.clone())
                .collect(),
        );

        info!(
            nodes = self.nodes.len(),
            edges = self.adjacency.iter().map(Vec::len).sum::<usize>(),
            dropped_edges = self.dropped_edges,
            "built navigation graph"
        );

        NavigationGraph {
            inner: Arc::new(GraphInner {
                nodes: self.nodes,
                index: self.index,
                adjacency: self.adjacency,
                locator,
            }),
        }
    }
}

#[derive(Debug)]
struct GraphInner {
    nodes: Vec<NavNode>,
    index: HashMap<String, NodeIndex>,
    adjacency: Vec<Vec<NavEdge>>,
    locator: NodeLocator,
}

/// Read-only navigation graph used by pathfinding.
///
/// Cloning is cheap; clones share the same underlying data and can be used
/// from multiple threads.
#[derive(Debug, Clone)]
pub struct NavigationGraph {
    inner: Arc<GraphInner>,
}

impl NavigationGraph {
    pub fn len(&self) -> usize {
        self.inner.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.nodes.is_empty()
    }

    pub fn edge_count(&self) -> usize {
        self.inner.adjacency.iter().map(Vec::len).sum()
    }

    /// Nodes in insertion order.
    pub fn nodes(&self) -> &[NavNode] {
        &self.inner.nodes
    }

    /// Lookup a node by id.
    pub fn node(&self, id: &str) -> Option<&NavNode> {
        self.index_of(id).map(|index| &self.inner.nodes[index])
    }

    /// Outgoing edges of a node, in the order they were added.
    pub fn edges(&self, id: &str) -> &[NavEdge] {
        self.index_of(id)
            .map(|index| self.neighbours(index))
            .unwrap_or(&[])
    }

    /// Node closest to `point` within `max_radius_m` meters (inclusive).
    ///
    /// Returns `None` for an empty graph or when every node is farther away.
    pub fn find_nearest_node(&self, point: &GeoPoint, max_radius_m: f64) -> Option<&NavNode> {
        self.inner
            .locator
            .nearest_within(point, max_radius_m)
            .map(|(index, _)| &self.inner.nodes[index])
    }

    pub(crate) fn index_of(&self, id: &str) -> Option<NodeIndex> {
        self.inner.index.get(id).copied()
    }

    pub(crate) fn node_at(&self, index: NodeIndex) -> &NavNode {
        &self.inner.nodes[index]
    }

    pub(crate) fn neighbours(&self, index: NodeIndex) -> &[NavEdge] {
        self.inner
            .adjacency
            .get(index)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}

impl Default for NavigationGraph {
    fn default() -> Self {
        GraphBuilder::new().build()
    }
}
