use std::cmp::Ordering;
use std::collections::BinaryHeap;

use serde::Serialize;
use tracing::debug;

use crate::error::{Error, Result};
use crate::geodesy::distance;
use crate::graph::{NavNode, NavigationGraph, NodeIndex};

/// Optional bounds applied to a single search.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchLimits {
    /// Abort once this many nodes have been expanded without reaching the goal.
    pub max_expansions: Option<usize>,
}

impl SearchLimits {
    pub fn unbounded() -> Self {
        Self::default()
    }

    pub fn with_max_expansions(max_expansions: usize) -> Self {
        Self {
            max_expansions: Some(max_expansions),
        }
    }
}

/// Lowest-cost node sequence found by [`find_path`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GraphPath {
    /// Nodes from start to goal, both inclusive.
    pub nodes: Vec<NavNode>,
    /// Sum of edge costs along the path.
    pub cost: f64,
}

impl GraphPath {
    /// Number of edges in the path.
    pub fn hop_count(&self) -> usize {
        self.nodes.len().saturating_sub(1)
    }

    /// Node ids in path order.
    pub fn ids(&self) -> Vec<&str> {
        self.nodes.iter().map(|node| node.id.as_str()).collect()
    }
}

/// Run A* between two node ids without a search budget.
///
/// Edge `cost` is the arc weight and the great-circle distance to the goal is
/// the heuristic, which is admissible as long as every edge multiplier is at
/// least 1. Returns `None` when either id is unknown or the goal is
/// unreachable.
pub fn find_path(graph: &NavigationGraph, start_id: &str, goal_id: &str) -> Option<GraphPath> {
    match find_path_with_limits(graph, start_id, goal_id, &SearchLimits::unbounded()) {
        Ok(path) => path,
        Err(_) => None,
    }
}

/// Run A* with optional limits.
///
/// Exhausting the expansion budget is reported as
/// [`Error::SearchBudgetExhausted`]; an unreachable goal is `Ok(None)`.
pub fn find_path_with_limits(
    graph: &NavigationGraph,
    start_id: &str,
    goal_id: &str,
    limits: &SearchLimits,
) -> Result<Option<GraphPath>> {
    let (Some(start), Some(goal)) = (graph.index_of(start_id), graph.index_of(goal_id)) else {
        debug!(start = start_id, goal = goal_id, "path endpoint missing from graph");
        return Ok(None);
    };

    if start == goal {
        return Ok(Some(GraphPath {
            nodes: vec![graph.node_at(start).clone()],
            cost: 0.0,
        }));
    }

    let node_count = graph.len();
    let goal_location = &graph.node_at(goal).location;
    let heuristic = |index: NodeIndex| distance(&graph.node_at(index).location, goal_location);

    let mut g_score = vec![f64::INFINITY; node_count];
    let mut parents: Vec<Option<NodeIndex>> = vec![None; node_count];
    let mut queue = BinaryHeap::new();
    let mut expanded = 0usize;

    g_score[start] = 0.0;
    queue.push(AStarEntry::new(start, 0.0, heuristic(start)));

    while let Some(entry) = queue.pop() {
        // Skip entries superseded by a cheaper route to the same node.
        if entry.cost.0 > g_score[entry.node] {
            continue;
        }

        if entry.node == goal {
            let path = reconstruct_path(graph, &parents, start, goal);
            debug!(
                start = start_id,
                goal = goal_id,
                expanded,
                hops = path.len().saturating_sub(1),
                cost = entry.cost.0,
                "path found"
            );
            return Ok(Some(GraphPath {
                nodes: path,
                cost: entry.cost.0,
            }));
        }

        expanded += 1;
        if let Some(limit) = limits.max_expansions {
            if expanded > limit {
                return Err(Error::SearchBudgetExhausted {
                    start: start_id.to_string(),
                    goal: goal_id.to_string(),
                    expanded: limit,
                });
            }
        }

        for edge in graph.neighbours(entry.node) {
            let next = edge.target;
            let tentative_g = entry.cost.0 + edge.cost;
            if tentative_g < g_score[next] {
                g_score[next] = tentative_g;
                parents[next] = Some(entry.node);
                queue.push(AStarEntry::new(next, tentative_g, heuristic(next)));
            }
        }
    }

    debug!(start = start_id, goal = goal_id, expanded, "open set exhausted");
    Ok(None)
}

/// Walk back-pointers from `goal` to `start`, then reverse.
fn reconstruct_path(
    graph: &NavigationGraph,
    parents: &[Option<NodeIndex>],
    start: NodeIndex,
    goal: NodeIndex,
) -> Vec<NavNode> {
    let mut path = Vec::new();
    let mut current = Some(goal);
    while let Some(index) = current {
        path.push(graph.node_at(index).clone());
        if index == start {
            break;
        }
        current = parents[index];
    }
    path.reverse();
    path
}

#[derive(Copy, Clone, Debug, Default)]
struct FloatOrd(f64);

impl PartialEq for FloatOrd {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for FloatOrd {}

impl PartialOrd for FloatOrd {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for FloatOrd {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
struct AStarEntry {
    node: NodeIndex,
    cost: FloatOrd,
    estimate: FloatOrd,
}

impl AStarEntry {
    fn new(node: NodeIndex, cost: f64, heuristic: f64) -> Self {
        Self {
            node,
            cost: FloatOrd(cost),
            estimate: FloatOrd(cost + heuristic),
        }
    }
}

impl Ord for AStarEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse ordering so BinaryHeap pops the lowest estimate first; ties
        // go to the earlier-inserted node.
        other
            .estimate
            .cmp(&self.estimate)
            .then_with(|| other.node.cmp(&self.node))
            .then_with(|| other.cost.cmp(&self.cost))
    }
}

impl PartialOrd for AStarEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geodesy::GeoPoint;
    use crate::graph::{GraphBuilder, NodeKind};

    fn builder_with(nodes: &[(&str, f64, f64)]) -> GraphBuilder {
        let mut builder = GraphBuilder::new();
        for (id, lat, lon) in nodes {
            builder.add_node(NavNode::new(
                *id,
                GeoPoint::new(*lat, *lon),
                NodeKind::Waypoint,
            ));
        }
        builder
    }

    #[test]
    fn same_start_and_goal_is_single_node() {
        let graph = builder_with(&[("a", 0.0, 0.0)]).build();
        let path = find_path(&graph, "a", "a").expect("trivial path");
        assert_eq!(path.ids(), vec!["a"]);
        assert_eq!(path.cost, 0.0);
        assert_eq!(path.hop_count(), 0);
    }

    #[test]
    fn unknown_ids_have_no_path() {
        let graph = builder_with(&[("a", 0.0, 0.0)]).build();
        assert!(find_path(&graph, "a", "zz").is_none());
        assert!(find_path(&graph, "zz", "zz").is_none());
    }

    #[test]
    fn disconnected_nodes_have_no_path() {
        let graph = builder_with(&[("a", 0.0, 0.0), ("b", 0.0, 1.0)]).build();
        assert!(find_path(&graph, "a", "b").is_none());
    }

    #[test]
    fn edges_are_followed_only_forwards() {
        let mut builder = builder_with(&[("a", 0.0, 0.0), ("b", 0.0, 1.0)]);
        builder.add_edge("a", "b", 1.0);
        let graph = builder.build();
        assert!(find_path(&graph, "a", "b").is_some());
        assert!(find_path(&graph, "b", "a").is_none());
    }

    #[test]
    fn prefers_cheaper_multi_hop_route() {
        // a → c directly is shorter but penalised; a → b → c wins on cost.
        let mut builder = builder_with(&[("a", 0.0, 0.0), ("b", 0.5, 0.5), ("c", 0.0, 1.0)]);
        builder.add_edge("a", "c", 3.0);
        builder.add_edge("a", "b", 1.0);
        builder.add_edge("b", "c", 1.0);
        let graph = builder.build();

        let path = find_path(&graph, "a", "c").expect("reachable");
        assert_eq!(path.ids(), vec!["a", "b", "c"]);

        let expected: f64 = graph.edges("a")[1].cost + graph.edges("b")[0].cost;
        assert!((path.cost - expected).abs() < 1e-6);
    }

    #[test]
    fn expansion_budget_aborts_long_searches() {
        let mut builder = builder_with(&[("a", 0.0, 0.0), ("b", 0.0, 1.0), ("c", 0.0, 2.0)]);
        builder.add_edge("a", "b", 1.0);
        builder.add_edge("b", "c", 1.0);
        let graph = builder.build();

        let error = find_path_with_limits(&graph, "a", "c", &SearchLimits::with_max_expansions(1))
            .expect_err("budget too small");
        assert!(matches!(error, Error::SearchBudgetExhausted { .. }));

        let path = find_path_with_limits(&graph, "a", "c", &SearchLimits::with_max_expansions(2))
            .expect("budget sufficient")
            .expect("reachable");
        assert_eq!(path.ids(), vec!["a", "b", "c"]);
    }

    #[test]
    fn equal_cost_ties_are_deterministic() {
        // Two mirror-image routes of identical cost.
        let build = || {
            let mut builder = builder_with(&[
                ("start", 0.0, 0.0),
                ("north", 0.5, 0.5),
                ("south", -0.5, 0.5),
                ("goal", 0.0, 1.0),
            ]);
            builder.add_edge("start", "north", 1.0);
            builder.add_edge("start", "south", 1.0);
            builder.add_edge("north", "goal", 1.0);
            builder.add_edge("south", "goal", 1.0);
            builder.build()
        };

        let first = find_path(&build(), "start", "goal").expect("reachable");
        for _ in 0..10 {
            let again = find_path(&build(), "start", "goal").expect("reachable");
            assert_eq!(first.ids(), again.ids());
        }
    }
}
