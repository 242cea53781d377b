//! KD-tree backed nearest-node lookup.
//!
//! Node locations are projected onto the unit sphere as 3D Cartesian
//! coordinates. Chord length between two unit vectors grows monotonically
//! with their great-circle distance, so the KD-tree's squared-Euclidean
//! ordering matches haversine ordering. A handful of candidates are fetched
//! and re-ranked with the exact haversine distance to absorb floating-point
//! noise near ties.

use std::collections::HashSet;
use std::fmt;

use kiddo::float::kdtree::KdTree;
use kiddo::SquaredEuclidean;

use crate::geodesy::{distance, GeoPoint};

/// KD-tree bucket size (kiddo default).
const BUCKET_SIZE: usize = 32;

/// Candidates fetched from the tree before exact re-ranking.
const RERANK_CANDIDATES: usize = 8;

/// Spatial index over node positions, addressed by insertion index.
pub struct NodeLocator {
    tree: KdTree<f64, usize, 3, BUCKET_SIZE, u32>,
    positions: Vec<GeoPoint>,
}

impl NodeLocator {
    /// Index the given positions; item `i` refers to `positions[i]`.
    ///
    /// Co-located positions are stored once under their lowest index, which
    /// is also the index a lookup would resolve the tie to. kiddo cannot hold
    /// more than `BUCKET_SIZE` items at one exact point.
    pub fn build(positions: Vec<GeoPoint>) -> Self {
        let mut tree: KdTree<f64, usize, 3, BUCKET_SIZE, u32> = KdTree::new();
        let mut seen = HashSet::new();
        for (index, position) in positions.iter().enumerate() {
            let vector = unit_vector(position);
            if seen.insert(vector.map(f64::to_bits)) {
                tree.add(&vector, index);
            }
        }
        Self { tree, positions }
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Closest indexed position within `max_radius_m` meters of `point`.
    ///
    /// Returns `(index, distance_m)`. Equal distances resolve to the lower
    /// index.
    pub fn nearest_within(&self, point: &GeoPoint, max_radius_m: f64) -> Option<(usize, f64)> {
        if self.positions.is_empty() || max_radius_m.is_nan() || max_radius_m < 0.0 {
            return None;
        }

        let query = unit_vector(point);
        let k = RERANK_CANDIDATES.min(self.tree.size());
        self.tree
            .nearest_n::<SquaredEuclidean>(&query, k)
            .into_iter()
            .map(|neighbour| {
                let index = neighbour.item;
                (index, distance(point, &self.positions[index]))
            })
            .filter(|(_, meters)| *meters <= max_radius_m)
            .min_by(|a, b| a.1.total_cmp(&b.1).then_with(|| a.0.cmp(&b.0)))
    }
}

impl fmt::Debug for NodeLocator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NodeLocator")
            .field("nodes", &self.positions.len())
            .finish()
    }
}

fn unit_vector(point: &GeoPoint) -> [f64; 3] {
    let lat = point.latitude.to_radians();
    let lon = point.longitude.to_radians();
    [lat.cos() * lon.cos(), lat.cos() * lon.sin(), lat.sin()]
}
