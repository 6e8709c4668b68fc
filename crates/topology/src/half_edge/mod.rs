//! Half-edge ("winged edge") graph over the faces of an editable mesh
//!
//! Every face becomes a ring of half-edges linked by `next`/`prev`. Rings of
//! adjoining faces are linked through `opposite`, matched on the common
//! (coincident-group) edge so faces that only share positions, not vertex
//! slots, are still neighbours.
//!
//! The graph is a flat array addressed by [`HalfEdgeId`]. It is never patched
//! in place: when faces or coincident groups change, build a new one.

mod construction;
mod topology;
mod types;
mod validation;

use std::collections::HashMap;

pub use topology::{RingIter, sort_edges_by_adjacency};
pub use types::{FaceId, FaceRing, HalfEdge, HalfEdgeId};
pub use validation::ManifoldError;

/// Half-edge adjacency graph
#[derive(Debug, Clone, Default)]
pub struct HalfEdgeGraph {
    pub(crate) half_edges: Vec<HalfEdge>,
    /// Rings in the order their faces were given
    pub(crate) rings: Vec<FaceRing>,
    /// Map from face to its position in `rings`
    pub(crate) face_to_ring: HashMap<FaceId, usize>,
    /// Half-edges left unpaired because their common edge has more than two
    /// half-edges
    pub(crate) non_manifold: Vec<HalfEdgeId>,
}
