//! wingmesh topology core - adjacency, smoothing and face paths for editable meshes
//!
//! Editable meshes split vertices into several array slots that sit at the
//! same position (hard edges, UV seams). This crate reasons about such meshes:
//! - [`coincident`] - Groups array slots that share a position
//! - [`edge`] - Order-independent edges and their coincident-aware lookups
//! - [`half_edge`] - Per-face rings of half-edges with cross-face opposites
//! - [`smoothing`] - Flood-fill of smoothing groups across soft edges
//! - [`path`] - Shortest paths over the face graph with a caller-owned cache
//! - [`mesh`] - Minimal versioned polygon mesh the tools operate on

pub mod coincident;
pub mod constants;
pub mod edge;
pub mod half_edge;
pub mod mesh;
pub mod path;
pub mod smoothing;
pub mod types;

#[cfg(test)]
pub(crate) mod test_meshes;

pub use coincident::CoincidentVertexIndex;
pub use constants::*;
pub use edge::{Edge, EdgeLookup};
pub use half_edge::{FaceId, FaceRing, HalfEdge, HalfEdgeGraph, HalfEdgeId, ManifoldError};
pub use mesh::{MeshId, PolyMesh};
pub use path::{FacePathfinder, FaceRoute, shortest_face_path};
pub use smoothing::{
    SmoothingAssignment, SmoothingSummary, apply_smoothing_groups, compute_smoothing_groups,
};
pub use types::{Face, TopologyError};

pub use wingmesh_config::{PathWeights, TopologyConfig};
