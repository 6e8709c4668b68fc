//! Type definitions for the half-edge graph.

use crate::edge::EdgeLookup;

/// Type-safe half-edge identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct HalfEdgeId(pub u32);

/// Type-safe face identifier (index into the mesh face array)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FaceId(pub u32);

impl HalfEdgeId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl FaceId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// One directed segment of a face boundary
///
/// ```text
///        /   (face)    /
///  prev /             / next
///      /    edge     /
///     /_ _ _ _ _ _ _/
///     |- - - - - - -|
///     |  opposite   |
/// ```
#[derive(Debug, Clone)]
pub struct HalfEdge {
    pub id: HalfEdgeId,
    /// The face whose boundary this segment belongs to
    pub face: FaceId,
    /// Local and common edge of the segment, oriented along the boundary
    pub edge: EdgeLookup,
    /// The next half-edge around the face (towards `edge.local.b`)
    pub next: HalfEdgeId,
    /// The previous half-edge around the face (towards `edge.local.a`)
    pub prev: HalfEdgeId,
    /// The half-edge of the adjoining face on the same common edge
    /// (None for boundary and excess non-manifold half-edges)
    pub opposite: Option<HalfEdgeId>,
}

/// The closed boundary of one face
///
/// Half-edges of a ring are stored contiguously starting at `first`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FaceRing {
    pub face: FaceId,
    pub first: HalfEdgeId,
    pub len: u32,
}
