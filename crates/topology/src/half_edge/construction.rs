//! Construction methods for HalfEdgeGraph.

use std::collections::HashMap;

use super::HalfEdgeGraph;
use super::types::{FaceId, FaceRing, HalfEdge, HalfEdgeId};
use crate::coincident::CoincidentVertexIndex;
use crate::constants::MIN_FACE_INDICES;
use crate::edge::{Edge, EdgeLookup};
use crate::types::{Face, TopologyError};

impl HalfEdgeGraph {
    /// Build the graph over every face of a mesh
    pub fn build(faces: &[Face], index: &CoincidentVertexIndex) -> Result<Self, TopologyError> {
        let selection: Vec<usize> = (0..faces.len()).collect();
        Self::build_for_faces(faces, &selection, index)
    }

    /// Build the graph over a subset of faces.
    ///
    /// `selection` holds indices into `faces`; rings are created in that
    /// order and half-edges only find opposites among selected faces.
    /// Repeated selection entries are ignored.
    pub fn build_for_faces(
        faces: &[Face],
        selection: &[usize],
        index: &CoincidentVertexIndex,
    ) -> Result<Self, TopologyError> {
        // Reject bad input before any half-edge is created
        let mut total = 0;
        for &f in selection {
            let face = faces.get(f).ok_or(TopologyError::FaceOutOfRange {
                index: f,
                face_count: faces.len(),
            })?;
            if face.indices.len() < MIN_FACE_INDICES {
                return Err(TopologyError::DegenerateFace {
                    face: f,
                    count: face.indices.len(),
                });
            }
            for &v in &face.indices {
                index.try_common_index(v)?;
            }
            total += face.indices.len();
        }

        let mut half_edges: Vec<HalfEdge> = Vec::with_capacity(total);
        let mut rings: Vec<FaceRing> = Vec::with_capacity(selection.len());
        let mut face_to_ring: HashMap<FaceId, usize> = HashMap::with_capacity(selection.len());

        for &f in selection {
            let face_id = FaceId(f as u32);
            if face_to_ring.contains_key(&face_id) {
                continue;
            }

            let indices = &faces[f].indices;
            let len = indices.len() as u32;
            let first = half_edges.len() as u32;

            for n in 0..len {
                let a = indices[n as usize];
                let b = indices[((n + 1) % len) as usize];
                half_edges.push(HalfEdge {
                    id: HalfEdgeId(first + n),
                    face: face_id,
                    edge: EdgeLookup::from_local(Edge::new(a, b), index)?,
                    next: HalfEdgeId(first + (n + 1) % len),
                    prev: HalfEdgeId(first + (n + len - 1) % len),
                    opposite: None,
                });
            }

            face_to_ring.insert(face_id, rings.len());
            rings.push(FaceRing {
                face: face_id,
                first: HalfEdgeId(first),
                len,
            });
        }

        let non_manifold = link_opposites(&mut half_edges);

        if !non_manifold.is_empty() {
            tracing::warn!(
                "half-edge graph: {} half-edges on non-manifold edges left without an opposite",
                non_manifold.len()
            );
        }
        tracing::debug!(
            "half-edge graph: {} faces, {} half-edges",
            rings.len(),
            half_edges.len()
        );

        Ok(Self {
            half_edges,
            rings,
            face_to_ring,
            non_manifold,
        })
    }
}

/// Pair half-edges that share a common edge.
///
/// For each common edge the first half-edge (in creation order) pairs with
/// the next one that belongs to a different face. When more than two
/// half-edges share the edge, the unpaired ones are returned.
fn link_opposites(half_edges: &mut [HalfEdge]) -> Vec<HalfEdgeId> {
    let mut by_edge: HashMap<EdgeLookup, Vec<HalfEdgeId>> = HashMap::new();
    for he in half_edges.iter() {
        by_edge.entry(he.edge).or_default().push(he.id);
    }

    let mut non_manifold = Vec::new();
    for members in by_edge.values() {
        let first = members[0];
        let first_face = half_edges[first.index()].face;
        let second = members[1..]
            .iter()
            .copied()
            .find(|m| half_edges[m.index()].face != first_face);

        if let Some(second) = second {
            half_edges[first.index()].opposite = Some(second);
            half_edges[second.index()].opposite = Some(first);
        }

        if members.len() > 2 {
            non_manifold.extend(
                members
                    .iter()
                    .copied()
                    .filter(|&m| m != first && Some(m) != second),
            );
        }
    }

    non_manifold.sort_unstable();
    non_manifold
}
