//! Validation methods for HalfEdgeGraph.
//!
//! Provides graph validation including:
//! - Ring closure and next/prev consistency
//! - Opposite symmetry
//! - Manifold edge checking

use std::collections::HashMap;

use super::HalfEdgeGraph;
use super::types::HalfEdgeId;
use crate::edge::Edge;
use crate::types::TopologyError;

impl HalfEdgeGraph {
    /// Validate the graph structure.
    ///
    /// Checks that:
    /// 1. Every ring closes after exactly `len` steps and stays on its face
    /// 2. `next.prev` and `prev.next` lead back to each half-edge
    /// 3. Every opposite points back and lies on a different face
    pub fn validate(&self) -> Result<(), TopologyError> {
        for ring in &self.rings {
            let mut current = ring.first;
            for _ in 0..ring.len {
                let he = self
                    .half_edge(current)
                    .ok_or_else(|| TopologyError::InvalidTopology(format!(
                        "Ring of face {:?} references missing half-edge {:?}",
                        ring.face, current
                    )))?;
                if he.face != ring.face {
                    return Err(TopologyError::InvalidTopology(format!(
                        "Half-edge {:?} is on face {:?}, expected {:?}",
                        he.id, he.face, ring.face
                    )));
                }
                current = he.next;
            }
            if current != ring.first {
                return Err(TopologyError::InvalidTopology(format!(
                    "Ring of face {:?} does not close after {} steps",
                    ring.face, ring.len
                )));
            }
        }

        for he in &self.half_edges {
            let next = self.half_edge(he.next).ok_or_else(|| {
                TopologyError::InvalidTopology(format!(
                    "Half-edge {:?}: next {:?} doesn't exist",
                    he.id, he.next
                ))
            })?;
            if next.prev != he.id {
                return Err(TopologyError::InvalidTopology(format!(
                    "Half-edge {:?}: next.prev = {:?}, expected {:?}",
                    he.id, next.prev, he.id
                )));
            }

            let prev = self.half_edge(he.prev).ok_or_else(|| {
                TopologyError::InvalidTopology(format!(
                    "Half-edge {:?}: prev {:?} doesn't exist",
                    he.id, he.prev
                ))
            })?;
            if prev.next != he.id {
                return Err(TopologyError::InvalidTopology(format!(
                    "Half-edge {:?}: prev.next = {:?}, expected {:?}",
                    he.id, prev.next, he.id
                )));
            }

            if let Some(opposite_id) = he.opposite {
                let opposite = self.half_edge(opposite_id).ok_or_else(|| {
                    TopologyError::InvalidTopology(format!(
                        "Half-edge {:?}: opposite {:?} doesn't exist",
                        he.id, opposite_id
                    ))
                })?;
                if opposite.opposite != Some(he.id) {
                    return Err(TopologyError::InvalidTopology(format!(
                        "Half-edge {:?}: opposite.opposite = {:?}, expected Some({:?})",
                        he.id, opposite.opposite, he.id
                    )));
                }
                if opposite.face == he.face {
                    return Err(TopologyError::InvalidTopology(format!(
                        "Half-edge {:?}: opposite {:?} is on the same face",
                        he.id, opposite_id
                    )));
                }
            }
        }

        Ok(())
    }

    // =========================================================================
    // Manifold Validation
    // =========================================================================

    /// Check that every common edge is shared by at most two half-edges.
    pub fn check_manifold(&self) -> Result<(), ManifoldError> {
        let mut counts: HashMap<Edge, (HalfEdgeId, usize)> = HashMap::new();
        for he in &self.half_edges {
            counts.entry(he.edge.common).or_insert((he.id, 0)).1 += 1;
        }

        let mut worst: Option<(HalfEdgeId, Edge, usize)> = None;
        for (edge, (first, count)) in counts {
            if count > 2 && worst.is_none_or(|(id, _, _)| first < id) {
                worst = Some((first, edge, count));
            }
        }

        match worst {
            Some((half_edge, common, face_count)) => Err(ManifoldError::NonManifoldEdge {
                half_edge,
                common,
                face_count,
            }),
            None => Ok(()),
        }
    }

    /// Whether any half-edge had to be left unpaired on a non-manifold edge.
    pub fn is_manifold(&self) -> bool {
        self.non_manifold.is_empty()
    }
}

/// Error types for manifold validation.
#[derive(Debug, Clone, PartialEq)]
pub enum ManifoldError {
    /// A common edge is shared by more than two half-edges
    NonManifoldEdge {
        /// First half-edge created on the edge
        half_edge: HalfEdgeId,
        common: Edge,
        face_count: usize,
    },
}

impl std::fmt::Display for ManifoldError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NonManifoldEdge {
                half_edge,
                common,
                face_count,
            } => {
                write!(
                    f,
                    "Non-manifold edge {} at {:?}: shared by {} faces",
                    common, half_edge, face_count
                )
            }
        }
    }
}

impl std::error::Error for ManifoldError {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coincident::CoincidentVertexIndex;
    use crate::test_meshes;

    #[test]
    fn test_validate_detects_broken_opposite() {
        let (positions, faces) = test_meshes::split_quad_strip(2);
        let index = CoincidentVertexIndex::build(&positions).unwrap();
        let mut graph = HalfEdgeGraph::build(&faces, &index).unwrap();
        assert!(graph.validate().is_ok());

        let paired = graph
            .half_edges
            .iter()
            .position(|he| he.opposite.is_some())
            .unwrap();
        graph.half_edges[paired].opposite = Some(HalfEdgeId(paired as u32));

        assert!(matches!(
            graph.validate(),
            Err(TopologyError::InvalidTopology(_))
        ));
    }

    #[test]
    fn test_validate_detects_open_ring() {
        let (positions, faces) = test_meshes::single_triangle();
        let index = CoincidentVertexIndex::build(&positions).unwrap();
        let mut graph = HalfEdgeGraph::build(&faces, &index).unwrap();

        graph.half_edges[2].next = HalfEdgeId(1);
        assert!(graph.validate().is_err());
    }

    #[test]
    fn test_manifold_error_message() {
        let (positions, faces) = test_meshes::fin();
        let index = CoincidentVertexIndex::build(&positions).unwrap();
        let graph = HalfEdgeGraph::build(&faces, &index).unwrap();

        assert!(!graph.is_manifold());
        let err = graph.check_manifold().unwrap_err();
        assert_eq!(
            err.to_string(),
            "Non-manifold edge [0, 1] at HalfEdgeId(0): shared by 3 faces"
        );
    }
}
