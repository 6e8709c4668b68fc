//! Topology query methods for HalfEdgeGraph.

use std::collections::{HashMap, HashSet};

use super::HalfEdgeGraph;
use super::types::{FaceId, FaceRing, HalfEdge, HalfEdgeId};
use crate::edge::Edge;

/// Iterator over one face ring, starting at any of its half-edges
pub struct RingIter<'a> {
    graph: &'a HalfEdgeGraph,
    start: HalfEdgeId,
    current: Option<HalfEdgeId>,
}

impl<'a> Iterator for RingIter<'a> {
    type Item = &'a HalfEdge;

    fn next(&mut self) -> Option<Self::Item> {
        let he = self.graph.half_edge(self.current?)?;
        self.current = Some(he.next).filter(|&next| next != self.start);
        Some(he)
    }
}

impl HalfEdgeGraph {
    // ========================================================================
    // Accessors
    // ========================================================================

    /// Get half-edge by ID
    pub fn half_edge(&self, id: HalfEdgeId) -> Option<&HalfEdge> {
        self.half_edges.get(id.index())
    }

    /// Get all half-edges
    pub fn half_edges(&self) -> &[HalfEdge] {
        &self.half_edges
    }

    /// Get all face rings, in build order
    pub fn rings(&self) -> &[FaceRing] {
        &self.rings
    }

    /// Ring of a face, if the face is part of the graph
    pub fn face_ring(&self, face: FaceId) -> Option<&FaceRing> {
        self.face_to_ring.get(&face).map(|&i| &self.rings[i])
    }

    /// Number of half-edges
    pub fn half_edge_count(&self) -> usize {
        self.half_edges.len()
    }

    /// Number of faces
    pub fn ring_count(&self) -> usize {
        self.rings.len()
    }

    /// Number of edges (paired half-edges count once, unpaired ones once each)
    pub fn edge_count(&self) -> usize {
        let paired = self.half_edges.iter().filter(|he| he.opposite.is_some()).count();
        let unpaired = self.half_edges.len() - paired;
        paired / 2 + unpaired
    }

    /// Half-edges whose common edge is shared by more than two half-edges
    /// and that were left without an opposite
    pub fn non_manifold(&self) -> &[HalfEdgeId] {
        &self.non_manifold
    }

    // ========================================================================
    // Topology Queries
    // ========================================================================

    /// Walk a ring starting at `start`
    pub fn ring(&self, start: HalfEdgeId) -> RingIter<'_> {
        RingIter {
            graph: self,
            start,
            current: Some(start),
        }
    }

    /// Number of half-edges reached by following `next` from `start`
    pub fn ring_len(&self, start: HalfEdgeId) -> usize {
        self.ring(start).count()
    }

    /// Face on the other side of a half-edge
    pub fn opposite_face(&self, id: HalfEdgeId) -> Option<FaceId> {
        let opposite = self.half_edge(id)?.opposite?;
        self.half_edge(opposite).map(|he| he.face)
    }

    /// Faces sharing an edge with `face`, in ring order, without repeats
    pub fn neighbor_faces(&self, face: FaceId) -> Vec<FaceId> {
        let mut neighbors = Vec::new();
        let ring = match self.face_ring(face) {
            Some(r) => r,
            None => return neighbors,
        };

        for he in self.ring(ring.first) {
            if let Some(other) = self.opposite_face(he.id) {
                if !neighbors.contains(&other) {
                    neighbors.push(other);
                }
            }
        }

        neighbors
    }

    /// Half-edges without an opposite
    pub fn boundary_half_edges(&self) -> impl Iterator<Item = &HalfEdge> {
        self.half_edges.iter().filter(|he| he.opposite.is_none())
    }

    /// `prev` or `next` of `id` if it touches the common index `common`
    pub fn adjacent_with_common_index(&self, id: HalfEdgeId, common: u32) -> Option<HalfEdgeId> {
        let he = self.half_edge(id)?;
        let next = self.half_edge(he.next)?;
        if next.edge.common.contains(common) {
            return Some(next.id);
        }
        let prev = self.half_edge(he.prev)?;
        if prev.edge.common.contains(common) {
            return Some(prev.id);
        }
        None
    }

    /// Map from every common index to the half-edges touching it
    pub fn spokes(&self) -> HashMap<u32, Vec<HalfEdgeId>> {
        let mut spokes: HashMap<u32, Vec<HalfEdgeId>> = HashMap::new();
        for he in &self.half_edges {
            spokes.entry(he.edge.common.a).or_default().push(he.id);
            spokes.entry(he.edge.common.b).or_default().push(he.id);
        }
        spokes
    }

    /// Order the common indices of `common` into a closed loop along the
    /// graph's edges.
    ///
    /// Returns None if the edges between the given indices don't form a full
    /// perimeter.
    pub fn sort_common_indices_by_adjacency(&self, common: &HashSet<u32>) -> Option<Vec<u32>> {
        let mut seen = HashSet::new();
        let mut matches: Vec<Edge> = self
            .half_edges
            .iter()
            .map(|he| he.edge.common)
            .filter(|e| common.contains(&e.a) && common.contains(&e.b))
            .filter(|e| seen.insert(*e))
            .collect();

        if matches.len() != common.len() {
            return None;
        }

        sort_edges_by_adjacency(&mut matches);
        Some(matches.iter().map(|e| e.a).collect())
    }

    /// Merge two adjacent triangles into a quad.
    ///
    /// `left` and `right` are any half-edges of the two triangle rings. The
    /// triangles must share exactly one common edge. Returns the quad's local
    /// indices, starting from the first unshared edge of `left`.
    pub fn make_quad(&self, left: HalfEdgeId, right: HalfEdgeId) -> Option<[u32; 4]> {
        if self.ring_len(left) != 3 || self.ring_len(right) != 3 {
            return None;
        }

        let all: Vec<_> = self
            .ring(left)
            .chain(self.ring(right))
            .map(|he| he.edge)
            .collect();

        let mut shared = [false; 6];
        let mut matches = 0;
        for i in 0..3 {
            for n in 3..6 {
                if all[i] == all[n] {
                    matches += 1;
                    shared[i] = true;
                    shared[n] = true;
                    break;
                }
            }
        }

        if matches != 1 {
            return None;
        }

        let edges: Vec<_> = (0..6).filter(|&i| !shared[i]).map(|i| all[i]).collect();

        let mut quad = [edges[0].local.a, edges[0].local.b, 0, 0];
        let c1 = edges[0].common.b;
        let second = edges[1..].iter().find(|e| e.common.a == c1)?;
        quad[2] = second.local.b;
        let c2 = second.common.b;
        let third = edges[1..].iter().find(|e| e.common.a == c2)?;
        quad[3] = third.local.b;

        Some(quad)
    }
}

/// Reorder edges so each edge's `b` is the next edge's `a`.
///
/// Edges are flipped as needed. Sorting stops at the first break in the
/// chain; the remaining edges stay after it.
pub fn sort_edges_by_adjacency(edges: &mut [Edge]) {
    for i in 1..edges.len() {
        let want = edges[i - 1].b;
        let found = (i..edges.len()).find(|&n| edges[n].contains(want));
        match found {
            Some(n) => {
                edges.swap(i, n);
                if edges[i].a != want {
                    edges[i] = edges[i].reversed();
                }
            }
            None => break,
        }
    }
}
