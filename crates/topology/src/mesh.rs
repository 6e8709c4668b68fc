//! Minimal versioned polygon mesh
//!
//! [`PolyMesh`] is the surface the topology tools read from: vertex slot
//! positions plus polygon faces. Every mesh carries a process-unique
//! [`MeshId`] and a version that increments on each geometry edit, so caches
//! like [`FacePathfinder`](crate::path::FacePathfinder) can tell when their
//! data went stale.

use std::sync::atomic::{AtomicU64, Ordering};

use glam::Vec3;
use serde::{Deserialize, Serialize};
use wingmesh_config::TopologyConfig;

use crate::coincident::CoincidentVertexIndex;
use crate::half_edge::HalfEdgeGraph;
use crate::smoothing::{self, SmoothingSummary};
use crate::types::{Face, TopologyError};

#[cfg(feature = "bevy")]
use bevy::mesh::{Indices, Mesh};

/// Process-unique mesh identity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MeshId(pub u64);

impl MeshId {
    /// Allocate a fresh id
    pub fn next() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(1);
        Self(NEXT.fetch_add(1, Ordering::Relaxed))
    }
}

/// Polygon mesh with split vertex slots
///
/// Cloning a mesh gives the clone a new id, so caches never mix up the two.
#[derive(Debug)]
pub struct PolyMesh {
    id: MeshId,
    version: u64,
    positions: Vec<Vec3>,
    faces: Vec<Face>,
}

impl Clone for PolyMesh {
    fn clone(&self) -> Self {
        Self {
            id: MeshId::next(),
            version: self.version,
            positions: self.positions.clone(),
            faces: self.faces.clone(),
        }
    }
}

impl PolyMesh {
    pub fn new(positions: Vec<Vec3>, faces: Vec<Face>) -> Self {
        Self {
            id: MeshId::next(),
            version: 0,
            positions,
            faces,
        }
    }

    pub fn id(&self) -> MeshId {
        self.id
    }

    /// Incremented on every edit of positions or faces
    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn positions(&self) -> &[Vec3] {
        &self.positions
    }

    pub fn faces(&self) -> &[Face] {
        &self.faces
    }

    pub fn face(&self, face: usize) -> Result<&Face, TopologyError> {
        self.faces.get(face).ok_or(TopologyError::FaceOutOfRange {
            index: face,
            face_count: self.faces.len(),
        })
    }

    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    /// Mutable positions. Bumps the version.
    pub fn positions_mut(&mut self) -> &mut Vec<Vec3> {
        self.mark_modified();
        &mut self.positions
    }

    /// Mutable faces. Bumps the version.
    pub fn faces_mut(&mut self) -> &mut Vec<Face> {
        self.mark_modified();
        &mut self.faces
    }

    pub fn set_positions(&mut self, positions: Vec<Vec3>) {
        self.positions = positions;
        self.mark_modified();
    }

    pub fn set_faces(&mut self, faces: Vec<Face>) {
        self.faces = faces;
        self.mark_modified();
    }

    /// Flag the mesh as edited so derived caches rebuild
    pub fn mark_modified(&mut self) {
        self.version = self.version.wrapping_add(1);
    }

    fn position(&self, vertex: u32) -> Result<Vec3, TopologyError> {
        self.positions
            .get(vertex as usize)
            .copied()
            .ok_or(TopologyError::VertexOutOfRange {
                vertex,
                vertex_count: self.positions.len(),
            })
    }

    /// Average of the face's vertex positions.
    ///
    /// Every boundary entry counts, so a repeated index weighs in twice.
    pub fn face_centroid(&self, face: usize) -> Result<Vec3, TopologyError> {
        let indices = &self.face(face)?.indices;
        if indices.is_empty() {
            return Err(TopologyError::DegenerateFace { face, count: 0 });
        }

        let mut sum = Vec3::ZERO;
        for &v in indices {
            sum += self.position(v)?;
        }
        Ok(sum / indices.len() as f32)
    }

    /// Unit face normal by Newell's method.
    ///
    /// Works for non-planar and concave polygons. Zero if the face has no area.
    pub fn face_normal(&self, face: usize) -> Result<Vec3, TopologyError> {
        let indices = &self.face(face)?.indices;
        let mut normal = Vec3::ZERO;
        for (i, &v) in indices.iter().enumerate() {
            let current = self.position(v)?;
            let next = self.position(indices[(i + 1) % indices.len()])?;
            normal.x += (current.y - next.y) * (current.z + next.z);
            normal.y += (current.z - next.z) * (current.x + next.x);
            normal.z += (current.x - next.x) * (current.y + next.y);
        }
        Ok(normal.normalize_or_zero())
    }

    /// Coincident groups at the default resolution
    pub fn coincident_index(&self) -> Result<CoincidentVertexIndex, TopologyError> {
        CoincidentVertexIndex::build(&self.positions)
    }

    pub fn coincident_index_with_config(
        &self,
        config: &TopologyConfig,
    ) -> Result<CoincidentVertexIndex, TopologyError> {
        CoincidentVertexIndex::build_with_resolution(&self.positions, config.coincident_resolution)
    }

    /// Half-edge graph over every face
    pub fn half_edge_graph(&self) -> Result<HalfEdgeGraph, TopologyError> {
        let index = self.coincident_index()?;
        HalfEdgeGraph::build(&self.faces, &index)
    }

    /// Assign smoothing groups to every face.
    ///
    /// Smoothing tags don't change geometry, so the version stays the same.
    pub fn apply_smoothing_groups(
        &mut self,
        angle_degrees: f32,
        normals: &[Vec3],
    ) -> Result<SmoothingSummary, TopologyError> {
        let selection: Vec<usize> = (0..self.faces.len()).collect();
        self.apply_smoothing_groups_to(&selection, angle_degrees, normals)
    }

    /// Assign smoothing groups to the selected faces
    pub fn apply_smoothing_groups_to(
        &mut self,
        selection: &[usize],
        angle_degrees: f32,
        normals: &[Vec3],
    ) -> Result<SmoothingSummary, TopologyError> {
        let index = self.coincident_index()?;
        let graph = HalfEdgeGraph::build_for_faces(&self.faces, selection, &index)?;
        smoothing::apply_smoothing_groups(&mut self.faces, selection, &graph, angle_degrees, normals)
    }

    /// Assign smoothing groups to every face using the configured resolution
    /// and angle
    pub fn apply_smoothing_groups_with_config(
        &mut self,
        config: &TopologyConfig,
        normals: &[Vec3],
    ) -> Result<SmoothingSummary, TopologyError> {
        let index = self.coincident_index_with_config(config)?;
        let graph = HalfEdgeGraph::build(&self.faces, &index)?;
        let selection: Vec<usize> = (0..self.faces.len()).collect();
        smoothing::apply_smoothing_groups(
            &mut self.faces,
            &selection,
            &graph,
            config.clamped_smoothing_angle(),
            normals,
        )
    }

    /// Build a triangle mesh from a Bevy mesh.
    ///
    /// Vertex slots are kept as they are (no welding); shared positions are
    /// resolved later through the coincident index.
    #[cfg(feature = "bevy")]
    pub fn from_bevy_mesh(mesh: &Mesh) -> Result<Self, TopologyError> {
        let positions: Vec<Vec3> = mesh
            .attribute(Mesh::ATTRIBUTE_POSITION)
            .and_then(|attr| attr.as_float3())
            .ok_or(TopologyError::NoPositions)?
            .iter()
            .map(|&p| Vec3::from_array(p))
            .collect();

        let indices: Vec<u32> = match mesh.indices() {
            Some(Indices::U16(idx)) => idx.iter().map(|&i| i as u32).collect(),
            Some(Indices::U32(idx)) => idx.to_vec(),
            None => return Err(TopologyError::NoIndices),
        };

        if indices.len() % 3 != 0 {
            return Err(TopologyError::InvalidTopology(
                "Index count not divisible by 3".to_string(),
            ));
        }
        if let Some(&vertex) = indices.iter().find(|&&i| i as usize >= positions.len()) {
            return Err(TopologyError::VertexOutOfRange {
                vertex,
                vertex_count: positions.len(),
            });
        }

        let faces: Vec<Face> = indices.chunks_exact(3).map(Face::new).collect();

        tracing::debug!(
            "from_bevy_mesh: {} vertex slots, {} triangles",
            positions.len(),
            faces.len()
        );

        Ok(Self::new(positions, faces))
    }

    /// Per-slot normals of a Bevy mesh, if it has any
    #[cfg(feature = "bevy")]
    pub fn bevy_normals(mesh: &Mesh) -> Option<Vec<Vec3>> {
        mesh.attribute(Mesh::ATTRIBUTE_NORMAL)
            .and_then(|attr| attr.as_float3())
            .map(|n| n.iter().map(|&v| Vec3::from_array(v)).collect())
    }
}
