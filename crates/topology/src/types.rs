use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::constants::{MIN_FACE_INDICES, SMOOTHING_GROUP_NONE};
use crate::edge::Edge;

/// A polygon of an editable mesh
///
/// Only the ordered boundary and the smoothing tag matter to the topology
/// core. Materials, UV settings and the like live with the surrounding editor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Face {
    /// Vertex indices in boundary order
    pub indices: Vec<u32>,
    /// Smoothing group tag (0 = hard)
    pub smoothing_group: i32,
}

impl Face {
    /// Create a hard face from its boundary indices
    pub fn new(indices: impl Into<Vec<u32>>) -> Self {
        Self {
            indices: indices.into(),
            smoothing_group: SMOOTHING_GROUP_NONE,
        }
    }

    /// Same face tagged with a smoothing group
    pub fn with_smoothing_group(mut self, smoothing_group: i32) -> Self {
        self.smoothing_group = smoothing_group;
        self
    }

    /// Number of boundary indices
    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// A face needs at least three indices to bound any area
    pub fn is_valid(&self) -> bool {
        self.indices.len() >= MIN_FACE_INDICES
    }

    pub fn contains_index(&self, index: u32) -> bool {
        self.indices.contains(&index)
    }

    /// Boundary edges in order, wrapping from the last index to the first
    pub fn edges(&self) -> Vec<Edge> {
        let len = self.indices.len();
        (0..len)
            .map(|i| Edge::new(self.indices[i], self.indices[(i + 1) % len]))
            .collect()
    }

    /// Indices with duplicates removed, first occurrence order kept
    pub fn distinct_indices(&self) -> Vec<u32> {
        let mut out = Vec::with_capacity(self.indices.len());
        for &i in &self.indices {
            if !out.contains(&i) {
                out.push(i);
            }
        }
        out
    }
}

/// Errors raised by the topology core
///
/// Every variant is an invalid-argument condition: the call that produced it
/// made no changes to its inputs. Unreachable faces are not errors.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TopologyError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
    #[error("Face index {index} out of range (face count {face_count})")]
    FaceOutOfRange { index: usize, face_count: usize },
    #[error("Face {face} has {count} indices, at least 3 are required")]
    DegenerateFace { face: usize, count: usize },
    #[error("Vertex index {vertex} out of range (vertex count {vertex_count})")]
    VertexOutOfRange { vertex: u32, vertex_count: usize },
    #[error("Vertex {vertex} has no normal (normal count {normal_count})")]
    NormalsOutOfRange { vertex: u32, normal_count: usize },
    #[error("Flat position buffer of length {0} is not a multiple of 3")]
    InvalidFlatPositions(usize),
    #[error("Invalid half-edge topology: {0}")]
    InvalidTopology(String),
    #[error("Mesh has no position attribute")]
    NoPositions,
    #[error("Mesh has no indices")]
    NoIndices,
}
