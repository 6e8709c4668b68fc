//! Coincident vertex grouping.
//!
//! Editable meshes duplicate a vertex for every face that needs its own
//! normal or UV. Those duplicates share a position, and topology queries have
//! to treat them as one point. [`CoincidentVertexIndex`] partitions the vertex
//! array into groups of equal positions and maps each array slot to a dense
//! group id (the "common" index).
//!
//! Positions are quantized onto an integer grid before comparison so the
//! grouping is a true equivalence relation: floating-point noise smaller than
//! one grid step cannot split a group, and two slots either land in the same
//! cell or they don't.

use std::collections::HashMap;

use glam::Vec3;
use wingmesh_config::DEFAULT_COINCIDENT_RESOLUTION;

use crate::types::TopologyError;

/// Partition of vertex indices into coincident groups
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoincidentVertexIndex {
    /// Vertex index -> group id
    index_to_group: Vec<u32>,
    /// Group id -> member vertex indices (ascending)
    groups: Vec<Vec<u32>>,
}

/// Snap a position onto the integer grid used for equality.
fn quantize(p: Vec3, resolution: f64) -> [i64; 3] {
    [
        (p.x as f64 * resolution).round() as i64,
        (p.y as f64 * resolution).round() as i64,
        (p.z as f64 * resolution).round() as i64,
    ]
}

impl CoincidentVertexIndex {
    /// Group positions with the default resolution (1e4 steps per unit)
    pub fn build(positions: &[Vec3]) -> Result<Self, TopologyError> {
        Self::build_with_resolution(positions, DEFAULT_COINCIDENT_RESOLUTION)
    }

    /// Group positions that fall on the same cell of a grid with
    /// `resolution` steps per world unit.
    pub fn build_with_resolution(
        positions: &[Vec3],
        resolution: f32,
    ) -> Result<Self, TopologyError> {
        if positions.is_empty() {
            return Err(TopologyError::InvalidArgument(
                "positions must not be empty".to_string(),
            ));
        }
        if !resolution.is_finite() || resolution <= 0.0 {
            return Err(TopologyError::InvalidArgument(format!(
                "coincident resolution must be positive and finite, got {}",
                resolution
            )));
        }
        // NaN would quantize onto the origin cell
        if let Some(i) = positions.iter().position(|p| !p.is_finite()) {
            return Err(TopologyError::InvalidArgument(format!(
                "position {} is not finite: {}",
                i, positions[i]
            )));
        }

        let resolution = resolution as f64;
        let mut cell_to_group: HashMap<[i64; 3], u32> = HashMap::with_capacity(positions.len());
        let mut index_to_group = Vec::with_capacity(positions.len());
        let mut groups: Vec<Vec<u32>> = Vec::new();

        for (i, p) in positions.iter().enumerate() {
            let group = *cell_to_group.entry(quantize(*p, resolution)).or_insert_with(|| {
                groups.push(Vec::new());
                (groups.len() - 1) as u32
            });
            groups[group as usize].push(i as u32);
            index_to_group.push(group);
        }

        let welded = positions.len() - groups.len();
        if welded > 0 {
            tracing::debug!(
                "coincident index: {} duplicate slots ({} unique of {} total)",
                welded,
                groups.len(),
                positions.len()
            );
        }

        Ok(Self {
            index_to_group,
            groups,
        })
    }

    /// Group a flat `[x, y, z, x, y, z, ...]` buffer, as uploaded to the GPU.
    pub fn from_flat_positions(flat: &[f32], resolution: f32) -> Result<Self, TopologyError> {
        let triples: &[[f32; 3]] = bytemuck::try_cast_slice(flat)
            .map_err(|_| TopologyError::InvalidFlatPositions(flat.len()))?;
        let positions: Vec<Vec3> = triples.iter().map(|p| Vec3::from_array(*p)).collect();
        Self::build_with_resolution(&positions, resolution)
    }

    /// Build from explicit groups, e.g. groups stored alongside a mesh.
    ///
    /// Vertices in `0..vertex_count` not named by any group become singleton
    /// groups appended after the given ones. Fails if a group names a vertex
    /// twice or out of range, or if a group is empty.
    pub fn from_groups<G, I>(vertex_count: usize, groups: G) -> Result<Self, TopologyError>
    where
        G: IntoIterator<Item = I>,
        I: IntoIterator<Item = u32>,
    {
        if vertex_count == 0 {
            return Err(TopologyError::InvalidArgument(
                "vertex count must not be zero".to_string(),
            ));
        }

        let mut index_to_group = vec![u32::MAX; vertex_count];
        let mut out: Vec<Vec<u32>> = Vec::new();

        for group in groups {
            let id = out.len() as u32;
            let mut members: Vec<u32> = Vec::new();
            for vertex in group {
                let slot = index_to_group.get_mut(vertex as usize).ok_or(
                    TopologyError::VertexOutOfRange {
                        vertex,
                        vertex_count,
                    },
                )?;
                if *slot != u32::MAX {
                    return Err(TopologyError::InvalidArgument(format!(
                        "vertex {} appears in more than one coincident group",
                        vertex
                    )));
                }
                *slot = id;
                members.push(vertex);
            }
            if members.is_empty() {
                return Err(TopologyError::InvalidArgument(format!(
                    "coincident group {} is empty",
                    id
                )));
            }
            members.sort_unstable();
            out.push(members);
        }

        for (vertex, slot) in index_to_group.iter_mut().enumerate() {
            if *slot == u32::MAX {
                *slot = out.len() as u32;
                out.push(vec![vertex as u32]);
            }
        }

        Ok(Self {
            index_to_group,
            groups: out,
        })
    }

    /// Number of vertex slots covered
    pub fn vertex_count(&self) -> usize {
        self.index_to_group.len()
    }

    /// Number of distinct positions
    pub fn group_count(&self) -> usize {
        self.groups.len()
    }

    /// Group id of a vertex slot
    pub fn common_index(&self, vertex: u32) -> Option<u32> {
        self.index_to_group.get(vertex as usize).copied()
    }

    /// Group id of a vertex slot, failing for slots outside the index
    pub fn try_common_index(&self, vertex: u32) -> Result<u32, TopologyError> {
        self.common_index(vertex)
            .ok_or(TopologyError::VertexOutOfRange {
                vertex,
                vertex_count: self.vertex_count(),
            })
    }

    /// Member slots of a group
    pub fn members(&self, group: u32) -> Option<&[u32]> {
        self.groups.get(group as usize).map(Vec::as_slice)
    }

    /// All slots sharing a position with `vertex`, including itself
    pub fn coincident_with(&self, vertex: u32) -> &[u32] {
        self.common_index(vertex)
            .and_then(|g| self.members(g))
            .unwrap_or(&[])
    }

    /// Whether two slots occupy the same position
    pub fn are_coincident(&self, a: u32, b: u32) -> bool {
        match (self.common_index(a), self.common_index(b)) {
            (Some(ga), Some(gb)) => ga == gb,
            _ => false,
        }
    }

    /// Full vertex -> group table
    pub fn index_to_group(&self) -> &[u32] {
        &self.index_to_group
    }

    /// All groups, indexed by group id
    pub fn groups(&self) -> &[Vec<u32>] {
        &self.groups
    }
}
