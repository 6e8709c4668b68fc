//! Smoothing group propagation
//!
//! Faces that meet across a soft edge (vertex normals on both sides agree
//! within the angle threshold) are flooded into one shared smoothing group.
//! A face with no soft neighbour stays hard (group 0).
//!
//! Group ids are picked from the smooth range `1..=24` and continue past the
//! legacy hard range `25..=42`, never reusing an id already held by a face.

use std::collections::{HashMap, HashSet};

use glam::Vec3;
use wingmesh_config::clamp_smoothing_angle;

use crate::constants::{
    HARD_RANGE_MAX, HARD_RANGE_MIN, SMOOTH_RANGE_MAX, SMOOTH_RANGE_MIN, SMOOTHING_GROUP_NONE,
};
use crate::edge::EdgeLookup;
use crate::half_edge::{FaceId, HalfEdgeGraph};
use crate::types::{Face, TopologyError};

/// Whether a group id shares normals across faces
pub fn is_smooth(group: i32) -> bool {
    group > SMOOTHING_GROUP_NONE && (group < HARD_RANGE_MIN || group > HARD_RANGE_MAX)
}

/// First id at or after `start` that isn't in `used`, stepping over the
/// legacy hard range
pub fn next_unused_smoothing_group(start: i32, used: &HashSet<i32>) -> i32 {
    let mut group = start;
    while used.contains(&group) && group < i32::MAX - 1 {
        group += 1;
        if group > SMOOTH_RANGE_MAX && group < HARD_RANGE_MAX {
            group = HARD_RANGE_MAX + 1;
        }
    }
    group
}

/// Smallest smoothing group not used by any face
pub fn unused_smoothing_group(faces: &[Face]) -> i32 {
    let used: HashSet<i32> = faces.iter().map(|f| f.smoothing_group).collect();
    next_unused_smoothing_group(SMOOTH_RANGE_MIN, &used)
}

/// `|cos(angle)|` for an angle in degrees, clamped to `[0, 89.999]`
pub fn smoothing_dot_threshold(angle_degrees: f32) -> f32 {
    clamp_smoothing_angle(angle_degrees).to_radians().cos().abs()
}

/// Whether the normals on both sides of a shared edge agree at each endpoint.
///
/// `left` and `right` are the two half-edges of one common edge. Normals are
/// compared at the matching slots of each endpoint.
pub fn is_soft_edge(normals: &[Vec3], left: &EdgeLookup, right: &EdgeLookup, threshold: f32) -> bool {
    let (rx, ry) = left.matching_local(right);
    let normal = |i: u32| {
        normals
            .get(i as usize)
            .copied()
            .unwrap_or(Vec3::ZERO)
            .normalize_or_zero()
    };

    normal(left.local.a).dot(normal(rx)).abs() > threshold
        && normal(left.local.b).dot(normal(ry)).abs() > threshold
}

/// What a smoothing pass did
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SmoothingSummary {
    /// Number of new groups handed out
    pub groups_created: usize,
    /// Selected faces that ended up in a group
    pub smoothed_faces: usize,
    /// Selected faces left hard
    pub hard_faces: usize,
}

/// Computed smoothing groups, not yet written to any face
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SmoothingAssignment {
    /// (face index, group) in selection order
    groups: Vec<(usize, i32)>,
    summary: SmoothingSummary,
}

impl SmoothingAssignment {
    /// Group of a selected face
    pub fn group(&self, face: usize) -> Option<i32> {
        self.groups.iter().find(|(f, _)| *f == face).map(|(_, g)| *g)
    }

    pub fn groups(&self) -> &[(usize, i32)] {
        &self.groups
    }

    pub fn summary(&self) -> SmoothingSummary {
        self.summary
    }

    /// Write the groups into `faces`.
    ///
    /// Fails without touching any face if a face index is out of range.
    pub fn apply(&self, faces: &mut [Face]) -> Result<SmoothingSummary, TopologyError> {
        if let Some(&(index, _)) = self.groups.iter().find(|(f, _)| *f >= faces.len()) {
            return Err(TopologyError::FaceOutOfRange {
                index,
                face_count: faces.len(),
            });
        }
        for &(face, group) in &self.groups {
            faces[face].smoothing_group = group;
        }
        Ok(self.summary)
    }
}

/// Compute smoothing groups for the selected faces without modifying them.
///
/// `graph` must contain a ring for every selected face. It may cover more
/// faces than the selection; the flood never leaves the selection.
/// `normals` holds one normal per vertex slot.
pub fn compute_smoothing_groups(
    faces: &[Face],
    selection: &[usize],
    graph: &HalfEdgeGraph,
    angle_degrees: f32,
    normals: &[Vec3],
) -> Result<SmoothingAssignment, TopologyError> {
    let mut order: Vec<usize> = Vec::with_capacity(selection.len());
    let mut selected: HashSet<usize> = HashSet::with_capacity(selection.len());
    for &f in selection {
        let face = faces.get(f).ok_or(TopologyError::FaceOutOfRange {
            index: f,
            face_count: faces.len(),
        })?;
        let ring = graph.face_ring(FaceId(f as u32)).ok_or_else(|| {
            TopologyError::InvalidArgument(format!("face {} is not part of the half-edge graph", f))
        })?;
        if ring.len as usize != face.len() {
            return Err(TopologyError::InvalidArgument(format!(
                "face {} has {} indices but its ring has {} half-edges",
                f,
                face.len(),
                ring.len
            )));
        }
        if let Some(&vertex) = face.indices.iter().find(|&&v| v as usize >= normals.len()) {
            return Err(TopologyError::NormalsOutOfRange {
                vertex,
                normal_count: normals.len(),
            });
        }
        if selected.insert(f) {
            order.push(f);
        }
    }

    let threshold = smoothing_dot_threshold(angle_degrees);

    // Selected faces start out hard
    let mut table: HashMap<usize, i32> = order.iter().map(|&f| (f, SMOOTHING_GROUP_NONE)).collect();
    let mut used: HashSet<i32> = faces
        .iter()
        .enumerate()
        .map(|(i, f)| {
            if selected.contains(&i) {
                SMOOTHING_GROUP_NONE
            } else {
                f.smoothing_group
            }
        })
        .collect();
    let mut group = next_unused_smoothing_group(SMOOTH_RANGE_MIN, &used);

    let mut processed: HashSet<usize> = HashSet::with_capacity(order.len());
    let mut summary = SmoothingSummary::default();
    let mut stack: Vec<usize> = Vec::new();

    for &seed in &order {
        if !processed.insert(seed) {
            continue;
        }
        table.insert(seed, group);

        let mut found = false;
        stack.push(seed);
        while let Some(face) = stack.pop() {
            let Some(ring) = graph.face_ring(FaceId(face as u32)) else {
                continue;
            };
            for he in graph.ring(ring.first) {
                let Some(opposite) = he.opposite.and_then(|id| graph.half_edge(id)) else {
                    continue;
                };
                let neighbor = opposite.face.index();
                if !selected.contains(&neighbor)
                    || processed.contains(&neighbor)
                    || table.get(&neighbor) != Some(&SMOOTHING_GROUP_NONE)
                {
                    continue;
                }
                if is_soft_edge(normals, &he.edge, &opposite.edge, threshold) {
                    processed.insert(neighbor);
                    table.insert(neighbor, group);
                    found = true;
                    stack.push(neighbor);
                }
            }
        }

        if found {
            used.insert(group);
            summary.groups_created += 1;
            group = next_unused_smoothing_group(group, &used);
        } else {
            table.insert(seed, SMOOTHING_GROUP_NONE);
        }
    }

    let groups: Vec<(usize, i32)> = order
        .iter()
        .map(|&f| (f, table.get(&f).copied().unwrap_or(SMOOTHING_GROUP_NONE)))
        .collect();
    summary.smoothed_faces = groups.iter().filter(|(_, g)| *g != SMOOTHING_GROUP_NONE).count();
    summary.hard_faces = groups.len() - summary.smoothed_faces;

    tracing::debug!(
        "smoothing: {} faces, {} groups, {} left hard (threshold {:.5})",
        groups.len(),
        summary.groups_created,
        summary.hard_faces,
        threshold
    );

    Ok(SmoothingAssignment { groups, summary })
}

/// Compute smoothing groups for the selected faces and write them back.
///
/// Nothing is written if the inputs are rejected.
pub fn apply_smoothing_groups(
    faces: &mut [Face],
    selection: &[usize],
    graph: &HalfEdgeGraph,
    angle_degrees: f32,
    normals: &[Vec3],
) -> Result<SmoothingSummary, TopologyError> {
    let assignment = compute_smoothing_groups(faces, selection, graph, angle_degrees, normals)?;
    assignment.apply(faces)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coincident::CoincidentVertexIndex;
    use crate::test_meshes;

    fn graph_for(positions: &[Vec3], faces: &[Face]) -> HalfEdgeGraph {
        let index = CoincidentVertexIndex::build(positions).unwrap();
        HalfEdgeGraph::build(faces, &index).unwrap()
    }

    fn all(faces: &[Face]) -> Vec<usize> {
        (0..faces.len()).collect()
    }

    #[test]
    fn test_is_smooth() {
        assert!(!is_smooth(SMOOTHING_GROUP_NONE));
        assert!(is_smooth(1));
        assert!(is_smooth(24));
        assert!(!is_smooth(25));
        assert!(!is_smooth(42));
        assert!(is_smooth(43));
        assert!(!is_smooth(-1));
    }

    #[test]
    fn test_next_unused_skips_hard_range() {
        let used: HashSet<i32> = (1..=24).collect();
        assert_eq!(next_unused_smoothing_group(1, &used), 43);
        assert_eq!(next_unused_smoothing_group(1, &HashSet::new()), 1);

        let faces: Vec<Face> = (1..=3).map(|g| Face::new([0, 1, 2]).with_smoothing_group(g)).collect();
        assert_eq!(unused_smoothing_group(&faces), 4);
    }

    #[test]
    fn test_dot_threshold() {
        assert!((smoothing_dot_threshold(0.0) - 1.0).abs() < 1e-6);
        assert!((smoothing_dot_threshold(60.0) - 0.5).abs() < 1e-6);
        // Clamped just below 90 degrees, never exactly zero
        assert!(smoothing_dot_threshold(120.0) > 0.0);
        assert!(smoothing_dot_threshold(120.0) < 1e-4);
    }

    #[test]
    fn test_flat_cube_stays_hard() {
        let (positions, mut faces, normals) = test_meshes::unit_cube();
        for face in &mut faces {
            face.smoothing_group = 5;
        }
        let graph = graph_for(&positions, &faces);
        let selection = all(&faces);

        let summary = apply_smoothing_groups(&mut faces, &selection, &graph, 90.0, &normals).unwrap();

        assert!(faces.iter().all(|f| f.smoothing_group == SMOOTHING_GROUP_NONE));
        assert_eq!(summary.groups_created, 0);
        assert_eq!(summary.hard_faces, 6);
    }

    #[test]
    fn test_smooth_cube_is_one_group() {
        let (positions, mut faces, _) = test_meshes::unit_cube();
        let normals = test_meshes::cube_corner_normals(&positions);
        let graph = graph_for(&positions, &faces);
        let selection = all(&faces);

        let summary = apply_smoothing_groups(&mut faces, &selection, &graph, 1.0, &normals).unwrap();

        assert!(faces.iter().all(|f| f.smoothing_group == 1));
        assert_eq!(summary.groups_created, 1);
        assert_eq!(summary.smoothed_faces, 6);
    }

    #[test]
    fn test_hard_edge_splits_groups() {
        // Two flat quads facing +Z, then two facing +X across a hard edge
        let (positions, mut faces) = test_meshes::split_quad_strip(4);
        let normals: Vec<Vec3> = (0..positions.len())
            .map(|i| if i < 8 { Vec3::Z } else { Vec3::X })
            .collect();
        let graph = graph_for(&positions, &faces);
        let selection = all(&faces);

        apply_smoothing_groups(&mut faces, &selection, &graph, 30.0, &normals).unwrap();

        let groups: Vec<i32> = faces.iter().map(|f| f.smoothing_group).collect();
        assert_eq!(groups, vec![1, 1, 2, 2]);
    }

    #[test]
    fn test_isolated_faces_revert_to_hard() {
        let (positions, mut faces) = test_meshes::disjoint_triangles();
        let normals = vec![Vec3::Z; positions.len()];
        let graph = graph_for(&positions, &faces);
        let selection = all(&faces);

        let summary = apply_smoothing_groups(&mut faces, &selection, &graph, 45.0, &normals).unwrap();

        assert!(faces.iter().all(|f| f.smoothing_group == SMOOTHING_GROUP_NONE));
        assert_eq!(summary.hard_faces, 2);
    }

    #[test]
    fn test_deterministic() {
        let (positions, faces) = test_meshes::mixed_polygons();
        let normals = vec![Vec3::Z; positions.len()];
        let graph = graph_for(&positions, &faces);
        let selection = all(&faces);

        let first = compute_smoothing_groups(&faces, &selection, &graph, 10.0, &normals).unwrap();
        let second = compute_smoothing_groups(&faces, &selection, &graph, 10.0, &normals).unwrap();

        assert_eq!(first, second);
        assert!(first.groups().iter().all(|&(_, g)| g == 1));
    }

    #[test]
    fn test_groups_outside_selection_are_not_reused() {
        let (positions, mut faces) = test_meshes::split_quad_strip(3);
        faces[2].smoothing_group = 1;
        let normals = vec![Vec3::Z; positions.len()];
        let graph = graph_for(&positions, &faces);

        apply_smoothing_groups(&mut faces, &[0, 1], &graph, 10.0, &normals).unwrap();

        assert_eq!(faces[0].smoothing_group, 2);
        assert_eq!(faces[1].smoothing_group, 2);
        // Unselected face keeps its group and is not flooded into
        assert_eq!(faces[2].smoothing_group, 1);
    }

    #[test]
    fn test_selection_past_smooth_range() {
        let (positions, mut faces) = test_meshes::split_quad_strip(26);
        for (i, face) in faces.iter_mut().enumerate().skip(2) {
            face.smoothing_group = (i - 1) as i32;
        }
        let normals = vec![Vec3::Z; positions.len()];
        let graph = graph_for(&positions, &faces);

        apply_smoothing_groups(&mut faces, &[0, 1], &graph, 10.0, &normals).unwrap();

        // Groups 1..=24 are taken by faces 2..=25
        assert_eq!(faces[0].smoothing_group, 43);
        assert_eq!(faces[1].smoothing_group, 43);
    }

    #[test]
    fn test_missing_normals_rejected_without_writes() {
        let (positions, mut faces) = test_meshes::split_quad_strip(2);
        faces[0].smoothing_group = 7;
        let before = faces.clone();
        let normals = vec![Vec3::Z; 5];
        let graph = graph_for(&positions, &faces);

        let err = apply_smoothing_groups(&mut faces, &[0, 1], &graph, 10.0, &normals).unwrap_err();

        assert_eq!(
            err,
            TopologyError::NormalsOutOfRange {
                vertex: 5,
                normal_count: 5
            }
        );
        assert_eq!(faces, before);
    }

    #[test]
    fn test_face_outside_graph_rejected() {
        let (positions, faces) = test_meshes::split_quad_strip(3);
        let index = CoincidentVertexIndex::build(&positions).unwrap();
        let graph = HalfEdgeGraph::build_for_faces(&faces, &[0, 1], &index).unwrap();
        let normals = vec![Vec3::Z; positions.len()];

        assert!(matches!(
            compute_smoothing_groups(&faces, &[2], &graph, 10.0, &normals),
            Err(TopologyError::InvalidArgument(_))
        ));
        assert!(matches!(
            compute_smoothing_groups(&faces, &[3], &graph, 10.0, &normals),
            Err(TopologyError::FaceOutOfRange { index: 3, .. })
        ));
    }
}
