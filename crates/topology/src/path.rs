//! Shortest paths across the face graph
//!
//! Faces are nodes; two faces are connected when they share an edge (through
//! coincident groups). Stepping from one face to the next costs a fixed base
//! plus the distance between centroids plus a penalty for the angle between
//! the face normals, so paths prefer to stay on flat stretches of surface.
//!
//! [`FacePathfinder`] keeps the face graph and the last search tree between
//! calls. Both are keyed on the mesh identity and version, so an edited or
//! different mesh always triggers a rebuild.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use glam::Vec3;
use wingmesh_config::{DEFAULT_COINCIDENT_RESOLUTION, PathWeights, TopologyConfig};

use crate::coincident::CoincidentVertexIndex;
use crate::half_edge::{FaceId, HalfEdgeGraph};
use crate::mesh::{MeshId, PolyMesh};
use crate::types::TopologyError;

/// A path found between two faces
#[derive(Debug, Clone, PartialEq)]
pub struct FaceRoute {
    /// Faces after the start, up to and including the end
    pub faces: Vec<usize>,
    /// Summed step costs
    pub cost: f32,
}

impl FaceRoute {
    /// Faces strictly between the start and the end
    pub fn intermediate(&self) -> &[usize] {
        &self.faces[..self.faces.len().saturating_sub(1)]
    }

    /// Number of edges crossed
    pub fn steps(&self) -> usize {
        self.faces.len()
    }
}

/// Identity of the mesh state a cache was built from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct MeshKey {
    mesh: MeshId,
    version: u64,
    face_count: usize,
}

impl MeshKey {
    fn of(mesh: &PolyMesh) -> Self {
        Self {
            mesh: mesh.id(),
            version: mesh.version(),
            face_count: mesh.face_count(),
        }
    }
}

/// Face adjacency with per-face centroid and normal
#[derive(Debug, Clone)]
struct FaceGraph {
    key: MeshKey,
    neighbors: Vec<Vec<usize>>,
    centroids: Vec<Vec3>,
    normals: Vec<Vec3>,
}

/// Result of one Dijkstra run from `start`
#[derive(Debug, Clone)]
struct SearchTree {
    key: MeshKey,
    start: usize,
    costs: Vec<f32>,
    predecessors: Vec<Option<usize>>,
}

/// Entry in the Dijkstra priority queue
#[derive(Debug, Clone, Copy)]
struct QueueEntry {
    face: usize,
    cost: f32,
}

impl PartialEq for QueueEntry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for QueueEntry {}

impl PartialOrd for QueueEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for QueueEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reversed for a min-heap; lower face index wins ties
        other
            .cost
            .total_cmp(&self.cost)
            .then_with(|| other.face.cmp(&self.face))
    }
}

/// Face path search with a reusable cache
///
/// The cache belongs to the pathfinder value; keep one around per tool or
/// editor session to get repeated queries from the same start for free.
#[derive(Debug, Clone)]
pub struct FacePathfinder {
    weights: PathWeights,
    coincident_resolution: f32,
    graph: Option<FaceGraph>,
    search: Option<SearchTree>,
    graph_builds: usize,
    dijkstra_runs: usize,
}

impl Default for FacePathfinder {
    fn default() -> Self {
        Self::new()
    }
}

impl FacePathfinder {
    pub fn new() -> Self {
        Self::with_weights(PathWeights::default())
    }

    pub fn with_weights(weights: PathWeights) -> Self {
        Self {
            weights,
            coincident_resolution: DEFAULT_COINCIDENT_RESOLUTION,
            graph: None,
            search: None,
            graph_builds: 0,
            dijkstra_runs: 0,
        }
    }

    pub fn with_config(config: &TopologyConfig) -> Self {
        Self {
            coincident_resolution: config.coincident_resolution,
            ..Self::with_weights(config.path)
        }
    }

    pub fn weights(&self) -> PathWeights {
        self.weights
    }

    /// How many times the face graph was (re)built
    pub fn graph_builds(&self) -> usize {
        self.graph_builds
    }

    /// How many Dijkstra searches ran
    pub fn dijkstra_runs(&self) -> usize {
        self.dijkstra_runs
    }

    /// Drop cached data
    pub fn clear(&mut self) {
        self.graph = None;
        self.search = None;
    }

    /// Cheapest route from `start` to `end`.
    ///
    /// `Ok(None)` if `end` can't be reached from `start` or equals it. Fails
    /// if the weights are negative or not finite.
    pub fn route(
        &mut self,
        mesh: &PolyMesh,
        start: usize,
        end: usize,
    ) -> Result<Option<FaceRoute>, TopologyError> {
        let face_count = mesh.face_count();
        for index in [start, end] {
            if index >= face_count {
                return Err(TopologyError::FaceOutOfRange { index, face_count });
            }
        }

        if !self.weights.is_valid() {
            return Err(TopologyError::InvalidArgument(format!(
                "path weights must be finite and non-negative, got {:?}",
                self.weights
            )));
        }

        // A face has no path to itself
        if start == end {
            return Ok(None);
        }

        let tree = self.search_from(mesh, start)?;
        Ok(reconstruct(tree, end))
    }

    /// Faces strictly between `start` and `end` on the cheapest route.
    ///
    /// Neighbouring faces give an empty path. `start == end` gives `None`.
    pub fn shortest_path(
        &mut self,
        mesh: &PolyMesh,
        start: usize,
        end: usize,
    ) -> Result<Option<Vec<usize>>, TopologyError> {
        Ok(self
            .route(mesh, start, end)?
            .map(|route| route.intermediate().to_vec()))
    }

    /// Total cost of the cheapest route
    pub fn path_cost(
        &mut self,
        mesh: &PolyMesh,
        start: usize,
        end: usize,
    ) -> Result<Option<f32>, TopologyError> {
        Ok(self.route(mesh, start, end)?.map(|route| route.cost))
    }

    fn search_from(&mut self, mesh: &PolyMesh, start: usize) -> Result<&SearchTree, TopologyError> {
        let key = MeshKey::of(mesh);

        let cached = self
            .search
            .as_ref()
            .is_some_and(|tree| tree.key == key && tree.start == start);
        if cached {
            tracing::trace!("face path: reusing search from face {}", start);
        } else {
            self.ensure_graph(mesh, key)?;
            let graph = self
                .graph
                .as_ref()
                .ok_or_else(|| TopologyError::InvalidArgument("face graph missing".to_string()))?;
            let tree = dijkstra(graph, start, &self.weights);
            self.dijkstra_runs += 1;
            self.search = Some(tree);
        }

        self.search
            .as_ref()
            .ok_or_else(|| TopologyError::InvalidArgument("search tree missing".to_string()))
    }

    fn ensure_graph(&mut self, mesh: &PolyMesh, key: MeshKey) -> Result<(), TopologyError> {
        if self.graph.as_ref().is_some_and(|g| g.key == key) {
            return Ok(());
        }

        let index =
            CoincidentVertexIndex::build_with_resolution(mesh.positions(), self.coincident_resolution)?;
        let half_edges = HalfEdgeGraph::build(mesh.faces(), &index)?;

        let face_count = mesh.face_count();
        let mut neighbors = Vec::with_capacity(face_count);
        let mut centroids = Vec::with_capacity(face_count);
        let mut normals = Vec::with_capacity(face_count);
        for face in 0..face_count {
            neighbors.push(
                half_edges
                    .neighbor_faces(FaceId(face as u32))
                    .into_iter()
                    .map(|f| f.index())
                    .collect(),
            );
            centroids.push(mesh.face_centroid(face)?);
            normals.push(mesh.face_normal(face)?);
        }

        tracing::debug!(
            "face path: built face graph for {:?} v{} ({} faces)",
            key.mesh,
            key.version,
            face_count
        );

        self.graph = Some(FaceGraph {
            key,
            neighbors,
            centroids,
            normals,
        });
        self.search = None;
        self.graph_builds += 1;
        Ok(())
    }
}

/// Single-source Dijkstra over the face graph
fn dijkstra(graph: &FaceGraph, start: usize, weights: &PathWeights) -> SearchTree {
    let n = graph.neighbors.len();
    let mut costs = vec![f32::INFINITY; n];
    let mut predecessors: Vec<Option<usize>> = vec![None; n];
    let mut heap = BinaryHeap::new();

    costs[start] = 0.0;
    heap.push(QueueEntry {
        face: start,
        cost: 0.0,
    });

    while let Some(QueueEntry { face, cost }) = heap.pop() {
        // Stale entry
        if cost > costs[face] {
            continue;
        }

        for &next in &graph.neighbors[face] {
            let step = weights.step_cost(
                graph.centroids[face].distance(graph.centroids[next]),
                graph.normals[face].dot(graph.normals[next]),
            );
            let candidate = cost + step;
            if candidate < costs[next] {
                costs[next] = candidate;
                predecessors[next] = Some(face);
                heap.push(QueueEntry {
                    face: next,
                    cost: candidate,
                });
            }
        }
    }

    let reached = costs.iter().filter(|c| c.is_finite()).count();
    tracing::debug!("face path: searched from face {}, reached {} of {} faces", start, reached, n);

    SearchTree {
        key: graph.key,
        start,
        costs,
        predecessors,
    }
}

/// Walk predecessors back from `end`
fn reconstruct(tree: &SearchTree, end: usize) -> Option<FaceRoute> {
    let cost = *tree.costs.get(end)?;
    if !cost.is_finite() {
        return None;
    }

    let mut faces = vec![end];
    let mut current = end;
    while let Some(previous) = tree.predecessors[current] {
        if previous == tree.start {
            break;
        }
        faces.push(previous);
        current = previous;
    }
    faces.reverse();

    Some(FaceRoute { faces, cost })
}

/// Faces strictly between `start` and `end`, using a one-off pathfinder
pub fn shortest_face_path(
    mesh: &PolyMesh,
    start: usize,
    end: usize,
) -> Result<Option<Vec<usize>>, TopologyError> {
    FacePathfinder::new().shortest_path(mesh, start, end)
}
