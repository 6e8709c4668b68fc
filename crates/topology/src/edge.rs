//! Undirected edges and coincident-aware edge lookups.

use std::fmt;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

use crate::coincident::CoincidentVertexIndex;
use crate::constants::INVALID_INDEX;
use crate::types::TopologyError;

/// An edge between two vertex indices
///
/// The indices are stored in the order given (the direction matters when
/// walking a face boundary), but equality and hashing ignore it:
/// `Edge::new(a, b) == Edge::new(b, a)`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Edge {
    pub a: u32,
    pub b: u32,
}

impl Edge {
    /// An edge with no vertices
    pub const EMPTY: Edge = Edge {
        a: INVALID_INDEX,
        b: INVALID_INDEX,
    };

    pub const fn new(a: u32, b: u32) -> Self {
        Self { a, b }
    }

    /// Both indices present and distinct
    pub fn is_valid(&self) -> bool {
        self.a != INVALID_INDEX && self.b != INVALID_INDEX && self.a != self.b
    }

    pub fn min(&self) -> u32 {
        self.a.min(self.b)
    }

    pub fn max(&self) -> u32 {
        self.a.max(self.b)
    }

    /// Same edge walked the other way
    pub fn reversed(&self) -> Self {
        Self::new(self.b, self.a)
    }

    pub fn contains(&self, index: u32) -> bool {
        self.a == index || self.b == index
    }

    /// Whether the two edges share at least one index
    pub fn contains_edge(&self, other: &Edge) -> bool {
        self.contains(other.a) || self.contains(other.b)
    }

    /// Equality through coincident groups: both edges connect the same two
    /// positions even if they reference different slots.
    ///
    /// Edges touching slots outside `index` are never equal.
    pub fn equals_with_lookup(&self, other: &Edge, index: &CoincidentVertexIndex) -> bool {
        match (
            index.common_index(self.a),
            index.common_index(self.b),
            index.common_index(other.a),
            index.common_index(other.b),
        ) {
            (Some(x0), Some(y0), Some(x1), Some(y1)) => {
                (x0 == x1 && y0 == y1) || (x0 == y1 && y0 == x1)
            }
            _ => false,
        }
    }

    /// Whether either endpoint is coincident with `vertex`
    pub fn contains_common(&self, vertex: u32, index: &CoincidentVertexIndex) -> bool {
        index.are_coincident(self.a, vertex) || index.are_coincident(self.b, vertex)
    }

    /// Flatten edges into `[a0, b0, a1, b1, ...]`
    pub fn collect_indices<'a>(edges: impl IntoIterator<Item = &'a Edge>) -> Vec<u32> {
        edges.into_iter().flat_map(|e| [e.a, e.b]).collect()
    }
}

impl PartialEq for Edge {
    fn eq(&self, other: &Self) -> bool {
        (self.a == other.a && self.b == other.b) || (self.a == other.b && self.b == other.a)
    }
}

impl Eq for Edge {}

impl Hash for Edge {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.min().hash(state);
        self.max().hash(state);
    }
}

impl From<(u32, u32)> for Edge {
    fn from((a, b): (u32, u32)) -> Self {
        Self::new(a, b)
    }
}

impl fmt::Display for Edge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.a, self.b)
    }
}

/// An edge seen both as array slots (`local`) and as coincident groups
/// (`common`)
///
/// Both components are stored with the same orientation, so `common.a` is
/// the group of `local.a`. Equality and hashing use only `common`: two lookups
/// are equal when they join the same pair of positions, which is how edges of
/// adjoining faces with split vertices are recognized as one edge.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct EdgeLookup {
    pub local: Edge,
    pub common: Edge,
}

impl EdgeLookup {
    pub const fn new(local: Edge, common: Edge) -> Self {
        Self { local, common }
    }

    /// Resolve the common edge of a local edge
    pub fn from_local(local: Edge, index: &CoincidentVertexIndex) -> Result<Self, TopologyError> {
        let common = Edge::new(
            index.try_common_index(local.a)?,
            index.try_common_index(local.b)?,
        );
        Ok(Self { local, common })
    }

    /// Resolve a batch of local edges in one pass
    pub fn from_edges<'a>(
        edges: impl IntoIterator<Item = &'a Edge>,
        index: &CoincidentVertexIndex,
    ) -> Result<Vec<Self>, TopologyError> {
        edges
            .into_iter()
            .map(|e| Self::from_local(*e, index))
            .collect()
    }

    /// Local slots of `other` that sit at `self.local.a` and `self.local.b`.
    ///
    /// `other` must describe the same common edge, in either orientation.
    pub fn matching_local(&self, other: &EdgeLookup) -> (u32, u32) {
        let x = if other.common.a == self.common.a {
            other.local.a
        } else {
            other.local.b
        };
        let y = if other.common.b == self.common.b {
            other.local.b
        } else {
            other.local.a
        };
        (x, y)
    }
}

impl PartialEq for EdgeLookup {
    fn eq(&self, other: &Self) -> bool {
        self.common == other.common
    }
}

impl Eq for EdgeLookup {}

impl Hash for EdgeLookup {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.common.hash(state);
    }
}

impl fmt::Display for EdgeLookup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Common: {}, Local: {}", self.common, self.local)
    }
}
