//! Vertex records explored by the search.
//!
//! Vertices live in an arena owned by the engine. The back-link to the
//! vertex a cell was reached from is a [`VertexId`] into that arena, so path
//! reconstruction walks indices instead of shared references.

use gridstep_core::Point;

/// Index of a [`Vertex`] in the engine's arena. Only valid for the run that
/// created it; [`SearchEngine::clear`](crate::SearchEngine::clear) drops the
/// arena.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct VertexId(pub(crate) usize);

impl VertexId {
    /// Position of the vertex in creation order.
    #[inline]
    pub fn index(self) -> usize {
        self.0
    }
}

/// A node of the explored space.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Vertex {
    pub coords: Point,
    /// Accumulated cost `g` from the start, in unit hops.
    pub distance: i32,
    /// Manhattan distance to the end point at creation time. Never
    /// recomputed.
    pub heuristic: i32,
    /// The vertex this one was reached from; `None` only for the start.
    pub predecessor: Option<VertexId>,
}

impl Vertex {
    /// The A* `f`-score, `distance + heuristic`.
    #[inline]
    pub fn payload(&self) -> i32 {
        self.distance.saturating_add(self.heuristic)
    }

    /// Whether this is the start vertex of its run.
    #[inline]
    pub fn is_start(&self) -> bool {
        self.predecessor.is_none()
    }
}
