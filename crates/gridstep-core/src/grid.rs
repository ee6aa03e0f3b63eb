//! The [`Grid`] type: fixed dimensions plus a mutable obstacle set.
//!
//! The grid answers bounds, collision and adjacency queries for the search
//! engine and is mutated only by the driver. Every change to the obstacle
//! set is announced through [`GridEvent::ObstaclesChanged`], which carries
//! the full current set.
//!
//! `add_obstacle` does not check bounds. An obstacle outside
//! `[0, width) × [0, height)` is stored but inert: adjacency is filtered by
//! the bounds of the *queried* cell's neighbours, so it never surfaces.

use indexmap::IndexSet;

use crate::geom::{Point, Range};
use crate::listeners::Listeners;

/// Notification emitted by [`Grid`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GridEvent {
    /// The obstacle set changed; carries every obstacle in insertion order.
    ObstaclesChanged(Vec<Point>),
}

/// A `width × height` grid of cells, some of which are obstacles.
#[derive(Debug)]
pub struct Grid {
    bounds: Range,
    obstacles: IndexSet<Point>,
    listeners: Listeners<GridEvent>,
}

impl Grid {
    /// Create an empty grid. Negative dimensions are clamped to zero.
    pub fn new(width: i32, height: i32) -> Self {
        Self {
            bounds: Range::new(0, 0, width.max(0), height.max(0)),
            obstacles: IndexSet::new(),
            listeners: Listeners::new(),
        }
    }

    #[inline]
    pub fn width(&self) -> i32 {
        self.bounds.width()
    }

    #[inline]
    pub fn height(&self) -> i32 {
        self.bounds.height()
    }

    /// The rectangle `[0, width) × [0, height)`.
    #[inline]
    pub fn bounds(&self) -> Range {
        self.bounds
    }

    /// Whether `p` is inside the grid.
    #[inline]
    pub fn in_bounds(&self, p: Point) -> bool {
        self.bounds.contains(p)
    }

    /// Whether `p` is currently an obstacle (exact match).
    #[inline]
    pub fn contains_obstacle(&self, p: Point) -> bool {
        self.obstacles.contains(&p)
    }

    /// Current obstacles, in the order they were added.
    pub fn obstacles(&self) -> impl ExactSizeIterator<Item = Point> + '_ {
        self.obstacles.iter().copied()
    }

    /// Number of obstacles.
    pub fn obstacle_count(&self) -> usize {
        self.obstacles.len()
    }

    /// In-bounds, non-obstacle neighbours of `p` in the order up, right,
    /// down, left.
    pub fn adjacent(&self, p: Point) -> Vec<Point> {
        let mut buf = Vec::with_capacity(4);
        self.adjacent_into(p, &mut buf);
        buf
    }

    /// Append the neighbours returned by [`adjacent`](Self::adjacent) to
    /// `buf` without allocating.
    pub fn adjacent_into(&self, p: Point, buf: &mut Vec<Point>) {
        buf.extend(
            p.neighbors_4()
                .filter(|&n| self.in_bounds(n) && !self.contains_obstacle(n)),
        );
    }

    /// Insert an obstacle. Returns `false` (and emits nothing) if `p` was
    /// already an obstacle.
    pub fn add_obstacle(&mut self, p: Point) -> bool {
        if !self.obstacles.insert(p) {
            return false;
        }
        log::trace!("obstacle added at {p}");
        self.notify();
        true
    }

    /// Remove an obstacle. Returns `false` (and emits nothing) if `p` was not
    /// an obstacle.
    pub fn remove_obstacle(&mut self, p: Point) -> bool {
        if !self.obstacles.shift_remove(&p) {
            return false;
        }
        log::trace!("obstacle removed at {p}");
        self.notify();
        true
    }

    /// Remove every obstacle. Always emits exactly one notification carrying
    /// the empty set.
    pub fn clear(&mut self) {
        self.obstacles.clear();
        self.notify();
    }

    /// Listeners for [`GridEvent`]s.
    pub fn listeners_mut(&mut self) -> &mut Listeners<GridEvent> {
        &mut self.listeners
    }

    fn notify(&mut self) {
        let obstacles = &self.obstacles;
        self.listeners
            .emit_with(|| GridEvent::ObstaclesChanged(obstacles.iter().copied().collect()));
    }
}
