use gridstep_core::{Grid, Point};

/// The grid queries the search engine needs.
///
/// The engine borrows a `Pather` for the duration of each call rather than
/// storing one, so the driver keeps ownership of the grid between steps.
pub trait Pather {
    /// Append the walkable neighbours of `p` into `buf`, in a fixed order.
    /// The caller clears `buf` before calling.
    fn neighbors(&self, p: Point, buf: &mut Vec<Point>);

    /// Whether `p` is blocked.
    fn is_obstacle(&self, p: Point) -> bool;
}

impl Pather for Grid {
    #[inline]
    fn neighbors(&self, p: Point, buf: &mut Vec<Point>) {
        self.adjacent_into(p, buf);
    }

    #[inline]
    fn is_obstacle(&self, p: Point) -> bool {
        self.contains_obstacle(p)
    }
}
