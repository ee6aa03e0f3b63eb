//! Geometry primitives: [`Point`] (a grid coordinate) and [`Range`] (the
//! half-open rectangle a grid occupies).

use std::fmt;

// ---------------------------------------------------------------------------
// Point
// ---------------------------------------------------------------------------

/// A cell coordinate. X grows right, Y grows down.
///
/// Equality is structural, so a `Point` doubles as the identity key of a
/// grid cell everywhere in the workspace.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    /// Origin (0, 0).
    pub const ZERO: Self = Self { x: 0, y: 0 };

    /// Create a new point.
    #[inline]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Return a point shifted by (dx, dy), or `None` if a coordinate would
    /// overflow.
    #[inline]
    pub const fn checked_shift(self, dx: i32, dy: i32) -> Option<Self> {
        match (self.x.checked_add(dx), self.y.checked_add(dy)) {
            (Some(x), Some(y)) => Some(Self { x, y }),
            _ => None,
        }
    }

    /// The four cardinal neighbours, always in the order up, right, down,
    /// left. Search traces depend on this order being stable. Neighbours
    /// that fall outside the `i32` plane are skipped.
    #[inline]
    pub fn neighbors_4(self) -> impl Iterator<Item = Point> {
        CARDINALS
            .into_iter()
            .filter_map(move |(dx, dy)| self.checked_shift(dx, dy))
    }
}

const CARDINALS: [(i32, i32); 4] = [(0, -1), (1, 0), (0, 1), (-1, 0)];

impl PartialOrd for Point {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Point {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.y.cmp(&other.y).then(self.x.cmp(&other.x))
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

// ---------------------------------------------------------------------------
// Range
// ---------------------------------------------------------------------------

/// A half-open rectangle \[min, max). `min` is inclusive, `max` is exclusive.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Range {
    pub min: Point,
    pub max: Point,
}

impl Range {
    /// Create a new range from two corners, canonicalized so that
    /// `min` ≤ `max` on each axis.
    #[inline]
    pub fn new(x0: i32, y0: i32, x1: i32, y1: i32) -> Self {
        Self {
            min: Point::new(x0.min(x1), y0.min(y1)),
            max: Point::new(x0.max(x1), y0.max(y1)),
        }
    }

    #[inline]
    pub fn width(self) -> i32 {
        self.max.x - self.min.x
    }

    #[inline]
    pub fn height(self) -> i32 {
        self.max.y - self.min.y
    }

    #[inline]
    pub fn is_empty(self) -> bool {
        self.max.x <= self.min.x || self.max.y <= self.min.y
    }

    /// Whether `p` lies inside the range.
    #[inline]
    pub fn contains(self, p: Point) -> bool {
        p.x >= self.min.x && p.x < self.max.x && p.y >= self.min.y && p.y < self.max.y
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn neighbors_4_order_is_up_right_down_left() {
        let p = Point::new(2, 2);
        assert_eq!(
            p.neighbors_4().collect::<Vec<_>>(),
            vec![
                Point::new(2, 1),
                Point::new(3, 2),
                Point::new(2, 3),
                Point::new(1, 2),
            ]
        );
    }

    #[test]
    fn point_ordering_is_row_major() {
        let mut pts = vec![Point::new(1, 1), Point::new(0, 1), Point::new(3, 0)];
        pts.sort();
        assert_eq!(pts, vec![Point::new(3, 0), Point::new(0, 1), Point::new(1, 1)]);
    }

    #[test]
    fn point_display() {
        assert_eq!(Point::new(4, -1).to_string(), "(4, -1)");
    }

    #[test]
    fn range_auto_canonicalize() {
        let r = Range::new(5, 5, 0, 0);
        assert_eq!(r.min, Point::ZERO);
        assert_eq!(r.max, Point::new(5, 5));
    }

    #[test]
    fn range_contains_is_half_open() {
        let r = Range::new(0, 0, 5, 5);
        assert!(r.contains(Point::new(0, 0)));
        assert!(r.contains(Point::new(4, 4)));
        assert!(!r.contains(Point::new(5, 0)));
        assert!(!r.contains(Point::new(0, 5)));
        assert!(!r.contains(Point::new(-1, 2)));
    }

    #[test]
    fn empty_range_contains_nothing() {
        let r = Range::new(2, 2, 2, 6);
        assert!(r.is_empty());
        assert!(!r.contains(Point::new(2, 3)));
    }

    #[test]
    fn neighbors_at_i32_limits_skip_overflow() {
        assert_eq!(
            Point::new(i32::MAX, 0).neighbors_4().collect::<Vec<_>>(),
            vec![
                Point::new(i32::MAX, -1),
                Point::new(i32::MAX, 1),
                Point::new(i32::MAX - 1, 0),
            ]
        );
        assert_eq!(Point::new(i32::MIN, i32::MIN).neighbors_4().count(), 2);
    }
}
