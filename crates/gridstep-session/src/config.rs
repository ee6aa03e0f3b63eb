//! Session configuration.
//!
//! Omitted endpoints are placed a quarter of the way in from the top-left
//! and bottom-right corners, rounding halves up.

use std::fmt;

use gridstep_core::{Point, Range};

/// Parameters for building a [`Session`](crate::Session).
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct SessionConfig {
    pub width: i32,
    pub height: i32,
    pub start: Option<Point>,
    pub end: Option<Point>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            width: 5,
            height: 5,
            start: None,
            end: None,
        }
    }
}

impl SessionConfig {
    /// A `width × height` config with derived endpoints.
    pub fn new(width: i32, height: i32) -> Self {
        Self {
            width,
            height,
            ..Self::default()
        }
    }

    pub fn with_start(mut self, p: Point) -> Self {
        self.start = Some(p);
        self
    }

    pub fn with_end(mut self, p: Point) -> Self {
        self.end = Some(p);
        self
    }

    /// The configured start, or `(round(w/4), round(h/4))`.
    pub fn start_point(&self) -> Point {
        self.start.unwrap_or_else(|| {
            Point::new(quarter(self.width), quarter(self.height))
        })
    }

    /// The configured end, or `(round(3w/4) - 1, round(3h/4) - 1)`.
    pub fn end_point(&self) -> Point {
        self.end.unwrap_or_else(|| {
            Point::new(
                three_quarters(self.width) - 1,
                three_quarters(self.height) - 1,
            )
        })
    }

    /// Check that the grid is non-empty and both endpoints are distinct
    /// cells inside it.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.width <= 0 || self.height <= 0 {
            return Err(ConfigError::InvalidSize {
                width: self.width,
                height: self.height,
            });
        }
        let bounds = Range::new(0, 0, self.width, self.height);
        let (start, end) = (self.start_point(), self.end_point());
        for (endpoint, p) in [(Endpoint::Start, start), (Endpoint::End, end)] {
            if !bounds.contains(p) {
                return Err(ConfigError::OutOfBounds { endpoint, point: p });
            }
        }
        if start == end {
            return Err(ConfigError::EndpointsCoincide(start));
        }
        Ok(())
    }
}

/// `round(n * 0.25)` with halves rounded up, for `n >= 0`.
fn quarter(n: i32) -> i32 {
    ((i64::from(n) + 2) / 4) as i32
}

/// `round(n * 0.75)` with halves rounded up, for `n >= 0`.
fn three_quarters(n: i32) -> i32 {
    ((3 * i64::from(n) + 2) / 4) as i32
}

/// Which endpoint a [`ConfigError`] refers to.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Endpoint {
    Start,
    End,
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Start => "start",
            Self::End => "end",
        })
    }
}

/// Errors reported by [`SessionConfig::validate`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ConfigError {
    /// Width or height is not positive.
    InvalidSize { width: i32, height: i32 },
    /// An endpoint lies outside the grid.
    OutOfBounds { endpoint: Endpoint, point: Point },
    /// Start and end are the same cell.
    EndpointsCoincide(Point),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidSize { width, height } => {
                write!(f, "config: invalid grid size {width}x{height}")
            }
            Self::OutOfBounds { endpoint, point } => {
                write!(f, "config: {endpoint} point {point} is outside the grid")
            }
            Self::EndpointsCoincide(p) => {
                write!(f, "config: start and end points both at {p}")
            }
        }
    }
}

impl std::error::Error for ConfigError {}
