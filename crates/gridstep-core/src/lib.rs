//! **gridstep-core**: grid model for incremental pathfinding.
//!
//! This crate provides the types the search engine and its drivers share:
//! cell coordinates, the obstacle grid, and the listener lists through which
//! every mutable object announces its changes.

pub mod geom;
pub mod grid;
pub mod listeners;

pub use geom::{Point, Range};
pub use grid::{Grid, GridEvent};
pub use listeners::{ListenerId, Listeners};
