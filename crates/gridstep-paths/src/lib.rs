//! Incremental A* search over a [`gridstep_core::Grid`].
//!
//! [`SearchEngine`] runs A* one step at a time so a driver can present the
//! open set, the closed set and the current head between steps:
//!
//! ```
//! use gridstep_core::{Grid, Point};
//! use gridstep_paths::{SearchEngine, StepOutcome};
//!
//! let mut grid = Grid::new(5, 5);
//! grid.add_obstacle(Point::new(1, 0));
//!
//! let mut engine = SearchEngine::new(Point::new(0, 0), Point::new(2, 0));
//! let mut outcome = engine.start()?;
//! while !outcome.is_finished() {
//!     // draw engine.head(), engine.fringe(), engine.closed() here
//!     outcome = engine.advance(&grid)?;
//! }
//! assert_eq!(outcome, StepOutcome::Succeeded);
//! assert_eq!(engine.cost(), Some(4));
//! # Ok::<(), gridstep_paths::SearchError>(())
//! ```
//!
//! A failed search is an ordinary [`StepOutcome::Failed`]; [`SearchError`]
//! is reserved for driver misuse such as advancing an idle engine.

mod distance;
mod engine;
mod error;
mod traits;
mod vertex;

pub use distance::manhattan;
pub use engine::{SearchEngine, SearchEvent, SearchStatus, StepOutcome};
pub use error::{Operation, SearchError};
pub use traits::Pather;
pub use vertex::{Vertex, VertexId};
