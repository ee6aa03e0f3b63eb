//! Driver-facing workflow around a grid and its search engine.
//!
//! A presentation layer subscribes to the grid, search and session
//! listeners, translates user input into [`Command`]s, and paces
//! [`Command::AdvanceSearchStep`] however it likes.

mod config;
mod error;
mod session;

pub use config::{ConfigError, Endpoint, SessionConfig};
pub use error::SessionError;
pub use session::{Applied, Command, SearchMode, Session, SessionEvent};
