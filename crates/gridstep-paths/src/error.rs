use std::fmt;

use crate::engine::SearchStatus;

/// Engine operation named in a [`SearchError`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Operation {
    Start,
    Advance,
    SetStartPoint,
    SetEndPoint,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Start => "start",
            Self::Advance => "advance",
            Self::SetStartPoint => "set_start_point",
            Self::SetEndPoint => "set_end_point",
        })
    }
}

/// Misuse of the engine by its driver.
///
/// Rejected relocations and failed searches are ordinary outcomes and are
/// never reported through this type.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SearchError {
    /// `operation` is not permitted while the engine is in `status`.
    InvalidState {
        operation: Operation,
        status: SearchStatus,
    },
}

impl fmt::Display for SearchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidState { operation, status } => {
                write!(f, "search: cannot {operation} while {status}")
            }
        }
    }
}

impl std::error::Error for SearchError {}
