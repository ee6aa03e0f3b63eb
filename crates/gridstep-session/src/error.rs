use std::fmt;

use gridstep_paths::SearchError;

use crate::config::ConfigError;

/// Errors surfaced by [`Session`](crate::Session).
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SessionError {
    Config(ConfigError),
    Search(SearchError),
}

impl fmt::Display for SessionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(e) => write!(f, "session: {e}"),
            Self::Search(e) => write!(f, "session: {e}"),
        }
    }
}

impl std::error::Error for SessionError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Config(e) => Some(e),
            Self::Search(e) => Some(e),
        }
    }
}

impl From<ConfigError> for SessionError {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

impl From<SearchError> for SessionError {
    fn from(e: SearchError) -> Self {
        Self::Search(e)
    }
}
