//! The driver-facing controller.
//!
//! A [`Session`] owns one grid and one search engine and tracks which
//! [`SearchMode`] the user-facing controls are in. Editing is only honoured
//! while preparing; once a search starts, edits are ignored until the user
//! asks for a new search.

use std::fmt;

use gridstep_core::{Grid, GridEvent, Listeners, Point};
use gridstep_paths::{Operation, SearchEngine, SearchError, SearchEvent, StepOutcome};

use crate::config::SessionConfig;
use crate::error::SessionError;

/// Phase of the interactive workflow.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SearchMode {
    /// Obstacles and endpoints can be edited; the next primary action
    /// starts a search.
    Preparing,
    /// A search is running; edits and the primary action are ignored.
    InProgress,
    /// The last search terminated; the next primary action resets the grid.
    WaitingForNew,
}

impl fmt::Display for SearchMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Preparing => "preparing",
            Self::InProgress => "in progress",
            Self::WaitingForNew => "waiting for new search",
        })
    }
}

/// Notification emitted by [`Session`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SessionEvent {
    ModeChanged(SearchMode),
}

/// A command a driver can send to a session.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Command {
    AddObstacle(Point),
    RemoveObstacle(Point),
    ClearGrid,
    SetStartPoint(Point),
    SetEndPoint(Point),
    /// Begin a search from the current endpoints.
    StartSearch,
    /// Drive one step of the running search.
    AdvanceSearchStep,
    /// Drop the search state, keeping obstacles.
    ClearSearch,
    /// Drop the search state and all obstacles.
    NewSearch,
}

/// What a [`Command`] did.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Applied {
    Changed,
    /// Rejected or ignored; nothing was notified.
    Unchanged,
    /// A search step ran.
    Step(StepOutcome),
}

impl From<bool> for Applied {
    fn from(changed: bool) -> Self {
        if changed {
            Self::Changed
        } else {
            Self::Unchanged
        }
    }
}

/// A grid, a search engine and the workflow mode tying them together.
#[derive(Debug)]
pub struct Session {
    grid: Grid,
    engine: SearchEngine,
    mode: SearchMode,
    listeners: Listeners<SessionEvent>,
}

impl Session {
    /// Build a session in [`SearchMode::Preparing`].
    pub fn new(config: &SessionConfig) -> Result<Self, SessionError> {
        config.validate()?;
        Ok(Self {
            grid: Grid::new(config.width, config.height),
            engine: SearchEngine::new(config.start_point(), config.end_point()),
            mode: SearchMode::Preparing,
            listeners: Listeners::new(),
        })
    }

    #[inline]
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    #[inline]
    pub fn engine(&self) -> &SearchEngine {
        &self.engine
    }

    #[inline]
    pub fn mode(&self) -> SearchMode {
        self.mode
    }

    /// Listeners for mode changes.
    pub fn listeners_mut(&mut self) -> &mut Listeners<SessionEvent> {
        &mut self.listeners
    }

    /// Listeners for obstacle changes.
    pub fn grid_listeners_mut(&mut self) -> &mut Listeners<GridEvent> {
        self.grid.listeners_mut()
    }

    /// Listeners for search state changes.
    pub fn search_listeners_mut(&mut self) -> &mut Listeners<SearchEvent> {
        self.engine.listeners_mut()
    }

    // -----------------------------------------------------------------------
    // Editing
    // -----------------------------------------------------------------------

    /// Place an obstacle. Refused outside the grid, on an endpoint, or when
    /// not preparing.
    pub fn add_obstacle(&mut self, p: Point) -> bool {
        if !self.editable("add obstacle") {
            return false;
        }
        let on_endpoint = p == self.engine.start_point() || p == self.engine.end_point();
        if on_endpoint || !self.grid.in_bounds(p) {
            return false;
        }
        self.grid.add_obstacle(p)
    }

    pub fn remove_obstacle(&mut self, p: Point) -> bool {
        self.editable("remove obstacle") && self.grid.remove_obstacle(p)
    }

    pub fn clear_grid(&mut self) -> bool {
        if !self.editable("clear grid") {
            return false;
        }
        self.grid.clear();
        true
    }

    /// Move the start point. Refused outside the grid, onto an obstacle or
    /// the end point, or when not preparing.
    pub fn set_start_point(&mut self, p: Point) -> Result<bool, SessionError> {
        if !self.editable("move start point") || !self.grid.in_bounds(p) {
            return Ok(false);
        }
        Ok(self.engine.set_start_point(&self.grid, p)?)
    }

    /// Move the end point. Same rules as
    /// [`set_start_point`](Self::set_start_point).
    pub fn set_end_point(&mut self, p: Point) -> Result<bool, SessionError> {
        if !self.editable("move end point") || !self.grid.in_bounds(p) {
            return Ok(false);
        }
        Ok(self.engine.set_end_point(&self.grid, p)?)
    }

    // -----------------------------------------------------------------------
    // Searching
    // -----------------------------------------------------------------------

    /// Start a search. Returns `false` unless preparing.
    pub fn start_search(&mut self) -> Result<bool, SessionError> {
        if self.mode != SearchMode::Preparing {
            log::debug!("start search ignored while {}", self.mode);
            return Ok(false);
        }
        self.engine.start()?;
        self.set_mode(SearchMode::InProgress);
        Ok(true)
    }

    /// Drive one step. Moves to [`SearchMode::WaitingForNew`] once the
    /// search terminates. Stepping without a running search is an error.
    pub fn step(&mut self) -> Result<StepOutcome, SessionError> {
        let outcome = self.engine.advance(&self.grid)?;
        if outcome.is_finished() {
            self.set_mode(SearchMode::WaitingForNew);
        }
        Ok(outcome)
    }

    /// Start a search if preparing, then step until it terminates.
    ///
    /// Once a search has ended the session must be reset first; calling this
    /// in [`SearchMode::WaitingForNew`] is an invalid-state error and leaves
    /// the finished search untouched.
    pub fn run_to_completion(&mut self) -> Result<StepOutcome, SessionError> {
        if self.mode == SearchMode::WaitingForNew {
            return Err(SearchError::InvalidState {
                operation: Operation::Start,
                status: self.engine.status(),
            }
            .into());
        }
        self.start_search()?;
        loop {
            let outcome = self.step()?;
            if outcome.is_finished() {
                return Ok(outcome);
            }
        }
    }

    /// Drop the search state, keep the obstacles, and return to preparing.
    pub fn clear_search(&mut self) {
        self.engine.clear();
        self.set_mode(SearchMode::Preparing);
    }

    /// Drop the search state and every obstacle, and return to preparing.
    pub fn new_search(&mut self) {
        self.grid.clear();
        self.engine.clear();
        self.set_mode(SearchMode::Preparing);
    }

    /// The single "search" control: starts a search while preparing,
    /// resets for a new one after a search ended, and does nothing while a
    /// search runs.
    pub fn primary_action(&mut self) -> Result<Applied, SessionError> {
        match self.mode {
            SearchMode::Preparing => Ok(self.start_search()?.into()),
            SearchMode::InProgress => Ok(Applied::Unchanged),
            SearchMode::WaitingForNew => {
                self.new_search();
                Ok(Applied::Changed)
            }
        }
    }

    /// Dispatch a [`Command`].
    pub fn apply(&mut self, cmd: Command) -> Result<Applied, SessionError> {
        let applied: Applied = match cmd {
            Command::AddObstacle(p) => self.add_obstacle(p).into(),
            Command::RemoveObstacle(p) => self.remove_obstacle(p).into(),
            Command::ClearGrid => self.clear_grid().into(),
            Command::SetStartPoint(p) => self.set_start_point(p)?.into(),
            Command::SetEndPoint(p) => self.set_end_point(p)?.into(),
            Command::StartSearch => self.start_search()?.into(),
            Command::AdvanceSearchStep => Applied::Step(self.step()?),
            Command::ClearSearch => {
                self.clear_search();
                Applied::Changed
            }
            Command::NewSearch => {
                self.new_search();
                Applied::Changed
            }
        };
        Ok(applied)
    }

    fn editable(&self, what: &str) -> bool {
        if self.mode == SearchMode::Preparing {
            return true;
        }
        log::debug!("{what} ignored while {}", self.mode);
        false
    }

    fn set_mode(&mut self, mode: SearchMode) {
        if self.mode == mode {
            return;
        }
        log::debug!("session mode {} -> {}", self.mode, mode);
        self.mode = mode;
        self.listeners.emit(&SessionEvent::ModeChanged(mode));
    }
}
