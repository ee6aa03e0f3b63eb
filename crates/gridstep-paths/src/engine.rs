//! The stepwise A* search engine.
//!
//! A run is a finite, non-restartable sequence of steps. [`SearchEngine::start`]
//! performs the first step and every [`SearchEngine::advance`] performs the
//! work up to the next suspension point, so a driver can render between
//! steps. The engine never blocks, sleeps or spawns; stopping a run is simply
//! not calling `advance` again, and the partial state is kept until
//! [`SearchEngine::clear`].
//!
//! ```text
//! Idle ──start──▶ Expand ──advance──▶ Select ──advance──▶ Expand ...
//!                   │                   │
//!                   │ head == end       └─ fringe exhausted ──▶ Failed
//!                   ▼
//!                 Finish ──advance──▶ Succeeded
//! ```

use std::collections::HashSet;
use std::fmt;

use gridstep_core::{Listeners, Point};

use crate::distance::manhattan;
use crate::error::{Operation, SearchError};
use crate::traits::Pather;
use crate::vertex::{Vertex, VertexId};

/// Coarse engine state, as seen by drivers.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SearchStatus {
    /// No run in progress; endpoints may be relocated.
    Idle,
    /// A run has been started and has not terminated.
    Running,
    /// The head reached the end point and the path is populated.
    Succeeded,
    /// The fringe was exhausted before reaching the end point.
    Failed,
}

impl fmt::Display for SearchStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Idle => "idle",
            Self::Running => "running",
            Self::Succeeded => "succeeded",
            Self::Failed => "failed",
        })
    }
}

/// Result of a single step.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum StepOutcome {
    InProgress,
    Succeeded,
    Failed,
}

impl StepOutcome {
    /// Whether the run is over.
    #[inline]
    pub fn is_finished(self) -> bool {
        !matches!(self, Self::InProgress)
    }
}

/// Notification emitted by [`SearchEngine`] after each committed mutation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SearchEvent {
    /// Open set, in discovery order.
    FringeChanged(Vec<Vertex>),
    /// Closed set, in expansion order.
    ClosedChanged(Vec<Vertex>),
    /// The vertex being expanded; `None` after [`SearchEngine::clear`].
    HeadChanged(Option<Vertex>),
    StartPointChanged(Point),
    EndPointChanged(Point),
    /// Start-to-end path on success; empty after [`SearchEngine::clear`].
    PathChanged(Vec<Point>),
    /// The fringe was exhausted.
    Failed,
}

/// Where the next call to `advance` resumes. Every non-idle phase carries
/// the current head.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum Phase {
    Idle,
    /// Test the loop condition, then expand the head.
    Expand(VertexId),
    /// Pick the next head from the fringe.
    Select(VertexId),
    /// The head is on the end point; reconstruct the path.
    Finish(VertexId),
    Succeeded(VertexId),
    Failed(VertexId),
}

/// Incremental A* over a 4-connected unit-cost grid.
///
/// The engine owns every [`Vertex`] it creates. The grid is borrowed per
/// call through [`Pather`], and the engine never mutates it.
#[derive(Debug)]
pub struct SearchEngine {
    start: Point,
    end: Point,
    vertices: Vec<Vertex>,
    fringe: Vec<VertexId>,
    closed: Vec<VertexId>,
    closed_coords: HashSet<Point>,
    path: Vec<Point>,
    phase: Phase,
    nbuf: Vec<Point>,
    listeners: Listeners<SearchEvent>,
}

impl SearchEngine {
    /// Create an idle engine. The endpoints are not validated here; use the
    /// setters for checked relocation.
    pub fn new(start: Point, end: Point) -> Self {
        Self {
            start,
            end,
            vertices: Vec::new(),
            fringe: Vec::new(),
            closed: Vec::new(),
            closed_coords: HashSet::new(),
            path: Vec::new(),
            phase: Phase::Idle,
            nbuf: Vec::with_capacity(4),
            listeners: Listeners::new(),
        }
    }

    // -----------------------------------------------------------------------
    // Accessors
    // -----------------------------------------------------------------------

    #[inline]
    pub fn start_point(&self) -> Point {
        self.start
    }

    #[inline]
    pub fn end_point(&self) -> Point {
        self.end
    }

    pub fn status(&self) -> SearchStatus {
        match self.phase {
            Phase::Idle => SearchStatus::Idle,
            Phase::Expand(_) | Phase::Select(_) | Phase::Finish(_) => SearchStatus::Running,
            Phase::Succeeded(_) => SearchStatus::Succeeded,
            Phase::Failed(_) => SearchStatus::Failed,
        }
    }

    /// Id of the vertex currently being expanded.
    pub fn head_id(&self) -> Option<VertexId> {
        match self.phase {
            Phase::Idle => None,
            Phase::Expand(h)
            | Phase::Select(h)
            | Phase::Finish(h)
            | Phase::Succeeded(h)
            | Phase::Failed(h) => Some(h),
        }
    }

    /// The vertex currently being expanded.
    pub fn head(&self) -> Option<&Vertex> {
        self.head_id().map(|id| &self.vertices[id.0])
    }

    /// Look up a vertex of the current run.
    pub fn vertex(&self, id: VertexId) -> Option<&Vertex> {
        self.vertices.get(id.0)
    }

    /// Number of vertices created by the current run.
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Open set, in discovery order.
    pub fn fringe(&self) -> impl ExactSizeIterator<Item = &Vertex> + '_ {
        self.fringe.iter().map(|id| &self.vertices[id.0])
    }

    /// Closed set, in expansion order.
    pub fn closed(&self) -> impl ExactSizeIterator<Item = &Vertex> + '_ {
        self.closed.iter().map(|id| &self.vertices[id.0])
    }

    /// Whether `p` has already been expanded in this run.
    pub fn is_closed(&self, p: Point) -> bool {
        self.closed_coords.contains(&p)
    }

    /// The start-to-end path once a run succeeded, empty otherwise.
    pub fn path(&self) -> &[Point] {
        &self.path
    }

    /// Hop count of the discovered path.
    pub fn cost(&self) -> Option<usize> {
        self.path.len().checked_sub(1)
    }

    /// Listeners for [`SearchEvent`]s.
    pub fn listeners_mut(&mut self) -> &mut Listeners<SearchEvent> {
        &mut self.listeners
    }

    // -----------------------------------------------------------------------
    // Endpoints
    // -----------------------------------------------------------------------

    /// Move the start point.
    ///
    /// Returns `Ok(false)` without notifying if `p` is an obstacle or the end
    /// point. Relocating once a run has left [`SearchStatus::Idle`] is an
    /// error, because heuristics of existing vertices would go stale.
    pub fn set_start_point<P: Pather>(
        &mut self,
        pather: &P,
        p: Point,
    ) -> Result<bool, SearchError> {
        self.ensure_idle(Operation::SetStartPoint)?;
        if pather.is_obstacle(p) || p == self.end {
            log::debug!("start point move to {p} rejected");
            return Ok(false);
        }
        self.start = p;
        self.listeners.emit_with(|| SearchEvent::StartPointChanged(p));
        Ok(true)
    }

    /// Move the end point. Same rules as
    /// [`set_start_point`](Self::set_start_point).
    pub fn set_end_point<P: Pather>(
        &mut self,
        pather: &P,
        p: Point,
    ) -> Result<bool, SearchError> {
        self.ensure_idle(Operation::SetEndPoint)?;
        if pather.is_obstacle(p) || p == self.start {
            log::debug!("end point move to {p} rejected");
            return Ok(false);
        }
        self.end = p;
        self.listeners.emit_with(|| SearchEvent::EndPointChanged(p));
        Ok(true)
    }

    // -----------------------------------------------------------------------
    // Stepping
    // -----------------------------------------------------------------------

    /// Begin a run: create the start vertex and make it the head.
    ///
    /// Always returns [`StepOutcome::InProgress`] so the driver can present
    /// the initial head before anything is expanded.
    pub fn start(&mut self) -> Result<StepOutcome, SearchError> {
        self.ensure_idle(Operation::Start)?;
        log::debug!("search started: {} -> {}", self.start, self.end);

        let id = self.push_vertex(Vertex {
            coords: self.start,
            distance: 0,
            heuristic: manhattan(self.start, self.end),
            predecessor: None,
        });
        self.phase = Phase::Expand(id);
        self.emit_head();
        Ok(StepOutcome::InProgress)
    }

    /// Perform the work up to the next suspension point.
    pub fn advance<P: Pather>(&mut self, pather: &P) -> Result<StepOutcome, SearchError> {
        match self.phase {
            Phase::Idle | Phase::Succeeded(_) | Phase::Failed(_) => {
                Err(SearchError::InvalidState {
                    operation: Operation::Advance,
                    status: self.status(),
                })
            }
            Phase::Expand(head) => {
                if self.vertices[head.0].coords == self.end {
                    self.phase = Phase::Finish(head);
                } else {
                    self.expand(pather, head);
                    self.phase = Phase::Select(head);
                }
                Ok(StepOutcome::InProgress)
            }
            Phase::Select(head) => match self.select_next() {
                Some(idx) => {
                    self.promote(head, idx);
                    Ok(StepOutcome::InProgress)
                }
                None => {
                    log::debug!(
                        "search failed after closing {} vertices",
                        self.closed.len()
                    );
                    self.phase = Phase::Failed(head);
                    self.listeners.emit(&SearchEvent::Failed);
                    Ok(StepOutcome::Failed)
                }
            },
            Phase::Finish(head) => {
                self.path = self.reconstruct(head);
                log::debug!("search succeeded, path of {} cells", self.path.len());
                self.phase = Phase::Succeeded(head);
                self.emit_path();
                Ok(StepOutcome::Succeeded)
            }
        }
    }

    /// Start the run if idle, then advance until it terminates.
    pub fn run<P: Pather>(&mut self, pather: &P) -> Result<StepOutcome, SearchError> {
        let mut outcome = match self.phase {
            Phase::Idle => self.start()?,
            _ => StepOutcome::InProgress,
        };
        while !outcome.is_finished() {
            outcome = self.advance(pather)?;
        }
        Ok(outcome)
    }

    /// Drop the current run and return to [`SearchStatus::Idle`].
    ///
    /// Emits fringe, closed, path and head notifications (all empty) so
    /// observers can reset derived state.
    pub fn clear(&mut self) {
        self.vertices.clear();
        self.fringe.clear();
        self.emit_fringe();
        self.closed.clear();
        self.closed_coords.clear();
        self.emit_closed();
        self.path.clear();
        self.emit_path();
        self.phase = Phase::Idle;
        self.emit_head();
    }

    // -----------------------------------------------------------------------
    // Internals
    // -----------------------------------------------------------------------

    fn ensure_idle(&self, operation: Operation) -> Result<(), SearchError> {
        match self.phase {
            Phase::Idle => Ok(()),
            _ => Err(SearchError::InvalidState {
                operation,
                status: self.status(),
            }),
        }
    }

    fn push_vertex(&mut self, v: Vertex) -> VertexId {
        let id = VertexId(self.vertices.len());
        self.vertices.push(v);
        id
    }

    /// Discover or relax every unclosed neighbour of `head`.
    fn expand<P: Pather>(&mut self, pather: &P, head: VertexId) {
        let Vertex {
            coords, distance, ..
        } = self.vertices[head.0];
        let candidate = distance + 1;

        let mut nbuf = std::mem::take(&mut self.nbuf);
        nbuf.clear();
        pather.neighbors(coords, &mut nbuf);

        for &np in nbuf.iter() {
            if self.closed_coords.contains(&np) {
                continue;
            }
            let known = self
                .fringe
                .iter()
                .copied()
                .find(|id| self.vertices[id.0].coords == np);
            match known {
                Some(id) => {
                    let v = &mut self.vertices[id.0];
                    if candidate < v.distance {
                        v.distance = candidate;
                        v.predecessor = Some(head);
                    }
                }
                None => {
                    let id = self.push_vertex(Vertex {
                        coords: np,
                        distance: candidate,
                        heuristic: manhattan(np, self.end),
                        predecessor: Some(head),
                    });
                    self.fringe.push(id);
                }
            }
        }

        self.nbuf = nbuf;
        self.emit_fringe();
    }

    /// Index into the fringe of the unclosed vertex with the lowest payload.
    /// Ties go to the earliest discovered.
    fn select_next(&self) -> Option<usize> {
        let mut best: Option<(usize, i32)> = None;
        for (i, id) in self.fringe.iter().enumerate() {
            let v = &self.vertices[id.0];
            if self.closed_coords.contains(&v.coords) {
                continue;
            }
            let payload = v.payload();
            if best.is_none_or(|(_, min)| payload < min) {
                best = Some((i, payload));
            }
        }
        best.map(|(i, _)| i)
    }

    /// Close `head` and make `fringe[idx]` the new head.
    fn promote(&mut self, head: VertexId, idx: usize) {
        self.closed.push(head);
        self.closed_coords.insert(self.vertices[head.0].coords);
        self.emit_closed();

        let next = self.fringe.remove(idx);
        self.emit_fringe();

        log::trace!(
            "head {} -> {}",
            self.vertices[head.0].coords,
            self.vertices[next.0].coords
        );
        self.phase = Phase::Expand(next);
        self.emit_head();
    }

    fn reconstruct(&self, head: VertexId) -> Vec<Point> {
        let mut path = Vec::new();
        let mut cur = Some(head);
        while let Some(id) = cur {
            let v = &self.vertices[id.0];
            path.push(v.coords);
            cur = v.predecessor;
        }
        path.reverse();
        path
    }

    fn emit_fringe(&mut self) {
        let (vertices, fringe) = (&self.vertices, &self.fringe);
        self.listeners
            .emit_with(|| SearchEvent::FringeChanged(snapshot(vertices, fringe)));
    }

    fn emit_closed(&mut self) {
        let (vertices, closed) = (&self.vertices, &self.closed);
        self.listeners
            .emit_with(|| SearchEvent::ClosedChanged(snapshot(vertices, closed)));
    }

    fn emit_head(&mut self) {
        let head = self.head().copied();
        self.listeners.emit_with(|| SearchEvent::HeadChanged(head));
    }

    fn emit_path(&mut self) {
        let path = &self.path;
        self.listeners
            .emit_with(|| SearchEvent::PathChanged(path.clone()));
    }
}

fn snapshot(vertices: &[Vertex], ids: &[VertexId]) -> Vec<Vertex> {
    ids.iter().map(|id| vertices[id.0]).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use gridstep_core::Grid;
    use proptest::prelude::*;
    use std::cell::RefCell;
    use std::collections::{HashMap, VecDeque};
    use std::rc::Rc;

    fn p(x: i32, y: i32) -> Point {
        Point::new(x, y)
    }

    fn coords<'a>(vs: impl IntoIterator<Item = &'a Vertex>) -> Vec<Point> {
        vs.into_iter().map(|v| v.coords).collect()
    }

    fn record(engine: &mut SearchEngine) -> Rc<RefCell<Vec<SearchEvent>>> {
        let log = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&log);
        engine
            .listeners_mut()
            .subscribe(move |e: &SearchEvent| sink.borrow_mut().push(e.clone()));
        log
    }

    /// Run to completion, returning the number of `advance` calls.
    fn drive(engine: &mut SearchEngine, grid: &Grid) -> (StepOutcome, usize) {
        let mut outcome = engine.start().unwrap();
        let mut steps = 0;
        while !outcome.is_finished() {
            outcome = engine.advance(grid).unwrap();
            steps += 1;
        }
        (outcome, steps)
    }

    #[test]
    fn straight_path_on_open_grid() {
        let grid = Grid::new(5, 5);
        let mut engine = SearchEngine::new(p(0, 0), p(2, 0));
        let (outcome, steps) = drive(&mut engine, &grid);

        assert_eq!(outcome, StepOutcome::Succeeded);
        assert_eq!(engine.status(), SearchStatus::Succeeded);
        assert_eq!(engine.path(), &[p(0, 0), p(1, 0), p(2, 0)]);
        assert_eq!(engine.cost(), Some(2));
        // expand, select, expand, select, finish, reconstruct
        assert_eq!(steps, 6);
        assert_eq!(coords(engine.closed()), vec![p(0, 0), p(1, 0)]);
        assert_eq!(coords(engine.fringe()), vec![p(0, 1), p(1, 1)]);
    }

    #[test]
    fn steps_emit_events_in_order() {
        let grid = Grid::new(5, 5);
        let mut engine = SearchEngine::new(p(0, 0), p(2, 0));
        let log = record(&mut engine);

        engine.start().unwrap();
        {
            let events = log.borrow();
            assert_eq!(events.len(), 1);
            match &events[0] {
                SearchEvent::HeadChanged(Some(v)) => {
                    assert_eq!(v.coords, p(0, 0));
                    assert_eq!(v.distance, 0);
                    assert_eq!(v.heuristic, 2);
                    assert!(v.is_start());
                }
                other => panic!("expected head change, got {other:?}"),
            }
        }
        log.borrow_mut().clear();

        engine.advance(&grid).unwrap();
        match log.borrow().as_slice() {
            [SearchEvent::FringeChanged(f)] => {
                assert_eq!(coords(f), vec![p(1, 0), p(0, 1)]);
                assert_eq!(f[0].payload(), 2);
                assert_eq!(f[1].payload(), 4);
            }
            other => panic!("unexpected events {other:?}"),
        }
        log.borrow_mut().clear();

        engine.advance(&grid).unwrap();
        match log.borrow().as_slice() {
            [
                SearchEvent::ClosedChanged(c),
                SearchEvent::FringeChanged(f),
                SearchEvent::HeadChanged(Some(h)),
            ] => {
                assert_eq!(coords(c), vec![p(0, 0)]);
                assert_eq!(coords(f), vec![p(0, 1)]);
                assert_eq!(h.coords, p(1, 0));
            }
            other => panic!("unexpected events {other:?}"),
        }
        log.borrow_mut().clear();

        engine.run(&grid).unwrap();
        let events = log.borrow();
        assert_eq!(
            events.last(),
            Some(&SearchEvent::PathChanged(vec![p(0, 0), p(1, 0), p(2, 0)]))
        );
        assert!(!events.contains(&SearchEvent::Failed));
    }

    #[test]
    fn detours_around_obstacle() {
        let mut grid = Grid::new(5, 5);
        grid.add_obstacle(p(1, 0));
        let mut engine = SearchEngine::new(p(0, 0), p(2, 0));

        assert_eq!(engine.run(&grid), Ok(StepOutcome::Succeeded));
        assert_eq!(
            engine.path(),
            &[p(0, 0), p(0, 1), p(1, 1), p(2, 1), p(2, 0)]
        );
        assert_eq!(engine.cost(), Some(4));
        assert!(engine.path().iter().all(|&c| !grid.contains_obstacle(c)));
    }

    #[test]
    fn enclosed_start_fails() {
        let mut grid = Grid::new(5, 5);
        for o in [p(2, 1), p(3, 2), p(2, 3), p(1, 2)] {
            grid.add_obstacle(o);
        }
        let mut engine = SearchEngine::new(p(2, 2), p(0, 0));
        let log = record(&mut engine);

        let (outcome, steps) = drive(&mut engine, &grid);
        assert_eq!(outcome, StepOutcome::Failed);
        assert_eq!(steps, 2);
        assert_eq!(engine.status(), SearchStatus::Failed);
        assert!(engine.path().is_empty());
        assert_eq!(engine.cost(), None);
        assert_eq!(engine.head().map(|h| h.coords), Some(p(2, 2)));
        assert_eq!(log.borrow().last(), Some(&SearchEvent::Failed));
        assert!(
            !log.borrow()
                .iter()
                .any(|e| matches!(e, SearchEvent::PathChanged(_)))
        );
    }

    #[test]
    fn start_at_i32_limit_fails_cleanly() {
        let grid = Grid::new(5, 5);
        let mut engine = SearchEngine::new(p(i32::MAX, 0), p(-1, 0));

        let (outcome, steps) = drive(&mut engine, &grid);
        assert_eq!(outcome, StepOutcome::Failed);
        assert_eq!(steps, 2);
        let head = engine.head().copied().unwrap();
        assert_eq!(head.heuristic, i32::MAX);
        assert_eq!(head.payload(), i32::MAX);
    }

    #[test]
    fn enclosed_region_fails_after_exhausting_it() {
        let mut grid = Grid::new(6, 6);
        // Wall off the 2x2 top-left corner.
        for o in [p(2, 0), p(2, 1), p(0, 2), p(1, 2)] {
            grid.add_obstacle(o);
        }
        let mut engine = SearchEngine::new(p(0, 0), p(5, 5));
        assert_eq!(engine.run(&grid), Ok(StepOutcome::Failed));
        assert_eq!(engine.closed().len(), 3);
        assert_eq!(engine.fringe().len(), 0);
        assert!(engine.path().is_empty());
    }

    #[test]
    fn start_equal_to_end_yields_single_cell() {
        let grid = Grid::new(3, 3);
        let mut engine = SearchEngine::new(p(1, 1), p(1, 1));
        let (outcome, steps) = drive(&mut engine, &grid);
        assert_eq!(outcome, StepOutcome::Succeeded);
        assert_eq!(steps, 2);
        assert_eq!(engine.path(), &[p(1, 1)]);
        assert_eq!(engine.cost(), Some(0));
    }

    #[test]
    fn misuse_is_reported_as_invalid_state() {
        let grid = Grid::new(3, 3);
        let mut engine = SearchEngine::new(p(0, 0), p(2, 2));

        assert_eq!(
            engine.advance(&grid),
            Err(SearchError::InvalidState {
                operation: Operation::Advance,
                status: SearchStatus::Idle,
            })
        );

        engine.start().unwrap();
        assert_eq!(
            engine.start(),
            Err(SearchError::InvalidState {
                operation: Operation::Start,
                status: SearchStatus::Running,
            })
        );

        assert_eq!(engine.run(&grid), Ok(StepOutcome::Succeeded));
        let err = engine.advance(&grid).unwrap_err();
        assert_eq!(err.to_string(), "search: cannot advance while succeeded");
        assert!(engine.run(&grid).is_err());
    }

    #[test]
    fn relocation_rejects_obstacles_and_other_endpoint() {
        let mut grid = Grid::new(5, 5);
        grid.add_obstacle(p(3, 3));
        let mut engine = SearchEngine::new(p(0, 0), p(4, 4));
        let log = record(&mut engine);

        assert_eq!(engine.set_start_point(&grid, p(3, 3)), Ok(false));
        assert_eq!(engine.set_start_point(&grid, p(4, 4)), Ok(false));
        assert_eq!(engine.set_end_point(&grid, p(3, 3)), Ok(false));
        assert_eq!(engine.set_end_point(&grid, p(0, 0)), Ok(false));
        assert_eq!(engine.start_point(), p(0, 0));
        assert_eq!(engine.end_point(), p(4, 4));
        assert!(log.borrow().is_empty());

        assert_eq!(engine.set_start_point(&grid, p(1, 0)), Ok(true));
        assert_eq!(engine.set_end_point(&grid, p(2, 4)), Ok(true));
        assert_eq!(
            *log.borrow(),
            vec![
                SearchEvent::StartPointChanged(p(1, 0)),
                SearchEvent::EndPointChanged(p(2, 4)),
            ]
        );
    }

    #[test]
    fn relocation_is_refused_once_a_run_left_idle() {
        let grid = Grid::new(5, 5);
        let mut engine = SearchEngine::new(p(0, 0), p(4, 4));
        engine.start().unwrap();
        engine.advance(&grid).unwrap();

        assert_eq!(
            engine.set_end_point(&grid, p(1, 1)),
            Err(SearchError::InvalidState {
                operation: Operation::SetEndPoint,
                status: SearchStatus::Running,
            })
        );
        assert_eq!(engine.end_point(), p(4, 4));

        engine.clear();
        assert_eq!(engine.set_end_point(&grid, p(1, 1)), Ok(true));
    }

    #[test]
    fn clear_resets_state_and_notifies() {
        let grid = Grid::new(5, 5);
        let mut engine = SearchEngine::new(p(0, 0), p(3, 2));
        engine.run(&grid).unwrap();
        let log = record(&mut engine);

        engine.clear();
        assert_eq!(engine.status(), SearchStatus::Idle);
        assert!(engine.head().is_none());
        assert_eq!(engine.fringe().len(), 0);
        assert_eq!(engine.closed().len(), 0);
        assert!(engine.path().is_empty());
        assert_eq!(engine.vertex_count(), 0);
        assert_eq!(
            *log.borrow(),
            vec![
                SearchEvent::FringeChanged(Vec::new()),
                SearchEvent::ClosedChanged(Vec::new()),
                SearchEvent::PathChanged(Vec::new()),
                SearchEvent::HeadChanged(None),
            ]
        );
    }

    #[test]
    fn rerun_after_clear_is_deterministic() {
        let mut grid = Grid::new(7, 7);
        for o in [p(3, 1), p(3, 2), p(3, 3), p(3, 4), p(1, 5)] {
            grid.add_obstacle(o);
        }
        let mut engine = SearchEngine::new(p(1, 3), p(5, 3));
        engine.run(&grid).unwrap();
        let first = engine.path().to_vec();
        let first_closed = coords(engine.closed());

        engine.clear();
        engine.run(&grid).unwrap();
        assert_eq!(engine.path(), first.as_slice());
        assert_eq!(coords(engine.closed()), first_closed);
        assert_eq!(engine.cost(), Some(8));
    }

    #[test]
    fn cancelled_run_keeps_partial_state() {
        let grid = Grid::new(5, 5);
        let mut engine = SearchEngine::new(p(0, 0), p(4, 4));
        engine.start().unwrap();
        for _ in 0..3 {
            engine.advance(&grid).unwrap();
        }
        assert_eq!(engine.status(), SearchStatus::Running);
        assert_eq!(engine.closed().len(), 1);
        assert!(engine.fringe().len() > 0);
        assert!(engine.path().is_empty());
    }

    /// A hand-wired graph whose coordinates are only labels, so heuristic
    /// values can be chosen to force a fringe vertex to be reached twice.
    struct Wired(HashMap<Point, Vec<Point>>);

    impl Pather for Wired {
        fn neighbors(&self, p: Point, buf: &mut Vec<Point>) {
            if let Some(ns) = self.0.get(&p) {
                buf.extend_from_slice(ns);
            }
        }

        fn is_obstacle(&self, _p: Point) -> bool {
            false
        }
    }

    #[test]
    fn cheaper_route_relaxes_fringe_vertex() {
        let (s, a, b, c, x, e) = (p(0, 0), p(10, 1), p(10, 4), p(10, 2), p(12, 0), p(10, 0));
        let graph = Wired(HashMap::from([
            (s, vec![a, b]),
            (a, vec![c]),
            (c, vec![x]),
            (b, vec![x]),
            (x, vec![e]),
        ]));
        let mut engine = SearchEngine::new(s, e);
        engine.start().unwrap();
        // expand S, select A, expand A, select C, expand C, select B
        for _ in 0..6 {
            engine.advance(&graph).unwrap();
        }
        assert_eq!(engine.head().map(|h| h.coords), Some(b));
        let before = engine.fringe().find(|v| v.coords == x).copied().unwrap();
        assert_eq!(before.distance, 3);

        // expand B: X is reachable in two hops now
        engine.advance(&graph).unwrap();
        let after = engine.fringe().find(|v| v.coords == x).copied().unwrap();
        assert_eq!(after.distance, 2);
        assert_eq!(after.payload(), 4);
        assert_eq!(after.predecessor, engine.head_id());

        assert_eq!(engine.run(&graph), Ok(StepOutcome::Succeeded));
        assert_eq!(engine.path(), &[s, b, x, e]);
    }

    fn bfs_distance(grid: &Grid, from: Point, to: Point) -> Option<usize> {
        let mut dist = HashMap::from([(from, 0usize)]);
        let mut queue = VecDeque::from([from]);
        while let Some(cur) = queue.pop_front() {
            if cur == to {
                return dist.get(&cur).copied();
            }
            let d = dist[&cur];
            for n in grid.adjacent(cur) {
                if !dist.contains_key(&n) {
                    dist.insert(n, d + 1);
                    queue.push_back(n);
                }
            }
        }
        None
    }

    proptest! {
        #[test]
        fn path_is_valid_and_optimal(
            w in 2i32..9,
            h in 2i32..9,
            obstacles in prop::collection::vec((0i32..9, 0i32..9), 0..30),
            sx in 0i32..9, sy in 0i32..9,
            ex in 0i32..9, ey in 0i32..9,
        ) {
            let start = p(sx % w, sy % h);
            let end = p(ex % w, ey % h);
            let mut grid = Grid::new(w, h);
            for (ox, oy) in obstacles {
                let o = p(ox % w, oy % h);
                if o != start && o != end {
                    grid.add_obstacle(o);
                }
            }

            let mut engine = SearchEngine::new(start, end);
            let outcome = engine.run(&grid).unwrap();

            match bfs_distance(&grid, start, end) {
                None => {
                    prop_assert_eq!(outcome, StepOutcome::Failed);
                    prop_assert!(engine.path().is_empty());
                }
                Some(best) => {
                    prop_assert_eq!(outcome, StepOutcome::Succeeded);
                    let path = engine.path();
                    prop_assert_eq!(path.first().copied(), Some(start));
                    prop_assert_eq!(path.last().copied(), Some(end));
                    prop_assert_eq!(path.len() - 1, best);
                    for c in path {
                        prop_assert!(grid.in_bounds(*c));
                        prop_assert!(!grid.contains_obstacle(*c));
                    }
                    for pair in path.windows(2) {
                        prop_assert_eq!(manhattan(pair[0], pair[1]), 1);
                    }
                }
            }
        }
    }
}
