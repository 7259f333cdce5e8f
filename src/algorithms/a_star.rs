use crate::algorithms::common::PathfindingAlgorithm;
use crate::algorithms::open_set::OpenSet;
use crate::error::EndpointError;
use crate::events::{NeighborKind, SearchEvent, SearchResult};
use crate::grid::{GridModel, Position};
use log::{debug, trace};
use rustc_hash::{FxHashMap, FxHashSet};
use std::collections::VecDeque;

/// A search node. `parent` indexes into the run's cell arena.
#[derive(Debug, Clone)]
struct Cell {
    position: Position,
    parent: Option<usize>,
    g: u32,
    h: f64,
    f: f64,
}

/// Per-run expansion counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchCounters {
    pub expanded: usize,
    pub discovered: usize,
    pub updated: usize,
}

/// One incremental A* run over a grid.
///
/// The search advances one expansion at a time through [`step`], or lazily
/// as an iterator of [`SearchEvent`]s. Either way the stream ends with a
/// single [`SearchEvent::Result`] and cannot be restarted; build a new
/// `AStarSearch` for the next run.
///
/// [`step`]: AStarSearch::step
pub struct AStarSearch<'g> {
    grid: &'g GridModel,
    goal: Position,
    open: OpenSet,
    closed: FxHashSet<Position>,
    cells: Vec<Cell>,
    tracked: FxHashMap<Position, usize>,
    pending: VecDeque<SearchEvent>,
    counters: SearchCounters,
    finished: bool,
}

impl<'g> AStarSearch<'g> {
    /// Seeds the open set with the start cell. Fails if the grid's start or
    /// goal is not a valid cell.
    pub fn new(grid: &'g GridModel) -> Result<Self, EndpointError> {
        grid.check_endpoints()?;
        let start = grid.start();
        let goal = grid.goal();
        let h = start.euclidean_distance(&goal);

        let mut search = AStarSearch {
            grid,
            goal,
            open: OpenSet::new(),
            closed: FxHashSet::default(),
            cells: Vec::new(),
            tracked: FxHashMap::default(),
            pending: VecDeque::new(),
            counters: SearchCounters::default(),
            finished: false,
        };
        search.track(Cell {
            position: start,
            parent: None,
            g: 0,
            h,
            f: h,
        });
        Ok(search)
    }

    pub fn counters(&self) -> SearchCounters {
        self.counters
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    pub fn open_len(&self) -> usize {
        self.open.len()
    }

    /// Expands the best open cell and returns the events it produced, in
    /// order. Returns an empty batch once the run has finished.
    pub fn step(&mut self) -> Vec<SearchEvent> {
        let mut events = Vec::new();
        if self.finished {
            return events;
        }

        let Some((position, _)) = self.open.pop_min() else {
            debug!(
                "open set exhausted after {} expansions, goal {} unreachable",
                self.counters.expanded, self.goal
            );
            self.finished = true;
            events.push(SearchEvent::Result(SearchResult::NotFound));
            return events;
        };

        let current = self.tracked[&position];
        let current_g = self.cells[current].g;
        self.counters.expanded += 1;
        trace!(
            "expand {} g={} h={:.3} f={:.3}",
            position,
            current_g,
            self.cells[current].h,
            self.cells[current].f
        );
        events.push(SearchEvent::CurrentCell(position));

        if position == self.goal {
            let path = self.reconstruct_path(current);
            debug!(
                "goal {} reached after {} expansions, {} steps",
                self.goal,
                self.counters.expanded,
                path.len() - 1
            );
            self.finished = true;
            events.push(SearchEvent::Result(SearchResult::Found(path)));
            return events;
        }

        self.closed.insert(position);

        for neighbor in self.grid.get_neighbors(&position) {
            if self.closed.contains(&neighbor) {
                continue;
            }

            let new_g = current_g + 1;
            match self.tracked.get(&neighbor).copied() {
                Some(index) if self.open.contains(&neighbor) && new_g < self.cells[index].g => {
                    let h = neighbor.euclidean_distance(&self.goal);
                    let cell = &mut self.cells[index];
                    cell.g = new_g;
                    cell.h = h;
                    cell.f = f64::from(new_g) + h;
                    cell.parent = Some(current);
                    let f = cell.f;
                    self.open.decrease_priority(&neighbor, f);
                    self.counters.updated += 1;
                    events.push(SearchEvent::Neighbor(neighbor, NeighborKind::Updated));
                }
                Some(_) => {}
                None => {
                    let h = neighbor.euclidean_distance(&self.goal);
                    self.track(Cell {
                        position: neighbor,
                        parent: Some(current),
                        g: new_g,
                        h,
                        f: f64::from(new_g) + h,
                    });
                    self.counters.discovered += 1;
                    events.push(SearchEvent::Neighbor(neighbor, NeighborKind::Discovered));
                }
            }
        }

        events
    }

    /// Drives the run to completion and returns its result.
    pub fn run_to_end(mut self) -> SearchResult {
        loop {
            for event in self.step() {
                if let SearchEvent::Result(result) = event {
                    return result;
                }
            }
        }
    }

    fn track(&mut self, cell: Cell) {
        let index = self.cells.len();
        self.open.insert(cell.position, cell.f);
        self.tracked.insert(cell.position, index);
        self.cells.push(cell);
    }

    fn reconstruct_path(&self, mut index: usize) -> Vec<Position> {
        let mut path = vec![self.cells[index].position];
        while let Some(parent) = self.cells[index].parent {
            path.push(self.cells[parent].position);
            index = parent;
        }
        path.reverse();
        path
    }
}

impl Iterator for AStarSearch<'_> {
    type Item = SearchEvent;

    fn next(&mut self) -> Option<SearchEvent> {
        while self.pending.is_empty() && !self.finished {
            let events = self.step();
            self.pending.extend(events);
        }
        self.pending.pop_front()
    }
}

/// Synchronous A* that only reports the final path.
#[derive(Default)]
pub struct IncrementalAStar;

impl IncrementalAStar {
    pub fn new() -> Self {
        IncrementalAStar
    }
}

impl PathfindingAlgorithm for IncrementalAStar {
    fn name(&self) -> &'static str {
        "a_star"
    }

    fn find_path(&mut self, grid: &GridModel) -> Result<Option<Vec<Position>>, EndpointError> {
        Ok(AStarSearch::new(grid)?.run_to_end().into_path())
    }
}
