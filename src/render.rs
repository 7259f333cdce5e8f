use crate::events::{SearchEvent, SearchResult};
use crate::grid::{GridModel, Position};
use rustc_hash::FxHashSet;
use std::fmt::Write;

pub const LEGEND: &str =
    "Legend: S=Start, G=Goal, #=Obstacle, @=Current, x=Closed, o=Open, *=Path, .=Empty";

/// Terminal picture of a search in progress, fed by its event stream.
pub struct GridView<'g> {
    grid: &'g GridModel,
    closed: FxHashSet<Position>,
    open: FxHashSet<Position>,
    current: Option<Position>,
    path: FxHashSet<Position>,
}

impl<'g> GridView<'g> {
    pub fn new(grid: &'g GridModel) -> Self {
        GridView {
            grid,
            closed: FxHashSet::default(),
            open: FxHashSet::default(),
            current: None,
            path: FxHashSet::default(),
        }
    }

    /// Forgets the previous run's overlay.
    pub fn reset(&mut self) {
        self.closed.clear();
        self.open.clear();
        self.current = None;
        self.path.clear();
    }

    pub fn apply(&mut self, event: &SearchEvent) {
        match event {
            SearchEvent::CurrentCell(pos) => {
                if let Some(previous) = self.current.replace(*pos) {
                    self.closed.insert(previous);
                }
                self.open.remove(pos);
            }
            SearchEvent::Neighbor(pos, _) => {
                self.open.insert(*pos);
            }
            SearchEvent::Result(SearchResult::Found(path)) => {
                self.path.extend(path.iter().copied());
            }
            SearchEvent::Result(SearchResult::NotFound) => {}
        }
    }

    fn symbol(&self, pos: Position) -> char {
        if pos == self.grid.start() {
            'S'
        } else if pos == self.grid.goal() {
            'G'
        } else if self.grid.is_obstacle(pos) {
            '#'
        } else if self.path.contains(&pos) {
            '*'
        } else if self.current == Some(pos) {
            '@'
        } else if self.closed.contains(&pos) {
            'x'
        } else if self.open.contains(&pos) {
            'o'
        } else {
            '.'
        }
    }

    /// One line per row, cells separated by spaces.
    pub fn render(&self) -> String {
        let mut out = String::new();
        for y in 0..self.grid.height() {
            let row: Vec<String> = (0..self.grid.width())
                .map(|x| self.symbol(Position::new(x, y)).to_string())
                .collect();
            let _ = writeln!(out, "{}", row.join(" "));
        }
        out
    }
}
