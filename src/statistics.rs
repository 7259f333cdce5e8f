use crate::events::{NeighborKind, SearchEvent};
use std::fmt;

/// Counters for one search run, built from its event stream.
#[derive(Debug, Clone, Default)]
pub struct SearchStatistics {
    pub expanded: usize,
    pub discovered: usize,
    pub updated: usize,
    pub path_length: Option<usize>,
    pub optimal_path_length: Option<usize>,
    pub finished: bool,
}

impl SearchStatistics {
    pub fn new(optimal_path_length: Option<usize>) -> Self {
        SearchStatistics {
            optimal_path_length,
            ..Default::default()
        }
    }

    pub fn record(&mut self, event: &SearchEvent) {
        match event {
            SearchEvent::CurrentCell(_) => self.expanded += 1,
            SearchEvent::Neighbor(_, NeighborKind::Discovered) => self.discovered += 1,
            SearchEvent::Neighbor(_, NeighborKind::Updated) => self.updated += 1,
            SearchEvent::Result(result) => {
                self.path_length = result.cost();
                self.finished = true;
            }
        }
    }

    /// Path steps over the reference optimum; 1.0 means optimal.
    pub fn route_efficiency(&self) -> Option<f64> {
        match (self.path_length, self.optimal_path_length) {
            (Some(found), Some(optimal)) if optimal > 0 => Some(found as f64 / optimal as f64),
            (Some(0), Some(0)) => Some(1.0),
            _ => None,
        }
    }
}

impl fmt::Display for SearchStatistics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Cells expanded: {}", self.expanded)?;
        writeln!(f, "Cells discovered: {}", self.discovered)?;
        writeln!(f, "Cells updated: {}", self.updated)?;

        match self.path_length {
            Some(length) => writeln!(f, "Path length: {}", length)?,
            None if self.finished => writeln!(f, "Path length: no path")?,
            None => writeln!(f, "Path length: search not finished")?,
        }
        if let Some(optimal) = self.optimal_path_length {
            writeln!(f, "Optimal path length (BFS): {}", optimal)?;
        }
        if let Some(efficiency) = self.route_efficiency() {
            writeln!(f, "Route efficiency: {:.3}", efficiency)?;
        }

        Ok(())
    }
}
