use crate::grid::Position;

/// How a neighbor's tracked cell changed during an expansion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NeighborKind {
    /// First time the position entered the open set.
    Discovered,
    /// An open entry got a cheaper path through the current cell.
    Updated,
}

/// Terminal outcome of one search run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchResult {
    /// Start-to-goal path, both endpoints included.
    Found(Vec<Position>),
    NotFound,
}

impl SearchResult {
    pub fn path(&self) -> Option<&[Position]> {
        match self {
            SearchResult::Found(path) => Some(path),
            SearchResult::NotFound => None,
        }
    }

    pub fn into_path(self) -> Option<Vec<Position>> {
        match self {
            SearchResult::Found(path) => Some(path),
            SearchResult::NotFound => None,
        }
    }

    /// Number of steps along the path.
    pub fn cost(&self) -> Option<usize> {
        self.path().map(|path| path.len().saturating_sub(1))
    }

    pub fn is_found(&self) -> bool {
        matches!(self, SearchResult::Found(_))
    }
}

/// One item of the progress stream a search run produces.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchEvent {
    CurrentCell(Position),
    Neighbor(Position, NeighborKind),
    Result(SearchResult),
}

impl SearchEvent {
    /// The result event is always the last one of its run.
    pub fn is_terminal(&self) -> bool {
        matches!(self, SearchEvent::Result(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_result_cost_counts_steps() {
        let found = SearchResult::Found(vec![Position::new(0, 0), Position::new(1, 0)]);
        assert_eq!(found.cost(), Some(1));
        assert!(found.is_found());
        assert_eq!(SearchResult::NotFound.cost(), None);
        assert_eq!(SearchResult::NotFound.into_path(), None);
    }

    #[test]
    fn test_only_result_is_terminal() {
        assert!(SearchEvent::Result(SearchResult::NotFound).is_terminal());
        assert!(!SearchEvent::CurrentCell(Position::new(0, 0)).is_terminal());
        assert!(!SearchEvent::Neighbor(Position::new(0, 0), NeighborKind::Updated).is_terminal());
    }
}
