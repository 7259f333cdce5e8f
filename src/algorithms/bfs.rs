use crate::algorithms::common::PathfindingAlgorithm;
use crate::error::EndpointError;
use crate::grid::{GridModel, Position};
use pathfinding::prelude::bfs;

/// Breadth-first search from the `pathfinding` crate.
///
/// Every step costs 1, so the first path BFS finds is a shortest one. Used
/// as the reference optimum that A* results are compared against.
#[derive(Default)]
pub struct ReferenceBfs;

impl ReferenceBfs {
    pub fn new() -> Self {
        ReferenceBfs
    }
}

impl PathfindingAlgorithm for ReferenceBfs {
    fn name(&self) -> &'static str {
        "bfs"
    }

    fn find_path(&mut self, grid: &GridModel) -> Result<Option<Vec<Position>>, EndpointError> {
        grid.check_endpoints()?;
        let goal = grid.goal();
        Ok(bfs(&grid.start(), |p| grid.get_neighbors(p), |p| *p == goal))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bfs_shortest_length() {
        let grid = GridModel::parse("a #  \n  # b\n     ").unwrap();
        let path = ReferenceBfs::new().find_path(&grid).unwrap().unwrap();

        assert_eq!(path.first(), Some(&grid.start()));
        assert_eq!(path.last(), Some(&grid.goal()));
        assert_eq!(path.len() - 1, 7);
    }

    #[test]
    fn test_bfs_unreachable() {
        let grid = GridModel::parse("a#b").unwrap();
        assert_eq!(ReferenceBfs::new().find_path(&grid), Ok(None));
    }
}
