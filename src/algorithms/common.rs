use crate::error::EndpointError;
use crate::grid::{GridModel, Position};

pub trait PathfindingAlgorithm {
    fn name(&self) -> &'static str;

    /// Runs one search from the grid's start to its goal, returning the
    /// start-to-goal path or `None` if the goal is unreachable. Invalid
    /// endpoints are an error, reported before any search work.
    fn find_path(&mut self, grid: &GridModel) -> Result<Option<Vec<Position>>, EndpointError>;
}
