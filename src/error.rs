use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::grid::Position;

/// Errors raised while building a [`GridModel`](crate::grid::GridModel).
#[derive(Debug, Error)]
pub enum GridError {
    #[error("failed to read maze file `{path}`: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("grid dimensions must be positive, got {width}x{height}")]
    EmptyGrid { width: i32, height: i32 },

    #[error("maze has no start cell (`a`)")]
    MissingStart,

    #[error("maze has no goal cell (`b`)")]
    MissingGoal,

    #[error("maze has more than one start cell: {first} and {second}")]
    DuplicateStart { first: Position, second: Position },

    #[error("maze has more than one goal cell: {first} and {second}")]
    DuplicateGoal { first: Position, second: Position },

    #[error("maze {axis} {index} does not fit a grid coordinate")]
    TooLarge { axis: &'static str, index: usize },
}

/// Start or goal not usable for a search. Checked before any search begins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum EndpointError {
    #[error("start position {0} is not a valid cell")]
    InvalidStart(Position),

    #[error("goal position {0} is not a valid cell")]
    InvalidGoal(Position),
}

/// Errors reported synchronously by [`SearchEngine::start`](crate::engine::SearchEngine::start).
#[derive(Debug, Error)]
pub enum EngineError {
    #[error(transparent)]
    Endpoint(#[from] EndpointError),

    #[error("failed to spawn search worker: {0}")]
    Spawn(#[from] io::Error),
}
