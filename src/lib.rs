pub mod algorithms;
pub mod config;
pub mod engine;
pub mod error;
pub mod events;
pub mod grid;
pub mod render;
pub mod statistics;

pub use engine::{EngineConfig, EngineState, SearchEngine};
pub use error::{EndpointError, EngineError, GridError};
pub use events::{NeighborKind, SearchEvent, SearchResult};
pub use grid::{GridModel, Position};
