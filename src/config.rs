use crate::engine::EngineConfig;
use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Config {
    /// Maze text file (`a` start, `b` goal, space open, anything else a wall).
    /// A random maze is generated when omitted.
    #[arg(long)]
    pub maze: Option<PathBuf>,

    #[arg(long, default_value_t = 20)]
    pub width: i32,

    #[arg(long, default_value_t = 20)]
    pub height: i32,

    #[arg(long, default_value_t = 80)]
    pub num_walls: usize,

    /// Seed for the random maze, for reproducible runs.
    #[arg(long)]
    pub seed: Option<u64>,

    /// Pause after each expanded cell.
    #[arg(long, default_value_t = 50)]
    pub delay_ms: u64,

    /// How many times to request a search from the engine.
    #[arg(long, default_value_t = 1)]
    pub runs: usize,

    #[arg(long, default_value_t = false)]
    pub no_visualization: bool,

    #[arg(long, default_value_t = false)]
    pub quiet: bool,
}

impl Config {
    pub fn engine_config(&self) -> EngineConfig {
        let step_delay = if self.no_visualization {
            Duration::ZERO
        } else {
            Duration::from_millis(self.delay_ms)
        };
        EngineConfig { step_delay }
    }
}
