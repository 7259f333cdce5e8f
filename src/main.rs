use clap::Parser;

use maze_pathfinding::algorithms::bfs::ReferenceBfs;
use maze_pathfinding::algorithms::common::PathfindingAlgorithm;
use maze_pathfinding::config::Config;
use maze_pathfinding::engine::SearchEngine;
use maze_pathfinding::events::{SearchEvent, SearchResult};
use maze_pathfinding::grid::GridModel;
use maze_pathfinding::render::{GridView, LEGEND};
use maze_pathfinding::statistics::SearchStatistics;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::sync::Arc;
use std::time::Instant;

fn load_grid(config: &Config) -> Result<GridModel, maze_pathfinding::GridError> {
    match &config.maze {
        Some(path) => GridModel::load(path),
        None => {
            let seed = config.seed.unwrap_or_else(rand::random);
            if !config.quiet {
                println!("Maze seed: {} (for reproducibility)", seed);
            }
            let mut rng = StdRng::seed_from_u64(seed);
            GridModel::random(config.width, config.height, config.num_walls, &mut rng)
        }
    }
}

fn clear_screen() {
    print!("\x1B[2J\x1B[1;1H");
}

fn main() {
    env_logger::init();
    let config = Config::parse();

    let grid = match load_grid(&config) {
        Ok(grid) => Arc::new(grid),
        Err(e) => {
            eprintln!("Failed to build maze: {}", e);
            std::process::exit(1);
        }
    };

    if !config.quiet {
        println!("Grid size: {}x{}", grid.width(), grid.height());
        println!("Obstacles: {}", grid.obstacles().len());
        println!("Start: {}, Goal: {}", grid.start(), grid.goal());
        if config.no_visualization {
            println!("Visualization disabled - running in fast mode");
        } else {
            println!("Visualization enabled with {}ms delay", config.delay_ms);
        }
        println!();
    }

    let mut reference = ReferenceBfs::new();
    let optimal_path_length = match reference.find_path(&grid) {
        Ok(path) => path.map(|path| path.len() - 1),
        Err(e) => {
            eprintln!("Cannot search this maze: {}", e);
            std::process::exit(1);
        }
    };
    if !config.quiet {
        match optimal_path_length {
            Some(steps) => println!("Reference optimum ({}): {} steps", reference.name(), steps),
            None => println!("Reference optimum ({}): unreachable", reference.name()),
        }
    }

    let (engine, events) = match SearchEngine::start(Arc::clone(&grid), config.engine_config()) {
        Ok(started) => started,
        Err(e) => {
            eprintln!("Cannot search this maze: {}", e);
            std::process::exit(1);
        }
    };
    let mut view = GridView::new(&grid);

    for run in 1..=config.runs {
        let started = Instant::now();
        let mut stats = SearchStatistics::new(optimal_path_length);
        view.reset();
        engine.request_search();

        for event in events.iter() {
            stats.record(&event);
            view.apply(&event);

            if !config.no_visualization && matches!(event, SearchEvent::CurrentCell(_)) {
                clear_screen();
                println!("=== MAZE SEARCH ===");
                println!("Run: {} of {} | Expanded: {}", run, config.runs, stats.expanded);
                println!("{}", LEGEND);
                print!("{}", view.render());
            }

            if let SearchEvent::Result(result) = event {
                if !config.no_visualization {
                    clear_screen();
                    print!("{}", view.render());
                    println!();
                }
                match &result {
                    SearchResult::Found(path) => {
                        println!("Run {}: path found with {} steps", run, path.len() - 1)
                    }
                    SearchResult::NotFound => println!("Run {}: no path exists", run),
                }
                break;
            }
        }

        if !config.quiet {
            println!("\n=== RUN {} RESULTS ===", run);
            println!("{}", stats);
            println!("Search time: {:.2?}", started.elapsed());
        }
    }

    engine.shutdown();
}
