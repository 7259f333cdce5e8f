use crate::error::{EndpointError, GridError};
use rand::Rng;
use rustc_hash::FxHashSet;
use std::fmt;
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub const fn new(x: i32, y: i32) -> Self {
        Position { x, y }
    }

    /// Straight-line distance, used as the search heuristic.
    pub fn euclidean_distance(&self, other: &Position) -> f64 {
        let dx = f64::from(self.x - other.x);
        let dy = f64::from(self.y - other.y);
        dx.hypot(dy)
    }

    /// The four axis-aligned neighbors, bounds not checked.
    pub fn neighbors4(&self) -> [Position; 4] {
        let (x, y) = (self.x, self.y);
        [
            Position::new(x, y + 1),
            Position::new(x, y - 1),
            Position::new(x + 1, y),
            Position::new(x - 1, y),
        ]
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

impl From<(i32, i32)> for Position {
    fn from((x, y): (i32, i32)) -> Self {
        Position::new(x, y)
    }
}

/// Maze geometry for one search: size, endpoints and obstacles.
///
/// A grid never changes after construction. The engine holds it behind an
/// `Arc` and only ever reads it.
#[derive(Debug, Clone)]
pub struct GridModel {
    width: i32,
    height: i32,
    start: Position,
    goal: Position,
    obstacles: FxHashSet<Position>,
}

impl GridModel {
    /// Builds a grid from its parts. Only the dimensions are checked here;
    /// searches call [`check_endpoints`](GridModel::check_endpoints) before
    /// they start.
    pub fn new(
        width: i32,
        height: i32,
        start: Position,
        goal: Position,
        obstacles: impl IntoIterator<Item = Position>,
    ) -> Result<Self, GridError> {
        if width <= 0 || height <= 0 {
            return Err(GridError::EmptyGrid { width, height });
        }

        Ok(GridModel {
            width,
            height,
            start,
            goal,
            obstacles: obstacles.into_iter().collect(),
        })
    }

    /// Parses the text maze format.
    ///
    /// Every line is a row and every character a column. `a` marks the
    /// start, `b` the goal (either case), a space is open floor and any
    /// other character is an obstacle. Lines shorter than the widest one
    /// are padded with open floor.
    pub fn parse(text: &str) -> Result<Self, GridError> {
        let mut start = None;
        let mut goal = None;
        let mut obstacles = FxHashSet::default();
        let mut width = 0;
        let mut height = 0;

        for (row, line) in text.lines().enumerate() {
            let y = coordinate("row", row)?;
            height = coordinate("row", row + 1)?;
            let mut line_width = 0;

            for (column, symbol) in line.chars().enumerate() {
                let position = Position::new(coordinate("column", column)?, y);
                line_width = coordinate("column", column + 1)?;

                match symbol.to_ascii_lowercase() {
                    'a' => {
                        if let Some(first) = start.replace(position) {
                            return Err(GridError::DuplicateStart {
                                first,
                                second: position,
                            });
                        }
                    }
                    'b' => {
                        if let Some(first) = goal.replace(position) {
                            return Err(GridError::DuplicateGoal {
                                first,
                                second: position,
                            });
                        }
                    }
                    ' ' => {}
                    _ => {
                        obstacles.insert(position);
                    }
                }
            }

            width = width.max(line_width);
        }

        if width == 0 || height == 0 {
            return Err(GridError::EmptyGrid { width, height });
        }
        let start = start.ok_or(GridError::MissingStart)?;
        let goal = goal.ok_or(GridError::MissingGoal)?;

        GridModel::new(width, height, start, goal, obstacles)
    }

    /// Fails unless both endpoints are in bounds and off obstacles.
    pub fn check_endpoints(&self) -> Result<(), EndpointError> {
        if !self.is_valid(self.start.x, self.start.y) {
            return Err(EndpointError::InvalidStart(self.start));
        }
        if !self.is_valid(self.goal.x, self.goal.y) {
            return Err(EndpointError::InvalidGoal(self.goal));
        }
        Ok(())
    }

    /// Reads and parses a maze file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, GridError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| GridError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        log::debug!("loaded maze file {}", path.display());
        GridModel::parse(&text)
    }

    /// Generates a random maze.
    ///
    /// The start lands in the top-left quadrant and the goal in the
    /// bottom-right one. Walls are dropped at random cells, never on the
    /// endpoints, giving up after `num_walls * 3` attempts.
    pub fn random<R: Rng + ?Sized>(
        width: i32,
        height: i32,
        num_walls: usize,
        rng: &mut R,
    ) -> Result<Self, GridError> {
        if width <= 0 || height <= 0 {
            return Err(GridError::EmptyGrid { width, height });
        }

        let start = Position::new(
            rng.gen_range(0..(width / 2).max(1)),
            rng.gen_range(0..(height / 2).max(1)),
        );
        let goal = Position::new(
            rng.gen_range((width / 2).min(width - 1)..width),
            rng.gen_range((height / 2).min(height - 1)..height),
        );

        let mut obstacles = FxHashSet::default();
        let mut attempts = 0;
        while obstacles.len() < num_walls && attempts < num_walls * 3 {
            let pos = Position::new(rng.gen_range(0..width), rng.gen_range(0..height));
            if pos != start && pos != goal {
                obstacles.insert(pos);
            }
            attempts += 1;
        }

        GridModel::new(width, height, start, goal, obstacles)
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    pub fn start(&self) -> Position {
        self.start
    }

    pub fn goal(&self) -> Position {
        self.goal
    }

    pub fn obstacles(&self) -> &FxHashSet<Position> {
        &self.obstacles
    }

    pub fn in_bounds(&self, pos: Position) -> bool {
        (0..self.width).contains(&pos.x) && (0..self.height).contains(&pos.y)
    }

    pub fn is_obstacle(&self, pos: Position) -> bool {
        self.obstacles.contains(&pos)
    }

    /// True iff `(x, y)` is inside the grid and not an obstacle.
    pub fn is_valid(&self, x: i32, y: i32) -> bool {
        let pos = Position::new(x, y);
        self.in_bounds(pos) && !self.is_obstacle(pos)
    }

    pub fn get_neighbors(&self, pos: &Position) -> Vec<Position> {
        pos.neighbors4()
            .into_iter()
            .filter(|n| self.is_valid(n.x, n.y))
            .collect()
    }
}

fn coordinate(axis: &'static str, index: usize) -> Result<i32, GridError> {
    i32::try_from(index).map_err(|_| GridError::TooLarge { axis, index })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_parse_maze_text() {
        let grid = GridModel::parse("a #\n  #\n#  b").unwrap();

        assert_eq!(grid.width(), 4);
        assert_eq!(grid.height(), 3);
        assert_eq!(grid.start(), Position::new(0, 0));
        assert_eq!(grid.goal(), Position::new(3, 2));
        assert!(!grid.is_valid(2, 0));
        assert!(!grid.is_valid(0, 2));
        assert!(grid.is_valid(1, 1));
        // Short lines are padded with floor.
        assert!(grid.is_valid(3, 0));
    }

    #[test]
    fn test_parse_accepts_uppercase_and_trailing_newline() {
        let grid = GridModel::parse("A  B\n").unwrap();

        assert_eq!(grid.height(), 1);
        assert_eq!(grid.start(), Position::new(0, 0));
        assert_eq!(grid.goal(), Position::new(3, 0));
    }

    #[test]
    fn test_parse_rejects_bad_mazes() {
        assert!(matches!(GridModel::parse(""), Err(GridError::EmptyGrid { .. })));
        assert!(matches!(GridModel::parse("  b"), Err(GridError::MissingStart)));
        assert!(matches!(GridModel::parse("a  "), Err(GridError::MissingGoal)));
        assert!(matches!(
            GridModel::parse("a a b"),
            Err(GridError::DuplicateStart { .. })
        ));
        assert!(matches!(
            GridModel::parse("a b\nb"),
            Err(GridError::DuplicateGoal { .. })
        ));
    }

    #[test]
    fn test_new_checks_dimensions_only() {
        let err = GridModel::new(0, 3, Position::new(0, 0), Position::new(0, 0), []);
        assert!(matches!(err, Err(GridError::EmptyGrid { .. })));

        let grid = GridModel::new(3, 3, Position::new(3, 0), Position::new(1, 1), []).unwrap();
        assert!(!grid.is_valid(grid.start().x, grid.start().y));
    }

    #[test]
    fn test_check_endpoints() {
        let grid = GridModel::new(3, 1, Position::new(-1, 0), Position::new(2, 0), []).unwrap();
        assert_eq!(
            grid.check_endpoints(),
            Err(EndpointError::InvalidStart(Position::new(-1, 0)))
        );

        let grid = GridModel::new(
            3,
            1,
            Position::new(0, 0),
            Position::new(2, 0),
            [Position::new(2, 0)],
        )
        .unwrap();
        assert_eq!(
            grid.check_endpoints(),
            Err(EndpointError::InvalidGoal(Position::new(2, 0)))
        );

        let grid = GridModel::parse("a b").unwrap();
        assert_eq!(grid.check_endpoints(), Ok(()));
    }

    #[test]
    fn test_coordinate_rejects_overflow() {
        assert_eq!(coordinate("row", 7).unwrap(), 7);
        assert_eq!(coordinate("column", i32::MAX as usize).unwrap(), i32::MAX);

        let err = coordinate("column", i32::MAX as usize + 1).unwrap_err();
        assert!(matches!(err, GridError::TooLarge { axis: "column", .. }));
        assert!(err.to_string().contains("column"));
    }

    #[test]
    fn test_is_valid_bounds_and_obstacles() {
        let grid = GridModel::new(
            2,
            2,
            Position::new(0, 0),
            Position::new(1, 1),
            [Position::new(1, 0)],
        )
        .unwrap();

        assert!(grid.is_valid(0, 0));
        assert!(!grid.is_valid(1, 0));
        assert!(!grid.is_valid(-1, 0));
        assert!(!grid.is_valid(0, 2));
    }

    #[test]
    fn test_neighbors_are_four_connected() {
        let grid = GridModel::new(3, 3, Position::new(0, 0), Position::new(2, 2), []).unwrap();

        let neighbors = grid.get_neighbors(&Position::new(1, 1));
        assert_eq!(
            neighbors,
            vec![
                Position::new(1, 2),
                Position::new(1, 0),
                Position::new(2, 1),
                Position::new(0, 1),
            ]
        );

        let corner = grid.get_neighbors(&Position::new(0, 0));
        assert_eq!(corner, vec![Position::new(0, 1), Position::new(1, 0)]);
    }

    #[test]
    fn test_euclidean_distance() {
        let a = Position::new(0, 0);
        assert_eq!(a.euclidean_distance(&Position::new(3, 4)), 5.0);
        assert_eq!(a.euclidean_distance(&a), 0.0);
    }

    #[test]
    fn test_random_grid_keeps_endpoints_clear() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..20 {
            let grid = GridModel::random(10, 8, 30, &mut rng).unwrap();
            assert!(grid.is_valid(grid.start().x, grid.start().y));
            assert!(grid.is_valid(grid.goal().x, grid.goal().y));
            assert!(grid.start().x < 5 && grid.start().y < 4);
            assert!(grid.goal().x >= 5 && grid.goal().y >= 4);
            assert!(grid.obstacles().len() <= 30);
        }
    }
}
