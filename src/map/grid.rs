use std::collections::HashSet;
use std::fmt;

use thiserror::Error;

/// A cell on the grid. Signed so that neighbour arithmetic can step off the
/// edge and be rejected by [`Environment::in_bounds`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub const fn offset(self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }

    pub fn manhattan(self, other: Position) -> u32 {
        self.x.abs_diff(other.x) + self.y.abs_diff(other.y)
    }
}

impl From<(i32, i32)> for Position {
    fn from((x, y): (i32, i32)) -> Self {
        Self { x, y }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum EnvironmentError {
    #[error("map must be at least 1x1, got {width}x{height}")]
    Empty { width: i32, height: i32 },

    #[error("recharge zone {0} lies outside the map")]
    RechargeOutOfBounds(Position),

    #[error("recharge zone {0} is an obstacle")]
    RechargeBlocked(Position),

    #[error("obstacle {0} lies outside the map")]
    ObstacleOutOfBounds(Position),
}

/// Read-only world the rover moves in.
#[derive(Debug, Clone)]
pub struct Environment {
    width: i32,
    height: i32,
    recharge: Position,
    obstacles: HashSet<Position>,
}

impl Environment {
    /// Validates and builds an environment from `map_size`, `recharge_zone`
    /// and the obstacle set.
    pub fn new(
        map_size: (i32, i32),
        recharge_zone: Position,
        obstacles: impl IntoIterator<Item = Position>,
    ) -> Result<Self, EnvironmentError> {
        let (width, height) = map_size;
        if width <= 0 || height <= 0 {
            return Err(EnvironmentError::Empty { width, height });
        }

        let env = Self {
            width,
            height,
            recharge: recharge_zone,
            obstacles: obstacles.into_iter().collect(),
        };

        if !env.in_bounds(recharge_zone) {
            return Err(EnvironmentError::RechargeOutOfBounds(recharge_zone));
        }
        if env.obstacles.contains(&recharge_zone) {
            return Err(EnvironmentError::RechargeBlocked(recharge_zone));
        }
        if let Some(&outside) = env.obstacles.iter().find(|p| !env.in_bounds(**p)) {
            return Err(EnvironmentError::ObstacleOutOfBounds(outside));
        }

        Ok(env)
    }

    /// The 10x10 reference world: charger at (4, 5), four obstacles.
    pub fn scenario() -> Self {
        Self {
            width: 10,
            height: 10,
            recharge: Position::new(4, 5),
            obstacles: [(2, 3), (5, 5), (5, 8), (4, 9)]
                .into_iter()
                .map(Position::from)
                .collect(),
        }
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    pub fn recharge_zone(&self) -> Position {
        self.recharge
    }

    pub fn obstacles(&self) -> &HashSet<Position> {
        &self.obstacles
    }

    pub fn in_bounds(&self, p: Position) -> bool {
        p.x >= 0 && p.y >= 0 && p.x < self.width && p.y < self.height
    }

    pub fn is_obstacle(&self, p: Position) -> bool {
        self.obstacles.contains(&p)
    }

    /// In bounds and not an obstacle.
    pub fn is_free(&self, p: Position) -> bool {
        self.in_bounds(p) && !self.is_obstacle(p)
    }

    pub fn is_recharge(&self, p: Position) -> bool {
        p == self.recharge
    }

    /// Number of cells a rover can ever occupy; the coverage denominator.
    pub fn free_cell_count(&self) -> usize {
        (self.width as usize * self.height as usize).saturating_sub(self.obstacles.len())
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for y in 0..self.height {
            for x in 0..self.width {
                let p = Position::new(x, y);
                let symbol = if self.is_recharge(p) {
                    'C'
                } else if self.is_obstacle(p) {
                    '#'
                } else {
                    '.'
                };
                write!(f, "{}", symbol)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
