use std::fmt;

use crate::map::grid::{Environment, Position};

/// Cardinal facing of the rover. Angles follow the screen convention used by
/// the grid: east is +x, south is +y.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Heading {
    #[default]
    East,
    North,
    West,
    South,
}

impl Heading {
    pub fn all() -> [Self; 4] {
        [Heading::East, Heading::North, Heading::West, Heading::South]
    }

    pub fn degrees(self) -> u16 {
        match self {
            Heading::East => 0,
            Heading::North => 90,
            Heading::West => 180,
            Heading::South => 270,
        }
    }

    /// Any multiple of 90, negative values included.
    pub fn from_degrees(degrees: i32) -> Option<Self> {
        match degrees.rem_euclid(360) {
            0 => Some(Heading::East),
            90 => Some(Heading::North),
            180 => Some(Heading::West),
            270 => Some(Heading::South),
            _ => None,
        }
    }

    /// +90 degrees.
    pub fn left(self) -> Self {
        match self {
            Heading::East => Heading::North,
            Heading::North => Heading::West,
            Heading::West => Heading::South,
            Heading::South => Heading::East,
        }
    }

    /// -90 degrees.
    pub fn right(self) -> Self {
        match self {
            Heading::East => Heading::South,
            Heading::South => Heading::West,
            Heading::West => Heading::North,
            Heading::North => Heading::East,
        }
    }

    pub fn reverse(self) -> Self {
        self.left().left()
    }

    pub fn delta(self) -> (i32, i32) {
        match self {
            Heading::East => (1, 0),
            Heading::North => (0, -1),
            Heading::West => (-1, 0),
            Heading::South => (0, 1),
        }
    }

    /// Heading of a unit step from `from` to `to`, if they are 4-adjacent.
    pub fn between(from: Position, to: Position) -> Option<Self> {
        let step = (to.x.checked_sub(from.x)?, to.y.checked_sub(from.y)?);
        Self::all().into_iter().find(|h| h.delta() == step)
    }
}

impl fmt::Display for Heading {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}°", self.degrees())
    }
}

/// Cells around a position as seen from a heading.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Offsets {
    pub front: Position,
    pub left: Position,
    pub right: Position,
    pub back: Position,
}

/// The single heading-to-neighbour table shared by perception and planning.
pub fn offsets(position: Position, heading: Heading) -> Offsets {
    let cell = |h: Heading| {
        let (dx, dy) = h.delta();
        position.offset(dx, dy)
    };
    Offsets {
        front: cell(heading),
        left: cell(heading.left()),
        right: cell(heading.right()),
        back: cell(heading.reverse()),
    }
}

/// One cell along `heading`, or `None` when that cell is outside the map or
/// an obstacle.
pub fn next_position(position: Position, heading: Heading, env: &Environment) -> Option<Position> {
    let (dx, dy) = heading.delta();
    let next = position.offset(dx, dy);
    env.is_free(next).then_some(next)
}

/// 4-neighbours in routing order: +x, -x, +y, -y.
pub fn neighbours(position: Position) -> [Position; 4] {
    [
        position.offset(1, 0),
        position.offset(-1, 0),
        position.offset(0, 1),
        position.offset(0, -1),
    ]
}
