use std::fmt;
use std::ops::Add;

use serde::{Deserialize, Serialize};
use slotmap::new_key_type;

new_key_type! {
    pub struct TileId;
    pub struct EnemyId;
}

/// Integer displacement or board position. Players and enemies are expected
/// to submit one of the cardinal unit constants (or `ZERO`) per tick.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct Vector2D {
    pub x: i32,
    pub y: i32,
}

impl Vector2D {
    pub const ZERO: Self = Self { x: 0, y: 0 };
    pub const LEFT: Self = Self { x: -1, y: 0 };
    pub const RIGHT: Self = Self { x: 1, y: 0 };
    pub const UP: Self = Self { x: 0, y: -1 };
    pub const DOWN: Self = Self { x: 0, y: 1 };

    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

impl Add for Vector2D {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self { x: self.x + rhs.x, y: self.y + rhs.y }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum KeyColor {
    Red,
    Green,
    Blue,
    Yellow,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mover {
    Player,
    Enemy,
}

impl fmt::Display for Mover {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Player => write!(f, "player"),
            Self::Enemy => write!(f, "enemy"),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GameError {
    /// `update` was called after the game-over latch was set.
    GameTerminated,
    /// A displacement would move a mover outside `[0, width) x [0, height)`.
    /// A caller contract violation, not a recoverable game condition.
    OutOfBounds { mover: Mover, position: Vector2D },
    /// A tile add targeted a coordinate that already holds a tile.
    PositionOccupied { position: Vector2D },
    /// A movement map referenced an enemy id not present on the level.
    UnknownEnemy,
}

impl fmt::Display for GameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::GameTerminated => write!(f, "game is over"),
            Self::OutOfBounds { mover, position } => {
                write!(f, "{mover} went outside the board at ({}, {})", position.x, position.y)
            }
            Self::PositionOccupied { position } => {
                write!(f, "a tile already occupies ({}, {})", position.x, position.y)
            }
            Self::UnknownEnemy => write!(f, "enemy is not on the level"),
        }
    }
}
