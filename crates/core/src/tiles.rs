//! The tile dispatch table: enterability plus enter/exit reaction hooks.
//!
//! Plain floor is the absence of a tile; the level stores only reactive
//! cells. The variant set is closed, so tile behaviour is a match over
//! `TileKind` rather than open-ended virtual dispatch.

use serde::{Deserialize, Serialize};

use crate::characters::Player;
use crate::types::{KeyColor, TileId, Vector2D};

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Tile {
    position: Vector2D,
    kind: TileKind,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TileKind {
    Wall,
    InfoField { message: String },
    Chip,
    Key { color: KeyColor },
    LockedDoor { color: KeyColor },
    ExitLock,
    Exit,
}

/// What a successful entry did. The level maps this to tile removal and
/// event emission; the tile itself never mutates level state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EnterReaction {
    None,
    ChipCollected,
    KeyCollected(KeyColor),
    DoorUnlocked(KeyColor),
    ExitLockUnlocked,
    ExitReached,
}

impl Tile {
    pub fn new(position: Vector2D, kind: TileKind) -> Self {
        Self { position, kind }
    }

    /// Position on the board, immutable once placed.
    pub fn position(&self) -> Vector2D {
        self.position
    }

    pub fn kind(&self) -> &TileKind {
        &self.kind
    }

    /// Whether the player may occupy this tile. `chips_left` is the count
    /// of uncollected chips remaining on the containing level.
    pub fn is_enterable(&self, player: &Player, chips_left: u32) -> bool {
        match &self.kind {
            TileKind::Wall => false,
            TileKind::LockedDoor { color } => player.has_key(*color),
            TileKind::ExitLock => chips_left == 0,
            TileKind::InfoField { .. } | TileKind::Chip | TileKind::Key { .. } | TileKind::Exit => {
                true
            }
        }
    }

    /// Arrival hook. Mutates the player's inventory and reports what the
    /// level should do in response. Only called after `is_enterable`
    /// accepted the player, so side effects run exactly once per entry.
    pub fn on_enter(&mut self, id: TileId, player: &mut Player) -> EnterReaction {
        match &self.kind {
            TileKind::Chip => {
                player.collect_chip(id);
                EnterReaction::ChipCollected
            }
            TileKind::Key { color } => {
                let color = *color;
                player.collect_key(color);
                EnterReaction::KeyCollected(color)
            }
            TileKind::LockedDoor { color } => {
                let color = *color;
                player.consume_key(color);
                EnterReaction::DoorUnlocked(color)
            }
            TileKind::ExitLock => EnterReaction::ExitLockUnlocked,
            TileKind::Exit => EnterReaction::ExitReached,
            TileKind::Wall | TileKind::InfoField { .. } => EnterReaction::None,
        }
    }

    /// Departure hook. No current variant reacts to departure; the hook is
    /// part of the tile contract and runs on every permitted move.
    pub fn on_exit(&mut self, _player: &mut Player) {}
}
