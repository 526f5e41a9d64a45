//! The board: tile and enemy arenas, the player, and movement resolution.

use serde::{Deserialize, Serialize};
use slotmap::SlotMap;

use crate::characters::{Enemy, Player};
use crate::events::GameEvent;
use crate::tiles::{EnterReaction, Tile, TileKind};
use crate::types::{EnemyId, GameError, Mover, TileId, Vector2D};

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Level {
    level_no: u32,
    width: i32,
    height: i32,
    timeout_in_seconds: u64,
    tiles: SlotMap<TileId, Tile>,
    enemies: SlotMap<EnemyId, Enemy>,
    player: Player,
}

impl Level {
    pub fn new(
        level_no: u32,
        width: i32,
        height: i32,
        timeout_in_seconds: u64,
        player: Player,
    ) -> Self {
        Self {
            level_no,
            width,
            height,
            timeout_in_seconds,
            tiles: SlotMap::with_key(),
            enemies: SlotMap::with_key(),
            player,
        }
    }

    pub fn level_no(&self) -> u32 {
        self.level_no
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    pub fn timeout_in_seconds(&self) -> u64 {
        self.timeout_in_seconds
    }

    pub fn player(&self) -> &Player {
        &self.player
    }

    pub fn in_bounds(&self, position: Vector2D) -> bool {
        position.x >= 0 && position.x < self.width && position.y >= 0 && position.y < self.height
    }

    pub fn tiles(&self) -> impl Iterator<Item = (TileId, &Tile)> {
        self.tiles.iter()
    }

    pub fn tile(&self, id: TileId) -> Option<&Tile> {
        self.tiles.get(id)
    }

    /// The tile occupying `position`, if any. `add_tile` rejects duplicate
    /// positions, so at most one tile can match.
    pub fn tile_at(&self, position: Vector2D) -> Option<TileId> {
        self.tiles.iter().find(|(_, tile)| tile.position() == position).map(|(id, _)| id)
    }

    pub fn add_tile(&mut self, tile: Tile) -> Result<TileId, GameError> {
        if self.tile_at(tile.position()).is_some() {
            return Err(GameError::PositionOccupied { position: tile.position() });
        }
        Ok(self.tiles.insert(tile))
    }

    pub fn remove_tile(&mut self, id: TileId) -> Option<Tile> {
        self.tiles.remove(id)
    }

    pub fn enemies(&self) -> impl Iterator<Item = (EnemyId, &Enemy)> {
        self.enemies.iter()
    }

    pub(crate) fn enemies_mut(&mut self) -> impl Iterator<Item = (EnemyId, &mut Enemy)> {
        self.enemies.iter_mut()
    }

    pub fn enemy(&self, id: EnemyId) -> Option<&Enemy> {
        self.enemies.get(id)
    }

    pub fn add_enemy(&mut self, enemy: Enemy) -> EnemyId {
        self.enemies.insert(enemy)
    }

    /// Number of uncollected chips remaining on the board.
    pub fn chips_left(&self) -> u32 {
        self.tiles.values().filter(|tile| matches!(tile.kind(), TileKind::Chip)).count() as u32
    }

    /// Moves the player by `movement`, queueing the resulting events.
    ///
    /// A zero movement is a no-op. A destination outside the board is a
    /// caller contract violation and fails without moving. A destination
    /// tile that rejects the player blocks the move silently; otherwise the
    /// old tile's exit hook, the position update, and the new tile's enter
    /// hook run in that order.
    pub(crate) fn move_player(
        &mut self,
        movement: Vector2D,
        events: &mut Vec<GameEvent>,
    ) -> Result<(), GameError> {
        if movement == Vector2D::ZERO {
            return Ok(());
        }

        let old_position = self.player.position();
        let new_position = old_position + movement;
        if !self.in_bounds(new_position) {
            return Err(GameError::OutOfBounds { mover: Mover::Player, position: new_position });
        }

        let old_tile = self.tile_at(old_position);
        let new_tile = self.tile_at(new_position);
        if let Some(id) = new_tile
            && !self.tiles[id].is_enterable(&self.player, self.chips_left())
        {
            return Ok(());
        }

        if let Some(id) = old_tile {
            self.tiles[id].on_exit(&mut self.player);
        }
        self.player.set_position(new_position);
        events.push(GameEvent::PlayerMoved { from: old_position, to: new_position });

        if let Some(id) = new_tile {
            let reaction = self.tiles[id].on_enter(id, &mut self.player);
            match reaction {
                EnterReaction::None => {}
                EnterReaction::ChipCollected => {
                    let _ = self.tiles.remove(id);
                    events.push(GameEvent::ChipCollected {
                        position: new_position,
                        chips_left: self.chips_left(),
                    });
                }
                EnterReaction::KeyCollected(color) => {
                    let _ = self.tiles.remove(id);
                    events.push(GameEvent::KeyCollected { position: new_position, color });
                }
                EnterReaction::DoorUnlocked(color) => {
                    let _ = self.tiles.remove(id);
                    events.push(GameEvent::DoorUnlocked { position: new_position, color });
                }
                EnterReaction::ExitLockUnlocked => {
                    let _ = self.tiles.remove(id);
                    events.push(GameEvent::ExitLockUnlocked { position: new_position });
                }
                EnterReaction::ExitReached => events.push(GameEvent::GameOver),
            }
        }

        Ok(())
    }

    /// Checks an enemy movement without applying it, so a whole batch of
    /// movements can be validated before any of them mutates the board.
    pub(crate) fn check_enemy_move(
        &self,
        id: EnemyId,
        movement: Vector2D,
    ) -> Result<(), GameError> {
        let Some(enemy) = self.enemies.get(id) else {
            return Err(GameError::UnknownEnemy);
        };
        if movement == Vector2D::ZERO {
            return Ok(());
        }

        let new_position = enemy.position() + movement;
        if !self.in_bounds(new_position) {
            return Err(GameError::OutOfBounds { mover: Mover::Enemy, position: new_position });
        }
        Ok(())
    }

    /// Moves an enemy by `movement`. Bounds-checked, then unconditional:
    /// enemies do not consult tile enterability and trigger no tile hooks.
    pub(crate) fn move_enemy(
        &mut self,
        id: EnemyId,
        movement: Vector2D,
    ) -> Result<(), GameError> {
        self.check_enemy_move(id, movement)?;
        if movement != Vector2D::ZERO {
            let enemy = &mut self.enemies[id];
            let new_position = enemy.position() + movement;
            enemy.set_position(new_position);
        }
        Ok(())
    }
}
