//! Movers: the player and the closed set of enemy behaviours.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::types::{KeyColor, TileId, Vector2D};

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Player {
    position: Vector2D,
    keys: BTreeSet<KeyColor>,
    chips: BTreeSet<TileId>,
}

impl Player {
    pub fn new(position: Vector2D) -> Self {
        Self { position, keys: BTreeSet::new(), chips: BTreeSet::new() }
    }

    pub fn position(&self) -> Vector2D {
        self.position
    }

    pub(crate) fn set_position(&mut self, position: Vector2D) {
        self.position = position;
    }

    pub fn keys(&self) -> &BTreeSet<KeyColor> {
        &self.keys
    }

    pub fn has_key(&self, color: KeyColor) -> bool {
        self.keys.contains(&color)
    }

    pub(crate) fn collect_key(&mut self, color: KeyColor) {
        let _ = self.keys.insert(color);
    }

    pub(crate) fn consume_key(&mut self, color: KeyColor) {
        let _ = self.keys.remove(&color);
    }

    /// Ids of the chip tiles collected so far.
    pub fn chips(&self) -> &BTreeSet<TileId> {
        &self.chips
    }

    pub(crate) fn collect_chip(&mut self, chip: TileId) {
        let _ = self.chips.insert(chip);
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Enemy {
    position: Vector2D,
    brain: EnemyBrain,
}

/// Closed set of enemy movement behaviours. Each variant computes its own
/// next displacement from the current tick number and its internal cursor.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EnemyBrain {
    Patroller { routine: Vec<Vector2D>, cursor: usize, interval_in_ticks: u64 },
}

impl Enemy {
    /// A patrolling enemy cycling through `routine`, advancing one entry on
    /// every tick where `tick_no % interval_in_ticks == 0`. An
    /// `interval_in_ticks` of zero is clamped to 1, a move on every tick.
    pub fn patroller(
        position: Vector2D,
        routine: Vec<Vector2D>,
        interval_in_ticks: u64,
    ) -> Self {
        Self {
            position,
            brain: EnemyBrain::Patroller {
                routine,
                cursor: 0,
                interval_in_ticks: interval_in_ticks.max(1),
            },
        }
    }

    pub fn position(&self) -> Vector2D {
        self.position
    }

    pub(crate) fn set_position(&mut self, position: Vector2D) {
        self.position = position;
    }

    pub fn brain(&self) -> &EnemyBrain {
        &self.brain
    }

    /// The displacement this enemy wants for `tick_no`. Mutates nothing but
    /// the behaviour's own cursor; the driver must call this exactly once
    /// per enemy per tick when building the movement map.
    pub fn next_move(&mut self, tick_no: u64) -> Vector2D {
        match &mut self.brain {
            EnemyBrain::Patroller { routine, cursor, interval_in_ticks } => {
                if routine.is_empty() || tick_no % *interval_in_ticks != 0 {
                    return Vector2D::ZERO;
                }
                let movement = routine[*cursor];
                *cursor = (*cursor + 1) % routine.len();
                movement
            }
        }
    }
}
