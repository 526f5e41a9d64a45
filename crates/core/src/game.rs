//! The tick driver: owns the level, the tick counter, the game-over latch,
//! and the listener registry.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::events::{GameEvent, GameEventListener, ListenerId, ListenerOps};
use crate::level::Level;
use crate::types::{EnemyId, GameError, Vector2D};

/// Number of simulation ticks that make up one in-game second.
pub const FRAME_RATE: u64 = 10;

#[derive(Serialize, Deserialize)]
pub struct Game {
    id: u32,
    level: Level,
    tick_no: u64,
    game_over: bool,
    #[serde(skip)]
    listeners: Vec<(ListenerId, Box<dyn GameEventListener>)>,
    #[serde(skip)]
    ops: ListenerOps,
}

impl Game {
    pub fn new(id: u32, tick_no: u64, level: Level) -> Self {
        Self {
            id,
            level,
            tick_no,
            game_over: false,
            listeners: Vec::new(),
            ops: ListenerOps::default(),
        }
    }

    /// Advances the world by one tick.
    ///
    /// `None` for the player, and enemies absent from `enemy_movements`,
    /// mean an explicit no-move. Per call: the player moves, each supplied
    /// enemy moves at most once, an enemy sharing the player's position
    /// kills the player, the tick counter advances, and the countdown/tick/
    /// timeout events fire. All events produced by the call are dispatched
    /// in order after resolution, and listener registry changes staged
    /// during dispatch are merged once every event has fired.
    ///
    /// Every movement in the batch is validated before any of them is
    /// applied, so an `Err` leaves the game untouched: no mover has moved,
    /// no tile has reacted, no event has fired, the tick has not advanced.
    pub fn update(
        &mut self,
        player_movement: Option<Vector2D>,
        enemy_movements: &BTreeMap<EnemyId, Vector2D>,
    ) -> Result<(), GameError> {
        if self.game_over {
            return Err(GameError::GameTerminated);
        }

        // Check the whole batch before touching anything. The player's own
        // bounds check runs inside move_player before it mutates, so a
        // failure on either side leaves state and listeners in sync.
        for (&enemy, &movement) in enemy_movements {
            self.level.check_enemy_move(enemy, movement)?;
        }

        let mut events = Vec::new();
        self.level.move_player(player_movement.unwrap_or(Vector2D::ZERO), &mut events)?;
        for (&enemy, &movement) in enemy_movements {
            self.level.move_enemy(enemy, movement)?;
        }

        let player_position = self.level.player().position();
        if self.level.enemies().any(|(_, enemy)| enemy.position() == player_position) {
            events.push(GameEvent::PlayerDied { position: player_position });
        }

        self.tick_no += 1;
        if self.tick_no % FRAME_RATE == 0 {
            events.push(GameEvent::CountDown { seconds_left: self.count_down() });
        }
        events.push(GameEvent::Tick { tick_no: self.tick_no });
        if self.count_down() <= 0 {
            events.push(GameEvent::Timeout);
        }

        for event in &events {
            self.dispatch(event);
        }
        self.apply_listener_ops();
        Ok(())
    }

    /// Notifies all listeners of `event`. A `GameOver` event latches the
    /// game-over flag before dispatch, so listeners observe a game that is
    /// already over. This is the single notification path; external
    /// collaborators may use it to end the game.
    pub fn fire(&mut self, event: GameEvent) {
        self.dispatch(&event);
        self.apply_listener_ops();
    }

    fn dispatch(&mut self, event: &GameEvent) {
        if matches!(event, GameEvent::GameOver) {
            self.game_over = true;
        }
        let Self { listeners, ops, .. } = self;
        for (_, listener) in listeners.iter_mut() {
            listener.on_game_event(event, ops);
        }
    }

    fn apply_listener_ops(&mut self) {
        self.ops.apply_to(&mut self.listeners);
    }

    /// Registers a listener. Takes effect immediately; registrations
    /// requested from inside a running dispatch go through the
    /// [`ListenerOps`] handle instead and take effect on the next update.
    pub fn add_listener(&mut self, listener: Box<dyn GameEventListener>) -> ListenerId {
        let id = self.ops.add_listener(listener);
        self.apply_listener_ops();
        id
    }

    pub fn remove_listener(&mut self, id: ListenerId) {
        self.ops.remove_listener(id);
        self.apply_listener_ops();
    }

    /// Builds the per-tick enemy movement map by calling each enemy's
    /// `next_move` exactly once with the current tick number. Drivers with
    /// their own scheduling can build the map themselves instead.
    pub fn plan_enemy_moves(&mut self) -> BTreeMap<EnemyId, Vector2D> {
        let tick_no = self.tick_no;
        self.level.enemies_mut().map(|(id, enemy)| (id, enemy.next_move(tick_no))).collect()
    }

    pub fn id(&self) -> u32 {
        self.id
    }

    pub fn level(&self) -> &Level {
        &self.level
    }

    /// Swaps in a new level; the tick counter and game-over latch are
    /// unaffected.
    pub fn set_level(&mut self, level: Level) {
        self.level = level;
    }

    pub fn tick_no(&self) -> u64 {
        self.tick_no
    }

    pub fn is_game_over(&self) -> bool {
        self.game_over
    }

    /// Seconds remaining before timeout; negative once overrun.
    pub fn count_down(&self) -> i64 {
        self.level.timeout_in_seconds() as i64 - (self.tick_no / FRAME_RATE) as i64
    }

    pub fn chips_left(&self) -> u32 {
        self.level.chips_left()
    }

    /// Explicit deep clone of the persistent state. The listener registry
    /// is transient and starts empty in the snapshot.
    pub fn snapshot(&self) -> Game {
        Game {
            id: self.id,
            level: self.level.clone(),
            tick_no: self.tick_no,
            game_over: self.game_over,
            listeners: Vec::new(),
            ops: ListenerOps::default(),
        }
    }

    /// xxh3 fingerprint over canonical game state, used by save files and
    /// determinism tests. Tiles and enemies are hashed in position order so
    /// arena insertion order does not leak into the hash.
    pub fn snapshot_hash(&self) -> u64 {
        use std::hash::{Hash, Hasher};
        use xxhash_rust::xxh3::Xxh3;

        let mut hasher = Xxh3::new();
        hasher.write_u32(self.id);
        hasher.write_u64(self.tick_no);
        hasher.write_u8(u8::from(self.game_over));

        hasher.write_u32(self.level.level_no());
        hasher.write_i32(self.level.width());
        hasher.write_i32(self.level.height());
        hasher.write_u64(self.level.timeout_in_seconds());
        self.level.player().hash(&mut hasher);

        let mut tiles: Vec<_> = self.level.tiles().map(|(_, tile)| tile).collect();
        tiles.sort_by_key(|tile| tile.position());
        for tile in tiles {
            tile.hash(&mut hasher);
        }

        let mut enemies: Vec<_> = self.level.enemies().map(|(_, enemy)| enemy).collect();
        enemies.sort_by_key(|enemy| enemy.position());
        for enemy in enemies {
            enemy.hash(&mut hasher);
        }

        hasher.finish()
    }
}
