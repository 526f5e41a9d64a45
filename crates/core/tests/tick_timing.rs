use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

use core::{
    Enemy, FRAME_RATE, Game, GameError, GameEvent, GameEventListener, Level, ListenerOps, Player,
    Mover, Tile, TileKind, Vector2D,
};

struct Recorder {
    events: Rc<RefCell<Vec<GameEvent>>>,
}

impl GameEventListener for Recorder {
    fn on_game_event(&mut self, event: &GameEvent, _ops: &mut ListenerOps) {
        self.events.borrow_mut().push(event.clone());
    }
}

fn recording_game(level: Level) -> (Game, Rc<RefCell<Vec<GameEvent>>>) {
    let mut game = Game::new(1, 0, level);
    let events = Rc::new(RefCell::new(Vec::new()));
    let _ = game.add_listener(Box::new(Recorder { events: Rc::clone(&events) }));
    (game, events)
}

fn count<F: Fn(&GameEvent) -> bool>(events: &[GameEvent], predicate: F) -> usize {
    events.iter().filter(|event| predicate(event)).count()
}

#[test]
fn one_second_level_times_out_on_the_tenth_tick() {
    let level = Level::new(1, 20, 20, 1, Player::new(Vector2D::new(10, 10)));
    let (mut game, events) = recording_game(level);

    for _ in 0..(FRAME_RATE - 1) {
        game.update(Some(Vector2D::ZERO), &BTreeMap::new()).expect("update");
    }
    {
        let seen = events.borrow();
        assert_eq!(count(&seen, |e| matches!(e, GameEvent::Tick { .. })), 9);
        assert_eq!(count(&seen, |e| matches!(e, GameEvent::CountDown { .. })), 0);
        assert_eq!(count(&seen, |e| matches!(e, GameEvent::Timeout)), 0);
    }

    game.update(Some(Vector2D::ZERO), &BTreeMap::new()).expect("update");

    let seen = events.borrow();
    assert_eq!(count(&seen, |e| matches!(e, GameEvent::Tick { .. })), 10);
    assert_eq!(count(&seen, |e| matches!(e, GameEvent::CountDown { .. })), 1);
    assert_eq!(count(&seen, |e| matches!(e, GameEvent::Timeout)), 1);
    assert!(seen.contains(&GameEvent::CountDown { seconds_left: 0 }));

    // Tick numbers are the post-increment values 1..=10.
    let ticks: Vec<u64> = seen
        .iter()
        .filter_map(|event| match event {
            GameEvent::Tick { tick_no } => Some(*tick_no),
            _ => None,
        })
        .collect();
    assert_eq!(ticks, (1..=10).collect::<Vec<u64>>());
}

#[test]
fn countdown_fires_before_tick_which_fires_before_timeout() {
    let level = Level::new(1, 20, 20, 1, Player::new(Vector2D::new(10, 10)));
    let (mut game, events) = recording_game(level);

    for _ in 0..FRAME_RATE {
        game.update(None, &BTreeMap::new()).expect("update");
    }

    let seen = events.borrow();
    let countdown_at =
        seen.iter().position(|e| matches!(e, GameEvent::CountDown { .. })).expect("countdown");
    let final_tick_at =
        seen.iter().position(|e| matches!(e, GameEvent::Tick { tick_no: 10 })).expect("tick");
    let timeout_at = seen.iter().position(|e| matches!(e, GameEvent::Timeout)).expect("timeout");
    assert!(countdown_at < final_tick_at);
    assert!(final_tick_at < timeout_at);
}

#[test]
fn failed_enemy_move_cancels_the_whole_update() {
    // The player's move would collect a chip; the enemy's move walks off
    // the board. Neither may happen: a rejected batch must leave state,
    // listeners, and the tick counter exactly as they were.
    let mut level = Level::new(1, 10, 10, 60, Player::new(Vector2D::new(1, 1)));
    let _ = level.add_tile(Tile::new(Vector2D::new(2, 1), TileKind::Chip)).expect("add");
    let enemy = level.add_enemy(Enemy::patroller(Vector2D::new(9, 9), Vec::new(), 1));
    let (mut game, events) = recording_game(level);

    let mut enemy_movements = BTreeMap::new();
    enemy_movements.insert(enemy, Vector2D::RIGHT);
    let result = game.update(Some(Vector2D::RIGHT), &enemy_movements);

    assert_eq!(
        result,
        Err(GameError::OutOfBounds { mover: Mover::Enemy, position: Vector2D::new(10, 9) })
    );
    assert_eq!(game.level().player().position(), Vector2D::new(1, 1));
    assert!(game.level().player().chips().is_empty());
    assert_eq!(game.chips_left(), 1);
    assert_eq!(game.level().enemy(enemy).expect("enemy").position(), Vector2D::new(9, 9));
    assert!(events.borrow().is_empty());
    assert_eq!(game.tick_no(), 0);
}

#[test]
fn unknown_enemy_in_the_movement_map_cancels_the_whole_update() {
    let mut other = Level::new(1, 10, 10, 60, Player::new(Vector2D::new(1, 1)));
    let stale = other.add_enemy(Enemy::patroller(Vector2D::new(5, 5), Vec::new(), 1));

    let level = Level::new(1, 10, 10, 60, Player::new(Vector2D::new(1, 1)));
    let (mut game, events) = recording_game(level);

    let mut enemy_movements = BTreeMap::new();
    enemy_movements.insert(stale, Vector2D::RIGHT);
    let result = game.update(Some(Vector2D::RIGHT), &enemy_movements);

    assert_eq!(result, Err(GameError::UnknownEnemy));
    assert_eq!(game.level().player().position(), Vector2D::new(1, 1));
    assert!(events.borrow().is_empty());
    assert_eq!(game.tick_no(), 0);
}

#[test]
fn update_after_game_over_always_fails() {
    let level = Level::new(1, 20, 20, 60, Player::new(Vector2D::new(10, 10)));
    let (mut game, events) = recording_game(level);

    game.fire(GameEvent::GameOver);
    assert!(events.borrow().contains(&GameEvent::GameOver));

    for _ in 0..3 {
        let result = game.update(Some(Vector2D::RIGHT), &BTreeMap::new());
        assert_eq!(result, Err(GameError::GameTerminated));
    }
    assert_eq!(game.tick_no(), 0);
}

#[test]
fn enemy_on_player_position_kills_the_player_once() {
    let mut level = Level::new(1, 20, 20, 60, Player::new(Vector2D::new(10, 10)));
    let _ = level.add_enemy(Enemy::patroller(Vector2D::new(10, 10), Vec::new(), 1));
    let (mut game, events) = recording_game(level);

    game.update(Some(Vector2D::ZERO), &BTreeMap::new()).expect("update");

    let seen = events.borrow();
    assert_eq!(count(&seen, |e| matches!(e, GameEvent::PlayerDied { .. })), 1);
    assert!(seen.contains(&GameEvent::PlayerDied { position: Vector2D::new(10, 10) }));

    let died_at = seen.iter().position(|e| matches!(e, GameEvent::PlayerDied { .. })).expect("died");
    let tick_at = seen.iter().position(|e| matches!(e, GameEvent::Tick { .. })).expect("tick");
    assert!(died_at < tick_at);
}

#[test]
fn death_does_not_latch_the_game_over_flag() {
    // Ending the game on death is the outer layer's decision; the engine
    // only reports the collision.
    let mut level = Level::new(1, 20, 20, 60, Player::new(Vector2D::new(10, 10)));
    let _ = level.add_enemy(Enemy::patroller(Vector2D::new(10, 10), Vec::new(), 1));
    let (mut game, _events) = recording_game(level);

    game.update(None, &BTreeMap::new()).expect("update");
    assert!(!game.is_game_over());
    game.update(None, &BTreeMap::new()).expect("still running");
}
