use std::path::Path;

use anyhow::{Context, Result};
use clap::Parser;
use game_core::{
    Enemy, Game, GameEvent, GameEventListener, KeyColor, Level, ListenerOps, Player, SaveFile,
    Tile, TileKind, Vector2D,
};
use rand_chacha::{
    ChaCha8Rng,
    rand_core::{Rng, SeedableRng},
};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[arg(short, long, default_value_t = 42)]
    seed: u64,
    #[arg(short, long, default_value_t = 200)]
    ticks: u64,
    /// Write the final game state to this path as a JSON save file
    #[arg(long)]
    save: Option<String>,
}

fn choose<T: Clone>(rng: &mut ChaCha8Rng, slice: &[T]) -> T {
    let p = rng.next_u64() as usize % slice.len();
    slice[p].clone()
}

struct EventPrinter;

impl GameEventListener for EventPrinter {
    fn on_game_event(&mut self, event: &GameEvent, _ops: &mut ListenerOps) {
        println!("  {event:?}");
    }
}

fn demo_level() -> Result<Level> {
    let mut level = Level::new(1, 12, 10, 30, Player::new(Vector2D::new(1, 1)));
    let tiles = [
        (Vector2D::new(4, 1), TileKind::Wall),
        (Vector2D::new(4, 2), TileKind::Wall),
        (Vector2D::new(2, 3), TileKind::Chip),
        (Vector2D::new(6, 4), TileKind::Chip),
        (Vector2D::new(1, 5), TileKind::Key { color: KeyColor::Red }),
        (Vector2D::new(5, 6), TileKind::LockedDoor { color: KeyColor::Red }),
        (Vector2D::new(3, 8), TileKind::InfoField { message: "collect every chip".to_string() }),
        (Vector2D::new(9, 8), TileKind::ExitLock),
        (Vector2D::new(10, 8), TileKind::Exit),
    ];
    for (position, kind) in tiles {
        level
            .add_tile(Tile::new(position, kind))
            .map_err(|e| anyhow::anyhow!("demo level: {e}"))?;
    }
    let _ = level.add_enemy(Enemy::patroller(
        Vector2D::new(7, 2),
        vec![Vector2D::RIGHT, Vector2D::DOWN, Vector2D::LEFT, Vector2D::UP],
        2,
    ));
    Ok(level)
}

fn main() -> Result<()> {
    let args = Args::parse();

    let mut game = Game::new(1, 0, demo_level()?);
    let _ = game.add_listener(Box::new(EventPrinter));
    let mut rng = ChaCha8Rng::seed_from_u64(args.seed);
    let moves = [Vector2D::LEFT, Vector2D::RIGHT, Vector2D::UP, Vector2D::DOWN, Vector2D::ZERO];

    for _ in 0..args.ticks {
        if game.is_game_over() {
            break;
        }

        let mut player_movement = choose(&mut rng, &moves);
        let destination = game.level().player().position() + player_movement;
        if !game.level().in_bounds(destination) {
            // The update contract treats out-of-board input as a caller bug.
            player_movement = Vector2D::ZERO;
        }
        let enemy_movements = game.plan_enemy_moves();

        println!("tick {}:", game.tick_no() + 1);
        game.update(Some(player_movement), &enemy_movements)
            .map_err(|e| anyhow::anyhow!("update failed: {e}"))?;
    }

    println!(
        "Ticks: {}  Countdown: {}s  Chips left: {}  Hash: {:016x}",
        game.tick_no(),
        game.count_down(),
        game.chips_left(),
        game.snapshot_hash()
    );

    if let Some(path) = args.save {
        SaveFile::new(game.snapshot())
            .write_atomic(Path::new(&path))
            .with_context(|| format!("Failed to write save file: {path}"))?;
        println!("Saved to {path}");
    }

    Ok(())
}
