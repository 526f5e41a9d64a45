use std::path::Path;

use anyhow::Result;
use clap::Parser;
use game_core::save_file;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the save file to inspect
    #[arg(short, long)]
    save: String,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let game = save_file::load(Path::new(&args.save))
        .map_err(|e| anyhow::anyhow!("Failed to load save file: {e}"))?;

    println!("Game id: {}", game.id());
    println!(
        "Level: {} ({}x{})",
        game.level().level_no(),
        game.level().width(),
        game.level().height()
    );
    println!("Tick: {}", game.tick_no());
    println!("Countdown: {}s", game.count_down());
    println!("Chips left: {}", game.chips_left());
    println!("Enemies: {}", game.level().enemies().count());
    println!("Game over: {}", game.is_game_over());
    println!("Snapshot hash: {:016x}", game.snapshot_hash());

    Ok(())
}
