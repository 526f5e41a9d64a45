pub mod characters;
pub mod events;
pub mod game;
pub mod level;
pub mod save_file;
pub mod tiles;
pub mod types;

pub use characters::{Enemy, EnemyBrain, Player};
pub use events::{GameEvent, GameEventListener, ListenerId, ListenerOps};
pub use game::{FRAME_RATE, Game};
pub use level::Level;
pub use save_file::{SaveFile, SaveLoadError};
pub use tiles::{EnterReaction, Tile, TileKind};
pub use types::*;
