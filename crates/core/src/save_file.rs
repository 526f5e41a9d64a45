//! JSON save files for whole-game persistence.
//!
//! A save is one pretty-printed JSON document: a format version, the xxh3
//! snapshot hash of the contained game, and the serialized game graph.
//! Listener registrations are transient and never written; a loaded game
//! starts with an empty registry.
//!
//! Writing goes through a temp file plus rename so a crash mid-write never
//! leaves a truncated save behind. Loading validates the JSON shape, the
//! format version, and the recomputed snapshot hash.

use std::fmt;
use std::fs;
use std::io;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::game::Game;

pub const FORMAT_VERSION: u16 = 1;

#[derive(Serialize, Deserialize)]
pub struct SaveFile {
    pub format_version: u16,
    pub snapshot_hash_hex: String,
    pub game: Game,
}

impl SaveFile {
    /// Wraps a game snapshot for writing, recording its snapshot hash.
    pub fn new(game: Game) -> Self {
        let snapshot_hash_hex = format!("{:016x}", game.snapshot_hash());
        Self { format_version: FORMAT_VERSION, snapshot_hash_hex, game }
    }

    pub fn write_atomic(&self, path: &Path) -> io::Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let tmp_path = path.with_extension("json.tmp");
        let json = serde_json::to_string_pretty(self).map_err(io::Error::other)?;

        fs::write(&tmp_path, json)?;
        fs::rename(&tmp_path, path)?;

        Ok(())
    }
}

/// Describes why a save file could not be loaded.
#[derive(Debug)]
pub enum SaveLoadError {
    /// Underlying I/O failure.
    Io(io::Error),
    /// The file could not be parsed as a save document.
    InvalidFormat { message: String },
    /// The file was written by an unknown format version.
    UnsupportedVersion { found: u16 },
    /// The stored snapshot hash does not match the loaded game state.
    SnapshotHashMismatch,
}

impl fmt::Display for SaveLoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "save file I/O error: {e}"),
            Self::InvalidFormat { message } => write!(f, "invalid save file: {message}"),
            Self::UnsupportedVersion { found } => {
                write!(f, "unsupported save file format version {found}")
            }
            Self::SnapshotHashMismatch => {
                write!(f, "save file snapshot hash does not match its game state")
            }
        }
    }
}

/// Loads and validates a save file, returning the game it contains. The
/// returned game has an empty listener registry.
pub fn load(path: &Path) -> Result<Game, SaveLoadError> {
    let content = fs::read_to_string(path).map_err(SaveLoadError::Io)?;
    let save: SaveFile = serde_json::from_str(&content)
        .map_err(|e| SaveLoadError::InvalidFormat { message: e.to_string() })?;

    if save.format_version != FORMAT_VERSION {
        return Err(SaveLoadError::UnsupportedVersion { found: save.format_version });
    }

    let recomputed = format!("{:016x}", save.game.snapshot_hash());
    if save.snapshot_hash_hex != recomputed {
        return Err(SaveLoadError::SnapshotHashMismatch);
    }

    Ok(save.game)
}
