//! Binary save files for backing up or moving player progress.
//!
//! Uses bincode for a compact encoding of the whole snapshot. Unlike the
//! key-value record, a save file must match [`SAVE_VERSION`] exactly.

use std::io::{Read, Write};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::progress::{PlayerProgress, PROGRESS_VERSION};

/// Version number for save file format (follows the record version)
pub const SAVE_VERSION: u32 = PROGRESS_VERSION;

/// Serializable save file contents
#[derive(Serialize, Deserialize)]
pub struct SaveData {
    /// Save format version
    pub version: u32,
    pub progress: PlayerProgress,
}

/// Errors that can occur during save/load
#[derive(Debug, Error)]
pub enum SaveError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Bincode(#[from] Box<bincode::ErrorKind>),
    #[error("Save version mismatch: expected {expected}, found {found}")]
    VersionMismatch { expected: u32, found: u32 },
}

/// Write a snapshot to a save file
pub fn save_progress<W: Write>(writer: W, progress: &PlayerProgress) -> Result<(), SaveError> {
    let save_data = SaveData {
        version: SAVE_VERSION,
        progress: progress.clone(),
    };
    bincode::serialize_into(writer, &save_data)?;
    Ok(())
}

/// Read a snapshot from a save file
pub fn load_progress<R: Read>(reader: R) -> Result<PlayerProgress, SaveError> {
    let save_data: SaveData = bincode::deserialize_from(reader)?;

    if save_data.version != SAVE_VERSION {
        return Err(SaveError::VersionMismatch {
            expected: SAVE_VERSION,
            found: save_data.version,
        });
    }

    Ok(save_data.progress)
}
