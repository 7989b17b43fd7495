//! Error types for the rules engine

use crate::board::Position;

/// Errors reported by the engine
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("position {0} is outside the board")]
    OutOfRange(Position),

    #[error("position {0} is not a playable cell")]
    InvalidCell(Position),

    #[error("no piece at {0}")]
    NoPiece(Position),

    #[error("unsupported player count: {0} (expected 2, 3, 4 or 6)")]
    UnsupportedPlayerCount(usize),

    #[error("difficulty {0} out of range (expected 1..={})", crate::ai::MAX_DIFFICULTY)]
    InvalidDifficulty(u8),

    #[error("corrupt save: {0}")]
    CorruptSave(String),

    #[error("I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
