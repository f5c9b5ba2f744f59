//! Error types for Quinn's Quest.

use thiserror::Error;

/// Top-level error type for Quest operations.
#[derive(Debug, Error)]
pub enum QuestError {
    /// Level lookup or level data errors
    #[error("Level error: {0}")]
    Level(String),

    /// Configuration errors
    #[error("Config error: {0}")]
    Config(String),

    /// Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for Quest operations.
pub type QuestResult<T> = Result<T, QuestError>;
