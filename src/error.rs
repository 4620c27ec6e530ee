use thiserror::Error;

/// Failures raised by the board, levels and the removal engine.
///
/// Rejected words are not errors; they surface as events instead.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum GameError {
    #[error("square (row {row}, col {col}) is outside the {size}x{size} board")]
    OutOfBounds { row: usize, col: usize, size: usize },

    #[error("level '{0}' is not valid and cannot be played")]
    InvalidLevel(String),

    #[error("unknown level type '{0}'")]
    UnknownLevelType(String),

    #[error("no level is currently being played")]
    NoActiveLevel,

    #[error("no level named '{0}'")]
    LevelNotFound(String),

    #[error("level '{0}' is locked")]
    LevelLocked(String),

    #[error("malformed level layout: {0}")]
    MalformedLayout(String),
}
