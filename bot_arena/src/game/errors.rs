//! Game error types.

use thiserror::Error;

/// Errors that stop a match from being refereed.
///
/// Per-round bot faults never surface here; they are recorded on the
/// match result instead.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GameError {
    /// No rule engine is registered for the requested game
    #[error("Unsupported game type: {0}")]
    UnsupportedGameType(String),

    /// Bad input to the dispatcher (blank team name, self-play)
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// The overall cancellation signal fired
    #[error("Match cancelled")]
    Cancelled,
}

/// Result type for game operations
pub type GameResult<T> = Result<T, GameError>;
