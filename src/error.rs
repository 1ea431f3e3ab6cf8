use thiserror::Error;

use crate::types::Color;

/// Rule violations reported by the board.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GameError {
    #[error("square ({x}, {y}) is off the board")]
    OutOfBounds { x: i32, y: i32 },
    #[error("illegal move for {color:?} at ({row}, {col})")]
    IllegalMove { row: usize, col: usize, color: Color },
    #[error("move color {got:?} does not match the side to move {expected:?}")]
    WrongColor { expected: Color, got: Color },
}

#[derive(Debug, Error)]
pub enum ChannelError {
    #[error("channel closed by peer")]
    Closed,
    #[error("channel i/o error: {0}")]
    Io(#[from] std::io::Error),
}

/// Fatal session errors. Any of these ends the session.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error(transparent)]
    Channel(#[from] ChannelError),
    #[error("malformed message: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("unexpected {event} while {phase}")]
    UnexpectedEvent {
        phase: &'static str,
        event: &'static str,
    },
}

/// Configuration values that cannot drive a search.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("search depth must be at least 1")]
    ZeroDepth,
    #[error("invalid configuration: {0}")]
    Parse(String),
}
