use thiserror::Error;

use crate::board::Point;

/// Errors raised by the rules, the game record and scoring.
///
/// Every variant is recoverable: a rejected move leaves the game untouched.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GoError {
    /// Point lies outside the board, or the vertex could not be parsed.
    #[error("invalid coordinate: {0}")]
    InvalidCoordinate(String),

    #[error("point {0} is not empty")]
    OccupiedCell(Point),

    /// The placed group would have no liberties and captures nothing.
    #[error("suicide at {0}")]
    SuicideMove(Point),

    /// Immediate recapture of a single-stone ko.
    #[error("retakes ko at {0}")]
    KoViolation(Point),

    #[error("game is already over")]
    GameAlreadyOver,

    #[error("game is not over")]
    GameNotOver,

    /// Board size outside the supported range.
    #[error("invalid board size {0}")]
    InvalidBoardSize(usize),

    /// Komi that is not a finite number.
    #[error("invalid komi: {0}")]
    InvalidKomi(String),

    /// Configuration text that could not be parsed.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("unknown color: {0}")]
    InvalidColor(String),
}

impl GoError {
    pub(crate) fn off_board(point: Point, size: usize) -> Self {
        GoError::InvalidCoordinate(format!("({}, {}) on a {size}x{size} board", point.x, point.y))
    }
}

