use axum::{Json, http::StatusCode, response::IntoResponse};
use serde::Serialize;
use thiserror::Error;

use crate::state::board::Orientation;

/// Reasons a connection is refused a seat. The display text is what the
/// offending connection receives in its `error` event.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AdmissionError {
    /// `createRoom` used a name that is already registered.
    #[error("room `{0}` already exists")]
    NameTaken(String),
    /// `joinRoom` named a room that does not exist.
    #[error("room `{0}` not found")]
    NotFound(String),
    /// The supplied password did not verify.
    #[error("incorrect password")]
    BadPassword,
    /// Every seat of the room is taken.
    #[error("room `{0}` is full")]
    Full(String),
    /// The connection already sits in a room.
    #[error("already seated in room `{0}`")]
    AlreadySeated(String),
    /// The registry holds as many rooms as it is configured to.
    #[error("room limit reached")]
    RegistryFull,
}

/// Intents that are well-formed but break the rules of the game or of the
/// room. These never reach the board.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RuleViolation {
    /// The intent named a room that does not exist.
    #[error("room `{0}` not found")]
    RoomNotFound(String),
    /// The sending connection holds no seat in the named room.
    #[error("not seated in this room")]
    NotSeated,
    /// The room has not filled yet.
    #[error("waiting for players")]
    WaitingForPlayers,
    /// A pawn already reached its goal.
    #[error("game is over")]
    GameOver,
    /// Another seat holds the turn.
    #[error("not your turn (seat {} to play, got seat {})", .expected + 1, .actual + 1)]
    NotYourTurn {
        /// Seat index holding the turn.
        expected: usize,
        /// Seat index that sent the intent.
        actual: usize,
    },
    /// The target cell is not a legal destination.
    #[error("illegal move to ({row}, {col})")]
    IllegalMove {
        /// Target row.
        row: u8,
        /// Target column.
        col: u8,
    },
    /// The acting player has spent every wall.
    #[error("no walls left")]
    NoWallsLeft,
    /// The slot is taken, overlaps another wall, or would cut a player off.
    #[error("illegal {orientation:?} wall at ({row}, {col})")]
    IllegalWall {
        /// Orientation of the rejected wall.
        orientation: Orientation,
        /// Slot row.
        row: u8,
        /// Slot column.
        col: u8,
    },
}

/// Errors that can occur in service layer operations.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// Requested resource was not found.
    #[error("not found: {0}")]
    NotFound(String),
}

/// Application-level errors that are converted to HTTP responses.
#[derive(Debug, Error)]
pub enum AppError {
    /// Requested resource not found.
    #[error("not found: {0}")]
    NotFound(String),
}

impl From<ServiceError> for AppError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::NotFound(message) => AppError::NotFound(message),
        }
    }
}

#[derive(Serialize)]
struct ErrorBody {
    message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let status = match &self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
        };

        let payload = Json(ErrorBody {
            message: self.to_string(),
        });

        (status, payload).into_response()
    }
}
