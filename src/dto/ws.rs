use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;
use validator::{Validate, ValidationErrors};

use crate::dto::{
    game::{CellDto, GameModeDto, GameStateSnapshot, WallRequest},
    room::PlayerUpdate,
    validation::{MAX_NAME_LENGTH, MAX_PASSWORD_LENGTH, validate_name},
};

/// Why an inbound frame was dropped before reaching a room.
#[derive(Debug, Error)]
pub enum MessageError {
    /// The frame is not a known event with a well-formed payload.
    #[error("malformed message: {0}")]
    Malformed(#[from] serde_json::Error),
    /// The payload parsed but failed validation.
    #[error("invalid message: {0}")]
    Invalid(#[from] ValidationErrors),
}

/// Messages accepted from game clients, as `{"event": ..., "data": ...}`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(tag = "event", content = "data", rename_all = "camelCase")]
pub enum ClientMessage {
    /// Create a room and take its first seat.
    CreateRoom(CreateRoomRequest),
    /// Take a seat in an existing room.
    JoinRoom(JoinRoomRequest),
    /// Move the sender's pawn.
    PlayerMove(PlayerMoveRequest),
    /// Place a wall for the sender.
    PlaceWall(PlaceWallRequest),
}

impl ClientMessage {
    /// Parse and validate a text frame.
    pub fn from_json_str(text: &str) -> Result<Self, MessageError> {
        let message: Self = serde_json::from_str(text)?;
        match &message {
            Self::CreateRoom(payload) => payload.validate()?,
            Self::JoinRoom(payload) => payload.validate()?,
            Self::PlayerMove(payload) => payload.validate()?,
            Self::PlaceWall(payload) => payload.validate()?,
        }
        Ok(message)
    }
}

/// Payload of `createRoom`.
#[derive(Debug, Clone, Deserialize, Serialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateRoomRequest {
    /// Unique room name.
    #[validate(length(min = 1, max = MAX_NAME_LENGTH), custom(function = "validate_name"))]
    pub room_name: String,
    /// Password later joiners must present. May be empty.
    #[validate(length(max = MAX_PASSWORD_LENGTH))]
    pub password: String,
    /// Display name of the creator.
    #[validate(length(min = 1, max = MAX_NAME_LENGTH), custom(function = "validate_name"))]
    pub player_name: String,
    /// Seat layout of the room.
    pub game_mode: GameModeDto,
}

/// Payload of `joinRoom`.
#[derive(Debug, Clone, Deserialize, Serialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct JoinRoomRequest {
    /// Room to join.
    #[validate(length(min = 1, max = MAX_NAME_LENGTH), custom(function = "validate_name"))]
    pub room_name: String,
    /// Room password.
    #[validate(length(max = MAX_PASSWORD_LENGTH))]
    pub password: String,
    /// Display name of the joiner.
    #[validate(length(min = 1, max = MAX_NAME_LENGTH), custom(function = "validate_name"))]
    pub player_name: String,
}

/// Payload of `playerMove`.
#[derive(Debug, Clone, Deserialize, Serialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PlayerMoveRequest {
    /// Room the move is for.
    #[validate(length(min = 1, max = MAX_NAME_LENGTH))]
    pub room_name: String,
    /// Destination cell.
    #[serde(rename = "move")]
    #[validate(nested)]
    pub target: CellDto,
}

/// Payload of `placeWall`.
#[derive(Debug, Clone, Deserialize, Serialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PlaceWallRequest {
    /// Room the wall is for.
    #[validate(length(min = 1, max = MAX_NAME_LENGTH))]
    pub room_name: String,
    /// Slot and orientation.
    #[validate(nested)]
    pub wall: WallRequest,
}

/// Messages pushed to game clients, as `{"event": ..., "data": ...}`.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(tag = "event", content = "data", rename_all = "camelCase")]
pub enum ServerMessage {
    /// Sent to the creator once its room is registered.
    RoomCreated(RoomNamePayload),
    /// Sent to a connection once it holds a seat.
    JoinSuccess(RoomNamePayload),
    /// Roster of a room, broadcast on every join and leave.
    PlayerUpdate(PlayerUpdate),
    /// Full game state, broadcast when the room fills and after every accepted intent.
    GameStateUpdate(GameStateSnapshot),
    /// Admission failure (or rule violation, when reporting is enabled).
    Error(ErrorPayload),
}

impl ServerMessage {
    /// Build an `error` event.
    pub fn error(message: impl Into<String>) -> Self {
        Self::Error(ErrorPayload {
            message: message.into(),
        })
    }
}

/// Carries the name of the room an acknowledgement refers to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RoomNamePayload {
    /// Room name.
    pub room_name: String,
}

/// Human-readable error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct ErrorPayload {
    /// Message shown to the player.
    pub message: String,
}
