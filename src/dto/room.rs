use indexmap::IndexMap;
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{
    dto::game::GameModeDto,
    state::{room::Room, state_machine::GamePhase},
};

/// Roster entry of a seated connection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RosterEntry {
    /// Name the connection joined with.
    pub player_name: String,
}

/// Lobby state of a room, broadcast on every join and leave.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PlayerUpdate {
    /// Seated connections keyed by connection id.
    #[schema(value_type = Object)]
    pub players: IndexMap<Uuid, RosterEntry>,
    /// Connection ids in join order.
    pub player_order: Vec<Uuid>,
    /// Seat number (1-based) held by each connection.
    #[schema(value_type = Object)]
    pub seats: IndexMap<Uuid, u8>,
    /// Mode of the room.
    pub game_mode: GameModeDto,
}

impl From<&Room> for PlayerUpdate {
    fn from(room: &Room) -> Self {
        let mut players = IndexMap::with_capacity(room.seated());
        let mut player_order = Vec::with_capacity(room.seated());
        let mut seats = IndexMap::with_capacity(room.seated());

        for (connection, seat) in room.seats() {
            players.insert(
                *connection,
                RosterEntry {
                    player_name: seat.player_name.clone(),
                },
            );
            player_order.push(*connection);
            seats.insert(*connection, seat.index as u8 + 1);
        }

        Self {
            players,
            player_order,
            seats,
            game_mode: room.mode().into(),
        }
    }
}

/// Coarse phase label exposed by the lobby listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub enum RoomPhaseDto {
    /// Seats are still being filled.
    WaitingForPlayers,
    /// Turns are being played.
    InProgress,
    /// A pawn reached its goal.
    GameOver,
}

impl From<&GamePhase> for RoomPhaseDto {
    fn from(value: &GamePhase) -> Self {
        match value {
            GamePhase::WaitingForPlayers => RoomPhaseDto::WaitingForPlayers,
            GamePhase::InProgress => RoomPhaseDto::InProgress,
            GamePhase::GameOver(_) => RoomPhaseDto::GameOver,
        }
    }
}

/// Public view of a room for the lobby listing. Never carries the password.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RoomSummary {
    /// Room name.
    pub room_name: String,
    /// Mode of the room.
    pub game_mode: GameModeDto,
    /// Connections currently seated.
    pub seated: usize,
    /// Seat capacity.
    pub max_players: usize,
    /// Lifecycle phase.
    pub phase: RoomPhaseDto,
}

impl From<&Room> for RoomSummary {
    fn from(room: &Room) -> Self {
        Self {
            room_name: room.name().to_owned(),
            game_mode: room.mode().into(),
            seated: room.seated(),
            max_players: room.max_players(),
            phase: room.game().phase().into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use tokio::sync::mpsc;

    use super::*;
    use crate::state::{game::GameMode, room::PlainPassword};

    #[test]
    fn roster_keeps_join_order_and_fixed_seats() {
        let mut room = Room::new("sala", Box::new(PlainPassword::new("")), GameMode::Teams);
        let (tx, _rx) = mpsc::unbounded_channel();
        let ids: Vec<_> = (0..3).map(|_| Uuid::new_v4()).collect();
        for (n, id) in ids.iter().enumerate() {
            room.admit(*id, &format!("p{n}"), "", tx.clone()).unwrap();
        }
        room.remove(&ids[0]);
        let late = Uuid::new_v4();
        room.admit(late, "late", "", tx).unwrap();

        let update = PlayerUpdate::from(&room);
        assert_eq!(update.player_order, vec![ids[1], ids[2], late]);
        assert_eq!(update.seats[&late], 1);
        assert_eq!(update.seats[&ids[2]], 3);

        let value = serde_json::to_value(&update).unwrap();
        assert_eq!(value["gameMode"], json!("2v2"));
        assert_eq!(
            value["players"][late.to_string()],
            json!({"playerName": "late"})
        );
    }

    #[test]
    fn summary_omits_secrets() {
        let room = Room::new("sala", Box::new(PlainPassword::new("pw")), GameMode::HeadToHead);
        let value = serde_json::to_value(RoomSummary::from(&room)).unwrap();
        assert_eq!(
            value,
            json!({
                "roomName": "sala",
                "gameMode": "1v1",
                "seated": 0,
                "maxPlayers": 2,
                "phase": "waitingForPlayers"
            })
        );
    }
}
