use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::state::{
    board::{Orientation, Position, Wall},
    game::{GameMode, GameState, Player, Team, WinnerDescriptor},
};

/// Wire label of a game mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum GameModeDto {
    /// Two players, ten walls each.
    #[serde(rename = "1v1")]
    HeadToHead,
    /// Two teams of two, five walls each.
    #[serde(rename = "2v2")]
    Teams,
}

impl From<GameModeDto> for GameMode {
    fn from(value: GameModeDto) -> Self {
        match value {
            GameModeDto::HeadToHead => GameMode::HeadToHead,
            GameModeDto::Teams => GameMode::Teams,
        }
    }
}

impl From<GameMode> for GameModeDto {
    fn from(value: GameMode) -> Self {
        match value {
            GameMode::HeadToHead => GameModeDto::HeadToHead,
            GameMode::Teams => GameModeDto::Teams,
        }
    }
}

/// Team label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum TeamDto {
    /// Starts on row 0.
    Red,
    /// Starts on row 8.
    Blue,
}

impl From<Team> for TeamDto {
    fn from(value: Team) -> Self {
        match value {
            Team::Red => TeamDto::Red,
            Team::Blue => TeamDto::Blue,
        }
    }
}

/// A board cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Validate, ToSchema)]
pub struct CellDto {
    /// Row in `[0, 8]`.
    #[validate(range(max = 8))]
    pub row: u8,
    /// Column in `[0, 8]`.
    #[validate(range(max = 8))]
    pub col: u8,
}

impl From<Position> for CellDto {
    fn from(value: Position) -> Self {
        Self {
            row: value.row,
            col: value.col,
        }
    }
}

/// Wall orientation as sent on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum WallKindDto {
    /// Horizontal wall.
    #[serde(rename = "h")]
    Horizontal,
    /// Vertical wall.
    #[serde(rename = "v")]
    Vertical,
}

impl From<WallKindDto> for Orientation {
    fn from(value: WallKindDto) -> Self {
        match value {
            WallKindDto::Horizontal => Orientation::Horizontal,
            WallKindDto::Vertical => Orientation::Vertical,
        }
    }
}

impl From<Orientation> for WallKindDto {
    fn from(value: Orientation) -> Self {
        match value {
            Orientation::Horizontal => WallKindDto::Horizontal,
            Orientation::Vertical => WallKindDto::Vertical,
        }
    }
}

/// Wall slot requested by a client.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, Validate, ToSchema)]
pub struct WallRequest {
    /// Orientation, `"h"` or `"v"`.
    #[serde(rename = "type")]
    pub kind: WallKindDto,
    /// Slot row in `[0, 7]`.
    #[validate(range(max = 7))]
    pub row: u8,
    /// Slot column in `[0, 7]`.
    #[validate(range(max = 7))]
    pub col: u8,
}

/// A placed wall as broadcast to clients.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct WallSnapshot {
    /// Orientation, `"h"` or `"v"`.
    #[serde(rename = "type")]
    pub kind: WallKindDto,
    /// Slot row.
    pub row: u8,
    /// Slot column.
    pub col: u8,
    /// Team of the player who placed it.
    pub team: TeamDto,
}

impl From<&Wall> for WallSnapshot {
    fn from(wall: &Wall) -> Self {
        Self {
            kind: wall.orientation.into(),
            row: wall.row,
            col: wall.col,
            team: wall.team.into(),
        }
    }
}

/// A player as broadcast to clients.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PlayerSnapshot {
    /// Seat number (1-based).
    pub id: u8,
    /// Team the player belongs to.
    pub team: TeamDto,
    /// Current pawn cell.
    pub pawn_position: CellDto,
    /// Walls still available.
    pub walls_left: u8,
    /// Row the pawn must reach.
    pub goal_row: u8,
    /// Display name, once the room has filled.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub player_name: Option<String>,
}

impl From<&Player> for PlayerSnapshot {
    fn from(player: &Player) -> Self {
        Self {
            id: player.seat_id,
            team: player.team.into(),
            pawn_position: player.pawn_position.into(),
            walls_left: player.walls_left,
            goal_row: player.goal_row,
            player_name: player.display_name.clone(),
        }
    }
}

/// Winner of a finished game: a seat in 1v1, a team in 2v2.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum WinnerDto {
    /// Winning seat.
    Seat {
        /// Seat number (1-based).
        seat: u8,
    },
    /// Winning team.
    Team {
        /// Team label.
        team: TeamDto,
    },
}

impl From<&WinnerDescriptor> for WinnerDto {
    fn from(value: &WinnerDescriptor) -> Self {
        match value {
            WinnerDescriptor::Seat { seat } => WinnerDto::Seat { seat: *seat },
            WinnerDescriptor::Team { team } => WinnerDto::Team {
                team: (*team).into(),
            },
        }
    }
}

/// Full game state broadcast after every accepted move or wall.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GameStateSnapshot {
    /// Mode of the room.
    pub mode: GameModeDto,
    /// Players in seat order.
    pub players: Vec<PlayerSnapshot>,
    /// Walls lying between rows.
    pub horizontal_walls: Vec<WallSnapshot>,
    /// Walls lying between columns.
    pub vertical_walls: Vec<WallSnapshot>,
    /// Seat index whose turn it is.
    pub current_player_index: usize,
    /// Whether a pawn has reached its goal.
    pub game_over: bool,
    /// Winner once the game is over.
    pub winner: Option<WinnerDto>,
}

impl From<&GameState> for GameStateSnapshot {
    fn from(state: &GameState) -> Self {
        Self {
            mode: state.mode().into(),
            players: state.players().iter().map(PlayerSnapshot::from).collect(),
            horizontal_walls: state
                .walls()
                .horizontal()
                .iter()
                .map(WallSnapshot::from)
                .collect(),
            vertical_walls: state
                .walls()
                .vertical()
                .iter()
                .map(WallSnapshot::from)
                .collect(),
            current_player_index: state.current_player_index(),
            game_over: state.is_game_over(),
            winner: state.winner().map(WinnerDto::from),
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn fresh_head_to_head_snapshot_shape() {
        let state = GameState::new(GameMode::HeadToHead);
        let value = serde_json::to_value(GameStateSnapshot::from(&state)).unwrap();

        assert_eq!(value["mode"], json!("1v1"));
        assert_eq!(value["currentPlayerIndex"], json!(0));
        assert_eq!(value["gameOver"], json!(false));
        assert_eq!(value["winner"], json!(null));
        assert_eq!(value["horizontalWalls"], json!([]));
        assert_eq!(
            value["players"][0],
            json!({
                "id": 1,
                "team": "red",
                "pawnPosition": {"row": 0, "col": 4},
                "wallsLeft": 10,
                "goalRow": 8
            })
        );
    }

    #[test]
    fn winner_is_tagged_by_kind() {
        let seat = WinnerDto::from(&WinnerDescriptor::Seat { seat: 2 });
        assert_eq!(
            serde_json::to_value(seat).unwrap(),
            json!({"kind": "seat", "seat": 2})
        );

        let team = WinnerDto::from(&WinnerDescriptor::Team { team: Team::Blue });
        assert_eq!(
            serde_json::to_value(team).unwrap(),
            json!({"kind": "team", "team": "blue"})
        );
    }
}
