//! Authoritative per-room game state and the operations that mutate it.

use tracing::warn;

use crate::{
    error::RuleViolation,
    state::{
        board::{Orientation, Position, Wall, Walls},
        rules::{valid_pawn_moves, valid_wall_placement},
        state_machine::{GameEvent, GamePhase, GameStateMachine},
    },
};

/// Seat layout and wall budget of a room.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GameMode {
    /// Two players, ten walls each.
    HeadToHead,
    /// Four players in two teams, five walls each.
    Teams,
}

impl GameMode {
    /// Number of seats a room of this mode holds.
    pub fn max_players(self) -> usize {
        match self {
            GameMode::HeadToHead => 2,
            GameMode::Teams => 4,
        }
    }

    /// Walls each player starts with.
    pub fn starting_walls(self) -> u8 {
        match self {
            GameMode::HeadToHead => 10,
            GameMode::Teams => 5,
        }
    }

    /// Wire label of the mode.
    pub fn label(self) -> &'static str {
        match self {
            GameMode::HeadToHead => "1v1",
            GameMode::Teams => "2v2",
        }
    }

    /// `(team, start, goal_row)` for each seat, in seat order.
    fn seat_layout(self) -> Vec<(Team, Position, u8)> {
        let top = |col| Position { row: 0, col };
        let bottom = |col| Position { row: 8, col };
        match self {
            GameMode::HeadToHead => vec![(Team::Red, top(4), 8), (Team::Blue, bottom(4), 0)],
            GameMode::Teams => vec![
                (Team::Red, top(2), 8),
                (Team::Blue, bottom(2), 0),
                (Team::Red, top(6), 8),
                (Team::Blue, bottom(6), 0),
            ],
        }
    }
}

/// Side a player belongs to. In head-to-head each player is alone on a team.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Team {
    /// Starts on row 0, heads for row 8.
    Red,
    /// Starts on row 8, heads for row 0.
    Blue,
}

/// Who won a finished game.
///
/// Head-to-head games report the winning seat; team games report the team.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WinnerDescriptor {
    /// Winning seat (1-based).
    Seat {
        /// Seat number in `1..=max_players`.
        seat: u8,
    },
    /// Winning team.
    Team {
        /// The team whose pawn reached its goal.
        team: Team,
    },
}

/// A seated player's pawn and wall budget.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Player {
    /// Seat number in `1..=max_players`, fixed for the room's lifetime.
    pub seat_id: u8,
    /// Team the player plays for.
    pub team: Team,
    /// Current pawn cell.
    pub pawn_position: Position,
    /// Walls still available to place.
    pub walls_left: u8,
    /// Row the pawn must reach to win.
    pub goal_row: u8,
    /// Display name copied from the seat once the room fills.
    pub display_name: Option<String>,
}

impl Player {
    /// Whether the pawn stands on its goal row.
    pub fn has_reached_goal(&self) -> bool {
        self.pawn_position.row == self.goal_row
    }
}

/// What an accepted pawn move led to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoveOutcome {
    /// The turn passed to the given seat index.
    TurnPassed(usize),
    /// The moving pawn reached its goal.
    Won(WinnerDescriptor),
}

/// Board, players, and turn pointer for one room.
#[derive(Debug, Clone)]
pub struct GameState {
    mode: GameMode,
    players: Vec<Player>,
    walls: Walls,
    current_player_index: usize,
    machine: GameStateMachine,
}

impl GameState {
    /// Fresh board for `mode`, waiting for its seats to fill.
    pub fn new(mode: GameMode) -> Self {
        let players = mode
            .seat_layout()
            .into_iter()
            .zip(1u8..)
            .map(|((team, start, goal_row), seat_id)| Player {
                seat_id,
                team,
                pawn_position: start,
                walls_left: mode.starting_walls(),
                goal_row,
                display_name: None,
            })
            .collect();

        Self {
            mode,
            players,
            walls: Walls::default(),
            current_player_index: 0,
            machine: GameStateMachine::new(),
        }
    }

    /// Mode the room was created with.
    pub fn mode(&self) -> GameMode {
        self.mode
    }

    /// Players in seat order.
    pub fn players(&self) -> &[Player] {
        &self.players
    }

    /// Placed walls.
    pub fn walls(&self) -> &Walls {
        &self.walls
    }

    /// Seat index whose turn it is.
    pub fn current_player_index(&self) -> usize {
        self.current_player_index
    }

    /// Current lifecycle phase.
    pub fn phase(&self) -> &GamePhase {
        self.machine.phase()
    }

    /// Whether a pawn has reached its goal.
    pub fn is_game_over(&self) -> bool {
        matches!(self.phase(), GamePhase::GameOver(_))
    }

    /// Winner of a finished game.
    pub fn winner(&self) -> Option<&WinnerDescriptor> {
        match self.phase() {
            GamePhase::GameOver(winner) => Some(winner),
            _ => None,
        }
    }

    /// Whether any pawn stands on `position`.
    pub fn is_occupied(&self, position: Position) -> bool {
        self.players
            .iter()
            .any(|player| player.pawn_position == position)
    }

    /// Record the display name of whoever sits in `seat_index`.
    pub fn assign_name(&mut self, seat_index: usize, name: &str) {
        if let Some(player) = self.players.get_mut(seat_index) {
            player.display_name = Some(name.to_owned());
        }
    }

    /// Begin play once every seat is taken. Returns `false` when the game had
    /// already started (a vacated seat being refilled).
    pub fn start(&mut self) -> bool {
        if self.phase() != &GamePhase::WaitingForPlayers {
            return false;
        }
        match self.machine.apply(GameEvent::RoomFilled) {
            Ok(_) => true,
            Err(err) => {
                warn!(error = %err, "failed to start game");
                false
            }
        }
    }

    /// Move the acting seat's pawn to `target`.
    pub fn apply_move(
        &mut self,
        acting_seat: usize,
        target: Position,
    ) -> Result<MoveOutcome, RuleViolation> {
        self.ensure_turn(acting_seat)?;

        let player = &self.players[acting_seat];
        if !valid_pawn_moves(self, player).contains(&target) {
            return Err(RuleViolation::IllegalMove {
                row: target.row,
                col: target.col,
            });
        }

        let player = &mut self.players[acting_seat];
        player.pawn_position = target;

        if player.has_reached_goal() {
            let winner = match self.mode {
                GameMode::HeadToHead => WinnerDescriptor::Seat {
                    seat: player.seat_id,
                },
                GameMode::Teams => WinnerDescriptor::Team { team: player.team },
            };
            self.machine
                .apply(GameEvent::GoalReached(winner.clone()))
                .map_err(|_| RuleViolation::GameOver)?;
            return Ok(MoveOutcome::Won(winner));
        }

        Ok(MoveOutcome::TurnPassed(self.advance_turn()))
    }

    /// Anchor a wall for the acting seat. Wall placement never ends the game.
    pub fn apply_wall(
        &mut self,
        acting_seat: usize,
        orientation: Orientation,
        row: u8,
        col: u8,
    ) -> Result<usize, RuleViolation> {
        self.ensure_turn(acting_seat)?;

        if self.players[acting_seat].walls_left == 0 {
            return Err(RuleViolation::NoWallsLeft);
        }
        if !valid_wall_placement(self, orientation, row, col) {
            return Err(RuleViolation::IllegalWall {
                orientation,
                row,
                col,
            });
        }

        let player = &mut self.players[acting_seat];
        player.walls_left -= 1;
        self.walls.push(Wall {
            orientation,
            row,
            col,
            team: player.team,
        });

        Ok(self.advance_turn())
    }

    fn ensure_turn(&self, acting_seat: usize) -> Result<(), RuleViolation> {
        match self.phase() {
            GamePhase::WaitingForPlayers => return Err(RuleViolation::WaitingForPlayers),
            GamePhase::GameOver(_) => return Err(RuleViolation::GameOver),
            GamePhase::InProgress => {}
        }
        if acting_seat != self.current_player_index {
            return Err(RuleViolation::NotYourTurn {
                expected: self.current_player_index,
                actual: acting_seat,
            });
        }
        Ok(())
    }

    /// Pass the turn to the next seat, disconnected or not.
    fn advance_turn(&mut self) -> usize {
        self.current_player_index = (self.current_player_index + 1) % self.mode.max_players();
        self.current_player_index
    }

    pub(crate) fn walls_and_players_mut(&mut self) -> (&mut Walls, &[Player]) {
        (&mut self.walls, &self.players)
    }

    #[cfg(test)]
    pub(crate) fn players_mut(&mut self) -> &mut [Player] {
        &mut self.players
    }
}
