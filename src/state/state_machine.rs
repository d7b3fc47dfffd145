use thiserror::Error;

use crate::state::game::WinnerDescriptor;

/// Lifecycle phases of a single room's game.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GamePhase {
    /// Seats are still being filled; no move or wall is accepted.
    WaitingForPlayers,
    /// Every seat has been filled at least once and turns are being played.
    InProgress,
    /// A pawn reached its goal row. Terminal.
    GameOver(WinnerDescriptor),
}

/// Events that drive the phase machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GameEvent {
    /// The room reached its seat capacity for the first time.
    RoomFilled,
    /// A pawn landed on its own goal row.
    GoalReached(WinnerDescriptor),
}

/// Error returned when attempting to apply an invalid transition.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid transition: {event:?} cannot be applied while in {from:?}")]
pub struct InvalidTransition {
    /// The phase the state machine was in when the invalid event was received.
    pub from: GamePhase,
    /// The event that cannot be applied from this phase.
    pub event: GameEvent,
}

/// Phase tracker for one room. There is no way back out of [`GamePhase::GameOver`];
/// playing again means creating a new room.
#[derive(Debug, Clone)]
pub struct GameStateMachine {
    phase: GamePhase,
}

impl Default for GameStateMachine {
    fn default() -> Self {
        Self {
            phase: GamePhase::WaitingForPlayers,
        }
    }
}

impl GameStateMachine {
    /// Create a new state machine waiting for its seats to fill.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inspect the current phase.
    pub fn phase(&self) -> &GamePhase {
        &self.phase
    }

    /// Apply `event`, returning the new phase.
    pub fn apply(&mut self, event: GameEvent) -> Result<&GamePhase, InvalidTransition> {
        self.phase = self.compute_transition(event)?;
        Ok(&self.phase)
    }

    fn compute_transition(&self, event: GameEvent) -> Result<GamePhase, InvalidTransition> {
        let next = match (&self.phase, event) {
            (GamePhase::WaitingForPlayers, GameEvent::RoomFilled) => GamePhase::InProgress,
            (GamePhase::InProgress, GameEvent::GoalReached(winner)) => GamePhase::GameOver(winner),
            (from, event) => {
                return Err(InvalidTransition {
                    from: from.clone(),
                    event,
                });
            }
        };

        Ok(next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::game::Team;

    #[test]
    fn initial_state_is_waiting() {
        let sm = GameStateMachine::new();
        assert_eq!(sm.phase(), &GamePhase::WaitingForPlayers);
    }

    #[test]
    fn full_happy_path_through_game() {
        let mut sm = GameStateMachine::new();
        assert_eq!(sm.apply(GameEvent::RoomFilled), Ok(&GamePhase::InProgress));

        let winner = WinnerDescriptor::Team { team: Team::Blue };
        assert_eq!(
            sm.apply(GameEvent::GoalReached(winner.clone())),
            Ok(&GamePhase::GameOver(winner))
        );
    }

    #[test]
    fn goal_before_start_is_invalid() {
        let mut sm = GameStateMachine::new();
        let event = GameEvent::GoalReached(WinnerDescriptor::Seat { seat: 1 });
        let err = sm.apply(event.clone()).unwrap_err();
        assert_eq!(err.from, GamePhase::WaitingForPlayers);
        assert_eq!(err.event, event);
        assert_eq!(sm.phase(), &GamePhase::WaitingForPlayers);
    }

    #[test]
    fn game_over_is_terminal() {
        let mut sm = GameStateMachine::new();
        sm.apply(GameEvent::RoomFilled).unwrap();
        sm.apply(GameEvent::GoalReached(WinnerDescriptor::Seat { seat: 2 }))
            .unwrap();

        assert!(sm.apply(GameEvent::RoomFilled).is_err());
        assert!(
            sm.apply(GameEvent::GoalReached(WinnerDescriptor::Seat { seat: 1 }))
                .is_err()
        );
        assert_eq!(
            sm.phase(),
            &GamePhase::GameOver(WinnerDescriptor::Seat { seat: 2 })
        );
    }
}
