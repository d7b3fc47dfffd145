//! Move and wall legality checks run against the authoritative game state.

use std::ops::Deref;

use crate::state::{
    board::{
        Direction, MAX_WALL_SLOT, Orientation, Position, Wall, Walls, path_exists, wall_blocks,
    },
    game::{GameState, Player, Team},
};

/// Legal destinations for `player`'s pawn.
///
/// Each open orthogonal neighbour is a destination; an occupied neighbour
/// turns the step into a straight jump that lands one cell further, provided
/// the landing cell is on the board and not walled off from the jumped pawn.
/// Diagonal jumps are not offered.
pub fn valid_pawn_moves(state: &GameState, player: &Player) -> Vec<Position> {
    let origin = player.pawn_position;
    let walls = state.walls();
    let mut moves = Vec::with_capacity(Direction::ALL.len());

    for direction in Direction::ALL {
        let Some(neighbour) = origin.step(direction) else {
            continue;
        };
        if wall_blocks(walls, origin, neighbour) {
            continue;
        }

        let destination = if state.is_occupied(neighbour) {
            match neighbour.step(direction) {
                Some(landing) if !wall_blocks(walls, neighbour, landing) => landing,
                _ => continue,
            }
        } else {
            neighbour
        };

        if !moves.contains(&destination) {
            moves.push(destination);
        }
    }

    moves
}

/// Structural reasons a wall slot cannot take a new wall, checked before any search.
fn structurally_free(walls: &Walls, orientation: Orientation, row: u8, col: u8) -> bool {
    if row > MAX_WALL_SLOT || col > MAX_WALL_SLOT {
        return false;
    }
    if walls.occupies(orientation, row, col) || walls.occupies(orientation.opposite(), row, col) {
        return false;
    }

    let collinear = match orientation {
        Orientation::Horizontal => [
            col.checked_sub(1).map(|c| (row, c)),
            col.checked_add(1).map(|c| (row, c)),
        ],
        Orientation::Vertical => [
            row.checked_sub(1).map(|r| (r, col)),
            row.checked_add(1).map(|r| (r, col)),
        ],
    };

    !collinear
        .into_iter()
        .flatten()
        .any(|(r, c)| walls.occupies(orientation, r, c))
}

/// Whether a wall of `orientation` may be anchored at `(row, col)`.
///
/// The candidate is pushed onto the board, every player is checked for a
/// remaining route to their goal row, and the candidate is popped again
/// whatever the outcome.
pub fn valid_wall_placement(
    state: &mut GameState,
    orientation: Orientation,
    row: u8,
    col: u8,
) -> bool {
    if !structurally_free(state.walls(), orientation, row, col) {
        return false;
    }

    let (walls, players) = state.walls_and_players_mut();
    let candidate = Wall {
        orientation,
        row,
        col,
        // Ownership is irrelevant to reachability.
        team: Team::Red,
    };
    let speculative = SpeculativeWall::place(walls, candidate);

    players
        .iter()
        .all(|player| path_exists(&speculative, player.pawn_position, player.goal_row))
}

/// A wall pushed onto the board for the duration of a reachability check.
/// Dropping the guard removes it.
struct SpeculativeWall<'a> {
    walls: &'a mut Walls,
    orientation: Orientation,
}

impl<'a> SpeculativeWall<'a> {
    fn place(walls: &'a mut Walls, wall: Wall) -> Self {
        walls.push(wall);
        Self {
            walls,
            orientation: wall.orientation,
        }
    }
}

impl Deref for SpeculativeWall<'_> {
    type Target = Walls;

    fn deref(&self) -> &Walls {
        self.walls
    }
}

impl Drop for SpeculativeWall<'_> {
    fn drop(&mut self) {
        self.walls.pop(self.orientation);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::game::GameMode;

    fn pos(row: u8, col: u8) -> Position {
        Position::new(row, col).unwrap()
    }

    fn started(mode: GameMode) -> GameState {
        let mut state = GameState::new(mode);
        state.start();
        state
    }

    fn commit(state: &mut GameState, orientation: Orientation, row: u8, col: u8) {
        assert!(
            valid_wall_placement(state, orientation, row, col),
            "expected {orientation:?} wall at ({row},{col}) to be legal"
        );
        state.walls_and_players_mut().0.push(Wall {
            orientation,
            row,
            col,
            team: Team::Red,
        });
    }

    #[test]
    fn opening_moves_from_the_top_edge() {
        let state = started(GameMode::HeadToHead);
        let mut moves = valid_pawn_moves(&state, &state.players()[0]);
        moves.sort_by_key(|p| (p.row, p.col));
        assert_eq!(moves, vec![pos(0, 3), pos(0, 5), pos(1, 4)]);
    }

    #[test]
    fn walls_remove_neighbours() {
        let mut state = started(GameMode::HeadToHead);
        commit(&mut state, Orientation::Horizontal, 0, 3);
        let moves = valid_pawn_moves(&state, &state.players()[0]);
        assert!(!moves.contains(&pos(1, 4)));
        assert_eq!(moves.len(), 2);
    }

    #[test]
    fn straight_jump_over_adjacent_pawn() {
        let mut state = started(GameMode::HeadToHead);
        state.players_mut()[0].pawn_position = pos(3, 4);
        state.players_mut()[1].pawn_position = pos(4, 4);

        let moves = valid_pawn_moves(&state, &state.players()[0]);
        assert!(moves.contains(&pos(5, 4)));
        assert!(!moves.contains(&pos(4, 4)));
    }

    #[test]
    fn jump_blocked_by_wall_behind_pawn_is_not_offered() {
        let mut state = started(GameMode::HeadToHead);
        state.players_mut()[0].pawn_position = pos(3, 4);
        state.players_mut()[1].pawn_position = pos(4, 4);
        commit(&mut state, Orientation::Horizontal, 4, 4);

        let moves = valid_pawn_moves(&state, &state.players()[0]);
        assert!(!moves.contains(&pos(5, 4)));
        assert!(!moves.contains(&pos(4, 4)));
        // No diagonal fallback.
        assert!(!moves.contains(&pos(4, 3)));
        assert!(!moves.contains(&pos(4, 5)));
    }

    #[test]
    fn jump_off_the_board_is_not_offered() {
        let mut state = started(GameMode::HeadToHead);
        state.players_mut()[0].pawn_position = pos(7, 0);
        state.players_mut()[1].pawn_position = pos(8, 0);

        let moves = valid_pawn_moves(&state, &state.players()[0]);
        assert_eq!(moves, vec![pos(6, 0), pos(7, 1)]);
    }

    #[test]
    fn overlapping_and_crossing_slots_are_rejected() {
        let mut state = started(GameMode::HeadToHead);
        commit(&mut state, Orientation::Horizontal, 2, 3);

        assert!(!valid_wall_placement(&mut state, Orientation::Horizontal, 2, 3));
        assert!(!valid_wall_placement(&mut state, Orientation::Horizontal, 2, 4));
        assert!(!valid_wall_placement(&mut state, Orientation::Horizontal, 2, 2));
        assert!(!valid_wall_placement(&mut state, Orientation::Vertical, 2, 3));
        assert!(valid_wall_placement(&mut state, Orientation::Horizontal, 2, 6));
        assert!(valid_wall_placement(&mut state, Orientation::Horizontal, 3, 3));
        assert_eq!(state.walls().len(), 1);
    }

    #[test]
    fn collinear_vertical_walls_are_rejected() {
        let mut state = started(GameMode::HeadToHead);
        commit(&mut state, Orientation::Vertical, 4, 4);

        assert!(!valid_wall_placement(&mut state, Orientation::Vertical, 3, 4));
        assert!(!valid_wall_placement(&mut state, Orientation::Vertical, 5, 4));
        assert!(valid_wall_placement(&mut state, Orientation::Vertical, 6, 4));
        assert!(valid_wall_placement(&mut state, Orientation::Vertical, 4, 5));
    }

    #[test]
    fn out_of_range_slots_are_rejected() {
        let mut state = started(GameMode::HeadToHead);
        assert!(!valid_wall_placement(&mut state, Orientation::Horizontal, 8, 0));
        assert!(!valid_wall_placement(&mut state, Orientation::Vertical, 0, 8));
    }

    #[test]
    fn sealing_the_last_corridor_is_rejected_without_leaking() {
        let mut state = started(GameMode::HeadToHead);
        // Row of horizontal walls between rows 4 and 5 leaving column 8 open.
        for col in [0, 2, 4, 6] {
            commit(&mut state, Orientation::Horizontal, 4, col);
        }
        let before = state.walls().clone();

        // Anchored at column 7 it would cover column 8 too, but collides with
        // the wall at column 6; a vertical wall at (4,7) crosses nothing and
        // closes column 8 from the left only, so the corridor survives.
        assert!(!valid_wall_placement(&mut state, Orientation::Horizontal, 4, 7));
        assert!(valid_wall_placement(&mut state, Orientation::Vertical, 4, 7));

        // Cap column 8 below row 5 and wall it off on the left: the final cap
        // passes structural checks but would seal both players in.
        commit(&mut state, Orientation::Vertical, 5, 7);
        let before_cap = state.walls().clone();
        assert!(!valid_wall_placement(&mut state, Orientation::Horizontal, 6, 7));
        assert_eq!(state.walls(), &before_cap);
        assert_ne!(state.walls(), &before);
    }
}
