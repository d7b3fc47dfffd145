//! Board geometry for the 9×9 grid: cells, wall slots, and reachability.

use std::collections::VecDeque;

use crate::state::game::Team;

/// Number of cells along each side of the board.
pub const BOARD_SIZE: u8 = 9;
/// Highest valid cell row/column.
pub const MAX_CELL: u8 = BOARD_SIZE - 1;
/// Highest valid wall-slot row/column (walls are anchored on an 8×8 grid).
pub const MAX_WALL_SLOT: u8 = BOARD_SIZE - 2;

/// A cell on the board, compared by value only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Position {
    /// Row in `[0, 8]`.
    pub row: u8,
    /// Column in `[0, 8]`.
    pub col: u8,
}

impl Position {
    /// Build a position, returning `None` when it falls outside the board.
    pub fn new(row: u8, col: u8) -> Option<Self> {
        (row <= MAX_CELL && col <= MAX_CELL).then_some(Self { row, col })
    }

    /// The orthogonal neighbour one step in `direction`, if it is on the board.
    pub fn step(self, direction: Direction) -> Option<Self> {
        let (dr, dc) = direction.delta();
        let row = self.row.checked_add_signed(dr)?;
        let col = self.col.checked_add_signed(dc)?;
        Self::new(row, col)
    }
}

/// The four orthogonal directions a pawn can travel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Towards row 0.
    Up,
    /// Towards row 8.
    Down,
    /// Towards column 0.
    Left,
    /// Towards column 8.
    Right,
}

impl Direction {
    /// Every direction, in the order neighbours are explored.
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    fn delta(self) -> (i8, i8) {
        match self {
            Direction::Up => (-1, 0),
            Direction::Down => (1, 0),
            Direction::Left => (0, -1),
            Direction::Right => (0, 1),
        }
    }
}

/// Wall orientation. Horizontal walls block vertical steps and vice versa.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Orientation {
    /// Lies between two rows, spanning two columns.
    Horizontal,
    /// Lies between two columns, spanning two rows.
    Vertical,
}

impl Orientation {
    /// The perpendicular orientation.
    pub fn opposite(self) -> Self {
        match self {
            Orientation::Horizontal => Orientation::Vertical,
            Orientation::Vertical => Orientation::Horizontal,
        }
    }
}

/// A placed wall. Immutable once committed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Wall {
    /// Orientation of the wall.
    pub orientation: Orientation,
    /// Slot row in `[0, 7]`.
    pub row: u8,
    /// Slot column in `[0, 7]`.
    pub col: u8,
    /// Team of the player who placed it.
    pub team: Team,
}

/// Both wall collections of a board. The only mutation is append (plus the
/// speculative push/pop used by placement checks).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Walls {
    horizontal: Vec<Wall>,
    vertical: Vec<Wall>,
}

impl Walls {
    /// Walls lying between rows.
    pub fn horizontal(&self) -> &[Wall] {
        &self.horizontal
    }

    /// Walls lying between columns.
    pub fn vertical(&self) -> &[Wall] {
        &self.vertical
    }

    /// Walls of the given orientation.
    pub fn of(&self, orientation: Orientation) -> &[Wall] {
        match orientation {
            Orientation::Horizontal => &self.horizontal,
            Orientation::Vertical => &self.vertical,
        }
    }

    /// Whether a wall of `orientation` is anchored at `(row, col)`.
    pub fn occupies(&self, orientation: Orientation, row: u8, col: u8) -> bool {
        self.of(orientation)
            .iter()
            .any(|wall| wall.row == row && wall.col == col)
    }

    /// Total number of walls on the board.
    pub fn len(&self) -> usize {
        self.horizontal.len() + self.vertical.len()
    }

    /// True when no wall has been placed.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub(crate) fn push(&mut self, wall: Wall) {
        self.collection_mut(wall.orientation).push(wall);
    }

    pub(crate) fn pop(&mut self, orientation: Orientation) -> Option<Wall> {
        self.collection_mut(orientation).pop()
    }

    fn collection_mut(&mut self, orientation: Orientation) -> &mut Vec<Wall> {
        match orientation {
            Orientation::Horizontal => &mut self.horizontal,
            Orientation::Vertical => &mut self.vertical,
        }
    }
}

/// Whether a wall sits between two orthogonally adjacent cells.
///
/// A vertical step is blocked by a horizontal wall on row `min(a.row, b.row)`
/// anchored at `a.col` or `a.col - 1`; horizontal steps mirror that rule with
/// vertical walls. Non-adjacent inputs are never blocked.
pub fn wall_blocks(walls: &Walls, a: Position, b: Position) -> bool {
    if a.col == b.col && a.row.abs_diff(b.row) == 1 {
        let wall_row = a.row.min(b.row);
        return walls
            .horizontal()
            .iter()
            .any(|wall| wall.row == wall_row && spans(wall.col, a.col));
    }
    if a.row == b.row && a.col.abs_diff(b.col) == 1 {
        let wall_col = a.col.min(b.col);
        return walls
            .vertical()
            .iter()
            .any(|wall| wall.col == wall_col && spans(wall.row, a.row));
    }
    false
}

/// A wall anchored at `anchor` covers `anchor` and `anchor + 1`.
fn spans(anchor: u8, line: u8) -> bool {
    anchor == line || anchor.checked_add(1) == Some(line)
}

/// Breadth-first search from `start` over unblocked edges, true as soon as any
/// visited cell lies on `goal_row`.
pub fn path_exists(walls: &Walls, start: Position, goal_row: u8) -> bool {
    let size = usize::from(BOARD_SIZE);
    let mut visited = [[false; BOARD_SIZE as usize]; BOARD_SIZE as usize];
    let mut queue = VecDeque::with_capacity(size * size);

    visited[usize::from(start.row)][usize::from(start.col)] = true;
    queue.push_back(start);

    while let Some(current) = queue.pop_front() {
        if current.row == goal_row {
            return true;
        }
        for direction in Direction::ALL {
            let Some(next) = current.step(direction) else {
                continue;
            };
            let seen = &mut visited[usize::from(next.row)][usize::from(next.col)];
            if *seen || wall_blocks(walls, current, next) {
                continue;
            }
            *seen = true;
            queue.push_back(next);
        }
    }

    false
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pos(row: u8, col: u8) -> Position {
        Position::new(row, col).unwrap()
    }

    fn walls_with(list: &[(Orientation, u8, u8)]) -> Walls {
        let mut walls = Walls::default();
        for &(orientation, row, col) in list {
            walls.push(Wall {
                orientation,
                row,
                col,
                team: Team::Red,
            });
        }
        walls
    }

    #[test]
    fn step_stays_on_board() {
        assert_eq!(pos(0, 0).step(Direction::Up), None);
        assert_eq!(pos(0, 0).step(Direction::Left), None);
        assert_eq!(pos(8, 8).step(Direction::Down), None);
        assert_eq!(pos(8, 8).step(Direction::Right), None);
        assert_eq!(pos(4, 4).step(Direction::Down), Some(pos(5, 4)));
    }

    #[test]
    fn horizontal_wall_blocks_both_spanned_columns() {
        let walls = walls_with(&[(Orientation::Horizontal, 3, 4)]);
        assert!(wall_blocks(&walls, pos(3, 4), pos(4, 4)));
        assert!(wall_blocks(&walls, pos(4, 5), pos(3, 5)));
        assert!(!wall_blocks(&walls, pos(3, 6), pos(4, 6)));
        assert!(!wall_blocks(&walls, pos(3, 3), pos(4, 3)));
        // Horizontal walls never block sideways steps.
        assert!(!wall_blocks(&walls, pos(3, 4), pos(3, 5)));
    }

    #[test]
    fn vertical_wall_blocks_both_spanned_rows() {
        let walls = walls_with(&[(Orientation::Vertical, 2, 0)]);
        assert!(wall_blocks(&walls, pos(2, 0), pos(2, 1)));
        assert!(wall_blocks(&walls, pos(3, 1), pos(3, 0)));
        assert!(!wall_blocks(&walls, pos(4, 0), pos(4, 1)));
        assert!(!wall_blocks(&walls, pos(2, 0), pos(3, 0)));
    }

    #[test]
    fn non_adjacent_cells_are_never_blocked() {
        let walls = walls_with(&[(Orientation::Horizontal, 3, 4)]);
        assert!(!wall_blocks(&walls, pos(3, 4), pos(5, 4)));
        assert!(!wall_blocks(&walls, pos(3, 4), pos(4, 5)));
    }

    #[test]
    fn open_board_has_paths() {
        let walls = Walls::default();
        assert!(path_exists(&walls, pos(0, 4), 8));
        assert!(path_exists(&walls, pos(8, 4), 0));
        assert!(path_exists(&walls, pos(8, 0), 8));
    }

    #[test]
    fn full_barrier_cuts_the_path() {
        // Four horizontal walls between rows 4 and 5 cover columns 0..=7,
        // leaving column 8 open until it is capped below and on its left.
        let mut list: Vec<_> = (0..4)
            .map(|i| (Orientation::Horizontal, 4, i * 2))
            .collect();
        let walls = walls_with(&list);
        assert!(path_exists(&walls, pos(0, 0), 8));

        list.push((Orientation::Vertical, 5, 7));
        list.push((Orientation::Horizontal, 6, 7));
        let walls = walls_with(&list);
        assert!(!path_exists(&walls, pos(0, 0), 8));
        assert!(path_exists(&walls, pos(0, 0), 0));
    }
}
