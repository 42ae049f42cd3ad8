use super::board::{Board, WallPolicy};
use ratatui::layout::Position;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// Move one cell from `pos` in this direction.  At the edge of the board
    /// the move either wraps around or, with solid walls, fails.
    pub(super) fn advance(self, pos: Position, board: Board) -> Option<Position> {
        self.advance_with(pos, board.size(), board.walls() == WallPolicy::Wrap)
    }

    /// Like [`Direction::advance()`], but always wraps at the edges
    pub(super) fn advance_wrapping(self, pos: Position, board: Board) -> Position {
        let size = board.size();
        self.advance_with(pos, size, true)
            .unwrap_or_else(|| board.wrap(pos))
    }

    fn advance_with(self, pos: Position, size: u16, wrap: bool) -> Option<Position> {
        let Position { mut x, mut y } = pos;
        match self {
            Direction::Up => y = decrement_in_bounds(y, size, wrap)?,
            Direction::Down => y = increment_in_bounds(y, size, wrap)?,
            Direction::Left => x = decrement_in_bounds(x, size, wrap)?,
            Direction::Right => x = increment_in_bounds(x, size, wrap)?,
        }
        Some(Position { x, y })
    }

    pub(crate) fn reverse(self) -> Direction {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }
}

fn decrement_in_bounds(x: u16, max: u16, wrap: bool) -> Option<u16> {
    if let Some(x2) = x.checked_sub(1) {
        Some(x2)
    } else if wrap {
        Some(max - 1)
    } else {
        None
    }
}

fn increment_in_bounds(x: u16, max: u16, wrap: bool) -> Option<u16> {
    if let Some(x2) = x.checked_add(1).filter(|&xx| xx < max) {
        Some(x2)
    } else if wrap {
        Some(0)
    } else {
        None
    }
}
