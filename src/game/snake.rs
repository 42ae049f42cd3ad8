use super::board::Board;
use super::direction::Direction;
use crate::consts;
use ratatui::layout::Position;
use std::collections::VecDeque;

/// Snake state.  Snate.
#[derive(Clone, Debug, Eq, PartialEq)]
pub(super) struct Snake {
    /// The cells of the snake, head first
    pub(super) body: VecDeque<Position>,

    /// The direction in which the snake is currently moving
    pub(super) direction: Direction,

    /// The direction to commit at the start of the next tick
    pub(super) next_direction: Direction,
}

impl Snake {
    /// Create a snake of
    /// [`INITIAL_SNAKE_LENGTH`][consts::INITIAL_SNAKE_LENGTH] cells in the
    /// middle of `board`, facing right with its body trailing to the left.
    pub(super) fn centered(board: Board) -> Snake {
        let head = board.center();
        let body = (0..consts::INITIAL_SNAKE_LENGTH)
            .map_while(|i| u16::try_from(i).ok())
            .map(|i| Position::new(head.x.saturating_sub(i), head.y))
            .collect();
        Snake {
            body,
            direction: Direction::Right,
            next_direction: Direction::Right,
        }
    }

    pub(super) fn head(&self) -> Position {
        self.body[0]
    }

    pub(super) fn len(&self) -> usize {
        self.body.len()
    }

    /// Buffer a turn to be applied on the next tick.  Turning back onto the
    /// snake's own neck is refused.
    pub(super) fn turn(&mut self, direction: Direction) -> bool {
        if direction == self.direction.reverse() {
            false
        } else {
            self.next_direction = direction;
            true
        }
    }

    /// Make the buffered direction the current one and return it
    pub(super) fn commit_turn(&mut self) -> Direction {
        self.direction = self.next_direction;
        self.direction
    }

    /// Would moving the head to `pos` run into the body?  The tail cell does
    /// not count, as it moves out of the way on the same tick.
    pub(super) fn bites(&self, pos: Position) -> bool {
        self.body.iter().take(self.len() - 1).any(|&p| p == pos)
    }

    /// Move the head to `pos`.  Unless `grow` is true, the tail is dropped so
    /// that the length stays the same.
    pub(super) fn advance(&mut self, pos: Position, grow: bool) {
        self.body.push_front(pos);
        if !grow {
            let _ = self.body.pop_back();
        }
    }
}
