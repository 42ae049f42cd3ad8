use ratatui::layout::{Position, Positions, Rect, Size};

/// The square playing field.  Cells run from `(0, 0)` in the top-left corner
/// to `(size - 1, size - 1)`.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) struct Board {
    size: u16,
    walls: WallPolicy,
}

impl Board {
    pub(crate) fn new(size: u16, walls: WallPolicy) -> Board {
        debug_assert!(size > 0, "board size should be nonzero");
        Board { size, walls }
    }

    pub(crate) fn size(self) -> u16 {
        self.size
    }

    pub(crate) fn walls(self) -> WallPolicy {
        self.walls
    }

    /// Reduce the coordinates of `pos` modulo the board size
    pub(crate) fn wrap(self, pos: Position) -> Position {
        Position::new(pos.x % self.size, pos.y % self.size)
    }

    pub(crate) fn is_inside(self, pos: Position) -> bool {
        pos.x < self.size && pos.y < self.size
    }

    /// The cell in the middle of the board
    pub(crate) fn center(self) -> Position {
        Position::new(self.size / 2, self.size / 2)
    }

    /// The number of cells on the board
    pub(crate) fn area(self) -> usize {
        usize::from(self.size) * usize::from(self.size)
    }

    /// Chebyshev ("king move") distance between two cells.  When the walls
    /// wrap, cells on opposite edges are neighbors.
    pub(crate) fn distance(self, a: Position, b: Position) -> u16 {
        let axis = |p: u16, q: u16| {
            let d = p.abs_diff(q);
            match self.walls {
                WallPolicy::Wrap => d.min(self.size.saturating_sub(d)),
                WallPolicy::Solid => d,
            }
        };
        axis(a.x, b.x).max(axis(a.y, b.y))
    }

    /// Iterate over every cell of the board, row by row
    pub(crate) fn positions(self) -> Positions {
        Rect::from((Position::ORIGIN, Size::new(self.size, self.size))).positions()
    }
}

/// What happens when the snake runs into the edge of the board
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum WallPolicy {
    /// The snake reappears on the opposite edge
    Wrap,

    /// Touching the edge ends the game
    Solid,
}


#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(Position::new(3, 4), Position::new(3, 4))]
    #[case(Position::new(20, 4), Position::new(0, 4))]
    #[case(Position::new(21, 45), Position::new(1, 5))]
    fn test_wrap(#[case] before: Position, #[case] after: Position) {
        assert_eq!(Board::new(20, WallPolicy::Wrap).wrap(before), after);
    }

    #[rstest]
    #[case(Position::new(0, 0), true)]
    #[case(Position::new(19, 19), true)]
    #[case(Position::new(20, 0), false)]
    #[case(Position::new(0, 20), false)]
    fn test_is_inside(#[case] pos: Position, #[case] inside: bool) {
        assert_eq!(Board::new(20, WallPolicy::Solid).is_inside(pos), inside);
    }

    #[test]
    fn positions_cover_board() {
        let board = Board::new(4, WallPolicy::Wrap);
        let cells = board.positions().collect::<Vec<_>>();
        assert_eq!(cells.len(), board.area());
        assert!(cells.iter().all(|&p| board.is_inside(p)));
    }

    #[rstest]
    #[case(Position::new(5, 5), Position::new(5, 5), WallPolicy::Solid, 0)]
    #[case(Position::new(5, 5), Position::new(6, 6), WallPolicy::Solid, 1)]
    #[case(Position::new(5, 5), Position::new(3, 6), WallPolicy::Solid, 2)]
    #[case(Position::new(0, 9), Position::new(4, 0), WallPolicy::Solid, 9)]
    #[case(Position::new(0, 9), Position::new(4, 0), WallPolicy::Wrap, 4)]
    #[case(Position::new(19, 10), Position::new(0, 9), WallPolicy::Solid, 19)]
    #[case(Position::new(19, 10), Position::new(0, 9), WallPolicy::Wrap, 1)]
    #[case(Position::new(0, 0), Position::new(19, 19), WallPolicy::Wrap, 1)]
    #[case(Position::new(2, 2), Position::new(12, 12), WallPolicy::Wrap, 10)]
    fn test_distance(
        #[case] a: Position,
        #[case] b: Position,
        #[case] walls: WallPolicy,
        #[case] dist: u16,
    ) {
        let board = Board::new(20, walls);
        assert_eq!(board.distance(a, b), dist);
        assert_eq!(board.distance(b, a), dist);
    }
}
