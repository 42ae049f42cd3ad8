use super::board::Board;
use rand::{seq::IteratorRandom, Rng};
use ratatui::layout::Position;
use std::collections::HashSet;
use thiserror::Error;

/// Pick a random cell of `board` that is not in any of the `occupied` sets.
pub(crate) fn place_free<R: Rng + ?Sized>(
    rng: &mut R,
    board: Board,
    occupied: &[&HashSet<Position>],
) -> Result<Position, PlacementExhausted> {
    place_where(rng, board, |pos| occupied.iter().all(|set| !set.contains(&pos)))
}

/// Pick a random cell of `board` for which `accept` returns `true`.
///
/// Cells are sampled uniformly and rejected until one is accepted.  After
/// `size²` rejections, every acceptable cell is enumerated and one is chosen
/// from those, so that a crowded board still succeeds as long as a single
/// acceptable cell remains.
pub(crate) fn place_where<R, F>(
    rng: &mut R,
    board: Board,
    accept: F,
) -> Result<Position, PlacementExhausted>
where
    R: Rng + ?Sized,
    F: Fn(Position) -> bool,
{
    let size = board.size();
    for _ in 0..board.area() {
        let pos = Position::new(rng.random_range(0..size), rng.random_range(0..size));
        if accept(pos) {
            return Ok(pos);
        }
    }
    board
        .positions()
        .filter(|&pos| accept(pos))
        .choose(rng)
        .ok_or(PlacementExhausted)
}

#[derive(Clone, Copy, Debug, Eq, Error, PartialEq)]
#[error("no free cell left on the board")]
pub(crate) struct PlacementExhausted;
