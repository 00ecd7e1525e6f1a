// Legal move generation

use crate::board::Board;
use crate::types::{Coord, Direction};

/// Generates all legal single-step moves from `position`
///
/// A move is legal if the target cell:
/// - lies strictly inside the border ring
/// - is free (no border, no trail of either player)
///
/// Moves come back in Up, Down, Right, Left order; the search relies on this
/// for deterministic tie-breaking.
pub fn legal_moves(board: &Board, position: Coord) -> Vec<Direction> {
    let _guard = crate::simple_profiler::ProfileGuard::new("move_gen");

    Direction::all()
        .iter()
        .filter(|dir| is_legal(board, position, **dir))
        .copied()
        .collect()
}

/// True if at least one legal move exists from `position`
pub fn has_legal_move(board: &Board, position: Coord) -> bool {
    Direction::all()
        .iter()
        .any(|dir| is_legal(board, position, *dir))
}

fn is_legal(board: &Board, position: Coord, dir: Direction) -> bool {
    let next = dir.apply(&position);
    board.is_interior(next) && board.value_at(next).is_free()
}
