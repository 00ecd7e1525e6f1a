// Connectivity queries over an immutable board snapshot
//
// Both queries are breadth-first over 4-connected free cells. The start cell
// is usually a player's head, which is already trail-marked on the real
// board, so traversal always begins there regardless of its mark.

use std::collections::VecDeque;

use crate::board::Board;
use crate::types::{Cell, Coord};

/// Returns true if `to` can be reached from `from` through free cells
///
/// Neither endpoint needs to be free itself. Symmetric in `from` and `to`.
pub fn path_exists(board: &Board, from: Coord, to: Coord) -> bool {
    let _guard = crate::simple_profiler::ProfileGuard::new("path_check");

    if from == to {
        return true;
    }
    if !board.in_bounds(from) || !board.in_bounds(to) {
        return false;
    }

    let mut visited = Visited::new(board);
    let mut queue = VecDeque::new();
    visited.insert(from);
    queue.push_back(from);

    while let Some(current) = queue.pop_front() {
        for next in current.neighbors().iter().copied() {
            if next == to {
                return true;
            }
            if board.is_free(next) && visited.insert(next) {
                queue.push_back(next);
            }
        }
    }

    false
}

/// Counts the free interior cells reachable from `from`
///
/// The start cell counts only if it is free itself. A start on the border
/// or outside the grid reaches nothing.
pub fn free_space_count(board: &Board, from: Coord) -> usize {
    let _guard = crate::simple_profiler::ProfileGuard::new("flood_fill");

    if !board.in_bounds(from) || board.value_at(from) == Cell::Border {
        return 0;
    }

    let mut visited = Visited::new(board);
    let mut queue = VecDeque::new();
    visited.insert(from);
    queue.push_back(from);

    let mut count = if board.value_at(from).is_free() { 1 } else { 0 };

    while let Some(current) = queue.pop_front() {
        for next in current.neighbors().iter().copied() {
            if board.is_free(next) && visited.insert(next) {
                count += 1;
                queue.push_back(next);
            }
        }
    }

    count
}

/// Dense visited set sized to the board
struct Visited {
    width: i32,
    seen: Vec<bool>,
}

impl Visited {
    fn new(board: &Board) -> Self {
        Visited {
            width: board.width(),
            seen: vec![false; (board.width() * board.height()) as usize],
        }
    }

    /// Returns true if the coordinate was not yet visited
    fn insert(&mut self, coord: Coord) -> bool {
        let idx = (coord.y * self.width + coord.x) as usize;
        !std::mem::replace(&mut self.seen[idx], true)
    }
}
