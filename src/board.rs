// Grid storage for the light-cycle arena
//
// The board only knows about cell marks. Player positions live in `Player`
// and are written to the board when a move is committed.

use serde::{Deserialize, Serialize};

use crate::types::{Cell, Coord, PlayerId};

/// Row-major grid of cells with an immutable border ring
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
pub struct Board {
    width: i32,
    height: i32,
    cells: Vec<Cell>,
}

impl Board {
    /// Creates a board with the border ring marked, the interior free and both
    /// starting cells pre-marked with their owner's trail
    pub fn new(width: i32, height: i32, p1_start: Coord, p2_start: Coord) -> Result<Self, String> {
        let mut board = Board::empty(width, height)?;

        if p1_start == p2_start {
            return Err(format!("Both players cannot start on {:?}", p1_start));
        }
        board.mark(p1_start, PlayerId::One)?;
        board.mark(p2_start, PlayerId::Two)?;

        Ok(board)
    }

    /// Creates a board with only the border ring marked
    pub fn empty(width: i32, height: i32) -> Result<Self, String> {
        if width < 3 || height < 3 {
            return Err(format!(
                "Board must be at least 3x3 to have an interior, got {}x{}",
                width, height
            ));
        }

        let cells = (0..height)
            .flat_map(|y| {
                (0..width).map(move |x| {
                    if x == 0 || y == 0 || x == width - 1 || y == height - 1 {
                        Cell::Border
                    } else {
                        Cell::Free
                    }
                })
            })
            .collect();

        Ok(Board {
            width,
            height,
            cells,
        })
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    /// True if the coordinate lies anywhere on the grid, border included
    pub fn in_bounds(&self, coord: Coord) -> bool {
        coord.x >= 0 && coord.x < self.width && coord.y >= 0 && coord.y < self.height
    }

    /// True if the coordinate lies strictly inside the border ring
    pub fn is_interior(&self, coord: Coord) -> bool {
        coord.x >= 1 && coord.x < self.width - 1 && coord.y >= 1 && coord.y < self.height - 1
    }

    /// Returns the mark at `coord`
    ///
    /// # Panics
    /// Panics if `coord` is outside the grid; callers must check `in_bounds`.
    pub fn value_at(&self, coord: Coord) -> Cell {
        assert!(
            self.in_bounds(coord),
            "value_at({:?}) outside {}x{} board",
            coord,
            self.width,
            self.height
        );
        self.cells[self.index(coord)]
    }

    /// True if `coord` is on the grid and currently traversable
    pub fn is_free(&self, coord: Coord) -> bool {
        self.in_bounds(coord) && self.value_at(coord).is_free()
    }

    /// Leaves `player`'s trail on a free cell. Trails are permanent.
    pub fn mark(&mut self, coord: Coord, player: PlayerId) -> Result<(), String> {
        if !self.in_bounds(coord) {
            return Err(format!(
                "Cannot mark {:?}: outside {}x{} board",
                coord, self.width, self.height
            ));
        }

        let idx = self.index(coord);
        match self.cells[idx] {
            Cell::Free => {
                self.cells[idx] = Cell::Trail(player);
                Ok(())
            }
            occupied => Err(format!(
                "Cannot mark {:?} for {}: cell is {:?}",
                coord, player, occupied
            )),
        }
    }

    /// Checks the shape of a board that did not come from `new`, e.g. one
    /// deserialized from the debug log
    pub fn validate(&self) -> Result<(), String> {
        if self.width < 3 || self.height < 3 {
            return Err(format!(
                "Board must be at least 3x3 to have an interior, got {}x{}",
                self.width, self.height
            ));
        }

        let expected = self.width as usize * self.height as usize;
        if self.cells.len() != expected {
            return Err(format!(
                "Board {}x{} needs {} cells, got {}",
                self.width,
                self.height,
                expected,
                self.cells.len()
            ));
        }

        for y in 0..self.height {
            for x in 0..self.width {
                let coord = Coord::new(x, y);
                let cell = self.cells[self.index(coord)];
                if self.is_interior(coord) == (cell == Cell::Border) {
                    return Err(format!("Cell {:?} is {:?}, breaking the border ring", coord, cell));
                }
            }
        }

        Ok(())
    }

    /// Number of free cells on the whole board
    pub fn free_cells(&self) -> usize {
        self.cells.iter().filter(|c| c.is_free()).count()
    }

    fn index(&self, coord: Coord) -> usize {
        (coord.y * self.width + coord.x) as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_board_has_border_ring_and_marked_starts() {
        let board = Board::new(5, 5, Coord::new(1, 1), Coord::new(3, 3)).unwrap();

        for i in 0..5 {
            assert_eq!(board.value_at(Coord::new(i, 0)), Cell::Border);
            assert_eq!(board.value_at(Coord::new(i, 4)), Cell::Border);
            assert_eq!(board.value_at(Coord::new(0, i)), Cell::Border);
            assert_eq!(board.value_at(Coord::new(4, i)), Cell::Border);
        }

        assert_eq!(board.value_at(Coord::new(1, 1)), Cell::Trail(PlayerId::One));
        assert_eq!(board.value_at(Coord::new(3, 3)), Cell::Trail(PlayerId::Two));
        assert_eq!(board.value_at(Coord::new(2, 2)), Cell::Free);
        assert_eq!(board.free_cells(), 7);
    }

    #[test]
    fn test_mark_occupied_cell_is_rejected() {
        let mut board = Board::new(5, 5, Coord::new(1, 1), Coord::new(3, 3)).unwrap();

        assert!(board.mark(Coord::new(1, 1), PlayerId::Two).is_err());
        assert!(board.mark(Coord::new(0, 2), PlayerId::One).is_err());
        assert!(board.mark(Coord::new(9, 9), PlayerId::One).is_err());

        assert!(board.mark(Coord::new(2, 2), PlayerId::Two).is_ok());
        assert!(board.mark(Coord::new(2, 2), PlayerId::Two).is_err());
    }

    #[test]
    fn test_start_on_border_is_rejected() {
        assert!(Board::new(5, 5, Coord::new(0, 1), Coord::new(3, 3)).is_err());
        assert!(Board::new(5, 5, Coord::new(2, 2), Coord::new(2, 2)).is_err());
        assert!(Board::new(2, 5, Coord::new(1, 1), Coord::new(1, 2)).is_err());
    }

    #[test]
    #[should_panic]
    fn test_value_at_out_of_range_panics() {
        let board = Board::empty(5, 5).unwrap();
        board.value_at(Coord::new(5, 0));
    }

    #[test]
    fn test_validate_rejects_malformed_boards() {
        let board = Board::new(5, 5, Coord::new(1, 1), Coord::new(3, 3)).unwrap();
        assert!(board.validate().is_ok());

        let mut truncated = board.clone();
        truncated.cells.truncate(7);
        assert!(truncated.validate().is_err());

        let mut empty = board.clone();
        empty.cells.clear();
        assert!(empty.validate().is_err());

        let mut hole = board.clone();
        hole.cells[2] = Cell::Free;
        assert!(hole.validate().is_err());

        let mut inner_wall = board.clone();
        let idx = inner_wall.index(Coord::new(2, 2));
        inner_wall.cells[idx] = Cell::Border;
        assert!(inner_wall.validate().is_err());

        let mut tiny = board;
        tiny.width = 2;
        assert!(tiny.validate().is_err());
    }

    #[test]
    fn test_deserialized_board_with_missing_cells_fails_validation() {
        let board: Board = serde_json::from_str(r#"{"width":5,"height":5,"cells":[]}"#).unwrap();
        assert!(board.validate().is_err());
    }

    #[test]
    fn test_interior_bounds() {
        let board = Board::empty(6, 4).unwrap();
        assert!(board.is_interior(Coord::new(1, 1)));
        assert!(board.is_interior(Coord::new(4, 2)));
        assert!(!board.is_interior(Coord::new(5, 2)));
        assert!(!board.is_interior(Coord::new(2, 3)));
        assert!(board.in_bounds(Coord::new(5, 3)));
        assert!(!board.is_free(Coord::new(-1, 2)));
    }
}
