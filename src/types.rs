// Core game types shared by the board, search and turn controller

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifies one of the two contestants
#[derive(Deserialize, Serialize, Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum PlayerId {
    One,
    Two,
}

impl PlayerId {
    /// Both player ids in turn order
    pub fn all() -> [PlayerId; 2] {
        [PlayerId::One, PlayerId::Two]
    }

    /// The opposing player
    pub fn other(self) -> PlayerId {
        match self {
            PlayerId::One => PlayerId::Two,
            PlayerId::Two => PlayerId::One,
        }
    }

    /// Numeric identity (1 or 2), used for display and array indexing
    pub fn number(self) -> u8 {
        match self {
            PlayerId::One => 1,
            PlayerId::Two => 2,
        }
    }

    pub fn index(self) -> usize {
        self.number() as usize - 1
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Player {}", self.number())
    }
}

/// Contents of a single grid cell
#[derive(Deserialize, Serialize, Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum Cell {
    Border,
    Free,
    Trail(PlayerId),
}

impl Cell {
    pub fn is_free(self) -> bool {
        self == Cell::Free
    }
}

/// 2D coordinate on the board, y grows downwards
#[derive(Deserialize, Serialize, Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub struct Coord {
    pub x: i32,
    pub y: i32,
}

impl Coord {
    pub fn new(x: i32, y: i32) -> Self {
        Coord { x, y }
    }

    /// The four orthogonal neighbours in move generation order
    pub fn neighbors(&self) -> [Coord; 4] {
        let dirs = Direction::all();
        [
            dirs[0].apply(self),
            dirs[1].apply(self),
            dirs[2].apply(self),
            dirs[3].apply(self),
        ]
    }
}

/// Represents the four possible movement directions for a light cycle
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
    Right,
    Left,
}

impl Direction {
    /// Returns all possible directions in tie-breaking order
    pub fn all() -> [Direction; 4] {
        [Direction::Up, Direction::Down, Direction::Right, Direction::Left]
    }

    /// Converts direction to string representation for logs and the HTTP API
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Up => "up",
            Direction::Down => "down",
            Direction::Right => "right",
            Direction::Left => "left",
        }
    }

    /// Parses a direction name, case insensitive
    pub fn parse(s: &str) -> Result<Direction, String> {
        match s.to_lowercase().as_str() {
            "up" => Ok(Direction::Up),
            "down" => Ok(Direction::Down),
            "right" => Ok(Direction::Right),
            "left" => Ok(Direction::Left),
            _ => Err(format!("Invalid direction: {}", s)),
        }
    }

    /// Unit delta `(dx, dy)` for this direction
    pub fn delta(&self) -> (i32, i32) {
        match self {
            Direction::Up => (0, -1),
            Direction::Down => (0, 1),
            Direction::Right => (1, 0),
            Direction::Left => (-1, 0),
        }
    }

    /// Calculates the next coordinate when moving in this direction
    pub fn apply(&self, coord: &Coord) -> Coord {
        let (dx, dy) = self.delta();
        Coord {
            x: coord.x + dx,
            y: coord.y + dy,
        }
    }

    /// Inverse of `apply`
    pub fn revert(&self, coord: &Coord) -> Coord {
        let (dx, dy) = self.delta();
        Coord {
            x: coord.x - dx,
            y: coord.y - dy,
        }
    }
}

/// A light cycle: where it is, whether it can still move, and who it is
#[derive(Deserialize, Serialize, Debug, PartialEq, Eq, Clone, Copy)]
pub struct Player {
    pub id: PlayerId,
    pub position: Coord,
    pub alive: bool,
    pub is_ai: bool,
}

impl Player {
    pub fn new(id: PlayerId, position: Coord) -> Self {
        Player {
            id,
            position,
            alive: true,
            is_ai: true,
        }
    }

    /// Moves the player one cell. Does not touch the board.
    pub fn apply_move(&mut self, dir: Direction) {
        self.position = dir.apply(&self.position);
    }

    /// Reverts a previous `apply_move` with the same direction
    pub fn undo_move(&mut self, dir: Direction) {
        self.position = dir.revert(&self.position);
    }
}

/// Result of the game so far, derived from the two players' liveness
#[derive(Deserialize, Serialize, Debug, PartialEq, Eq, Clone, Copy)]
pub enum Outcome {
    Ongoing,
    Winner(PlayerId),
    Draw,
}

impl Outcome {
    pub fn from_players(a: &Player, b: &Player) -> Outcome {
        match (a.alive, b.alive) {
            (true, true) => Outcome::Ongoing,
            (true, false) => Outcome::Winner(a.id),
            (false, true) => Outcome::Winner(b.id),
            (false, false) => Outcome::Draw,
        }
    }

    pub fn is_decided(&self) -> bool {
        *self != Outcome::Ongoing
    }

    pub fn winner(&self) -> Option<PlayerId> {
        match self {
            Outcome::Winner(id) => Some(*id),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apply_then_undo_restores_position() {
        for dir in Direction::all().iter() {
            let mut player = Player::new(PlayerId::One, Coord::new(4, 7));
            let before = player;
            player.apply_move(*dir);
            assert_ne!(player.position, before.position);
            player.undo_move(*dir);
            assert_eq!(player, before, "round trip failed for {:?}", dir);
        }
    }

    #[test]
    fn test_direction_deltas() {
        assert_eq!(Direction::Up.delta(), (0, -1));
        assert_eq!(Direction::Down.delta(), (0, 1));
        assert_eq!(Direction::Right.delta(), (1, 0));
        assert_eq!(Direction::Left.delta(), (-1, 0));
    }

    #[test]
    fn test_parse_direction() {
        assert_eq!(Direction::parse("up").unwrap(), Direction::Up);
        assert_eq!(Direction::parse("Right").unwrap(), Direction::Right);
        assert_eq!(Direction::parse("LEFT").unwrap(), Direction::Left);
        assert!(Direction::parse("diagonal").is_err());
    }

    #[test]
    fn test_outcome_from_players() {
        let mut a = Player::new(PlayerId::One, Coord::new(1, 1));
        let mut b = Player::new(PlayerId::Two, Coord::new(2, 2));
        assert_eq!(Outcome::from_players(&a, &b), Outcome::Ongoing);

        b.alive = false;
        assert_eq!(Outcome::from_players(&a, &b), Outcome::Winner(PlayerId::One));
        assert_eq!(Outcome::from_players(&b, &a), Outcome::Winner(PlayerId::One));

        a.alive = false;
        let draw = Outcome::from_players(&a, &b);
        assert_eq!(draw, Outcome::Draw);
        assert!(draw.is_decided());
        assert_eq!(draw.winner(), None);
    }

    #[test]
    fn test_player_id_other_and_index() {
        assert_eq!(PlayerId::One.other(), PlayerId::Two);
        assert_eq!(PlayerId::Two.other(), PlayerId::One);
        assert_eq!(PlayerId::One.index(), 0);
        assert_eq!(PlayerId::Two.index(), 1);
    }
}
