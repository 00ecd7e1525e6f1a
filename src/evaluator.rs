// Static board evaluation from one player's perspective

use crate::board::Board;
use crate::config::ScoresConfig;
use crate::connectivity::{free_space_count, path_exists};
use crate::movegen::has_legal_move;
use crate::types::{Cell, Player};

/// Scores positions using liveness, kill attribution and, once the players
/// are separated, the free space each one can still reach
#[derive(Debug, Clone)]
pub struct Evaluator {
    scores: ScoresConfig,
}

impl Evaluator {
    pub fn new(scores: ScoresConfig) -> Self {
        Evaluator { scores }
    }

    pub fn scores(&self) -> &ScoresConfig {
        &self.scores
    }

    /// Evaluates the board for `me` against `opponent`
    ///
    /// Liveness is read from the players' `alive` flags; the caller is
    /// responsible for keeping them current.
    pub fn evaluate(&self, board: &Board, me: &Player, opponent: &Player) -> i32 {
        let _guard = crate::simple_profiler::ProfileGuard::new("eval");
        let s = &self.scores;

        match (me.alive, opponent.alive) {
            (false, true) => {
                let mut score = s.score_loss;
                if killed_by_opponent(board, me) {
                    score += s.kill_penalty;
                }
                score
            }
            (true, false) => {
                let mut score = s.score_win;
                if killed_by_opponent(board, opponent) {
                    score += s.kill_bonus;
                }
                score
            }
            (false, false) => s.score_draw,
            (true, true) => self.mobility_score(board, me, opponent),
        }
    }

    /// Space comparison once the players can no longer reach each other
    fn mobility_score(&self, board: &Board, me: &Player, opponent: &Player) -> i32 {
        if path_exists(board, me.position, opponent.position) {
            return 0;
        }

        let mine = free_space_count(board, me.position) as i32;
        let theirs = free_space_count(board, opponent.position) as i32;

        if mine > theirs {
            self.scores.space_weight * mine
        } else if mine < theirs {
            -(self.scores.space_weight * theirs)
        } else {
            self.scores.score_equal_space
        }
    }
}

/// True if `player` is boxed in and at least one neighbouring cell carries
/// the opponent's trail
///
/// Takes the player by shared reference, so probing cannot disturb either
/// its position or the board. Neighbours off the grid are skipped.
pub fn killed_by_opponent(board: &Board, player: &Player) -> bool {
    if has_legal_move(board, player.position) {
        return false;
    }

    let opponent_trail = Cell::Trail(player.id.other());
    player
        .position
        .neighbors()
        .iter()
        .any(|n| board.in_bounds(*n) && board.value_at(*n) == opponent_trail)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::types::{Coord, PlayerId};

    fn evaluator() -> Evaluator {
        Evaluator::new(Config::default_hardcoded().scores)
    }

    #[test]
    fn test_connected_alive_players_score_zero() {
        let board = Board::new(5, 5, Coord::new(1, 1), Coord::new(3, 3)).unwrap();
        let a = Player::new(PlayerId::One, Coord::new(1, 1));
        let b = Player::new(PlayerId::Two, Coord::new(3, 3));

        assert_eq!(evaluator().evaluate(&board, &a, &b), 0);
        assert_eq!(evaluator().evaluate(&board, &b, &a), 0);
    }

    #[test]
    fn test_killed_by_opponent_trail() {
        // Player one in the corner, opponent trail on its right
        let mut board = Board::new(5, 5, Coord::new(1, 1), Coord::new(3, 3)).unwrap();
        board.mark(Coord::new(2, 1), PlayerId::Two).unwrap();
        board.mark(Coord::new(1, 2), PlayerId::One).unwrap();

        let mut a = Player::new(PlayerId::One, Coord::new(1, 1));
        a.alive = false;
        let b = Player::new(PlayerId::Two, Coord::new(3, 3));

        assert!(killed_by_opponent(&board, &a));
        assert_eq!(evaluator().evaluate(&board, &a, &b), -600);
        assert_eq!(evaluator().evaluate(&board, &b, &a), 600);
    }

    #[test]
    fn test_self_inflicted_death_has_no_kill_bonus() {
        let mut board = Board::new(5, 5, Coord::new(1, 1), Coord::new(3, 3)).unwrap();
        board.mark(Coord::new(2, 1), PlayerId::One).unwrap();
        board.mark(Coord::new(1, 2), PlayerId::One).unwrap();

        let mut a = Player::new(PlayerId::One, Coord::new(1, 1));
        a.alive = false;
        let b = Player::new(PlayerId::Two, Coord::new(3, 3));

        assert!(!killed_by_opponent(&board, &a));
        assert_eq!(evaluator().evaluate(&board, &a, &b), -100);
        assert_eq!(evaluator().evaluate(&board, &b, &a), 100);
    }

    #[test]
    fn test_both_dead_is_draw_penalty() {
        let board = Board::new(5, 5, Coord::new(1, 1), Coord::new(3, 3)).unwrap();
        let mut a = Player::new(PlayerId::One, Coord::new(1, 1));
        let mut b = Player::new(PlayerId::Two, Coord::new(3, 3));
        a.alive = false;
        b.alive = false;

        assert_eq!(evaluator().evaluate(&board, &a, &b), -50);
        assert_eq!(evaluator().evaluate(&board, &b, &a), -50);
    }

    #[test]
    fn test_partitioned_larger_region_wins() {
        // Wall at x=2 leaves one column for player one, three for player two
        let mut board = Board::new(7, 5, Coord::new(1, 1), Coord::new(4, 1)).unwrap();
        for y in 1..4 {
            board.mark(Coord::new(2, y), PlayerId::Two).unwrap();
        }
        let a = Player::new(PlayerId::One, Coord::new(1, 1));
        let b = Player::new(PlayerId::Two, Coord::new(4, 1));

        // a reaches (1,2),(1,3); b reaches 3*3 - 1 = 8 cells
        assert_eq!(free_space_count(&board, a.position), 2);
        assert_eq!(free_space_count(&board, b.position), 8);
        assert_eq!(evaluator().evaluate(&board, &a, &b), -200);
        assert_eq!(evaluator().evaluate(&board, &b, &a), 200);
    }

    #[test]
    fn test_probe_leaves_player_and_board_untouched() {
        let mut board = Board::new(5, 5, Coord::new(1, 1), Coord::new(3, 3)).unwrap();
        board.mark(Coord::new(2, 1), PlayerId::Two).unwrap();
        board.mark(Coord::new(1, 2), PlayerId::Two).unwrap();

        let a = Player::new(PlayerId::One, Coord::new(1, 1));
        let board_before = board.clone();
        let player_before = a;

        assert!(killed_by_opponent(&board, &a));
        assert_eq!(a, player_before);
        assert_eq!(board, board_before);
    }
}
