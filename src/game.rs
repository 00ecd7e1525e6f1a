// Turn controller: owns the board and both players for one game
//
// Each turn, player One decides and commits, then player Two decides against
// the board as player One left it. Decisions are independent best responses
// computed by `Searcher`, not a joint simultaneous-move solution.

use log::info;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::board::Board;
use crate::config::Config;
use crate::movegen::has_legal_move;
use crate::search::Searcher;
use crate::types::{Cell, Coord, Direction, Outcome, Player, PlayerId};

/// Serializable view of a game between turns
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
pub struct GameSnapshot {
    pub turn: u32,
    pub board: Board,
    pub players: [Player; 2],
    pub outcome: Outcome,
}

/// One player's chosen move for a turn
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct Decision {
    pub player: PlayerId,
    pub direction: Option<Direction>,
    /// `(dx, dy)` of the move, `(0, 0)` when the player could not move
    pub delta: (i32, i32),
    pub score: i32,
}

/// What happened during one call to `Game::run_turn`
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
pub struct TurnReport {
    /// Turn counter after this turn
    pub turn: u32,
    pub decisions: Vec<Decision>,
    pub outcome: Outcome,
}

pub struct Game {
    board: Board,
    players: [Player; 2],
    turn: u32,
    searcher: Searcher,
}

impl Game {
    /// Starts a game on the configured board with the given spawn cells
    pub fn new(config: &Config, p1_start: Coord, p2_start: Coord) -> Result<Self, String> {
        let board = Board::new(config.board.width, config.board.height, p1_start, p2_start)?;
        let players = [
            Player::new(PlayerId::One, p1_start),
            Player::new(PlayerId::Two, p2_start),
        ];

        Ok(Self::from_parts(board, players, 0, Searcher::new(config)))
    }

    /// Starts a game with two distinct random interior spawn cells
    pub fn with_random_starts<R: Rng + ?Sized>(config: &Config, rng: &mut R) -> Result<Self, String> {
        let (p1_start, p2_start) = random_starts(config.board.width, config.board.height, rng)?;
        info!("Spawning players at {:?} and {:?}", p1_start, p2_start);
        Self::new(config, p1_start, p2_start)
    }

    /// Rebuilds a game from a snapshot, e.g. one read back from the debug log
    pub fn from_snapshot(snapshot: GameSnapshot, config: &Config) -> Result<Self, String> {
        snapshot.board.validate()?;

        for (player, id) in snapshot.players.iter().zip(PlayerId::all().iter()) {
            if player.id != *id {
                return Err(format!("Snapshot player order mismatch: expected {}, got {}", id, player.id));
            }
            if !snapshot.board.is_interior(player.position) {
                return Err(format!("{} at {:?} is not inside the border", player.id, player.position));
            }
        }

        Ok(Self::from_parts(
            snapshot.board,
            snapshot.players,
            snapshot.turn,
            Searcher::new(config),
        ))
    }

    /// Replaces the searcher, e.g. to change depth or strategy
    pub fn with_searcher(mut self, searcher: Searcher) -> Self {
        self.searcher = searcher;
        self
    }

    fn from_parts(board: Board, players: [Player; 2], turn: u32, searcher: Searcher) -> Self {
        let mut game = Game {
            board,
            players,
            turn,
            searcher,
        };
        game.refresh_liveness();
        game
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn player(&self, id: PlayerId) -> &Player {
        &self.players[id.index()]
    }

    pub fn players(&self) -> &[Player; 2] {
        &self.players
    }

    pub fn turn(&self) -> u32 {
        self.turn
    }

    pub fn searcher(&self) -> &Searcher {
        &self.searcher
    }

    pub fn outcome(&self) -> Outcome {
        Outcome::from_players(&self.players[0], &self.players[1])
    }

    pub fn winner(&self) -> Option<PlayerId> {
        self.outcome().winner()
    }

    pub fn is_over(&self) -> bool {
        self.outcome().is_decided()
    }

    pub fn snapshot(&self) -> GameSnapshot {
        GameSnapshot {
            turn: self.turn,
            board: self.board.clone(),
            players: self.players,
            outcome: self.outcome(),
        }
    }

    /// Computes `id`'s next move without applying it
    ///
    /// Asking a dead player to move is a caller bug and returns an error.
    pub fn compute_next_move(&self, id: PlayerId) -> Result<Decision, String> {
        let me = &self.players[id.index()];
        if !me.alive {
            return Err(format!("{} is dead and cannot move", id));
        }
        let opponent = &self.players[id.other().index()];

        let result = self.searcher.decide(&self.board, me, opponent);

        Ok(Decision {
            player: id,
            direction: result.best_move,
            delta: result.best_move.map(|d| d.delta()).unwrap_or((0, 0)),
            score: result.score,
        })
    }

    /// Plays one turn for every living player
    ///
    /// Once the outcome is decided this is a no-op and reports no decisions.
    pub fn run_turn(&mut self) -> Result<TurnReport, String> {
        if self.is_over() {
            return Ok(TurnReport {
                turn: self.turn,
                decisions: Vec::new(),
                outcome: self.outcome(),
            });
        }

        let mut decisions = Vec::with_capacity(2);
        for id in PlayerId::all().iter().copied() {
            if !self.players[id.index()].alive {
                continue;
            }

            let decision = self.compute_next_move(id)?;
            if let Some(dir) = decision.direction {
                self.commit_move(id, dir)?;
            }
            decisions.push(decision);
        }

        self.refresh_liveness();
        self.turn += 1;
        let outcome = self.outcome();

        info!(
            "Turn {}: {} ({:?})",
            self.turn,
            decisions
                .iter()
                .map(|d| format!(
                    "{} {} [{}]",
                    d.player,
                    d.direction.map(|dir| dir.as_str()).unwrap_or("none"),
                    d.score
                ))
                .collect::<Vec<_>>()
                .join(", "),
            outcome
        );

        Ok(TurnReport {
            turn: self.turn,
            decisions,
            outcome,
        })
    }

    /// Moves the player and leaves its trail on the new cell
    fn commit_move(&mut self, id: PlayerId, dir: Direction) -> Result<(), String> {
        let target = dir.apply(&self.players[id.index()].position);
        self.board.mark(target, id)?;
        self.players[id.index()].apply_move(dir);
        Ok(())
    }

    /// Players with no legal move die; death is permanent
    fn refresh_liveness(&mut self) {
        for player in self.players.iter_mut() {
            if player.alive && !has_legal_move(&self.board, player.position) {
                player.alive = false;
                info!("{} has no legal moves left at {:?}", player.id, player.position);
            }
        }
    }
}

impl fmt::Display for Game {
    /// ASCII view: `#` border, `.` free, `a`/`b` trails, `A`/`B` heads
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for y in 0..self.board.height() {
            let row: String = (0..self.board.width())
                .map(|x| {
                    let coord = Coord::new(x, y);
                    if coord == self.players[0].position {
                        'A'
                    } else if coord == self.players[1].position {
                        'B'
                    } else {
                        match self.board.value_at(coord) {
                            Cell::Border => '#',
                            Cell::Free => '.',
                            Cell::Trail(PlayerId::One) => 'a',
                            Cell::Trail(PlayerId::Two) => 'b',
                        }
                    }
                })
                .collect();
            writeln!(f, "{}", row)?;
        }
        Ok(())
    }
}

/// Picks two distinct interior cells
pub fn random_starts<R: Rng + ?Sized>(width: i32, height: i32, rng: &mut R) -> Result<(Coord, Coord), String> {
    if width < 3 || height < 3 || (width - 2) * (height - 2) < 2 {
        return Err(format!("No room for two players on a {}x{} board", width, height));
    }

    let pick = |rng: &mut R| Coord::new(rng.random_range(1..width - 1), rng.random_range(1..height - 1));

    let first = pick(rng);
    loop {
        let second = pick(rng);
        if second != first {
            return Ok((first, second));
        }
    }
}
