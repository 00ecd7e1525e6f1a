// Depth-limited minimax with alpha-beta pruning
//
// The search never writes trails to the board. Candidate moves only change
// player positions inside a `SearchContext` that is owned by one decision
// call, and every provisional move is undone before the next candidate.

use log::debug;
use rayon::prelude::*;

use crate::board::Board;
use crate::config::Config;
use crate::evaluator::Evaluator;
use crate::movegen::{has_legal_move, legal_moves};
use crate::simple_profiler;
use crate::types::{Direction, Outcome, Player};

const MAX_SIDE: usize = 0;
const MIN_SIDE: usize = 1;

/// Execution strategy based on configuration and hardware
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecutionStrategy {
    /// Single call tree, alpha-beta window shared across root candidates
    Sequential,
    /// Root candidates searched concurrently on the rayon pool
    ParallelRoot,
}

/// Best move found for the maximizer plus search statistics
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchResult {
    pub score: i32,
    pub best_move: Option<Direction>,
    pub depth: u8,
    pub nodes: u64,
    pub cutoffs: u64,
}

/// Chooses moves for one player against a rational opponent
#[derive(Debug, Clone)]
pub struct Searcher {
    depth: u8,
    evaluator: Evaluator,
    strategy: ExecutionStrategy,
}

impl Searcher {
    /// Creates a searcher from configuration, picking the strategy from the
    /// size of the rayon pool
    pub fn new(config: &Config) -> Self {
        let strategy = Self::determine_strategy(config, rayon::current_num_threads());
        Searcher {
            depth: config.search.depth,
            evaluator: Evaluator::new(config.scores.clone()),
            strategy,
        }
    }

    /// Sequential searcher with an explicit depth
    pub fn with_depth(depth: u8, evaluator: Evaluator) -> Self {
        Searcher {
            depth,
            evaluator,
            strategy: ExecutionStrategy::Sequential,
        }
    }

    pub fn with_strategy(mut self, strategy: ExecutionStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn depth(&self) -> u8 {
        self.depth
    }

    pub fn strategy(&self) -> ExecutionStrategy {
        self.strategy
    }

    pub fn evaluator(&self) -> &Evaluator {
        &self.evaluator
    }

    /// Determines the execution strategy based on configuration and hardware
    pub fn determine_strategy(config: &Config, num_cpus: usize) -> ExecutionStrategy {
        if config.search.parallel_root && num_cpus >= config.search.min_cpus_for_parallel {
            ExecutionStrategy::ParallelRoot
        } else {
            ExecutionStrategy::Sequential
        }
    }

    /// Returns the best move for `maximizer`, assuming `minimizer` replies
    /// with its own best move at every other ply
    pub fn decide(&self, board: &Board, maximizer: &Player, minimizer: &Player) -> SearchResult {
        let result = {
            let _guard = simple_profiler::ProfileGuard::new("alpha_beta");
            match self.strategy {
                ExecutionStrategy::Sequential => self.sequential(board, maximizer, minimizer),
                ExecutionStrategy::ParallelRoot => self.parallel_root(board, maximizer, minimizer),
            }
        };
        simple_profiler::merge_thread_local();

        debug!(
            "{} depth {}: {:?} score {} ({} nodes, {} cutoffs, {:?})",
            maximizer.id,
            result.depth,
            result.best_move.map(|d| d.as_str()),
            result.score,
            result.nodes,
            result.cutoffs,
            self.strategy
        );

        result
    }

    fn sequential(&self, board: &Board, maximizer: &Player, minimizer: &Player) -> SearchResult {
        let mut ctx = SearchContext::new(board, &self.evaluator, maximizer, minimizer);
        let (score, best_move) = ctx.alpha_beta(self.depth, i32::MIN, i32::MAX, true);

        SearchResult {
            score,
            best_move,
            depth: self.depth,
            nodes: ctx.nodes,
            cutoffs: ctx.cutoffs,
        }
    }

    /// Searches each root candidate on its own context with a full window.
    /// Root score and first-best move match the sequential search.
    fn parallel_root(&self, board: &Board, maximizer: &Player, minimizer: &Player) -> SearchResult {
        let mut root = SearchContext::new(board, &self.evaluator, maximizer, minimizer);
        let outcome = root.refresh_liveness();
        let moves = legal_moves(board, maximizer.position);

        if self.depth == 0 || outcome.is_decided() || moves.is_empty() {
            return self.sequential(board, maximizer, minimizer);
        }

        let branches: Vec<(i32, u64, u64)> = moves
            .par_iter()
            .map(|&dir| {
                let mut ctx = SearchContext::new(board, &self.evaluator, maximizer, minimizer);
                let (score, _) = ctx.with_provisional_move(MAX_SIDE, dir, |ctx| {
                    ctx.alpha_beta(self.depth - 1, i32::MIN, i32::MAX, false)
                });
                simple_profiler::merge_thread_local();
                (score, ctx.nodes, ctx.cutoffs)
            })
            .collect();

        let mut best_score = i32::MIN;
        let mut best_move = None;
        let mut nodes = 1;
        let mut cutoffs = 0;

        for (dir, (score, branch_nodes, branch_cutoffs)) in moves.iter().zip(branches.iter()) {
            nodes += branch_nodes;
            cutoffs += branch_cutoffs;
            if *score > best_score {
                best_score = *score;
                best_move = Some(*dir);
            }
        }

        SearchResult {
            score: best_score,
            best_move,
            depth: self.depth,
            nodes,
            cutoffs,
        }
    }
}

/// Mutable search state scoped to a single decision
struct SearchContext<'a> {
    board: &'a Board,
    evaluator: &'a Evaluator,
    players: [Player; 2],
    nodes: u64,
    cutoffs: u64,
}

impl<'a> SearchContext<'a> {
    fn new(board: &'a Board, evaluator: &'a Evaluator, maximizer: &Player, minimizer: &Player) -> Self {
        SearchContext {
            board,
            evaluator,
            players: [*maximizer, *minimizer],
            nodes: 0,
            cutoffs: 0,
        }
    }

    /// A player with no legal move from its current position is dead
    fn refresh_liveness(&mut self) -> Outcome {
        for player in self.players.iter_mut() {
            player.alive = has_legal_move(self.board, player.position);
        }
        Outcome::from_players(&self.players[MAX_SIDE], &self.players[MIN_SIDE])
    }

    fn evaluate(&self) -> i32 {
        self.evaluator
            .evaluate(self.board, &self.players[MAX_SIDE], &self.players[MIN_SIDE])
    }

    /// Runs `f` with `side` moved one step in `dir`, then restores it
    fn with_provisional_move<R>(
        &mut self,
        side: usize,
        dir: Direction,
        f: impl FnOnce(&mut Self) -> R,
    ) -> R {
        let saved = self.players;

        self.players[side].apply_move(dir);
        let result = f(self);
        self.players[side].undo_move(dir);

        debug_assert_eq!(self.players[side].position, saved[side].position);
        // Children recompute liveness on entry; put the parent's flags back
        for (player, before) in self.players.iter_mut().zip(saved.iter()) {
            player.alive = before.alive;
        }

        result
    }

    /// Returns `(score, move)` from the maximizer's perspective
    fn alpha_beta(
        &mut self,
        depth: u8,
        mut alpha: i32,
        mut beta: i32,
        maximizer_to_move: bool,
    ) -> (i32, Option<Direction>) {
        self.nodes += 1;

        let outcome = self.refresh_liveness();
        if depth == 0 || outcome.is_decided() {
            return (self.evaluate(), None);
        }

        let side = if maximizer_to_move { MAX_SIDE } else { MIN_SIDE };
        let moves = legal_moves(self.board, self.players[side].position);
        if moves.is_empty() {
            return (self.evaluate(), None);
        }

        let mut best_move = None;

        if maximizer_to_move {
            let mut best_score = i32::MIN;
            for dir in moves {
                let (score, _) = self.with_provisional_move(side, dir, |ctx| {
                    ctx.alpha_beta(depth - 1, alpha, beta, false)
                });

                if score > best_score {
                    best_score = score;
                    best_move = Some(dir);
                }
                alpha = alpha.max(score);
                if beta <= alpha {
                    self.cutoffs += 1;
                    simple_profiler::record_alpha_beta_cutoff();
                    break;
                }
            }
            (best_score, best_move)
        } else {
            let mut best_score = i32::MAX;
            for dir in moves {
                let (score, _) = self.with_provisional_move(side, dir, |ctx| {
                    ctx.alpha_beta(depth - 1, alpha, beta, true)
                });

                if score < best_score {
                    best_score = score;
                    best_move = Some(dir);
                }
                beta = beta.min(score);
                if beta <= alpha {
                    self.cutoffs += 1;
                    simple_profiler::record_alpha_beta_cutoff();
                    break;
                }
            }
            (best_score, best_move)
        }
    }
}
