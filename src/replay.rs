// Replay module for analyzing recorded turns and debugging decision-making
//
// This module provides functionality to:
// 1. Parse JSONL debug logs
// 2. Replay the engine on the recorded pre-turn states
// 3. Compare recorded vs replayed moves
// 4. Generate summary reports

use log::{info, warn};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::time::Instant;

use crate::config::Config;
use crate::debug_logger::DebugLogEntry;
use crate::game::{Decision, Game};
use crate::types::{Direction, PlayerId};

/// Result of replaying a single turn
#[derive(Debug, Clone)]
pub struct ReplayResult {
    pub turn: u32,
    pub original: Vec<Decision>,
    pub replayed: Vec<Decision>,
    pub matches: bool,
    pub computation_time_ms: u128,
}

/// Statistics for a complete replay session
#[derive(Debug, Default)]
pub struct ReplayStats {
    pub total_turns: usize,
    pub matches: usize,
    pub mismatches: usize,
    pub match_rate: f64,
}

/// Replay engine for analyzing debug logs
pub struct ReplayEngine {
    config: Config,
    verbose: bool,
}

impl ReplayEngine {
    /// Creates a new replay engine with the given configuration
    pub fn new(config: Config, verbose: bool) -> Self {
        ReplayEngine { config, verbose }
    }

    /// Loads all log entries from a JSONL file
    pub fn load_log_file<P: AsRef<Path>>(&self, log_path: P) -> Result<Vec<DebugLogEntry>, String> {
        let file = File::open(log_path.as_ref())
            .map_err(|e| format!("Failed to open log file: {}", e))?;

        let reader = BufReader::new(file);
        let mut entries = Vec::new();

        for (line_num, line) in reader.lines().enumerate() {
            let line = line.map_err(|e| format!("Failed to read line {}: {}", line_num + 1, e))?;

            if line.trim().is_empty() {
                continue;
            }

            let entry: DebugLogEntry = serde_json::from_str(&line)
                .map_err(|e| format!("Failed to parse JSON on line {}: {}", line_num + 1, e))?;

            entries.push(entry);
        }

        info!("Loaded {} log entries", entries.len());
        Ok(entries)
    }

    /// Replays a single log entry and compares the chosen moves
    pub fn replay_entry(&self, entry: &DebugLogEntry) -> Result<ReplayResult, String> {
        let turn = entry.snapshot.turn;
        if self.verbose {
            info!("Replaying turn {}...", turn);
        }

        let start_time = Instant::now();
        let mut game = Game::from_snapshot(entry.snapshot.clone(), &self.config)?;
        let report = game.run_turn()?;
        let computation_time_ms = start_time.elapsed().as_millis();

        let matches = Self::same_moves(&entry.decisions, &report.decisions);

        if self.verbose {
            if matches {
                info!(
                    "Turn {}: ✓ MATCH - {} (time: {}ms)",
                    turn,
                    Self::describe(&report.decisions),
                    computation_time_ms
                );
            } else {
                warn!(
                    "Turn {}: ✗ MISMATCH - Original: {}, Replayed: {} (time: {}ms)",
                    turn,
                    Self::describe(&entry.decisions),
                    Self::describe(&report.decisions),
                    computation_time_ms
                );
            }
        }

        Ok(ReplayResult {
            turn,
            original: entry.decisions.clone(),
            replayed: report.decisions,
            matches,
            computation_time_ms,
        })
    }

    /// Replays all entries in a log file
    pub fn replay_all(&self, entries: &[DebugLogEntry]) -> Vec<ReplayResult> {
        let mut results = Vec::new();

        for entry in entries {
            match self.replay_entry(entry) {
                Ok(result) => results.push(result),
                Err(e) => {
                    warn!("Failed to replay turn {}: {}", entry.snapshot.turn, e);
                }
            }
        }

        results
    }

    /// Replays specific turns from a log file
    pub fn replay_turns(
        &self,
        entries: &[DebugLogEntry],
        turn_numbers: &[u32],
    ) -> Result<Vec<ReplayResult>, String> {
        let mut results = Vec::new();

        for turn_num in turn_numbers {
            let entry = entries
                .iter()
                .find(|e| e.snapshot.turn == *turn_num)
                .ok_or_else(|| format!("Turn {} not found in log file", turn_num))?;

            match self.replay_entry(entry) {
                Ok(result) => results.push(result),
                Err(e) => {
                    warn!("Failed to replay turn {}: {}", turn_num, e);
                }
            }
        }

        Ok(results)
    }

    /// Generates statistics from replay results
    pub fn generate_stats(&self, results: &[ReplayResult]) -> ReplayStats {
        let total_turns = results.len();
        let matches = results.iter().filter(|r| r.matches).count();
        let mismatches = total_turns - matches;
        let match_rate = if total_turns > 0 {
            (matches as f64 / total_turns as f64) * 100.0
        } else {
            0.0
        };

        ReplayStats {
            total_turns,
            matches,
            mismatches,
            match_rate,
        }
    }

    /// Prints a detailed report of replay results
    pub fn print_report(&self, results: &[ReplayResult]) {
        let stats = self.generate_stats(results);

        println!("\n═══════════════════════════════════════════════════════════");
        println!("                    REPLAY REPORT");
        println!("═══════════════════════════════════════════════════════════");
        println!("Total Turns:    {}", stats.total_turns);
        println!("Matches:        {} ({:.1}%)", stats.matches, stats.match_rate);
        println!("Mismatches:     {}", stats.mismatches);
        println!("═══════════════════════════════════════════════════════════\n");

        if !results.is_empty() {
            let avg_time: f64 = results.iter().map(|r| r.computation_time_ms as f64).sum::<f64>()
                / results.len() as f64;
            println!("Average Turn Time:   {:.1}ms\n", avg_time);
        }

        let mismatches: Vec<_> = results.iter().filter(|r| !r.matches).collect();
        if !mismatches.is_empty() {
            println!("═══════════════════════════════════════════════════════════");
            println!("                  DETAILED MISMATCHES");
            println!("═══════════════════════════════════════════════════════════");

            for result in mismatches {
                println!(
                    "Turn {}: {} → {} (time: {}ms)",
                    result.turn,
                    Self::describe(&result.original),
                    Self::describe(&result.replayed),
                    result.computation_time_ms
                );
            }
            println!();
        }
    }

    /// Validates that specific expected moves were recorded
    pub fn validate_expected_moves(
        &self,
        entries: &[DebugLogEntry],
        expected_moves: &[(u32, PlayerId, Vec<Direction>)], // (turn, player, acceptable_moves)
    ) -> Result<(), String> {
        for (turn, player, acceptable) in expected_moves {
            let entry = entries
                .iter()
                .find(|e| e.snapshot.turn == *turn)
                .ok_or_else(|| format!("Turn {} not found in log", turn))?;

            let actual = entry
                .decisions
                .iter()
                .find(|d| d.player == *player)
                .and_then(|d| d.direction)
                .ok_or_else(|| format!("Turn {}: {} made no move", turn, player))?;

            if !acceptable.contains(&actual) {
                return Err(format!(
                    "Turn {}: Expected {} to play one of {:?}, but got {}",
                    turn,
                    player,
                    acceptable.iter().map(|d| d.as_str()).collect::<Vec<_>>(),
                    actual.as_str()
                ));
            }
        }

        Ok(())
    }

    fn same_moves(original: &[Decision], replayed: &[Decision]) -> bool {
        original.len() == replayed.len()
            && original
                .iter()
                .zip(replayed.iter())
                .all(|(a, b)| a.player == b.player && a.direction == b.direction)
    }

    fn describe(decisions: &[Decision]) -> String {
        decisions
            .iter()
            .map(|d| {
                format!(
                    "{}:{}",
                    d.player.number(),
                    d.direction.map(|dir| dir.as_str()).unwrap_or("none")
                )
            })
            .collect::<Vec<_>>()
            .join(" ")
    }
}
