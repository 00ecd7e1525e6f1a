// Debug logging module for asynchronous game state logging
//
// Fire-and-forget async logging so turns are never blocked on disk I/O.
// Each turn's pre-turn snapshot and the resulting decisions are written as one
// JSONL line, which the replay tool can read back.

use log::error;
use serde::{Deserialize, Serialize};
use std::io::SeekFrom;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::fs::{File, OpenOptions};
use tokio::io::{AsyncSeekExt, AsyncWriteExt};
use tokio::sync::Mutex;

use crate::game::{Decision, GameSnapshot, TurnReport};

/// Represents a single debug log entry
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct DebugLogEntry {
    /// Game state before the turn was played
    pub snapshot: GameSnapshot,
    pub decisions: Vec<Decision>,
    pub timestamp: String,
}

impl DebugLogEntry {
    pub fn new(snapshot: GameSnapshot, report: &TurnReport) -> Self {
        DebugLogEntry {
            snapshot,
            decisions: report.decisions.clone(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

/// Shared debug logger state
/// Uses Arc<Mutex<File>> to allow concurrent async writes from multiple tasks
#[derive(Clone)]
pub struct DebugLogger {
    file: Arc<Mutex<Option<File>>>,
    // Bumped by `start_new_game` while holding the file lock; entries queued
    // for an earlier game are dropped instead of written
    game: Arc<AtomicU64>,
    enabled: bool,
}

impl DebugLogger {
    /// Creates a new debug logger
    /// If enabled is true, initializes the log file (truncating if it exists)
    pub async fn new(enabled: bool, log_file_path: &str) -> Self {
        if !enabled {
            return DebugLogger::disabled();
        }

        match OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(log_file_path)
            .await
        {
            Ok(file) => {
                log::info!("Debug logging enabled: {}", log_file_path);
                DebugLogger {
                    file: Arc::new(Mutex::new(Some(file))),
                    game: Arc::new(AtomicU64::new(0)),
                    enabled: true,
                }
            }
            Err(e) => {
                error!("Failed to create debug log file '{}': {}", log_file_path, e);
                DebugLogger::disabled()
            }
        }
    }

    /// Creates a disabled debug logger (no-op)
    pub fn disabled() -> Self {
        DebugLogger {
            file: Arc::new(Mutex::new(None)),
            game: Arc::new(AtomicU64::new(0)),
            enabled: false,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Empties the log so it only ever holds one game's turns
    ///
    /// Turns of the previous game that are still queued are discarded.
    pub async fn start_new_game(&self) {
        if !self.enabled {
            return;
        }

        let mut file_guard = self.file.lock().await;
        self.game.fetch_add(1, Ordering::SeqCst);

        if let Some(file) = file_guard.as_mut() {
            if let Err(e) = file.set_len(0).await {
                error!("Failed to truncate debug log: {}", e);
            } else if let Err(e) = file.seek(SeekFrom::Start(0)).await {
                error!("Failed to rewind debug log: {}", e);
            }
        }
    }

    /// Logs a played turn asynchronously (fire-and-forget)
    /// This spawns a tokio task that writes to the file without blocking
    pub fn log_turn(&self, before: GameSnapshot, report: &TurnReport) {
        if !self.enabled || report.decisions.is_empty() {
            return;
        }

        let file_handle = self.file.clone();
        let game_handle = self.game.clone();
        let game = self.game.load(Ordering::SeqCst);
        let entry = DebugLogEntry::new(before, report);

        tokio::spawn(async move {
            Self::write_entry(file_handle, game_handle, game, entry).await;
        });
    }

    /// Writes an entry and waits for it to reach the file
    pub async fn log_turn_now(&self, before: GameSnapshot, report: &TurnReport) {
        if !self.enabled || report.decisions.is_empty() {
            return;
        }

        let game = self.game.load(Ordering::SeqCst);
        Self::write_entry(
            self.file.clone(),
            self.game.clone(),
            game,
            DebugLogEntry::new(before, report),
        )
        .await;
    }

    /// Internal async function that performs the actual file write
    async fn write_entry(
        file_handle: Arc<Mutex<Option<File>>>,
        game_handle: Arc<AtomicU64>,
        game: u64,
        entry: DebugLogEntry,
    ) {
        let mut file_guard = file_handle.lock().await;
        if game_handle.load(Ordering::SeqCst) != game {
            return;
        }

        if let Some(file) = file_guard.as_mut() {
            match serde_json::to_string(&entry) {
                Ok(json_line) => {
                    let line_with_newline = format!("{}\n", json_line);
                    if let Err(e) = file.write_all(line_with_newline.as_bytes()).await {
                        error!("Failed to write debug log entry: {}", e);
                    } else if let Err(e) = file.flush().await {
                        error!("Failed to flush debug log: {}", e);
                    }
                }
                Err(e) => {
                    error!("Failed to serialize debug log entry: {}", e);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::game::Game;
    use crate::types::Coord;

    #[tokio::test]
    async fn test_logged_turn_can_be_read_back() {
        let path = std::env::temp_dir().join(format!("tron_debug_{}.jsonl", std::process::id()));
        let path_str = path.to_string_lossy().to_string();

        let mut config = Config::default_hardcoded();
        config.board.width = 7;
        config.board.height = 7;
        config.search.depth = 2;

        let logger = DebugLogger::new(true, &path_str).await;
        assert!(logger.is_enabled());

        let mut game = Game::new(&config, Coord::new(1, 1), Coord::new(5, 5)).unwrap();
        let before = game.snapshot();
        let report = game.run_turn().unwrap();
        logger.log_turn_now(before.clone(), &report).await;

        let contents = tokio::fs::read_to_string(&path).await.unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines.len(), 1);

        let entry: DebugLogEntry = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(entry.snapshot, before);
        assert_eq!(entry.decisions, report.decisions);

        let _ = std::fs::remove_file(&path);
    }

    #[tokio::test]
    async fn test_new_game_clears_previous_turns() {
        let path = std::env::temp_dir().join(format!("tron_debug_reset_{}.jsonl", std::process::id()));
        let path_str = path.to_string_lossy().to_string();

        let mut config = Config::default_hardcoded();
        config.board.width = 7;
        config.board.height = 7;
        config.search.depth = 2;

        let logger = DebugLogger::new(true, &path_str).await;

        let mut first = Game::new(&config, Coord::new(1, 1), Coord::new(5, 5)).unwrap();
        let before = first.snapshot();
        let report = first.run_turn().unwrap();
        logger.log_turn_now(before.clone(), &report).await;
        // Queued but not yet written when the next game starts
        logger.log_turn(first.snapshot(), &first.run_turn().unwrap());

        logger.start_new_game().await;

        let mut second = Game::new(&config, Coord::new(2, 2), Coord::new(4, 4)).unwrap();
        let second_before = second.snapshot();
        let second_report = second.run_turn().unwrap();
        logger.log_turn_now(second_before.clone(), &second_report).await;

        for _ in 0..10 {
            tokio::task::yield_now().await;
        }

        let contents = tokio::fs::read_to_string(&path).await.unwrap();
        let entries: Vec<DebugLogEntry> = contents
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect();

        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].snapshot, second_before);
        assert_eq!(entries[0].decisions, second_report.decisions);

        let _ = std::fs::remove_file(&path);
    }

    #[tokio::test]
    async fn test_disabled_logger_is_noop() {
        let logger = DebugLogger::new(false, "unused.jsonl").await;
        assert!(!logger.is_enabled());
        assert!(!std::path::Path::new("unused.jsonl").exists());
    }
}
