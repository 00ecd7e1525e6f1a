//! Replay Tests
//!
//! Records a full game through the debug logger, reads the JSONL back and
//! checks that replaying every turn reproduces the recorded decisions.

use rand::rngs::StdRng;
use rand::SeedableRng;
use std::path::PathBuf;
use tron_engine::config::Config;
use tron_engine::debug_logger::{DebugLogEntry, DebugLogger};
use tron_engine::game::Game;
use tron_engine::replay::ReplayEngine;
use tron_engine::types::{Direction, PlayerId};

fn test_config() -> Config {
    let mut config = Config::default_hardcoded();
    config.board.width = 9;
    config.board.height = 9;
    config.search.depth = 3;
    config
}

fn temp_log(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("tron_replay_{}_{}.jsonl", name, std::process::id()))
}

/// Plays a seeded game to the end, logging every turn to `path`
async fn record_game(config: &Config, seed: u64, path: &PathBuf) -> u32 {
    let logger = DebugLogger::new(true, path.to_str().unwrap()).await;
    let mut game = Game::with_random_starts(config, &mut StdRng::seed_from_u64(seed)).unwrap();

    while !game.is_over() {
        let before = game.snapshot();
        let report = game.run_turn().unwrap();
        logger.log_turn_now(before, &report).await;
    }

    game.turn()
}

#[tokio::test]
async fn test_recorded_game_replays_identically() {
    let config = test_config();
    let path = temp_log("identical");
    let turns = record_game(&config, 21, &path).await;

    let engine = ReplayEngine::new(config, false);
    let entries = engine.load_log_file(&path).unwrap();
    assert_eq!(entries.len() as u32, turns);

    let results = engine.replay_all(&entries);
    assert_eq!(results.len(), entries.len());
    assert!(results.iter().all(|r| r.matches), "replay diverged from recording");

    let stats = engine.generate_stats(&results);
    assert_eq!(stats.total_turns, results.len());
    assert_eq!(stats.matches, results.len());
    assert_eq!(stats.mismatches, 0);

    let _ = std::fs::remove_file(&path);
}

#[tokio::test]
async fn test_replay_specific_turns() {
    let config = test_config();
    let path = temp_log("turns");
    record_game(&config, 4, &path).await;

    let engine = ReplayEngine::new(config, false);
    let entries = engine.load_log_file(&path).unwrap();

    let results = engine.replay_turns(&entries, &[0, 1]).unwrap();
    assert_eq!(results.len(), 2);
    assert_eq!(results[0].turn, 0);
    assert_eq!(results[1].turn, 1);
    assert!(results.iter().all(|r| r.matches));

    assert!(engine.replay_turns(&entries, &[9999]).is_err());

    let _ = std::fs::remove_file(&path);
}

#[tokio::test]
async fn test_validate_expected_moves_against_log() {
    let config = test_config();
    let path = temp_log("validate");
    record_game(&config, 9, &path).await;

    let engine = ReplayEngine::new(config, false);
    let entries = engine.load_log_file(&path).unwrap();
    let first: &DebugLogEntry = &entries[0];

    let played = first
        .decisions
        .iter()
        .find(|d| d.player == PlayerId::One)
        .and_then(|d| d.direction)
        .unwrap();
    let others: Vec<Direction> = Direction::all().iter().copied().filter(|d| *d != played).collect();

    assert!(engine
        .validate_expected_moves(&entries, &[(0, PlayerId::One, vec![played])])
        .is_ok());
    assert!(engine
        .validate_expected_moves(&entries, &[(0, PlayerId::One, others)])
        .is_err());

    let _ = std::fs::remove_file(&path);
}

#[test]
fn test_replay_of_truncated_board_is_error() {
    let config = test_config();
    let mut game = Game::with_random_starts(&config, &mut StdRng::seed_from_u64(2)).unwrap();
    let before = game.snapshot();
    let report = game.run_turn().unwrap();

    let mut value = serde_json::to_value(DebugLogEntry::new(before, &report)).unwrap();
    value["snapshot"]["board"]["cells"] = serde_json::json!([]);
    let entry: DebugLogEntry = serde_json::from_value(value).unwrap();

    let engine = ReplayEngine::new(config, false);
    assert!(engine.replay_entry(&entry).is_err());
    assert!(engine.replay_all(&[entry]).is_empty());
}

#[test]
fn test_load_missing_log_is_error() {
    let engine = ReplayEngine::new(test_config(), false);
    assert!(engine.load_log_file("does/not/exist.jsonl").is_err());
}
