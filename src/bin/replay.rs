// Standalone replay tool for analyzing Tron engine debug logs
//
// Usage:
//   cargo run --bin replay -- <log_file> [options]
//
// Options:
//   --all                  Replay all turns
//   --turns <turn1,turn2>  Replay specific turns (comma-separated)
//   --validate             Check recorded moves against expectations
//   --verbose              Show detailed output for each turn
//   --config <path>        Path to Tron.toml (default: Tron.toml)

use std::env;
use std::process;

use tron_engine::config::Config;
use tron_engine::replay::ReplayEngine;
use tron_engine::types::{Direction, PlayerId};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    All,
    Turns,
    Validate,
}

fn print_usage() {
    eprintln!("Tron Engine Replay Tool");
    eprintln!();
    eprintln!("USAGE:");
    eprintln!("  replay <log_file> [OPTIONS]");
    eprintln!();
    eprintln!("OPTIONS:");
    eprintln!("  --all                     Replay all turns in the log");
    eprintln!("  --turns <T1,T2,...>       Replay specific turns (comma-separated)");
    eprintln!("  --validate <T:P:M,...>    Validate recorded moves (format: turn:player:move,...)");
    eprintln!("  --verbose                 Show detailed output for each turn");
    eprintln!("  --config <path>           Path to Tron.toml (default: Tron.toml)");
    eprintln!("  --help                    Show this help message");
    eprintln!();
    eprintln!("EXAMPLES:");
    eprintln!("  # Replay all turns");
    eprintln!("  replay tron_debug.jsonl --all");
    eprintln!();
    eprintln!("  # Replay specific turns");
    eprintln!("  replay tron_debug.jsonl --turns 5,10,15");
    eprintln!();
    eprintln!("  # Validate expected moves (player 1 went up or right on turn 5)");
    eprintln!("  replay tron_debug.jsonl --validate 5:1:up|right,10:2:left");
}

fn parse_turns(s: &str) -> Result<Vec<u32>, String> {
    s.split(',')
        .map(|t| {
            t.trim()
                .parse::<u32>()
                .map_err(|e| format!("Invalid turn number '{}': {}", t, e))
        })
        .collect()
}

fn parse_player(s: &str) -> Result<PlayerId, String> {
    match s.trim() {
        "1" => Ok(PlayerId::One),
        "2" => Ok(PlayerId::Two),
        other => Err(format!("Invalid player '{}': expected 1 or 2", other)),
    }
}

fn parse_expected_moves(s: &str) -> Result<Vec<(u32, PlayerId, Vec<Direction>)>, String> {
    s.split(',')
        .map(|triple| {
            let parts: Vec<&str> = triple.trim().split(':').collect();
            if parts.len() != 3 {
                return Err(format!(
                    "Invalid format '{}'. Expected 'turn:player:move'",
                    triple
                ));
            }

            let turn = parts[0]
                .parse::<u32>()
                .map_err(|e| format!("Invalid turn number '{}': {}", parts[0], e))?;
            let player = parse_player(parts[1])?;

            // Support multiple acceptable moves separated by '|'
            let moves: Result<Vec<Direction>, String> = parts[2]
                .split('|')
                .map(|m| Direction::parse(m.trim()))
                .collect();

            Ok((turn, player, moves?))
        })
        .collect()
}

fn main() {
    env_logger::init();

    let args: Vec<String> = env::args().collect();

    if args.len() < 2 || args.contains(&"--help".to_string()) {
        print_usage();
        process::exit(if args.contains(&"--help".to_string()) { 0 } else { 1 });
    }

    let log_file = &args[1];
    let mut config_path = "Tron.toml".to_string();
    let mut verbose = false;
    let mut mode = None;
    let mut mode_arg = String::new();

    let mut i = 2;
    while i < args.len() {
        match args[i].as_str() {
            "--all" => {
                mode = Some(Mode::All);
            }
            flag @ ("--turns" | "--validate") => {
                if i + 1 >= args.len() {
                    eprintln!("Error: {} requires an argument", flag);
                    process::exit(1);
                }
                mode = Some(if flag == "--turns" { Mode::Turns } else { Mode::Validate });
                mode_arg = args[i + 1].clone();
                i += 1;
            }
            "--config" => {
                if i + 1 >= args.len() {
                    eprintln!("Error: --config requires an argument");
                    process::exit(1);
                }
                config_path = args[i + 1].clone();
                i += 1;
            }
            "--verbose" => {
                verbose = true;
            }
            _ => {
                eprintln!("Error: Unknown option '{}'", args[i]);
                print_usage();
                process::exit(1);
            }
        }
        i += 1;
    }

    let mode = match mode {
        Some(mode) => mode,
        None => {
            eprintln!("Error: Must specify --all, --turns, or --validate");
            print_usage();
            process::exit(1);
        }
    };

    let config = Config::from_file(&config_path).unwrap_or_else(|e| {
        eprintln!("Warning: Could not load config from '{}': {}", config_path, e);
        eprintln!("Using default configuration");
        Config::default_hardcoded()
    });

    println!("Loaded configuration from: {}", config_path);
    println!("Replay log file: {}", log_file);
    println!();

    let engine = ReplayEngine::new(config, verbose);

    let entries = match engine.load_log_file(log_file) {
        Ok(entries) => entries,
        Err(e) => {
            eprintln!("Error loading log file: {}", e);
            process::exit(1);
        }
    };

    if entries.is_empty() {
        eprintln!("Error: Log file is empty");
        process::exit(1);
    }

    println!("Loaded {} log entries\n", entries.len());

    match mode {
        Mode::All => {
            println!("Replaying all {} turns...\n", entries.len());
            let results = engine.replay_all(&entries);
            engine.print_report(&results);
        }
        Mode::Turns => {
            let turns = parse_turns(&mode_arg).unwrap_or_else(|e| {
                eprintln!("Error parsing turns: {}", e);
                process::exit(1);
            });

            println!("Replaying {} specific turn(s)...\n", turns.len());
            match engine.replay_turns(&entries, &turns) {
                Ok(results) => engine.print_report(&results),
                Err(e) => {
                    eprintln!("Error during replay: {}", e);
                    process::exit(1);
                }
            }
        }
        Mode::Validate => {
            let expected_moves = parse_expected_moves(&mode_arg).unwrap_or_else(|e| {
                eprintln!("Error parsing expected moves: {}", e);
                process::exit(1);
            });

            println!("Validating {} expected move(s)...\n", expected_moves.len());
            match engine.validate_expected_moves(&entries, &expected_moves) {
                Ok(()) => println!("✓ All expected moves validated successfully!"),
                Err(e) => {
                    eprintln!("✗ Validation failed: {}", e);
                    process::exit(1);
                }
            }
        }
    }
}
