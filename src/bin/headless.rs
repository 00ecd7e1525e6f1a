// Headless game runner
//
// Plays one engine-vs-engine game on a fixed cadence and prints the board
// after every turn. Stops as soon as the outcome is decided.
//
// Usage:
//   cargo run --bin headless -- [--config <path>] [--seed <n>] [--fast] [--max-turns <n>]

use log::info;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::env;
use std::process;
use std::time::{Duration, Instant};

use tron_engine::config::Config;
use tron_engine::debug_logger::DebugLogger;
use tron_engine::game::Game;
use tron_engine::simple_profiler;
use tron_engine::types::Outcome;

struct Options {
    config_path: String,
    seed: Option<u64>,
    fast: bool,
    max_turns: Option<u32>,
}

fn parse_args(args: &[String]) -> Result<Options, String> {
    let mut options = Options {
        config_path: "Tron.toml".to_string(),
        seed: None,
        fast: false,
        max_turns: None,
    };

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--config" => {
                options.config_path = args
                    .get(i + 1)
                    .ok_or("--config requires an argument")?
                    .clone();
                i += 1;
            }
            "--seed" => {
                let raw = args.get(i + 1).ok_or("--seed requires an argument")?;
                options.seed = Some(
                    raw.parse()
                        .map_err(|e| format!("Invalid seed '{}': {}", raw, e))?,
                );
                i += 1;
            }
            "--max-turns" => {
                let raw = args.get(i + 1).ok_or("--max-turns requires an argument")?;
                options.max_turns = Some(
                    raw.parse()
                        .map_err(|e| format!("Invalid turn limit '{}': {}", raw, e))?,
                );
                i += 1;
            }
            "--fast" => options.fast = true,
            other => return Err(format!("Unknown option '{}'", other)),
        }
        i += 1;
    }

    Ok(options)
}

#[tokio::main]
async fn main() {
    if env::var("RUST_LOG").is_err() {
        env::set_var("RUST_LOG", "info");
    }
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let options = parse_args(&args).unwrap_or_else(|e| {
        eprintln!("Error: {}", e);
        process::exit(1);
    });

    let config = Config::from_file(&options.config_path).unwrap_or_else(|e| {
        log::warn!("Could not load '{}' ({}), using hardcoded defaults", options.config_path, e);
        Config::default_hardcoded()
    });

    let spawned = match options.seed {
        Some(seed) => Game::with_random_starts(&config, &mut StdRng::seed_from_u64(seed)),
        None => Game::with_random_starts(&config, &mut rand::rng()),
    };
    let mut game = spawned.unwrap_or_else(|e| {
        eprintln!("Error: {}", e);
        process::exit(1);
    });

    let logger = DebugLogger::new(config.debug.enabled, &config.debug.log_file_path).await;
    let interval = Duration::from_millis(config.timing.turn_interval_ms);
    let start_time = Instant::now();

    println!("{}", game);

    while !game.is_over() {
        if options.max_turns.map_or(false, |max| game.turn() >= max) {
            info!("Stopping after {} turns without a result", game.turn());
            break;
        }

        let before = game.snapshot();
        let report = game.run_turn().unwrap_or_else(|e| {
            eprintln!("Error: {}", e);
            process::exit(1);
        });
        logger.log_turn_now(before, &report).await;

        println!("{}", game);

        if !options.fast {
            tokio::time::sleep(interval).await;
        }
    }

    match game.outcome() {
        Outcome::Winner(id) => println!("The winner is: {} after {} turns", id, game.turn()),
        Outcome::Draw => println!("Draw after {} turns", game.turn()),
        Outcome::Ongoing => println!("No winner yet after {} turns", game.turn()),
    }

    simple_profiler::print_report(start_time.elapsed().as_millis() as u64);
}
