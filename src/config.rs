// Configuration module for reading Tron.toml
// All tunable engine parameters live here so the binaries and tests share them

use log::warn;
use serde::Deserialize;
use std::fs;
use std::path::Path;

/// Main configuration structure containing all tunable parameters
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub board: BoardConfig,
    pub search: SearchConfig,
    pub scores: ScoresConfig,
    pub timing: TimingConfig,
    pub debug: DebugConfig,
}

/// Arena dimensions, border ring included
#[derive(Debug, Deserialize, Clone)]
pub struct BoardConfig {
    pub width: i32,
    pub height: i32,
}

/// Search depth and execution strategy
#[derive(Debug, Deserialize, Clone)]
pub struct SearchConfig {
    pub depth: u8,
    pub parallel_root: bool,
    pub min_cpus_for_parallel: usize,
}

/// All evaluation and scoring constants
#[derive(Debug, Deserialize, Clone)]
pub struct ScoresConfig {
    // Liveness terms
    pub score_win: i32,
    pub score_loss: i32,
    pub kill_bonus: i32,
    pub kill_penalty: i32,
    pub score_draw: i32,

    // Mobility once partitioned
    pub space_weight: i32,
    pub score_equal_space: i32,
}

/// Turn cadence for the headless runner
#[derive(Debug, Deserialize, Clone)]
pub struct TimingConfig {
    pub turn_interval_ms: u64,
}

/// Debug configuration
#[derive(Debug, Deserialize, Clone)]
pub struct DebugConfig {
    pub enabled: bool,
    pub log_file_path: String,
}

impl Config {
    /// Loads configuration from a TOML file
    ///
    /// # Arguments
    /// * `path` - Path to the Tron.toml configuration file
    ///
    /// # Returns
    /// * `Result<Config, String>` - Parsed configuration or error message
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, String> {
        let contents = fs::read_to_string(path.as_ref())
            .map_err(|e| format!("Failed to read config file: {}", e))?;

        let config: Config = toml::from_str(&contents)
            .map_err(|e| format!("Failed to parse config file: {}", e))?;

        config.validate()?;
        Ok(config)
    }

    /// Loads default configuration from Tron.toml in the project root
    pub fn load_default() -> Result<Self, String> {
        Self::from_file("Tron.toml")
    }

    /// Creates a configuration with hardcoded default values as fallback
    /// This should match the constants defined in Tron.toml
    pub fn default_hardcoded() -> Self {
        Config {
            board: BoardConfig {
                width: 20,
                height: 40,
            },
            search: SearchConfig {
                depth: 7,
                parallel_root: false,
                min_cpus_for_parallel: 2,
            },
            scores: ScoresConfig {
                score_win: 100,
                score_loss: -100,
                kill_bonus: 500,
                kill_penalty: -500,
                score_draw: -50,
                space_weight: 25,
                score_equal_space: -50,
            },
            timing: TimingConfig {
                turn_interval_ms: 100,
            },
            debug: DebugConfig {
                enabled: false,
                log_file_path: "tron_debug.jsonl".to_string(),
            },
        }
    }

    /// Attempts to load from file, falls back to hardcoded defaults on error
    pub fn load_or_default() -> Self {
        Self::load_default().unwrap_or_else(|e| {
            warn!("Could not load Tron.toml ({}), using hardcoded defaults", e);
            Self::default_hardcoded()
        })
    }

    /// Rejects values the engine cannot run with
    fn validate(&self) -> Result<(), String> {
        if self.board.width < 3 || self.board.height < 3 {
            return Err(format!(
                "Board must be at least 3x3, got {}x{}",
                self.board.width, self.board.height
            ));
        }
        // Two distinct starting cells need at least two interior cells
        if (self.board.width - 2) * (self.board.height - 2) < 2 {
            return Err("Board interior is too small for two players".to_string());
        }
        if self.search.depth == 0 {
            return Err("search.depth must be at least 1".to_string());
        }
        Ok(())
    }
}
