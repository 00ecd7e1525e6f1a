// HTTP handler bindings for the Tron engine control surface
//
// This module provides thin wrapper functions that bind Rocket HTTP routes
// to the Game's core operations. Handlers are responsible for:
// - Extracting the shared arena from Rocket's managed state
// - Running CPU-bound turns off the async executor
// - Serializing snapshots and turn reports

use log::error;
use parking_lot::Mutex;
use rocket::http::Status;
use rocket::serde::json::Json;
use serde_json::{json, Value};
use std::sync::Arc;

use tron_engine::config::Config;
use tron_engine::debug_logger::DebugLogger;
use tron_engine::game::{Game, GameSnapshot};

/// State shared by all routes: the single running game and its settings
pub struct Arena {
    pub game: Arc<Mutex<Game>>,
    pub config: Config,
    pub logger: DebugLogger,
}

impl Arena {
    pub fn new(game: Game, config: Config, logger: DebugLogger) -> Self {
        Arena {
            game: Arc::new(Mutex::new(game)),
            config,
            logger,
        }
    }
}

/// GET / endpoint
/// Returns engine metadata
#[get("/")]
pub fn index(arena: &rocket::State<Arena>) -> Json<Value> {
    Json(json!({
        "name": "tron-engine",
        "version": env!("CARGO_PKG_VERSION"),
        "width": arena.config.board.width,
        "height": arena.config.board.height,
        "search_depth": arena.config.search.depth,
    }))
}

/// GET /state endpoint
/// Returns the grid, both players and the current outcome
#[get("/state")]
pub fn state(arena: &rocket::State<Arena>) -> Json<GameSnapshot> {
    Json(arena.game.lock().snapshot())
}

/// POST /turn endpoint
/// Plays one turn for both players; a no-op once the game is decided
#[post("/turn")]
pub async fn turn(arena: &rocket::State<Arena>) -> Result<Json<Value>, Status> {
    let game = arena.game.clone();

    let played = tokio::task::spawn_blocking(move || {
        let mut game = game.lock();
        let before = game.snapshot();
        game.run_turn().map(|report| (before, report, game.snapshot()))
    })
    .await
    .map_err(|e| {
        error!("Turn task panicked: {}", e);
        Status::InternalServerError
    })?;

    let (before, report, after) = played.map_err(|e| {
        error!("Turn failed: {}", e);
        Status::InternalServerError
    })?;

    arena.logger.log_turn(before, &report);

    Ok(Json(json!({ "report": report, "state": after })))
}

/// POST /reset endpoint
/// Starts a fresh game with random spawn cells and clears the debug log
#[post("/reset")]
pub async fn reset(arena: &rocket::State<Arena>) -> Result<Json<GameSnapshot>, Status> {
    let game = Game::with_random_starts(&arena.config, &mut rand::rng()).map_err(|e| {
        error!("Failed to start new game: {}", e);
        Status::InternalServerError
    })?;

    arena.logger.start_new_game().await;

    let snapshot = game.snapshot();
    *arena.game.lock() = game;

    Ok(Json(snapshot))
}
