// Library exports for the Tron decision engine
// This allows the server, the headless runner and the replay tool to share the core logic

pub mod board;
pub mod config;
pub mod connectivity;
pub mod debug_logger;
pub mod evaluator;
pub mod game;
pub mod movegen;
pub mod replay;
pub mod search;
pub mod simple_profiler;
pub mod types;
