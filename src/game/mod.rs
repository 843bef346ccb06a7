//! Playing games with the engine.

pub mod display;
pub mod engine;
pub mod self_play;

pub use engine::{Engine, EngineConfig, EngineError};
pub use self_play::{new_game, play_game, GameSummary, Turn};
