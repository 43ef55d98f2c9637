//! Eggnemies - a top-down egg survival game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (movement, combat, spawning, progression)
//! - `config`: Static tuning loaded at startup
//! - `leaderboard`: Best survival times across runs
//! - `audio`: Sound cues emitted by the simulation
//! - `hud`: Read-only view helpers for a renderer

pub mod audio;
pub mod config;
pub mod hud;
pub mod leaderboard;
pub mod sim;

pub use config::{ConfigError, GameConfig};
pub use leaderboard::Leaderboard;
pub use sim::{Model, Msg, new_game, update};
