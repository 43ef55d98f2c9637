//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Time comes from event timestamps only
//! - Randomness comes from an injected `RandomSource` only
//! - No rendering, audio or platform dependencies

pub mod geometry;
pub mod spawn;
pub mod state;
pub mod tick;
pub mod update;

pub use geometry::{center_of, is_touching, is_within_range};
pub use spawn::{RandomSource, create_boss, create_egg, create_random_eggnemy};
pub use state::{
    Boss, Direction, Egg, EggStats, Egghancements, Eggnemy, GamePhase, GameSettings, GameState, Model, Rect, World,
};
pub use tick::tick;
pub use update::{EgghancementKind, Msg, choose_egghancement, new_game, restart, update};
