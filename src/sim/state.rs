//! Game state and core simulation types
//!
//! `Model` is the single value threaded through every simulation step. Steps
//! take it by value and hand back the next one; nothing else holds a
//! reference to it between events.

use glam::IVec2;
use serde::{Deserialize, Serialize};

use crate::audio::SoundEffect;
use crate::config::GameConfig;
use crate::leaderboard::Leaderboard;

/// Axis-aligned rectangle, positioned by its top-left corner
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Rect {
    pub fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Top-left corner
    pub fn pos(&self) -> IVec2 {
        IVec2::new(self.x, self.y)
    }

    /// Same size, moved to `pos`
    pub fn at(&self, pos: IVec2) -> Self {
        Self {
            x: pos.x,
            y: pos.y,
            ..*self
        }
    }

    /// Move the rectangle so it lies fully inside a `width` x `height` area
    pub fn clamped_to(&self, width: i32, height: i32) -> Self {
        let max_x = (width - self.width).max(0);
        let max_y = (height - self.height).max(0);
        Self {
            x: self.x.clamp(0, max_x),
            y: self.y.clamp(0, max_y),
            ..*self
        }
    }
}

/// Movement intent of the egg
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Direction {
    North,
    South,
    East,
    West,
    #[default]
    None,
}

impl Direction {
    /// Unit step in screen coordinates (y grows downward)
    pub fn unit(self) -> IVec2 {
        match self {
            Direction::North => IVec2::new(0, -1),
            Direction::South => IVec2::new(0, 1),
            Direction::East => IVec2::new(1, 0),
            Direction::West => IVec2::new(-1, 0),
            Direction::None => IVec2::ZERO,
        }
    }
}

/// The player-controlled egg
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Egg {
    pub rect: Rect,
    pub hp: i32,
    pub max_hp: i32,
    pub direction: Direction,
    /// Held while the attack key is down
    pub is_attacking: bool,
    /// Reach of the egg's attack, measured between top-left corners
    pub attack_range: f32,
}

/// Upgradable player stats, kept apart from the egg entity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EggStats {
    pub speed: i32,
    pub attack_damage: i32,
    /// Banked kills, spent on egghancements
    pub experience: u32,
}

/// An enemy that chases the egg
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Eggnemy {
    pub rect: Rect,
    pub hp: i32,
    pub max_hp: i32,
    pub speed: i32,
    pub attack_damage: i32,
}

/// The boss shares the eggnemy shape; at most one exists at a time
pub type Boss = Eggnemy;

/// World bounds and the camera focus
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct World {
    pub width: i32,
    pub height: i32,
    /// World-space point the camera is centered on
    pub center: IVec2,
}

/// Tunable rules that may differ between runs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameSettings {
    pub boss_spawn_threshold: u32,
    pub eggnemy_spawning_rate_per_tick: f64,
    pub damage_cooldown_ms: u64,
    pub game_over_text: String,
}

/// Upgrade catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Egghancements {
    pub hp_up: i32,
    pub speed_up: i32,
    pub attack_damage_up: i32,
    /// Experience spent per upgrade
    pub egghancement_cost: u32,
}

/// Flags and counters for the current run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameState {
    /// Timestamp (ms) the run started
    pub start_time: u64,
    /// Run duration (ms), frozen once the game is over
    pub elapsed_time: u64,
    /// Timestamp (ms) the egg last took contact damage
    pub last_damage_time: u64,
    pub is_game_over: bool,
    pub has_boss_already_spawned: bool,
    /// Difficulty driver for spawned entities
    pub bosses_defeated: u32,
    /// Kills since the last boss fight
    pub eggnemies_till_next_boss: u32,
    /// Kills over the whole run
    pub defeated_eggnemies_count: u32,
    pub leaderboard: Leaderboard,
    /// Upgrade menu is open and simulation is paused
    pub is_choosing_egghancement: bool,
}

impl GameState {
    /// Fresh counters for a run starting at `now`, keeping the leaderboard
    pub fn new(now: u64, leaderboard: Leaderboard) -> Self {
        Self {
            start_time: now,
            elapsed_time: 0,
            last_damage_time: now,
            is_game_over: false,
            has_boss_already_spawned: false,
            bosses_defeated: 0,
            eggnemies_till_next_boss: 0,
            defeated_eggnemies_count: 0,
            leaderboard,
            is_choosing_egghancement: false,
        }
    }
}

/// Which input mode the dispatcher is in, derived from the state flags
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    Playing,
    ChoosingEgghancement,
    GameOver,
}

/// Complete game model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Model {
    pub world: World,
    /// `None` once the egg has been defeated
    pub egg: Option<Egg>,
    pub eggnemies: Vec<Eggnemy>,
    pub boss: Option<Boss>,
    pub settings: GameSettings,
    pub state: GameState,
    pub egghancements: Egghancements,
    pub egg_stats: EggStats,
    /// Cue for the audio layer; written by the simulation, never read by it
    pub sound: Option<SoundEffect>,
    /// Configuration snapshot used for spawning and restart
    pub config: GameConfig,
}

impl Model {
    pub fn phase(&self) -> GamePhase {
        if self.state.is_game_over {
            GamePhase::GameOver
        } else if self.state.is_choosing_egghancement {
            GamePhase::ChoosingEgghancement
        } else {
            GamePhase::Playing
        }
    }
}

impl From<&GameConfig> for GameSettings {
    fn from(config: &GameConfig) -> Self {
        Self {
            boss_spawn_threshold: config.game.boss_spawn_threshold,
            eggnemy_spawning_rate_per_tick: config.game.eggnemy_spawning_rate_per_tick,
            damage_cooldown_ms: config.game.damage_cooldown_ms,
            game_over_text: config.game.game_over_text.clone(),
        }
    }
}

impl From<&GameConfig> for Egghancements {
    fn from(config: &GameConfig) -> Self {
        Self {
            hp_up: config.egghancements.hp_up,
            speed_up: config.egghancements.speed_up,
            attack_damage_up: config.egghancements.attack_damage_up,
            egghancement_cost: config.egghancements.cost,
        }
    }
}

impl From<&GameConfig> for EggStats {
    fn from(config: &GameConfig) -> Self {
        Self {
            speed: config.egg.speed,
            attack_damage: config.egg.attack_damage,
            experience: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rect_clamp() {
        let r = Rect::new(-5, 700, 20, 20).clamped_to(800, 600);
        assert_eq!((r.x, r.y), (0, 580));

        let inside = Rect::new(10, 10, 20, 20);
        assert_eq!(inside.clamped_to(800, 600), inside);
    }

    #[test]
    fn test_direction_units() {
        assert_eq!(Direction::North.unit(), IVec2::new(0, -1));
        assert_eq!(Direction::East.unit(), IVec2::new(1, 0));
        assert_eq!(Direction::default().unit(), IVec2::ZERO);
    }
}
