//! Game configuration
//!
//! Static tuning loaded once at startup. The simulation core receives a
//! snapshot of it through `new_game` and never reads it again.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while loading a configuration file
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid config JSON: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Width/height pair
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dimensions {
    pub width: i32,
    pub height: i32,
}

/// Global game rules
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameSection {
    /// Timer ticks per second
    pub fps: u32,
    /// Visible viewport
    pub screen: Dimensions,
    /// Playable world (larger than the screen)
    pub world: Dimensions,
    /// Eggnemies defeated since the last boss that trigger a new boss
    pub boss_spawn_threshold: u32,
    /// Chance per tick that a batch of eggnemies spawns
    pub eggnemy_spawning_rate_per_tick: f64,
    /// Minimum gap between two contact-damage events
    pub damage_cooldown_ms: u64,
    /// Shown on the game over screen
    pub game_over_text: String,
}

impl Default for GameSection {
    fn default() -> Self {
        Self {
            fps: 30,
            screen: Dimensions {
                width: 800,
                height: 600,
            },
            world: Dimensions {
                width: 1600,
                height: 1200,
            },
            boss_spawn_threshold: 10,
            eggnemy_spawning_rate_per_tick: 0.02,
            damage_cooldown_ms: 1000,
            game_over_text: "Game Over".to_string(),
        }
    }
}

/// Player template
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EggSection {
    pub width: i32,
    pub height: i32,
    pub initial_hp: i32,
    pub attack_range: f32,
    pub speed: i32,
    pub attack_damage: i32,
}

impl Default for EggSection {
    fn default() -> Self {
        Self {
            width: 30,
            height: 40,
            initial_hp: 20,
            attack_range: 50.0,
            speed: 5,
            attack_damage: 1,
        }
    }
}

/// Base enemy template (before difficulty scaling)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EggnemySection {
    pub width: i32,
    pub height: i32,
    pub initial_hp: i32,
    pub speed: i32,
    pub attack_damage: i32,
    /// Eggnemies present at the start of every run
    pub initial_count: usize,
}

impl Default for EggnemySection {
    fn default() -> Self {
        Self {
            width: 20,
            height: 20,
            initial_hp: 3,
            speed: 1,
            attack_damage: 1,
            initial_count: 5,
        }
    }
}

/// Boss template (before difficulty scaling)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BossSection {
    pub width: i32,
    pub height: i32,
    pub initial_hp: i32,
    pub speed: i32,
    pub attack_damage: i32,
    /// Keeps the boss away from the world edges when it spawns
    pub spawn_margin: i32,
}

impl Default for BossSection {
    fn default() -> Self {
        Self {
            width: 60,
            height: 60,
            initial_hp: 30,
            speed: 2,
            attack_damage: 3,
            spawn_margin: 50,
        }
    }
}

/// Upgrade magnitudes and their price in experience
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EgghancementSection {
    pub hp_up: i32,
    pub speed_up: i32,
    pub attack_damage_up: i32,
    pub cost: u32,
}

impl Default for EgghancementSection {
    fn default() -> Self {
        Self {
            hp_up: 5,
            speed_up: 1,
            attack_damage_up: 1,
            cost: 5,
        }
    }
}

/// Complete game configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub game: GameSection,
    pub egg: EggSection,
    pub eggnemies: EggnemySection,
    pub boss: BossSection,
    pub egghancements: EgghancementSection,
}

impl GameConfig {
    /// Parse a configuration from JSON. Missing sections and fields keep
    /// their defaults.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config = serde_json::from_str(json)?;
        Ok(config)
    }

    /// Load a configuration file from disk
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let config = Self::from_json_str(&json)?;
        log::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Load a configuration file, falling back to defaults on any error
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        match Self::load(path.as_ref()) {
            Ok(config) => config,
            Err(e) => {
                log::warn!("Using default config ({e})");
                Self::default()
            }
        }
    }

    /// Timer period for the tick source, derived from `fps`
    pub fn tick_interval_ms(&self) -> u64 {
        1000 / u64::from(self.game.fps.max(1))
    }
}
