//! Input dispatch
//!
//! Routes each discrete event to the matching transform for the current
//! phase. Every key string is accepted; unknown keys leave the model as is.

use glam::IVec2;
use serde::{Deserialize, Serialize};

use super::geometry::center_of;
use super::spawn::{RandomSource, create_egg, create_random_eggnemy};
use super::state::{Direction, Egghancements, EggStats, GamePhase, GameSettings, GameState, Model, World};
use super::tick::tick;
use crate::config::GameConfig;
use crate::leaderboard::Leaderboard;

/// Events delivered by the host, in arrival order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Msg {
    /// Key pressed at timestamp `now` (ms)
    KeyDown { key: String, now: u64 },
    /// Key released
    KeyUp { key: String },
    /// Timer fired at timestamp `now` (ms)
    Tick { now: u64 },
    /// Pointer input, accepted but unused
    MouseDown { x: f32, y: f32 },
    MouseUp { x: f32, y: f32 },
}

impl Msg {
    pub fn key_down(key: &str, now: u64) -> Self {
        Msg::KeyDown {
            key: key.to_string(),
            now,
        }
    }

    pub fn key_up(key: &str) -> Self {
        Msg::KeyUp {
            key: key.to_string(),
        }
    }
}

/// Permanent stat upgrades offered by the menu
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EgghancementKind {
    Hp,
    AttackDamage,
    Speed,
}

impl EgghancementKind {
    /// Menu order, matching keys `1`..`3`
    pub const ALL: [EgghancementKind; 3] = [
        EgghancementKind::Hp,
        EgghancementKind::AttackDamage,
        EgghancementKind::Speed,
    ];

    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "1" => Some(EgghancementKind::Hp),
            "2" => Some(EgghancementKind::AttackDamage),
            "3" => Some(EgghancementKind::Speed),
            _ => None,
        }
    }
}

/// Key that toggles the attack
pub const ATTACK_KEY: &str = "l";
/// Key that restarts after a game over
pub const RESTART_KEY: &str = "r";

/// Movement direction bound to `key`, if any
pub fn direction_for_key(key: &str) -> Option<Direction> {
    match key {
        "w" | "ArrowUp" => Some(Direction::North),
        "s" | "ArrowDown" => Some(Direction::South),
        "a" | "ArrowLeft" => Some(Direction::West),
        "d" | "ArrowRight" => Some(Direction::East),
        _ => None,
    }
}

/// Build the model for a fresh run starting at `now`
pub fn new_game(config: &GameConfig, now: u64, leaderboard: Leaderboard, rng: &mut impl RandomSource) -> Model {
    let mut world = World {
        width: config.game.world.width,
        height: config.game.world.height,
        center: IVec2::ZERO,
    };

    let egg = create_egg(&world, &config.egg, rng);
    world.center = center_of(&egg.rect);

    let eggnemies = (0..config.eggnemies.initial_count)
        .map(|_| create_random_eggnemy(&world, &config.eggnemies, 0, rng))
        .collect();

    log::info!(
        "New game: {}x{} world, {} eggnemies",
        world.width,
        world.height,
        config.eggnemies.initial_count
    );

    Model {
        world,
        egg: Some(egg),
        eggnemies,
        boss: None,
        settings: GameSettings::from(config),
        state: GameState::new(now, leaderboard),
        egghancements: Egghancements::from(config),
        egg_stats: EggStats::from(config),
        sound: None,
        config: config.clone(),
    }
}

/// Start over after a game over, recording the finished run
pub fn restart(model: Model, now: u64, rng: &mut impl RandomSource) -> Model {
    let leaderboard = model.state.leaderboard.with_time(model.state.elapsed_time);
    new_game(&model.config, now, leaderboard, rng)
}

/// Apply an upgrade and pay for it.
///
/// The menu stays open while another upgrade is still affordable.
pub fn choose_egghancement(mut model: Model, kind: EgghancementKind) -> Model {
    let cost = model.egghancements.egghancement_cost;
    let Some(remaining) = model.egg_stats.experience.checked_sub(cost) else {
        return model;
    };

    let boosts = model.egghancements;
    match kind {
        EgghancementKind::Hp => {
            if let Some(egg) = model.egg.as_mut() {
                egg.hp += boosts.hp_up;
                egg.max_hp += boosts.hp_up;
            }
        }
        EgghancementKind::AttackDamage => model.egg_stats.attack_damage += boosts.attack_damage_up,
        EgghancementKind::Speed => model.egg_stats.speed += boosts.speed_up,
    }

    model.egg_stats.experience = remaining;
    model.state.is_choosing_egghancement = cost > 0 && remaining >= cost;
    log::debug!("Chose {:?} egghancement ({} xp left)", kind, remaining);

    model
}

fn key_down(mut model: Model, key: &str, now: u64, rng: &mut impl RandomSource) -> Model {
    match model.phase() {
        GamePhase::GameOver => {
            if key == RESTART_KEY {
                restart(model, now, rng)
            } else {
                model
            }
        }
        GamePhase::ChoosingEgghancement => match EgghancementKind::from_key(key) {
            Some(kind) => choose_egghancement(model, kind),
            None => model,
        },
        GamePhase::Playing => {
            if let Some(egg) = model.egg.as_mut() {
                if let Some(direction) = direction_for_key(key) {
                    egg.direction = direction;
                } else if key == ATTACK_KEY {
                    egg.is_attacking = true;
                }
            }
            model
        }
    }
}

fn key_up(mut model: Model, key: &str) -> Model {
    if let Some(egg) = model.egg.as_mut() {
        if let Some(direction) = direction_for_key(key) {
            // Only the key driving the current direction stops the egg
            if egg.direction == direction {
                egg.direction = Direction::None;
            }
        } else if key == ATTACK_KEY {
            egg.is_attacking = false;
        }
    }
    model
}

/// Process one event and return the next model
pub fn update(msg: &Msg, model: Model, rng: &mut impl RandomSource) -> Model {
    match msg {
        Msg::KeyDown { key, now } => key_down(model, key, *now, rng),
        Msg::KeyUp { key } => key_up(model, key),
        Msg::Tick { now } => tick(model, *now, rng),
        Msg::MouseDown { .. } | Msg::MouseUp { .. } => model,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::spawn::tests::ScriptedRandom;
    use proptest::prelude::*;

    fn rng() -> ScriptedRandom {
        ScriptedRandom::new(&[0.99, 0.25, 0.5, 0.75])
    }

    fn model() -> Model {
        new_game(&GameConfig::default(), 1_000, Leaderboard::new(), &mut rng())
    }

    fn direction(model: &Model) -> Direction {
        model.egg.as_ref().unwrap().direction
    }

    #[test]
    fn test_new_game_matches_config() {
        let config = GameConfig::default();
        let model = model();
        let egg = model.egg.as_ref().unwrap();

        assert_eq!(model.world.width, config.game.world.width);
        assert_eq!(egg.hp, config.egg.initial_hp);
        assert_eq!(egg.max_hp, config.egg.initial_hp);
        assert_eq!(egg.attack_range, config.egg.attack_range);
        assert_eq!(model.eggnemies.len(), config.eggnemies.initial_count);
        assert!(model.eggnemies.iter().all(|e| e.hp == config.eggnemies.initial_hp));
        assert!(model.boss.is_none());
        assert_eq!(model.state.start_time, 1_000);
        assert_eq!(model.state.elapsed_time, 0);
        assert!(model.state.leaderboard.is_empty());
        assert_eq!(model.settings.boss_spawn_threshold, config.game.boss_spawn_threshold);
        assert_eq!(model.egghancements.egghancement_cost, config.egghancements.cost);
        assert_eq!(model.world.center, center_of(&egg.rect));
        assert_eq!(model.phase(), GamePhase::Playing);
    }

    #[test]
    fn test_key_down_up_resets_direction() {
        for (key, expected) in [
            ("w", Direction::North),
            ("s", Direction::South),
            ("a", Direction::West),
            ("d", Direction::East),
            ("ArrowUp", Direction::North),
            ("ArrowDown", Direction::South),
            ("ArrowLeft", Direction::West),
            ("ArrowRight", Direction::East),
        ] {
            let m = update(&Msg::key_down(key, 0), model(), &mut rng());
            assert_eq!(direction(&m), expected, "key {key}");
            let m = update(&Msg::key_up(key), m, &mut rng());
            assert_eq!(direction(&m), Direction::None, "key {key}");
        }
    }

    #[test]
    fn test_unrelated_key_up_keeps_direction() {
        let m = update(&Msg::key_down("w", 0), model(), &mut rng());
        let m = update(&Msg::key_up("s"), m, &mut rng());
        assert_eq!(direction(&m), Direction::North);
    }

    #[test]
    fn test_attack_key_toggles() {
        let m = update(&Msg::key_down("l", 0), model(), &mut rng());
        assert!(m.egg.as_ref().unwrap().is_attacking);
        let m = update(&Msg::key_up("l"), m, &mut rng());
        assert!(!m.egg.as_ref().unwrap().is_attacking);
    }

    #[test]
    fn test_unknown_keys_and_mouse_are_inert() {
        let before = model();
        let m = update(&Msg::key_down("q", 0), before.clone(), &mut rng());
        let m = update(&Msg::key_up("Escape"), m, &mut rng());
        let m = update(&Msg::MouseDown { x: 1.0, y: 2.0 }, m, &mut rng());
        let m = update(&Msg::MouseUp { x: 1.0, y: 2.0 }, m, &mut rng());
        assert_eq!(m, before);
    }

    #[test]
    fn test_restart_only_when_game_over() {
        let m = update(&Msg::key_down("r", 5_000), model(), &mut rng());
        assert_eq!(m.state.start_time, 1_000);
        assert!(!m.state.is_game_over);
    }

    #[test]
    fn test_restart_after_game_over() {
        let mut before = model();
        before.egg = None;
        before.boss = before.eggnemies.first().cloned();
        before.state.is_game_over = true;
        before.state.elapsed_time = 65_000;
        before.state.defeated_eggnemies_count = 12;
        before.state.has_boss_already_spawned = true;
        before.egg_stats.attack_damage = 9;

        let m = update(&Msg::key_down("r", 90_000), before, &mut rng());
        let egg = m.egg.as_ref().unwrap();
        assert!(!m.state.is_game_over);
        assert_eq!(egg.direction, Direction::None);
        assert!(!egg.is_attacking);
        assert_eq!(m.eggnemies.len(), 5);
        assert!(m.boss.is_none());
        assert_eq!(m.state.elapsed_time, 0);
        assert_eq!(m.state.start_time, 90_000);
        assert_eq!(m.state.defeated_eggnemies_count, 0);
        assert!(!m.state.has_boss_already_spawned);
        assert_eq!(m.egg_stats.attack_damage, GameConfig::default().egg.attack_damage);
        assert_eq!(m.state.leaderboard.formatted(), vec!["01:05"]);
    }

    #[test]
    fn test_leaderboard_carries_across_restarts() {
        let mut m = model();
        for elapsed in [30_000, 90_000, 10_000, 60_000] {
            m.state.is_game_over = true;
            m.state.elapsed_time = elapsed;
            m = update(&Msg::key_down("r", 0), m, &mut rng());
        }
        assert_eq!(m.state.leaderboard.formatted(), vec!["01:30", "01:00", "00:30"]);
    }

    fn choosing(experience: u32) -> Model {
        let mut m = model();
        m.state.is_choosing_egghancement = true;
        m.egg_stats.experience = experience;
        m.egg_stats.attack_damage = 1;
        m.egg_stats.speed = 1;
        m.egghancements = Egghancements {
            hp_up: 5,
            speed_up: 1,
            attack_damage_up: 1,
            egghancement_cost: 5,
        };
        if let Some(egg) = m.egg.as_mut() {
            egg.hp = 5;
            egg.max_hp = 5;
        }
        m
    }

    #[test]
    fn test_hp_egghancement() {
        let m = update(&Msg::key_down("1", 0), choosing(10), &mut rng());
        let egg = m.egg.as_ref().unwrap();
        assert_eq!(egg.hp, 10);
        assert_eq!(egg.max_hp, 10);
        assert_eq!(m.egg_stats.experience, 5);
        // Another upgrade is still affordable
        assert!(m.state.is_choosing_egghancement);
    }

    #[test]
    fn test_attack_egghancement() {
        let m = update(&Msg::key_down("2", 0), choosing(5), &mut rng());
        assert_eq!(m.egg_stats.attack_damage, 2);
        assert_eq!(m.egg_stats.experience, 0);
        assert!(!m.state.is_choosing_egghancement);
    }

    #[test]
    fn test_speed_egghancement() {
        let m = update(&Msg::key_down("3", 0), choosing(7), &mut rng());
        assert_eq!(m.egg_stats.speed, 2);
        assert_eq!(m.egg_stats.experience, 2);
        assert!(!m.state.is_choosing_egghancement);
    }

    #[test]
    fn test_other_keys_ignored_while_choosing() {
        let before = choosing(10);
        let m = update(&Msg::key_down("w", 0), before.clone(), &mut rng());
        let m = update(&Msg::key_down("4", 0), m, &mut rng());
        let m = update(&Msg::key_down("r", 0), m, &mut rng());
        assert_eq!(m, before);
    }

    #[test]
    fn test_unaffordable_egghancement_is_noop() {
        let before = choosing(3);
        let m = update(&Msg::key_down("2", 0), before.clone(), &mut rng());
        assert_eq!(m, before);
    }

    #[test]
    fn test_tick_routes_to_simulation() {
        let m = update(&Msg::Tick { now: 4_000 }, model(), &mut rng());
        assert_eq!(m.state.elapsed_time, 3_000);
    }

    proptest! {
        #[test]
        fn prop_direction_follows_last_matching_key(
            keys in proptest::collection::vec((0usize..4, any::<bool>()), 0..30)
        ) {
            let names = ["w", "s", "a", "d"];
            let mut m = model();
            let mut expected = Direction::None;
            for (k, down) in keys {
                let key = names[k];
                let dir = direction_for_key(key).unwrap();
                if down {
                    m = update(&Msg::key_down(key, 0), m, &mut rng());
                    expected = dir;
                } else {
                    m = update(&Msg::key_up(key), m, &mut rng());
                    if expected == dir {
                        expected = Direction::None;
                    }
                }
                prop_assert_eq!(direction(&m), expected);
            }
        }

        #[test]
        fn prop_experience_never_negative(experience in 5u32..100, picks in proptest::collection::vec(1u32..4, 0..30)) {
            let mut m = choosing(experience);
            for pick in picks {
                let before = m.egg_stats.experience;
                m = update(&Msg::key_down(&pick.to_string(), 0), m, &mut rng());
                if before >= 5 {
                    prop_assert_eq!(m.egg_stats.experience, before - 5);
                } else {
                    prop_assert_eq!(m.egg_stats.experience, before);
                }
                if m.state.is_choosing_egghancement {
                    prop_assert!(m.egg_stats.experience >= 5);
                }
            }
        }
    }
}
