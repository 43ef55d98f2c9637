//! Per-tick simulation step
//!
//! A tick runs a fixed sequence of steps. Each step takes the whole model
//! and returns the next one, so steps can be tested on their own.

use glam::IVec2;

use super::geometry::{center_of, is_touching, is_within_range};
use super::spawn::{RandomSource, create_boss, create_random_eggnemy, random_in};
use super::state::{Eggnemy, Model, Rect};
use crate::audio::SoundEffect;
use crate::leaderboard::format_time;

/// Most eggnemies spawned by a single roll
pub const MAX_SPAWN_BATCH: i32 = 3;

/// Advance the model by one timer tick at timestamp `now` (ms)
pub fn tick(mut model: Model, now: u64, rng: &mut impl RandomSource) -> Model {
    model.sound = None;

    if model.state.is_game_over {
        return model;
    }
    if model.state.is_choosing_egghancement {
        return update_elapsed_time(model, now);
    }

    let model = spawn_eggnemies(model, rng);
    let model = spawn_boss_if_needed(model, rng);
    let model = move_egg(model);
    if model.state.is_game_over {
        return model;
    }
    let model = recenter_world(model);
    let model = egg_attacks(model);
    if model.state.is_choosing_egghancement {
        return update_elapsed_time(model, now);
    }
    let model = move_eggnemies(model);
    let model = eggnemies_attack(model, now);
    update_elapsed_time(model, now)
}

/// Roll for a batch of 1..=3 new eggnemies, scaled by bosses defeated
pub fn spawn_eggnemies(mut model: Model, rng: &mut impl RandomSource) -> Model {
    if model.egg.is_none() {
        return model;
    }
    if rng.next_f64() >= model.settings.eggnemy_spawning_rate_per_tick {
        return model;
    }

    let count = 1 + random_in(rng, 0, MAX_SPAWN_BATCH);
    let multiplier = model.state.bosses_defeated;
    for _ in 0..count {
        let eggnemy = create_random_eggnemy(&model.world, &model.config.eggnemies, multiplier, rng);
        model.eggnemies.push(eggnemy);
    }
    log::debug!("Spawned {} eggnemies ({} alive)", count, model.eggnemies.len());

    model
}

/// Spawn the boss once enough eggnemies have fallen since the last one
pub fn spawn_boss_if_needed(mut model: Model, rng: &mut impl RandomSource) -> Model {
    let state = &model.state;
    if model.boss.is_some()
        || state.has_boss_already_spawned
        || state.eggnemies_till_next_boss < model.settings.boss_spawn_threshold
    {
        return model;
    }

    let boss = create_boss(&model.world, &model.config.boss, state.bosses_defeated, rng);
    log::info!(
        "Boss spawned at ({}, {}) with {} hp",
        boss.rect.x,
        boss.rect.y,
        boss.hp
    );
    model.boss = Some(boss);
    model.state.has_boss_already_spawned = true;
    model.state.eggnemies_till_next_boss = 0;
    model.sound = Some(SoundEffect::BossSpawned);

    model
}

/// Move the egg along its direction, clamped to the world.
/// A missing egg ends the game.
pub fn move_egg(mut model: Model) -> Model {
    let Some(egg) = model.egg.as_mut() else {
        if !model.state.is_game_over {
            log::info!(
                "Game over after {} ({} eggnemies defeated)",
                format_time(model.state.elapsed_time),
                model.state.defeated_eggnemies_count
            );
        }
        model.state.is_game_over = true;
        return model;
    };

    let target = egg.rect.pos() + egg.direction.unit() * model.egg_stats.speed;
    egg.rect = egg
        .rect
        .at(target)
        .clamped_to(model.world.width, model.world.height);

    model
}

/// Keep the camera centered on the egg
pub fn recenter_world(mut model: Model) -> Model {
    if let Some(egg) = &model.egg {
        model.world.center = center_of(&egg.rect);
    }
    model
}

/// Resolve the egg's attack against everything in range.
///
/// With enough banked experience the attack opens the egghancement menu
/// instead of dealing damage.
pub fn egg_attacks(mut model: Model) -> Model {
    let Some(egg) = &model.egg else {
        return model;
    };
    if !egg.is_attacking {
        return model;
    }

    let cost = model.egghancements.egghancement_cost;
    if cost > 0 && model.egg_stats.experience >= cost {
        log::debug!("Egghancement unlocked ({} xp)", model.egg_stats.experience);
        model.state.is_choosing_egghancement = true;
        model.sound = Some(SoundEffect::EgghancementUnlocked);
        return model;
    }

    let reach = egg.rect;
    let range = egg.attack_range;
    let damage = model.egg_stats.attack_damage;

    let before = model.eggnemies.len();
    model.eggnemies = std::mem::take(&mut model.eggnemies)
        .into_iter()
        .map(|mut eggnemy| {
            if is_within_range(&reach, range, &eggnemy.rect) {
                eggnemy.hp -= damage;
            }
            eggnemy
        })
        .filter(|eggnemy| eggnemy.hp > 0)
        .collect();
    let defeated = (before - model.eggnemies.len()) as u32;

    if defeated > 0 {
        model.state.defeated_eggnemies_count += defeated;
        model.state.eggnemies_till_next_boss += defeated;
        model.egg_stats.experience += defeated;
        log::debug!(
            "Defeated {} eggnemies (total {})",
            defeated,
            model.state.defeated_eggnemies_count
        );
    }

    if let Some(mut boss) = model.boss.take() {
        if is_within_range(&reach, range, &boss.rect) {
            boss.hp -= damage;
        }
        if boss.hp > 0 {
            model.boss = Some(boss);
        } else {
            model.state.bosses_defeated += 1;
            model.state.eggnemies_till_next_boss = 0;
            model.state.has_boss_already_spawned = false;
            model.sound = Some(SoundEffect::BossDefeated);
            log::info!("Boss defeated ({} so far)", model.state.bosses_defeated);
        }
    }

    model
}

/// One pursuit step from `from` toward `to`.
///
/// Each axis moves by the unit direction scaled by `speed`, with its
/// magnitude rounded up and capped at the remaining distance.
pub fn pursuit_step(from: IVec2, to: IVec2, speed: i32) -> IVec2 {
    let delta = to - from;
    let dir = delta.as_vec2().normalize_or_zero();
    let axis = |unit: f32, remaining: i32| -> i32 {
        let magnitude = ((unit.abs() * speed as f32).ceil() as i32).min(remaining.abs());
        magnitude * remaining.signum()
    };
    IVec2::new(axis(dir.x, delta.x), axis(dir.y, delta.y))
}

/// True if moving from `current` to `candidate` pushes into `other`.
/// Moves that keep or grow the distance are allowed so stacked entities
/// can drift apart.
fn blocks(current: &Rect, candidate: &Rect, other: &Rect) -> bool {
    if !is_touching(candidate, other) {
        return false;
    }
    let target = center_of(other);
    (center_of(candidate) - target).length_squared() < (center_of(current) - target).length_squared()
}

/// Step `mover` toward `target`, one axis at a time, skipping any axis
/// whose move would push into one of `obstacles`
fn pursue<'a>(
    mover: &Eggnemy,
    target: IVec2,
    obstacles: impl Iterator<Item = &'a Rect> + Clone,
    world_width: i32,
    world_height: i32,
) -> Rect {
    let step = pursuit_step(mover.rect.pos(), target, mover.speed);
    let mut rect = mover.rect;

    let moved_x = rect.at(IVec2::new(rect.x + step.x, rect.y));
    if !obstacles.clone().any(|o| blocks(&rect, &moved_x, o)) {
        rect = moved_x;
    }
    let moved_y = rect.at(IVec2::new(rect.x, rect.y + step.y));
    if !obstacles.clone().any(|o| blocks(&rect, &moved_y, o)) {
        rect = moved_y;
    }

    rect.clamped_to(world_width, world_height)
}

/// Move every eggnemy, then the boss, toward the egg
pub fn move_eggnemies(mut model: Model) -> Model {
    let Some(egg) = &model.egg else {
        return model;
    };
    let target = egg.rect.pos();
    let (width, height) = (model.world.width, model.world.height);

    for i in 0..model.eggnemies.len() {
        let boss_rect = model.boss.as_ref().map(|b| &b.rect);
        let others = model
            .eggnemies
            .iter()
            .enumerate()
            .filter(|&(j, _)| j != i)
            .map(|(_, e)| &e.rect)
            .chain(boss_rect);
        let rect = pursue(&model.eggnemies[i], target, others, width, height);
        model.eggnemies[i].rect = rect;
    }

    let boss_rect = model.boss.as_ref().map(|boss| {
        let others = model.eggnemies.iter().map(|e| &e.rect);
        pursue(boss, target, others, width, height)
    });
    if let (Some(boss), Some(rect)) = (model.boss.as_mut(), boss_rect) {
        boss.rect = rect;
    }

    model
}

/// Apply contact damage from everything touching the egg, at most once
/// per damage cooldown
pub fn eggnemies_attack(mut model: Model, now: u64) -> Model {
    let Some(egg) = model.egg.as_mut() else {
        return model;
    };
    if now.saturating_sub(model.state.last_damage_time) <= model.settings.damage_cooldown_ms {
        return model;
    }

    let attackers = model
        .eggnemies
        .iter()
        .chain(model.boss.as_ref())
        .filter(|e| is_touching(&egg.rect, &e.rect));

    let mut touching = false;
    let mut damage = 0;
    for attacker in attackers {
        touching = true;
        damage += attacker.attack_damage;
    }
    if !touching {
        return model;
    }

    egg.hp -= damage;
    model.state.last_damage_time = now;
    log::debug!("Egg took {} damage ({} hp left)", damage, egg.hp);

    if egg.hp <= 0 {
        log::info!("Egg defeated");
        model.egg = None;
        model.sound = Some(SoundEffect::EggDefeated);
    }

    model
}

/// Refresh the run clock; frozen once the game is over
pub fn update_elapsed_time(mut model: Model, now: u64) -> Model {
    if !model.state.is_game_over {
        model.state.elapsed_time = now.saturating_sub(model.state.start_time);
    }
    model
}
