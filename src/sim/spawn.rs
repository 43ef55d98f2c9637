//! Entity factories
//!
//! Every random roll goes through [`RandomSource`] so runs can be replayed
//! from a seed and tests can script exact outcomes.

use rand::Rng;
use rand_pcg::Pcg32;

use super::state::{Boss, Direction, Egg, Eggnemy, Rect, World};
use crate::config::{BossSection, EggSection, EggnemySection};

/// Source of uniform random numbers in `[0, 1)`
pub trait RandomSource {
    fn next_f64(&mut self) -> f64;
}

impl RandomSource for Pcg32 {
    fn next_f64(&mut self) -> f64 {
        self.random::<f64>()
    }
}

/// Uniform integer in `[lo, hi)`; `lo` when the range is empty
pub fn random_in(rng: &mut impl RandomSource, lo: i32, hi: i32) -> i32 {
    if hi <= lo {
        return lo;
    }
    let span = f64::from(hi - lo);
    // Guard against sources that return exactly 1.0
    let offset = (rng.next_f64() * span).floor().min(span - 1.0);
    lo + offset as i32
}

/// Random top-left corner for a `width` x `height` rectangle inside the world
fn random_rect_in(world: &World, width: i32, height: i32, margin: i32, rng: &mut impl RandomSource) -> Rect {
    let x = random_in(rng, margin, world.width - width - margin);
    let y = random_in(rng, margin, world.height - height - margin);
    Rect::new(x, y, width, height).clamped_to(world.width, world.height)
}

/// Create the egg at a random spot with full health
pub fn create_egg(world: &World, template: &EggSection, rng: &mut impl RandomSource) -> Egg {
    Egg {
        rect: random_rect_in(world, template.width, template.height, 0, rng),
        hp: template.initial_hp,
        max_hp: template.initial_hp,
        direction: Direction::None,
        is_attacking: false,
        attack_range: template.attack_range,
    }
}

/// Create an eggnemy anywhere in the world. Every stat grows by `multiplier`.
pub fn create_random_eggnemy(
    world: &World,
    template: &EggnemySection,
    multiplier: u32,
    rng: &mut impl RandomSource,
) -> Eggnemy {
    let bonus = multiplier as i32;
    Eggnemy {
        rect: random_rect_in(world, template.width, template.height, 0, rng),
        hp: template.initial_hp + bonus,
        max_hp: template.initial_hp + bonus,
        speed: template.speed + bonus,
        attack_damage: template.attack_damage + bonus,
    }
}

/// Create a boss away from the world edges. Every stat grows by `multiplier`.
pub fn create_boss(world: &World, template: &BossSection, multiplier: u32, rng: &mut impl RandomSource) -> Boss {
    let bonus = multiplier as i32;
    Boss {
        rect: random_rect_in(world, template.width, template.height, template.spawn_margin, rng),
        hp: template.initial_hp + bonus,
        max_hp: template.initial_hp + bonus,
        speed: template.speed + bonus,
        attack_damage: template.attack_damage + bonus,
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use glam::IVec2;
    use rand::SeedableRng;

    /// Replays a fixed list of rolls, cycling when exhausted
    pub(crate) struct ScriptedRandom {
        rolls: Vec<f64>,
        next: usize,
    }

    impl ScriptedRandom {
        pub(crate) fn new(rolls: &[f64]) -> Self {
            Self {
                rolls: rolls.to_vec(),
                next: 0,
            }
        }
    }

    impl RandomSource for ScriptedRandom {
        fn next_f64(&mut self) -> f64 {
            let roll = self.rolls[self.next % self.rolls.len()];
            self.next += 1;
            roll
        }
    }

    fn world() -> World {
        World {
            width: 800,
            height: 600,
            center: IVec2::ZERO,
        }
    }

    #[test]
    fn test_random_in_bounds() {
        let mut rng = ScriptedRandom::new(&[0.0, 0.5, 0.999_999, 1.0]);
        assert_eq!(random_in(&mut rng, 0, 10), 0);
        assert_eq!(random_in(&mut rng, 0, 10), 5);
        assert_eq!(random_in(&mut rng, 0, 10), 9);
        assert_eq!(random_in(&mut rng, 0, 10), 9);
        assert_eq!(random_in(&mut rng, 4, 4), 4);
    }

    #[test]
    fn test_eggnemy_scales_with_multiplier() {
        let template = EggnemySection::default();
        let mut rng = ScriptedRandom::new(&[0.5]);

        let base = create_random_eggnemy(&world(), &template, 0, &mut rng);
        let scaled = create_random_eggnemy(&world(), &template, 3, &mut rng);

        assert_eq!(base.hp, template.initial_hp);
        assert_eq!(base.max_hp, base.hp);
        assert_eq!(scaled.hp, template.initial_hp + 3);
        assert_eq!(scaled.speed, template.speed + 3);
        assert_eq!(scaled.attack_damage, template.attack_damage + 3);
    }

    #[test]
    fn test_eggnemy_position_inside_world() {
        let template = EggnemySection::default();
        let mut rng = Pcg32::seed_from_u64(7);
        for _ in 0..500 {
            let e = create_random_eggnemy(&world(), &template, 0, &mut rng);
            assert!(e.rect.x >= 0 && e.rect.x < 800 - template.width);
            assert!(e.rect.y >= 0 && e.rect.y < 600 - template.height);
        }
    }

    #[test]
    fn test_boss_respects_margin() {
        let template = BossSection::default();
        let mut rng = ScriptedRandom::new(&[0.0, 0.999]);
        let boss = create_boss(&world(), &template, 1, &mut rng);

        assert_eq!(boss.rect.x, template.spawn_margin);
        assert!(boss.rect.y < 600 - template.height - template.spawn_margin);
        assert_eq!(boss.hp, template.initial_hp + 1);
    }

    #[test]
    fn test_egg_starts_idle_at_full_health() {
        let template = EggSection::default();
        let mut rng = Pcg32::seed_from_u64(1);
        let egg = create_egg(&world(), &template, &mut rng);

        assert_eq!(egg.hp, egg.max_hp);
        assert_eq!(egg.direction, Direction::None);
        assert!(!egg.is_attacking);
        assert_eq!(egg.rect.clamped_to(800, 600), egg.rect);
    }
}
