//! Eggnemies headless runner
//!
//! Drives the simulation with a simple autopilot and logs the outcome.
//! Usage: `eggnemies [settings.json] [runs] [seed]`

use eggnemies::GameConfig;
use eggnemies::audio::{LogSink, dispatch_sound};
use eggnemies::hud;
use eggnemies::leaderboard::Leaderboard;
use eggnemies::sim::{Direction, GamePhase, Model, Msg, new_game, update};
use rand::SeedableRng;
use rand_pcg::Pcg32;

/// Ticks after which a single run is abandoned
const MAX_TICKS_PER_RUN: u64 = 30 * 60 * 20;

/// Key to press for each movement direction
fn key_for(direction: Direction) -> Option<&'static str> {
    match direction {
        Direction::North => Some("w"),
        Direction::South => Some("s"),
        Direction::West => Some("a"),
        Direction::East => Some("d"),
        Direction::None => None,
    }
}

/// Head for the nearest foe along its dominant axis
fn autopilot_direction(model: &Model) -> Direction {
    let Some(egg) = &model.egg else {
        return Direction::None;
    };
    let here = egg.rect.pos();
    let nearest = model
        .eggnemies
        .iter()
        .chain(model.boss.as_ref())
        .map(|e| e.rect.pos() - here)
        .min_by_key(|d| d.length_squared());

    match nearest {
        Some(d) if d.x.abs() <= 2 && d.y.abs() <= 2 => Direction::None,
        Some(d) if d.x.abs() >= d.y.abs() => {
            if d.x > 0 {
                Direction::East
            } else {
                Direction::West
            }
        }
        Some(d) => {
            if d.y > 0 {
                Direction::South
            } else {
                Direction::North
            }
        }
        None => Direction::None,
    }
}

/// Key events that steer the egg from its current direction to `want`
fn steer(model: &Model, want: Direction, now: u64) -> Vec<Msg> {
    let Some(egg) = &model.egg else {
        return Vec::new();
    };
    if egg.direction == want {
        return Vec::new();
    }
    let mut msgs = Vec::new();
    if let Some(key) = key_for(egg.direction) {
        msgs.push(Msg::key_up(key));
    }
    if let Some(key) = key_for(want) {
        msgs.push(Msg::key_down(key, now));
    }
    msgs
}

fn main() {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let config = match args.next() {
        Some(path) => GameConfig::load_or_default(path),
        None => GameConfig::default(),
    };
    let runs: u32 = args.next().and_then(|s| s.parse().ok()).unwrap_or(3);
    let seed: u64 = args.next().and_then(|s| s.parse().ok()).unwrap_or(12345);

    log::info!("Eggnemies (headless) starting: {} runs, seed {}", runs, seed);

    let mut rng = Pcg32::seed_from_u64(seed);
    let mut sink = LogSink::new();
    let step_ms = config.tick_interval_ms();

    let mut now = 0;
    let mut model = new_game(&config, now, Leaderboard::new(), &mut rng);
    let mut completed = 0;
    let mut run_ticks = 0;
    let mut upgrade_pick = 0;

    model = update(&Msg::key_down("l", now), model, &mut rng);

    while completed < runs {
        now += step_ms;
        run_ticks += 1;

        match model.phase() {
            GamePhase::GameOver => {
                for line in hud::game_over_lines(&model) {
                    log::info!("{}", line);
                }
                completed += 1;
                run_ticks = 0;
                model = update(&Msg::key_down("r", now), model, &mut rng);
                model = update(&Msg::key_down("l", now), model, &mut rng);
                continue;
            }
            GamePhase::ChoosingEgghancement => {
                let key = (upgrade_pick % 3 + 1).to_string();
                upgrade_pick += 1;
                model = update(&Msg::key_down(&key, now), model, &mut rng);
            }
            GamePhase::Playing => {
                let want = autopilot_direction(&model);
                for msg in steer(&model, want, now) {
                    model = update(&msg, model, &mut rng);
                }
            }
        }

        model = update(&Msg::Tick { now }, model, &mut rng);
        dispatch_sound(&mut model, &mut sink);

        if run_ticks >= MAX_TICKS_PER_RUN {
            log::warn!("Run abandoned after {} ticks", run_ticks);
            break;
        }
    }

    for line in hud::leaderboard_lines(&model) {
        log::info!("{}", line);
    }
    log::info!("{} sound cues played", sink.played().len());
}
