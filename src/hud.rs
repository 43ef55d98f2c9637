//! HUD view model
//!
//! Pure helpers a renderer uses to turn a `Model` snapshot into screen
//! space and text. Nothing here feeds back into the simulation.

use glam::IVec2;

use crate::config::Dimensions;
use crate::leaderboard::format_time;
use crate::sim::{EgghancementKind, Eggnemy, Model, Rect, center_of};

/// Vertical gap between an entity and its hp label
pub const HP_LABEL_GAP: i32 = 8;

/// A line of text anchored at a screen or world position
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Label {
    pub text: String,
    pub pos: IVec2,
}

/// Offset to add to world coordinates so the camera center lands in the
/// middle of the screen
pub fn camera_offset(screen: Dimensions, world_center: IVec2) -> IVec2 {
    IVec2::new(screen.width / 2, screen.height / 2) - world_center
}

/// Translate a world-space rectangle into screen space
pub fn to_screen(rect: &Rect, offset: IVec2) -> Rect {
    rect.at(rect.pos() + offset)
}

/// `hp/max` label centered above `rect`
pub fn hp_label(rect: &Rect, hp: i32, max_hp: i32) -> Label {
    Label {
        text: format!("{hp}/{max_hp}"),
        pos: IVec2::new(center_of(rect).x, rect.y - HP_LABEL_GAP),
    }
}

/// Labels for the egg (if alive), every eggnemy and the boss, in world space
pub fn entity_labels(model: &Model) -> Vec<Label> {
    let foe = |e: &Eggnemy| hp_label(&e.rect, e.hp, e.max_hp);
    model
        .egg
        .iter()
        .map(|egg| hp_label(&egg.rect, egg.hp, egg.max_hp))
        .chain(model.eggnemies.iter().map(foe))
        .chain(model.boss.iter().map(foe))
        .collect()
}

/// Run statistics shown in the corner of the screen
pub fn status_lines(model: &Model) -> Vec<String> {
    let state = &model.state;
    vec![
        format!("Eggnemies defeated: {}", state.defeated_eggnemies_count),
        format!("Time: {}", format_time(state.elapsed_time)),
        format!("Bosses defeated: {}", state.bosses_defeated),
        format!(
            "XP: {}/{}",
            model.egg_stats.experience, model.egghancements.egghancement_cost
        ),
    ]
}

/// Leaderboard rows, always three, with the best one prefixed
pub fn leaderboard_lines(model: &Model) -> Vec<String> {
    model
        .state
        .leaderboard
        .padded()
        .into_iter()
        .enumerate()
        .map(|(i, time)| {
            if i == 0 {
                format!("Top {}. {}", i + 1, time)
            } else {
                format!("{}. {}", i + 1, time)
            }
        })
        .collect()
}

/// Game over banner, empty while the run is live
pub fn game_over_lines(model: &Model) -> Vec<String> {
    if !model.state.is_game_over {
        return Vec::new();
    }
    vec![
        model.settings.game_over_text.clone(),
        format!("You survived {}", format_time(model.state.elapsed_time)),
        "Press R to restart".to_string(),
    ]
}

/// Egghancement menu entries, empty while the menu is closed
pub fn egghancement_menu_lines(model: &Model) -> Vec<String> {
    if !model.state.is_choosing_egghancement {
        return Vec::new();
    }
    let boosts = &model.egghancements;
    EgghancementKind::ALL
        .iter()
        .enumerate()
        .map(|(i, kind)| {
            let text = match kind {
                EgghancementKind::Hp => format!("+{} HP", boosts.hp_up),
                EgghancementKind::AttackDamage => format!("+{} Attack", boosts.attack_damage_up),
                EgghancementKind::Speed => format!("+{} Speed", boosts.speed_up),
            };
            format!("[{}] {}", i + 1, text)
        })
        .collect()
}
