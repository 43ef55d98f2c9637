//! Rectangle overlap and range tests

use glam::IVec2;

use super::state::Rect;

/// Inclusive AABB overlap: rectangles sharing an edge count as touching
pub fn is_touching(a: &Rect, b: &Rect) -> bool {
    !(a.x + a.width < b.x || a.x > b.x + b.width || a.y + a.height < b.y || a.y > b.y + b.height)
}

/// True if `target`'s top-left corner lies within `range` of `attacker`'s
pub fn is_within_range(attacker: &Rect, range: f32, target: &Rect) -> bool {
    let dx = (attacker.x - target.x) as f32;
    let dy = (attacker.y - target.y) as f32;
    dx * dx + dy * dy <= range * range
}

/// Center point, rounded to the nearest pixel
pub fn center_of(rect: &Rect) -> IVec2 {
    IVec2::new(
        (rect.x as f32 + rect.width as f32 / 2.0).round() as i32,
        (rect.y as f32 + rect.height as f32 / 2.0).round() as i32,
    )
}
