use crate::types::Direction;

/// Minimum swipe length in CSS pixels on either axis.
pub const SWIPE_THRESHOLD: f64 = 30.0;

/// Maps a `KeyboardEvent.key` value to a direction.
pub fn direction_from_key(key: &str) -> Option<Direction> {
    match key {
        "ArrowUp" => Some(Direction::Up),
        "ArrowDown" => Some(Direction::Down),
        "ArrowLeft" => Some(Direction::Left),
        "ArrowRight" => Some(Direction::Right),
        _ => None,
    }
}

/// Maps a touch displacement to a direction along its dominant axis.
/// Screen coordinates: positive `dy` points down.
pub fn direction_from_swipe(dx: f64, dy: f64) -> Option<Direction> {
    if !dx.is_finite() || !dy.is_finite() {
        return None;
    }
    if dx.abs() < SWIPE_THRESHOLD && dy.abs() < SWIPE_THRESHOLD {
        return None;
    }

    if dx.abs() > dy.abs() {
        Some(if dx > 0.0 { Direction::Right } else { Direction::Left })
    } else {
        Some(if dy > 0.0 { Direction::Down } else { Direction::Up })
    }
}
