use crate::board::{HALF_LENGTH, HALF_WIDTH};
use crate::types::WorldPosition;

/// Tolerance around the touch and goal lines, metres.
pub const DEFAULT_ON_FIELD_MARGIN: f64 = 5.0;

/// Whether a position lies on the pitch, boundary lines plus `margin` included.
pub fn on_field(point: Option<WorldPosition>, margin: f64) -> bool {
    match point {
        Some(p) => p.x.abs() <= HALF_LENGTH + margin && p.y.abs() <= HALF_WIDTH + margin,
        None => false,
    }
}

/// Keeps the on-field positions, preserving order.
pub fn filter_on_field(points: &[WorldPosition], margin: f64) -> Vec<WorldPosition> {
    points
        .iter()
        .copied()
        .filter(|p| on_field(Some(*p), margin))
        .collect()
}
