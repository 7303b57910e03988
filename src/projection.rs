use glam::DVec2;

use crate::types::{Homography, WorldPosition};

/// Sign applied to the pitch y axis after projection.
///
/// Landmark coordinates put the top touchline at +y while the display raster
/// grows downwards, so projected positions are mirrored once here.
pub const DISPLAY_Y_SIGN: f64 = -1.0;

/// Maps an image point onto the pitch in display convention.
///
/// Absent input or an unavailable transform gives `None`, as does a point
/// on the horizon line of the transform.
pub fn project(point: Option<DVec2>, transform: Option<&Homography>) -> Option<WorldPosition> {
    let (point, h) = (point?, transform?);
    let world = h.apply(point)?;
    Some(DVec2::new(world.x, DISPLAY_Y_SIGN * world.y))
}

/// Projects a batch of points through the same frame transform.
pub fn project_points(
    points: &[Option<DVec2>],
    transform: Option<&Homography>,
) -> Vec<Option<WorldPosition>> {
    points.iter().map(|p| project(*p, transform)).collect()
}
