use glam::DVec2;
use nalgebra as na;
use pitch_control::board::Board;
use pitch_control::detected_points::CandidateKeypoint;

/// Pitch-to-image mapping of a broadcast-like view: the near touchline is
/// wider than the far one and no pitch point reaches the horizon.
pub fn broadcast_camera() -> na::Matrix3<f64> {
    na::Matrix3::new(
        10.0, 1.0, 640.0, //
        0.5, -8.0, 360.0, //
        0.0005, 0.002, 1.0,
    )
}

pub fn to_image(camera: &na::Matrix3<f64>, world: DVec2) -> DVec2 {
    let v = camera * na::Vector3::new(world.x, world.y, 1.0);
    DVec2::new(v[0] / v[2], v[1] / v[2])
}

/// Keypoints for the given landmark classes as seen by `camera`.
pub fn keypoints_for(
    camera: &na::Matrix3<f64>,
    ids: &[u32],
    confidence: f64,
) -> Vec<CandidateKeypoint> {
    let board = Board::fifa();
    ids.iter()
        .map(|&id| {
            let landmark = board.lookup(id as i64).expect("known landmark");
            let p = to_image(camera, landmark.world);
            CandidateKeypoint::new(id as i64, p.x, p.y, confidence)
        })
        .collect()
}

/// Landmarks spread over both halves, no three of the first four collinear.
pub const SPREAD_IDS: [u32; 8] = [0, 16, 19, 9, 14, 12, 31, 28];
