use glam::DVec2;
use serde::Serialize;

/// FIFA pitch, metres.
pub const PITCH_LENGTH: f64 = 105.0;
pub const PITCH_WIDTH: f64 = 68.0;
pub const HALF_LENGTH: f64 = PITCH_LENGTH / 2.0;
pub const HALF_WIDTH: f64 = PITCH_WIDTH / 2.0;

pub const CENTER_CIRCLE_RADIUS: f64 = 9.15;
/// Half width of the goal mouth as used by the keypoint model.
pub const GOAL_HALF_WIDTH: f64 = 5.5;
/// Half width of the goal area (and inner penalty-box corners).
pub const GOAL_AREA_HALF_WIDTH: f64 = 9.15;
pub const PENALTY_AREA_HALF_WIDTH: f64 = 20.15;
/// Distance from the centre line to the goal-area edge.
pub const GOAL_AREA_X: f64 = 47.0;
/// Distance from the centre line to the penalty-area edge.
pub const PENALTY_AREA_X: f64 = 36.5;
pub const PENALTY_SPOT_X: f64 = 41.0;
/// Goal frame as drawn behind the goal line: half the 7.32 m mouth, 3 m deep.
pub const GOAL_FRAME_HALF_WIDTH: f64 = 3.66;
pub const GOAL_FRAME_DEPTH: f64 = 3.0;

pub const LANDMARK_COUNT: usize = 32;

/// A named pitch feature with its metric position.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Landmark {
    pub id: u32,
    pub name: &'static str,
    pub world: DVec2,
}

const fn landmark(id: u32, name: &'static str, x: f64, y: f64) -> Landmark {
    Landmark {
        id,
        name,
        world: DVec2::new(x, y),
    }
}

/// Indexed by class id: `LANDMARKS[i].id == i`.
pub static LANDMARKS: [Landmark; LANDMARK_COUNT] = [
    landmark(0, "left top corner", -HALF_LENGTH, HALF_WIDTH),
    landmark(1, "left goal area top line", -HALF_LENGTH, GOAL_AREA_HALF_WIDTH),
    landmark(2, "left goal area top inner corner", -GOAL_AREA_X, GOAL_AREA_HALF_WIDTH),
    landmark(3, "left goal top post", -HALF_LENGTH, GOAL_HALF_WIDTH),
    landmark(4, "left goal bottom post", -HALF_LENGTH, -GOAL_HALF_WIDTH),
    landmark(5, "left bottom corner", -HALF_LENGTH, -HALF_WIDTH),
    landmark(6, "left goal area bottom inner corner", -GOAL_AREA_X, -GOAL_AREA_HALF_WIDTH),
    landmark(7, "left goal area bottom line", -HALF_LENGTH, -GOAL_AREA_HALF_WIDTH),
    landmark(8, "left penalty spot", -PENALTY_SPOT_X, 0.0),
    landmark(9, "left penalty area top outer", -PENALTY_AREA_X, PENALTY_AREA_HALF_WIDTH),
    landmark(10, "left penalty area top inner", -PENALTY_AREA_X, GOAL_AREA_HALF_WIDTH),
    landmark(11, "left penalty area bottom inner", -PENALTY_AREA_X, -GOAL_AREA_HALF_WIDTH),
    landmark(12, "left penalty area bottom outer", -PENALTY_AREA_X, -PENALTY_AREA_HALF_WIDTH),
    landmark(13, "halfway line top", 0.0, HALF_WIDTH),
    landmark(14, "centre circle top", 0.0, CENTER_CIRCLE_RADIUS),
    landmark(15, "centre circle bottom", 0.0, -CENTER_CIRCLE_RADIUS),
    landmark(16, "halfway line bottom", 0.0, -HALF_WIDTH),
    landmark(17, "right penalty area top outer", PENALTY_AREA_X, PENALTY_AREA_HALF_WIDTH),
    landmark(18, "right penalty area top inner", PENALTY_AREA_X, GOAL_AREA_HALF_WIDTH),
    landmark(19, "right penalty spot", PENALTY_SPOT_X, 0.0),
    landmark(20, "right penalty area bottom inner", PENALTY_AREA_X, -GOAL_AREA_HALF_WIDTH),
    landmark(21, "right penalty area bottom outer", PENALTY_AREA_X, -PENALTY_AREA_HALF_WIDTH),
    landmark(22, "right goal area top inner corner", GOAL_AREA_X, GOAL_AREA_HALF_WIDTH),
    landmark(23, "right goal area top line", HALF_LENGTH, GOAL_AREA_HALF_WIDTH),
    landmark(24, "right top corner", HALF_LENGTH, HALF_WIDTH),
    landmark(25, "right goal top post", HALF_LENGTH, GOAL_HALF_WIDTH),
    landmark(26, "right goal bottom post", HALF_LENGTH, -GOAL_HALF_WIDTH),
    landmark(27, "right goal area bottom line", HALF_LENGTH, -GOAL_AREA_HALF_WIDTH),
    landmark(28, "right bottom corner", HALF_LENGTH, -HALF_WIDTH),
    landmark(29, "right goal area bottom inner corner", GOAL_AREA_X, -GOAL_AREA_HALF_WIDTH),
    landmark(30, "centre circle left", -CENTER_CIRCLE_RADIUS, 0.0),
    landmark(31, "centre circle right", CENTER_CIRCLE_RADIUS, 0.0),
];

/// Read-only view over the landmark table.
///
/// Cheap to copy; every instance refers to the same process-wide table.
#[derive(Debug, Clone, Copy)]
pub struct Board {
    landmarks: &'static [Landmark; LANDMARK_COUNT],
}

impl Default for Board {
    fn default() -> Self {
        Self::fifa()
    }
}

impl Board {
    pub fn fifa() -> Board {
        Board {
            landmarks: &LANDMARKS,
        }
    }

    /// Landmark for a keypoint class, `None` for classes the pitch model does not know.
    pub fn lookup(&self, class_id: i64) -> Option<&'static Landmark> {
        let idx = usize::try_from(class_id).ok()?;
        let landmarks: &'static [Landmark; LANDMARK_COUNT] = self.landmarks;
        landmarks.get(idx)
    }

    pub fn landmarks(&self) -> &'static [Landmark] {
        self.landmarks
    }

    pub fn len(&self) -> usize {
        self.landmarks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.landmarks.is_empty()
    }
}
