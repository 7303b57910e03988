use glam::DVec2;
use serde::{Deserialize, Serialize};

use crate::board::Board;
use crate::types::Team;

/// Landmark candidate proposed by the keypoint model for one frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CandidateKeypoint {
    pub class_id: i64,
    pub x: f64,
    pub y: f64,
    pub confidence: f64,
}

impl CandidateKeypoint {
    pub fn new(class_id: i64, x: f64, y: f64, confidence: f64) -> CandidateKeypoint {
        CandidateKeypoint {
            class_id,
            x,
            y,
            confidence,
        }
    }

    pub fn p2d(&self) -> DVec2 {
        DVec2::new(self.x, self.y)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ObjectKind {
    #[default]
    Player,
    Goalkeeper,
    Referee,
    Ball,
}

/// Tracked object as handed over by detection + tracking.
///
/// Either `position` or `bbox` (`[x1, y1, x2, y2]`) locates it in the image.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackedObject {
    pub track_id: u64,
    #[serde(default)]
    pub kind: ObjectKind,
    #[serde(default)]
    pub team: Option<u8>,
    #[serde(default)]
    pub position: Option<[f64; 2]>,
    #[serde(default)]
    pub bbox: Option<[f64; 4]>,
}

impl TrackedObject {
    /// Image point that touches the pitch plane.
    ///
    /// An explicit position wins. Otherwise people are anchored at the
    /// bottom centre of their box and the ball at the box centre.
    pub fn anchor(&self) -> Option<DVec2> {
        if let Some([x, y]) = self.position {
            return Some(DVec2::new(x, y));
        }
        let [x1, y1, x2, y2] = self.bbox?;
        let cx = (x1 + x2) / 2.0;
        match self.kind {
            ObjectKind::Ball => Some(DVec2::new(cx, (y1 + y2) / 2.0)),
            _ => Some(DVec2::new(cx, y2)),
        }
    }

    pub fn team(&self) -> Option<Team> {
        self.team.and_then(Team::from_label)
    }
}

/// Image/world point pairs used to fit a frame's homography.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Correspondences {
    pub image_points: Vec<DVec2>,
    pub world_points: Vec<DVec2>,
    /// Landmark class of each pair.
    pub class_ids: Vec<u32>,
}

impl Correspondences {
    /// Pairs every confident candidate whose class the board knows.
    ///
    /// `confidence` must strictly exceed `confidence_threshold`. Duplicate
    /// classes are all kept.
    pub fn collect(
        candidates: &[CandidateKeypoint],
        board: &Board,
        confidence_threshold: f64,
    ) -> Correspondences {
        let mut corr = Correspondences::default();
        for kp in candidates {
            if kp.confidence.is_nan() || kp.confidence <= confidence_threshold {
                continue;
            }
            let Some(landmark) = board.lookup(kp.class_id) else {
                continue;
            };
            let p2d = kp.p2d();
            if !p2d.is_finite() {
                continue;
            }
            corr.push(landmark.id, p2d, landmark.world);
        }
        corr
    }

    pub fn push(&mut self, class_id: u32, image_point: DVec2, world_point: DVec2) {
        self.image_points.push(image_point);
        self.world_points.push(world_point);
        self.class_ids.push(class_id);
    }

    pub fn len(&self) -> usize {
        self.image_points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.image_points.is_empty()
    }
}
