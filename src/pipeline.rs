use indicatif::ParallelProgressIterator;
use log::trace;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::board::Board;
use crate::detected_points::{CandidateKeypoint, ObjectKind, TrackedObject};
use crate::field::{DEFAULT_ON_FIELD_MARGIN, on_field};
use crate::optimization::{HomographyConfig, HomographyEstimate, estimate};
use crate::projection::project;
use crate::territory::{ControlField, RasterGeometry, rasterize_with_margin};
use crate::types::{PitchError, Team, WorldPosition};
use crate::visualization::TeamColors;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub homography: HomographyConfig,
    pub raster: RasterGeometry,
    /// Metres tolerated beyond the pitch lines.
    pub on_field_margin: f64,
    pub team_colors: TeamColors,
    /// Weight of the control colours over the background when rendering.
    pub opacity: f32,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            homography: HomographyConfig::default(),
            raster: RasterGeometry::default(),
            on_field_margin: DEFAULT_ON_FIELD_MARGIN,
            team_colors: TeamColors::default(),
            opacity: 0.6,
        }
    }
}

/// Everything the upstream detectors report for one frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameObservation {
    pub frame: usize,
    #[serde(default)]
    pub keypoints: Vec<CandidateKeypoint>,
    #[serde(default)]
    pub objects: Vec<TrackedObject>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ObjectPosition {
    pub track_id: u64,
    pub kind: ObjectKind,
    pub team: Option<u8>,
    pub world: Option<[f64; 2]>,
    pub on_field: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct TerritorySummary {
    pub team_a_players: usize,
    pub team_b_players: usize,
    pub team_a_share: f64,
    pub team_b_share: f64,
}

impl TerritorySummary {
    pub fn new(team_a_players: usize, team_b_players: usize, field: &ControlField) -> Self {
        Self {
            team_a_players,
            team_b_players,
            team_a_share: field.share(Team::A),
            team_b_share: field.share(Team::B),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FrameResult {
    pub frame: usize,
    pub homography: Option<[[f64; 3]; 3]>,
    pub num_inliers: Option<usize>,
    pub mean_inlier_error: Option<f64>,
    /// Why no transform was available, if it wasn't.
    pub failure: Option<String>,
    pub objects: Vec<ObjectPosition>,
    pub summary: TerritorySummary,
}

/// Per-frame result plus the raster it summarizes.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameOutput {
    pub result: FrameResult,
    pub control_field: ControlField,
    /// On-field positions of each team, the ones the raster was built from.
    pub team_a: Vec<WorldPosition>,
    pub team_b: Vec<WorldPosition>,
}

/// Runs one frame from keypoints to control field.
pub fn process_frame(
    obs: &FrameObservation,
    board: &Board,
    config: &PipelineConfig,
) -> FrameOutput {
    let fit = estimate(&obs.keypoints, board, &config.homography);
    let (transform, failure) = match &fit {
        Ok(HomographyEstimate { homography, .. }) => (Some(*homography), None),
        Err(e) => {
            trace!("frame {}: no homography ({})", obs.frame, e);
            (None, Some(e.to_string()))
        }
    };

    let mut team_a = Vec::new();
    let mut team_b = Vec::new();
    let objects: Vec<ObjectPosition> = obs
        .objects
        .iter()
        .map(|o| {
            let world = project(o.anchor(), transform.as_ref());
            let inside = on_field(world, config.on_field_margin);
            if let Some(w) = world.filter(|_| inside) {
                match o.team() {
                    Some(Team::A) => team_a.push(w),
                    Some(Team::B) => team_b.push(w),
                    None => {}
                }
            }
            ObjectPosition {
                track_id: o.track_id,
                kind: o.kind,
                team: o.team,
                world: world.map(|w| [w.x, w.y]),
                on_field: inside,
            }
        })
        .collect();

    let control_field =
        rasterize_with_margin(&team_a, &team_b, &config.raster, config.on_field_margin);
    let summary = TerritorySummary::new(team_a.len(), team_b.len(), &control_field);

    let (homography, num_inliers, mean_inlier_error) = match &fit {
        Ok(e) => (
            Some(e.homography.to_array()),
            Some(e.num_inliers),
            Some(e.mean_inlier_error),
        ),
        Err(_) => (None, None, None),
    };
    FrameOutput {
        result: FrameResult {
            frame: obs.frame,
            homography,
            num_inliers,
            mean_inlier_error,
            failure,
            objects,
            summary,
        },
        control_field,
        team_a,
        team_b,
    }
}

/// Processes frames in parallel, handing every output to `sink` before its
/// raster is dropped.
///
/// Results come back sorted by frame index. The first sink error aborts.
pub fn process_frames<F>(
    observations: &[FrameObservation],
    board: &Board,
    config: &PipelineConfig,
    sink: F,
) -> Result<Vec<FrameResult>, PitchError>
where
    F: Fn(&FrameOutput) -> Result<(), PitchError> + Sync,
{
    let mut results = observations
        .par_iter()
        .progress_count(observations.len() as u64)
        .map(|obs| {
            let output = process_frame(obs, board, config);
            sink(&output)?;
            Ok(output.result)
        })
        .collect::<Result<Vec<_>, PitchError>>()?;
    results.sort_by_key(|r| r.frame);
    Ok(results)
}
