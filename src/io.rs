use std::path::Path;

use serde::{Serialize, de::DeserializeOwned};

use crate::pipeline::{FrameObservation, FrameResult};
use crate::types::PitchError;

/// Serializes an object to a pretty JSON file.
pub fn object_to_json<T: Serialize, P: AsRef<Path>>(
    output_path: P,
    object: &T,
) -> Result<(), PitchError> {
    let j = serde_json::to_string_pretty(object)?;
    std::fs::write(output_path, j)?;
    Ok(())
}

/// Deserializes an object from a JSON file.
pub fn object_from_json<T: DeserializeOwned, P: AsRef<Path>>(
    file_path: P,
) -> Result<T, PitchError> {
    let contents = std::fs::read_to_string(file_path)?;
    Ok(serde_json::from_str(&contents)?)
}

/// Reads frame observations from a file holding either one frame object or
/// an array of frames.
pub fn load_frames<P: AsRef<Path>>(file_path: P) -> Result<Vec<FrameObservation>, PitchError> {
    let value: serde_json::Value = object_from_json(file_path)?;
    if value.is_array() {
        Ok(serde_json::from_value(value)?)
    } else {
        Ok(vec![serde_json::from_value(value)?])
    }
}

#[derive(Serialize)]
struct TeamAverage {
    team_a_players: f64,
    team_b_players: f64,
    team_a_share: f64,
    team_b_share: f64,
}

#[derive(Serialize)]
struct TerritoryReport<'a> {
    timestamp: String,
    total_frames: usize,
    frames_with_homography: usize,
    /// Averages over frames where at least one team had a player on the pitch.
    average: Option<TeamAverage>,
    frames: &'a [FrameResult],
}

fn local_timestamp() -> String {
    let now =
        time::OffsetDateTime::now_local().unwrap_or_else(|_| time::OffsetDateTime::now_utc());
    now.format(&time::format_description::well_known::Rfc3339)
        .unwrap_or_default()
}

fn average(frames: &[FrameResult]) -> Option<TeamAverage> {
    let active: Vec<_> = frames
        .iter()
        .map(|f| &f.summary)
        .filter(|s| s.team_a_players > 0 || s.team_b_players > 0)
        .collect();
    if active.is_empty() {
        return None;
    }
    let n = active.len() as f64;
    Some(TeamAverage {
        team_a_players: active.iter().map(|s| s.team_a_players as f64).sum::<f64>() / n,
        team_b_players: active.iter().map(|s| s.team_b_players as f64).sum::<f64>() / n,
        team_a_share: active.iter().map(|s| s.team_a_share).sum::<f64>() / n,
        team_b_share: active.iter().map(|s| s.team_b_share).sum::<f64>() / n,
    })
}

/// Writes per-frame world positions and territory shares plus run averages.
pub fn write_report<P: AsRef<Path>>(
    output_path: P,
    frames: &[FrameResult],
) -> Result<(), PitchError> {
    let report = TerritoryReport {
        timestamp: local_timestamp(),
        total_frames: frames.len(),
        frames_with_homography: frames.iter().filter(|f| f.homography.is_some()).count(),
        average: average(frames),
        frames,
    };
    object_to_json(output_path, &report)
}
