use std::path::PathBuf;

use glob::glob;

use crate::io::load_frames;
use crate::pipeline::FrameObservation;
use crate::types::PitchError;

fn json_filter(entry: glob::GlobResult) -> Option<PathBuf> {
    match entry {
        Ok(p) if p.extension().is_some_and(|ext| ext == "json") => Some(p),
        Ok(_) => None,
        Err(e) => {
            log::warn!("skipping unreadable path: {}", e);
            None
        }
    }
}

/// Loads every frame from the JSON files matching `pattern`.
///
/// Files are read in lexicographic order; the frames they contain keep the
/// indices written in them.
pub fn load_observations(pattern: &str) -> Result<Vec<FrameObservation>, PitchError> {
    let mut paths: Vec<PathBuf> = glob(pattern)?.filter_map(json_filter).collect();
    paths.sort();
    log::trace!("{} frame files match {}", paths.len(), pattern);

    let mut frames = Vec::new();
    for path in &paths {
        frames.extend(load_frames(path)?);
    }
    Ok(frames)
}
