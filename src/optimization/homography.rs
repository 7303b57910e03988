use glam::DVec2;
use log::{debug, trace};
use rand::SeedableRng;
use rand::seq::SliceRandom;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use super::linear::{dlt_homography, has_collinear_triple};
use crate::board::Board;
use crate::detected_points::{CandidateKeypoint, Correspondences};
use crate::types::{Homography, PitchError};

/// Pairs needed to pin down the 8 degrees of freedom of a plane homography.
pub const MIN_CORRESPONDENCES: usize = 4;

/// Inlier-set refits after the consensus search.
const REFINE_ROUNDS: usize = 3;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HomographyConfig {
    /// Candidates must score strictly above this to be used.
    pub confidence_threshold: f64,
    /// Inlier threshold, pixels, measured in the image.
    pub reprojection_threshold: f64,
    /// Upper bound on RANSAC trials.
    pub max_iters: usize,
    /// Probability of having drawn an all-inlier sample before stopping early.
    pub confidence: f64,
    pub seed: u64,
}

impl Default for HomographyConfig {
    fn default() -> Self {
        Self {
            confidence_threshold: 0.4,
            reprojection_threshold: 5.0,
            max_iters: 2000,
            confidence: 0.995,
            seed: 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct HomographyEstimate {
    pub homography: Homography,
    /// Aligned with the correspondences the fit was run on.
    pub inlier_mask: Vec<bool>,
    pub num_inliers: usize,
    pub num_correspondences: usize,
    /// Mean image-space reprojection error over the inliers, pixels.
    pub mean_inlier_error: f64,
}

/// Image-space distance between `image` and the back-projection of `world`.
///
/// `world_to_image` is the inverse of the frame's homography. Points that
/// land at infinity count as infinitely far.
pub fn reprojection_error(world_to_image: &Homography, image: DVec2, world: DVec2) -> f64 {
    world_to_image
        .apply(world)
        .map_or(f64::INFINITY, |p| p.distance(image))
}

pub fn reprojection_errors(h: &Homography, corr: &Correspondences) -> Vec<f64> {
    let Some(h_inv) = h.inverse() else {
        return vec![f64::INFINITY; corr.len()];
    };
    corr.image_points
        .iter()
        .zip(&corr.world_points)
        .map(|(img, world)| reprojection_error(&h_inv, *img, *world))
        .collect()
}

#[derive(Debug, Clone)]
struct Consensus {
    homography: Homography,
    mask: Vec<bool>,
    num_inliers: usize,
    error_sum: f64,
}

impl Consensus {
    fn evaluate(h: Homography, corr: &Correspondences, threshold: f64) -> Option<Consensus> {
        let errors = reprojection_errors(&h, corr);
        let mask: Vec<bool> = errors.iter().map(|e| *e <= threshold).collect();
        let num_inliers = mask.iter().filter(|m| **m).count();
        if num_inliers == 0 {
            return None;
        }
        let error_sum = errors
            .iter()
            .zip(&mask)
            .filter(|(_, m)| **m)
            .map(|(e, _)| *e)
            .sum();
        Some(Consensus {
            homography: h,
            mask,
            num_inliers,
            error_sum,
        })
    }

    fn beats(&self, other: &Consensus) -> bool {
        self.num_inliers > other.num_inliers
            || (self.num_inliers == other.num_inliers && self.error_sum < other.error_sum)
    }

    fn inliers(&self, corr: &Correspondences) -> (Vec<DVec2>, Vec<DVec2>) {
        self.mask
            .iter()
            .enumerate()
            .filter(|(_, m)| **m)
            .map(|(i, _)| (corr.image_points[i], corr.world_points[i]))
            .unzip()
    }
}

/// Trials needed to draw one all-inlier minimal sample with the requested
/// confidence, capped at `max_iters`.
fn update_num_iters(confidence: f64, outlier_ratio: f64, max_iters: usize) -> usize {
    let p = confidence.clamp(0.0, 1.0);
    let ep = outlier_ratio.clamp(0.0, 1.0);
    let num = (1.0 - p).max(f64::MIN_POSITIVE).ln();
    let denom = 1.0 - (1.0 - ep).powi(MIN_CORRESPONDENCES as i32);
    if denom < f64::MIN_POSITIVE {
        return 0;
    }
    let denom = denom.ln();
    if denom >= 0.0 || -num >= max_iters as f64 * -denom {
        max_iters
    } else {
        (num / denom).round() as usize
    }
}

/// Outlier-tolerant homography over an already assembled correspondence set.
///
/// Random minimal samples are drawn from a seeded generator, so identical
/// inputs give identical results. The best consensus set is then refit by
/// least squares.
pub fn fit_homography_ransac(
    corr: &Correspondences,
    config: &HomographyConfig,
) -> Result<HomographyEstimate, PitchError> {
    let n = corr.len();
    if n < MIN_CORRESPONDENCES {
        return Err(PitchError::InsufficientCorrespondences {
            needed: MIN_CORRESPONDENCES,
            got: n,
        });
    }
    let threshold = config.reprojection_threshold;
    let mut rng = ChaCha8Rng::seed_from_u64(config.seed);
    let mut nums: Vec<usize> = (0..n).collect();
    // A set of exactly four has a single sample worth trying.
    let mut max_iters = if n == MIN_CORRESPONDENCES {
        1
    } else {
        config.max_iters
    };

    let mut best: Option<Consensus> = None;
    let mut iter = 0;
    while iter < max_iters {
        iter += 1;
        nums.shuffle(&mut rng);
        let sample = &nums[..MIN_CORRESPONDENCES];
        let img: Vec<DVec2> = sample.iter().map(|&i| corr.image_points[i]).collect();
        let world: Vec<DVec2> = sample.iter().map(|&i| corr.world_points[i]).collect();
        if has_collinear_triple(&img) || has_collinear_triple(&world) {
            trace!("sample {:?} is degenerate", sample);
            continue;
        }
        let h = match dlt_homography(&img, &world) {
            Ok(h) => h,
            Err(e) => {
                trace!("sample {:?} rejected: {}", sample, e);
                continue;
            }
        };
        let Some(candidate) = Consensus::evaluate(h, corr, threshold) else {
            continue;
        };
        if best.as_ref().is_none_or(|b| candidate.beats(b)) {
            let outlier_ratio = 1.0 - candidate.num_inliers as f64 / n as f64;
            max_iters = max_iters.min(update_num_iters(
                config.confidence,
                outlier_ratio,
                config.max_iters,
            ));
            best = Some(candidate);
        }
    }

    let Some(mut best) = best else {
        debug!("no usable minimal sample among {} correspondences", n);
        return Err(PitchError::DegenerateGeometry(
            "every minimal sample was degenerate".to_string(),
        ));
    };
    if best.num_inliers < MIN_CORRESPONDENCES {
        return Err(PitchError::InsufficientCorrespondences {
            needed: MIN_CORRESPONDENCES,
            got: best.num_inliers,
        });
    }

    for _ in 0..REFINE_ROUNDS {
        let (img, world) = best.inliers(corr);
        let Ok(h) = dlt_homography(&img, &world) else {
            break;
        };
        let Some(refit) = Consensus::evaluate(h, corr, threshold) else {
            break;
        };
        if refit.num_inliers < best.num_inliers
            || (refit.mask == best.mask && refit.error_sum >= best.error_sum)
        {
            break;
        }
        best = refit;
    }

    debug!(
        "homography: {} / {} inliers after {} trials",
        best.num_inliers, n, iter
    );
    Ok(HomographyEstimate {
        homography: best.homography,
        mean_inlier_error: best.error_sum / best.num_inliers as f64,
        num_inliers: best.num_inliers,
        num_correspondences: n,
        inlier_mask: best.mask,
    })
}

/// Image-to-pitch homography of one frame.
///
/// Keeps candidates above the confidence threshold whose class the board
/// knows, then runs the robust fit. Every failure is specific to this frame.
pub fn estimate(
    candidates: &[CandidateKeypoint],
    board: &Board,
    config: &HomographyConfig,
) -> Result<HomographyEstimate, PitchError> {
    let corr = Correspondences::collect(candidates, board, config.confidence_threshold);
    trace!(
        "{} of {} keypoint candidates usable",
        corr.len(),
        candidates.len()
    );
    fit_homography_ransac(&corr, config)
}
