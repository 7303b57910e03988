use glam::DVec2;
use nalgebra as na;

use crate::types::{Homography, PitchError};

/// Smallest ratio between the second-smallest and largest eigenvalue of
/// `AᵀA` for the null space to count as one-dimensional.
const NULLSPACE_GAP: f64 = 1e-12;

/// Similarity that moves the centroid to the origin with mean radius √2.
fn normalize_points(pts: &[DVec2]) -> Result<(na::Matrix3<f64>, Vec<DVec2>), PitchError> {
    let n = pts.len() as f64;
    let centroid = pts.iter().copied().sum::<DVec2>() / n;
    let mean_dist = pts.iter().map(|p| p.distance(centroid)).sum::<f64>() / n;
    if !mean_dist.is_finite() || mean_dist < 1e-12 {
        return Err(PitchError::DegenerateGeometry(
            "all points coincide".to_string(),
        ));
    }
    let s = std::f64::consts::SQRT_2 / mean_dist;
    let t = na::Matrix3::new(
        s,
        0.0,
        -s * centroid.x,
        0.0,
        s,
        -s * centroid.y,
        0.0,
        0.0,
        1.0,
    );
    let normalized = pts.iter().map(|p| (*p - centroid) * s).collect();
    Ok((t, normalized))
}

fn denormalizer(t: &na::Matrix3<f64>) -> na::Matrix3<f64> {
    let s = t[(0, 0)];
    na::Matrix3::new(
        1.0 / s,
        0.0,
        -t[(0, 2)] / s,
        0.0,
        1.0 / s,
        -t[(1, 2)] / s,
        0.0,
        0.0,
        1.0,
    )
}

/// Least-squares homography `dst ≈ H(src)` by the normalized direct linear
/// transform.
///
/// Needs at least four pairs. All pairs carry equal weight, so this is only
/// meaningful once outliers have been removed.
pub fn dlt_homography(src: &[DVec2], dst: &[DVec2]) -> Result<Homography, PitchError> {
    let n = src.len().min(dst.len());
    if n < 4 {
        return Err(PitchError::InsufficientCorrespondences { needed: 4, got: n });
    }
    if src.len() != dst.len() {
        return Err(PitchError::DegenerateGeometry(
            "src and dst must have the same length".to_string(),
        ));
    }
    let (t_src, src_n) = normalize_points(src)?;
    let (t_dst, dst_n) = normalize_points(dst)?;

    // Accumulate AᵀA row by row instead of materializing the 2n×9 system.
    let mut ata = na::SMatrix::<f64, 9, 9>::zeros();
    for (s, d) in src_n.iter().zip(&dst_n) {
        let (x, y) = (s.x, s.y);
        let (u, v) = (d.x, d.y);
        let r0 = na::SVector::<f64, 9>::from_column_slice(&[
            x,
            y,
            1.0,
            0.0,
            0.0,
            0.0,
            -u * x,
            -u * y,
            -u,
        ]);
        let r1 = na::SVector::<f64, 9>::from_column_slice(&[
            0.0,
            0.0,
            0.0,
            x,
            y,
            1.0,
            -v * x,
            -v * y,
            -v,
        ]);
        ata += r0 * r0.transpose();
        ata += r1 * r1.transpose();
    }

    let eig = na::SymmetricEigen::new(ata);
    let mut order: Vec<usize> = (0..9).collect();
    order.sort_by(|&a, &b| eig.eigenvalues[a].total_cmp(&eig.eigenvalues[b]));
    let largest = eig.eigenvalues[order[8]].abs();
    let second = eig.eigenvalues[order[1]].abs();
    if !(largest.is_finite() && largest > 0.0) || second <= largest * NULLSPACE_GAP {
        return Err(PitchError::DegenerateGeometry(
            "solution space is not one-dimensional".to_string(),
        ));
    }

    let h = eig.eigenvectors.column(order[0]);
    let h_norm = na::Matrix3::new(h[0], h[1], h[2], h[3], h[4], h[5], h[6], h[7], h[8]);
    let h_full = denormalizer(&t_dst) * h_norm * t_src;
    Homography::new(h_full)
        .ok_or_else(|| PitchError::DegenerateGeometry("singular homography".to_string()))
}

/// Twice the signed area of triangle `abc`.
fn cross(a: DVec2, b: DVec2, c: DVec2) -> f64 {
    (b - a).perp_dot(c - a)
}

/// True when any three of the points are (nearly) collinear.
///
/// The tolerance scales with the spread of the points so that pixel and
/// metre coordinates are judged alike.
pub fn has_collinear_triple(pts: &[DVec2]) -> bool {
    let n = pts.len();
    if n < 3 {
        return false;
    }
    let spread = pts
        .iter()
        .flat_map(|a| pts.iter().map(move |b| a.distance_squared(*b)))
        .fold(0.0f64, f64::max);
    let tol = spread * 1e-6;
    for i in 0..n {
        for j in (i + 1)..n {
            for k in (j + 1)..n {
                if cross(pts[i], pts[j], pts[k]).abs() <= tol {
                    return true;
                }
            }
        }
    }
    false
}
