use nalgebra as na;
use serde::{Deserialize, Serialize};

/// Metric pitch coordinate, centre origin, display handedness.
pub type WorldPosition = glam::DVec2;

/// Perspective divides closer to zero than this are treated as points at infinity.
const W_EPS: f64 = 1e-12;
const DET_EPS: f64 = 1e-18;

/// One of the two teams competing for territory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Team {
    A,
    B,
}

impl Team {
    /// Numeric label used by the team assignment step (1 or 2).
    pub fn label(self) -> u8 {
        match self {
            Team::A => 1,
            Team::B => 2,
        }
    }

    pub fn from_label(label: u8) -> Option<Team> {
        match label {
            1 => Some(Team::A),
            2 => Some(Team::B),
            _ => None,
        }
    }
}

/// Image-to-world projective transform of a single frame.
///
/// The matrix is kept normalized so that `h33 == 1` whenever that entry is
/// not vanishing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Homography {
    matrix: na::Matrix3<f64>,
}

impl Homography {
    /// Wraps a matrix, rejecting non-finite or singular ones.
    pub fn new(matrix: na::Matrix3<f64>) -> Option<Homography> {
        if matrix.iter().any(|v| !v.is_finite()) {
            return None;
        }
        let scale = matrix[(2, 2)];
        let matrix = if scale.abs() > W_EPS { matrix / scale } else { matrix };
        if matrix.determinant().abs() < DET_EPS {
            return None;
        }
        Some(Homography { matrix })
    }

    pub fn identity() -> Homography {
        Homography {
            matrix: na::Matrix3::identity(),
        }
    }

    pub fn matrix(&self) -> &na::Matrix3<f64> {
        &self.matrix
    }

    pub fn inverse(&self) -> Option<Homography> {
        self.matrix.try_inverse().and_then(Homography::new)
    }

    /// Homogeneous multiply followed by the perspective divide.
    pub fn apply(&self, p: glam::DVec2) -> Option<glam::DVec2> {
        let v = self.matrix * na::Vector3::new(p.x, p.y, 1.0);
        let w = v[2];
        if !w.is_finite() || w.abs() <= W_EPS {
            return None;
        }
        let out = glam::DVec2::new(v[0] / w, v[1] / w);
        out.is_finite().then_some(out)
    }

    pub fn to_array(&self) -> [[f64; 3]; 3] {
        let m = &self.matrix;
        [
            [m[(0, 0)], m[(0, 1)], m[(0, 2)]],
            [m[(1, 0)], m[(1, 1)], m[(1, 2)]],
            [m[(2, 0)], m[(2, 1)], m[(2, 2)]],
        ]
    }
}

#[derive(Debug)]
pub enum PitchError {
    InsufficientCorrespondences { needed: usize, got: usize },
    DegenerateGeometry(String),
    InvalidRaster { width: u32, height: u32, margin: u32 },
    Io(std::io::Error),
    Json(serde_json::Error),
    Image(image::ImageError),
    Pattern(glob::PatternError),
}

impl std::fmt::Display for PitchError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InsufficientCorrespondences { needed, got } => {
                write!(f, "insufficient correspondences: need {}, got {}", needed, got)
            }
            Self::DegenerateGeometry(msg) => write!(f, "degenerate geometry: {}", msg),
            Self::InvalidRaster {
                width,
                height,
                margin,
            } => write!(
                f,
                "raster {}x{} cannot hold a margin of {} px on each side",
                width, height, margin
            ),
            Self::Io(e) => write!(f, "io error: {}", e),
            Self::Json(e) => write!(f, "json error: {}", e),
            Self::Image(e) => write!(f, "image error: {}", e),
            Self::Pattern(e) => write!(f, "bad glob pattern: {}", e),
        }
    }
}

impl std::error::Error for PitchError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            Self::Json(e) => Some(e),
            Self::Image(e) => Some(e),
            Self::Pattern(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for PitchError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<serde_json::Error> for PitchError {
    fn from(e: serde_json::Error) -> Self {
        Self::Json(e)
    }
}

impl From<image::ImageError> for PitchError {
    fn from(e: image::ImageError) -> Self {
        Self::Image(e)
    }
}

impl From<glob::PatternError> for PitchError {
    fn from(e: glob::PatternError) -> Self {
        Self::Pattern(e)
    }
}
