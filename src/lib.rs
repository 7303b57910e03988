//! Image-to-pitch homography and two-team territory control.
//!
//! Per frame: landmark keypoints are fitted to the [`board`] with a robust
//! homography ([`optimization`]), tracked objects are [`projection`]-mapped
//! onto the pitch, and the teams' on-[`field`] positions are turned into a
//! [`territory`] control raster.

pub mod board;
pub mod data_loader;
pub mod detected_points;
pub mod field;
pub mod io;
pub mod optimization;
pub mod pipeline;
pub mod projection;
pub mod territory;
pub mod types;
pub mod visualization;

pub use board::{Board, Landmark};
pub use detected_points::{CandidateKeypoint, Correspondences, ObjectKind, TrackedObject};
pub use field::{DEFAULT_ON_FIELD_MARGIN, on_field};
pub use optimization::{HomographyConfig, HomographyEstimate, estimate};
pub use projection::project;
pub use territory::{ControlField, RasterGeometry, rasterize};
pub use types::{Homography, PitchError, Team, WorldPosition};
