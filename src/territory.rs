//! Territory control: which team is nearest to every cell of the pitch raster.
//!
//! The pitch is drawn into a `width × height` raster with a fixed pixel
//! margin on every side:
//!
//! `pixel = margin + (world + half_extent) * scale`, per axis, where `scale`
//! stretches the 105 × 68 m pitch over the area inside the margin.
//!
//! Each cell is converted back to metres and given to the team whose closest
//! on-field player is nearer, which amounts to a two-site discrete Voronoi
//! partition.

use glam::DVec2;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::board::{HALF_LENGTH, HALF_WIDTH, PITCH_LENGTH, PITCH_WIDTH};
use crate::field::{DEFAULT_ON_FIELD_MARGIN, filter_on_field};
use crate::types::{PitchError, Team, WorldPosition};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
struct RawRaster {
    width: u32,
    height: u32,
    margin: u32,
}

impl Default for RawRaster {
    fn default() -> Self {
        Self {
            width: 1200,
            height: 800,
            margin: 50,
        }
    }
}

/// Pixel layout of the top-down pitch display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawRaster", into = "RawRaster")]
pub struct RasterGeometry {
    width: u32,
    height: u32,
    margin: u32,
}

impl Default for RasterGeometry {
    fn default() -> Self {
        let raw = RawRaster::default();
        Self {
            width: raw.width,
            height: raw.height,
            margin: raw.margin,
        }
    }
}

impl TryFrom<RawRaster> for RasterGeometry {
    type Error = PitchError;

    fn try_from(raw: RawRaster) -> Result<Self, Self::Error> {
        RasterGeometry::new(raw.width, raw.height, raw.margin)
    }
}

impl From<RasterGeometry> for RawRaster {
    fn from(g: RasterGeometry) -> Self {
        RawRaster {
            width: g.width,
            height: g.height,
            margin: g.margin,
        }
    }
}

impl RasterGeometry {
    /// The pitch must keep a positive extent inside the margins.
    pub fn new(width: u32, height: u32, margin: u32) -> Result<RasterGeometry, PitchError> {
        let inner_w = i64::from(width) - 2 * i64::from(margin);
        let inner_h = i64::from(height) - 2 * i64::from(margin);
        if inner_w <= 0 || inner_h <= 0 {
            return Err(PitchError::InvalidRaster {
                width,
                height,
                margin,
            });
        }
        Ok(RasterGeometry {
            width,
            height,
            margin,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn margin(&self) -> u32 {
        self.margin
    }

    pub fn num_cells(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// Pixels per metre along x and y.
    pub fn scale(&self) -> DVec2 {
        let m = 2.0 * f64::from(self.margin);
        DVec2::new(
            (f64::from(self.width) - m) / PITCH_LENGTH,
            (f64::from(self.height) - m) / PITCH_WIDTH,
        )
    }

    pub fn offset(&self) -> DVec2 {
        DVec2::splat(f64::from(self.margin))
    }

    /// Metric position of the cell at `(col, row)`.
    pub fn pixel_to_world(&self, col: u32, row: u32) -> WorldPosition {
        let scale = self.scale();
        let offset = self.offset();
        DVec2::new(
            (f64::from(col) - offset.x) / scale.x - HALF_LENGTH,
            (f64::from(row) - offset.y) / scale.y - HALF_WIDTH,
        )
    }

    /// Cell holding a metric position, truncated and clamped to the raster.
    pub fn world_to_pixel(&self, p: WorldPosition) -> (u32, u32) {
        let scale = self.scale();
        let offset = self.offset();
        let x = offset.x + (p.x + HALF_LENGTH) * scale.x;
        let y = offset.y + (p.y + HALF_WIDTH) * scale.y;
        let col = (x as i64).clamp(0, i64::from(self.width) - 1);
        let row = (y as i64).clamp(0, i64::from(self.height) - 1);
        (col as u32, row as u32)
    }
}

/// Per-cell owner of one frame; `None` where nobody is on the pitch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControlField {
    width: u32,
    height: u32,
    cells: Vec<Option<Team>>,
}

impl ControlField {
    pub fn empty(raster: &RasterGeometry) -> ControlField {
        ControlField {
            width: raster.width(),
            height: raster.height(),
            cells: vec![None; raster.num_cells()],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Row-major cells.
    pub fn cells(&self) -> &[Option<Team>] {
        &self.cells
    }

    pub fn get(&self, col: u32, row: u32) -> Option<Team> {
        if col >= self.width || row >= self.height {
            return None;
        }
        self.cells[row as usize * self.width as usize + col as usize]
    }

    pub fn count(&self, team: Team) -> usize {
        self.cells.iter().filter(|c| **c == Some(team)).count()
    }

    /// Fraction of the whole raster held by `team`.
    pub fn share(&self, team: Team) -> f64 {
        if self.cells.is_empty() {
            return 0.0;
        }
        self.count(team) as f64 / self.cells.len() as f64
    }

    pub fn is_unclaimed(&self) -> bool {
        self.cells.iter().all(Option::is_none)
    }
}

fn min_distance_squared(p: DVec2, points: &[WorldPosition]) -> f64 {
    points
        .iter()
        .map(|q| p.distance_squared(*q))
        .fold(f64::INFINITY, f64::min)
}

/// Team owning position `p`.
///
/// Distances are compared squared, and an exact tie goes to [`Team::A`]. An
/// empty side is infinitely far away; `None` only when both sides are empty.
pub fn nearest_team(
    p: WorldPosition,
    team_a: &[WorldPosition],
    team_b: &[WorldPosition],
) -> Option<Team> {
    let da = min_distance_squared(p, team_a);
    let db = min_distance_squared(p, team_b);
    if da.is_infinite() && db.is_infinite() {
        None
    } else if da <= db {
        Some(Team::A)
    } else {
        Some(Team::B)
    }
}

/// [`rasterize_with_margin`] with the default on-field tolerance.
pub fn rasterize(
    team_a: &[WorldPosition],
    team_b: &[WorldPosition],
    raster: &RasterGeometry,
) -> ControlField {
    rasterize_with_margin(team_a, team_b, raster, DEFAULT_ON_FIELD_MARGIN)
}

/// Control field for two teams' positions.
///
/// Off-pitch positions are dropped first. Rows are filled in parallel; every
/// cell depends only on the inputs, so the result does not depend on
/// scheduling.
pub fn rasterize_with_margin(
    team_a: &[WorldPosition],
    team_b: &[WorldPosition],
    raster: &RasterGeometry,
    on_field_margin: f64,
) -> ControlField {
    let team_a = filter_on_field(team_a, on_field_margin);
    let team_b = filter_on_field(team_b, on_field_margin);
    let mut field = ControlField::empty(raster);
    if team_a.is_empty() && team_b.is_empty() {
        return field;
    }

    let width = raster.width() as usize;
    field
        .cells
        .par_chunks_mut(width)
        .enumerate()
        .for_each(|(row, line)| {
            for (col, cell) in line.iter_mut().enumerate() {
                let p = raster.pixel_to_world(col as u32, row as u32);
                *cell = nearest_team(p, &team_a, &team_b);
            }
        });
    field
}
