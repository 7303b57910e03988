use image::{Rgb, RgbImage};
use serde::{Deserialize, Serialize};

use crate::board::{
    CENTER_CIRCLE_RADIUS, GOAL_AREA_HALF_WIDTH, GOAL_AREA_X, GOAL_FRAME_DEPTH,
    GOAL_FRAME_HALF_WIDTH, HALF_LENGTH, HALF_WIDTH, PENALTY_AREA_HALF_WIDTH, PENALTY_AREA_X,
    PENALTY_SPOT_X,
};
use crate::territory::{ControlField, RasterGeometry};
use crate::types::{Team, WorldPosition};

pub const GRASS: [u8; 3] = [34, 139, 34];
pub const LINE: [u8; 3] = [255, 255, 255];
const MARKER_RADIUS: i64 = 12;
/// Pitch lines are drawn `2 * LINE_HALF_WIDTH + 1` pixels wide.
const LINE_HALF_WIDTH: i64 = 1;
const CENTER_SPOT_RADIUS: i64 = 2;
const PENALTY_SPOT_RADIUS: i64 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TeamColors {
    pub team_a: [u8; 3],
    pub team_b: [u8; 3],
}

impl Default for TeamColors {
    fn default() -> Self {
        let a = colorous::TABLEAU10[0];
        let b = colorous::TABLEAU10[1];
        Self {
            team_a: [a.r, a.g, a.b],
            team_b: [b.r, b.g, b.b],
        }
    }
}

impl TeamColors {
    pub fn color(&self, team: Team) -> [u8; 3] {
        match team {
            Team::A => self.team_a,
            Team::B => self.team_b,
        }
    }
}

fn blend(fg: [u8; 3], bg: [u8; 3], opacity: f32) -> Rgb<u8> {
    let mix = |f: u8, b: u8| (f as f32 * opacity + b as f32 * (1.0 - opacity)).round() as u8;
    Rgb([mix(fg[0], bg[0]), mix(fg[1], bg[1]), mix(fg[2], bg[2])])
}

fn pixel(raster: &RasterGeometry, x: f64, y: f64) -> (i64, i64) {
    let (col, row) = raster.world_to_pixel(WorldPosition::new(x, y));
    (i64::from(col), i64::from(row))
}

/// Fills the inclusive pixel rectangle spanned by two corners, clipped to the image.
fn fill_rect(img: &mut RgbImage, a: (i64, i64), b: (i64, i64), color: [u8; 3]) {
    let x0 = a.0.min(b.0).max(0);
    let y0 = a.1.min(b.1).max(0);
    let x1 = a.0.max(b.0).min(i64::from(img.width()) - 1);
    let y1 = a.1.max(b.1).min(i64::from(img.height()) - 1);
    for y in y0..=y1 {
        for x in x0..=x1 {
            img.put_pixel(x as u32, y as u32, Rgb(color));
        }
    }
}

fn stroke_rect(img: &mut RgbImage, a: (i64, i64), b: (i64, i64)) {
    let w = LINE_HALF_WIDTH;
    let (x0, x1) = (a.0.min(b.0), a.0.max(b.0));
    let (y0, y1) = (a.1.min(b.1), a.1.max(b.1));
    fill_rect(img, (x0 - w, y0 - w), (x1 + w, y0 + w), LINE);
    fill_rect(img, (x0 - w, y1 - w), (x1 + w, y1 + w), LINE);
    fill_rect(img, (x0 - w, y0 - w), (x0 + w, y1 + w), LINE);
    fill_rect(img, (x1 - w, y0 - w), (x1 + w, y1 + w), LINE);
}

/// Circle of radius `radius` px, either a line-width ring or a filled disc.
fn draw_circle(img: &mut RgbImage, center: (i64, i64), radius: f64, filled: bool) {
    let reach = radius.ceil() as i64 + LINE_HALF_WIDTH;
    for dy in -reach..=reach {
        for dx in -reach..=reach {
            let (x, y) = (center.0 + dx, center.1 + dy);
            if x < 0 || y < 0 || x >= i64::from(img.width()) || y >= i64::from(img.height()) {
                continue;
            }
            let d = ((dx * dx + dy * dy) as f64).sqrt();
            let hit = if filled {
                d <= radius
            } else {
                (d - radius).abs() <= LINE_HALF_WIDTH as f64
            };
            if hit {
                img.put_pixel(x as u32, y as u32, Rgb(LINE));
            }
        }
    }
}

/// Grass with the pitch markings: outline, halfway line, centre circle and
/// spot, penalty and goal areas, goal frames and penalty spots.
pub fn render_pitch_background(raster: &RasterGeometry) -> RgbImage {
    let mut img = RgbImage::from_pixel(raster.width(), raster.height(), Rgb(GRASS));

    stroke_rect(
        &mut img,
        pixel(raster, -HALF_LENGTH, -HALF_WIDTH),
        pixel(raster, HALF_LENGTH, HALF_WIDTH),
    );
    let w = LINE_HALF_WIDTH;
    let (top, bottom) = (pixel(raster, 0.0, -HALF_WIDTH), pixel(raster, 0.0, HALF_WIDTH));
    fill_rect(&mut img, (top.0 - w, top.1), (bottom.0 + w, bottom.1), LINE);

    let center = pixel(raster, 0.0, 0.0);
    draw_circle(&mut img, center, CENTER_CIRCLE_RADIUS * raster.scale().x, false);
    draw_circle(&mut img, center, CENTER_SPOT_RADIUS as f64, true);

    for side in [-1.0, 1.0] {
        let goal_line = side * HALF_LENGTH;
        stroke_rect(
            &mut img,
            pixel(raster, goal_line, -PENALTY_AREA_HALF_WIDTH),
            pixel(raster, side * PENALTY_AREA_X, PENALTY_AREA_HALF_WIDTH),
        );
        stroke_rect(
            &mut img,
            pixel(raster, goal_line, -GOAL_AREA_HALF_WIDTH),
            pixel(raster, side * GOAL_AREA_X, GOAL_AREA_HALF_WIDTH),
        );
        stroke_rect(
            &mut img,
            pixel(raster, goal_line, -GOAL_FRAME_HALF_WIDTH),
            pixel(raster, goal_line + side * GOAL_FRAME_DEPTH, GOAL_FRAME_HALF_WIDTH),
        );
        draw_circle(
            &mut img,
            pixel(raster, side * PENALTY_SPOT_X, 0.0),
            PENALTY_SPOT_RADIUS as f64,
            true,
        );
    }
    img
}

/// Paints the control field over the marked pitch.
///
/// Unclaimed cells are blended with black. `opacity` is clamped to `[0, 1]`;
/// zero gives the bare background.
pub fn render_control_field(
    field: &ControlField,
    raster: &RasterGeometry,
    colors: &TeamColors,
    opacity: f32,
) -> RgbImage {
    let opacity = opacity.clamp(0.0, 1.0);
    let mut img = render_pitch_background(raster);
    for (x, y, px) in img.enumerate_pixels_mut() {
        let fg = field
            .get(x, y)
            .map_or([0, 0, 0], |team| colors.color(team));
        *px = blend(fg, px.0, opacity);
    }
    img
}

/// Draws filled, outlined discs at the given positions.
pub fn draw_positions(
    img: &mut RgbImage,
    raster: &RasterGeometry,
    positions: &[WorldPosition],
    color: [u8; 3],
) {
    let r2 = MARKER_RADIUS * MARKER_RADIUS;
    let inner2 = (MARKER_RADIUS - 2) * (MARKER_RADIUS - 2);
    for p in positions {
        let (cx, cy) = raster.world_to_pixel(*p);
        let (cx, cy) = (i64::from(cx), i64::from(cy));
        for dy in -MARKER_RADIUS..=MARKER_RADIUS {
            for dx in -MARKER_RADIUS..=MARKER_RADIUS {
                let d2 = dx * dx + dy * dy;
                if d2 > r2 {
                    continue;
                }
                let (x, y) = (cx + dx, cy + dy);
                if x < 0 || y < 0 || x >= i64::from(img.width()) || y >= i64::from(img.height()) {
                    continue;
                }
                let px = if d2 > inner2 { LINE } else { color };
                img.put_pixel(x as u32, y as u32, Rgb(px));
            }
        }
    }
}
