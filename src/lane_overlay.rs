// src/lane_overlay.rs
//
// Renders the smoothed lane onto the frame.
//
//   ┌─────────────────────────────────────────────┐
//   │                  SKY / SCENE                │
//   │- - - - - - - - top_fraction · rows - - - - -│
//   │            left top ●━━━━━━━● right top     │
//   │                    ╱  FILL   ╲              │
//   │                   ╱           ╲             │
//   │     left bottom  ●━━━━━━━━━━━━● right bottom│
//   └─────────────────────────────────────────────┘
//
// Each boundary is the line x = (y - b) / m evaluated at the top of the
// visible window and at the bottom edge of the frame. The overlay is drawn
// on a black canvas and added to the dimmed frame, so with no lane the
// output is just the dimmed frame.

use anyhow::Result;
use opencv::{
    core::{self, Mat, Point, Scalar, Vector},
    imgproc,
    prelude::*,
};

use crate::color_filter::scalar;
use crate::types::{LaneEndpoints, LaneGeometry, LaneLine, RenderConfig};

/// Endpoints further out than this are clamped before drawing.
const MAX_COORD: f64 = (1 << 20) as f64;

/// Truncating float to pixel conversion, clamped to a range OpenCV's
/// rasterizer handles; NaN maps to 0.
fn to_px(v: f64) -> i32 {
    if v.is_nan() {
        return 0;
    }
    v.clamp(-MAX_COORD, MAX_COORD) as i32
}

/// Endpoints of one boundary for a frame with `rows` rows.
///
/// The top y is truncated from `top_fraction * rows`, the bottom is `rows`.
pub fn lane_endpoints(line: &LaneLine, rows: i32, top_fraction: f64) -> LaneEndpoints {
    let y_top = to_px(top_fraction * f64::from(rows));
    let y_bottom = rows;
    LaneEndpoints {
        top: (to_px(line.x_at(f64::from(y_top))), y_top),
        bottom: (to_px(line.x_at(f64::from(y_bottom))), y_bottom),
    }
}

pub fn lane_geometry(
    left: Option<LaneLine>,
    right: Option<LaneLine>,
    rows: i32,
    config: &RenderConfig,
) -> LaneGeometry {
    LaneGeometry {
        left: left.map(|l| lane_endpoints(&l, rows, config.top_fraction)),
        right: right.map(|l| lane_endpoints(&l, rows, config.top_fraction)),
    }
}

fn point((x, y): (i32, i32)) -> Point {
    Point::new(x, y)
}

/// Black canvas with the lane fill and boundary strokes.
pub fn draw_overlay(
    rows: i32,
    cols: i32,
    typ: i32,
    geometry: &LaneGeometry,
    config: &RenderConfig,
) -> Result<Mat> {
    let mut overlay = Mat::new_rows_cols_with_default(rows, cols, typ, Scalar::all(0.0))?;

    if let (Some(left), Some(right)) = (geometry.left, geometry.right) {
        let quad = [
            point(left.bottom),
            point(left.top),
            point(right.top),
            point(right.bottom),
        ];
        let mut polygons = Vector::<Vector<Point>>::new();
        polygons.push(Vector::from_iter(quad));
        imgproc::fill_poly(
            &mut overlay,
            &polygons,
            scalar(config.fill_color),
            imgproc::LINE_8,
            0,
            Point::new(0, 0),
        )?;
    }

    for (ends, color) in [
        (geometry.left, config.left_color),
        (geometry.right, config.right_color),
    ] {
        if let Some(ends) = ends {
            imgproc::line(
                &mut overlay,
                point(ends.bottom),
                point(ends.top),
                scalar(color),
                config.line_thickness,
                imgproc::LINE_8,
                0,
            )?;
        }
    }

    Ok(overlay)
}

/// `frame_weight * frame + overlay_weight * overlay + gamma`, saturated.
pub fn blend(frame: &Mat, overlay: &Mat, config: &RenderConfig) -> Result<Mat> {
    let mut out = Mat::default();
    core::add_weighted(
        frame,
        config.frame_weight,
        overlay,
        config.overlay_weight,
        config.gamma,
        &mut out,
        -1,
    )?;
    Ok(out)
}

/// Draw the lane described by the smoothed lines onto a copy of `frame`.
pub fn render_lane(frame: &Mat, geometry: &LaneGeometry, config: &RenderConfig) -> Result<Mat> {
    let overlay = draw_overlay(frame.rows(), frame.cols(), frame.typ(), geometry, config)?;
    blend(frame, &overlay, config)
}
