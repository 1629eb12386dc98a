// src/roi.rs
//
// Trapezoidal region of interest in front of a forward-facing, roughly
// centered camera: full width at the bottom edge, narrowing to a short
// horizontal edge partway up the frame. Anything outside is sky, hood or
// roadside clutter and is blanked before edge detection.

use anyhow::Result;
use opencv::{
    core::{Mat, Point, Scalar, Vector, CV_8UC1},
    imgproc,
    prelude::*,
};

use crate::color_filter::apply_mask;
use crate::types::RoiConfig;

/// Pixel vertices of the trapezoid for a `rows` x `cols` frame.
///
/// Order: bottom-left, bottom-right, top-right, top-left.
pub fn roi_vertices(config: &RoiConfig, rows: i32, cols: i32) -> [Point; 4] {
    let to_px = |[fx, fy]: [f64; 2]| {
        Point::new(
            (fx * f64::from(cols)) as i32,
            (fy * f64::from(rows)) as i32,
        )
    };
    [
        to_px(config.bottom_left),
        to_px(config.bottom_right),
        to_px(config.top_right),
        to_px(config.top_left),
    ]
}

/// 255 inside the trapezoid, 0 elsewhere.
pub fn roi_mask(config: &RoiConfig, rows: i32, cols: i32) -> Result<Mat> {
    let mut mask = Mat::new_rows_cols_with_default(rows, cols, CV_8UC1, Scalar::all(0.0))?;

    let mut polygons = Vector::<Vector<Point>>::new();
    polygons.push(Vector::from_iter(roi_vertices(config, rows, cols)));
    imgproc::fill_poly(
        &mut mask,
        &polygons,
        Scalar::all(255.0),
        imgproc::LINE_8,
        0,
        Point::new(0, 0),
    )?;

    Ok(mask)
}

pub fn apply_roi(frame: &Mat, config: &RoiConfig) -> Result<Mat> {
    let mask = roi_mask(config, frame.rows(), frame.cols())?;
    apply_mask(frame, &mask)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{pixel, solid_frame, HEIGHT, WIDTH};

    #[test]
    fn test_default_vertices() {
        let pts = roi_vertices(&RoiConfig::default(), HEIGHT, WIDTH);
        assert_eq!(
            pts,
            [
                Point::new(0, 480),
                Point::new(640, 480),
                Point::new(352, 288),
                Point::new(288, 288),
            ]
        );
    }

    #[test]
    fn test_outside_is_zeroed_inside_is_untouched() {
        let frame = solid_frame(HEIGHT, WIDTH, [10.0, 120.0, 250.0]);
        let out = apply_roi(&frame, &RoiConfig::default()).unwrap();

        // Sky and the upper corners
        assert_eq!(pixel(&out, 0, 0), [0, 0, 0]);
        assert_eq!(pixel(&out, 200, 320), [0, 0, 0]);
        assert_eq!(pixel(&out, 300, 5), [0, 0, 0]);
        assert_eq!(pixel(&out, 300, 630), [0, 0, 0]);

        // Road surface just above the bottom edge and near the apex
        assert_eq!(pixel(&out, 470, 320), [10, 120, 250]);
        assert_eq!(pixel(&out, 470, 40), [10, 120, 250]);
        assert_eq!(pixel(&out, 295, 320), [10, 120, 250]);
    }

    #[test]
    fn test_every_pixel_is_either_copied_or_zero() {
        let frame = solid_frame(48, 64, [200.0, 200.0, 200.0]);
        let mask = roi_mask(&RoiConfig::default(), 48, 64).unwrap();
        let out = apply_roi(&frame, &RoiConfig::default()).unwrap();

        for row in 0..48 {
            for col in 0..64 {
                let inside = *mask.at_2d::<u8>(row, col).unwrap() > 0;
                let expected = if inside { [200, 200, 200] } else { [0, 0, 0] };
                assert_eq!(pixel(&out, row, col), expected, "at ({row}, {col})");
            }
        }
    }
}
