// src/color_filter.rs
//
// Keeps only pixels that look like painted lane markings.
//
// Lane paint is either white or yellow. In HLS space white is simply
// "high lightness" regardless of hue, and yellow is a narrow hue band with
// enough saturation, so two `in_range` tests cover both without caring
// about overall scene brightness the way an RGB threshold would.

use anyhow::Result;
use opencv::{
    core::{self, Mat, Scalar},
    imgproc,
    prelude::*,
};

use crate::types::ColorFilterConfig;

/// Build an OpenCV scalar from a three-channel config triple.
pub(crate) fn scalar(values: [f64; 3]) -> Scalar {
    Scalar::new(values[0], values[1], values[2], 0.0)
}

/// Copy `frame` through `mask`; pixels where the mask is zero come out black.
pub(crate) fn apply_mask(frame: &Mat, mask: &Mat) -> Result<Mat> {
    let mut out =
        Mat::new_rows_cols_with_default(frame.rows(), frame.cols(), frame.typ(), Scalar::all(0.0))?;
    frame.copy_to_masked(&mut out, mask)?;
    Ok(out)
}

/// Single-channel mask of white-or-yellow pixels of a BGR frame.
pub fn lane_color_mask(frame: &Mat, config: &ColorFilterConfig) -> Result<Mat> {
    let mut hls = Mat::default();
    imgproc::cvt_color_def(frame, &mut hls, imgproc::COLOR_BGR2HLS)?;

    let mut yellow = Mat::default();
    core::in_range(
        &hls,
        &scalar(config.yellow_low),
        &scalar(config.yellow_high),
        &mut yellow,
    )?;

    let mut white = Mat::default();
    core::in_range(
        &hls,
        &scalar(config.white_low),
        &scalar(config.white_high),
        &mut white,
    )?;

    let mut mask = Mat::default();
    core::bitwise_or(&yellow, &white, &mut mask, &Mat::default())?;
    Ok(mask)
}

/// Zero every pixel outside the configured white and yellow ranges.
pub fn filter_lane_colors(frame: &Mat, config: &ColorFilterConfig) -> Result<Mat> {
    let mask = lane_color_mask(frame, config)?;
    apply_mask(frame, &mask)
}
