// src/edges.rs

use anyhow::Result;
use opencv::{
    core::{self, Mat, Size, Vec4i, Vector},
    imgproc,
    prelude::*,
};
use tracing::debug;

use crate::types::{EdgeConfig, HoughConfig, LineSegment};

/// Grayscale, box blur and Canny. Returns a single-channel edge map.
pub fn edge_map(frame: &Mat, config: &EdgeConfig) -> Result<Mat> {
    let mut gray = Mat::default();
    imgproc::cvt_color_def(frame, &mut gray, imgproc::COLOR_BGR2GRAY)?;

    let mut blurred = Mat::default();
    imgproc::blur(
        &gray,
        &mut blurred,
        Size::new(config.blur_kernel, config.blur_kernel),
        core::Point::new(-1, -1),
        core::BORDER_DEFAULT,
    )?;

    let mut edges = Mat::default();
    imgproc::canny(
        &blurred,
        &mut edges,
        config.canny_low,
        config.canny_high,
        3,
        false,
    )?;

    Ok(edges)
}

/// Probabilistic Hough transform over an edge map.
pub fn hough_segments(edges: &Mat, config: &HoughConfig) -> Result<Vec<LineSegment>> {
    let mut lines = Vector::<Vec4i>::new();
    imgproc::hough_lines_p(
        edges,
        &mut lines,
        config.rho,
        config.theta_radians(),
        config.threshold,
        config.min_line_length,
        config.max_line_gap,
    )?;

    Ok(lines
        .iter()
        .map(|l| LineSegment::new(l[0], l[1], l[2], l[3]))
        .collect())
}

/// Candidate segments of a color-filtered, ROI-masked frame. Empty when no
/// lane evidence is visible.
pub fn extract_segments(
    frame: &Mat,
    edges: &EdgeConfig,
    hough: &HoughConfig,
) -> Result<Vec<LineSegment>> {
    let edge_map = edge_map(frame, edges)?;
    let segments = hough_segments(&edge_map, hough)?;
    debug!("Hough produced {} segment(s)", segments.len());
    Ok(segments)
}
