// src/lane_detection.rs

use crate::classifier::classify_segments;
use crate::color_filter::filter_lane_colors;
use crate::edges::extract_segments;
use crate::error::FrameError;
use crate::lane_overlay::{lane_geometry, render_lane};
use crate::metrics::DetectionStats;
use crate::roi::apply_roi;
use crate::smoother::LaneState;
use crate::types::{DetectionConfig, FrameReport, Side};
use crate::video_processor::FrameProcessor;
use anyhow::Result;
use opencv::{
    core::{Mat, CV_8UC3},
    prelude::*,
};
use tracing::debug;

/// Classical lane detector for one video session.
///
/// Owns the smoothing state, so each concurrently processed stream needs
/// its own detector. Call [`LaneDetector::reset`] between unrelated videos.
pub struct LaneDetector {
    config: DetectionConfig,
    state: LaneState,
    stats: DetectionStats,
}

impl LaneDetector {
    pub fn new(config: DetectionConfig) -> Self {
        let state = LaneState::new(config.smoothing.window);
        Self {
            config,
            state,
            stats: DetectionStats::default(),
        }
    }

    pub fn config(&self) -> &DetectionConfig {
        &self.config
    }

    pub fn state(&self) -> &LaneState {
        &self.state
    }

    /// Totals since construction or the last reset.
    pub fn stats(&self) -> &DetectionStats {
        &self.stats
    }

    /// Start a new session: clears lane history and totals.
    pub fn reset(&mut self) {
        self.state.reset();
        self.stats = DetectionStats::default();
    }

    /// Detect lanes in `frame` and return it with the lane overlay composited.
    pub fn detect(&mut self, frame: &Mat) -> Result<Mat> {
        self.detect_with_report(frame).map(|(out, _)| out)
    }

    pub fn detect_with_report(&mut self, frame: &Mat) -> Result<(Mat, FrameReport)> {
        validate_frame(frame)?;

        let filtered = filter_lane_colors(frame, &self.config.color)?;
        let masked = apply_roi(&filtered, &self.config.roi)?;
        let segments = extract_segments(&masked, &self.config.edges, &self.config.hough)?;
        let classes = classify_segments(&segments, &self.config.classifier);

        // Everything fallible up to here has succeeded; commit to history.
        for side in [Side::Left, Side::Right] {
            for line in classes.lines(side) {
                self.state.record(side, *line);
            }
        }

        let left = self.state.smoothed(Side::Left);
        let right = self.state.smoothed(Side::Right);
        let geometry = lane_geometry(left, right, frame.rows(), &self.config.render);
        let out = render_lane(frame, &geometry, &self.config.render)?;

        let report = FrameReport {
            segments: segments.len(),
            left_segments: classes.left.len(),
            right_segments: classes.right.len(),
            discarded_segments: classes.discarded,
            left_drawn: geometry.left.is_some(),
            right_drawn: geometry.right.is_some(),
        };
        debug!(
            "Segments: {} (L {} / R {} / dropped {}) | left {:?} | right {:?}",
            report.segments,
            report.left_segments,
            report.right_segments,
            report.discarded_segments,
            left,
            right
        );
        for (side, line) in [(Side::Left, left), (Side::Right, right)] {
            if line.is_none() {
                debug!("No {} lane in history yet", side.as_str());
            }
        }
        self.stats.record(&report);

        Ok((out, report))
    }
}

impl FrameProcessor for LaneDetector {
    fn process(&mut self, frame: &Mat) -> Result<Mat> {
        self.detect(frame)
    }

    fn reset(&mut self) {
        LaneDetector::reset(self);
    }
}

/// Non-empty 8-bit BGR frames only.
pub fn validate_frame(frame: &Mat) -> std::result::Result<(), FrameError> {
    if frame.empty() || frame.rows() <= 0 || frame.cols() <= 0 {
        return Err(FrameError::invalid("frame has zero size"));
    }
    if frame.typ() != CV_8UC3 {
        return Err(FrameError::invalid(format!(
            "expected 8-bit 3-channel frame, got {} channel(s) of depth {}",
            frame.channels(),
            frame.depth()
        )));
    }
    Ok(())
}
