// src/metrics.rs
//
// Run observability: how many frames went through, how often each lane
// side could be drawn, and throughput. Logged at the end of every video
// and optionally exported as JSON.

use serde::Serialize;
use std::time::{Duration, Instant};

use crate::types::FrameReport;

/// Detector-side totals, fed one `FrameReport` per processed frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DetectionStats {
    pub frames: u64,
    pub frames_with_left: u64,
    pub frames_with_right: u64,
    /// Frames where both boundaries (and the fill) were drawn.
    pub frames_with_lane: u64,
    pub segments: u64,
    pub discarded_segments: u64,
}

impl DetectionStats {
    pub fn record(&mut self, report: &FrameReport) {
        self.frames += 1;
        self.frames_with_left += u64::from(report.left_drawn);
        self.frames_with_right += u64::from(report.right_drawn);
        self.frames_with_lane += u64::from(report.left_drawn && report.right_drawn);
        self.segments += report.segments as u64;
        self.discarded_segments += report.discarded_segments as u64;
    }

    /// Share of processed frames with a full lane, in percent.
    pub fn lane_coverage(&self) -> f64 {
        if self.frames == 0 {
            return 0.0;
        }
        100.0 * self.frames_with_lane as f64 / self.frames as f64
    }
}

/// Driver-side counters for one video.
#[derive(Debug, Clone)]
pub struct PipelineMetrics {
    pub frames_read: u64,
    pub frames_written: u64,
    pub frames_skipped: u64,
    pub started_at: Instant,
}

impl Default for PipelineMetrics {
    fn default() -> Self {
        Self::new()
    }
}

impl PipelineMetrics {
    pub fn new() -> Self {
        Self {
            frames_read: 0,
            frames_written: 0,
            frames_skipped: 0,
            started_at: Instant::now(),
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.started_at.elapsed()
    }

    pub fn fps(&self) -> f64 {
        let elapsed = self.elapsed().as_secs_f64();
        if elapsed > 0.01 {
            self.frames_read as f64 / elapsed
        } else {
            0.0
        }
    }

    pub fn summary(&self, detection: DetectionStats) -> MetricsSummary {
        MetricsSummary {
            frames_read: self.frames_read,
            frames_written: self.frames_written,
            frames_skipped: self.frames_skipped,
            duration_secs: self.elapsed().as_secs_f64(),
            fps: self.fps(),
            detection,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct MetricsSummary {
    pub frames_read: u64,
    pub frames_written: u64,
    pub frames_skipped: u64,
    pub duration_secs: f64,
    pub fps: f64,
    pub detection: DetectionStats,
}
