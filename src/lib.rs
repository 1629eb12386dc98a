//! Classical lane boundary detection for road videos.
//!
//! Each frame goes through a white/yellow color filter, a trapezoidal region
//! of interest, Canny edges and a probabilistic Hough transform. Segments are
//! split into left and right lane candidates by slope sign, smoothed over a
//! trailing window, and drawn back onto the frame as a filled lane with two
//! boundary lines.
//!
//! ```no_run
//! use lanemark::{DetectionConfig, LaneDetector};
//!
//! # fn main() -> anyhow::Result<()> {
//! let mut detector = LaneDetector::new(DetectionConfig::default());
//! let frame = opencv::core::Mat::default();
//! let annotated = detector.detect(&frame)?;
//! # Ok(())
//! # }
//! ```

pub mod classifier;
pub mod color_filter;
pub mod config;
pub mod edges;
pub mod error;
pub mod lane_detection;
pub mod lane_overlay;
pub mod metrics;
pub mod roi;
pub mod smoother;
pub mod types;
pub mod video_processor;

#[cfg(test)]
pub(crate) mod test_utils;

pub use error::{ConfigError, FrameError};
pub use lane_detection::LaneDetector;
pub use smoother::{LaneState, LineHistory};
pub use types::{Config, DetectionConfig, LaneLine, LineSegment, Side};
pub use video_processor::{FrameProcessor, FrameSink, FrameSource, VideoProcessor};
