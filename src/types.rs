// src/types.rs

use serde::{Deserialize, Serialize};

// ============================================================================
// CONFIGURATION
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub detection: DetectionConfig,
    pub video: VideoConfig,
    pub logging: LoggingConfig,
}

/// Every tunable constant of the per-frame pipeline.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectionConfig {
    pub color: ColorFilterConfig,
    pub roi: RoiConfig,
    pub edges: EdgeConfig,
    pub hough: HoughConfig,
    pub classifier: ClassifierConfig,
    pub smoothing: SmoothingConfig,
    pub render: RenderConfig,
}

/// HLS bounds (OpenCV 8-bit layout: H 0..180, L 0..255, S 0..255).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColorFilterConfig {
    pub white_low: [f64; 3],
    pub white_high: [f64; 3],
    pub yellow_low: [f64; 3],
    pub yellow_high: [f64; 3],
}

impl Default for ColorFilterConfig {
    fn default() -> Self {
        Self {
            white_low: [0.0, 190.0, 0.0],
            white_high: [255.0, 255.0, 255.0],
            yellow_low: [20.0, 0.0, 90.0],
            yellow_high: [30.0, 255.0, 255.0],
        }
    }
}

/// Trapezoid vertices as `[x, y]` fractions of frame width and height.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RoiConfig {
    pub bottom_left: [f64; 2],
    pub bottom_right: [f64; 2],
    pub top_right: [f64; 2],
    pub top_left: [f64; 2],
}

impl Default for RoiConfig {
    fn default() -> Self {
        Self {
            bottom_left: [0.0, 1.0],
            bottom_right: [1.0, 1.0],
            top_right: [0.55, 0.6],
            top_left: [0.45, 0.6],
        }
    }
}

impl RoiConfig {
    /// Vertices in fill order, labelled for validation messages.
    pub fn vertices(&self) -> [(&'static str, [f64; 2]); 4] {
        [
            ("bottom_left", self.bottom_left),
            ("bottom_right", self.bottom_right),
            ("top_right", self.top_right),
            ("top_left", self.top_left),
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EdgeConfig {
    /// Side of the square box-blur kernel.
    pub blur_kernel: i32,
    pub canny_low: f64,
    pub canny_high: f64,
}

impl Default for EdgeConfig {
    fn default() -> Self {
        Self {
            blur_kernel: 5,
            canny_low: 50.0,
            canny_high: 150.0,
        }
    }
}

/// Probabilistic Hough transform parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HoughConfig {
    /// Distance resolution in pixels.
    pub rho: f64,
    /// Angle resolution in degrees (converted to radians at call time).
    pub theta_degrees: f64,
    pub threshold: i32,
    pub min_line_length: f64,
    pub max_line_gap: f64,
}

impl Default for HoughConfig {
    fn default() -> Self {
        Self {
            rho: 2.0,
            theta_degrees: 1.0,
            threshold: 100,
            min_line_length: 50.0,
            max_line_gap: 100.0,
        }
    }
}

impl HoughConfig {
    pub fn theta_radians(&self) -> f64 {
        self.theta_degrees.to_radians()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierConfig {
    /// Segments with |slope| at or below this are treated as horizontal clutter.
    pub min_abs_slope: f64,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self { min_abs_slope: 0.2 }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SmoothingConfig {
    /// Trailing window length; also the storage cap per side.
    pub window: usize,
}

impl Default for SmoothingConfig {
    fn default() -> Self {
        Self { window: 30 }
    }
}

/// Overlay geometry and colors. Colors are BGR, the channel order of decoded video.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Top of the drawn lane as a fraction of frame height.
    pub top_fraction: f64,
    pub left_color: [f64; 3],
    pub right_color: [f64; 3],
    pub fill_color: [f64; 3],
    pub line_thickness: i32,
    pub frame_weight: f64,
    pub overlay_weight: f64,
    pub gamma: f64,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            top_fraction: 0.65,
            left_color: [255.0, 0.0, 0.0],
            right_color: [0.0, 255.0, 0.0],
            fill_color: [0.0, 0.0, 255.0],
            line_thickness: 10,
            frame_weight: 0.8,
            overlay_weight: 1.0,
            gamma: 0.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VideoConfig {
    pub output_dir: String,
    pub fourcc: String,
    /// Used when the source does not report a usable frame rate.
    pub fallback_fps: f64,
    pub progress_interval: u64,
}

impl Default for VideoConfig {
    fn default() -> Self {
        Self {
            output_dir: "output".to_string(),
            fourcc: "MJPG".to_string(),
            fallback_fps: 30.0,
            progress_interval: 50,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

// ============================================================================
// GEOMETRY
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Side {
    Left,
    Right,
}

impl Side {
    pub fn as_str(&self) -> &'static str {
        match self {
            Side::Left => "left",
            Side::Right => "right",
        }
    }
}

/// One straight piece found by the Hough transform, in image coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineSegment {
    pub x0: i32,
    pub y0: i32,
    pub x1: i32,
    pub y1: i32,
}

impl LineSegment {
    pub fn new(x0: i32, y0: i32, x1: i32, y1: i32) -> Self {
        Self { x0, y0, x1, y1 }
    }

    /// `None` for vertical (and zero-length) segments.
    pub fn slope(&self) -> Option<f64> {
        if self.x0 == self.x1 {
            return None;
        }
        Some(f64::from(self.y1 - self.y0) / f64::from(self.x1 - self.x0))
    }

    pub fn to_line(&self) -> Option<LaneLine> {
        let slope = self.slope()?;
        Some(LaneLine {
            slope,
            intercept: f64::from(self.y1) - slope * f64::from(self.x1),
        })
    }
}

/// y = slope * x + intercept
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LaneLine {
    pub slope: f64,
    pub intercept: f64,
}

impl LaneLine {
    pub fn new(slope: f64, intercept: f64) -> Self {
        Self { slope, intercept }
    }

    pub fn x_at(&self, y: f64) -> f64 {
        (y - self.intercept) / self.slope
    }
}

/// Integer endpoints of one drawn boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LaneEndpoints {
    pub top: (i32, i32),
    pub bottom: (i32, i32),
}

/// Endpoints reconstructed for the current frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LaneGeometry {
    pub left: Option<LaneEndpoints>,
    pub right: Option<LaneEndpoints>,
}

/// What happened to one frame on its way through the detector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct FrameReport {
    pub segments: usize,
    pub left_segments: usize,
    pub right_segments: usize,
    pub discarded_segments: usize,
    pub left_drawn: bool,
    pub right_drawn: bool,
}
