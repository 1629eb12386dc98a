// src/error.rs

use thiserror::Error;

/// Precondition failures for frames handed to the detector.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FrameError {
    #[error("invalid frame: {reason}")]
    InvalidFrame { reason: String },
}

impl FrameError {
    pub fn invalid(reason: impl Into<String>) -> Self {
        FrameError::InvalidFrame {
            reason: reason.into(),
        }
    }
}

/// Configuration values that cannot drive the pipeline.
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("smoothing window must be at least 1")]
    ZeroWindow,

    #[error("canny thresholds out of order: low {low} > high {high}")]
    CannyOrder { low: f64, high: f64 },

    #[error("ROI vertex {name} has fraction {value} outside [0, 1]")]
    RoiFraction { name: &'static str, value: f64 },

    #[error("slope threshold must be finite and non-negative, got {0}")]
    SlopeThreshold(f64),

    #[error("{name} must be positive, got {value}")]
    NonPositive { name: &'static str, value: f64 },

    #[error("blur kernel must be positive, got {0}")]
    BlurKernel(i32),

    #[error("fourcc must be exactly 4 characters, got {0:?}")]
    Fourcc(String),
}
