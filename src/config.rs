use crate::error::ConfigError;
use crate::types::Config;
use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

impl Config {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        Self::from_yaml_str(&contents).with_context(|| format!("parsing config {}", path.display()))
    }

    pub fn from_yaml_str(contents: &str) -> Result<Self> {
        let config: Config = serde_yaml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> std::result::Result<(), ConfigError> {
        let det = &self.detection;

        if det.smoothing.window == 0 {
            return Err(ConfigError::ZeroWindow);
        }
        if det.edges.canny_low > det.edges.canny_high {
            return Err(ConfigError::CannyOrder {
                low: det.edges.canny_low,
                high: det.edges.canny_high,
            });
        }
        if det.edges.blur_kernel <= 0 {
            return Err(ConfigError::BlurKernel(det.edges.blur_kernel));
        }

        let min_abs_slope = det.classifier.min_abs_slope;
        if !min_abs_slope.is_finite() || min_abs_slope < 0.0 {
            return Err(ConfigError::SlopeThreshold(min_abs_slope));
        }

        for (name, [x, y]) in det.roi.vertices() {
            for value in [x, y] {
                if !(0.0..=1.0).contains(&value) {
                    return Err(ConfigError::RoiFraction { name, value });
                }
            }
        }

        let positives = [
            ("hough.rho", det.hough.rho),
            ("hough.theta_degrees", det.hough.theta_degrees),
            ("hough.threshold", f64::from(det.hough.threshold)),
            ("render.line_thickness", f64::from(det.render.line_thickness)),
            ("video.fallback_fps", self.video.fallback_fps),
        ];
        for (name, value) in positives {
            if !value.is_finite() || value <= 0.0 {
                return Err(ConfigError::NonPositive { name, value });
            }
        }

        if self.video.fourcc.chars().count() != 4 {
            return Err(ConfigError::Fourcc(self.video.fourcc.clone()));
        }

        Ok(())
    }
}
