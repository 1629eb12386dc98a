// src/classifier.rs
//
// Routes Hough segments to the left or right lane by slope sign.
//
// Image y grows downwards, so the right boundary (running from the bottom
// right corner up toward the vanishing point) has a positive slope and the
// left one a negative slope. Shallow segments are crosswalks, shadows and
// car bumpers rather than lane paint.

use tracing::trace;

use crate::types::{ClassifierConfig, LaneLine, LineSegment, Side};

/// Left/right candidates found in one frame.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Classification {
    pub left: Vec<LaneLine>,
    pub right: Vec<LaneLine>,
    /// Vertical, zero-length or near-horizontal segments.
    pub discarded: usize,
}

impl Classification {
    pub fn lines(&self, side: Side) -> &[LaneLine] {
        match side {
            Side::Left => &self.left,
            Side::Right => &self.right,
        }
    }

    pub fn total(&self) -> usize {
        self.left.len() + self.right.len() + self.discarded
    }
}

/// Side a line belongs to, or `None` when `|slope| <= min_abs_slope`.
pub fn side_for(line: &LaneLine, config: &ClassifierConfig) -> Option<Side> {
    if line.slope > config.min_abs_slope {
        Some(Side::Right)
    } else if line.slope < -config.min_abs_slope {
        Some(Side::Left)
    } else {
        None
    }
}

pub fn classify_segments(segments: &[LineSegment], config: &ClassifierConfig) -> Classification {
    let mut result = Classification::default();

    for segment in segments {
        let Some(line) = segment.to_line() else {
            trace!("Dropping vertical segment {:?}", segment);
            result.discarded += 1;
            continue;
        };

        match side_for(&line, config) {
            Some(Side::Left) => result.left.push(line),
            Some(Side::Right) => result.right.push(line),
            None => result.discarded += 1,
        }
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classify(segments: &[LineSegment]) -> Classification {
        classify_segments(segments, &ClassifierConfig::default())
    }

    #[test]
    fn test_routes_by_slope_sign() {
        let result = classify(&[
            LineSegment::new(300, 300, 500, 400), // +0.5
            LineSegment::new(300, 300, 100, 400), // -0.5
        ]);

        assert_eq!(result.right, vec![LaneLine::new(0.5, 150.0)]);
        assert_eq!(result.left, vec![LaneLine::new(-0.5, 450.0)]);
        assert_eq!(result.discarded, 0);
    }

    #[test]
    fn test_endpoint_order_does_not_change_side() {
        let a = classify(&[LineSegment::new(100, 400, 300, 300)]);
        let b = classify(&[LineSegment::new(300, 300, 100, 400)]);
        assert_eq!(a.left.len(), 1);
        assert_eq!(a.left, b.left);
    }

    #[test]
    fn test_threshold_is_exclusive() {
        let result = classify(&[
            LineSegment::new(0, 0, 10, 2),  // +0.2
            LineSegment::new(0, 2, 10, 0),  // -0.2
            LineSegment::new(0, 0, 100, 0), // horizontal
        ]);
        assert!(result.left.is_empty());
        assert!(result.right.is_empty());
        assert_eq!(result.discarded, 3);
    }

    #[test]
    fn test_just_past_threshold_is_kept() {
        let result = classify(&[
            LineSegment::new(0, 0, 100, 21),
            LineSegment::new(0, 21, 100, 0),
        ]);
        assert_eq!(result.right.len(), 1);
        assert_eq!(result.left.len(), 1);
    }

    #[test]
    fn test_vertical_and_degenerate_segments_are_discarded() {
        let result = classify(&[
            LineSegment::new(320, 100, 320, 400),
            LineSegment::new(5, 5, 5, 5),
        ]);
        assert_eq!(result.total(), 2);
        assert_eq!(result.discarded, 2);
    }

    #[test]
    fn test_custom_threshold() {
        let config = ClassifierConfig { min_abs_slope: 0.6 };
        let result = classify_segments(&[LineSegment::new(300, 300, 500, 400)], &config);
        assert!(result.lines(Side::Right).is_empty());
        assert_eq!(result.discarded, 1);
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(classify(&[]), Classification::default());
    }
}
