// src/smoother.rs

use crate::types::{LaneLine, Side};
use std::collections::VecDeque;

/// Bounded history of (slope, intercept) observations for one lane side.
///
/// Only the newest `capacity` entries are kept; older ones are evicted as
/// new ones arrive, so memory stays flat on arbitrarily long streams.
#[derive(Debug, Clone)]
pub struct LineHistory {
    history: VecDeque<LaneLine>,
    capacity: usize,
}

impl LineHistory {
    /// # Arguments
    /// * `capacity` - Number of observations retained (e.g., 30); clamped to at least 1
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            history: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn push(&mut self, line: LaneLine) {
        self.history.push_back(line);
        if self.history.len() > self.capacity {
            self.history.pop_front();
        }
    }

    /// Mean slope and intercept over the newest `min(window, len)` entries.
    ///
    /// `None` when nothing has been observed yet or `window` is zero.
    pub fn moving_average(&self, window: usize) -> Option<LaneLine> {
        let n = window.min(self.history.len());
        if n == 0 {
            return None;
        }

        // Running mean: stays bit-exact when every entry is identical.
        let mean = self
            .history
            .iter()
            .rev()
            .take(n)
            .enumerate()
            .fold(LaneLine::new(0.0, 0.0), |mean, (i, line)| {
                let k = (i + 1) as f64;
                LaneLine {
                    slope: mean.slope + (line.slope - mean.slope) / k,
                    intercept: mean.intercept + (line.intercept - mean.intercept) / k,
                }
            });

        Some(mean)
    }

    /// Oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &LaneLine> {
        self.history.iter()
    }

    pub fn latest(&self) -> Option<LaneLine> {
        self.history.back().copied()
    }

    pub fn len(&self) -> usize {
        self.history.len()
    }

    pub fn is_empty(&self) -> bool {
        self.history.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn clear(&mut self) {
        self.history.clear();
    }
}

/// Per-session smoothing state for both lane sides.
#[derive(Debug, Clone)]
pub struct LaneState {
    left: LineHistory,
    right: LineHistory,
    window: usize,
}

impl LaneState {
    pub fn new(window: usize) -> Self {
        Self {
            left: LineHistory::new(window),
            right: LineHistory::new(window),
            window: window.max(1),
        }
    }

    pub fn history(&self, side: Side) -> &LineHistory {
        match side {
            Side::Left => &self.left,
            Side::Right => &self.right,
        }
    }

    pub fn record(&mut self, side: Side, line: LaneLine) {
        match side {
            Side::Left => self.left.push(line),
            Side::Right => self.right.push(line),
        }
    }

    /// Trailing mean over the configured window.
    pub fn smoothed(&self, side: Side) -> Option<LaneLine> {
        self.history(side).moving_average(self.window)
    }

    pub fn window(&self) -> usize {
        self.window
    }

    /// Forget everything, e.g. when a new video starts.
    pub fn reset(&mut self) {
        self.left.clear();
        self.right.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_history_has_no_average() {
        let history = LineHistory::new(30);
        assert_eq!(history.moving_average(30), None);
        assert_eq!(history.moving_average(0), None);
    }

    #[test]
    fn test_identical_values_average_exactly() {
        let mut history = LineHistory::new(30);
        let line = LaneLine::new(0.7, -42.5);
        for _ in 0..12 {
            history.push(line);
        }

        assert_eq!(history.moving_average(12), Some(line));
        assert_eq!(history.moving_average(30), Some(line));
        assert_eq!(history.moving_average(1000), Some(line));
    }

    #[test]
    fn test_window_of_one_returns_newest() {
        let mut history = LineHistory::new(30);
        history.push(LaneLine::new(1.0, 10.0));
        history.push(LaneLine::new(2.0, 20.0));
        history.push(LaneLine::new(-3.5, 7.25));

        assert_eq!(history.moving_average(1), Some(LaneLine::new(-3.5, 7.25)));
        assert_eq!(history.latest(), Some(LaneLine::new(-3.5, 7.25)));
    }

    #[test]
    fn test_average_uses_requested_window() {
        let mut history = LineHistory::new(30);
        for i in 1..=4 {
            history.push(LaneLine::new(i as f64, 10.0 * i as f64));
        }

        // newest two: 3 and 4
        assert_eq!(history.moving_average(2), Some(LaneLine::new(3.5, 35.0)));
        // window larger than history averages everything
        assert_eq!(history.moving_average(10), Some(LaneLine::new(2.5, 25.0)));
    }

    #[test]
    fn test_storage_is_bounded() {
        let mut history = LineHistory::new(3);
        for i in 0..10 {
            history.push(LaneLine::new(i as f64, 0.0));
        }

        assert_eq!(history.len(), 3);
        // 7, 8, 9 survive
        assert_eq!(history.moving_average(30), Some(LaneLine::new(8.0, 0.0)));
    }

    #[test]
    fn test_state_keeps_sides_apart() {
        let mut state = LaneState::new(30);
        state.record(Side::Left, LaneLine::new(-0.5, 450.0));
        state.record(Side::Left, LaneLine::new(-0.7, 470.0));

        assert_eq!(state.history(Side::Left).len(), 2);
        assert!(state.history(Side::Right).is_empty());
        assert_eq!(state.smoothed(Side::Right), None);

        let left = state.smoothed(Side::Left).unwrap();
        assert!((left.slope + 0.6).abs() < 1e-12);
        assert!((left.intercept - 460.0).abs() < 1e-12);
    }

    #[test]
    fn test_reset_clears_both_sides() {
        let mut state = LaneState::new(5);
        state.record(Side::Left, LaneLine::new(-0.5, 1.0));
        state.record(Side::Right, LaneLine::new(0.5, 1.0));
        state.reset();

        assert!(state.history(Side::Left).is_empty());
        assert!(state.history(Side::Right).is_empty());
        assert_eq!(state.window(), 5);
    }

    #[test]
    fn test_zero_window_is_clamped() {
        let mut state = LaneState::new(0);
        state.record(Side::Right, LaneLine::new(0.5, 3.0));
        assert_eq!(state.smoothed(Side::Right), Some(LaneLine::new(0.5, 3.0)));
        assert_eq!(state.history(Side::Right).capacity(), 1);
    }
}
