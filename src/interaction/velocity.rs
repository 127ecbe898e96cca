use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::core::Point;

/// Samples older than this (relative to the newest) are dropped.
pub const DEFAULT_WINDOW_MILLIS: u64 = 1000;

/// Horizon used for the release velocity of a linear drag.
pub const LINEAR_HORIZON_MILLIS: u64 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VelocitySample<T> {
    pub time_millis: u64,
    pub value: T,
}

/// Time-windowed, time-ordered sample sequence.
///
/// Pushing a sample evicts samples older than the window from the newest one,
/// but at least two samples are always kept so a velocity can be derived.
#[derive(Debug, Clone, PartialEq)]
pub struct VelocityWindow<T> {
    samples: VecDeque<VelocitySample<T>>,
    window_millis: u64,
}

impl<T: Copy> Default for VelocityWindow<T> {
    fn default() -> Self {
        Self::new(DEFAULT_WINDOW_MILLIS)
    }
}

impl<T: Copy> VelocityWindow<T> {
    #[must_use]
    pub fn new(window_millis: u64) -> Self {
        Self {
            samples: VecDeque::new(),
            window_millis,
        }
    }

    pub fn push(&mut self, time_millis: u64, value: T) {
        self.samples.push_back(VelocitySample { time_millis, value });
        while self.samples.len() > 2 {
            let Some(front) = self.samples.front() else {
                break;
            };
            if time_millis.saturating_sub(front.time_millis) > self.window_millis {
                self.samples.pop_front();
            } else {
                break;
            }
        }
    }

    pub fn clear(&mut self) {
        self.samples.clear();
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn samples(&self) -> impl Iterator<Item = &VelocitySample<T>> {
        self.samples.iter()
    }
}

impl VelocityWindow<Point> {
    /// Pointer velocity in px/s over the trailing `horizon_millis`, each
    /// component clamped to `±max_velocity`.
    #[must_use]
    pub fn linear_velocity(&self, horizon_millis: u64, max_velocity: f64) -> Point {
        let Some(last) = self.samples.back() else {
            return Point::default();
        };
        let oldest = self
            .samples
            .iter()
            .find(|sample| last.time_millis.saturating_sub(sample.time_millis) <= horizon_millis)
            .unwrap_or(last);

        let dt = last.time_millis.saturating_sub(oldest.time_millis) as f64 / 1000.0;
        if dt <= 0.0 {
            return Point::default();
        }
        let clamp = |value: f64| {
            if value.is_finite() {
                value.clamp(-max_velocity, max_velocity)
            } else {
                0.0
            }
        };
        Point::new(
            clamp((last.value.x - oldest.value.x) / dt),
            clamp((last.value.y - oldest.value.y) / dt),
        )
    }
}

impl VelocityWindow<f64> {
    /// Angular velocity in degrees per second between the first and last
    /// sample, corrected for the 0/360 wrap.
    ///
    /// The sign comes from comparing the last sample with its nearest
    /// distinct predecessor; positive means clockwise.
    #[must_use]
    pub fn angular_velocity(&self) -> f64 {
        let (Some(first), Some(last)) = (self.samples.front(), self.samples.back()) else {
            return 0.0;
        };
        let before_last = self
            .samples
            .iter()
            .rev()
            .find(|sample| sample.value != last.value)
            .unwrap_or(first);

        let mut dt = last.time_millis.saturating_sub(first.time_millis) as f64 / 1000.0;
        if dt == 0.0 {
            dt = 0.1;
        }

        let mut clockwise = last.value >= before_last.value;
        if (last.value - before_last.value).abs() > 270.0 {
            clockwise = !clockwise;
        }

        let mut first_angle = first.value;
        let mut last_angle = last.value;
        if last_angle - first_angle > 180.0 {
            first_angle += 360.0;
        } else if first_angle - last_angle > 180.0 {
            last_angle += 360.0;
        }

        let velocity = ((last_angle - first_angle) / dt).abs();
        if clockwise { velocity } else { -velocity }
    }
}
