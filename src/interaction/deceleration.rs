use serde::{Deserialize, Serialize};

use crate::core::Point;
use crate::error::{ChartError, ChartResult};

/// Tuning for friction-based fling and rotation decay.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DecelerationConfig {
    /// Velocity multiplier applied once per step, in `[0, 1)`.
    pub friction_coef: f64,
    /// Linear deceleration stops once both components fall below this (px/s).
    pub stop_velocity_abs: f64,
    /// Angular deceleration stops below this (deg/s).
    pub stop_angular_velocity_abs: f64,
}

impl Default for DecelerationConfig {
    fn default() -> Self {
        Self {
            friction_coef: 0.9,
            stop_velocity_abs: 0.01,
            stop_angular_velocity_abs: 0.001,
        }
    }
}

impl DecelerationConfig {
    pub fn validate(self) -> ChartResult<Self> {
        if !self.friction_coef.is_finite() || !(0.0..1.0).contains(&self.friction_coef) {
            return Err(ChartError::InvalidData(
                "deceleration friction_coef must be finite and in [0, 1)".to_owned(),
            ));
        }
        if !self.stop_velocity_abs.is_finite() || self.stop_velocity_abs <= 0.0 {
            return Err(ChartError::InvalidData(
                "deceleration stop_velocity_abs must be finite and > 0".to_owned(),
            ));
        }
        if !self.stop_angular_velocity_abs.is_finite() || self.stop_angular_velocity_abs <= 0.0 {
            return Err(ChartError::InvalidData(
                "deceleration stop_angular_velocity_abs must be finite and > 0".to_owned(),
            ));
        }
        Ok(self)
    }
}

/// One advance of a linear fling.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearStep {
    /// Virtual pointer position after this step, in screen pixels.
    pub position: Point,
    pub finished: bool,
}

/// Linear fling state: a virtual pointer that keeps moving after release.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct LinearDeceleration {
    velocity: Point,
    position: Point,
    last_time_millis: u64,
}

impl LinearDeceleration {
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.velocity.x != 0.0 || self.velocity.y != 0.0
    }

    #[must_use]
    pub fn velocity(&self) -> Point {
        self.velocity
    }

    pub fn start(&mut self, position: Point, velocity: Point, now_millis: u64) {
        self.position = position;
        self.velocity = velocity;
        self.last_time_millis = now_millis;
    }

    pub fn stop(&mut self) {
        self.velocity = Point::default();
    }

    /// Decays the velocity once and advances the virtual pointer by
    /// `velocity * dt`. Returns `None` when nothing is in flight.
    pub fn step(&mut self, now_millis: u64, config: DecelerationConfig) -> Option<LinearStep> {
        if !self.is_active() {
            return None;
        }
        self.velocity.x *= config.friction_coef;
        self.velocity.y *= config.friction_coef;

        let dt = now_millis.saturating_sub(self.last_time_millis) as f64 / 1000.0;
        self.position.x += self.velocity.x * dt;
        self.position.y += self.velocity.y * dt;
        self.last_time_millis = now_millis;

        let finished = self.velocity.x.abs() < config.stop_velocity_abs
            && self.velocity.y.abs() < config.stop_velocity_abs;
        if finished {
            self.stop();
        }
        Some(LinearStep {
            position: self.position,
            finished,
        })
    }
}

/// One advance of an angular fling.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AngularStep {
    /// Rotation to add, in degrees.
    pub delta_angle: f64,
    pub finished: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct AngularDeceleration {
    velocity: f64,
    last_time_millis: u64,
}

impl AngularDeceleration {
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.velocity != 0.0
    }

    #[must_use]
    pub fn velocity(&self) -> f64 {
        self.velocity
    }

    pub fn start(&mut self, velocity: f64, now_millis: u64) {
        self.velocity = if velocity.is_finite() { velocity } else { 0.0 };
        self.last_time_millis = now_millis;
    }

    pub fn stop(&mut self) {
        self.velocity = 0.0;
    }

    pub fn step(&mut self, now_millis: u64, config: DecelerationConfig) -> Option<AngularStep> {
        if !self.is_active() {
            return None;
        }
        self.velocity *= config.friction_coef;
        let dt = now_millis.saturating_sub(self.last_time_millis) as f64 / 1000.0;
        self.last_time_millis = now_millis;
        let delta_angle = self.velocity * dt;

        let finished = self.velocity.abs() < config.stop_angular_velocity_abs;
        if finished {
            self.stop();
        }
        Some(AngularStep {
            delta_angle,
            finished,
        })
    }
}
