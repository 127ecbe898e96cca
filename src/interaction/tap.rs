use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::core::Point;
use crate::error::{ChartError, ChartResult};
use crate::interaction::{PointerAction, PointerEvent};

/// Timing and distance thresholds of the tap detector.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TapConfig {
    /// Maximum gap between the first up and the second down of a double tap.
    pub double_tap_timeout_millis: u64,
    /// Hold time after which a stationary touch becomes a long press.
    pub long_press_timeout_millis: u64,
    /// Movement (dp) that turns a touch from a tap candidate into a scroll.
    pub touch_slop_dp: f64,
    /// Maximum distance (dp) between the two downs of a double tap.
    pub double_tap_slop_dp: f64,
    /// Release speed (dp/s) a scroll needs to count as a fling.
    pub min_fling_velocity_dp: f64,
    /// Release speeds are clamped to this (dp/s).
    pub max_fling_velocity_dp: f64,
}

impl Default for TapConfig {
    fn default() -> Self {
        Self {
            double_tap_timeout_millis: 300,
            long_press_timeout_millis: 500,
            touch_slop_dp: 8.0,
            double_tap_slop_dp: 100.0,
            min_fling_velocity_dp: 50.0,
            max_fling_velocity_dp: 8000.0,
        }
    }
}

impl TapConfig {
    pub fn validate(self) -> ChartResult<Self> {
        for (name, value) in [
            ("touch_slop_dp", self.touch_slop_dp),
            ("double_tap_slop_dp", self.double_tap_slop_dp),
            ("min_fling_velocity_dp", self.min_fling_velocity_dp),
            ("max_fling_velocity_dp", self.max_fling_velocity_dp),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(ChartError::InvalidData(format!(
                    "tap {name} must be finite and >= 0"
                )));
            }
        }
        if self.min_fling_velocity_dp > self.max_fling_velocity_dp {
            return Err(ChartError::InvalidData(
                "tap min_fling_velocity_dp must not exceed max_fling_velocity_dp".to_owned(),
            ));
        }
        Ok(self)
    }
}

/// Tap-level gesture recognized from raw pointer input.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TapEvent {
    SingleTapUp(Point),
    DoubleTap(Point),
    LongPress(Point),
    Fling { velocity: Point },
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct PreviousTap {
    down: Point,
    up_time_millis: u64,
}

/// Classifies single taps, double taps, long presses and flings.
///
/// The detector is fed every pointer event it may observe plus frame ticks;
/// long presses fire from `tick` because nothing else happens while a finger
/// rests on the surface.
#[derive(Debug, Clone, PartialEq)]
pub struct TapDetector {
    double_tap_timeout_millis: u64,
    long_press_timeout_millis: u64,
    touch_slop_px: f64,
    double_tap_slop_px: f64,
    min_fling_velocity_px: f64,
    max_fling_velocity_px: f64,
    down: Option<(Point, u64)>,
    in_tap_region: bool,
    long_press_armed: bool,
    long_press_fired: bool,
    double_tapping: bool,
    previous_tap: Option<PreviousTap>,
}

impl TapDetector {
    #[must_use]
    pub fn new(config: TapConfig, display_density: f64) -> Self {
        Self {
            double_tap_timeout_millis: config.double_tap_timeout_millis,
            long_press_timeout_millis: config.long_press_timeout_millis,
            touch_slop_px: config.touch_slop_dp * display_density,
            double_tap_slop_px: config.double_tap_slop_dp * display_density,
            min_fling_velocity_px: config.min_fling_velocity_dp * display_density,
            max_fling_velocity_px: config.max_fling_velocity_dp * display_density,
            down: None,
            in_tap_region: false,
            long_press_armed: false,
            long_press_fired: false,
            double_tapping: false,
            previous_tap: None,
        }
    }

    #[must_use]
    pub fn min_fling_velocity_px(&self) -> f64 {
        self.min_fling_velocity_px
    }

    #[must_use]
    pub fn max_fling_velocity_px(&self) -> f64 {
        self.max_fling_velocity_px
    }

    #[must_use]
    pub fn is_waiting_for_long_press(&self) -> bool {
        self.long_press_armed && !self.long_press_fired
    }

    /// Feeds one pointer event. `release_velocity` (px/s) is only read on
    /// `Up` and must already be clamped by the caller.
    pub fn on_event(&mut self, event: &PointerEvent, release_velocity: Point) -> Option<TapEvent> {
        let position = event.position()?;
        match event.action {
            PointerAction::Down => self.on_down(position, event.time_millis),
            PointerAction::PointerDown => {
                self.in_tap_region = false;
                self.long_press_armed = false;
                self.previous_tap = None;
                None
            }
            PointerAction::Move => {
                self.on_move(position);
                None
            }
            PointerAction::PointerUp => None,
            PointerAction::Up => self.on_up(event.time_millis, release_velocity),
            PointerAction::Cancel => {
                self.reset();
                None
            }
        }
    }

    /// Fires a pending long press once its timeout elapsed.
    pub fn tick(&mut self, now_millis: u64) -> Option<TapEvent> {
        if !self.is_waiting_for_long_press() {
            return None;
        }
        let (down, down_time) = self.down?;
        if now_millis.saturating_sub(down_time) < self.long_press_timeout_millis {
            return None;
        }
        self.long_press_fired = true;
        self.in_tap_region = false;
        self.previous_tap = None;
        trace!(x = down.x, y = down.y, "long press recognized");
        Some(TapEvent::LongPress(down))
    }

    pub fn reset(&mut self) {
        self.down = None;
        self.in_tap_region = false;
        self.long_press_armed = false;
        self.long_press_fired = false;
        self.double_tapping = false;
        self.previous_tap = None;
    }

    fn on_down(&mut self, position: Point, time_millis: u64) -> Option<TapEvent> {
        let double_tap = self.previous_tap.take().is_some_and(|previous| {
            time_millis.saturating_sub(previous.up_time_millis) <= self.double_tap_timeout_millis
                && previous.down.distance_to(position) <= self.double_tap_slop_px
        });

        self.down = Some((position, time_millis));
        self.in_tap_region = true;
        self.long_press_armed = true;
        self.long_press_fired = false;
        self.double_tapping = double_tap;

        if double_tap {
            trace!(x = position.x, y = position.y, "double tap recognized");
            self.long_press_armed = false;
            return Some(TapEvent::DoubleTap(position));
        }
        None
    }

    fn on_move(&mut self, position: Point) {
        let Some((down, _)) = self.down else {
            return;
        };
        if self.in_tap_region && down.distance_to(position) > self.touch_slop_px {
            self.in_tap_region = false;
            self.long_press_armed = false;
        }
    }

    fn on_up(&mut self, time_millis: u64, release_velocity: Point) -> Option<TapEvent> {
        let (down, _) = self.down.take()?;
        self.long_press_armed = false;

        if std::mem::take(&mut self.double_tapping) || self.long_press_fired {
            self.previous_tap = None;
            return None;
        }
        if self.in_tap_region {
            self.previous_tap = Some(PreviousTap {
                down,
                up_time_millis: time_millis,
            });
            return Some(TapEvent::SingleTapUp(down));
        }

        self.previous_tap = None;
        let fast = release_velocity.x.abs() > self.min_fling_velocity_px
            || release_velocity.y.abs() > self.min_fling_velocity_px;
        fast.then_some(TapEvent::Fling {
            velocity: release_velocity,
        })
    }
}
