use serde::{Deserialize, Serialize};

use crate::error::{ChartError, ChartResult};

fn default_true() -> bool {
    true
}

fn default_drag_trigger_distance_dp() -> f64 {
    3.0
}

/// Host-configurable gesture gates for Cartesian and radial charts.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GestureBehavior {
    /// Enables horizontal drag panning.
    #[serde(default = "default_true")]
    pub drag_x_enabled: bool,
    /// Enables vertical drag panning.
    #[serde(default = "default_true")]
    pub drag_y_enabled: bool,
    /// Enables zoom gestures along x.
    #[serde(default = "default_true")]
    pub scale_x_enabled: bool,
    /// Enables zoom gestures along y.
    #[serde(default = "default_true")]
    pub scale_y_enabled: bool,
    /// Two-pointer gestures scale both axes together instead of picking one.
    #[serde(default)]
    pub pinch_zoom_enabled: bool,
    #[serde(default = "default_true")]
    pub double_tap_to_zoom_enabled: bool,
    #[serde(default = "default_true")]
    pub highlight_per_tap_enabled: bool,
    #[serde(default = "default_true")]
    pub highlight_per_drag_enabled: bool,
    /// Keeps panning (or rotating) after release with friction decay.
    #[serde(default = "default_true")]
    pub drag_deceleration_enabled: bool,
    /// Lets the tap detector observe events while a gesture is active.
    #[serde(default)]
    pub fling_enabled: bool,
    /// Radial charts only.
    #[serde(default = "default_true")]
    pub rotation_enabled: bool,
    /// Pointer travel (dp) before a touch becomes a drag.
    #[serde(default = "default_drag_trigger_distance_dp")]
    pub drag_trigger_distance_dp: f64,
}

impl Default for GestureBehavior {
    fn default() -> Self {
        Self {
            drag_x_enabled: true,
            drag_y_enabled: true,
            scale_x_enabled: true,
            scale_y_enabled: true,
            pinch_zoom_enabled: false,
            double_tap_to_zoom_enabled: true,
            highlight_per_tap_enabled: true,
            highlight_per_drag_enabled: true,
            drag_deceleration_enabled: true,
            fling_enabled: false,
            rotation_enabled: true,
            drag_trigger_distance_dp: default_drag_trigger_distance_dp(),
        }
    }
}

impl GestureBehavior {
    #[must_use]
    pub fn with_drag(mut self, x: bool, y: bool) -> Self {
        self.drag_x_enabled = x;
        self.drag_y_enabled = y;
        self
    }

    #[must_use]
    pub fn with_scale(mut self, x: bool, y: bool) -> Self {
        self.scale_x_enabled = x;
        self.scale_y_enabled = y;
        self
    }

    #[must_use]
    pub fn with_pinch_zoom(mut self, enabled: bool) -> Self {
        self.pinch_zoom_enabled = enabled;
        self
    }

    #[must_use]
    pub fn with_drag_deceleration(mut self, enabled: bool) -> Self {
        self.drag_deceleration_enabled = enabled;
        self
    }

    #[must_use]
    pub fn allows_drag(self) -> bool {
        self.drag_x_enabled || self.drag_y_enabled
    }

    #[must_use]
    pub fn allows_scale(self) -> bool {
        self.scale_x_enabled || self.scale_y_enabled
    }

    /// Whether the dominant direction of a `(dx, dy)` move may start a drag.
    #[must_use]
    pub(crate) fn allows_drag_direction(self, dx: f64, dy: f64) -> bool {
        let (dx, dy) = (dx.abs(), dy.abs());
        (self.drag_x_enabled || dy >= dx) && (self.drag_y_enabled || dy <= dx)
    }

    pub fn validate(self) -> ChartResult<Self> {
        if !self.drag_trigger_distance_dp.is_finite() || self.drag_trigger_distance_dp < 0.0 {
            return Err(ChartError::InvalidData(
                "drag trigger distance must be finite and >= 0".to_owned(),
            ));
        }
        Ok(self)
    }
}
