use serde::{Deserialize, Serialize};

use crate::error::{ChartError, ChartResult};

/// Zoom bounds applied to every committed touch matrix.
///
/// `max_scale_*` of `f64::MAX` means the axis can zoom in without bound.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScaleLimits {
    pub min_scale_x: f64,
    pub max_scale_x: f64,
    pub min_scale_y: f64,
    pub max_scale_y: f64,
}

impl Default for ScaleLimits {
    fn default() -> Self {
        Self {
            min_scale_x: 1.0,
            max_scale_x: f64::MAX,
            min_scale_y: 1.0,
            max_scale_y: f64::MAX,
        }
    }
}

impl ScaleLimits {
    /// Builds limits with the host-facing conventions: minimums below 1 are
    /// raised to 1 and a maximum of 0 means unbounded.
    pub fn new(
        min_scale_x: f64,
        max_scale_x: f64,
        min_scale_y: f64,
        max_scale_y: f64,
    ) -> ChartResult<Self> {
        Self {
            min_scale_x: normalize_min(min_scale_x),
            max_scale_x: normalize_max(max_scale_x),
            min_scale_y: normalize_min(min_scale_y),
            max_scale_y: normalize_max(max_scale_y),
        }
        .validate()
    }

    #[must_use]
    pub fn with_x(mut self, min_scale: f64, max_scale: f64) -> Self {
        self.min_scale_x = normalize_min(min_scale);
        self.max_scale_x = normalize_max(max_scale);
        self
    }

    #[must_use]
    pub fn with_y(mut self, min_scale: f64, max_scale: f64) -> Self {
        self.min_scale_y = normalize_min(min_scale);
        self.max_scale_y = normalize_max(max_scale);
        self
    }

    pub fn validate(self) -> ChartResult<Self> {
        for (axis, min, max) in [
            ("x", self.min_scale_x, self.max_scale_x),
            ("y", self.min_scale_y, self.max_scale_y),
        ] {
            if !min.is_finite() || !max.is_finite() || min <= 0.0 {
                return Err(ChartError::InvalidScaleLimits(format!(
                    "{axis} scale limits must be finite and > 0: min={min}, max={max}"
                )));
            }
            if min > max {
                return Err(ChartError::InvalidScaleLimits(format!(
                    "{axis} min scale must not exceed max scale: min={min}, max={max}"
                )));
            }
        }
        Ok(self)
    }
}

fn normalize_min(value: f64) -> f64 {
    if value < 1.0 { 1.0 } else { value }
}

fn normalize_max(value: f64) -> f64 {
    if value == 0.0 { f64::MAX } else { value }
}

/// Extra pan room (in dp) past the content edges.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct DragOffset {
    pub x_dp: f64,
    pub y_dp: f64,
}

impl DragOffset {
    pub fn validate(self) -> ChartResult<Self> {
        if !self.x_dp.is_finite() || !self.y_dp.is_finite() || self.x_dp < 0.0 || self.y_dp < 0.0
        {
            return Err(ChartError::InvalidData(
                "drag offsets must be finite and >= 0".to_owned(),
            ));
        }
        Ok(self)
    }
}
