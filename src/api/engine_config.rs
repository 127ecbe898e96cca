use serde::{Deserialize, Serialize};

use crate::core::{ContentOffsets, DragOffset, ScaleLimits, Viewport};
use crate::error::{ChartError, ChartResult};
use crate::interaction::{DecelerationConfig, GestureBehavior, TapConfig};
use crate::jobs::JobPoolConfig;

/// Chart family, selecting the gesture state machine and offset layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartKind {
    /// Bar, line, scatter, candle and bubble charts.
    #[default]
    Cartesian,
    /// Cartesian chart drawn with swapped axes; inversion flips x.
    HorizontalBar,
    /// Pie and radar charts: rotation instead of pan/zoom.
    Radial,
}

impl ChartKind {
    #[must_use]
    pub fn is_radial(self) -> bool {
        self == Self::Radial
    }
}

/// Public engine bootstrap configuration.
///
/// This type is serializable so host applications can persist/load chart setup
/// without inventing their own ad-hoc format.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChartEngineConfig {
    pub viewport: Viewport,
    #[serde(default)]
    pub kind: ChartKind,
    /// Pixels per dp.
    #[serde(default = "default_display_density")]
    pub display_density: f64,
    #[serde(default)]
    pub content_offsets: ContentOffsets,
    #[serde(default)]
    pub behavior: GestureBehavior,
    #[serde(default)]
    pub scale_limits: ScaleLimits,
    #[serde(default)]
    pub drag_offset: DragOffset,
    #[serde(default)]
    pub deceleration: DecelerationConfig,
    #[serde(default)]
    pub tap: TapConfig,
    #[serde(default)]
    pub job_pool: JobPoolConfig,
}

impl ChartEngineConfig {
    /// Creates a Cartesian config with default behavior for `viewport`.
    #[must_use]
    pub fn new(viewport: Viewport) -> Self {
        Self {
            viewport,
            kind: ChartKind::default(),
            display_density: default_display_density(),
            content_offsets: ContentOffsets::default(),
            behavior: GestureBehavior::default(),
            scale_limits: ScaleLimits::default(),
            drag_offset: DragOffset::default(),
            deceleration: DecelerationConfig::default(),
            tap: TapConfig::default(),
            job_pool: JobPoolConfig::default(),
        }
    }

    #[must_use]
    pub fn with_kind(mut self, kind: ChartKind) -> Self {
        self.kind = kind;
        self
    }

    #[must_use]
    pub fn with_display_density(mut self, display_density: f64) -> Self {
        self.display_density = display_density;
        self
    }

    /// Sets the initial content rect insets.
    #[must_use]
    pub fn with_content_offsets(mut self, offsets: ContentOffsets) -> Self {
        self.content_offsets = offsets;
        self
    }

    #[must_use]
    pub fn with_behavior(mut self, behavior: GestureBehavior) -> Self {
        self.behavior = behavior;
        self
    }

    #[must_use]
    pub fn with_scale_limits(mut self, limits: ScaleLimits) -> Self {
        self.scale_limits = limits;
        self
    }

    #[must_use]
    pub fn with_drag_offset(mut self, offset: DragOffset) -> Self {
        self.drag_offset = offset;
        self
    }

    #[must_use]
    pub fn with_deceleration(mut self, config: DecelerationConfig) -> Self {
        self.deceleration = config;
        self
    }

    #[must_use]
    pub fn with_tap(mut self, config: TapConfig) -> Self {
        self.tap = config;
        self
    }

    #[must_use]
    pub fn with_job_pool(mut self, config: JobPoolConfig) -> Self {
        self.job_pool = config;
        self
    }

    /// Serializes config to pretty JSON for debug/config files.
    pub fn to_json_pretty(self) -> ChartResult<String> {
        serde_json::to_string_pretty(&self)
            .map_err(|e| ChartError::InvalidData(format!("failed to serialize config: {e}")))
    }

    /// Deserializes config from JSON.
    pub fn from_json_str(input: &str) -> ChartResult<Self> {
        serde_json::from_str(input)
            .map_err(|e| ChartError::InvalidData(format!("failed to parse config: {e}")))
    }
}

fn default_display_density() -> f64 {
    1.0
}
