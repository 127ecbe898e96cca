use tracing::debug;

use crate::animation::ChartAnimator;
use crate::core::ViewportTransform;
use crate::error::ChartResult;
use crate::interaction::{GestureStateMachine, HitTester, RadialGestureStateMachine};
use crate::jobs::ViewportJobQueue;

use super::engine::GestureDriver;
use super::validation::validate_engine_config;
use super::{ChartEngine, ChartEngineConfig, ChartKind};

impl<H: HitTester> ChartEngine<H> {
    /// Creates a fully initialized engine; the whole config is validated
    /// before anything is built.
    pub fn new(hit_tester: H, config: ChartEngineConfig) -> ChartResult<Self> {
        let config = validate_engine_config(config)?;

        let mut viewport = ViewportTransform::new(config.display_density);
        viewport.set_chart_dimensions(config.viewport.width, config.viewport.height);
        viewport.restrain_view_port(config.content_offsets);
        viewport.set_horizontal(config.kind == ChartKind::HorizontalBar);
        viewport.set_scale_limits(config.scale_limits)?;
        viewport.set_drag_offset(config.drag_offset)?;

        let gestures = match config.kind {
            ChartKind::Cartesian | ChartKind::HorizontalBar => {
                GestureDriver::Cartesian(GestureStateMachine::new(
                    config.behavior,
                    config.deceleration,
                    config.tap,
                    config.display_density,
                ))
            }
            ChartKind::Radial => GestureDriver::Radial(RadialGestureStateMachine::new(
                config.behavior,
                config.deceleration,
                config.tap,
                config.display_density,
            )),
        };

        debug!(
            kind = ?config.kind,
            width = config.viewport.width,
            height = config.viewport.height,
            display_density = config.display_density,
            "chart engine created"
        );

        Ok(Self {
            hit_tester,
            config,
            viewport,
            gestures,
            jobs: ViewportJobQueue::new(config.job_pool),
            animator: ChartAnimator::new(),
        })
    }
}
