use crate::animation::ChartAnimator;
use crate::core::ViewportTransform;
use crate::interaction::{
    ChartEvent, ChartEvents, GestureStateMachine, HitTester, RadialGestureStateMachine,
};
use crate::jobs::ViewportJobQueue;

use super::{ChartEngineConfig, ChartKind};

/// Gesture state machine matching the chart kind.
#[derive(Debug, Clone)]
pub(super) enum GestureDriver {
    Cartesian(GestureStateMachine),
    Radial(RadialGestureStateMachine),
}

/// Main orchestration facade consumed by host applications.
///
/// `ChartEngine` owns the viewport transform, the gesture state machine, the
/// viewport job queue and the reveal animator of one chart. Every entry point
/// returns the [`ChartEvent`]s the host has to act on.
pub struct ChartEngine<H: HitTester> {
    pub(super) hit_tester: H,
    pub(super) config: ChartEngineConfig,
    pub(super) viewport: ViewportTransform,
    pub(super) gestures: GestureDriver,
    pub(super) jobs: ViewportJobQueue,
    pub(super) animator: ChartAnimator,
}

impl<H: HitTester> ChartEngine<H> {
    #[must_use]
    pub fn kind(&self) -> ChartKind {
        self.config.kind
    }

    /// Configuration the engine was built with, updated by the setters.
    #[must_use]
    pub fn config(&self) -> ChartEngineConfig {
        self.config
    }

    #[must_use]
    pub fn viewport(&self) -> &ViewportTransform {
        &self.viewport
    }

    #[must_use]
    pub fn hit_tester(&self) -> &H {
        &self.hit_tester
    }

    pub fn hit_tester_mut(&mut self) -> &mut H {
        &mut self.hit_tester
    }

    #[must_use]
    pub fn animator(&self) -> &ChartAnimator {
        &self.animator
    }

    /// Reveal animations are started through the animator directly; `tick`
    /// drives them afterwards.
    pub fn animator_mut(&mut self) -> &mut ChartAnimator {
        &mut self.animator
    }

    #[must_use]
    pub fn jobs(&self) -> &ViewportJobQueue {
        &self.jobs
    }

    /// Cartesian state machine; `None` for radial charts.
    #[must_use]
    pub fn gesture_state_machine(&self) -> Option<&GestureStateMachine> {
        match &self.gestures {
            GestureDriver::Cartesian(machine) => Some(machine),
            GestureDriver::Radial(_) => None,
        }
    }

    /// Radial state machine; `None` for Cartesian charts.
    #[must_use]
    pub fn radial_state_machine(&self) -> Option<&RadialGestureStateMachine> {
        match &self.gestures {
            GestureDriver::Radial(machine) => Some(machine),
            GestureDriver::Cartesian(_) => None,
        }
    }

    #[must_use]
    pub fn into_hit_tester(self) -> H {
        self.hit_tester
    }

    /// Appends a redraw request left behind by an invalidating commit.
    pub(super) fn finish_events(&mut self, mut events: ChartEvents) -> ChartEvents {
        if self.viewport.take_redraw_request() && !events.contains(&ChartEvent::RedrawRequested) {
            events.push(ChartEvent::RedrawRequested);
        }
        events
    }
}
