use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::core::{AxisDependency, Point, ViewportTransform};
use crate::interaction::events::push_redraw;
use crate::interaction::{ChartEvent, ChartEvents};

/// What a viewport job does once it runs.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ViewportJobKind {
    /// Centers the content rect on a value point.
    Move { value: Point },
    /// Zooms by relative factors, then centers on a value point.
    Zoom {
        scale_x: f64,
        scale_y: f64,
        value: Point,
    },
    /// Moves the centered value from `origin` to `target`.
    AnimatedMove { origin: Point, target: Point },
    /// Moves the absolute scale from `origin_scale` to `target_scale` while
    /// the top-left value travels from `zoom_origin` to the window that
    /// centers `zoom_center`.
    AnimatedZoom {
        origin_scale: Point,
        target_scale: Point,
        zoom_origin: Point,
        zoom_center: Point,
    },
}

impl ViewportJobKind {
    #[must_use]
    pub fn is_animated(self) -> bool {
        matches!(self, Self::AnimatedMove { .. } | Self::AnimatedZoom { .. })
    }
}

/// Deferred viewport mutation owned by the job queue while it is live.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewportJob {
    pub kind: ViewportJobKind,
    pub axis: AxisDependency,
    pub duration_millis: u64,
    phase: f64,
    started_at_millis: Option<u64>,
}

fn lerp(from: Point, to: Point, phase: f64) -> Point {
    Point::new(
        from.x + (to.x - from.x) * phase,
        from.y + (to.y - from.y) * phase,
    )
}

impl ViewportJob {
    #[must_use]
    pub fn new(kind: ViewportJobKind, axis: AxisDependency, duration_millis: u64) -> Self {
        Self {
            kind,
            axis,
            duration_millis,
            phase: 0.0,
            started_at_millis: None,
        }
    }

    #[must_use]
    pub fn phase(&self) -> f64 {
        self.phase
    }

    #[must_use]
    pub fn started_at_millis(&self) -> Option<u64> {
        self.started_at_millis
    }

    pub(crate) fn start(&mut self, now_millis: u64) {
        self.phase = 0.0;
        self.started_at_millis = Some(now_millis);
    }

    /// Recomputes the phase from the elapsed time; returns it.
    pub(crate) fn advance(&mut self, now_millis: u64) -> f64 {
        let started = *self.started_at_millis.get_or_insert(now_millis);
        self.phase = if self.duration_millis == 0 {
            1.0
        } else {
            let elapsed = now_millis.saturating_sub(started) as f64;
            (elapsed / self.duration_millis as f64).clamp(0.0, 1.0)
        };
        self.phase
    }

    /// Executes a one-shot job.
    pub(crate) fn run_once(&self, viewport: &mut ViewportTransform, events: &mut ChartEvents) {
        match self.kind {
            ViewportJobKind::Move { value } => {
                let pixel = viewport.value_to_pixel(self.axis, value);
                viewport.center_view_port(self.axis, pixel);
                push_redraw(events);
            }
            ViewportJobKind::Zoom {
                scale_x,
                scale_y,
                value,
            } => {
                let Some(candidate) = viewport.zoom_about_origin(scale_x, scale_y) else {
                    return;
                };
                viewport.refresh(candidate, false);
                self.align_on_center(value, viewport);
                events.push(ChartEvent::OffsetsRecalculationRequested);
                push_redraw(events);
            }
            ViewportJobKind::AnimatedMove { .. } | ViewportJobKind::AnimatedZoom { .. } => {
                self.apply_phase(1.0, viewport, events);
            }
        }
    }

    /// Applies an animated job at `phase`.
    pub(crate) fn apply_phase(
        &self,
        phase: f64,
        viewport: &mut ViewportTransform,
        events: &mut ChartEvents,
    ) {
        match self.kind {
            ViewportJobKind::AnimatedMove { origin, target } => {
                let value = lerp(origin, target, phase);
                let pixel = viewport.value_to_pixel(self.axis, value);
                viewport.center_view_port(self.axis, pixel);
                push_redraw(events);
            }
            ViewportJobKind::AnimatedZoom {
                origin_scale,
                target_scale,
                zoom_origin,
                zoom_center,
            } => {
                let scale = lerp(origin_scale, target_scale, phase);
                let Some(candidate) = viewport.set_zoom(scale.x, scale.y) else {
                    return;
                };
                viewport.refresh(candidate, false);

                // The visible span depends on the new scale.
                let Some(target_origin) = viewport.top_left_value_for_center(self.axis, zoom_center)
                else {
                    warn!(axis = ?self.axis, "animated zoom skipped on degenerate axis mapping");
                    return;
                };
                let origin = lerp(zoom_origin, target_origin, phase);
                let pixel = viewport.value_to_pixel(self.axis, origin);
                viewport.align_view_port_origin(self.axis, pixel);
                push_redraw(events);
            }
            ViewportJobKind::Move { .. } | ViewportJobKind::Zoom { .. } => {}
        }
    }

    /// Side effects of an animated job reaching phase 1.
    pub(crate) fn complete(&self, events: &mut ChartEvents) {
        if let ViewportJobKind::AnimatedZoom { .. } = self.kind {
            events.push(ChartEvent::OffsetsRecalculationRequested);
            push_redraw(events);
        }
    }

    fn align_on_center(&self, value: Point, viewport: &mut ViewportTransform) {
        match viewport.top_left_value_for_center(self.axis, value) {
            Some(top_left) => {
                let pixel = viewport.value_to_pixel(self.axis, top_left);
                viewport.align_view_port_origin(self.axis, pixel);
            }
            None => warn!(axis = ?self.axis, "zoom job could not center on degenerate axis"),
        }
    }
}
