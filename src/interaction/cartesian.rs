use tracing::{debug, trace, warn};

use crate::core::{AxisDependency, Matrix, Point, ViewportTransform, ZOOM_IN_STEP};
use crate::interaction::events::push_redraw;
use crate::interaction::highlight::HighlightTracker;
use crate::interaction::velocity::LINEAR_HORIZON_MILLIS;
use crate::interaction::{
    ChartEvent, ChartEvents, ChartGesture, DataSetRef, DecelerationConfig, GestureBehavior,
    Highlight, HitTester, LinearDeceleration, PointerAction, PointerEvent, TapConfig,
    TapDetector, TapEvent, TouchMode, VelocityWindow,
};

/// Pointer spacing (dp) below which a zoom frame is skipped.
pub const MIN_SCALE_POINTER_DISTANCE_DP: f64 = 3.5;

/// Initial pointer spacing (px) a second pointer needs to enter a zoom mode.
pub const ZOOM_MODE_MIN_SPACING_PX: f64 = 10.0;

const MIN_SAVED_SPREAD_PX: f64 = 1e-9;

/// Gesture classifier and driver for Cartesian (bar/line/scatter) charts.
///
/// Owns the single touch state of one chart. Every accepted mutation goes
/// through [`ViewportTransform::refresh`], so scale limits and drag bounds
/// hold after each event.
#[derive(Debug, Clone)]
pub struct GestureStateMachine {
    behavior: GestureBehavior,
    deceleration_config: DecelerationConfig,
    mode: TouchMode,
    last_gesture: ChartGesture,
    saved_matrix: Matrix,
    touch_start: Point,
    pointer_center: Point,
    saved_x_dist: f64,
    saved_y_dist: f64,
    saved_dist: f64,
    closest_data_set: Option<DataSetRef>,
    velocity: VelocityWindow<Point>,
    deceleration: LinearDeceleration,
    tap: TapDetector,
    highlight: HighlightTracker,
}

impl GestureStateMachine {
    #[must_use]
    pub fn new(
        behavior: GestureBehavior,
        deceleration_config: DecelerationConfig,
        tap_config: TapConfig,
        display_density: f64,
    ) -> Self {
        Self {
            behavior,
            deceleration_config,
            mode: TouchMode::None,
            last_gesture: ChartGesture::None,
            saved_matrix: Matrix::IDENTITY,
            touch_start: Point::default(),
            pointer_center: Point::default(),
            saved_x_dist: 1.0,
            saved_y_dist: 1.0,
            saved_dist: 1.0,
            closest_data_set: None,
            velocity: VelocityWindow::default(),
            deceleration: LinearDeceleration::default(),
            tap: TapDetector::new(tap_config, display_density),
            highlight: HighlightTracker::default(),
        }
    }

    #[must_use]
    pub fn mode(&self) -> TouchMode {
        self.mode
    }

    #[must_use]
    pub fn last_gesture(&self) -> ChartGesture {
        self.last_gesture
    }

    #[must_use]
    pub fn behavior(&self) -> GestureBehavior {
        self.behavior
    }

    pub fn set_behavior(&mut self, behavior: GestureBehavior) {
        self.behavior = behavior;
    }

    pub fn set_deceleration_config(&mut self, config: DecelerationConfig) {
        self.deceleration_config = config;
    }

    /// Velocity of the fling in flight, in px/s.
    #[must_use]
    pub fn deceleration_velocity(&self) -> Point {
        self.deceleration.velocity()
    }

    #[must_use]
    pub fn is_decelerating(&self) -> bool {
        self.deceleration.is_active()
    }

    /// Whether `tick` still has work: a fling or a pending long press.
    #[must_use]
    pub fn needs_frame(&self) -> bool {
        self.deceleration.is_active() || self.tap.is_waiting_for_long_press()
    }

    #[must_use]
    pub fn last_highlighted(&self) -> Option<Highlight> {
        self.highlight.last()
    }

    /// Syncs the toggle state with a highlight set programmatically.
    pub fn set_last_highlighted(&mut self, highlight: Option<Highlight>) {
        self.highlight.set_last(highlight);
    }

    pub fn stop_deceleration(&mut self) {
        self.deceleration.stop();
    }

    pub fn handle_event<H: HitTester + ?Sized>(
        &mut self,
        event: &PointerEvent,
        viewport: &mut ViewportTransform,
        hit_tester: &H,
    ) -> ChartEvents {
        let mut events = ChartEvents::new();
        let Some(position) = event.position() else {
            return events;
        };
        if !event.is_finite() {
            warn!(action = ?event.action, "ignoring pointer event with non-finite coordinates");
            return events;
        }

        match event.action {
            PointerAction::Cancel => self.velocity.clear(),
            PointerAction::Down => {
                self.velocity.clear();
                self.velocity.push(event.time_millis, position);
            }
            _ => self.velocity.push(event.time_millis, position),
        }

        if self.mode == TouchMode::None || self.behavior.fling_enabled {
            let release_velocity = self.release_velocity();
            if let Some(tap) = self.tap.on_event(event, release_velocity) {
                self.handle_tap(tap, viewport, hit_tester, &mut events);
            }
        }

        if !self.behavior.allows_drag() && !self.behavior.allows_scale() {
            return events;
        }

        match event.action {
            PointerAction::Down => {
                events.push(ChartEvent::GestureStarted {
                    gesture: self.last_gesture,
                });
                self.deceleration.stop();
                self.save_touch_start(position, viewport, hit_tester);
            }
            PointerAction::PointerDown => self.on_secondary_down(event, viewport, hit_tester),
            PointerAction::Move => self.on_move(event, position, viewport, hit_tester, &mut events),
            PointerAction::Up => self.on_up(event, position, &mut events),
            PointerAction::PointerUp => {
                // The remaining pointer becomes primary; its samples would fake a fling.
                self.velocity.clear();
                self.set_mode(TouchMode::PostZoom);
            }
            PointerAction::Cancel => {
                self.set_mode(TouchMode::None);
                self.tap.reset();
                events.push(ChartEvent::GestureEnded {
                    gesture: self.last_gesture,
                });
            }
        }
        events
    }

    /// Advances the fling in flight and fires pending long presses.
    pub fn tick<H: HitTester + ?Sized>(
        &mut self,
        now_millis: u64,
        viewport: &mut ViewportTransform,
        hit_tester: &H,
    ) -> ChartEvents {
        let mut events = ChartEvents::new();
        if let Some(tap) = self.tap.tick(now_millis) {
            self.handle_tap(tap, viewport, hit_tester, &mut events);
        }
        events.extend(self.compute_scroll(now_millis, viewport));
        events
    }

    /// One friction step of the fling: the virtual pointer keeps moving and
    /// is re-applied as a drag from the original touch-down point.
    pub fn compute_scroll(&mut self, now_millis: u64, viewport: &mut ViewportTransform) -> ChartEvents {
        let mut events = ChartEvents::new();
        let Some(step) = self.deceleration.step(now_millis, self.deceleration_config) else {
            return events;
        };

        let dx = if self.behavior.drag_x_enabled {
            step.position.x - self.touch_start.x
        } else {
            0.0
        };
        let dy = if self.behavior.drag_y_enabled {
            step.position.y - self.touch_start.y
        } else {
            0.0
        };
        self.perform_drag(dx, dy, viewport, false, &mut events);

        if step.finished {
            debug!("drag deceleration finished");
            events.push(ChartEvent::OffsetsRecalculationRequested);
        }
        push_redraw(&mut events);
        events
    }

    fn release_velocity(&self) -> Point {
        self.velocity
            .linear_velocity(LINEAR_HORIZON_MILLIS, self.tap.max_fling_velocity_px())
    }

    fn set_mode(&mut self, mode: TouchMode) {
        if self.mode != mode {
            debug!(from = ?self.mode, to = ?mode, "touch mode changed");
            self.mode = mode;
        }
    }

    fn save_touch_start<H: HitTester + ?Sized>(
        &mut self,
        position: Point,
        viewport: &ViewportTransform,
        hit_tester: &H,
    ) {
        self.saved_matrix = viewport.matrix();
        self.touch_start = position;
        self.closest_data_set = hit_tester.data_set_at(position.x, position.y);
    }

    fn on_secondary_down<H: HitTester + ?Sized>(
        &mut self,
        event: &PointerEvent,
        viewport: &ViewportTransform,
        hit_tester: &H,
    ) {
        let (Some(position), Some(spacing), Some(x_spread), Some(y_spread), Some(center)) = (
            event.position(),
            event.spacing(),
            event.x_spread(),
            event.y_spread(),
            event.midpoint(),
        ) else {
            return;
        };

        self.save_touch_start(position, viewport, hit_tester);
        self.saved_x_dist = x_spread;
        self.saved_y_dist = y_spread;
        self.saved_dist = spacing;

        if spacing > ZOOM_MODE_MIN_SPACING_PX {
            let behavior = self.behavior;
            let mode = if behavior.pinch_zoom_enabled {
                TouchMode::PinchZoom
            } else if behavior.scale_x_enabled != behavior.scale_y_enabled {
                if behavior.scale_x_enabled {
                    TouchMode::XZoom
                } else {
                    TouchMode::YZoom
                }
            } else if x_spread > y_spread {
                TouchMode::XZoom
            } else {
                TouchMode::YZoom
            };
            self.set_mode(mode);
        }
        self.pointer_center = center;
    }

    fn on_move<H: HitTester + ?Sized>(
        &mut self,
        event: &PointerEvent,
        position: Point,
        viewport: &mut ViewportTransform,
        hit_tester: &H,
        events: &mut ChartEvents,
    ) {
        match self.mode {
            TouchMode::Drag => {
                let dx = if self.behavior.drag_x_enabled {
                    position.x - self.touch_start.x
                } else {
                    0.0
                };
                let dy = if self.behavior.drag_y_enabled {
                    position.y - self.touch_start.y
                } else {
                    0.0
                };
                self.perform_drag(dx, dy, viewport, true, events);
            }
            mode if mode.is_zoom() => {
                if self.behavior.allows_scale() {
                    self.perform_zoom(event, viewport, events);
                }
            }
            TouchMode::None => {
                let distance = position.distance_to(self.touch_start);
                if distance <= viewport.dp_to_px(self.behavior.drag_trigger_distance_dp)
                    || !self.behavior.allows_drag()
                {
                    return;
                }
                let should_pan = !viewport.is_fully_zoomed_out() || !viewport.has_no_drag_offset();
                if should_pan {
                    let dx = position.x - self.touch_start.x;
                    let dy = position.y - self.touch_start.y;
                    if self.behavior.allows_drag_direction(dx, dy) {
                        self.last_gesture = ChartGesture::Drag;
                        self.set_mode(TouchMode::Drag);
                    }
                } else if self.behavior.highlight_per_drag_enabled {
                    self.last_gesture = ChartGesture::Drag;
                    if let Some(hit) = self
                        .highlight
                        .follow(hit_tester.highlight_at(position.x, position.y))
                    {
                        trace!(data_set = hit.data_set_index, "highlight changed by drag");
                        events.push(ChartEvent::ValueHighlighted(Some(hit)));
                        push_redraw(events);
                    }
                }
            }
            _ => {}
        }
    }

    fn on_up(&mut self, event: &PointerEvent, position: Point, events: &mut ChartEvents) {
        let velocity = self.release_velocity();
        let min_fling = self.tap.min_fling_velocity_px();
        let fast = velocity.x.abs() > min_fling || velocity.y.abs() > min_fling;
        if fast && self.mode == TouchMode::Drag && self.behavior.drag_deceleration_enabled {
            self.deceleration.stop();
            self.deceleration.start(position, velocity, event.time_millis);
            debug!(
                velocity_x = velocity.x,
                velocity_y = velocity.y,
                "drag deceleration started"
            );
            push_redraw(events);
        }

        if self.mode.is_zoom() || self.mode == TouchMode::PostZoom {
            events.push(ChartEvent::OffsetsRecalculationRequested);
            push_redraw(events);
        }

        self.set_mode(TouchMode::None);
        self.velocity.clear();
        events.push(ChartEvent::GestureEnded {
            gesture: self.last_gesture,
        });
    }

    fn perform_drag(
        &mut self,
        dx: f64,
        dy: f64,
        viewport: &mut ViewportTransform,
        invalidate: bool,
        events: &mut ChartEvents,
    ) {
        self.last_gesture = ChartGesture::Drag;
        let axis = self.gesture_axis(viewport);
        let (dx, dy) = viewport.screen_delta_to_touch(axis, dx, dy);
        viewport.refresh(self.saved_matrix.post_translate(dx, dy), invalidate);
        events.push(ChartEvent::Translated { dx, dy });
        if invalidate {
            push_redraw(events);
        }
    }

    fn perform_zoom(
        &mut self,
        event: &PointerEvent,
        viewport: &mut ViewportTransform,
        events: &mut ChartEvents,
    ) {
        let Some(total_dist) = event.spacing() else {
            return;
        };
        if total_dist <= viewport.dp_to_px(MIN_SCALE_POINTER_DISTANCE_DP) {
            return;
        }

        let axis = self.gesture_axis(viewport);
        let pivot = viewport.touch_point(axis, self.pointer_center);
        let behavior = self.behavior;

        let (scale_x, scale_y, can_zoom) = match self.mode {
            TouchMode::PinchZoom => {
                if self.saved_dist <= MIN_SAVED_SPREAD_PX {
                    return;
                }
                self.last_gesture = ChartGesture::PinchZoom;
                let scale = total_dist / self.saved_dist;
                let zooming_out = scale < 1.0;
                let can_x = if zooming_out {
                    viewport.can_zoom_out_more_x()
                } else {
                    viewport.can_zoom_in_more_x()
                };
                let can_y = if zooming_out {
                    viewport.can_zoom_out_more_y()
                } else {
                    viewport.can_zoom_in_more_y()
                };
                let scale_x = if behavior.scale_x_enabled { scale } else { 1.0 };
                let scale_y = if behavior.scale_y_enabled { scale } else { 1.0 };
                (scale_x, scale_y, can_x || can_y)
            }
            TouchMode::XZoom if behavior.scale_x_enabled => {
                let Some(x_dist) = event.x_spread() else {
                    return;
                };
                if self.saved_x_dist <= MIN_SAVED_SPREAD_PX {
                    return;
                }
                self.last_gesture = ChartGesture::XZoom;
                let scale_x = x_dist / self.saved_x_dist;
                let can_x = if scale_x < 1.0 {
                    viewport.can_zoom_out_more_x()
                } else {
                    viewport.can_zoom_in_more_x()
                };
                (scale_x, 1.0, can_x)
            }
            TouchMode::YZoom if behavior.scale_y_enabled => {
                let Some(y_dist) = event.y_spread() else {
                    return;
                };
                if self.saved_y_dist <= MIN_SAVED_SPREAD_PX {
                    return;
                }
                self.last_gesture = ChartGesture::YZoom;
                let scale_y = y_dist / self.saved_y_dist;
                let can_y = if scale_y < 1.0 {
                    viewport.can_zoom_out_more_y()
                } else {
                    viewport.can_zoom_in_more_y()
                };
                (1.0, scale_y, can_y)
            }
            _ => return,
        };

        if !can_zoom || !scale_x.is_finite() || !scale_y.is_finite() {
            return;
        }
        let limited_x = self.limited_scale_x(scale_x, pivot, viewport);
        let limited_y = self.limited_scale_y(scale_y, pivot, viewport);
        if !(limited_x > 0.0 && limited_y > 0.0) {
            return;
        }
        let candidate = self
            .saved_matrix
            .post_scale(limited_x, limited_y, pivot.x, pivot.y);
        viewport.refresh(candidate, true);
        trace!(scale_x, scale_y, limited_x, limited_y, "zoom gesture applied");
        events.push(ChartEvent::Scaled { scale_x, scale_y });
        push_redraw(events);
    }

    /// Factor that lands the saved x scale on the nearest limit instead of
    /// overshooting it.
    fn limited_scale_x(&self, scale_x: f64, pivot: Point, viewport: &ViewportTransform) -> f64 {
        let limits = viewport.scale_limits();
        let last = self.saved_matrix.scale_x;
        let resulting = self
            .saved_matrix
            .post_scale(scale_x, 1.0, pivot.x, pivot.y)
            .scale_x;
        if resulting < limits.min_scale_x {
            limits.min_scale_x / last
        } else if resulting > limits.max_scale_x {
            limits.max_scale_x / last
        } else {
            scale_x
        }
    }

    fn limited_scale_y(&self, scale_y: f64, pivot: Point, viewport: &ViewportTransform) -> f64 {
        let limits = viewport.scale_limits();
        let last = self.saved_matrix.scale_y;
        let resulting = self
            .saved_matrix
            .post_scale(1.0, scale_y, pivot.x, pivot.y)
            .scale_y;
        if resulting < limits.min_scale_y {
            limits.min_scale_y / last
        } else if resulting > limits.max_scale_y {
            limits.max_scale_y / last
        } else {
            scale_y
        }
    }

    fn handle_tap<H: HitTester + ?Sized>(
        &mut self,
        tap: TapEvent,
        viewport: &mut ViewportTransform,
        hit_tester: &H,
        events: &mut ChartEvents,
    ) {
        match tap {
            TapEvent::SingleTapUp(point) => {
                self.last_gesture = ChartGesture::SingleTap;
                events.push(ChartEvent::SingleTapped {
                    x: point.x,
                    y: point.y,
                });
                if self.behavior.highlight_per_tap_enabled {
                    let selected = self
                        .highlight
                        .toggle(hit_tester.highlight_at(point.x, point.y));
                    events.push(ChartEvent::ValueHighlighted(selected));
                    push_redraw(events);
                }
            }
            TapEvent::DoubleTap(point) => {
                self.last_gesture = ChartGesture::DoubleTap;
                events.push(ChartEvent::DoubleTapped {
                    x: point.x,
                    y: point.y,
                });
                if !self.behavior.double_tap_to_zoom_enabled || !hit_tester.has_entries() {
                    return;
                }
                let axis = self.gesture_axis_at(viewport, hit_tester.data_set_at(point.x, point.y));
                let pivot = viewport.touch_point(axis, point);
                let scale_x = if self.behavior.scale_x_enabled {
                    ZOOM_IN_STEP
                } else {
                    1.0
                };
                let scale_y = if self.behavior.scale_y_enabled {
                    ZOOM_IN_STEP
                } else {
                    1.0
                };
                if let Some(candidate) = viewport.zoom(scale_x, scale_y, pivot.x, pivot.y) {
                    viewport.refresh(candidate, true);
                    debug!(x = pivot.x, y = pivot.y, "double tap zoom");
                    events.push(ChartEvent::Scaled { scale_x, scale_y });
                    events.push(ChartEvent::OffsetsRecalculationRequested);
                    push_redraw(events);
                }
            }
            TapEvent::LongPress(point) => {
                self.last_gesture = ChartGesture::LongPress;
                events.push(ChartEvent::LongPressed {
                    x: point.x,
                    y: point.y,
                });
            }
            TapEvent::Fling { velocity } => {
                self.last_gesture = ChartGesture::Fling;
                events.push(ChartEvent::Flung {
                    velocity_x: velocity.x,
                    velocity_y: velocity.y,
                });
            }
        }
    }

    fn gesture_axis(&self, viewport: &ViewportTransform) -> AxisDependency {
        self.gesture_axis_at(viewport, self.closest_data_set)
    }

    /// The touched data set's axis; without one, any inverted axis wins.
    fn gesture_axis_at(
        &self,
        viewport: &ViewportTransform,
        data_set: Option<DataSetRef>,
    ) -> AxisDependency {
        match data_set {
            Some(data_set) => data_set.axis,
            None if viewport.is_axis_inverted(AxisDependency::Right)
                && !viewport.is_axis_inverted(AxisDependency::Left) =>
            {
                AxisDependency::Right
            }
            None => AxisDependency::Left,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::GestureStateMachine;
    use crate::core::{AxisDependency, Point, ScaleLimits, ViewportTransform};
    use crate::interaction::{
        ChartEvent, DataSetRef, DecelerationConfig, GestureBehavior, Highlight, HitTester,
        NullHitTester, PointerAction, PointerEvent, TapConfig, TouchMode,
    };

    struct FixedHits {
        highlight: Option<Highlight>,
        data_set: Option<DataSetRef>,
    }

    impl HitTester for FixedHits {
        fn highlight_at(&self, _x: f64, _y: f64) -> Option<Highlight> {
            self.highlight
        }

        fn data_set_at(&self, _x: f64, _y: f64) -> Option<DataSetRef> {
            self.data_set
        }

        fn has_entries(&self) -> bool {
            true
        }
    }

    fn viewport() -> ViewportTransform {
        let mut viewport = ViewportTransform::new(1.0);
        viewport.set_chart_dimensions(1000.0, 600.0);
        viewport
    }

    fn machine(behavior: GestureBehavior) -> GestureStateMachine {
        GestureStateMachine::new(
            behavior,
            DecelerationConfig::default(),
            TapConfig::default(),
            1.0,
        )
    }

    fn zoomed_in(viewport: &mut ViewportTransform) {
        let candidate = viewport.zoom(2.0, 2.0, 500.0, -300.0).expect("zoom");
        viewport.refresh(candidate, false);
    }

    #[test]
    fn drag_translates_by_pointer_displacement() {
        let mut viewport = viewport();
        zoomed_in(&mut viewport);
        let start_x = viewport.trans_x();
        let start_y = viewport.trans_y();
        let mut machine = machine(GestureBehavior::default());
        let hits = NullHitTester;

        machine.handle_event(
            &PointerEvent::single(PointerAction::Down, 0, 100.0, 100.0),
            &mut viewport,
            &hits,
        );
        machine.handle_event(
            &PointerEvent::single(PointerAction::Move, 16, 110.0, 106.0),
            &mut viewport,
            &hits,
        );
        assert_eq!(machine.mode(), TouchMode::Drag);

        let events = machine.handle_event(
            &PointerEvent::single(PointerAction::Move, 32, 150.0, 130.0),
            &mut viewport,
            &hits,
        );
        assert!(events.contains(&ChartEvent::Translated { dx: 50.0, dy: 30.0 }));
        assert!((viewport.trans_x() - (start_x + 50.0)).abs() <= 1e-9);
        assert!((viewport.trans_y() - (start_y + 30.0)).abs() <= 1e-9);
    }

    #[test]
    fn inverted_axis_negates_vertical_drag() {
        let mut viewport = viewport();
        viewport.set_axis_inverted(AxisDependency::Left, true);
        zoomed_in(&mut viewport);
        let mut machine = machine(GestureBehavior::default());
        let hits = FixedHits {
            highlight: None,
            data_set: Some(DataSetRef {
                index: 0,
                axis: AxisDependency::Left,
            }),
        };

        machine.handle_event(
            &PointerEvent::single(PointerAction::Down, 0, 100.0, 100.0),
            &mut viewport,
            &hits,
        );
        machine.handle_event(
            &PointerEvent::single(PointerAction::Move, 16, 100.0, 110.0),
            &mut viewport,
            &hits,
        );
        let events = machine.handle_event(
            &PointerEvent::single(PointerAction::Move, 32, 100.0, 120.0),
            &mut viewport,
            &hits,
        );
        assert!(events.contains(&ChartEvent::Translated { dx: 0.0, dy: -20.0 }));
    }

    #[test]
    fn fully_zoomed_out_drag_highlights_instead_of_panning() {
        let mut viewport = viewport();
        let mut machine = machine(GestureBehavior::default());
        let hit = Highlight::new(4.0, 2.0, 0);
        let hits = FixedHits {
            highlight: Some(hit),
            data_set: None,
        };

        machine.handle_event(
            &PointerEvent::single(PointerAction::Down, 0, 100.0, 100.0),
            &mut viewport,
            &hits,
        );
        let first = machine.handle_event(
            &PointerEvent::single(PointerAction::Move, 16, 120.0, 100.0),
            &mut viewport,
            &hits,
        );
        let second = machine.handle_event(
            &PointerEvent::single(PointerAction::Move, 32, 130.0, 100.0),
            &mut viewport,
            &hits,
        );
        assert_eq!(machine.mode(), TouchMode::None);
        assert!(first.contains(&ChartEvent::ValueHighlighted(Some(hit))));
        assert!(!second.iter().any(|e| matches!(e, ChartEvent::ValueHighlighted(_))));
    }

    #[test]
    fn pinch_stops_exactly_at_max_scale() {
        let mut viewport = viewport();
        viewport
            .set_scale_limits(ScaleLimits::default().with_x(1.0, 1.5))
            .expect("limits");
        let mut machine = machine(GestureBehavior::default().with_pinch_zoom(true));
        let hits = NullHitTester;

        machine.handle_event(
            &PointerEvent::single(PointerAction::Down, 0, 450.0, 300.0),
            &mut viewport,
            &hits,
        );
        machine.handle_event(
            &PointerEvent::pair(
                PointerAction::PointerDown,
                10,
                Point::new(450.0, 300.0),
                Point::new(550.0, 300.0),
            ),
            &mut viewport,
            &hits,
        );
        assert_eq!(machine.mode(), TouchMode::PinchZoom);

        machine.handle_event(
            &PointerEvent::pair(
                PointerAction::Move,
                30,
                Point::new(400.0, 300.0),
                Point::new(600.0, 300.0),
            ),
            &mut viewport,
            &hits,
        );
        assert_eq!(viewport.scale_x(), 1.5);
        assert!(!viewport.can_zoom_in_more_x());
    }

    #[test]
    fn second_pointer_moves_drag_straight_to_zoom() {
        let mut viewport = viewport();
        zoomed_in(&mut viewport);
        let mut machine = machine(GestureBehavior::default());
        let hits = NullHitTester;

        machine.handle_event(
            &PointerEvent::single(PointerAction::Down, 0, 100.0, 100.0),
            &mut viewport,
            &hits,
        );
        machine.handle_event(
            &PointerEvent::single(PointerAction::Move, 16, 120.0, 100.0),
            &mut viewport,
            &hits,
        );
        assert_eq!(machine.mode(), TouchMode::Drag);

        machine.handle_event(
            &PointerEvent::pair(
                PointerAction::PointerDown,
                20,
                Point::new(120.0, 100.0),
                Point::new(320.0, 140.0),
            ),
            &mut viewport,
            &hits,
        );
        assert_eq!(machine.mode(), TouchMode::XZoom);
    }

    #[test]
    fn zoom_release_requests_offset_recalculation() {
        let mut viewport = viewport();
        let mut machine = machine(GestureBehavior::default());
        let hits = NullHitTester;

        machine.handle_event(
            &PointerEvent::single(PointerAction::Down, 0, 100.0, 100.0),
            &mut viewport,
            &hits,
        );
        machine.handle_event(
            &PointerEvent::pair(
                PointerAction::PointerDown,
                10,
                Point::new(100.0, 100.0),
                Point::new(100.0, 300.0),
            ),
            &mut viewport,
            &hits,
        );
        assert_eq!(machine.mode(), TouchMode::YZoom);
        machine.handle_event(
            &PointerEvent::pair(
                PointerAction::PointerUp,
                40,
                Point::new(100.0, 100.0),
                Point::new(100.0, 300.0),
            ),
            &mut viewport,
            &hits,
        );
        assert_eq!(machine.mode(), TouchMode::PostZoom);

        let events = machine.handle_event(
            &PointerEvent::single(PointerAction::Up, 60, 100.0, 100.0),
            &mut viewport,
            &hits,
        );
        assert!(events.contains(&ChartEvent::OffsetsRecalculationRequested));
        assert_eq!(machine.mode(), TouchMode::None);
    }

    #[test]
    fn cancel_resets_mode_and_ends_gesture() {
        let mut viewport = viewport();
        zoomed_in(&mut viewport);
        let mut machine = machine(GestureBehavior::default());
        let hits = NullHitTester;

        machine.handle_event(
            &PointerEvent::single(PointerAction::Down, 0, 100.0, 100.0),
            &mut viewport,
            &hits,
        );
        machine.handle_event(
            &PointerEvent::single(PointerAction::Move, 16, 140.0, 100.0),
            &mut viewport,
            &hits,
        );
        let events = machine.handle_event(
            &PointerEvent::single(PointerAction::Cancel, 20, 140.0, 100.0),
            &mut viewport,
            &hits,
        );
        assert_eq!(machine.mode(), TouchMode::None);
        assert!(events.iter().any(|e| matches!(e, ChartEvent::GestureEnded { .. })));
        assert!(!machine.needs_frame());
    }

    #[test]
    fn fast_release_starts_fling_that_settles() {
        let mut viewport = viewport();
        zoomed_in(&mut viewport);
        let mut machine = machine(GestureBehavior::default());
        let hits = NullHitTester;

        machine.handle_event(
            &PointerEvent::single(PointerAction::Down, 0, 500.0, 300.0),
            &mut viewport,
            &hits,
        );
        for step in 1..=5_u64 {
            let x = 500.0 - 20.0 * step as f64;
            machine.handle_event(
                &PointerEvent::single(PointerAction::Move, step * 10, x, 300.0),
                &mut viewport,
                &hits,
            );
        }
        machine.handle_event(
            &PointerEvent::single(PointerAction::Up, 60, 390.0, 300.0),
            &mut viewport,
            &hits,
        );
        assert!(machine.is_decelerating());
        assert!(machine.deceleration_velocity().x < 0.0);

        let mut now = 60;
        let mut settled = false;
        for _ in 0..1000 {
            now += 16;
            let events = machine.compute_scroll(now, &mut viewport);
            if events.contains(&ChartEvent::OffsetsRecalculationRequested) {
                settled = true;
                break;
            }
        }
        assert!(settled);
        assert!(!machine.is_decelerating());
    }
}
