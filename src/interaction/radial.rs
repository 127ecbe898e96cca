use tracing::{debug, warn};

use crate::core::{Point, ViewportTransform};
use crate::interaction::events::push_redraw;
use crate::interaction::highlight::HighlightTracker;
use crate::interaction::{
    AngularDeceleration, ChartEvent, ChartEvents, ChartGesture, DecelerationConfig,
    GestureBehavior, Highlight, HitTester, PointerAction, PointerEvent, TapConfig, TapDetector,
    TapEvent, TouchMode, VelocityWindow,
};

/// Pointer travel (dp) before a radial touch becomes a rotation.
pub const ROTATE_TRIGGER_DISTANCE_DP: f64 = 8.0;

/// Angle in degrees of `point` around `center`, measured clockwise on screen
/// with 0 (and 360) pointing right.
#[must_use]
pub fn angle_for_point(center: Point, point: Point) -> f64 {
    let tx = point.x - center.x;
    let ty = point.y - center.y;
    let length = (tx * tx + ty * ty).sqrt();
    if length == 0.0 || !length.is_finite() {
        return 0.0;
    }
    let r = (ty / length).clamp(-1.0, 1.0).acos().to_degrees();

    let mut angle = if point.x > center.x { 360.0 - r } else { r };
    angle += 90.0;
    if angle > 360.0 {
        angle -= 360.0;
    }
    angle
}

/// Gesture driver for pie and radar charts: rotation with angular fling,
/// tap highlighting and long press.
#[derive(Debug, Clone)]
pub struct RadialGestureStateMachine {
    behavior: GestureBehavior,
    deceleration_config: DecelerationConfig,
    mode: TouchMode,
    last_gesture: ChartGesture,
    touch_start: Point,
    start_angle: f64,
    raw_rotation_angle: f64,
    rotation_angle: f64,
    samples: VelocityWindow<f64>,
    deceleration: AngularDeceleration,
    tap: TapDetector,
    highlight: HighlightTracker,
}

impl RadialGestureStateMachine {
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
            touch_start: Point::default(),
            start_angle: 0.0,
            raw_rotation_angle: 0.0,
            rotation_angle: 0.0,
            samples: VelocityWindow::default(),
            deceleration: AngularDeceleration::default(),
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

    pub fn set_behavior(&mut self, behavior: GestureBehavior) {
        self.behavior = behavior;
    }

    pub fn set_deceleration_config(&mut self, config: DecelerationConfig) {
        self.deceleration_config = config;
    }

    /// Rotation in degrees, normalized into `[0, 360)`.
    #[must_use]
    pub fn rotation_angle(&self) -> f64 {
        self.rotation_angle
    }

    /// Rotation as last set, without normalization.
    #[must_use]
    pub fn raw_rotation_angle(&self) -> f64 {
        self.raw_rotation_angle
    }

    pub fn set_rotation_angle(&mut self, angle: f64) {
        if !angle.is_finite() {
            warn!(angle, "ignoring non-finite rotation angle");
            return;
        }
        self.raw_rotation_angle = angle;
        self.rotation_angle = angle.rem_euclid(360.0);
    }

    #[must_use]
    pub fn angular_velocity(&self) -> f64 {
        self.deceleration.velocity()
    }

    #[must_use]
    pub fn is_decelerating(&self) -> bool {
        self.deceleration.is_active()
    }

    #[must_use]
    pub fn needs_frame(&self) -> bool {
        self.deceleration.is_active() || self.tap.is_waiting_for_long_press()
    }

    #[must_use]
    pub fn last_highlighted(&self) -> Option<Highlight> {
        self.highlight.last()
    }

    pub fn set_last_highlighted(&mut self, highlight: Option<Highlight>) {
        self.highlight.set_last(highlight);
    }

    pub fn stop_deceleration(&mut self) {
        self.deceleration.stop();
    }

    pub fn handle_event<H: HitTester + ?Sized>(
        &mut self,
        event: &PointerEvent,
        viewport: &ViewportTransform,
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

        if let Some(tap) = self.tap.on_event(event, Point::default()) {
            let consumed = self.handle_tap(tap, hit_tester, &mut events);
            if consumed {
                self.set_mode(TouchMode::None);
                return events;
            }
        }

        if !self.behavior.rotation_enabled {
            return events;
        }

        let center = viewport.content_rect().center();
        let decelerate = self.behavior.drag_deceleration_enabled;
        match event.action {
            PointerAction::Down => {
                events.push(ChartEvent::GestureStarted {
                    gesture: self.last_gesture,
                });
                self.deceleration.stop();
                self.samples.clear();
                if decelerate {
                    self.sample(event.time_millis, center, position);
                }
                self.start_angle = angle_for_point(center, position) - self.raw_rotation_angle;
                self.touch_start = position;
            }
            PointerAction::Move => {
                if decelerate {
                    self.sample(event.time_millis, center, position);
                }
                let trigger = viewport.dp_to_px(ROTATE_TRIGGER_DISTANCE_DP);
                if self.mode == TouchMode::None && position.distance_to(self.touch_start) > trigger
                {
                    self.last_gesture = ChartGesture::Rotate;
                    self.set_mode(TouchMode::Rotate);
                } else if self.mode == TouchMode::Rotate {
                    self.set_rotation_angle(angle_for_point(center, position) - self.start_angle);
                    events.push(ChartEvent::Rotated {
                        angle: self.rotation_angle,
                    });
                    push_redraw(&mut events);
                }
            }
            PointerAction::Up => {
                if decelerate {
                    self.deceleration.stop();
                    self.sample(event.time_millis, center, position);
                    let velocity = self.samples.angular_velocity();
                    if velocity != 0.0 {
                        self.deceleration.start(velocity, event.time_millis);
                        debug!(velocity, "angular deceleration started");
                        push_redraw(&mut events);
                    }
                }
                self.set_mode(TouchMode::None);
                events.push(ChartEvent::GestureEnded {
                    gesture: self.last_gesture,
                });
            }
            PointerAction::Cancel => {
                self.samples.clear();
                self.tap.reset();
                self.set_mode(TouchMode::None);
                events.push(ChartEvent::GestureEnded {
                    gesture: self.last_gesture,
                });
            }
            PointerAction::PointerDown | PointerAction::PointerUp => {}
        }
        events
    }

    pub fn tick<H: HitTester + ?Sized>(&mut self, now_millis: u64, hit_tester: &H) -> ChartEvents {
        let mut events = ChartEvents::new();
        if let Some(tap) = self.tap.tick(now_millis) {
            self.handle_tap(tap, hit_tester, &mut events);
        }
        events.extend(self.compute_scroll(now_millis));
        events
    }

    /// One friction step of the angular fling.
    pub fn compute_scroll(&mut self, now_millis: u64) -> ChartEvents {
        let mut events = ChartEvents::new();
        let Some(step) = self
            .deceleration
            .step(now_millis, self.deceleration_config)
        else {
            return events;
        };
        self.set_rotation_angle(self.rotation_angle + step.delta_angle);
        events.push(ChartEvent::Rotated {
            angle: self.rotation_angle,
        });
        if step.finished {
            debug!("angular deceleration finished");
        }
        push_redraw(&mut events);
        events
    }

    fn sample(&mut self, time_millis: u64, center: Point, position: Point) {
        self.samples
            .push(time_millis, angle_for_point(center, position));
    }

    fn set_mode(&mut self, mode: TouchMode) {
        if self.mode != mode {
            debug!(from = ?self.mode, to = ?mode, "radial touch mode changed");
            self.mode = mode;
        }
    }

    /// Returns `true` when the tap consumed the event.
    fn handle_tap<H: HitTester + ?Sized>(
        &mut self,
        tap: TapEvent,
        hit_tester: &H,
        events: &mut ChartEvents,
    ) -> bool {
        match tap {
            TapEvent::SingleTapUp(point) => {
                self.last_gesture = ChartGesture::SingleTap;
                events.push(ChartEvent::SingleTapped {
                    x: point.x,
                    y: point.y,
                });
                if !self.behavior.highlight_per_tap_enabled {
                    return false;
                }
                let selected = self
                    .highlight
                    .toggle(hit_tester.highlight_at(point.x, point.y));
                events.push(ChartEvent::ValueHighlighted(selected));
                push_redraw(events);
                true
            }
            TapEvent::LongPress(point) => {
                self.last_gesture = ChartGesture::LongPress;
                events.push(ChartEvent::LongPressed {
                    x: point.x,
                    y: point.y,
                });
                false
            }
            TapEvent::DoubleTap(_) | TapEvent::Fling { .. } => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{RadialGestureStateMachine, angle_for_point};
    use crate::core::{Point, ViewportTransform};
    use crate::interaction::{
        ChartEvent, DecelerationConfig, GestureBehavior, NullHitTester, PointerAction,
        PointerEvent, TapConfig, TouchMode,
    };

    fn viewport() -> ViewportTransform {
        let mut viewport = ViewportTransform::new(1.0);
        viewport.set_chart_dimensions(400.0, 400.0);
        viewport
    }

    fn machine() -> RadialGestureStateMachine {
        RadialGestureStateMachine::new(
            GestureBehavior::default(),
            DecelerationConfig::default(),
            TapConfig::default(),
            1.0,
        )
    }

    #[test]
    fn angle_grows_clockwise_from_the_right() {
        let center = Point::new(200.0, 200.0);
        assert!((angle_for_point(center, Point::new(300.0, 200.0)) - 360.0).abs() <= 1e-9);
        assert!((angle_for_point(center, Point::new(200.0, 300.0)) - 90.0).abs() <= 1e-9);
        assert!((angle_for_point(center, Point::new(100.0, 200.0)) - 180.0).abs() <= 1e-9);
        assert!((angle_for_point(center, Point::new(200.0, 100.0)) - 270.0).abs() <= 1e-9);
        assert_eq!(angle_for_point(center, center), 0.0);
    }

    #[test]
    fn drag_around_center_rotates_chart() {
        let viewport = viewport();
        let mut machine = machine();
        let hits = NullHitTester;

        machine.handle_event(
            &PointerEvent::single(PointerAction::Down, 0, 300.0, 200.0),
            &viewport,
            &hits,
        );
        machine.handle_event(
            &PointerEvent::single(PointerAction::Move, 16, 300.0, 220.0),
            &viewport,
            &hits,
        );
        assert_eq!(machine.mode(), TouchMode::Rotate);

        let events = machine.handle_event(
            &PointerEvent::single(PointerAction::Move, 32, 200.0, 300.0),
            &viewport,
            &hits,
        );
        assert!((machine.rotation_angle() - 90.0).abs() <= 1e-9);
        assert!(events.contains(&ChartEvent::RedrawRequested));
    }

    #[test]
    fn release_starts_angular_fling_that_stops() {
        let viewport = viewport();
        let mut machine = machine();
        let hits = NullHitTester;

        machine.handle_event(
            &PointerEvent::single(PointerAction::Down, 0, 300.0, 200.0),
            &viewport,
            &hits,
        );
        machine.handle_event(
            &PointerEvent::single(PointerAction::Move, 50, 290.0, 250.0),
            &viewport,
            &hits,
        );
        machine.handle_event(
            &PointerEvent::single(PointerAction::Move, 100, 250.0, 290.0),
            &viewport,
            &hits,
        );
        machine.handle_event(
            &PointerEvent::single(PointerAction::Up, 120, 200.0, 300.0),
            &viewport,
            &hits,
        );
        assert!(machine.is_decelerating());
        assert!(machine.angular_velocity() > 0.0);
        assert_eq!(machine.mode(), TouchMode::None);

        let mut now = 120;
        for _ in 0..2000 {
            now += 16;
            machine.compute_scroll(now);
            if !machine.is_decelerating() {
                break;
            }
        }
        assert!(!machine.is_decelerating());
        assert!((0.0..360.0).contains(&machine.rotation_angle()));
    }

    #[test]
    fn disabled_rotation_ignores_drags() {
        let viewport = viewport();
        let mut machine = RadialGestureStateMachine::new(
            GestureBehavior {
                rotation_enabled: false,
                ..GestureBehavior::default()
            },
            DecelerationConfig::default(),
            TapConfig::default(),
            1.0,
        );
        let hits = NullHitTester;
        machine.handle_event(
            &PointerEvent::single(PointerAction::Down, 0, 300.0, 200.0),
            &viewport,
            &hits,
        );
        machine.handle_event(
            &PointerEvent::single(PointerAction::Move, 16, 200.0, 300.0),
            &viewport,
            &hits,
        );
        assert_eq!(machine.mode(), TouchMode::None);
        assert_eq!(machine.rotation_angle(), 0.0);
    }

    #[test]
    fn negative_rotation_is_normalized() {
        let mut machine = machine();
        machine.set_rotation_angle(-30.0);
        assert_eq!(machine.raw_rotation_angle(), -30.0);
        assert!((machine.rotation_angle() - 330.0).abs() <= 1e-9);
    }
}
