use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::core::Point;
use crate::interaction::Highlight;

/// Raw pointer action, mirroring the host input system's masked actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PointerAction {
    /// First pointer touches down.
    Down,
    /// An additional pointer touches down.
    PointerDown,
    Move,
    /// A non-final pointer lifts while others stay down.
    PointerUp,
    /// Last pointer lifts.
    Up,
    Cancel,
}

/// One tracked pointer inside a [`PointerEvent`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Pointer {
    pub id: u32,
    pub x: f64,
    pub y: f64,
}

impl Pointer {
    #[must_use]
    pub fn new(id: u32, x: f64, y: f64) -> Self {
        Self { id, x, y }
    }

    #[must_use]
    pub fn position(self) -> Point {
        Point::new(self.x, self.y)
    }
}

/// Pointer event in screen pixels with a monotonic timestamp.
///
/// `pointers` lists every pointer that is down, the primary pointer first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PointerEvent {
    pub action: PointerAction,
    pub time_millis: u64,
    pub pointers: SmallVec<[Pointer; 2]>,
}

impl PointerEvent {
    #[must_use]
    pub fn new(action: PointerAction, time_millis: u64, pointers: &[Pointer]) -> Self {
        Self {
            action,
            time_millis,
            pointers: SmallVec::from_slice(pointers),
        }
    }

    /// Single-pointer event with pointer id 0.
    #[must_use]
    pub fn single(action: PointerAction, time_millis: u64, x: f64, y: f64) -> Self {
        Self::new(action, time_millis, &[Pointer::new(0, x, y)])
    }

    /// Two-pointer event with pointer ids 0 and 1.
    #[must_use]
    pub fn pair(action: PointerAction, time_millis: u64, first: Point, second: Point) -> Self {
        Self::new(
            action,
            time_millis,
            &[
                Pointer::new(0, first.x, first.y),
                Pointer::new(1, second.x, second.y),
            ],
        )
    }

    #[must_use]
    pub fn pointer_count(&self) -> usize {
        self.pointers.len()
    }

    /// Position of the primary pointer; `None` for an empty event.
    #[must_use]
    pub fn position(&self) -> Option<Point> {
        self.pointers.first().map(|pointer| pointer.position())
    }

    #[must_use]
    pub fn is_finite(&self) -> bool {
        self.pointers
            .iter()
            .all(|pointer| pointer.x.is_finite() && pointer.y.is_finite())
    }

    fn first_pair(&self) -> Option<(Point, Point)> {
        match self.pointers.as_slice() {
            [first, second, ..] => Some((first.position(), second.position())),
            _ => None,
        }
    }

    /// Distance between the first two pointers.
    #[must_use]
    pub fn spacing(&self) -> Option<f64> {
        self.first_pair().map(|(a, b)| a.distance_to(b))
    }

    #[must_use]
    pub fn x_spread(&self) -> Option<f64> {
        self.first_pair().map(|(a, b)| (a.x - b.x).abs())
    }

    #[must_use]
    pub fn y_spread(&self) -> Option<f64> {
        self.first_pair().map(|(a, b)| (a.y - b.y).abs())
    }

    #[must_use]
    pub fn midpoint(&self) -> Option<Point> {
        self.first_pair().map(|(a, b)| a.midpoint(b))
    }
}

/// Gesture classification exposed in start/end notifications.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ChartGesture {
    #[default]
    None,
    Drag,
    XZoom,
    YZoom,
    PinchZoom,
    Rotate,
    SingleTap,
    DoubleTap,
    LongPress,
    Fling,
}

/// Active touch mode of a gesture state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum TouchMode {
    #[default]
    None,
    Drag,
    XZoom,
    YZoom,
    PinchZoom,
    /// A pointer lifted during a multi-pointer gesture.
    PostZoom,
    Rotate,
}

impl TouchMode {
    #[must_use]
    pub fn is_zoom(self) -> bool {
        matches!(self, Self::XZoom | Self::YZoom | Self::PinchZoom)
    }
}

/// Outcome of input handling or frame ticking, consumed by the host.
///
/// Events are pushed in the order the engine produced them: mutation events
/// always precede the `RedrawRequested` they cause.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ChartEvent {
    GestureStarted {
        gesture: ChartGesture,
    },
    GestureEnded {
        gesture: ChartGesture,
    },
    /// Drag delta in screen pixels relative to the touch-down point.
    Translated {
        dx: f64,
        dy: f64,
    },
    /// Requested (unlimited) scale ratio of a zoom gesture.
    Scaled {
        scale_x: f64,
        scale_y: f64,
    },
    /// Radial rotation angle in degrees, normalized into `[0, 360)`.
    Rotated {
        angle: f64,
    },
    SingleTapped {
        x: f64,
        y: f64,
    },
    DoubleTapped {
        x: f64,
        y: f64,
    },
    LongPressed {
        x: f64,
        y: f64,
    },
    Flung {
        velocity_x: f64,
        velocity_y: f64,
    },
    /// `None` clears the current highlight.
    ValueHighlighted(Option<Highlight>),
    /// Axis label sizes may have changed; the host should recompute offsets.
    OffsetsRecalculationRequested,
    RedrawRequested,
}

/// Events of one input or tick; four inline slots cover the common frames.
pub type ChartEvents = SmallVec<[ChartEvent; 4]>;

/// Pushes `RedrawRequested` unless it is already the last event.
pub(crate) fn push_redraw(events: &mut ChartEvents) {
    if events.last() != Some(&ChartEvent::RedrawRequested) {
        events.push(ChartEvent::RedrawRequested);
    }
}

#[cfg(test)]
mod tests {
    use super::{ChartEvent, ChartEvents, PointerAction, PointerEvent, push_redraw};
    use crate::core::Point;

    #[test]
    fn pair_geometry_uses_first_two_pointers() {
        let event = PointerEvent::pair(
            PointerAction::PointerDown,
            0,
            Point::new(100.0, 100.0),
            Point::new(130.0, 140.0),
        );
        assert_eq!(event.spacing(), Some(50.0));
        assert_eq!(event.x_spread(), Some(30.0));
        assert_eq!(event.y_spread(), Some(40.0));
        assert_eq!(event.midpoint(), Some(Point::new(115.0, 120.0)));
    }

    #[test]
    fn single_pointer_has_no_spacing() {
        let event = PointerEvent::single(PointerAction::Move, 5, 1.0, 2.0);
        assert_eq!(event.spacing(), None);
        assert_eq!(event.position(), Some(Point::new(1.0, 2.0)));
    }

    #[test]
    fn redraw_is_not_duplicated_back_to_back() {
        let mut events = ChartEvents::new();
        push_redraw(&mut events);
        push_redraw(&mut events);
        assert_eq!(events.len(), 1);
        events.push(ChartEvent::OffsetsRecalculationRequested);
        push_redraw(&mut events);
        assert_eq!(events.len(), 3);
    }
}
