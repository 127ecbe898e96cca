use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};

use crate::core::AxisDependency;

/// A selected entry as reported by the host's hit test.
///
/// Coordinates are wrapped in `OrderedFloat` so highlights compare and hash
/// totally; "same target as last time" checks are plain equality.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Highlight {
    pub x: OrderedFloat<f64>,
    pub y: OrderedFloat<f64>,
    pub data_set_index: usize,
    pub stack_index: Option<usize>,
}

impl Highlight {
    #[must_use]
    pub fn new(x: f64, y: f64, data_set_index: usize) -> Self {
        Self {
            x: OrderedFloat(x),
            y: OrderedFloat(y),
            data_set_index,
            stack_index: None,
        }
    }

    #[must_use]
    pub fn with_stack_index(mut self, stack_index: usize) -> Self {
        self.stack_index = Some(stack_index);
        self
    }
}

/// Data set under a touch point and the axis it is plotted against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DataSetRef {
    pub index: usize,
    pub axis: AxisDependency,
}

/// Hit-testing seam implemented by the host's data/rendering layer.
pub trait HitTester {
    /// Entry under the screen point, if any.
    fn highlight_at(&self, x: f64, y: f64) -> Option<Highlight>;

    /// Data set closest to the screen point, if any.
    fn data_set_at(&self, x: f64, y: f64) -> Option<DataSetRef>;

    /// Whether the chart currently has at least one entry.
    fn has_entries(&self) -> bool;
}

/// Hit tester for charts without data; every query misses.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullHitTester;

impl HitTester for NullHitTester {
    fn highlight_at(&self, _x: f64, _y: f64) -> Option<Highlight> {
        None
    }

    fn data_set_at(&self, _x: f64, _y: f64) -> Option<DataSetRef> {
        None
    }

    fn has_entries(&self) -> bool {
        false
    }
}

/// Remembers the last reported highlight of one state machine.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub(crate) struct HighlightTracker {
    last: Option<Highlight>,
}

impl HighlightTracker {
    #[must_use]
    pub(crate) fn last(&self) -> Option<Highlight> {
        self.last
    }

    pub(crate) fn set_last(&mut self, highlight: Option<Highlight>) {
        self.last = highlight;
    }

    /// Tap semantics: a miss or a repeated hit clears, a new hit selects.
    pub(crate) fn toggle(&mut self, hit: Option<Highlight>) -> Option<Highlight> {
        self.last = match hit {
            Some(hit) if Some(hit) != self.last => Some(hit),
            _ => None,
        };
        self.last
    }

    /// Drag semantics: returns the hit only when the target changed.
    pub(crate) fn follow(&mut self, hit: Option<Highlight>) -> Option<Highlight> {
        let hit = hit?;
        if Some(hit) == self.last {
            return None;
        }
        self.last = Some(hit);
        Some(hit)
    }
}

#[cfg(test)]
mod tests {
    use super::{Highlight, HighlightTracker};

    #[test]
    fn toggle_selects_then_clears_same_target() {
        let mut tracker = HighlightTracker::default();
        let hit = Highlight::new(3.0, 12.5, 0);
        assert_eq!(tracker.toggle(Some(hit)), Some(hit));
        assert_eq!(tracker.toggle(Some(hit)), None);
        assert_eq!(tracker.last(), None);
    }

    #[test]
    fn toggle_with_miss_clears() {
        let mut tracker = HighlightTracker::default();
        tracker.toggle(Some(Highlight::new(1.0, 1.0, 0)));
        assert_eq!(tracker.toggle(None), None);
    }

    #[test]
    fn follow_reports_only_changes() {
        let mut tracker = HighlightTracker::default();
        let first = Highlight::new(1.0, 2.0, 0);
        let second = Highlight::new(2.0, 2.0, 0);
        assert_eq!(tracker.follow(Some(first)), Some(first));
        assert_eq!(tracker.follow(Some(first)), None);
        assert_eq!(tracker.follow(None), None);
        assert_eq!(tracker.follow(Some(second)), Some(second));
    }

    #[test]
    fn stack_index_participates_in_equality() {
        let plain = Highlight::new(1.0, 2.0, 0);
        assert_ne!(plain, plain.with_stack_index(1));
    }
}
