use tracing::{debug, trace};

use crate::core::{DragOffset, ScaleLimits};
use crate::error::{ChartError, ChartResult};
use crate::interaction::events::push_redraw;
use crate::interaction::{
    ChartEvent, ChartEvents, DecelerationConfig, GestureBehavior, Highlight, HitTester,
    PointerEvent,
};

use super::ChartEngine;
use super::engine::GestureDriver;

impl<H: HitTester> ChartEngine<H> {
    /// Feeds one pointer event to the chart's gesture state machine.
    pub fn handle_pointer_event(&mut self, event: &PointerEvent) -> ChartEvents {
        let events = match &mut self.gestures {
            GestureDriver::Cartesian(machine) => {
                machine.handle_event(event, &mut self.viewport, &self.hit_tester)
            }
            GestureDriver::Radial(machine) => {
                machine.handle_event(event, &self.viewport, &self.hit_tester)
            }
        };
        self.finish_events(events)
    }

    /// Advances everything time-driven: pending and animated viewport jobs,
    /// fling deceleration, pending long presses and reveal animations.
    pub fn tick(&mut self, now_millis: u64) -> ChartEvents {
        let mut events = self.jobs.run_pending(now_millis, &mut self.viewport);
        events.extend(self.jobs.tick(now_millis, &mut self.viewport));

        let gesture_events = match &mut self.gestures {
            GestureDriver::Cartesian(machine) => {
                machine.tick(now_millis, &mut self.viewport, &self.hit_tester)
            }
            GestureDriver::Radial(machine) => machine.tick(now_millis, &self.hit_tester),
        };
        events.extend(gesture_events);

        if self.animator.tick(now_millis) {
            push_redraw(&mut events);
        }
        trace!(now_millis, count = events.len(), "engine tick");
        self.finish_events(events)
    }

    /// Whether the host should keep calling `tick` on upcoming frames.
    #[must_use]
    pub fn needs_frame(&self) -> bool {
        let gestures = match &self.gestures {
            GestureDriver::Cartesian(machine) => machine.needs_frame(),
            GestureDriver::Radial(machine) => machine.needs_frame(),
        };
        gestures || self.jobs.has_work() || self.animator.is_running()
    }

    #[must_use]
    pub fn behavior(&self) -> GestureBehavior {
        self.config.behavior
    }

    pub fn set_behavior(&mut self, behavior: GestureBehavior) -> ChartResult<()> {
        let behavior = behavior.validate()?;
        self.config.behavior = behavior;
        match &mut self.gestures {
            GestureDriver::Cartesian(machine) => machine.set_behavior(behavior),
            GestureDriver::Radial(machine) => machine.set_behavior(behavior),
        }
        debug!(?behavior, "gesture behavior updated");
        Ok(())
    }

    pub fn set_deceleration_config(&mut self, config: DecelerationConfig) -> ChartResult<()> {
        let config = config.validate()?;
        self.config.deceleration = config;
        match &mut self.gestures {
            GestureDriver::Cartesian(machine) => machine.set_deceleration_config(config),
            GestureDriver::Radial(machine) => machine.set_deceleration_config(config),
        }
        Ok(())
    }

    pub fn set_scale_limits(&mut self, limits: ScaleLimits) -> ChartResult<()> {
        self.viewport.set_scale_limits(limits)?;
        self.config.scale_limits = limits;
        Ok(())
    }

    pub fn set_drag_offset(&mut self, offset: DragOffset) -> ChartResult<()> {
        self.viewport.set_drag_offset(offset)?;
        self.config.drag_offset = offset;
        Ok(())
    }

    /// Stops a fling or spin in flight.
    pub fn stop_deceleration(&mut self) {
        match &mut self.gestures {
            GestureDriver::Cartesian(machine) => machine.stop_deceleration(),
            GestureDriver::Radial(machine) => machine.stop_deceleration(),
        }
    }

    #[must_use]
    pub fn last_highlighted(&self) -> Option<Highlight> {
        match &self.gestures {
            GestureDriver::Cartesian(machine) => machine.last_highlighted(),
            GestureDriver::Radial(machine) => machine.last_highlighted(),
        }
    }

    /// Highlights `highlight` programmatically (or clears it with `None`) and
    /// syncs the tap toggle state with it.
    pub fn highlight_value(&mut self, highlight: Option<Highlight>) -> ChartEvents {
        match &mut self.gestures {
            GestureDriver::Cartesian(machine) => machine.set_last_highlighted(highlight),
            GestureDriver::Radial(machine) => machine.set_last_highlighted(highlight),
        }
        let mut events = ChartEvents::new();
        events.push(ChartEvent::ValueHighlighted(highlight));
        push_redraw(&mut events);
        events
    }

    /// Rotation of a radial chart in degrees; `None` for Cartesian charts.
    #[must_use]
    pub fn rotation_angle(&self) -> Option<f64> {
        self.radial_state_machine()
            .map(|machine| machine.rotation_angle())
    }

    pub fn set_rotation_angle(&mut self, angle: f64) -> ChartResult<ChartEvents> {
        if !angle.is_finite() {
            return Err(ChartError::InvalidData(
                "rotation angle must be finite".to_owned(),
            ));
        }
        let GestureDriver::Radial(machine) = &mut self.gestures else {
            return Err(ChartError::InvalidData(
                "rotation is only available on radial charts".to_owned(),
            ));
        };
        machine.set_rotation_angle(angle);
        let mut events = ChartEvents::new();
        events.push(ChartEvent::Rotated {
            angle: machine.rotation_angle(),
        });
        push_redraw(&mut events);
        Ok(events)
    }
}
