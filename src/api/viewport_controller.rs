use tracing::{debug, warn};

use crate::core::{AxisDependency, AxisRange, ContentOffsets, Matrix, Point, Viewport};
use crate::error::{ChartError, ChartResult};
use crate::interaction::events::push_redraw;
use crate::interaction::{ChartEvent, ChartEvents, HitTester};
use crate::jobs::JobHandle;

use super::ChartEngine;
use super::validation::{
    validate_content_offsets, validate_scale_factors, validate_value_point, validate_viewport,
};

impl<H: HitTester> ChartEngine<H> {
    /// Resizes the chart surface; content offsets are kept. Pending viewport
    /// jobs run on the next `tick` once the content rect is valid.
    pub fn set_chart_dimensions(&mut self, width: f64, height: f64) -> ChartResult<()> {
        let viewport = validate_viewport(Viewport::new(width, height))?;
        self.viewport.set_chart_dimensions(viewport.width, viewport.height);
        self.config.viewport = viewport;
        Ok(())
    }

    /// Places the content rect inside the chart surface.
    pub fn set_content_offsets(&mut self, offsets: ContentOffsets) -> ChartResult<()> {
        let offsets = validate_content_offsets(offsets, self.config.viewport)?;
        self.viewport.restrain_view_port(offsets);
        self.config.content_offsets = offsets;
        Ok(())
    }

    /// Fits value ranges of one axis onto the content rect.
    pub fn configure_axis(
        &mut self,
        axis: AxisDependency,
        x_range: AxisRange,
        y_range: AxisRange,
    ) -> ChartEvents {
        self.viewport.configure_axis(axis, x_range, y_range);
        let mut events = ChartEvents::new();
        push_redraw(&mut events);
        events
    }

    pub fn set_axis_inverted(&mut self, axis: AxisDependency, inverted: bool) -> ChartEvents {
        self.viewport.set_axis_inverted(axis, inverted);
        let mut events = ChartEvents::new();
        push_redraw(&mut events);
        events
    }

    /// Zooms by relative factors around a screen pixel.
    pub fn zoom(&mut self, scale_x: f64, scale_y: f64, x: f64, y: f64) -> ChartResult<ChartEvents> {
        validate_scale_factors(scale_x, scale_y)?;
        let pivot = self.pivot_for_screen(Point::new(x, y))?;
        let candidate = self.viewport.zoom(scale_x, scale_y, pivot.x, pivot.y);
        Ok(self.commit_zoom(candidate))
    }

    /// Zooms by relative factors around the content center.
    pub fn zoom_to_center(&mut self, scale_x: f64, scale_y: f64) -> ChartResult<ChartEvents> {
        let center = self.viewport.content_rect().center();
        self.zoom(scale_x, scale_y, center.x, center.y)
    }

    /// Zooms in 1.4x around the content center.
    pub fn zoom_in(&mut self) -> ChartEvents {
        let pivot = self.center_pivot();
        let candidate = self.viewport.zoom_in(pivot.x, pivot.y);
        self.commit_zoom(candidate)
    }

    /// Zooms out 0.7x around the content center.
    pub fn zoom_out(&mut self) -> ChartEvents {
        let pivot = self.center_pivot();
        let candidate = self.viewport.zoom_out(pivot.x, pivot.y);
        self.commit_zoom(candidate)
    }

    /// Back to 1x keeping the pan position as far as the bounds allow.
    pub fn reset_zoom(&mut self) -> ChartEvents {
        let candidate = self.viewport.reset_zoom();
        self.commit_zoom(Some(candidate))
    }

    /// Undoes all zoom and pan.
    pub fn fit_screen(&mut self) -> ChartEvents {
        let candidate = self.viewport.fit_screen();
        self.commit_zoom(Some(candidate))
    }

    /// Posts a job zooming by relative factors, then centering on `value`.
    pub fn zoom_to_value(
        &mut self,
        scale_x: f64,
        scale_y: f64,
        value: Point,
        axis: AxisDependency,
    ) -> ChartResult<JobHandle> {
        validate_scale_factors(scale_x, scale_y)?;
        let value = validate_value_point(value)?;
        Ok(self.jobs.post_zoom(axis, scale_x, scale_y, value))
    }

    /// Posts a job centering the content rect on `value`.
    pub fn center_view_to(&mut self, value: Point, axis: AxisDependency) -> ChartResult<JobHandle> {
        let value = validate_value_point(value)?;
        Ok(self.jobs.post_move(axis, value))
    }

    /// Posts a job placing `value.x` on the content's leading edge with
    /// `value.y` vertically centered.
    pub fn move_view_to(&mut self, value: Point, axis: AxisDependency) -> ChartResult<JobHandle> {
        let value = validate_value_point(value)?;
        let center = match self.viewport.top_left_value_for_center(axis, value) {
            Some(top_left) => Point::new(2.0 * value.x - top_left.x, value.y),
            None => {
                warn!(?axis, "moving view without a usable axis mapping");
                value
            }
        };
        Ok(self.jobs.post_move(axis, center))
    }

    /// Posts a job placing `x_value` on the content's leading edge, keeping
    /// the current vertical center of the left axis.
    pub fn move_view_to_x(&mut self, x_value: f64) -> ChartResult<JobHandle> {
        let y = self
            .viewport
            .visible_y_range(AxisDependency::Left)
            .map_or(0.0, AxisRange::center);
        self.move_view_to(Point::new(x_value, y), AxisDependency::Left)
    }

    /// Posts an animation moving the centered value from the current center
    /// to `value`.
    pub fn center_view_to_animated(
        &mut self,
        value: Point,
        axis: AxisDependency,
        duration_millis: u64,
    ) -> ChartResult<JobHandle> {
        let value = validate_value_point(value)?;
        let origin = self.current_center_value(axis)?;
        Ok(self
            .jobs
            .post_animated_move(axis, origin, value, duration_millis))
    }

    /// Posts an animation from the current scale to the absolute
    /// `scale_x`/`scale_y`, ending centered on `value`.
    pub fn zoom_and_center_animated(
        &mut self,
        scale_x: f64,
        scale_y: f64,
        value: Point,
        axis: AxisDependency,
        duration_millis: u64,
    ) -> ChartResult<JobHandle> {
        validate_scale_factors(scale_x, scale_y)?;
        let value = validate_value_point(value)?;
        let content = self.viewport.content_rect();
        let zoom_origin = self
            .viewport
            .pixel_to_value(axis, Point::new(content.left, content.top))
            .ok_or_else(singular_mapping)?;
        let origin_scale = Point::new(self.viewport.scale_x(), self.viewport.scale_y());
        Ok(self.jobs.post_animated_zoom(
            axis,
            origin_scale,
            Point::new(scale_x, scale_y),
            zoom_origin,
            value,
            duration_millis,
        ))
    }

    /// Drops a pending or running viewport job.
    pub fn cancel_job(&mut self, handle: JobHandle) -> bool {
        self.jobs.cancel(handle)
    }

    /// Drops every viewport job, e.g. when the chart is torn down.
    pub fn cancel_all_jobs(&mut self) {
        self.jobs.cancel_all();
    }

    fn commit_zoom(&mut self, candidate: Option<Matrix>) -> ChartEvents {
        let mut events = ChartEvents::new();
        let Some(candidate) = candidate else {
            return events;
        };
        self.viewport.refresh(candidate, false);
        debug!(
            scale_x = self.viewport.scale_x(),
            scale_y = self.viewport.scale_y(),
            "viewport zoom committed"
        );
        events.push(ChartEvent::OffsetsRecalculationRequested);
        push_redraw(&mut events);
        events
    }

    fn pivot_for_screen(&self, screen: Point) -> ChartResult<Point> {
        if !screen.is_finite() {
            return Err(ChartError::InvalidData(
                "zoom pivot must be finite".to_owned(),
            ));
        }
        Ok(self.viewport.touch_point(AxisDependency::Left, screen))
    }

    fn center_pivot(&self) -> Point {
        let center = self.viewport.content_rect().center();
        self.viewport.touch_point(AxisDependency::Left, center)
    }

    fn current_center_value(&self, axis: AxisDependency) -> ChartResult<Point> {
        let center = self.viewport.content_rect().center();
        self.viewport
            .pixel_to_value(axis, center)
            .ok_or_else(singular_mapping)
    }
}

fn singular_mapping() -> ChartError {
    ChartError::InvalidData("axis mapping is singular; configure the axis first".to_owned())
}
