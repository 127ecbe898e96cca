use serde::{Deserialize, Serialize};
use tracing::{debug, trace, warn};

use crate::core::{
    AxisDependency, AxisRange, ContentRect, DragOffset, Matrix, Point, ScaleLimits, Viewport,
};
use crate::error::ChartResult;

/// Tolerance used by zoom-capability queries so accumulated float drift at a
/// scale boundary does not flip the answer frame to frame.
pub const SCALE_EPSILON: f64 = 1e-6;

/// Factor applied by `zoom_in`, and by double-tap zoom.
pub const ZOOM_IN_STEP: f64 = 1.4;
/// Factor applied by `zoom_out`.
pub const ZOOM_OUT_STEP: f64 = 0.7;

/// Offsets of the content rect from each edge of the chart surface.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ContentOffsets {
    pub left: f64,
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
}

/// Value-space mapping of one y axis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AxisMapping {
    pub x_range: AxisRange,
    pub y_range: AxisRange,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct AxisTransform {
    mapping: Option<AxisMapping>,
    inverted: bool,
    horizontal: bool,
    value_to_px: Matrix,
    offset: Matrix,
    offset_inverse: Matrix,
    composite: Matrix,
    composite_inverse: Option<Matrix>,
}

impl Default for AxisTransform {
    fn default() -> Self {
        Self {
            mapping: None,
            inverted: false,
            horizontal: false,
            value_to_px: Matrix::IDENTITY,
            offset: Matrix::IDENTITY,
            offset_inverse: Matrix::IDENTITY,
            composite: Matrix::IDENTITY,
            composite_inverse: Some(Matrix::IDENTITY),
        }
    }
}

impl AxisTransform {
    fn rebuild(&mut self, content: ContentRect, touch: Matrix) {
        self.value_to_px = match self.mapping {
            Some(mapping) => value_matrix(mapping, content),
            None => Matrix::IDENTITY,
        };
        self.offset = offset_matrix(content, self.inverted, self.horizontal);
        self.offset_inverse = self.offset.invert().unwrap_or(Matrix::IDENTITY);
        self.composite = self
            .value_to_px
            .post_concat(touch)
            .post_concat(self.offset);
        self.composite_inverse = self.composite.invert();
    }
}

/// Scales the value ranges onto the content size, y growing negative upward.
fn value_matrix(mapping: AxisMapping, content: ContentRect) -> Matrix {
    let mut scale_x = content.width() / mapping.x_range.range();
    let mut scale_y = content.height() / mapping.y_range.range();
    if !scale_x.is_finite() {
        scale_x = 0.0;
    }
    if !scale_y.is_finite() {
        scale_y = 0.0;
    }
    Matrix {
        scale_x,
        trans_x: -mapping.x_range.min() * scale_x,
        scale_y: -scale_y,
        trans_y: mapping.y_range.min() * scale_y,
        ..Matrix::IDENTITY
    }
}

/// Moves touch space (origin at the content's bottom-left) onto the screen.
fn offset_matrix(content: ContentRect, inverted: bool, horizontal: bool) -> Matrix {
    match (inverted, horizontal) {
        (false, _) => Matrix::translation(content.left, content.bottom),
        (true, false) => Matrix {
            scale_y: -1.0,
            trans_x: content.left,
            trans_y: content.top,
            ..Matrix::IDENTITY
        },
        (true, true) => Matrix {
            scale_x: -1.0,
            trans_x: content.right,
            trans_y: content.bottom,
            ..Matrix::IDENTITY
        },
    }
}

/// Data-to-pixel mapping, content rect and zoom/pan bookkeeping for one chart.
///
/// Points flow `value -> touch -> screen`: the per-axis value matrix fits the
/// axis ranges onto the content size, the shared touch matrix carries the
/// user's zoom and pan, and the per-axis offset matrix places the result on
/// the chart surface. Only `refresh`/`translate`/`center_view_port` (and the
/// limit setters) replace the touch matrix, always after clamping.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewportTransform {
    viewport: Viewport,
    content: ContentRect,
    touch: Matrix,
    limits: ScaleLimits,
    scale_x: f64,
    scale_y: f64,
    trans_x: f64,
    trans_y: f64,
    drag_offset_x_px: f64,
    drag_offset_y_px: f64,
    display_density: f64,
    axes: [AxisTransform; 2],
    redraw_pending: bool,
}

impl Default for ViewportTransform {
    fn default() -> Self {
        Self::new(1.0)
    }
}

impl ViewportTransform {
    /// Creates an empty transform; `display_density` converts dp to pixels.
    #[must_use]
    pub fn new(display_density: f64) -> Self {
        let display_density = if display_density.is_finite() && display_density > 0.0 {
            display_density
        } else {
            1.0
        };
        Self {
            viewport: Viewport::default(),
            content: ContentRect::default(),
            touch: Matrix::IDENTITY,
            limits: ScaleLimits::default(),
            scale_x: 1.0,
            scale_y: 1.0,
            trans_x: 0.0,
            trans_y: 0.0,
            drag_offset_x_px: 0.0,
            drag_offset_y_px: 0.0,
            display_density,
            axes: [AxisTransform::default(); 2],
            redraw_pending: false,
        }
    }

    #[must_use]
    pub fn dp_to_px(&self, dp: f64) -> f64 {
        dp * self.display_density
    }

    #[must_use]
    pub fn display_density(&self) -> f64 {
        self.display_density
    }

    #[must_use]
    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    #[must_use]
    pub fn content_rect(&self) -> ContentRect {
        self.content
    }

    #[must_use]
    pub fn has_content(&self) -> bool {
        self.content.has_content()
    }

    /// Current committed touch matrix.
    #[must_use]
    pub fn matrix(&self) -> Matrix {
        self.touch
    }

    #[must_use]
    pub fn scale_limits(&self) -> ScaleLimits {
        self.limits
    }

    #[must_use]
    pub fn scale_x(&self) -> f64 {
        self.scale_x
    }

    #[must_use]
    pub fn scale_y(&self) -> f64 {
        self.scale_y
    }

    #[must_use]
    pub fn trans_x(&self) -> f64 {
        self.trans_x
    }

    #[must_use]
    pub fn trans_y(&self) -> f64 {
        self.trans_y
    }

    /// Resizes the chart surface, keeping the current content offsets.
    pub fn set_chart_dimensions(&mut self, width: f64, height: f64) -> bool {
        let next = Viewport::new(width, height);
        if !next.is_valid() {
            warn!(width, height, "ignoring invalid chart dimensions");
            return false;
        }
        let offsets = self.content_offsets();
        self.viewport = next;
        self.restrain_view_port(offsets)
    }

    #[must_use]
    pub fn content_offsets(&self) -> ContentOffsets {
        if !self.viewport.is_valid() {
            return ContentOffsets::default();
        }
        ContentOffsets {
            left: self.content.left,
            top: self.content.top,
            right: self.viewport.width - self.content.right,
            bottom: self.viewport.height - self.content.bottom,
        }
    }

    /// Places the content rect inside the chart surface using edge offsets.
    pub fn restrain_view_port(&mut self, offsets: ContentOffsets) -> bool {
        self.set_content_rect(
            offsets.left,
            offsets.top,
            self.viewport.width - offsets.right,
            self.viewport.height - offsets.bottom,
        )
    }

    /// Replaces the content rect. Degenerate or non-finite bounds leave the
    /// transform untouched and return `false`.
    pub fn set_content_rect(&mut self, left: f64, top: f64, right: f64, bottom: f64) -> bool {
        let Some(content) = ContentRect::new(left, top, right, bottom) else {
            warn!(left, top, right, bottom, "ignoring degenerate content rect");
            return false;
        };
        if !self.viewport.is_valid() {
            self.viewport = Viewport::new(right.max(0.0), bottom.max(0.0));
        }
        self.content = content;
        trace!(
            width = content.width(),
            height = content.height(),
            "content rect updated"
        );
        self.rebuild_axes();
        true
    }

    /// Fits `x_range`/`y_range` onto the content area for one axis.
    pub fn configure_axis(&mut self, axis: AxisDependency, x_range: AxisRange, y_range: AxisRange) {
        self.axes[axis.slot()].mapping = Some(AxisMapping { x_range, y_range });
        self.rebuild_axes();
    }

    #[must_use]
    pub fn axis_mapping(&self, axis: AxisDependency) -> Option<AxisMapping> {
        self.axes[axis.slot()].mapping
    }

    pub fn set_axis_inverted(&mut self, axis: AxisDependency, inverted: bool) {
        self.axes[axis.slot()].inverted = inverted;
        self.rebuild_axes();
    }

    #[must_use]
    pub fn is_axis_inverted(&self, axis: AxisDependency) -> bool {
        self.axes[axis.slot()].inverted
    }

    #[must_use]
    pub fn is_any_axis_inverted(&self) -> bool {
        self.axes.iter().any(|axis| axis.inverted)
    }

    /// Horizontal charts flip the x axis (instead of y) when inverted.
    pub fn set_horizontal(&mut self, horizontal: bool) {
        for axis in &mut self.axes {
            axis.horizontal = horizontal;
        }
        self.rebuild_axes();
    }

    #[must_use]
    pub fn is_horizontal(&self) -> bool {
        self.axes[0].horizontal
    }

    pub fn set_scale_limits(&mut self, limits: ScaleLimits) -> ChartResult<()> {
        self.limits = limits.validate()?;
        debug!(?limits, "scale limits updated");
        let limited = self.limit_trans_and_scale(self.touch);
        self.commit(limited);
        Ok(())
    }

    pub fn set_drag_offset(&mut self, offset: DragOffset) -> ChartResult<()> {
        let offset = offset.validate()?;
        self.drag_offset_x_px = self.dp_to_px(offset.x_dp);
        self.drag_offset_y_px = self.dp_to_px(offset.y_dp);
        Ok(())
    }

    #[must_use]
    pub fn drag_offset_x_px(&self) -> f64 {
        self.drag_offset_x_px
    }

    #[must_use]
    pub fn drag_offset_y_px(&self) -> f64 {
        self.drag_offset_y_px
    }

    #[must_use]
    pub fn has_no_drag_offset(&self) -> bool {
        self.drag_offset_x_px <= 0.0 && self.drag_offset_y_px <= 0.0
    }

    /// Candidate matrix post-scaled around a touch-space pivot. Nothing is
    /// committed; `None` rejects non-finite or non-positive factors.
    #[must_use]
    pub fn zoom(&self, scale_x: f64, scale_y: f64, pivot_x: f64, pivot_y: f64) -> Option<Matrix> {
        if !valid_factor(scale_x) || !valid_factor(scale_y) {
            warn!(scale_x, scale_y, "rejecting invalid zoom factors");
            return None;
        }
        if !pivot_x.is_finite() || !pivot_y.is_finite() {
            warn!(pivot_x, pivot_y, "rejecting non-finite zoom pivot");
            return None;
        }
        Some(self.touch.post_scale(scale_x, scale_y, pivot_x, pivot_y))
    }

    /// Candidate zoomed relative to the touch-space origin.
    #[must_use]
    pub fn zoom_about_origin(&self, scale_x: f64, scale_y: f64) -> Option<Matrix> {
        self.zoom(scale_x, scale_y, 0.0, 0.0)
    }

    #[must_use]
    pub fn zoom_in(&self, pivot_x: f64, pivot_y: f64) -> Option<Matrix> {
        self.zoom(ZOOM_IN_STEP, ZOOM_IN_STEP, pivot_x, pivot_y)
    }

    #[must_use]
    pub fn zoom_out(&self, pivot_x: f64, pivot_y: f64) -> Option<Matrix> {
        self.zoom(ZOOM_OUT_STEP, ZOOM_OUT_STEP, pivot_x, pivot_y)
    }

    /// Candidate with an absolute scale; translation is kept.
    #[must_use]
    pub fn set_zoom(&self, scale_x: f64, scale_y: f64) -> Option<Matrix> {
        if !valid_factor(scale_x) || !valid_factor(scale_y) {
            warn!(scale_x, scale_y, "rejecting invalid absolute zoom");
            return None;
        }
        Some(Matrix {
            scale_x,
            scale_y,
            ..self.touch
        })
    }

    /// Candidate back at 1x on both axes. Translation is kept and re-clamped
    /// by `refresh`; scale limits are untouched.
    #[must_use]
    pub fn reset_zoom(&self) -> Matrix {
        Matrix {
            scale_x: 1.0,
            scale_y: 1.0,
            ..self.touch
        }
    }

    /// Candidate that undoes all zoom and pan. Minimum scales are reset to 1.
    #[must_use]
    pub fn fit_screen(&mut self) -> Matrix {
        self.limits.min_scale_x = 1.0;
        self.limits.min_scale_y = 1.0;
        Matrix::IDENTITY
    }

    /// Clamps `candidate` to the scale limits and drag bounds and commits it.
    ///
    /// When a scale bound is hit, the candidate is rescaled around the pivot
    /// implied by the committed and candidate matrices so the boundary scale
    /// is reached exactly without jumping. A non-finite candidate is ignored.
    pub fn refresh(&mut self, candidate: Matrix, invalidate: bool) -> Matrix {
        if !candidate.is_finite() {
            warn!("ignoring non-finite candidate matrix");
            return self.touch;
        }
        let limited = self.limit_trans_and_scale(candidate);
        self.commit(limited);
        if invalidate {
            self.redraw_pending = true;
        }
        self.touch
    }

    /// Post-translates by a touch-space delta, clamps and commits.
    pub fn translate(&mut self, dx: f64, dy: f64) -> Matrix {
        if !dx.is_finite() || !dy.is_finite() {
            warn!(dx, dy, "ignoring non-finite translation");
            return self.touch;
        }
        let candidate = self.touch.post_translate(dx, dy);
        self.refresh(candidate, true)
    }

    /// Converts a screen-pixel delta into a touch-space delta for `axis`.
    #[must_use]
    pub fn screen_delta_to_touch(&self, axis: AxisDependency, dx: f64, dy: f64) -> (f64, f64) {
        self.axes[axis.slot()].offset_inverse.map_vector(dx, dy)
    }

    /// Converts a screen point into touch space for `axis`.
    #[must_use]
    pub fn touch_point(&self, axis: AxisDependency, screen: Point) -> Point {
        self.axes[axis.slot()].offset_inverse.map_point(screen)
    }

    /// Pans so that the screen `pixel` lands on the content center.
    pub fn center_view_port(&mut self, axis: AxisDependency, pixel: Point) -> Matrix {
        let center = self.content.center();
        self.translate_screen(axis, center.x - pixel.x, center.y - pixel.y)
    }

    /// Pans so that the screen `pixel` lands on the content's top-left corner.
    pub fn align_view_port_origin(&mut self, axis: AxisDependency, pixel: Point) -> Matrix {
        self.translate_screen(axis, self.content.left - pixel.x, self.content.top - pixel.y)
    }

    fn translate_screen(&mut self, axis: AxisDependency, dx: f64, dy: f64) -> Matrix {
        if !dx.is_finite() || !dy.is_finite() {
            warn!(dx, dy, "ignoring non-finite view port move");
            return self.touch;
        }
        let (dx, dy) = self.screen_delta_to_touch(axis, dx, dy);
        self.translate(dx, dy)
    }

    /// Returns and clears the pending redraw flag.
    pub fn take_redraw_request(&mut self) -> bool {
        std::mem::take(&mut self.redraw_pending)
    }

    #[must_use]
    pub fn has_pending_redraw(&self) -> bool {
        self.redraw_pending
    }

    pub fn point_values_to_pixel(&self, points: &mut [Point]) {
        self.point_values_to_pixel_on(AxisDependency::Left, points);
    }

    pub fn point_values_to_pixel_on(&self, axis: AxisDependency, points: &mut [Point]) {
        self.axes[axis.slot()].composite.map_points(points);
    }

    /// Parallel variant of `point_values_to_pixel_on` for large batches.
    #[cfg(feature = "parallel-projection")]
    pub fn point_values_to_pixel_par(&self, axis: AxisDependency, points: &mut [Point]) {
        use rayon::prelude::*;

        const CHUNK: usize = 4096;
        let composite = self.axes[axis.slot()].composite;
        points
            .par_chunks_mut(CHUNK)
            .for_each(|chunk| composite.map_points(chunk));
    }

    /// Converts screen pixels back to values in place. Returns `false` and
    /// leaves `points` untouched when the mapping is singular.
    pub fn pixels_to_values(&self, points: &mut [Point]) -> bool {
        self.pixels_to_values_on(AxisDependency::Left, points)
    }

    pub fn pixels_to_values_on(&self, axis: AxisDependency, points: &mut [Point]) -> bool {
        match self.axes[axis.slot()].composite_inverse {
            Some(inverse) => {
                inverse.map_points(points);
                true
            }
            None => false,
        }
    }

    #[must_use]
    pub fn value_to_pixel(&self, axis: AxisDependency, value: Point) -> Point {
        self.axes[axis.slot()].composite.map_point(value)
    }

    #[must_use]
    pub fn pixel_to_value(&self, axis: AxisDependency, pixel: Point) -> Option<Point> {
        self.axes[axis.slot()]
            .composite_inverse
            .map(|inverse| inverse.map_point(pixel))
    }

    /// Value spans `(x, y)` that fit in the content rect at the current zoom.
    #[must_use]
    pub fn values_in_view(&self, axis: AxisDependency) -> Option<Point> {
        let composite = self.axes[axis.slot()].composite;
        if composite.scale_x == 0.0 || composite.scale_y == 0.0 {
            return None;
        }
        let span = Point::new(
            self.content.width() / composite.scale_x.abs(),
            self.content.height() / composite.scale_y.abs(),
        );
        span.is_finite().then_some(span)
    }

    /// Value that sits on the content's top-left corner once `center` is
    /// centered at the current zoom. Follows axis direction and inversion.
    #[must_use]
    pub fn top_left_value_for_center(&self, axis: AxisDependency, center: Point) -> Option<Point> {
        let composite = self.axes[axis.slot()].composite;
        let span = self.values_in_view(axis)?;
        Some(Point::new(
            center.x - composite.scale_x.signum() * span.x / 2.0,
            center.y - composite.scale_y.signum() * span.y / 2.0,
        ))
    }

    /// Value range currently visible along x.
    #[must_use]
    pub fn visible_x_range(&self, axis: AxisDependency) -> Option<AxisRange> {
        let mut edges = [
            Point::new(self.content.left, self.content.bottom),
            Point::new(self.content.right, self.content.bottom),
        ];
        if !self.pixels_to_values_on(axis, &mut edges) {
            return None;
        }
        AxisRange::new(edges[0].x.min(edges[1].x), edges[0].x.max(edges[1].x)).ok()
    }

    /// Value range currently visible along y.
    #[must_use]
    pub fn visible_y_range(&self, axis: AxisDependency) -> Option<AxisRange> {
        let mut edges = [
            Point::new(self.content.left, self.content.top),
            Point::new(self.content.left, self.content.bottom),
        ];
        if !self.pixels_to_values_on(axis, &mut edges) {
            return None;
        }
        AxisRange::new(edges[0].y.min(edges[1].y), edges[0].y.max(edges[1].y)).ok()
    }

    #[must_use]
    pub fn can_zoom_in_more_x(&self) -> bool {
        self.scale_x + SCALE_EPSILON < self.limits.max_scale_x
    }

    #[must_use]
    pub fn can_zoom_in_more_y(&self) -> bool {
        self.scale_y + SCALE_EPSILON < self.limits.max_scale_y
    }

    #[must_use]
    pub fn can_zoom_out_more_x(&self) -> bool {
        self.scale_x > self.limits.min_scale_x + SCALE_EPSILON
    }

    #[must_use]
    pub fn can_zoom_out_more_y(&self) -> bool {
        self.scale_y > self.limits.min_scale_y + SCALE_EPSILON
    }

    #[must_use]
    pub fn is_fully_zoomed_out(&self) -> bool {
        self.is_fully_zoomed_out_x() && self.is_fully_zoomed_out_y()
    }

    #[must_use]
    pub fn is_fully_zoomed_out_x(&self) -> bool {
        !(self.can_zoom_out_more_x() || self.limits.min_scale_x > 1.0 + SCALE_EPSILON)
    }

    #[must_use]
    pub fn is_fully_zoomed_out_y(&self) -> bool {
        !(self.can_zoom_out_more_y() || self.limits.min_scale_y > 1.0 + SCALE_EPSILON)
    }

    #[must_use]
    pub fn is_in_bounds_left(&self, x: f64) -> bool {
        self.content.left <= x + 1.0
    }

    #[must_use]
    pub fn is_in_bounds_right(&self, x: f64) -> bool {
        let x = (x * 100.0).trunc() / 100.0;
        self.content.right >= x - 1.0
    }

    #[must_use]
    pub fn is_in_bounds_x(&self, x: f64) -> bool {
        self.is_in_bounds_left(x) && self.is_in_bounds_right(x)
    }

    #[must_use]
    pub fn is_in_bounds_top(&self, y: f64) -> bool {
        self.content.top <= y
    }

    #[must_use]
    pub fn is_in_bounds_bottom(&self, y: f64) -> bool {
        let y = (y * 100.0).trunc() / 100.0;
        self.content.bottom >= y
    }

    #[must_use]
    pub fn is_in_bounds_y(&self, y: f64) -> bool {
        self.is_in_bounds_top(y) && self.is_in_bounds_bottom(y)
    }

    #[must_use]
    pub fn is_in_bounds(&self, x: f64, y: f64) -> bool {
        self.is_in_bounds_x(x) && self.is_in_bounds_y(y)
    }

    fn limit_trans_and_scale(&self, candidate: Matrix) -> Matrix {
        let (scale_x, trans_x) = limit_axis_scale(
            self.touch.scale_x,
            self.touch.trans_x,
            candidate.scale_x,
            candidate.trans_x,
            self.limits.min_scale_x,
            self.limits.max_scale_x,
        );
        let (scale_y, trans_y) = limit_axis_scale(
            self.touch.scale_y,
            self.touch.trans_y,
            candidate.scale_y,
            candidate.trans_y,
            self.limits.min_scale_y,
            self.limits.max_scale_y,
        );

        let max_trans_x = -self.content.width() * (scale_x - 1.0);
        let trans_x = trans_x
            .max(max_trans_x - self.drag_offset_x_px)
            .min(self.drag_offset_x_px);

        let max_trans_y = self.content.height() * (scale_y - 1.0);
        let trans_y = trans_y
            .min(max_trans_y + self.drag_offset_y_px)
            .max(-self.drag_offset_y_px);

        Matrix {
            scale_x,
            trans_x,
            scale_y,
            trans_y,
            ..candidate
        }
    }

    fn commit(&mut self, matrix: Matrix) {
        self.touch = matrix;
        self.scale_x = matrix.scale_x;
        self.scale_y = matrix.scale_y;
        self.trans_x = matrix.trans_x;
        self.trans_y = matrix.trans_y;
        self.rebuild_axes();
    }

    fn rebuild_axes(&mut self) {
        let content = self.content;
        let touch = self.touch;
        for axis in &mut self.axes {
            axis.rebuild(content, touch);
        }
    }
}

fn valid_factor(value: f64) -> bool {
    value.is_finite() && value > 0.0
}

/// Clamps one axis scale, keeping the implied zoom pivot fixed.
fn limit_axis_scale(
    committed_scale: f64,
    committed_trans: f64,
    scale: f64,
    trans: f64,
    min_scale: f64,
    max_scale: f64,
) -> (f64, f64) {
    let bounded = scale.clamp(min_scale, max_scale);
    if bounded == scale {
        return (scale, trans);
    }

    let ratio = scale / committed_scale;
    if !ratio.is_finite() || (ratio - 1.0).abs() <= f64::EPSILON {
        return (bounded, trans);
    }

    let pivot = (trans - ratio * committed_trans) / (1.0 - ratio);
    let bounded_ratio = bounded / committed_scale;
    let bounded_trans = bounded_ratio * committed_trans + pivot * (1.0 - bounded_ratio);
    if bounded_trans.is_finite() {
        (bounded, bounded_trans)
    } else {
        (bounded, trans)
    }
}

#[cfg(test)]
mod tests {
    use super::{ContentOffsets, ViewportTransform};
    use crate::core::{AxisDependency, AxisRange, DragOffset, Matrix, Point, ScaleLimits};

    fn transform() -> ViewportTransform {
        let mut transform = ViewportTransform::new(1.0);
        assert!(transform.set_chart_dimensions(1000.0, 600.0));
        assert!(transform.set_content_rect(0.0, 0.0, 1000.0, 600.0));
        transform
    }

    #[test]
    fn degenerate_content_rect_is_ignored() {
        let mut transform = transform();
        let before = transform.content_rect();
        assert!(!transform.set_content_rect(10.0, 10.0, 5.0, 50.0));
        assert!(!transform.set_content_rect(0.0, f64::NAN, 100.0, 100.0));
        assert_eq!(transform.content_rect(), before);
    }

    #[test]
    fn chart_resize_keeps_offsets() {
        let mut transform = ViewportTransform::new(1.0);
        transform.set_chart_dimensions(800.0, 400.0);
        transform.restrain_view_port(ContentOffsets {
            left: 40.0,
            top: 10.0,
            right: 20.0,
            bottom: 30.0,
        });
        transform.set_chart_dimensions(1000.0, 500.0);
        let content = transform.content_rect();
        assert_eq!(content.left, 40.0);
        assert_eq!(content.top, 10.0);
        assert_eq!(content.right, 980.0);
        assert_eq!(content.bottom, 470.0);
    }

    #[test]
    fn zoom_does_not_commit_until_refresh() {
        let mut transform = transform();
        let candidate = transform.zoom(2.0, 2.0, 500.0, -300.0).expect("valid zoom");
        assert_eq!(transform.matrix(), Matrix::IDENTITY);
        transform.refresh(candidate, true);
        assert_eq!(transform.scale_x(), 2.0);
        assert!(transform.take_redraw_request());
        assert!(!transform.take_redraw_request());
    }

    #[test]
    fn nan_zoom_is_rejected() {
        let transform = transform();
        assert!(transform.zoom(f64::NAN, 1.0, 0.0, 0.0).is_none());
        assert!(transform.zoom(1.0, f64::INFINITY, 0.0, 0.0).is_none());
        assert!(transform.zoom(0.0, 1.0, 0.0, 0.0).is_none());
    }

    #[test]
    fn refresh_clamps_scale_around_implied_pivot() {
        let mut transform = transform();
        transform
            .set_scale_limits(ScaleLimits::default().with_x(1.0, 3.0))
            .expect("limits");
        let candidate = transform.zoom(5.0, 1.0, 400.0, 0.0).expect("zoom");
        transform.refresh(candidate, false);
        assert_eq!(transform.scale_x(), 3.0);
        // pivot 400 stays fixed: 400 * (1 - 3) = -800
        assert!((transform.trans_x() + 800.0).abs() <= 1e-9);
        assert!(!transform.can_zoom_in_more_x());
    }

    #[test]
    fn translation_is_clamped_to_content_without_drag_offset() {
        let mut transform = transform();
        let candidate = transform.zoom(2.0, 1.0, 0.0, 0.0).expect("zoom");
        transform.refresh(candidate, false);
        transform.translate(250.0, 0.0);
        assert_eq!(transform.trans_x(), 0.0);
        transform.translate(-5000.0, 0.0);
        assert_eq!(transform.trans_x(), -1000.0);
    }

    #[test]
    fn drag_offset_extends_pan_room() {
        let mut transform = ViewportTransform::new(2.0);
        transform.set_chart_dimensions(1000.0, 600.0);
        transform
            .set_drag_offset(DragOffset {
                x_dp: 25.0,
                y_dp: 0.0,
            })
            .expect("offset");
        assert!(!transform.has_no_drag_offset());
        transform.translate(80.0, 0.0);
        assert_eq!(transform.trans_x(), 50.0);
    }

    #[test]
    fn configured_axis_maps_range_onto_content() {
        let mut transform = ViewportTransform::new(1.0);
        transform.set_chart_dimensions(1000.0, 600.0);
        transform.restrain_view_port(ContentOffsets {
            left: 50.0,
            top: 20.0,
            right: 50.0,
            bottom: 80.0,
        });
        transform.configure_axis(
            AxisDependency::Left,
            AxisRange::new(0.0, 90.0).expect("x"),
            AxisRange::new(-10.0, 40.0).expect("y"),
        );

        let mut points = [Point::new(0.0, -10.0), Point::new(90.0, 40.0)];
        transform.point_values_to_pixel(&mut points);
        assert!((points[0].x - 50.0).abs() <= 1e-9);
        assert!((points[0].y - 520.0).abs() <= 1e-9);
        assert!((points[1].x - 950.0).abs() <= 1e-9);
        assert!((points[1].y - 20.0).abs() <= 1e-9);
    }

    #[test]
    fn inverted_axis_grows_downward() {
        let mut transform = transform();
        transform.configure_axis(
            AxisDependency::Right,
            AxisRange::new(0.0, 10.0).expect("x"),
            AxisRange::new(0.0, 100.0).expect("y"),
        );
        transform.set_axis_inverted(AxisDependency::Right, true);

        let top = transform.value_to_pixel(AxisDependency::Right, Point::new(0.0, 0.0));
        let bottom = transform.value_to_pixel(AxisDependency::Right, Point::new(0.0, 100.0));
        assert!((top.y - 0.0).abs() <= 1e-9);
        assert!((bottom.y - 600.0).abs() <= 1e-9);
    }

    #[test]
    fn visible_range_shrinks_with_zoom() {
        let mut transform = transform();
        transform.configure_axis(
            AxisDependency::Left,
            AxisRange::new(0.0, 100.0).expect("x"),
            AxisRange::new(0.0, 60.0).expect("y"),
        );
        let candidate = transform.zoom(4.0, 1.0, 0.0, 0.0).expect("zoom");
        transform.refresh(candidate, false);

        let visible = transform
            .visible_x_range(AxisDependency::Left)
            .expect("visible range");
        assert!((visible.min() - 0.0).abs() <= 1e-9);
        assert!((visible.max() - 25.0).abs() <= 1e-9);
    }

    #[test]
    fn center_view_port_moves_pixel_to_center() {
        let mut transform = transform();
        let candidate = transform.zoom(4.0, 4.0, 0.0, 0.0).expect("zoom");
        transform.refresh(candidate, false);
        transform.center_view_port(AxisDependency::Left, Point::new(900.0, 200.0));
        // content center is (500, 300): pan by (-400, +100) in screen space
        assert!((transform.trans_x() + 400.0).abs() <= 1e-9);
        assert!((transform.trans_y() - 100.0).abs() <= 1e-9);
    }

    #[test]
    fn in_bounds_predicates_tolerate_one_pixel() {
        let transform = transform();
        assert!(transform.is_in_bounds_left(-0.5));
        assert!(!transform.is_in_bounds_left(-1.5));
        assert!(transform.is_in_bounds_right(1000.9));
        assert!(!transform.is_in_bounds_right(1001.5));
        assert!(transform.is_in_bounds_y(600.0));
        assert!(!transform.is_in_bounds_top(-0.1));
    }

    #[test]
    fn fit_screen_resets_scale_and_minimums() {
        let mut transform = transform();
        transform
            .set_scale_limits(ScaleLimits::default().with_x(2.0, 10.0))
            .expect("limits");
        assert_eq!(transform.scale_x(), 2.0);
        let fitted = transform.fit_screen();
        transform.refresh(fitted, true);
        assert_eq!(transform.scale_x(), 1.0);
        assert!(transform.is_fully_zoomed_out());
    }
}
