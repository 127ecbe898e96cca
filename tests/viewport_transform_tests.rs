use approx::assert_abs_diff_eq;
use chart_viewport::core::{
    AxisDependency, AxisRange, ContentOffsets, DragOffset, Point, ScaleLimits, ViewportTransform,
};

fn transform_1000x600() -> ViewportTransform {
    let mut transform = ViewportTransform::new(1.0);
    assert!(transform.set_chart_dimensions(1000.0, 600.0));
    assert!(transform.set_content_rect(0.0, 0.0, 1000.0, 600.0));
    transform
}

fn configured_transform() -> ViewportTransform {
    let mut transform = transform_1000x600();
    transform.configure_axis(
        AxisDependency::Left,
        AxisRange::new(0.0, 100.0).expect("x range"),
        AxisRange::new(0.0, 60.0).expect("y range"),
    );
    transform
}

#[test]
fn zoom_about_pivot_moves_origin_left() {
    let mut transform = transform_1000x600();
    let candidate = transform.zoom(2.0, 1.0, 500.0, 300.0).expect("zoom");
    transform.refresh(candidate, true);

    let mut points = [Point::new(0.0, 0.0)];
    transform.point_values_to_pixel(&mut points);
    assert_abs_diff_eq!(points[0].x, -500.0, epsilon = 1e-9);
    assert_abs_diff_eq!(transform.scale_x(), 2.0, epsilon = 1e-12);
    assert!(transform.take_redraw_request());
}

#[test]
fn scale_is_clamped_to_maximum_exactly() {
    let mut transform = transform_1000x600();
    transform
        .set_scale_limits(ScaleLimits::default().with_x(1.0, 1.5))
        .expect("limits");

    let candidate = transform.zoom(3.0, 1.0, 0.0, 0.0).expect("zoom");
    transform.refresh(candidate, false);

    assert_eq!(transform.scale_x(), 1.5);
    assert!(!transform.can_zoom_in_more_x());
    assert!(transform.can_zoom_out_more_x());
}

#[test]
fn zoom_in_then_out_restores_matrix() {
    let mut transform = transform_1000x600();
    let pivot = transform.touch_point(AxisDependency::Left, Point::new(320.0, 180.0));

    let zoomed = transform.zoom_in(pivot.x, pivot.y).expect("zoom in");
    transform.refresh(zoomed, false);
    assert_abs_diff_eq!(transform.scale_x(), 1.4, epsilon = 1e-12);

    let restored = transform
        .zoom(1.0 / 1.4, 1.0 / 1.4, pivot.x, pivot.y)
        .expect("zoom out");
    transform.refresh(restored, false);
    assert_abs_diff_eq!(transform.scale_x(), 1.0, epsilon = 1e-4);
    assert_abs_diff_eq!(transform.scale_y(), 1.0, epsilon = 1e-4);
    assert!(transform.trans_x().abs() <= 1.0);
    assert!(transform.trans_y().abs() <= 1.0);
    assert!(transform.is_fully_zoomed_out());
}

#[test]
fn configured_axis_round_trips_through_pixels() {
    let mut transform = configured_transform();
    let center = transform.touch_point(AxisDependency::Left, Point::new(500.0, 300.0));
    let candidate = transform.zoom(2.0, 2.0, center.x, center.y).expect("zoom");
    transform.refresh(candidate, false);

    let values = [
        Point::new(10.0, 5.0),
        Point::new(50.0, 30.0),
        Point::new(99.5, 59.0),
    ];
    let mut points = values;
    transform.point_values_to_pixel_on(AxisDependency::Left, &mut points);
    assert!(transform.pixels_to_values_on(AxisDependency::Left, &mut points));
    for (recovered, original) in points.iter().zip(values) {
        assert_abs_diff_eq!(recovered.x, original.x, epsilon = 1e-9);
        assert_abs_diff_eq!(recovered.y, original.y, epsilon = 1e-9);
    }

    let visible = transform
        .visible_x_range(AxisDependency::Left)
        .expect("visible range");
    assert_abs_diff_eq!(visible.min(), 25.0, epsilon = 1e-9);
    assert_abs_diff_eq!(visible.max(), 75.0, epsilon = 1e-9);
}

#[test]
fn drag_offset_extends_pan_room() {
    let mut transform = ViewportTransform::new(2.0);
    transform.set_chart_dimensions(1000.0, 600.0);
    transform
        .set_drag_offset(DragOffset {
            x_dp: 20.0,
            y_dp: 0.0,
        })
        .expect("offset");

    transform.translate(100.0, 0.0);
    assert_abs_diff_eq!(transform.trans_x(), 40.0, epsilon = 1e-9);
    assert!(!transform.has_no_drag_offset());
}

#[test]
fn content_offsets_shift_the_pixel_mapping() {
    let mut transform = ViewportTransform::new(1.0);
    transform.set_chart_dimensions(1000.0, 600.0);
    transform.restrain_view_port(ContentOffsets {
        left: 50.0,
        top: 20.0,
        right: 10.0,
        bottom: 30.0,
    });
    transform.configure_axis(
        AxisDependency::Left,
        AxisRange::new(0.0, 94.0).expect("x range"),
        AxisRange::new(0.0, 55.0).expect("y range"),
    );

    let origin = transform.value_to_pixel(AxisDependency::Left, Point::new(0.0, 0.0));
    assert_abs_diff_eq!(origin.x, 50.0, epsilon = 1e-9);
    assert_abs_diff_eq!(origin.y, 570.0, epsilon = 1e-9);

    let corner = transform.value_to_pixel(AxisDependency::Left, Point::new(94.0, 55.0));
    assert_abs_diff_eq!(corner.x, 990.0, epsilon = 1e-9);
    assert_abs_diff_eq!(corner.y, 20.0, epsilon = 1e-9);
}

#[test]
fn right_axis_maps_independently() {
    let mut transform = configured_transform();
    transform.configure_axis(
        AxisDependency::Right,
        AxisRange::new(0.0, 100.0).expect("x range"),
        AxisRange::new(-300.0, 300.0).expect("y range"),
    );

    let left = transform.value_to_pixel(AxisDependency::Left, Point::new(50.0, 30.0));
    let right = transform.value_to_pixel(AxisDependency::Right, Point::new(50.0, 0.0));
    assert_abs_diff_eq!(left.y, 300.0, epsilon = 1e-9);
    assert_abs_diff_eq!(right.y, 300.0, epsilon = 1e-9);
    let top = transform
        .pixel_to_value(AxisDependency::Right, Point::new(500.0, 0.0))
        .expect("invertible");
    assert_abs_diff_eq!(top.x, 50.0, epsilon = 1e-9);
    assert_abs_diff_eq!(top.y, 300.0, epsilon = 1e-9);
}

#[test]
fn non_finite_candidate_leaves_transform_untouched() {
    let mut transform = configured_transform();
    let before = transform.matrix();
    let mut candidate = before;
    candidate.trans_x = f64::NAN;

    transform.refresh(candidate, true);
    assert_eq!(transform.matrix(), before);
    assert!(!transform.has_pending_redraw());
}

#[test]
fn in_bounds_predicates_follow_content_rect() {
    let transform = transform_1000x600();
    assert!(transform.is_in_bounds(0.0, 0.0));
    assert!(transform.is_in_bounds_left(-0.5));
    assert!(!transform.is_in_bounds_left(-2.0));
    assert!(transform.is_in_bounds_right(1000.9));
    assert!(!transform.is_in_bounds_right(1001.5));
    assert!(!transform.is_in_bounds_top(-0.1));
    assert!(!transform.is_in_bounds_bottom(600.5));
}

#[cfg(feature = "parallel-projection")]
#[test]
fn parallel_projection_matches_serial() {
    let transform = configured_transform();
    let values: Vec<Point> = (0..10_000)
        .map(|i| Point::new(i as f64 * 0.01, (i % 60) as f64))
        .collect();

    let mut serial = values.clone();
    transform.point_values_to_pixel_on(AxisDependency::Left, &mut serial);
    let mut parallel = values;
    transform.point_values_to_pixel_par(AxisDependency::Left, &mut parallel);
    assert_eq!(serial, parallel);
}
