use crate::core::{ContentOffsets, Point, Viewport};
use crate::error::{ChartError, ChartResult};

use super::ChartEngineConfig;

pub(super) fn validate_viewport(viewport: Viewport) -> ChartResult<Viewport> {
    if !viewport.is_valid() {
        return Err(ChartError::InvalidViewport {
            width: viewport.width,
            height: viewport.height,
        });
    }
    Ok(viewport)
}

pub(super) fn validate_display_density(display_density: f64) -> ChartResult<f64> {
    if !display_density.is_finite() || display_density <= 0.0 {
        return Err(ChartError::InvalidData(
            "display density must be finite and > 0".to_owned(),
        ));
    }
    Ok(display_density)
}

pub(super) fn validate_content_offsets(
    offsets: ContentOffsets,
    viewport: Viewport,
) -> ChartResult<ContentOffsets> {
    let ContentOffsets {
        left,
        top,
        right,
        bottom,
    } = offsets;
    for (name, value) in [
        ("left", left),
        ("top", top),
        ("right", right),
        ("bottom", bottom),
    ] {
        if !value.is_finite() || value < 0.0 {
            return Err(ChartError::InvalidData(format!(
                "content offset {name} must be finite and >= 0"
            )));
        }
    }
    if left + right > viewport.width || top + bottom > viewport.height {
        return Err(ChartError::InvalidData(
            "content offsets must leave a non-negative content area".to_owned(),
        ));
    }
    Ok(offsets)
}

pub(super) fn validate_scale_factors(scale_x: f64, scale_y: f64) -> ChartResult<()> {
    if !scale_x.is_finite() || !scale_y.is_finite() || scale_x <= 0.0 || scale_y <= 0.0 {
        return Err(ChartError::InvalidData(
            "zoom factors must be finite and > 0".to_owned(),
        ));
    }
    Ok(())
}

pub(super) fn validate_value_point(point: Point) -> ChartResult<Point> {
    if !point.is_finite() {
        return Err(ChartError::InvalidData(
            "value coordinates must be finite".to_owned(),
        ));
    }
    Ok(point)
}

pub(super) fn validate_engine_config(config: ChartEngineConfig) -> ChartResult<ChartEngineConfig> {
    validate_viewport(config.viewport)?;
    validate_display_density(config.display_density)?;
    validate_content_offsets(config.content_offsets, config.viewport)?;
    config.behavior.validate()?;
    config.scale_limits.validate()?;
    config.drag_offset.validate()?;
    config.deceleration.validate()?;
    config.tap.validate()?;
    config.job_pool.validate()?;
    Ok(config)
}
