pub mod axis_range;
pub mod limits;
pub mod matrix;
pub mod types;
pub mod viewport;

pub use axis_range::AxisRange;
pub use limits::{DragOffset, ScaleLimits};
pub use matrix::Matrix;
pub use types::{AxisDependency, ContentRect, Point, Viewport};
pub use viewport::{
    AxisMapping, ContentOffsets, SCALE_EPSILON, ViewportTransform, ZOOM_IN_STEP, ZOOM_OUT_STEP,
};
