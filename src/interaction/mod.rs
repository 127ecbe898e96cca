//! Pointer input classification for Cartesian and radial charts.

pub mod behavior;
pub mod cartesian;
pub mod deceleration;
pub mod events;
pub mod highlight;
pub mod radial;
pub mod tap;
pub mod velocity;

pub use behavior::GestureBehavior;
pub use cartesian::{GestureStateMachine, MIN_SCALE_POINTER_DISTANCE_DP, ZOOM_MODE_MIN_SPACING_PX};
pub use deceleration::{
    AngularDeceleration, AngularStep, DecelerationConfig, LinearDeceleration, LinearStep,
};
pub use events::{
    ChartEvent, ChartEvents, ChartGesture, Pointer, PointerAction, PointerEvent, TouchMode,
};
pub use highlight::{DataSetRef, Highlight, HitTester, NullHitTester};
pub use radial::{ROTATE_TRIGGER_DISTANCE_DP, RadialGestureStateMachine, angle_for_point};
pub use tap::{TapConfig, TapDetector, TapEvent};
pub use velocity::{VelocitySample, VelocityWindow};
