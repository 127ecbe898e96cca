//! Time-based reveal animation of drawn values.

pub mod animator;
pub mod easing;

pub use animator::{AnimationPhase, ChartAnimator};
pub use easing::Easing;
