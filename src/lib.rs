//! chart-viewport: viewport transform and gesture core for interactive charts.
//!
//! The crate maps chart values onto a pixel viewport, turns raw pointer input
//! into bounded pan/zoom/rotate mutations, and drives deferred or animated
//! viewport changes from host frame ticks. Drawing stays with the host.

pub mod animation;
pub mod api;
pub mod core;
pub mod error;
pub mod interaction;
pub mod jobs;
pub mod telemetry;

pub use api::{ChartEngine, ChartEngineConfig, ChartKind};
pub use error::{ChartError, ChartResult};
