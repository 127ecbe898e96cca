//! Host-facing engine facade.

mod engine;
mod engine_config;
mod engine_init;
mod interaction_controller;
mod validation;
mod viewport_controller;

pub use engine::ChartEngine;
pub use engine_config::{ChartEngineConfig, ChartKind};
