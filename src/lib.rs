//! compass_level - Compass heading and roll/pitch readout
//!
//! Host-side application around `compass_level_core`: sensor sources, the
//! orientation task that publishes readouts, and a text renderer.

pub mod calibrate;
pub mod config;
pub mod devices;
pub mod error;
pub mod subsystems;
pub mod ui;

pub use devices::{ReplaySource, SensorCapabilities, SensorSource, SimulatedConfig, SimulatedDevice};
pub use error::{AppError, SensorError};
pub use subsystems::{OrientationTask, ReadoutWatch, RunSummary};
pub use ui::TextRenderer;
