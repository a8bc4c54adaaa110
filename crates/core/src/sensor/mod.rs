//! Sensor event types
//!
//! Raw 3-axis readings pushed by the platform's sensor delivery mechanism.

mod event;

pub use event::{SensorEvent, SensorKind};
