//! Sensor sources
//!
//! Everything that can push accelerometer, magnetometer and gyroscope events
//! into the orientation task.

pub mod replay;
pub mod sensor;
pub mod sim;

pub use replay::ReplaySource;
pub use sensor::{SensorCapabilities, SensorSource};
pub use sim::{SimulatedConfig, SimulatedDevice};
