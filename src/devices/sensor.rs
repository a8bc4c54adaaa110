use async_trait::async_trait;
use compass_level_core::sensor::SensorEvent;

use crate::error::SensorError;

/// Which sensors a source can deliver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SensorCapabilities {
    pub accelerometer: bool,
    pub magnetometer: bool,
    pub gyroscope: bool,
}

impl Default for SensorCapabilities {
    fn default() -> Self {
        Self {
            accelerometer: true,
            magnetometer: true,
            gyroscope: true,
        }
    }
}

impl SensorCapabilities {
    /// True if both vectors needed for a heading are available.
    pub fn supports_heading(&self) -> bool {
        self.accelerometer && self.magnetometer
    }
}

/// Push-style sensor event stream.
///
/// Implementations must be `Send + Sync` so they can be stored as
/// `Box<dyn SensorSource>`.
#[async_trait]
pub trait SensorSource: Send + Sync {
    /// Human-readable name for this source.
    fn name(&self) -> &str;

    /// Sensors this source provides.
    fn capabilities(&self) -> SensorCapabilities;

    /// Register for sensor delivery.
    async fn start(&mut self) -> Result<(), SensorError>;

    /// Unregister from sensor delivery. Calling this twice is harmless.
    async fn stop(&mut self) -> Result<(), SensorError>;

    /// Check if the source is currently delivering events.
    fn is_running(&self) -> bool;

    /// Wait for the next event. `None` means the stream has ended.
    async fn next_event(&mut self) -> Result<Option<SensorEvent>, SensorError>;
}
