//! Orientation task
//!
//! Pulls events from a sensor source, feeds the orientation estimator and
//! publishes display readouts to observers. A readout is only published when
//! it would render differently from the previous one.

use compass_level_core::display::Readout;
use compass_level_core::orientation::{EstimatorConfig, Orientation, OrientationEstimator};
use compass_level_core::sensor::{SensorEvent, SensorKind};
use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::devices::SensorSource;
use crate::error::SensorError;

/// Counters for a completed run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RunSummary {
    /// Events received from the source
    pub events: u64,
    /// Readouts pushed to observers
    pub published: u64,
    /// Events dropped for carrying no payload
    pub skipped: u64,
}

/// Receiving side of the readout channel
///
/// Starts at all-zero angles until the first orientation is published.
#[derive(Debug, Clone)]
pub struct ReadoutWatch {
    rx: watch::Receiver<Readout>,
}

impl ReadoutWatch {
    /// Latest published readout
    pub fn current(&self) -> Readout {
        *self.rx.borrow()
    }

    /// Wait for the next published readout.
    ///
    /// Returns `None` once the task has finished and every readout was seen.
    pub async fn changed(&mut self) -> Option<Readout> {
        self.rx.changed().await.ok()?;
        Some(*self.rx.borrow_and_update())
    }
}

/// Which vectors arrived with a payload during a run
#[derive(Debug, Default)]
struct SeenSensors {
    accelerometer: bool,
    magnetometer: bool,
}

/// Owns a sensor source and the estimator fed by it
pub struct OrientationTask {
    source: Box<dyn SensorSource>,
    estimator: OrientationEstimator,
    tx: watch::Sender<Readout>,
}

impl OrientationTask {
    /// Create the task and the watch observers subscribe through.
    pub fn new(source: Box<dyn SensorSource>, config: EstimatorConfig) -> (Self, ReadoutWatch) {
        let (tx, rx) = watch::channel(Readout::default());
        let task = Self {
            source,
            estimator: OrientationEstimator::new(config),
            tx,
        };
        (task, ReadoutWatch { rx })
    }

    /// Additional observer for the same readout stream
    pub fn subscribe(&self) -> ReadoutWatch {
        ReadoutWatch {
            rx: self.tx.subscribe(),
        }
    }

    /// Last orientation computed by the estimator
    pub fn latest(&self) -> Option<Orientation> {
        self.estimator.latest()
    }

    /// Run until the source ends its stream.
    ///
    /// The source is started first and always stopped before returning. If
    /// the stream fails, that error is returned even when stopping fails too.
    pub async fn run(&mut self) -> Result<RunSummary, SensorError> {
        let capabilities = self.source.capabilities();
        if !capabilities.supports_heading() {
            warn!(
                source = self.source.name(),
                accelerometer = capabilities.accelerometer,
                magnetometer = capabilities.magnetometer,
                "source cannot provide a heading; readout stays at zero"
            );
        }

        self.source.start().await?;
        info!(source = self.source.name(), "sensor source started");

        let result = self.pump(!capabilities.supports_heading()).await;

        if let Err(stop_error) = self.source.stop().await {
            if result.is_ok() {
                return Err(stop_error);
            }
            warn!(source = self.source.name(), error = %stop_error, "failed to stop sensor source");
        }
        match &result {
            Ok(summary) => info!(
                source = self.source.name(),
                events = summary.events,
                published = summary.published,
                skipped = summary.skipped,
                "sensor source stopped"
            ),
            Err(e) => warn!(source = self.source.name(), error = %e, "sensor source failed"),
        }
        result
    }

    async fn pump(&mut self, warned: bool) -> Result<RunSummary, SensorError> {
        let mut summary = RunSummary::default();
        let mut seen = SeenSensors::default();

        while let Some(event) = self.source.next_event().await? {
            summary.events += 1;
            if !event.has_payload() {
                summary.skipped += 1;
                debug!(sensor = event.kind.as_str(), "empty sensor payload");
                continue;
            }
            match event.kind {
                SensorKind::Accelerometer => seen.accelerometer = true,
                SensorKind::Magnetometer => seen.magnetometer = true,
                SensorKind::Gyroscope => {}
            }

            if self.handle(&event) {
                summary.published += 1;
                // Observers only see the newest readout; a slow one skips intermediates
                tokio::task::yield_now().await;
            }
        }

        if !warned && summary.events > 0 && !(seen.accelerometer && seen.magnetometer) {
            warn!(
                accelerometer = seen.accelerometer,
                magnetometer = seen.magnetometer,
                "sensor stream ended without both gravity and geomagnetic readings"
            );
        }
        Ok(summary)
    }

    /// Feed one event; returns true if a readout was published.
    fn handle(&mut self, event: &SensorEvent) -> bool {
        let Some(orientation) = self.estimator.handle_event(event) else {
            return false;
        };
        let readout = Readout::from(orientation);

        let published = self.tx.send_if_modified(|current| {
            if current.is_visibly_different(&readout) {
                *current = readout;
                true
            } else {
                false
            }
        });
        if published {
            debug!(
                heading = readout.heading_deg,
                roll = readout.roll_deg,
                pitch = readout.pitch_deg,
                timestamp_us = orientation.timestamp_us,
                "readout published"
            );
        }
        published
    }
}
