//! Orientation estimator
//!
//! Caches the latest gravity and geomagnetic vectors from pushed sensor events
//! and derives heading, roll and pitch whenever both are available.
//!
//! # Algorithm
//!
//! 1. Store the calibrated payload of each event (empty payloads are ignored)
//! 2. Skip everything until gravity and geomagnetic have both been observed
//! 3. Heading: rotation matrix → azimuth → degrees + declination → [0, 360)
//!    → heading filter. A degenerate rotation matrix holds the last heading.
//! 4. Roll/pitch: normalized gravity only (see [`Tilt`])

use nalgebra::Vector3;

use super::angle::wrap_360;
use super::heading_filter::{HeadingFilter, ALPHA_PASS_THROUGH};
use super::rotation::RotationMatrix;
use super::tilt::Tilt;
use crate::calibration::CalibrationData;
use crate::sensor::{SensorEvent, SensorKind};

/// Estimator configuration
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EstimatorConfig {
    /// Heading EMA smoothing factor (1.0 = no smoothing)
    pub heading_alpha: f32,
    /// Magnetic declination in degrees, added to the magnetic heading
    pub declination_deg: f32,
    /// Sensor calibration applied before caching
    pub calibration: CalibrationData,
}

impl Default for EstimatorConfig {
    fn default() -> Self {
        Self {
            heading_alpha: ALPHA_PASS_THROUGH,
            declination_deg: 0.0,
            calibration: CalibrationData::default(),
        }
    }
}

/// Derived device orientation
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Orientation {
    /// Compass heading in degrees from north, [0, 360)
    pub heading_deg: f32,
    /// Side-to-side tilt in degrees
    pub roll_deg: f32,
    /// Forward/backward tilt in degrees
    pub pitch_deg: f32,
    /// Magnetic inclination in degrees, `None` until a rotation matrix was built
    pub inclination_deg: Option<f32>,
    /// Timestamp of the event that produced this orientation
    pub timestamp_us: u64,
}

/// Push-driven orientation estimator
#[derive(Debug, Clone)]
pub struct OrientationEstimator {
    config: EstimatorConfig,
    gravity: Option<Vector3<f32>>,
    geomagnetic: Option<Vector3<f32>>,
    angular_rate: Option<Vector3<f32>>,
    heading_deg: f32,
    inclination_deg: Option<f32>,
    heading_filter: HeadingFilter,
    latest: Option<Orientation>,
}

impl OrientationEstimator {
    pub fn new(config: EstimatorConfig) -> Self {
        Self {
            heading_filter: HeadingFilter::new(config.heading_alpha),
            config,
            gravity: None,
            geomagnetic: None,
            angular_rate: None,
            heading_deg: 0.0,
            inclination_deg: None,
            latest: None,
        }
    }

    /// Feed one sensor event.
    ///
    /// # Returns
    ///
    /// The updated orientation, or `None` if the event carried no payload,
    /// gravity/geomagnetic have not both been observed yet, or the gravity
    /// vector has zero length.
    pub fn handle_event(&mut self, event: &SensorEvent) -> Option<Orientation> {
        let values = event.values?;

        match event.kind {
            SensorKind::Accelerometer => {
                self.gravity = Some(self.config.calibration.apply_accel_calibration(values));
            }
            SensorKind::Magnetometer => {
                self.geomagnetic = Some(self.config.calibration.apply_mag_calibration(values));
            }
            SensorKind::Gyroscope => {
                self.angular_rate = Some(values);
                return None;
            }
        }

        self.update(event.timestamp_us)
    }

    fn update(&mut self, timestamp_us: u64) -> Option<Orientation> {
        let gravity = self.gravity?;
        let geomagnetic = self.geomagnetic?;

        let tilt = Tilt::from_gravity(&gravity)?;

        if let Some((rotation, inclination)) = RotationMatrix::from_vectors(&gravity, &geomagnetic) {
            let azimuth_deg = rotation.orientation().azimuth.to_degrees();
            let heading = wrap_360(azimuth_deg + self.config.declination_deg);
            self.heading_deg = self.heading_filter.apply(heading);
            self.inclination_deg = Some(inclination.inclination().to_degrees());
        }

        let orientation = Orientation {
            heading_deg: self.heading_deg,
            roll_deg: tilt.roll_deg,
            pitch_deg: tilt.pitch_deg,
            inclination_deg: self.inclination_deg,
            timestamp_us,
        };
        self.latest = Some(orientation);
        Some(orientation)
    }

    /// Last computed orientation
    pub fn latest(&self) -> Option<Orientation> {
        self.latest
    }

    /// True once both gravity and geomagnetic vectors have been observed
    pub fn has_fix(&self) -> bool {
        self.gravity.is_some() && self.geomagnetic.is_some()
    }

    /// Latest gyroscope reading (cached, not used by the computation)
    pub fn angular_rate(&self) -> Option<Vector3<f32>> {
        self.angular_rate
    }

    pub fn config(&self) -> &EstimatorConfig {
        &self.config
    }

    /// Forget all cached vectors and derived angles.
    pub fn reset(&mut self) {
        self.gravity = None;
        self.geomagnetic = None;
        self.angular_rate = None;
        self.heading_deg = 0.0;
        self.inclination_deg = None;
        self.heading_filter.reset();
        self.latest = None;
    }
}

impl Default for OrientationEstimator {
    fn default() -> Self {
        Self::new(EstimatorConfig::default())
    }
}
