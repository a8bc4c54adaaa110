//! Sensor calibration data and application
//!
//! Offset/scale calibration for the accelerometer and hard/soft iron
//! calibration for the magnetometer. Both are applied to raw readings before
//! they reach the orientation estimator.

use nalgebra::Vector3;

/// Minimum per-axis span (µT) for a min/max sweep to be usable
const MIN_SWEEP_SPAN: f32 = 1.0;

/// Calibration data for the accelerometer and magnetometer
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CalibrationData {
    /// Accelerometer offset (m/s²)
    /// Subtracted from raw readings before scaling
    pub accel_offset: Vector3<f32>,

    /// Accelerometer scale factors (dimensionless, typically near 1.0)
    pub accel_scale: Vector3<f32>,

    /// Magnetometer hard iron offset (µT)
    pub mag_offset: Vector3<f32>,

    /// Magnetometer soft iron scale (diagonal only)
    pub mag_scale: Vector3<f32>,
}

impl Default for CalibrationData {
    /// Uncalibrated (identity) calibration
    fn default() -> Self {
        Self {
            accel_offset: Vector3::zeros(),
            accel_scale: Vector3::new(1.0, 1.0, 1.0),
            mag_offset: Vector3::zeros(),
            mag_scale: Vector3::new(1.0, 1.0, 1.0),
        }
    }
}

impl CalibrationData {
    /// Apply accelerometer calibration to a raw reading
    ///
    /// ```text
    /// calibrated = (raw - offset) .* scale
    /// ```
    pub fn apply_accel_calibration(&self, raw: Vector3<f32>) -> Vector3<f32> {
        (raw - self.accel_offset).component_mul(&self.accel_scale)
    }

    /// Apply magnetometer calibration to a raw reading
    ///
    /// ```text
    /// calibrated = (raw - hard_iron_offset) .* soft_iron_scale
    /// ```
    pub fn apply_mag_calibration(&self, raw: Vector3<f32>) -> Vector3<f32> {
        (raw - self.mag_offset).component_mul(&self.mag_scale)
    }

    /// Heuristic check for non-default calibration
    pub fn is_calibrated(&self) -> bool {
        let ones = Vector3::new(1.0, 1.0, 1.0);
        self.accel_offset.norm() > 0.01
            || self.mag_offset.norm() > 0.01
            || (self.accel_scale - ones).norm() > 0.001
            || (self.mag_scale - ones).norm() > 0.001
    }
}

/// Estimate magnetometer hard/soft iron calibration from a rotation sweep
///
/// The device must be turned through all orientations while sampling. The
/// hard iron offset is the center of the per-axis min/max box; the soft iron
/// scale equalizes each axis span to the mean span.
///
/// # Returns
///
/// `(offset, scale)`, or `None` if there are no samples or any axis span is
/// too small to be meaningful.
pub fn estimate_hard_iron(samples: &[Vector3<f32>]) -> Option<(Vector3<f32>, Vector3<f32>)> {
    let first = samples.first()?;
    let (min, max) = samples
        .iter()
        .fold((*first, *first), |(min, max), s| (min.inf(s), max.sup(s)));

    let span = max - min;
    if span.iter().any(|s| !s.is_finite() || *s < MIN_SWEEP_SPAN) {
        return None;
    }

    let offset = (max + min) * 0.5;
    let mean_span = (span.x + span.y + span.z) / 3.0;
    let scale = span.map(|s| mean_span / s);
    Some((offset, scale))
}
