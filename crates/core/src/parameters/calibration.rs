//! Sensor Calibration Parameter Definitions
//!
//! # Parameters
//!
//! - `COMPASS_OFS_X/Y/Z` - Magnetometer hard iron offset (µT)
//! - `COMPASS_SCL_X/Y/Z` - Magnetometer soft iron scale
//! - `INS_ACC_OFS_X/Y/Z` - Accelerometer offset (m/s²)
//! - `INS_ACC_SCL_X/Y/Z` - Accelerometer scale

use nalgebra::Vector3;

use super::error::ParameterError;
use super::orientation::OrientationParams;
use super::storage::{ParamFlags, ParamValue, ParameterStore};
use crate::calibration::CalibrationData;
use crate::orientation::EstimatorConfig;

const COMPASS_OFS: [&str; 3] = ["COMPASS_OFS_X", "COMPASS_OFS_Y", "COMPASS_OFS_Z"];
const COMPASS_SCL: [&str; 3] = ["COMPASS_SCL_X", "COMPASS_SCL_Y", "COMPASS_SCL_Z"];
const ACC_OFS: [&str; 3] = ["INS_ACC_OFS_X", "INS_ACC_OFS_Y", "INS_ACC_OFS_Z"];
const ACC_SCL: [&str; 3] = ["INS_ACC_SCL_X", "INS_ACC_SCL_Y", "INS_ACC_SCL_Z"];

/// Smallest accepted scale factor; a zero scale would flatten an axis
const MIN_SCALE: f32 = 0.1;
const MAX_SCALE: f32 = 10.0;

/// Calibration parameters loaded from parameter store
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CalibrationParams {
    pub calibration: CalibrationData,
}

impl CalibrationParams {
    /// Register calibration parameters with identity defaults
    pub fn register_defaults(store: &mut ParameterStore) -> Result<(), ParameterError> {
        for name in COMPASS_OFS.iter().chain(ACC_OFS.iter()) {
            store.register(name, ParamValue::Float(0.0), ParamFlags::empty())?;
        }
        for name in COMPASS_SCL.iter().chain(ACC_SCL.iter()) {
            store.register(name, ParamValue::Float(1.0), ParamFlags::empty())?;
        }
        Ok(())
    }

    /// Load calibration parameters from parameter store
    ///
    /// Missing or non-finite entries keep the identity value; scales are
    /// clamped to a sane range.
    pub fn from_store(store: &ParameterStore) -> Self {
        Self {
            calibration: CalibrationData {
                accel_offset: read_offset(store, &ACC_OFS),
                accel_scale: read_scale(store, &ACC_SCL),
                mag_offset: read_offset(store, &COMPASS_OFS),
                mag_scale: read_scale(store, &COMPASS_SCL),
            },
        }
    }

    /// Write a magnetometer calibration back into the store
    pub fn store_mag_calibration(
        store: &mut ParameterStore,
        offset: &Vector3<f32>,
        scale: &Vector3<f32>,
    ) -> Result<(), ParameterError> {
        for (i, name) in COMPASS_OFS.iter().enumerate() {
            store.set(name, ParamValue::Float(offset[i]))?;
        }
        for (i, name) in COMPASS_SCL.iter().enumerate() {
            store.set(name, ParamValue::Float(scale[i]))?;
        }
        Ok(())
    }
}

fn read_axis(store: &ParameterStore, name: &str, default: f32) -> f32 {
    match store.get_f32(name) {
        Some(v) if v.is_finite() => v,
        _ => default,
    }
}

fn read_offset(store: &ParameterStore, names: &[&str; 3]) -> Vector3<f32> {
    Vector3::new(
        read_axis(store, names[0], 0.0),
        read_axis(store, names[1], 0.0),
        read_axis(store, names[2], 0.0),
    )
}

fn read_scale(store: &ParameterStore, names: &[&str; 3]) -> Vector3<f32> {
    Vector3::new(
        read_axis(store, names[0], 1.0),
        read_axis(store, names[1], 1.0),
        read_axis(store, names[2], 1.0),
    )
    .map(|s| s.clamp(MIN_SCALE, MAX_SCALE))
}

/// Register every parameter the orientation pipeline reads
pub fn register_all(store: &mut ParameterStore) -> Result<(), ParameterError> {
    OrientationParams::register_defaults(store)?;
    CalibrationParams::register_defaults(store)?;
    Ok(())
}

/// Build the estimator configuration from the store
pub fn estimator_config(store: &ParameterStore) -> EstimatorConfig {
    let orientation = OrientationParams::from_store(store);
    EstimatorConfig {
        heading_alpha: orientation.heading_alpha,
        declination_deg: orientation.declination_deg,
        calibration: CalibrationParams::from_store(store).calibration,
    }
}
