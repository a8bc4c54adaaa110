//! Orientation Parameter Definitions
//!
//! # Parameters
//!
//! - `HDG_FILT_ALPHA` - Heading EMA smoothing factor, 1.0 disables smoothing
//! - `COMPASS_DEC` - Magnetic declination in degrees (east positive)
//! - `SENS_RATE_HZ` - Requested sensor delivery rate

use super::error::ParameterError;
use super::storage::{ParamFlags, ParamValue, ParameterStore};

/// Default heading filter alpha (pass-through)
const DEFAULT_ALPHA: f32 = 1.0;

/// Default declination in degrees
const DEFAULT_DECLINATION: f32 = 0.0;

/// Maximum absolute declination in degrees
const MAX_DECLINATION: f32 = 180.0;

/// Default sensor rate, roughly one sample per 60 ms
const DEFAULT_RATE_HZ: i32 = 16;

const MIN_RATE_HZ: i32 = 1;
const MAX_RATE_HZ: i32 = 200;

/// Orientation parameters loaded from parameter store
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrientationParams {
    /// Heading filter alpha, [0, 1]
    pub heading_alpha: f32,
    /// Declination in degrees, [-180, 180]
    pub declination_deg: f32,
    /// Sensor delivery rate in Hz
    pub sensor_rate_hz: u32,
}

impl Default for OrientationParams {
    fn default() -> Self {
        Self {
            heading_alpha: DEFAULT_ALPHA,
            declination_deg: DEFAULT_DECLINATION,
            sensor_rate_hz: DEFAULT_RATE_HZ as u32,
        }
    }
}

impl OrientationParams {
    /// Register orientation parameters with default values
    pub fn register_defaults(store: &mut ParameterStore) -> Result<(), ParameterError> {
        store.register(
            "HDG_FILT_ALPHA",
            ParamValue::Float(DEFAULT_ALPHA),
            ParamFlags::empty(),
        )?;
        store.register(
            "COMPASS_DEC",
            ParamValue::Float(DEFAULT_DECLINATION),
            ParamFlags::empty(),
        )?;
        store.register(
            "SENS_RATE_HZ",
            ParamValue::Int(DEFAULT_RATE_HZ),
            ParamFlags::empty(),
        )?;
        Ok(())
    }

    /// Load orientation parameters from parameter store
    ///
    /// Out-of-range values are clamped; non-finite values fall back to
    /// defaults.
    pub fn from_store(store: &ParameterStore) -> Self {
        let heading_alpha = match store.get_f32("HDG_FILT_ALPHA") {
            Some(v) if v.is_finite() => v.clamp(0.0, 1.0),
            _ => DEFAULT_ALPHA,
        };

        let declination_deg = match store.get_f32("COMPASS_DEC") {
            Some(v) if v.is_finite() => v.clamp(-MAX_DECLINATION, MAX_DECLINATION),
            _ => DEFAULT_DECLINATION,
        };

        let sensor_rate_hz = match store.get("SENS_RATE_HZ") {
            Some(ParamValue::Int(v)) => (*v).clamp(MIN_RATE_HZ, MAX_RATE_HZ) as u32,
            Some(ParamValue::Float(v)) if v.is_finite() => {
                (*v as i32).clamp(MIN_RATE_HZ, MAX_RATE_HZ) as u32
            }
            _ => DEFAULT_RATE_HZ as u32,
        };

        Self {
            heading_alpha,
            declination_deg,
            sensor_rate_hz,
        }
    }

    /// Sample period in microseconds for the configured rate
    pub fn sample_period_us(&self) -> u64 {
        1_000_000 / u64::from(self.sensor_rate_hz.max(1))
    }
}
