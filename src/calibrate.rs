//! Magnetometer calibration run
//!
//! Collects raw magnetometer samples while the device is turned through all
//! orientations, estimates hard and soft iron correction and writes it to
//! the `COMPASS_OFS_*` / `COMPASS_SCL_*` parameters. The result can be saved
//! as a parameter file and loaded again with `--params`.

use std::collections::BTreeMap;

use compass_level_core::calibration::estimate_hard_iron;
use compass_level_core::parameters::{CalibrationParams, ParameterStore};
use compass_level_core::sensor::SensorKind;
use nalgebra::Vector3;
use tracing::{debug, info, warn};

use crate::devices::SensorSource;
use crate::error::{AppError, SensorError};

/// Parameter name prefixes written by a calibration run
const COMPASS_PREFIXES: [&str; 2] = ["COMPASS_OFS_", "COMPASS_SCL_"];

/// Drain the source and keep every magnetometer payload.
pub async fn collect_mag_samples(
    source: &mut dyn SensorSource,
) -> Result<Vec<Vector3<f32>>, SensorError> {
    source.start().await?;

    let mut samples = Vec::new();
    let result = loop {
        match source.next_event().await {
            Ok(Some(event)) => {
                if event.kind == SensorKind::Magnetometer {
                    if let Some(values) = event.values {
                        samples.push(values);
                    }
                }
            }
            Ok(None) => break Ok(()),
            Err(e) => break Err(e),
        }
    };

    if let Err(stop_error) = source.stop().await {
        if result.is_ok() {
            return Err(stop_error);
        }
        warn!(source = source.name(), error = %stop_error, "failed to stop sensor source");
    }
    result?;

    debug!(source = source.name(), samples = samples.len(), "magnetometer sweep collected");
    Ok(samples)
}

/// Run a calibration sweep and store the result.
///
/// Returns the estimated `(offset, scale)`.
pub async fn calibrate_magnetometer(
    source: &mut dyn SensorSource,
    store: &mut ParameterStore,
) -> Result<(Vector3<f32>, Vector3<f32>), AppError> {
    let samples = collect_mag_samples(source).await?;
    let (offset, scale) = estimate_hard_iron(&samples).ok_or(AppError::CalibrationSweep {
        samples: samples.len(),
    })?;

    CalibrationParams::store_mag_calibration(store, &offset, &scale).map_err(|error| {
        AppError::Parameter {
            name: "COMPASS_*".to_string(),
            error,
        }
    })?;
    info!(
        samples = samples.len(),
        offset_x = offset.x,
        offset_y = offset.y,
        offset_z = offset.z,
        scale_x = scale.x,
        scale_y = scale.y,
        scale_z = scale.z,
        "magnetometer calibrated"
    );
    Ok((offset, scale))
}

/// Magnetometer calibration parameters, in parameter file form
pub fn compass_parameters(store: &ParameterStore) -> BTreeMap<String, f64> {
    store
        .iter_all()
        .filter(|(name, _)| COMPASS_PREFIXES.iter().any(|p| name.starts_with(*p)))
        .map(|(name, value)| (name.to_string(), f64::from(value.as_f32())))
        .collect()
}
