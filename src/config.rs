//! Parameter file loading
//!
//! The parameter file is a JSON object mapping parameter names to numbers:
//!
//! ```text
//! { "HDG_FILT_ALPHA": 0.2, "COMPASS_DEC": 7.5, "SENS_RATE_HZ": 50 }
//! ```

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use compass_level_core::parameters::{register_all, ParameterError, ParameterStore};
use tracing::{debug, info};

use crate::error::AppError;

/// Build a store holding every parameter with its default value.
pub fn default_store() -> Result<ParameterStore, AppError> {
    let mut store = ParameterStore::new();
    register_all(&mut store).map_err(|error| AppError::Parameter {
        name: "<defaults>".to_string(),
        error,
    })?;
    Ok(store)
}

/// Apply the contents of a parameter file to the store.
///
/// Every name must already be registered. Returns the number of values set.
pub fn apply_parameters(store: &mut ParameterStore, text: &str) -> Result<usize, AppError> {
    let values: BTreeMap<String, f64> = serde_json::from_str(text)?;
    for (name, value) in &values {
        store
            .set_number(name, *value)
            .map_err(|error: ParameterError| AppError::Parameter {
                name: name.clone(),
                error,
            })?;
        debug!(name = name.as_str(), value, "parameter set");
    }
    Ok(values.len())
}

/// Load a parameter file into the store.
pub fn load_parameter_file(store: &mut ParameterStore, path: &Path) -> Result<(), AppError> {
    let text = fs::read_to_string(path).map_err(|source| AppError::ReadFile {
        path: path.to_path_buf(),
        source,
    })?;
    let count = apply_parameters(store, &text)?;
    info!(path = %path.display(), count, "parameters loaded");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use compass_level_core::parameters::{estimator_config, OrientationParams, ParamValue};

    #[test]
    fn test_default_store_registers_everything() {
        let store = default_store().unwrap();
        assert_eq!(store.len(), 15);
        assert_eq!(store.get("HDG_FILT_ALPHA"), Some(&ParamValue::Float(1.0)));
        assert_eq!(store.get("SENS_RATE_HZ"), Some(&ParamValue::Int(16)));
    }

    #[test]
    fn test_apply_parameters() {
        let mut store = default_store().unwrap();
        let count = apply_parameters(
            &mut store,
            r#"{"HDG_FILT_ALPHA": 0.25, "COMPASS_DEC": -4, "SENS_RATE_HZ": 50, "COMPASS_OFS_X": 3.5}"#,
        )
        .unwrap();
        assert_eq!(count, 4);

        let params = OrientationParams::from_store(&store);
        assert_eq!(params.heading_alpha, 0.25);
        assert_eq!(params.declination_deg, -4.0);
        assert_eq!(params.sensor_rate_hz, 50);
        assert_eq!(estimator_config(&store).calibration.mag_offset.x, 3.5);
    }

    #[test]
    fn test_unknown_parameter_rejected() {
        let mut store = default_store().unwrap();
        let err = apply_parameters(&mut store, r#"{"NOT_A_PARAM": 1}"#).unwrap_err();
        match err {
            AppError::Parameter { name, error } => {
                assert_eq!(name, "NOT_A_PARAM");
                assert_eq!(error, ParameterError::InvalidName);
            }
            other => panic!("Expected parameter error, got {:?}", other),
        }
    }

    #[test]
    fn test_fractional_rate_rejected() {
        let mut store = default_store().unwrap();
        let err = apply_parameters(&mut store, r#"{"SENS_RATE_HZ": 12.5}"#).unwrap_err();
        assert!(matches!(
            err,
            AppError::Parameter {
                error: ParameterError::TypeMismatch,
                ..
            }
        ));
    }

    #[test]
    fn test_non_object_rejected() {
        let mut store = default_store().unwrap();
        assert!(matches!(
            apply_parameters(&mut store, "[1, 2, 3]"),
            Err(AppError::ParameterFile(_))
        ));
        assert!(matches!(
            apply_parameters(&mut store, r#"{"COMPASS_DEC": "east"}"#),
            Err(AppError::ParameterFile(_))
        ));
    }

    #[test]
    fn test_missing_file() {
        let mut store = default_store().unwrap();
        let err = load_parameter_file(&mut store, Path::new("/nonexistent/params.json"))
            .unwrap_err();
        assert!(matches!(err, AppError::ReadFile { .. }));
    }
}
