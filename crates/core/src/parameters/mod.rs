//! Parameter management types and utilities
//!
//! Named parameters with defaults are registered into a [`ParameterStore`]
//! and loaded into typed parameter blocks with `from_store`. Reading the
//! parameter file is up to the host application.

pub mod calibration;
pub mod error;
pub mod orientation;
pub mod storage;

pub use calibration::{estimator_config, register_all, CalibrationParams};
pub use error::ParameterError;
pub use orientation::OrientationParams;
pub use storage::{ParamFlags, ParamMetadata, ParamValue, ParameterStore};
pub use storage::{MAX_PARAMS, PARAM_NAME_LEN};
