use std::path::PathBuf;

use compass_level_core::parameters::ParameterError;

/// Errors raised by sensor sources.
#[derive(Debug, thiserror::Error)]
pub enum SensorError {
    #[error("Sensor source not started: {0}")]
    NotStarted(String),

    #[error("Malformed record on line {line}: {source}")]
    Malformed {
        line: usize,
        #[source]
        source: serde_json::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Application-level errors.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Failed to read {path}: {source}")]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid parameter file: {0}")]
    ParameterFile(#[from] serde_json::Error),

    #[error("Parameter {name}: {error}")]
    Parameter { name: String, error: ParameterError },

    #[error("Calibration sweep too narrow: {samples} magnetometer samples")]
    CalibrationSweep { samples: usize },

    #[error(transparent)]
    Sensor(#[from] SensorError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
