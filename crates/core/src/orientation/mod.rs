//! Orientation math
//!
//! Converts raw gravity and geomagnetic vectors into a compass heading and
//! roll/pitch tilt angles.

pub mod angle;
pub mod estimator;
pub mod heading_filter;
pub mod rotation;
pub mod tilt;

pub use angle::{wrap_180, wrap_360};
pub use estimator::{EstimatorConfig, Orientation, OrientationEstimator};
pub use heading_filter::HeadingFilter;
pub use rotation::{InclinationMatrix, OrientationAngles, RotationMatrix, STANDARD_GRAVITY};
pub use tilt::Tilt;
