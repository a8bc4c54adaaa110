//! Rotation matrix from gravity and geomagnetic vectors
//!
//! Builds the device-to-world rotation from an accelerometer (gravity) vector
//! and a magnetometer (geomagnetic) vector using cross products:
//!
//! ```text
//! H = E × A        (east, perpendicular to gravity and magnetic field)
//! M = A × H        (magnetic north, horizontal)
//! R = [ H ; M ; A ] (rows, unit length)
//! ```
//!
//! # Coordinate System
//!
//! - Device frame: X right, Y towards the top edge, Z out of the screen
//! - World frame: X east, Y magnetic north, Z up (towards the sky)
//! - A device lying flat, screen up, reads gravity as `(0, 0, +g)`

use nalgebra::{Matrix3, Vector3};

/// Standard gravity (m/s²)
pub const STANDARD_GRAVITY: f32 = 9.80665;

/// Squared gravity magnitude below which the device is treated as in free fall
const FREE_FALL_GRAVITY_SQUARED: f32 = 0.01 * STANDARD_GRAVITY * STANDARD_GRAVITY;

/// Minimum |E × A| for a usable horizontal reference
///
/// Smaller values mean the device is close to a magnetic pole or the field
/// reading is too weak to define north.
const MIN_HORIZONTAL_FIELD: f32 = 0.1;

/// Orientation decomposed from a rotation matrix (radians)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrientationAngles {
    /// Rotation about -Z, 0 = magnetic north, positive towards east, (-π, π]
    pub azimuth: f32,
    /// Rotation about X, [-π/2, π/2]
    pub pitch: f32,
    /// Rotation about Y, (-π, π]
    pub roll: f32,
}

/// Device-to-world rotation matrix
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RotationMatrix(Matrix3<f32>);

/// Inclination matrix (rotates the geomagnetic vector into the horizontal plane)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InclinationMatrix(Matrix3<f32>);

impl RotationMatrix {
    /// Build the rotation and inclination matrices.
    ///
    /// # Arguments
    ///
    /// * `gravity` - Accelerometer reading (m/s²), device frame
    /// * `geomagnetic` - Magnetometer reading (µT), device frame
    ///
    /// # Returns
    ///
    /// `None` when the device is in free fall or the horizontal component of
    /// the magnetic field is too small to define north.
    pub fn from_vectors(
        gravity: &Vector3<f32>,
        geomagnetic: &Vector3<f32>,
    ) -> Option<(Self, InclinationMatrix)> {
        let gravity_sq = gravity.norm_squared();
        if !gravity_sq.is_finite() || gravity_sq < FREE_FALL_GRAVITY_SQUARED {
            return None;
        }

        let east = geomagnetic.cross(gravity);
        let east_norm = libm::sqrtf(east.norm_squared());
        if !east_norm.is_finite() || east_norm < MIN_HORIZONTAL_FIELD {
            return None;
        }

        let east = east / east_norm;
        let up = gravity / libm::sqrtf(gravity_sq);
        let north = up.cross(&east);

        let rotation = Matrix3::new(
            east.x, east.y, east.z, //
            north.x, north.y, north.z, //
            up.x, up.y, up.z,
        );

        // east_norm > 0 implies |E| > 0
        let inv_field = 1.0 / libm::sqrtf(geomagnetic.norm_squared());
        let c = geomagnetic.dot(&north) * inv_field;
        let s = geomagnetic.dot(&up) * inv_field;
        let inclination = Matrix3::new(
            1.0, 0.0, 0.0, //
            0.0, c, s, //
            0.0, -s, c,
        );

        Some((Self(rotation), InclinationMatrix(inclination)))
    }

    /// Decompose into azimuth, pitch and roll.
    ///
    /// ```text
    /// azimuth = atan2(R[0][1], R[1][1])
    /// pitch   = asin(-R[2][1])
    /// roll    = atan2(-R[2][0], R[2][2])
    /// ```
    pub fn orientation(&self) -> OrientationAngles {
        let r = &self.0;
        OrientationAngles {
            azimuth: libm::atan2f(r[(0, 1)], r[(1, 1)]),
            pitch: libm::asinf((-r[(2, 1)]).clamp(-1.0, 1.0)),
            roll: libm::atan2f(-r[(2, 0)], r[(2, 2)]),
        }
    }

    /// Underlying matrix (rows: east, north, up in device coordinates)
    pub fn matrix(&self) -> &Matrix3<f32> {
        &self.0
    }
}

impl InclinationMatrix {
    /// Magnetic inclination in radians
    ///
    /// Negative when the field points below the horizon (northern hemisphere).
    pub fn inclination(&self) -> f32 {
        libm::atan2f(self.0[(1, 2)], self.0[(1, 1)])
    }

    pub fn matrix(&self) -> &Matrix3<f32> {
        &self.0
    }
}
