//! Roll and pitch from the gravity vector alone
//!
//! The accelerometer reading is normalized to unit length `n`, then:
//!
//! ```text
//! pitch = asin(n.y)          top edge raised  => positive
//! roll  = atan2(-n.x, n.z)   right edge lowered => positive
//! ```
//!
//! Both angles are independent of the magnetometer.

use nalgebra::Vector3;

use super::angle::clear_negative_zero;

/// Squared norm below which the gravity vector has no usable direction
const MIN_GRAVITY_NORM_SQUARED: f32 = 1e-12;

/// Tilt angles in degrees
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Tilt {
    /// Side-to-side tilt, (-180, 180]
    pub roll_deg: f32,
    /// Forward/backward tilt, [-90, 90]
    pub pitch_deg: f32,
}

impl Tilt {
    /// Compute tilt from an accelerometer reading.
    ///
    /// Returns `None` for a zero-length or non-finite vector, where the
    /// normalized direction (and every angle derived from it) would be NaN.
    pub fn from_gravity(gravity: &Vector3<f32>) -> Option<Self> {
        let norm_sq = gravity.norm_squared();
        if !norm_sq.is_finite() || norm_sq < MIN_GRAVITY_NORM_SQUARED {
            return None;
        }

        let n = gravity / libm::sqrtf(norm_sq);
        // Rounding can push |n.y| a hair above 1
        let pitch = libm::asinf(n.y.clamp(-1.0, 1.0));
        let roll = libm::atan2f(-n.x, n.z);

        Some(Self {
            roll_deg: clear_negative_zero(roll.to_degrees()),
            pitch_deg: clear_negative_zero(pitch.to_degrees()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f32 = 1e-3;
    const G: f32 = 9.80665;

    fn gravity_for(roll_deg: f32, pitch_deg: f32) -> Vector3<f32> {
        let (roll, pitch) = (roll_deg.to_radians(), pitch_deg.to_radians());
        // World-up seen from a device rolled about Y, then pitched about X
        Vector3::new(
            -libm::cosf(pitch) * libm::sinf(roll),
            libm::sinf(pitch),
            libm::cosf(pitch) * libm::cosf(roll),
        ) * G
    }

    #[test]
    fn test_flat_device_is_level() {
        let tilt = Tilt::from_gravity(&Vector3::new(0.0, 0.0, G)).unwrap();
        assert!(tilt.roll_deg.abs() < EPSILON);
        assert!(tilt.pitch_deg.abs() < EPSILON);
    }

    #[test]
    fn test_flat_device_has_no_negative_zero() {
        let tilt = Tilt::from_gravity(&Vector3::new(0.0, 0.0, 1.0)).unwrap();
        assert!(tilt.roll_deg.is_sign_positive());
        assert!(tilt.pitch_deg.is_sign_positive());
    }

    #[test]
    fn test_pitch_only() {
        let tilt = Tilt::from_gravity(&gravity_for(0.0, 30.0)).unwrap();
        assert!(
            (tilt.pitch_deg - 30.0).abs() < EPSILON,
            "Expected pitch 30, got {}",
            tilt.pitch_deg
        );
        assert!(tilt.roll_deg.abs() < EPSILON);
    }

    #[test]
    fn test_roll_only() {
        let tilt = Tilt::from_gravity(&gravity_for(-20.0, 0.0)).unwrap();
        assert!(
            (tilt.roll_deg + 20.0).abs() < EPSILON,
            "Expected roll -20, got {}",
            tilt.roll_deg
        );
        assert!(tilt.pitch_deg.abs() < EPSILON);
    }

    #[test]
    fn test_scale_invariant() {
        let a = Tilt::from_gravity(&gravity_for(12.0, -7.0)).unwrap();
        let b = Tilt::from_gravity(&(gravity_for(12.0, -7.0) * 0.1)).unwrap();
        assert!((a.roll_deg - b.roll_deg).abs() < EPSILON);
        assert!((a.pitch_deg - b.pitch_deg).abs() < EPSILON);
    }

    #[test]
    fn test_face_down_roll_is_180() {
        let tilt = Tilt::from_gravity(&Vector3::new(0.0, 0.0, -G)).unwrap();
        assert!((tilt.roll_deg.abs() - 180.0).abs() < EPSILON);
    }

    #[test]
    fn test_vertical_device_pitch_90() {
        let tilt = Tilt::from_gravity(&Vector3::new(0.0, G, 0.0)).unwrap();
        assert!((tilt.pitch_deg - 90.0).abs() < EPSILON);
    }

    #[test]
    fn test_zero_gravity_guarded() {
        assert!(Tilt::from_gravity(&Vector3::zeros()).is_none());
    }

    #[test]
    fn test_non_finite_gravity_guarded() {
        assert!(Tilt::from_gravity(&Vector3::new(f32::NAN, 0.0, G)).is_none());
        assert!(Tilt::from_gravity(&Vector3::new(f32::INFINITY, 0.0, G)).is_none());
    }
}
