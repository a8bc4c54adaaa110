//! Angle normalization helpers (degrees)

/// Normalize an angle in degrees to `[0, 360)`.
///
/// Never returns `360.0` or negative zero, so the result is always safe to
/// print as a compass bearing. NaN passes through unchanged.
pub fn wrap_360(angle: f32) -> f32 {
    let mut wrapped = libm::fmodf(angle, 360.0);
    if wrapped < 0.0 {
        wrapped += 360.0;
    }
    // Adding 360 to a tiny negative remainder rounds up to exactly 360 in f32
    if wrapped >= 360.0 || wrapped == 0.0 {
        return 0.0;
    }
    wrapped
}

/// Normalize an angle in degrees to `(-180, 180]`.
pub fn wrap_180(angle: f32) -> f32 {
    let wrapped = wrap_360(angle);
    if wrapped > 180.0 {
        wrapped - 360.0
    } else {
        wrapped
    }
}

/// Replace negative zero with positive zero.
///
/// `atan2(-0.0, 1.0)` yields `-0.0`, which formats as `-0.00`.
pub(crate) fn clear_negative_zero(value: f32) -> f32 {
    if value == 0.0 {
        0.0
    } else {
        value
    }
}
