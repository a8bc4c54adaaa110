//! Heading exponential moving average (EMA) filter
//!
//! Angle-aware smoothing for the compass needle. Disabled (alpha = 1.0) by
//! default; the platform's sensor batching is the only smoothing unless a
//! lower alpha is configured.

use super::angle::{wrap_180, wrap_360};

/// Pass-through smoothing factor
pub const ALPHA_PASS_THROUGH: f32 = 1.0;

/// Exponential moving average filter for heading values.
///
/// Handles angle wrapping correctly (e.g., 350° → 10° transitions)
/// using shortest-path interpolation.
///
/// # Configuration
/// - `alpha = 1.0`: no filtering (pass-through, default)
/// - `alpha = 0.3`: moderate smoothing
/// - `alpha = 0.0`: maximum smoothing (holds first heading indefinitely)
#[derive(Debug, Clone)]
pub struct HeadingFilter {
    alpha: f32,
    prev_heading: Option<f32>,
}

impl HeadingFilter {
    /// Create a new HeadingFilter with the given smoothing factor.
    ///
    /// Alpha is clamped to [0.0, 1.0]; NaN falls back to pass-through.
    pub fn new(alpha: f32) -> Self {
        let alpha = if alpha.is_nan() {
            ALPHA_PASS_THROUGH
        } else {
            alpha.clamp(0.0, 1.0)
        };
        Self {
            alpha,
            prev_heading: None,
        }
    }

    /// Apply the filter to a heading in degrees.
    ///
    /// Returns the smoothed heading in [0, 360). The first call returns the
    /// (normalized) input unchanged.
    pub fn apply(&mut self, heading: f32) -> f32 {
        let smoothed = match self.prev_heading {
            None => wrap_360(heading),
            Some(prev) => {
                let diff = wrap_180(heading - prev);
                wrap_360(prev + self.alpha * diff)
            }
        };
        self.prev_heading = Some(smoothed);
        smoothed
    }

    /// Clear the previous heading.
    pub fn reset(&mut self) {
        self.prev_heading = None;
    }

    pub fn alpha(&self) -> f32 {
        self.alpha
    }
}

impl Default for HeadingFilter {
    fn default() -> Self {
        Self::new(ALPHA_PASS_THROUGH)
    }
}
