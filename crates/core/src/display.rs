//! Display readout
//!
//! The three numbers pushed to the rendering layer, plus the text formatting
//! shared by every renderer.

use core::fmt::Write;

use heapless::String;

use crate::orientation::{wrap_360, Orientation};

/// Capacity of a formatted tilt label
pub const LABEL_LEN: usize = 64;

/// Display resolution in hundredths of a degree (matches `%.2f`)
const DISPLAY_STEPS_PER_DEGREE: f32 = 100.0;

const CARDINALS: [&str; 8] = ["N", "NE", "E", "SE", "S", "SW", "W", "NW"];

/// Values consumed by the rendering layer
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Readout {
    /// Compass heading, [0, 360)
    pub heading_deg: f32,
    pub roll_deg: f32,
    pub pitch_deg: f32,
}

impl From<Orientation> for Readout {
    fn from(orientation: Orientation) -> Self {
        Self {
            heading_deg: orientation.heading_deg,
            roll_deg: orientation.roll_deg,
            pitch_deg: orientation.pitch_deg,
        }
    }
}

impl Readout {
    /// Rotation to apply to the needle image, in degrees
    pub fn needle_rotation_deg(&self) -> f32 {
        self.heading_deg
    }

    /// Tilt label for this readout
    pub fn tilt_label(&self) -> String<LABEL_LEN> {
        format_tilt_label(self.roll_deg, self.pitch_deg)
    }

    /// 8-point compass direction for the heading
    pub fn cardinal(&self) -> &'static str {
        cardinal(self.heading_deg)
    }

    /// True if the two readouts would render differently.
    ///
    /// Angles are compared at 0.01° resolution.
    pub fn is_visibly_different(&self, other: &Readout) -> bool {
        quantize(self.heading_deg) != quantize(other.heading_deg)
            || quantize(self.roll_deg) != quantize(other.roll_deg)
            || quantize(self.pitch_deg) != quantize(other.pitch_deg)
    }
}

fn quantize(angle: f32) -> i64 {
    libm::roundf(angle * DISPLAY_STEPS_PER_DEGREE) as i64
}

/// Format `"Roll: %.2f°, Pitch: %.2f°"`.
///
/// Output beyond [`LABEL_LEN`] bytes is dropped.
pub fn format_tilt_label(roll_deg: f32, pitch_deg: f32) -> String<LABEL_LEN> {
    let mut label = String::new();
    let _ = write!(label, "Roll: {:.2}°, Pitch: {:.2}°", roll_deg, pitch_deg);
    label
}

/// 8-point compass direction for a heading in degrees
pub fn cardinal(heading_deg: f32) -> &'static str {
    let sector = libm::roundf(wrap_360(heading_deg) / 45.0) as usize % CARDINALS.len();
    CARDINALS[sector]
}
