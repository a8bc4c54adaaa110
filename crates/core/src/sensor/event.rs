use nalgebra::Vector3;

/// Sensor that produced an event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SensorKind {
    /// Acceleration including gravity (m/s²)
    Accelerometer,
    /// Ambient magnetic field (µT)
    Magnetometer,
    /// Angular rate (rad/s)
    Gyroscope,
}

impl SensorKind {
    /// Return variant name as a static string
    pub fn as_str(&self) -> &'static str {
        match self {
            SensorKind::Accelerometer => "accelerometer",
            SensorKind::Magnetometer => "magnetometer",
            SensorKind::Gyroscope => "gyroscope",
        }
    }
}

/// A single pushed sensor reading
///
/// `values` is `None` when the platform delivered an empty, short or
/// non-finite payload. Consumers skip such events.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SensorEvent {
    pub kind: SensorKind,
    /// Timestamp (microseconds since boot)
    pub timestamp_us: u64,
    pub values: Option<Vector3<f32>>,
}

impl SensorEvent {
    pub fn new(kind: SensorKind, timestamp_us: u64, values: Vector3<f32>) -> Self {
        let values = if values.iter().all(|v| v.is_finite()) {
            Some(values)
        } else {
            None
        };
        Self {
            kind,
            timestamp_us,
            values,
        }
    }

    /// Build an event from a platform value array.
    ///
    /// Only the first three components are used; some sensors append
    /// accuracy or bias fields.
    pub fn from_slice(kind: SensorKind, timestamp_us: u64, values: &[f32]) -> Self {
        match values {
            [x, y, z, ..] => Self::new(kind, timestamp_us, Vector3::new(*x, *y, *z)),
            _ => Self::empty(kind, timestamp_us),
        }
    }

    /// Event without a payload
    pub fn empty(kind: SensorKind, timestamp_us: u64) -> Self {
        Self {
            kind,
            timestamp_us,
            values: None,
        }
    }

    pub fn has_payload(&self) -> bool {
        self.values.is_some()
    }
}
