//! Simulated sensor device.
//!
//! Synthesizes accelerometer, magnetometer and gyroscope events for a device
//! held at a scripted attitude, suitable for CI testing and running the
//! binary without hardware. Supports sensor noise and a deterministic mode.
//!
//! # Frames
//!
//! - Device: X right, Y toward the top edge, Z out of the screen
//! - World: X east, Y north, Z up
//!
//! The device attitude is `Rz(-heading) · Rx(pitch) · Ry(roll)` (device to
//! world). Readings are world vectors expressed in the device frame.

use std::collections::VecDeque;
use std::time::Duration;

use async_trait::async_trait;
use compass_level_core::orientation::{wrap_360, STANDARD_GRAVITY};
use compass_level_core::sensor::{SensorEvent, SensorKind};
use nalgebra::{Rotation3, Vector3};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::devices::sensor::{SensorCapabilities, SensorSource};
use crate::error::SensorError;

/// Configuration for the simulated device.
#[derive(Debug, Clone)]
pub struct SimulatedConfig {
    /// Initial heading in degrees from north.
    pub heading_deg: f32,
    /// Pitch in degrees (top edge raised is positive).
    pub pitch_deg: f32,
    /// Roll in degrees.
    pub roll_deg: f32,
    /// Constant turn rate in degrees per second (clockwise seen from above).
    pub yaw_rate_dps: f32,
    /// Horizontal geomagnetic field strength in µT (points north).
    pub field_horizontal_ut: f32,
    /// Vertical geomagnetic field strength in µT (positive points down).
    pub field_vertical_ut: f32,
    /// Accelerometer noise standard deviation in m/s².
    pub accel_noise_mss: f32,
    /// Magnetometer noise standard deviation in µT.
    pub mag_noise_ut: f32,
    /// Gyroscope noise standard deviation in rad/s.
    pub gyro_noise_rads: f32,
    /// RNG seed for deterministic mode. None = random.
    pub seed: Option<u64>,
    /// Time between samples in microseconds.
    pub step_size_us: u64,
    /// Stop after this many samples. None = endless.
    pub max_steps: Option<u64>,
    /// Whether the device has a magnetometer.
    pub has_magnetometer: bool,
    /// Sleep `step_size_us` between samples.
    pub realtime: bool,
}

impl Default for SimulatedConfig {
    fn default() -> Self {
        Self {
            heading_deg: 0.0,
            pitch_deg: 0.0,
            roll_deg: 0.0,
            yaw_rate_dps: 0.0,
            field_horizontal_ut: 22.0,
            field_vertical_ut: 40.0,
            accel_noise_mss: 0.05,
            mag_noise_ut: 0.3,
            gyro_noise_rads: 0.005,
            seed: None,
            step_size_us: 62_500, // 16 Hz
            max_steps: None,
            has_magnetometer: true,
            realtime: false,
        }
    }
}

impl SimulatedConfig {
    /// Same configuration without any sensor noise.
    pub fn noiseless(self) -> Self {
        Self {
            accel_noise_mss: 0.0,
            mag_noise_ut: 0.0,
            gyro_noise_rads: 0.0,
            ..self
        }
    }
}

/// Simulated device emitting sensor events from a scripted attitude.
pub struct SimulatedDevice {
    config: SimulatedConfig,
    name: String,
    heading_deg: f32,
    rng: StdRng,
    pending: VecDeque<SensorEvent>,
    sim_time_us: u64,
    step_count: u64,
    running: bool,
}

fn rng_for(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}

impl SimulatedDevice {
    /// Create a new simulated device with the given configuration.
    pub fn new(name: &str, config: SimulatedConfig) -> Self {
        Self {
            heading_deg: wrap_360(config.heading_deg),
            rng: rng_for(config.seed),
            config,
            name: name.to_string(),
            pending: VecDeque::new(),
            sim_time_us: 0,
            step_count: 0,
            running: false,
        }
    }

    /// Create with default configuration.
    pub fn with_defaults() -> Self {
        Self::new("simulated", SimulatedConfig::default())
    }

    /// Device-to-world rotation for the current attitude.
    fn attitude(&self) -> Rotation3<f32> {
        Rotation3::from_axis_angle(&Vector3::z_axis(), -self.heading_deg.to_radians())
            * Rotation3::from_axis_angle(&Vector3::x_axis(), self.config.pitch_deg.to_radians())
            * Rotation3::from_axis_angle(&Vector3::y_axis(), self.config.roll_deg.to_radians())
    }

    /// Synthesize one sample of every available sensor, then advance time.
    fn synthesize(&mut self) {
        let attitude = self.attitude();
        let timestamp_us = self.sim_time_us;

        let gravity = Vector3::new(0.0, 0.0, STANDARD_GRAVITY);
        let accel = attitude.inverse_transform_vector(&gravity)
            + self.noise_vector(self.config.accel_noise_mss);
        self.pending.push_back(SensorEvent::new(
            SensorKind::Accelerometer,
            timestamp_us,
            accel,
        ));

        if self.config.has_magnetometer {
            let field = Vector3::new(
                0.0,
                self.config.field_horizontal_ut,
                -self.config.field_vertical_ut,
            );
            let mag = attitude.inverse_transform_vector(&field)
                + self.noise_vector(self.config.mag_noise_ut);
            self.pending
                .push_back(SensorEvent::new(SensorKind::Magnetometer, timestamp_us, mag));
        }

        // Clockwise heading change is a negative rotation about world up
        let rate = Vector3::new(0.0, 0.0, -self.config.yaw_rate_dps.to_radians());
        let gyro =
            attitude.inverse_transform_vector(&rate) + self.noise_vector(self.config.gyro_noise_rads);
        self.pending
            .push_back(SensorEvent::new(SensorKind::Gyroscope, timestamp_us, gyro));

        let dt = self.config.step_size_us as f32 / 1_000_000.0;
        self.heading_deg = wrap_360(self.heading_deg + self.config.yaw_rate_dps * dt);
        self.sim_time_us += self.config.step_size_us;
        self.step_count += 1;
    }

    fn noise_vector(&mut self, stddev: f32) -> Vector3<f32> {
        Vector3::new(
            self.gaussian_noise(stddev),
            self.gaussian_noise(stddev),
            self.gaussian_noise(stddev),
        )
    }

    /// Generate Gaussian noise using Box-Muller transform.
    fn gaussian_noise(&mut self, stddev: f32) -> f32 {
        if stddev == 0.0 {
            return 0.0;
        }
        let u1: f32 = self.rng.gen::<f32>().max(f32::EPSILON);
        let u2: f32 = self.rng.gen();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f32::consts::PI * u2).cos();
        z * stddev
    }

    fn finished(&self) -> bool {
        self.config
            .max_steps
            .is_some_and(|max| self.step_count >= max)
    }

    /// Current true heading in degrees.
    pub fn heading_deg(&self) -> f32 {
        self.heading_deg
    }

    /// Current simulation time in microseconds.
    pub fn sim_time_us(&self) -> u64 {
        self.sim_time_us
    }

    /// Number of samples synthesized so far.
    pub fn step_count(&self) -> u64 {
        self.step_count
    }
}

impl std::fmt::Debug for SimulatedDevice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SimulatedDevice")
            .field("name", &self.name)
            .field("running", &self.running)
            .field("heading_deg", &self.heading_deg)
            .field("sim_time_us", &self.sim_time_us)
            .finish()
    }
}

#[async_trait]
impl SensorSource for SimulatedDevice {
    fn name(&self) -> &str {
        &self.name
    }

    fn capabilities(&self) -> SensorCapabilities {
        SensorCapabilities {
            accelerometer: true,
            magnetometer: self.config.has_magnetometer,
            gyroscope: true,
        }
    }

    async fn start(&mut self) -> Result<(), SensorError> {
        // Reset state on start
        self.heading_deg = wrap_360(self.config.heading_deg);
        self.rng = rng_for(self.config.seed);
        self.pending.clear();
        self.sim_time_us = 0;
        self.step_count = 0;
        self.running = true;
        Ok(())
    }

    async fn stop(&mut self) -> Result<(), SensorError> {
        self.running = false;
        self.pending.clear();
        Ok(())
    }

    fn is_running(&self) -> bool {
        self.running
    }

    async fn next_event(&mut self) -> Result<Option<SensorEvent>, SensorError> {
        if !self.running {
            return Err(SensorError::NotStarted(self.name.clone()));
        }

        if self.pending.is_empty() {
            if self.finished() {
                return Ok(None);
            }
            if self.config.realtime && self.step_count > 0 {
                tokio::time::sleep(Duration::from_micros(self.config.step_size_us)).await;
            }
            self.synthesize();
        }

        Ok(self.pending.pop_front())
    }
}
