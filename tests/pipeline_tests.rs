use async_trait::async_trait;
use compass_level::{
    OrientationTask, ReplaySource, SensorCapabilities, SensorError, SensorSource, SimulatedConfig,
    SimulatedDevice, TextRenderer,
};
use compass_level_core::display::Readout;
use compass_level_core::orientation::EstimatorConfig;
use compass_level_core::sensor::{SensorEvent, SensorKind};
use nalgebra::Vector3;

const EPSILON: f32 = 0.05;

/// Scripted source replaying a fixed list of events.
struct MockSource {
    events: Vec<SensorEvent>,
    next: usize,
    running: bool,
}

impl MockSource {
    fn new(events: Vec<SensorEvent>) -> Self {
        Self {
            events,
            next: 0,
            running: false,
        }
    }
}

#[async_trait]
impl SensorSource for MockSource {
    fn name(&self) -> &str {
        "mock"
    }

    fn capabilities(&self) -> SensorCapabilities {
        SensorCapabilities::default()
    }

    async fn start(&mut self) -> Result<(), SensorError> {
        self.running = true;
        Ok(())
    }

    async fn stop(&mut self) -> Result<(), SensorError> {
        self.running = false;
        Ok(())
    }

    fn is_running(&self) -> bool {
        self.running
    }

    async fn next_event(&mut self) -> Result<Option<SensorEvent>, SensorError> {
        let event = self.events.get(self.next).copied();
        self.next += 1;
        Ok(event)
    }
}

fn accel(timestamp_us: u64, x: f32, y: f32, z: f32) -> SensorEvent {
    SensorEvent::new(SensorKind::Accelerometer, timestamp_us, Vector3::new(x, y, z))
}

fn mag(timestamp_us: u64, x: f32, y: f32, z: f32) -> SensorEvent {
    SensorEvent::new(SensorKind::Magnetometer, timestamp_us, Vector3::new(x, y, z))
}

#[test]
fn trait_is_object_safe() {
    let source: Box<dyn SensorSource> = Box::new(MockSource::new(Vec::new()));
    assert_eq!(source.name(), "mock");
    assert!(!source.is_running());
    assert!(source.capabilities().supports_heading());
}

#[tokio::test]
async fn mock_events_drive_readout() {
    // Flat, facing east: north lies along device -X
    let events = vec![
        accel(0, 0.0, 0.0, 9.81),
        mag(1, -22.0, 0.0, -40.0),
        SensorEvent::empty(SensorKind::Gyroscope, 2),
        accel(3, 0.0, 0.0, 9.81),
    ];
    let (mut task, watch) =
        OrientationTask::new(Box::new(MockSource::new(events)), EstimatorConfig::default());

    let summary = task.run().await.unwrap();
    assert_eq!(summary.events, 4);
    assert_eq!(summary.skipped, 1);
    assert_eq!(summary.published, 1);

    let readout = watch.current();
    assert!(
        (readout.heading_deg - 90.0).abs() < EPSILON,
        "Expected heading ≈ 90, got {}",
        readout.heading_deg
    );
    assert!(readout.roll_deg.abs() < EPSILON);
    assert!(readout.pitch_deg.abs() < EPSILON);
}

#[tokio::test]
async fn zero_gravity_never_publishes_nan() {
    let events = vec![accel(0, 0.0, 0.0, 0.0), mag(1, 0.0, 22.0, -40.0)];
    let (mut task, watch) =
        OrientationTask::new(Box::new(MockSource::new(events)), EstimatorConfig::default());

    let summary = task.run().await.unwrap();
    assert_eq!(summary.published, 0);
    assert_eq!(watch.current(), Readout::default());
}

#[tokio::test]
async fn declination_shifts_heading() {
    let config = EstimatorConfig {
        declination_deg: 10.0,
        ..Default::default()
    };
    let source = SimulatedDevice::new(
        "sim",
        SimulatedConfig {
            heading_deg: 355.0,
            max_steps: Some(4),
            seed: Some(1),
            ..Default::default()
        }
        .noiseless(),
    );
    let (mut task, watch) = OrientationTask::new(Box::new(source), config);

    task.run().await.unwrap();
    let heading = watch.current().heading_deg;
    assert!(
        (heading - 5.0).abs() < EPSILON,
        "Expected heading ≈ 5, got {}",
        heading
    );
}

#[tokio::test]
async fn simulated_pipeline_is_deterministic() {
    async fn run(seed: u64) -> (Readout, u64) {
        let source = SimulatedDevice::new(
            "sim",
            SimulatedConfig {
                heading_deg: 42.0,
                pitch_deg: -15.0,
                roll_deg: 25.0,
                yaw_rate_dps: 5.0,
                seed: Some(seed),
                max_steps: Some(32),
                ..Default::default()
            },
        );
        let (mut task, watch) = OrientationTask::new(Box::new(source), EstimatorConfig::default());
        let summary = task.run().await.unwrap();
        (watch.current(), summary.published)
    }

    let first = run(99).await;
    let second = run(99).await;
    assert_eq!(first, second);
}

#[tokio::test]
async fn noisy_tilt_stays_close_to_truth() {
    let source = SimulatedDevice::new(
        "sim",
        SimulatedConfig {
            heading_deg: 200.0,
            pitch_deg: 20.0,
            roll_deg: -35.0,
            seed: Some(5),
            max_steps: Some(16),
            ..Default::default()
        },
    );
    let (mut task, watch) = OrientationTask::new(Box::new(source), EstimatorConfig::default());
    task.run().await.unwrap();

    let readout = watch.current();
    assert!(
        (readout.heading_deg - 200.0).abs() < 3.0,
        "Expected heading ≈ 200, got {}",
        readout.heading_deg
    );
    assert!(
        (readout.pitch_deg - 20.0).abs() < 2.0,
        "Expected pitch ≈ 20, got {}",
        readout.pitch_deg
    );
    assert!(
        (readout.roll_deg + 35.0).abs() < 2.0,
        "Expected roll ≈ -35, got {}",
        readout.roll_deg
    );
}

#[tokio::test]
async fn replay_pipeline_renders_label() {
    let recording = concat!(
        r#"{"sensor":"accelerometer","timestamp_us":0,"values":[0.0,4.903325,8.492932]}"#,
        "\n",
        r#"{"sensor":"magnetometer","timestamp_us":0,"values":null}"#,
        "\n",
        r#"{"sensor":"magnetometer","timestamp_us":62500,"values":[0.0,22.0,-40.0]}"#,
        "\n",
    );
    let source = ReplaySource::from_reader("recording", recording.as_bytes());
    let (mut task, mut watch) = OrientationTask::new(Box::new(source), EstimatorConfig::default());

    let summary = task.run().await.unwrap();
    assert_eq!(summary.events, 3);
    assert_eq!(summary.skipped, 1);

    let readout = watch.changed().await.unwrap();
    let mut renderer = TextRenderer::new(Vec::new());
    renderer.render(&readout).unwrap();
    let text = String::from_utf8(renderer.into_inner()).unwrap();
    assert!(
        text.ends_with("Roll: 0.00°, Pitch: 30.00°\n"),
        "Unexpected frame: {}",
        text
    );
}

#[tokio::test]
async fn renderer_draws_final_readout() {
    let source = SimulatedDevice::new(
        "sim",
        SimulatedConfig {
            yaw_rate_dps: 32.0,
            seed: Some(3),
            max_steps: Some(8),
            ..Default::default()
        }
        .noiseless(),
    );
    let (mut task, mut watch) = OrientationTask::new(Box::new(source), EstimatorConfig::default());

    let run = async move {
        let summary = task.run().await.unwrap();
        drop(task);
        summary
    };
    let render = async {
        let mut renderer = TextRenderer::new(Vec::new());
        let mut last = None;
        while let Some(readout) = watch.changed().await {
            renderer.render(&readout).unwrap();
            last = Some(readout);
        }
        (renderer.frames(), last)
    };

    let (summary, (frames, last)) = tokio::join!(run, render);
    assert_eq!(summary.published, 7);
    // Readouts published faster than the renderer draws collapse into the newest
    assert!(frames >= 1, "Expected at least one frame, got {}", frames);
    assert!(
        frames <= summary.published,
        "Expected at most {} frames, got {}",
        summary.published,
        frames
    );

    // 7 steps of 1/16 s at 32°/s
    let last = last.unwrap();
    assert!(
        (last.heading_deg - 14.0).abs() < EPSILON,
        "Expected final heading ≈ 14, got {}",
        last.heading_deg
    );
}
