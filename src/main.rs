//! compass_level - show compass heading, roll and pitch
//!
//! Drives the orientation pipeline from the simulated device or a recorded
//! JSON Lines file and prints each readout.
//!
//! ```text
//! compass_level --heading 135 --pitch 10 --roll -20
//! compass_level --yaw-rate 30 --realtime --steps 0
//! compass_level --replay recording.jsonl --params params.json
//! compass_level --replay sweep.jsonl --calibrate > params.json
//! RUST_LOG=debug compass_level --no-magnetometer
//! ```

use std::io::{self, IsTerminal};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use compass_level::calibrate::{calibrate_magnetometer, compass_parameters};
use compass_level::config::{default_store, load_parameter_file};
use compass_level::{
    AppError, OrientationTask, ReplaySource, SensorSource, SimulatedConfig, SimulatedDevice,
    TextRenderer,
};
use compass_level_core::parameters::{estimator_config, OrientationParams, ParamValue};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Simulated heading in degrees from north
    #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
    heading: f32,

    /// Simulated pitch in degrees (top edge raised is positive)
    #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
    pitch: f32,

    /// Simulated roll in degrees
    #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
    roll: f32,

    /// Simulated turn rate in degrees per second
    #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
    yaw_rate: f32,

    /// Number of simulated samples, 0 runs until interrupted
    #[arg(long, default_value_t = 64)]
    steps: u64,

    /// RNG seed for reproducible noise
    #[arg(long)]
    seed: Option<u64>,

    /// Sensor noise multiplier, 0 disables noise
    #[arg(long, default_value_t = 1.0)]
    noise: f32,

    /// Simulate a device without a magnetometer
    #[arg(long)]
    no_magnetometer: bool,

    /// Pace events in real time
    #[arg(long)]
    realtime: bool,

    /// Replay recorded events from a JSON Lines file instead of simulating
    #[arg(long)]
    replay: Option<PathBuf>,

    /// JSON parameter file
    #[arg(long)]
    params: Option<PathBuf>,

    /// Heading filter alpha, overrides HDG_FILT_ALPHA
    #[arg(long)]
    filter_alpha: Option<f32>,

    /// Estimate magnetometer calibration from the stream and print it as a
    /// parameter file instead of showing readouts
    #[arg(long)]
    calibrate: bool,
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn simulated_config(args: &Args, step_size_us: u64) -> SimulatedConfig {
    let defaults = SimulatedConfig::default();
    let noise = args.noise.max(0.0);
    SimulatedConfig {
        heading_deg: args.heading,
        pitch_deg: args.pitch,
        roll_deg: args.roll,
        yaw_rate_dps: args.yaw_rate,
        accel_noise_mss: defaults.accel_noise_mss * noise,
        mag_noise_ut: defaults.mag_noise_ut * noise,
        gyro_noise_rads: defaults.gyro_noise_rads * noise,
        seed: args.seed,
        step_size_us,
        max_steps: (args.steps > 0).then_some(args.steps),
        has_magnetometer: !args.no_magnetometer,
        realtime: args.realtime,
        ..defaults
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let args = Args::parse();
    init_logging();

    let mut store = default_store()?;
    if let Some(path) = &args.params {
        load_parameter_file(&mut store, path)?;
    }
    if let Some(alpha) = args.filter_alpha {
        store
            .set("HDG_FILT_ALPHA", ParamValue::Float(alpha))
            .map_err(|error| AppError::Parameter {
                name: "HDG_FILT_ALPHA".to_string(),
                error,
            })?;
    }

    let config = estimator_config(&store);
    let step_size_us = OrientationParams::from_store(&store).sample_period_us();
    info!(
        heading_alpha = config.heading_alpha,
        declination_deg = config.declination_deg,
        calibrated = config.calibration.is_calibrated(),
        step_size_us,
        "estimator configured"
    );

    let mut source: Box<dyn SensorSource> = match &args.replay {
        Some(path) => Box::new(
            ReplaySource::open(path)
                .map_err(AppError::from)
                .with_context(|| format!("opening replay file {}", path.display()))?
                .with_realtime(args.realtime),
        ),
        None => Box::new(SimulatedDevice::new(
            "simulated",
            simulated_config(&args, step_size_us),
        )),
    };

    if args.calibrate {
        calibrate_magnetometer(source.as_mut(), &mut store)
            .await
            .context("magnetometer calibration failed")?;
        let params = serde_json::to_string_pretty(&compass_parameters(&store))?;
        println!("{}", params);
        return Ok(());
    }

    let (mut task, mut watch) = OrientationTask::new(source, config);

    let stdout = io::stdout();
    let inline = args.realtime && stdout.is_terminal();
    let mut renderer = TextRenderer::new(stdout.lock()).inline(inline);

    let run = async move {
        let summary = task.run().await;
        // Dropping the task closes the readout channel and ends rendering
        drop(task);
        summary
    };
    let render = async {
        renderer.render(&watch.current())?;
        while let Some(readout) = watch.changed().await {
            renderer.render(&readout)?;
        }
        renderer.finish()?;
        Ok::<_, io::Error>(renderer.frames())
    };

    let (summary, frames) = tokio::join!(run, render);
    let summary = summary
        .map_err(AppError::from)
        .context("sensor stream failed")?;
    let frames = frames.map_err(AppError::from).context("writing readout")?;

    info!(
        events = summary.events,
        published = summary.published,
        skipped = summary.skipped,
        frames,
        "done"
    );
    Ok(())
}
