//! Recorded sensor replay.
//!
//! Reads JSON Lines, one event per line:
//!
//! ```text
//! {"sensor": "accelerometer", "timestamp_us": 1000, "values": [0.0, 0.0, 9.81]}
//! {"sensor": "magnetometer", "timestamp_us": 1000, "values": null}
//! ```
//!
//! `values: null` or fewer than three components yield an event without a
//! payload. Blank lines are skipped.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;
use compass_level_core::sensor::{SensorEvent, SensorKind};
use serde::Deserialize;

use crate::devices::sensor::{SensorCapabilities, SensorSource};
use crate::error::SensorError;

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "lowercase")]
enum RecordedSensor {
    Accelerometer,
    Magnetometer,
    Gyroscope,
}

impl From<RecordedSensor> for SensorKind {
    fn from(sensor: RecordedSensor) -> Self {
        match sensor {
            RecordedSensor::Accelerometer => SensorKind::Accelerometer,
            RecordedSensor::Magnetometer => SensorKind::Magnetometer,
            RecordedSensor::Gyroscope => SensorKind::Gyroscope,
        }
    }
}

#[derive(Debug, Deserialize)]
struct RecordedEvent {
    sensor: RecordedSensor,
    timestamp_us: u64,
    values: Option<Vec<f32>>,
}

impl From<RecordedEvent> for SensorEvent {
    fn from(record: RecordedEvent) -> Self {
        let kind = record.sensor.into();
        match record.values {
            Some(values) => SensorEvent::from_slice(kind, record.timestamp_us, &values),
            None => SensorEvent::empty(kind, record.timestamp_us),
        }
    }
}

/// Sensor source replaying a recorded event stream.
pub struct ReplaySource {
    name: String,
    reader: Box<dyn BufRead + Send + Sync>,
    line: usize,
    last_timestamp_us: Option<u64>,
    realtime: bool,
    running: bool,
    finished: bool,
}

impl ReplaySource {
    /// Replay events from any buffered reader.
    pub fn from_reader<R>(name: &str, reader: R) -> Self
    where
        R: BufRead + Send + Sync + 'static,
    {
        Self {
            name: name.to_string(),
            reader: Box::new(reader),
            line: 0,
            last_timestamp_us: None,
            realtime: false,
            running: false,
            finished: false,
        }
    }

    /// Replay events from a file.
    pub fn open(path: &Path) -> Result<Self, SensorError> {
        let file = File::open(path)?;
        Ok(Self::from_reader(
            &path.display().to_string(),
            BufReader::new(file),
        ))
    }

    /// Sleep between events according to their recorded timestamps.
    pub fn with_realtime(mut self, realtime: bool) -> Self {
        self.realtime = realtime;
        self
    }

    /// Number of lines consumed so far.
    pub fn lines_read(&self) -> usize {
        self.line
    }

    fn read_record(&mut self) -> Result<Option<SensorEvent>, SensorError> {
        let mut buf = String::new();
        loop {
            buf.clear();
            if self.reader.read_line(&mut buf)? == 0 {
                return Ok(None);
            }
            self.line += 1;

            let trimmed = buf.trim();
            if trimmed.is_empty() {
                continue;
            }

            let record: RecordedEvent =
                serde_json::from_str(trimmed).map_err(|source| SensorError::Malformed {
                    line: self.line,
                    source,
                })?;
            return Ok(Some(record.into()));
        }
    }

    async fn pace(&mut self, timestamp_us: u64) {
        if let Some(last) = self.last_timestamp_us {
            if self.realtime && timestamp_us > last {
                tokio::time::sleep(Duration::from_micros(timestamp_us - last)).await;
            }
        }
        self.last_timestamp_us = Some(timestamp_us);
    }
}

impl std::fmt::Debug for ReplaySource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReplaySource")
            .field("name", &self.name)
            .field("line", &self.line)
            .field("running", &self.running)
            .finish()
    }
}

#[async_trait]
impl SensorSource for ReplaySource {
    fn name(&self) -> &str {
        &self.name
    }

    fn capabilities(&self) -> SensorCapabilities {
        // Unknown until the recording has been read
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
        if !self.running {
            return Err(SensorError::NotStarted(self.name.clone()));
        }
        if self.finished {
            return Ok(None);
        }

        match self.read_record()? {
            Some(event) => {
                self.pace(event.timestamp_us).await;
                Ok(Some(event))
            }
            None => {
                self.finished = true;
                Ok(None)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::Vector3;

    fn source(text: &'static str) -> ReplaySource {
        ReplaySource::from_reader("test", text.as_bytes())
    }

    async fn drain(source: &mut ReplaySource) -> Vec<SensorEvent> {
        source.start().await.unwrap();
        let mut events = Vec::new();
        while let Some(event) = source.next_event().await.unwrap() {
            events.push(event);
        }
        events
    }

    #[tokio::test]
    async fn test_replay_parses_events() {
        let mut replay = source(concat!(
            r#"{"sensor":"accelerometer","timestamp_us":100,"values":[0.0,0.0,9.81]}"#,
            "\n",
            r#"{"sensor":"magnetometer","timestamp_us":200,"values":[0.0,22.0,-40.0]}"#,
            "\n",
        ));

        let events = drain(&mut replay).await;
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].kind, SensorKind::Accelerometer);
        assert_eq!(events[0].timestamp_us, 100);
        assert_eq!(events[0].values, Some(Vector3::new(0.0, 0.0, 9.81)));
        assert_eq!(events[1].kind, SensorKind::Magnetometer);
        assert_eq!(events[1].values, Some(Vector3::new(0.0, 22.0, -40.0)));
    }

    #[tokio::test]
    async fn test_replay_null_and_short_values() {
        let mut replay = source(concat!(
            r#"{"sensor":"gyroscope","timestamp_us":1,"values":null}"#,
            "\n",
            r#"{"sensor":"accelerometer","timestamp_us":2,"values":[1.0]}"#,
            "\n",
        ));

        let events = drain(&mut replay).await;
        assert_eq!(events.len(), 2);
        assert!(!events[0].has_payload());
        assert!(!events[1].has_payload());
    }

    #[tokio::test]
    async fn test_replay_skips_blank_lines() {
        let mut replay = source(concat!(
            "\n",
            r#"{"sensor":"gyroscope","timestamp_us":5,"values":[0.1,0.2,0.3]}"#,
            "\n\n",
        ));

        let events = drain(&mut replay).await;
        assert_eq!(events.len(), 1);
        assert_eq!(replay.lines_read(), 3);
    }

    #[tokio::test]
    async fn test_replay_malformed_line_reports_line_number() {
        let mut replay = source(concat!(
            r#"{"sensor":"gyroscope","timestamp_us":5,"values":[0.1,0.2,0.3]}"#,
            "\n",
            r#"{"sensor":"barometer","timestamp_us":6,"values":[1.0,2.0,3.0]}"#,
            "\n",
        ));
        replay.start().await.unwrap();

        assert!(replay.next_event().await.unwrap().is_some());
        match replay.next_event().await {
            Err(SensorError::Malformed { line, .. }) => assert_eq!(line, 2),
            other => panic!("Expected malformed error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_replay_requires_start() {
        let mut replay = source("");
        assert!(replay.next_event().await.is_err());

        replay.start().await.unwrap();
        assert!(replay.next_event().await.unwrap().is_none());
        assert!(replay.next_event().await.unwrap().is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_replay_realtime_pacing() {
        let mut replay = source(concat!(
            r#"{"sensor":"gyroscope","timestamp_us":1000000,"values":[0.0,0.0,0.0]}"#,
            "\n",
            r#"{"sensor":"gyroscope","timestamp_us":1250000,"values":[0.0,0.0,0.0]}"#,
            "\n",
        ))
        .with_realtime(true);

        let started = tokio::time::Instant::now();
        let events = drain(&mut replay).await;
        assert_eq!(events.len(), 2);
        assert_eq!(started.elapsed(), Duration::from_millis(250));
    }
}
