//! Replay recorded OpenWeatherMap payloads through ingest, render and the
//! filesystem sink, checking the chart after a morning of polls.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::Path;
use std::time::Duration;
use tokio::sync::Mutex;
use wxbar_core::{
    palette, render, DisplayLabels, DisplaySink, ForecastPoint, History, Location, Observation,
    Zone,
};
use wxbar_ingest::{parse_current, parse_forecast, IngestResult, SampleIngestor, WeatherSource};
use wxbar_sinks::FsSink;

#[derive(Debug, Deserialize)]
struct RecordedPoll {
    current: serde_json::Value,
    forecast: serde_json::Value,
}

/// Serves one recorded poll through the real payload parsers
struct RecordedSource(RecordedPoll);

#[async_trait::async_trait]
impl WeatherSource for RecordedSource {
    fn name(&self) -> &str {
        "recorded"
    }

    async fn fetch_current(&self, _location: Location) -> IngestResult<Observation> {
        parse_current(&self.0.current.to_string())
    }

    async fn fetch_forecast(&self, _location: Location) -> IngestResult<Vec<ForecastPoint>> {
        parse_forecast(&self.0.forecast.to_string())
    }
}

fn load_polls(path: &Path) -> Result<Vec<RecordedPoll>> {
    let json =
        fs::read_to_string(path).with_context(|| format!("Failed to read fixture: {:?}", path))?;
    serde_json::from_str(&json).with_context(|| format!("Failed to parse fixture: {:?}", path))
}

fn fixture_path() -> std::path::PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/day.json")
}

#[tokio::test]
async fn test_replay_morning_polls() -> Result<()> {
    let history = Mutex::new(History::new());
    let mut outcomes = Vec::new();

    for poll in load_polls(&fixture_path())? {
        let ingestor = SampleIngestor::new(
            Box::new(RecordedSource(poll)),
            Location::new(56.376525, 8.901999),
            Zone::Named(chrono_tz::UTC),
            Duration::from_secs(1),
        );
        outcomes.push(ingestor.ingest(&history).await.is_ok());
    }
    assert_eq!(outcomes, vec![true, true, false, true]);

    let history = history.lock().await;

    // 06:00, 12:00 and 12:05 readings; the failed poll wrote nothing
    assert_eq!(history.pressure()[72], 1008);
    assert_eq!(history.pressure()[144], 1004);
    assert_eq!(history.pressure()[145], 1003);
    assert_eq!(history.pressure_samples(), 3);
    assert_eq!(history.current_temperature_c(), 0);

    // 15:00 overwritten by the second poll, tomorrow's 03:00 never bucketed
    assert_eq!(history.rain()[108], 0.12);
    assert_eq!(history.rain()[180], 0.05);
    assert_eq!(history.rain()[216], 0.3);
    assert_eq!(history.rain()[36], 0.0);
    assert!(history.rain_events().is_empty());

    let frame = render(&history, 288, 40);
    assert_eq!(frame.pixel(72, 5), Some(palette::PRESSURE_BAR));
    assert_eq!(frame.pixel(145, 39), Some(palette::PRESSURE_BAR));
    assert_eq!(frame.pixel(146, 39), Some(palette::NO_DATA));
    assert_eq!(frame.pixel(108, 26), Some(palette::RAIN));
    assert_eq!(frame.pixel(108, 25), Some(palette::BACKGROUND));
    assert_eq!(frame.pixel(180, 33), Some(palette::RAIN));
    assert_eq!(frame.pixel(180, 32), Some(palette::BACKGROUND));

    let labels = DisplayLabels::from_history(&history);
    assert_eq!(labels.status, "Update:12:05");
    assert_eq!(labels.temperature.to_string(), "+00C");

    let dir = tempfile::tempdir()?;
    let mut sink = FsSink::new(dir.path())?;
    sink.show(&frame, &labels).await?;
    assert_eq!(fs::read(sink.chart_path())?, frame.to_ppm());

    Ok(())
}

#[tokio::test]
async fn test_replay_error_poll_keeps_previous_state() -> Result<()> {
    let mut polls = load_polls(&fixture_path())?.into_iter();
    let history = Mutex::new(History::new());
    let location = Location::new(56.376525, 8.901999);

    for poll in polls.by_ref().take(2) {
        SampleIngestor::new(
            Box::new(RecordedSource(poll)),
            location,
            Zone::Named(chrono_tz::UTC),
            Duration::from_secs(1),
        )
        .ingest(&history)
        .await?;
    }
    let before = render(&*history.lock().await, 288, 40);
    let events_before = history.lock().await.rain_events().to_vec();

    let failing = polls.next().context("fixture has an error poll")?;
    let result = SampleIngestor::new(
        Box::new(RecordedSource(failing)),
        location,
        Zone::Named(chrono_tz::UTC),
        Duration::from_secs(1),
    )
    .ingest(&history)
    .await;
    assert!(result.is_err());

    let history = history.lock().await;
    assert_eq!(render(&history, 288, 40), before);
    assert_eq!(history.rain_events(), events_before.as_slice());
    assert_eq!(history.last_update_label(), "12:00");
    assert!(history.last_error_label().starts_with("Malformed payload"));

    let labels = DisplayLabels::from_history(&history);
    assert!(labels.status.starts_with("Malformed payload"));

    Ok(())
}
