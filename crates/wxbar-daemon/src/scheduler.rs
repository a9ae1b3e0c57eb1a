//! Poll, render and display loop

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use tokio::sync::Mutex;
use tokio::time::MissedTickBehavior;
use tracing::{debug, error, info, warn};
use wxbar_core::{render, DisplayLabels, DisplaySink, History};
use wxbar_ingest::SampleIngestor;

/// Scheduler drives one ingest, render and display cycle per poll interval
pub struct Scheduler {
    ingestor: SampleIngestor,
    history: Arc<Mutex<History>>,
    sink: Box<dyn DisplaySink>,
    width: usize,
    height: usize,
    poll_interval: Duration,
}

impl Scheduler {
    pub fn new(
        ingestor: SampleIngestor,
        history: Arc<Mutex<History>>,
        sink: Box<dyn DisplaySink>,
        (width, height): (usize, usize),
        poll_interval: Duration,
    ) -> Self {
        Self {
            ingestor,
            history,
            sink,
            width,
            height,
            poll_interval,
        }
    }

    /// Run cycles until the future is dropped
    pub async fn run(&mut self) -> Result<()> {
        info!("Scheduler started");
        info!("Source: {}", self.ingestor.source_name());
        info!("Zone: {:?}", self.ingestor.zone());
        info!("Bucket size: {} min", self.history.lock().await.bucket_minutes());
        info!("Poll interval: {}s", self.poll_interval.as_secs());

        let mut ticker = tokio::time::interval(self.poll_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        // First tick fires immediately
        loop {
            ticker.tick().await;
            self.run_cycle().await;
        }
    }

    /// One poll: ingest, then render whatever the history holds.
    ///
    /// A failed ingest still renders, so the last bars stay on screen with
    /// the error text in place of the update time.
    pub async fn run_cycle(&mut self) {
        // Fetch and apply the sample
        if let Err(e) = self.ingestor.ingest(&self.history).await {
            warn!("Ingest failed: {}", e);
        }

        // Render under the lock, show outside it
        let (frame, labels) = {
            let history = self.history.lock().await;
            debug!(
                temperature = history.current_temperature_c(),
                pressure = history.current_pressure_hpa(),
                pressure_buckets = history.pressure_samples(),
                rain_buckets = history.rain_samples(),
                rain_events = ?history.rain_events(),
                "History state"
            );
            (
                render(&history, self.width, self.height),
                DisplayLabels::from_history(&history),
            )
        };

        // Push to display
        if let Err(e) = self.sink.show(&frame, &labels).await {
            error!("Display sink error: {}", e);
        }
    }
}
