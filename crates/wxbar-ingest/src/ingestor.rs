//! Fetch-then-apply ingest cycle

use std::future::Future;
use std::time::Duration;

use tokio::sync::Mutex;
use tokio::time::timeout;
use tracing::{debug, instrument};
use wxbar_core::{History, Location, Zone};

use crate::{IngestError, IngestResult, WeatherSource};

/// Pulls one sample set from a source and folds it into the history
pub struct SampleIngestor {
    source: Box<dyn WeatherSource>,
    location: Location,
    zone: Zone,
    call_timeout: Duration,
}

impl SampleIngestor {
    pub fn new(
        source: Box<dyn WeatherSource>,
        location: Location,
        zone: Zone,
        call_timeout: Duration,
    ) -> Self {
        Self {
            source,
            location,
            zone,
            call_timeout,
        }
    }

    pub fn source_name(&self) -> &str {
        self.source.name()
    }

    pub fn zone(&self) -> Zone {
        self.zone
    }

    async fn timed<T>(
        &self,
        call: &str,
        fut: impl Future<Output = IngestResult<T>>,
    ) -> IngestResult<T> {
        timeout(self.call_timeout, fut).await.map_err(|_| {
            IngestError::SourceUnavailable(format!(
                "{} timed out after {:?}",
                call, self.call_timeout
            ))
        })?
    }

    /// Run one ingest cycle against `history`.
    ///
    /// Both fetches finish before the lock is taken. On failure only the
    /// error label changes. Returns the bucket the pressure reading went to.
    #[instrument(skip(self, history))]
    pub async fn ingest(&self, history: &Mutex<History>) -> IngestResult<usize> {
        let fetched = async {
            let observation = self
                .timed("fetch_current", self.source.fetch_current(self.location))
                .await?;
            let forecast = self
                .timed("fetch_forecast", self.source.fetch_forecast(self.location))
                .await?;
            Ok::<_, IngestError>((observation, forecast))
        }
        .await;

        let mut history = history.lock().await;
        match fetched {
            Ok((observation, forecast)) => {
                let index = history.ingest(&observation, &forecast, &self.zone);
                debug!(
                    "Ingested pressure={} temp={} into bucket {} ({} forecast points)",
                    observation.pressure_hpa,
                    observation.temperature_c,
                    index,
                    forecast.len()
                );
                Ok(index)
            }
            Err(e) => {
                history.record_error(e.to_string());
                Err(e)
            }
        }
    }
}
