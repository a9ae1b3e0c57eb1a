//! Simulated weather source for offline runs and testing

use chrono::{DateTime, Duration as ChronoDuration, DurationRound, Utc};
use wxbar_core::{ForecastPoint, Location, Observation};

use crate::{IngestError, IngestResult, WeatherSource};

/// Number of 3-hour windows in a simulated forecast (5 days)
const FORECAST_WINDOWS: i64 = 40;

/// Simulator that derives pressure, temperature and rain from the clock
pub struct SimulatorSource {
    base_pressure: f64,
    base_temp: f64,
    clock: fn() -> DateTime<Utc>,
}

impl SimulatorSource {
    pub fn new() -> Self {
        Self {
            base_pressure: 1013.0,
            base_temp: 12.0, // 12°C base temperature
            clock: Utc::now,
        }
    }

    /// Use a fixed clock instead of the system time
    pub fn with_clock(mut self, clock: fn() -> DateTime<Utc>) -> Self {
        self.clock = clock;
        self
    }

    fn observation_at(&self, now: DateTime<Utc>) -> Observation {
        let secs = now.timestamp();

        // Slow pressure swing, +/- 15 hPa over roughly a day
        let phase = (secs % 86_400) as f64 / 86_400.0 * std::f64::consts::TAU;
        let pressure = self.base_pressure + 15.0 * phase.sin();
        let variation = ((secs % 100) as f64 / 10.0) - 5.0;

        Observation {
            timestamp: now,
            temperature_c: self.base_temp + variation,
            pressure_hpa: pressure.round() as i32,
        }
    }

    fn forecast_from(&self, now: DateTime<Utc>) -> IngestResult<Vec<ForecastPoint>> {
        let start = now
            .duration_trunc(ChronoDuration::hours(3))
            .map_err(|e| IngestError::MalformedPayload(e.to_string()))?;

        Ok((1..=FORECAST_WINDOWS)
            .filter_map(|window| {
                let timestamp = start + ChronoDuration::hours(3 * window);
                // Every third window brings a shower
                let slot = timestamp.timestamp() / 10_800;
                (slot % 3 == 0).then(|| ForecastPoint {
                    timestamp,
                    rain_mm: ((slot % 7) as f64 + 1.0) * 0.05,
                })
            })
            .collect())
    }
}

impl Default for SimulatorSource {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl WeatherSource for SimulatorSource {
    fn name(&self) -> &str {
        "simulator"
    }

    async fn fetch_current(&self, _location: Location) -> IngestResult<Observation> {
        Ok(self.observation_at((self.clock)()))
    }

    async fn fetch_forecast(&self, _location: Location) -> IngestResult<Vec<ForecastPoint>> {
        self.forecast_from((self.clock)())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn noon() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 7, 1, 12, 0, 0).unwrap()
    }

    #[tokio::test]
    async fn test_simulator_observation() {
        let source = SimulatorSource::new().with_clock(noon);
        let location = Location::new(56.376525, 8.901999);

        let obs = source.fetch_current(location).await.unwrap();

        assert_eq!(obs.timestamp, noon());
        assert!((998..=1028).contains(&obs.pressure_hpa));
        assert!(obs.temperature_c >= 7.0 && obs.temperature_c <= 17.0);
    }

    #[tokio::test]
    async fn test_simulator_forecast_is_sparse_and_ordered() {
        let source = SimulatorSource::new().with_clock(noon);
        let location = Location::new(56.376525, 8.901999);

        let points = source.fetch_forecast(location).await.unwrap();

        assert!(!points.is_empty());
        assert!(points.len() < FORECAST_WINDOWS as usize);
        assert!(points.windows(2).all(|w| w[0].timestamp < w[1].timestamp));
        assert!(points.iter().all(|p| p.timestamp > noon() && p.rain_mm > 0.0));

        // Same clock, same data
        assert_eq!(points, source.fetch_forecast(location).await.unwrap());
    }
}
