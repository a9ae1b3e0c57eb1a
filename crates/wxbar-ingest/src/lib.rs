//! Weather sources and the sample ingestor
//!
//! A `WeatherSource` fetches current conditions and the 3-hour forecast
//! for a location. `SampleIngestor` time-boxes both fetches and applies the
//! result to the shared history in one critical section.

pub mod ingestor;
pub mod openweather;
pub mod simulator;

pub use ingestor::*;
pub use openweather::*;
pub use simulator::*;

use thiserror::Error;
use wxbar_core::{ForecastPoint, Location, Observation};

#[derive(Debug, Error)]
pub enum IngestError {
    #[error("Weather source unavailable: {0}")]
    SourceUnavailable(String),

    #[error("Malformed payload: {0}")]
    MalformedPayload(String),

    #[error("Timestamp out of range: {0}")]
    ClockSkew(i64),
}

pub type IngestResult<T> = Result<T, IngestError>;

/// Trait for all remote or simulated weather data providers
#[async_trait::async_trait]
pub trait WeatherSource: Send + Sync {
    /// Source name/identifier
    fn name(&self) -> &str;

    /// Current temperature and pressure at the location
    async fn fetch_current(&self, location: Location) -> IngestResult<Observation>;

    /// 3-hour forecast windows that carry a rain amount
    async fn fetch_forecast(&self, location: Location) -> IngestResult<Vec<ForecastPoint>>;
}
