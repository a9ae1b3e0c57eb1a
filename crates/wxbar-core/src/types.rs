//! Core data types for weather samples

use chrono::{DateTime, Local, NaiveDateTime, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

/// Geographic location being tracked
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub lat: f64,
    pub lon: f64,
}

impl Location {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }
}

/// A single "current conditions" reading from a weather source
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    /// Reference time of the reading
    pub timestamp: DateTime<Utc>,

    /// Air temperature (°C)
    pub temperature_c: f64,

    /// Station pressure (hPa)
    pub pressure_hpa: i32,
}

/// One 3-hour forecast window with its expected precipitation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastPoint {
    /// Start of the forecast window
    pub timestamp: DateTime<Utc>,

    /// Expected rain over the window (mm)
    pub rain_mm: f64,
}

/// Raw forecast point kept for textual display
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RainEvent {
    /// Local time, `YYYY-MM-DD HH:MM:SS`
    pub time: String,
    pub value: f64,
}

/// Timezone used to turn source timestamps into civil time of the location
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Zone {
    /// Timezone of the host running the daemon
    #[default]
    System,
    /// Explicit IANA zone
    Named(Tz),
}

impl Zone {
    /// Convert a UTC instant to the location's wall-clock time
    pub fn localize(&self, timestamp: DateTime<Utc>) -> NaiveDateTime {
        match self {
            Zone::System => timestamp.with_timezone(&Local).naive_local(),
            Zone::Named(tz) => timestamp.with_timezone(tz).naive_local(),
        }
    }
}
