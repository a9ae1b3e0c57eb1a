//! Time-bucketed 24-hour history of pressure readings and forecast rain
//!
//! Each day is split into fixed-width buckets (5 minutes by default, 288
//! buckets). Pressure readings land in the bucket of their local time of
//! day; forecast rain for the same calendar day lands in the bucket of the
//! forecast window start.

use chrono::{NaiveDate, Timelike};
use thiserror::Error;

use crate::types::{ForecastPoint, Observation, RainEvent, Zone};

pub const MINUTES_PER_DAY: u32 = 24 * 60;

/// Default bucket width (minutes)
pub const DEFAULT_BUCKET_MINUTES: u32 = 5;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum HistoryError {
    #[error("Invalid bucket size: {0} minutes does not evenly divide a day")]
    InvalidBucketMinutes(u32),
}

/// What happens to yesterday's buckets when the first sample of a new day arrives
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DayRollover {
    /// Leave them; only future-zeroing clears stale values
    #[default]
    Keep,
    /// Zero every pressure and rain bucket before applying the sample
    Clear,
}

/// Rolling 24-hour timeline plus the latest scalar readings
#[derive(Debug, Clone, PartialEq)]
pub struct History {
    bucket_minutes: u32,
    pressure: Vec<i32>,
    rain: Vec<f64>,
    rain_events: Vec<RainEvent>,
    current_temperature_c: i32,
    current_pressure_hpa: i32,
    last_update_label: String,
    last_error_label: String,
    day_rollover: DayRollover,
    last_day: Option<NaiveDate>,
}

impl History {
    /// Create an empty history with the default 5-minute buckets
    pub fn new() -> Self {
        Self::with_buckets(DEFAULT_BUCKET_MINUTES)
    }

    /// Create an empty history with a custom bucket width
    pub fn with_bucket_minutes(bucket_minutes: u32) -> Result<Self, HistoryError> {
        if bucket_minutes == 0 || MINUTES_PER_DAY % bucket_minutes != 0 {
            return Err(HistoryError::InvalidBucketMinutes(bucket_minutes));
        }
        Ok(Self::with_buckets(bucket_minutes))
    }

    fn with_buckets(bucket_minutes: u32) -> Self {
        let count = (MINUTES_PER_DAY / bucket_minutes) as usize;
        Self {
            bucket_minutes,
            pressure: vec![0; count],
            rain: vec![0.0; count],
            rain_events: Vec::new(),
            current_temperature_c: 0,
            current_pressure_hpa: 0,
            last_update_label: "-".to_string(),
            last_error_label: String::new(),
            day_rollover: DayRollover::Keep,
            last_day: None,
        }
    }

    pub fn with_day_rollover(mut self, day_rollover: DayRollover) -> Self {
        self.day_rollover = day_rollover;
        self
    }

    /// Bucket holding the given local time of day
    pub fn bucket_index<T: Timelike>(&self, time: &T) -> usize {
        let minute_of_day = time.hour() * 60 + time.minute();
        let index = (minute_of_day / self.bucket_minutes) as usize;
        index.min(self.bucket_count() - 1)
    }

    /// Apply one observation and its forecast batch.
    ///
    /// Returns the bucket index the pressure reading was written to.
    pub fn ingest(
        &mut self,
        observation: &Observation,
        forecast: &[ForecastPoint],
        zone: &Zone,
    ) -> usize {
        let local = zone.localize(observation.timestamp);
        let today = local.date();

        if self.day_rollover == DayRollover::Clear
            && matches!(self.last_day, Some(day) if day != today)
        {
            self.clear_buckets();
        }

        let index = self.bucket_index(&local);
        self.pressure[index] = observation.pressure_hpa;
        self.pressure[index + 1..].fill(0);

        self.current_pressure_hpa = observation.pressure_hpa;
        self.current_temperature_c = observation.temperature_c as i32;
        self.last_update_label = local.format("%H:%M").to_string();
        self.last_error_label.clear();

        for point in forecast {
            let at = zone.localize(point.timestamp);
            if at.date() != today {
                continue;
            }
            let slot = self.bucket_index(&at);
            self.rain[slot] = point.rain_mm;
        }

        self.rain_events = forecast
            .iter()
            .map(|point| RainEvent {
                time: zone
                    .localize(point.timestamp)
                    .format("%Y-%m-%d %H:%M:%S")
                    .to_string(),
                value: point.rain_mm,
            })
            .collect();

        self.last_day = Some(today);
        index
    }

    /// Note a failed ingest; buckets and readings are left untouched
    pub fn record_error(&mut self, message: impl Into<String>) {
        self.last_error_label = message.into();
    }

    /// Zero every pressure and rain bucket
    pub fn clear_buckets(&mut self) {
        self.pressure.fill(0);
        self.rain.fill(0.0);
    }

    pub fn bucket_minutes(&self) -> u32 {
        self.bucket_minutes
    }

    pub fn bucket_count(&self) -> usize {
        self.pressure.len()
    }

    pub fn pressure(&self) -> &[i32] {
        &self.pressure
    }

    pub fn rain(&self) -> &[f64] {
        &self.rain
    }

    pub fn rain_events(&self) -> &[RainEvent] {
        &self.rain_events
    }

    pub fn current_temperature_c(&self) -> i32 {
        self.current_temperature_c
    }

    pub fn current_pressure_hpa(&self) -> i32 {
        self.current_pressure_hpa
    }

    pub fn last_update_label(&self) -> &str {
        &self.last_update_label
    }

    pub fn last_error_label(&self) -> &str {
        &self.last_error_label
    }

    pub fn day_rollover(&self) -> DayRollover {
        self.day_rollover
    }

    /// Number of buckets currently holding a pressure reading
    pub fn pressure_samples(&self) -> usize {
        self.pressure.iter().filter(|&&p| p != 0).count()
    }

    /// Number of buckets currently holding forecast rain
    pub fn rain_samples(&self) -> usize {
        self.rain.iter().filter(|&&r| r != 0.0).count()
    }
}

impl Default for History {
    fn default() -> Self {
        Self::new()
    }
}
