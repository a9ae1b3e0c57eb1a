//! Text shown next to the bar chart

use std::fmt;

use serde::Serialize;

use crate::history::History;
use crate::types::RainEvent;

/// Current temperature split into the glyphs the display draws:
/// a sign, two digits and a "C"
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TemperatureReadout {
    pub negative: bool,
    pub tens: u8,
    pub ones: u8,
}

impl TemperatureReadout {
    /// Magnitudes above 99 saturate at 99
    pub fn from_celsius(celsius: i32) -> Self {
        let magnitude = celsius.unsigned_abs().min(99) as u8;
        Self {
            negative: celsius < 0,
            tens: magnitude / 10,
            ones: magnitude % 10,
        }
    }
}

impl fmt::Display for TemperatureReadout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.negative { '-' } else { '+' };
        write!(f, "{}{}{}C", sign, self.tens, self.ones)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DisplayLabels {
    pub temperature: TemperatureReadout,
    /// "Update:HH:MM", or the last error when the latest ingest failed
    pub status: String,
    pub rain_events: Vec<RainEvent>,
}

impl DisplayLabels {
    pub fn from_history(history: &History) -> Self {
        let status = if history.last_error_label().is_empty() {
            format!("Update:{}", history.last_update_label())
        } else {
            history.last_error_label().to_string()
        };

        Self {
            temperature: TemperatureReadout::from_celsius(history.current_temperature_c()),
            status,
            rain_events: history.rain_events().to_vec(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ForecastPoint, Observation, Zone};
    use chrono::{TimeZone, Utc};

    fn ingested(temperature_c: f64) -> History {
        let mut history = History::new();
        let observation = Observation {
            timestamp: Utc.with_ymd_and_hms(2024, 7, 1, 14, 32, 10).unwrap(),
            temperature_c,
            pressure_hpa: 1018,
        };
        let forecast = [ForecastPoint {
            timestamp: Utc.with_ymd_and_hms(2024, 7, 2, 6, 0, 0).unwrap(),
            rain_mm: 0.31,
        }];
        history.ingest(&observation, &forecast, &Zone::Named(chrono_tz::UTC));
        history
    }

    #[test]
    fn test_temperature_readout_digits() {
        assert_eq!(
            TemperatureReadout::from_celsius(17),
            TemperatureReadout {
                negative: false,
                tens: 1,
                ones: 7
            }
        );
        insta::assert_snapshot!(TemperatureReadout::from_celsius(-3).to_string(), @"-03C");
        insta::assert_snapshot!(TemperatureReadout::from_celsius(0).to_string(), @"+00C");
        insta::assert_snapshot!(TemperatureReadout::from_celsius(142).to_string(), @"+99C");
    }

    #[test]
    fn test_status_before_first_update() {
        let labels = DisplayLabels::from_history(&History::new());
        insta::assert_snapshot!(labels.status, @"Update:-");
    }

    #[test]
    fn test_status_shows_last_update() {
        let labels = DisplayLabels::from_history(&ingested(17.9));

        insta::assert_snapshot!(labels.status, @"Update:14:32");
        assert_eq!(labels.temperature.to_string(), "+17C");
        assert_eq!(labels.rain_events.len(), 1);
        assert_eq!(labels.rain_events[0].time, "2024-07-02 06:00:00");
    }

    #[test]
    fn test_error_replaces_update_label() {
        let mut history = ingested(-0.5);
        history.record_error("Weather source unavailable: timed out after 10s");

        let labels = DisplayLabels::from_history(&history);
        insta::assert_snapshot!(labels.status, @"Weather source unavailable: timed out after 10s");
        assert!(!labels.temperature.negative);
    }
}
