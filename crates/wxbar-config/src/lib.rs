use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use wxbar_core::{DayRollover, Location, Zone, MINUTES_PER_DAY};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LocationConfig {
    pub lat: f64,
    pub lon: f64,
    /// IANA zone name; host local time when absent
    pub timezone: Option<String>,
}

impl Default for LocationConfig {
    fn default() -> Self {
        Self {
            lat: 56.376525,
            lon: 8.901999,
            timezone: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SourceDriver {
    #[default]
    OpenWeather,
    Simulator,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    pub driver: SourceDriver,
    pub api_key: Option<String>,
    /// Upper bound for each remote call
    pub timeout_secs: u64,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            driver: SourceDriver::OpenWeather,
            api_key: None,
            timeout_secs: 10,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScheduleConfig {
    pub poll_interval_secs: u64,
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            poll_interval_secs: 120,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HistoryConfig {
    pub bucket_minutes: u32,
    /// Wipe yesterday's buckets on the first sample of a new day
    pub clear_on_new_day: bool,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            bucket_minutes: 5,
            clear_on_new_day: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    pub width: usize,
    pub height: usize,
    /// Directory for chart.ppm / labels.json; log-only when absent
    pub output_dir: Option<PathBuf>,
}

/// Where rendered frames go
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SinkChoice {
    Files(PathBuf),
    Log,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            width: 288,
            height: 40,
            output_dir: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    pub location: LocationConfig,
    pub source: SourceConfig,
    pub schedule: ScheduleConfig,
    pub history: HistoryConfig,
    pub display: DisplayConfig,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid TOML: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

impl AppConfig {
    /// Load configuration from WXBAR_CONFIG path (TOML) if present, then apply
    /// environment overrides and validate
    pub fn load() -> Result<Self, ConfigError> {
        let path = std::env::var("WXBAR_CONFIG").unwrap_or_else(|_| "wxbar.toml".to_string());
        let mut cfg = Self::from_file(Path::new(&path))?;
        cfg.apply_env_overrides()?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Parse a TOML file; a missing file yields the defaults
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(AppConfig::default());
        }
        let s = fs::read_to_string(path)?;
        Ok(toml::from_str::<AppConfig>(&s)?)
    }

    /// OWM_API_KEY and WXBAR_POLL_INTERVAL take precedence over the file
    pub fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        if let Ok(key) = std::env::var("OWM_API_KEY") {
            if !key.trim().is_empty() {
                self.source.api_key = Some(key.trim().to_string());
            }
        }
        if let Ok(interval) = std::env::var("WXBAR_POLL_INTERVAL") {
            self.schedule.poll_interval_secs = interval
                .parse()
                .map_err(|_| ConfigError::Invalid(format!("WXBAR_POLL_INTERVAL={interval}")))?;
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.schedule.poll_interval_secs == 0 {
            return Err(ConfigError::Invalid("poll_interval_secs must be > 0".into()));
        }
        if self.source.timeout_secs == 0 {
            return Err(ConfigError::Invalid("timeout_secs must be > 0".into()));
        }
        let bucket = self.history.bucket_minutes;
        if bucket == 0 || MINUTES_PER_DAY % bucket != 0 {
            return Err(ConfigError::Invalid(format!(
                "bucket_minutes={bucket} does not divide a day"
            )));
        }
        if self.source.driver == SourceDriver::OpenWeather && self.api_key().is_none() {
            return Err(ConfigError::Invalid(
                "openweather driver needs source.api_key or OWM_API_KEY".into(),
            ));
        }
        self.zone()?;
        Ok(())
    }

    pub fn location(&self) -> Location {
        Location::new(self.location.lat, self.location.lon)
    }

    pub fn zone(&self) -> Result<Zone, ConfigError> {
        match &self.location.timezone {
            None => Ok(Zone::System),
            Some(name) => name
                .parse()
                .map(Zone::Named)
                .map_err(|e| ConfigError::Invalid(format!("timezone {name}: {e}"))),
        }
    }

    pub fn api_key(&self) -> Option<&str> {
        self.source.api_key.as_deref().filter(|k| !k.is_empty())
    }

    pub fn day_rollover(&self) -> DayRollover {
        if self.history.clear_on_new_day {
            DayRollover::Clear
        } else {
            DayRollover::Keep
        }
    }

    pub fn sink(&self) -> SinkChoice {
        match &self.display.output_dir {
            Some(dir) => SinkChoice::Files(dir.clone()),
            None => SinkChoice::Log,
        }
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.schedule.poll_interval_secs)
    }

    pub fn source_timeout(&self) -> Duration {
        Duration::from_secs(self.source.timeout_secs)
    }
}
