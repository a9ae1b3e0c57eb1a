//! OpenWeatherMap source (2.5 `weather` and `forecast` endpoints)

use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;
use wxbar_core::{ForecastPoint, Location, Observation};

use crate::{IngestError, IngestResult, WeatherSource};

pub const OPENWEATHER_BASE_URL: &str = "https://api.openweathermap.org/data/2.5";

#[derive(Debug, Deserialize)]
struct CurrentResponse {
    dt: i64,
    main: MainBlock,
}

#[derive(Debug, Deserialize)]
struct MainBlock {
    temp: f64,
    pressure: f64,
}

#[derive(Debug, Deserialize)]
struct ForecastResponse {
    list: Vec<ForecastItem>,
}

#[derive(Debug, Deserialize)]
struct ForecastItem {
    dt: i64,
    #[serde(default)]
    rain: Option<RainBlock>,
}

#[derive(Debug, Deserialize)]
struct RainBlock {
    #[serde(rename = "3h")]
    three_hour: Option<f64>,
}

fn timestamp(epoch: i64) -> IngestResult<DateTime<Utc>> {
    DateTime::from_timestamp(epoch, 0).ok_or(IngestError::ClockSkew(epoch))
}

/// Parse a `/weather` response body
pub fn parse_current(body: &str) -> IngestResult<Observation> {
    let response: CurrentResponse =
        serde_json::from_str(body).map_err(|e| IngestError::MalformedPayload(e.to_string()))?;

    if !response.main.temp.is_finite() || !response.main.pressure.is_finite() {
        return Err(IngestError::MalformedPayload(
            "non-finite temperature or pressure".to_string(),
        ));
    }

    Ok(Observation {
        timestamp: timestamp(response.dt)?,
        temperature_c: response.main.temp,
        pressure_hpa: response.main.pressure as i32,
    })
}

/// Parse a `/forecast` response body, keeping only windows with rain
pub fn parse_forecast(body: &str) -> IngestResult<Vec<ForecastPoint>> {
    let response: ForecastResponse =
        serde_json::from_str(body).map_err(|e| IngestError::MalformedPayload(e.to_string()))?;

    response
        .list
        .into_iter()
        .filter_map(|item| {
            let rain_mm = item.rain.and_then(|r| r.three_hour)?;
            Some((item.dt, rain_mm))
        })
        .map(|(dt, rain_mm)| {
            Ok(ForecastPoint {
                timestamp: timestamp(dt)?,
                rain_mm,
            })
        })
        .collect()
}

/// Client for the OpenWeatherMap REST API
#[derive(Debug, Clone)]
pub struct OpenWeatherSource {
    client: Client,
    base_url: String,
    api_key: String,
}

impl OpenWeatherSource {
    pub fn new(api_key: String, request_timeout: Duration) -> IngestResult<Self> {
        if api_key.is_empty() {
            return Err(IngestError::SourceUnavailable(
                "OpenWeather API key not configured".to_string(),
            ));
        }
        let client = Client::builder()
            .timeout(request_timeout)
            .build()
            .map_err(|e| IngestError::SourceUnavailable(e.to_string()))?;
        Ok(Self {
            client,
            base_url: OPENWEATHER_BASE_URL.to_string(),
            api_key,
        })
    }

    /// Point the client at another server (tests, proxies)
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    async fn get(&self, endpoint: &str, location: Location) -> IngestResult<String> {
        let url = format!("{}/{}", self.base_url, endpoint);
        debug!(%url, lat = location.lat, lon = location.lon, "requesting");

        let resp = self
            .client
            .get(&url)
            .query(&[
                ("lat", location.lat.to_string()),
                ("lon", location.lon.to_string()),
                ("units", "metric".to_string()),
                ("appid", self.api_key.clone()),
            ])
            .send()
            .await
            .map_err(|e| IngestError::SourceUnavailable(e.to_string()))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let text = resp.text().await.unwrap_or_default();
            return Err(IngestError::SourceUnavailable(format!(
                "{} returned {} {}",
                endpoint, status, text
            )));
        }

        resp.text()
            .await
            .map_err(|e| IngestError::SourceUnavailable(e.to_string()))
    }
}

#[async_trait::async_trait]
impl WeatherSource for OpenWeatherSource {
    fn name(&self) -> &str {
        "openweather"
    }

    async fn fetch_current(&self, location: Location) -> IngestResult<Observation> {
        let body = self.get("weather", location).await?;
        parse_current(&body)
    }

    async fn fetch_forecast(&self, location: Location) -> IngestResult<Vec<ForecastPoint>> {
        let body = self.get("forecast", location).await?;
        parse_forecast(&body)
    }
}
