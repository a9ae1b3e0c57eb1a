//! wxbar daemon - weather polling and bar-chart display
//!
//! This binary coordinates:
//! - Weather source polling (OpenWeatherMap or simulator)
//! - The 24-hour pressure/rain history
//! - Rendering frames and handing them to the display sink

mod scheduler;

use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::sync::Mutex;
use tracing::{error, info};

use wxbar_config::{AppConfig, SinkChoice, SourceDriver};
use wxbar_core::{DisplaySink, History};
use wxbar_ingest::{OpenWeatherSource, SampleIngestor, SimulatorSource, WeatherSource};
use wxbar_sinks::{FsSink, LogSink};

use crate::scheduler::Scheduler;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    wxbar_obs::init("wxbard");

    info!("Starting wxbar daemon");

    // Load configuration
    let config = AppConfig::load().context("Failed to load configuration")?;
    info!(
        "Location: {}, {} ({})",
        config.location.lat,
        config.location.lon,
        config.location.timezone.as_deref().unwrap_or("host local time")
    );

    // Create shared history
    let history = History::with_bucket_minutes(config.history.bucket_minutes)?
        .with_day_rollover(config.day_rollover());
    let history = Arc::new(Mutex::new(history));

    // Initialize weather source
    let source = build_source(&config)?;
    info!("Weather source: {}", source.name());

    let ingestor = SampleIngestor::new(
        source,
        config.location(),
        config.zone()?,
        config.source_timeout(),
    );

    // Create display sink
    let sink: Box<dyn DisplaySink> = match config.sink() {
        SinkChoice::Files(dir) => {
            info!("Display output: {}", dir.display());
            Box::new(
                FsSink::new(&dir)
                    .with_context(|| format!("Failed to prepare display dir {}", dir.display()))?,
            )
        }
        SinkChoice::Log => {
            info!("Display output: log only (display.output_dir not set)");
            Box::new(LogSink)
        }
    };

    // Create scheduler
    let mut scheduler = Scheduler::new(
        ingestor,
        history,
        sink,
        (config.display.width, config.display.height),
        config.poll_interval(),
    );

    // Setup signal handler for graceful shutdown
    let shutdown = setup_shutdown_handler();

    info!("Daemon running - press Ctrl+C to stop");

    // Run until the scheduler fails or a shutdown signal arrives
    tokio::select! {
        result = scheduler.run() => {
            if let Err(e) = result {
                error!("Scheduler error: {}", e);
                return Err(e);
            }
        }
        _ = shutdown => {
            info!("Shutdown signal received");
        }
    }

    info!("wxbar daemon stopped");
    Ok(())
}

fn build_source(config: &AppConfig) -> Result<Box<dyn WeatherSource>> {
    match config.source.driver {
        SourceDriver::OpenWeather => {
            let key = config
                .api_key()
                .context("OpenWeather API key not configured")?;
            let source = OpenWeatherSource::new(key.to_string(), config.source_timeout())?;
            Ok(Box::new(source))
        }
        SourceDriver::Simulator => Ok(Box::new(SimulatorSource::new())),
    }
}

/// Resolves on Ctrl+C; never resolves if the handler cannot be installed
async fn setup_shutdown_handler() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
}
