use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const DEFAULT_FILTER: &str = "info,wxbar=debug";

/// Initialize logging.
/// - JSON lines by default; `WXBAR_LOG_FORMAT=pretty` for a terminal
/// - RUST_LOG respected; default to "info,wxbar=debug"
pub fn init(service_name: &str) {
    let env_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| DEFAULT_FILTER.to_string());
    let pretty = std::env::var("WXBAR_LOG_FORMAT").is_ok_and(|f| f == "pretty");

    let registry = tracing_subscriber::registry().with(EnvFilter::new(env_filter));
    if pretty {
        registry.with(tracing_subscriber::fmt::layer()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    }

    tracing::info!(service = %service_name, "Logging initialized");
}
