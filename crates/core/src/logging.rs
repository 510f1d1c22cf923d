use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Console logging setup for native shells and tests.
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// `EnvFilter` directive, e.g. `info` or `drivethru_analytics_core=debug`
    pub log_level: String,
    /// Emit one JSON object per line instead of human-readable text
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            json: false,
        }
    }
}

impl LoggingConfig {
    pub fn from_env() -> Self {
        Self {
            log_level: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            json: std::env::var("LOG_FORMAT")
                .map(|v| v.eq_ignore_ascii_case("json"))
                .unwrap_or(false),
        }
    }
}

/// Install the global subscriber.
///
/// Returns `false` if one was already installed (e.g. by the host
/// application or another test), which is not treated as an error.
pub fn init_logging(config: LoggingConfig) -> bool {
    let filter = tracing_subscriber::EnvFilter::try_new(&config.log_level)
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    let registry = tracing_subscriber::registry().with(filter);
    let result = if config.json {
        registry.with(tracing_subscriber::fmt::layer().json()).try_init()
    } else {
        registry.with(tracing_subscriber::fmt::layer()).try_init()
    };

    match result {
        Ok(()) => {
            tracing::info!(level = %config.log_level, "logging initialized");
            true
        }
        Err(_) => false,
    }
}
