use serde::{Deserialize, Serialize};

/// Default analytics backend (local Flask dev server).
pub const DEFAULT_API_BASE_URL: &str = "http://localhost:5000";

/// Storage key under which chart preferences are persisted.
pub const DEFAULT_PREFERENCES_KEY: &str = "drivethru.chart.preferences";

pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Client configuration passed into the chart at construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Base URL of the analytics API, without a trailing slash.
    pub api_base_url: String,

    /// Optional bearer token sent with every request.
    pub api_token: Option<String>,

    /// Per-request timeout (ignored on WASM, where the browser owns it).
    pub request_timeout_secs: u64,

    /// Key of the serialized preferences object in the persisted store.
    pub preferences_storage_key: String,

    /// Narrow screens default to a 7-day window.
    pub narrow_viewport: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            api_token: None,
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            preferences_storage_key: DEFAULT_PREFERENCES_KEY.to_string(),
            narrow_viewport: false,
        }
    }
}

impl Settings {
    /// Defaults overridden by `DRIVETHRU_*` environment variables.
    ///
    /// Unparsable values keep their default.
    pub fn from_env() -> Self {
        let mut settings = Self::default();

        if let Ok(url) = std::env::var("DRIVETHRU_API_URL") {
            if !url.trim().is_empty() {
                settings.api_base_url = url.trim().trim_end_matches('/').to_string();
            }
        }
        if let Ok(token) = std::env::var("DRIVETHRU_API_TOKEN") {
            if !token.trim().is_empty() {
                settings.api_token = Some(token.trim().to_string());
            }
        }
        if let Ok(timeout) = std::env::var("DRIVETHRU_API_TIMEOUT_SECS") {
            match timeout.trim().parse::<u64>() {
                Ok(secs) if secs > 0 => settings.request_timeout_secs = secs,
                _ => tracing::warn!(value = %timeout, "ignoring invalid DRIVETHRU_API_TIMEOUT_SECS"),
            }
        }
        if let Ok(key) = std::env::var("DRIVETHRU_PREFERENCES_KEY") {
            if !key.trim().is_empty() {
                settings.preferences_storage_key = key.trim().to_string();
            }
        }

        settings
    }

    /// Builder-style override for the narrow-viewport flag.
    pub fn with_narrow_viewport(mut self, narrow: bool) -> Self {
        self.narrow_viewport = narrow;
        self
    }
}
