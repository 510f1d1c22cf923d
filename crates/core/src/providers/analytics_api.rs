use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
#[cfg(not(target_arch = "wasm32"))]
use std::time::Duration;
use url::Url;

use crate::errors::CoreError;
use crate::models::daily::DailyMetricRow;
use crate::models::query::{MetricsQuery, QueryWindow};
use crate::models::settings::Settings;
use super::traits::MetricsProvider;

const PROVIDER_NAME: &str = "Analytics API";

/// Path of the daily metrics endpoint, relative to the API base URL.
pub const DAILY_METRICS_PATH: &str = "/api/analytics/daily-metrics";

/// Client for the dashboard's analytics backend.
///
/// - **Endpoint**: `GET /api/analytics/daily-metrics`
/// - **Query**: `location_ids=a,b` plus `days=N` or `start_date`/`end_date`
/// - **Auth**: optional bearer token from [`Settings::api_token`]
/// - **Response**: `{"data": [ {"date": "...", "upsell_revenue": ...}, ... ]}`
pub struct HttpMetricsProvider {
    client: Client,
    base_url: String,
    api_token: Option<String>,
}

impl HttpMetricsProvider {
    pub fn new(settings: &Settings) -> Self {
        let builder = Client::builder();
        #[cfg(not(target_arch = "wasm32"))]
        let builder = builder.timeout(Duration::from_secs(settings.request_timeout_secs));
        Self {
            client: builder.build().unwrap_or_else(|_| Client::new()),
            base_url: settings.api_base_url.trim_end_matches('/').to_string(),
            api_token: settings.api_token.clone(),
        }
    }

    /// Full request URL for `query`, with parameters percent-encoded.
    pub fn request_url(&self, query: &MetricsQuery) -> Result<Url, CoreError> {
        let mut url = Url::parse(&format!("{}{DAILY_METRICS_PATH}", self.base_url))
            .map_err(|e| CoreError::ValidationError(format!("Invalid API base URL {}: {e}", self.base_url)))?;

        {
            let ids: Vec<&str> = query
                .location_ids
                .iter()
                .map(|id| id.trim())
                .filter(|id| !id.is_empty())
                .collect();

            let mut pairs = url.query_pairs_mut();
            pairs.append_pair("location_ids", &ids.join(","));
            match &query.window {
                QueryWindow::Days(days) => {
                    pairs.append_pair("days", &days.to_string());
                }
                QueryWindow::Between { from, to } => {
                    pairs.append_pair("start_date", &from.format("%Y-%m-%d").to_string());
                    pairs.append_pair("end_date", &to.format("%Y-%m-%d").to_string());
                }
            }
        }

        Ok(url)
    }
}

// ── Analytics API response types ────────────────────────────────────

#[derive(Deserialize)]
struct DailyMetricsResponse {
    data: Vec<DailyMetricRow>,
}

/// Decode a response body into rows sorted ascending by date.
pub fn parse_daily_metrics(body: &str) -> Result<Vec<DailyMetricRow>, CoreError> {
    let resp: DailyMetricsResponse = serde_json::from_str(body).map_err(|e| CoreError::Api {
        provider: PROVIDER_NAME.into(),
        message: format!("Failed to parse daily metrics: {e}"),
    })?;

    let mut rows = resp.data;
    rows.sort_by_key(|r| r.date);
    Ok(rows)
}

#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
impl MetricsProvider for HttpMetricsProvider {
    fn name(&self) -> &str {
        PROVIDER_NAME
    }

    async fn fetch_daily_metrics(
        &self,
        query: &MetricsQuery,
    ) -> Result<Vec<DailyMetricRow>, CoreError> {
        query.validate()?;
        let url = self.request_url(query)?;

        let mut request = self.client.get(url);
        if let Some(token) = &self.api_token {
            request = request.bearer_auth(token);
        }

        let resp = request.send().await?;
        let status = resp.status();
        let body = resp.text().await?;

        if !status.is_success() {
            return Err(CoreError::Api {
                provider: PROVIDER_NAME.into(),
                message: format!("HTTP {status}: {}", body.chars().take(200).collect::<String>()),
            });
        }

        let rows = parse_daily_metrics(&body)?;
        tracing::debug!(
            locations = query.location_ids.len(),
            rows = rows.len(),
            "fetched daily metrics"
        );
        Ok(rows)
    }
}
