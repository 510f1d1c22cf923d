use async_trait::async_trait;

use crate::errors::CoreError;
use crate::models::daily::DailyMetricRow;
use crate::models::query::MetricsQuery;

/// Source of aggregated daily metrics.
///
/// The chart only consumes already-aggregated rows; how they are produced
/// (HTTP backend, fixture file, test double) is up to the implementation.
/// Implementations do their own timeouts; the chart never retries.
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
pub trait MetricsProvider: Send + Sync {
    /// Human-readable name of this provider (for logs/errors).
    fn name(&self) -> &str;

    /// One row per day for the query's locations and window, ascending by date.
    async fn fetch_daily_metrics(
        &self,
        query: &MetricsQuery,
    ) -> Result<Vec<DailyMetricRow>, CoreError>;
}
