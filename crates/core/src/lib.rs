pub mod codec;
pub mod errors;
pub mod logging;
pub mod models;
pub mod providers;
pub mod services;
pub mod storage;

use models::{
    chart::ChartRenderState,
    daily::DailyMetricRow,
    metrics::{Category, CategorySelection, MetricType, TimeRange, ViewMode},
    preferences::ChartPreferences,
    query::MetricsQuery,
    settings::Settings,
    summary::CategorySummary,
};
use providers::{analytics_api::HttpMetricsProvider, traits::MetricsProvider};
use services::{
    chart_service::{ChartService, FetchState},
    preference_service::PreferenceSync,
    summary_service::SummaryService,
};
use storage::traits::{PreferenceStore, QueryParams};

use errors::CoreError;

/// Main entry point: the time-series analytics chart.
///
/// Holds the configuration, the injected URL/storage ports, the data
/// provider, the fetched rows and the current preferences. The shell calls
/// the setters on user input, `refresh` when data must be (re)fetched, and
/// `render_state` on every redraw.
#[must_use]
pub struct MetricsChart {
    settings: Settings,
    provider: Box<dyn MetricsProvider>,
    preference_sync: PreferenceSync,
    chart_service: ChartService,
    summary_service: SummaryService,
    preferences: ChartPreferences,
    location_ids: Vec<String>,
    fetch: FetchState,
    /// Bumped on every successful fetch; keys the transform memo.
    generation: u64,
}

impl std::fmt::Debug for MetricsChart {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MetricsChart")
            .field("provider", &self.provider.name())
            .field("preferences", &self.preferences)
            .field("locations", &self.location_ids.len())
            .field("generation", &self.generation)
            .finish()
    }
}

impl MetricsChart {
    /// Build a chart around an injected provider and ports.
    /// Preferences are restored from URL, then store, then defaults.
    pub fn new(
        settings: Settings,
        provider: Box<dyn MetricsProvider>,
        params: Box<dyn QueryParams>,
        store: Box<dyn PreferenceStore>,
    ) -> Self {
        let preference_sync = PreferenceSync::new(&settings, params, store);
        let preferences = preference_sync.load();
        tracing::debug!(?preferences, "chart preferences restored");

        Self {
            settings,
            provider,
            preference_sync,
            chart_service: ChartService::new(),
            summary_service: SummaryService::new(),
            preferences,
            location_ids: Vec::new(),
            fetch: FetchState::Idle,
            generation: 0,
        }
    }

    /// Build a chart that fetches from the configured analytics backend.
    pub fn with_http_provider(
        settings: Settings,
        params: Box<dyn QueryParams>,
        store: Box<dyn PreferenceStore>,
    ) -> Self {
        let provider = HttpMetricsProvider::new(&settings);
        Self::new(settings, Box::new(provider), params, store)
    }

    // ── Accessors ───────────────────────────────────────────────────

    #[must_use]
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    #[must_use]
    pub fn preferences(&self) -> &ChartPreferences {
        &self.preferences
    }

    #[must_use]
    pub fn location_ids(&self) -> &[String] {
        &self.location_ids
    }

    #[must_use]
    pub fn fetch_state(&self) -> &FetchState {
        &self.fetch
    }

    /// The URL parameters as last written.
    #[must_use]
    pub fn query_params(&self) -> &dyn QueryParams {
        self.preference_sync.params()
    }

    /// The request `refresh` would send, or `None` without locations.
    #[must_use]
    pub fn query(&self) -> Option<MetricsQuery> {
        if self.location_ids.is_empty() {
            return None;
        }
        Some(MetricsQuery::for_range(
            self.location_ids.clone(),
            self.preferences.range,
        ))
    }

    // ── Selectors ───────────────────────────────────────────────────

    pub fn set_metric(&mut self, metric: MetricType) -> Result<(), CoreError> {
        self.preferences.metric = metric;
        self.sync_preferences()
    }

    /// Add or remove one category. Removing the last one is rejected.
    pub fn toggle_category(&mut self, category: Category) -> Result<(), CoreError> {
        self.preferences.categories.toggle(category)?;
        self.sync_preferences()
    }

    pub fn set_categories(&mut self, categories: CategorySelection) -> Result<(), CoreError> {
        self.preferences.categories = categories;
        self.sync_preferences()
    }

    /// Store the view mode. Conversion rate still renders individually.
    pub fn set_view(&mut self, view: ViewMode) -> Result<(), CoreError> {
        self.preferences.view = view;
        self.sync_preferences()
    }

    /// Change the window; the loaded rows go stale until the next `refresh`.
    pub fn set_range(&mut self, range: TimeRange) -> Result<(), CoreError> {
        if self.preferences.range != range {
            self.preferences.range = range;
            self.fetch = FetchState::Idle;
        }
        self.sync_preferences()
    }

    /// Replace the location filter. Blank and duplicate ids are dropped.
    ///
    /// The loaded rows go stale until the next `refresh`. The first time a
    /// location becomes active the preferences are written to the URL.
    /// Clearing the last location removes the chart parameters from the URL,
    /// so a later load resolves from the store instead of stale values.
    pub fn set_locations(&mut self, location_ids: Vec<String>) -> Result<(), CoreError> {
        let mut normalized: Vec<String> = Vec::with_capacity(location_ids.len());
        for id in location_ids {
            let id = id.trim().to_string();
            if !id.is_empty() && !normalized.contains(&id) {
                normalized.push(id);
            }
        }

        if normalized != self.location_ids {
            if normalized.is_empty() {
                self.preference_sync.clear_url();
            }
            self.location_ids = normalized;
            self.fetch = FetchState::Idle;
        }
        self.sync_preferences()
    }

    // ── Data ────────────────────────────────────────────────────────

    /// Fetch rows for the active locations and range.
    ///
    /// Without locations this is a no-op. A failed fetch leaves the chart in
    /// the no-data state and returns the error; nothing is retried.
    pub async fn refresh(&mut self) -> Result<(), CoreError> {
        let Some(query) = self.query() else {
            self.fetch = FetchState::Idle;
            return Ok(());
        };

        self.fetch = FetchState::Loading;
        tracing::debug!(
            provider = self.provider.name(),
            locations = query.location_ids.len(),
            range = %self.preferences.range,
            "fetching daily metrics"
        );

        match self.provider.fetch_daily_metrics(&query).await {
            Ok(rows) => {
                self.generation += 1;
                self.fetch = FetchState::Loaded(rows);
                Ok(())
            }
            Err(e) => {
                tracing::warn!(provider = self.provider.name(), error = %e, "daily metrics fetch failed");
                self.fetch = FetchState::Failed(e.to_string());
                Err(e)
            }
        }
    }

    /// Mark a fetch as started by the shell itself (e.g. one driven by its
    /// own query cache), so the chart shows its loading state.
    pub fn mark_loading(&mut self) {
        self.fetch = FetchState::Loading;
    }

    /// Hand the chart rows fetched outside `refresh`.
    pub fn load_rows(&mut self, rows: Vec<DailyMetricRow>) {
        self.generation += 1;
        self.fetch = FetchState::Loaded(rows);
    }

    // ── Rendering ───────────────────────────────────────────────────

    /// What to draw now.
    pub fn render_state(&mut self) -> ChartRenderState {
        self.chart_service.render_state(
            !self.location_ids.is_empty(),
            &self.fetch,
            self.generation,
            &self.preferences,
        )
    }

    /// Per-category window figures for the selected metric; empty until
    /// rows are loaded.
    #[must_use]
    pub fn summary(&self) -> Vec<CategorySummary> {
        match &self.fetch {
            FetchState::Loaded(rows) => self.summary_service.summarize(
                rows,
                self.preferences.metric,
                &self.preferences.categories,
            ),
            _ => Vec::new(),
        }
    }

    // ── Internal ────────────────────────────────────────────────────

    fn sync_preferences(&mut self) -> Result<(), CoreError> {
        let locations_active = !self.location_ids.is_empty();
        self.preference_sync
            .update(&self.preferences, locations_active)
    }
}
