use crate::models::chart::{AxisDomain, ChartDataPoint, ChartRenderState};
use crate::models::daily::DailyMetricRow;
use crate::models::metrics::{CategorySelection, MetricType};
use crate::models::preferences::ChartPreferences;
use crate::services::axis_service::AxisService;
use crate::services::transform_service::TransformService;

/// Where the external fetch currently stands.
#[derive(Debug, Clone, PartialEq)]
pub enum FetchState {
    /// Nothing requested yet.
    Idle,
    /// A request is in flight.
    Loading,
    /// The last request succeeded.
    Loaded(Vec<DailyMetricRow>),
    /// The last request failed; the message is kept for logs only.
    Failed(String),
}

/// Memoized transform output, valid while its inputs are unchanged.
#[derive(Debug, Clone)]
struct CachedSeries {
    generation: u64,
    metric: MetricType,
    selection: CategorySelection,
    points: Vec<ChartDataPoint>,
}

/// Turns fetched rows and the current preferences into something drawable.
///
/// Transform output is memoized per (data generation, metric, categories),
/// so toggling the view mode or the range preset doesn't re-project rows.
pub struct ChartService {
    transform_service: TransformService,
    axis_service: AxisService,
    cache: Option<CachedSeries>,
}

impl ChartService {
    pub fn new() -> Self {
        Self {
            transform_service: TransformService::new(),
            axis_service: AxisService::new(),
            cache: None,
        }
    }

    /// Projected series for `rows`, reusing the last result when
    /// `generation`, `metric` and `selection` all match it.
    ///
    /// `generation` must change whenever the rows change.
    pub fn series(
        &mut self,
        rows: &[DailyMetricRow],
        generation: u64,
        metric: MetricType,
        selection: &CategorySelection,
    ) -> Vec<ChartDataPoint> {
        if let Some(cached) = &self.cache {
            if cached.generation == generation
                && cached.metric == metric
                && &cached.selection == selection
            {
                return cached.points.clone();
            }
        }

        let points = self.transform_service.transform(rows, metric, selection);
        self.cache = Some(CachedSeries {
            generation,
            metric,
            selection: selection.clone(),
            points: points.clone(),
        });
        points
    }

    /// Series plus axis bounds for the current preferences.
    pub fn build(
        &mut self,
        rows: &[DailyMetricRow],
        generation: u64,
        prefs: &ChartPreferences,
    ) -> (Vec<ChartDataPoint>, AxisDomain) {
        let points = self.series(rows, generation, prefs.metric, &prefs.categories);
        let domain = self.axis_service.compute_domain(
            &points,
            &prefs.categories,
            prefs.view,
            prefs.metric,
        );
        (points, domain)
    }

    /// Pick the render state: no locations, loading, no data, or ready.
    pub fn render_state(
        &mut self,
        locations_active: bool,
        fetch: &FetchState,
        generation: u64,
        prefs: &ChartPreferences,
    ) -> ChartRenderState {
        if !locations_active {
            return ChartRenderState::NoLocationsSelected;
        }

        match fetch {
            // Locations were just picked; the request is about to go out.
            FetchState::Idle | FetchState::Loading => ChartRenderState::Loading,
            FetchState::Failed(_) => ChartRenderState::NoData,
            FetchState::Loaded(rows) if rows.is_empty() => ChartRenderState::NoData,
            FetchState::Loaded(rows) => {
                let (points, domain) = self.build(rows, generation, prefs);
                ChartRenderState::Ready {
                    points,
                    domain,
                    view: prefs.effective_view(),
                }
            }
        }
    }

    /// Drop the memoized series.
    pub fn invalidate(&mut self) {
        self.cache = None;
    }
}

impl Default for ChartService {
    fn default() -> Self {
        Self::new()
    }
}
