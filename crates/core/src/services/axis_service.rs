use crate::models::chart::{AxisDomain, ChartDataPoint};
use crate::models::metrics::{CategorySelection, MetricType, ViewMode};

/// Headroom above the highest value.
const TOP_PADDING: f64 = 1.2;

/// Headroom below the lowest value, as a fraction of the highest value.
const BOTTOM_PADDING: f64 = 0.05;

/// Narrowest span the axis is allowed to show.
const MIN_SPAN: f64 = 10.0;

/// Conversion rate axis never tops out below this.
const MIN_PERCENT_CEILING: f64 = 10.0;

const MAX_PERCENT: f64 = 100.0;

/// Computes vertical axis bounds for a transformed series.
pub struct AxisService;

impl AxisService {
    pub fn new() -> Self {
        Self
    }

    /// Padded, clamped `[min, max]` for the vertical axis.
    ///
    /// 1. Empty series → `[0, 100]`
    /// 2. Stacked (non-percentage) → max of the daily sums, min fixed at 0
    /// 3. Otherwise → max/min over every selected value on every day
    /// 4. `max × 1.2`, `min − 5% of max` floored at 0
    /// 5. Conversion rate → `[0, clamp(max, 10, 100)]`
    /// 6. Spans under 10 widen to `[0, max(10, max)]`
    ///
    /// Total: degenerate input is absorbed by the floor and default rules.
    pub fn compute_domain(
        &self,
        points: &[ChartDataPoint],
        selection: &CategorySelection,
        view: ViewMode,
        metric: MetricType,
    ) -> AxisDomain {
        if points.is_empty() {
            return AxisDomain::DEFAULT;
        }

        let (raw_min, raw_max) = match view.effective_for(metric) {
            ViewMode::Stacked => {
                let max = points
                    .iter()
                    .map(|p| p.stacked_total(selection))
                    .fold(f64::NEG_INFINITY, f64::max);
                (0.0, max)
            }
            ViewMode::Individual => {
                let mut min = f64::INFINITY;
                let mut max = f64::NEG_INFINITY;
                for value in points
                    .iter()
                    .flat_map(|p| selection.iter().filter_map(|c| p.value(c)))
                {
                    min = min.min(value);
                    max = max.max(value);
                }
                (min, max)
            }
        };

        // A series with no selected values at all plots as flat zero.
        let (raw_min, raw_max) = if raw_max.is_finite() && raw_min.is_finite() {
            (raw_min, raw_max)
        } else {
            (0.0, 0.0)
        };

        let mut max = raw_max * TOP_PADDING;
        let mut min = (raw_min - raw_max * BOTTOM_PADDING).max(0.0);

        if metric == MetricType::ConversionRate {
            min = 0.0;
            max = max.max(MIN_PERCENT_CEILING).min(MAX_PERCENT);
        }

        if max - min < MIN_SPAN {
            min = 0.0;
            max = max.max(MIN_SPAN);
        }

        AxisDomain::new(min, max)
    }
}

impl Default for AxisService {
    fn default() -> Self {
        Self::new()
    }
}
