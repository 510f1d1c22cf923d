use chrono::NaiveDate;

use crate::models::daily::{conversion_rate, DailyMetricRow};
use crate::models::metrics::{Category, CategorySelection, MetricType};
use crate::models::summary::CategorySummary;

/// Window totals shown next to the chart.
pub struct SummaryService;

impl SummaryService {
    pub fn new() -> Self {
        Self
    }

    /// One summary per selected category, in canonical order.
    ///
    /// Counts and revenue are summed over the window. Conversion rate is
    /// recomputed from summed successes and offers instead of adding up
    /// daily percentages.
    pub fn summarize(
        &self,
        rows: &[DailyMetricRow],
        metric: MetricType,
        selection: &CategorySelection,
    ) -> Vec<CategorySummary> {
        selection
            .iter()
            .map(|category| self.summarize_category(rows, metric, category))
            .collect()
    }

    fn summarize_category(
        &self,
        rows: &[DailyMetricRow],
        metric: MetricType,
        category: Category,
    ) -> CategorySummary {
        let mut sum = 0.0;
        let mut successes = 0.0;
        let mut offers = 0.0;
        let mut days_reported = 0usize;
        let mut best: Option<(NaiveDate, f64)> = None;

        for row in rows {
            let Some(metrics) = row.category(category) else {
                continue;
            };
            let value = metrics.value(metric);
            if !value.is_finite() {
                continue;
            }

            days_reported += 1;
            sum += value;
            successes += metrics.successes;
            offers += metrics.offers;

            // Earliest date wins a tie.
            if best.map_or(true, |(_, top)| value > top) {
                best = Some((row.date, value));
            }
        }

        let daily_average = if days_reported > 0 {
            sum / days_reported as f64
        } else {
            0.0
        };

        let total = match metric {
            MetricType::ConversionRate => conversion_rate(successes, offers),
            MetricType::Revenue
            | MetricType::Opportunities
            | MetricType::Offers
            | MetricType::Successes => sum,
        };

        CategorySummary {
            category,
            metric,
            total,
            daily_average,
            best_day: best.map(|(date, _)| date),
            days_reported,
        }
    }
}

impl Default for SummaryService {
    fn default() -> Self {
        Self::new()
    }
}
