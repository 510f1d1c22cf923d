use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::metrics::{Category, MetricType};

/// Headline figures for one category over the fetched window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategorySummary {
    pub category: Category,

    /// Metric the figures refer to
    pub metric: MetricType,

    /// Window total. For conversion rate: total successes ÷ total offers × 100
    pub total: f64,

    /// Mean daily value over the days the category was reported
    pub daily_average: f64,

    /// Day with the highest value, if the category was reported at all
    pub best_day: Option<NaiveDate>,

    /// Number of days the category appeared in
    pub days_reported: usize,
}
