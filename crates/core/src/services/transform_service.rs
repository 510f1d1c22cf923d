use std::collections::BTreeMap;

use crate::models::chart::ChartDataPoint;
use crate::models::daily::DailyMetricRow;
use crate::models::metrics::{CategorySelection, MetricType};

/// Projects fetched daily rows into per-category chart series.
///
/// Pure: output depends only on the three inputs, so callers may memoize it.
pub struct TransformService;

impl TransformService {
    pub fn new() -> Self {
        Self
    }

    /// One point per row, in row order, with the `metric` value of every
    /// selected category the row reports.
    ///
    /// Categories absent from a row are left out of that point rather than
    /// zero-filled. Non-finite values are written as 0.
    pub fn transform(
        &self,
        rows: &[DailyMetricRow],
        metric: MetricType,
        selection: &CategorySelection,
    ) -> Vec<ChartDataPoint> {
        rows.iter()
            .map(|row| {
                let values: BTreeMap<_, _> = selection
                    .iter()
                    .filter_map(|category| {
                        let metrics = row.category(category)?;
                        Some((category, finite_or_zero(metrics.value(metric))))
                    })
                    .collect();

                ChartDataPoint {
                    date: row.date,
                    values,
                }
            })
            .collect()
    }
}

impl Default for TransformService {
    fn default() -> Self {
        Self::new()
    }
}

fn finite_or_zero(value: f64) -> f64 {
    if value.is_finite() {
        value
    } else {
        0.0
    }
}
