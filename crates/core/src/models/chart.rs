use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::metrics::{Category, CategorySelection, ViewMode};

/// A single data point for chart rendering.
///
/// The core generates these — the frontend just renders them.
/// Serializes flat: `{"date": "2024-01-01", "upsell": 10.0, "upsize": 20.0}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartDataPoint {
    /// The date for this data point
    pub date: NaiveDate,

    /// Projected metric value per selected category present on that day
    #[serde(flatten)]
    pub values: BTreeMap<Category, f64>,
}

impl ChartDataPoint {
    pub fn value(&self, category: Category) -> Option<f64> {
        self.values.get(&category).copied()
    }

    /// Sum of the selected categories' values on this day.
    pub fn stacked_total(&self, selection: &CategorySelection) -> f64 {
        selection.iter().filter_map(|c| self.value(c)).sum()
    }
}

/// Vertical axis bounds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AxisDomain {
    pub min: f64,
    pub max: f64,
}

impl AxisDomain {
    /// Used when there is nothing to plot.
    pub const DEFAULT: AxisDomain = AxisDomain { min: 0.0, max: 100.0 };

    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    pub fn span(&self) -> f64 {
        self.max - self.min
    }

    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }
}

/// What the chart widget should draw right now.
///
/// Exactly one state applies at a time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum ChartRenderState {
    /// No location filter is active; prompt the user to pick one.
    NoLocationsSelected,

    /// A fetch is in flight; show a skeleton placeholder.
    Loading,

    /// The fetch failed or returned no rows.
    NoData,

    /// Series and bounds ready for the renderer.
    Ready {
        points: Vec<ChartDataPoint>,
        domain: AxisDomain,
        /// View mode after the conversion-rate override
        view: ViewMode,
    },
}

impl ChartRenderState {
    pub fn is_ready(&self) -> bool {
        matches!(self, ChartRenderState::Ready { .. })
    }
}
