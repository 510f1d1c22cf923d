use serde::{Deserialize, Serialize};

use super::metrics::{CategorySelection, MetricType, TimeRange, ViewMode};
use crate::errors::CoreError;

/// The chart configuration a user can share via link or get back on a
/// repeat visit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChartPreferences {
    pub metric: MetricType,
    pub categories: CategorySelection,
    pub view: ViewMode,
    pub range: TimeRange,
}

impl ChartPreferences {
    /// Defaults: revenue, all categories, individual view, 30 days
    /// (7 days on narrow viewports).
    pub fn defaults_for(narrow_viewport: bool) -> Self {
        Self {
            metric: MetricType::Revenue,
            categories: CategorySelection::all(),
            view: ViewMode::Individual,
            range: if narrow_viewport {
                TimeRange::Last7Days
            } else {
                TimeRange::Last30Days
            },
        }
    }

    /// The view mode the renderer should use.
    pub fn effective_view(&self) -> ViewMode {
        self.view.effective_for(self.metric)
    }
}

impl Default for ChartPreferences {
    fn default() -> Self {
        Self::defaults_for(false)
    }
}

/// Preferences recovered from one source (URL or persisted store), where
/// any field may be missing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PartialPreferences {
    pub metric: Option<MetricType>,
    pub categories: Option<CategorySelection>,
    pub view: Option<ViewMode>,
    pub range: Option<TimeRange>,
}

impl PartialPreferences {
    /// Parse a persisted preference object. Absent fields stay `None`;
    /// an unknown value or an empty category list fails the whole object.
    pub fn from_json(raw: &str) -> Result<Self, CoreError> {
        Ok(serde_json::from_str(raw)?)
    }

    /// Fill each missing field from `fallback`.
    pub fn or(self, fallback: PartialPreferences) -> PartialPreferences {
        PartialPreferences {
            metric: self.metric.or(fallback.metric),
            categories: self.categories.or(fallback.categories),
            view: self.view.or(fallback.view),
            range: self.range.or(fallback.range),
        }
    }

    /// Complete the preferences, taking any field still missing from `defaults`.
    pub fn resolve(self, defaults: ChartPreferences) -> ChartPreferences {
        ChartPreferences {
            metric: self.metric.unwrap_or(defaults.metric),
            categories: self.categories.unwrap_or(defaults.categories),
            view: self.view.unwrap_or(defaults.view),
            range: self.range.unwrap_or(defaults.range),
        }
    }
}

impl From<ChartPreferences> for PartialPreferences {
    fn from(prefs: ChartPreferences) -> Self {
        Self {
            metric: Some(prefs.metric),
            categories: Some(prefs.categories),
            view: Some(prefs.view),
            range: Some(prefs.range),
        }
    }
}
