use crate::models::metrics::{Category, CategorySelection, MetricType, TimeRange, ViewMode};
use crate::models::preferences::{ChartPreferences, PartialPreferences};
use crate::storage::traits::QueryParams;

pub const PARAM_METRIC: &str = "metric";
pub const PARAM_CATEGORIES: &str = "categories";
pub const PARAM_VIEW: &str = "view";
pub const PARAM_RANGE: &str = "range";

/// Write all four chart parameters.
///
/// Categories are written comma-separated in canonical order.
pub fn encode(prefs: &ChartPreferences, params: &mut dyn QueryParams) {
    params.set(PARAM_METRIC, prefs.metric.as_str());
    params.set(PARAM_CATEGORIES, &encode_categories(&prefs.categories));
    params.set(PARAM_VIEW, prefs.view.as_str());
    params.set(PARAM_RANGE, prefs.range.as_str());
}

/// Remove all four chart parameters, leaving any others in place.
pub fn clear(params: &mut dyn QueryParams) {
    for name in [PARAM_METRIC, PARAM_CATEGORIES, PARAM_VIEW, PARAM_RANGE] {
        params.remove(name);
    }
}

/// Read whichever chart parameters are present and valid.
///
/// Each field decodes independently; anything missing or unrecognised
/// comes back as `None` so the caller can fall back to another source.
pub fn decode(params: &dyn QueryParams) -> PartialPreferences {
    PartialPreferences {
        metric: params
            .get(PARAM_METRIC)
            .and_then(|v| v.parse::<MetricType>().ok()),
        categories: params
            .get(PARAM_CATEGORIES)
            .and_then(|v| decode_categories(&v)),
        view: params
            .get(PARAM_VIEW)
            .and_then(|v| v.parse::<ViewMode>().ok()),
        range: params
            .get(PARAM_RANGE)
            .and_then(|v| v.parse::<TimeRange>().ok()),
    }
}

pub fn encode_categories(selection: &CategorySelection) -> String {
    selection
        .iter()
        .map(|c| c.as_str())
        .collect::<Vec<_>>()
        .join(",")
}

/// Parse a comma-separated category list, skipping unknown names and
/// duplicates. `None` if no known category remains.
pub fn decode_categories(value: &str) -> Option<CategorySelection> {
    let categories = value
        .split(',')
        .filter_map(|name| name.parse::<Category>().ok());
    CategorySelection::new(categories).ok()
}
