use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::metrics::{Category, MetricType};

/// Aggregated counts and revenue for one category on one day.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct CategoryMetrics {
    /// Transactions where an offer was possible
    pub opportunities: f64,

    /// Opportunities the operator acted on
    pub offers: f64,

    /// Offers the customer accepted
    pub successes: f64,

    /// Revenue attributed to accepted offers
    pub revenue: f64,

    /// Server-computed successes ÷ offers percentage, when the backend sent one
    pub conversion_rate: Option<f64>,
}

impl CategoryMetrics {
    /// Project the field selected by `metric`.
    ///
    /// Conversion rate falls back to `successes / offers * 100` when the
    /// backend did not precompute it, and to 0 when there were no offers.
    pub fn value(&self, metric: MetricType) -> f64 {
        match metric {
            MetricType::Revenue => self.revenue,
            MetricType::Opportunities => self.opportunities,
            MetricType::Offers => self.offers,
            MetricType::Successes => self.successes,
            MetricType::ConversionRate => self
                .conversion_rate
                .unwrap_or_else(|| conversion_rate(self.successes, self.offers)),
        }
    }
}

/// successes ÷ offers as a percentage; 0 when there were no offers.
pub fn conversion_rate(successes: f64, offers: f64) -> f64 {
    if offers > 0.0 {
        successes / offers * 100.0
    } else {
        0.0
    }
}

/// One calendar day of aggregated metrics for the selected locations.
///
/// Only categories the backend reported are present; nothing is filled in
/// for a category the row does not mention.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "DailyMetricRowWire", into = "DailyMetricRowWire")]
pub struct DailyMetricRow {
    pub date: NaiveDate,
    pub categories: BTreeMap<Category, CategoryMetrics>,
}

impl DailyMetricRow {
    pub fn new(date: NaiveDate) -> Self {
        Self {
            date,
            categories: BTreeMap::new(),
        }
    }

    /// Builder-style helper for attaching a category's metrics.
    pub fn with_category(mut self, category: Category, metrics: CategoryMetrics) -> Self {
        self.categories.insert(category, metrics);
        self
    }

    pub fn category(&self, category: Category) -> Option<&CategoryMetrics> {
        self.categories.get(&category)
    }
}

// ── Wire format ─────────────────────────────────────────────────────
//
// The backend sends one flat object per day:
// {"date": "2024-01-01", "upsell_revenue": 10.0, "upsell_offers": 4, ...}

#[derive(Debug, Default)]
struct WireCategory {
    opportunities: Option<f64>,
    offers: Option<f64>,
    successes: Option<f64>,
    revenue: Option<f64>,
    conversion_rate: Option<f64>,
}

impl WireCategory {
    fn is_empty(&self) -> bool {
        self.opportunities.is_none()
            && self.offers.is_none()
            && self.successes.is_none()
            && self.revenue.is_none()
            && self.conversion_rate.is_none()
    }

    fn into_metrics(self) -> Option<CategoryMetrics> {
        if self.is_empty() {
            return None;
        }
        Some(CategoryMetrics {
            opportunities: self.opportunities.unwrap_or(0.0),
            offers: self.offers.unwrap_or(0.0),
            successes: self.successes.unwrap_or(0.0),
            revenue: self.revenue.unwrap_or(0.0),
            conversion_rate: self.conversion_rate,
        })
    }

    fn from_metrics(metrics: &CategoryMetrics) -> Self {
        Self {
            opportunities: Some(metrics.opportunities),
            offers: Some(metrics.offers),
            successes: Some(metrics.successes),
            revenue: Some(metrics.revenue),
            conversion_rate: metrics.conversion_rate,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct DailyMetricRowWire {
    date: NaiveDate,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    upsell_opportunities: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    upsell_offers: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    upsell_successes: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    upsell_revenue: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    upsell_conversion_rate: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    upsize_opportunities: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    upsize_offers: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    upsize_successes: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    upsize_revenue: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    upsize_conversion_rate: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    addon_opportunities: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    addon_offers: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    addon_successes: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    addon_revenue: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    addon_conversion_rate: Option<f64>,
}

impl DailyMetricRowWire {
    fn take_category(&mut self, category: Category) -> WireCategory {
        match category {
            Category::Upsell => WireCategory {
                opportunities: self.upsell_opportunities.take(),
                offers: self.upsell_offers.take(),
                successes: self.upsell_successes.take(),
                revenue: self.upsell_revenue.take(),
                conversion_rate: self.upsell_conversion_rate.take(),
            },
            Category::Upsize => WireCategory {
                opportunities: self.upsize_opportunities.take(),
                offers: self.upsize_offers.take(),
                successes: self.upsize_successes.take(),
                revenue: self.upsize_revenue.take(),
                conversion_rate: self.upsize_conversion_rate.take(),
            },
            Category::Addon => WireCategory {
                opportunities: self.addon_opportunities.take(),
                offers: self.addon_offers.take(),
                successes: self.addon_successes.take(),
                revenue: self.addon_revenue.take(),
                conversion_rate: self.addon_conversion_rate.take(),
            },
        }
    }

    fn put_category(&mut self, category: Category, wire: WireCategory) {
        match category {
            Category::Upsell => {
                self.upsell_opportunities = wire.opportunities;
                self.upsell_offers = wire.offers;
                self.upsell_successes = wire.successes;
                self.upsell_revenue = wire.revenue;
                self.upsell_conversion_rate = wire.conversion_rate;
            }
            Category::Upsize => {
                self.upsize_opportunities = wire.opportunities;
                self.upsize_offers = wire.offers;
                self.upsize_successes = wire.successes;
                self.upsize_revenue = wire.revenue;
                self.upsize_conversion_rate = wire.conversion_rate;
            }
            Category::Addon => {
                self.addon_opportunities = wire.opportunities;
                self.addon_offers = wire.offers;
                self.addon_successes = wire.successes;
                self.addon_revenue = wire.revenue;
                self.addon_conversion_rate = wire.conversion_rate;
            }
        }
    }

    fn empty(date: NaiveDate) -> Self {
        Self {
            date,
            upsell_opportunities: None,
            upsell_offers: None,
            upsell_successes: None,
            upsell_revenue: None,
            upsell_conversion_rate: None,
            upsize_opportunities: None,
            upsize_offers: None,
            upsize_successes: None,
            upsize_revenue: None,
            upsize_conversion_rate: None,
            addon_opportunities: None,
            addon_offers: None,
            addon_successes: None,
            addon_revenue: None,
            addon_conversion_rate: None,
        }
    }
}

impl From<DailyMetricRowWire> for DailyMetricRow {
    fn from(mut wire: DailyMetricRowWire) -> Self {
        let mut categories = BTreeMap::new();
        for category in Category::ALL {
            if let Some(metrics) = wire.take_category(category).into_metrics() {
                categories.insert(category, metrics);
            }
        }
        Self {
            date: wire.date,
            categories,
        }
    }
}

impl From<DailyMetricRow> for DailyMetricRowWire {
    fn from(row: DailyMetricRow) -> Self {
        let mut wire = DailyMetricRowWire::empty(row.date);
        for (category, metrics) in &row.categories {
            wire.put_category(*category, WireCategory::from_metrics(metrics));
        }
        wire
    }
}
