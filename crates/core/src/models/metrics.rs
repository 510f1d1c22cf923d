use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use crate::errors::CoreError;

/// Offer category tracked per transaction.
///
/// Ordering is the canonical display order: upsell, upsize, add-on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    /// Converting a base item into a combo/meal
    Upsell,
    /// Increasing the size tier of an item
    Upsize,
    /// An extra topping or side
    Addon,
}

impl Category {
    pub const ALL: [Category; 3] = [Category::Upsell, Category::Upsize, Category::Addon];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Upsell => "upsell",
            Category::Upsize => "upsize",
            Category::Addon => "addon",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "upsell" => Ok(Category::Upsell),
            "upsize" => Ok(Category::Upsize),
            "addon" => Ok(Category::Addon),
            other => Err(CoreError::ValidationError(format!("Unknown category: {other}"))),
        }
    }
}

/// Which per-category field the chart projects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricType {
    Revenue,
    Opportunities,
    Offers,
    Successes,
    /// successes ÷ offers as a percentage. Never stacked.
    ConversionRate,
}

impl MetricType {
    pub const ALL: [MetricType; 5] = [
        MetricType::Revenue,
        MetricType::Opportunities,
        MetricType::Offers,
        MetricType::Successes,
        MetricType::ConversionRate,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            MetricType::Revenue => "revenue",
            MetricType::Opportunities => "opportunities",
            MetricType::Offers => "offers",
            MetricType::Successes => "successes",
            MetricType::ConversionRate => "conversion_rate",
        }
    }

    /// Whether daily values of this metric can be summed across categories.
    pub fn is_additive(&self) -> bool {
        !matches!(self, MetricType::ConversionRate)
    }
}

impl fmt::Display for MetricType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MetricType {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "revenue" => Ok(MetricType::Revenue),
            "opportunities" => Ok(MetricType::Opportunities),
            "offers" => Ok(MetricType::Offers),
            "successes" => Ok(MetricType::Successes),
            "conversion_rate" => Ok(MetricType::ConversionRate),
            other => Err(CoreError::ValidationError(format!("Unknown metric type: {other}"))),
        }
    }
}

/// How the selected category series are laid out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewMode {
    Stacked,
    Individual,
}

impl ViewMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ViewMode::Stacked => "stacked",
            ViewMode::Individual => "individual",
        }
    }

    /// The view mode actually rendered for `metric`.
    ///
    /// Percentages are not additive, so conversion rate always renders
    /// individually. This is a display-time override: the stored preference
    /// is left as the user chose it.
    pub fn effective_for(self, metric: MetricType) -> ViewMode {
        if metric.is_additive() {
            self
        } else {
            ViewMode::Individual
        }
    }
}

impl fmt::Display for ViewMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ViewMode {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "stacked" => Ok(ViewMode::Stacked),
            "individual" => Ok(ViewMode::Individual),
            other => Err(CoreError::ValidationError(format!("Unknown view mode: {other}"))),
        }
    }
}

/// Trailing window of days the chart covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TimeRange {
    #[serde(rename = "7d")]
    Last7Days,
    #[serde(rename = "30d")]
    Last30Days,
    #[serde(rename = "90d")]
    Last90Days,
}

impl TimeRange {
    pub const ALL: [TimeRange; 3] = [TimeRange::Last7Days, TimeRange::Last30Days, TimeRange::Last90Days];

    pub fn as_str(&self) -> &'static str {
        match self {
            TimeRange::Last7Days => "7d",
            TimeRange::Last30Days => "30d",
            TimeRange::Last90Days => "90d",
        }
    }

    pub fn days(&self) -> u32 {
        match self {
            TimeRange::Last7Days => 7,
            TimeRange::Last30Days => 30,
            TimeRange::Last90Days => 90,
        }
    }
}

impl fmt::Display for TimeRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TimeRange {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "7d" => Ok(TimeRange::Last7Days),
            "30d" => Ok(TimeRange::Last30Days),
            "90d" => Ok(TimeRange::Last90Days),
            other => Err(CoreError::ValidationError(format!("Unknown time range: {other}"))),
        }
    }
}

/// A non-empty set of categories to plot.
///
/// At least one category is always selected: construction from an empty
/// set and deselecting the last category both fail.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "Vec<Category>", into = "Vec<Category>")]
pub struct CategorySelection {
    categories: BTreeSet<Category>,
}

impl CategorySelection {
    /// All three categories selected.
    pub fn all() -> Self {
        Self {
            categories: Category::ALL.into_iter().collect(),
        }
    }

    pub fn single(category: Category) -> Self {
        Self {
            categories: BTreeSet::from([category]),
        }
    }

    pub fn new(categories: impl IntoIterator<Item = Category>) -> Result<Self, CoreError> {
        let categories: BTreeSet<Category> = categories.into_iter().collect();
        if categories.is_empty() {
            return Err(CoreError::ValidationError(
                "At least one category must be selected".into(),
            ));
        }
        Ok(Self { categories })
    }

    pub fn contains(&self, category: Category) -> bool {
        self.categories.contains(&category)
    }

    pub fn len(&self) -> usize {
        self.categories.len()
    }

    /// Never true: a selection is non-empty by construction.
    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    /// Selected categories in canonical order.
    pub fn iter(&self) -> impl Iterator<Item = Category> + '_ {
        self.categories.iter().copied()
    }

    /// Add or remove `category`.
    ///
    /// Removing the only selected category is rejected and leaves the
    /// selection unchanged.
    pub fn toggle(&mut self, category: Category) -> Result<(), CoreError> {
        if self.categories.contains(&category) {
            if self.categories.len() == 1 {
                return Err(CoreError::ValidationError(format!(
                    "Cannot deselect {category}: at least one category must be selected"
                )));
            }
            self.categories.remove(&category);
        } else {
            self.categories.insert(category);
        }
        Ok(())
    }
}

impl Default for CategorySelection {
    fn default() -> Self {
        Self::all()
    }
}

impl TryFrom<Vec<Category>> for CategorySelection {
    type Error = CoreError;

    fn try_from(value: Vec<Category>) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<CategorySelection> for Vec<Category> {
    fn from(value: CategorySelection) -> Self {
        value.categories.into_iter().collect()
    }
}
