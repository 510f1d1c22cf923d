use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::errors::CoreError;

use super::metrics::TimeRange;

/// Longest window the backend is asked for, in days.
pub const MAX_QUERY_DAYS: i64 = 366;

/// Which days to fetch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QueryWindow {
    /// The trailing `n` days, ending today (server time).
    Days(u32),

    /// An explicit inclusive date range.
    Between { from: NaiveDate, to: NaiveDate },
}

/// Request for daily metric rows aggregated over a set of locations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetricsQuery {
    pub location_ids: Vec<String>,
    pub window: QueryWindow,
}

impl MetricsQuery {
    pub fn new(location_ids: Vec<String>, window: QueryWindow) -> Self {
        Self {
            location_ids,
            window,
        }
    }

    /// Trailing-window query for one of the chart's range presets.
    pub fn for_range(location_ids: Vec<String>, range: TimeRange) -> Self {
        Self::new(location_ids, QueryWindow::Days(range.days()))
    }

    pub fn validate(&self) -> Result<(), CoreError> {
        if self.location_ids.iter().all(|id| id.trim().is_empty()) {
            return Err(CoreError::ValidationError(
                "At least one location must be selected".into(),
            ));
        }

        match &self.window {
            QueryWindow::Days(0) => Err(CoreError::ValidationError(
                "Day count must be at least 1".into(),
            )),
            QueryWindow::Days(days) if i64::from(*days) > MAX_QUERY_DAYS => {
                Err(CoreError::ValidationError(format!(
                    "Window of {days} days exceeds maximum of {MAX_QUERY_DAYS} days"
                )))
            }
            QueryWindow::Days(_) => Ok(()),
            QueryWindow::Between { from, to } => {
                if from > to {
                    return Err(CoreError::ValidationError(format!(
                        "'from' date ({from}) must not be after 'to' date ({to})"
                    )));
                }
                let range_days = (*to - *from).num_days() + 1;
                if range_days > MAX_QUERY_DAYS {
                    return Err(CoreError::ValidationError(format!(
                        "Window of {range_days} days exceeds maximum of {MAX_QUERY_DAYS} days"
                    )));
                }
                Ok(())
            }
        }
    }
}
