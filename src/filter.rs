use std::fmt;
use std::str::FromStr;

use chrono::Duration;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::PawprintError;
use crate::models::{Category, SalesLine};
use crate::store::TransactionStore;

/// Look-back window, measured from the latest date in the dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TimePeriod {
    #[serde(rename = "30D")]
    Last30Days,
    #[serde(rename = "90D")]
    Last90Days,
    #[serde(rename = "6M")]
    Last6Months,
    #[serde(rename = "1Y")]
    LastYear,
    #[default]
    #[serde(rename = "ALL")]
    AllTime,
}

impl TimePeriod {
    pub const ALL: [TimePeriod; 5] = [
        TimePeriod::Last30Days,
        TimePeriod::Last90Days,
        TimePeriod::Last6Months,
        TimePeriod::LastYear,
        TimePeriod::AllTime,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            Self::Last30Days => "30D",
            Self::Last90Days => "90D",
            Self::Last6Months => "6M",
            Self::LastYear => "1Y",
            Self::AllTime => "ALL",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Last30Days => "Last 30 Days",
            Self::Last90Days => "Last 90 Days",
            Self::Last6Months => "Last 6 Months",
            Self::LastYear => "Last Year",
            Self::AllTime => "All Time",
        }
    }

    /// Window length in days; `None` means unbounded.
    pub fn days(&self) -> Option<i64> {
        match self {
            Self::Last30Days => Some(30),
            Self::Last90Days => Some(90),
            Self::Last6Months => Some(180),
            Self::LastYear => Some(365),
            Self::AllTime => None,
        }
    }
}

impl fmt::Display for TimePeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for TimePeriod {
    type Err = PawprintError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        TimePeriod::ALL
            .iter()
            .find(|p| p.key().eq_ignore_ascii_case(s))
            .copied()
            .ok_or_else(|| PawprintError::UnknownPeriod(s.to_string()))
    }
}

/// Narrow the store to a time window and a category set.
///
/// An empty `categories` slice means every category. The returned lines keep
/// store order.
pub fn apply<'a>(store: &'a TransactionStore, period: TimePeriod, categories: &[Category]) -> Vec<&'a SalesLine> {
    let start = match (period.days(), store.max_date()) {
        (Some(days), Some(end)) => Some(end - Duration::days(days)),
        _ => None,
    };

    let filtered: Vec<&SalesLine> = store
        .lines()
        .iter()
        .filter(|l| start.map_or(true, |s| l.date >= s))
        .filter(|l| categories.is_empty() || categories.contains(&l.category))
        .collect();

    debug!(
        period = period.key(),
        categories = categories.len(),
        kept = filtered.len(),
        total = store.len(),
        "applied filters"
    );
    filtered
}
