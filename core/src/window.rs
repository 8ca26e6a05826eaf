//! Date-window filtering of fixtures relative to "today".

use crate::fixture::Fixture;
use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

pub const RECENT_WINDOW_DAYS: i64 = 14;
pub const MONTH_WINDOW_DAYS: i64 = 30;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DateWindow {
    /// Two weeks either side of today.
    #[default]
    RecentAndUpcoming,
    LastMonth,
    NextMonth,
    All,
}

impl DateWindow {
    /// Inclusive bounds, or None for no filtering.
    pub fn bounds(&self, today: NaiveDate) -> Option<(NaiveDate, NaiveDate)> {
        let recent = Duration::days(RECENT_WINDOW_DAYS);
        let month = Duration::days(MONTH_WINDOW_DAYS);
        match self {
            Self::RecentAndUpcoming => Some((today - recent, today + recent)),
            Self::LastMonth         => Some((today - month, today)),
            Self::NextMonth         => Some((today, today + month)),
            Self::All               => None,
        }
    }

    pub fn contains(&self, today: NaiveDate, date: NaiveDate) -> bool {
        match self.bounds(today) {
            Some((start, end)) => start <= date && date <= end,
            None => true,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::RecentAndUpcoming => "recent and upcoming",
            Self::LastMonth         => "last month",
            Self::NextMonth         => "next month",
            Self::All               => "all",
        }
    }
}

/// Fixtures inside the window, ascending by date (stable on input order).
/// An empty result just means nothing falls in the window.
pub fn filter<'a>(
    fixtures: impl IntoIterator<Item = &'a Fixture>,
    today: NaiveDate,
    window: DateWindow,
) -> Vec<&'a Fixture> {
    let mut kept: Vec<&Fixture> = fixtures
        .into_iter()
        .filter(|f| window.contains(today, f.date()))
        .collect();
    kept.sort_by_key(|f| f.date());
    kept
}
