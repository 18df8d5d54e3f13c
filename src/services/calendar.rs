//! Calendar helpers and report period navigation

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

pub const MONTH_NAMES: [&str; 12] = [
    "January", "February", "March", "April", "May", "June", "July", "August", "September",
    "October", "November", "December",
];

pub const MONTH_ABBR: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

fn is_leap_year(year: i32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}

/// Number of days in `month` (1-12) of `year`.
///
/// Takes the day before the first of the following month; years outside
/// chrono's range fall back to the Gregorian rule directly.
pub fn days_in_month(year: i32, month: u32) -> u32 {
    let (next_year, next_month) = if month >= 12 {
        (year.checked_add(1), 1)
    } else {
        (Some(year), month + 1)
    };

    let from_calendar = next_year
        .and_then(|y| NaiveDate::from_ymd_opt(y, next_month, 1))
        .and_then(|first| first.pred_opt())
        .map(|last| last.day());

    from_calendar.unwrap_or(match month {
        2 if is_leap_year(year) => 29,
        2 => 28,
        4 | 6 | 9 | 11 => 30,
        _ => 31,
    })
}

/// Full month name for a 1-based month (empty for out-of-range input)
pub fn month_name(month: u32) -> &'static str {
    month
        .checked_sub(1)
        .and_then(|i| MONTH_NAMES.get(i as usize))
        .copied()
        .unwrap_or("")
}

/// Year and 1-based month selected in a report view.
///
/// Navigation is unbounded: stepping into years without data is legal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportPeriod {
    pub year: i32,
    pub month: u32,
}

impl Default for ReportPeriod {
    fn default() -> Self {
        Self {
            year: 2026,
            month: 1,
        }
    }
}

impl ReportPeriod {
    /// Returns `None` when `month` is outside 1..=12
    pub fn new(year: i32, month: u32) -> Option<Self> {
        (1..=12).contains(&month).then_some(Self { year, month })
    }

    pub fn prev_month(self) -> Self {
        if self.month == 1 {
            Self {
                year: self.year.saturating_sub(1),
                month: 12,
            }
        } else {
            Self {
                month: self.month - 1,
                ..self
            }
        }
    }

    pub fn next_month(self) -> Self {
        if self.month == 12 {
            Self {
                year: self.year.saturating_add(1),
                month: 1,
            }
        } else {
            Self {
                month: self.month + 1,
                ..self
            }
        }
    }

    pub fn prev_year(self) -> Self {
        Self {
            year: self.year.saturating_sub(1),
            ..self
        }
    }

    pub fn next_year(self) -> Self {
        Self {
            year: self.year.saturating_add(1),
            ..self
        }
    }

    pub fn days(self) -> u32 {
        days_in_month(self.year, self.month)
    }

    /// "January 2026"
    pub fn title(self) -> String {
        format!("{} {}", month_name(self.month), self.year)
    }
}
