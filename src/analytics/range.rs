// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Calendar windows for the analytics functions.
//!
//! All windows are whole calendar months, inclusive on both ends, and always
//! finish on the last day of the month that contains the reference date.

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, Months, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TimeRange {
    #[serde(rename = "current_month")]
    CurrentMonth,
    #[serde(rename = "last_3_months")]
    Last3Months,
    #[serde(rename = "last_year")]
    LastYear,
    #[serde(rename = "lifetime")]
    Lifetime,
}

impl TimeRange {
    pub const ALL: [TimeRange; 4] = [
        TimeRange::CurrentMonth,
        TimeRange::Last3Months,
        TimeRange::LastYear,
        TimeRange::Lifetime,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TimeRange::CurrentMonth => "current_month",
            TimeRange::Last3Months => "last_3_months",
            TimeRange::LastYear => "last_year",
            TimeRange::Lifetime => "lifetime",
        }
    }

    /// Width of the window in calendar months. Lifetime has no fixed width
    /// and therefore no previous period.
    pub fn period_months(&self) -> Option<u32> {
        match self {
            TimeRange::CurrentMonth => Some(1),
            TimeRange::Last3Months => Some(3),
            TimeRange::LastYear => Some(12),
            TimeRange::Lifetime => None,
        }
    }
}

impl fmt::Display for TimeRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TimeRange {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_ascii_lowercase().replace('-', "_");
        TimeRange::ALL
            .into_iter()
            .find(|r| r.as_str() == key)
            .ok_or_else(|| Error::InvalidRange(s.trim().to_string()))
    }
}

/// Inclusive `[start, end]` span of calendar days.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DateWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateWindow {
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

/// Lower bound used for `TimeRange::Lifetime`. Proration clamps to the later of
/// this and a subscription's own start, so in practice the start date wins.
pub fn lifetime_start() -> NaiveDate {
    NaiveDate::from_ymd_opt(2000, 1, 1).unwrap_or(NaiveDate::MIN)
}

pub fn month_start(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

pub fn month_end(date: NaiveDate) -> NaiveDate {
    month_start(date)
        .checked_add_months(Months::new(1))
        .and_then(|next| next.pred_opt())
        .unwrap_or(date)
}

/// Difference in calendar months, ignoring the day of month.
/// `2024-01-31 -> 2024-02-01` is one month; `2024-03-10 -> 2024-01-20` is -2.
pub fn whole_calendar_months_between(from: NaiveDate, to: NaiveDate) -> i32 {
    (to.year() - from.year()) * 12 + to.month() as i32 - from.month() as i32
}

/// Moves `date` back by `months`, clamping the day to the target month's length.
pub fn shift_months_back(date: NaiveDate, months: u32) -> NaiveDate {
    date.checked_sub_months(Months::new(months)).unwrap_or(date)
}

pub fn resolve_window(range: TimeRange, reference: NaiveDate) -> DateWindow {
    let end = month_end(reference);
    let start = match range {
        TimeRange::CurrentMonth => month_start(reference),
        TimeRange::Last3Months => month_start(shift_months_back(reference, 2)),
        TimeRange::LastYear => month_start(shift_months_back(reference, 11)),
        TimeRange::Lifetime => lifetime_start(),
    };
    DateWindow { start, end }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn current_month_spans_the_reference_month() {
        let w = resolve_window(TimeRange::CurrentMonth, d(2024, 7, 15));
        assert_eq!(w.start, d(2024, 7, 1));
        assert_eq!(w.end, d(2024, 7, 31));
    }

    #[test]
    fn multi_month_windows_cross_year_boundaries() {
        let w = resolve_window(TimeRange::Last3Months, d(2024, 2, 10));
        assert_eq!(w.start, d(2023, 12, 1));
        assert_eq!(w.end, d(2024, 2, 29));

        let w = resolve_window(TimeRange::LastYear, d(2024, 7, 31));
        assert_eq!(w.start, d(2023, 8, 1));
        assert_eq!(w.end, d(2024, 7, 31));
    }

    #[test]
    fn lifetime_uses_sentinel_start() {
        let w = resolve_window(TimeRange::Lifetime, d(2024, 7, 15));
        assert_eq!(w.start, d(2000, 1, 1));
        assert_eq!(w.end, d(2024, 7, 31));
    }

    #[test]
    fn window_end_stays_in_reference_month() {
        let refs = [d(2023, 1, 31), d(2024, 2, 29), d(2024, 3, 31), d(2024, 12, 1)];
        for reference in refs {
            for range in TimeRange::ALL {
                let w = resolve_window(range, reference);
                assert_eq!(w.end.year(), reference.year());
                assert_eq!(w.end.month(), reference.month());
                assert!(w.contains(reference));
            }
        }
    }

    #[test]
    fn month_difference_ignores_days() {
        assert_eq!(whole_calendar_months_between(d(2024, 1, 31), d(2024, 2, 1)), 1);
        assert_eq!(whole_calendar_months_between(d(2024, 1, 1), d(2024, 1, 31)), 0);
        assert_eq!(whole_calendar_months_between(d(2023, 11, 5), d(2024, 2, 1)), 3);
        assert_eq!(whole_calendar_months_between(d(2024, 3, 10), d(2024, 1, 20)), -2);
    }

    #[test]
    fn shifting_back_clamps_day() {
        assert_eq!(shift_months_back(d(2024, 3, 31), 1), d(2024, 2, 29));
        assert_eq!(shift_months_back(d(2024, 5, 31), 3), d(2024, 2, 29));
    }

    #[test]
    fn parses_range_names() {
        assert_eq!("last-3-months".parse::<TimeRange>().unwrap(), TimeRange::Last3Months);
        assert_eq!("LIFETIME".parse::<TimeRange>().unwrap(), TimeRange::Lifetime);
        assert!("last_week".parse::<TimeRange>().is_err());
    }
}
