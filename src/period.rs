// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Budget period resolution.
//!
//! A budget either pins an explicit `[start, end]` window or follows the
//! period containing the reference instant. All times are local wall-clock
//! times; the caller supplies `now` so resolution stays deterministic.

use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Recurring cadence of a budget.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PeriodKind {
    Weekly,
    #[default]
    Monthly,
    Quarterly,
    Yearly,
}

impl PeriodKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Weekly => "weekly",
            Self::Monthly => "monthly",
            Self::Quarterly => "quarterly",
            Self::Yearly => "yearly",
        }
    }

    pub fn all() -> &'static [PeriodKind] {
        &[Self::Weekly, Self::Monthly, Self::Quarterly, Self::Yearly]
    }

    /// Parse a stored or user supplied label.
    ///
    /// Unknown labels resolve to [`PeriodKind::Monthly`]: a label we do not
    /// recognise means the data was written by a different version, and the
    /// budget should still be evaluated.
    pub fn from_label(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "weekly" => Self::Weekly,
            "monthly" => Self::Monthly,
            "quarterly" => Self::Quarterly,
            "yearly" => Self::Yearly,
            other => {
                tracing::warn!(period = other, "unknown budget period, using monthly");
                Self::Monthly
            }
        }
    }
}

impl fmt::Display for PeriodKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for PeriodKind {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Option::<String>::deserialize(deserializer)?;
        Ok(raw.map(|s| Self::from_label(&s)).unwrap_or_default())
    }
}

/// Inclusive interval of local instants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Interval {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

impl Interval {
    pub fn contains(&self, t: NaiveDateTime) -> bool {
        self.start <= t && t <= self.end
    }
}

pub fn start_of_day(d: NaiveDate) -> NaiveDateTime {
    d.and_time(NaiveTime::MIN)
}

/// 23:59:59.999 on `d`.
pub fn end_of_day(d: NaiveDate) -> NaiveDateTime {
    start_of_day(d) + Duration::days(1) - Duration::milliseconds(1)
}

/// Resolve the window a budget is evaluated over.
///
/// When both explicit bounds are present they win, with the end widened to
/// cover its whole day. Otherwise the window is the `period` containing `now`.
pub fn resolve_period(
    period: PeriodKind,
    explicit_start: Option<NaiveDateTime>,
    explicit_end: Option<NaiveDateTime>,
    now: NaiveDateTime,
) -> Interval {
    if let (Some(start), Some(end)) = (explicit_start, explicit_end) {
        return Interval {
            start,
            end: end_of_day(end.date()),
        };
    }
    current_period(period, now.date())
}

/// The `period` that contains `today`, from 00:00 on its first day to
/// end-of-day on its last.
pub fn current_period(period: PeriodKind, today: NaiveDate) -> Interval {
    let (first, last) = match period {
        PeriodKind::Weekly => (week_start(today), week_start(today) + Duration::days(6)),
        PeriodKind::Monthly => (month_start(today), month_end(today)),
        PeriodKind::Quarterly => (quarter_start(today), quarter_end(today)),
        PeriodKind::Yearly => (year_start(today), year_end(today)),
    };
    Interval {
        start: start_of_day(first),
        end: end_of_day(last),
    }
}

// Weeks run Monday..=Sunday, so a Sunday closes its week.
fn week_start(date: NaiveDate) -> NaiveDate {
    let days_from_monday = date.weekday().num_days_from_monday();
    date - Duration::days(days_from_monday as i64)
}

fn month_start(date: NaiveDate) -> NaiveDate {
    date - Duration::days(date.day0() as i64)
}

fn month_end(date: NaiveDate) -> NaiveDate {
    let next_month = month_start(month_start(date) + Duration::days(31));
    next_month - Duration::days(1)
}

fn quarter_start(date: NaiveDate) -> NaiveDate {
    let mut start = month_start(date);
    for _ in 0..(date.month0() % 3) {
        start = month_start(start - Duration::days(1));
    }
    start
}

fn quarter_end(date: NaiveDate) -> NaiveDate {
    let mut end = month_end(date);
    for _ in 0..(2 - date.month0() % 3) {
        end = month_end(end + Duration::days(1));
    }
    end
}

fn year_start(date: NaiveDate) -> NaiveDate {
    date - Duration::days(date.ordinal0() as i64)
}

fn year_end(date: NaiveDate) -> NaiveDate {
    year_start(year_start(date) + Duration::days(366)) - Duration::days(1)
}
