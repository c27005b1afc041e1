//! Report windows: which instants a report covers and what it compares against.
//!
//! All windows live in the configured time zone so that the resolver and the
//! day bucketing of trends agree on where a calendar day starts.

use chrono::{
    DateTime, Datelike, Days, Months, NaiveDate, NaiveDateTime, NaiveTime, Offset, TimeDelta,
    TimeZone, Utc,
};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::ledger::TransactionFilter;

/// Report granularity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportKind {
    /// Today.
    Daily,
    /// Today and the seven days before it.
    Weekly,
    /// The current calendar month.
    Monthly,
    /// The current calendar year.
    Yearly,
}

impl ReportKind {
    /// All kinds, shortest first.
    pub const ALL: [Self; 4] = [Self::Daily, Self::Weekly, Self::Monthly, Self::Yearly];

    /// Lowercase name used in callbacks and logs.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Daily => "daily",
            Self::Weekly => "weekly",
            Self::Monthly => "monthly",
            Self::Yearly => "yearly",
        }
    }
}

impl std::fmt::Display for ReportKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ReportKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| format!("unknown report kind: {s}"))
    }
}

/// How many days a window counts when turning totals into daily averages.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Averaging {
    /// Whole days between the bounds plus one. Used by regular reports.
    #[default]
    Inclusive,
    /// Whole days between the bounds. Used by the monthly summary.
    Exclusive,
}

impl Averaging {
    /// Day count of `window` under this convention, never below one.
    #[must_use]
    pub fn days(self, window: &Window) -> i64 {
        match self {
            Self::Inclusive => window.days_inclusive(),
            Self::Exclusive => window.days_exclusive(),
        }
    }
}

/// Inclusive `[start, end]` range of instants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Window {
    /// First instant covered.
    pub start: DateTime<Tz>,
    /// Last instant covered.
    pub end: DateTime<Tz>,
}

impl Window {
    /// Creates a window from its bounds.
    #[must_use]
    pub const fn new(start: DateTime<Tz>, end: DateTime<Tz>) -> Self {
        Self { start, end }
    }

    /// Window covering whole local days from `first` through `last`.
    #[must_use]
    pub fn days_between(first: NaiveDate, last: NaiveDate, tz: &Tz) -> Self {
        Self::new(start_of_day(first, tz), end_of_day(last, tz))
    }

    /// Returns true when `instant` falls inside the window.
    #[must_use]
    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        instant >= self.start.with_timezone(&Utc) && instant <= self.end.with_timezone(&Utc)
    }

    /// Length of the window.
    #[must_use]
    pub fn duration(&self) -> TimeDelta {
        self.end - self.start
    }

    /// Whole days plus one, at least one.
    #[must_use]
    pub fn days_inclusive(&self) -> i64 {
        (self.duration().num_days() + 1).max(1)
    }

    /// Whole days, at least one.
    #[must_use]
    pub fn days_exclusive(&self) -> i64 {
        self.duration().num_days().max(1)
    }

    /// The equal-length window ending one nanosecond before this one starts.
    #[must_use]
    pub fn preceding(&self) -> Self {
        Self::new(
            self.start - self.duration(),
            self.start - TimeDelta::nanoseconds(1),
        )
    }

    /// Local calendar dates the window touches, in order.
    pub fn dates(&self) -> impl Iterator<Item = NaiveDate> + use<> {
        let last = self.end.date_naive();
        self.start
            .date_naive()
            .iter_days()
            .take_while(move |date| *date <= last)
    }

    /// Storage filter selecting exactly this window.
    #[must_use]
    pub fn filter(&self) -> TransactionFilter {
        TransactionFilter::between(self.start.with_timezone(&Utc), self.end.with_timezone(&Utc))
    }
}

/// A report window together with the window it is compared against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PeriodWindows {
    /// Window being reported.
    pub current: Window,
    /// Comparison window.
    pub previous: Window,
}

impl PeriodWindows {
    /// Resolves the windows of a regular report.
    ///
    /// The previous window always has the same duration as the current one
    /// and ends right before it.
    #[must_use]
    pub fn resolve(kind: ReportKind, now: DateTime<Tz>) -> Self {
        let tz = now.timezone();
        let today = now.date_naive();

        let current = match kind {
            ReportKind::Daily => Window::days_between(today, today, &tz),
            ReportKind::Weekly => Window::days_between(today - Days::new(7), today, &tz),
            ReportKind::Monthly => {
                let first = month_start(today);
                Window::days_between(first, first + Months::new(1) - Days::new(1), &tz)
            }
            ReportKind::Yearly => {
                let first = today - Days::new(u64::from(today.ordinal0()));
                Window::days_between(first, first + Months::new(12) - Days::new(1), &tz)
            }
        };

        Self {
            current,
            previous: current.preceding(),
        }
    }

    /// Calendar month of `now` against the whole previous calendar month.
    #[must_use]
    pub fn calendar_month(now: DateTime<Tz>) -> Self {
        let tz = now.timezone();
        let first = month_start(now.date_naive());
        let previous_first = first - Months::new(1);

        Self {
            current: Window::days_between(first, first + Months::new(1) - Days::new(1), &tz),
            previous: Window::days_between(previous_first, first - Days::new(1), &tz),
        }
    }
}

const MINUTES_PER_DAY: i64 = 24 * 60;

/// Local midnight of `date`.
///
/// When midnight falls into a DST gap the day starts at the first local
/// time that exists after it.
#[must_use]
pub fn start_of_day(date: NaiveDate, tz: &Tz) -> DateTime<Tz> {
    let midnight = date.and_time(NaiveTime::MIN);
    (0..MINUTES_PER_DAY)
        .map(|minute| midnight + TimeDelta::minutes(minute))
        .find_map(|local| tz.from_local_datetime(&local).earliest())
        .unwrap_or_else(|| with_offset_before(midnight, tz))
}

/// Last nanosecond of `date` in local time.
///
/// When that instant falls into a DST gap the day ends at the last local
/// time that exists before it.
#[must_use]
pub fn end_of_day(date: NaiveDate, tz: &Tz) -> DateTime<Tz> {
    let last = date.and_time(NaiveTime::MIN) + TimeDelta::days(1) - TimeDelta::nanoseconds(1);
    (0..MINUTES_PER_DAY)
        .map(|minute| last - TimeDelta::minutes(minute))
        .find_map(|local| tz.from_local_datetime(&local).latest())
        .unwrap_or_else(|| with_offset_before(last, tz))
}

/// Reads `local` with the offset in force a day earlier. Only reached for
/// dates the zone skips entirely.
fn with_offset_before(local: NaiveDateTime, tz: &Tz) -> DateTime<Tz> {
    let offset = tz.offset_from_utc_datetime(&(local - TimeDelta::days(1))).fix();
    tz.from_utc_datetime(&(local - TimeDelta::seconds(i64::from(offset.local_minus_utc()))))
}

/// Local calendar date of a stored instant.
#[must_use]
pub fn local_date(instant: DateTime<Utc>, tz: &Tz) -> NaiveDate {
    instant.with_timezone(tz).date_naive()
}

/// Human label of a report period.
#[must_use]
pub fn period_label(kind: ReportKind, window: &Window) -> String {
    match kind {
        ReportKind::Daily => window.start.format("%d.%m.%Y").to_string(),
        ReportKind::Weekly => format!(
            "{} - {}",
            window.start.format("%d.%m.%Y"),
            window.end.format("%d.%m.%Y")
        ),
        ReportKind::Monthly => window.start.format("%B %Y").to_string(),
        ReportKind::Yearly => window.start.format("%Y").to_string(),
    }
}

fn month_start(date: NaiveDate) -> NaiveDate {
    date - Days::new(u64::from(date.day0()))
}
