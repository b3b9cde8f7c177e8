mod consts;
mod daynum;
#[cfg(feature = "postgres")]
mod postgres;
mod zoned;

pub use consts::*;
pub use daynum::{days_in_month, is_leap_year};
pub use zoned::ConvertError;

use derive_more::Display;
use std::str::FromStr;

/// A civil (Gregorian) calendar date: a year/month/day triple with no
/// time-of-day or zone attached.
///
/// Values built through [`Date::new`] or parsing always satisfy
/// `1 <= month <= 12` and `1 <= day <= days_in_month(year, month)`.
/// Arithmetic re-normalizes through calendar rollover, so its results are
/// valid as well. The year is unbounded in both directions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Display)]
#[display(fmt = "{:04}-{:02}-{:02}", year, month, day)]
pub struct Date {
    year: i64,
    month: u8,
    day: u8,
}

/// Validation failure when constructing a [`Date`] from raw parts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum DateError {
    #[display(fmt = "month must be between 1 and 12, got {_0}")]
    MonthOutOfRange(u8),
    #[display(fmt = "day must be greater than 0, got {_0}")]
    DayNotPositive(u8),
    #[display(fmt = "day exceeds last day of month {year:04}-{month:02} ({last}), got {day}")]
    DayOutOfRange {
        year: i64,
        month: u8,
        day: u8,
        last: u8,
    },
}

impl std::error::Error for DateError {}

/// Error parsing a [`Date`] from its fixed `YYYY-MM-DD` form.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    /// Input does not match the fixed-width layout.
    #[error("invalid date format {0:?}, expected YYYY-MM-DD")]
    InvalidFormat(String),

    /// Well-formed input naming a date that does not exist.
    #[error(transparent)]
    InvalidDate(#[from] DateError),
}

impl Date {
    /// Creates a date, validating month and day against the calendar.
    ///
    /// # Errors
    /// Returns a [`DateError`] if the month is outside `1..=12`, the day is
    /// zero, or the day exceeds the last day of that month.
    pub fn new(year: i64, month: u8, day: u8) -> Result<Self, DateError> {
        if !(MIN_MONTH..=MAX_MONTH).contains(&month) {
            return Err(DateError::MonthOutOfRange(month));
        }
        if day < MIN_DAY {
            return Err(DateError::DayNotPositive(day));
        }
        let last = days_in_month(year, month);
        if day > last {
            return Err(DateError::DayOutOfRange {
                year,
                month,
                day,
                last,
            });
        }
        Ok(Self { year, month, day })
    }

    /// Raw constructor for callers that have already normalized the triple.
    pub(crate) const fn from_ymd_unchecked(year: i64, month: u8, day: u8) -> Self {
        Self { year, month, day }
    }

    /// Returns the year (unbounded, may be zero or negative)
    #[inline]
    pub const fn year(self) -> i64 {
        self.year
    }

    /// Returns the month, `1..=12`
    #[inline]
    pub const fn month(self) -> u8 {
        self.month
    }

    /// Returns the day of month, `1..=31`
    #[inline]
    pub const fn day(self) -> u8 {
        self.day
    }

    /// `YYMMDD` with the century dropped from the year. Lossy.
    pub fn to_short_string(self) -> String {
        format!(
            "{:02}{:02}{:02}",
            self.year.rem_euclid(CENTURY_CYCLE),
            self.month,
            self.day
        )
    }

    /// True if `self` is strictly earlier than `other`.
    pub fn is_before(self, other: Self) -> bool {
        self < other
    }

    /// True if `self` is strictly later than `other`.
    pub fn is_after(self, other: Self) -> bool {
        self > other
    }

    /// Adds a number of days (may be negative), carrying across month and
    /// year boundaries.
    pub fn add_days(self, days: i64) -> Self {
        self.add(0, 0, days)
    }

    /// Adds a number of months (may be negative) with calendar rollover:
    /// a day past the end of the target month rolls forward into the next
    /// month rather than clamping (2004-02-29 + 12 months = 2005-03-01).
    pub fn add_months(self, months: i64) -> Self {
        self.add(0, months, 0)
    }

    /// Adds a number of years (may be negative) with calendar rollover
    /// (2004-02-29 + 1 year = 2005-03-01).
    pub fn add_years(self, years: i64) -> Self {
        self.add(years, 0, 0)
    }

    // Years and months are applied first, with month overflow carried into
    // the year; a day-of-month past the new month's length rolls forward
    // into the following month. The day delta lands on top of that
    // normalized date. The delta order (years, months, days) is observable
    // for mixed additions and pinned by tests.
    fn add(self, years: i64, months: i64, days: i64) -> Self {
        let months_total = self.year * 12 + i64::from(self.month) - 1 + years * 12 + months;
        let year = months_total.div_euclid(12);
        let month = (months_total.rem_euclid(12) + 1) as u8;
        Self::from_unix_days(daynum::unix_days_from_date(year, month, self.day) + days)
    }

    /// First day of this date's month.
    pub const fn first_of_month(self) -> Self {
        Self {
            day: MIN_DAY,
            ..self
        }
    }

    /// Last day of this date's month.
    pub const fn last_of_month(self) -> Self {
        Self {
            day: days_in_month(self.year, self.month),
            ..self
        }
    }

    /// Arithmetic twin of [`Date::first_of_month`]; identical result.
    pub fn start_of_month(self) -> Self {
        self.add(0, 0, 1 - i64::from(self.day))
    }

    /// Arithmetic twin of [`Date::last_of_month`]; identical result.
    pub fn end_of_month(self) -> Self {
        self.add(0, 1, -i64::from(self.day))
    }

    /// Monday of this date's ISO week.
    pub fn first_of_week(self) -> Self {
        let weekday = i64::from(daynum::weekday_from_unix_days(self.to_unix_days()));
        self.add_days(1 - weekday)
    }

    /// Sunday of this date's ISO week.
    pub fn last_of_week(self) -> Self {
        let weekday = i64::from(daynum::weekday_from_unix_days(self.to_unix_days()));
        self.add_days(DAYS_IN_WEEK - weekday)
    }

    pub(crate) const fn to_unix_days(self) -> i64 {
        daynum::unix_days_from_date(self.year, self.month, self.day)
    }

    pub(crate) const fn from_unix_days(days: i64) -> Self {
        let (year, month, day) = daynum::date_from_unix_days(days);
        Self { year, month, day }
    }
}

/// Absolute number of whole days between the two dates' midnights.
/// Symmetric and zero for equal dates.
pub fn diff_in_days(d1: Date, d2: Date) -> u64 {
    d1.to_unix_days().abs_diff(d2.to_unix_days())
}

impl FromStr for Date {
    type Err = ParseError;

    /// Accepts exactly the fixed-width `YYYY-MM-DD` form: 4-digit year,
    /// 2-digit month and day, hyphen-separated, ASCII digits only.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split(DATE_SEPARATOR).collect();
        if parts.len() != 3 || parts[0].len() != 4 || parts[1].len() != 2 || parts[2].len() != 2 {
            return Err(ParseError::InvalidFormat(s.to_owned()));
        }

        let year = parse_digits(parts[0])?;
        let month = parse_digits(parts[1])?;
        let day = parse_digits(parts[2])?;

        Ok(Self::new(year, month as u8, day as u8)?)
    }
}

/// Unsigned decimal; signs, whitespace, and non-ASCII digits all rejected.
fn parse_digits(s: &str) -> Result<i64, ParseError> {
    if !s.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ParseError::InvalidFormat(s.to_owned()));
    }
    s.parse().map_err(|_| ParseError::InvalidFormat(s.to_owned()))
}

impl serde::Serialize for Date {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> serde::Deserialize<'de> for Date {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
