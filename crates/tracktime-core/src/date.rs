//! Calendar dates and inclusive date ranges.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use chrono::{Datelike, Duration, Local, Months, NaiveDate, Weekday};
use serde::{Serialize, Serializer};

use crate::error::TrackError;

/// A local calendar day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CalendarDate(NaiveDate);

impl CalendarDate {
    pub fn from_ymd(year: i32, month: u32, day: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, day).map(Self)
    }

    /// Today in the local timezone.
    pub fn today() -> Self {
        Self(Local::now().date_naive())
    }

    pub const fn naive(self) -> NaiveDate {
        self.0
    }

    pub fn year(self) -> i32 {
        self.0.year()
    }

    pub fn month(self) -> u32 {
        self.0.month()
    }

    pub fn day(self) -> u32 {
        self.0.day()
    }

    pub fn weekday(self) -> Weekday {
        self.0.weekday()
    }

    /// Resolves a date token against `today`.
    ///
    /// Accepts `today`, `yesterday`, weekday names (full or three-letter; the
    /// most recent such day on or before `today`), a bare day-of-month in
    /// `today`'s month, and ISO `YYYY-MM-DD`.
    pub fn parse(text: &str, today: Self) -> Result<Self, TrackError> {
        let token = text.trim().to_lowercase();
        let invalid = || TrackError::InvalidDateFormat {
            input: text.to_string(),
        };

        match token.as_str() {
            "today" => return Ok(today),
            "yesterday" => return Ok(today.add_days(-1)),
            _ => {}
        }

        if let Some(weekday) = parse_weekday(&token) {
            return Ok(today.most_recent(weekday));
        }

        if !token.is_empty() && token.len() <= 2 && token.bytes().all(|b| b.is_ascii_digit()) {
            let day: u32 = token.parse().map_err(|_| invalid())?;
            return Self::from_ymd(today.year(), today.month(), day).ok_or_else(invalid);
        }

        NaiveDate::parse_from_str(&token, "%Y-%m-%d")
            .map(Self)
            .map_err(|_| invalid())
    }

    /// The most recent `weekday` on or before this date.
    pub fn most_recent(self, weekday: Weekday) -> Self {
        let back = (self.weekday().num_days_from_monday() + 7 - weekday.num_days_from_monday()) % 7;
        self.add_days(-i64::from(back))
    }

    pub fn add_days(self, days: i64) -> Self {
        Self(self.0 + Duration::days(days))
    }

    /// Adds calendar months. The day of month is clamped to the length of the
    /// target month, so Jan 31 plus one month is the last day of February.
    pub fn add_months(self, months: i32) -> Self {
        let magnitude = Months::new(months.unsigned_abs());
        let shifted = if months >= 0 {
            self.0.checked_add_months(magnitude)
        } else {
            self.0.checked_sub_months(magnitude)
        };
        Self(shifted.unwrap_or(self.0))
    }

    pub fn first_of_month(self) -> Self {
        Self(self.0.with_day(1).unwrap_or(self.0))
    }

    pub fn last_of_month(self) -> Self {
        self.first_of_month().add_months(1).add_days(-1)
    }

    /// Relative location of this day's file: `YYYY/MM/DD`.
    pub fn relative_path(self) -> PathBuf {
        PathBuf::from(format!("{:04}", self.year()))
            .join(format!("{:02}", self.month()))
            .join(format!("{:02}", self.day()))
    }
}

fn parse_weekday(token: &str) -> Option<Weekday> {
    let weekday = match token {
        "monday" | "mon" => Weekday::Mon,
        "tuesday" | "tue" => Weekday::Tue,
        "wednesday" | "wed" => Weekday::Wed,
        "thursday" | "thu" => Weekday::Thu,
        "friday" | "fri" => Weekday::Fri,
        "saturday" | "sat" => Weekday::Sat,
        "sunday" | "sun" => Weekday::Sun,
        _ => return None,
    };
    Some(weekday)
}

impl fmt::Display for CalendarDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%d"))
    }
}

impl FromStr for CalendarDate {
    type Err = TrackError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s, Self::today())
    }
}

impl From<NaiveDate> for CalendarDate {
    fn from(date: NaiveDate) -> Self {
        Self(date)
    }
}

impl Serialize for CalendarDate {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

/// An inclusive range of days.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    start: CalendarDate,
    end: CalendarDate,
}

impl DateRange {
    pub fn new(start: CalendarDate, end: CalendarDate) -> Result<Self, TrackError> {
        if start > end {
            return Err(TrackError::InvalidDateRange { start, end });
        }
        Ok(Self { start, end })
    }

    pub const fn single(day: CalendarDate) -> Self {
        Self {
            start: day,
            end: day,
        }
    }

    pub const fn start(&self) -> CalendarDate {
        self.start
    }

    pub const fn end(&self) -> CalendarDate {
        self.end
    }

    /// Sunday through Saturday of the week containing `today`.
    pub fn this_week(today: CalendarDate) -> Self {
        let start = today.most_recent(Weekday::Sun);
        Self {
            start,
            end: start.add_days(6),
        }
    }

    pub fn last_week(today: CalendarDate) -> Self {
        Self::this_week(today.add_days(-7))
    }

    pub fn month_of(day: CalendarDate) -> Self {
        Self {
            start: day.first_of_month(),
            end: day.last_of_month(),
        }
    }

    pub fn this_month(today: CalendarDate) -> Self {
        Self::month_of(today)
    }

    pub fn last_month(today: CalendarDate) -> Self {
        Self::month_of(today.first_of_month().add_days(-1))
    }

    /// January 1 through December 31 of `year`.
    pub fn year(year: i32) -> Option<Self> {
        Some(Self {
            start: CalendarDate::from_ymd(year, 1, 1)?,
            end: CalendarDate::from_ymd(year, 12, 31)?,
        })
    }

    /// Iterates every day from start to end, inclusive.
    pub fn days(self) -> impl Iterator<Item = CalendarDate> {
        let end = self.end;
        std::iter::successors(Some(self.start), move |day| {
            let next = day.add_days(1);
            (next <= end).then_some(next)
        })
    }

    pub fn contains(&self, day: CalendarDate) -> bool {
        self.start <= day && day <= self.end
    }
}

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.start == self.end {
            write!(f, "{}", self.start)
        } else {
            write!(f, "{} to {}", self.start, self.end)
        }
    }
}
