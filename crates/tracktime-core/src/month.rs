//! Whole calendar months, used by monthly reports and synchronisation.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use crate::date::{CalendarDate, DateRange};
use crate::error::TrackError;

const MONTH_NAMES: [&str; 12] = [
    "january",
    "february",
    "march",
    "april",
    "may",
    "june",
    "july",
    "august",
    "september",
    "october",
    "november",
    "december",
];

/// A (year, month) pair, stored as its first day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Month {
    first: CalendarDate,
}

impl Month {
    pub fn new(year: i32, month: u32) -> Option<Self> {
        CalendarDate::from_ymd(year, month, 1).map(|first| Self { first })
    }

    pub fn containing(day: CalendarDate) -> Self {
        Self {
            first: day.first_of_month(),
        }
    }

    pub fn year(self) -> i32 {
        self.first.year()
    }

    pub fn month(self) -> u32 {
        self.first.month()
    }

    /// Resolves a month token against `today`.
    ///
    /// Accepts `this month`, `last month`, a number (`1`, `01`), an English
    /// name or its three-letter abbreviation (in `today`'s year), and `YYYY-MM`.
    pub fn parse(text: &str, today: CalendarDate) -> Result<Self, TrackError> {
        let token = text.trim().to_lowercase();
        let invalid = || TrackError::InvalidMonthFormat {
            input: text.to_string(),
        };

        match token.as_str() {
            "this month" | "thismonth" => return Ok(Self::containing(today)),
            "last month" | "lastmonth" => {
                return Ok(Self::containing(today.first_of_month().add_days(-1)));
            }
            _ => {}
        }

        if let Some((year, month)) = token.split_once('-') {
            let year: i32 = year.parse().map_err(|_| invalid())?;
            let month: u32 = month.parse().map_err(|_| invalid())?;
            return Self::new(year, month).ok_or_else(invalid);
        }

        if let Ok(month) = token.parse::<u32>() {
            return Self::new(today.year(), month).ok_or_else(invalid);
        }

        let index = MONTH_NAMES
            .iter()
            .position(|name| *name == token || (token.len() == 3 && name.starts_with(&token)))
            .ok_or_else(invalid)?;
        #[allow(clippy::cast_possible_truncation)]
        Self::new(today.year(), index as u32 + 1).ok_or_else(invalid)
    }

    pub const fn first_day(self) -> CalendarDate {
        self.first
    }

    pub fn last_day(self) -> CalendarDate {
        self.first_day().last_of_month()
    }

    pub fn range(self) -> DateRange {
        DateRange::month_of(self.first_day())
    }

    /// Relative location of this month's directory: `YYYY/MM`.
    pub fn relative_path(self) -> PathBuf {
        PathBuf::from(format!("{:04}", self.year())).join(format!("{:02}", self.month()))
    }
}

impl fmt::Display for Month {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year(), self.month())
    }
}

impl FromStr for Month {
    type Err = TrackError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s, CalendarDate::today())
    }
}
