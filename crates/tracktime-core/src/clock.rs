//! Minute-of-day clock values.

use std::fmt;
use std::ops::Sub;
use std::str::FromStr;
use std::sync::LazyLock;

use chrono::{Duration, Local, NaiveTime, Timelike};
use regex::Regex;
use serde::{Serialize, Serializer};

use crate::error::TrackError;

/// `H:MM`, `HH:MM` or `HHMM`.
static CLOCK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?:(\d{1,2}):(\d{2})|(\d{2})(\d{2}))$").unwrap());

const MINUTES_PER_DAY: u16 = 24 * 60;

/// Minutes since local midnight, always in `[0, 1440)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ClockMinute(u16);

impl ClockMinute {
    /// Midnight.
    pub const MIDNIGHT: Self = Self(0);

    /// Builds a value from hours and minutes, rejecting out-of-range parts.
    pub const fn from_hm(hour: u16, minute: u16) -> Option<Self> {
        if hour < 24 && minute < 60 {
            Some(Self(hour * 60 + minute))
        } else {
            None
        }
    }

    /// Builds a value from a raw minute count.
    pub const fn from_minutes(minutes: u16) -> Option<Self> {
        if minutes < MINUTES_PER_DAY {
            Some(Self(minutes))
        } else {
            None
        }
    }

    /// Truncates a wall-clock time to its minute.
    #[allow(clippy::cast_possible_truncation)]
    pub fn from_time(time: NaiveTime) -> Self {
        // hour < 24 and minute < 60, so this always fits
        Self((time.hour() * 60 + time.minute()) as u16)
    }

    /// The current local minute.
    pub fn now() -> Self {
        Self::from_time(Local::now().time())
    }

    pub const fn minutes(self) -> u16 {
        self.0
    }

    pub const fn hour(self) -> u16 {
        self.0 / 60
    }

    pub const fn minute(self) -> u16 {
        self.0 % 60
    }

    /// Parses user or file input.
    ///
    /// The empty string means "no value" and yields `Ok(None)`; this is how an
    /// open entry's stop column reads back. `now` resolves to the supplied
    /// current minute so callers stay deterministic.
    pub fn parse(text: &str, now: Self) -> Result<Option<Self>, TrackError> {
        let text = text.trim();
        if text.is_empty() {
            return Ok(None);
        }
        if text.eq_ignore_ascii_case("now") {
            return Ok(Some(now));
        }

        let invalid = || TrackError::InvalidTimeFormat {
            input: text.to_string(),
        };
        let caps = CLOCK_RE.captures(text).ok_or_else(invalid)?;
        let (hour, minute) = match (caps.get(1), caps.get(2)) {
            (Some(h), Some(m)) => (h.as_str(), m.as_str()),
            _ => (&caps[3], &caps[4]),
        };
        let hour: u16 = hour.parse().map_err(|_| invalid())?;
        let minute: u16 = minute.parse().map_err(|_| invalid())?;
        Self::from_hm(hour, minute).map(Some).ok_or_else(invalid)
    }

    /// Like [`parse`](Self::parse) but an empty input is an error.
    pub fn parse_required(text: &str, now: Self) -> Result<Self, TrackError> {
        Self::parse(text, now)?.ok_or_else(|| TrackError::InvalidTimeFormat {
            input: text.to_string(),
        })
    }

    /// Half-open containment: `start <= self < end`.
    pub fn between(self, start: Self, end: Self) -> bool {
        start <= self && self < end
    }
}

/// Formats an optional clock value, rendering `None` as the empty string.
pub fn format_optional(value: Option<ClockMinute>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

impl fmt::Display for ClockMinute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour(), self.minute())
    }
}

impl FromStr for ClockMinute {
    type Err = TrackError;

    /// Resolves `now` against the wall clock. Prefer [`ClockMinute::parse`]
    /// outside of argument parsing.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_required(s, Self::now())
    }
}

impl Sub for ClockMinute {
    type Output = Duration;

    /// Signed difference; a stop before its start gives a negative duration.
    fn sub(self, rhs: Self) -> Duration {
        Duration::minutes(i64::from(self.0) - i64::from(rhs.0))
    }
}

impl Serialize for ClockMinute {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}
