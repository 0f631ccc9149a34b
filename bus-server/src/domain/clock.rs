//! Clock times as sent by the arrivals feed.
//!
//! The feed gives bare "HH:MM" strings with no date, so the only thing we can
//! do with them is compare minutes within a day.

use std::fmt;

use chrono::{NaiveTime, Timelike};

/// Error returned when parsing an invalid clock string.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid clock time: {reason}")]
pub struct ClockError {
    reason: &'static str,
}

impl ClockError {
    fn new(reason: &'static str) -> Self {
        Self { reason }
    }
}

/// A time of day with minute precision.
///
/// # Examples
///
/// ```
/// use bus_server::domain::ClockTime;
///
/// let t = ClockTime::parse("14:30").unwrap();
/// assert_eq!(t.minutes_of_day(), 14 * 60 + 30);
///
/// // Single-digit hours are accepted
/// assert_eq!(ClockTime::parse("9:05").unwrap().to_string(), "09:05");
///
/// assert!(ClockTime::parse("1430").is_err());
/// assert!(ClockTime::parse("14:3").is_err());
/// assert!(ClockTime::parse("25:00").is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ClockTime(NaiveTime);

impl ClockTime {
    /// Parse "HH:MM" (or "H:MM").
    pub fn parse(s: &str) -> Result<Self, ClockError> {
        let (hours, minutes) = s
            .trim()
            .split_once(':')
            .ok_or_else(|| ClockError::new("expected HH:MM format"))?;

        if hours.is_empty() || hours.len() > 2 {
            return Err(ClockError::new("expected one or two hour digits"));
        }
        if minutes.len() != 2 {
            return Err(ClockError::new("expected two minute digits"));
        }

        let hour = parse_digits(hours).ok_or_else(|| ClockError::new("invalid hour digits"))?;
        let minute =
            parse_digits(minutes).ok_or_else(|| ClockError::new("invalid minute digits"))?;

        let time = NaiveTime::from_hms_opt(hour, minute, 0)
            .ok_or_else(|| ClockError::new("hour must be 0-23 and minute 0-59"))?;

        Ok(Self(time))
    }

    /// `hour * 60 + minute`.
    pub fn minutes_of_day(&self) -> i32 {
        (self.0.hour() * 60 + self.0.minute()) as i32
    }
}

impl fmt::Display for ClockTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.0.hour(), self.0.minute())
    }
}

fn parse_digits(s: &str) -> Option<u32> {
    if !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    s.parse().ok()
}
