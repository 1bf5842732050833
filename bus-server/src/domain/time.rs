//! Schedule time handling for bus frequencies.
//!
//! The data store provides stop times as "HH:MM" or "HH:MM:SS" strings
//! without a date. This module provides a date-aware time type so that
//! overnight trips crossing midnight (with or without an explicit day
//! offset in the data) can be compared and differenced correctly.

use chrono::{Duration, NaiveDate, NaiveTime, Timelike};
use std::cmp::Ordering;
use std::fmt;

/// Error returned when parsing an invalid time string.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid time: {reason}")]
pub struct TimeError {
    reason: &'static str,
}

impl TimeError {
    fn new(reason: &'static str) -> Self {
        Self { reason }
    }
}

/// A date-aware scheduled stop time.
///
/// Stop times need to track both the time of day and the date, because
/// overnight trips cross midnight. Two stops at "01:30" might be on
/// different days of the same trip.
///
/// Schedules are minute-granular: a trailing ":SS" component is validated
/// and then discarded.
///
/// # Examples
///
/// ```
/// use bus_server::domain::StopTime;
/// use chrono::NaiveDate;
///
/// let date = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap();
/// let time = StopTime::parse("14:30", date).unwrap();
/// assert_eq!(time.to_string(), "14:30");
///
/// // Database TIME columns come back with seconds; those parse too.
/// let time = StopTime::parse("14:30:00", date).unwrap();
/// assert_eq!(time.to_string(), "14:30");
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct StopTime {
    date: NaiveDate,
    time: NaiveTime,
}

impl StopTime {
    /// Create a new StopTime from date and time components.
    pub fn new(date: NaiveDate, time: NaiveTime) -> Self {
        Self { date, time }
    }

    /// Parse a time from "HH:MM" or "HH:MM:SS" format with a given base date.
    ///
    /// Seconds, when present, are range-checked and ignored.
    ///
    /// # Examples
    ///
    /// ```
    /// use bus_server::domain::StopTime;
    /// use chrono::NaiveDate;
    ///
    /// let date = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap();
    ///
    /// // Valid times
    /// assert!(StopTime::parse("00:00", date).is_ok());
    /// assert!(StopTime::parse("23:59", date).is_ok());
    /// assert!(StopTime::parse("05:15:30", date).is_ok());
    ///
    /// // Invalid formats
    /// assert!(StopTime::parse("1430", date).is_err());
    /// assert!(StopTime::parse("14:3", date).is_err());
    /// assert!(StopTime::parse("25:00", date).is_err());
    /// assert!(StopTime::parse("14:30:61", date).is_err());
    /// ```
    pub fn parse(s: &str, date: NaiveDate) -> Result<Self, TimeError> {
        let bytes = s.as_bytes();

        if bytes.len() != 5 && bytes.len() != 8 {
            return Err(TimeError::new("expected HH:MM or HH:MM:SS format"));
        }

        if bytes[2] != b':' {
            return Err(TimeError::new("expected colon at position 2"));
        }

        let hour =
            parse_two_digits(&bytes[0..2]).ok_or_else(|| TimeError::new("invalid hour digits"))?;
        if hour > 23 {
            return Err(TimeError::new("hour must be 0-23"));
        }

        let minute = parse_two_digits(&bytes[3..5])
            .ok_or_else(|| TimeError::new("invalid minute digits"))?;
        if minute > 59 {
            return Err(TimeError::new("minute must be 0-59"));
        }

        // Optional seconds component: validated, then dropped.
        if bytes.len() == 8 {
            if bytes[5] != b':' {
                return Err(TimeError::new("expected colon at position 5"));
            }
            let second = parse_two_digits(&bytes[6..8])
                .ok_or_else(|| TimeError::new("invalid second digits"))?;
            if second > 59 {
                return Err(TimeError::new("second must be 0-59"));
            }
        }

        let time = NaiveTime::from_hms_opt(hour, minute, 0)
            .ok_or_else(|| TimeError::new("invalid time"))?;

        Ok(Self { date, time })
    }

    /// Returns the date component.
    pub fn date(&self) -> NaiveDate {
        self.date
    }

    /// Returns the time component.
    pub fn time(&self) -> NaiveTime {
        self.time
    }

    /// Returns the hour (0-23).
    pub fn hour(&self) -> u32 {
        self.time.hour()
    }

    /// Returns the minute (0-59).
    pub fn minute(&self) -> u32 {
        self.time.minute()
    }

    /// Converts to a NaiveDateTime.
    pub fn to_datetime(&self) -> chrono::NaiveDateTime {
        self.date.and_time(self.time)
    }

    /// Advance this time by a whole number of days, keeping the clock time.
    ///
    /// Used to apply a trip's `day_offset`: a stop scheduled at "01:00" with
    /// offset 1 occurs the day after departure.
    ///
    /// Returns `None` on date overflow.
    ///
    /// # Examples
    ///
    /// ```
    /// use bus_server::domain::StopTime;
    /// use chrono::NaiveDate;
    ///
    /// let date = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap();
    /// let arrival = StopTime::parse("01:00", date).unwrap().plus_days(1).unwrap();
    /// assert_eq!(arrival.date(), NaiveDate::from_ymd_opt(2025, 6, 2).unwrap());
    /// assert_eq!(arrival.to_string(), "01:00");
    /// ```
    pub fn plus_days(&self, days: i64) -> Option<Self> {
        let date = self.date.checked_add_signed(Duration::days(days))?;
        Some(Self {
            date,
            time: self.time,
        })
    }

    /// Returns the duration between two times.
    ///
    /// Returns a negative duration if `other` is after `self`.
    pub fn signed_duration_since(&self, other: Self) -> Duration {
        self.to_datetime()
            .signed_duration_since(other.to_datetime())
    }
}

impl Ord for StopTime {
    fn cmp(&self, other: &Self) -> Ordering {
        self.to_datetime().cmp(&other.to_datetime())
    }
}

impl PartialOrd for StopTime {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Debug for StopTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "StopTime({} {:02}:{:02})",
            self.date,
            self.hour(),
            self.minute()
        )
    }
}

impl fmt::Display for StopTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour(), self.minute())
    }
}

/// Parse two ASCII digit bytes into a u32.
fn parse_two_digits(bytes: &[u8]) -> Option<u32> {
    if bytes.len() != 2 {
        return None;
    }
    let d1 = (bytes[0] as char).to_digit(10)?;
    let d2 = (bytes[1] as char).to_digit(10)?;
    Some(d1 * 10 + d2)
}
