//! Minute-of-day arithmetic and the half-open interval type shared by the
//! schedule resolver, the slot generator and booking admission.
//!
//! Every comparison in the crate happens in integer minutes since midnight.
//! `HH:MM` strings only exist at the edges.

use std::fmt;

use chrono::{NaiveTime, Timelike};
use serde::{Deserialize, Serialize};

use crate::errors::ScheduleConfigError;

/// Minutes since midnight. Signed so that caller-supplied durations can be
/// validated instead of wrapping.
pub type Minutes = i32;

pub const MINUTES_PER_DAY: Minutes = 24 * 60;

/// Parses a 24-hour `HH:MM` string into minutes since midnight.
pub fn parse_time_of_day(value: &str) -> Result<Minutes, ScheduleConfigError> {
    let time = NaiveTime::parse_from_str(value.trim(), "%H:%M")
        .map_err(|_| ScheduleConfigError::InvalidTime(value.to_string()))?;
    Ok(minutes_of(time))
}

/// Formats minutes since midnight as zero-padded `HH:MM`.
pub fn format_time_of_day(minutes: Minutes) -> String {
    format!("{:02}:{:02}", minutes / 60, minutes % 60)
}

pub fn minutes_of(time: NaiveTime) -> Minutes {
    (time.hour() * 60 + time.minute()) as Minutes
}

/// Inverse of [`minutes_of`]; `None` outside `[0, 24:00)`.
pub fn naive_time_of(minutes: Minutes) -> Option<NaiveTime> {
    if !(0..MINUTES_PER_DAY).contains(&minutes) {
        return None;
    }
    NaiveTime::from_hms_opt((minutes / 60) as u32, (minutes % 60) as u32, 0)
}

/// Half-open interval `[start, end)` in minutes since midnight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TimeInterval {
    pub start: Minutes,
    pub end: Minutes,
}

impl TimeInterval {
    pub const fn new(start: Minutes, end: Minutes) -> Self {
        Self { start, end }
    }

    /// Builds an interval from two `HH:MM` strings, requiring `open < close`.
    pub fn from_times(open: &str, close: &str) -> Result<Self, ScheduleConfigError> {
        let start = parse_time_of_day(open)?;
        let end = parse_time_of_day(close)?;
        if start >= end {
            return Err(ScheduleConfigError::InvertedRange {
                open: open.trim().to_string(),
                close: close.trim().to_string(),
            });
        }
        Ok(Self { start, end })
    }

    /// Parses the flat `"HH:MM - HH:MM"` form.
    pub fn parse_range(value: &str) -> Result<Self, ScheduleConfigError> {
        let (open, close) = value
            .split_once('-')
            .ok_or_else(|| ScheduleConfigError::Unrecognised(value.to_string()))?;
        Self::from_times(open, close)
    }

    /// An interval of `duration` minutes starting at `start`. The end
    /// saturates at `Minutes::MAX`.
    pub const fn starting_at(start: Minutes, duration: Minutes) -> Self {
        Self {
            start,
            end: start.saturating_add(duration),
        }
    }

    pub fn duration(&self) -> Minutes {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }

    pub fn overlaps(&self, other: &TimeInterval) -> bool {
        overlaps(self, other)
    }

    /// Returns true if `self` fully contains `other`.
    pub fn contains(&self, other: &TimeInterval) -> bool {
        self.start <= other.start && other.end <= self.end
    }
}

impl fmt::Display for TimeInterval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}-{}",
            format_time_of_day(self.start),
            format_time_of_day(self.end)
        )
    }
}

/// The single overlap predicate for half-open intervals.
///
/// `[a0, a1)` and `[b0, b1)` overlap iff `a0 < b1 && b0 < a1`, so an interval
/// ending exactly where another begins does not overlap it.
pub fn overlaps(a: &TimeInterval, b: &TimeInterval) -> bool {
    a.start < b.end && b.start < a.end
}
