//! # Schedule Resolver
//!
//! Turns a stored working-hours value plus a calendar date into the effective
//! open interval for that date.
//!
//! Stored values come in two shapes:
//!
//! - a day-keyed object, `{"monday": {"open": "09:00", "close": "17:00"}, "sunday": null}`
//! - the legacy flat string `"09:00 - 17:00"`, applied to every day
//!
//! Both are classified once into [`WorkingHours`] before any resolution runs.
//!
//! ## Day-of-week convention
//!
//! Dates are `chrono::NaiveDate` values: plain calendar dates with no time
//! zone. The weekday is taken from the date itself and is never derived from
//! an instant, so a caller's offset cannot shift which day's hours apply.

use chrono::{Datelike, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};
use tracing::warn;

use crate::errors::ScheduleConfigError;
use crate::time::{TimeInterval, format_time_of_day};

/// Open interval used when a resource has no working hours configured.
pub const DEFAULT_OPEN_HOURS: TimeInterval = TimeInterval::new(9 * 60, 17 * 60);

/// Literal accepted in place of a day entry (or a whole schedule) to mean closed.
pub const CLOSED_MARKER: &str = "closed";

const WEEK: [Weekday; 7] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
    Weekday::Sun,
];

/// Lowercase day name used as the key in day-keyed working hours.
pub fn day_key(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "monday",
        Weekday::Tue => "tuesday",
        Weekday::Wed => "wednesday",
        Weekday::Thu => "thursday",
        Weekday::Fri => "friday",
        Weekday::Sat => "saturday",
        Weekday::Sun => "sunday",
    }
}

/// Inverse of [`day_key`]; only the exact lowercase full names match.
fn weekday_of_key(key: &str) -> Option<Weekday> {
    WEEK.into_iter().find(|day| day_key(*day) == key)
}

/// Outcome of resolving working hours for one date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DaySchedule {
    /// Open for business; slots may be generated inside this interval.
    Open(TimeInterval),
    /// Closed all day. Not an error: the date simply has no slots.
    Closed,
}

impl DaySchedule {
    pub fn open_interval(&self) -> Option<TimeInterval> {
        match self {
            DaySchedule::Open(interval) => Some(*interval),
            DaySchedule::Closed => None,
        }
    }

    pub fn is_closed(&self) -> bool {
        matches!(self, DaySchedule::Closed)
    }
}

/// A day entry as written by the staff and business editors.
#[derive(Debug, Deserialize)]
struct DayHours {
    #[serde(alias = "start")]
    open: String,
    #[serde(alias = "end")]
    close: String,
}

/// Recurring weekly hours, one optional interval per weekday.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct WeeklyHours {
    days: [Option<TimeInterval>; 7],
}

impl WeeklyHours {
    /// Every day closed.
    pub fn new() -> Self {
        Self::default()
    }

    /// Monday to Friday 09:00-17:00, weekend closed.
    pub fn standard_business_week() -> Self {
        let mut week = Self::new();
        for day in &WEEK[..5] {
            week.set(*day, Some(DEFAULT_OPEN_HOURS));
        }
        week
    }

    pub fn set(&mut self, day: Weekday, hours: Option<TimeInterval>) {
        self.days[day.num_days_from_monday() as usize] = hours;
    }

    pub fn get(&self, day: Weekday) -> Option<TimeInterval> {
        self.days[day.num_days_from_monday() as usize]
    }

    /// Serializes back to the day-keyed object form.
    pub fn to_json(&self) -> Value {
        let mut map = Map::new();
        for day in WEEK {
            let entry = match self.get(day) {
                Some(interval) => json!({
                    "open": format_time_of_day(interval.start),
                    "close": format_time_of_day(interval.end),
                }),
                None => Value::Null,
            };
            map.insert(day_key(day).to_string(), entry);
        }
        Value::Object(map)
    }

    fn from_object(object: &Map<String, Value>) -> Result<Self, ScheduleConfigError> {
        let mut week = Self::new();
        for (key, entry) in object {
            let Some(day) = weekday_of_key(key) else {
                warn!("Ignoring unknown working-hours key '{}'", key);
                continue;
            };
            week.set(day, parse_day_entry(key, entry)?);
        }
        Ok(week)
    }
}

fn parse_day_entry(key: &str, entry: &Value) -> Result<Option<TimeInterval>, ScheduleConfigError> {
    let invalid = |reason: String| ScheduleConfigError::InvalidDay {
        day: key.to_string(),
        reason,
    };

    match entry {
        Value::Null => Ok(None),
        Value::String(s) if s.trim().is_empty() || s.trim().eq_ignore_ascii_case(CLOSED_MARKER) => {
            Ok(None)
        }
        Value::String(s) => TimeInterval::parse_range(s)
            .map(Some)
            .map_err(|e| invalid(e.to_string())),
        Value::Object(_) => {
            let hours: DayHours =
                serde_json::from_value(entry.clone()).map_err(|e| invalid(e.to_string()))?;
            TimeInterval::from_times(&hours.open, &hours.close)
                .map(Some)
                .map_err(|e| invalid(e.to_string()))
        }
        other => Err(invalid(format!("unexpected value {other}"))),
    }
}

/// Working hours after classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkingHours {
    /// Closed every day.
    Closed,
    /// The same interval on every day (legacy flat string).
    Uniform(TimeInterval),
    /// Day-keyed weekly hours.
    PerDay(WeeklyHours),
}

impl WorkingHours {
    /// Classifies a stored working-hours value.
    ///
    /// Returns `Ok(None)` when nothing is configured (absent, `null`, empty
    /// string or empty object); the resolver then applies its fallback.
    pub fn classify(raw: Option<&Value>) -> Result<Option<Self>, ScheduleConfigError> {
        match raw {
            None | Some(Value::Null) => Ok(None),
            Some(Value::Object(object)) if object.is_empty() => Ok(None),
            Some(Value::Object(object)) => WeeklyHours::from_object(object).map(|w| Some(Self::PerDay(w))),
            Some(Value::String(s)) => Self::classify_str(s),
            Some(other) => Err(ScheduleConfigError::Unrecognised(other.to_string())),
        }
    }

    /// Classifies the string form: either JSON-encoded day-keyed hours or the
    /// flat `"HH:MM - HH:MM"` range.
    pub fn classify_str(raw: &str) -> Result<Option<Self>, ScheduleConfigError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Ok(None);
        }
        if trimmed.eq_ignore_ascii_case(CLOSED_MARKER) {
            return Ok(Some(Self::Closed));
        }
        if let Ok(Value::Object(object)) = serde_json::from_str::<Value>(trimmed) {
            return Self::classify(Some(&Value::Object(object)));
        }
        TimeInterval::parse_range(trimmed).map(|interval| Some(Self::Uniform(interval)))
    }

    /// The interval that applies on `day`, or `None` when closed.
    pub fn hours_on(&self, day: Weekday) -> Option<TimeInterval> {
        match self {
            WorkingHours::Closed => None,
            WorkingHours::Uniform(interval) => Some(*interval),
            WorkingHours::PerDay(week) => week.get(day),
        }
    }
}

/// Resolves working hours to the effective interval of a specific date.
///
/// The fallback used for unconfigured resources is injected so that
/// deployments and tests can override [`DEFAULT_OPEN_HOURS`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleResolver {
    fallback: TimeInterval,
}

impl Default for ScheduleResolver {
    fn default() -> Self {
        Self::new(DEFAULT_OPEN_HOURS)
    }
}

impl ScheduleResolver {
    pub fn new(fallback: TimeInterval) -> Self {
        Self { fallback }
    }

    pub fn fallback(&self) -> TimeInterval {
        self.fallback
    }

    pub fn resolve(&self, hours: Option<&WorkingHours>, date: NaiveDate) -> DaySchedule {
        let Some(hours) = hours else {
            return DaySchedule::Open(self.fallback);
        };
        match hours.hours_on(date.weekday()) {
            Some(interval) => DaySchedule::Open(interval),
            None => DaySchedule::Closed,
        }
    }

    /// Classifies and resolves a stored value in one step.
    pub fn resolve_raw(
        &self,
        raw: Option<&Value>,
        date: NaiveDate,
    ) -> Result<DaySchedule, ScheduleConfigError> {
        let hours = WorkingHours::classify(raw)?;
        Ok(self.resolve(hours.as_ref(), date))
    }
}
