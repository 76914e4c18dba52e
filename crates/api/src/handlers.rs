//! Request handlers and the input parsing they share.

pub mod appointment;
pub mod availability;
pub mod staff;

use bookwise_core::{
    errors::{BookingError, BookingResult},
    time::{MINUTES_PER_DAY, Minutes, TimeInterval, format_time_of_day, parse_time_of_day},
};
use chrono::NaiveDate;
use uuid::Uuid;

/// Date format accepted on the wire.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Returns the trimmed value of a required parameter.
pub fn required<'a>(name: &str, value: Option<&'a str>) -> BookingResult<&'a str> {
    match value.map(str::trim) {
        Some(value) if !value.is_empty() => Ok(value),
        _ => Err(BookingError::Validation(format!("{} is required", name))),
    }
}

pub fn parse_uuid(name: &str, value: &str) -> BookingResult<Uuid> {
    Uuid::parse_str(value.trim())
        .map_err(|_| BookingError::Validation(format!("{} must be a valid UUID", name)))
}

pub fn parse_date(value: &str) -> BookingResult<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), DATE_FORMAT)
        .map_err(|_| BookingError::Validation(format!("Invalid date '{}', expected YYYY-MM-DD", value)))
}

pub fn parse_start_time(value: &str) -> BookingResult<Minutes> {
    parse_time_of_day(value)
        .map_err(|_| BookingError::Validation(format!("Invalid start time '{}', expected HH:MM", value)))
}

/// The window a booking of `duration` minutes starting at `start` occupies.
///
/// Bookings must end before midnight of the same day.
pub fn proposed_interval(start: Minutes, duration: Minutes) -> BookingResult<TimeInterval> {
    if duration <= 0 {
        return Err(BookingError::Validation(format!(
            "Service duration must be positive, got {} minutes",
            duration
        )));
    }
    if !(0..MINUTES_PER_DAY).contains(&start) {
        return Err(BookingError::Validation(format!(
            "Start time {} is outside the day",
            start
        )));
    }
    if duration >= MINUTES_PER_DAY - start {
        return Err(BookingError::Validation(format!(
            "Appointment starting at {} for {} minutes must end within the same day",
            format_time_of_day(start),
            duration
        )));
    }
    Ok(TimeInterval::starting_at(start, duration))
}
