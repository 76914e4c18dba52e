use thiserror::Error;

/// Working-hours data that is present but cannot be interpreted.
///
/// This is a configuration problem and is never used to mean "closed".
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ScheduleConfigError {
    #[error("invalid time of day '{0}', expected HH:MM")]
    InvalidTime(String),

    #[error("opening time {open} is not before closing time {close}")]
    InvertedRange { open: String, close: String },

    #[error("invalid working hours for {day}: {reason}")]
    InvalidDay { day: String, reason: String },

    #[error("unrecognised working hours: {0}")]
    Unrecognised(String),
}

#[derive(Error, Debug)]
pub enum BookingError {
    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Schedule configuration error: {0}")]
    ScheduleConfig(#[from] ScheduleConfigError),

    #[error("Time slot already booked: {0}")]
    SlotUnavailable(String),

    #[error("Database error: {0}")]
    Database(#[from] eyre::Report),

    #[error("Internal server error: {0}")]
    Internal(#[from] Box<dyn std::error::Error + Send + Sync>),
}

pub type BookingResult<T> = Result<T, BookingError>;
