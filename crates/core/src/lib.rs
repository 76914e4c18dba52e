//! # Bookwise Core
//!
//! Availability computation for the booking platform: resolving working hours
//! to the open interval of a date, generating bookable slots, and admitting or
//! rejecting new bookings against the ones already on the calendar.
//!
//! Everything here is synchronous and free of I/O except the
//! [`admission::BusyIntervalSource`] seam, which the persistence layer
//! implements.

pub mod admission;
pub mod errors;
pub mod models;
pub mod schedule;
pub mod slots;
pub mod time;
