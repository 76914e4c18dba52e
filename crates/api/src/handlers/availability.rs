//! # Availability Handlers
//!
//! Computes the free appointment slots of a business or staff member on a
//! given date:
//!
//! 1. Load the service to learn the slot duration
//! 2. Pick the working hours (staff, then business, then the configured fallback)
//! 3. Resolve them to the open interval of the requested weekday
//! 4. Subtract the non-cancelled bookings of that calendar
//!
//! A closed day answers with no slots without reading any bookings.

use axum::{
    extract::{Query, State},
    Json,
};
use bookwise_core::{
    admission::{BusyIntervalSource, ResourceScope},
    errors::{BookingError, BookingResult},
    models::availability::AvailabilityResponse,
    schedule::{DaySchedule, WorkingHours},
    slots::{Slot, SlotGenerator},
    time::Minutes,
};
use bookwise_db::repositories::{
    appointment::PgBusyIntervals, business, service, staff,
};
use chrono::NaiveDate;
use serde::Deserialize;
use std::sync::Arc;

use crate::{
    handlers::{parse_date, parse_uuid, required},
    middleware::error_handling::AppError,
    ApiState,
};

/// Query parameters for the availability endpoint
///
/// Every field is optional at the extractor level so that missing values are
/// reported as validation errors with a JSON body.
#[derive(Debug, Default, Deserialize)]
pub struct AvailabilityParams {
    pub business_id: Option<String>,
    pub service_id: Option<String>,
    /// Restricts availability to one staff member's calendar
    pub staff_id: Option<String>,
    /// `YYYY-MM-DD`
    pub date: Option<String>,
}

/// Identifiers and date of a validated availability request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AvailabilityQuery {
    pub scope: ResourceScope,
    pub service_id: uuid::Uuid,
    pub date: NaiveDate,
}

impl AvailabilityParams {
    /// Checks presence and format of every parameter.
    pub fn validate(&self) -> BookingResult<AvailabilityQuery> {
        let business_id = parse_uuid(
            "business_id",
            required("business_id", self.business_id.as_deref())?,
        )?;
        let service_id = parse_uuid(
            "service_id",
            required("service_id", self.service_id.as_deref())?,
        )?;
        let date = parse_date(required("date", self.date.as_deref())?)?;

        let staff_id = match self.staff_id.as_deref().map(str::trim) {
            Some(raw) if !raw.is_empty() => Some(parse_uuid("staff_id", raw)?),
            _ => None,
        };

        Ok(AvailabilityQuery {
            scope: ResourceScope::new(business_id, staff_id),
            service_id,
            date,
        })
    }
}

/// Free slots of `duration` minutes for `scope` on `date`.
///
/// Busy intervals are only requested when the day is open.
pub async fn available_slots<S>(
    source: &S,
    generator: &SlotGenerator,
    day: DaySchedule,
    scope: &ResourceScope,
    date: NaiveDate,
    duration: Minutes,
) -> BookingResult<Vec<Slot>>
where
    S: BusyIntervalSource + ?Sized,
{
    let DaySchedule::Open(open) = day else {
        tracing::debug!("{} is closed on {}", scope.calendar_key(date), date);
        return Ok(Vec::new());
    };

    let busy = source
        .busy_intervals(scope, date)
        .await
        .map_err(BookingError::Database)?;

    Ok(generator.generate(open, duration, &busy))
}

/// Lists the free slots for a service on a date
///
/// # Endpoint
///
/// ```text
/// GET /api/availability?business_id=..&service_id=..&staff_id=..&date=YYYY-MM-DD
/// ```
///
/// # Errors
///
/// * `BookingError::Validation` - Missing or malformed parameters
/// * `BookingError::NotFound` - Unknown business, service or staff member
/// * `BookingError::ScheduleConfig` - Stored working hours cannot be interpreted
/// * `BookingError::Database` - Database error
pub async fn get_availability(
    State(state): State<Arc<ApiState>>,
    Query(params): Query<AvailabilityParams>,
) -> Result<Json<AvailabilityResponse>, AppError> {
    let AvailabilityQuery {
        scope,
        service_id,
        date,
    } = params.validate()?;
    let business_id = scope.business_id();

    let service = service::get_service_by_id(&state.db_pool, service_id)
        .await?
        .filter(|service| service.business_id == business_id)
        .ok_or_else(|| {
            BookingError::NotFound(format!(
                "Service with ID {} not found for business {}",
                service_id, business_id
            ))
        })?;

    // Staff hours take precedence; the business hours apply otherwise
    let raw_hours = match scope.staff_id() {
        Some(staff_id) => {
            staff::get_staff_by_id(&state.db_pool, staff_id)
                .await?
                .filter(|staff| staff.business_id == business_id)
                .ok_or_else(|| {
                    BookingError::NotFound(format!("Staff member with ID {} not found", staff_id))
                })?
                .working_hours
        }
        None => {
            business::get_business_by_id(&state.db_pool, business_id)
                .await?
                .ok_or_else(|| {
                    BookingError::NotFound(format!("Business with ID {} not found", business_id))
                })?
                .working_hours
        }
    };

    let hours = WorkingHours::classify(raw_hours.as_ref()).map_err(BookingError::from)?;
    let day = state.resolver.resolve(hours.as_ref(), date);

    let busy_source = PgBusyIntervals::new(state.db_pool.clone());
    let slots = available_slots(
        &busy_source,
        &state.slot_generator,
        day,
        &scope,
        date,
        service.duration,
    )
    .await?;

    Ok(Json(AvailabilityResponse {
        date,
        closed: day.is_closed(),
        slots: slots.iter().map(Slot::label).collect(),
    }))
}
