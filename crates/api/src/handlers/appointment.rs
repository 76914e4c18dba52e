//! # Appointment Handlers
//!
//! Booking, rescheduling and status changes. Creation and rescheduling go
//! through the exclusive repository operations, which check for overlaps and
//! write while holding the calendar locks of the target date.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use bookwise_core::{
    errors::BookingError,
    models::appointment::{
        Appointment, AppointmentStatus, CreateAppointmentRequest, CreateAppointmentResponse,
        RescheduleAppointmentRequest, UpdateAppointmentStatusRequest,
    },
};
use bookwise_db::{
    models::{DbAppointment, DbService, NewAppointment},
    repositories::{appointment, service, staff},
};
use std::sync::Arc;
use uuid::Uuid;

use crate::{
    handlers::{parse_date, parse_start_time, proposed_interval},
    middleware::error_handling::AppError,
    ApiState,
};

async fn load_service(state: &ApiState, service_id: Uuid) -> Result<DbService, AppError> {
    let service = service::get_service_by_id(&state.db_pool, service_id)
        .await?
        .ok_or_else(|| BookingError::NotFound(format!("Service with ID {} not found", service_id)))?;
    Ok(service)
}

async fn load_appointment(state: &ApiState, id: Uuid) -> Result<DbAppointment, AppError> {
    let appointment = appointment::get_appointment_by_id(&state.db_pool, id)
        .await?
        .ok_or_else(|| BookingError::NotFound(format!("Appointment with ID {} not found", id)))?;
    Ok(appointment)
}

/// Books an appointment
///
/// # Endpoint
///
/// ```text
/// POST /api/appointments
/// ```
///
/// # Errors
///
/// * `BookingError::Validation` - Malformed date or time, or a booking past midnight
/// * `BookingError::NotFound` - Unknown service, or staff not bookable for it
/// * `BookingError::SlotUnavailable` - The window overlaps an existing booking
pub async fn create_appointment(
    State(state): State<Arc<ApiState>>,
    Json(request): Json<CreateAppointmentRequest>,
) -> Result<(StatusCode, Json<CreateAppointmentResponse>), AppError> {
    let date = parse_date(&request.date)?;
    let start = parse_start_time(&request.start_time)?;

    let service = load_service(&state, request.service_id).await?;

    if let Some(staff_id) = request.staff_id {
        staff::get_bookable_staff(&state.db_pool, staff_id, service.business_id, service.id)
            .await?
            .ok_or_else(|| {
                BookingError::NotFound(format!(
                    "Staff member with ID {} not found or does not offer this service",
                    staff_id
                ))
            })?;
    }

    let interval = proposed_interval(start, service.duration)?;
    let new = NewAppointment {
        business_id: service.business_id,
        service_id: service.id,
        staff_id: request.staff_id,
        customer_id: request.customer_id,
        date,
        interval,
    };

    let created = appointment::create_appointment_exclusive(&state.db_pool, &new).await?;

    Ok((
        StatusCode::CREATED,
        Json(CreateAppointmentResponse {
            message: "Appointment booked successfully".to_string(),
            appointment: created.into_appointment()?,
        }),
    ))
}

/// Moves a booked appointment to another date or start time
///
/// The end time is recomputed from the service duration and the new window is
/// checked against every other booking on the target calendar.
pub async fn reschedule_appointment(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<Uuid>,
    Json(request): Json<RescheduleAppointmentRequest>,
) -> Result<Json<Appointment>, AppError> {
    let date = parse_date(&request.date)?;
    let start = parse_start_time(&request.start_time)?;

    let current = load_appointment(&state, id).await?;
    let service = load_service(&state, current.service_id).await?;
    let interval = proposed_interval(start, service.duration)?;

    let moved = appointment::reschedule_appointment_exclusive(
        &state.db_pool,
        id,
        date,
        interval.start,
        interval.duration(),
    )
    .await?;

    tracing::info!("Rescheduled appointment {} to {} at {}", id, date, interval);
    Ok(Json(moved.into_appointment()?))
}

/// Cancels an appointment, releasing its window
///
/// Cancelling an already cancelled appointment is a no-op.
pub async fn cancel_appointment(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<Appointment>, AppError> {
    let current = load_appointment(&state, id).await?.into_appointment()?;
    if current.status == AppointmentStatus::Canceled {
        return Ok(Json(current));
    }

    let canceled =
        appointment::update_appointment_status(&state.db_pool, id, AppointmentStatus::Canceled)
            .await?;

    tracing::info!("Canceled appointment {}", id);
    Ok(Json(canceled.into_appointment()?))
}

/// Sets the status of an appointment
///
/// A cancelled appointment cannot be moved back to a status that occupies the
/// calendar; it has to be booked again.
pub async fn update_appointment_status(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateAppointmentStatusRequest>,
) -> Result<Json<Appointment>, AppError> {
    let status: AppointmentStatus = request.status.parse()?;

    let updated = appointment::update_appointment_status(&state.db_pool, id, status).await?;
    Ok(Json(updated.into_appointment()?))
}
