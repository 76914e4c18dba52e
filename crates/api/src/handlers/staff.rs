//! # Staff Working-Hours Handlers
//!
//! Working hours are classified before they are stored, so anything the
//! availability resolver reads back is known to be well formed.

use axum::{
    extract::{Path, State},
    Json,
};
use bookwise_core::{
    errors::BookingError,
    models::staff::{UpdateWorkingHoursRequest, WorkingHoursResponse},
    schedule::{WeeklyHours, WorkingHours},
};
use bookwise_db::repositories::staff;
use serde_json::Value;
use std::sync::Arc;
use uuid::Uuid;

use crate::{middleware::error_handling::AppError, ApiState};

/// Whether a stored value counts as "nothing configured".
fn is_unset(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => true,
        Some(Value::String(s)) => s.trim().is_empty(),
        Some(Value::Object(object)) => object.is_empty(),
        Some(_) => false,
    }
}

/// Returns the stored working hours of a staff member
///
/// When nothing is stored the standard week (Monday to Friday, 09:00-17:00)
/// is returned as an editing template and `is_default` is set.
pub async fn get_working_hours(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<WorkingHoursResponse>, AppError> {
    let member = staff::get_staff_by_id(&state.db_pool, id)
        .await?
        .ok_or_else(|| BookingError::NotFound(format!("Staff member with ID {} not found", id)))?;

    let response = match member.working_hours {
        stored if !is_unset(stored.as_ref()) => WorkingHoursResponse {
            staff_id: id,
            working_hours: stored.unwrap_or(Value::Null),
            is_default: false,
        },
        _ => WorkingHoursResponse {
            staff_id: id,
            working_hours: WeeklyHours::standard_business_week().to_json(),
            is_default: true,
        },
    };

    Ok(Json(response))
}

/// Replaces the working hours of a staff member
///
/// # Errors
///
/// * `BookingError::ScheduleConfig` - The value cannot be interpreted as working hours
/// * `BookingError::NotFound` - Unknown staff member
pub async fn update_working_hours(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateWorkingHoursRequest>,
) -> Result<Json<WorkingHoursResponse>, AppError> {
    WorkingHours::classify(Some(&request.working_hours)).map_err(BookingError::from)?;

    let member = staff::update_working_hours(&state.db_pool, id, &request.working_hours)
        .await?
        .ok_or_else(|| BookingError::NotFound(format!("Staff member with ID {} not found", id)))?;

    tracing::info!("Updated working hours of staff member {}", id);
    Ok(Json(WorkingHoursResponse {
        staff_id: member.id,
        is_default: is_unset(member.working_hours.as_ref()),
        working_hours: member.working_hours.unwrap_or(Value::Null),
    }))
}
