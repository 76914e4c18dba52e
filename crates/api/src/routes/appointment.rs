use axum::{
    routing::{patch, post, put},
    Router,
};
use std::sync::Arc;

use crate::{handlers::appointment, ApiState};

pub fn routes() -> Router<Arc<ApiState>> {
    Router::new()
        .route("/api/appointments", post(appointment::create_appointment))
        .route(
            "/api/appointments/:id/reschedule",
            put(appointment::reschedule_appointment),
        )
        .route(
            "/api/appointments/:id/cancel",
            put(appointment::cancel_appointment),
        )
        .route(
            "/api/appointments/:id/status",
            patch(appointment::update_appointment_status),
        )
}
