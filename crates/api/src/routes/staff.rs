use axum::{routing::get, Router};
use std::sync::Arc;

use crate::{handlers::staff, ApiState};

pub fn routes() -> Router<Arc<ApiState>> {
    Router::new().route(
        "/api/staff/:id/working-hours",
        get(staff::get_working_hours).put(staff::update_working_hours),
    )
}
