use axum::http::StatusCode;
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::test_utils::TestContext;

#[tokio::test]
async fn create_rejects_malformed_dates_before_any_lookup() {
    let ctx = TestContext::new();
    let server = ctx.server();

    let response = server
        .post("/api/appointments")
        .json(&json!({
            "customer_id": Uuid::new_v4(),
            "service_id": ctx.service_id,
            "staff_id": ctx.staff_id,
            "date": "01/02/2024",
            "start_time": "10:00"
        }))
        .expect_failure()
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(
        body,
        json!({ "error": "Validation error: Invalid date '01/02/2024', expected YYYY-MM-DD" })
    );
}

#[tokio::test]
async fn create_rejects_malformed_start_times() {
    let ctx = TestContext::new();
    let server = ctx.server();

    let response = server
        .post("/api/appointments")
        .json(&json!({
            "customer_id": Uuid::new_v4(),
            "service_id": ctx.service_id,
            "date": "2024-01-01",
            "start_time": "10h"
        }))
        .expect_failure()
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn reschedule_rejects_malformed_input() {
    let server = TestContext::new().server();

    let response = server
        .put(&format!("/api/appointments/{}/reschedule", Uuid::new_v4()))
        .json(&json!({ "date": "2024-01-01", "start_time": "24:30" }))
        .expect_failure()
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn status_update_rejects_unknown_statuses() {
    let server = TestContext::new().server();

    let response = server
        .patch(&format!("/api/appointments/{}/status", Uuid::new_v4()))
        .json(&json!({ "status": "PENDING" }))
        .expect_failure()
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(
        body,
        json!({ "error": "Validation error: Unknown appointment status 'PENDING'" })
    );
}
