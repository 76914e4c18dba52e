use axum::http::StatusCode;
use rstest::rstest;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::test_utils::TestContext;

#[rstest]
#[case::inverted_day(json!({ "monday": { "open": "18:00", "close": "09:00" } }))]
#[case::bad_time(json!({ "tuesday": { "start": "9am", "end": "17:00" } }))]
#[case::bad_flat_range(json!("nine to five"))]
#[case::not_hours(json!(42))]
#[tokio::test]
async fn malformed_working_hours_are_rejected_before_storage(#[case] working_hours: Value) {
    let server = TestContext::new().server();

    let response = server
        .put(&format!("/api/staff/{}/working-hours", Uuid::new_v4()))
        .json(&json!({ "working_hours": working_hours }))
        .expect_failure()
        .await;

    response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
    let body: Value = response.json();
    assert!(body["error"]
        .as_str()
        .unwrap()
        .starts_with("Schedule configuration error:"));
}
