use axum::{body::to_bytes, http::StatusCode};
use bookwise_api::middleware::error_handling::{map_error, AppError};
use bookwise_core::errors::{BookingError, ScheduleConfigError};
use pretty_assertions::assert_eq;
use rstest::rstest;
use serde_json::{json, Value};

#[rstest]
#[case::not_found(BookingError::NotFound("appointment".into()), StatusCode::NOT_FOUND)]
#[case::validation(BookingError::Validation("date is required".into()), StatusCode::BAD_REQUEST)]
#[case::schedule_config(
    BookingError::ScheduleConfig(ScheduleConfigError::Unrecognised("42".into())),
    StatusCode::UNPROCESSABLE_ENTITY
)]
#[case::slot_unavailable(BookingError::SlotUnavailable("10:00-11:00".into()), StatusCode::CONFLICT)]
#[case::database(BookingError::Database(eyre::eyre!("pool timed out")), StatusCode::INTERNAL_SERVER_ERROR)]
#[case::internal(
    BookingError::Internal(Box::new(std::io::Error::new(std::io::ErrorKind::Other, "boom"))),
    StatusCode::INTERNAL_SERVER_ERROR
)]
fn errors_map_to_status_codes(#[case] error: BookingError, #[case] expected: StatusCode) {
    assert_eq!(map_error(error).status(), expected);
}

#[tokio::test]
async fn error_body_carries_the_message() {
    let response = map_error(BookingError::SlotUnavailable(
        "10:00-11:00 overlaps existing booking 10:30-11:30".into(),
    ));
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(
        body,
        json!({ "error": "Time slot already booked: 10:00-11:00 overlaps existing booking 10:30-11:30" })
    );
}

#[test]
fn eyre_reports_become_database_errors() {
    let error: AppError = eyre::eyre!("relation does not exist").into();

    assert!(matches!(error.0, BookingError::Database(_)));
    assert_eq!(error.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[test]
fn schedule_config_errors_convert_through_booking_error() {
    let error: AppError = BookingError::from(ScheduleConfigError::InvalidTime("9am".into())).into();

    assert_eq!(error.status(), StatusCode::UNPROCESSABLE_ENTITY);
}
