use axum::http::StatusCode;
use bookwise_api::handlers::availability::{available_slots, AvailabilityParams};
use bookwise_core::{
    admission::ResourceScope,
    errors::BookingError,
    schedule::{DaySchedule, WorkingHours},
    slots::{Slot, SlotGenerator, Stride},
    time::{Minutes, TimeInterval},
};
use bookwise_db::mock::repositories::MockBusyIntervals;
use mockall::predicate::eq;
use pretty_assertions::assert_eq;
use rstest::rstest;
use serde_json::{json, Value};

use crate::test_utils::{monday, saturday, TestContext};

fn labels(slots: &[Slot]) -> Vec<String> {
    slots.iter().map(Slot::label).collect()
}

fn params(ctx: &TestContext) -> AvailabilityParams {
    AvailabilityParams {
        business_id: Some(ctx.business_id.to_string()),
        service_id: Some(ctx.service_id.to_string()),
        staff_id: Some(ctx.staff_id.to_string()),
        date: Some("2024-01-01".to_string()),
    }
}

#[tokio::test]
async fn open_day_subtracts_busy_intervals() {
    let ctx = TestContext::new();
    let scope = ResourceScope::new(ctx.business_id, Some(ctx.staff_id));

    let mut source = MockBusyIntervals::new();
    source
        .expect_busy_intervals()
        .with(eq(scope), eq(monday()))
        .times(1)
        .returning(|_, _| Ok(vec![TimeInterval::new(600, 660)]));

    let day = DaySchedule::Open(TimeInterval::new(540, 720));
    let slots = available_slots(&source, &SlotGenerator::default(), day, &scope, monday(), 60)
        .await
        .unwrap();

    assert_eq!(labels(&slots), vec!["09:00", "11:00"]);
}

#[test_log::test(tokio::test)]
async fn closed_day_never_reads_bookings() {
    let ctx = TestContext::new();
    let scope = ResourceScope::new(ctx.business_id, None);

    let mut source = MockBusyIntervals::new();
    source.expect_busy_intervals().times(0);

    let slots = available_slots(
        &source,
        &SlotGenerator::default(),
        DaySchedule::Closed,
        &scope,
        saturday(),
        30,
    )
    .await
    .unwrap();

    assert!(slots.is_empty());
}

#[tokio::test]
async fn weekly_hours_drive_the_open_window() {
    let ctx = TestContext::new();
    let scope = ResourceScope::new(ctx.business_id, None);
    let hours = WorkingHours::classify(Some(&json!({
        "monday": { "open": "10:00", "close": "12:00" },
        "saturday": "closed"
    })))
    .unwrap();

    let mut source = MockBusyIntervals::new();
    source
        .expect_busy_intervals()
        .times(1)
        .returning(|_, _| Ok(Vec::new()));

    let day = ctx.resolver.resolve(hours.as_ref(), monday());
    let slots = available_slots(&source, &SlotGenerator::default(), day, &scope, monday(), 30)
        .await
        .unwrap();

    assert_eq!(labels(&slots), vec!["10:00", "10:30", "11:00", "11:30"]);
    assert_eq!(ctx.resolver.resolve(hours.as_ref(), saturday()), DaySchedule::Closed);
}

#[tokio::test]
async fn fallback_hours_apply_when_nothing_is_configured() {
    let ctx = TestContext::new().with_fallback(TimeInterval::new(8 * 60, 10 * 60));
    let scope = ResourceScope::new(ctx.business_id, None);

    let mut source = MockBusyIntervals::new();
    source
        .expect_busy_intervals()
        .returning(|_, _| Ok(Vec::new()));

    let day = ctx.resolver.resolve(None, saturday());
    let slots = available_slots(&source, &SlotGenerator::default(), day, &scope, saturday(), 60)
        .await
        .unwrap();

    assert_eq!(labels(&slots), vec!["08:00", "09:00"]);
}

#[tokio::test]
async fn custom_stride_offers_overlapping_candidates() {
    let ctx = TestContext::new();
    let scope = ResourceScope::new(ctx.business_id, None);

    let mut source = MockBusyIntervals::new();
    source
        .expect_busy_intervals()
        .returning(|_, _| Ok(Vec::new()));

    let generator = SlotGenerator::new(Stride::Every(30));
    let day = DaySchedule::Open(TimeInterval::new(540, 660));
    let slots = available_slots(&source, &generator, day, &scope, monday(), 60)
        .await
        .unwrap();

    assert_eq!(labels(&slots), vec!["09:00", "09:30", "10:00"]);
}

#[tokio::test]
async fn oversized_duration_yields_no_slots() {
    let ctx = TestContext::new();
    let scope = ResourceScope::new(ctx.business_id, None);

    let mut source = MockBusyIntervals::new();
    source
        .expect_busy_intervals()
        .returning(|_, _| Ok(Vec::new()));

    let day = DaySchedule::Open(TimeInterval::new(540, 1020));
    let slots = available_slots(&source, &SlotGenerator::default(), day, &scope, monday(), Minutes::MAX)
        .await
        .unwrap();

    assert!(slots.is_empty());
}

#[test_log::test(tokio::test)]
async fn busy_source_failures_surface_as_database_errors() {
    let ctx = TestContext::new();
    let scope = ResourceScope::new(ctx.business_id, None);

    let mut source = MockBusyIntervals::new();
    source
        .expect_busy_intervals()
        .returning(|_, _| Err(eyre::eyre!("connection reset")));

    let result = available_slots(
        &source,
        &SlotGenerator::default(),
        DaySchedule::Open(TimeInterval::new(540, 600)),
        &scope,
        monday(),
        30,
    )
    .await;

    assert!(matches!(result, Err(BookingError::Database(_))));
}

#[test]
fn valid_params_build_a_staff_scope() {
    let ctx = TestContext::new();
    let query = params(&ctx).validate().unwrap();

    assert_eq!(query.scope, ResourceScope::new(ctx.business_id, Some(ctx.staff_id)));
    assert_eq!(query.service_id, ctx.service_id);
    assert_eq!(query.date, monday());
}

#[test]
fn blank_staff_id_means_business_scope() {
    let ctx = TestContext::new();
    let query = AvailabilityParams {
        staff_id: Some(" ".to_string()),
        ..params(&ctx)
    }
    .validate()
    .unwrap();

    assert_eq!(query.scope, ResourceScope::new(ctx.business_id, None));
}

#[rstest]
#[case::missing_business(|p: &mut AvailabilityParams| p.business_id = None)]
#[case::missing_service(|p: &mut AvailabilityParams| p.service_id = None)]
#[case::missing_date(|p: &mut AvailabilityParams| p.date = None)]
#[case::bad_business(|p: &mut AvailabilityParams| p.business_id = Some("nope".into()))]
#[case::bad_staff(|p: &mut AvailabilityParams| p.staff_id = Some("nope".into()))]
#[case::bad_date(|p: &mut AvailabilityParams| p.date = Some("2024-13-01".into()))]
fn invalid_params_are_rejected(#[case] corrupt: fn(&mut AvailabilityParams)) {
    let ctx = TestContext::new();
    let mut p = params(&ctx);
    corrupt(&mut p);

    assert!(matches!(p.validate(), Err(BookingError::Validation(_))));
}

#[tokio::test]
async fn endpoint_reports_missing_parameters_as_bad_request() {
    let server = TestContext::new().server();

    let response = server.get("/api/availability").await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body, json!({ "error": "Validation error: business_id is required" }));
}

#[tokio::test]
async fn endpoint_rejects_malformed_dates() {
    let ctx = TestContext::new();
    let server = ctx.server();

    let response = server
        .get("/api/availability")
        .add_query_param("business_id", ctx.business_id)
        .add_query_param("service_id", ctx.service_id)
        .add_query_param("date", "tomorrow")
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
}
