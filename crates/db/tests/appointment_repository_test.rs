//! Runs against PostgreSQL when `TEST_DATABASE_URL` is set; skipped otherwise.

use std::time::Duration;

use bookwise_core::{
    admission::ResourceScope,
    errors::BookingError,
    models::appointment::AppointmentStatus,
    time::TimeInterval,
};
use bookwise_db::{
    DbPool,
    mock::connect_test_database,
    models::NewAppointment,
    repositories::appointment::{
        create_appointment_exclusive, fetch_busy_intervals, reschedule_appointment_exclusive,
        update_appointment_status,
    },
};
use chrono::NaiveDate;
use pretty_assertions::assert_eq;
use uuid::Uuid;

struct Fixture {
    pool: DbPool,
    business_id: Uuid,
    service_id: Uuid,
    staff_id: Uuid,
}

impl Fixture {
    /// A fresh business with one 60-minute service and one staff member
    /// offering it. Returns `None` without a test database.
    async fn new() -> Option<Self> {
        let pool = connect_test_database().await.expect("test database")?;
        let business_id = Uuid::new_v4();
        let service_id = Uuid::new_v4();
        let staff_id = Uuid::new_v4();

        sqlx::query("INSERT INTO businesses (id, name) VALUES ($1, 'Test Salon')")
            .bind(business_id)
            .execute(&pool)
            .await
            .unwrap();
        sqlx::query("INSERT INTO services (id, business_id, name, duration) VALUES ($1, $2, 'Cut', 60)")
            .bind(service_id)
            .bind(business_id)
            .execute(&pool)
            .await
            .unwrap();
        sqlx::query("INSERT INTO staff (id, business_id, name) VALUES ($1, $2, 'Alex')")
            .bind(staff_id)
            .bind(business_id)
            .execute(&pool)
            .await
            .unwrap();
        sqlx::query("INSERT INTO staff_services (staff_id, service_id) VALUES ($1, $2)")
            .bind(staff_id)
            .bind(service_id)
            .execute(&pool)
            .await
            .unwrap();

        Some(Self {
            pool,
            business_id,
            service_id,
            staff_id,
        })
    }

    fn booking(&self, staff_id: Option<Uuid>, start: i32) -> NewAppointment {
        NewAppointment {
            business_id: self.business_id,
            service_id: self.service_id,
            staff_id,
            customer_id: Uuid::new_v4(),
            date: date(),
            interval: TimeInterval::starting_at(start, 60),
        }
    }

    async fn appointment_count(&self) -> i64 {
        sqlx::query_scalar("SELECT COUNT(*) FROM appointments WHERE business_id = $1")
            .bind(self.business_id)
            .fetch_one(&self.pool)
            .await
            .unwrap()
    }
}

fn date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
}

#[tokio::test]
async fn canceled_appointments_leave_the_busy_set() {
    let Some(fx) = Fixture::new().await else { return };
    let scope = ResourceScope::new(fx.business_id, Some(fx.staff_id));

    let booked = create_appointment_exclusive(&fx.pool, &fx.booking(Some(fx.staff_id), 600))
        .await
        .unwrap();
    assert_eq!(
        fetch_busy_intervals(&fx.pool, &scope, date(), None).await.unwrap(),
        vec![TimeInterval::new(600, 660)]
    );

    update_appointment_status(&fx.pool, booked.id, AppointmentStatus::Canceled)
        .await
        .unwrap();
    assert_eq!(
        fetch_busy_intervals(&fx.pool, &scope, date(), None).await.unwrap(),
        Vec::new()
    );

    create_appointment_exclusive(&fx.pool, &fx.booking(Some(fx.staff_id), 600))
        .await
        .unwrap();
}

#[tokio::test]
async fn conflicting_booking_writes_nothing() {
    let Some(fx) = Fixture::new().await else { return };

    create_appointment_exclusive(&fx.pool, &fx.booking(Some(fx.staff_id), 600))
        .await
        .unwrap();
    let result = create_appointment_exclusive(&fx.pool, &fx.booking(Some(fx.staff_id), 630)).await;

    assert!(matches!(result, Err(BookingError::SlotUnavailable(_))));
    assert_eq!(fx.appointment_count().await, 1);
}

#[tokio::test]
async fn business_booking_sees_staff_bookings() {
    let Some(fx) = Fixture::new().await else { return };

    create_appointment_exclusive(&fx.pool, &fx.booking(Some(fx.staff_id), 600))
        .await
        .unwrap();
    let result = create_appointment_exclusive(&fx.pool, &fx.booking(None, 600)).await;

    assert!(matches!(result, Err(BookingError::SlotUnavailable(_))));
    assert_eq!(fx.appointment_count().await, 1);
}

#[tokio::test]
async fn reschedule_may_overlap_its_own_window() {
    let Some(fx) = Fixture::new().await else { return };

    let booked = create_appointment_exclusive(&fx.pool, &fx.booking(Some(fx.staff_id), 600))
        .await
        .unwrap();
    let moved = reschedule_appointment_exclusive(&fx.pool, booked.id, date(), 630, 60)
        .await
        .unwrap();

    assert_eq!(moved.id, booked.id);
    assert_eq!(moved.interval(), TimeInterval::new(630, 690));
    assert_eq!(fx.appointment_count().await, 1);
}

#[tokio::test]
async fn reschedule_onto_another_booking_is_rejected() {
    let Some(fx) = Fixture::new().await else { return };

    let first = create_appointment_exclusive(&fx.pool, &fx.booking(Some(fx.staff_id), 540))
        .await
        .unwrap();
    create_appointment_exclusive(&fx.pool, &fx.booking(Some(fx.staff_id), 660))
        .await
        .unwrap();

    let result = reschedule_appointment_exclusive(&fx.pool, first.id, date(), 630, 60).await;

    assert!(matches!(result, Err(BookingError::SlotUnavailable(_))));
}

#[tokio::test]
async fn canceled_appointment_cannot_be_reoccupied() {
    let Some(fx) = Fixture::new().await else { return };

    let booked = create_appointment_exclusive(&fx.pool, &fx.booking(Some(fx.staff_id), 600))
        .await
        .unwrap();
    update_appointment_status(&fx.pool, booked.id, AppointmentStatus::Canceled)
        .await
        .unwrap();

    let completed =
        update_appointment_status(&fx.pool, booked.id, AppointmentStatus::Completed).await;
    assert!(matches!(completed, Err(BookingError::Validation(_))));

    let canceled_again =
        update_appointment_status(&fx.pool, booked.id, AppointmentStatus::Canceled).await;
    assert!(canceled_again.is_ok());

    let missing =
        update_appointment_status(&fx.pool, Uuid::new_v4(), AppointmentStatus::Completed).await;
    assert!(matches!(missing, Err(BookingError::NotFound(_))));
}

#[tokio::test]
async fn staff_admission_waits_for_the_business_calendar_lock() {
    let Some(fx) = Fixture::new().await else { return };
    let business_key = ResourceScope::new(fx.business_id, None).calendar_key(date());

    let mut holder = fx.pool.begin().await.unwrap();
    sqlx::query("SELECT pg_advisory_xact_lock(hashtext($1)::bigint)")
        .bind(&business_key)
        .execute(&mut *holder)
        .await
        .unwrap();

    let pool = fx.pool.clone();
    let new = fx.booking(Some(fx.staff_id), 600);
    let pending = tokio::spawn(async move { create_appointment_exclusive(&pool, &new).await });

    tokio::time::sleep(Duration::from_millis(300)).await;
    assert!(!pending.is_finished());

    holder.commit().await.unwrap();
    let booked = tokio::time::timeout(Duration::from_secs(5), pending)
        .await
        .expect("admission resumes once the lock is released")
        .unwrap();
    assert!(booked.is_ok());
}
