//! Appointment storage and transactional booking admission.
//!
//! Creating or moving an appointment runs the busy-interval read, the overlap
//! check and the write inside one transaction holding advisory locks on the
//! business calendar of the target date and, for staff bookings, the staff
//! calendar, so two concurrent requests that read each other's bookings
//! cannot both pass the check.

use async_trait::async_trait;
use bookwise_core::{
    admission::{self, BusyIntervalSource, ResourceScope},
    errors::{BookingError, BookingResult},
    models::appointment::AppointmentStatus,
    time::{Minutes, TimeInterval, minutes_of, naive_time_of},
};
use chrono::{NaiveDate, NaiveTime};
use eyre::Result;
use sqlx::{Executor, PgConnection, Pool, Postgres};
use uuid::Uuid;

use crate::models::{DbAppointment, NewAppointment};

const APPOINTMENT_COLUMNS: &str =
    "id, business_id, service_id, staff_id, customer_id, date, start_time, end_time, status, created_at";

fn db_error(err: sqlx::Error) -> BookingError {
    BookingError::Database(eyre::Report::new(err))
}

fn naive_bounds(interval: &TimeInterval) -> BookingResult<(NaiveTime, NaiveTime)> {
    match (naive_time_of(interval.start), naive_time_of(interval.end)) {
        (Some(start), Some(end)) => Ok((start, end)),
        _ => Err(BookingError::Validation(format!(
            "appointment {interval} must start and end within the same day"
        ))),
    }
}

/// Intervals of all non-cancelled appointments in `scope` on `date`,
/// optionally ignoring one appointment.
pub async fn fetch_busy_intervals<'e, E>(
    executor: E,
    scope: &ResourceScope,
    date: NaiveDate,
    exclude: Option<Uuid>,
) -> Result<Vec<TimeInterval>>
where
    E: Executor<'e, Database = Postgres>,
{
    let rows = sqlx::query_as::<_, (NaiveTime, NaiveTime)>(
        r#"
        SELECT start_time, end_time
        FROM appointments
        WHERE business_id = $1
          AND ($2::uuid IS NULL OR staff_id = $2)
          AND date = $3
          AND status <> $4
          AND ($5::uuid IS NULL OR id <> $5)
        ORDER BY start_time ASC
        "#,
    )
    .bind(scope.business_id())
    .bind(scope.staff_id())
    .bind(date)
    .bind(AppointmentStatus::Canceled.as_str())
    .bind(exclude)
    .fetch_all(executor)
    .await?;

    Ok(rows
        .into_iter()
        .map(|(start, end)| TimeInterval::new(minutes_of(start), minutes_of(end)))
        .collect())
}

/// Busy-interval reads against the connection pool.
#[derive(Debug, Clone)]
pub struct PgBusyIntervals {
    pool: Pool<Postgres>,
}

impl PgBusyIntervals {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BusyIntervalSource for PgBusyIntervals {
    async fn busy_intervals(
        &self,
        scope: &ResourceScope,
        date: NaiveDate,
    ) -> Result<Vec<TimeInterval>> {
        fetch_busy_intervals(&self.pool, scope, date, None).await
    }
}

/// Serialises writers of one calendar until the enclosing transaction ends.
///
/// Locks are taken in [`ResourceScope::lock_keys`] order, so business-wide
/// and staff admissions on the same date wait for each other.
async fn lock_calendar(
    conn: &mut PgConnection,
    scope: &ResourceScope,
    date: NaiveDate,
) -> BookingResult<()> {
    for key in scope.lock_keys(date) {
        sqlx::query("SELECT pg_advisory_xact_lock(hashtext($1)::bigint)")
            .bind(key)
            .execute(&mut *conn)
            .await
            .map_err(db_error)?;
    }
    Ok(())
}

/// Inserts `new` unless it overlaps a non-cancelled appointment on the same
/// calendar, in which case nothing is written and
/// [`BookingError::SlotUnavailable`] is returned.
pub async fn create_appointment_exclusive(
    pool: &Pool<Postgres>,
    new: &NewAppointment,
) -> BookingResult<DbAppointment> {
    let (start_time, end_time) = naive_bounds(&new.interval)?;
    let scope = ResourceScope::new(new.business_id, new.staff_id);

    let mut tx = pool.begin().await.map_err(db_error)?;
    lock_calendar(&mut tx, &scope, new.date).await?;

    let busy = fetch_busy_intervals(&mut *tx, &scope, new.date, None).await?;
    admission::admit(&new.interval, &busy)?;

    let appointment = sqlx::query_as::<_, DbAppointment>(&format!(
        r#"
        INSERT INTO appointments
            (id, business_id, service_id, staff_id, customer_id, date, start_time, end_time, status, created_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, NOW())
        RETURNING {APPOINTMENT_COLUMNS}
        "#
    ))
    .bind(Uuid::new_v4())
    .bind(new.business_id)
    .bind(new.service_id)
    .bind(new.staff_id)
    .bind(new.customer_id)
    .bind(new.date)
    .bind(start_time)
    .bind(end_time)
    .bind(AppointmentStatus::Booked.as_str())
    .fetch_one(&mut *tx)
    .await
    .map_err(db_error)?;

    tx.commit().await.map_err(db_error)?;

    tracing::info!(
        "Booked appointment {} on {} at {}",
        appointment.id,
        appointment.date,
        new.interval
    );
    Ok(appointment)
}

/// Moves an appointment to `date` at `start` for `duration` minutes, under the
/// same admission rule as creation. The appointment itself is not counted as
/// busy.
pub async fn reschedule_appointment_exclusive(
    pool: &Pool<Postgres>,
    id: Uuid,
    date: NaiveDate,
    start: Minutes,
    duration: Minutes,
) -> BookingResult<DbAppointment> {
    let mut tx = pool.begin().await.map_err(db_error)?;

    let current = sqlx::query_as::<_, DbAppointment>(&format!(
        "SELECT {APPOINTMENT_COLUMNS} FROM appointments WHERE id = $1 FOR UPDATE"
    ))
    .bind(id)
    .fetch_optional(&mut *tx)
    .await
    .map_err(db_error)?
    .ok_or_else(|| BookingError::NotFound(format!("Appointment with ID {} not found", id)))?;

    if current.status != AppointmentStatus::Booked.as_str() {
        return Err(BookingError::Validation(format!(
            "Only booked appointments can be rescheduled; appointment {} is {}",
            id, current.status
        )));
    }

    let interval = TimeInterval::starting_at(start, duration);
    let (start_time, end_time) = naive_bounds(&interval)?;
    let scope = ResourceScope::new(current.business_id, current.staff_id);

    lock_calendar(&mut tx, &scope, date).await?;
    let busy = fetch_busy_intervals(&mut *tx, &scope, date, Some(id)).await?;
    admission::admit(&interval, &busy)?;

    let appointment = sqlx::query_as::<_, DbAppointment>(&format!(
        r#"
        UPDATE appointments
        SET date = $2, start_time = $3, end_time = $4
        WHERE id = $1
        RETURNING {APPOINTMENT_COLUMNS}
        "#
    ))
    .bind(id)
    .bind(date)
    .bind(start_time)
    .bind(end_time)
    .fetch_one(&mut *tx)
    .await
    .map_err(db_error)?;

    tx.commit().await.map_err(db_error)?;
    Ok(appointment)
}

pub async fn get_appointment_by_id(pool: &Pool<Postgres>, id: Uuid) -> Result<Option<DbAppointment>> {
    let appointment = sqlx::query_as::<_, DbAppointment>(&format!(
        "SELECT {APPOINTMENT_COLUMNS} FROM appointments WHERE id = $1"
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(appointment)
}

/// Sets the status of an appointment.
///
/// A canceled appointment may only stay canceled: its window may already be
/// booked again, so moving it to a status that occupies the calendar fails
/// with [`BookingError::Validation`]. The check is part of the `UPDATE`, so a
/// concurrent cancel cannot slip in between check and write.
pub async fn update_appointment_status(
    pool: &Pool<Postgres>,
    id: Uuid,
    status: AppointmentStatus,
) -> BookingResult<DbAppointment> {
    let canceled = AppointmentStatus::Canceled.as_str();
    let updated = sqlx::query_as::<_, DbAppointment>(&format!(
        r#"
        UPDATE appointments
        SET status = $2
        WHERE id = $1 AND (status <> $3 OR $2 = $3)
        RETURNING {APPOINTMENT_COLUMNS}
        "#
    ))
    .bind(id)
    .bind(status.as_str())
    .bind(canceled)
    .fetch_optional(pool)
    .await
    .map_err(db_error)?;

    match updated {
        Some(appointment) => {
            tracing::debug!("Appointment {} is now {}", id, status);
            Ok(appointment)
        }
        None => match get_appointment_by_id(pool, id).await? {
            Some(_) => Err(BookingError::Validation(format!(
                "Appointment {} is canceled and cannot become {}",
                id, status
            ))),
            None => Err(BookingError::NotFound(format!(
                "Appointment with ID {} not found",
                id
            ))),
        },
    }
}
