use bookwise_core::{
    errors::{BookingError, BookingResult},
    models::appointment::{Appointment, AppointmentStatus},
    time::{TimeInterval, format_time_of_day, minutes_of},
};
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbBusiness {
    pub id: Uuid,
    pub name: String,
    pub working_hours: Option<serde_json::Value>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbStaff {
    pub id: Uuid,
    pub business_id: Uuid,
    pub name: String,
    pub active: bool,
    pub working_hours: Option<serde_json::Value>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbService {
    pub id: Uuid,
    pub business_id: Uuid,
    pub name: String,
    /// Minutes.
    pub duration: i32,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbAppointment {
    pub id: Uuid,
    pub business_id: Uuid,
    pub service_id: Uuid,
    pub staff_id: Option<Uuid>,
    pub customer_id: Uuid,
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

impl DbAppointment {
    pub fn interval(&self) -> TimeInterval {
        TimeInterval::new(minutes_of(self.start_time), minutes_of(self.end_time))
    }

    pub fn into_appointment(self) -> BookingResult<Appointment> {
        let interval = self.interval();
        let status = self.status.parse::<AppointmentStatus>().map_err(|_| {
            BookingError::Database(eyre::eyre!(
                "appointment {} has unknown status '{}'",
                self.id,
                self.status
            ))
        })?;

        Ok(Appointment {
            id: self.id,
            business_id: self.business_id,
            service_id: self.service_id,
            staff_id: self.staff_id,
            customer_id: self.customer_id,
            date: self.date,
            start_time: format_time_of_day(interval.start),
            end_time: format_time_of_day(interval.end),
            status,
            created_at: self.created_at,
        })
    }
}

/// An appointment about to be inserted.
#[derive(Debug, Clone)]
pub struct NewAppointment {
    pub business_id: Uuid,
    pub service_id: Uuid,
    pub staff_id: Option<Uuid>,
    pub customer_id: Uuid,
    pub date: NaiveDate,
    pub interval: TimeInterval,
}
