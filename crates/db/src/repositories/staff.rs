use crate::models::DbStaff;
use eyre::Result;
use serde_json::Value;
use sqlx::{Pool, Postgres};
use uuid::Uuid;

pub async fn get_staff_by_id(pool: &Pool<Postgres>, id: Uuid) -> Result<Option<DbStaff>> {
    let staff = sqlx::query_as::<_, DbStaff>(
        r#"
        SELECT id, business_id, name, active, working_hours, created_at
        FROM staff
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(staff)
}

/// Staff member who belongs to `business_id`, is active, and offers `service_id`.
pub async fn get_bookable_staff(
    pool: &Pool<Postgres>,
    staff_id: Uuid,
    business_id: Uuid,
    service_id: Uuid,
) -> Result<Option<DbStaff>> {
    let staff = sqlx::query_as::<_, DbStaff>(
        r#"
        SELECT s.id, s.business_id, s.name, s.active, s.working_hours, s.created_at
        FROM staff s
        JOIN staff_services ss ON ss.staff_id = s.id
        WHERE s.id = $1 AND s.business_id = $2 AND ss.service_id = $3 AND s.active
        "#,
    )
    .bind(staff_id)
    .bind(business_id)
    .bind(service_id)
    .fetch_optional(pool)
    .await?;

    if staff.is_none() {
        tracing::debug!(
            "Staff {} not bookable for service {} in business {}",
            staff_id, service_id, business_id
        );
    }

    Ok(staff)
}

pub async fn update_working_hours(
    pool: &Pool<Postgres>,
    id: Uuid,
    working_hours: &Value,
) -> Result<Option<DbStaff>> {
    let staff = sqlx::query_as::<_, DbStaff>(
        r#"
        UPDATE staff
        SET working_hours = $2
        WHERE id = $1
        RETURNING id, business_id, name, active, working_hours, created_at
        "#,
    )
    .bind(id)
    .bind(working_hours)
    .fetch_optional(pool)
    .await?;

    Ok(staff)
}
