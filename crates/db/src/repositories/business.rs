use crate::models::DbBusiness;
use eyre::Result;
use sqlx::{Pool, Postgres};
use uuid::Uuid;

pub async fn get_business_by_id(pool: &Pool<Postgres>, id: Uuid) -> Result<Option<DbBusiness>> {
    tracing::debug!("Getting business by id: {}", id);

    let business = sqlx::query_as::<_, DbBusiness>(
        r#"
        SELECT id, name, working_hours, created_at
        FROM businesses
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(business)
}
