pub mod repositories;

use eyre::{Result, WrapErr};

/// Connects to the database named by `TEST_DATABASE_URL` and bootstraps the
/// schema, or returns `None` when the variable is unset so database-backed
/// tests can skip.
pub async fn connect_test_database() -> Result<Option<crate::DbPool>> {
    let Ok(database_url) = std::env::var("TEST_DATABASE_URL") else {
        return Ok(None);
    };

    let pool = sqlx::postgres::PgPoolOptions::new()
        .max_connections(4)
        .connect(&database_url)
        .await
        .wrap_err("Failed to connect to test database")?;

    crate::schema::initialize_database(&pool)
        .await
        .wrap_err("Failed to initialize test database schema")?;

    Ok(Some(pool))
}
