//! PostgreSQL persistence for businesses, staff, services and appointments.
//!
//! Repositories are free functions over a [`DbPool`]. Booking writes that must
//! not overlap go through the `*_exclusive` operations in
//! [`repositories::appointment`].

pub mod models;
pub mod repositories;
pub mod schema;

pub mod mock;

use std::time::Duration;

use eyre::{Result, WrapErr};
use sqlx::postgres::PgPoolOptions;
use sqlx::{Pool, Postgres};

pub type DbPool = Pool<Postgres>;

const MAX_CONNECTIONS: u32 = 5;
const ACQUIRE_TIMEOUT: Duration = Duration::from_secs(5);

pub async fn create_pool(database_url: &str) -> Result<DbPool> {
    let pool = PgPoolOptions::new()
        .max_connections(MAX_CONNECTIONS)
        .acquire_timeout(ACQUIRE_TIMEOUT)
        .connect(database_url)
        .await
        .wrap_err("Failed to open the PostgreSQL pool")?;

    tracing::info!("Connected to PostgreSQL with up to {} connections", MAX_CONNECTIONS);
    Ok(pool)
}
