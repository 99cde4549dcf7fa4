//! Postgres pool and migrations.
use crate::config::PostgresConfig;
use sqlx::postgres::{PgConnectOptions, PgPoolOptions};
use sqlx::{Pool, Postgres};
use std::str::FromStr;
use std::time::Duration;

/// Open a connection pool. The URL is never logged since it may carry credentials.
pub async fn create_pool(config: &PostgresConfig) -> Result<Pool<Postgres>, sqlx::Error> {
    let connect_options = PgConnectOptions::from_str(&config.url)?;
    PgPoolOptions::new()
        .max_connections(config.max_connections)
        .acquire_timeout(Duration::from_millis(config.connect_timeout_ms))
        .connect_with(connect_options)
        .await
}

/// Apply the embedded schema migrations before any request is served.
pub async fn run_migrations(pool: &Pool<Postgres>) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await
}
