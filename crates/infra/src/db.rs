//! Connection pool construction.

use std::time::Duration;

use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

use crate::config::DbConfig;

/// Build the process-wide Postgres pool.
///
/// One pool is shared by every request; each repository call checks a
/// connection out for its own duration only.
pub async fn connect_pool(cfg: &DbConfig) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(100)
        .min_connections(10)
        .max_lifetime(Duration::from_secs(3600))
        .acquire_timeout(Duration::from_secs(5))
        .connect(&cfg.url())
        .await
}
