use std::time::Duration;

use sqlx::postgres::PgPoolOptions;

use crate::services::store::StoreError;

pub mod queries;

pub use queries::PgStore;

/// Open a pool against `database_url`, bring the relay tables up to date
/// and wrap the pool as the store for options and image metadata.
pub async fn connect(database_url: &str, max_connections: u32) -> Result<PgStore, StoreError> {
    let pool = PgPoolOptions::new()
        .max_connections(max_connections.max(1))
        .acquire_timeout(Duration::from_secs(5))
        .connect(database_url)
        .await?;

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .map_err(|e| sqlx::Error::Migrate(Box::new(e)))?;
    tracing::info!(max_connections, "Agent Photo tables are up to date");

    Ok(PgStore::new(pool))
}
