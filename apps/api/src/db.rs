use anyhow::{Context, Result};
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use tracing::{debug, info};

use crate::store::schema::SCHEMA;

/// Creates and returns a PostgreSQL connection pool.
pub async fn create_pool(database_url: &str, max_connections: u32) -> Result<PgPool> {
    info!("Connecting to PostgreSQL...");

    let pool = PgPoolOptions::new()
        .max_connections(max_connections)
        .connect(database_url)
        .await
        .context("Failed to connect to PostgreSQL")?;

    info!("PostgreSQL connection pool established");
    Ok(pool)
}

/// Creates every table the service needs. Each statement is idempotent.
pub async fn ensure_schema(pool: &PgPool) -> Result<()> {
    for (table, ddl) in SCHEMA {
        debug!("[ensure_schema] creating {table} table...");
        sqlx::query(ddl)
            .execute(pool)
            .await
            .with_context(|| format!("Failed to create table '{table}'"))?;
    }
    info!("Database schema ready ({} tables)", SCHEMA.len());
    Ok(())
}
