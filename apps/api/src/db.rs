use std::time::Duration;

use anyhow::{bail, Result};
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use tracing::info;

/// Tables owned by the hosted backend; this service never creates them.
const REQUIRED_TABLES: &[&str] = &["profiles", "analyses"];

/// Creates a PostgreSQL pool against the provider's database and checks that
/// the tables the service writes to exist.
pub async fn create_pool(database_url: &str) -> Result<PgPool> {
    info!("Connecting to PostgreSQL...");

    let pool = PgPoolOptions::new()
        .max_connections(10)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url)
        .await?;

    verify_tables(&pool).await?;

    info!("PostgreSQL connection pool established");
    Ok(pool)
}

async fn verify_tables(pool: &PgPool) -> Result<()> {
    let mut missing = Vec::new();
    for table in REQUIRED_TABLES {
        let found: Option<String> = sqlx::query_scalar("SELECT to_regclass($1)::text")
            .bind(format!("public.{table}"))
            .fetch_one(pool)
            .await?;
        if found.is_none() {
            missing.push(*table);
        }
    }
    if !missing.is_empty() {
        bail!("Database is missing required tables: {}", missing.join(", "));
    }
    Ok(())
}
