//! Record store setup

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use sqlx::postgres::PgPoolOptions;
use tubely_core::Config;
use tubely_db::{run_migrations, InMemoryVideoRepository, PgVideoRepository, VideoRepository};

const DB_MAX_CONNECTIONS: u32 = 10;
const DB_ACQUIRE_TIMEOUT: Duration = Duration::from_secs(30);

/// PostgreSQL when `DATABASE_URL` is set (migrations applied on startup), otherwise an
/// in-process store.
pub async fn setup_record_store(config: &Config) -> Result<Arc<dyn VideoRepository>> {
    let Some(database_url) = config.database_url() else {
        tracing::warn!("DATABASE_URL not set, using in-memory record store");
        return Ok(Arc::new(InMemoryVideoRepository::new()));
    };

    tracing::info!("Connecting to database...");
    let pool = PgPoolOptions::new()
        .max_connections(DB_MAX_CONNECTIONS)
        .acquire_timeout(DB_ACQUIRE_TIMEOUT)
        .idle_timeout(Duration::from_secs(600))
        .max_lifetime(Duration::from_secs(1800))
        .connect(database_url)
        .await
        .context("Failed to connect to database")?;

    tracing::info!(
        max_connections = DB_MAX_CONNECTIONS,
        "Database connected successfully"
    );

    // Path: workspace migrations/ from crate root
    let migrations_dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("../../migrations");
    run_migrations(&pool, &migrations_dir)
        .await
        .context("Failed to run database migrations")?;
    tracing::info!("Database migrations applied");

    Ok(Arc::new(PgVideoRepository::new(pool)))
}
