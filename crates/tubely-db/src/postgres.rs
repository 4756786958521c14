//! Video repository: reads and URL updates for the videos table.

use std::path::Path;

use async_trait::async_trait;
use sqlx::{PgPool, Postgres};
use tubely_core::{AppError, Video};
use uuid::Uuid;

use crate::VideoRepository;

/// Apply pending migrations from `migrations_dir`.
pub async fn run_migrations(pool: &PgPool, migrations_dir: &Path) -> Result<(), AppError> {
    let migrator = sqlx::migrate::Migrator::new(migrations_dir.to_path_buf())
        .await
        .map_err(|e| AppError::Database(format!("Failed to load migrations: {}", e)))?;
    migrator
        .run(pool)
        .await
        .map_err(|e| AppError::Database(format!("Failed to run migrations: {}", e)))?;
    Ok(())
}

#[derive(Clone)]
pub struct PgVideoRepository {
    pool: PgPool,
}

impl PgVideoRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl VideoRepository for PgVideoRepository {
    #[tracing::instrument(skip(self), fields(db.table = "videos"))]
    async fn get_video(&self, id: Uuid) -> Result<Option<Video>, AppError> {
        let video = sqlx::query_as::<Postgres, Video>(
            r#"
            SELECT id, user_id, title, description, thumbnail_url, video_url,
                   created_at, updated_at
            FROM videos
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(video)
    }

    #[tracing::instrument(skip(self, video), fields(db.table = "videos", video_id = %video.id))]
    async fn update_video(&self, video: &Video) -> Result<(), AppError> {
        let result = sqlx::query(
            r#"
            UPDATE videos
            SET title = $2, description = $3, thumbnail_url = $4, video_url = $5,
                updated_at = $6
            WHERE id = $1
            "#,
        )
        .bind(video.id)
        .bind(&video.title)
        .bind(&video.description)
        .bind(&video.thumbnail_url)
        .bind(&video.video_url)
        .bind(video.updated_at)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::Database(format!(
                "Video {} disappeared before update",
                video.id
            )));
        }

        Ok(())
    }
}
