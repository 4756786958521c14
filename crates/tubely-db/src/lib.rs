//! Video record store
//!
//! The upload pipeline reads a record once (to check ownership) and writes it once (to
//! attach the placed asset URL). [`VideoRepository`] is that narrow seam; PostgreSQL backs
//! it in production and [`InMemoryVideoRepository`] backs local development and tests.

mod memory;
mod postgres;

pub use memory::InMemoryVideoRepository;
pub use postgres::{run_migrations, PgVideoRepository};

use async_trait::async_trait;
use tubely_core::{AppError, Video};
use uuid::Uuid;

#[async_trait]
pub trait VideoRepository: Send + Sync {
    /// Fetch a record by ID; `Ok(None)` when it does not exist.
    async fn get_video(&self, id: Uuid) -> Result<Option<Video>, AppError>;

    /// Persist the mutable fields of an existing record.
    async fn update_video(&self, video: &Video) -> Result<(), AppError>;
}
