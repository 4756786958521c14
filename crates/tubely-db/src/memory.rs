use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tubely_core::{AppError, Video};
use uuid::Uuid;

use crate::VideoRepository;

/// Process-local record store. Contents are lost on restart.
#[derive(Default)]
pub struct InMemoryVideoRepository {
    videos: RwLock<HashMap<Uuid, Video>>,
}

impl InMemoryVideoRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a record.
    pub async fn insert(&self, video: Video) {
        self.videos.write().await.insert(video.id, video);
    }
}

#[async_trait]
impl VideoRepository for InMemoryVideoRepository {
    async fn get_video(&self, id: Uuid) -> Result<Option<Video>, AppError> {
        Ok(self.videos.read().await.get(&id).cloned())
    }

    async fn update_video(&self, video: &Video) -> Result<(), AppError> {
        let mut videos = self.videos.write().await;
        match videos.get_mut(&video.id) {
            Some(existing) => {
                *existing = video.clone();
                Ok(())
            }
            None => Err(AppError::Database(format!(
                "Video {} disappeared before update",
                video.id
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_get_missing_video() {
        let repo = InMemoryVideoRepository::new();
        assert!(repo.get_video(Uuid::new_v4()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_update_replaces_record() {
        let repo = InMemoryVideoRepository::new();
        let video = Video::new(Uuid::new_v4(), "Boots", "");
        repo.insert(video.clone()).await;

        let updated = video
            .clone()
            .with_video_url("https://b.s3.us-east-2.amazonaws.com/other/k.mp4".to_string());
        repo.update_video(&updated).await.unwrap();

        let stored = repo.get_video(video.id).await.unwrap().unwrap();
        assert_eq!(stored.video_url, updated.video_url);
    }

    #[tokio::test]
    async fn test_update_unknown_record_fails() {
        let repo = InMemoryVideoRepository::new();
        let video = Video::new(Uuid::new_v4(), "Ghost", "");
        assert!(matches!(
            repo.update_video(&video).await,
            Err(AppError::Database(_))
        ));
    }
}
