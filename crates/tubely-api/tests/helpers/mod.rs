//! Test helpers: build AppState and router for integration tests.
//!
//! Everything runs in-process: the record store and object store are in memory, ffprobe
//! and ffmpeg are replaced by fakes, and thumbnails and staging use temp directories.

#![allow(dead_code)]

pub mod auth;
pub mod fakes;
pub mod fixtures;

use std::path::Path;
use std::sync::Arc;

use axum_test::TestServer;
use object_store::memory::InMemory;
use tempfile::TempDir;
use tubely_api::setup::routes;
use tubely_api::state::{AppState, MediaConfig};
use tubely_core::{Config, IngestConfig, Video};
use tubely_db::{InMemoryVideoRepository, VideoRepository};
use tubely_processing::{MediaProber, MediaRemuxer};
use tubely_storage::{LocalStorage, S3Storage, Storage};
use uuid::Uuid;

use fakes::{FakeProber, FakeRemuxer};

pub const TEST_JWT_SECRET: &str = "test-jwt-secret";
pub const TEST_BUCKET: &str = "tubely-test";
pub const TEST_REGION: &str = "us-east-2";

/// Test application: server plus handles on every in-process backend.
pub struct TestApp {
    pub server: TestServer,
    pub videos: Arc<InMemoryVideoRepository>,
    pub object_store: Arc<InMemory>,
    pub assets_dir: TempDir,
    pub staging_dir: TempDir,
}

impl TestApp {
    pub fn client(&self) -> &TestServer {
        &self.server
    }

    /// Insert a record owned by `owner` and return it.
    pub async fn create_video(&self, owner: Uuid) -> Video {
        let video = Video::new(owner, "Boots.dev", "A test video");
        self.videos.insert(video.clone()).await;
        video
    }

    pub async fn stored_video(&self, id: Uuid) -> Video {
        self.videos
            .get_video(id)
            .await
            .expect("record store failed")
            .expect("video missing")
    }

    /// Number of entries left in the staging root.
    pub fn staging_entries(&self) -> usize {
        std::fs::read_dir(self.staging_dir.path())
            .expect("Failed to read staging dir")
            .count()
    }
}

/// Options for tests that need non-default collaborators.
pub struct TestAppOptions {
    pub prober: Arc<dyn MediaProber>,
    pub remuxer: Arc<dyn MediaRemuxer>,
    pub max_thumbnail_size_mb: u64,
    /// Run with `ENVIRONMENT=production`.
    pub production: bool,
    /// Replaces the in-memory S3 backend for videos.
    pub video_storage: Option<Arc<dyn Storage>>,
    /// Wrap the record store, e.g. to make updates fail.
    pub wrap_videos: fn(Arc<InMemoryVideoRepository>) -> Arc<dyn VideoRepository>,
}

impl Default for TestAppOptions {
    fn default() -> Self {
        Self {
            prober: Arc::new(FakeProber::dimensions(1920, 1080)),
            remuxer: Arc::new(FakeRemuxer),
            max_thumbnail_size_mb: 1,
            production: false,
            video_storage: None,
            wrap_videos: |repo| -> Arc<dyn VideoRepository> { repo },
        }
    }
}

pub fn test_config(
    assets_root: &Path,
    staging_dir: &Path,
    max_thumbnail_size_mb: u64,
    production: bool,
) -> Config {
    let assets_root = assets_root.to_string_lossy().into_owned();
    let staging_dir = staging_dir.to_string_lossy().into_owned();
    let max_thumbnail_size_mb = max_thumbnail_size_mb.to_string();
    let mut pairs = vec![
        ("JWT_SECRET", TEST_JWT_SECRET),
        ("S3_BUCKET", TEST_BUCKET),
        ("S3_REGION", TEST_REGION),
        ("ASSETS_ROOT", assets_root.as_str()),
        ("STAGING_DIR", staging_dir.as_str()),
        ("MAX_THUMBNAIL_SIZE_MB", max_thumbnail_size_mb.as_str()),
        ("MAX_VIDEO_SIZE_MB", "8"),
    ];
    if production {
        pairs.push(("ENVIRONMENT", "production"));
        pairs.push(("CORS_ORIGINS", "https://tubely.example.com"));
    }
    let config = IngestConfig::from_lookup(|key| {
        pairs
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v.to_string())
    })
    .expect("Failed to build test config");
    Config(Box::new(config))
}

pub async fn setup_test_app() -> TestApp {
    setup_test_app_with(TestAppOptions::default()).await
}

pub async fn setup_test_app_with(options: TestAppOptions) -> TestApp {
    let assets_dir = tempfile::tempdir().expect("Failed to create assets dir");
    let staging_dir = tempfile::tempdir().expect("Failed to create staging dir");
    let config = test_config(
        assets_dir.path(),
        staging_dir.path(),
        options.max_thumbnail_size_mb,
        options.production,
    );

    let object_store = Arc::new(InMemory::new());
    let video_storage: Arc<dyn Storage> = options.video_storage.unwrap_or_else(|| {
        Arc::new(S3Storage::with_store(
            object_store.clone(),
            TEST_BUCKET.to_string(),
            TEST_REGION.to_string(),
            None,
        ))
    });
    let thumbnail_storage: Arc<dyn Storage> = Arc::new(
        LocalStorage::new(assets_dir.path(), config.assets_base_url())
            .await
            .expect("Failed to create local storage"),
    );

    let videos = Arc::new(InMemoryVideoRepository::new());

    let state = Arc::new(AppState {
        media: MediaConfig {
            video_storage,
            thumbnail_storage,
            prober: options.prober,
            remuxer: options.remuxer,
            pipeline: config.pipeline(),
        },
        videos: (options.wrap_videos)(videos.clone()),
        config: config.clone(),
    });

    let app = routes::setup_routes(&config, state).expect("Failed to setup routes");
    let server = TestServer::new(app.into_make_service()).expect("Failed to create test server");

    TestApp {
        server,
        videos,
        object_store,
        assets_dir,
        staging_dir,
    }
}
