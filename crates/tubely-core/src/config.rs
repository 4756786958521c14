//! Configuration module
//!
//! Settings are read once at startup from the environment (and an optional `.env` file)
//! into an explicit [`Config`] value that is handed to every component that needs it.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use crate::constants::{
    ASSETS_ROUTE, BYTES_PER_MB, DEFAULT_MAX_THUMBNAIL_SIZE_MB, DEFAULT_MAX_VIDEO_SIZE_MB,
    DEFAULT_PORT,
};

/// Server-level settings
#[derive(Clone, Debug)]
pub struct BaseConfig {
    pub server_port: u16,
    pub public_host: String,
    pub cors_origins: Vec<String>,
    pub jwt_secret: String,
    pub environment: String,
    pub log_format: String,
}

/// Ingestion service configuration
#[derive(Clone, Debug)]
pub struct IngestConfig {
    pub base: BaseConfig,
    pub database_url: Option<String>,
    // Object storage for videos
    pub s3_bucket: String,
    pub s3_region: String,
    pub s3_endpoint: Option<String>, // S3-compatible providers (MinIO, etc.)
    // Local public storage for thumbnails
    pub assets_root: PathBuf,
    pub staging_dir: PathBuf,
    // External tools
    pub ffprobe_path: String,
    pub ffmpeg_path: String,
    pub external_tool_timeout: Option<Duration>,
    // Ingress ceilings
    pub max_thumbnail_size_bytes: u64,
    pub max_video_size_bytes: u64,
}

/// Settings the upload pipeline needs at construction time.
#[derive(Clone, Debug)]
pub struct UploadPipelineConfig {
    pub max_thumbnail_size_bytes: u64,
    pub max_video_size_bytes: u64,
    pub staging_dir: PathBuf,
}

/// Application configuration.
#[derive(Clone, Debug)]
pub struct Config(pub Box<IngestConfig>);

impl Config {
    fn as_ingest(&self) -> &IngestConfig {
        &self.0
    }

    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();
        let config = IngestConfig::from_lookup(|key| env::var(key).ok())?;
        Ok(Config(Box::new(config)))
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        self.as_ingest().validate()
    }

    /// Check if the application is running in production mode
    pub fn is_production(&self) -> bool {
        let environment = self.as_ingest().base.environment.to_lowercase();
        environment == "production" || environment == "prod"
    }

    pub fn server_port(&self) -> u16 {
        self.as_ingest().base.server_port
    }

    pub fn public_host(&self) -> &str {
        &self.as_ingest().base.public_host
    }

    pub fn cors_origins(&self) -> &[String] {
        &self.as_ingest().base.cors_origins
    }

    pub fn jwt_secret(&self) -> &str {
        &self.as_ingest().base.jwt_secret
    }

    pub fn environment(&self) -> &str {
        &self.as_ingest().base.environment
    }

    pub fn log_format(&self) -> &str {
        &self.as_ingest().base.log_format
    }

    pub fn database_url(&self) -> Option<&str> {
        self.as_ingest().database_url.as_deref()
    }

    pub fn s3_bucket(&self) -> &str {
        &self.as_ingest().s3_bucket
    }

    pub fn s3_region(&self) -> &str {
        &self.as_ingest().s3_region
    }

    pub fn s3_endpoint(&self) -> Option<&str> {
        self.as_ingest().s3_endpoint.as_deref()
    }

    pub fn assets_root(&self) -> &PathBuf {
        &self.as_ingest().assets_root
    }

    /// Public base URL under which thumbnails in the assets root are reachable.
    pub fn assets_base_url(&self) -> String {
        format!(
            "http://{}:{}{}",
            self.public_host(),
            self.server_port(),
            ASSETS_ROUTE
        )
    }

    pub fn ffprobe_path(&self) -> &str {
        &self.as_ingest().ffprobe_path
    }

    pub fn ffmpeg_path(&self) -> &str {
        &self.as_ingest().ffmpeg_path
    }

    pub fn external_tool_timeout(&self) -> Option<Duration> {
        self.as_ingest().external_tool_timeout
    }

    pub fn max_thumbnail_size_bytes(&self) -> u64 {
        self.as_ingest().max_thumbnail_size_bytes
    }

    pub fn max_video_size_bytes(&self) -> u64 {
        self.as_ingest().max_video_size_bytes
    }

    pub fn pipeline(&self) -> UploadPipelineConfig {
        let ingest = self.as_ingest();
        UploadPipelineConfig {
            max_thumbnail_size_bytes: ingest.max_thumbnail_size_bytes,
            max_video_size_bytes: ingest.max_video_size_bytes,
            staging_dir: ingest.staging_dir.clone(),
        }
    }
}

impl IngestConfig {
    /// Build the configuration from a key lookup. `from_env` passes `std::env::var`.
    pub fn from_lookup<F>(get: F) -> Result<Self, anyhow::Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        let environment = get("ENVIRONMENT").unwrap_or_else(|| "development".to_string());

        let cors_origins_str = get("CORS_ORIGINS").unwrap_or_else(|| "*".to_string());
        let is_production =
            environment.to_lowercase() == "production" || environment.to_lowercase() == "prod";
        if is_production && cors_origins_str.trim() == "*" {
            return Err(anyhow::anyhow!(
                "CORS_ORIGINS cannot be '*' in production. Please specify explicit origins."
            ));
        }

        let cors_origins: Vec<String> = cors_origins_str
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let base = BaseConfig {
            server_port: get("PORT")
                .unwrap_or_else(|| DEFAULT_PORT.to_string())
                .parse()
                .map_err(|_| anyhow::anyhow!("PORT must be a valid number"))?,
            public_host: get("PUBLIC_HOST").unwrap_or_else(|| "localhost".to_string()),
            cors_origins,
            jwt_secret: get("JWT_SECRET")
                .ok_or_else(|| anyhow::anyhow!("JWT_SECRET must be set for authentication"))?,
            environment,
            log_format: get("LOG_FORMAT")
                .unwrap_or_else(|| "compact".to_string())
                .to_lowercase(),
        };

        let external_tool_timeout = match get("EXTERNAL_TOOL_TIMEOUT_SECS") {
            Some(raw) => {
                let secs: u64 = raw.trim().parse().map_err(|_| {
                    anyhow::anyhow!("EXTERNAL_TOOL_TIMEOUT_SECS must be a whole number of seconds")
                })?;
                (secs > 0).then(|| Duration::from_secs(secs))
            }
            None => None,
        };

        let config = IngestConfig {
            base,
            database_url: get("DATABASE_URL").filter(|s| !s.is_empty()),
            s3_bucket: get("S3_BUCKET")
                .ok_or_else(|| anyhow::anyhow!("S3_BUCKET must be set"))?,
            s3_region: get("S3_REGION")
                .or_else(|| get("AWS_REGION"))
                .ok_or_else(|| anyhow::anyhow!("S3_REGION or AWS_REGION must be set"))?,
            s3_endpoint: get("S3_ENDPOINT").filter(|s| !s.is_empty()),
            assets_root: get("ASSETS_ROOT")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("./assets")),
            staging_dir: get("STAGING_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(env::temp_dir),
            ffprobe_path: get("FFPROBE_PATH").unwrap_or_else(|| "ffprobe".to_string()),
            ffmpeg_path: get("FFMPEG_PATH").unwrap_or_else(|| "ffmpeg".to_string()),
            external_tool_timeout,
            max_thumbnail_size_bytes: get("MAX_THUMBNAIL_SIZE_MB")
                .and_then(|s| s.parse::<u64>().ok())
                .unwrap_or(DEFAULT_MAX_THUMBNAIL_SIZE_MB)
                * BYTES_PER_MB,
            max_video_size_bytes: get("MAX_VIDEO_SIZE_MB")
                .and_then(|s| s.parse::<u64>().ok())
                .unwrap_or(DEFAULT_MAX_VIDEO_SIZE_MB)
                * BYTES_PER_MB,
        };

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if self.base.jwt_secret.trim().is_empty() {
            return Err(anyhow::anyhow!("JWT_SECRET must not be empty"));
        }

        if self.s3_bucket.trim().is_empty() {
            return Err(anyhow::anyhow!("S3_BUCKET must not be empty"));
        }

        if let Some(url) = &self.database_url {
            if !url.starts_with("postgres://") && !url.starts_with("postgresql://") {
                return Err(anyhow::anyhow!(
                    "DATABASE_URL must be a valid PostgreSQL connection string"
                ));
            }
        }

        if self.max_thumbnail_size_bytes == 0 || self.max_video_size_bytes == 0 {
            return Err(anyhow::anyhow!("Upload size limits must be greater than zero"));
        }

        if !matches!(self.base.log_format.as_str(), "compact" | "json") {
            return Err(anyhow::anyhow!("LOG_FORMAT must be 'compact' or 'json'"));
        }

        Ok(())
    }
}
