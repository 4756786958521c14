//! Route configuration and setup

mod health;

use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    http::{HeaderValue, Method},
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tubely_core::constants::ASSETS_ROUTE;
use tubely_core::Config;

use crate::handlers;
use crate::middleware::{error_details_middleware, ErrorDetailsConfig};
use crate::state::AppState;

/// Room for multipart boundaries and part headers on top of an asset ceiling.
const MULTIPART_OVERHEAD_BYTES: u64 = 64 * 1024;

/// Setup all application routes
pub fn setup_routes(config: &Config, state: Arc<AppState>) -> Result<Router, anyhow::Error> {
    let cors = setup_cors(config)?;
    let error_details_config = Arc::new(ErrorDetailsConfig::new(config.is_production()));

    let api_routes = Router::new()
        .route(
            "/api/thumbnail_upload/{video_id}",
            post(handlers::thumbnail_upload::upload_thumbnail)
                .layer(body_limit(config.max_thumbnail_size_bytes())),
        )
        .route(
            "/api/video_upload/{video_id}",
            post(handlers::video_upload::upload_video)
                .layer(body_limit(config.max_video_size_bytes())),
        )
        .route("/api/videos/{video_id}", get(handlers::video_get::get_video))
        .with_state(state);

    let app = Router::new()
        .route("/health", get(health::health_check))
        .merge(api_routes)
        .nest_service(ASSETS_ROUTE, ServeDir::new(config.assets_root()))
        .layer(axum::middleware::from_fn_with_state(
            error_details_config,
            error_details_middleware,
        ))
        .layer(cors)
        .layer(TraceLayer::new_for_http());

    Ok(app)
}

/// Transport-level cap for one upload route: the asset ceiling plus multipart framing.
/// Enforced lazily as the body is read, so the owner check still runs first.
fn body_limit(ceiling: u64) -> DefaultBodyLimit {
    let limit = ceiling.saturating_add(MULTIPART_OVERHEAD_BYTES);
    DefaultBodyLimit::max(usize::try_from(limit).unwrap_or(usize::MAX))
}

/// Setup CORS configuration
fn setup_cors(config: &Config) -> Result<CorsLayer, anyhow::Error> {
    let cors = if config.cors_origins().iter().any(|o| o == "*") {
        tracing::warn!("CORS configured to allow all origins - not recommended for production");
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
            .allow_headers(Any)
    } else {
        let origins = config
            .cors_origins()
            .iter()
            .map(|o| o.parse::<HeaderValue>())
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| anyhow::anyhow!("Invalid CORS origin: {}", e))?;

        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
            .allow_headers(Any)
    };
    Ok(cors)
}
