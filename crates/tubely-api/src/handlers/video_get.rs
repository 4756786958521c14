use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::HeaderMap,
    Json,
};
use tubely_core::VideoResponse;

use crate::auth::authorize_owner;
use crate::error::HttpAppError;
use crate::state::AppState;

/// `GET /api/videos/{videoID}`: the record, for its owner only.
pub async fn get_video(
    State(state): State<Arc<AppState>>,
    Path(video_id): Path<String>,
    headers: HeaderMap,
) -> Result<Json<VideoResponse>, HttpAppError> {
    let video = authorize_owner(&state, &headers, &video_id).await?;
    Ok(Json(VideoResponse::from(video)))
}
