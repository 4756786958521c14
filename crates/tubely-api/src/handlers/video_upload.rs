use std::sync::Arc;

use axum::{
    extract::{multipart::MultipartRejection, Multipart, Path, State},
    http::HeaderMap,
    Json,
};
use tubely_core::{AppError, VideoResponse};

use crate::auth::authorize_owner;
use crate::error::HttpAppError;
use crate::services::upload::MediaUploadService;
use crate::state::AppState;

/// `POST /api/video_upload/{videoID}` with a `video` multipart field.
pub async fn upload_video(
    State(state): State<Arc<AppState>>,
    Path(video_id): Path<String>,
    headers: HeaderMap,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<VideoResponse>, HttpAppError> {
    let video = authorize_owner(&state, &headers, &video_id).await?;
    let multipart = multipart.map_err(|e| AppError::InvalidInput(e.body_text()))?;

    tracing::info!(video_id = %video.id, "Uploading video");

    let video = MediaUploadService::new(&state)
        .upload_video(video, multipart)
        .await?;

    Ok(Json(VideoResponse::from(video)))
}
