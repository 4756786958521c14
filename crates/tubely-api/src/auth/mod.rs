//! Owner-only access to video records.
//!
//! Every route that touches a record runs [`authorize_owner`] before it reads the request
//! body, so an unauthenticated or foreign caller never causes staging I/O.

pub mod jwt;

use axum::http::HeaderMap;
use tubely_core::{AppError, Video};
use uuid::Uuid;

use crate::state::AppState;

/// Resolve `raw_video_id` and confirm the bearer token's subject owns it.
///
/// Checks run in a fixed order: ID syntax, token, record lookup, ownership.
#[tracing::instrument(skip(state, headers))]
pub async fn authorize_owner(
    state: &AppState,
    headers: &HeaderMap,
    raw_video_id: &str,
) -> Result<Video, AppError> {
    let video_id = Uuid::parse_str(raw_video_id)?;

    let token = jwt::parse_bearer(headers)?;
    let user_id = jwt::validate_jwt(token, state.config.jwt_secret())?;

    let video = state
        .videos
        .get_video(video_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Couldn't find video".to_string()))?;

    if !video.is_owned_by(user_id) {
        tracing::debug!(%video_id, %user_id, "Caller does not own video");
        return Err(AppError::Unauthorized(
            "You are not the owner of this video".to_string(),
        ));
    }

    Ok(video)
}
