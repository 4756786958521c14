use std::sync::Arc;

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};

use crate::error::ErrorDetails;

/// Error detail exposure configuration
#[derive(Clone)]
pub struct ErrorDetailsConfig {
    pub is_production: bool,
}

impl ErrorDetailsConfig {
    pub fn new(is_production: bool) -> Self {
        Self { is_production }
    }
}

/// Error details middleware
///
/// Error responses are rendered without `details` and `error_type`. Outside production,
/// the detailed body attached by [`crate::error::HttpAppError`] replaces the redacted one.
/// Sensitive errors never carry a detailed body.
pub async fn error_details_middleware(
    State(config): State<Arc<ErrorDetailsConfig>>,
    request: Request,
    next: Next,
) -> Response {
    let mut response = next.run(request).await;

    let Some(ErrorDetails(detailed)) = response.extensions_mut().remove::<ErrorDetails>() else {
        return response;
    };
    if config.is_production {
        return response;
    }

    (response.status(), Json(detailed)).into_response()
}
