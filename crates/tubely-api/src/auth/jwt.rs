//! HS256 access-token verification.

use axum::http::{header::AUTHORIZATION, HeaderMap};
use jsonwebtoken::{decode, errors::ErrorKind, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use tubely_core::constants::TOKEN_ISSUER;
use tubely_core::AppError;
use uuid::Uuid;

/// Access token claims. `sub` carries the owner's user ID.
#[derive(Debug, Serialize, Deserialize)]
pub struct AccessClaims {
    pub sub: String,
    pub iss: String,
    pub exp: i64,
    pub iat: i64,
}

/// Extract the token from an `Authorization: Bearer <token>` header.
pub fn parse_bearer(headers: &HeaderMap) -> Result<&str, AppError> {
    let header = headers
        .get(AUTHORIZATION)
        .ok_or_else(|| AppError::Unauthenticated("Missing authorization header".to_string()))?
        .to_str()
        .map_err(|_| AppError::Unauthenticated("Invalid authorization header".to_string()))?;

    let token = header
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or_else(|| {
            AppError::Unauthenticated("Invalid authorization header format".to_string())
        })?;

    Ok(token)
}

/// Verify signature, expiry and issuer; return the user ID in `sub`.
pub fn validate_jwt(token: &str, secret: &str) -> Result<Uuid, AppError> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.set_issuer(&[TOKEN_ISSUER]);
    validation.set_required_spec_claims(&["exp", "iss", "sub"]);
    validation.leeway = 0;

    let token_data = decode::<AccessClaims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )
    .map_err(|e| {
        tracing::debug!("JWT validation failed: {}", e);
        match e.kind() {
            ErrorKind::ExpiredSignature => {
                AppError::Unauthenticated("Token has expired".to_string())
            }
            ErrorKind::InvalidIssuer => {
                AppError::Unauthenticated("Invalid token issuer".to_string())
            }
            _ => AppError::Unauthenticated("Couldn't validate JWT".to_string()),
        }
    })?;

    Uuid::parse_str(&token_data.claims.sub)
        .map_err(|_| AppError::Unauthenticated("Invalid token subject".to_string()))
}
