use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use tubely_api::auth::jwt::AccessClaims;
use tubely_core::constants::TOKEN_ISSUER;
use uuid::Uuid;

use super::TEST_JWT_SECRET;

/// Access token for `user_id`, valid for an hour.
pub fn make_token(user_id: Uuid) -> String {
    make_token_with(user_id, TOKEN_ISSUER, 3600)
}

pub fn make_token_with(user_id: Uuid, issuer: &str, expires_in_secs: i64) -> String {
    let now = chrono::Utc::now().timestamp();
    let claims = AccessClaims {
        sub: user_id.to_string(),
        iss: issuer.to_string(),
        exp: now + expires_in_secs,
        iat: now,
    };
    encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(TEST_JWT_SECRET.as_bytes()),
    )
    .expect("Failed to sign test token")
}

pub fn bearer(user_id: Uuid) -> String {
    format!("Bearer {}", make_token(user_id))
}
