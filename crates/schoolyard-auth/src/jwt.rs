//! JWT creation and verification.
//!
//! Tokens are HS256-signed with the shared `JWT_SECRET`. Verification checks
//! the signature and expiry and yields the embedded [`Claims`].

use anyhow::anyhow;
use chrono::Utc;
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};

use schoolyard_config::JwtConfig;
use schoolyard_core::AppError;
use schoolyard_models::{UserRole, ids::UserId};

use crate::claims::Claims;

/// Mints an access token for `user_id`.
///
/// Only the CLI and tests call this; production tokens come from the
/// identity provider.
pub fn create_access_token(
    user_id: UserId,
    email: &str,
    role: UserRole,
    jwt_config: &JwtConfig,
) -> Result<String, AppError> {
    let now = Utc::now().timestamp() as usize;
    let exp = now + jwt_config.access_token_expiry.max(0) as usize;

    let claims = Claims {
        sub: user_id,
        email: email.to_string(),
        role,
        exp,
        iat: now,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(jwt_config.secret.as_bytes()),
    )
    .map_err(|e| AppError::internal(anyhow!("Failed to create token: {}", e)))
}

/// Verifies a bearer token and returns its claims.
///
/// # Errors
///
/// Returns 401 when the signature is wrong, the token expired or the token
/// is malformed.
pub fn verify_token(token: &str, jwt_config: &JwtConfig) -> Result<Claims, AppError> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(jwt_config.secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(|_| AppError::unauthorized(anyhow!("Invalid or expired token")))
}
