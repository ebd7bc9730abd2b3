//! JWT (JSON Web Token) utilities.
//!
//! Tokens are HS256-signed with `JWT_SECRET` and carry the caller's role.
//! The service only verifies them; minting exists for the CLI and tests.

use chrono::Utc;
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};

use schoolgate_config::JwtConfig;
use schoolgate_core::AppError;
use schoolgate_models::RoleKey;

use crate::claims::Claims;

/// Creates an access token for `sub` acting as `role`.
///
/// # Errors
///
/// Returns an internal error if token encoding fails.
pub fn create_access_token(
    sub: &str,
    role: RoleKey,
    jwt_config: &JwtConfig,
) -> Result<String, AppError> {
    let now = Utc::now().timestamp();
    let exp = (now + jwt_config.access_token_expiry).max(0);

    let claims = Claims {
        sub: sub.to_string(),
        role,
        exp: exp as usize,
        iat: now as usize,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(jwt_config.secret.as_bytes()),
    )
    .map_err(|e| AppError::internal_error(format!("Failed to create token: {}", e)))
}

/// Verifies an access token and returns the embedded claims.
///
/// # Errors
///
/// Returns an unauthorized error if the signature is invalid, the token has
/// expired, or the claims are malformed (including an unknown role).
pub fn verify_token(token: &str, jwt_config: &JwtConfig) -> Result<Claims, AppError> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(jwt_config.secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(|_| AppError::unauthorized("Invalid or expired token".to_string()))
}
