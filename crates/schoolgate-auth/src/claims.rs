//! JWT claim structures for access tokens.

use schoolgate_models::RoleKey;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// JWT claims for access tokens.
///
/// # Fields
///
/// - `sub`: Caller identity (subject); edit sessions are keyed by it
/// - `role`: Console role the caller acts as
/// - `exp`: Token expiration timestamp
/// - `iat`: Token issued-at timestamp
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Claims {
    /// Caller identity (subject claim)
    pub sub: String,
    /// Console role
    pub role: RoleKey,
    /// Token expiration timestamp (Unix timestamp)
    pub exp: usize,
    /// Token issued-at timestamp (Unix timestamp)
    pub iat: usize,
}
