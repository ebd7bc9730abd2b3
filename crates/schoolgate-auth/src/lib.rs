//! # Schoolgate Auth
//!
//! JWT claims and token utilities for the Schoolgate API.
//!
//! The login flow lives outside this service. Tokens only need to carry the
//! caller's identity (`sub`) and console role so the access evaluator can
//! answer for them.
//!
//! - [`claims`]: The access token claim set
//! - [`jwt`]: Token creation and verification
//!
//! # Example
//!
//! ```ignore
//! use schoolgate_auth::{create_access_token, verify_token};
//! use schoolgate_config::JwtConfig;
//! use schoolgate_models::RoleKey;
//!
//! let config = JwtConfig::from_env();
//! let token = create_access_token("admin-1", RoleKey::Admin, &config)?;
//!
//! let claims = verify_token(&token, &config)?;
//! assert_eq!(claims.role, RoleKey::Admin);
//! ```

pub mod claims;
pub mod jwt;

// Re-export commonly used types at crate root
pub use claims::Claims;
pub use jwt::{create_access_token, verify_token};
