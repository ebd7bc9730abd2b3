//! Middleware modules for request processing.
//!
//! - [`auth`]: Bearer token extractor carrying the caller's role
//! - [`role`]: Role checks and the `require_admin` route layer
//!
//! # Example
//!
//! ```ignore
//! use crate::middleware::auth::AuthUser;
//!
//! async fn my_access(State(state): State<AppState>, auth_user: AuthUser) -> impl IntoResponse {
//!     let evaluator = state.store.evaluator();
//!     evaluator.can_view(auth_user.role(), "Fees")
//! }
//! ```

pub mod auth;
pub mod role;
