//! # Schoolgate API
//!
//! HTTP service over the role-scoped feature access and section visibility
//! engine in [`schoolgate_access`].
//!
//! ## Overview
//!
//! The school console asks this service two kinds of questions:
//!
//! - **Read path**: may the calling role view/create/edit/delete a feature,
//!   and which dashboard, settings, students, teachers and assignments
//!   sections should it render?
//! - **Administrative path**: Admin and SuperAdmin open an edit session,
//!   stage changes to the permission matrix and the five section registries,
//!   then commit or roll back.
//!
//! ## Architecture
//!
//! ```text
//! src/
//! ├── middleware/       # Bearer token extractor, require_admin layer
//! ├── modules/
//! │   ├── access/       # Read path for the caller's role
//! │   ├── admin_access/ # Edit sessions
//! │   └── system/       # /health, /metrics
//! ├── docs.rs           # OpenAPI document
//! ├── router.rs         # Route tree and global layers
//! ├── state.rs          # Store, open sessions, config
//! └── validator.rs      # ValidatedJson extractor
//! ```
//!
//! Each feature module has `controller.rs` (handlers), `service.rs`
//! (logic), `model.rs` (DTOs) and `router.rs`.
//!
//! ## Decision rules
//!
//! | Query | Rule |
//! |-------|------|
//! | Feature, SuperAdmin | Always allowed for catalog features |
//! | Feature, no entry | Denied, except `view` on `Profile` |
//! | Feature, unknown key | Denied |
//! | Section, no entry | Visible |
//!
//! ## Quick Start
//!
//! ```bash
//! STORAGE_BACKEND=file
//! STORAGE_DIR=storage/access
//! JWT_SECRET=your-secure-secret-key
//! cargo run --bin schoolgate-cli -- issue-token --role Admin
//! cargo run
//! ```
//!
//! API documentation is served at `/swagger-ui` and `/scalar`.

pub mod docs;
pub mod middleware;
pub mod modules;
pub mod router;
pub mod state;
pub mod validator;

// Re-export workspace crates for convenience
pub use schoolgate_access;
pub use schoolgate_auth;
pub use schoolgate_config;
pub use schoolgate_core;
pub use schoolgate_models;
