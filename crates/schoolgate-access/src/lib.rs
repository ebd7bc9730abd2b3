//! # Schoolgate Access
//!
//! The role-scoped feature access and section visibility engine.
//!
//! # Modules
//!
//! - [`matrix`]: Role × feature × action permission grid (absent means denied)
//! - [`visibility`]: Generic role × section → bool registry (absent means visible)
//! - [`config`]: The matrix plus the five registries as one configuration
//! - [`defaults`]: The shipped default configuration
//! - [`store`]: The committed configuration and its persistence
//! - [`session`]: Staged editing with commit, rollback and per-role restore
//! - [`evaluator`]: Read-time decisions over the committed configuration
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use schoolgate_access::{ConfigurationStore, EditSessionController, defaults};
//! use schoolgate_core::MemoryBlobStore;
//! use schoolgate_models::{Action, FeatureKey, RoleKey};
//!
//! let store = ConfigurationStore::init(Arc::new(MemoryBlobStore::new()), "schoolgate", defaults::shipped()).await?;
//!
//! let mut editor = EditSessionController::for_store("admin-1", RoleKey::Admin, &store);
//! editor.enter(&store);
//! editor.set_permission(RoleKey::Teacher, FeatureKey::Fees, Action::View, true)?;
//! editor.commit(&store).await?;
//!
//! assert!(store.evaluator().can_view(RoleKey::Teacher, "Fees"));
//! ```

pub mod config;
pub mod defaults;
pub mod error;
pub mod evaluator;
pub mod keys;
pub mod matrix;
pub mod session;
pub mod store;
pub mod visibility;

pub use config::{AccessConfig, Registries};
pub use defaults::AccessDefaults;
pub use error::{CommitError, ConfigError, FailedWrite, SessionError};
pub use evaluator::AccessEvaluator;
pub use keys::ConfigKey;
pub use matrix::PermissionMatrix;
pub use session::{CommitReport, EditSession, EditSessionController, EnterOutcome};
pub use store::ConfigurationStore;
pub use visibility::{LoadOutcome, VisibilityRegistry};
