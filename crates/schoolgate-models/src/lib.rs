//! # Schoolgate Models
//!
//! The closed catalogs the access engine decides over.
//!
//! # Modules
//!
//! - [`roles`]: The seven console roles
//! - [`features`]: The 17 gated features, the four actions, and the per-feature flag record
//! - [`sections`]: The five section-visibility registries and their key catalogs
//!
//! # Example
//!
//! ```ignore
//! use schoolgate_models::{Action, FeatureKey, RoleKey};
//!
//! let feature = FeatureKey::normalize("__Profile");
//! assert_eq!(feature, Some(FeatureKey::Profile));
//!
//! let role: RoleKey = "super_admin".parse()?;
//! assert!(role.can_administer_access());
//! ```

pub mod features;
pub mod roles;
pub mod sections;

// Re-export commonly used types at crate root for convenience
pub use features::{Action, FeatureKey, FeaturePermission, PROFILE_ALIAS};
pub use roles::RoleKey;
pub use sections::{
    AssignmentsSection, DashboardSection, RegistryName, SectionKey, SettingsSection,
    StudentsSection, TeachersSection,
};
