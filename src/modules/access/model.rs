use schoolgate_models::{FeaturePermission, RegistryName, RoleKey};
use serde::Serialize;
use utoipa::ToSchema;

/// Effective flags for one feature.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct FeatureAccess {
    /// Normalized feature name, or the raw key when it is not in the catalog.
    pub feature: String,
    pub view: bool,
    pub create: bool,
    pub edit: bool,
    pub delete: bool,
}

impl FeatureAccess {
    pub fn new(feature: impl Into<String>, permission: FeaturePermission) -> Self {
        Self {
            feature: feature.into(),
            view: permission.view,
            create: permission.create,
            edit: permission.edit,
            delete: permission.delete,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct SectionAccess {
    pub registry: RegistryName,
    pub key: String,
    pub visible: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct SectionVisibility {
    pub key: String,
    pub visible: bool,
}

/// One registry's catalog for the caller's role.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct RegistrySections {
    pub registry: RegistryName,
    pub sections: Vec<SectionVisibility>,
}

/// Everything the console needs to render for the caller.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct MyAccessResponse {
    pub role: RoleKey,
    pub generation: u64,
    /// Changes whenever the committed configuration changes.
    pub fingerprint: String,
    pub features: Vec<FeatureAccess>,
    pub registries: Vec<RegistrySections>,
}
