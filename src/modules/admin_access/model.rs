use chrono::{DateTime, Utc};
use schoolgate_access::{AccessConfig, CommitReport, ConfigKey, FailedWrite};
use schoolgate_models::{Action, FeatureKey, RegistryName, RoleKey};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct SetPermissionDto {
    pub role: RoleKey,
    /// Feature key; `__Profile` is accepted.
    #[validate(length(min = 1, max = 64, message = "feature must be 1-64 characters"))]
    pub feature: String,
    pub action: Action,
    pub value: bool,
}

/// "Allow all" (`true`) or "Deny all" (`false`).
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct SetAllDto {
    pub value: bool,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct SetSectionDto {
    pub registry: RegistryName,
    pub role: RoleKey,
    #[validate(length(min = 1, max = 64, message = "key must be 1-64 characters"))]
    pub key: String,
    pub visible: bool,
}

/// The caller's open session.
#[derive(Debug, Serialize, ToSchema)]
pub struct SessionView {
    pub editor: String,
    pub role: RoleKey,
    pub opened_at: DateTime<Utc>,
    pub base_generation: u64,
    /// Working copy differs from the committed baseline.
    pub dirty: bool,
    /// Matrix under `rolePermissions` plus the five registries.
    #[schema(value_type = Object)]
    pub working: AccessConfig,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CommitResponse {
    pub generation: u64,
    pub fingerprint: String,
    #[schema(value_type = Vec<String>)]
    pub persisted: Vec<ConfigKey>,
}

impl From<CommitReport> for CommitResponse {
    fn from(report: CommitReport) -> Self {
        Self {
            generation: report.generation,
            fingerprint: report.fingerprint,
            persisted: report.persisted,
        }
    }
}

/// Body of a 502: some parts were written, the session stays open.
#[derive(Debug, Serialize, ToSchema)]
pub struct PartialCommitResponse {
    pub error: String,
    #[schema(value_type = Vec<String>)]
    pub persisted: Vec<ConfigKey>,
    #[schema(value_type = Vec<Object>)]
    pub failed: Vec<FailedWrite>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct RoleCatalog {
    pub role: RoleKey,
    pub keys: Vec<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct RegistryCatalog {
    pub registry: RegistryName,
    pub roles: Vec<RoleCatalog>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CatalogResponse {
    pub roles: Vec<RoleKey>,
    pub features: Vec<FeatureKey>,
    pub actions: Vec<Action>,
    pub registries: Vec<RegistryCatalog>,
}
