//! Persistence key naming.
//!
//! The committed configuration is stored under six logical keys: one for the
//! permission matrix and one per section registry. Every key is namespaced
//! with the configured prefix so several deployments can share a backend.

use std::fmt;

use schoolgate_models::RegistryName;
use serde::{Serialize, Serializer};

/// Logical name of the permission matrix payload.
pub const PERMISSIONS_KEY: &str = "rolePermissions";

/// One of the six independently persisted parts of the configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ConfigKey {
    Permissions,
    Registry(RegistryName),
}

impl ConfigKey {
    /// Every part, in commit order.
    pub const ALL: [ConfigKey; 6] = [
        ConfigKey::Permissions,
        ConfigKey::Registry(RegistryName::DashboardControls),
        ConfigKey::Registry(RegistryName::SettingsControls),
        ConfigKey::Registry(RegistryName::StudentsControls),
        ConfigKey::Registry(RegistryName::TeachersControls),
        ConfigKey::Registry(RegistryName::AssignmentsControls),
    ];

    /// Logical name (`rolePermissions`, `dashboardControls`, ...).
    pub fn name(&self) -> &'static str {
        match self {
            ConfigKey::Permissions => PERMISSIONS_KEY,
            ConfigKey::Registry(registry) => registry.as_str(),
        }
    }

    /// Full backend key: `<prefix>:access:<name>`.
    pub fn storage_key(&self, prefix: &str) -> String {
        build_key(prefix, &["access", self.name()])
    }
}

impl fmt::Display for ConfigKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl Serialize for ConfigKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}

impl std::str::FromStr for ConfigKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ConfigKey::ALL
            .into_iter()
            .find(|key| key.name() == s)
            .ok_or_else(|| format!("Unknown configuration key: {}", s))
    }
}

/// Builds a backend key with the given prefix.
fn build_key(prefix: &str, parts: &[&str]) -> String {
    format!("{}:{}", prefix, parts.join(":"))
}
