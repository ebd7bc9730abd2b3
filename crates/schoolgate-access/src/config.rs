//! The whole access configuration: one permission matrix plus five registries.

use sha2::{Digest, Sha256};

use schoolgate_models::{
    AssignmentsSection, DashboardSection, RegistryName, RoleKey, SectionKey, SettingsSection,
    StudentsSection, TeachersSection,
};
use serde::Serialize;

use crate::error::ConfigError;
use crate::keys::ConfigKey;
use crate::matrix::PermissionMatrix;
use crate::visibility::{LoadOutcome, VisibilityRegistry};

/// Binds `$reg` to the named registry of `$registries` and evaluates `$body`
/// once per registry type.
macro_rules! with_registry {
    ($registries:expr, $name:expr, |$reg:ident| $body:expr) => {
        match $name {
            RegistryName::DashboardControls => {
                let $reg = &$registries.dashboard_controls;
                $body
            }
            RegistryName::SettingsControls => {
                let $reg = &$registries.settings_controls;
                $body
            }
            RegistryName::StudentsControls => {
                let $reg = &$registries.students_controls;
                $body
            }
            RegistryName::TeachersControls => {
                let $reg = &$registries.teachers_controls;
                $body
            }
            RegistryName::AssignmentsControls => {
                let $reg = &$registries.assignments_controls;
                $body
            }
        }
    };
}

/// Mutable counterpart of `with_registry!`.
macro_rules! with_registry_mut {
    ($registries:expr, $name:expr, |$reg:ident| $body:expr) => {
        match $name {
            RegistryName::DashboardControls => {
                let $reg = &mut $registries.dashboard_controls;
                $body
            }
            RegistryName::SettingsControls => {
                let $reg = &mut $registries.settings_controls;
                $body
            }
            RegistryName::StudentsControls => {
                let $reg = &mut $registries.students_controls;
                $body
            }
            RegistryName::TeachersControls => {
                let $reg = &mut $registries.teachers_controls;
                $body
            }
            RegistryName::AssignmentsControls => {
                let $reg = &mut $registries.assignments_controls;
                $body
            }
        }
    };
}

/// Binds `$reg` mutably in `$registries` and `$src` to the same registry of
/// `$other`.
macro_rules! with_registry_pair {
    ($registries:expr, $other:expr, $name:expr, |$reg:ident, $src:ident| $body:expr) => {
        match $name {
            RegistryName::DashboardControls => {
                let ($reg, $src) = (&mut $registries.dashboard_controls, &$other.dashboard_controls);
                $body
            }
            RegistryName::SettingsControls => {
                let ($reg, $src) = (&mut $registries.settings_controls, &$other.settings_controls);
                $body
            }
            RegistryName::StudentsControls => {
                let ($reg, $src) = (&mut $registries.students_controls, &$other.students_controls);
                $body
            }
            RegistryName::TeachersControls => {
                let ($reg, $src) = (&mut $registries.teachers_controls, &$other.teachers_controls);
                $body
            }
            RegistryName::AssignmentsControls => {
                let ($reg, $src) =
                    (&mut $registries.assignments_controls, &$other.assignments_controls);
                $body
            }
        }
    };
}

/// The five section-visibility registries.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Registries {
    pub dashboard_controls: VisibilityRegistry<DashboardSection>,
    pub settings_controls: VisibilityRegistry<SettingsSection>,
    pub students_controls: VisibilityRegistry<StudentsSection>,
    pub teachers_controls: VisibilityRegistry<TeachersSection>,
    pub assignments_controls: VisibilityRegistry<AssignmentsSection>,
}

impl Registries {
    /// Every catalog key of every role visible.
    pub fn all_visible() -> Self {
        Self {
            dashboard_controls: VisibilityRegistry::uniform(true),
            settings_controls: VisibilityRegistry::uniform(true),
            students_controls: VisibilityRegistry::uniform(true),
            teachers_controls: VisibilityRegistry::uniform(true),
            assignments_controls: VisibilityRegistry::uniform(true),
        }
    }

    /// Raw-key visibility. Keys outside the registry's catalog are visible.
    pub fn is_visible(&self, registry: RegistryName, role: RoleKey, key: &str) -> bool {
        with_registry!(self, registry, |reg| reg.is_visible_raw(role, key))
    }

    /// Returns `false` when `key` is outside `role`'s catalog for `registry`.
    pub fn set(&mut self, registry: RegistryName, role: RoleKey, key: &str, visible: bool) -> bool {
        with_registry_mut!(self, registry, |reg| reg.set_raw(role, key, visible))
    }

    /// Flip a key; `None` when `key` is outside `role`'s catalog for `registry`.
    pub fn toggle(&mut self, registry: RegistryName, role: RoleKey, key: &str) -> Option<bool> {
        with_registry_mut!(self, registry, |reg| reg.toggle_raw(role, key))
    }

    /// Effective visibility of every key in `role`'s catalog for `registry`.
    pub fn sections_for(&self, registry: RegistryName, role: RoleKey) -> Vec<(&'static str, bool)> {
        with_registry!(self, registry, |reg| {
            reg.sections_for(role)
                .into_iter()
                .map(|(key, visible)| (key.as_str(), visible))
                .collect()
        })
    }

    /// The wire key catalog of `registry` for `role`.
    pub fn catalog(registry: RegistryName, role: RoleKey) -> Vec<&'static str> {
        fn names<K: SectionKey>(role: RoleKey) -> Vec<&'static str> {
            K::catalog_for(role).iter().map(|key| key.as_str()).collect()
        }

        match registry {
            RegistryName::DashboardControls => names::<DashboardSection>(role),
            RegistryName::SettingsControls => names::<SettingsSection>(role),
            RegistryName::StudentsControls => names::<StudentsSection>(role),
            RegistryName::TeachersControls => names::<TeachersSection>(role),
            RegistryName::AssignmentsControls => names::<AssignmentsSection>(role),
        }
    }

    pub fn to_payload(&self, registry: RegistryName) -> Result<Vec<u8>, serde_json::Error> {
        with_registry!(self, registry, |reg| reg.to_payload())
    }

    /// Replace one registry with the merge of `stored` over `defaults`.
    pub fn load_part(
        &mut self,
        registry: RegistryName,
        stored: Option<&[u8]>,
        defaults: &Registries,
    ) -> LoadOutcome {
        with_registry_pair!(self, defaults, registry, |reg, default| {
            let (merged, outcome) = VisibilityRegistry::load_with_defaults(stored, default);
            *reg = merged;
            outcome
        })
    }

    /// Copy one whole registry from `source`.
    pub fn copy_from(&mut self, registry: RegistryName, source: &Registries) {
        with_registry_pair!(self, source, registry, |reg, src| reg.clone_from(src))
    }

    /// Reset `role` in every registry to its entries in `defaults`.
    pub fn restore_role(&mut self, role: RoleKey, defaults: &Registries) {
        for registry in RegistryName::ALL {
            with_registry_pair!(self, defaults, registry, |reg, default| {
                reg.replace_role(role, default.role_entries(role).cloned())
            });
        }
    }
}

/// One complete access configuration.
///
/// Serializes as the export document: `rolePermissions` plus the five
/// registries keyed by their wire names.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AccessConfig {
    #[serde(rename = "rolePermissions")]
    pub permissions: PermissionMatrix,
    #[serde(flatten)]
    pub registries: Registries,
}

impl AccessConfig {
    pub fn new(permissions: PermissionMatrix, registries: Registries) -> Self {
        Self {
            permissions,
            registries,
        }
    }

    /// JSON payload persisted under `key`.
    pub fn payload(&self, key: ConfigKey) -> Result<Vec<u8>, serde_json::Error> {
        match key {
            ConfigKey::Permissions => self.permissions.to_payload(),
            ConfigKey::Registry(registry) => self.registries.to_payload(registry),
        }
    }

    /// All six payloads in commit order.
    pub fn payloads(&self) -> Result<Vec<(ConfigKey, Vec<u8>)>, serde_json::Error> {
        ConfigKey::ALL
            .into_iter()
            .map(|key| Ok((key, self.payload(key)?)))
            .collect()
    }

    /// Build a configuration from stored payloads, merging each over
    /// `defaults`. `stored` yields the raw payload for a key, if any.
    pub fn from_parts<F>(
        mut stored: F,
        defaults: &AccessConfig,
    ) -> (Self, Vec<(ConfigKey, LoadOutcome)>)
    where
        F: FnMut(ConfigKey) -> Option<Vec<u8>>,
    {
        let mut config = defaults.clone();
        let mut outcomes = Vec::with_capacity(ConfigKey::ALL.len());

        for key in ConfigKey::ALL {
            let bytes = stored(key);
            let outcome = match key {
                ConfigKey::Permissions => {
                    let (matrix, outcome) =
                        PermissionMatrix::load_with_defaults(bytes.as_deref(), &defaults.permissions);
                    config.permissions = matrix;
                    outcome
                }
                ConfigKey::Registry(registry) => config.registries.load_part(
                    registry,
                    bytes.as_deref(),
                    &defaults.registries,
                ),
            };
            outcomes.push((key, outcome));
        }

        (config, outcomes)
    }

    /// Parse an export document. Parts missing from the document come from
    /// `defaults`; a part present but malformed is an error.
    pub fn from_document(bytes: &[u8], defaults: &AccessConfig) -> Result<Self, ConfigError> {
        let mut document: serde_json::Map<String, serde_json::Value> =
            serde_json::from_slice(bytes)?;

        let (config, outcomes) = Self::from_parts(
            |key| {
                document
                    .remove(key.name())
                    .map(|value| value.to_string().into_bytes())
            },
            defaults,
        );

        for (key, outcome) in outcomes {
            if let LoadOutcome::Malformed(reason) = outcome {
                return Err(ConfigError::Malformed { key, reason });
            }
        }

        Ok(config)
    }

    /// Overwrite one part with the same part of `source`.
    pub fn copy_part_from(&mut self, source: &AccessConfig, key: ConfigKey) {
        match key {
            ConfigKey::Permissions => self.permissions.clone_from(&source.permissions),
            ConfigKey::Registry(registry) => {
                self.registries.copy_from(registry, &source.registries)
            }
        }
    }

    /// Reset `role` in the matrix and every registry to `defaults`.
    pub fn restore_role(&mut self, role: RoleKey, defaults: &AccessConfig) {
        self.permissions
            .replace_role(role, defaults.permissions.role_grid(role).cloned());
        self.registries.restore_role(role, &defaults.registries);
    }

    /// SHA-256 over the six payloads, hex encoded.
    pub fn fingerprint(&self) -> Result<String, serde_json::Error> {
        let mut hasher = Sha256::new();
        for (key, payload) in self.payloads()? {
            hasher.update(key.name().as_bytes());
            hasher.update([0u8]);
            hasher.update(&payload);
            hasher.update([0u8]);
        }
        Ok(hex::encode(hasher.finalize()))
    }
}
