//! The role × feature × action permission grid.
//!
//! Absence is meaningful: a missing (role, feature) entry behaves exactly like
//! an entry with all four flags off, except that `Profile` is viewable by
//! default. SuperAdmin bypass is not applied here; see
//! [`AccessEvaluator`](crate::evaluator::AccessEvaluator).

use std::collections::BTreeMap;

use schoolgate_models::{Action, FeatureKey, FeaturePermission, PROFILE_ALIAS, RoleKey};
use serde::{Deserialize, Serialize};

use crate::visibility::LoadOutcome;

type RoleGrid = BTreeMap<FeatureKey, FeaturePermission>;

/// Flags as stored. A missing flag takes the feature's absent-entry default.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct StoredFlags {
    view: Option<bool>,
    create: Option<bool>,
    edit: Option<bool>,
    delete: Option<bool>,
}

impl StoredFlags {
    fn over(self, base: FeaturePermission) -> FeaturePermission {
        FeaturePermission {
            view: self.view.unwrap_or(base.view),
            create: self.create.unwrap_or(base.create),
            edit: self.edit.unwrap_or(base.edit),
            delete: self.delete.unwrap_or(base.delete),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct PermissionMatrix {
    roles: BTreeMap<RoleKey, RoleGrid>,
}

impl PermissionMatrix {
    pub fn new() -> Self {
        Self::default()
    }

    /// The value an absent entry stands for.
    pub fn absent_default(feature: FeatureKey) -> FeaturePermission {
        if feature == FeatureKey::Profile {
            FeaturePermission::VIEW_ONLY
        } else {
            FeaturePermission::NONE
        }
    }

    /// The stored entry, if any.
    pub fn entry(&self, role: RoleKey, feature: FeatureKey) -> Option<&FeaturePermission> {
        self.roles.get(&role).and_then(|grid| grid.get(&feature))
    }

    /// Stored flags with the absent-entry default applied.
    pub fn effective(&self, role: RoleKey, feature: FeatureKey) -> FeaturePermission {
        self.entry(role, feature)
            .copied()
            .unwrap_or_else(|| Self::absent_default(feature))
    }

    /// Total read: always a definite answer, never an error.
    pub fn get(&self, role: RoleKey, feature: FeatureKey, action: Action) -> bool {
        self.effective(role, feature).get(action)
    }

    /// Read by raw feature key. Unknown keys are denied.
    pub fn get_raw(&self, role: RoleKey, feature: &str, action: Action) -> bool {
        FeatureKey::normalize(feature)
            .map(|feature| self.get(role, feature, action))
            .unwrap_or(false)
    }

    /// Set one flag. An absent entry is first materialized from its default so
    /// the other three flags keep their effective values.
    pub fn set(&mut self, role: RoleKey, feature: FeatureKey, action: Action, value: bool) {
        self.roles
            .entry(role)
            .or_default()
            .entry(feature)
            .or_insert_with(|| Self::absent_default(feature))
            .set(action, value);
    }

    /// Flip one flag and return its new value.
    pub fn toggle(&mut self, role: RoleKey, feature: FeatureKey, action: Action) -> bool {
        let next = !self.get(role, feature, action);
        self.set(role, feature, action, next);
        next
    }

    pub fn set_permission(
        &mut self,
        role: RoleKey,
        feature: FeatureKey,
        permission: FeaturePermission,
    ) {
        self.roles.entry(role).or_default().insert(feature, permission);
    }

    /// "Allow all" / "Deny all": every action of every catalog feature.
    pub fn set_all_for_role(&mut self, role: RoleKey, value: bool) {
        let grid = self.roles.entry(role).or_default();
        for feature in FeatureKey::ALL {
            grid.insert(feature, FeaturePermission::uniform(value));
        }
    }

    /// View on every feature, nothing else.
    pub fn set_view_only_for_role(&mut self, role: RoleKey) {
        let grid = self.roles.entry(role).or_default();
        for feature in FeatureKey::ALL {
            grid.insert(feature, FeaturePermission::VIEW_ONLY);
        }
    }

    /// Replace a role's entries wholesale (`None` removes them).
    pub fn replace_role(&mut self, role: RoleKey, grid: Option<RoleGrid>) {
        match grid {
            Some(grid) => {
                self.roles.insert(role, grid);
            }
            None => {
                self.roles.remove(&role);
            }
        }
    }

    pub fn role_grid(&self, role: RoleKey) -> Option<&RoleGrid> {
        self.roles.get(&role)
    }

    pub fn roles(&self) -> impl Iterator<Item = RoleKey> + '_ {
        self.roles.keys().copied()
    }

    pub fn to_payload(&self) -> Result<Vec<u8>, serde_json::Error> {
        serde_json::to_vec(self)
    }

    /// Parse a stored payload.
    ///
    /// Unknown roles and features are dropped, `__Profile` is folded into
    /// `Profile`. Flags missing from an entry take the absent-entry default,
    /// so a `Profile` entry without `view` stays viewable. Anything that is not a role → feature → flags object is
    /// malformed.
    pub fn from_payload(bytes: &[u8]) -> Result<Self, serde_json::Error> {
        let raw: BTreeMap<String, BTreeMap<String, StoredFlags>> =
            serde_json::from_slice(bytes)?;

        let mut matrix = Self::new();
        for (role_name, features) in raw {
            let Ok(role) = role_name.parse::<RoleKey>() else {
                continue;
            };

            let grid = matrix.roles.entry(role).or_default();
            for (feature_name, flags) in features {
                let Some(feature) = FeatureKey::normalize(&feature_name) else {
                    continue;
                };
                // The canonical key wins over the routing alias
                if feature_name == PROFILE_ALIAS && grid.contains_key(&feature) {
                    continue;
                }
                grid.insert(feature, flags.over(Self::absent_default(feature)));
            }
        }

        Ok(matrix)
    }

    /// Load a stored payload, falling back to `defaults` when it is absent or
    /// malformed. A parsable payload replaces the defaults wholesale.
    pub fn load_with_defaults(stored: Option<&[u8]>, defaults: &Self) -> (Self, LoadOutcome) {
        match stored {
            None => (defaults.clone(), LoadOutcome::Absent),
            Some(bytes) => match Self::from_payload(bytes) {
                Ok(matrix) => (matrix, LoadOutcome::Loaded),
                Err(e) => (defaults.clone(), LoadOutcome::Malformed(e.to_string())),
            },
        }
    }
}
