//! Section visibility registries.
//!
//! One generic [`VisibilityRegistry`] holds role × section → bool for a single
//! registry's key type. Absence means visible; the default-true rule lives in
//! [`VisibilityRegistry::is_visible`] and nowhere else.

use std::collections::BTreeMap;

use schoolgate_models::{RoleKey, SectionKey};
use serde::Serialize;

/// How a stored payload was turned into in-memory state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOutcome {
    /// Nothing stored under the key; defaults used as-is.
    Absent,
    /// Stored payload parsed (and merged where applicable).
    Loaded,
    /// Stored payload could not be parsed; defaults used instead.
    Malformed(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct VisibilityRegistry<K: SectionKey> {
    roles: BTreeMap<RoleKey, BTreeMap<K, bool>>,
}

impl<K: SectionKey> Default for VisibilityRegistry<K> {
    fn default() -> Self {
        Self {
            roles: BTreeMap::new(),
        }
    }
}

impl<K: SectionKey> VisibilityRegistry<K> {
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry with every catalog key of every role set to `visible`.
    pub fn uniform(visible: bool) -> Self {
        let mut registry = Self::new();
        for role in RoleKey::ALL {
            let entries = K::catalog_for(role).iter().map(|key| (*key, visible));
            registry.roles.insert(role, entries.collect());
        }
        registry
    }

    /// Absent entries are visible.
    pub fn is_visible(&self, role: RoleKey, key: K) -> bool {
        self.roles
            .get(&role)
            .and_then(|sections| sections.get(&key))
            .copied()
            .unwrap_or(true)
    }

    /// Visibility by raw key. Keys outside the catalog are visible.
    pub fn is_visible_raw(&self, role: RoleKey, key: &str) -> bool {
        K::parse(key).is_none_or(|key| self.is_visible(role, key))
    }

    /// Whether `key` is in `role`'s catalog for this registry.
    pub fn accepts(role: RoleKey, key: K) -> bool {
        K::catalog_for(role).contains(&key)
    }

    /// Returns `false`, leaving the registry untouched, for keys outside
    /// `role`'s catalog.
    pub fn set(&mut self, role: RoleKey, key: K, visible: bool) -> bool {
        if !Self::accepts(role, key) {
            return false;
        }
        self.roles.entry(role).or_default().insert(key, visible);
        true
    }

    /// Flip one key and return its new value.
    pub fn toggle(&mut self, role: RoleKey, key: K) -> Option<bool> {
        let next = !self.is_visible(role, key);
        self.set(role, key, next).then_some(next)
    }

    /// Set by raw key. Returns `false` for keys outside `role`'s catalog.
    pub fn set_raw(&mut self, role: RoleKey, key: &str, visible: bool) -> bool {
        K::parse(key).is_some_and(|key| self.set(role, key, visible))
    }

    pub fn toggle_raw(&mut self, role: RoleKey, key: &str) -> Option<bool> {
        K::parse(key).and_then(|key| self.toggle(role, key))
    }

    pub fn role_entries(&self, role: RoleKey) -> Option<&BTreeMap<K, bool>> {
        self.roles.get(&role)
    }

    /// Replace a role's entries wholesale (`None` removes them).
    pub fn replace_role(&mut self, role: RoleKey, entries: Option<BTreeMap<K, bool>>) {
        match entries {
            Some(entries) => {
                self.roles.insert(role, entries);
            }
            None => {
                self.roles.remove(&role);
            }
        }
    }

    /// Effective visibility of every key in `role`'s catalog, catalog order.
    pub fn sections_for(&self, role: RoleKey) -> Vec<(K, bool)> {
        K::catalog_for(role)
            .iter()
            .map(|key| (*key, self.is_visible(role, *key)))
            .collect()
    }

    pub fn to_payload(&self) -> Result<Vec<u8>, serde_json::Error> {
        serde_json::to_vec(self)
    }

    /// Merge a stored payload over `defaults`.
    ///
    /// Per role, stored keys win and keys only present in `defaults` are
    /// filled in. A role the defaults lack keeps its stored keys. Unknown
    /// roles and keys outside the role's catalog are dropped. A payload that
    /// cannot be parsed is discarded entirely in favor of `defaults`.
    pub fn load_with_defaults(stored: Option<&[u8]>, defaults: &Self) -> (Self, LoadOutcome) {
        let Some(bytes) = stored else {
            return (defaults.clone(), LoadOutcome::Absent);
        };

        let snapshot: BTreeMap<String, BTreeMap<String, bool>> =
            match serde_json::from_slice(bytes) {
                Ok(snapshot) => snapshot,
                Err(e) => return (defaults.clone(), LoadOutcome::Malformed(e.to_string())),
            };

        let mut merged = defaults.clone();
        for (role_name, sections) in snapshot {
            let Ok(role) = role_name.parse::<RoleKey>() else {
                continue;
            };
            for (key, visible) in sections {
                if let Some(key) = K::parse(&key) {
                    merged.set(role, key, visible);
                }
            }
        }

        (merged, LoadOutcome::Loaded)
    }
}
