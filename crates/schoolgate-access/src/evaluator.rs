//! Read-time access decisions.
//!
//! An [`AccessEvaluator`] is a frozen view of one committed configuration.
//! It never sees staged edits and never changes after construction; ask the
//! [`ConfigurationStore`](crate::store::ConfigurationStore) for a fresh one to
//! observe later commits.

use std::sync::Arc;

use metrics::counter;
use schoolgate_models::{Action, FeatureKey, FeaturePermission, RegistryName, RoleKey, SectionKey};
use tracing::debug;

use crate::config::AccessConfig;

#[derive(Debug, Clone)]
pub struct AccessEvaluator {
    config: Arc<AccessConfig>,
    generation: u64,
    fingerprint: String,
}

impl AccessEvaluator {
    pub fn new(config: Arc<AccessConfig>, generation: u64, fingerprint: String) -> Self {
        Self {
            config,
            generation,
            fingerprint,
        }
    }

    /// Evaluator over a configuration that is not held by a store.
    pub fn from_config(config: AccessConfig) -> Self {
        let fingerprint = config.fingerprint().unwrap_or_default();
        Self::new(Arc::new(config), 0, fingerprint)
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn fingerprint(&self) -> &str {
        &self.fingerprint
    }

    pub fn config(&self) -> &AccessConfig {
        &self.config
    }

    /// Decision for a raw feature key as used by routes.
    ///
    /// `__Profile` is normalized to `Profile`; unknown features are denied.
    pub fn can(&self, role: RoleKey, feature: &str, action: Action) -> bool {
        let allowed = match FeatureKey::normalize(feature) {
            Some(feature) => self.decide(role, feature, action),
            None => {
                debug!(%role, feature, "Unknown feature, denying");
                false
            }
        };
        record("feature", allowed);
        allowed
    }

    pub fn can_feature(&self, role: RoleKey, feature: FeatureKey, action: Action) -> bool {
        let allowed = self.decide(role, feature, action);
        record("feature", allowed);
        allowed
    }

    pub fn can_view(&self, role: RoleKey, feature: &str) -> bool {
        self.can(role, feature, Action::View)
    }

    pub fn can_create(&self, role: RoleKey, feature: &str) -> bool {
        self.can(role, feature, Action::Create)
    }

    pub fn can_edit(&self, role: RoleKey, feature: &str) -> bool {
        self.can(role, feature, Action::Edit)
    }

    pub fn can_delete(&self, role: RoleKey, feature: &str) -> bool {
        self.can(role, feature, Action::Delete)
    }

    /// All four flags for one feature with the SuperAdmin bypass applied.
    pub fn effective(&self, role: RoleKey, feature: FeatureKey) -> FeaturePermission {
        if role == RoleKey::SuperAdmin {
            return FeaturePermission::FULL;
        }
        self.config.permissions.effective(role, feature)
    }

    /// Same as [`effective`](Self::effective) for a raw key; unknown features
    /// yield no permissions.
    pub fn effective_raw(&self, role: RoleKey, feature: &str) -> FeaturePermission {
        FeatureKey::normalize(feature)
            .map(|feature| self.effective(role, feature))
            .unwrap_or(FeaturePermission::NONE)
    }

    /// Every catalog feature with its effective flags, render order.
    pub fn grid(&self, role: RoleKey) -> Vec<(FeatureKey, FeaturePermission)> {
        FeatureKey::ALL
            .into_iter()
            .map(|feature| (feature, self.effective(role, feature)))
            .collect()
    }

    /// Section visibility by raw key. Unknown keys are visible.
    pub fn is_section_visible(&self, registry: RegistryName, role: RoleKey, key: &str) -> bool {
        let visible = self.config.registries.is_visible(registry, role, key);
        debug!(%registry, %role, key, visible, "Section visibility evaluated");
        record("section", visible);
        visible
    }

    /// Typed variant of [`is_section_visible`](Self::is_section_visible).
    pub fn is_visible<K: SectionKey>(&self, role: RoleKey, key: K) -> bool {
        self.is_section_visible(K::REGISTRY, role, key.as_str())
    }

    /// `role`'s catalog for `registry` with effective visibility.
    pub fn visible_sections(
        &self,
        registry: RegistryName,
        role: RoleKey,
    ) -> Vec<(&'static str, bool)> {
        self.config.registries.sections_for(registry, role)
    }

    fn decide(&self, role: RoleKey, feature: FeatureKey, action: Action) -> bool {
        let allowed = role == RoleKey::SuperAdmin
            || self.config.permissions.get(role, feature, action);
        debug!(%role, %feature, %action, allowed, "Feature access evaluated");
        allowed
    }
}

fn record(kind: &'static str, allowed: bool) {
    let outcome = if allowed { "allow" } else { "deny" };
    counter!("access_decisions_total", "kind" => kind, "outcome" => outcome).increment(1);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Registries;
    use crate::matrix::PermissionMatrix;
    use schoolgate_models::{DashboardSection, StudentsSection};

    fn evaluator(config: AccessConfig) -> AccessEvaluator {
        AccessEvaluator::from_config(config)
    }

    #[test]
    fn test_absent_entries_deny_except_profile_view() {
        let eval = evaluator(AccessConfig::default());
        for role in RoleKey::ALL.into_iter().filter(|r| *r != RoleKey::SuperAdmin) {
            for feature in FeatureKey::ALL {
                let name = feature.as_str();
                assert_eq!(eval.can_view(role, name), feature == FeatureKey::Profile);
                assert!(!eval.can_create(role, name));
                assert!(!eval.can_edit(role, name));
                assert!(!eval.can_delete(role, name));
            }
        }
    }

    #[test]
    fn test_super_admin_bypasses_stored_denials() {
        let mut permissions = PermissionMatrix::new();
        permissions.set_all_for_role(RoleKey::SuperAdmin, false);
        let eval = evaluator(AccessConfig::new(permissions, Registries::default()));

        for feature in FeatureKey::ALL {
            for action in Action::ALL {
                assert!(eval.can(RoleKey::SuperAdmin, feature.as_str(), action));
            }
            assert_eq!(
                eval.effective(RoleKey::SuperAdmin, feature),
                FeaturePermission::FULL
            );
        }
    }

    #[test]
    fn test_super_admin_stored_all_true_is_identical() {
        let mut permissions = PermissionMatrix::new();
        permissions.set_all_for_role(RoleKey::SuperAdmin, true);
        let stored = evaluator(AccessConfig::new(permissions, Registries::default()));
        let empty = evaluator(AccessConfig::default());

        assert_eq!(stored.grid(RoleKey::SuperAdmin), empty.grid(RoleKey::SuperAdmin));
    }

    #[test]
    fn test_profile_alias_normalizes() {
        let eval = evaluator(AccessConfig::default());
        assert!(eval.can_view(RoleKey::Parent, "__Profile"));
        assert!(!eval.can_edit(RoleKey::Parent, "__Profile"));
    }

    #[test]
    fn test_unknown_feature_fails_closed() {
        let eval = evaluator(AccessConfig::default());
        assert!(!eval.can_view(RoleKey::Admin, "Hostel"));
        assert_eq!(
            eval.effective_raw(RoleKey::Admin, "Hostel"),
            FeaturePermission::NONE
        );
    }

    #[test]
    fn test_super_admin_bypass_does_not_cover_unknown_features() {
        let eval = evaluator(AccessConfig::default());
        assert!(eval.can(RoleKey::SuperAdmin, "__Profile", Action::Delete));
        assert!(!eval.can(RoleKey::SuperAdmin, "Hostel", Action::View));
    }

    #[test]
    fn test_sections_default_visible_and_explicit_hide() {
        let mut registries = Registries::default();
        registries.set(
            RegistryName::StudentsControls,
            RoleKey::Parent,
            "addStudent",
            false,
        );
        let eval = evaluator(AccessConfig::new(PermissionMatrix::new(), registries));

        assert!(!eval.is_visible(RoleKey::Parent, StudentsSection::AddStudent));
        assert!(eval.is_visible(RoleKey::Teacher, StudentsSection::AddStudent));
        assert!(eval.is_visible(RoleKey::Admin, DashboardSection::FeesTracking));
        assert!(eval.is_section_visible(RegistryName::SettingsControls, RoleKey::Student, "nope"));
    }

    #[test]
    fn test_visible_sections_lists_role_catalog() {
        let eval = evaluator(AccessConfig::default());
        let sections = eval.visible_sections(RegistryName::DashboardControls, RoleKey::Parent);

        assert_eq!(sections.len(), 5);
        assert!(sections.iter().all(|(_, visible)| *visible));
        assert_eq!(sections[0].0, "childAttendance");
    }
}
