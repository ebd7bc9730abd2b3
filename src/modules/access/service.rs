use anyhow::anyhow;
use schoolgate_access::AccessEvaluator;
use schoolgate_core::AppError;
use schoolgate_models::{FeatureKey, RegistryName, RoleKey};
use tracing::instrument;

use super::model::{
    FeatureAccess, MyAccessResponse, RegistrySections, SectionAccess, SectionVisibility,
};

#[instrument(skip(evaluator), fields(generation = evaluator.generation()))]
pub fn my_access(evaluator: &AccessEvaluator, role: RoleKey) -> MyAccessResponse {
    let features = evaluator
        .grid(role)
        .into_iter()
        .map(|(feature, permission)| FeatureAccess::new(feature.as_str(), permission))
        .collect();

    let registries = RegistryName::ALL
        .into_iter()
        .map(|registry| RegistrySections {
            registry,
            sections: evaluator
                .visible_sections(registry, role)
                .into_iter()
                .map(|(key, visible)| SectionVisibility {
                    key: key.to_string(),
                    visible,
                })
                .collect(),
        })
        .collect();

    MyAccessResponse {
        role,
        generation: evaluator.generation(),
        fingerprint: evaluator.fingerprint().to_string(),
        features,
        registries,
    }
}

/// Unknown features answer all-false rather than 404.
#[instrument(skip(evaluator))]
pub fn feature_access(evaluator: &AccessEvaluator, role: RoleKey, raw: &str) -> FeatureAccess {
    let name = FeatureKey::normalize(raw)
        .map(|feature| feature.as_str().to_string())
        .unwrap_or_else(|| raw.to_string());

    FeatureAccess::new(name, evaluator.effective_raw(role, raw))
}

#[instrument(skip(evaluator))]
pub fn section_access(
    evaluator: &AccessEvaluator,
    role: RoleKey,
    registry: &str,
    key: &str,
) -> Result<SectionAccess, AppError> {
    let registry: RegistryName = registry
        .parse()
        .map_err(|e: String| AppError::not_found(anyhow!(e)))?;

    Ok(SectionAccess {
        registry,
        key: key.to_string(),
        visible: evaluator.is_section_visible(registry, role, key),
    })
}

/// Strong ETag over the configuration fingerprint and the caller's role.
pub fn access_etag(evaluator: &AccessEvaluator, role: RoleKey) -> String {
    let fingerprint = evaluator.fingerprint();
    format!(
        "\"{}-{}\"",
        fingerprint.get(..16).unwrap_or(fingerprint),
        role
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use schoolgate_access::defaults;

    fn evaluator() -> AccessEvaluator {
        AccessEvaluator::from_config(defaults::shipped())
    }

    #[test]
    fn test_my_access_covers_catalog() {
        let response = my_access(&evaluator(), RoleKey::Teacher);

        assert_eq!(response.features.len(), FeatureKey::ALL.len());
        assert_eq!(response.registries.len(), RegistryName::ALL.len());
        let dashboard = &response.registries[0];
        assert_eq!(dashboard.registry, RegistryName::DashboardControls);
        assert_eq!(dashboard.sections[0].key, "myClasses");
    }

    #[test]
    fn test_feature_access_normalizes_profile() {
        let access = feature_access(&evaluator(), RoleKey::Parent, "__Profile");
        assert_eq!(access.feature, "Profile");
        assert!(access.view);
    }

    #[test]
    fn test_unknown_feature_is_all_false() {
        let access = feature_access(&evaluator(), RoleKey::SuperAdmin, "Hostel");
        assert_eq!(access.feature, "Hostel");
        assert!(!access.view && !access.create && !access.edit && !access.delete);
    }

    #[test]
    fn test_unknown_registry_is_not_found() {
        let err = section_access(&evaluator(), RoleKey::Admin, "libraryControls", "x").unwrap_err();
        assert_eq!(err.status, StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_etag_depends_on_role() {
        let eval = evaluator();
        assert_ne!(
            access_etag(&eval, RoleKey::Admin),
            access_etag(&eval, RoleKey::Teacher)
        );
    }
}
