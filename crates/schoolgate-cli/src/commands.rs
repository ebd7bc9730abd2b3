//! Subcommand implementations.
//!
//! Every mutating command opens an edit session as SuperAdmin, applies one
//! change and commits, so the CLI goes through the same path as the HTTP
//! service and leaves the same log and metric trail.

use std::fmt::Write as _;

use anyhow::{Context, anyhow};
use schoolgate_access::{
    AccessConfig, AccessEvaluator, CommitReport, ConfigurationStore, EditSessionController,
    EnterOutcome, SessionError,
};
use schoolgate_auth::create_access_token;
use schoolgate_config::JwtConfig;
use schoolgate_models::{Action, FeatureKey, RegistryName, RoleKey};
use tracing::info;

/// Session owner recorded for CLI edits.
pub const CLI_EDITOR: &str = "schoolgate-cli";

/// Open a SuperAdmin session, apply `edit`, commit.
pub async fn apply<F>(store: &ConfigurationStore, edit: F) -> anyhow::Result<CommitReport>
where
    F: FnOnce(&mut EditSessionController) -> Result<(), SessionError>,
{
    let mut editor = EditSessionController::for_store(CLI_EDITOR, RoleKey::SuperAdmin, store);
    if editor.enter(store) == EnterOutcome::Refused {
        return Err(anyhow!("Edit session refused"));
    }

    edit(&mut editor)?;
    let report = editor.commit(store).await?;

    info!(generation = report.generation, "CLI change committed");
    Ok(report)
}

pub async fn grant(
    store: &ConfigurationStore,
    role: RoleKey,
    feature: FeatureKey,
    action: Action,
    value: bool,
) -> anyhow::Result<CommitReport> {
    apply(store, |editor| editor.set_permission(role, feature, action, value)).await
}

pub async fn view_only(store: &ConfigurationStore, role: RoleKey) -> anyhow::Result<CommitReport> {
    apply(store, |editor| editor.set_view_only_for_role(role)).await
}

/// Allow all (`true`) or deny all (`false`) for `role`.
pub async fn set_all(
    store: &ConfigurationStore,
    role: RoleKey,
    value: bool,
) -> anyhow::Result<CommitReport> {
    apply(store, |editor| editor.set_all_for_role(role, value)).await
}

pub async fn restore_defaults(
    store: &ConfigurationStore,
    role: RoleKey,
) -> anyhow::Result<CommitReport> {
    apply(store, |editor| editor.restore_defaults_for_role(role)).await
}

/// The committed configuration as one pretty-printed JSON document.
pub fn export(store: &ConfigurationStore) -> anyhow::Result<String> {
    serde_json::to_string_pretty(&*store.snapshot()).context("Failed to encode configuration")
}

/// Replace the committed configuration with an exported document.
///
/// Parts missing from the document are taken from the defaults.
pub async fn import(store: &ConfigurationStore, document: &[u8]) -> anyhow::Result<CommitReport> {
    let config = AccessConfig::from_document(document, &store.defaults())?;
    apply(store, |editor| editor.replace_working(config)).await
}

/// Mint a development token for `role`.
pub fn issue_token(role: RoleKey, sub: &str, jwt_config: &JwtConfig) -> anyhow::Result<String> {
    let token = create_access_token(sub, role, jwt_config).map_err(|e| e.error)?;
    schoolgate_observability::track_token_issued(role.as_str());
    Ok(token)
}

/// Human-readable grid and section listing for one role or all of them.
pub fn show(store: &ConfigurationStore, role: Option<RoleKey>) -> String {
    let evaluator = store.evaluator();
    let mut out = String::new();

    let _ = writeln!(
        out,
        "Configuration generation {} ({} backend, fingerprint {})",
        evaluator.generation(),
        store.backend_name(),
        short(evaluator.fingerprint())
    );

    let roles: Vec<RoleKey> = match role {
        Some(role) => vec![role],
        None => RoleKey::ALL.to_vec(),
    };
    for role in roles {
        render_role(&mut out, &evaluator, role);
    }
    out
}

fn render_role(out: &mut String, evaluator: &AccessEvaluator, role: RoleKey) {
    let _ = writeln!(out, "\n{role}");
    let _ = writeln!(
        out,
        "  {:<12} {:<6} {:<6} {:<6} {:<6}",
        "feature", "view", "create", "edit", "delete"
    );
    for (feature, permission) in evaluator.grid(role) {
        let _ = writeln!(
            out,
            "  {:<12} {:<6} {:<6} {:<6} {:<6}",
            feature.as_str(),
            flag(permission.view),
            flag(permission.create),
            flag(permission.edit),
            flag(permission.delete)
        );
    }

    for registry in RegistryName::ALL {
        let hidden: Vec<&str> = evaluator
            .visible_sections(registry, role)
            .into_iter()
            .filter(|(_, visible)| !visible)
            .map(|(key, _)| key)
            .collect();
        let listing = if hidden.is_empty() {
            "all visible".to_string()
        } else {
            format!("hidden: {}", hidden.join(", "))
        };
        let _ = writeln!(out, "  {registry}: {listing}");
    }
}

fn flag(value: bool) -> &'static str {
    if value { "yes" } else { "-" }
}

fn short(fingerprint: &str) -> &str {
    fingerprint.get(..12).unwrap_or(fingerprint)
}
