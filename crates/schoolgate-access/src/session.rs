//! Staged editing of the access configuration.
//!
//! An [`EditSessionController`] belongs to one administering user. While its
//! session is open, every mutation lands in the `working` copy only; the
//! committed configuration (and therefore every evaluator) is untouched until
//! [`EditSessionController::commit`] writes the six parts back.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use metrics::counter;
use schoolgate_models::{Action, FeatureKey, FeaturePermission, RegistryName, RoleKey, SectionKey};
use serde::Serialize;
use tracing::{info, instrument, warn};

use crate::config::AccessConfig;
use crate::error::{CommitError, FailedWrite, SessionError};
use crate::keys::ConfigKey;
use crate::store::ConfigurationStore;

/// Result of [`EditSessionController::enter`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnterOutcome {
    Opened,
    /// A session was already open; its staged edits are kept.
    AlreadyOpen,
    /// The editor's role may not administer access. Nothing changed.
    Refused,
}

/// Summary of a fully successful commit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommitReport {
    pub generation: u64,
    pub fingerprint: String,
    pub persisted: Vec<ConfigKey>,
}

/// The staged state of one open session.
#[derive(Debug, Clone)]
pub struct EditSession {
    working: AccessConfig,
    baseline: AccessConfig,
    base_generation: u64,
    opened_at: DateTime<Utc>,
}

impl EditSession {
    fn open(committed: &AccessConfig, generation: u64) -> Self {
        Self {
            working: committed.clone(),
            baseline: committed.clone(),
            base_generation: generation,
            opened_at: Utc::now(),
        }
    }

    pub fn working(&self) -> &AccessConfig {
        &self.working
    }

    pub fn baseline(&self) -> &AccessConfig {
        &self.baseline
    }

    /// Whether `working` differs from `baseline`.
    pub fn is_dirty(&self) -> bool {
        self.working != self.baseline
    }

    pub fn base_generation(&self) -> u64 {
        self.base_generation
    }

    pub fn opened_at(&self) -> DateTime<Utc> {
        self.opened_at
    }
}

#[derive(Debug)]
pub struct EditSessionController {
    editor: String,
    role: RoleKey,
    defaults: Arc<AccessConfig>,
    session: Option<EditSession>,
}

impl EditSessionController {
    /// A closed controller for `editor` acting with `role`. `defaults` is the
    /// target of [`restore_defaults_for_role`](Self::restore_defaults_for_role).
    pub fn new(editor: impl Into<String>, role: RoleKey, defaults: Arc<AccessConfig>) -> Self {
        Self {
            editor: editor.into(),
            role,
            defaults,
            session: None,
        }
    }

    /// Controller bound to `store`'s defaults.
    pub fn for_store(editor: impl Into<String>, role: RoleKey, store: &ConfigurationStore) -> Self {
        Self::new(editor, role, store.defaults())
    }

    pub fn editor(&self) -> &str {
        &self.editor
    }

    pub fn role(&self) -> RoleKey {
        self.role
    }

    pub fn is_open(&self) -> bool {
        self.session.is_some()
    }

    pub fn session(&self) -> Option<&EditSession> {
        self.session.as_ref()
    }

    /// Open a session over the store's committed configuration.
    ///
    /// Only Admin and SuperAdmin may edit; any other role is refused without
    /// error and the controller stays closed.
    #[instrument(skip(self, store), fields(editor = %self.editor, role = %self.role))]
    pub fn enter(&mut self, store: &ConfigurationStore) -> EnterOutcome {
        if !self.role.can_administer_access() {
            warn!("Edit session refused for role without access administration");
            counter!("access_sessions_total", "event" => "refused").increment(1);
            return EnterOutcome::Refused;
        }
        if self.session.is_some() {
            return EnterOutcome::AlreadyOpen;
        }

        let committed = store.snapshot();
        self.session = Some(EditSession::open(&committed, store.generation()));

        info!("Edit session opened");
        counter!("access_sessions_total", "event" => "opened").increment(1);
        EnterOutcome::Opened
    }

    pub fn set_permission(
        &mut self,
        role: RoleKey,
        feature: FeatureKey,
        action: Action,
        value: bool,
    ) -> Result<(), SessionError> {
        self.working_mut()?
            .permissions
            .set(role, feature, action, value);
        Ok(())
    }

    /// Flip one flag, returning its new value.
    pub fn toggle_permission(
        &mut self,
        role: RoleKey,
        feature: FeatureKey,
        action: Action,
    ) -> Result<bool, SessionError> {
        Ok(self.working_mut()?.permissions.toggle(role, feature, action))
    }

    /// Replace all four flags of one (role, feature) entry.
    pub fn set_feature_permission(
        &mut self,
        role: RoleKey,
        feature: FeatureKey,
        permission: FeaturePermission,
    ) -> Result<(), SessionError> {
        self.working_mut()?
            .permissions
            .set_permission(role, feature, permission);
        Ok(())
    }

    /// "Allow all" (`true`) or "Deny all" (`false`) for `role`.
    pub fn set_all_for_role(&mut self, role: RoleKey, value: bool) -> Result<(), SessionError> {
        self.working_mut()?.permissions.set_all_for_role(role, value);
        Ok(())
    }

    pub fn set_view_only_for_role(&mut self, role: RoleKey) -> Result<(), SessionError> {
        self.working_mut()?.permissions.set_view_only_for_role(role);
        Ok(())
    }

    pub fn set_section_visible(
        &mut self,
        registry: RegistryName,
        role: RoleKey,
        key: &str,
        visible: bool,
    ) -> Result<(), SessionError> {
        if self.working_mut()?.registries.set(registry, role, key, visible) {
            Ok(())
        } else {
            Err(unknown_section(registry, key))
        }
    }

    /// Flip one section, returning its new visibility.
    pub fn toggle_section(
        &mut self,
        registry: RegistryName,
        role: RoleKey,
        key: &str,
    ) -> Result<bool, SessionError> {
        self.working_mut()?
            .registries
            .toggle(registry, role, key)
            .ok_or_else(|| unknown_section(registry, key))
    }

    /// Typed variant of [`set_section_visible`](Self::set_section_visible).
    pub fn set_section<K: SectionKey>(
        &mut self,
        role: RoleKey,
        key: K,
        visible: bool,
    ) -> Result<(), SessionError> {
        self.set_section_visible(K::REGISTRY, role, key.as_str(), visible)
    }

    /// Reset `role` in the matrix and all five registries to the shipped
    /// defaults. Other roles' staged edits stay; `rollback` still undoes it.
    #[instrument(skip(self), fields(editor = %self.editor))]
    pub fn restore_defaults_for_role(&mut self, role: RoleKey) -> Result<(), SessionError> {
        let defaults = Arc::clone(&self.defaults);
        self.working_mut()?.restore_role(role, &defaults);
        info!("Role restored to defaults in working copy");
        Ok(())
    }

    /// Stage a whole configuration (an imported document) as the working copy.
    pub fn replace_working(&mut self, config: AccessConfig) -> Result<(), SessionError> {
        *self.working_mut()? = config;
        Ok(())
    }

    /// Discard the working copy and close the session. No persistence call.
    #[instrument(skip(self), fields(editor = %self.editor))]
    pub fn rollback(&mut self) -> Result<(), SessionError> {
        self.session.take().ok_or(SessionError::NotOpen)?;
        info!("Edit session rolled back");
        counter!("access_sessions_total", "event" => "rolled_back").increment(1);
        Ok(())
    }

    /// Persist the working copy as six independent writes.
    ///
    /// Every part that was written becomes committed and joins the baseline.
    /// When all six land the session closes; otherwise it stays open with the
    /// failed parts still dirty and a [`CommitError::PartialCommitFailure`] is
    /// returned so the caller can retry.
    #[instrument(skip(self, store), fields(editor = %self.editor, backend = store.backend_name()))]
    pub async fn commit(&mut self, store: &ConfigurationStore) -> Result<CommitReport, CommitError> {
        let session = self.session.as_mut().ok_or(CommitError::NotOpen)?;

        let current = store.generation();
        if session.base_generation < current {
            warn!(
                base_generation = session.base_generation,
                current_generation = current,
                "Committing over a configuration changed since this session opened"
            );
        }

        let payloads = session.working.payloads()?;
        let mut persisted = Vec::with_capacity(payloads.len());
        let mut failed = Vec::new();

        for (key, payload) in payloads {
            match store.write_part(key, &payload).await {
                Ok(()) => persisted.push(key),
                Err(e) => {
                    warn!(%key, error = %e, "Failed to persist configuration part");
                    counter!("access_commit_failures_total", "key" => key.name()).increment(1);
                    failed.push(FailedWrite {
                        key,
                        error: e.to_string(),
                    });
                }
            }
        }

        let (generation, fingerprint) = store.publish(&session.working, &persisted)?;
        for key in &persisted {
            session.baseline.copy_part_from(&session.working, *key);
        }
        session.base_generation = generation;

        if !failed.is_empty() {
            warn!(
                persisted = persisted.len(),
                failed = failed.len(),
                "Configuration partially committed"
            );
            counter!("access_sessions_total", "event" => "partial_commit").increment(1);
            return Err(CommitError::PartialCommitFailure { persisted, failed });
        }

        self.session = None;
        info!(generation, %fingerprint, "Edit session committed");
        counter!("access_sessions_total", "event" => "committed").increment(1);

        Ok(CommitReport {
            generation,
            fingerprint,
            persisted,
        })
    }

    fn working_mut(&mut self) -> Result<&mut AccessConfig, SessionError> {
        self.session
            .as_mut()
            .map(|session| &mut session.working)
            .ok_or(SessionError::NotOpen)
    }
}

fn unknown_section(registry: RegistryName, key: &str) -> SessionError {
    SessionError::UnknownSection {
        registry,
        key: key.to_string(),
    }
}
