use anyhow::anyhow;
use schoolgate_access::{
    CommitError, EditSessionController, EnterOutcome, Registries, SessionError,
};
use schoolgate_core::AppError;
use schoolgate_models::{Action, FeatureKey, RegistryName, RoleKey};
use tracing::{instrument, warn};

use crate::middleware::auth::AuthUser;
use crate::state::{AppState, OpenSession};

use super::model::{
    CatalogResponse, CommitResponse, PartialCommitResponse, RegistryCatalog, RoleCatalog,
    SessionView,
};

pub enum CommitOutcome {
    Committed(CommitResponse),
    Partial(PartialCommitResponse),
}

fn no_session() -> AppError {
    AppError::conflict(anyhow!("No edit session is open"))
}

fn session_error(err: SessionError) -> AppError {
    match err {
        SessionError::NotOpen => no_session(),
        SessionError::UnknownSection { .. } => AppError::unprocessable(err),
    }
}

fn view(controller: &EditSessionController) -> Result<SessionView, AppError> {
    let session = controller.session().ok_or_else(no_session)?;

    Ok(SessionView {
        editor: controller.editor().to_string(),
        role: controller.role(),
        opened_at: session.opened_at(),
        base_generation: session.base_generation(),
        dirty: session.is_dirty(),
        working: session.working().clone(),
    })
}

pub fn parse_role(raw: &str) -> Result<RoleKey, AppError> {
    raw.parse().map_err(|e: String| AppError::bad_request(anyhow!(e)))
}

pub fn parse_feature(raw: &str) -> Result<FeatureKey, AppError> {
    raw.parse()
        .map_err(|e: String| AppError::unprocessable(anyhow!(e)))
}

pub fn catalog() -> CatalogResponse {
    let registries = RegistryName::ALL
        .into_iter()
        .map(|registry| RegistryCatalog {
            registry,
            roles: RoleKey::ALL
                .into_iter()
                .map(|role| RoleCatalog {
                    role,
                    keys: Registries::catalog(registry, role)
                        .into_iter()
                        .map(str::to_string)
                        .collect(),
                })
                .collect(),
        })
        .collect();

    CatalogResponse {
        roles: RoleKey::ALL.to_vec(),
        features: FeatureKey::ALL.to_vec(),
        actions: Action::ALL.to_vec(),
        registries,
    }
}

/// Open (or return) the caller's session. 403 for roles the engine refuses.
#[instrument(skip(state, auth_user), fields(editor = %auth_user.sub(), role = %auth_user.role()))]
pub async fn enter(state: &AppState, auth_user: &AuthUser) -> Result<SessionView, AppError> {
    let sub = auth_user.sub();
    let mut sessions = state.sessions.lock().await;

    // A subject re-issued with another role starts over
    if sessions
        .get(sub)
        .is_some_and(|open| open.controller().role() != auth_user.role())
    {
        sessions.remove(sub);
    }

    let controller = sessions
        .entry(sub.to_string())
        .or_insert_with(|| {
            OpenSession::new(EditSessionController::for_store(
                sub,
                auth_user.role(),
                &state.store,
            ))
        })
        .controller_mut();

    match controller.enter(&state.store) {
        EnterOutcome::Refused => {
            sessions.remove(sub);
            Err(AppError::forbidden(format!(
                "Role {} may not edit access configuration",
                auth_user.role()
            )))
        }
        EnterOutcome::Opened | EnterOutcome::AlreadyOpen => view(controller),
    }
}

pub async fn current(state: &AppState, auth_user: &AuthUser) -> Result<SessionView, AppError> {
    let sessions = state.sessions.lock().await;
    let open = sessions.get(auth_user.sub()).ok_or_else(no_session)?;
    view(open.controller())
}

/// Apply one edit to the caller's working copy.
pub async fn edit<F>(state: &AppState, auth_user: &AuthUser, f: F) -> Result<SessionView, AppError>
where
    F: FnOnce(&mut EditSessionController) -> Result<(), SessionError>,
{
    let mut sessions = state.sessions.lock().await;
    let controller = sessions
        .get_mut(auth_user.sub())
        .ok_or_else(no_session)?
        .controller_mut();
    f(controller).map_err(session_error)?;
    view(controller)
}

/// Commit the caller's session. The registry lock is released while the
/// backend writes run; a partial failure puts the session back.
#[instrument(skip(state, auth_user), fields(editor = %auth_user.sub()))]
pub async fn commit(state: &AppState, auth_user: &AuthUser) -> Result<CommitOutcome, AppError> {
    let sub = auth_user.sub();
    let mut open = state.sessions.take(sub).await.ok_or_else(no_session)?;

    let result = open.controller_mut().commit(&state.store).await;
    match result {
        Ok(report) => Ok(CommitOutcome::Committed(report.into())),
        Err(CommitError::PartialCommitFailure { persisted, failed }) => {
            warn!(failed = failed.len(), "Commit answered with 502");
            state.sessions.restore(sub, open).await;
            Ok(CommitOutcome::Partial(PartialCommitResponse {
                error: format!(
                    "{} of {} configuration parts could not be saved; the session is still open",
                    failed.len(),
                    failed.len() + persisted.len()
                ),
                persisted,
                failed,
            }))
        }
        Err(CommitError::NotOpen) => Err(no_session()),
        Err(err @ CommitError::Encode(_)) => {
            state.sessions.restore(sub, open).await;
            Err(AppError::internal(err))
        }
    }
}

pub async fn rollback(state: &AppState, auth_user: &AuthUser) -> Result<(), AppError> {
    let mut open = state
        .sessions
        .take(auth_user.sub())
        .await
        .ok_or_else(no_session)?;
    open.controller_mut().rollback().map_err(session_error)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    #[test]
    fn test_catalog_lists_role_specific_dashboard() {
        let catalog = catalog();
        assert_eq!(catalog.roles.len(), 7);
        assert_eq!(catalog.features.len(), 17);

        let dashboard = &catalog.registries[0];
        assert_eq!(dashboard.registry, RegistryName::DashboardControls);
        let librarian = dashboard
            .roles
            .iter()
            .find(|entry| entry.role == RoleKey::Librarian)
            .unwrap();
        assert_eq!(librarian.keys[0], "libraryStats");
    }

    #[test]
    fn test_parse_errors_map_to_statuses() {
        assert_eq!(parse_role("janitor").unwrap_err().status, StatusCode::BAD_REQUEST);
        assert_eq!(parse_role("super_admin").unwrap(), RoleKey::SuperAdmin);
        assert_eq!(parse_feature("Hostel").unwrap_err().status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(parse_feature("__Profile").unwrap(), FeatureKey::Profile);
    }

    #[test]
    fn test_session_errors() {
        assert_eq!(session_error(SessionError::NotOpen).status, StatusCode::CONFLICT);
        let unknown = SessionError::UnknownSection {
            registry: RegistryName::SettingsControls,
            key: "nope".into(),
        };
        assert_eq!(session_error(unknown).status, StatusCode::UNPROCESSABLE_ENTITY);
    }
}
