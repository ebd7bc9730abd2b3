use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use schoolgate_core::AppError;

use crate::middleware::auth::AuthUser;
use crate::modules::system::controller::ErrorResponse;
use crate::state::AppState;
use crate::validator::ValidatedJson;

use super::model::{
    CatalogResponse, CommitResponse, PartialCommitResponse, SessionView, SetAllDto,
    SetPermissionDto, SetSectionDto,
};
use super::service::{self, CommitOutcome};

#[utoipa::path(
    get,
    path = "/api/admin/access/catalog",
    responses(
        (status = 200, description = "Roles, features, actions and per-role section catalogs", body = CatalogResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Forbidden", body = ErrorResponse)
    ),
    tag = "Access Administration",
    security(("bearer_auth" = []))
)]
pub async fn get_catalog() -> Json<CatalogResponse> {
    Json(service::catalog())
}

#[utoipa::path(
    post,
    path = "/api/admin/access/session",
    responses(
        (status = 200, description = "Session opened, or the already open session", body = SessionView),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Role may not edit access configuration", body = ErrorResponse)
    ),
    tag = "Access Administration",
    security(("bearer_auth" = []))
)]
pub async fn enter_session(
    State(state): State<AppState>,
    auth_user: AuthUser,
) -> Result<Json<SessionView>, AppError> {
    Ok(Json(service::enter(&state, &auth_user).await?))
}

#[utoipa::path(
    get,
    path = "/api/admin/access/session",
    responses(
        (status = 200, description = "Current session", body = SessionView),
        (status = 409, description = "No session open", body = ErrorResponse)
    ),
    tag = "Access Administration",
    security(("bearer_auth" = []))
)]
pub async fn get_session(
    State(state): State<AppState>,
    auth_user: AuthUser,
) -> Result<Json<SessionView>, AppError> {
    Ok(Json(service::current(&state, &auth_user).await?))
}

#[utoipa::path(
    delete,
    path = "/api/admin/access/session",
    responses(
        (status = 204, description = "Staged edits discarded"),
        (status = 409, description = "No session open", body = ErrorResponse)
    ),
    tag = "Access Administration",
    security(("bearer_auth" = []))
)]
pub async fn rollback_session(
    State(state): State<AppState>,
    auth_user: AuthUser,
) -> Result<StatusCode, AppError> {
    service::rollback(&state, &auth_user).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    put,
    path = "/api/admin/access/session/permissions",
    request_body = SetPermissionDto,
    responses(
        (status = 200, description = "Flag staged", body = SessionView),
        (status = 409, description = "No session open", body = ErrorResponse),
        (status = 422, description = "Unknown feature", body = ErrorResponse)
    ),
    tag = "Access Administration",
    security(("bearer_auth" = []))
)]
pub async fn set_permission(
    State(state): State<AppState>,
    auth_user: AuthUser,
    ValidatedJson(dto): ValidatedJson<SetPermissionDto>,
) -> Result<Json<SessionView>, AppError> {
    let feature = service::parse_feature(&dto.feature)?;
    let view = service::edit(&state, &auth_user, |editor| {
        editor.set_permission(dto.role, feature, dto.action, dto.value)
    })
    .await?;
    Ok(Json(view))
}

#[utoipa::path(
    put,
    path = "/api/admin/access/session/roles/{role}/all",
    params(("role" = String, Path, description = "Role key")),
    request_body = SetAllDto,
    responses(
        (status = 200, description = "Every flag of the role staged", body = SessionView),
        (status = 400, description = "Unknown role", body = ErrorResponse),
        (status = 409, description = "No session open", body = ErrorResponse)
    ),
    tag = "Access Administration",
    security(("bearer_auth" = []))
)]
pub async fn set_all_for_role(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(role): Path<String>,
    ValidatedJson(dto): ValidatedJson<SetAllDto>,
) -> Result<Json<SessionView>, AppError> {
    let role = service::parse_role(&role)?;
    let view = service::edit(&state, &auth_user, |editor| {
        editor.set_all_for_role(role, dto.value)
    })
    .await?;
    Ok(Json(view))
}

#[utoipa::path(
    put,
    path = "/api/admin/access/session/roles/{role}/view-only",
    params(("role" = String, Path, description = "Role key")),
    responses(
        (status = 200, description = "Role staged as view-only", body = SessionView),
        (status = 400, description = "Unknown role", body = ErrorResponse),
        (status = 409, description = "No session open", body = ErrorResponse)
    ),
    tag = "Access Administration",
    security(("bearer_auth" = []))
)]
pub async fn set_view_only_for_role(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(role): Path<String>,
) -> Result<Json<SessionView>, AppError> {
    let role = service::parse_role(&role)?;
    let view = service::edit(&state, &auth_user, |editor| {
        editor.set_view_only_for_role(role)
    })
    .await?;
    Ok(Json(view))
}

#[utoipa::path(
    put,
    path = "/api/admin/access/session/sections",
    request_body = SetSectionDto,
    responses(
        (status = 200, description = "Visibility staged", body = SessionView),
        (status = 409, description = "No session open", body = ErrorResponse),
        (status = 422, description = "Key not in the registry's catalog", body = ErrorResponse)
    ),
    tag = "Access Administration",
    security(("bearer_auth" = []))
)]
pub async fn set_section(
    State(state): State<AppState>,
    auth_user: AuthUser,
    ValidatedJson(dto): ValidatedJson<SetSectionDto>,
) -> Result<Json<SessionView>, AppError> {
    let view = service::edit(&state, &auth_user, |editor| {
        editor.set_section_visible(dto.registry, dto.role, &dto.key, dto.visible)
    })
    .await?;
    Ok(Json(view))
}

#[utoipa::path(
    post,
    path = "/api/admin/access/session/roles/{role}/restore-defaults",
    params(("role" = String, Path, description = "Role key")),
    responses(
        (status = 200, description = "Role reset to defaults in the working copy", body = SessionView),
        (status = 400, description = "Unknown role", body = ErrorResponse),
        (status = 409, description = "No session open", body = ErrorResponse)
    ),
    tag = "Access Administration",
    security(("bearer_auth" = []))
)]
pub async fn restore_defaults(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(role): Path<String>,
) -> Result<Json<SessionView>, AppError> {
    let role = service::parse_role(&role)?;
    let view = service::edit(&state, &auth_user, |editor| {
        editor.restore_defaults_for_role(role)
    })
    .await?;
    Ok(Json(view))
}

#[utoipa::path(
    post,
    path = "/api/admin/access/session/commit",
    responses(
        (status = 200, description = "All six parts persisted, session closed", body = CommitResponse),
        (status = 409, description = "No session open", body = ErrorResponse),
        (status = 502, description = "Some parts were not persisted, session still open", body = PartialCommitResponse)
    ),
    tag = "Access Administration",
    security(("bearer_auth" = []))
)]
pub async fn commit_session(
    State(state): State<AppState>,
    auth_user: AuthUser,
) -> Result<Response, AppError> {
    let response = match service::commit(&state, &auth_user).await? {
        CommitOutcome::Committed(report) => Json(report).into_response(),
        CommitOutcome::Partial(partial) => (StatusCode::BAD_GATEWAY, Json(partial)).into_response(),
    };
    Ok(response)
}
