use axum::{
    Json,
    extract::{Path, State},
    http::{HeaderValue, header::ETAG},
    response::{IntoResponse, Response},
};

use crate::middleware::auth::AuthUser;
use crate::modules::system::controller::ErrorResponse;
use crate::state::AppState;
use schoolgate_core::AppError;

use super::model::{FeatureAccess, MyAccessResponse, SectionAccess};
use super::service;

#[utoipa::path(
    get,
    path = "/api/access/me",
    responses(
        (status = 200, description = "Effective permissions and visible sections for the caller's role", body = MyAccessResponse),
        (status = 304, description = "Configuration unchanged since the given ETag"),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    tag = "Access",
    security(("bearer_auth" = []))
)]
pub async fn get_my_access(State(state): State<AppState>, auth_user: AuthUser) -> Response {
    let evaluator = state.store.evaluator();
    let etag = service::access_etag(&evaluator, auth_user.role());
    let body = Json(service::my_access(&evaluator, auth_user.role()));

    match HeaderValue::from_str(&etag) {
        Ok(etag) => ([(ETAG, etag)], body).into_response(),
        Err(_) => body.into_response(),
    }
}

#[utoipa::path(
    get,
    path = "/api/access/features/{feature}",
    params(
        ("feature" = String, Path, description = "Feature key, e.g. `Fees` or `__Profile`")
    ),
    responses(
        (status = 200, description = "Effective flags; all false for unknown features", body = FeatureAccess),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    tag = "Access",
    security(("bearer_auth" = []))
)]
pub async fn get_feature_access(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(feature): Path<String>,
) -> Json<FeatureAccess> {
    Json(service::feature_access(
        &state.store.evaluator(),
        auth_user.role(),
        &feature,
    ))
}

#[utoipa::path(
    get,
    path = "/api/access/sections/{registry}/{key}",
    params(
        ("registry" = String, Path, description = "Registry name, e.g. `dashboardControls`"),
        ("key" = String, Path, description = "Section key; unknown keys are visible")
    ),
    responses(
        (status = 200, description = "Section visibility", body = SectionAccess),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 404, description = "Unknown registry", body = ErrorResponse)
    ),
    tag = "Access",
    security(("bearer_auth" = []))
)]
pub async fn get_section_access(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path((registry, key)): Path<(String, String)>,
) -> Result<Json<SectionAccess>, AppError> {
    let access =
        service::section_access(&state.store.evaluator(), auth_user.role(), &registry, &key)?;
    Ok(Json(access))
}
