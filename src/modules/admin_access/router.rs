use axum::{
    Router,
    routing::{get, post, put},
};
use schoolgate_cache::{CacheControlConfig, cache_control};

use crate::state::AppState;

use super::controller::{
    commit_session, enter_session, get_catalog, get_session, restore_defaults, rollback_session,
    set_all_for_role, set_permission, set_section, set_view_only_for_role,
};

pub fn init_admin_access_router() -> Router<AppState> {
    Router::new()
        .route("/catalog", get(get_catalog))
        .route(
            "/session",
            post(enter_session).get(get_session).delete(rollback_session),
        )
        .route("/session/permissions", put(set_permission))
        .route("/session/sections", put(set_section))
        .route("/session/roles/{role}/all", put(set_all_for_role))
        .route("/session/roles/{role}/view-only", put(set_view_only_for_role))
        .route(
            "/session/roles/{role}/restore-defaults",
            post(restore_defaults),
        )
        .route("/session/commit", post(commit_session))
        .layer(cache_control(CacheControlConfig::no_store()))
}
