use axum::{Router, middleware, routing::get};
use schoolgate_cache::{CacheControlConfig, cache_control, etag_middleware};

use crate::state::AppState;

use super::controller::{get_feature_access, get_my_access, get_section_access};

pub fn init_access_router() -> Router<AppState> {
    Router::new()
        .route("/me", get(get_my_access))
        .route("/features/{feature}", get(get_feature_access))
        .route("/sections/{registry}/{key}", get(get_section_access))
        .layer(middleware::from_fn(etag_middleware))
        .layer(cache_control(CacheControlConfig::revalidate()))
}
