//! Role-based authorization for the administrative routes.

use axum::{
    extract::{FromRequestParts, Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use schoolgate_core::AppError;
use schoolgate_models::RoleKey;

use crate::middleware::auth::AuthUser;
use crate::state::AppState;

/// Succeeds when the caller holds one of `allowed`.
pub fn check_any_role(auth_user: &AuthUser, allowed: &[RoleKey]) -> Result<(), AppError> {
    if allowed.contains(&auth_user.role()) {
        Ok(())
    } else {
        Err(AppError::forbidden(format!(
            "Access denied. Required roles: {:?}, but user has role: {}",
            allowed,
            auth_user.role()
        )))
    }
}

/// Authenticates the request and checks the caller's role.
pub async fn require_roles(
    State(state): State<AppState>,
    req: Request,
    next: Next,
    allowed_roles: &[RoleKey],
) -> Result<Response, AppError> {
    let (mut parts, body) = req.into_parts();

    let auth_user = AuthUser::from_request_parts(&mut parts, &state).await?;
    check_any_role(&auth_user, allowed_roles)?;

    Ok(next.run(Request::from_parts(parts, body)).await)
}

/// Route layer for access administration (SuperAdmin and Admin).
///
/// ```rust,ignore
/// Router::new()
///     .nest("/admin/access", init_admin_access_router())
///     .route_layer(middleware::from_fn_with_state(state.clone(), require_admin));
/// ```
pub async fn require_admin(State(state): State<AppState>, req: Request, next: Next) -> Response {
    let administrators: Vec<RoleKey> = RoleKey::ALL
        .into_iter()
        .filter(RoleKey::can_administer_access)
        .collect();

    match require_roles(State(state), req, next, &administrators).await {
        Ok(response) => response,
        Err(err) => err.into_response(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use schoolgate_auth::Claims;

    fn auth_user(role: RoleKey) -> AuthUser {
        AuthUser(Claims {
            sub: "user-1".to_string(),
            role,
            exp: 9_999_999_999,
            iat: 1_234_567_890,
        })
    }

    #[test]
    fn test_check_any_role_single_role() {
        for role in RoleKey::ALL {
            assert!(check_any_role(&auth_user(role), &[role]).is_ok());
        }
        assert!(check_any_role(&auth_user(RoleKey::Admin), &[RoleKey::SuperAdmin]).is_err());
    }

    #[test]
    fn test_check_any_role() {
        let allowed = [RoleKey::SuperAdmin, RoleKey::Admin];
        assert!(check_any_role(&auth_user(RoleKey::Admin), &allowed).is_ok());
        assert!(check_any_role(&auth_user(RoleKey::Librarian), &allowed).is_err());
        assert!(check_any_role(&auth_user(RoleKey::Admin), &[]).is_err());
    }

    #[test]
    fn test_forbidden_status() {
        let err = check_any_role(&auth_user(RoleKey::Parent), &[RoleKey::Admin]).unwrap_err();
        assert_eq!(err.status, axum::http::StatusCode::FORBIDDEN);
    }
}
