mod common;

use axum::http::{Method, StatusCode, header};
use schoolgate_models::RoleKey;
use serde_json::json;
use common::{TestApp, token};

#[tokio::test]
async fn test_me_requires_token() {
    let app = TestApp::new().await;
    let (status, _, body) = app
        .request(Method::GET, "/api/access/me", None, None, &[])
        .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Missing authorization header");
}

#[tokio::test]
async fn test_me_rejects_token_signed_with_other_secret() {
    let app = TestApp::new().await;
    let forged = schoolgate_auth::create_access_token(
        "intruder",
        RoleKey::SuperAdmin,
        &schoolgate_config::JwtConfig {
            secret: "not-the-secret".into(),
            access_token_expiry: 3600,
        },
    )
    .unwrap();

    let (status, _, _) = app.get("/api/access/me", &forged).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_me_returns_grid_and_sections_for_role() {
    let app = TestApp::new().await;
    let (status, headers, body) = app
        .get("/api/access/me", &token(RoleKey::Student, "s-1"))
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["role"], "Student");
    assert_eq!(body["generation"], 0);
    assert_eq!(body["features"].as_array().unwrap().len(), 17);
    assert_eq!(body["registries"].as_array().unwrap().len(), 5);

    let fees = body["features"]
        .as_array()
        .unwrap()
        .iter()
        .find(|f| f["feature"] == "Fees")
        .unwrap();
    assert_eq!(fees["create"], false);

    assert!(headers.contains_key(header::ETAG));
    assert_eq!(headers[header::CACHE_CONTROL], "private, no-cache");
}

#[tokio::test]
async fn test_me_revalidates_until_commit() {
    let app = TestApp::new().await;
    let teacher = token(RoleKey::Teacher, "t-1");
    let admin = token(RoleKey::Admin, "a-1");

    let (_, headers, _) = app.get("/api/access/me", &teacher).await;
    let etag = headers[header::ETAG].to_str().unwrap().to_string();

    let (status, _, _) = app
        .request(
            Method::GET,
            "/api/access/me",
            Some(&teacher),
            None,
            &[("if-none-match", etag.as_str())],
        )
        .await;
    assert_eq!(status, StatusCode::NOT_MODIFIED);

    app.post("/api/admin/access/session", &admin).await;
    app.put(
        "/api/admin/access/session/permissions",
        &admin,
        json!({"role": "Teacher", "feature": "Fees", "action": "view", "value": true}),
    )
    .await;
    let (status, _) = app.post("/api/admin/access/session/commit", &admin).await;
    assert_eq!(status, StatusCode::OK);

    let (status, headers, body) = app
        .request(
            Method::GET,
            "/api/access/me",
            Some(&teacher),
            None,
            &[("if-none-match", etag.as_str())],
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_ne!(headers[header::ETAG].to_str().unwrap(), etag);
    assert_eq!(body["generation"], 1);
}

#[tokio::test]
async fn test_feature_endpoint_normalizes_profile_alias() {
    let app = TestApp::new().await;
    let (status, _, body) = app
        .get("/api/access/features/__Profile", &token(RoleKey::Parent, "p-1"))
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["feature"], "Profile");
    assert_eq!(body["view"], true);
}

#[tokio::test]
async fn test_feature_endpoint_super_admin_and_unknown_feature() {
    let app = TestApp::new().await;
    let super_admin = token(RoleKey::SuperAdmin, "root");

    let (_, _, known) = app.get("/api/access/features/Library", &super_admin).await;
    assert_eq!(
        known,
        json!({"feature": "Library", "view": true, "create": true, "edit": true, "delete": true})
    );

    let (status, _, unknown) = app.get("/api/access/features/Hostel", &super_admin).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(unknown["view"], false);
    assert_eq!(unknown["delete"], false);
}

#[tokio::test]
async fn test_section_endpoint() {
    let app = TestApp::new().await;
    let parent = token(RoleKey::Parent, "p-1");

    let (status, _, body) = app
        .get("/api/access/sections/studentsControls/addStudent", &parent)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["visible"], false);

    let (_, _, body) = app
        .get("/api/access/sections/dashboardControls/notInCatalog", &parent)
        .await;
    assert_eq!(body["visible"], true);

    let (status, _, body) = app
        .get("/api/access/sections/libraryControls/anything", &parent)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Unknown registry: libraryControls");
}

#[tokio::test]
async fn test_health() {
    let app = TestApp::new().await;
    let (status, _, body) = app.request(Method::GET, "/health", None, None, &[]).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"status": "ok", "generation": 0, "backend": "memory"}));
}

#[tokio::test]
async fn test_metrics_disabled_without_recorder() {
    let app = TestApp::new().await;
    let (status, _, _) = app.request(Method::GET, "/metrics", None, None, &[]).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_openapi_document_is_served() {
    let app = TestApp::new().await;
    let (status, _, body) = app
        .request(Method::GET, "/api-docs/openapi.json", None, None, &[])
        .await;

    assert_eq!(status, StatusCode::OK);
    assert!(body["paths"]["/api/access/me"].is_object());
    assert!(body["paths"]["/api/admin/access/session/commit"].is_object());
}
