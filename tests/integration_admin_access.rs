mod common;

use std::sync::Arc;
use std::time::Duration;

use axum::http::{Method, StatusCode, header};
use schoolgate_models::RoleKey;
use serde_json::json;
use common::{FlakyStore, TestApp, token};

const SESSION: &str = "/api/admin/access/session";

#[tokio::test]
async fn test_non_admin_is_forbidden() {
    let app = TestApp::new().await;
    for role in [RoleKey::Teacher, RoleKey::Student, RoleKey::Parent, RoleKey::Librarian] {
        let (status, body) = app.post(SESSION, &token(role, "u-1")).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert!(body["error"].as_str().unwrap().starts_with("Access denied"));
    }
    assert!(app.state.sessions.lock().await.is_empty());
}

#[tokio::test]
async fn test_catalog() {
    let app = TestApp::new().await;
    let (status, headers, body) = app
        .get("/api/admin/access/catalog", &token(RoleKey::Admin, "a-1"))
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["roles"].as_array().unwrap().len(), 7);
    assert_eq!(body["features"][16], "Profile");
    assert_eq!(body["actions"], json!(["view", "create", "edit", "delete"]));
    assert_eq!(body["registries"][1]["registry"], "settingsControls");
    assert_eq!(headers[header::CACHE_CONTROL], "private, no-store");
}

#[tokio::test]
async fn test_session_operations_while_closed_conflict() {
    let app = TestApp::new().await;
    let admin = token(RoleKey::Admin, "a-1");

    let (status, _, _) = app.get(SESSION, &admin).await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, _) = app
        .put(
            "/api/admin/access/session/roles/Teacher/all",
            &admin,
            json!({"value": true}),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, _) = app.post(&format!("{SESSION}/commit"), &admin).await;
    assert_eq!(status, StatusCode::CONFLICT);

    assert_eq!(app.delete(SESSION, &admin).await, StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_enter_edit_commit_flow() {
    let app = TestApp::new().await;
    let admin = token(RoleKey::Admin, "a-1");
    let librarian = token(RoleKey::Librarian, "l-1");

    let (status, view) = app.post(SESSION, &admin).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(view["editor"], "a-1");
    assert_eq!(view["dirty"], false);

    let (status, view) = app
        .put(
            &format!("{SESSION}/permissions"),
            &admin,
            json!({"role": "Librarian", "feature": "Student", "action": "view", "value": true}),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(view["dirty"], true);
    assert_eq!(view["working"]["rolePermissions"]["Librarian"]["Student"]["view"], true);

    let (status, _) = app
        .put(
            &format!("{SESSION}/sections"),
            &admin,
            json!({"registry": "dashboardControls", "role": "Librarian", "key": "overdueBooks", "visible": false}),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    // Staged edits are invisible to readers until commit
    let (_, _, before) = app.get("/api/access/features/Student", &librarian).await;
    assert_eq!(before["view"], false);

    let (status, report) = app.post(&format!("{SESSION}/commit"), &admin).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(report["generation"], 1);
    assert_eq!(report["persisted"].as_array().unwrap().len(), 6);

    let (_, _, after) = app.get("/api/access/features/Student", &librarian).await;
    assert_eq!(after["view"], true);
    let (_, _, section) = app
        .get("/api/access/sections/dashboardControls/overdueBooks", &librarian)
        .await;
    assert_eq!(section["visible"], false);

    let (status, _, _) = app.get(SESSION, &admin).await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_enter_twice_keeps_staged_edits() {
    let app = TestApp::new().await;
    let admin = token(RoleKey::SuperAdmin, "root");

    app.post(SESSION, &admin).await;
    app.put(
        "/api/admin/access/session/roles/super_admin/view-only",
        &admin,
        json!({}),
    )
    .await;

    let (status, view) = app.post(SESSION, &admin).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(view["dirty"], true);
}

#[tokio::test]
async fn test_sessions_are_per_subject() {
    let app = TestApp::new().await;
    let first = token(RoleKey::Admin, "a-1");
    let second = token(RoleKey::Admin, "a-2");

    app.post(SESSION, &first).await;
    let (status, _, _) = app.get(SESSION, &second).await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_rollback_discards_staged_edits() {
    let app = TestApp::new().await;
    let admin = token(RoleKey::Admin, "a-1");
    let fingerprint = app.state.store.fingerprint();

    app.post(SESSION, &admin).await;
    app.put(
        &format!("{SESSION}/roles/Parent/all"),
        &admin,
        json!({"value": true}),
    )
    .await;
    app.post(&format!("{SESSION}/roles/Admin/restore-defaults"), &admin)
        .await;

    assert_eq!(app.delete(SESSION, &admin).await, StatusCode::NO_CONTENT);
    assert_eq!(app.state.store.fingerprint(), fingerprint);
    assert_eq!(app.state.store.generation(), 0);

    let (_, _, body) = app
        .get("/api/access/features/Fees", &token(RoleKey::Parent, "p-1"))
        .await;
    assert_eq!(body["delete"], false);
}

#[tokio::test]
async fn test_invalid_edits() {
    let app = TestApp::new().await;
    let admin = token(RoleKey::Admin, "a-1");
    app.post(SESSION, &admin).await;

    let (status, body) = app
        .put(
            &format!("{SESSION}/permissions"),
            &admin,
            json!({"role": "Teacher", "feature": "Hostel", "action": "view", "value": true}),
        )
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"], "Unknown feature: Hostel");

    let (status, _) = app
        .put(
            &format!("{SESSION}/sections"),
            &admin,
            json!({"registry": "teachersControls", "role": "Teacher", "key": "grading", "visible": false}),
        )
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let (status, _) = app
        .put(
            &format!("{SESSION}/sections"),
            &admin,
            json!({"registry": "teachersControls", "role": "Teacher", "key": "", "visible": false}),
        )
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let (status, _) = app
        .put(
            &format!("{SESSION}/sections"),
            &admin,
            json!({"registry": "dashboardControls", "role": "Parent", "key": "studentCount", "visible": false}),
        )
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let (status, body) = app
        .put(
            &format!("{SESSION}/roles/Janitor/all"),
            &admin,
            json!({"value": false}),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Invalid role: Janitor");

    let (status, body) = app
        .put(&format!("{SESSION}/permissions"), &admin, json!({"role": "Teacher"}))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "feature is required");
}

#[tokio::test]
async fn test_partial_commit_answers_bad_gateway_and_retry_succeeds() {
    let backend = Arc::new(FlakyStore::default());
    backend.fail("test:access:teachersControls");
    let app = TestApp::with_backend(backend.clone()).await;
    let admin = token(RoleKey::Admin, "a-1");

    app.post(SESSION, &admin).await;
    app.put(
        &format!("{SESSION}/sections"),
        &admin,
        json!({"registry": "teachersControls", "role": "Staff", "key": "salaryDetails", "visible": true}),
    )
    .await;

    let (status, body) = app.post(&format!("{SESSION}/commit"), &admin).await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body["persisted"].as_array().unwrap().len(), 5);
    assert_eq!(body["failed"][0]["key"], "teachersControls");
    assert!(body["error"].as_str().unwrap().contains("still open"));

    let (status, _, view) = app.get(SESSION, &admin).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(view["dirty"], true);

    backend.heal();
    let (status, report) = app.post(&format!("{SESSION}/commit"), &admin).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(report["generation"], 2);

    let (_, _, section) = app
        .get(
            "/api/access/sections/teachersControls/salaryDetails",
            &token(RoleKey::Staff, "st-1"),
        )
        .await;
    assert_eq!(section["visible"], true);
}

#[tokio::test]
async fn test_idle_session_is_dropped() {
    let base = TestApp::new().await;
    let app = TestApp::with_state(base.state.clone().with_session_idle_timeout(Duration::ZERO));
    let admin = token(RoleKey::Admin, "a-idle");

    let (status, _) = app.post(SESSION, &admin).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _, _) = app.get(SESSION, &admin).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert!(app.state.sessions.lock().await.is_empty());
}
