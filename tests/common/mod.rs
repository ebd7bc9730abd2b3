#![allow(dead_code)]

use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use axum::{
    Router,
    body::Body,
    http::{HeaderMap, Method, Request, StatusCode, header},
};
use http_body_util::BodyExt;
use schoolgate::router::init_router;
use schoolgate::state::AppState;
use schoolgate_access::{ConfigurationStore, defaults};
use schoolgate_auth::create_access_token;
use schoolgate_config::{CorsConfig, JwtConfig};
use schoolgate_core::{BlobFuture, BlobStore, MemoryBlobStore, StoreError};
use schoolgate_models::RoleKey;
use serde_json::Value;
use tower::ServiceExt;

pub fn jwt_config() -> JwtConfig {
    JwtConfig {
        secret: "integration-test-secret".to_string(),
        access_token_expiry: 3600,
    }
}

pub fn token(role: RoleKey, sub: &str) -> String {
    create_access_token(sub, role, &jwt_config()).unwrap()
}

/// Memory backend whose writes fail for selected keys.
#[derive(Default)]
pub struct FlakyStore {
    inner: MemoryBlobStore,
    failing: Mutex<HashSet<String>>,
}

impl FlakyStore {
    pub fn fail(&self, key: &str) {
        self.failing.lock().unwrap().insert(key.to_string());
    }

    pub fn heal(&self) {
        self.failing.lock().unwrap().clear();
    }
}

impl BlobStore for FlakyStore {
    fn load<'a>(&'a self, key: &'a str) -> BlobFuture<'a, Option<Vec<u8>>> {
        self.inner.load(key)
    }

    fn save<'a>(&'a self, key: &'a str, bytes: &'a [u8]) -> BlobFuture<'a, ()> {
        if self.failing.lock().unwrap().contains(key) {
            return Box::pin(async move { Err(StoreError::backend("flaky", "write refused")) });
        }
        self.inner.save(key, bytes)
    }

    fn backend(&self) -> &'static str {
        "flaky"
    }
}

pub struct TestApp {
    pub router: Router,
    pub state: AppState,
}

impl TestApp {
    pub async fn new() -> Self {
        Self::with_backend(Arc::new(MemoryBlobStore::new())).await
    }

    pub async fn with_backend(backend: Arc<dyn BlobStore>) -> Self {
        let store = ConfigurationStore::init(backend, "test", defaults::shipped())
            .await
            .unwrap();
        Self::with_state(AppState::new(store, jwt_config(), CorsConfig::default()))
    }

    pub fn with_state(state: AppState) -> Self {
        Self {
            router: init_router(state.clone()),
            state,
        }
    }

    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
        headers: &[(&str, &str)],
    ) -> (StatusCode, HeaderMap, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        for (name, value) in headers {
            builder = builder.header(*name, *value);
        }
        let body = match body {
            Some(json) => {
                builder = builder.header(header::CONTENT_TYPE, "application/json");
                Body::from(json.to_string())
            }
            None => Body::empty(),
        };

        let response = self
            .router
            .clone()
            .oneshot(builder.body(body).unwrap())
            .await
            .unwrap();

        let status = response.status();
        let headers = response.headers().clone();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, headers, json)
    }

    pub async fn get(&self, uri: &str, token: &str) -> (StatusCode, HeaderMap, Value) {
        self.request(Method::GET, uri, Some(token), None, &[]).await
    }

    pub async fn post(&self, uri: &str, token: &str) -> (StatusCode, Value) {
        let (status, _, json) = self.request(Method::POST, uri, Some(token), None, &[]).await;
        (status, json)
    }

    pub async fn put(&self, uri: &str, token: &str, body: Value) -> (StatusCode, Value) {
        let (status, _, json) = self
            .request(Method::PUT, uri, Some(token), Some(body), &[])
            .await;
        (status, json)
    }

    pub async fn delete(&self, uri: &str, token: &str) -> StatusCode {
        let (status, _, _) = self.request(Method::DELETE, uri, Some(token), None, &[]).await;
        status
    }
}
