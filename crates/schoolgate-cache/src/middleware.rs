//! HTTP cache validation for access decisions.
//!
//! Access decisions may change at any commit, so clients are told to
//! revalidate every time (`Cache-Control: private, no-cache`) and revalidation
//! is made cheap with ETags: a handler may set an `ETag` derived from the
//! configuration fingerprint, otherwise one is computed from the body.
//!
//! # Example
//!
//! ```ignore
//! use schoolgate_cache::middleware::{cache_control, etag_middleware, CacheControlConfig};
//! use axum::{Router, middleware};
//!
//! let app = Router::new()
//!     .route("/api/access/me", get(handler))
//!     .layer(cache_control(CacheControlConfig::revalidate()))
//!     .layer(middleware::from_fn(etag_middleware));
//! ```

use axum::{
    body::Body,
    extract::Request,
    http::{
        HeaderValue, Method, StatusCode,
        header::{CACHE_CONTROL, ETAG, IF_NONE_MATCH},
    },
    middleware::Next,
    response::{IntoResponse, Response},
};
use http_body_util::BodyExt;
use sha2::{Digest, Sha256};
use tower_http::set_header::SetResponseHeaderLayer;

/// Cache-Control directives for a group of routes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheControlConfig {
    /// Only the end client may cache, never a shared proxy.
    pub private: bool,
    /// Seconds the response is fresh without revalidation.
    pub max_age: u64,
    /// Stored copies must be revalidated before every use.
    pub no_cache: bool,
    /// Never store the response.
    pub no_store: bool,
}

impl CacheControlConfig {
    /// `private, no-cache`: clients may keep the response but must revalidate.
    pub fn revalidate() -> Self {
        Self {
            private: true,
            max_age: 0,
            no_cache: true,
            no_store: false,
        }
    }

    /// `no-store`: for administrative session state.
    pub fn no_store() -> Self {
        Self {
            private: true,
            max_age: 0,
            no_cache: false,
            no_store: true,
        }
    }

    /// `private, max-age=<secs>`: for static catalogs.
    pub fn private(max_age: u64) -> Self {
        Self {
            private: true,
            max_age,
            no_cache: false,
            no_store: false,
        }
    }

    /// Build the Cache-Control header value.
    pub fn to_header_value(&self) -> HeaderValue {
        let mut directives = Vec::new();

        if self.private {
            directives.push("private".to_string());
        }
        if self.no_store {
            directives.push("no-store".to_string());
        } else if self.no_cache {
            directives.push("no-cache".to_string());
        } else {
            directives.push(format!("max-age={}", self.max_age));
        }

        HeaderValue::from_str(&directives.join(", "))
            .unwrap_or_else(|_| HeaderValue::from_static("no-store"))
    }
}

impl Default for CacheControlConfig {
    fn default() -> Self {
        Self::revalidate()
    }
}

/// Create a layer that sets Cache-Control unless the handler already did.
pub fn cache_control(config: CacheControlConfig) -> SetResponseHeaderLayer<HeaderValue> {
    SetResponseHeaderLayer::if_not_present(CACHE_CONTROL, config.to_header_value())
}

/// Strong ETag over response body bytes.
fn body_etag(body: &[u8]) -> String {
    let hash = Sha256::digest(body);
    format!("\"{}\"", hex::encode(&hash[..16]))
}

/// Weak comparison: the `W/` prefix is ignored.
fn etags_match(client_etag: &str, server_etag: &str) -> bool {
    let client = client_etag.trim().trim_start_matches("W/");
    let server = server_etag.trim().trim_start_matches("W/");
    client == "*" || client == server
}

fn any_match(if_none_match: &str, etag: &str) -> bool {
    if_none_match.split(',').any(|tag| etags_match(tag, etag))
}

fn not_modified(etag: HeaderValue) -> Response {
    let mut response = StatusCode::NOT_MODIFIED.into_response();
    response.headers_mut().insert(ETAG, etag);
    response
}

/// Conditional GET support.
///
/// Successful GET responses get an `ETag` (the handler's, or a body hash) and
/// a matching `If-None-Match` turns the response into `304 Not Modified`.
/// The body is buffered, so this belongs on small JSON endpoints only.
pub async fn etag_middleware(request: Request, next: Next) -> Response {
    let is_get = request.method() == Method::GET;
    let if_none_match = request
        .headers()
        .get(IF_NONE_MATCH)
        .and_then(|v| v.to_str().ok())
        .map(|s| s.to_string());

    let response = next.run(request).await;

    if !is_get || !response.status().is_success() {
        return response;
    }

    if let Some(server_etag) = response.headers().get(ETAG).cloned() {
        let matched = if_none_match
            .as_deref()
            .zip(server_etag.to_str().ok())
            .is_some_and(|(client, server)| any_match(client, server));
        return if matched {
            not_modified(server_etag)
        } else {
            response
        };
    }

    let (parts, body) = response.into_parts();
    let bytes = match body.collect().await {
        Ok(collected) => collected.to_bytes(),
        Err(_) => return (parts, Body::empty()).into_response(),
    };

    let etag = body_etag(&bytes);
    let Ok(etag_value) = HeaderValue::from_str(&etag) else {
        return Response::from_parts(parts, Body::from(bytes));
    };

    if if_none_match.is_some_and(|client| any_match(&client, &etag)) {
        return not_modified(etag_value);
    }

    let mut response = Response::from_parts(parts, Body::from(bytes));
    response.headers_mut().insert(ETAG, etag_value);
    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{Router, middleware, routing::get};
    use tower::ServiceExt;

    fn app() -> Router {
        Router::new()
            .route("/computed", get(|| async { "decisions" }))
            .route(
                "/tagged",
                get(|| async { ([(ETAG, "\"fp-1-Teacher\"")], "decisions") }),
            )
            .layer(middleware::from_fn(etag_middleware))
            .layer(cache_control(CacheControlConfig::revalidate()))
    }

    async fn send(uri: &str, if_none_match: Option<&str>) -> Response {
        let mut builder = axum::http::Request::builder().uri(uri);
        if let Some(tag) = if_none_match {
            builder = builder.header(IF_NONE_MATCH, tag);
        }
        app()
            .oneshot(builder.body(Body::empty()).unwrap())
            .await
            .unwrap()
    }

    #[test]
    fn test_revalidate_header() {
        let header = CacheControlConfig::revalidate().to_header_value();
        assert_eq!(header.to_str().unwrap(), "private, no-cache");
    }

    #[test]
    fn test_no_store_and_private_headers() {
        assert_eq!(
            CacheControlConfig::no_store().to_header_value(),
            "private, no-store"
        );
        assert_eq!(
            CacheControlConfig::private(300).to_header_value(),
            "private, max-age=300"
        );
    }

    #[test]
    fn test_etags_match() {
        assert!(etags_match("\"abc123\"", "\"abc123\""));
        assert!(etags_match("W/\"abc123\"", "\"abc123\""));
        assert!(etags_match("*", "\"abc123\""));
        assert!(!etags_match("\"abc123\"", "\"xyz789\""));
        assert!(any_match("\"old\", \"abc123\"", "\"abc123\""));
    }

    #[tokio::test]
    async fn test_computed_etag_and_revalidation() {
        let first = send("/computed", None).await;
        assert_eq!(first.status(), StatusCode::OK);
        assert_eq!(first.headers()[CACHE_CONTROL], "private, no-cache");
        let etag = first.headers()[ETAG].to_str().unwrap().to_string();

        let second = send("/computed", Some(&etag)).await;
        assert_eq!(second.status(), StatusCode::NOT_MODIFIED);
    }

    #[tokio::test]
    async fn test_handler_etag_is_kept() {
        let response = send("/tagged", None).await;
        assert_eq!(response.headers()[ETAG], "\"fp-1-Teacher\"");

        let revalidated = send("/tagged", Some("\"fp-1-Teacher\"")).await;
        assert_eq!(revalidated.status(), StatusCode::NOT_MODIFIED);

        let stale = send("/tagged", Some("\"fp-0-Teacher\"")).await;
        assert_eq!(stale.status(), StatusCode::OK);
    }
}
