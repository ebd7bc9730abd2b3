//! Schoolgate Observability
//!
//! Tracing, Prometheus metrics and HTTP request logging for the access
//! service and CLI.
//!
//! Compiled in through the `observability` feature (default). At runtime the
//! `OBSERVABILITY_ENABLED` environment variable can still switch it off, in
//! which case only console logging is installed. Without the feature every
//! entry point is a no-op stub and [`init_basic_console_logging`] is used.
//!
//! # Examples
//!
//! ```no_run
//! use schoolgate_observability::{init_tracing, shutdown_tracer};
//!
//! #[tokio::main]
//! async fn main() {
//!     init_tracing();
//!     // ... application code ...
//!     shutdown_tracer().await;
//! }
//! ```

pub mod basic_logging;
#[cfg(feature = "observability")]
pub mod logging;
#[cfg(feature = "observability")]
pub mod metrics;

pub use basic_logging::init_basic_console_logging;

#[cfg(feature = "observability")]
pub use metrics_exporter_prometheus::PrometheusHandle;

#[cfg(feature = "observability")]
pub use logging::{init_tracing, is_observability_enabled, logging_middleware, shutdown_tracer};
#[cfg(feature = "observability")]
pub use metrics::{init_metrics, metrics_middleware, render_metrics, track_token_issued};

// No-op stubs when observability is disabled
#[cfg(not(feature = "observability"))]
pub mod stubs {
    use axum::{extract::Request, middleware::Next, response::Response};

    /// Opaque stand-in for the Prometheus handle.
    #[derive(Clone, Debug)]
    pub struct PrometheusHandle;

    pub fn is_observability_enabled() -> bool {
        false
    }

    pub async fn logging_middleware(req: Request, next: Next) -> Response {
        next.run(req).await
    }

    pub async fn metrics_middleware(req: Request, next: Next) -> Response {
        next.run(req).await
    }

    /// Console logging only.
    pub fn init_tracing() {
        super::init_basic_console_logging();
    }

    pub async fn shutdown_tracer() {}

    pub fn init_metrics() -> Option<PrometheusHandle> {
        None
    }

    pub fn render_metrics(_handle: &PrometheusHandle) -> String {
        String::new()
    }

    pub fn track_token_issued(_role: &str) {}
}

#[cfg(not(feature = "observability"))]
pub use stubs::*;
