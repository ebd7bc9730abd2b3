use tracing_subscriber::{EnvFilter, Layer, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Default filter: `LOG_LEVEL` (default `info`) for schoolgate crates, noisy
/// dependencies held at `warn`.
pub(crate) fn default_filter() -> EnvFilter {
    let log_level = std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

    EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "schoolgate={level},schoolgate_access={level},schoolgate_cli={level},\
             schoolgate_cache={level},schoolgate_db={level},\
             tower_http=warn,hyper=warn,tonic=warn,h2=warn,sqlx=warn",
            level = log_level
        ))
    })
}

/// Initialize console-only logging.
///
/// Used when observability is compiled out or switched off with
/// `OBSERVABILITY_ENABLED=false`, and by the CLI.
///
/// Calling it twice is harmless; the second registration is ignored.
pub fn init_basic_console_logging() {
    let console_layer = fmt::layer()
        .compact()
        .with_target(true)
        .with_thread_ids(false)
        .with_thread_names(false)
        .with_file(true)
        .with_line_number(true)
        .with_writer(std::io::stderr)
        .with_filter(default_filter());

    let _ = tracing_subscriber::registry().with(console_layer).try_init();
}
