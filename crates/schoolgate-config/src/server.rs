use std::env;

/// HTTP listener configuration.
///
/// - `SERVER_ADDR`: bind address (default: `0.0.0.0:3000`)
/// - `SESSION_IDLE_TIMEOUT`: seconds an edit session may sit untouched before
///   it is dropped (default: 1800)
#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub addr: String,
    pub session_idle_timeout: u64,
}

impl ServerConfig {
    pub fn from_env() -> Self {
        Self {
            addr: env::var("SERVER_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".to_string()),
            session_idle_timeout: env::var("SESSION_IDLE_TIMEOUT")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(1800), // 30 minutes
        }
    }
}
